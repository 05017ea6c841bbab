use reqwest::Client;
use serde::Deserialize;

use crate::context::CategoryBundle;
use crate::error::{Error, Result};
use crate::record::Record;

pub const VENUE_TABLE: &str = "RESTORANI";
pub const MENU_TABLE: &str = "MENU";
pub const DESSERTS_TABLE: &str = "DESERTI";
pub const PIZZAS_TABLE: &str = "PIZZE";
pub const WINES_TABLE: &str = "VINSKA KARTA";
pub const FAQ_TABLE: &str = "FAQ";
pub const SPECIALS_TABLE: &str = "DNEVNA PONUDA";

const GRID_VIEW: &str = "Grid view";

/// Thin client for the Airtable-style table store. Every call is a single
/// GET; non-2xx responses are hard failures naming the table.
#[derive(Clone)]
pub struct AirtableClient {
    client: Client,
    api_url: String,
    base_id: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<Record>,
}

impl AirtableClient {
    pub fn new(
        api_url: impl Into<String>,
        base_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            base_id: base_id.into(),
            token: token.into(),
        }
    }

    pub async fn list(
        &self,
        table: &str,
        view: Option<&str>,
        slug: Option<&str>,
    ) -> Result<Vec<Record>> {
        let url = format!(
            "{}/{}/{}",
            self.api_url,
            self.base_id,
            urlencode(table)
        );

        let mut request = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(&[("pageSize", "100")]);
        if let Some(view) = view {
            request = request.query(&[("view", view)]);
        }
        if let Some(slug) = slug {
            let formula = format!("{{RestoranSlug}}='{}'", slug);
            request = request.query(&[("filterByFormula", formula.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|err| Error::table_store(table, err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::table_store(
                table,
                format!("status {}{}", status.as_u16(), brief_body(&body)),
            ));
        }

        let parsed = response
            .json::<ListResponse>()
            .await
            .map_err(|err| Error::table_store(table, err))?;

        Ok(parsed.records)
    }

    /// The single venue row for a tenant, selected by its slug column.
    pub async fn venue_profile(&self, slug: &str) -> Result<Option<Record>> {
        let url = format!("{}/{}/{}", self.api_url, self.base_id, VENUE_TABLE);
        let formula = format!("{{slug}}='{}'", slug);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(&[
                ("filterByFormula", formula.as_str()),
                ("maxRecords", "1"),
            ])
            .send()
            .await
            .map_err(|err| Error::table_store(VENUE_TABLE, err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::table_store(
                VENUE_TABLE,
                format!("status {}{}", status.as_u16(), brief_body(&body)),
            ));
        }

        let parsed = response
            .json::<ListResponse>()
            .await
            .map_err(|err| Error::table_store(VENUE_TABLE, err))?;

        Ok(parsed.records.into_iter().next())
    }

    /// Fetches the venue profile and every category collection concurrently.
    /// The daily-specials table is optional per tenant; its failure degrades
    /// to an empty collection instead of failing the request.
    pub async fn load_bundle(&self, slug: &str) -> Result<(Option<Record>, CategoryBundle)> {
        let (venue, menu, desserts, pizzas, wines, faq, specials) = tokio::join!(
            self.venue_profile(slug),
            self.list(MENU_TABLE, Some(GRID_VIEW), Some(slug)),
            self.list(DESSERTS_TABLE, Some(GRID_VIEW), Some(slug)),
            self.list(PIZZAS_TABLE, Some(GRID_VIEW), Some(slug)),
            self.list(WINES_TABLE, Some(GRID_VIEW), Some(slug)),
            self.list(FAQ_TABLE, Some(GRID_VIEW), Some(slug)),
            self.list(SPECIALS_TABLE, Some(GRID_VIEW), Some(slug)),
        );

        let specials = specials.unwrap_or_else(|err| {
            tracing::warn!("daily specials unavailable, continuing without: {err}");
            Vec::new()
        });

        let bundle = CategoryBundle {
            menu: menu?,
            desserts: desserts?,
            pizzas: pizzas?,
            wines: wines?,
            specials,
            faq: faq?,
        };

        Ok((venue?, bundle))
    }
}

fn urlencode(table: &str) -> String {
    table.replace(' ', "%20")
}

fn brief_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        let mut snippet: String = trimmed.chars().take(200).collect();
        snippet.insert_str(0, ": ");
        snippet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_with_spaces_are_encoded() {
        assert_eq!(urlencode(WINES_TABLE), "VINSKA%20KARTA");
        assert_eq!(urlencode(MENU_TABLE), "MENU");
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(500);
        let brief = brief_body(&body);
        assert!(brief.starts_with(": "));
        assert_eq!(brief.len(), 202);
    }

    #[test]
    fn blank_error_bodies_are_dropped() {
        assert_eq!(brief_body("  \n"), "");
    }
}
