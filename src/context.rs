use serde::Serialize;
use serde_json::{Map, Value};

use crate::price;
use crate::record::{self, Record};
use crate::schema::{CategorySchema, MenuSchema};
use crate::tiers::{self, PriceTiers};

/// Canonical per-item shape shared by every category. Each attribute is
/// independently optional: an absent upstream field stays `null`, never a
/// made-up value. Wine records additionally carry their tier map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_tiers: Option<PriceTiers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_summary: Option<String>,
}

/// Venue row with the documented contact fields resolved and every other
/// non-blank upstream column passed through verbatim, so tenant-specific
/// columns (parking, payment, house notes) stay visible to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VenueProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub hours: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FaqEntry {
    pub question: Option<String>,
    pub answer: Option<String>,
}

/// Everything the generation backend (or the fallback responder) sees for one
/// request. Built fresh per request and discarded afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Context {
    pub venue: Option<VenueProfile>,
    pub menu: Vec<NormalizedItem>,
    pub pizzas: Vec<NormalizedItem>,
    pub desserts: Vec<NormalizedItem>,
    pub wines: Vec<NormalizedItem>,
    pub specials: Vec<NormalizedItem>,
    pub faq: Vec<FaqEntry>,
}

/// Raw record collections as fetched from the table store, one per category.
/// Optional collections that failed upstream arrive here already empty.
#[derive(Debug, Clone, Default)]
pub struct CategoryBundle {
    pub menu: Vec<Record>,
    pub pizzas: Vec<Record>,
    pub desserts: Vec<Record>,
    pub wines: Vec<Record>,
    pub specials: Vec<Record>,
    pub faq: Vec<Record>,
}

const VENUE_NAME_FIELDS: &[&str] = &["Naziv", "Name", "Restoran"];

#[derive(Debug, Clone)]
pub struct ContextAssembler {
    schema: MenuSchema,
}

impl ContextAssembler {
    pub fn new(schema: MenuSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &MenuSchema {
        &self.schema
    }

    /// Normalizes every collection into the fixed context shape. Item order
    /// follows the input collections; nothing is sorted or deduplicated, and
    /// an empty collection simply produces an empty list.
    pub fn assemble(&self, venue: Option<&Record>, bundle: &CategoryBundle) -> Context {
        Context {
            venue: venue.map(|record| self.venue_profile(record)),
            menu: self.items(&bundle.menu, &self.schema.dishes, false),
            pizzas: self.items(&bundle.pizzas, &self.schema.pizzas, false),
            desserts: self.items(&bundle.desserts, &self.schema.desserts, false),
            wines: self.items(&bundle.wines, &self.schema.wines, true),
            specials: self.items(&bundle.specials, &self.schema.specials, false),
            faq: bundle.faq.iter().map(|r| self.faq_entry(r)).collect(),
        }
    }

    fn items(
        &self,
        records: &[Record],
        category: &CategorySchema,
        wine_tiers: bool,
    ) -> Vec<NormalizedItem> {
        records
            .iter()
            .map(|record| self.item(record, category, wine_tiers))
            .collect()
    }

    fn item(
        &self,
        record: &Record,
        category: &CategorySchema,
        wine_tiers: bool,
    ) -> NormalizedItem {
        let currency = &self.schema.currency;

        let mut item = NormalizedItem {
            name: record.resolve_str(category.name),
            description: record.resolve_str(category.description),
            price: record
                .resolve(category.price)
                .and_then(|value| price::format_price(value, currency)),
            category: record
                .resolve_str(category.category)
                .or_else(|| category.default_category.map(str::to_string)),
            subcategory: record.resolve_str(category.subcategory),
            tags: record.resolve_str(category.tags),
            note: record.resolve_str(category.note),
            variety: record.resolve_str(category.variety),
            ..NormalizedItem::default()
        };

        if wine_tiers {
            let tiers = tiers::build_price_tiers(record, &self.schema, currency);
            item.price_summary = tiers::tier_summary(&tiers);
            if item.price.is_none() {
                item.price = tiers::primary_price(&tiers);
            }
            if !tiers.is_empty() {
                item.price_tiers = Some(tiers);
            }
        }

        item
    }

    fn venue_profile(&self, record: &Record) -> VenueProfile {
        let venue = &self.schema.venue;
        let claimed: [&[&str]; 6] = [
            VENUE_NAME_FIELDS,
            venue.phone,
            venue.email,
            venue.address,
            venue.website,
            venue.hours,
        ];

        let mut extra = Map::new();
        for (key, value) in &record.fields {
            if record::stringify(value).is_none() {
                continue;
            }
            let is_claimed = claimed
                .iter()
                .any(|candidates| candidates.iter().any(|c| c.eq_ignore_ascii_case(key)));
            if !is_claimed {
                extra.insert(key.clone(), value.clone());
            }
        }

        VenueProfile {
            name: record.resolve_str(VENUE_NAME_FIELDS),
            phone: record.resolve_str(venue.phone),
            email: record.resolve_str(venue.email),
            address: record.resolve_str(venue.address),
            website: record.resolve_str(venue.website),
            hours: record.resolve_str(venue.hours),
            extra,
        }
    }

    fn faq_entry(&self, record: &Record) -> FaqEntry {
        FaqEntry {
            question: record.resolve_str(self.schema.faq_question),
            answer: record.resolve_str(self.schema.faq_answer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assembler() -> ContextAssembler {
        ContextAssembler::new(MenuSchema::default())
    }

    fn dish(name: &str, price: serde_json::Value) -> Record {
        Record::new("rec")
            .with_field("Naziv jela", json!(name))
            .with_field("Cijena", price)
    }

    #[test]
    fn dish_price_is_canonicalized() {
        let bundle = CategoryBundle {
            menu: vec![dish("Pašticada", json!("12,50"))],
            ..CategoryBundle::default()
        };
        let context = assembler().assemble(None, &bundle);

        assert_eq!(context.menu[0].name.as_deref(), Some("Pašticada"));
        assert_eq!(context.menu[0].price.as_deref(), Some("12.50 €"));
    }

    #[test]
    fn missing_fields_stay_null() {
        let bundle = CategoryBundle {
            menu: vec![Record::new("rec").with_field("Naziv jela", json!("Gregada"))],
            ..CategoryBundle::default()
        };
        let context = assembler().assemble(None, &bundle);

        let item = &context.menu[0];
        assert_eq!(item.price, None);
        assert_eq!(item.description, None);
        assert_eq!(item.category, None);
    }

    #[test]
    fn pizzas_get_default_category_only_without_upstream_value() {
        let with_cat = Record::new("a")
            .with_field("Naziv pizze", json!("Capricciosa"))
            .with_field("Kategorija", json!("Klasične"));
        let without_cat = Record::new("b").with_field("Naziv pizze", json!("Margherita"));

        let bundle = CategoryBundle {
            pizzas: vec![with_cat, without_cat],
            ..CategoryBundle::default()
        };
        let context = assembler().assemble(None, &bundle);

        assert_eq!(context.pizzas[0].category.as_deref(), Some("Klasične"));
        assert_eq!(context.pizzas[1].category.as_deref(), Some("Pizze"));
    }

    #[test]
    fn wine_items_expose_tiers_and_primary_price() {
        let wine = Record::new("rec")
            .with_field("Naziv vina", json!("Plavac Mali"))
            .with_field("Sorta", json!("Plavac Mali"))
            .with_field("Čaša", json!("4"))
            .with_field("Butelja", json!("18"));

        let bundle = CategoryBundle {
            wines: vec![wine],
            ..CategoryBundle::default()
        };
        let context = assembler().assemble(None, &bundle);

        let item = &context.wines[0];
        assert_eq!(item.price.as_deref(), Some("18.00 €"));
        assert_eq!(
            item.price_summary.as_deref(),
            Some("by the glass: 4.00 € • by the bottle: 18.00 €")
        );
        let tiers = item.price_tiers.as_ref().unwrap();
        assert_eq!(tiers.by_glass.as_deref(), Some("4.00 €"));
        assert_eq!(item.variety.as_deref(), Some("Plavac Mali"));
    }

    #[test]
    fn wine_without_tier_columns_keeps_plain_price() {
        let wine = Record::new("rec")
            .with_field("Naziv vina", json!("Pošip"))
            .with_field("Cijena", json!(24));

        let bundle = CategoryBundle {
            wines: vec![wine],
            ..CategoryBundle::default()
        };
        let context = assembler().assemble(None, &bundle);

        let item = &context.wines[0];
        assert_eq!(item.price.as_deref(), Some("24.00 €"));
        assert_eq!(item.price_tiers, None);
        assert_eq!(item.price_summary, None);
    }

    #[test]
    fn venue_contact_alternates_resolve() {
        let record = Record::new("rec")
            .with_field("Naziv", json!("Konoba More"))
            .with_field("Phone", json!("+385 21 123 456"))
            .with_field("Address", json!("Obala 1, Split"));

        let context = assembler().assemble(Some(&record), &CategoryBundle::default());
        let venue = context.venue.unwrap();

        assert_eq!(venue.phone.as_deref(), Some("+385 21 123 456"));
        assert_eq!(venue.address.as_deref(), Some("Obala 1, Split"));
        assert_eq!(venue.email, None);
    }

    #[test]
    fn venue_keeps_unclaimed_columns() {
        let record = Record::new("rec")
            .with_field("Naziv", json!("Konoba More"))
            .with_field("Telefon", json!("021 123 456"))
            .with_field("Parking", json!("besplatan parking iza restorana"))
            .with_field("Plaćanje", json!("kartice i gotovina"))
            .with_field("Napomena", json!("   "));

        let context = assembler().assemble(Some(&record), &CategoryBundle::default());
        let venue = context.venue.as_ref().unwrap();

        assert_eq!(
            venue.extra.get("Parking"),
            Some(&json!("besplatan parking iza restorana"))
        );
        assert_eq!(
            venue.extra.get("Plaćanje"),
            Some(&json!("kartice i gotovina"))
        );
        // Resolved contact columns are not duplicated, blank columns are dropped.
        assert!(!venue.extra.contains_key("Telefon"));
        assert!(!venue.extra.contains_key("Naziv"));
        assert!(!venue.extra.contains_key("Napomena"));

        let serialized = serde_json::to_string(&context).unwrap();
        assert!(serialized.contains("kartice i gotovina"));
    }

    #[test]
    fn assembly_is_idempotent_and_order_preserving() {
        let bundle = CategoryBundle {
            menu: vec![
                dish("Gregada", json!(18)),
                dish("Pašticada", json!("12,50")),
            ],
            faq: vec![Record::new("f").with_field("Pitanje", json!("Parking?"))],
            ..CategoryBundle::default()
        };
        let asm = assembler();

        let first = asm.assemble(None, &bundle);
        let second = asm.assemble(None, &bundle);

        assert_eq!(first, second);
        assert_eq!(first.menu[0].name.as_deref(), Some("Gregada"));
        assert_eq!(first.menu[1].name.as_deref(), Some("Pašticada"));
    }

    #[test]
    fn empty_optional_collections_do_not_abort_assembly() {
        let bundle = CategoryBundle {
            menu: vec![dish("Gregada", json!(18))],
            ..CategoryBundle::default()
        };
        let context = assembler().assemble(None, &bundle);

        assert_eq!(context.menu.len(), 1);
        assert!(context.specials.is_empty());
        assert!(context.faq.is_empty());
    }
}
