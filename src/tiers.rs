use serde::Serialize;

use crate::price::{self, Currency};
use crate::record::Record;
use crate::schema::MenuSchema;

/// Serving-size price tiers found on wine-list records. Upstream columns for
/// these are wildly inconsistent (accented or plain, abbreviated, or volume
/// notations with either decimal separator), so detection is keyword-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    ByGlass,
    ByBottle,
    HalfBottle,
    QuarterLiter,
    Ml187,
}

impl Tier {
    /// Fixed rendering order for summaries.
    pub const ORDER: [Tier; 5] = [
        Tier::ByGlass,
        Tier::ByBottle,
        Tier::HalfBottle,
        Tier::QuarterLiter,
        Tier::Ml187,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tier::ByGlass => "by the glass",
            Tier::ByBottle => "by the bottle",
            Tier::HalfBottle => "half bottle",
            Tier::QuarterLiter => "0.25 l",
            Tier::Ml187 => "0.187 l",
        }
    }
}

/// One wine record's price tiers, each already rendered for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceTiers {
    pub by_glass: Option<String>,
    pub by_bottle: Option<String>,
    pub half_bottle: Option<String>,
    pub quarter_liter: Option<String>,
    #[serde(rename = "187ml")]
    pub ml_187: Option<String>,
}

impl PriceTiers {
    pub fn get(&self, tier: Tier) -> Option<&str> {
        match tier {
            Tier::ByGlass => self.by_glass.as_deref(),
            Tier::ByBottle => self.by_bottle.as_deref(),
            Tier::HalfBottle => self.half_bottle.as_deref(),
            Tier::QuarterLiter => self.quarter_liter.as_deref(),
            Tier::Ml187 => self.ml_187.as_deref(),
        }
    }

    fn slot(&mut self, tier: Tier) -> &mut Option<String> {
        match tier {
            Tier::ByGlass => &mut self.by_glass,
            Tier::ByBottle => &mut self.by_bottle,
            Tier::HalfBottle => &mut self.half_bottle,
            Tier::QuarterLiter => &mut self.quarter_liter,
            Tier::Ml187 => &mut self.ml_187,
        }
    }

    pub fn is_empty(&self) -> bool {
        Tier::ORDER.iter().all(|t| self.get(*t).is_none())
    }
}

/// Scans a wine record's keys and builds its tier map. Classification is
/// first-match-wins over the schema's ordered keyword table; only the first
/// key observed per tier is kept, so the result is deterministic given the
/// record's key order.
pub fn build_price_tiers(record: &Record, schema: &MenuSchema, currency: &Currency) -> PriceTiers {
    let mut tiers = PriceTiers::default();

    for (key, value) in &record.fields {
        let Some(shown) = price::format_price(value, currency) else {
            continue;
        };
        let key_lower = key.to_lowercase();

        for (tier, keywords) in &schema.tier_keywords {
            if !keywords.iter().any(|kw| key_lower.contains(kw)) {
                continue;
            }
            let slot = tiers.slot(*tier);
            if slot.is_none() {
                *slot = Some(shown);
            }
            break;
        }
    }

    tiers
}

/// Joins all resolved tiers as `"label: price"` in the fixed tier order.
pub fn tier_summary(tiers: &PriceTiers) -> Option<String> {
    let parts: Vec<String> = Tier::ORDER
        .iter()
        .filter_map(|tier| {
            tiers
                .get(*tier)
                .map(|shown| format!("{}: {}", tier.label(), shown))
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" • "))
    }
}

/// Headline price: bottle first, glass second. A listed wine's primary price
/// favors the full bottle when both are known.
pub fn primary_price(tiers: &PriceTiers) -> Option<String> {
    tiers
        .by_bottle
        .clone()
        .or_else(|| tiers.by_glass.clone())
}
