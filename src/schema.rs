use crate::price::Currency;
use crate::tiers::Tier;

/// Field-name candidates for one record category. Order encodes preference;
/// upstream tables mix Croatian and English column names per tenant.
#[derive(Debug, Clone)]
pub struct CategorySchema {
    pub name: &'static [&'static str],
    pub description: &'static [&'static str],
    pub price: &'static [&'static str],
    pub category: &'static [&'static str],
    pub subcategory: &'static [&'static str],
    pub tags: &'static [&'static str],
    pub note: &'static [&'static str],
    pub variety: &'static [&'static str],
    /// Category label applied only when the upstream record carries none.
    pub default_category: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct VenueSchema {
    pub phone: &'static [&'static str],
    pub email: &'static [&'static str],
    pub address: &'static [&'static str],
    pub website: &'static [&'static str],
    pub hours: &'static [&'static str],
}

/// Process-wide lookup tables: per-category field candidates, wine price-tier
/// keywords, and the fallback trigger groups. Built once at startup and only
/// ever read afterwards.
#[derive(Debug, Clone)]
pub struct MenuSchema {
    pub currency: Currency,
    pub dishes: CategorySchema,
    pub pizzas: CategorySchema,
    pub desserts: CategorySchema,
    pub wines: CategorySchema,
    pub specials: CategorySchema,
    pub faq_question: &'static [&'static str],
    pub faq_answer: &'static [&'static str],
    pub venue: VenueSchema,
    /// Ordered (tier, keyword family) pairs; key classification is
    /// first-match-wins in this order.
    pub tier_keywords: Vec<(Tier, &'static [&'static str])>,
    /// Ordered (collection, keyword group) pairs for the fallback responder.
    pub fallback_triggers: Vec<(FallbackTopic, &'static [&'static str])>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTopic {
    Pizzas,
    Desserts,
    Wines,
    Menu,
}

impl Default for MenuSchema {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            dishes: CategorySchema {
                name: &["Naziv jela", "Naziv", "Name"],
                description: &["Opis", "Description"],
                price: &["Cijena", "Price"],
                category: &["Kategorija", "Category"],
                subcategory: &["Podkategorija", "Subcategory"],
                tags: &["PairingTagovi", "DijetalneOznake", "Tags"],
                note: &[],
                variety: &[],
                default_category: None,
            },
            pizzas: CategorySchema {
                name: &["Naziv pizze", "Naziv", "Name"],
                description: &["Opis", "Description"],
                price: &["Cijena", "Price"],
                category: &["Kategorija", "Category"],
                subcategory: &["Podkategorija", "Subcategory"],
                tags: &[],
                note: &[],
                variety: &[],
                default_category: Some("Pizze"),
            },
            desserts: CategorySchema {
                name: &["Naziv deserta", "Naziv", "Name"],
                description: &["Opis", "Description"],
                price: &["Cijena", "Price"],
                category: &["Kategorija", "Category"],
                subcategory: &["Podkategorija", "Subcategory"],
                tags: &[],
                note: &[],
                variety: &[],
                default_category: Some("Deserti"),
            },
            wines: CategorySchema {
                name: &["Naziv vina", "Naziv", "Name"],
                description: &["Opis", "Description"],
                price: &["Cijena", "Price"],
                category: &["Kategorija", "Category"],
                subcategory: &["Podkategorija", "Subcategory"],
                tags: &[],
                note: &[],
                variety: &["Sorta", "Variety"],
                default_category: Some("Vina"),
            },
            specials: CategorySchema {
                name: &["Naziv", "Jelo", "Name"],
                description: &["Opis", "Description"],
                price: &["Cijena", "Price"],
                category: &[],
                subcategory: &[],
                tags: &[],
                note: &["Napomena", "Note"],
                variety: &[],
                default_category: None,
            },
            faq_question: &["Pitanje", "Question"],
            faq_answer: &["Odgovor", "Answer"],
            venue: VenueSchema {
                phone: &["Telefon", "Phone"],
                email: &["Email", "E-mail"],
                address: &["Adresa", "Address"],
                website: &["Web", "Website"],
                hours: &["Radno vrijeme", "Hours"],
            },
            tier_keywords: vec![
                (Tier::ByGlass, &["čaša", "casa", "glass"]),
                (
                    Tier::ByBottle,
                    &["butelja", "boca", "bottle", "flaša", "0.75", "0,75"],
                ),
                (Tier::HalfBottle, &["0.5", "0,5"]),
                (Tier::QuarterLiter, &["0.25", "0,25"]),
                (Tier::Ml187, &["0.187", "0,187", "187"]),
            ],
            fallback_triggers: vec![
                (FallbackTopic::Pizzas, &["pizza", "pizz", "pizze"]),
                (
                    FallbackTopic::Desserts,
                    &["desert", "dessert", "kolač", "slatko", "sweet"],
                ),
                (
                    FallbackTopic::Wines,
                    &["vino", "vina", "wine", "vinsk"],
                ),
            ],
        }
    }
}

impl MenuSchema {
    /// First keyword group matched in the user message picks the topic;
    /// no match falls back to the generic menu.
    pub fn fallback_topic(&self, message: &str) -> FallbackTopic {
        let lower = message.to_lowercase();
        for (topic, keywords) in &self.fallback_triggers {
            if keywords.iter().any(|kw| lower.contains(kw)) {
                return *topic;
            }
        }
        FallbackTopic::Menu
    }
}
