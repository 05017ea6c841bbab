use crate::context::{Context, NormalizedItem};
use crate::schema::{FallbackTopic, MenuSchema};

const MAX_LISTED_ITEMS: usize = 10;

const DISCLAIMER: &str =
    "Our full assistant is temporarily unavailable, so this is a short overview. \
     Please ask our staff for details.";

/// Deterministic answer built straight from the normalized records, used
/// whenever the generation backend is unconfigured or failing. Always
/// returns a non-empty string.
pub fn build_fallback(user_message: &str, context: &Context, schema: &MenuSchema) -> String {
    let topic = schema.fallback_topic(user_message);

    let (header, items) = match topic {
        FallbackTopic::Pizzas => ("Our pizzas:", &context.pizzas),
        FallbackTopic::Desserts => ("Our desserts:", &context.desserts),
        FallbackTopic::Wines => ("From our wine list:", &context.wines),
        FallbackTopic::Menu => ("From our menu:", &context.menu),
    };

    let mut lines = vec![header.to_string()];
    lines.extend(
        items
            .iter()
            .filter_map(item_line)
            .take(MAX_LISTED_ITEMS),
    );

    if lines.len() == 1 {
        lines.push("We currently have no items listed for this category.".to_string());
    }

    lines.push(String::new());
    lines.push(DISCLAIMER.to_string());
    lines.join("\n")
}

fn item_line(item: &NormalizedItem) -> Option<String> {
    item.name.as_ref().map(|name| format!("- {name}"))
}
