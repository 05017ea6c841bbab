use anyhow::Context as _;

use crate::airtable::AirtableClient;
use crate::context::ContextAssembler;
use crate::error::{Error, Result};
use crate::fallback;
use crate::models::{AnswerSource, AskRequest, AskResponse, ChatMessage};
use crate::openai::{GenerationError, OpenAiClient};

const SYSTEM_PROMPT: &str = "\
You are the digital assistant of the restaurant described in the context data.\n\
- Answer only questions about the restaurant: menu, pizzas, desserts, wines, \
daily specials, reservations, opening hours, payment, children, pets, parking.\n\
- Be warm and hospitable; keep answers short, clear and concrete. Say \"we\", \
not \"I\".\n\
- Detect the guest's language and reply in it.\n\
- Use names, descriptions and prices exactly as given in the context; always \
show prices with their currency (e.g. 12.00 €). If a price is missing, say the \
information is currently unavailable - never invent one.\n\
- When asked for the full menu, first offer the categories and only then the \
requested part.\n\
- For wine pairing, suggest only wines present in the wine list, preferring \
local varieties.\n\
- If a question is unrelated to the restaurant, say you can only help with \
questions about the restaurant and its offer.";

/// Per-request orchestration: validate, fetch, assemble, then either ask the
/// generation backend or answer deterministically. Holds no per-request
/// state.
#[derive(Clone)]
pub struct ChatService {
    airtable: AirtableClient,
    openai: Option<OpenAiClient>,
    assembler: ContextAssembler,
}

impl ChatService {
    pub fn new(
        airtable: AirtableClient,
        openai: Option<OpenAiClient>,
        assembler: ContextAssembler,
    ) -> Self {
        Self {
            airtable,
            openai,
            assembler,
        }
    }

    pub async fn answer(&self, request: AskRequest) -> Result<AskResponse> {
        let slug = request.slug.trim();
        let message = request.message.trim();
        if slug.is_empty() || message.is_empty() {
            return Err(Error::validation("slug and message are required"));
        }

        let (venue, bundle) = self.airtable.load_bundle(slug).await?;
        let context = self.assembler.assemble(venue.as_ref(), &bundle);

        let Some(openai) = &self.openai else {
            tracing::debug!("generation backend not configured, answering from local data");
            let answer = fallback::build_fallback(message, &context, self.assembler.schema());
            return Ok(AskResponse {
                ok: true,
                answer,
                source: AnswerSource::Fallback,
            });
        };

        let context_json = serde_json::to_string(&context)
            .context("failed to serialize assembled context")?;

        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend(request.history.iter().cloned());
        messages.push(ChatMessage::user(format!(
            "RESTAURANT_SLUG={slug}\nCONTEXT={context_json}\n\nGUEST: {message}"
        )));

        match openai.complete(&messages).await {
            Ok(answer) => Ok(AskResponse {
                ok: true,
                answer,
                source: AnswerSource::Generated,
            }),
            Err(GenerationError::RateLimited) => Err(Error::RateLimited),
            Err(err) => {
                tracing::warn!("generation failed, degrading to local answer: {err}");
                let answer = fallback::build_fallback(message, &context, self.assembler.schema());
                Ok(AskResponse {
                    ok: true,
                    answer,
                    source: AnswerSource::Fallback,
                })
            }
        }
    }
}
