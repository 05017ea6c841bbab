use anyhow::Result;
use tracing_subscriber::EnvFilter;

use simmer::airtable::AirtableClient;
use simmer::chat::ChatService;
use simmer::context::ContextAssembler;
use simmer::openai::OpenAiClient;
use simmer::schema::MenuSchema;
use simmer::{run_server, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env();

    let missing = config.missing_env();
    if !missing.is_empty() {
        tracing::error!("missing environment variables: {}", missing.join(", "));
    }

    let airtable = AirtableClient::new(
        config.airtable_api_url.clone(),
        config.airtable_base_id.clone().unwrap_or_default(),
        config.airtable_token.clone().unwrap_or_default(),
    );

    let openai = config.openai_api_key.as_ref().map(|key| {
        OpenAiClient::new(
            config.openai_api_url.clone(),
            key.clone(),
            config.openai_model.clone(),
        )
    });
    if openai.is_none() {
        tracing::warn!("no generation backend configured; serving fallback answers only");
    }

    let assembler = ContextAssembler::new(MenuSchema::default());
    let chat = ChatService::new(airtable, openai, assembler);

    run_server(config, chat).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
