use std::env;

/// Process configuration read once from the environment at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub airtable_api_url: String,
    pub airtable_base_id: Option<String>,
    pub airtable_token: Option<String>,
    pub openai_api_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            airtable_api_url: env::var("AIRTABLE_API_URL")
                .unwrap_or_else(|_| "https://api.airtable.com/v0".to_string()),
            airtable_base_id: non_empty(env::var("AIRTABLE_BASE_ID").ok()),
            airtable_token: non_empty(env::var("AIRTABLE_TOKEN").ok()),
            openai_api_url: env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_api_key: non_empty(env::var("OPENAI_API_KEY").ok()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| default_cors_origins()),
        }
    }

    pub fn has_table_store(&self) -> bool {
        self.airtable_base_id.is_some() && self.airtable_token.is_some()
    }

    /// Without a backend key the service still runs, answering every request
    /// through the deterministic fallback responder.
    pub fn has_generation_backend(&self) -> bool {
        self.openai_api_key.is_some()
    }

    /// Names of required variables that are unset, for the startup log.
    pub fn missing_env(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.airtable_token.is_none() {
            missing.push("AIRTABLE_TOKEN");
        }
        if self.airtable_base_id.is_none() {
            missing.push("AIRTABLE_BASE_ID");
        }
        if self.openai_api_key.is_none() {
            missing.push("OPENAI_API_KEY");
        }
        missing
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_cors_origins() -> Vec<String> {
    [
        "https://konobamore.com",
        "https://www.konobamore.com",
        "http://localhost:3000",
        "http://localhost:5173",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
