use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Content store (hosted backend)
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub storage_bucket: String,

    // Realtime
    pub webhook_secret: Option<String>,
    pub change_feed_capacity: usize,

    // Localization
    pub native_language_code: String,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Content store
            supabase_url: std::env::var("SUPABASE_URL")
                .context("SUPABASE_URL not set")?
                .trim_end_matches('/')
                .to_string(),
            supabase_anon_key: std::env::var("SUPABASE_ANON_KEY")
                .context("SUPABASE_ANON_KEY not set")?,
            storage_bucket: std::env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "images".to_string()),

            // Realtime - webhook endpoint stays disabled without a secret
            webhook_secret: std::env::var("WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            change_feed_capacity: std::env::var("CHANGE_FEED_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(100),

            // Localization
            native_language_code: std::env::var("NATIVE_LANGUAGE_CODE")
                .unwrap_or_else(|_| "hy".to_string()),

            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }
}
