use std::path::PathBuf;

use fadecast_core::MinorUnits;

/// Server configuration loaded from environment variables.
///
/// All fields except the API keys have sensible defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`).
    ///
    /// Covers the whole preview request, including both upstream model calls.
    pub request_timeout_secs: u64,
    /// Fee charged per preview, in minor currency units (default: `299`).
    pub payment_amount_minor: MinorUnits,
    /// ISO currency code for the fee (default: `gbp`).
    pub payment_currency: String,
    /// Payment gateway mode: `live` or `simulated` (default: `live`).
    pub gateway_mode: String,
    /// Stripe secret key. Required when `gateway_mode` is `live`.
    pub stripe_secret_key: Option<String>,
    /// Base URL of the Stripe API (default: `https://api.stripe.com`).
    pub stripe_api_base: String,
    /// Timeout for gateway calls in seconds (default: `30`).
    pub gateway_timeout_secs: u64,
    /// OpenAI API key. Always required: previews are generated even when
    /// payments run simulated.
    pub openai_api_key: String,
    /// Base URL of the OpenAI API (default: `https://api.openai.com/v1`).
    pub openai_api_base: String,
    /// Timeout for OpenAI calls in seconds (default: `120`).
    pub openai_timeout_secs: u64,
    /// Model used to describe the uploaded tattoo (default: `gpt-4o`).
    pub vision_model: String,
    /// Model used to synthesize the aged preview (default: `dall-e-3`).
    pub image_model: String,
    /// Directory where uploads are persisted (default: `public/uploads`).
    pub upload_dir: PathBuf,
    /// Minutes an unredeemed processing credential stays valid (default: `60`).
    pub credential_ttl_mins: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                      |
    /// |------------------------|------------------------------|
    /// | `HOST`                 | `0.0.0.0`                    |
    /// | `PORT`                 | `3000`                       |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`      |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                        |
    /// | `PAYMENT_AMOUNT_MINOR` | `299`                        |
    /// | `PAYMENT_CURRENCY`     | `gbp`                        |
    /// | `GATEWAY_MODE`         | `live`                       |
    /// | `STRIPE_SECRET_KEY`    | unset                        |
    /// | `STRIPE_API_BASE`      | `https://api.stripe.com`     |
    /// | `GATEWAY_TIMEOUT_SECS` | `30`                         |
    /// | `OPENAI_API_KEY`       | required                     |
    /// | `OPENAI_API_BASE`      | `https://api.openai.com/v1`  |
    /// | `OPENAI_TIMEOUT_SECS`  | `120`                        |
    /// | `VISION_MODEL`         | `gpt-4o`                     |
    /// | `IMAGE_MODEL`          | `dall-e-3`                   |
    /// | `UPLOAD_DIR`           | `public/uploads`             |
    /// | `CREDENTIAL_TTL_MINS`  | `60`                         |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let payment_amount_minor: MinorUnits = std::env::var("PAYMENT_AMOUNT_MINOR")
            .unwrap_or_else(|_| "299".into())
            .parse()
            .expect("PAYMENT_AMOUNT_MINOR must be a valid integer");

        let payment_currency = std::env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "gbp".into());

        let gateway_mode = std::env::var("GATEWAY_MODE").unwrap_or_else(|_| "live".into());

        let stripe_secret_key = std::env::var("STRIPE_SECRET_KEY").ok();

        let stripe_api_base =
            std::env::var("STRIPE_API_BASE").unwrap_or_else(|_| "https://api.stripe.com".into());

        let gateway_timeout_secs: u64 = std::env::var("GATEWAY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("GATEWAY_TIMEOUT_SECS must be a valid u64");

        let openai_api_key =
            std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set");

        let openai_api_base = std::env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into());

        let openai_timeout_secs: u64 = std::env::var("OPENAI_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("OPENAI_TIMEOUT_SECS must be a valid u64");

        let vision_model = std::env::var("VISION_MODEL").unwrap_or_else(|_| "gpt-4o".into());

        let image_model = std::env::var("IMAGE_MODEL").unwrap_or_else(|_| "dall-e-3".into());

        let upload_dir: PathBuf = std::env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "public/uploads".into())
            .into();

        let credential_ttl_mins: i64 = std::env::var("CREDENTIAL_TTL_MINS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("CREDENTIAL_TTL_MINS must be a valid integer");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            payment_amount_minor,
            payment_currency,
            gateway_mode,
            stripe_secret_key,
            stripe_api_base,
            gateway_timeout_secs,
            openai_api_key,
            openai_api_base,
            openai_timeout_secs,
            vision_model,
            image_model,
            upload_dir,
            credential_ttl_mins,
        }
    }
}
