//! Storefront API Config

use clap::Args;

/// Remote storefront API settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the storefront API
    #[arg(
        long = "api-url",
        env = "STOREFRONT_API_URL",
        default_value = "http://localhost:8000/api"
    )]
    pub base_url: String,

    /// Bearer token forwarded with every request
    #[arg(long = "api-token", env = "STOREFRONT_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long = "api-timeout-seconds",
        env = "STOREFRONT_API_TIMEOUT_SECONDS",
        default_value_t = 30_u64
    )]
    pub timeout_seconds: u64,
}
