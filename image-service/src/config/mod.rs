use service_core::config as core_config;
use service_core::config::{get_env, Environment};
use service_core::error::AppError;

const DEFAULT_BASE_URL: &str =
    "https://assets.rs-online.com/c_scale,w_200,f_auto,q_auto,d_no_image.png";

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub common: core_config::Config,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// CDN URL prefix; the part number plus `.jpg` is appended as the path.
    pub base_url: String,
    /// Per-request timeout for upstream fetches.
    pub timeout_secs: u64,
    /// Bodies smaller than this are treated as the upstream's "no image"
    /// placeholder, which it serves with HTTP 200 instead of a 404.
    pub min_image_bytes: usize,
    /// Maximum batch size accepted per request.
    pub max_part_numbers: usize,
}

impl ImageConfig {
    pub fn load() -> Result<Self, AppError> {
        // Loads .env and APP__-prefixed overrides for the common settings.
        let common = core_config::Config::load()?;
        let is_prod = Environment::current().is_prod();

        Ok(ImageConfig {
            common,
            upstream: UpstreamConfig {
                base_url: get_env("UPSTREAM_BASE_URL", Some(DEFAULT_BASE_URL), is_prod)?,
                timeout_secs: parse_env("UPSTREAM_TIMEOUT_SECS", "10", is_prod)?,
                min_image_bytes: parse_env("UPSTREAM_MIN_IMAGE_BYTES", "1000", is_prod)?,
                max_part_numbers: parse_env("MAX_PART_NUMBERS", "6", is_prod)?,
            },
        })
    }
}

fn parse_env<T>(key: &str, default: &str, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env(key, Some(default), is_prod)?.parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {}", key, e))
    })
}
