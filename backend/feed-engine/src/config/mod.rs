use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// Environment prefix for every feed-engine setting (`FEED_AD_INTERVAL`, ...)
pub const ENV_PREFIX: &str = "FEED_";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_page_size")]
    pub posts_page_size: usize,
    #[serde(default = "default_page_size")]
    pub reels_page_size: usize,
    #[serde(default = "default_ad_interval")]
    pub ad_interval: usize,
    #[serde(default = "default_true")]
    pub enable_ads: bool,
    #[serde(default)]
    pub derive_reels: bool,
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,
    #[serde(default = "default_engagement_weight")]
    pub engagement_weight: f64,
    #[serde(default = "default_interest_weight")]
    pub interest_weight: f64,
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    #[serde(default)]
    pub posts_source_url: Option<String>,
    #[serde(default)]
    pub reels_source_url: Option<String>,
    #[serde(default = "default_ad_image_url")]
    pub ad_image_url: String,
    #[serde(default)]
    pub ad_click_url: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            posts_page_size: default_page_size(),
            reels_page_size: default_page_size(),
            ad_interval: default_ad_interval(),
            enable_ads: true,
            derive_reels: false,
            recency_weight: default_recency_weight(),
            engagement_weight: default_engagement_weight(),
            interest_weight: default_interest_weight(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            posts_source_url: None,
            reels_source_url: None,
            ad_image_url: default_ad_image_url(),
            ad_click_url: None,
        }
    }
}

impl FeedConfig {
    /// Load from `FEED_*` environment variables, reading `.env` first if present
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load from an explicit set of key/value pairs (keys carry the `FEED_` prefix)
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: FeedConfig = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.posts_page_size == 0 || self.reels_page_size == 0 {
            return Err(ConfigError::Invalid(
                "page sizes must be greater than zero".to_string(),
            ));
        }
        if self.ad_interval == 0 {
            return Err(ConfigError::Invalid(
                "ad_interval must be a positive integer".to_string(),
            ));
        }
        for (name, weight) in [
            ("recency_weight", self.recency_weight),
            ("engagement_weight", self.engagement_weight),
            ("interest_weight", self.interest_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

fn default_page_size() -> usize {
    10
}

fn default_ad_interval() -> usize {
    7
}

fn default_true() -> bool {
    true
}

fn default_recency_weight() -> f64 {
    0.4
}

fn default_engagement_weight() -> f64 {
    0.4
}

fn default_interest_weight() -> f64 {
    0.2
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_ad_image_url() -> String {
    "https://ads.nova.dev/creative/default.png".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = FeedConfig::from_vars(Vec::new()).unwrap();
        assert_eq!(config, FeedConfig::default());
        assert_eq!(config.ad_interval, 7);
        assert!(config.enable_ads);
        assert!(!config.derive_reels);
    }

    #[test]
    fn test_prefixed_overrides() {
        let config = FeedConfig::from_vars(vars(&[
            ("FEED_AD_INTERVAL", "5"),
            ("FEED_ENABLE_ADS", "false"),
            ("FEED_DERIVE_REELS", "true"),
            ("FEED_POSTS_PAGE_SIZE", "25"),
            ("FEED_POSTS_SOURCE_URL", "http://localhost:9002/posts"),
            ("AD_INTERVAL", "99"),
        ]))
        .unwrap();

        assert_eq!(config.ad_interval, 5);
        assert!(!config.enable_ads);
        assert!(config.derive_reels);
        assert_eq!(config.posts_page_size, 25);
        assert_eq!(config.reels_page_size, 10);
        assert_eq!(
            config.posts_source_url.as_deref(),
            Some("http://localhost:9002/posts")
        );
    }

    #[test]
    fn test_zero_ad_interval_rejected() {
        let err = FeedConfig::from_vars(vars(&[("FEED_AD_INTERVAL", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = FeedConfig::from_vars(vars(&[("FEED_INTEREST_WEIGHT", "-0.1")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_value_is_env_error() {
        let err = FeedConfig::from_vars(vars(&[("FEED_AD_INTERVAL", "seven")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env(_)));
    }
}
