//! Configuration for the marketplace.

use serde::{Deserialize, Serialize};

/// Marketplace configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Longest allowed offer lifetime, in seconds.
    pub max_expiry_secs: u64,
    /// Open offers one actor may have at a time.
    pub max_open_offers_per_actor: usize,
    pub max_terms_len: usize,
    pub max_tag_len: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            max_expiry_secs: 30 * 24 * 3600,
            max_open_offers_per_actor: 64,
            max_terms_len: 1024,
            max_tag_len: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MarketConfig::default();
        assert_eq!(config.max_expiry_secs, 2_592_000);
        assert_eq!(config.max_open_offers_per_actor, 64);
    }

    #[test]
    fn test_config_from_json() {
        let config: MarketConfig = serde_json::from_str(r#"{"max_open_offers_per_actor": 2}"#).unwrap();
        assert_eq!(config.max_open_offers_per_actor, 2);
        assert_eq!(config.max_tag_len, 64);
    }
}
