//! # Node Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! Sources, lowest precedence first: built-in defaults, an optional JSON
//! file, then `AC_*` environment variables. Every source is followed by
//! [`NodeConfig::validate`] before a node is built.

use ac_01_identity_registry::IdentityConfig;
use ac_02_condition_gateway::GatewayConfig;
use ac_03_custody_ledger::CustodyConfig;
use ac_04_marketplace::MarketConfig;
use ac_05_logistics::{LogisticsConfig, ShipmentStatus};
use ac_06_provenance::ProvenanceConfig;
use ac_07_object_references::ObjectConfig;
use serde::{Deserialize, Serialize};
use shared_bus::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_OUTBOX_RETENTION};
use shared_types::ActorId;
use std::str::FromStr;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub identity: IdentityConfig,
    pub conditions: GatewayConfig,
    pub custody: CustodyConfig,
    pub market: MarketConfig,
    pub logistics: LogisticsConfig,
    pub provenance: ProvenanceConfig,
    pub objects: ObjectConfig,
    pub events: EventBusConfig,
    pub logging: LoggingConfig,
}

/// Event bus sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBusConfig {
    /// Broadcast channel capacity per subscriber.
    pub capacity: usize,
    /// Events kept in the pull outbox.
    pub retention: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CHANNEL_CAPACITY,
            retention: DEFAULT_OUTBOX_RETENTION,
        }
    }
}

/// Log output settings for the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Print the event target in each line.
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            with_target: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    #[error("environment variable {var}='{value}' is invalid: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("malformed configuration file: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl NodeConfig {
    /// Parse a JSON document. Missing sections keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Apply `AC_*` overrides read through `lookup`.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `AC_BOOTSTRAP_ADMIN` | `identity.bootstrap_admin` |
    /// | `AC_PROVENANCE_MAX_ENTRIES` | `provenance.max_entries` |
    /// | `AC_MAX_OFFER_EXPIRY_SECS` | `market.max_expiry_secs` |
    /// | `AC_CONDITION_MAX_AGE_SECS` | `conditions.max_age_secs` |
    /// | `AC_UPLOAD_OPERATORS` | `objects.operators` (comma separated) |
    /// | `AC_EVENT_RETENTION` | `events.retention` |
    /// | `AC_LOG` | `logging.filter` |
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("AC_BOOTSTRAP_ADMIN") {
            self.identity.bootstrap_admin = parse_var("AC_BOOTSTRAP_ADMIN", &value)?;
        }
        if let Some(value) = lookup("AC_PROVENANCE_MAX_ENTRIES") {
            self.provenance.max_entries = parse_var("AC_PROVENANCE_MAX_ENTRIES", &value)?;
        }
        if let Some(value) = lookup("AC_MAX_OFFER_EXPIRY_SECS") {
            self.market.max_expiry_secs = parse_var("AC_MAX_OFFER_EXPIRY_SECS", &value)?;
        }
        if let Some(value) = lookup("AC_CONDITION_MAX_AGE_SECS") {
            self.conditions.max_age_secs = parse_var("AC_CONDITION_MAX_AGE_SECS", &value)?;
        }
        if let Some(value) = lookup("AC_UPLOAD_OPERATORS") {
            self.objects.operators = value
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| parse_var("AC_UPLOAD_OPERATORS", part))
                .collect::<Result<_, _>>()?;
        }
        if let Some(value) = lookup("AC_EVENT_RETENTION") {
            self.events.retention = parse_var("AC_EVENT_RETENTION", &value)?;
        }
        if let Some(value) = lookup("AC_LOG") {
            self.logging.filter = value;
        }
        Ok(())
    }

    /// Reject configurations a node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.bootstrap_admin.is_zero() {
            return Err(invalid("identity.bootstrap_admin", "must not be the zero address"));
        }
        if self.identity.max_field_len == 0 {
            return Err(invalid("identity.max_field_len", "must be positive"));
        }
        let alerts = &self.custody.alerts;
        if !(alerts.min_temperature < alerts.max_temperature) {
            return Err(invalid(
                "custody.alerts",
                "min_temperature must be below max_temperature",
            ));
        }
        if !(alerts.estimate_deviation_pct > 0.0 && alerts.feed_deviation_pct > 0.0) {
            return Err(invalid("custody.alerts", "deviation thresholds must be positive"));
        }
        if self.market.max_expiry_secs == 0 {
            return Err(invalid("market.max_expiry_secs", "must be positive"));
        }
        // One checkpoint per status at minimum.
        if self.logistics.max_checkpoints < ShipmentStatus::ALL.len() {
            return Err(invalid(
                "logistics.max_checkpoints",
                "must allow one checkpoint per status",
            ));
        }
        if self.provenance.max_entries == 0 {
            return Err(invalid("provenance.max_entries", "must be positive"));
        }
        if !(8..=32).contains(&self.provenance.token_code_bytes) {
            return Err(invalid("provenance.token_code_bytes", "must be between 8 and 32"));
        }
        if self.objects.operators.iter().any(ActorId::is_zero) {
            return Err(invalid("objects.operators", "must not contain the zero address"));
        }
        if self.events.capacity == 0 || self.events.retention == 0 {
            return Err(invalid("events", "capacity and retention must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|err: T::Err| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
        reason: err.to_string(),
    })
}
