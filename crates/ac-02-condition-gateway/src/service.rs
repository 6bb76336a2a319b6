//! Condition Gateway Service

use crate::adapters::StaticFeed;
use crate::domain::{classify, evaluate, neutral_reading, GatewayConfig, SuitabilityThresholds};
use crate::ports::inbound::ConditionApi;
use crate::ports::outbound::ConditionProvider;
use parking_lot::{Mutex, RwLock};
use shared_types::{
    ConditionKind, ConditionReader, ConditionReading, ConditionSnapshot, ReadingSource, TimeSource,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Read-only façade over external condition feeds.
///
/// Never fails: missing providers, provider errors and non-finite values
/// all degrade to the neutral default with a warning. A kind with no
/// provider is warned about once until a provider is configured for it.
pub struct ConditionGateway {
    config: GatewayConfig,
    providers: RwLock<HashMap<ConditionKind, Arc<dyn ConditionProvider>>>,
    /// Unconfigured kinds already reported.
    unconfigured: Mutex<HashSet<ConditionKind>>,
    clock: Arc<dyn TimeSource>,
}

impl ConditionGateway {
    pub fn new(config: GatewayConfig, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            config,
            providers: RwLock::new(HashMap::new()),
            unconfigured: Mutex::new(HashSet::new()),
            clock,
        }
    }

    /// Build a gateway and serve `config.static_values` from a [`StaticFeed`].
    pub fn from_config(config: GatewayConfig, clock: Arc<dyn TimeSource>) -> Self {
        let gateway = Self::new(config, clock.clone());
        if !gateway.config.static_values.is_empty() {
            let feed = StaticFeed::new(gateway.config.static_values.clone(), clock);
            let kinds = feed.kinds();
            gateway.set_provider_for(&kinds, Arc::new(feed));
        }
        gateway
    }

    /// Route `kind` to `provider`, replacing any previous one.
    pub fn set_provider(&self, kind: ConditionKind, provider: Arc<dyn ConditionProvider>) {
        debug!(kind = %kind, provider = provider.name(), "Condition provider configured");
        self.providers.write().insert(kind, provider);
        self.unconfigured.lock().remove(&kind);
    }

    /// Route every kind in `kinds` to `provider`.
    pub fn set_provider_for(&self, kinds: &[ConditionKind], provider: Arc<dyn ConditionProvider>) {
        for &kind in kinds {
            self.set_provider(kind, provider.clone());
        }
    }

    pub fn remove_provider(&self, kind: ConditionKind) {
        self.providers.write().remove(&kind);
    }

    fn first_unconfigured_read(&self, kind: ConditionKind) -> bool {
        self.unconfigured.lock().insert(kind)
    }

    fn read_at(&self, kind: ConditionKind, now: u64) -> ConditionReading {
        let provider = self.providers.read().get(&kind).cloned();
        let Some(provider) = provider else {
            if self.first_unconfigured_read(kind) {
                warn!(kind = %kind, "No provider configured, using neutral default");
            } else {
                debug!(kind = %kind, "No provider configured");
            }
            return neutral_reading(kind, now);
        };

        match provider.get_latest(kind) {
            Ok((value, as_of)) if value.is_finite() => ConditionReading {
                kind,
                value,
                as_of,
                source: ReadingSource::Live,
                staleness: classify(as_of, now, self.config.max_age_for(kind)),
            },
            Ok((value, _)) => {
                warn!(
                    kind = %kind,
                    provider = provider.name(),
                    value,
                    "Provider returned non-finite value, using neutral default"
                );
                neutral_reading(kind, now)
            }
            Err(err) => {
                warn!(
                    kind = %kind,
                    provider = provider.name(),
                    error = %err,
                    "Provider failed, using neutral default"
                );
                neutral_reading(kind, now)
            }
        }
    }
}

impl ConditionApi for ConditionGateway {
    fn reading(&self, kind: ConditionKind) -> ConditionReading {
        self.read_at(kind, self.clock.now())
    }

    fn snapshot(&self) -> ConditionSnapshot {
        let now = self.clock.now();
        ConditionSnapshot {
            taken_at: now,
            readings: ConditionKind::ALL
                .into_iter()
                .map(|kind| self.read_at(kind, now))
                .collect(),
        }
    }

    fn is_suitable_for(&self, good_kind: &str, thresholds: &SuitabilityThresholds) -> bool {
        let suitable = evaluate(&ConditionApi::snapshot(self), thresholds);
        debug!(good_kind, suitable, "Suitability evaluated");
        suitable
    }

    fn configured_kinds(&self) -> Vec<ConditionKind> {
        let providers = self.providers.read();
        ConditionKind::ALL
            .into_iter()
            .filter(|kind| providers.contains_key(kind))
            .collect()
    }
}

impl ConditionReader for ConditionGateway {
    fn snapshot(&self) -> ConditionSnapshot {
        ConditionApi::snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ManualFeed;
    use crate::domain::ProviderError;
    use shared_types::{ManualClock, Staleness, Timestamp};

    struct BrokenFeed;

    impl ConditionProvider for BrokenFeed {
        fn name(&self) -> &str {
            "broken"
        }

        fn get_latest(&self, _kind: ConditionKind) -> Result<(f64, Timestamp), ProviderError> {
            Err(ProviderError::Unreachable {
                reason: "connection refused".into(),
            })
        }
    }

    fn gateway() -> (ConditionGateway, Arc<ManualFeed>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(10_000));
        let gateway = ConditionGateway::new(GatewayConfig::default(), clock.clone());
        let feed = Arc::new(ManualFeed::new());
        gateway.set_provider_for(&ConditionKind::ALL, feed.clone());
        (gateway, feed, clock)
    }

    #[test]
    fn test_unconfigured_defaults() {
        let gateway = ConditionGateway::new(GatewayConfig::default(), Arc::new(ManualClock::new(5)));
        let snapshot = ConditionApi::snapshot(&gateway);
        assert_eq!(snapshot.readings.len(), ConditionKind::ALL.len());
        assert_eq!(snapshot.value(ConditionKind::Temperature), Some(20.0));
        assert_eq!(snapshot.value(ConditionKind::Humidity), Some(50.0));
        assert!(snapshot
            .readings
            .iter()
            .all(|r| r.source == ReadingSource::NeutralDefault));
        assert!(gateway.configured_kinds().is_empty());
    }

    #[test]
    fn test_unconfigured_kind_reported_once() {
        let gateway = ConditionGateway::new(GatewayConfig::default(), Arc::new(ManualClock::new(5)));
        ConditionApi::snapshot(&gateway);
        ConditionApi::snapshot(&gateway);
        assert_eq!(gateway.unconfigured.lock().len(), ConditionKind::ALL.len());
        assert!(!gateway.first_unconfigured_read(ConditionKind::Rainfall));

        // Configuring then removing a provider re-arms the warning.
        gateway.set_provider(ConditionKind::Rainfall, Arc::new(ManualFeed::new()));
        gateway.remove_provider(ConditionKind::Rainfall);
        assert!(gateway.first_unconfigured_read(ConditionKind::Rainfall));
        assert_eq!(
            gateway.reading(ConditionKind::Rainfall).source,
            ReadingSource::NeutralDefault
        );
    }

    #[test]
    fn test_live_and_stale_readings() {
        let (gateway, feed, clock) = gateway();
        feed.push(ConditionKind::Temperature, 4.5, 10_000);

        let fresh = gateway.reading(ConditionKind::Temperature);
        assert_eq!(fresh.value, 4.5);
        assert!(fresh.is_fresh_live());

        clock.advance(7_200);
        let stale = gateway.reading(ConditionKind::Temperature);
        assert_eq!(stale.source, ReadingSource::Live);
        assert_eq!(stale.staleness, Staleness::Stale { age_secs: 7_200 });
    }

    #[test]
    fn test_provider_errors_degrade() {
        let (gateway, feed, _) = gateway();
        // Pushed nothing for humidity.
        let humidity = gateway.reading(ConditionKind::Humidity);
        assert_eq!(humidity.value, 50.0);
        assert_eq!(humidity.staleness, Staleness::Unavailable);

        feed.push(ConditionKind::WindSpeed, f64::NAN, 10_000);
        assert_eq!(gateway.reading(ConditionKind::WindSpeed).value, 0.0);

        gateway.set_provider(ConditionKind::Rainfall, Arc::new(BrokenFeed));
        let rain = gateway.reading(ConditionKind::Rainfall);
        assert_eq!(rain.source, ReadingSource::NeutralDefault);
    }

    #[test]
    fn test_suitability_uses_current_readings() {
        let (gateway, feed, _) = gateway();
        let thresholds = SuitabilityThresholds {
            min_temperature: 2.0,
            max_temperature: 8.0,
            min_humidity: 30.0,
            max_humidity: 90.0,
            max_rainfall: 10.0,
        };
        // Neutral 20 °C is outside a cold-chain band.
        assert!(!gateway.is_suitable_for("dairy", &thresholds));

        feed.push(ConditionKind::Temperature, 5.0, 10_000);
        assert!(gateway.is_suitable_for("dairy", &thresholds));
    }

    #[test]
    fn test_from_config_installs_static_feed() {
        let mut config = GatewayConfig::default();
        config.static_values.insert(ConditionKind::Temperature, 12.0);
        let gateway = ConditionGateway::from_config(config, Arc::new(ManualClock::new(1)));
        assert_eq!(gateway.configured_kinds(), vec![ConditionKind::Temperature]);
        assert!(gateway.reading(ConditionKind::Temperature).is_fresh_live());
    }

    #[test]
    fn test_remove_provider() {
        let (gateway, feed, _) = gateway();
        feed.push(ConditionKind::MarketPrice, 99.0, 10_000);
        gateway.remove_provider(ConditionKind::MarketPrice);
        assert_eq!(gateway.reading(ConditionKind::MarketPrice).value, 0.0);
        assert_eq!(gateway.configured_kinds().len(), ConditionKind::ALL.len() - 1);
    }
}
