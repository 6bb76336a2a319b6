//! # Stage Alerts
//!
//! Pure evaluation of a condition snapshot and price estimate against the
//! configured thresholds. Neutral defaults never raise a condition alert:
//! only live readings are compared.

use crate::domain::config::AlertThresholds;
use serde::{Deserialize, Serialize};
use shared_types::{ConditionKind, ConditionSnapshot, ReadingSource, Staleness};
use std::fmt;

/// Metadata attached to a stage record when a threshold is crossed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Alert {
    TemperatureOutOfBand { value: f64, min: f64, max: f64 },
    /// Estimate moved more than allowed since the previous stage.
    EstimateDeviation {
        previous: f64,
        current: f64,
        deviation_pct: f64,
    },
    /// Estimate is too far from the live market price.
    FeedDeviation {
        market: f64,
        estimate: f64,
        deviation_pct: f64,
    },
    StaleReading { kind: ConditionKind, age_secs: u64 },
}

impl Alert {
    pub fn code(&self) -> &'static str {
        match self {
            Alert::TemperatureOutOfBand { .. } => "temperature_out_of_band",
            Alert::EstimateDeviation { .. } => "estimate_deviation",
            Alert::FeedDeviation { .. } => "feed_deviation",
            Alert::StaleReading { .. } => "stale_reading",
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::TemperatureOutOfBand { value, min, max } => {
                write!(f, "temperature {value} outside [{min}, {max}]")
            }
            Alert::EstimateDeviation {
                previous,
                current,
                deviation_pct,
            } => write!(f, "estimate {current} deviates {deviation_pct:.1}% from {previous}"),
            Alert::FeedDeviation {
                market,
                estimate,
                deviation_pct,
            } => write!(f, "estimate {estimate} deviates {deviation_pct:.1}% from market {market}"),
            Alert::StaleReading { kind, age_secs } => write!(f, "{kind} reading is {age_secs}s old"),
        }
    }
}

/// Absolute deviation of `value` from `reference`, in percent.
///
/// `None` when the reference is zero or not finite.
pub fn deviation_pct(reference: f64, value: f64) -> Option<f64> {
    if reference == 0.0 || !reference.is_finite() || !value.is_finite() {
        return None;
    }
    Some((value - reference).abs() * 100.0 / reference.abs())
}

/// Every alert raised by recording `estimate` under `snapshot`.
pub fn evaluate_alerts(
    snapshot: &ConditionSnapshot,
    estimate: Option<f64>,
    previous_estimate: Option<f64>,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for reading in snapshot
        .readings
        .iter()
        .filter(|r| r.source == ReadingSource::Live)
    {
        if let Staleness::Stale { age_secs } = reading.staleness {
            alerts.push(Alert::StaleReading {
                kind: reading.kind,
                age_secs,
            });
        }
    }

    if let Some(temp) = snapshot
        .get(ConditionKind::Temperature)
        .filter(|r| r.source == ReadingSource::Live)
    {
        if temp.value < thresholds.min_temperature || temp.value > thresholds.max_temperature {
            alerts.push(Alert::TemperatureOutOfBand {
                value: temp.value,
                min: thresholds.min_temperature,
                max: thresholds.max_temperature,
            });
        }
    }

    let Some(estimate) = estimate else {
        return alerts;
    };

    if let Some(previous) = previous_estimate {
        if let Some(pct) = deviation_pct(previous, estimate) {
            if pct > thresholds.estimate_deviation_pct {
                alerts.push(Alert::EstimateDeviation {
                    previous,
                    current: estimate,
                    deviation_pct: pct,
                });
            }
        }
    }

    if let Some(market) = snapshot
        .get(ConditionKind::MarketPrice)
        .filter(|r| r.source == ReadingSource::Live)
    {
        if let Some(pct) = deviation_pct(market.value, estimate) {
            if pct > thresholds.feed_deviation_pct {
                alerts.push(Alert::FeedDeviation {
                    market: market.value,
                    estimate,
                    deviation_pct: pct,
                });
            }
        }
    }

    alerts
}
