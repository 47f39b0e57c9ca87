//! Pre-engine normalization of provider data.

use analysis_core::{MetricsRecord, YieldAdvisory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldPolicy {
    /// Highest plausible annual yield; anything above is clamped
    pub cap: f64,
    /// Values above this are read as whole percentages (8 -> 0.08)
    pub percent_above: f64,
}

impl Default for YieldPolicy {
    fn default() -> Self {
        Self {
            cap: 0.30,
            percent_above: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedYield {
    pub value: f64,
    pub advisory: Option<YieldAdvisory>,
}

/// Express a reported dividend yield as a fraction within `[0, cap]`.
///
/// Idempotent: normalizing an already-normalized value returns it unchanged
/// and raises no advisory.
pub fn normalize_dividend_yield(reported: Option<f64>, policy: &YieldPolicy) -> NormalizedYield {
    let raw = match reported {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        Some(_) => {
            return NormalizedYield {
                value: 0.0,
                advisory: Some(YieldAdvisory::InvalidReported),
            }
        }
        None => {
            return NormalizedYield {
                value: 0.0,
                advisory: None,
            }
        }
    };

    let fraction = if raw > policy.percent_above { raw / 100.0 } else { raw };

    if fraction > policy.cap {
        NormalizedYield {
            value: policy.cap,
            advisory: Some(YieldAdvisory::ClampedToCap {
                reported: fraction,
                cap: policy.cap,
            }),
        }
    } else {
        NormalizedYield {
            value: fraction,
            advisory: None,
        }
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Normalize a provider record before it enters the engine: non-finite
/// numbers become 0 (unknown) and the dividend yield is normalized.
pub fn normalize_metrics(
    mut record: MetricsRecord,
    policy: &YieldPolicy,
) -> (MetricsRecord, Option<YieldAdvisory>) {
    record.price = finite_or_zero(record.price);
    record.price_to_earnings = finite_or_zero(record.price_to_earnings);
    record.price_to_book = finite_or_zero(record.price_to_book);
    record.return_on_equity = finite_or_zero(record.return_on_equity);
    record.free_cash_flow = finite_or_zero(record.free_cash_flow);
    record.payout_ratio = finite_or_zero(record.payout_ratio);
    record.debt_to_equity = finite_or_zero(record.debt_to_equity);
    record.net_margin = finite_or_zero(record.net_margin);
    record.beta = finite_or_zero(record.beta);
    record.dividend_growth_estimate = record.dividend_growth_estimate.filter(|g| g.is_finite());

    let normalized = normalize_dividend_yield(Some(record.dividend_yield), policy);
    record.dividend_yield = normalized.value;

    if let Some(advisory) = &normalized.advisory {
        tracing::warn!(symbol = %record.symbol, "{}", advisory.message());
    }

    (record, normalized.advisory)
}
