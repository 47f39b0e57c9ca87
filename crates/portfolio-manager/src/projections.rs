//! Deterministic income projections. Pure arithmetic, no forecasting.
use analysis_core::{EngineError, MetricsRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeScenario {
    pub name: String,
    pub dividend_yield: f64,
    pub annual_income: f64,
    pub monthly_income: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeScenarios {
    pub shares: u64,
    pub invested_capital: f64,
    pub conservative: IncomeScenario,
    pub realistic: IncomeScenario,
    pub optimistic: IncomeScenario,
}

/// Income on `capital` with the current yield scaled by 0.8, 1.0 and 1.2.
/// `None` when the asset has no price.
pub fn income_scenarios(metrics: &MetricsRecord, capital: f64) -> Option<IncomeScenarios> {
    if metrics.price <= 0.0 {
        return None;
    }
    let shares = (capital.max(0.0) / metrics.price).floor() as u64;
    let invested_capital = shares as f64 * metrics.price;

    let scenario = |name: &str, factor: f64| {
        let dividend_yield = metrics.dividend_yield * factor;
        let annual_income = invested_capital * dividend_yield;
        IncomeScenario {
            name: name.to_string(),
            dividend_yield,
            annual_income,
            monthly_income: annual_income / 12.0,
        }
    };

    Some(IncomeScenarios {
        shares,
        invested_capital,
        conservative: scenario("conservative", 0.8),
        realistic: scenario("realistic", 1.0),
        optimistic: scenario("optimistic", 1.2),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinvestmentYear {
    pub year: u32,
    /// Principal plus dividends taken as cash
    pub value_withdrawn: f64,
    /// Principal with dividends compounded
    pub value_reinvested: f64,
    pub cumulative_dividends: f64,
    pub difference: f64,
}

pub fn simulate_reinvestment(initial: f64, annual_yield: f64, years: u32) -> Vec<ReinvestmentYear> {
    let mut rows = Vec::with_capacity(years as usize);
    let mut cumulative_dividends = 0.0;
    let mut value_reinvested = initial;

    for year in 1..=years {
        cumulative_dividends += initial * annual_yield;
        value_reinvested += value_reinvested * annual_yield;
        let value_withdrawn = initial + cumulative_dividends;
        rows.push(ReinvestmentYear {
            year,
            value_withdrawn,
            value_reinvested,
            cumulative_dividends,
            difference: value_reinvested - value_withdrawn,
        });
    }

    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthAssumption {
    pub price_growth: f64,
    pub dividend_growth: f64,
}

pub const GROWTH_SCENARIOS: [(&str, GrowthAssumption); 3] = [
    (
        "conservative",
        GrowthAssumption {
            price_growth: 0.05,
            dividend_growth: 0.02,
        },
    ),
    (
        "realistic",
        GrowthAssumption {
            price_growth: 0.08,
            dividend_growth: 0.05,
        },
    ),
    (
        "optimistic",
        GrowthAssumption {
            price_growth: 0.12,
            dividend_growth: 0.08,
        },
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthYear {
    pub year: u32,
    pub shares: u64,
    pub price: f64,
    pub dividends_received: f64,
    pub portfolio_value: f64,
    pub annual_income: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthScenario {
    pub name: String,
    pub assumption: GrowthAssumption,
    pub final_value: f64,
    pub final_annual_income: f64,
    /// (final value - invested) / invested
    pub total_return: f64,
    pub history: Vec<GrowthYear>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthSimulation {
    pub symbol: String,
    pub initial_shares: u64,
    pub invested_capital: f64,
    pub scenarios: Vec<GrowthScenario>,
}

/// Buy whole shares, then each year grow price and yield and reinvest the
/// dividends in whole shares. `None` when no share can be bought.
pub fn simulate_growth(
    metrics: &MetricsRecord,
    capital: f64,
    years: u32,
) -> Option<GrowthSimulation> {
    if metrics.price <= 0.0 {
        return None;
    }
    let initial_shares = (capital.max(0.0) / metrics.price).floor() as u64;
    if initial_shares == 0 {
        return None;
    }
    let invested_capital = initial_shares as f64 * metrics.price;

    let scenarios = GROWTH_SCENARIOS
        .iter()
        .map(|(name, assumption)| {
            let mut shares = initial_shares;
            let mut price = metrics.price;
            let mut dividend_yield = metrics.dividend_yield;
            let mut history = Vec::with_capacity(years as usize);

            for year in 1..=years {
                price *= 1.0 + assumption.price_growth;
                dividend_yield *= 1.0 + assumption.dividend_growth;
                let dividends_received = shares as f64 * price * dividend_yield;
                shares += (dividends_received / price).floor() as u64;
                history.push(GrowthYear {
                    year,
                    shares,
                    price,
                    dividends_received,
                    portfolio_value: shares as f64 * price,
                    annual_income: shares as f64 * price * dividend_yield,
                });
            }

            let final_value = shares as f64 * price;
            GrowthScenario {
                name: name.to_string(),
                assumption: *assumption,
                final_value,
                final_annual_income: final_value * dividend_yield,
                total_return: (final_value - invested_capital) / invested_capital,
                history,
            }
        })
        .collect();

    Some(GrowthSimulation {
        symbol: metrics.symbol.clone(),
        initial_shares,
        invested_capital,
        scenarios,
    })
}

/// Capital that yields `monthly_income` per month at `average_yield`
pub fn capital_for_target_income(monthly_income: f64, average_yield: f64) -> Option<f64> {
    if average_yield <= 0.0 {
        return None;
    }
    Some(monthly_income * 12.0 / average_yield)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionPlan {
    pub goal: f64,
    pub current_capital: f64,
    pub months: u32,
    pub monthly_rate: f64,
    /// What the current capital grows to on its own
    pub future_value_of_current: f64,
    pub remaining_gap: f64,
    pub monthly_contribution: f64,
    pub total_contributions: f64,
}

/// Monthly deposit that closes the gap between `current` (compounded) and
/// `goal` in `months`, from the annuity future-value formula.
pub fn monthly_contribution(
    goal: f64,
    current: f64,
    months: u32,
    monthly_rate: f64,
) -> Result<ContributionPlan, EngineError> {
    if months == 0 {
        return Err(EngineError::InvalidInput(
            "contribution horizon must be at least one month".to_string(),
        ));
    }
    if !monthly_rate.is_finite() || monthly_rate <= -1.0 {
        return Err(EngineError::InvalidInput(format!(
            "monthly rate must be greater than -100%, got {}",
            monthly_rate
        )));
    }

    let n = months as f64;
    let growth = (1.0 + monthly_rate).powf(n);
    let future_value_of_current = current * growth;
    let remaining_gap = goal - future_value_of_current;

    let monthly = if remaining_gap <= 0.0 {
        0.0
    } else if monthly_rate == 0.0 {
        remaining_gap / n
    } else {
        remaining_gap / ((growth - 1.0) / monthly_rate)
    };

    Ok(ContributionPlan {
        goal,
        current_capital: current,
        months,
        monthly_rate,
        future_value_of_current,
        remaining_gap,
        monthly_contribution: monthly,
        total_contributions: monthly * n,
    })
}
