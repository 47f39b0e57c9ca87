pub mod alerts;
pub mod models;
pub mod portfolio;
pub mod projections;

pub use alerts::PortfolioAdvisory;
pub use models::*;
pub use portfolio::PortfolioAggregator;
pub use projections::{
    capital_for_target_income, income_scenarios, monthly_contribution, simulate_growth,
    simulate_reinvestment, ContributionPlan, GrowthScenario, GrowthSimulation, IncomeScenarios,
    ReinvestmentYear,
};
