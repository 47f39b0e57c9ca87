//! Profile Ranker Module
//!
//! Matches scored assets against an investor profile: hard compatibility
//! rules, profile bonuses, stable ranking and an allocation suggestion.

pub mod allocation;
pub mod models;
pub mod ranker;


pub use allocation::{AllocationPlanner, AllocationPolicy};
pub use models::{
    AllocationSuggestion, FilterOutcome, FilterPolicy, RankedAsset, Rejection, RejectionReason,
    ScoreAdjustment,
};
pub use ranker::ProfileFilter;
