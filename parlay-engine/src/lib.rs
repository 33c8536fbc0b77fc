//! Wagering normalization and settlement engine.
//!
//! Pure, synchronous building blocks for a personal wager tracker: odds
//! conversion, boosted payouts, legacy record normalization, schema
//! validation and parlay aggregation of flat leg rows.

pub mod aggregate;
pub mod batch;
pub mod clock;
pub mod config;
pub mod error;
pub mod normalize;
pub mod odds;
pub mod payout;
pub mod stats;
pub mod types;
pub mod validate;

pub use aggregate::{aggregate, ParlayAggregator};
pub use batch::{normalize_batch, BatchOutcome, RecordFailure};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use error::{ValidationFailure, Violation, WagerError};
pub use normalize::{normalize_wager, NormalizedWager};
pub use odds::{
    american_to_decimal, american_to_probability, combine_parlay_odds, decimal_to_american,
};
pub use payout::{get_payout, Payout, PayoutInput, PayoutLabel};
pub use stats::PerformanceSummary;
pub use types::{BetStatus, Leg, Wager, WagerKind};
pub use validate::{validate, validate_wager};
