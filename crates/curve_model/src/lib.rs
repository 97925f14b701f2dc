//! Curve Model - Exact bonding curve quoting and fee math
//!
//! This crate reproduces the launchpad program's constant product
//! bonding curve arithmetic bit-for-bit, using arbitrary-precision
//! integers throughout:
//! - Buy/sell quotes with fees added on top (buy) or taken out (sell)
//! - Tiered protocol/creator fee selection by market cap
//! - Price impact, graduation progress and curve summaries
//! - Volume based token incentive accrual
//!
//! Every function is pure. Inputs are borrowed, never mutated, and
//! degenerate states (zero amounts, migrated curves) quote as zero.

#![forbid(unsafe_code)]

pub mod state;
pub mod math;
pub mod fees;
pub mod quote;
pub mod analytics;
pub mod incentives;

pub use state::*;
pub use math::{bonding_curve_market_cap, ceil_div};
pub use fees::{
    calculate_fee_tier, compute_fees_bps, creator_fee_applies, fee_lookup_supply, get_fee,
    CalculatedFeesBps,
};
pub use quote::{
    get_buy_sol_amount_from_token_amount, get_buy_token_amount_from_sol_amount,
    get_sell_sol_amount_from_token_amount,
};
pub use analytics::*;
pub use incentives::{current_day_tokens, total_unclaimed_tokens};

pub use num_bigint::{BigInt, BigUint};
pub use solana_program::pubkey::Pubkey;

/// Arbitrary precision unsigned amount (lamports, raw token units, bps)
pub type Amount = BigUint;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Lamports per SOL, also the spot price scale
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// One whole token in raw units (6 decimals)
pub const ONE_TOKEN: u64 = 1_000_000;

/// Reference supply for fee tier lookups on non-mayhem curves
/// (one billion tokens at 6 decimals)
pub const ONE_BILLION_SUPPLY: u64 = 1_000_000_000_000_000;

/// Error types for curve math
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CurveError {
    /// Market cap requested on a curve with no virtual token reserves
    #[error("Division by zero: virtual token reserves cannot be zero")]
    DivisionByZero,
}

pub type Result<T> = core::result::Result<T, CurveError>;
