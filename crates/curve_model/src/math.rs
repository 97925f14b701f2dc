//! Constant product curve math (x·y=k) on raw reserves
//!
//! Fee-free formulas. Rounding direction always favors the curve:
//! - Tokens out of a buy round down
//! - SOL into a buy rounds up (+1)
//! - SOL out of a sell rounds down

use num_traits::{One, Zero};

use crate::{Amount, CurveError, Result};

/// Divide rounding up: `(a + b - 1) / b`
///
/// `b` must be non-zero.
#[inline]
pub fn ceil_div(a: &Amount, b: &Amount) -> Amount {
    (a + b - Amount::one()) / b
}

/// Fee on `amount` at `fee_bps`, rounded up in favor of the recipient
#[inline]
pub fn fee_amount(amount: &Amount, fee_bps: &Amount) -> Amount {
    ceil_div(&(amount * fee_bps), &Amount::from(crate::BPS_DENOMINATOR))
}

/// Market cap in lamports: `virtual_sol * mint_supply / virtual_token`
///
/// # Errors
/// * `CurveError::DivisionByZero` if the curve has no virtual token reserves
pub fn bonding_curve_market_cap(
    mint_supply: &Amount,
    virtual_sol_reserves: &Amount,
    virtual_token_reserves: &Amount,
) -> Result<Amount> {
    if virtual_token_reserves.is_zero() {
        return Err(CurveError::DivisionByZero);
    }
    Ok(virtual_sol_reserves * mint_supply / virtual_token_reserves)
}

/// Tokens out for `input_amount` lamports already net of fees
///
/// Δy = Δx·y / (x + Δx)
pub fn buy_token_amount_quote(
    input_amount: &Amount,
    virtual_token_reserves: &Amount,
    virtual_sol_reserves: &Amount,
) -> Amount {
    let denominator = virtual_sol_reserves + input_amount;
    if denominator.is_zero() {
        return Amount::zero();
    }
    input_amount * virtual_token_reserves / denominator
}

/// Lamports needed (before fees) to take `token_amount` out of the curve
///
/// Δx = Δy·x / (y - Δy) + 1
///
/// Returns `None` when the request would drain every virtual token,
/// which only happens with real reserves at or above virtual reserves.
pub fn buy_sol_amount_quote(
    token_amount: &Amount,
    virtual_token_reserves: &Amount,
    virtual_sol_reserves: &Amount,
) -> Option<Amount> {
    if token_amount >= virtual_token_reserves {
        return None;
    }
    let remaining = virtual_token_reserves - token_amount;
    Some(token_amount * virtual_sol_reserves / remaining + Amount::one())
}

/// Lamports out (before fees) for selling `token_amount` into the curve
///
/// Δx = Δy·x / (y + Δy)
pub fn sell_sol_amount_quote(
    token_amount: &Amount,
    virtual_token_reserves: &Amount,
    virtual_sol_reserves: &Amount,
) -> Amount {
    let denominator = virtual_token_reserves + token_amount;
    if denominator.is_zero() {
        return Amount::zero();
    }
    token_amount * virtual_sol_reserves / denominator
}
