//! Buy and sell quotes against a bonding curve, fees included
//!
//! Buys add the fee on top of what the payer sends; sells take it out
//! of what the seller receives. A zero amount or a migrated curve
//! quotes as zero.

use num_traits::{One, Zero};

use crate::fees::{compute_fees_bps, creator_fee_applies, get_fee};
use crate::math::{buy_sol_amount_quote, buy_token_amount_quote, sell_sol_amount_quote};
use crate::{Amount, BondingCurve, CurveState, FeeConfig, Global, Result, BPS_DENOMINATOR};

/// Tokens received for spending `sol_amount` lamports, fees included.
///
/// The fee is backed out of `sol_amount` first:
/// `input = (sol_amount - 1) * 10_000 / (total_fee_bps + 10_000)`,
/// then the constant product formula runs on `input`. The result never
/// exceeds the curve's real token reserves.
pub fn get_buy_token_amount_from_sol_amount(
    global: &Global,
    fee_config: Option<&FeeConfig>,
    state: CurveState<'_>,
    sol_amount: &Amount,
) -> Result<Amount> {
    if sol_amount.is_zero() {
        return Ok(Amount::zero());
    }

    let resolved = state.resolve(global);
    let curve = resolved.curve.as_ref();

    if curve.is_migrated() {
        log::trace!("curve migrated, buy quote is zero");
        return Ok(Amount::zero());
    }

    let fees = compute_fees_bps(
        global,
        fee_config,
        &resolved.mint_supply,
        &curve.virtual_sol_reserves,
        &curve.virtual_token_reserves,
    )?;
    let total_fee_bps =
        fees.total_bps(creator_fee_applies(curve, resolved.is_new_bonding_curve));

    let bps = Amount::from(BPS_DENOMINATOR);
    let input_amount = (sol_amount - Amount::one()) * &bps / (total_fee_bps + &bps);

    let tokens_received = buy_token_amount_quote(
        &input_amount,
        &curve.virtual_token_reserves,
        &curve.virtual_sol_reserves,
    );

    Ok(tokens_received.min(curve.real_token_reserves.clone()))
}

/// Lamports the payer must send to receive `token_amount` tokens, fees included.
///
/// Requests above the real token reserves are clamped to what remains.
pub fn get_buy_sol_amount_from_token_amount(
    global: &Global,
    fee_config: Option<&FeeConfig>,
    state: CurveState<'_>,
    token_amount: &Amount,
) -> Result<Amount> {
    if token_amount.is_zero() {
        return Ok(Amount::zero());
    }

    let resolved = state.resolve(global);
    let curve = resolved.curve.as_ref();

    if curve.is_migrated() {
        log::trace!("curve migrated, buy quote is zero");
        return Ok(Amount::zero());
    }

    let min_amount = std::cmp::min(token_amount, &curve.real_token_reserves);

    let Some(sol_cost) = buy_sol_amount_quote(
        min_amount,
        &curve.virtual_token_reserves,
        &curve.virtual_sol_reserves,
    ) else {
        log::warn!(
            "real token reserves {} reach virtual reserves {}, buy quote is zero",
            curve.real_token_reserves,
            curve.virtual_token_reserves
        );
        return Ok(Amount::zero());
    };

    let fee = get_fee(
        global,
        fee_config,
        &resolved.mint_supply,
        curve,
        &sol_cost,
        resolved.is_new_bonding_curve,
    )?;

    Ok(sol_cost + fee)
}

/// Lamports the seller receives for `token_amount` tokens, fees taken out.
///
/// Selling needs an existing curve and its mint supply.
pub fn get_sell_sol_amount_from_token_amount(
    global: &Global,
    fee_config: Option<&FeeConfig>,
    mint_supply: &Amount,
    curve: &BondingCurve,
    token_amount: &Amount,
) -> Result<Amount> {
    if token_amount.is_zero() {
        return Ok(Amount::zero());
    }

    if curve.is_migrated() {
        log::trace!("curve migrated, sell quote is zero");
        return Ok(Amount::zero());
    }

    let sol_cost = sell_sol_amount_quote(
        token_amount,
        &curve.virtual_token_reserves,
        &curve.virtual_sol_reserves,
    );

    let fee = get_fee(global, fee_config, mint_supply, curve, &sol_cost, false)?;

    if fee > sol_cost {
        log::warn!("sell fee {} exceeds proceeds {}, quoting zero", fee, sol_cost);
        return Ok(Amount::zero());
    }

    Ok(sol_cost - fee)
}
