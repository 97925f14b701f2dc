//! Read-only analytics built on the quote functions
//!
//! - Price impact of a buy or sell
//! - Graduation progress toward the AMM
//! - Price of one whole token
//! - Combined curve summary

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::math::bonding_curve_market_cap;
use crate::quote::{
    get_buy_sol_amount_from_token_amount, get_buy_token_amount_from_sol_amount,
    get_sell_sol_amount_from_token_amount,
};
use crate::{
    Amount, BondingCurve, CurveState, FeeConfig, Global, Result, BPS_DENOMINATOR,
    LAMPORTS_PER_SOL, ONE_TOKEN,
};

// ============================================================================
// Result types
// ============================================================================

/// Spot price movement caused by one trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceImpactResult {
    /// Spot price before the trade (lamports per raw unit, scaled by 1e9)
    pub price_before: Amount,
    /// Spot price after the trade, same scale
    pub price_after: Amount,
    /// Adverse price move in basis points (150 = 1.5%)
    pub impact_bps: BigInt,
    /// Tokens received for a buy, lamports received for a sell
    pub output_amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraduationProgress {
    /// 0..=10_000
    pub progress_bps: u64,
    pub is_graduated: bool,
    /// Tokens left to sell before graduation
    pub tokens_remaining: Amount,
    /// Real tokens the curve started with
    pub tokens_total: Amount,
    /// Lamports collected in the real reserves
    pub sol_accumulated: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPriceInfo {
    /// Lamports to buy one whole token, fees included
    pub buy_price_per_token: Amount,
    /// Lamports received for one whole token, fees taken out
    pub sell_price_per_token: Amount,
    pub market_cap: Amount,
    pub is_graduated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondingCurveSummary {
    pub market_cap: Amount,
    pub progress_bps: u64,
    pub is_graduated: bool,
    pub buy_price_per_token: Amount,
    pub sell_price_per_token: Amount,
    pub real_sol_reserves: Amount,
    pub real_token_reserves: Amount,
    pub virtual_sol_reserves: Amount,
    pub virtual_token_reserves: Amount,
}

// ============================================================================
// Spot price
// ============================================================================

fn price_from_reserves(virtual_sol_reserves: &Amount, virtual_token_reserves: &Amount) -> Amount {
    if virtual_token_reserves.is_zero() {
        return Amount::zero();
    }
    virtual_sol_reserves * Amount::from(LAMPORTS_PER_SOL) / virtual_token_reserves
}

/// Lamports per raw token unit, scaled by 1e9. Zero on a migrated curve.
pub fn spot_price(curve: &BondingCurve) -> Amount {
    price_from_reserves(&curve.virtual_sol_reserves, &curve.virtual_token_reserves)
}

/// `(moved_to - moved_from) * 10_000 / price_before`, signed
fn bps_change(moved_from: &Amount, moved_to: &Amount, price_before: &Amount) -> BigInt {
    if price_before.is_zero() {
        return BigInt::zero();
    }
    let delta = BigInt::from(moved_to.clone()) - BigInt::from(moved_from.clone());
    delta * BigInt::from(BPS_DENOMINATOR) / BigInt::from(price_before.clone())
}

// ============================================================================
// Price impact
// ============================================================================

/// Price impact of spending `sol_amount` lamports on the curve.
///
/// The simulated reserves add the full `sol_amount` (fees included) to
/// the SOL side and remove the quoted tokens from the token side.
pub fn calculate_buy_price_impact(
    global: &Global,
    fee_config: Option<&FeeConfig>,
    mint_supply: &Amount,
    curve: &BondingCurve,
    sol_amount: &Amount,
) -> Result<PriceImpactResult> {
    let price_before = spot_price(curve);

    let tokens_received = get_buy_token_amount_from_sol_amount(
        global,
        fee_config,
        CurveState::existing(curve, mint_supply),
        sol_amount,
    )?;

    let new_virtual_sol_reserves = &curve.virtual_sol_reserves + sol_amount;
    let new_virtual_token_reserves = &curve.virtual_token_reserves - &tokens_received;
    let price_after = price_from_reserves(&new_virtual_sol_reserves, &new_virtual_token_reserves);

    let impact_bps = bps_change(&price_before, &price_after, &price_before);

    Ok(PriceImpactResult {
        price_before,
        price_after,
        impact_bps,
        output_amount: tokens_received,
    })
}

/// Price impact of selling `token_amount` raw tokens into the curve.
///
/// Reported as a positive number of bps when the price drops.
pub fn calculate_sell_price_impact(
    global: &Global,
    fee_config: Option<&FeeConfig>,
    mint_supply: &Amount,
    curve: &BondingCurve,
    token_amount: &Amount,
) -> Result<PriceImpactResult> {
    let price_before = spot_price(curve);

    let sol_received =
        get_sell_sol_amount_from_token_amount(global, fee_config, mint_supply, curve, token_amount)?;

    // sol_received never exceeds the pre-fee proceeds, which stay below virtual SOL
    let new_virtual_sol_reserves = &curve.virtual_sol_reserves - &sol_received;
    let new_virtual_token_reserves = &curve.virtual_token_reserves + token_amount;
    let price_after = price_from_reserves(&new_virtual_sol_reserves, &new_virtual_token_reserves);

    let impact_bps = bps_change(&price_after, &price_before, &price_before);

    Ok(PriceImpactResult {
        price_before,
        price_after,
        impact_bps,
        output_amount: sol_received,
    })
}

// ============================================================================
// Graduation
// ============================================================================

/// How far the curve is toward selling out its real token reserves.
///
/// A complete curve always reports 10_000 bps.
pub fn get_graduation_progress(global: &Global, curve: &BondingCurve) -> GraduationProgress {
    if curve.complete {
        return GraduationProgress {
            progress_bps: BPS_DENOMINATOR,
            is_graduated: true,
            tokens_remaining: Amount::zero(),
            tokens_total: global.initial_real_token_reserves.clone(),
            sol_accumulated: curve.real_sol_reserves.clone(),
        };
    }

    let initial_real = &global.initial_real_token_reserves;
    if initial_real.is_zero() {
        return GraduationProgress {
            progress_bps: 0,
            is_graduated: false,
            tokens_remaining: Amount::zero(),
            tokens_total: Amount::zero(),
            sol_accumulated: Amount::zero(),
        };
    }

    let tokens_sold = if curve.real_token_reserves > *initial_real {
        log::warn!(
            "real token reserves {} above initial {}, progress is zero",
            curve.real_token_reserves,
            initial_real
        );
        Amount::zero()
    } else {
        initial_real - &curve.real_token_reserves
    };

    let progress = tokens_sold * Amount::from(BPS_DENOMINATOR) / initial_real;

    GraduationProgress {
        // tokens_sold <= initial_real keeps this within 10_000
        progress_bps: progress.to_u64().unwrap_or(BPS_DENOMINATOR),
        is_graduated: false,
        tokens_remaining: curve.real_token_reserves.clone(),
        tokens_total: initial_real.clone(),
        sol_accumulated: curve.real_sol_reserves.clone(),
    }
}

// ============================================================================
// Pricing
// ============================================================================

/// Buy and sell price of one whole token (10^6 raw units) plus market cap.
///
/// # Errors
/// * `CurveError::DivisionByZero` on a migrated curve, which has no market cap
pub fn get_token_price(
    global: &Global,
    fee_config: Option<&FeeConfig>,
    mint_supply: &Amount,
    curve: &BondingCurve,
) -> Result<TokenPriceInfo> {
    let one_token = Amount::from(ONE_TOKEN);

    let buy_price_per_token = get_buy_sol_amount_from_token_amount(
        global,
        fee_config,
        CurveState::existing(curve, mint_supply),
        &one_token,
    )?;

    let sell_price_per_token =
        get_sell_sol_amount_from_token_amount(global, fee_config, mint_supply, curve, &one_token)?;

    let market_cap = bonding_curve_market_cap(
        mint_supply,
        &curve.virtual_sol_reserves,
        &curve.virtual_token_reserves,
    )?;

    Ok(TokenPriceInfo {
        buy_price_per_token,
        sell_price_per_token,
        market_cap,
        is_graduated: curve.complete,
    })
}

/// Graduation progress, token price and raw reserves in one view
pub fn get_bonding_curve_summary(
    global: &Global,
    fee_config: Option<&FeeConfig>,
    mint_supply: &Amount,
    curve: &BondingCurve,
) -> Result<BondingCurveSummary> {
    let progress = get_graduation_progress(global, curve);
    let price = get_token_price(global, fee_config, mint_supply, curve)?;

    Ok(BondingCurveSummary {
        market_cap: price.market_cap,
        progress_bps: progress.progress_bps,
        is_graduated: progress.is_graduated,
        buy_price_per_token: price.buy_price_per_token,
        sell_price_per_token: price.sell_price_per_token,
        real_sol_reserves: curve.real_sol_reserves.clone(),
        real_token_reserves: curve.real_token_reserves.clone(),
        virtual_sol_reserves: curve.virtual_sol_reserves.clone(),
        virtual_token_reserves: curve.virtual_token_reserves.clone(),
    })
}
