//! Protocol and creator fee selection
//!
//! Two regimes:
//! - Legacy: no `FeeConfig`, flat rates straight from `Global`
//! - Tiered: rates picked by the curve's market cap from `FeeConfig::fee_tiers`

use std::borrow::Cow;

use num_traits::Zero;

use crate::math::{bonding_curve_market_cap, fee_amount};
use crate::{Amount, BondingCurve, FeeConfig, FeeTier, Fees, Global, Result, ONE_BILLION_SUPPLY};

/// Protocol and creator rates in effect for one quote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculatedFeesBps {
    pub protocol_fee_bps: Amount,
    pub creator_fee_bps: Amount,
}

impl CalculatedFeesBps {
    /// Combined rate charged on a trade, creator share included only if it applies
    pub fn total_bps(&self, creator_applies: bool) -> Amount {
        if creator_applies {
            &self.protocol_fee_bps + &self.creator_fee_bps
        } else {
            self.protocol_fee_bps.clone()
        }
    }
}

impl From<&Fees> for CalculatedFeesBps {
    fn from(fees: &Fees) -> Self {
        Self {
            protocol_fee_bps: fees.protocol_fee_bps.clone(),
            creator_fee_bps: fees.creator_fee_bps.clone(),
        }
    }
}

/// Creator fee is charged on fresh curves and on curves with a creator set
#[inline]
pub fn creator_fee_applies(curve: &BondingCurve, is_new_bonding_curve: bool) -> bool {
    is_new_bonding_curve || curve.creator.is_some()
}

/// Select the fee rates for the current reserves.
///
/// # Errors
/// * `CurveError::DivisionByZero` if a fee config is present and
///   `virtual_token_reserves` is zero
pub fn compute_fees_bps(
    global: &Global,
    fee_config: Option<&FeeConfig>,
    mint_supply: &Amount,
    virtual_sol_reserves: &Amount,
    virtual_token_reserves: &Amount,
) -> Result<CalculatedFeesBps> {
    let Some(fee_config) = fee_config else {
        return Ok(CalculatedFeesBps {
            protocol_fee_bps: global.fee_basis_points.clone(),
            creator_fee_bps: global.creator_fee_basis_points.clone(),
        });
    };

    let market_cap =
        bonding_curve_market_cap(mint_supply, virtual_sol_reserves, virtual_token_reserves)?;

    if fee_config.fee_tiers.is_empty() {
        log::warn!("fee config has no tiers, using flat fees");
        return Ok(CalculatedFeesBps::from(&fee_config.flat_fees));
    }

    let fees = calculate_fee_tier(&fee_config.fee_tiers, &market_cap);
    log::trace!(
        "market cap {} -> protocol {} bps, creator {} bps",
        market_cap,
        fees.protocol_fee_bps,
        fees.creator_fee_bps
    );
    Ok(CalculatedFeesBps::from(&fees))
}

/// Pick the highest tier whose threshold is at or below `market_cap`.
///
/// The lowest tier is the floor: it also applies below its own threshold.
/// Tiers must be sorted ascending by threshold. An empty slice yields zero fees.
pub fn calculate_fee_tier(fee_tiers: &[FeeTier], market_cap: &Amount) -> Fees {
    let Some(first_tier) = fee_tiers.first() else {
        return Fees::default();
    };

    if *market_cap < first_tier.market_cap_lamports_threshold {
        return first_tier.fees.clone();
    }

    fee_tiers
        .iter()
        .rev()
        .find(|tier| *market_cap >= tier.market_cap_lamports_threshold)
        .unwrap_or(first_tier)
        .fees
        .clone()
}

/// Supply used to price the curve for tier lookup.
///
/// Non-mayhem curves use the fixed one billion token supply so brackets
/// line up across curves; mayhem curves use their real mint supply.
pub fn fee_lookup_supply<'a>(curve: &BondingCurve, mint_supply: &'a Amount) -> Cow<'a, Amount> {
    if curve.is_mayhem_mode {
        Cow::Borrowed(mint_supply)
    } else {
        Cow::Owned(Amount::from(ONE_BILLION_SUPPLY))
    }
}

/// Fee in lamports charged on `amount` for a trade against `curve`.
///
/// The tier is looked up with [`fee_lookup_supply`]. Each component
/// rounds up.
///
/// # Errors
/// * `CurveError::DivisionByZero` if a fee config is present and the
///   curve has no virtual token reserves
pub fn get_fee(
    global: &Global,
    fee_config: Option<&FeeConfig>,
    mint_supply: &Amount,
    curve: &BondingCurve,
    amount: &Amount,
    is_new_bonding_curve: bool,
) -> Result<Amount> {
    let supply = fee_lookup_supply(curve, mint_supply);

    let fees = compute_fees_bps(
        global,
        fee_config,
        &supply,
        &curve.virtual_sol_reserves,
        &curve.virtual_token_reserves,
    )?;

    let mut fee = fee_amount(amount, &fees.protocol_fee_bps);
    if creator_fee_applies(curve, is_new_bonding_curve) {
        fee += fee_amount(amount, &fees.creator_fee_bps);
    } else if !fees.creator_fee_bps.is_zero() {
        log::trace!("no creator set, skipping {} bps creator fee", fees.creator_fee_bps);
    }
    Ok(fee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{new_bonding_curve, CurveError, Pubkey};

    fn amt(v: u64) -> Amount {
        Amount::from(v)
    }

    fn fees(protocol: u64, creator: u64) -> Fees {
        Fees {
            lp_fee_bps: amt(0),
            protocol_fee_bps: amt(protocol),
            creator_fee_bps: amt(creator),
        }
    }

    fn tier(threshold: u64, protocol: u64, creator: u64) -> FeeTier {
        FeeTier {
            market_cap_lamports_threshold: amt(threshold),
            fees: fees(protocol, creator),
        }
    }

    fn test_global() -> Global {
        Global {
            initial_virtual_token_reserves: amt(1_073_000_000_000_000),
            initial_virtual_sol_reserves: amt(30_000_000_000),
            initial_real_token_reserves: amt(793_100_000_000_000),
            token_total_supply: amt(1_000_000_000_000_000),
            fee_basis_points: amt(95),
            creator_fee_basis_points: amt(5),
            ..Global::default()
        }
    }

    fn tiered_config() -> FeeConfig {
        FeeConfig {
            admin: Pubkey::default(),
            flat_fees: fees(95, 5),
            fee_tiers: vec![
                tier(0, 95, 30),
                tier(100_000_000_000, 90, 25),
                tier(1_000_000_000_000, 50, 10),
            ],
        }
    }

    #[test]
    fn test_two_tier_selection() {
        let tiers = [tier(0, 1, 1), tier(1000, 2, 2)];
        assert_eq!(calculate_fee_tier(&tiers, &amt(500)), fees(1, 1));
        assert_eq!(calculate_fee_tier(&tiers, &amt(1000)), fees(2, 2));
    }

    #[test]
    fn test_lowest_tier_is_floor() {
        let tiers = [tier(1000, 7, 3), tier(5000, 4, 2)];
        assert_eq!(calculate_fee_tier(&tiers, &amt(0)), fees(7, 3));
        assert_eq!(calculate_fee_tier(&tiers, &amt(999)), fees(7, 3));
        assert_eq!(calculate_fee_tier(&tiers, &amt(4999)), fees(7, 3));
    }

    #[test]
    fn test_highest_tier_at_and_above_threshold() {
        let tiers = tiered_config().fee_tiers;
        assert_eq!(calculate_fee_tier(&tiers, &amt(1_000_000_000_000)), fees(50, 10));
        assert_eq!(calculate_fee_tier(&tiers, &amt(u64::MAX)), fees(50, 10));
    }

    #[test]
    fn test_empty_tiers() {
        assert_eq!(calculate_fee_tier(&[], &amt(123)), Fees::default());
    }

    #[test]
    fn test_legacy_regime_uses_global() {
        let global = test_global();
        let result =
            compute_fees_bps(&global, None, &amt(0), &amt(0), &amt(0)).unwrap();
        assert_eq!(result.protocol_fee_bps, amt(95));
        assert_eq!(result.creator_fee_bps, amt(5));
    }

    #[test]
    fn test_tiered_regime_by_market_cap() {
        let global = test_global();
        let config = tiered_config();
        let supply = amt(1_000_000_000_000_000);

        // Fresh curve: ~28 SOL market cap, first tier
        let result = compute_fees_bps(
            &global,
            Some(&config),
            &supply,
            &amt(30_000_000_000),
            &amt(1_073_000_000_000_000),
        )
        .unwrap();
        assert_eq!(result, CalculatedFeesBps::from(&fees(95, 30)));

        // 150 SOL market cap, second tier
        let result = compute_fees_bps(
            &global,
            Some(&config),
            &supply,
            &amt(150_000_000_000),
            &amt(1_000_000_000_000_000),
        )
        .unwrap();
        assert_eq!(result, CalculatedFeesBps::from(&fees(90, 25)));
    }

    #[test]
    fn test_tiered_regime_migrated_curve_errors() {
        let global = test_global();
        let config = tiered_config();
        let result = compute_fees_bps(&global, Some(&config), &amt(1), &amt(1), &amt(0));
        assert_eq!(result, Err(CurveError::DivisionByZero));
    }

    #[test]
    fn test_empty_tiers_fall_back_to_flat_fees() {
        let global = test_global();
        let config = FeeConfig {
            flat_fees: fees(42, 7),
            ..FeeConfig::default()
        };
        let result =
            compute_fees_bps(&global, Some(&config), &amt(1), &amt(1), &amt(1)).unwrap();
        assert_eq!(result, CalculatedFeesBps::from(&fees(42, 7)));
    }

    #[test]
    fn test_get_fee_new_curve_pays_creator_fee() {
        let global = test_global();
        let curve = new_bonding_curve(&global);
        let amount = amt(1_000_000_000);

        // 0.95% + 0.05% of 1 SOL
        let fee = get_fee(&global, None, &amt(0), &curve, &amount, true).unwrap();
        assert_eq!(fee, amt(10_000_000));
    }

    #[test]
    fn test_get_fee_unset_creator_skips_creator_fee() {
        let global = test_global();
        let curve = new_bonding_curve(&global);
        let amount = amt(1_000_000_000);

        let fee = get_fee(&global, None, &amt(0), &curve, &amount, false).unwrap();
        assert_eq!(fee, amt(9_500_000));
    }

    #[test]
    fn test_get_fee_with_creator() {
        let global = test_global();
        let mut curve = new_bonding_curve(&global);
        curve.creator = Some(Pubkey::new_from_array([7u8; 32]));

        let fee = get_fee(&global, None, &amt(0), &curve, &amt(1_000_000_000), false).unwrap();
        assert_eq!(fee, amt(10_000_000));
    }

    #[test]
    fn test_get_fee_rounds_each_component_up() {
        let global = test_global();
        let mut curve = new_bonding_curve(&global);
        curve.creator = Some(Pubkey::new_from_array([7u8; 32]));

        // 95 bps of 1 lamport -> 1, 5 bps of 1 lamport -> 1
        let fee = get_fee(&global, None, &amt(0), &curve, &amt(1), false).unwrap();
        assert_eq!(fee, amt(2));
    }

    #[test]
    fn test_get_fee_mayhem_uses_mint_supply() {
        let global = test_global();
        let config = FeeConfig {
            fee_tiers: vec![tier(0, 100, 0), tier(50_000_000_000, 10, 0)],
            ..FeeConfig::default()
        };
        let mut curve = new_bonding_curve(&global);
        let amount = amt(1_000_000_000);

        // Reference supply: ~28 SOL market cap, first tier
        let fee = get_fee(&global, Some(&config), &amt(2_000_000_000_000_000), &curve, &amount, false)
            .unwrap();
        assert_eq!(fee, amt(10_000_000));

        // Mayhem with doubled supply: ~56 SOL market cap, second tier
        curve.is_mayhem_mode = true;
        let fee = get_fee(&global, Some(&config), &amt(2_000_000_000_000_000), &curve, &amount, false)
            .unwrap();
        assert_eq!(fee, amt(1_000_000));
    }
}
