//! Decoded protocol and curve state
//!
//! These are plain values handed in by whoever decodes the on-chain
//! accounts. The engine only ever borrows them.

use std::borrow::Cow;

use num_traits::Zero;

use crate::{Amount, Pubkey};

/// Protocol-wide defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Global {
    pub initialized: bool,
    pub authority: Pubkey,
    pub fee_recipient: Pubkey,
    pub initial_virtual_token_reserves: Amount,
    pub initial_virtual_sol_reserves: Amount,
    pub initial_real_token_reserves: Amount,
    pub token_total_supply: Amount,
    /// Flat protocol fee, legacy regime
    pub fee_basis_points: Amount,
    pub withdraw_authority: Pubkey,
    pub enable_migrate: bool,
    pub pool_migration_fee: Amount,
    /// Flat creator fee, legacy regime
    pub creator_fee_basis_points: Amount,
    pub fee_recipients: Vec<Pubkey>,
    pub create_v2_enabled: bool,
    pub reserved_fee_recipient: Pubkey,
    /// New curves start in mayhem mode when set
    pub mayhem_mode_enabled: bool,
    pub reserved_fee_recipients: Vec<Pubkey>,
}

/// Live state of one token's bonding curve
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BondingCurve {
    pub virtual_token_reserves: Amount,
    pub virtual_sol_reserves: Amount,
    /// Tokens still available to buy; zero at graduation
    pub real_token_reserves: Amount,
    pub real_sol_reserves: Amount,
    pub token_total_supply: Amount,
    /// Graduated to the AMM
    pub complete: bool,
    /// `None` until a creator has been assigned
    pub creator: Option<Pubkey>,
    pub is_mayhem_mode: bool,
}

impl BondingCurve {
    /// Curve has migrated and no longer quotes
    pub fn is_migrated(&self) -> bool {
        self.virtual_token_reserves.is_zero()
    }
}

/// Build a fresh curve seeded from the protocol's initial reserves.
///
/// Used to preview trades against a token that has not been created yet.
pub fn new_bonding_curve(global: &Global) -> BondingCurve {
    BondingCurve {
        virtual_token_reserves: global.initial_virtual_token_reserves.clone(),
        virtual_sol_reserves: global.initial_virtual_sol_reserves.clone(),
        real_token_reserves: global.initial_real_token_reserves.clone(),
        real_sol_reserves: Amount::zero(),
        token_total_supply: global.token_total_supply.clone(),
        complete: false,
        creator: None,
        is_mayhem_mode: global.mayhem_mode_enabled,
    }
}

/// Fee rates in basis points
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fees {
    pub lp_fee_bps: Amount,
    pub protocol_fee_bps: Amount,
    pub creator_fee_bps: Amount,
}

/// One market cap bracket of the fee schedule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeTier {
    pub market_cap_lamports_threshold: Amount,
    pub fees: Fees,
}

/// Tiered fee schedule. Absent config means the flat legacy fees on `Global`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeConfig {
    pub admin: Pubkey,
    pub flat_fees: Fees,
    /// Sorted ascending by threshold
    pub fee_tiers: Vec<FeeTier>,
}

/// Curve input for the buy quotes.
///
/// `NotYetCreated` previews the first trade of a token that has no
/// curve on chain yet; the curve is seeded from `Global` and the
/// creator fee always applies.
#[derive(Debug, Clone, Copy)]
pub enum CurveState<'a> {
    Existing {
        curve: &'a BondingCurve,
        mint_supply: &'a Amount,
    },
    NotYetCreated,
}

/// A curve ready for quoting, either borrowed or freshly seeded
#[derive(Debug, Clone)]
pub struct ResolvedCurve<'a> {
    pub curve: Cow<'a, BondingCurve>,
    pub mint_supply: Cow<'a, Amount>,
    pub is_new_bonding_curve: bool,
}

impl<'a> CurveState<'a> {
    pub fn existing(curve: &'a BondingCurve, mint_supply: &'a Amount) -> Self {
        CurveState::Existing { curve, mint_supply }
    }

    pub fn resolve(self, global: &Global) -> ResolvedCurve<'a> {
        match self {
            CurveState::Existing { curve, mint_supply } => ResolvedCurve {
                curve: Cow::Borrowed(curve),
                mint_supply: Cow::Borrowed(mint_supply),
                is_new_bonding_curve: false,
            },
            CurveState::NotYetCreated => ResolvedCurve {
                curve: Cow::Owned(new_bonding_curve(global)),
                mint_supply: Cow::Owned(global.token_total_supply.clone()),
                is_new_bonding_curve: true,
            },
        }
    }
}

/// Protocol-wide daily volume ledger for incentive tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalVolumeAccumulator {
    pub start_time: i64,
    pub end_time: i64,
    pub seconds_in_a_day: i64,
    pub mint: Pubkey,
    /// Incentive tokens distributed per day index
    pub total_token_supply: Vec<Amount>,
    /// SOL volume traded per day index
    pub sol_volumes: Vec<Amount>,
}

/// One user's incentive accrual state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserVolumeAccumulator {
    pub user: Pubkey,
    pub needs_claim: bool,
    pub total_unclaimed_tokens: Amount,
    pub total_claimed_tokens: Amount,
    pub current_sol_volume: Amount,
    pub last_update_timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_global() -> Global {
        Global {
            initial_virtual_token_reserves: Amount::from(1_073_000_000_000_000u64),
            initial_virtual_sol_reserves: Amount::from(30_000_000_000u64),
            initial_real_token_reserves: Amount::from(793_100_000_000_000u64),
            token_total_supply: Amount::from(1_000_000_000_000_000u64),
            mayhem_mode_enabled: true,
            ..Global::default()
        }
    }

    #[test]
    fn test_new_bonding_curve_seeds_from_global() {
        let global = test_global();
        let curve = new_bonding_curve(&global);

        assert_eq!(curve.virtual_token_reserves, global.initial_virtual_token_reserves);
        assert_eq!(curve.virtual_sol_reserves, global.initial_virtual_sol_reserves);
        assert_eq!(curve.real_token_reserves, global.initial_real_token_reserves);
        assert_eq!(curve.token_total_supply, global.token_total_supply);
        assert!(curve.real_sol_reserves.is_zero());
        assert!(!curve.complete);
        assert_eq!(curve.creator, None);
        assert!(curve.is_mayhem_mode);
    }

    #[test]
    fn test_resolve_not_yet_created() {
        let global = test_global();
        let resolved = CurveState::NotYetCreated.resolve(&global);

        assert!(resolved.is_new_bonding_curve);
        assert_eq!(*resolved.mint_supply, global.token_total_supply);
        assert_eq!(*resolved.curve, new_bonding_curve(&global));
    }

    #[test]
    fn test_resolve_existing_keeps_inputs() {
        let global = test_global();
        let mut curve = new_bonding_curve(&global);
        curve.real_token_reserves = Amount::from(5u32);
        let supply = Amount::from(42u32);

        let resolved = CurveState::existing(&curve, &supply).resolve(&global);
        assert!(!resolved.is_new_bonding_curve);
        assert_eq!(*resolved.mint_supply, supply);
        assert_eq!(*resolved.curve, curve);
    }

    #[test]
    fn test_migrated_curve() {
        let curve = BondingCurve::default();
        assert!(curve.is_migrated());
        assert!(!new_bonding_curve(&test_global()).is_migrated());
    }
}
