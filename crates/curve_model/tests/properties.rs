//! Property tests for the quoting engine
//!
//! Run with: cargo test -p curve_model --test properties
//! Increase cases: PROPTEST_CASES=1000 cargo test -p curve_model --test properties
//!
//! Covers:
//! - Buy quotes are monotone and bounded by real reserves
//! - Fees only ever cost the trader, flat or tiered
//! - Migrated curves quote zero regardless of fee regime
//! - Fee tier selection picks the floor or the highest reached tier

use curve_model::*;
use num_traits::{CheckedSub, Zero};
use proptest::prelude::*;

// ============================================================================
// STRATEGIES
// ============================================================================

fn amt(v: u64) -> Amount {
    Amount::from(v)
}

fn global_with_fees(fee_bps: u64, creator_fee_bps: u64) -> Global {
    Global {
        initial_virtual_token_reserves: amt(1_073_000_000_000_000),
        initial_virtual_sol_reserves: amt(30_000_000_000),
        initial_real_token_reserves: amt(793_100_000_000_000),
        token_total_supply: amt(ONE_BILLION_SUPPLY),
        fee_basis_points: amt(fee_bps),
        creator_fee_basis_points: amt(creator_fee_bps),
        ..Global::default()
    }
}

/// Live curve with real reserves strictly below virtual reserves
fn curve_strategy() -> impl Strategy<Value = BondingCurve> {
    (
        1_000_000_000_000u64..2_000_000_000_000_000,
        1_000_000_000u64..500_000_000_000,
        0u64..10_000,
        any::<bool>(),
    )
        .prop_map(|(vt, vs, real_frac_bps, has_creator)| BondingCurve {
            virtual_token_reserves: amt(vt),
            virtual_sol_reserves: amt(vs),
            real_token_reserves: amt((vt as u128 * real_frac_bps as u128 / 10_000) as u64),
            real_sol_reserves: amt(0),
            token_total_supply: amt(ONE_BILLION_SUPPLY),
            complete: false,
            creator: has_creator.then(|| Pubkey::new_from_array([5u8; 32])),
            is_mayhem_mode: false,
        })
}

fn tiers_strategy() -> impl Strategy<Value = Vec<FeeTier>> {
    prop::collection::btree_set(0u64..1_000_000_000_000, 1..6).prop_map(|thresholds| {
        thresholds
            .into_iter()
            .enumerate()
            .map(|(i, threshold)| FeeTier {
                market_cap_lamports_threshold: amt(threshold),
                fees: Fees {
                    lp_fee_bps: amt(0),
                    protocol_fee_bps: amt(100 - i as u64),
                    creator_fee_bps: amt(i as u64),
                },
            })
            .collect()
    })
}

// ============================================================================
// QUOTE PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn fuzz_prop_buy_tokens_monotone(
        curve in curve_strategy(),
        fee_bps in 0u64..500,
        sol_a in 1u64..100_000_000_000,
        sol_b in 1u64..100_000_000_000,
    ) {
        let global = global_with_fees(fee_bps, 5);
        let supply = amt(ONE_BILLION_SUPPLY);
        let state = CurveState::existing(&curve, &supply);
        let (lo, hi) = if sol_a <= sol_b { (sol_a, sol_b) } else { (sol_b, sol_a) };

        let tokens_lo = get_buy_token_amount_from_sol_amount(&global, None, state, &amt(lo)).unwrap();
        let tokens_hi = get_buy_token_amount_from_sol_amount(&global, None, state, &amt(hi)).unwrap();

        prop_assert!(tokens_lo <= tokens_hi, "Buy quote not monotone: {} -> {} for {} -> {}",
            tokens_lo, tokens_hi, lo, hi);
    }

    #[test]
    fn fuzz_prop_buy_tokens_bounded_by_real_reserves(
        curve in curve_strategy(),
        sol in 1u64..u64::MAX,
    ) {
        let global = global_with_fees(95, 5);
        let supply = amt(ONE_BILLION_SUPPLY);

        let tokens = get_buy_token_amount_from_sol_amount(
            &global,
            None,
            CurveState::existing(&curve, &supply),
            &amt(sol),
        )
        .unwrap();

        prop_assert!(tokens <= curve.real_token_reserves);
    }

    #[test]
    fn fuzz_prop_buy_sol_fees_only_add(
        curve in curve_strategy(),
        fee_bps in 0u64..1_000,
        creator_fee_bps in 0u64..100,
        tokens in 1u64..1_000_000_000_000_000,
    ) {
        let supply = amt(ONE_BILLION_SUPPLY);
        let state = CurveState::existing(&curve, &supply);

        let with_fee = get_buy_sol_amount_from_token_amount(
            &global_with_fees(fee_bps, creator_fee_bps), None, state, &amt(tokens),
        ).unwrap();
        let fee_free = get_buy_sol_amount_from_token_amount(
            &global_with_fees(0, 0), None, state, &amt(tokens),
        ).unwrap();

        prop_assert!(with_fee >= fee_free);
    }

    #[test]
    fn fuzz_prop_sell_fees_only_subtract(
        curve in curve_strategy(),
        fee_bps in 0u64..1_000,
        creator_fee_bps in 0u64..100,
        tokens in 1u64..1_000_000_000_000_000,
    ) {
        let supply = amt(ONE_BILLION_SUPPLY);

        let with_fee = get_sell_sol_amount_from_token_amount(
            &global_with_fees(fee_bps, creator_fee_bps), None, &supply, &curve, &amt(tokens),
        ).unwrap();
        let fee_free = get_sell_sol_amount_from_token_amount(
            &global_with_fees(0, 0), None, &supply, &curve, &amt(tokens),
        ).unwrap();

        prop_assert!(with_fee <= fee_free);
        prop_assert!(fee_free < curve.virtual_sol_reserves);
    }

    #[test]
    fn fuzz_prop_tiered_fees_only_cost_the_trader(
        curve in curve_strategy(),
        tiers in tiers_strategy(),
        mint_supply in 100_000_000_000_000u64..4_000_000_000_000_000,
        is_mayhem_mode in any::<bool>(),
        sol in 2u64..100_000_000_000,
        tokens in 1u64..1_000_000_000_000_000,
    ) {
        let curve = BondingCurve { is_mayhem_mode, ..curve };
        let tiered_global = global_with_fees(95, 5);
        let free_global = global_with_fees(0, 0);
        let config = FeeConfig { fee_tiers: tiers, ..FeeConfig::default() };
        let supply = amt(mint_supply);
        let state = CurveState::existing(&curve, &supply);

        let tiered = get_buy_token_amount_from_sol_amount(&tiered_global, Some(&config), state, &amt(sol)).unwrap();
        let fee_free = get_buy_token_amount_from_sol_amount(&free_global, None, state, &amt(sol)).unwrap();
        prop_assert!(tiered <= fee_free, "Tiered buy gave more tokens: {} > {}", tiered, fee_free);

        let tiered = get_buy_sol_amount_from_token_amount(&tiered_global, Some(&config), state, &amt(tokens)).unwrap();
        let fee_free = get_buy_sol_amount_from_token_amount(&free_global, None, state, &amt(tokens)).unwrap();
        prop_assert!(tiered >= fee_free, "Tiered buy cost less: {} < {}", tiered, fee_free);

        let tiered = get_sell_sol_amount_from_token_amount(
            &tiered_global, Some(&config), &supply, &curve, &amt(tokens),
        ).unwrap();
        let fee_free = get_sell_sol_amount_from_token_amount(
            &free_global, None, &supply, &curve, &amt(tokens),
        ).unwrap();
        prop_assert!(tiered <= fee_free, "Tiered sell paid more: {} > {}", tiered, fee_free);
    }

    #[test]
    fn fuzz_prop_migrated_curve_quotes_zero(
        curve in curve_strategy(),
        tiers in tiers_strategy(),
        amount in 1u64..u64::MAX,
        use_tiers in any::<bool>(),
    ) {
        let global = global_with_fees(95, 5);
        let migrated = BondingCurve {
            virtual_token_reserves: amt(0),
            ..curve
        };
        let supply = amt(ONE_BILLION_SUPPLY);
        let state = CurveState::existing(&migrated, &supply);
        let config = FeeConfig { fee_tiers: tiers, ..FeeConfig::default() };
        let fee_config = use_tiers.then_some(&config);

        prop_assert!(get_buy_token_amount_from_sol_amount(&global, fee_config, state, &amt(amount))
            .unwrap()
            .is_zero());
        prop_assert!(get_buy_sol_amount_from_token_amount(&global, fee_config, state, &amt(amount))
            .unwrap()
            .is_zero());
        prop_assert!(get_sell_sol_amount_from_token_amount(
            &global, fee_config, &supply, &migrated, &amt(amount)
        )
        .unwrap()
        .is_zero());
    }
}

// ============================================================================
// FEE PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn fuzz_prop_tier_floor(
        tiers in tiers_strategy(),
        offset in 1u64..1_000_000,
    ) {
        let first = &tiers[0];
        let Some(market_cap) = first.market_cap_lamports_threshold.checked_sub(&amt(offset)) else {
            return Ok(());
        };

        prop_assert_eq!(calculate_fee_tier(&tiers, &market_cap), first.fees.clone());
    }

    #[test]
    fn fuzz_prop_tier_is_highest_reached(
        tiers in tiers_strategy(),
        market_cap in 0u64..2_000_000_000_000,
    ) {
        let market_cap = amt(market_cap);
        let selected = calculate_fee_tier(&tiers, &market_cap);

        let expected = tiers
            .iter()
            .filter(|tier| tier.market_cap_lamports_threshold <= market_cap)
            .last()
            .unwrap_or(&tiers[0]);

        prop_assert_eq!(selected, expected.fees.clone());
    }

    #[test]
    fn fuzz_prop_ceil_div_bounds(
        a in 0u64..u64::MAX,
        b in 1u64..u64::MAX,
    ) {
        let q = ceil_div(&amt(a), &amt(b));
        prop_assert!(&q * amt(b) >= amt(a));
        prop_assert!(&q * amt(b) < amt(a) + amt(b));
    }

    #[test]
    fn fuzz_prop_progress_in_range(
        curve in curve_strategy(),
        complete in any::<bool>(),
    ) {
        let global = global_with_fees(95, 5);
        let curve = BondingCurve { complete, ..curve };

        let progress = get_graduation_progress(&global, &curve);
        prop_assert!(progress.progress_bps <= BPS_DENOMINATOR);
        prop_assert_eq!(progress.is_graduated, complete);
        if complete {
            prop_assert_eq!(progress.progress_bps, BPS_DENOMINATOR);
        }
    }
}
