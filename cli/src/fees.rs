//! Fee schedule inspection

use anyhow::{Context, Result};
use colored::Colorize;
use curve_model::{
    bonding_curve_market_cap, calculate_fee_tier, compute_fees_bps, creator_fee_applies,
    fee_lookup_supply, get_fee, Amount, BondingCurve,
};
use serde_json::json;

use crate::config::Snapshot;
use crate::display;

/// Fees a given market cap falls into under the snapshot's tier table
pub fn show_tier(snapshot: &Snapshot, market_cap: &Amount, json: bool) -> Result<()> {
    let config = snapshot
        .fee_config
        .as_ref()
        .context("Snapshot has no [fee_config]; tier lookup needs fee_tiers")?;
    if config.fee_tiers.is_empty() {
        anyhow::bail!("Snapshot [fee_config] has no fee_tiers");
    }

    let fees = calculate_fee_tier(&config.fee_tiers, market_cap);

    if json {
        return display::print_json(&json!({
            "market_cap": market_cap.to_string(),
            "lp_fee_bps": fees.lp_fee_bps.to_string(),
            "protocol_fee_bps": fees.protocol_fee_bps.to_string(),
            "creator_fee_bps": fees.creator_fee_bps.to_string(),
        }));
    }

    display::header("Fee Tier");
    display::field("Market Cap", display::sol(market_cap));
    display::field("LP Fee", display::bps(&fees.lp_fee_bps));
    display::field("Protocol Fee", display::bps(&fees.protocol_fee_bps));
    display::field("Creator Fee", display::bps(&fees.creator_fee_bps));

    println!("\n{}", "Schedule:".bright_yellow());
    for (i, tier) in config.fee_tiers.iter().enumerate() {
        let marker = if tier.fees == fees { "→".bright_green() } else { " ".normal() };
        println!(
            "  {} {} {} protocol {} / creator {}",
            marker,
            format!("[{}]", i).dimmed(),
            display::sol(&tier.market_cap_lamports_threshold),
            tier.fees.protocol_fee_bps,
            tier.fees.creator_fee_bps
        );
    }
    Ok(())
}

/// Rates in effect for the snapshot curve, and optionally the fee on `amount`
pub fn show_current(snapshot: &Snapshot, amount: Option<&Amount>, json: bool) -> Result<()> {
    let resolved = snapshot.resolved_curve();
    let curve = resolved.curve.as_ref();

    let lookup_supply = fee_lookup_supply(curve, &resolved.mint_supply);
    let rates = compute_fees_bps(
        &snapshot.global,
        snapshot.fee_config.as_ref(),
        &lookup_supply,
        &curve.virtual_sol_reserves,
        &curve.virtual_token_reserves,
    )?;
    let creator_applies = creator_fee_applies(curve, resolved.is_new_bonding_curve);
    let market_cap = lookup_market_cap(curve, &lookup_supply)?;

    let fee = amount
        .map(|amount| {
            get_fee(
                &snapshot.global,
                snapshot.fee_config.as_ref(),
                &resolved.mint_supply,
                curve,
                amount,
                resolved.is_new_bonding_curve,
            )
        })
        .transpose()?;

    if json {
        return display::print_json(&json!({
            "regime": snapshot.regime(),
            "lookup_market_cap": market_cap.as_ref().map(|m| m.to_string()),
            "protocol_fee_bps": rates.protocol_fee_bps.to_string(),
            "creator_fee_bps": rates.creator_fee_bps.to_string(),
            "creator_fee_applies": creator_applies,
            "total_fee_bps": rates.total_bps(creator_applies).to_string(),
            "amount": amount.map(|a| a.to_string()),
            "fee": fee.as_ref().map(|f| f.to_string()),
        }));
    }

    display::header("Current Fees");
    display::field("Regime", snapshot.regime());
    match &market_cap {
        Some(market_cap) => display::field("Lookup Market Cap", display::sol(market_cap)),
        None => display::field("Lookup Market Cap", "n/a (curve migrated)".dimmed()),
    }
    display::field("Protocol Fee", display::bps(&rates.protocol_fee_bps));
    display::field("Creator Fee", display::bps(&rates.creator_fee_bps));
    display::field("Creator Fee Applies", display::yes_no(creator_applies));
    display::field("Total", display::bps(&rates.total_bps(creator_applies)));

    if let (Some(amount), Some(fee)) = (amount, fee) {
        println!();
        display::field("Amount", display::sol(amount));
        display::field("Fee", display::sol(&fee));
    }
    Ok(())
}

/// Market cap the tier lookup sees, `None` once the curve has migrated
fn lookup_market_cap(curve: &BondingCurve, lookup_supply: &Amount) -> Result<Option<Amount>> {
    if curve.is_migrated() {
        return Ok(None);
    }
    let market_cap = bonding_curve_market_cap(
        lookup_supply,
        &curve.virtual_sol_reserves,
        &curve.virtual_token_reserves,
    )?;
    Ok(Some(market_cap))
}
