//! Market cap, graduation, pricing and price impact reports

use anyhow::Result;
use colored::Colorize;
use curve_model::{
    bonding_curve_market_cap, calculate_buy_price_impact, calculate_sell_price_impact,
    get_bonding_curve_summary, get_graduation_progress, get_token_price, spot_price, Amount,
    PriceImpactResult,
};
use serde_json::json;

use crate::config::Snapshot;
use crate::display;

pub fn show_market_cap(snapshot: &Snapshot, json: bool) -> Result<()> {
    let resolved = snapshot.resolved_curve();
    let curve = resolved.curve.as_ref();
    let market_cap = bonding_curve_market_cap(
        &resolved.mint_supply,
        &curve.virtual_sol_reserves,
        &curve.virtual_token_reserves,
    )?;

    if json {
        return display::print_json(&json!({
            "market_cap": market_cap.to_string(),
            "mint_supply": resolved.mint_supply.to_string(),
            "spot_price": spot_price(curve).to_string(),
        }));
    }

    display::header("Market Cap");
    display::field("Market Cap", display::sol(&market_cap));
    display::field("Mint Supply", display::tokens(&resolved.mint_supply));
    display::field("Spot Price (lamports per raw unit, x1e9)", spot_price(curve));
    Ok(())
}

pub fn show_progress(snapshot: &Snapshot, json: bool) -> Result<()> {
    let resolved = snapshot.resolved_curve();
    let progress = get_graduation_progress(&snapshot.global, &resolved.curve);

    if json {
        return display::print_json(&json!({
            "progress_bps": progress.progress_bps,
            "is_graduated": progress.is_graduated,
            "tokens_remaining": progress.tokens_remaining.to_string(),
            "tokens_total": progress.tokens_total.to_string(),
            "sol_accumulated": progress.sol_accumulated.to_string(),
        }));
    }

    display::header("Graduation Progress");
    display::field("Progress", display::bps(&Amount::from(progress.progress_bps)));
    display::field("Graduated", display::yes_no(progress.is_graduated));
    display::field("Tokens Remaining", display::tokens(&progress.tokens_remaining));
    display::field("Tokens Total", display::tokens(&progress.tokens_total));
    display::field("SOL Accumulated", display::sol(&progress.sol_accumulated));
    Ok(())
}

pub fn show_price(snapshot: &Snapshot, json: bool) -> Result<()> {
    let resolved = snapshot.resolved_curve();
    let price = get_token_price(
        &snapshot.global,
        snapshot.fee_config.as_ref(),
        &resolved.mint_supply,
        &resolved.curve,
    )?;

    if json {
        return display::print_json(&json!({
            "buy_price_per_token": price.buy_price_per_token.to_string(),
            "sell_price_per_token": price.sell_price_per_token.to_string(),
            "market_cap": price.market_cap.to_string(),
            "is_graduated": price.is_graduated,
        }));
    }

    display::header("Token Price (1 whole token)");
    display::field("Buy", display::sol(&price.buy_price_per_token));
    display::field("Sell", display::sol(&price.sell_price_per_token));
    display::field("Market Cap", display::sol(&price.market_cap));
    display::field("Graduated", display::yes_no(price.is_graduated));
    Ok(())
}

pub fn show_summary(snapshot: &Snapshot, json: bool) -> Result<()> {
    let resolved = snapshot.resolved_curve();
    let summary = get_bonding_curve_summary(
        &snapshot.global,
        snapshot.fee_config.as_ref(),
        &resolved.mint_supply,
        &resolved.curve,
    )?;

    if json {
        return display::print_json(&json!({
            "market_cap": summary.market_cap.to_string(),
            "progress_bps": summary.progress_bps,
            "is_graduated": summary.is_graduated,
            "buy_price_per_token": summary.buy_price_per_token.to_string(),
            "sell_price_per_token": summary.sell_price_per_token.to_string(),
            "real_sol_reserves": summary.real_sol_reserves.to_string(),
            "real_token_reserves": summary.real_token_reserves.to_string(),
            "virtual_sol_reserves": summary.virtual_sol_reserves.to_string(),
            "virtual_token_reserves": summary.virtual_token_reserves.to_string(),
        }));
    }

    display::header("Bonding Curve Summary");
    display::field("Fee Regime", snapshot.regime());
    display::field("Market Cap", display::sol(&summary.market_cap));
    display::field("Progress", display::bps(&Amount::from(summary.progress_bps)));
    display::field("Graduated", display::yes_no(summary.is_graduated));
    display::field("Buy (1 token)", display::sol(&summary.buy_price_per_token));
    display::field("Sell (1 token)", display::sol(&summary.sell_price_per_token));

    println!("\n{}", "Reserves:".bright_yellow());
    println!("  {} {}", "Virtual SOL:".bright_cyan(), display::sol(&summary.virtual_sol_reserves));
    println!("  {} {}", "Virtual Token:".bright_cyan(), display::tokens(&summary.virtual_token_reserves));
    println!("  {} {}", "Real SOL:".bright_cyan(), display::sol(&summary.real_sol_reserves));
    println!("  {} {}", "Real Token:".bright_cyan(), display::tokens(&summary.real_token_reserves));
    Ok(())
}

pub fn show_buy_impact(snapshot: &Snapshot, sol_amount: &Amount, json: bool) -> Result<()> {
    let resolved = snapshot.resolved_curve();
    let impact = calculate_buy_price_impact(
        &snapshot.global,
        snapshot.fee_config.as_ref(),
        &resolved.mint_supply,
        &resolved.curve,
        sol_amount,
    )?;

    print_impact("Buy Price Impact", &impact, display::tokens(&impact.output_amount), json)
}

pub fn show_sell_impact(snapshot: &Snapshot, token_amount: &Amount, json: bool) -> Result<()> {
    let (curve, mint_supply) = snapshot.existing_curve()?;
    let impact = calculate_sell_price_impact(
        &snapshot.global,
        snapshot.fee_config.as_ref(),
        mint_supply,
        curve,
        token_amount,
    )?;

    print_impact("Sell Price Impact", &impact, display::sol(&impact.output_amount), json)
}

fn print_impact(title: &str, impact: &PriceImpactResult, output: String, json: bool) -> Result<()> {
    if json {
        return display::print_json(&json!({
            "price_before": impact.price_before.to_string(),
            "price_after": impact.price_after.to_string(),
            "impact_bps": impact.impact_bps.to_string(),
            "output_amount": impact.output_amount.to_string(),
        }));
    }

    display::header(title);
    display::field("Price Before", &impact.price_before);
    display::field("Price After", &impact.price_after);
    display::field("Impact", display::signed_bps(&impact.impact_bps));
    display::field("Output", output);
    Ok(())
}
