//! Buy and sell quotes against the snapshot curve

use anyhow::Result;
use curve_model::{
    get_buy_sol_amount_from_token_amount, get_buy_token_amount_from_sol_amount,
    get_sell_sol_amount_from_token_amount, Amount, CurveState,
};
use serde_json::json;

use crate::config::Snapshot;
use crate::display;

fn curve_label(state: &CurveState<'_>) -> &'static str {
    match state {
        CurveState::Existing { .. } => "existing",
        CurveState::NotYetCreated => "not yet created (first buy)",
    }
}

pub fn buy_tokens(snapshot: &Snapshot, sol_amount: &Amount, json: bool) -> Result<()> {
    let state = snapshot.curve_state();
    let tokens = get_buy_token_amount_from_sol_amount(
        &snapshot.global,
        snapshot.fee_config.as_ref(),
        state,
        sol_amount,
    )?;

    if json {
        return display::print_json(&json!({
            "sol_amount": sol_amount.to_string(),
            "tokens_out": tokens.to_string(),
            "curve": curve_label(&state),
        }));
    }

    display::header("Buy Quote (SOL in)");
    display::field("Curve", curve_label(&state));
    display::field("Spend", display::sol(sol_amount));
    display::field("Receive", display::tokens(&tokens));
    Ok(())
}

pub fn buy_sol(snapshot: &Snapshot, token_amount: &Amount, json: bool) -> Result<()> {
    let state = snapshot.curve_state();
    let cost = get_buy_sol_amount_from_token_amount(
        &snapshot.global,
        snapshot.fee_config.as_ref(),
        state,
        token_amount,
    )?;

    if json {
        return display::print_json(&json!({
            "token_amount": token_amount.to_string(),
            "sol_in": cost.to_string(),
            "curve": curve_label(&state),
        }));
    }

    display::header("Buy Quote (tokens out)");
    display::field("Curve", curve_label(&state));
    display::field("Receive", display::tokens(token_amount));
    display::field("Cost (fees included)", display::sol(&cost));
    Ok(())
}

pub fn sell(snapshot: &Snapshot, token_amount: &Amount, json: bool) -> Result<()> {
    let (curve, mint_supply) = snapshot.existing_curve()?;
    let proceeds = get_sell_sol_amount_from_token_amount(
        &snapshot.global,
        snapshot.fee_config.as_ref(),
        mint_supply,
        curve,
        token_amount,
    )?;

    if json {
        return display::print_json(&json!({
            "token_amount": token_amount.to_string(),
            "sol_out": proceeds.to_string(),
        }));
    }

    display::header("Sell Quote");
    display::field("Sell", display::tokens(token_amount));
    display::field("Receive (fees taken)", display::sol(&proceeds));
    Ok(())
}
