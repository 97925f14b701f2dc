//! Output helpers shared by the command modules

use anyhow::Result;
use colored::Colorize;
use curve_model::{Amount, BigInt, LAMPORTS_PER_SOL, ONE_TOKEN};
use num_bigint::Sign;
use num_traits::ToPrimitive;
use serde_json::Value;

/// Token decimals implied by `ONE_TOKEN`
const TOKEN_DECIMALS: usize = 6;
const SOL_DECIMALS: usize = 9;

pub fn header(title: &str) {
    println!("{}", format!("=== {} ===", title).bright_green().bold());
}

pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("{} {}", format!("{}:", label).bright_cyan(), value);
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `amount / 10^decimals` rendered exactly
fn fixed_point(amount: &Amount, scale: u64, decimals: usize) -> String {
    let scale = Amount::from(scale);
    let whole = amount / &scale;
    // Remainder is below `scale`, which fits in u64
    let frac = (amount % &scale).to_u64().unwrap_or_default();
    format!("{}.{:0width$}", whole, frac, width = decimals)
}

/// `1500000000 lamports (1.500000000 SOL)`
pub fn sol(lamports: &Amount) -> String {
    format!(
        "{} lamports ({} SOL)",
        lamports,
        fixed_point(lamports, LAMPORTS_PER_SOL, SOL_DECIMALS)
    )
}

/// `2500000 raw (2.500000 tokens)`
pub fn tokens(raw: &Amount) -> String {
    format!("{} raw ({} tokens)", raw, fixed_point(raw, ONE_TOKEN, TOKEN_DECIMALS))
}

/// `95 bps (0.95%)`
pub fn bps(value: &Amount) -> String {
    format!("{} bps ({}%)", value, fixed_point(value, 100, 2))
}

/// Signed variant of [`bps`]
pub fn signed_bps(value: &BigInt) -> String {
    let sign = if value.sign() == Sign::Minus { "-" } else { "" };
    let magnitude = value.magnitude();
    format!("{}{} bps ({}{}%)", sign, magnitude, sign, fixed_point(magnitude, 100, 2))
}

pub fn yes_no(flag: bool) -> colored::ColoredString {
    if flag {
        "Yes".bright_green()
    } else {
        "No".normal()
    }
}
