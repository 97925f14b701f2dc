//! Volume incentive token balances

use anyhow::Result;
use chrono::{TimeZone, Utc};
use curve_model::{current_day_tokens, total_unclaimed_tokens};
use serde_json::json;

use crate::config::Snapshot;
use crate::display;

/// `now` as given, or the wall clock
fn resolve_now(now: Option<i64>) -> i64 {
    now.unwrap_or_else(|| Utc::now().timestamp())
}

fn format_timestamp(ts: i64) -> String {
    match Utc.timestamp_opt(ts, 0).single() {
        Some(time) => format!("{} ({})", ts, time.format("%Y-%m-%d %H:%M:%S UTC")),
        None => ts.to_string(),
    }
}

pub fn show_unclaimed(snapshot: &Snapshot, now: Option<i64>, json: bool) -> Result<()> {
    let (global, user) = snapshot.volume_accumulators()?;
    let now = resolve_now(now);
    let unclaimed = total_unclaimed_tokens(global, user, now);

    if json {
        return display::print_json(&json!({
            "now": now,
            "total_unclaimed_tokens": unclaimed.to_string(),
            "total_claimed_tokens": user.total_claimed_tokens.to_string(),
        }));
    }

    display::header("Unclaimed Incentive Tokens");
    display::field("As Of", format_timestamp(now));
    display::field("User", user.user);
    display::field("Unclaimed", display::tokens(&unclaimed));
    display::field("Already Claimed", display::tokens(&user.total_claimed_tokens));
    Ok(())
}

pub fn show_today(snapshot: &Snapshot, now: Option<i64>, json: bool) -> Result<()> {
    let (global, user) = snapshot.volume_accumulators()?;
    let now = resolve_now(now);
    let today = current_day_tokens(global, user, now);

    if json {
        return display::print_json(&json!({
            "now": now,
            "current_day_tokens": today.to_string(),
            "current_sol_volume": user.current_sol_volume.to_string(),
        }));
    }

    display::header("Incentive Tokens Earned Today");
    display::field("As Of", format_timestamp(now));
    display::field("Incentive Window", format!(
        "{} → {}",
        format_timestamp(global.start_time),
        format_timestamp(global.end_time)
    ));
    display::field("SOL Volume Today", display::sol(&user.current_sol_volume));
    display::field("Earned Today", display::tokens(&today));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_now_wins() {
        assert_eq!(resolve_now(Some(1_700_000_000)), 1_700_000_000);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "0 (1970-01-01 00:00:00 UTC)");
    }
}
