//! Volume based incentive token accrual
//!
//! Each day the protocol distributes a fixed token supply pro rata to
//! the SOL volume users traded that day. A user's share for a day is
//! `user_volume * day_supply / day_volume`, settled lazily the next
//! time the user's accumulator is touched.
//!
//! Timestamps are unix seconds supplied by the caller.

use num_traits::Zero;

use crate::{Amount, GlobalVolumeAccumulator, UserVolumeAccumulator};

/// Day indices relevant to one user at `now`
struct DayWindow {
    current: usize,
    last_updated: usize,
    end: usize,
}

impl DayWindow {
    /// `None` whenever the accumulators can't be placed on the day grid
    fn new(global: &GlobalVolumeAccumulator, user: &UserVolumeAccumulator, now: i64) -> Option<Self> {
        let GlobalVolumeAccumulator {
            start_time,
            end_time,
            seconds_in_a_day,
            ..
        } = *global;

        if start_time == 0 || end_time == 0 || seconds_in_a_day <= 0 {
            return None;
        }
        if now < start_time || user.last_update_timestamp < start_time || end_time < start_time {
            return None;
        }

        let day_index =
            |ts: i64| usize::try_from(ts.checked_sub(start_time)? / seconds_in_a_day).ok();

        Some(Self {
            current: day_index(now)?,
            last_updated: day_index(user.last_update_timestamp)?,
            end: day_index(end_time)?,
        })
    }
}

/// User's pro rata share of day `day`, `None` if the day has no data
fn day_share(global: &GlobalVolumeAccumulator, user: &UserVolumeAccumulator, day: usize) -> Option<Amount> {
    let supply = global.total_token_supply.get(day)?;
    let volume = global.sol_volumes.get(day)?;
    if volume.is_zero() {
        return None;
    }
    Some(&user.current_sol_volume * supply / volume)
}

/// Tokens the user could claim at `now`.
///
/// Adds the share for the user's last active day once that day has
/// closed; otherwise returns the already settled unclaimed balance.
pub fn total_unclaimed_tokens(
    global: &GlobalVolumeAccumulator,
    user: &UserVolumeAccumulator,
    now: i64,
) -> Amount {
    let settled = user.total_unclaimed_tokens.clone();

    let Some(window) = DayWindow::new(global, user, now) else {
        return settled;
    };

    if window.current > window.last_updated && window.last_updated <= window.end {
        if let Some(share) = day_share(global, user, window.last_updated) {
            return settled + share;
        }
    }

    settled
}

/// Tokens the user has earned so far today, not yet settled.
///
/// Zero outside the incentive window or if the user has not traded today.
pub fn current_day_tokens(
    global: &GlobalVolumeAccumulator,
    user: &UserVolumeAccumulator,
    now: i64,
) -> Amount {
    if now > global.end_time {
        return Amount::zero();
    }

    let Some(window) = DayWindow::new(global, user, now) else {
        return Amount::zero();
    };

    if window.current != window.last_updated {
        return Amount::zero();
    }

    day_share(global, user, window.current).unwrap_or_default()
}
