//! Per-stream accrual clock: whole days elapsed since the last claim.

pub const SECS_PER_DAY: i64 = 86_400;

/// Whole days accrued since the last claim recorded on chain.
///
/// A missing or zero timestamp means the account has never claimed; the
/// baseline is then `now - 86_400`, so a fresh account starts with exactly
/// one day accrued. Clamped at zero when `now` is not past the baseline.
pub fn elapsed_days(last_claim_ts: Option<i64>, now: i64) -> u64 {
    let baseline = match last_claim_ts {
        Some(ts) if ts != 0 => ts,
        _ => now - SECS_PER_DAY,
    };
    if now > baseline {
        ((now - baseline) / SECS_PER_DAY) as u64
    } else {
        0
    }
}
