//! Conversions between raw integer token units and human-readable amounts.
//!
//! Outbound amounts are always rounded toward zero (floor), never to the
//! nearest unit. Float arithmetic only appears on the human-readable side;
//! every value that reaches a settlement or an instruction is an integer.

pub const USDT_DECIMALS: u8 = 6;
pub const SOL_DECIMALS: u8 = 9;

/// Human-readable amount to base units, floored. Non-finite or non-positive
/// input maps to 0.
pub fn to_base_units(human: f64, decimals: u8) -> u64 {
    if !human.is_finite() || human <= 0.0 {
        return 0;
    }
    (human * 10f64.powi(decimals as i32)).floor() as u64
}

pub fn to_human(base_units: u64, decimals: u8) -> f64 {
    base_units as f64 / 10f64.powi(decimals as i32)
}

/// Rescale an integer amount between two token precisions. Scaling up is
/// exact; scaling down floors, so fractional dust is dropped deterministically.
/// An upscale that overflows `u64` saturates at `u64::MAX` rather than
/// wrapping; callers treat that as "amount too large to represent".
pub fn rescale(amount: u64, from_decimals: u8, to_decimals: u8) -> u64 {
    if to_decimals >= from_decimals {
        let factor = 10u128.pow((to_decimals - from_decimals) as u32);
        (amount as u128)
            .saturating_mul(factor)
            .min(u64::MAX as u128) as u64
    } else {
        amount / 10u64.pow((from_decimals - to_decimals) as u32)
    }
}
