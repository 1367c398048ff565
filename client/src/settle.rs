//! Reserve-constrained settlement: converts accrued days into an exact
//! gross/fee/user split, capped against the live vault balance.
//!
//! Both claim streams (invest and VIP) go through [`settle`] unchanged; only
//! the rate source and destination accounts differ. The VIP flow's
//! minimum-one-day floor is applied by its caller, never here.

use crate::error::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementResult {
    pub days_settled: u64,
    pub gross_units: u64,
    pub fee_units: u64,
    pub user_units: u64,
}

/// Settle up to `days_accrued` days at `units_per_day_gross` against a
/// reserve snapshot.
///
/// The result never exceeds the reserve snapshot, and the split is exact:
/// `fee = gross / 3` (floored), `user = gross - fee`. Pure over its inputs;
/// callers must re-read the reserve immediately before calling to keep the
/// snapshot fresh.
pub fn settle(
    units_per_day_gross: u64,
    days_accrued: u64,
    reserve_units: u64,
) -> Result<SettlementResult, DashboardError> {
    if units_per_day_gross == 0 {
        return Err(DashboardError::ZeroRate);
    }
    if days_accrued == 0 {
        return Err(DashboardError::NothingAccrued);
    }
    if reserve_units == 0 {
        return Err(DashboardError::EmptyReserve);
    }

    let wanted_gross = units_per_day_gross as u128 * days_accrued as u128;
    let days_settled = if (reserve_units as u128) < wanted_gross {
        let capped_days = reserve_units / units_per_day_gross;
        if capped_days == 0 {
            return Err(DashboardError::InsufficientReserve);
        }
        days_accrued.min(capped_days)
    } else {
        days_accrued
    };

    // days_settled is capped so the product fits u64 and stays <= reserve.
    let gross_units = units_per_day_gross * days_settled;
    let fee_units = gross_units / 3;
    let user_units = gross_units - fee_units;

    Ok(SettlementResult {
        days_settled,
        gross_units,
        fee_units,
        user_units,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_accrual_fits_reserve() {
        let s = settle(1000, 5, 10_000).unwrap();
        assert_eq!(s.days_settled, 5);
        assert_eq!(s.gross_units, 5000);
        assert_eq!(s.fee_units, 1666);
        assert_eq!(s.user_units, 3334);
    }

    #[test]
    fn reserve_caps_days() {
        let s = settle(1000, 10, 4500).unwrap();
        assert_eq!(s.days_settled, 4);
        assert_eq!(s.gross_units, 4000);
        assert_eq!(s.fee_units, 1333);
        assert_eq!(s.user_units, 2667);
    }

    #[test]
    fn empty_reserve_fails() {
        assert_eq!(settle(1000, 3, 0), Err(DashboardError::EmptyReserve));
    }

    #[test]
    fn reserve_below_one_day_fails() {
        assert_eq!(
            settle(1000, 3, 999),
            Err(DashboardError::InsufficientReserve)
        );
    }

    #[test]
    fn zero_rate_fails_before_reserve_checks() {
        assert_eq!(settle(0, 5, 10_000), Err(DashboardError::ZeroRate));
        assert_eq!(settle(0, 5, 0), Err(DashboardError::ZeroRate));
    }

    #[test]
    fn zero_days_fails() {
        assert_eq!(settle(1000, 0, 10_000), Err(DashboardError::NothingAccrued));
    }

    #[test]
    fn split_is_exact_and_bounded_by_reserve() {
        for (rate, days, reserve) in [
            (1u64, 1u64, 1u64),
            (7, 13, 50),
            (1000, 10, 4500),
            (333_333, 400, 1_000_000),
            (u64::MAX / 8, 16, u64::MAX),
        ] {
            let s = settle(rate, days, reserve).unwrap();
            assert_eq!(s.fee_units + s.user_units, s.gross_units);
            assert_eq!(s.gross_units, rate * s.days_settled);
            assert!(s.gross_units <= reserve);
            assert!(s.days_settled >= 1 && s.days_settled <= days);
        }
    }

    #[test]
    fn idempotent_over_identical_snapshots() {
        let a = settle(250_000, 9, 2_000_000).unwrap();
        let b = settle(250_000, 9, 2_000_000).unwrap();
        assert_eq!(a, b);
    }
}
