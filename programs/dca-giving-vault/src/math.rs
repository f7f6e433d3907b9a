use anchor_lang::prelude::*;

use crate::constants::MAX_BPS;
use crate::errors::VaultError;

/// floor(amount * bps / 10000)
pub fn apply_bps(amount: u64, bps: u64) -> Result<u64> {
    let scaled = (amount as u128)
        .checked_mul(bps as u128)
        .ok_or(VaultError::MathOverflow)?
        / MAX_BPS as u128;
    u64::try_from(scaled).map_err(|_| error!(VaultError::MathOverflow))
}

/// floor(total * part / whole); zero when `whole` is zero
pub fn pro_rata(total: u64, part: u64, whole: u64) -> Result<u64> {
    if whole == 0 {
        return Ok(0);
    }
    let share = (total as u128)
        .checked_mul(part as u128)
        .ok_or(VaultError::MathOverflow)?
        / whole as u128;
    u64::try_from(share).map_err(|_| error!(VaultError::MathOverflow))
}

pub fn checked_add(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b).ok_or_else(|| error!(VaultError::MathOverflow))
}

pub fn checked_sub(a: u64, b: u64) -> Result<u64> {
    a.checked_sub(b).ok_or_else(|| error!(VaultError::MathOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_bps_floors() {
        assert_eq!(apply_bps(1_000, 1_000).unwrap(), 100);
        assert_eq!(apply_bps(999, 100).unwrap(), 9);
        assert_eq!(apply_bps(10_000, 100).unwrap(), 100);
        assert_eq!(apply_bps(0, 2_000).unwrap(), 0);
    }

    #[test]
    fn test_apply_bps_large_amount() {
        // u64::MAX * 10000 fits in u128, result stays <= amount
        assert_eq!(apply_bps(u64::MAX, MAX_BPS).unwrap(), u64::MAX);
    }

    #[test]
    fn test_pro_rata() {
        assert_eq!(pro_rata(10_000, 60_000, 100_000).unwrap(), 6_000);
        assert_eq!(pro_rata(10_000, 40_000, 100_000).unwrap(), 4_000);
        assert_eq!(pro_rata(10, 1, 3).unwrap(), 3);
        assert_eq!(pro_rata(10_000, 5, 0).unwrap(), 0);
    }

    #[test]
    fn test_pro_rata_overflowing_result() {
        // part > whole can push the quotient past u64
        assert!(pro_rata(u64::MAX, 2, 1).is_err());
    }

    #[test]
    fn test_checked_helpers() {
        assert_eq!(checked_add(1, 2).unwrap(), 3);
        assert!(checked_add(u64::MAX, 1).is_err());
        assert!(checked_sub(1, 2).is_err());
    }
}
