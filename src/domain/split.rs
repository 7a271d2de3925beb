//! Revenue split calculation for subject sales.
//!
//! Pure arithmetic, no I/O. All amounts are integer points; rounding is
//! half-up, and any remainder always lands in the company cut so that
//! `teacher_cut + company_cut == total` holds exactly.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};

/// How a gross sale amount divides between instructors and the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub teacher_cut: u64,
    pub company_cut: u64,
    pub total: u64,
}

/// Compute the instructor/platform split for a gross amount.
///
/// `teacher_cut = round_half_up(gross * teacher_share_percent / 100)`,
/// `company_cut = gross - teacher_cut`.
///
/// # Errors
/// Returns `InvalidAmount` if `teacher_share_percent > 100`.
pub fn compute_split(gross: u64, teacher_share_percent: u8) -> Result<Split, LedgerError> {
    if teacher_share_percent > 100 {
        return Err(LedgerError::InvalidAmount(format!(
            "teacher share percent must be 0..=100, got {}",
            teacher_share_percent
        )));
    }

    // Integer half-up rounding: (g * p + 50) / 100.
    let teacher_cut = (gross * u64::from(teacher_share_percent) + 50) / 100;
    let company_cut = gross - teacher_cut;

    Ok(Split {
        teacher_cut,
        company_cut,
        total: gross,
    })
}

impl Split {
    /// Divide the teacher cut equally across `n` teachers.
    ///
    /// The integer-division remainder is assigned to the first-listed
    /// teacher, so the shares sum to `teacher_cut` exactly and the
    /// distribution is deterministic for a fixed assignment order.
    /// Returns an empty vector when `n == 0` (the whole cut then accrues
    /// to the company).
    pub fn per_teacher_shares(&self, n: usize) -> Vec<u64> {
        if n == 0 {
            return Vec::new();
        }
        let n64 = n as u64;
        let base = self.teacher_cut / n64;
        let remainder = self.teacher_cut % n64;

        let mut shares = vec![base; n];
        shares[0] += remainder;
        shares
    }
}
