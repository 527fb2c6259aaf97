//! Monetary cell normalization.
//!
//! Exports mix formats freely: `"Rp1.234.567"`, `"1,234,567"`, plain numbers,
//! and placeholder text. Digit-stripping is the only normalization robust to
//! all of them; amounts in this domain are whole-unit, so fractions are not
//! preserved.

use crate::model::Cell;

/// Strict normalization for the cleaning pipeline: a cell with no digits at
/// all is placeholder text, not a legitimate zero, and the row is discarded.
pub fn normalize_strict(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Empty => None,
        Cell::Int(v) => Some(*v),
        // Numeric cells keep their sign; negative amounts are dropped later.
        Cell::Float(v) => Some(v.trunc() as i64),
        Cell::Text(s) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                return None;
            }
            // A digit run too long for i64 is garbage, not money.
            digits.parse().ok()
        }
    }
}

/// Lenient normalization for aggregate contexts: absent or digit-free input
/// counts as zero rather than an error.
pub fn normalize(cell: &Cell) -> i64 {
    normalize_strict(cell).unwrap_or(0)
}
