//! Sequence generator.
//!
//! For every `i` in `1..=limit`:
//! - multiples of both divisors become `str1` followed by `str2`
//! - multiples of `int1` only become `str1`
//! - multiples of `int2` only become `str2`
//! - everything else is the decimal form of `i`

use crate::error::{FizzBuzzError, Result};

/// Build the substituted sequence for `1..=limit`.
///
/// A zero divisor is rejected before any work is done. A zero or negative
/// `limit` yields an empty sequence. A `limit` whose output cannot be
/// allocated is rejected with `LimitTooLarge` instead of aborting.
pub fn generate(int1: i64, int2: i64, limit: i64, str1: &str, str2: &str) -> Result<Vec<String>> {
    if int1 == 0 || int2 == 0 {
        return Err(FizzBuzzError::DivisionByZero);
    }
    if limit <= 0 {
        return Ok(Vec::new());
    }

    let len = usize::try_from(limit).map_err(|_| FizzBuzzError::LimitTooLarge(limit))?;
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| FizzBuzzError::LimitTooLarge(limit))?;

    let both = format!("{str1}{str2}");
    for i in 1..=limit {
        out.push(match (i % int1 == 0, i % int2 == 0) {
            (true, true) => both.clone(),
            (true, false) => str1.to_owned(),
            (false, true) => str2.to_owned(),
            (false, false) => i.to_string(),
        });
    }

    Ok(out)
}
