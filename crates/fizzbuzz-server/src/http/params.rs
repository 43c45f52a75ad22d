//! Query parameter validation for `/fizzbuzz`.

use fizzbuzz_core::error::{FizzBuzzError, Result};
use fizzbuzz_core::RequestShape;

/// Raw fizzbuzz query values. Absent keys read as empty strings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FizzBuzzParams {
    pub int1: String,
    pub int2: String,
    pub limit: String,
    pub str1: String,
    pub str2: String,
}

impl FizzBuzzParams {
    /// Collect known keys from decoded query pairs. The first occurrence of a
    /// repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut seen = [false; 5];
        let mut out = Self::default();

        for (k, v) in pairs {
            let (idx, slot) = match k.as_str() {
                "int1" => (0, &mut out.int1),
                "int2" => (1, &mut out.int2),
                "limit" => (2, &mut out.limit),
                "str1" => (3, &mut out.str1),
                "str2" => (4, &mut out.str2),
                _ => continue,
            };
            if !seen[idx] {
                seen[idx] = true;
                *slot = v;
            }
        }

        out
    }

    /// Validate in the order clients rely on, stopping at the first failure.
    pub fn into_shape(self, max_limit: Option<i64>) -> Result<RequestShape> {
        let int1 = parse_int(&self.int1, "int1")?;
        let int2 = parse_int(&self.int2, "int2")?;
        let limit = parse_int(&self.limit, "limit")?;

        if let Some(max) = max_limit {
            if limit > max {
                return Err(FizzBuzzError::validation(format!(
                    "limit exceeds maximum of {max}"
                )));
            }
        }

        if self.str1.is_empty() {
            return Err(FizzBuzzError::validation("missing required parameter str1"));
        }
        if self.str2.is_empty() {
            return Err(FizzBuzzError::validation("missing required parameter str2"));
        }

        Ok(RequestShape {
            int1,
            int2,
            limit,
            str1: self.str1,
            str2: self.str2,
        })
    }
}

fn parse_int(raw: &str, name: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| FizzBuzzError::validation(format!("error parsing {name}")))
}
