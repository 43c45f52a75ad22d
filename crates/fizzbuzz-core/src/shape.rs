//! Request shape: the value that identifies one kind of fizzbuzz request.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::generator;

/// The five parameters of a fizzbuzz request.
///
/// Equality and hashing are structural over all five fields, which is what
/// makes it usable as the metrics key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestShape {
    pub int1: i64,
    pub int2: i64,
    pub limit: i64,
    pub str1: String,
    pub str2: String,
}

impl RequestShape {
    pub fn new(
        int1: i64,
        int2: i64,
        limit: i64,
        str1: impl Into<String>,
        str2: impl Into<String>,
    ) -> Self {
        Self {
            int1,
            int2,
            limit,
            str1: str1.into(),
            str2: str2.into(),
        }
    }

    /// Run the generator with this shape's parameters.
    pub fn generate(&self) -> Result<Vec<String>> {
        generator::generate(self.int1, self.int2, self.limit, &self.str1, &self.str2)
    }
}
