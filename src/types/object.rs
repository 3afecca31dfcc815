use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Typed attribute values resolved onto one model object.
///
/// Callers request the integer/float/string buckets independently; an
/// attribute lives in exactly the bucket matching its definition kind
/// (enum values land in `strings`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub integers: BTreeMap<String, i64>,
    pub floats: BTreeMap<String, f32>,
    pub strings: BTreeMap<String, String>,
}

impl Attributes {
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.integers.get(name).copied()
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.strings.get(name).map(String::as_str)
    }
}
