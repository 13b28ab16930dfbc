use core::fmt;
use std::collections::HashMap;

use crate::value::AnyValue;

/// The values a successful parse produced, keyed by destination name.
///
/// Every option with a default and every flag has an entry, whether or not
/// it appeared. Named optional arguments without a default only have one if
/// they appeared.
#[derive(Default)]
pub struct Matches {
    values: HashMap<String, AnyValue>,
}

impl Matches {
    pub(super) fn new(values: HashMap<String, AnyValue>) -> Self {
        Self { values }
    }

    /// Remove and return the value for `dest`
    pub fn take(&mut self, dest: &str) -> Option<AnyValue> {
        self.values.remove(dest)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, dest: &str) -> bool {
        self.values.contains_key(dest)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Matches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();

        f.debug_set().entries(keys).finish()
    }
}
