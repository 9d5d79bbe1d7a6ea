use crate::prelude::*;

/// Key-value source of the parameter values bound by a test plan.
pub trait TestContext: Send + Sync {
    /// The value bound to `name`, if the test plan supplies one.
    fn raw_parameter(&self, name: &str) -> Option<String>;

    fn get_parameter(&self, name: &str, default: &str) -> String {
        self.raw_parameter(name)
            .unwrap_or_else(|| default.to_owned())
    }
}

/// A [`TestContext`] backed by an in-memory map.
#[derive(Debug, Clone, Default, PartialEq, Eq, From)]
pub struct MapTestContext(IndexMap<String, String>);

impl MapTestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to `name`, replacing any earlier binding.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapTestContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for MapTestContext {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl TestContext for MapTestContext {
    fn raw_parameter(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}
