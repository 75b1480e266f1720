use std::fmt;

/// Current readings returned by a plugin, keyed by field name.
///
/// Entries keep the order in which they were first inserted; that order is the order in
/// which `<field>.value` lines are printed.
///
/// # Example
///
/// ```rust
/// use munin_plugin::data::Values;
///
/// let values = Values::new().with("count", 5).with("ratio", 0.25);
/// assert_eq!(values.get("count"), Some("5"));
///
/// let collected: Values = [("a", 1), ("b", 2)].into_iter().collect();
/// assert_eq!(collected.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Values {
    entries: Vec<(String, String)>,
}

impl Values {
    /// Create an empty set of values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these values with `name` set to `value`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.insert(name, value);
        self
    }

    /// Set the value for `name`.
    ///
    /// If `name` is already present its value is replaced, keeping its position, and the
    /// previous value is returned.
    pub fn insert(&mut self, name: impl Into<String>, value: impl fmt::Display) -> Option<String> {
        let name = name.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// The rendered value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// The number of values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no values.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Values
where
    K: Into<String>,
    V: fmt::Display,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut values = Self::new();
        values.extend(iter);
        values
    }
}

impl<K, V> Extend<(K, V)> for Values
where
    K: Into<String>,
    V: fmt::Display,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}
