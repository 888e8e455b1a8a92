use std::collections::HashMap;

/// Immutable key→value view of environment variables used for matching.
///
/// An absent key and an empty value are both "not set" for presence checks;
/// only [`Snapshot::contains`] tells them apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    vars: HashMap<String, String>,
}

impl Snapshot {
    /// Build a snapshot from `KEY=VALUE` strings.
    ///
    /// Splits on the first `=`. Entries without `=` are dropped and the last
    /// occurrence of a duplicate key wins.
    pub fn from_environ<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vars = entries
            .into_iter()
            .filter_map(|entry| {
                entry
                    .as_ref()
                    .split_once('=')
                    .map(|(k, v)| (k.to_string(), v.to_string()))
            })
            .collect();
        Self { vars }
    }

    /// Snapshot of the current process environment.
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Value for `key`, or the empty string when absent.
    pub fn value(&self, key: &str) -> &str {
        self.vars.get(key).map(String::as_str).unwrap_or("")
    }

    /// True when `key` is present with a non-empty value.
    pub fn is_set(&self, key: &str) -> bool {
        !self.value(key).is_empty()
    }

    /// True when `key` is present, even with an empty value.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Raw lookup distinguishing absent from empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for Snapshot {
    fn from(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }
}
