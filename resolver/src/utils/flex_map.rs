use std::collections::HashMap;

/// The characters of `s` that take part in a flexible comparison, lowercased.
fn significant_chars(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
}

pub(crate) fn flex_eq(a: &str, b: &str) -> bool {
    significant_chars(a).eq(significant_chars(b))
}

/// Lookup by name that tolerates differences in case and punctuation, e.g. `ACCOUNTS` finds
/// `accounts` and `affiliatedWith` finds `affiliated_with`.
pub trait FlexMap<T> {
    fn flex_get(&self, key: &str) -> Option<&T>;
}

impl<T> FlexMap<T> for HashMap<String, T> {
    fn flex_get(&self, search_key: &str) -> Option<&T> {
        if let Some(value) = self.get(search_key) {
            return Some(value);
        }
        let mut matches = self
            .iter()
            .filter(|(key, _)| flex_eq(key, search_key))
            .map(|(_, value)| value);
        let first = matches.next()?;
        // A second match makes the key ambiguous
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }
}
