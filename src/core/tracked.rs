//! The ordered set of currencies a user is watching.

use crate::core::catalog::CurrencyRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedCurrency {
    pub record: &'static CurrencyRecord,
    /// Units of this currency per 1 unit of the active base. `None` until fetched.
    pub rate: Option<f64>,
    pub is_favorite: bool,
}

impl TrackedCurrency {
    pub fn new(record: &'static CurrencyRecord) -> Self {
        Self {
            record,
            rate: None,
            is_favorite: false,
        }
    }

    pub fn code(&self) -> &'static str {
        self.record.code
    }
}

/// Tracked currencies in insertion order, at most one entry per code.
#[derive(Debug, Clone, Default)]
pub struct TrackedList {
    entries: Vec<TrackedCurrency>,
}

impl TrackedList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` with no rate. Returns false if the code is already tracked.
    pub fn add(&mut self, record: &'static CurrencyRecord) -> bool {
        if self.contains(record.code) {
            return false;
        }
        self.entries.push(TrackedCurrency::new(record));
        true
    }

    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.code() != code);
        self.entries.len() != before
    }

    /// Flips the favorite flag, returning the new value if the code is tracked.
    pub fn toggle_favorite(&mut self, code: &str) -> Option<bool> {
        self.entries
            .iter_mut()
            .find(|entry| entry.code() == code)
            .map(|entry| {
                entry.is_favorite = !entry.is_favorite;
                entry.is_favorite
            })
    }

    /// Display order: favorites first, otherwise insertion order.
    pub fn sorted_view(&self) -> Vec<&TrackedCurrency> {
        let mut view: Vec<&TrackedCurrency> = self.entries.iter().collect();
        view.sort_by_key(|entry| !entry.is_favorite);
        view
    }

    pub fn get(&self, code: &str) -> Option<&TrackedCurrency> {
        self.entries.iter().find(|entry| entry.code() == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn has_missing_rates(&self) -> bool {
        self.entries.iter().any(|entry| entry.rate.is_none())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedCurrency> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrackedCurrency> {
        self.entries.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;

    fn list_of(codes: &[&str]) -> TrackedList {
        let mut list = TrackedList::new();
        for code in codes {
            assert!(list.add(catalog::lookup(code).unwrap()));
        }
        list
    }

    fn codes(view: &[&TrackedCurrency]) -> Vec<&'static str> {
        view.iter().map(|entry| entry.code()).collect()
    }

    #[test]
    fn test_add_appends_without_rate() {
        let list = list_of(&["EUR", "GBP"]);
        assert_eq!(list.len(), 2);
        let gbp = list.get("GBP").unwrap();
        assert_eq!(gbp.rate, None);
        assert!(!gbp.is_favorite);
        assert!(list.has_missing_rates());
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut list = list_of(&["EUR"]);
        assert!(!list.add(catalog::lookup("EUR").unwrap()));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_add_remove_sequences_never_duplicate() {
        let mut list = TrackedList::new();
        let ops = ["EUR", "GBP", "EUR", "-EUR", "EUR", "JPY", "GBP", "-GBP", "-XYZ", "GBP"];
        for op in ops {
            match op.strip_prefix('-') {
                Some(code) => {
                    list.remove(code);
                }
                None => {
                    list.add(catalog::lookup(op).unwrap());
                }
            }
            let mut seen: Vec<_> = list.iter().map(|e| e.code()).collect();
            let total = seen.len();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), total, "duplicate after {op}");
        }
        assert_eq!(codes(&list.iter().collect::<Vec<_>>()), vec!["EUR", "JPY", "GBP"]);
    }

    #[test]
    fn test_remove_unknown_code_is_noop() {
        let mut list = list_of(&["EUR"]);
        assert!(!list.remove("GBP"));
        assert!(list.remove("EUR"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_toggle_favorite_keeps_rate() {
        let mut list = list_of(&["EUR"]);
        list.iter_mut().for_each(|entry| entry.rate = Some(0.92));

        assert_eq!(list.toggle_favorite("EUR"), Some(true));
        assert_eq!(list.get("EUR").unwrap().rate, Some(0.92));
        assert_eq!(list.toggle_favorite("EUR"), Some(false));
        assert_eq!(list.toggle_favorite("GBP"), None);
    }

    #[test]
    fn test_sorted_view_puts_favorites_first_and_is_stable() {
        let mut list = list_of(&["EUR", "GBP", "JPY", "AUD", "CAD"]);
        list.toggle_favorite("JPY");
        list.toggle_favorite("CAD");

        let view = list.sorted_view();
        assert_eq!(codes(&view), vec!["JPY", "CAD", "EUR", "GBP", "AUD"]);

        let first_plain = view.iter().position(|e| !e.is_favorite).unwrap();
        assert!(view[first_plain..].iter().all(|e| !e.is_favorite));
    }

    #[test]
    fn test_sorted_view_is_idempotent() {
        let mut list = list_of(&["EUR", "GBP", "JPY"]);
        list.toggle_favorite("GBP");

        let mut resorted = TrackedList::new();
        for entry in list.sorted_view() {
            resorted.add(entry.record);
            if entry.is_favorite {
                resorted.toggle_favorite(entry.code());
            }
        }

        assert_eq!(codes(&resorted.sorted_view()), codes(&list.sorted_view()));
    }
}
