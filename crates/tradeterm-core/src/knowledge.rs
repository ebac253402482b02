//! Local knowledge base of trading terms.
//!
//! Built once at startup from loaded term records and read-only afterwards.

use crate::random::RandomSource;
use crate::text::title_case;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A raw term record as found in the terms file.
///
/// Both fields are optional so that partial records can be skipped
/// instead of rejecting the whole file.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TermRecord {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
}

impl TermRecord {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            definition: Some(definition.into()),
        }
    }
}

/// Mapping of lower-cased term to definition.
///
/// Keys are kept sorted, which fixes the order of [`KnowledgeBase::list_terms`]
/// and of the candidates seen by [`KnowledgeBase::pick_random`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    entries: BTreeMap<String, String>,
}

impl KnowledgeBase {
    /// Builds the knowledge base from records.
    ///
    /// Records missing either field, or with a blank term, are skipped.
    /// Terms are trimmed and lower-cased; collisions overwrite earlier ones.
    pub fn build(records: impl IntoIterator<Item = TermRecord>) -> Self {
        let mut entries = BTreeMap::new();
        for record in records {
            let (Some(term), Some(definition)) = (record.term, record.definition) else {
                continue;
            };
            let term = term.trim();
            if term.is_empty() {
                continue;
            }
            entries.insert(term.to_lowercase(), definition);
        }
        Self { entries }
    }

    /// Exact lookup by lower-cased key.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lower-cased keys in store order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Title-cased term names for display.
    pub fn list_terms(&self) -> Vec<String> {
        self.keys().map(title_case).collect()
    }

    /// Picks one key uniformly, or `None` when the store is empty.
    ///
    /// The random source is never consulted on an empty store.
    pub fn pick_random(&self, source: &mut dyn RandomSource) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let index = source.pick_index(self.entries.len());
        self.keys().nth(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedRandomSource;

    struct PanickingSource;

    impl RandomSource for PanickingSource {
        fn pick_index(&mut self, _len: usize) -> usize {
            panic!("random source must not be consulted");
        }
    }

    fn sample() -> KnowledgeBase {
        KnowledgeBase::build(vec![
            TermRecord::new("Pip", "Price Interest Point"),
            TermRecord::new("Leverage", "Borrowed capital"),
            TermRecord::new("Stop Loss", "An order to sell at a set price"),
        ])
    }

    #[test]
    fn test_build_lowercases_keys() {
        let kb = sample();
        assert_eq!(kb.len(), 3);
        assert_eq!(kb.lookup("pip"), Some("Price Interest Point"));
        assert_eq!(kb.lookup("stop loss"), Some("An order to sell at a set price"));
        assert_eq!(kb.lookup("Pip"), None, "lookup is exact on lower-cased keys");
    }

    #[test]
    fn test_build_skips_partial_records() {
        let kb = KnowledgeBase::build(vec![
            TermRecord {
                term: Some("spread".into()),
                definition: None,
            },
            TermRecord {
                term: None,
                definition: Some("orphan".into()),
            },
            TermRecord::new("   ", "blank term"),
            TermRecord::new("ask", "Lowest sell price"),
        ]);
        assert_eq!(kb.len(), 1);
        assert!(kb.contains("ask"));
        assert!(!kb.contains("spread"));
    }

    #[test]
    fn test_collision_last_wins() {
        let kb = KnowledgeBase::build(vec![
            TermRecord::new("PIP", "first"),
            TermRecord::new("pip", "second"),
        ]);
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.lookup("pip"), Some("second"));
    }

    #[test]
    fn test_build_trims_terms() {
        let kb = KnowledgeBase::build(vec![TermRecord::new("  Margin Call \n", "Top up funds")]);
        assert_eq!(kb.keys().collect::<Vec<_>>(), vec!["margin call"]);
        assert_eq!(kb.lookup("margin call"), Some("Top up funds"));
    }

    #[test]
    fn test_list_terms_title_cased_sorted() {
        assert_eq!(sample().list_terms(), vec!["Leverage", "Pip", "Stop Loss"]);
    }

    #[test]
    fn test_pick_random_uses_source() {
        let kb = sample();
        assert_eq!(kb.pick_random(&mut FixedRandomSource(1)), Some("pip"));
        assert_eq!(kb.pick_random(&mut FixedRandomSource(0)), Some("leverage"));
    }

    #[test]
    fn test_pick_random_empty_never_consults_source() {
        let kb = KnowledgeBase::default();
        assert_eq!(kb.pick_random(&mut PanickingSource), None);
    }
}
