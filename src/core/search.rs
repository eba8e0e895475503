//! # Search
//!
//! Case- and diacritic-insensitive substring filter over the catalog.
//!
//! The haystack for each nerve is `common_name + " " + specific_region`,
//! normalized once when the engine is built. Each query is normalized the
//! same way and matched with `str::contains`, so results keep catalog order.
//! A query that is empty after trimming matches nothing.

use std::sync::Arc;

use log::debug;
use unicode_normalization::UnicodeNormalization;

use crate::core::catalog::{NerveCatalog, NerveRecord};
use crate::core::notify::{SubscriberId, Subscribers};

/// Lowercase, decompose (NFD), then drop combining diacritical marks
/// (U+0300..=U+036F).
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

fn haystack(nerve: &NerveRecord) -> String {
    format!(
        "{} {}",
        nerve.common_name,
        nerve.specific_region.as_deref().unwrap_or("")
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Stored verbatim, including surrounding whitespace.
    pub query: String,
    /// Indices into the catalog, ascending.
    pub results: Vec<usize>,
}

/// Payload delivered to search subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEvent {
    pub query: String,
    pub result_count: usize,
}

#[derive(Debug)]
pub struct SearchEngine {
    catalog: Arc<NerveCatalog>,
    haystacks: Vec<String>,
    state: SearchState,
    subscribers: Subscribers<SearchEvent>,
}

impl SearchEngine {
    pub fn new(catalog: Arc<NerveCatalog>) -> Self {
        let haystacks = catalog.all().iter().map(|n| normalize(&haystack(n))).collect();
        Self {
            catalog,
            haystacks,
            state: SearchState::default(),
            subscribers: Subscribers::new(),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.state.results = self.matches(&query);
        self.state.query = query;
        debug!(
            "Search '{}' matched {} nerves",
            self.state.query,
            self.state.results.len()
        );
        self.subscribers.notify(&SearchEvent {
            query: self.state.query.clone(),
            result_count: self.state.results.len(),
        });
    }

    pub fn clear(&mut self) {
        self.set_query("");
    }

    pub fn results(&self) -> Vec<&NerveRecord> {
        self.state
            .results
            .iter()
            .map(|&i| &self.catalog.all()[i])
            .collect()
    }

    /// The `index`-th match, in catalog order.
    pub fn result(&self, index: usize) -> Option<&NerveRecord> {
        self.state
            .results
            .get(index)
            .map(|&i| &self.catalog.all()[i])
    }

    pub fn result_count(&self) -> usize {
        self.state.results.len()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SearchEvent) + 'static) -> SubscriberId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn matches(&self, query: &str) -> Vec<usize> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let needle = normalize(query);
        self.haystacks
            .iter()
            .enumerate()
            .filter(|(_, hay)| hay.contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine() -> SearchEngine {
        SearchEngine::new(Arc::new(NerveCatalog::embedded().unwrap()))
    }

    fn names(engine: &SearchEngine) -> Vec<String> {
        engine
            .results()
            .iter()
            .map(|n| n.common_name.clone())
            .collect()
    }

    #[test]
    fn test_normalize_strips_diacritics() {
        assert_eq!(normalize("Muñeca"), "muneca");
        assert_eq!(normalize("TORÁCICO"), "toracico");
        assert_eq!(normalize("Trigémino"), "trigemino");
    }

    #[test]
    fn test_query_is_stored_verbatim() {
        let mut engine = engine();
        engine.set_query("  Ulnar ");
        assert_eq!(engine.query(), "  Ulnar ");
    }

    #[test]
    fn test_blank_query_has_no_results() {
        let mut engine = engine();
        for q in ["", " ", "\t\n"] {
            engine.set_query(q);
            assert_eq!(engine.result_count(), 0, "query {q:?}");
        }
    }

    #[test]
    fn test_diacritic_insensitive() {
        let mut engine = engine();
        engine.set_query("mediano");
        let plain = names(&engine);
        engine.set_query("mediáno");
        let accented = names(&engine);
        assert_eq!(plain, accented);
        assert_eq!(plain, vec!["Nervio Mediano"]);
    }

    #[test]
    fn test_specific_region_is_searched() {
        let mut engine = engine();
        engine.set_query("muneca");
        let found = names(&engine);
        assert!(found.contains(&"Nervio Mediano".to_string()));
        assert!(found.contains(&"Nervio Ulnar".to_string()));
    }

    #[test]
    fn test_results_keep_catalog_order() {
        let mut engine = engine();
        engine.set_query("nervio");
        assert_eq!(engine.result_count(), engine.catalog.len());
        let ids: Vec<&str> = engine.results().iter().map(|n| n.id.as_str()).collect();
        let catalog_ids: Vec<&str> = engine.catalog.all().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, catalog_ids);
    }

    #[test]
    fn test_set_query_is_idempotent() {
        let mut engine = engine();
        engine.set_query("peroneo");
        let first = engine.state().clone();
        engine.set_query("peroneo");
        assert_eq!(engine.state(), &first);
    }

    #[test]
    fn test_every_nerve_found_by_its_own_fields() {
        let mut engine = engine();
        let catalog = Arc::clone(&engine.catalog);
        for nerve in catalog.all() {
            engine.set_query(nerve.common_name.as_str());
            assert!(
                engine.results().iter().any(|n| n.id == nerve.id),
                "{} not found by name",
                nerve.id
            );
            if let Some(specific) = &nerve.specific_region {
                engine.set_query(specific.as_str());
                assert!(engine.results().iter().any(|n| n.id == nerve.id));
            }
        }
    }

    #[test]
    fn test_result_by_index_and_clear() {
        let mut engine = engine();
        engine.set_query("peroneo");
        assert_eq!(engine.result(0).unwrap().id, "peroneal-ankle");
        assert_eq!(engine.result(1).unwrap().id, "superficial-peroneal");
        assert!(engine.result(2).is_none());

        engine.clear();
        assert_eq!(engine.query(), "");
        assert!(engine.result(0).is_none());
    }

    #[test]
    fn test_subscribers_get_query_and_count() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut engine = engine();
        let sink = events.clone();
        engine.subscribe(move |e: &SearchEvent| sink.borrow_mut().push(e.clone()));

        engine.set_query("ulnar");
        engine.clear();

        let events = events.borrow();
        assert_eq!(
            events[0],
            SearchEvent {
                query: "ulnar".to_string(),
                result_count: 1
            }
        );
        assert_eq!(events[1].result_count, 0);
    }
}
