//! Thread-local compiled-query cache.
//!
//! Pack queries are compiled once per thread and grammar and reused by every
//! resolution. Cache is capped at 256 entries; it is cleared when full.

use crate::lang::Grammar;
use crate::ts::{QueryEngine, TreeSitterError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

const MAX_CACHE_ENTRIES: usize = 256;

thread_local! {
    // Keyed by grammar as well: the same query text means different node
    // types under different grammars.
    static QUERY_CACHE: RefCell<HashMap<(Grammar, String), Rc<QueryEngine>>> =
        RefCell::new(HashMap::new());
}

/// Get a compiled query from cache, or compile and cache it.
///
/// Failed compilations are not cached.
pub fn get_or_compile_query(
    grammar: Grammar,
    source: &str,
) -> Result<Rc<QueryEngine>, TreeSitterError> {
    let key = (grammar, source.to_string());

    if let Some(engine) = QUERY_CACHE.with(|cache| cache.borrow().get(&key).cloned()) {
        return Ok(engine);
    }

    let engine = Rc::new(QueryEngine::compile(grammar, source)?);

    QUERY_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.len() >= MAX_CACHE_ENTRIES {
            tracing::debug!(entries = cache.len(), "query cache full, clearing");
            cache.clear();
        }
        cache.insert(key, Rc::clone(&engine));
    });

    Ok(engine)
}

/// Clear the query cache (mainly for testing).
pub fn clear_cache() {
    QUERY_CACHE.with(|cache| cache.borrow_mut().clear());
}

/// Number of cached queries on this thread.
pub fn cache_size() -> usize {
    QUERY_CACHE.with(|cache| cache.borrow().len())
}
