// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Finished documents, cached per caller-chosen namespace.
//!
//! One mutex guards every namespace, so a `get` and a `put` issued from
//! different threads never interleave.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lru::LruCache;

use crate::config::RichTextConfig;
use crate::document::RichTextDocument;

/// Which entry point a source string was given to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceFlavour {
    Plain,
    Html,
    Markdown,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub flavour: SourceFlavour,
    pub source: String,
}

impl CacheKey {
    pub fn new(flavour: SourceFlavour, source: &str) -> Self {
        Self {
            flavour,
            source: source.to_owned(),
        }
    }
}

type Namespaces = HashMap<String, LruCache<CacheKey, Arc<RichTextDocument>>>;

pub struct DocumentCache {
    capacity: NonZeroUsize,
    namespaces: Mutex<Namespaces>,
}

impl DocumentCache {
    pub fn new(config: &RichTextConfig) -> Self {
        Self::with_capacity(config.cache_capacity)
    }

    /// A cache keeping at most `capacity` documents in each namespace.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            namespaces: Mutex::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Look `key` up, marking it as the most recently used entry.
    pub fn get(
        &self,
        namespace: &str,
        key: &CacheKey,
    ) -> Option<Arc<RichTextDocument>> {
        self.lock().get_mut(namespace)?.get(key).cloned()
    }

    /// Store `document` under `key`, evicting the least recently used entry
    /// of a full namespace. `None` removes the key instead.
    pub fn put(
        &self,
        namespace: &str,
        key: CacheKey,
        document: Option<Arc<RichTextDocument>>,
    ) {
        let mut namespaces = self.lock();
        match document {
            Some(document) => {
                namespaces
                    .entry(namespace.to_owned())
                    .or_insert_with(|| LruCache::new(self.capacity))
                    .put(key, document);
            }
            None => {
                if let Some(cache) = namespaces.get_mut(namespace) {
                    cache.pop(&key);
                }
            }
        }
    }

    pub fn len(&self, namespace: &str) -> usize {
        self.lock().get(namespace).map_or(0, LruCache::len)
    }

    pub fn invalidate(&self, namespace: &str) {
        if let Some(cache) = self.lock().get_mut(namespace) {
            cache.clear();
        }
    }

    /// Drop every namespace's documents.
    pub fn invalidate_all(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Namespaces> {
        // Entries are only ever inserted whole; a poisoned map is consistent.
        self.namespaces.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new(&RichTextConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::attributed_text::AttributedText;

    fn doc(text: &str) -> Arc<RichTextDocument> {
        Arc::new(RichTextDocument::new(AttributedText::plain(text)))
    }

    fn key(source: &str) -> CacheKey {
        CacheKey::new(SourceFlavour::Plain, source)
    }

    #[test]
    fn a_full_namespace_evicts_the_least_recently_used_key() {
        let cache = DocumentCache::default();
        for i in 0..1001 {
            cache.put("timeline", key(&i.to_string()), Some(doc("x")));
        }
        assert_eq!(cache.len("timeline"), 1000);
        assert!(cache.get("timeline", &key("0")).is_none());
        assert!(cache.get("timeline", &key("1")).is_some());
        assert!(cache.get("timeline", &key("1000")).is_some());
    }

    #[test]
    fn reading_a_key_protects_it_from_eviction() {
        let cache = DocumentCache::with_capacity(NonZeroUsize::new(2).unwrap());
        cache.put("ns", key("a"), Some(doc("a")));
        cache.put("ns", key("b"), Some(doc("b")));
        cache.get("ns", &key("a"));
        cache.put("ns", key("c"), Some(doc("c")));
        assert!(cache.get("ns", &key("a")).is_some());
        assert!(cache.get("ns", &key("b")).is_none());
    }

    #[test]
    fn namespaces_and_flavours_are_independent() {
        let cache = DocumentCache::default();
        cache.put("timeline", key("hello"), Some(doc("hello")));
        assert!(cache.get("composer", &key("hello")).is_none());
        assert!(cache
            .get("timeline", &CacheKey::new(SourceFlavour::Html, "hello"))
            .is_none());
    }

    #[test]
    fn putting_none_removes_the_key() {
        let cache = DocumentCache::default();
        cache.put("ns", key("a"), Some(doc("a")));
        cache.put("ns", key("a"), None);
        assert!(cache.get("ns", &key("a")).is_none());
        assert_eq!(cache.len("ns"), 0);
    }

    #[test]
    fn invalidate_all_clears_every_namespace() {
        let cache = DocumentCache::default();
        cache.put("timeline", key("a"), Some(doc("a")));
        cache.put("composer", key("a"), Some(doc("a")));
        cache.invalidate_all();
        assert!(cache.get("timeline", &key("a")).is_none());
        assert!(cache.get("composer", &key("a")).is_none());
    }

    #[test]
    fn invalidating_one_namespace_keeps_the_others() {
        let cache = DocumentCache::default();
        cache.put("timeline", key("a"), Some(doc("a")));
        cache.put("composer", key("a"), Some(doc("a")));
        cache.invalidate("timeline");
        assert_eq!(cache.len("timeline"), 0);
        assert_eq!(cache.len("composer"), 1);
    }

    #[test]
    fn the_cache_can_be_shared_between_threads() {
        let cache = Arc::new(DocumentCache::default());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..100 {
                        let source = format!("{t}-{i}");
                        cache.put("ns", key(&source), Some(doc(&source)));
                        assert!(cache.get("ns", &key(&source)).is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len("ns"), 400);
    }
}
