use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use catalogd_core::Product;

/// Immutable product list as visible to queries at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    generation: u64,
    loaded_at: DateTime<Utc>,
    products: Vec<Product>,
}

impl CatalogSnapshot {
    fn new(generation: u64, products: Vec<Product>) -> Self {
        Self {
            generation,
            loaded_at: Utc::now(),
            products,
        }
    }

    /// Number of `replace` calls that led to this snapshot (0 = never loaded).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// First product with the given id, in snapshot order.
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == id)
    }
}

/// Holder of the current catalog snapshot.
///
/// Readers clone an `Arc` under a read lock and work on the immutable list
/// without holding anything; writers only swap the pointer. The lock is never
/// held across IO or parsing.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    /// An empty store at generation 0.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(CatalogSnapshot::new(0, Vec::new()))),
        }
    }

    /// A store already holding `products` at generation 1.
    pub fn with_products(products: Vec<Product>) -> Self {
        let store = Self::new();
        store.replace(products);
        store
    }

    /// Current snapshot. O(1); never observes a half-installed list.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Atomically install `products` as the current catalog.
    ///
    /// An empty list is accepted and yields an empty catalog. Returns the new
    /// generation.
    pub fn replace(&self, products: Vec<Product>) -> u64 {
        let previous = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            let next = Arc::new(CatalogSnapshot::new(current.generation + 1, products));
            std::mem::replace(&mut *current, next)
        };

        // The superseded list is freed here (or by its last reader), outside the lock.
        let generation = previous.generation + 1;
        drop(previous);
        generation
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn tagged(tag: &str, n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| Product::new(format!("{tag}-{i}"), tag, format!("{tag} product {i}")))
            .collect()
    }

    #[test]
    fn new_store_is_empty_and_unloaded() {
        let store = CatalogStore::new();
        let snap = store.snapshot();
        assert!(snap.is_empty());
        assert_eq!(snap.generation(), 0);
    }

    #[test]
    fn replace_bumps_generation() {
        let store = CatalogStore::new();
        assert_eq!(store.replace(tagged("a", 2)), 1);
        assert_eq!(store.replace(tagged("b", 3)), 2);

        let snap = store.snapshot();
        assert_eq!(snap.generation(), 2);
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn replace_with_empty_list_is_legal() {
        let store = CatalogStore::with_products(tagged("a", 2));
        store.replace(Vec::new());

        let snap = store.snapshot();
        assert!(snap.is_empty());
        assert_eq!(snap.generation(), 2);
    }

    #[test]
    fn old_snapshot_stays_readable_after_replace() {
        let store = CatalogStore::with_products(tagged("a", 2));
        let before = store.snapshot();

        store.replace(tagged("b", 5));

        assert_eq!(before.len(), 2);
        assert!(before.products().iter().all(|p| p.name() == "a"));
        assert_eq!(store.snapshot().len(), 5);
    }

    #[test]
    fn find_returns_first_match() {
        let store = CatalogStore::with_products(vec![
            Product::new("1", "First", "first copy"),
            Product::new("2", "Other", "other"),
            Product::new("1", "Second", "second copy"),
        ]);

        let snap = store.snapshot();
        assert_eq!(snap.find("1").map(Product::name), Some("First"));
        assert!(snap.find("99").is_none());
    }

    #[test]
    fn readers_see_whole_snapshots_only() {
        let store = Arc::new(CatalogStore::with_products(tagged("a", 50)));

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    let (tag, n) = if i % 2 == 0 { ("b", 80) } else { ("a", 50) };
                    store.replace(tagged(tag, n));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let snap = store.snapshot();
                        let tag = snap.products()[0].name().to_string();
                        let expected = if tag == "a" { 50 } else { 80 };
                        assert_eq!(snap.len(), expected);
                        assert!(snap.products().iter().all(|p| p.name() == tag));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(store.snapshot().generation(), 201);
    }
}
