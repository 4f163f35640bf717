/// Rendered-view cache
///
/// Views are cached per logical path (e.g. `/dashboard/invoices`) and, under
/// each path, per variant (the query string that produced the rendering).
/// Invalidating a path drops every variant so the next request recomputes
/// it. Invalidating a path that holds nothing is a no-op.
///
/// Each path keeps at most [`MAX_VARIANTS_PER_PATH`] variants; storing one
/// more evicts the oldest.
///
/// # Example
///
/// ```
/// use invoicedesk_shared::cache::{RenderCache, ViewCache};
///
/// let cache: RenderCache<String> = RenderCache::new();
/// cache.put("/dashboard/invoices", "page=1", "<rendered>".to_string());
/// assert!(cache.get("/dashboard/invoices", "page=1").is_some());
///
/// cache.invalidate("/dashboard/invoices");
/// assert!(cache.get("/dashboard/invoices", "page=1").is_none());
/// ```
///
/// A rendering computed across an invalidation is discarded:
///
/// ```
/// use invoicedesk_shared::cache::{RenderCache, ViewCache};
///
/// let cache: RenderCache<String> = RenderCache::new();
/// let generation = cache.generation("/dashboard/invoices");
/// cache.invalidate("/dashboard/invoices");
///
/// assert!(!cache.put_if_current("/dashboard/invoices", "page=1", "old".to_string(), generation));
/// assert!(cache.get("/dashboard/invoices", "page=1").is_none());
/// ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

/// Upper bound on cached variants under one path
pub const MAX_VARIANTS_PER_PATH: usize = 64;

/// Invalidation hook used after a successful mutation
pub trait ViewCache: Send + Sync {
    /// Marks every cached rendering of `path` stale
    fn invalidate(&self, path: &str);
}

/// Variants cached under one path
#[derive(Debug)]
struct PathViews<V> {
    /// Bumped by every invalidation of the path
    generation: u64,
    variants: HashMap<String, V>,
    /// Insertion order, oldest first
    order: VecDeque<String>,
}

impl<V> Default for PathViews<V> {
    fn default() -> Self {
        Self {
            generation: 0,
            variants: HashMap::new(),
            order: VecDeque::new(),
        }
    }
}

impl<V> PathViews<V> {
    fn insert(&mut self, variant: &str, view: V) {
        if self.variants.insert(variant.to_string(), view).is_none() {
            self.order.push_back(variant.to_string());
        }

        while self.order.len() > MAX_VARIANTS_PER_PATH {
            if let Some(oldest) = self.order.pop_front() {
                self.variants.remove(&oldest);
            }
        }
    }
}

/// In-process cache of rendered views
///
/// Cloning is cheap; clones share the same storage.
#[derive(Debug)]
pub struct RenderCache<V> {
    views: Arc<RwLock<HashMap<String, PathViews<V>>>>,
}

impl<V> Clone for RenderCache<V> {
    fn clone(&self) -> Self {
        Self {
            views: Arc::clone(&self.views),
        }
    }
}

impl<V> Default for RenderCache<V> {
    fn default() -> Self {
        Self {
            views: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<V: Clone> RenderCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached rendering of `path` for `variant`, if fresh
    pub fn get(&self, path: &str, variant: &str) -> Option<V> {
        let views = self.views.read().unwrap_or_else(PoisonError::into_inner);
        views
            .get(path)
            .and_then(|entry| entry.variants.get(variant))
            .cloned()
    }

    /// Current invalidation generation of `path`
    ///
    /// Read this before computing a rendering and hand it to
    /// [`put_if_current`](Self::put_if_current).
    pub fn generation(&self, path: &str) -> u64 {
        let views = self.views.read().unwrap_or_else(PoisonError::into_inner);
        views.get(path).map_or(0, |entry| entry.generation)
    }

    /// Stores a rendering of `path` for `variant`
    pub fn put(&self, path: &str, variant: &str, view: V) {
        let mut views = self.views.write().unwrap_or_else(PoisonError::into_inner);
        views.entry(path.to_string()).or_default().insert(variant, view);
    }

    /// Stores a rendering unless `path` was invalidated since `generation`
    ///
    /// Returns whether the rendering was stored.
    pub fn put_if_current(&self, path: &str, variant: &str, view: V, generation: u64) -> bool {
        let mut views = self.views.write().unwrap_or_else(PoisonError::into_inner);
        let entry = views.entry(path.to_string()).or_default();

        if entry.generation != generation {
            debug!(path, variant, "Discarding rendering computed before invalidation");
            return false;
        }

        entry.insert(variant, view);
        true
    }

    /// Number of cached variants under `path`
    pub fn variants(&self, path: &str) -> usize {
        let views = self.views.read().unwrap_or_else(PoisonError::into_inner);
        views.get(path).map_or(0, |entry| entry.variants.len())
    }
}

impl<V: Clone + Send + Sync> ViewCache for RenderCache<V> {
    fn invalidate(&self, path: &str) {
        let mut views = self.views.write().unwrap_or_else(PoisonError::into_inner);
        let entry = views.entry(path.to_string()).or_default();

        entry.generation = entry.generation.wrapping_add(1);
        if !entry.variants.is_empty() {
            debug!(path, variants = entry.variants.len(), "Invalidated cached views");
        }
        entry.variants.clear();
        entry.order.clear();
    }
}
