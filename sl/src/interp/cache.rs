//! Polymorphic inline cache for call sites
//!
//! Each call node owns one [`InlineCache`]. The cache only records which
//! callee identities a site has seen; every path invokes through the
//! [`Function`], which reads its current call target, so redefinition never
//! leaves a stale entry behind. The [`Dispatch`] result is reported in
//! traces and does not select a different invocation path.

use super::function::Function;
use std::rc::Rc;

/// Maximum number of distinct callees before a site goes megamorphic
pub const INLINE_CACHE_SIZE: usize = 2;

/// Dispatch state of one call site
#[derive(Debug, Default)]
pub enum InlineCache {
    #[default]
    Uninitialized,
    Monomorphic(Rc<Function>),
    Polymorphic(Vec<Rc<Function>>),
    /// Too many callees seen; dispatch on the runtime identity only
    Megamorphic,
}

/// How a call was dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Callee was already cached
    Hit,
    /// Callee was added to the cache
    Miss,
    /// Site is megamorphic
    Generic,
}

impl InlineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call to `callee` and report which path serves it
    pub fn dispatch(&mut self, callee: &Rc<Function>) -> Dispatch {
        match self {
            InlineCache::Uninitialized => {
                tracing::trace!(callee = callee.name(), "call site now monomorphic");
                *self = InlineCache::Monomorphic(Rc::clone(callee));
                Dispatch::Miss
            }
            InlineCache::Monomorphic(cached) => {
                if Rc::ptr_eq(cached, callee) {
                    return Dispatch::Hit;
                }
                tracing::trace!(callee = callee.name(), "call site now polymorphic");
                let entries = vec![Rc::clone(callee), Rc::clone(cached)];
                *self = InlineCache::Polymorphic(entries);
                Dispatch::Miss
            }
            InlineCache::Polymorphic(entries) => {
                if entries.iter().any(|f| Rc::ptr_eq(f, callee)) {
                    return Dispatch::Hit;
                }
                if entries.len() < INLINE_CACHE_SIZE {
                    entries.insert(0, Rc::clone(callee));
                    return Dispatch::Miss;
                }
                tracing::trace!(callee = callee.name(), "call site now megamorphic");
                *self = InlineCache::Megamorphic;
                Dispatch::Generic
            }
            InlineCache::Megamorphic => Dispatch::Generic,
        }
    }
}
