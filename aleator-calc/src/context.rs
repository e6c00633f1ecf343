//! Calculation Context
//!
//! The mutable store shared by every node of one calculation tree. It
//! memoizes evaluated values by expression name and owns the sampling
//! RNG, which is what makes "a distribution is sampled at most once per
//! context" hold: the first evaluation draws and caches, every later
//! lookup of the same name returns the cached draws.
//!
//! Contexts are cheap and short-lived (one per top-level expression) and
//! are shared single-threaded via `Rc<RefCell<_>>`. Nothing here is
//! `Send` or `Sync`; the library makes no concurrency claims.

use aleator_core::{AleatorError, CalcValue};
use rand_pcg::Pcg64;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a [`CalculationContext`].
pub type SharedContext = Rc<RefCell<CalculationContext>>;

/// Memo store plus sampling RNG for one calculation tree.
#[derive(Debug)]
pub struct CalculationContext {
    values: HashMap<String, CalcValue>,
    rng: Pcg64,
}

impl CalculationContext {
    /// Create a context with an entropy-seeded RNG.
    pub fn new() -> Self {
        use rand::SeedableRng;
        Self {
            values: HashMap::new(),
            rng: Pcg64::from_entropy(),
        }
    }

    /// Create a context with a deterministic RNG, for reproducible draws.
    pub fn seeded(seed: u64) -> Self {
        use rand::SeedableRng;
        Self {
            values: HashMap::new(),
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Check if the context contains a value under `name`.
    pub fn has_object_named(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Return the value stored under `name`.
    pub fn get(&self, name: &str) -> Result<CalcValue, AleatorError> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| AleatorError::NameNotFound(name.to_string()))
    }

    /// Store `value` under `name`. A later `set` for the same name wins,
    /// but evaluation never overwrites: nodes check before computing.
    pub fn set(&mut self, name: impl Into<String>, value: CalcValue) {
        self.values.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn rng_mut(&mut self) -> &mut Pcg64 {
        &mut self.rng
    }

    /// Wrap the context in a shareable handle.
    pub fn into_shared(self) -> SharedContext {
        Rc::new(RefCell::new(self))
    }
}

impl Default for CalculationContext {
    fn default() -> Self {
        Self::new()
    }
}
