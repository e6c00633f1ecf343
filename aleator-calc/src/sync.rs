//! Context synchronization
//!
//! Forces a set of expressions (and expression containers) to share one
//! fresh calculation context, so later evaluation reuses samples
//! consistently across the whole set. Because nodes are context-free,
//! synchronizing is just rebinding the builders - no tree is mutated.

use crate::context::{CalculationContext, SharedContext};
use crate::expr::{Expr, ExprFrame, ExprSeries};

/// Anything that can be rebound onto a shared calculation context.
pub trait SyncContext {
    fn rebind(&mut self, ctx: &SharedContext);
}

impl SyncContext for Expr {
    fn rebind(&mut self, ctx: &SharedContext) {
        self.set_context(ctx);
    }
}

impl SyncContext for ExprSeries {
    fn rebind(&mut self, ctx: &SharedContext) {
        self.rebind_all(ctx);
    }
}

impl SyncContext for ExprFrame {
    fn rebind(&mut self, ctx: &SharedContext) {
        self.rebind_all(ctx);
    }
}

/// Rebind every item onto one brand-new shared context and return it.
///
/// After this call, evaluating any of the passed items reads and writes
/// the same cache, so numerically dependent expressions (a posterior
/// built from a prior that must consume the same samples used elsewhere)
/// stay consistent.
pub fn sync_context(items: &mut [&mut dyn SyncContext]) -> SharedContext {
    sync_context_with(CalculationContext::new().into_shared(), items)
}

/// Rebind every item onto `ctx` (e.g. a seeded context) and return it.
pub fn sync_context_with(
    ctx: SharedContext,
    items: &mut [&mut dyn SyncContext],
) -> SharedContext {
    for item in items.iter_mut() {
        item.rebind(&ctx);
    }
    ctx
}
