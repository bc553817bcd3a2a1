use crate::report::FailureInput;
use once_cell::sync::Lazy;
use std::cell::Cell;
use std::sync::{Arc, RwLock};

pub type Handler = Arc<dyn Fn(&FailureInput) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
}

static REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::default()));

thread_local! {
    static DISPATCHING: Cell<bool> = const { Cell::new(false) };
}

/// Registration handle. Dropping it removes the handler.
#[must_use = "the handler is removed as soon as the subscription is dropped"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
}

impl Subscription {
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
        registry.handlers.retain(|(id, _)| *id != self.id);
    }
}

/// Register `handler` for every unhandled failure raised in this process.
pub fn on_unhandled_error<F>(handler: F) -> Subscription
where
    F: Fn(&FailureInput) + Send + Sync + 'static,
{
    let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    registry.next_id += 1;
    let id = registry.next_id;
    registry.handlers.push((id, Arc::new(handler)));
    Subscription { id }
}

pub fn subscriber_count() -> usize {
    REGISTRY
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .handlers
        .len()
}

/// Resets the re-entrancy flag even if a handler panics.
struct DispatchGuard;

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCHING.with(|flag| flag.set(false));
    }
}

/// Hand `failure` to every registered handler; returns how many ran.
///
/// A handler that itself raises an unhandled failure on the same thread
/// (for example by logging at error level) does not re-enter the hub.
pub fn dispatch(failure: FailureInput) -> usize {
    if DISPATCHING.with(|flag| flag.replace(true)) {
        return 0;
    }
    let _guard = DispatchGuard;

    // snapshot so handlers may subscribe or unsubscribe while running
    let handlers: Vec<Handler> = REGISTRY
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .handlers
        .iter()
        .map(|(_, handler)| handler.clone())
        .collect();

    for handler in &handlers {
        handler(&failure);
    }
    handlers.len()
}
