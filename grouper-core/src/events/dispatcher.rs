//! EventDispatcher — synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use super::handler::GrouperEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// When no handlers are registered, `emit` iterates over an empty Vec —
/// effectively zero cost.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn GrouperEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn GrouperEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A panicking handler is caught so it cannot prevent subsequent
    /// handlers from receiving the event.
    fn emit<F: Fn(&dyn GrouperEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked; continuing");
            }
        }
    }

    pub fn emit_embedding_started(&self, event: &EmbeddingStartedEvent) {
        self.emit(|h| h.on_embedding_started(event));
    }

    pub fn emit_embedding_complete(&self, event: &EmbeddingCompleteEvent) {
        self.emit(|h| h.on_embedding_complete(event));
    }

    pub fn emit_trial_started(&self, event: &TrialStartedEvent) {
        self.emit(|h| h.on_trial_started(event));
    }

    pub fn emit_trial_complete(&self, event: &TrialCompleteEvent) {
        self.emit(|h| h.on_trial_complete(event));
    }

    pub fn emit_tune_complete(&self, event: &TuneCompleteEvent) {
        self.emit(|h| h.on_tune_complete(event));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::types::TrialConfig;

    #[derive(Default)]
    struct CountingHandler {
        trials: AtomicUsize,
    }

    impl GrouperEventHandler for CountingHandler {
        fn on_trial_complete(&self, _event: &TrialCompleteEvent) {
            self.trials.fetch_add(1, Ordering::Relaxed);
        }
    }

    struct PanickingHandler;

    impl GrouperEventHandler for PanickingHandler {
        fn on_trial_complete(&self, _event: &TrialCompleteEvent) {
            panic!("boom");
        }
    }

    fn trial_event() -> TrialCompleteEvent {
        TrialCompleteEvent {
            config: TrialConfig {
                k: 2,
                resolution: 1.0,
                min_cluster_size: 1,
            },
            score: Some(0.5),
            completed: 1,
            total: 1,
        }
    }

    #[test]
    fn test_dispatch_reaches_all_handlers() {
        let counter = Arc::new(CountingHandler::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(counter.clone());
        dispatcher.emit_trial_complete(&trial_event());
        dispatcher.emit_trial_complete(&trial_event());
        assert_eq!(counter.trials.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_panicking_handler_does_not_block_others() {
        let counter = Arc::new(CountingHandler::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(Arc::new(PanickingHandler));
        dispatcher.register(counter.clone());
        dispatcher.emit_trial_complete(&trial_event());
        assert_eq!(counter.trials.load(Ordering::Relaxed), 1);
    }
}
