//! Event handler trait with no-op defaults.

use super::types::*;

/// Receives progress events from the engine. All methods default to
/// no-ops so handlers implement only what they care about.
pub trait GrouperEventHandler: Send + Sync {
    fn on_embedding_started(&self, _event: &EmbeddingStartedEvent) {}
    fn on_embedding_complete(&self, _event: &EmbeddingCompleteEvent) {}
    fn on_trial_started(&self, _event: &TrialStartedEvent) {}
    fn on_trial_complete(&self, _event: &TrialCompleteEvent) {}
    fn on_tune_complete(&self, _event: &TuneCompleteEvent) {}
}
