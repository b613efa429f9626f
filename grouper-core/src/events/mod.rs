//! Progress events for hosts (CLI, UI) observing long runs.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::GrouperEventHandler;
pub use types::{
    EmbeddingCompleteEvent, EmbeddingStartedEvent, TrialCompleteEvent, TrialStartedEvent,
    TuneCompleteEvent,
};
