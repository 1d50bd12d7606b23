//! The reconciliation engine: snapshot handle, version gate, merger and
//! the update pipeline tying them together.

mod engine;
mod gate;
mod handle;
mod merger;

pub use engine::{IgnoreReason, UpdateEngine, UpdateEngineBuilder, UpdateOutcome};
pub use handle::ConfigHandle;
pub use merger::{RequiredFieldCheck, require_app_fields};
