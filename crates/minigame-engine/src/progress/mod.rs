pub mod tracker;

pub use tracker::{ActionOutcome, ProgressAction, ProgressKind, ProgressTracker};
