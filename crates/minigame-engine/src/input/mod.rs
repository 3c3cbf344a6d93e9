pub mod queue;
pub mod router;
