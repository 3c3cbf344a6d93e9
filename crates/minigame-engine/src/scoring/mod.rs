pub mod medal;

pub use medal::{evaluate, MedalThresholds};
