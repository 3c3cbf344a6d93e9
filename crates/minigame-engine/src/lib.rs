pub mod api;
pub mod core;
pub mod scoring;
pub mod progress;
pub mod input;
pub mod store;
pub mod bridge;
pub mod assets;
pub mod suite;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, HitArea, MinigameConfig, ProgressSpec, SlotSpec};
pub use api::presenter::{Navigator, Presenter};
pub use api::types::{CharacterId, GameId, MedalTier, PieceId, SceneId, TargetId};
pub use core::rng::Rng;
pub use core::session::{SceneContext, SessionOutcome, SessionPhase, SessionStateMachine};
pub use core::time::{Clock, ManualClock, Stopwatch};
pub use scoring::{evaluate, MedalThresholds};
pub use progress::{ActionOutcome, ProgressAction, ProgressKind, ProgressTracker};
pub use input::queue::{InputEvent, InputQueue, PRIMARY_BUTTON};
pub use input::router::{DomainAction, HintBand, InteractionRouter, RouteContext, VehicleMode};
pub use store::player::{
    GameResult, MemoryStorage, Player, PlayerId, PlayerStore, ResultPolicy,
    SessionStorage, StorageError,
};
pub use bridge::protocol::{EventBuffer, GameEvent, NavigationLatch, DEFAULT_MAX_EVENTS, EVENT_FLOATS};
pub use assets::manifest::{CharacterDescriptor, SuiteManifest};
pub use suite::command::SuiteCommand;
pub use suite::controller::{CharacterSummary, GameSummary, SessionController, SuiteSummary};
