use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{GameId, PieceId, TargetId};
use crate::scoring::medal::MedalThresholds;

/// Errors raised while building or loading minigame configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("medal thresholds must satisfy 0 <= gold < silver < bronze (got {gold_secs}/{silver_secs}/{bronze_secs})")]
    Thresholds { gold_secs: f64, silver_secs: f64, bronze_secs: f64 },
    #[error("{game}: progress target must be at least 1")]
    ZeroTarget { game: &'static str },
    #[error("{game}: placement layout has no slots")]
    EmptyPlacement { game: &'static str },
    #[error("{game}: piece {piece} has more than one slot")]
    DuplicatePiece { game: &'static str, piece: u32 },
    #[error("{game}: acceptance radius must be positive")]
    Radius { game: &'static str },
    #[error("{game}: progress kind does not fit this minigame")]
    KindMismatch { game: &'static str },
    #[error("manifest has no games")]
    EmptySuite,
    #[error("manifest lists {game} more than once")]
    DuplicateGame { game: &'static str },
    #[error("invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Axis-aligned clickable region in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl HitArea {
    pub fn centered(center: Vec2, half_extent: Vec2) -> Self {
        Self { min: center - half_extent, max: center + half_extent }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// One puzzle slot: the piece that belongs there and where it snaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub piece: PieceId,
    pub target: Vec2,
}

/// How a minigame accumulates progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressSpec {
    /// One unit per click on the hit area.
    Counter { target: u32, hit_area: HitArea },
    /// Fill every slot by dropping its piece close enough.
    /// The acceptance radius is `acceptance_fraction * layout_scale`.
    Placement { slots: Vec<SlotSpec>, acceptance_fraction: f32 },
    /// Debounced rapid clicks.
    ContinuousClicks { target: u32, debounce_ms: f64 },
}

/// Everything the engine needs to run one minigame scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinigameConfig {
    pub game: GameId,
    pub title: String,
    /// Instructions shown on first entry.
    pub briefing: String,
    /// Shown instead of `briefing` once the game has a recorded result.
    pub replay_briefing: String,
    /// Element highlighted while the briefing waits for the first press.
    pub interactive_target: TargetId,
    pub thresholds: MedalThresholds,
    pub progress: ProgressSpec,
    /// Width of the layout in world units; scales the acceptance radius.
    #[serde(default = "default_layout_scale")]
    pub layout_scale: f32,
    /// Counter: input lock while the opening animation plays.
    #[serde(default)]
    pub animation_lock_ms: f64,
    /// ContinuousClicks: non-interactive launch transition after start.
    #[serde(default)]
    pub launch_window_ms: f64,
}

fn default_layout_scale() -> f32 {
    800.0
}

/// A 30-unit snap distance on an 800-unit wide stage.
pub const DEFAULT_ACCEPTANCE_FRACTION: f32 = 30.0 / 800.0;

impl MinigameConfig {
    /// Check every invariant the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let game = self.game.as_str();
        match (&self.progress, self.game) {
            (ProgressSpec::Counter { target, .. }, GameId::Logistics)
            | (ProgressSpec::ContinuousClicks { target, .. }, GameId::FieldTreatment) => {
                if *target == 0 {
                    return Err(ConfigError::ZeroTarget { game });
                }
            }
            (ProgressSpec::Placement { slots, .. }, GameId::Puzzle) => {
                if slots.is_empty() {
                    return Err(ConfigError::EmptyPlacement { game });
                }
                for (i, slot) in slots.iter().enumerate() {
                    if slots[..i].iter().any(|s| s.piece == slot.piece) {
                        return Err(ConfigError::DuplicatePiece { game, piece: slot.piece.0 });
                    }
                }
                if !(self.acceptance_radius() > 0.0) {
                    return Err(ConfigError::Radius { game });
                }
            }
            _ => return Err(ConfigError::KindMismatch { game }),
        }
        Ok(())
    }

    /// Maximum snap distance for placement attempts, in layout units.
    pub fn acceptance_radius(&self) -> f32 {
        match &self.progress {
            ProgressSpec::Placement { acceptance_fraction, .. } => acceptance_fraction * self.layout_scale,
            _ => 0.0,
        }
    }

    /// Twenty parcels on a single packing table.
    pub fn logistics() -> Self {
        Self {
            game: GameId::Logistics,
            title: "Logistics".into(),
            briefing: "Open all 20 packages as fast as you can! Tap the package to begin.".into(),
            replay_briefing: "Beat your time? Tap the package to play again.".into(),
            interactive_target: TargetId(1),
            thresholds: thresholds(30.0, 45.0, 60.0),
            progress: ProgressSpec::Counter {
                target: 20,
                hit_area: HitArea::centered(Vec2::new(400.0, 320.0), Vec2::new(90.0, 70.0)),
            },
            layout_scale: default_layout_scale(),
            animation_lock_ms: 250.0,
            launch_window_ms: 0.0,
        }
    }

    /// A 2x2 picture puzzle.
    pub fn puzzle() -> Self {
        let slots = [(0, 300.0, 200.0), (1, 500.0, 200.0), (2, 300.0, 400.0), (3, 500.0, 400.0)]
            .into_iter()
            .map(|(piece, x, y)| SlotSpec { piece: PieceId(piece), target: Vec2::new(x, y) })
            .collect();
        Self {
            game: GameId::Puzzle,
            title: "Picture Puzzle".into(),
            briefing: "Drag each piece into place to complete the picture. Touch the board to begin.".into(),
            replay_briefing: "Want a better medal? Touch the board to play again.".into(),
            interactive_target: TargetId(2),
            thresholds: thresholds(20.0, 40.0, 60.0),
            progress: ProgressSpec::Placement { slots, acceptance_fraction: DEFAULT_ACCEPTANCE_FRACTION },
            layout_scale: default_layout_scale(),
            animation_lock_ms: 0.0,
            launch_window_ms: 0.0,
        }
    }

    /// Thirty treatment bursts from the drone.
    pub fn field_treatment() -> Self {
        Self {
            game: GameId::FieldTreatment,
            title: "Field Treatment".into(),
            briefing: "Click rapidly to spray the field once the drone is airborne. Tap to launch.".into(),
            replay_briefing: "Fly again for a better time? Tap to launch.".into(),
            interactive_target: TargetId(3),
            thresholds: thresholds(15.0, 25.0, 40.0),
            progress: ProgressSpec::ContinuousClicks { target: 30, debounce_ms: 50.0 },
            layout_scale: default_layout_scale(),
            animation_lock_ms: 0.0,
            launch_window_ms: 800.0,
        }
    }

    /// Preset for the given game.
    pub fn preset(game: GameId) -> Self {
        match game {
            GameId::Logistics => Self::logistics(),
            GameId::Puzzle => Self::puzzle(),
            GameId::FieldTreatment => Self::field_treatment(),
        }
    }
}

fn thresholds(gold: f64, silver: f64, bronze: f64) -> MedalThresholds {
    MedalThresholds::ordered(gold, silver, bronze)
}
