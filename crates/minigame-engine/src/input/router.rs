//! Raw input → domain action classification.
//!
//! Pure mapping: the router holds only the layout rules of one minigame and
//! reads everything time- or phase-dependent from a [`RouteContext`].

use glam::Vec2;

use crate::api::config::{HitArea, MinigameConfig, ProgressSpec};
use crate::api::types::PieceId;
use crate::core::session::SessionPhase;
use crate::input::queue::{InputEvent, PRIMARY_BUTTON};
use crate::progress::tracker::ProgressAction;

/// Hint bands as multiples of the acceptance radius.
const HOT_BAND: f32 = 2.0;
const WARM_BAND: f32 = 4.0;

/// How close a dragged piece is to its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintBand {
    Cold,
    Warm,
    Hot,
}

/// Drone state in the field-treatment game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleMode {
    Grounded,
    /// Non-interactive launch transition.
    Launching,
    Flying,
}

/// What a raw event means for the current session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomainAction {
    /// The qualifying press that leaves the briefing.
    Start,
    Progress(ProgressAction),
    /// Non-scoring drag feedback.
    Hint { piece: PieceId, band: HintBand },
}

/// Session facts the router needs for one event.
#[derive(Debug, Clone, Copy)]
pub struct RouteContext {
    pub phase: SessionPhase,
    pub now_ms: f64,
    pub animation_locked: bool,
    pub vehicle: VehicleMode,
}

#[derive(Debug, Clone)]
enum Rules {
    Counter { hit_area: HitArea },
    Placement { targets: Vec<(PieceId, Vec2)>, radius: f32 },
    ContinuousClicks,
}

#[derive(Debug, Clone)]
pub struct InteractionRouter {
    rules: Rules,
}

impl InteractionRouter {
    pub fn from_config(config: &MinigameConfig) -> Self {
        let rules = match &config.progress {
            ProgressSpec::Counter { hit_area, .. } => Rules::Counter { hit_area: *hit_area },
            ProgressSpec::Placement { slots, .. } => Rules::Placement {
                targets: slots.iter().map(|s| (s.piece, s.target)).collect(),
                radius: config.acceptance_radius(),
            },
            ProgressSpec::ContinuousClicks { .. } => Rules::ContinuousClicks,
        };
        Self { rules }
    }

    /// Map a raw event to a domain action, or `None` if it means nothing
    /// in the current phase.
    pub fn classify(&self, event: &InputEvent, ctx: &RouteContext) -> Option<DomainAction> {
        match ctx.phase {
            SessionPhase::Briefing { .. } => match *event {
                InputEvent::PointerDown { button: PRIMARY_BUTTON, .. } => Some(DomainAction::Start),
                _ => None,
            },
            SessionPhase::Active => self.classify_active(event, ctx),
            SessionPhase::Idle | SessionPhase::Complete => None,
        }
    }

    fn classify_active(&self, event: &InputEvent, ctx: &RouteContext) -> Option<DomainAction> {
        match (&self.rules, *event) {
            (Rules::Counter { hit_area }, InputEvent::PointerDown { x, y, button: PRIMARY_BUTTON }) => {
                (!ctx.animation_locked && hit_area.contains(Vec2::new(x, y)))
                    .then_some(DomainAction::Progress(ProgressAction::Count))
            }
            (Rules::Placement { .. }, InputEvent::DragEnd { piece, x, y }) => Some(DomainAction::Progress(
                ProgressAction::Place { piece, pos: Vec2::new(x, y) },
            )),
            (Rules::Placement { targets, radius }, InputEvent::DragMove { piece, x, y }) => {
                let (_, target) = targets.iter().find(|(p, _)| *p == piece)?;
                let distance = target.distance(Vec2::new(x, y));
                let band = if distance <= radius * HOT_BAND {
                    HintBand::Hot
                } else if distance <= radius * WARM_BAND {
                    HintBand::Warm
                } else {
                    HintBand::Cold
                };
                Some(DomainAction::Hint { piece, band })
            }
            (Rules::ContinuousClicks, InputEvent::PointerDown { button: PRIMARY_BUTTON, .. }) => {
                (ctx.vehicle == VehicleMode::Flying)
                    .then_some(DomainAction::Progress(ProgressAction::Click { at_ms: ctx.now_ms }))
            }
            _ => None,
        }
    }
}
