//! Progress accumulation shared by all minigames.
//!
//! One tracker type, three tagged variants. `current` only moves forward,
//! never past `target`, and `fraction` is derived from it on every change.

use glam::Vec2;

use crate::api::config::{MinigameConfig, ProgressSpec};
use crate::api::types::PieceId;

/// A validated, scoring interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressAction {
    /// One discrete unit of work (Counter).
    Count,
    /// Drop `piece` at `pos` (Placement).
    Place { piece: PieceId, pos: Vec2 },
    /// A click at a clock reading in milliseconds (ContinuousClicks).
    Click { at_ms: f64 },
}

/// Result of feeding one action to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionOutcome {
    pub accepted: bool,
    pub fraction: f32,
    /// True only on the action that first brought the fraction to 1.0.
    pub just_completed: bool,
}

/// Puzzle slot state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementSlot {
    pub piece: PieceId,
    pub target: Vec2,
    pub filled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressKind {
    Counter,
    Placement { slots: Vec<PlacementSlot>, radius: f32 },
    ContinuousClicks { debounce_ms: f64, last_accepted_ms: Option<f64> },
}

#[derive(Debug, Clone)]
pub struct ProgressTracker {
    kind: ProgressKind,
    target: u32,
    current: u32,
    fraction: f32,
    completion_reported: bool,
}

impl ProgressTracker {
    pub fn counter(target: u32) -> Self {
        Self::with_kind(ProgressKind::Counter, target)
    }

    pub fn placement(slots: impl IntoIterator<Item = (PieceId, Vec2)>, radius: f32) -> Self {
        let slots: Vec<PlacementSlot> = slots
            .into_iter()
            .map(|(piece, target)| PlacementSlot { piece, target, filled: false })
            .collect();
        let target = slots.len() as u32;
        Self::with_kind(ProgressKind::Placement { slots, radius }, target)
    }

    pub fn continuous_clicks(target: u32, debounce_ms: f64) -> Self {
        Self::with_kind(ProgressKind::ContinuousClicks { debounce_ms, last_accepted_ms: None }, target)
    }

    /// Build the tracker variant described by a minigame config.
    pub fn from_config(config: &MinigameConfig) -> Self {
        match &config.progress {
            ProgressSpec::Counter { target, .. } => Self::counter(*target),
            ProgressSpec::Placement { slots, .. } => Self::placement(
                slots.iter().map(|s| (s.piece, s.target)),
                config.acceptance_radius(),
            ),
            ProgressSpec::ContinuousClicks { target, debounce_ms } => {
                Self::continuous_clicks(*target, *debounce_ms)
            }
        }
    }

    fn with_kind(kind: ProgressKind, target: u32) -> Self {
        Self { kind, target, current: 0, fraction: 0.0, completion_reported: false }
    }

    /// Apply one action. Actions of the wrong variant are rejected.
    pub fn record_action(&mut self, action: ProgressAction) -> ActionOutcome {
        let has_room = self.current < self.target;
        let accepted = has_room
            && match (&mut self.kind, action) {
                (ProgressKind::Counter, ProgressAction::Count) => true,
                (ProgressKind::Placement { slots, radius }, ProgressAction::Place { piece, pos }) => {
                    match slots.iter_mut().find(|s| s.piece == piece) {
                        Some(slot) if !slot.filled && slot.target.distance(pos) <= *radius => {
                            slot.filled = true;
                            true
                        }
                        _ => false,
                    }
                }
                (
                    ProgressKind::ContinuousClicks { debounce_ms, last_accepted_ms },
                    ProgressAction::Click { at_ms },
                ) => {
                    let debounced = last_accepted_ms.map_or(true, |last| at_ms - last >= *debounce_ms);
                    if debounced {
                        *last_accepted_ms = Some(at_ms);
                    }
                    debounced
                }
                _ => false,
            };

        if accepted {
            self.set_current(self.current + 1);
        }

        let just_completed = accepted && self.is_complete() && !self.completion_reported;
        if just_completed {
            self.completion_reported = true;
        }

        ActionOutcome { accepted, fraction: self.fraction, just_completed }
    }

    fn set_current(&mut self, current: u32) {
        self.current = current.min(self.target);
        self.fraction = if self.target == 0 {
            1.0
        } else {
            self.current as f32 / self.target as f32
        };
    }

    /// Back to zero progress with every slot empty.
    pub fn reset(&mut self) {
        match &mut self.kind {
            ProgressKind::Counter => {}
            ProgressKind::Placement { slots, .. } => {
                for slot in slots.iter_mut() {
                    slot.filled = false;
                }
            }
            ProgressKind::ContinuousClicks { last_accepted_ms, .. } => *last_accepted_ms = None,
        }
        self.completion_reported = false;
        self.set_current(0);
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.target
    }
}
