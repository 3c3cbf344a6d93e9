//! Rust → host event stream.
//! Must stay in sync with the host-side event decoder.
//!
//! Each frame the engine fills a flat buffer of [`GameEvent`]s (4 floats:
//! kind, a, b, c) that the host reads through a pointer + length pair and
//! turns into presenter calls. Strings travel separately (see
//! [`EventBuffer::briefing_text`]).
//!
//! ```text
//! kind  a              b            c
//! 1     fraction       -            -          render_progress
//! 2     -              -            -          play_entry_animation
//! 3     medal rank     -            -          play_completion_animation
//! 4     -              -            -          show_briefing (text via accessor)
//! 5     target id      -            -          highlight_interactive_target
//! 6     elapsed secs   -            -          render_timer
//! 7     piece id       band (0..2)  -          show_proximity_hint
//! ```

use bytemuck::{Pod, Zeroable};

use crate::api::presenter::{Navigator, Presenter};
use crate::api::types::{MedalTier, PieceId, SceneId, TargetId};
use crate::input::router::HintBand;

/// Floats per game event: kind, a, b, c (fixed wire format).
pub const EVENT_FLOATS: usize = 4;

/// Default per-frame event capacity.
pub const DEFAULT_MAX_EVENTS: usize = 64;

pub const EVENT_PROGRESS: f32 = 1.0;
pub const EVENT_ENTRY_ANIMATION: f32 = 2.0;
pub const EVENT_COMPLETION: f32 = 3.0;
pub const EVENT_BRIEFING: f32 = 4.0;
pub const EVENT_HIGHLIGHT: f32 = 5.0;
pub const EVENT_TIMER: f32 = 6.0;
pub const EVENT_HINT: f32 = 7.0;

/// A single presenter call encoded for the host.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = EVENT_FLOATS;

    fn new(kind: f32, a: f32) -> Self {
        Self { kind, a, b: 0.0, c: 0.0 }
    }
}

fn medal_rank(medal: MedalTier) -> f32 {
    medal.points() as f32
}

fn hint_rank(band: HintBand) -> f32 {
    match band {
        HintBand::Cold => 0.0,
        HintBand::Warm => 1.0,
        HintBand::Hot => 2.0,
    }
}

/// Presenter that encodes calls into the per-frame event buffer.
pub struct EventBuffer {
    events: Vec<GameEvent>,
    max_events: usize,
    briefing: String,
}

impl EventBuffer {
    pub fn with_capacity(max_events: usize) -> Self {
        Self {
            events: Vec::with_capacity(max_events),
            max_events,
            briefing: String::new(),
        }
    }

    fn push(&mut self, event: GameEvent) {
        if self.events.len() >= self.max_events {
            log::debug!("event buffer full, dropping kind {}", event.kind);
            return;
        }
        self.events.push(event);
    }

    /// Clear per-frame events. The briefing text persists until replaced.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn max_events(&self) -> usize {
        self.max_events
    }

    /// The most recent briefing copy.
    pub fn briefing_text(&self) -> &str {
        &self.briefing
    }

    /// Flat float view of this frame's events.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.events)
    }
}

impl Default for EventBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_EVENTS)
    }
}

impl Presenter for EventBuffer {
    fn render_progress(&mut self, fraction: f32) {
        self.push(GameEvent::new(EVENT_PROGRESS, fraction));
    }

    fn play_entry_animation(&mut self) {
        self.push(GameEvent::new(EVENT_ENTRY_ANIMATION, 0.0));
    }

    fn play_completion_animation(&mut self, medal: MedalTier) {
        self.push(GameEvent::new(EVENT_COMPLETION, medal_rank(medal)));
    }

    fn show_briefing(&mut self, text: &str) {
        self.briefing.clear();
        self.briefing.push_str(text);
        self.push(GameEvent::new(EVENT_BRIEFING, 0.0));
    }

    fn highlight_interactive_target(&mut self, target: TargetId) {
        self.push(GameEvent::new(EVENT_HIGHLIGHT, target.0 as f32));
    }

    fn render_timer(&mut self, elapsed_secs: u32) {
        self.push(GameEvent::new(EVENT_TIMER, elapsed_secs as f32));
    }

    fn show_proximity_hint(&mut self, piece: PieceId, band: HintBand) {
        self.push(GameEvent { kind: EVENT_HINT, a: piece.0 as f32, b: hint_rank(band), c: 0.0 });
    }
}

/// Navigator the host polls once per frame.
#[derive(Debug, Default)]
pub struct NavigationLatch {
    pending: Option<SceneId>,
}

impl NavigationLatch {
    /// Take the latest request, if any.
    pub fn take(&mut self) -> Option<SceneId> {
        self.pending.take()
    }
}

impl Navigator for NavigationLatch {
    fn navigate_to(&mut self, scene: SceneId) {
        self.pending = Some(scene);
    }
}
