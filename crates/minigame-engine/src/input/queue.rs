use crate::api::types::PieceId;

/// DOM `MouseEvent.button` value for the primary button.
pub const PRIMARY_BUTTON: u32 = 0;

/// Raw input forwarded by the host, in layout coordinates.
/// Carries no minigame semantics; the router decides what it means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at (x, y) with the given button.
    PointerDown { x: f32, y: f32, button: u32 },
    /// A touch/click ended at (x, y).
    PointerUp { x: f32, y: f32 },
    /// The cursor moved to (x, y).
    PointerMove { x: f32, y: f32 },
    /// A puzzle piece is being dragged; (x, y) is its current position.
    DragMove { piece: PieceId, x: f32, y: f32 },
    /// A puzzle piece was released at (x, y).
    DragEnd { piece: PieceId, x: f32, y: f32 },
    /// A command from the UI layer (buttons outside the play field).
    /// `kind` identifies the command; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

impl InputEvent {
    /// Primary-button press shorthand.
    pub fn click(x: f32, y: f32) -> Self {
        InputEvent::PointerDown { x, y, button: PRIMARY_BUTTON }
    }
}

/// A queue of input events.
/// The host pushes events between frames; they are drained in arrival order.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
