use crate::api::types::{CharacterId, GameId, SceneId};
use crate::input::queue::InputEvent;

// Custom event kinds (host UI → engine)
pub const CUSTOM_SELECT_CHARACTER: u32 = 1;
pub const CUSTOM_ENTER_GAME: u32 = 2;
pub const CUSTOM_REPLAY: u32 = 3;
pub const CUSTOM_NAVIGATE: u32 = 4;
pub const CUSTOM_RESTART: u32 = 5;

/// Suite-level requests coming from buttons outside the play field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteCommand {
    SelectCharacter(CharacterId),
    EnterGame(GameId),
    Replay,
    Navigate(SceneId),
    Restart,
}

impl SuiteCommand {
    /// Decode a custom input event. Unknown kinds and out-of-range payloads
    /// decode to `None`.
    pub fn from_event(event: &InputEvent) -> Option<SuiteCommand> {
        let InputEvent::Custom { kind, a, .. } = *event else {
            return None;
        };
        let arg = (a >= 0.0 && a.fract() == 0.0).then_some(a as u32);
        match kind {
            CUSTOM_SELECT_CHARACTER => arg.map(|id| SuiteCommand::SelectCharacter(CharacterId(id))),
            CUSTOM_ENTER_GAME => arg.and_then(GameId::from_index).map(SuiteCommand::EnterGame),
            CUSTOM_REPLAY => Some(SuiteCommand::Replay),
            CUSTOM_NAVIGATE => arg.and_then(SceneId::from_code).map(SuiteCommand::Navigate),
            CUSTOM_RESTART => Some(SuiteCommand::Restart),
            _ => None,
        }
    }
}
