//! Collaborators the engine drives but does not implement.
//!
//! All drawing, tweening and audio lives in the host. The engine calls these
//! at state transitions and never waits on them: an animation started here
//! is fire-and-forget.

use crate::api::types::{MedalTier, PieceId, SceneId, TargetId};
use crate::input::router::HintBand;

/// Render collaborator.
pub trait Presenter {
    fn render_progress(&mut self, fraction: f32);

    fn play_entry_animation(&mut self);

    fn play_completion_animation(&mut self, medal: MedalTier);

    fn show_briefing(&mut self, text: &str);

    fn highlight_interactive_target(&mut self, target: TargetId);

    /// Whole seconds elapsed in the running attempt.
    fn render_timer(&mut self, _elapsed_secs: u32) {}

    /// Drag proximity feedback for the puzzle.
    fn show_proximity_hint(&mut self, _piece: PieceId, _band: HintBand) {}
}

/// Navigation collaborator. Only ever called on an explicit user request.
pub trait Navigator {
    fn navigate_to(&mut self, scene: SceneId);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Everything a presenter was asked to do, in order.
    #[derive(Debug, Clone, PartialEq)]
    pub enum PresenterCall {
        Progress(f32),
        Entry,
        Completion(MedalTier),
        Briefing(String),
        Highlight(TargetId),
        Timer(u32),
        Hint(PieceId, HintBand),
    }

    #[derive(Debug, Default)]
    pub struct RecordingPresenter {
        pub calls: Vec<PresenterCall>,
    }

    impl RecordingPresenter {
        pub fn completions(&self) -> Vec<MedalTier> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    PresenterCall::Completion(m) => Some(*m),
                    _ => None,
                })
                .collect()
        }

        pub fn last_progress(&self) -> Option<f32> {
            self.calls.iter().rev().find_map(|c| match c {
                PresenterCall::Progress(f) => Some(*f),
                _ => None,
            })
        }

        pub fn briefings(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    PresenterCall::Briefing(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Presenter for RecordingPresenter {
        fn render_progress(&mut self, fraction: f32) {
            self.calls.push(PresenterCall::Progress(fraction));
        }
        fn play_entry_animation(&mut self) {
            self.calls.push(PresenterCall::Entry);
        }
        fn play_completion_animation(&mut self, medal: MedalTier) {
            self.calls.push(PresenterCall::Completion(medal));
        }
        fn show_briefing(&mut self, text: &str) {
            self.calls.push(PresenterCall::Briefing(text.to_string()));
        }
        fn highlight_interactive_target(&mut self, target: TargetId) {
            self.calls.push(PresenterCall::Highlight(target));
        }
        fn render_timer(&mut self, elapsed_secs: u32) {
            self.calls.push(PresenterCall::Timer(elapsed_secs));
        }
        fn show_proximity_hint(&mut self, piece: PieceId, band: HintBand) {
            self.calls.push(PresenterCall::Hint(piece, band));
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingNavigator {
        pub visited: Vec<SceneId>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate_to(&mut self, scene: SceneId) {
            self.visited.push(scene);
        }
    }
}
