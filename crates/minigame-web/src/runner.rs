use minigame_engine::{
    Clock, EventBuffer, InputEvent, InputQueue, NavigationLatch,
    PlayerStore, SessionController, SessionStorage, SuiteManifest,
    DEFAULT_MAX_EVENTS,
};

use crate::storage::{entropy_seed, open_session_storage, DateClock};

/// Wires the session controller to the browser frame loop.
///
/// Each suite creates a `thread_local!` SuiteRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct SuiteRunner {
    controller: SessionController<EventBuffer, NavigationLatch>,
    input: InputQueue,
    initialized: bool,
}

impl SuiteRunner {
    pub fn new(
        manifest: SuiteManifest,
        storage: Box<dyn SessionStorage>,
        clock: Box<dyn Clock>,
        seed: u64,
    ) -> Self {
        let store = PlayerStore::new(storage, seed);
        let controller = SessionController::new(
            manifest,
            store,
            clock,
            EventBuffer::with_capacity(DEFAULT_MAX_EVENTS),
            NavigationLatch::default(),
        );
        Self {
            controller,
            input: InputQueue::new(),
            initialized: false,
        }
    }

    /// Runner backed by `sessionStorage` and `Date.now()`.
    pub fn for_browser(manifest: SuiteManifest) -> Self {
        Self::new(manifest, open_session_storage(), Box::new(DateClock), entropy_seed())
    }

    /// Initialize the runner. Call once after construction.
    pub fn init(&mut self) {
        self.initialized = true;
        log::info!(
            "session {} (score {}, storage {})",
            self.controller.player(),
            self.controller.total_score(),
            if self.controller.store().is_degraded() { "memory-only" } else { "ok" }
        );
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: clear last frame's events, apply queued input in
    /// arrival order, then advance the timer.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }
        log::trace!("tick {:.1}ms, {} queued", dt, self.input.len());

        self.controller.presenter_mut().clear();
        for event in self.input.drain() {
            self.controller.handle_input(&event);
        }
        self.controller.tick();
    }

    pub fn load_manifest(&mut self, json: &str) {
        if let Err(e) = self.controller.load_manifest_json(json) {
            log::error!("manifest rejected: {}", e);
        }
    }

    pub fn controller(&self) -> &SessionController<EventBuffer, NavigationLatch> {
        &self.controller
    }

    // ---- Pointer accessors for the host's buffer reads ----

    pub fn game_events_ptr(&self) -> *const f32 {
        self.controller.presenter().events_ptr()
    }

    pub fn game_events_len(&self) -> u32 {
        self.controller.presenter().len() as u32
    }

    pub fn max_events(&self) -> u32 {
        self.controller.presenter().max_events() as u32
    }

    pub fn briefing_text(&self) -> String {
        self.controller.presenter().briefing_text().to_string()
    }

    pub fn session_id(&self) -> String {
        self.controller.player().to_string()
    }

    pub fn total_score(&self) -> u32 {
        self.controller.total_score()
    }

    pub fn summary_json(&self) -> String {
        match serde_json::to_string(&self.controller.summary()) {
            Ok(json) => json,
            Err(e) => {
                log::error!("summary serialization failed: {}", e);
                String::from("{}")
            }
        }
    }

    /// Scene code of the pending navigation request, or -1 when there is none.
    pub fn take_navigation(&mut self) -> i32 {
        self.controller
            .navigator_mut()
            .take()
            .map_or(-1, |scene| scene.code() as i32)
    }
}

#[cfg(test)]
mod tests {
    use minigame_engine::bridge::protocol::{EVENT_BRIEFING, EVENT_ENTRY_ANIMATION, EVENT_PROGRESS};
    use minigame_engine::suite::command::{CUSTOM_ENTER_GAME, CUSTOM_NAVIGATE, CUSTOM_SELECT_CHARACTER};
    use minigame_engine::{GameId, ManualClock, MemoryStorage, SceneId, SessionPhase};

    use super::*;

    fn runner() -> (SuiteRunner, ManualClock) {
        let clock = ManualClock::new(1_000.0);
        let mut runner = SuiteRunner::new(
            SuiteManifest::default(),
            Box::new(MemoryStorage::new()),
            Box::new(clock.clone()),
            99,
        );
        runner.init();
        (runner, clock)
    }

    fn custom(kind: u32, a: f32) -> InputEvent {
        InputEvent::Custom { kind, a, b: 0.0, c: 0.0 }
    }

    fn event_kinds(runner: &SuiteRunner) -> Vec<f32> {
        runner.controller().presenter().events().iter().map(|e| e.kind).collect()
    }

    #[test]
    fn input_waits_for_tick() {
        let (mut r, _clock) = runner();
        r.push_input(custom(CUSTOM_ENTER_GAME, GameId::Puzzle.index() as f32));
        assert!(r.controller().scene().is_none());
        r.tick(16.0);
        assert_eq!(r.controller().scene().map(|s| s.game()), Some(GameId::Puzzle));
    }

    #[test]
    fn queued_events_apply_in_arrival_order() {
        let (mut r, _clock) = runner();
        r.push_input(custom(CUSTOM_ENTER_GAME, 0.0));
        r.push_input(InputEvent::click(1.0, 1.0));
        r.tick(16.0);

        assert_eq!(r.controller().scene().unwrap().phase(), SessionPhase::Active);
        let kinds = event_kinds(&r);
        assert_eq!(kinds[0], EVENT_ENTRY_ANIMATION);
        assert!(kinds.contains(&EVENT_BRIEFING));
        assert!(kinds.contains(&EVENT_PROGRESS));
        assert_eq!(r.briefing_text(), SuiteManifest::default().games[0].briefing);
    }

    #[test]
    fn events_are_cleared_each_frame() {
        let (mut r, _clock) = runner();
        r.push_input(custom(CUSTOM_ENTER_GAME, 0.0));
        r.tick(16.0);
        assert!(r.game_events_len() > 0);
        r.tick(16.0);
        assert_eq!(r.game_events_len(), 0);
        assert!(!r.briefing_text().is_empty());
    }

    #[test]
    fn navigation_is_taken_once() {
        let (mut r, _clock) = runner();
        r.push_input(custom(CUSTOM_SELECT_CHARACTER, 1.0));
        r.push_input(custom(CUSTOM_NAVIGATE, SceneId::SceneSelect.code() as f32));
        r.tick(16.0);
        assert_eq!(r.take_navigation(), SceneId::SceneSelect.code() as i32);
        assert_eq!(r.take_navigation(), -1);
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut r = SuiteRunner::new(
            SuiteManifest::default(),
            Box::new(MemoryStorage::new()),
            Box::new(ManualClock::new(0.0)),
            1,
        );
        r.push_input(custom(CUSTOM_ENTER_GAME, 0.0));
        r.tick(16.0);
        assert!(r.controller().scene().is_none());
    }

    #[test]
    fn summary_json_reports_session() {
        let (mut r, _clock) = runner();
        r.push_input(custom(CUSTOM_SELECT_CHARACTER, 2.0));
        r.tick(16.0);
        let summary: serde_json::Value = serde_json::from_str(&r.summary_json()).unwrap();
        assert_eq!(summary["player"], r.session_id());
        assert_eq!(summary["character"]["name"], "Leo");
        assert_eq!(summary["max_score"], 9);
    }

    #[test]
    fn bad_manifest_is_logged_and_ignored() {
        let (mut r, _clock) = runner();
        r.load_manifest("not json");
        assert_eq!(r.controller().manifest(), &SuiteManifest::default());
    }
}
