//! Lifecycle of one minigame scene: Idle → Briefing → Active → Complete.
//!
//! The machine owns the clock reading at start, the progress tracker and
//! the router. Input that means nothing in the current phase is dropped
//! without a trace, and the only write to the player store happens on the
//! single Active → Complete transition.

use crate::api::config::MinigameConfig;
use crate::api::presenter::{Navigator, Presenter};
use crate::api::types::{GameId, MedalTier, SceneId};
use crate::core::time::{Clock, Stopwatch};
use crate::input::queue::InputEvent;
use crate::input::router::{DomainAction, InteractionRouter, RouteContext, VehicleMode};
use crate::progress::tracker::{ActionOutcome, ProgressAction, ProgressTracker};
use crate::scoring::medal::evaluate;
use crate::store::player::{GameResult, PlayerId, PlayerStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    /// Waiting for the first press. `replay` selects the replay-offer copy.
    Briefing { replay: bool },
    Active,
    Complete,
}

/// Borrowed collaborators for one call into the machine.
pub struct SceneContext<'a> {
    pub player: &'a PlayerId,
    pub store: &'a mut PlayerStore,
    pub clock: &'a dyn Clock,
    pub presenter: &'a mut dyn Presenter,
    pub navigator: &'a mut dyn Navigator,
}

/// What a finished attempt produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOutcome {
    /// Medal earned by this run.
    pub medal: MedalTier,
    pub elapsed_secs: f64,
    /// What the store kept after applying its overwrite policy.
    pub recorded: GameResult,
}

pub struct SessionStateMachine {
    config: MinigameConfig,
    phase: SessionPhase,
    tracker: ProgressTracker,
    router: InteractionRouter,
    stopwatch: Stopwatch,
    locked_until_ms: f64,
    flight_from_ms: Option<f64>,
    last_timer_secs: Option<u32>,
    outcome: Option<SessionOutcome>,
}

impl SessionStateMachine {
    /// `config` is expected to have passed [`MinigameConfig::validate`].
    pub fn new(config: MinigameConfig) -> Self {
        let tracker = ProgressTracker::from_config(&config);
        let router = InteractionRouter::from_config(&config);
        Self {
            config,
            phase: SessionPhase::Idle,
            tracker,
            router,
            stopwatch: Stopwatch::new(),
            locked_until_ms: 0.0,
            flight_from_ms: None,
            last_timer_secs: None,
            outcome: None,
        }
    }

    pub fn game(&self) -> GameId {
        self.config.game
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn fraction(&self) -> f32 {
        self.tracker.fraction()
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    /// Scene entry. A game already played this session opens on the replay offer.
    pub fn activate(&mut self, ctx: &mut SceneContext<'_>) {
        if self.phase != SessionPhase::Idle {
            return;
        }
        let replay = ctx.store.get_result(ctx.player, self.config.game).is_some();
        ctx.presenter.play_entry_animation();
        self.enter_briefing(replay, ctx);
    }

    fn enter_briefing(&mut self, replay: bool, ctx: &mut SceneContext<'_>) {
        self.phase = SessionPhase::Briefing { replay };
        let text = if replay { &self.config.replay_briefing } else { &self.config.briefing };
        ctx.presenter.show_briefing(text);
        ctx.presenter.highlight_interactive_target(self.config.interactive_target);
        log::debug!("{}: briefing (replay={})", self.config.game.as_str(), replay);
    }

    fn vehicle(&self, now_ms: f64) -> VehicleMode {
        match self.flight_from_ms {
            None => VehicleMode::Grounded,
            Some(from) if now_ms >= from => VehicleMode::Flying,
            Some(_) => VehicleMode::Launching,
        }
    }

    /// Feed one raw event. Returns the tracker's verdict when the event was a
    /// scoring action; everything else yields `None`.
    pub fn handle_input(&mut self, event: &InputEvent, ctx: &mut SceneContext<'_>) -> Option<ActionOutcome> {
        let now_ms = ctx.clock.now_ms();
        let route = RouteContext {
            phase: self.phase,
            now_ms,
            animation_locked: now_ms < self.locked_until_ms,
            vehicle: self.vehicle(now_ms),
        };
        match self.router.classify(event, &route)? {
            DomainAction::Start => {
                self.start(now_ms, ctx);
                None
            }
            DomainAction::Progress(action) => Some(self.apply(action, ctx)),
            DomainAction::Hint { piece, band } => {
                ctx.presenter.show_proximity_hint(piece, band);
                None
            }
        }
    }

    fn start(&mut self, now_ms: f64, ctx: &mut SceneContext<'_>) {
        self.tracker.reset();
        self.stopwatch.start(now_ms);
        self.locked_until_ms = now_ms;
        self.flight_from_ms = match self.config.game {
            GameId::FieldTreatment => Some(now_ms + self.config.launch_window_ms),
            _ => None,
        };
        self.outcome = None;
        self.last_timer_secs = Some(0);
        self.phase = SessionPhase::Active;
        ctx.presenter.render_progress(0.0);
        ctx.presenter.render_timer(0);
        log::debug!("{}: active", self.config.game.as_str());
    }

    fn apply(&mut self, action: ProgressAction, ctx: &mut SceneContext<'_>) -> ActionOutcome {
        let outcome = self.tracker.record_action(action);
        if outcome.accepted {
            if action == ProgressAction::Count {
                self.locked_until_ms = ctx.clock.now_ms() + self.config.animation_lock_ms;
            }
            ctx.presenter.render_progress(outcome.fraction);
        }
        if outcome.just_completed {
            self.complete(ctx);
        }
        outcome
    }

    /// Active → Complete. Scores and records exactly once; any later call is
    /// a no-op returning `false`.
    fn complete(&mut self, ctx: &mut SceneContext<'_>) -> bool {
        if self.phase != SessionPhase::Active {
            return false;
        }
        let now_ms = ctx.clock.now_ms();
        let elapsed_secs = self.stopwatch.elapsed_secs(now_ms);
        let medal = evaluate(elapsed_secs, &self.config.thresholds);
        let recorded = ctx.store.record_result(ctx.player, self.config.game, medal, now_ms);

        self.stopwatch.stop();
        self.flight_from_ms = None;
        self.phase = SessionPhase::Complete;
        self.outcome = Some(SessionOutcome { medal, elapsed_secs, recorded });
        ctx.presenter.play_completion_animation(medal);
        log::info!(
            "{}: complete in {:.2}s, medal {:?}, total score {}",
            self.config.game.as_str(),
            elapsed_secs,
            medal,
            ctx.store.get_total_score(ctx.player)
        );
        true
    }

    /// Clock tick from the host. Reports whole elapsed seconds while Active.
    pub fn tick(&mut self, ctx: &mut SceneContext<'_>) {
        if self.phase != SessionPhase::Active {
            return;
        }
        let secs = self.stopwatch.elapsed_secs(ctx.clock.now_ms()).floor() as u32;
        if self.last_timer_secs != Some(secs) {
            self.last_timer_secs = Some(secs);
            ctx.presenter.render_timer(secs);
        }
    }

    /// Complete → Briefing, on the player's request.
    pub fn replay(&mut self, ctx: &mut SceneContext<'_>) -> bool {
        if self.phase != SessionPhase::Complete {
            return false;
        }
        self.enter_briefing(true, ctx);
        true
    }

    /// Leave for another scene. Honoured only from Briefing or Complete.
    pub fn request_navigation(&mut self, scene: SceneId, ctx: &mut SceneContext<'_>) -> bool {
        match self.phase {
            SessionPhase::Briefing { .. } | SessionPhase::Complete => {
                ctx.navigator.navigate_to(scene);
                true
            }
            SessionPhase::Idle | SessionPhase::Active => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::api::config::ProgressSpec;
    use crate::api::presenter::testing::{PresenterCall, RecordingNavigator, RecordingPresenter};
    use crate::api::types::{PieceId, TargetId};
    use crate::core::time::ManualClock;
    use crate::input::router::HintBand;

    struct Harness {
        store: PlayerStore,
        player: PlayerId,
        clock: ManualClock,
        presenter: RecordingPresenter,
        navigator: RecordingNavigator,
    }

    impl Harness {
        fn new() -> Self {
            let mut store = PlayerStore::in_memory(3);
            let player = store.resolve_session();
            Self {
                store,
                player,
                clock: ManualClock::new(10_000.0),
                presenter: RecordingPresenter::default(),
                navigator: RecordingNavigator::default(),
            }
        }

        fn ctx(&mut self) -> SceneContext<'_> {
            SceneContext {
                player: &self.player,
                store: &mut self.store,
                clock: &self.clock,
                presenter: &mut self.presenter,
                navigator: &mut self.navigator,
            }
        }
    }

    fn package_click() -> InputEvent {
        match MinigameConfig::logistics().progress {
            ProgressSpec::Counter { hit_area, .. } => {
                let c = (hit_area.min + hit_area.max) * 0.5;
                InputEvent::click(c.x, c.y)
            }
            _ => unreachable!(),
        }
    }

    fn started(config: MinigameConfig, h: &mut Harness) -> SessionStateMachine {
        let mut machine = SessionStateMachine::new(config);
        machine.activate(&mut h.ctx());
        machine.handle_input(&InputEvent::click(1.0, 1.0), &mut h.ctx());
        assert_eq!(machine.phase(), SessionPhase::Active);
        machine
    }

    /// Clicks the package `n` times, `gap_ms` apart (past the animation lock).
    fn open_packages(machine: &mut SessionStateMachine, h: &mut Harness, n: usize, gap_ms: f64) {
        for _ in 0..n {
            h.clock.advance_ms(gap_ms);
            let outcome = machine.handle_input(&package_click(), &mut h.ctx());
            assert!(outcome.is_some_and(|o| o.accepted));
        }
    }

    #[test]
    fn activation_shows_briefing() {
        let mut h = Harness::new();
        let mut machine = SessionStateMachine::new(MinigameConfig::logistics());
        assert_eq!(machine.phase(), SessionPhase::Idle);
        machine.activate(&mut h.ctx());
        assert_eq!(machine.phase(), SessionPhase::Briefing { replay: false });
        assert_eq!(h.presenter.calls[0], PresenterCall::Entry);
        assert_eq!(h.presenter.briefings(), vec![MinigameConfig::logistics().briefing.as_str()]);
        assert!(h.presenter.calls.contains(&PresenterCall::Highlight(TargetId(1))));
    }

    #[test]
    fn input_before_activation_is_ignored() {
        let mut h = Harness::new();
        let mut machine = SessionStateMachine::new(MinigameConfig::logistics());
        assert_eq!(machine.handle_input(&package_click(), &mut h.ctx()), None);
        assert_eq!(machine.phase(), SessionPhase::Idle);
        assert!(h.presenter.calls.is_empty());
    }

    #[test]
    fn briefing_press_starts_without_scoring() {
        let mut h = Harness::new();
        let mut machine = SessionStateMachine::new(MinigameConfig::logistics());
        machine.activate(&mut h.ctx());
        assert_eq!(machine.handle_input(&package_click(), &mut h.ctx()), None);
        assert_eq!(machine.phase(), SessionPhase::Active);
        assert_eq!(machine.fraction(), 0.0);
        assert_eq!(h.presenter.last_progress(), Some(0.0));
    }

    #[test]
    fn placement_during_briefing_is_a_no_op() {
        let mut h = Harness::new();
        let mut machine = SessionStateMachine::new(MinigameConfig::puzzle());
        machine.activate(&mut h.ctx());
        let drop = InputEvent::DragEnd { piece: PieceId(0), x: 300.0, y: 200.0 };
        assert_eq!(machine.handle_input(&drop, &mut h.ctx()), None);
        assert_eq!(machine.tracker().current(), 0);
        assert!(matches!(machine.phase(), SessionPhase::Briefing { .. }));
    }

    #[test]
    fn fast_logistics_run_earns_gold() {
        let mut h = Harness::new();
        let mut machine = started(MinigameConfig::logistics(), &mut h);
        open_packages(&mut machine, &mut h, 20, 1400.0);

        assert_eq!(machine.phase(), SessionPhase::Complete);
        let outcome = machine.outcome().unwrap();
        assert_eq!(outcome.medal, MedalTier::Gold);
        assert!((outcome.elapsed_secs - 28.0).abs() < 1e-9);
        assert_eq!(h.store.get_total_score(&h.player), 3);
        assert_eq!(h.presenter.completions(), vec![MedalTier::Gold]);
    }

    #[test]
    fn slow_run_earns_lower_tier() {
        let mut h = Harness::new();
        let mut machine = started(MinigameConfig::logistics(), &mut h);
        open_packages(&mut machine, &mut h, 20, 2500.0);
        assert_eq!(machine.outcome().unwrap().medal, MedalTier::Bronze);
        assert_eq!(h.store.get_total_score(&h.player), 1);
    }

    #[test]
    fn clicks_during_opening_animation_are_dropped() {
        let mut h = Harness::new();
        let mut machine = started(MinigameConfig::logistics(), &mut h);
        assert!(machine.handle_input(&package_click(), &mut h.ctx()).unwrap().accepted);
        h.clock.advance_ms(100.0);
        assert_eq!(machine.handle_input(&package_click(), &mut h.ctx()), None);
        h.clock.advance_ms(150.0);
        assert!(machine.handle_input(&package_click(), &mut h.ctx()).unwrap().accepted);
        assert_eq!(machine.tracker().current(), 2);
    }

    #[test]
    fn input_after_completion_is_ignored() {
        let mut h = Harness::new();
        let mut machine = started(MinigameConfig::logistics(), &mut h);
        open_packages(&mut machine, &mut h, 20, 500.0);
        let recorded = h.store.get_result(&h.player, GameId::Logistics).unwrap();

        h.clock.advance_ms(500.0);
        assert_eq!(machine.handle_input(&package_click(), &mut h.ctx()), None);
        assert_eq!(machine.phase(), SessionPhase::Complete);
        assert_eq!(h.store.get_result(&h.player, GameId::Logistics), Some(recorded));
    }

    #[test]
    fn duplicate_completion_records_once() {
        let mut h = Harness::new();
        let mut machine = started(MinigameConfig::logistics(), &mut h);
        open_packages(&mut machine, &mut h, 20, 500.0);
        let first = h.store.get_result(&h.player, GameId::Logistics).unwrap();

        h.clock.advance_secs(30.0);
        assert!(!machine.complete(&mut h.ctx()));
        assert_eq!(h.store.get_result(&h.player, GameId::Logistics), Some(first));
        assert_eq!(h.presenter.completions().len(), 1);
    }

    #[test]
    fn drone_ignores_clicks_during_launch() {
        let mut h = Harness::new();
        let mut machine = started(MinigameConfig::field_treatment(), &mut h);
        h.clock.advance_ms(400.0);
        assert_eq!(machine.handle_input(&InputEvent::click(50.0, 50.0), &mut h.ctx()), None);
        h.clock.advance_ms(400.0);
        assert!(machine.handle_input(&InputEvent::click(50.0, 50.0), &mut h.ctx()).unwrap().accepted);
    }

    #[test]
    fn burst_clicks_are_debounced() {
        let mut h = Harness::new();
        let mut machine = started(MinigameConfig::field_treatment(), &mut h);
        h.clock.advance_ms(800.0);
        let mut accepted = 0;
        for _ in 0..40 {
            if machine
                .handle_input(&InputEvent::click(50.0, 50.0), &mut h.ctx())
                .is_some_and(|o| o.accepted)
            {
                accepted += 1;
            }
            h.clock.advance_ms(10.0);
        }
        assert_eq!(accepted, 8);
        assert_eq!(machine.phase(), SessionPhase::Active);

        // Real time finishes the job.
        for _ in 0..22 {
            h.clock.advance_ms(60.0);
            machine.handle_input(&InputEvent::click(50.0, 50.0), &mut h.ctx());
        }
        assert_eq!(machine.phase(), SessionPhase::Complete);
        assert_eq!(machine.outcome().unwrap().medal, MedalTier::Gold);
    }

    #[test]
    fn puzzle_completes_when_all_slots_filled() {
        let mut h = Harness::new();
        let config = MinigameConfig::puzzle();
        let targets: Vec<(PieceId, Vec2)> = match &config.progress {
            ProgressSpec::Placement { slots, .. } => slots.iter().map(|s| (s.piece, s.target)).collect(),
            _ => unreachable!(),
        };
        let mut machine = started(config, &mut h);

        let (piece, target) = targets[0];
        let miss = InputEvent::DragEnd { piece, x: target.x + 45.0, y: target.y };
        assert!(!machine.handle_input(&miss, &mut h.ctx()).unwrap().accepted);

        for (piece, target) in targets {
            h.clock.advance_secs(3.0);
            let drop = InputEvent::DragEnd { piece, x: target.x + 5.0, y: target.y - 5.0 };
            assert!(machine.handle_input(&drop, &mut h.ctx()).unwrap().accepted);
        }
        assert_eq!(machine.phase(), SessionPhase::Complete);
        assert_eq!(machine.fraction(), 1.0);
        assert_eq!(machine.outcome().unwrap().medal, MedalTier::Gold);
    }

    #[test]
    fn drag_moves_produce_hints_only() {
        let mut h = Harness::new();
        let mut machine = started(MinigameConfig::puzzle(), &mut h);
        let hover = InputEvent::DragMove { piece: PieceId(0), x: 320.0, y: 200.0 };
        assert_eq!(machine.handle_input(&hover, &mut h.ctx()), None);
        assert_eq!(machine.tracker().current(), 0);
        assert!(h.presenter.calls.contains(&PresenterCall::Hint(PieceId(0), HintBand::Hot)));
    }

    #[test]
    fn timer_reports_each_whole_second_once() {
        let mut h = Harness::new();
        let mut machine = started(MinigameConfig::logistics(), &mut h);
        for _ in 0..5 {
            h.clock.advance_ms(400.0);
            machine.tick(&mut h.ctx());
        }
        let timers: Vec<u32> = h
            .presenter
            .calls
            .iter()
            .filter_map(|c| match c {
                PresenterCall::Timer(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(timers, vec![0, 1, 2]);
    }

    #[test]
    fn replay_returns_to_briefing_and_keeps_best() {
        let mut h = Harness::new();
        let mut machine = started(MinigameConfig::logistics(), &mut h);
        open_packages(&mut machine, &mut h, 20, 500.0);
        assert_eq!(machine.outcome().unwrap().medal, MedalTier::Gold);

        assert!(machine.replay(&mut h.ctx()));
        assert_eq!(machine.phase(), SessionPhase::Briefing { replay: true });
        assert_eq!(h.presenter.briefings().last().copied(), Some(MinigameConfig::logistics().replay_briefing.as_str()));

        machine.handle_input(&InputEvent::click(1.0, 1.0), &mut h.ctx());
        assert_eq!(machine.fraction(), 0.0);
        open_packages(&mut machine, &mut h, 20, 3500.0);
        assert_eq!(machine.outcome().unwrap().medal, MedalTier::None);
        assert_eq!(machine.outcome().unwrap().recorded.medal, MedalTier::Gold);
        assert_eq!(h.store.get_total_score(&h.player), 3);
    }

    #[test]
    fn replay_is_refused_outside_complete() {
        let mut h = Harness::new();
        let mut machine = started(MinigameConfig::logistics(), &mut h);
        assert!(!machine.replay(&mut h.ctx()));
        assert_eq!(machine.phase(), SessionPhase::Active);
    }

    #[test]
    fn completed_game_reopens_on_replay_offer() {
        let mut h = Harness::new();
        h.store.record_result(&h.player.clone(), GameId::Puzzle, MedalTier::Bronze, 1.0);
        let mut machine = SessionStateMachine::new(MinigameConfig::puzzle());
        machine.activate(&mut h.ctx());
        assert_eq!(machine.phase(), SessionPhase::Briefing { replay: true });
    }

    #[test]
    fn navigation_only_from_briefing_or_complete() {
        let mut h = Harness::new();
        let mut machine = SessionStateMachine::new(MinigameConfig::logistics());
        assert!(!machine.request_navigation(SceneId::SceneSelect, &mut h.ctx()));

        machine.activate(&mut h.ctx());
        assert!(machine.request_navigation(SceneId::SceneSelect, &mut h.ctx()));

        machine.handle_input(&package_click(), &mut h.ctx());
        assert!(!machine.request_navigation(SceneId::Summary, &mut h.ctx()));
        assert_eq!(h.navigator.visited, vec![SceneId::SceneSelect]);
    }
}
