//! Top-level session context.
//!
//! One controller lives for the whole play-through. It owns the player
//! store, the character choice and at most one scene; entering a new scene
//! or leaving the current one drops the old state machine along with its
//! progress and timers.

use serde::Serialize;

use crate::api::config::ConfigError;
use crate::api::presenter::{Navigator, Presenter};
use crate::api::types::{CharacterId, GameId, MedalTier, SceneId};
use crate::assets::manifest::SuiteManifest;
use crate::core::session::{SceneContext, SessionStateMachine};
use crate::core::time::Clock;
use crate::input::queue::InputEvent;
use crate::progress::tracker::ActionOutcome;
use crate::store::player::{PlayerId, PlayerStore};
use crate::suite::command::SuiteCommand;

/// Data for the final summary screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteSummary {
    pub player: PlayerId,
    pub character: Option<CharacterSummary>,
    pub results: Vec<GameSummary>,
    pub total_score: u32,
    pub max_score: u32,
    pub all_played: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterSummary {
    pub id: CharacterId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub game: GameId,
    pub title: String,
    pub medal: MedalTier,
    pub last_played: Option<f64>,
}

pub struct SessionController<P: Presenter, N: Navigator> {
    manifest: SuiteManifest,
    store: PlayerStore,
    player: PlayerId,
    clock: Box<dyn Clock>,
    presenter: P,
    navigator: N,
    character: Option<CharacterId>,
    scene: Option<SessionStateMachine>,
}

impl<P: Presenter, N: Navigator> SessionController<P, N> {
    pub fn new(
        manifest: SuiteManifest,
        mut store: PlayerStore,
        clock: Box<dyn Clock>,
        presenter: P,
        navigator: N,
    ) -> Self {
        let player = store.resolve_session();
        Self {
            manifest,
            store,
            player,
            clock,
            presenter,
            navigator,
            character: None,
            scene: None,
        }
    }

    pub fn player(&self) -> &PlayerId {
        &self.player
    }

    pub fn character(&self) -> Option<CharacterId> {
        self.character
    }

    pub fn store(&self) -> &PlayerStore {
        &self.store
    }

    pub fn manifest(&self) -> &SuiteManifest {
        &self.manifest
    }

    pub fn scene(&self) -> Option<&SessionStateMachine> {
        self.scene.as_ref()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn total_score(&self) -> u32 {
        self.store.get_total_score(&self.player)
    }

    /// Replace the catalog. A rejected manifest leaves the current one in place.
    pub fn load_manifest_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let manifest = SuiteManifest::from_json(json)?;
        log::info!("manifest loaded: {} games, {} characters", manifest.games.len(), manifest.characters.len());
        self.manifest = manifest;
        Ok(())
    }

    pub fn select_character(&mut self, id: CharacterId) -> bool {
        if self.manifest.character(id).is_none() {
            log::warn!("unknown character {}", id.0);
            return false;
        }
        self.character = Some(id);
        true
    }

    /// Open a minigame scene, discarding whatever scene was open.
    pub fn enter_game(&mut self, game: GameId) -> bool {
        let Some(config) = self.manifest.game(game).cloned() else {
            log::warn!("no configuration for {}", game.as_str());
            return false;
        };
        self.leave_scene();
        log::info!("entering {}", game.as_str());

        let Self { scene, store, player, clock, presenter, navigator, .. } = self;
        let mut ctx = SceneContext { player, store, clock: clock.as_ref(), presenter, navigator };
        scene.insert(SessionStateMachine::new(config)).activate(&mut ctx);
        true
    }

    /// External scene exit. Any in-progress attempt is lost; nothing is recorded.
    pub fn leave_scene(&mut self) {
        if let Some(machine) = self.scene.take() {
            log::debug!(
                "leaving {} in {:?} at {:.0}%",
                machine.game().as_str(),
                machine.phase(),
                machine.fraction() * 100.0
            );
        }
    }

    /// Route one raw event: custom events are suite commands, everything
    /// else goes to the open scene.
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<ActionOutcome> {
        if let InputEvent::Custom { .. } = event {
            if let Some(command) = SuiteCommand::from_event(event) {
                self.dispatch(command);
            }
            return None;
        }
        let Self { scene, store, player, clock, presenter, navigator, .. } = self;
        let machine = scene.as_mut()?;
        let mut ctx = SceneContext { player, store, clock: clock.as_ref(), presenter, navigator };
        machine.handle_input(event, &mut ctx)
    }

    pub fn dispatch(&mut self, command: SuiteCommand) {
        log::debug!("command {:?}", command);
        match command {
            SuiteCommand::SelectCharacter(id) => {
                self.select_character(id);
            }
            SuiteCommand::EnterGame(game) => {
                self.navigate(SceneId::Game(game));
            }
            SuiteCommand::Replay => {
                self.replay();
            }
            SuiteCommand::Navigate(scene) => {
                self.navigate(scene);
            }
            SuiteCommand::Restart => self.restart(),
        }
    }

    /// Host clock tick.
    pub fn tick(&mut self) {
        let Self { scene, store, player, clock, presenter, navigator, .. } = self;
        if let Some(machine) = scene.as_mut() {
            let mut ctx = SceneContext { player, store, clock: clock.as_ref(), presenter, navigator };
            machine.tick(&mut ctx);
        }
    }

    pub fn replay(&mut self) -> bool {
        let Self { scene, store, player, clock, presenter, navigator, .. } = self;
        let Some(machine) = scene.as_mut() else {
            return false;
        };
        let mut ctx = SceneContext { player, store, clock: clock.as_ref(), presenter, navigator };
        machine.replay(&mut ctx)
    }

    /// User-requested navigation. While a minigame is open this is only
    /// honoured from its briefing or completion screen.
    pub fn navigate(&mut self, target: SceneId) -> bool {
        if let SceneId::Game(game) = target {
            if self.manifest.game(game).is_none() {
                log::warn!("no configuration for {}", game.as_str());
                return false;
            }
        }
        let allowed = {
            let Self { scene, store, player, clock, presenter, navigator, .. } = self;
            match scene.as_mut() {
                Some(machine) => {
                    let mut ctx = SceneContext { player, store, clock: clock.as_ref(), presenter, navigator };
                    machine.request_navigation(target, &mut ctx)
                }
                None => {
                    navigator.navigate_to(target);
                    true
                }
            }
        };
        if !allowed {
            log::debug!("navigation to {:?} refused mid-game", target);
            return false;
        }
        match target {
            SceneId::Game(game) => self.enter_game(game),
            _ => {
                self.leave_scene();
                true
            }
        }
    }

    /// Start the whole suite over: same session identity, clean slate.
    pub fn restart(&mut self) {
        self.leave_scene();
        self.character = None;
        self.store.reset_player(&self.player);
        self.navigator.navigate_to(SceneId::CharacterSelect);
        log::info!("session {} restarted", self.player);
    }

    pub fn summary(&self) -> SuiteSummary {
        let results: Vec<GameSummary> = self
            .manifest
            .games
            .iter()
            .map(|config| {
                let result = self.store.get_result(&self.player, config.game);
                GameSummary {
                    game: config.game,
                    title: config.title.clone(),
                    medal: result.map_or(MedalTier::None, |r| r.medal),
                    last_played: result.map(|r| r.last_played_timestamp),
                }
            })
            .collect();
        SuiteSummary {
            player: self.player.clone(),
            character: self
                .character
                .and_then(|id| self.manifest.character(id))
                .map(|c| CharacterSummary { id: c.id, name: c.name.clone() }),
            all_played: results.iter().all(|r| r.last_played.is_some()),
            max_score: results.len() as u32 * MedalTier::Gold.points(),
            total_score: self.total_score(),
            results,
        }
    }
}
