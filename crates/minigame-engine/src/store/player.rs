//! Session-scoped player identity and best-result persistence.
//!
//! Everything lives in a session key-value store as plain JSON. Storage
//! problems never reach the caller: a failed read or write switches the
//! store to memory-only for the rest of the session, and unreadable data is
//! treated as "no prior player".

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::api::types::{GameId, MedalTier};
use crate::core::rng::Rng;

/// Storage key holding the session identity token.
pub const SESSION_KEY: &str = "minigame.session_id";
/// Storage key holding the serialized player map.
pub const PLAYERS_KEY: &str = "minigame.players";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
    #[error("session storage rejected write to {key}: {reason}")]
    WriteRejected { key: String, reason: String },
    #[error("could not serialize player data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Session-scoped key-value storage (browser `sessionStorage` or a double).
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Opaque session identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    /// Clock reading (ms) of the most recent completion.
    pub last_played_timestamp: f64,
    pub medal: MedalTier,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub games: BTreeMap<GameId, GameResult>,
    pub total_score: u32,
}

impl Player {
    fn recompute_total(&mut self) {
        self.total_score = self.games.values().map(|r| r.medal.points()).sum();
    }
}

/// Whether a new medal may replace a better stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultPolicy {
    /// Keep the best medal; a worse or equal run only refreshes the timestamp.
    #[default]
    UpgradeOnly,
    /// Always keep the latest medal.
    Overwrite,
}

pub struct PlayerStore {
    storage: Box<dyn SessionStorage>,
    degraded: bool,
    session: Option<PlayerId>,
    players: BTreeMap<PlayerId, Player>,
    rng: Rng,
}

impl PlayerStore {
    /// `seed` feeds the identity token generator.
    pub fn new(storage: Box<dyn SessionStorage>, seed: u64) -> Self {
        let mut store = Self {
            storage,
            degraded: false,
            session: None,
            players: BTreeMap::new(),
            rng: Rng::new(seed),
        };
        store.players = store.load_players();
        store
    }

    /// A store that never persists.
    pub fn in_memory(seed: u64) -> Self {
        Self::new(Box::new(MemoryStorage::new()), seed)
    }

    fn load_players(&mut self) -> BTreeMap<PlayerId, Player> {
        let raw = match self.storage.get_item(PLAYERS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                self.degrade(&e);
                return BTreeMap::new();
            }
        };
        match serde_json::from_str::<BTreeMap<PlayerId, Player>>(&raw) {
            Ok(mut players) => {
                // Stored totals are derived data; never trust them.
                for player in players.values_mut() {
                    player.recompute_total();
                }
                players
            }
            Err(e) => {
                log::warn!("discarding malformed player data: {}", e);
                BTreeMap::new()
            }
        }
    }

    fn degrade(&mut self, err: &StorageError) {
        if !self.degraded {
            log::warn!("{}; continuing with in-memory player data", err);
        }
        self.degraded = true;
    }

    fn persist_players(&mut self) {
        if self.degraded {
            return;
        }
        let written = serde_json::to_string(&self.players)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set_item(PLAYERS_KEY, &json));
        if let Err(e) = written {
            self.degrade(&e);
        }
    }

    /// The identity for this session, created and persisted on first use.
    pub fn resolve_session(&mut self) -> PlayerId {
        if let Some(id) = &self.session {
            return id.clone();
        }

        let stored = if self.degraded {
            None
        } else {
            match self.storage.get_item(SESSION_KEY) {
                Ok(value) => value.filter(|v| !v.trim().is_empty()),
                Err(e) => {
                    self.degrade(&e);
                    None
                }
            }
        };

        let id = match stored {
            Some(token) => PlayerId(token),
            None => {
                let id = PlayerId(self.rng.session_token());
                if !self.degraded {
                    if let Err(e) = self.storage.set_item(SESSION_KEY, id.as_str()) {
                        self.degrade(&e);
                    }
                }
                log::info!("new session player {}", id);
                id
            }
        };

        if !self.players.contains_key(&id) {
            self.players.insert(id.clone(), Player::default());
            self.persist_players();
        }
        self.session = Some(id.clone());
        id
    }

    /// Upsert a result under [`ResultPolicy::UpgradeOnly`].
    pub fn record_result(
        &mut self,
        player: &PlayerId,
        game: GameId,
        medal: MedalTier,
        played_at_ms: f64,
    ) -> GameResult {
        self.record_result_with(player, game, medal, played_at_ms, ResultPolicy::UpgradeOnly)
    }

    pub fn record_result_with(
        &mut self,
        player: &PlayerId,
        game: GameId,
        medal: MedalTier,
        played_at_ms: f64,
        policy: ResultPolicy,
    ) -> GameResult {
        let record = self.players.entry(player.clone()).or_default();
        let stored = match (record.games.get(&game), policy) {
            (Some(prev), ResultPolicy::UpgradeOnly) if prev.medal >= medal => prev.medal,
            _ => medal,
        };
        let result = GameResult { last_played_timestamp: played_at_ms, medal: stored };
        record.games.insert(game, result);
        record.recompute_total();
        log::debug!(
            "{}: {} -> {:?} (total {})",
            player,
            game.as_str(),
            stored,
            record.total_score
        );
        self.persist_players();
        result
    }

    pub fn get_result(&self, player: &PlayerId, game: GameId) -> Option<GameResult> {
        self.players.get(player).and_then(|p| p.games.get(&game)).copied()
    }

    pub fn get_total_score(&self, player: &PlayerId) -> u32 {
        self.players.get(player).map_or(0, |p| p.total_score)
    }

    pub fn player(&self, player: &PlayerId) -> Option<&Player> {
        self.players.get(player)
    }

    /// Forget every recorded result for `player`.
    pub fn reset_player(&mut self, player: &PlayerId) {
        self.players.insert(player.clone(), Player::default());
        self.persist_players();
    }

    /// True once storage has failed and the store is memory-only.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Storage whose every call fails.
    #[derive(Debug, Default)]
    pub struct FailingStorage;

    impl SessionStorage for FailingStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }

        fn set_item(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteRejected { key: key.into(), reason: "quota".into() })
        }
    }
}
