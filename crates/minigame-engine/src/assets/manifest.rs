use serde::{Deserialize, Serialize};

use crate::api::config::{ConfigError, MinigameConfig};
use crate::api::types::{CharacterId, GameId};

/// Catalog of everything a suite offers: characters and minigames.
/// Loaded from JSON at runtime or built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteManifest {
    #[serde(default)]
    pub characters: Vec<CharacterDescriptor>,
    pub games: Vec<MinigameConfig>,
}

/// A selectable character on the opening screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDescriptor {
    pub id: CharacterId,
    pub name: String,
}

impl SuiteManifest {
    /// Parse and validate a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let manifest: SuiteManifest = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.games.is_empty() {
            return Err(ConfigError::EmptySuite);
        }
        for (i, config) in self.games.iter().enumerate() {
            if self.games[..i].iter().any(|c| c.game == config.game) {
                return Err(ConfigError::DuplicateGame { game: config.game.as_str() });
            }
            config.validate()?;
        }
        Ok(())
    }

    pub fn game(&self, id: GameId) -> Option<&MinigameConfig> {
        self.games.iter().find(|c| c.game == id)
    }

    pub fn character(&self, id: CharacterId) -> Option<&CharacterDescriptor> {
        self.characters.iter().find(|c| c.id == id)
    }
}

impl Default for SuiteManifest {
    fn default() -> Self {
        Self {
            characters: vec![
                CharacterDescriptor { id: CharacterId(1), name: "Ava".into() },
                CharacterDescriptor { id: CharacterId(2), name: "Leo".into() },
            ],
            games: GameId::ALL.into_iter().map(MinigameConfig::preset).collect(),
        }
    }
}
