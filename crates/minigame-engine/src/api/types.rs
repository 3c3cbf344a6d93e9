use serde::{Deserialize, Serialize};

/// The three playable minigames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameId {
    /// Logistics packing: open packages one click at a time.
    Logistics,
    /// Picture puzzle: drag pieces onto their slots.
    Puzzle,
    /// Drone field treatment: rapid clicks while the drone is airborne.
    FieldTreatment,
}

impl GameId {
    pub const ALL: [GameId; 3] = [GameId::Logistics, GameId::Puzzle, GameId::FieldTreatment];

    /// Stable key used in persisted data and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            GameId::Logistics => "logistics",
            GameId::Puzzle => "puzzle",
            GameId::FieldTreatment => "field_treatment",
        }
    }

    /// Position in [`GameId::ALL`], used as the numeric code on the wire.
    pub fn index(self) -> u32 {
        match self {
            GameId::Logistics => 0,
            GameId::Puzzle => 1,
            GameId::FieldTreatment => 2,
        }
    }

    pub fn from_index(index: u32) -> Option<GameId> {
        GameId::ALL.get(index as usize).copied()
    }
}

/// Navigation destinations owned by the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneId {
    CharacterSelect,
    SceneSelect,
    Game(GameId),
    Summary,
}

impl SceneId {
    /// Numeric scene code shared with the host.
    pub fn code(self) -> u32 {
        match self {
            SceneId::CharacterSelect => 0,
            SceneId::SceneSelect => 1,
            SceneId::Game(game) => 2 + game.index(),
            SceneId::Summary => 5,
        }
    }

    pub fn from_code(code: u32) -> Option<SceneId> {
        match code {
            0 => Some(SceneId::CharacterSelect),
            1 => Some(SceneId::SceneSelect),
            2..=4 => GameId::from_index(code - 2).map(SceneId::Game),
            5 => Some(SceneId::Summary),
            _ => None,
        }
    }
}

/// Selectable player character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u32);

/// Identifier of the on-screen element the player should interact with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub u32);

/// Identifier of a draggable puzzle piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);

/// Ordered result classification: None < Bronze < Silver < Gold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedalTier {
    #[default]
    None,
    Bronze,
    Silver,
    Gold,
}

impl MedalTier {
    /// Score contribution of this medal.
    pub fn points(self) -> u32 {
        match self {
            MedalTier::None => 0,
            MedalTier::Bronze => 1,
            MedalTier::Silver => 2,
            MedalTier::Gold => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medal_ordering_matches_points() {
        assert!(MedalTier::None < MedalTier::Bronze);
        assert!(MedalTier::Bronze < MedalTier::Silver);
        assert!(MedalTier::Silver < MedalTier::Gold);
        assert_eq!(MedalTier::Gold.points(), 3);
        assert_eq!(MedalTier::None.points(), 0);
    }

    #[test]
    fn scene_codes_round_trip_through_games() {
        for game in GameId::ALL {
            let scene = SceneId::Game(game);
            assert_eq!(SceneId::from_code(scene.code()), Some(scene));
        }
        assert_eq!(SceneId::from_code(5), Some(SceneId::Summary));
        assert_eq!(SceneId::from_code(6), None);
    }

    #[test]
    fn game_id_serializes_as_snake_case() {
        let json = serde_json::to_string(&GameId::FieldTreatment).unwrap();
        assert_eq!(json, "\"field_treatment\"");
    }
}
