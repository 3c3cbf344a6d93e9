use glam::Vec2;
use minigame_engine::api::config::{ProgressSpec, SlotSpec};
use minigame_engine::scoring::MedalThresholds;
use minigame_engine::{CharacterDescriptor, CharacterId, GameId, MinigameConfig, PieceId, SuiteManifest};

/// Picture puzzle board: a 3x2 grid centered on the 800x600 stage.
const PUZZLE_COLS: u32 = 3;
const PUZZLE_ROWS: u32 = 2;
const CELL: f32 = 160.0;

fn puzzle_slots() -> Vec<SlotSpec> {
    let origin = Vec2::new(400.0 - CELL * (PUZZLE_COLS as f32 - 1.0) / 2.0, 300.0 - CELL / 2.0);
    (0..PUZZLE_COLS * PUZZLE_ROWS)
        .map(|i| SlotSpec {
            piece: PieceId(i),
            target: origin + Vec2::new((i % PUZZLE_COLS) as f32, (i / PUZZLE_COLS) as f32) * CELL,
        })
        .collect()
}

/// The built-in catalog. A host may still replace it with `game_load_manifest`.
pub fn manifest() -> SuiteManifest {
    let mut games: Vec<MinigameConfig> = GameId::ALL.into_iter().map(MinigameConfig::preset).collect();

    for config in &mut games {
        if config.game == GameId::Puzzle {
            config.title = "Farm Picture".into();
            config.progress = ProgressSpec::Placement {
                slots: puzzle_slots(),
                acceptance_fraction: 36.0 / 800.0,
            };
            if let Ok(thresholds) = MedalThresholds::new(30.0, 50.0, 75.0) {
                config.thresholds = thresholds;
            }
        }
    }

    SuiteManifest {
        characters: vec![
            CharacterDescriptor { id: CharacterId(1), name: "Ava".into() },
            CharacterDescriptor { id: CharacterId(2), name: "Leo".into() },
            CharacterDescriptor { id: CharacterId(3), name: "Mira".into() },
        ],
        games,
    }
}
