//! Game configuration: rule variants and driver timings
//!
//! Loaded from / saved to JSON. Every field has a default, so a partial file
//! only overrides what it names.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// What happens to an enemy piece a king moves past
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KingPass {
    /// The enemy on the king's path is always captured
    Capture,
    /// The king may pass one enemy; it is only removed on a two-square jump
    Lenient,
}

impl Default for KingPass {
    fn default() -> Self {
        KingPass::Capture
    }
}

/// Result when the side to move has no legal move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stalemate {
    /// The game ends without a winner and no score changes
    Draw,
    /// The side to move loses
    Loss,
}

impl Default for Stalemate {
    fn default() -> Self {
        Stalemate::Draw
    }
}

/// Rule variants enforced by the validator and terminal check
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub king_pass: KingPass,
    pub stalemate: Stalemate,
}

/// Advisory timings for the driver loop, in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// How long a "Wrong Move" notice stays up
    pub wrong_move_ms: u64,
    /// How long the end-of-game notice stays up
    pub game_over_ms: u64,
    /// Pause between game end and the automatic reset
    pub postgame_pause_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            wrong_move_ms: 1_000,
            game_over_ms: 3_000,
            postgame_pause_ms: 3_000,
        }
    }
}

impl Timing {
    pub fn wrong_move(&self) -> Duration {
        Duration::from_millis(self.wrong_move_ms)
    }

    pub fn game_over(&self) -> Duration {
        Duration::from_millis(self.game_over_ms)
    }

    pub fn postgame_pause(&self) -> Duration {
        Duration::from_millis(self.postgame_pause_ms)
    }
}

/// Full configuration for a game session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rules: RuleSet,
    pub timing: Timing,
}

impl GameConfig {
    /// Set the king pass rule
    pub fn with_king_pass(mut self, king_pass: KingPass) -> Self {
        self.rules.king_pass = king_pass;
        self
    }

    /// Set the stalemate rule
    pub fn with_stalemate(mut self, stalemate: Stalemate) -> Self {
        self.rules.stalemate = stalemate;
        self
    }

    /// Set driver timings
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.rules.king_pass, KingPass::Capture);
        assert_eq!(config.rules.stalemate, Stalemate::Draw);
        assert_eq!(config.timing.wrong_move(), Duration::from_secs(1));
        assert_eq!(config.timing.game_over(), Duration::from_secs(3));
    }

    #[test]
    fn test_builders() {
        let config = GameConfig::default()
            .with_king_pass(KingPass::Lenient)
            .with_stalemate(Stalemate::Loss);
        assert_eq!(config.rules.king_pass, KingPass::Lenient);
        assert_eq!(config.rules.stalemate, Stalemate::Loss);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"rules": {"stalemate": "loss"}}"#).unwrap();
        assert_eq!(config.rules.stalemate, Stalemate::Loss);
        assert_eq!(config.rules.king_pass, KingPass::Capture);
        assert_eq!(config.timing, Timing::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "checkers-config-test-{}.json",
            std::process::id()
        ));
        let config = GameConfig::default().with_timing(Timing {
            wrong_move_ms: 250,
            game_over_ms: 500,
            postgame_pause_ms: 0,
        });
        config.save(&path).unwrap();
        let loaded = GameConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameConfig::load(Path::new("/nonexistent/checkers.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
