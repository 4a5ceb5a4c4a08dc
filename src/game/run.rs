//! # Run
//!
//! A sequence of levels played by one named player.
//!
//! Clearing a level generates the next one and carries the player over with a
//! health bonus and the same gold. The run ends in victory after the last level or
//! in defeat when the player dies; either way the final score is reported to the
//! run's [`ScoreSink`] once.

use crate::config;
use crate::game::{Action, LevelState, LevelStatus, Player, TurnOutcome};
use crate::generation::{GenerationConfig, LevelGenerator};
use crate::leaderboard::{Leaderboard, Score, ScoreSink};
use crate::{DelveError, DelveResult};
use log::info;
use serde::{Deserialize, Serialize};

/// Tunable parameters of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Levels to clear for a victory
    pub max_levels: u32,
    /// Template for every level; a seed is offset by the level number
    pub generation: GenerationConfig,
}

impl RunConfig {
    pub fn validate(&self) -> DelveResult<()> {
        if self.max_levels == 0 {
            return Err(DelveError::InvalidConfig(
                "A run needs at least one level".to_string(),
            ));
        }
        self.generation.validate()
    }

    /// Generation settings for a 1-based level number.
    pub fn generation_for(&self, level_number: u32) -> GenerationConfig {
        let mut generation = self.generation.clone();
        generation.seed = generation
            .seed
            .map(|seed| seed.wrapping_add(u64::from(level_number.saturating_sub(1))));
        generation
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_levels: config::MAX_LEVELS,
            generation: GenerationConfig::default(),
        }
    }
}

/// Overall state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    Playing,
    Victory,
    Defeat,
}

/// What a single [`Run::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTurn {
    pub outcome: TurnOutcome,
    pub status: RunStatus,
    /// Level being played after this turn, 1-based
    pub level_number: u32,
    /// True when this turn cleared a level and a new one was generated
    pub advanced: bool,
}

/// A multi-level game in progress.
#[derive(Debug)]
pub struct Run<S: ScoreSink = Leaderboard> {
    config: RunConfig,
    level: LevelState,
    level_number: u32,
    status: RunStatus,
    final_score: Option<Score>,
    sink: S,
}

impl Run<Leaderboard> {
    /// Starts a run on level 1 with a fresh player, scoring into a new leaderboard.
    pub async fn start(name: impl Into<String>, config: RunConfig) -> DelveResult<Self> {
        Self::start_with_sink(name, config, Leaderboard::new()).await
    }
}

impl<S: ScoreSink> Run<S> {
    /// Starts a run on level 1 with a fresh player.
    pub async fn start_with_sink(
        name: impl Into<String>,
        config: RunConfig,
        sink: S,
    ) -> DelveResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DelveError::InvalidConfig(
                "Player name must not be empty".to_string(),
            ));
        }
        config.validate()?;

        let generated = LevelGenerator::new(config.generation_for(1))?
            .generate()
            .await?;
        let player = Player::new(name, generated.player_start);
        let level = LevelState::from_generated(generated, player);
        info!("Run started for {}", level.player().name);

        Self::resume(config, level, 1, sink)
    }

    /// Continues a run from an already built level.
    pub fn resume(
        config: RunConfig,
        level: LevelState,
        level_number: u32,
        sink: S,
    ) -> DelveResult<Self> {
        config.validate()?;
        if level_number == 0 || level_number > config.max_levels {
            return Err(DelveError::InvalidConfig(format!(
                "Level {} is outside 1..={}",
                level_number, config.max_levels
            )));
        }
        if level.is_finished() {
            return Err(DelveError::InvalidState(
                "Cannot resume on a finished level".to_string(),
            ));
        }

        Ok(Self {
            config,
            level,
            level_number,
            status: RunStatus::Playing,
            final_score: None,
            sink,
        })
    }

    pub fn level(&self) -> &LevelState {
        &self.level
    }

    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Score reported when the run ended.
    pub fn final_score(&self) -> Option<&Score> {
        self.final_score.as_ref()
    }

    pub fn score_sink(&self) -> &S {
        &self.sink
    }

    pub fn into_score_sink(self) -> S {
        self.sink
    }

    /// Plays one action on the current level, moving on when it is cleared.
    pub async fn submit(&mut self, action: Action) -> DelveResult<RunTurn> {
        if self.status != RunStatus::Playing {
            return Err(DelveError::InvalidState(format!(
                "Run already ended with {:?}",
                self.status
            )));
        }

        let outcome = self.level.apply_action(action)?;
        let mut advanced = false;

        match outcome.status {
            LevelStatus::InProgress => {}
            LevelStatus::PlayerDied => self.finish(RunStatus::Defeat),
            LevelStatus::Cleared if self.level_number >= self.config.max_levels => {
                self.finish(RunStatus::Victory)
            }
            LevelStatus::Cleared => {
                self.advance().await?;
                advanced = true;
            }
        }

        Ok(RunTurn {
            outcome,
            status: self.status,
            level_number: self.level_number,
            advanced,
        })
    }

    async fn advance(&mut self) -> DelveResult<()> {
        let next_number = self.level_number + 1;
        let generated = LevelGenerator::new(self.config.generation_for(next_number))?
            .generate()
            .await?;
        let player = self.level.player().carry_over(generated.player_start);

        self.level = LevelState::from_generated(generated, player);
        self.level_number = next_number;
        info!(
            "Level {} reached with {} health and {} gold",
            next_number,
            self.level.player().health,
            self.level.player().gold()
        );
        Ok(())
    }

    fn finish(&mut self, status: RunStatus) {
        let player = self.level.player();
        let score = Score::new(player.name.clone(), player.gold());
        info!(
            "Run ended with {:?} on level {}: {} scored {}",
            status,
            self.level_number,
            score.name,
            score.score
        );

        self.status = status;
        self.sink.record(score.clone());
        self.final_score = Some(score);
    }
}
