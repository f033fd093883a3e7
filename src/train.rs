use std::path::PathBuf;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    algo::tabular::{q_table::QTableAgent, table::QTable},
    config::{Config, GameConfig},
    ds::RingBuffer,
    error::Result,
    gym::{SnakeField, StateKey},
    util::mean,
};

/// Configuration of the training loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Hard upper bound on the number of episodes
    pub max_episodes: u32,
    /// Log progress every this many episodes
    pub report_interval: u32,
    /// Number of recent episodes in the rolling average
    pub window: usize,
    /// Check for a plateau every this many episodes
    pub check_interval: u32,
    /// Minimum rolling average improvement that counts as progress
    pub plateau_threshold: f32,
    /// Consecutive checks without progress before stopping early
    pub plateau_patience: u32,
    /// Offer a demo every this many episodes
    pub demo_interval: Option<u32>,
    /// Save the table every this many episodes
    pub checkpoint_interval: Option<u32>,
    /// Where the trained table is written
    pub table_path: PathBuf,
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_episodes: 10_000,
            report_interval: 100,
            window: 100,
            check_interval: 500,
            plateau_threshold: 0.1,
            plateau_patience: 5,
            demo_interval: None,
            checkpoint_interval: None,
            table_path: PathBuf::from("q_table.json"),
            seed: None,
        }
    }
}

/// Parse a console interval entry, where anything but a positive integer disables the feature
pub fn parse_interval(input: &str) -> Option<u32> {
    input
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|&n| n > 0)
        .and_then(|n| u32::try_from(n).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `max_episodes` were played
    EpisodeBudget,
    /// The rolling average stopped improving
    Plateau,
    /// A [`TrainingHook`] asked to stop
    Interrupted,
}

/// Answer of a [`TrainingHook`] at an episode boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

/// Snapshot of the run after an episode
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// Completed episodes
    pub episode: u32,
    pub max_episodes: u32,
    pub score: u32,
    /// Total reward of the episode
    pub reward: f32,
    /// Length of the episode
    pub steps: u32,
    /// Rolling average of the last `window` scores
    pub average: f32,
    pub best_score: u32,
    /// Exploration rate of the next episode
    pub epsilon: f32,
    pub scores: &'a [u32],
}

/// Pause points of the training loop, all called between episodes
///
/// The loop blocks for as long as a hook method runs.
pub trait TrainingHook {
    fn on_episode(&mut self, _progress: &Progress<'_>) -> Control {
        Control::Continue
    }

    /// Called every `demo_interval` episodes, after the table was checkpointed to disk
    fn on_demo_checkpoint(&mut self, _table: &QTable<StateKey>, _game: &GameConfig) {}
}

impl TrainingHook for () {}

/// Early stopping on a stagnating rolling average
#[derive(Debug, Clone)]
pub struct PlateauDetector {
    best: f32,
    count: u32,
    threshold: f32,
    patience: u32,
}

impl PlateauDetector {
    pub fn new(threshold: f32, patience: u32) -> Self {
        Self {
            best: 0.0,
            count: 0,
            threshold,
            patience,
        }
    }

    /// Record a checkpoint average
    ///
    /// **Returns** `true` once `patience` consecutive checks improved on the best average by less than `threshold`
    pub fn check(&mut self, average: f32) -> bool {
        if average - self.best < self.threshold {
            self.count += 1;
            self.count >= self.patience
        } else {
            self.best = average;
            self.count = 0;
            false
        }
    }

    pub fn best(&self) -> f32 {
        self.best
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Result of a training run
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub table: QTable<StateKey>,
    /// Final score of every episode, in order
    pub scores: Vec<u32>,
    pub best_score: u32,
    /// Rolling average over the last `window` episodes
    ///
    /// Runs shorter than `window` average over the episodes they played.
    pub final_average: f32,
    pub epsilon: f32,
    pub episodes: u32,
    pub stop: StopReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    EpisodeStart,
    InEpisode,
    EpisodeEnd,
    PlateauCheck,
    Stopped(StopReason),
}

/// Drives episodes of a [`QTableAgent`] on a [`SnakeField`] until the budget is spent or progress stalls
pub struct Trainer {
    config: TrainConfig,
    game: GameConfig,
    env: SnakeField,
    agent: QTableAgent<SnakeField>,
    scores: Vec<u32>,
    window: RingBuffer<u32>,
    plateau: PlateauDetector,
    phase: Phase,
    last_score: u32,
}

impl Trainer {
    pub fn new(config: Config) -> Result<Self> {
        let Config { game, agent, train } = config;
        let env = SnakeField::new(game.clone(), train.seed)?;
        let agent = QTableAgent::new(&agent, train.seed.map(|s| s.wrapping_add(1)))?;
        Ok(Self {
            window: RingBuffer::new(train.window.max(1)),
            plateau: PlateauDetector::new(train.plateau_threshold, train.plateau_patience),
            scores: Vec::with_capacity(train.max_episodes as usize),
            phase: Phase::EpisodeStart,
            last_score: 0,
            config: train,
            game,
            env,
            agent,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn average(&self) -> f32 {
        mean(self.window.view())
    }

    fn best_score(&self) -> u32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }

    fn is_due(interval: Option<u32>, episode: u32) -> bool {
        interval.is_some_and(|every| every > 0 && episode % every == 0)
    }

    /// Run the state machine to completion, then persist the table
    pub fn run<H: TrainingHook + ?Sized>(mut self, hook: &mut H) -> Result<TrainedModel> {
        info!(
            "training for up to {} episodes on a {}x{} grid",
            self.config.max_episodes, self.game.grid_size, self.game.grid_size
        );
        loop {
            self.phase = match self.phase {
                Phase::EpisodeStart => {
                    if self.agent.episode() >= self.config.max_episodes {
                        Phase::Stopped(StopReason::EpisodeBudget)
                    } else {
                        Phase::InEpisode
                    }
                }
                Phase::InEpisode => {
                    self.last_score = self.agent.go(&mut self.env);
                    Phase::EpisodeEnd
                }
                Phase::EpisodeEnd => self.end_episode(hook)?,
                Phase::PlateauCheck => {
                    let average = self.average();
                    let stalled = self.plateau.check(average);
                    debug!(
                        "plateau check at episode {}: avg {average:.2}, best {:.2}, {} stalled",
                        self.agent.episode(),
                        self.plateau.best(),
                        self.plateau.count()
                    );
                    if stalled {
                        info!(
                            "early stopping at episode {} (plateau detected)",
                            self.agent.episode()
                        );
                        Phase::Stopped(StopReason::Plateau)
                    } else {
                        Phase::EpisodeStart
                    }
                }
                Phase::Stopped(reason) => return self.finish(reason),
            };
        }
    }

    fn end_episode<H: TrainingHook + ?Sized>(&mut self, hook: &mut H) -> Result<Phase> {
        let episode = self.agent.episode();
        let score = self.last_score;
        self.scores.push(score);
        self.window.push(score);
        let reward = self.env.report["reward"] as f32;
        let steps = self.env.report["steps"] as u32;
        self.env.report.take();

        if Self::is_due(Some(self.config.report_interval), episode) {
            info!(
                "Episode {episode}/{} | Score: {score} | Avg({}): {:.2} | Best: {} | ε: {:.3}",
                self.config.max_episodes,
                self.window.len(),
                self.average(),
                self.best_score(),
                self.agent.epsilon(),
            );
        }

        if Self::is_due(self.config.demo_interval, episode) {
            info!("demo checkpoint after {episode} episodes");
            self.agent.q_table().save(&self.config.table_path)?;
            hook.on_demo_checkpoint(self.agent.q_table(), &self.game);
            info!("resuming training");
        }

        if Self::is_due(self.config.checkpoint_interval, episode) {
            self.agent.q_table().save(&self.config.table_path)?;
            debug!("checkpoint saved after {episode} episodes");
        }

        let progress = Progress {
            episode,
            max_episodes: self.config.max_episodes,
            score,
            reward,
            steps,
            average: self.average(),
            best_score: self.best_score(),
            epsilon: self.agent.epsilon(),
            scores: &self.scores,
        };
        if hook.on_episode(&progress) == Control::Stop {
            info!("training interrupted at episode {episode}");
            return Ok(Phase::Stopped(StopReason::Interrupted));
        }

        Ok(if Self::is_due(Some(self.config.check_interval), episode) {
            Phase::PlateauCheck
        } else {
            Phase::EpisodeStart
        })
    }

    fn finish(self, stop: StopReason) -> Result<TrainedModel> {
        self.agent.q_table().save(&self.config.table_path)?;

        let final_average = self.average();
        let best_score = self.best_score();
        info!("training complete after {} episodes ({stop:?})", self.agent.episode());
        info!("final avg score: {final_average:.2}");
        info!("best score: {best_score}");
        info!("q-table saved to {}", self.config.table_path.display());

        Ok(TrainedModel {
            epsilon: self.agent.epsilon(),
            episodes: self.agent.episode(),
            table: self.agent.into_q_table(),
            scores: self.scores,
            best_score,
            final_average,
            stop,
        })
    }
}

/// Train a fresh agent without any pause points
pub fn train(config: &Config) -> Result<TrainedModel> {
    Trainer::new(config.clone())?.run(&mut ())
}
