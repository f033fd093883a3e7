use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    algo::Exp,
    assert_interval,
    decay::Multiplicative,
    env::{DiscreteActionSpace, Environment, Step},
    error::Result,
    exploration::{Choice, EpsilonGreedy},
    gym::Turn,
};

use super::{table::QTable, Hashable};

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QTableAgentConfig {
    /// Learning rate, in `[0, 1]`
    pub alpha: f32,
    /// Discount factor, in `[0, 1]`
    pub gamma: f32,
    pub epsilon_start: f32,
    /// Factor applied to epsilon after every episode
    pub epsilon_decay: f32,
    pub epsilon_min: f32,
}

impl Default for QTableAgentConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon_start: 1.0,
            epsilon_decay: 0.995,
            epsilon_min: 0.01,
        }
    }
}

impl QTableAgentConfig {
    pub fn exploration(&self) -> Result<EpsilonGreedy<Multiplicative>> {
        Multiplicative::new(self.epsilon_decay, self.epsilon_start, self.epsilon_min)
            .map(EpsilonGreedy::new)
    }
}

/// A simple Q-learning agent that utilizes a Q-table to learn its environment
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
///     - Actions are the three relative [turns](Turn), one q-value each
///     - The state type must be `Copy`, `Eq`, and `Hash` to be used as a key in the table
pub struct QTableAgent<E>
where
    E: Environment<Action = Turn> + DiscreteActionSpace,
    E::State: Hashable,
{
    q_table: QTable<E::State>,
    exploration: EpsilonGreedy<Multiplicative>,
    alpha: f32,   // learning rate
    gamma: f32,   // discount factor
    episode: u32, // completed episodes
    rng: StdRng,
}

impl<E> QTableAgent<E>
where
    E: Environment<Action = Turn> + DiscreteActionSpace,
    E::State: Hashable,
{
    /// Initialize a new `QTableAgent` with an empty table
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(config: &QTableAgentConfig, seed: Option<u64>) -> Result<Self> {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert_interval!(config.gamma, 0.0, 1.0);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            q_table: QTable::new(),
            exploration: config.exploration()?,
            alpha: config.alpha,
            gamma: config.gamma,
            episode: 0,
            rng,
        })
    }

    pub fn q_table(&self) -> &QTable<E::State> {
        &self.q_table
    }

    pub fn into_q_table(self) -> QTable<E::State> {
        self.q_table
    }

    /// Number of completed episodes
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Exploration rate used by the next episode
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon(self.episode)
    }

    fn act(&mut self, env: &E, state: E::State) -> Turn {
        match self.exploration.choose(self.episode, &mut self.rng) {
            Choice::Explore => env.random_action(&mut self.rng),
            Choice::Exploit => self.q_table.best_action(state),
        }
    }

    /// Off-policy update towards the greedy value of the successor state
    fn learn(&mut self, experience: Exp<E::State, Turn>) {
        let Exp {
            state,
            action,
            next_state,
            reward,
        } = experience;

        let q_value = self.q_table.get(state, action);
        let max_next_q = self.q_table.max_value(next_state);
        let new_q_value = q_value + self.alpha * (reward + self.gamma * max_next_q - q_value);

        self.q_table.set(state, action, new_q_value);
    }

    /// Play and learn from one episode
    ///
    /// **Returns** the final score of the episode
    pub fn go(&mut self, env: &mut E) -> u32 {
        let mut state = env.reset();
        loop {
            let action = self.act(env, state);
            let Step {
                state: next_state,
                reward,
                done,
                score,
            } = env.step(action);

            self.learn(Exp {
                state,
                action,
                next_state,
                reward,
            });
            state = next_state;

            if done {
                self.episode += 1;
                return score;
            }
        }
    }
}
