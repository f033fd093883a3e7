use std::{collections::BTreeMap, ops::Index};

use rand::{seq::SliceRandom, Rng};

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Determine if the state is active or terminal
    fn is_active(&self) -> bool;

    /// Update the environment in response to an action taken by an agent
    ///
    /// The successor state is returned even when the step ends the episode.
    fn step(&mut self, action: Self::Action) -> Step<Self::State>;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;
}

/// An environment with a finite, state independent set of actions
pub trait DiscreteActionSpace: Environment {
    /// Get the available actions for the current state
    ///
    /// The returned slice should never be empty, instead specify an action that represents doing nothing if necessary.
    fn actions(&self) -> &'static [Self::Action];

    /// Pick one of the available actions uniformly at random
    fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Action
    where
        Self::Action: Copy + 'static,
    {
        *self
            .actions()
            .choose(rng)
            .expect("action space is not empty")
    }
}

/// Outcome of a single environment step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step<S> {
    /// State observed after the action
    pub state: S,
    pub reward: f32,
    /// Whether the episode ended with this step
    pub done: bool,
    /// Cumulative score of the current episode
    pub score: u32,
}

/// Named per-episode metrics accumulated by an environment
///
/// The key order is fixed at construction, so [`Report::values`] can be sent to a plot
/// without carrying the names along.
#[derive(Debug, Clone)]
pub struct Report {
    keys: Vec<&'static str>,
    map: BTreeMap<&'static str, f64>,
}

impl Report {
    pub fn new(keys: Vec<&'static str>) -> Self {
        let map = keys.iter().map(|&k| (k, 0.0)).collect();
        Self { keys, map }
    }

    /// Add `value` to the metric `key`
    ///
    /// **Panics** if `key` was not registered
    pub fn add(&mut self, key: &'static str, value: f64) {
        *self
            .map
            .get_mut(key)
            .unwrap_or_else(|| panic!("unknown report key `{key}`")) += value;
    }

    /// Overwrite the metric `key`
    pub fn set(&mut self, key: &'static str, value: f64) {
        if let Some(v) = self.map.get_mut(key) {
            *v = value;
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.map.get(key).copied()
    }

    /// Values in key order
    pub fn values(&self) -> Vec<f64> {
        self.keys.iter().map(|k| self.map[k]).collect()
    }

    /// Take the current values and reset every metric to zero
    pub fn take(&mut self) -> Vec<f64> {
        let values = self.values();
        self.map.values_mut().for_each(|v| *v = 0.0);
        values
    }
}

impl Index<&str> for Report {
    type Output = f64;

    fn index(&self, key: &str) -> &Self::Output {
        &self.map[key]
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    /// Single-state environment with three actions
    struct Lever;

    impl Environment for Lever {
        type State = ();
        type Action = char;

        fn is_active(&self) -> bool {
            true
        }

        fn step(&mut self, _action: char) -> Step<()> {
            Step {
                state: (),
                reward: 0.0,
                done: true,
                score: 0,
            }
        }

        fn reset(&mut self) {}
    }

    impl DiscreteActionSpace for Lever {
        fn actions(&self) -> &'static [char] {
            &['a', 'b', 'c']
        }
    }

    #[test]
    fn random_action_covers_the_action_space() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = (0..300)
            .map(|_| Lever.random_action(&mut rng))
            .collect::<Vec<_>>();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, ['a', 'b', 'c']);
    }

    #[test]
    fn report_accumulates_and_resets() {
        let mut report = Report::new(vec!["score", "reward", "steps"]);
        report.add("steps", 1.0);
        report.add("steps", 1.0);
        report.add("reward", -0.5);
        report.set("score", 3.0);

        assert_eq!(report["steps"], 2.0);
        assert_eq!(report.get("missing"), None);
        assert_eq!(report.take(), vec![3.0, -0.5, 2.0], "values in key order");
        assert_eq!(report.values(), vec![0.0, 0.0, 0.0], "reset after take");
    }

    #[test]
    #[should_panic(expected = "unknown report key")]
    fn report_rejects_unknown_keys() {
        Report::new(vec!["score"]).add("steps", 1.0);
    }
}
