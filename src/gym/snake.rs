use std::collections::VecDeque;

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::{EnumIter, FromRepr, VariantArray};

use crate::{
    config::GameConfig,
    env::{DiscreteActionSpace, Environment, Report, Step},
    error::Result,
};

use super::state_key::{encode, in_bounds, StateKey};

/// Grid cell as `(row, col)`, rows growing downward
pub type Pos = (i32, i32);

/// Absolute heading, in clockwise order
#[derive(EnumIter, VariantArray, FromRepr, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[repr(u8)]
pub enum Dir {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Dir {
    /// Rotate the heading by a relative action
    pub fn turn(self, turn: Turn) -> Dir {
        let offset = match turn {
            Turn::Straight => 0,
            Turn::Right => 1,
            Turn::Left => 3,
        };
        Dir::from_repr((self as u8 + offset) % 4).expect("index is taken mod 4")
    }

    /// The neighbouring cell of `pos` in this direction
    pub fn step(self, pos: Pos) -> Pos {
        let t = self as i32;
        (pos.0 + ((t + 1) & 1) * (t - 1), pos.1 + (t & 1) * (2 - t))
    }
}

/// Action relative to the current heading
#[derive(EnumIter, VariantArray, FromRepr, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[repr(u8)]
pub enum Turn {
    Straight = 0,
    Right = 1,
    Left = 2,
}

impl Turn {
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Pos>,
    dir: Dir,
}

impl Snake {
    /// A straight snake of `len` cells with its head at `head`, extending to the left
    fn spawn(head: Pos, len: usize, dir: Dir) -> Self {
        Self {
            body: (0..len as i32).map(|i| (head.0, head.1 - i)).collect(),
            dir,
        }
    }

    pub(crate) fn from_parts(body: VecDeque<Pos>, dir: Dir) -> Self {
        assert!(!body.is_empty(), "snake body is not empty");
        Self { body, dir }
    }

    pub fn head(&self) -> Pos {
        *self.body.front().expect("body is not empty")
    }

    pub fn dir(&self) -> Dir {
        self.dir
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> &VecDeque<Pos> {
        &self.body
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.body.contains(&pos)
    }

    /// Whether `pos` lies on a segment that will still be occupied after a non-growing move
    pub fn hits_body(&self, pos: Pos) -> bool {
        let keep = self.body.len() - 1;
        self.body.iter().take(keep).any(|&p| p == pos)
    }
}

/// A square field for the game of snake
///
/// Owns its random source so food placement is reproducible from a seed.
pub struct SnakeField {
    config: GameConfig,
    snake: Snake,
    food: Pos,
    score: u32,
    steps_since_food: u32,
    alive: bool,
    rng: StdRng,
    pub report: Report,
}

impl SnakeField {
    /// Create a field and reset it to its initial configuration
    ///
    /// Fails if the configuration cannot hold a spawned snake. A `None` seed draws from entropy.
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut field = Self {
            snake: Snake::spawn((0, 0), 1, Dir::Up),
            food: (0, 0),
            score: 0,
            steps_since_food: 0,
            alive: true,
            rng,
            report: Report::new(vec!["score", "reward", "steps"]),
            config,
        };
        field.reset();
        Ok(field)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Pos {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn dir(&self) -> Dir {
        self.snake.dir
    }

    pub fn state(&self) -> StateKey {
        encode(&self.snake, self.food, self.size())
    }

    fn size(&self) -> i32 {
        self.config.grid_size as i32
    }

    fn area(&self) -> usize {
        self.config.grid_size * self.config.grid_size
    }

    fn timeout(&self) -> u32 {
        self.config.timeout_factor * self.area() as u32
    }

    /// Sample uniformly until a free cell is found
    ///
    /// Returns `None` only when the snake covers the whole grid.
    fn spawn_food(&mut self) -> Option<Pos> {
        if self.snake.len() >= self.area() {
            return None;
        }
        let size = self.size();
        loop {
            let pos = (self.rng.gen_range(0..size), self.rng.gen_range(0..size));
            if !self.snake.contains(pos) {
                return Some(pos);
            }
        }
    }

    fn finish(&mut self, reward: f32, done: bool) -> Step<StateKey> {
        self.report.add("reward", reward as f64);
        self.report.set("score", self.score as f64);
        if done {
            self.alive = false;
        }
        debug_assert!(
            !self.alive || !self.snake.contains(self.food),
            "food spawned on the snake"
        );
        Step {
            state: self.state(),
            reward,
            done,
            score: self.score,
        }
    }
}

impl DiscreteActionSpace for SnakeField {
    fn actions(&self) -> &'static [Self::Action] {
        Turn::VARIANTS
    }
}

impl Environment for SnakeField {
    type State = StateKey;
    type Action = Turn;

    fn is_active(&self) -> bool {
        self.alive
    }

    fn reset(&mut self) -> Self::State {
        let center = self.size() / 2;
        self.snake = Snake::spawn((center, center), self.config.initial_length, Dir::Up);
        self.score = 0;
        self.steps_since_food = 0;
        self.alive = true;
        self.food = self
            .spawn_food()
            .expect("validated config leaves free cells at spawn");
        self.state()
    }

    fn step(&mut self, action: Self::Action) -> Step<Self::State> {
        debug_assert!(self.alive, "step called on a finished episode");
        self.report.add("steps", 1.0);

        self.snake.dir = self.snake.dir.turn(action);
        let new_head = self.snake.dir.step(self.snake.head());

        if !in_bounds(new_head, self.size()) || self.snake.hits_body(new_head) {
            return self.finish(self.config.death_penalty, true);
        }

        self.snake.body.push_front(new_head);
        self.steps_since_food += 1;

        if new_head == self.food {
            self.score += 1;
            self.steps_since_food = 0;
            return match self.spawn_food() {
                Some(food) => {
                    self.food = food;
                    self.finish(self.config.food_reward, false)
                }
                None => {
                    debug!("snake filled the grid with score {}", self.score);
                    self.finish(self.config.food_reward, true)
                }
            };
        }

        self.snake.body.pop_back();

        if self.steps_since_food >= self.timeout() {
            debug!("episode timed out after {} steps without food", self.steps_since_food);
            return self.finish(self.config.death_penalty, true);
        }

        self.finish(self.config.step_penalty, false)
    }
}
