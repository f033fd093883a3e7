use std::path::Path;

use log::info;

use crate::{
    algo::tabular::table::QTable,
    config::GameConfig,
    env::{Environment, Step},
    error::Result,
    gym::{Pos, SnakeField, StateKey},
};

/// Input delivered to a running demo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoEvent {
    Quit,
    Restart,
}

/// Everything a renderer needs to draw one tick of the game
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub grid_size: usize,
    /// Head first
    pub snake: Vec<Pos>,
    pub food: Pos,
    pub score: u32,
    pub done: bool,
}

/// A greedy replay of a trained table
///
/// Never explores, and keeps playing the same game until it is restarted.
pub struct Demo {
    table: QTable<StateKey>,
    env: SnakeField,
    state: StateKey,
    done: bool,
}

impl Demo {
    pub fn new(table: QTable<StateKey>, game: GameConfig, seed: Option<u64>) -> Result<Self> {
        let mut env = SnakeField::new(game, seed)?;
        let state = env.reset();
        Ok(Self {
            table,
            env,
            state,
            done: false,
        })
    }

    /// Load a persisted table, failing with [`Error::MissingTable`](crate::Error::MissingTable) if there is none
    pub fn load(path: &Path, game: GameConfig, seed: Option<u64>) -> Result<Self> {
        let table = QTable::load(path)?;
        info!("loaded trained agent with {} states", table.len());
        Self::new(table, game, seed)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn restart(&mut self) {
        self.state = self.env.reset();
        self.done = false;
    }

    /// **Returns** `false` if the demo should stop
    pub fn apply(&mut self, event: DemoEvent) -> bool {
        match event {
            DemoEvent::Quit => false,
            DemoEvent::Restart => {
                self.restart();
                true
            }
        }
    }

    /// Advance the game by one greedy step, unless it is over
    pub fn tick(&mut self) -> Frame {
        if !self.done {
            let action = self.table.best_action(self.state);
            let Step {
                state, done, score, ..
            } = self.env.step(action);
            self.state = state;
            self.done = done;
            if done {
                info!("Game Over! Final Score: {score}");
            }
        }
        self.frame()
    }

    pub fn frame(&self) -> Frame {
        Frame {
            grid_size: self.env.config().grid_size,
            snake: self.env.snake().body().iter().copied().collect(),
            food: self.env.food(),
            score: self.env.score(),
            done: self.done,
        }
    }
}

/// Frame stream of a [`Demo`] driven by batches of input events
pub struct Frames<I> {
    demo: Demo,
    events: I,
    quit: bool,
}

impl<I> Iterator for Frames<I>
where
    I: Iterator<Item = Vec<DemoEvent>>,
{
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.quit {
            return None;
        }
        for event in self.events.next()? {
            if !self.demo.apply(event) {
                self.quit = true;
                return None;
            }
        }
        Some(self.demo.tick())
    }
}

/// Play `demo` with one batch of events per frame
///
/// The stream ends on [`DemoEvent::Quit`] or when `events` is exhausted.
pub fn evaluate<I>(demo: Demo, events: I) -> Frames<I::IntoIter>
where
    I: IntoIterator<Item = Vec<DemoEvent>>,
{
    Frames {
        demo,
        events: events.into_iter(),
        quit: false,
    }
}

#[cfg(test)]
mod tests {
    use std::iter;

    use tempfile::TempDir;

    use super::*;
    use crate::{error::Error, gym::Turn};

    fn idle(n: usize) -> impl Iterator<Item = Vec<DemoEvent>> {
        iter::repeat_with(Vec::new).take(n)
    }

    #[test]
    fn empty_table_runs_straight_into_the_wall() {
        let demo = Demo::new(QTable::new(), GameConfig::default(), Some(4)).unwrap();
        let frames = evaluate(demo, idle(10)).collect::<Vec<_>>();

        assert_eq!(frames.len(), 10);
        assert_eq!(frames[0].snake[0], (4, 5));
        let first_done = frames.iter().position(|f| f.done).unwrap();
        assert_eq!(first_done, 5, "sixth move leaves the grid");
        assert_eq!(frames[first_done].snake[0], (0, 5));
        assert!(frames[first_done..].windows(2).all(|w| w[0] == w[1]), "frozen after game over");
    }

    #[test]
    fn follows_the_greedy_action() {
        let mut probe = SnakeField::new(GameConfig::default(), Some(8)).unwrap();
        let spawn = probe.reset();

        let mut table = QTable::new();
        table.set(spawn, Turn::Right, 1.0);
        let mut demo = Demo::new(table, GameConfig::default(), Some(8)).unwrap();
        let frame = demo.tick();
        assert_eq!(frame.snake[0], (5, 6), "turned right from the spawn heading");
    }

    #[test]
    fn restart_and_quit() {
        let demo = Demo::new(QTable::new(), GameConfig::default(), Some(4)).unwrap();
        let mut events = idle(8).collect::<Vec<_>>();
        events.push(vec![DemoEvent::Restart]);
        events.push(vec![]);
        events.push(vec![DemoEvent::Quit]);
        events.push(vec![]);

        let frames = evaluate(demo, events).collect::<Vec<_>>();
        assert_eq!(frames.len(), 10, "nothing after quit");
        assert!(frames[7].done);
        assert!(!frames[8].done, "restart starts a fresh game");
        assert_eq!(frames[8].snake[0], (4, 5));
        assert!(frames[8].score <= 1);
    }

    #[test]
    fn missing_table_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("q_table.json");
        assert!(matches!(
            Demo::load(&path, GameConfig::default(), None),
            Err(Error::MissingTable(_))
        ));
    }

    #[test]
    fn loads_a_saved_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("q_table.json");
        let mut table = QTable::<StateKey>::new();
        table.get(
            StateKey::new([false; 3], [false; 4], crate::gym::Dir::Up),
            Turn::Straight,
        );
        table.save(&path).unwrap();

        let demo = Demo::load(&path, GameConfig::default(), Some(1)).unwrap();
        assert!(!demo.is_done());
        assert_eq!(demo.frame().snake.len(), 3);
    }
}
