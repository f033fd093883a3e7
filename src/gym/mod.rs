pub mod snake;
pub mod state_key;

pub use snake::{Dir, Pos, Snake, SnakeField, Turn};
pub use state_key::{encode, StateKey};
