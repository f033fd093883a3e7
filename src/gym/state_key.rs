use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::snake::{Dir, Pos, Snake, Turn};

/// Compact discrete encoding of a snake world, used to index the q-table
///
/// `[danger_straight, danger_right, danger_left, food_up, food_down, food_left, food_right, dir]`
///
/// Danger flags are relative to the current heading, food flags use the absolute grid
/// axes. Many different worlds share a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[u8; 8]", into = "[u8; 8]")]
pub struct StateKey([u8; 8]);

impl StateKey {
    pub fn new(danger: [bool; 3], food: [bool; 4], dir: Dir) -> Self {
        let [ds, dr, dl] = danger;
        let [fu, fd, fl, fr] = food;
        Self([
            ds as u8, dr as u8, dl as u8, fu as u8, fd as u8, fl as u8, fr as u8, dir as u8,
        ])
    }

    /// `[straight, right, left]`
    pub fn danger(&self) -> [bool; 3] {
        [self.0[0] == 1, self.0[1] == 1, self.0[2] == 1]
    }

    /// `[up, down, left, right]`
    pub fn food(&self) -> [bool; 4] {
        [self.0[3] == 1, self.0[4] == 1, self.0[5] == 1, self.0[6] == 1]
    }

    pub fn dir(&self) -> Dir {
        Dir::from_repr(self.0[7]).expect("direction field is validated on construction")
    }

    pub fn as_array(&self) -> [u8; 8] {
        self.0
    }
}

impl TryFrom<[u8; 8]> for StateKey {
    type Error = Error;

    fn try_from(fields: [u8; 8]) -> Result<Self, Self::Error> {
        if let Some(flag) = fields[..7].iter().find(|&&f| f > 1) {
            return Err(Error::InvalidState(format!(
                "flag value {flag} in {fields:?} is not 0 or 1"
            )));
        }
        if Dir::from_repr(fields[7]).is_none() {
            return Err(Error::InvalidState(format!(
                "direction {} in {fields:?} is out of range",
                fields[7]
            )));
        }
        Ok(Self(fields))
    }
}

impl From<StateKey> for [u8; 8] {
    fn from(key: StateKey) -> Self {
        key.0
    }
}

/// Encode a world configuration into its [`StateKey`]
///
/// A cell is dangerous when it lies off the grid or on the body, not counting the tail.
/// The tail vacates on any move that does not eat, so stepping onto it is legal.
pub fn encode(snake: &Snake, food: Pos, grid_size: i32) -> StateKey {
    let head = snake.head();
    let danger = |dir: Dir| {
        let pos = dir.step(head);
        !in_bounds(pos, grid_size) || snake.hits_body(pos)
    };
    let dir = snake.dir();

    StateKey::new(
        [
            danger(dir),
            danger(dir.turn(Turn::Right)),
            danger(dir.turn(Turn::Left)),
        ],
        [
            head.0 > food.0,
            head.0 < food.0,
            head.1 > food.1,
            head.1 < food.1,
        ],
        dir,
    )
}

pub(crate) fn in_bounds(pos: Pos, grid_size: i32) -> bool {
    (0..grid_size).contains(&pos.0) && (0..grid_size).contains(&pos.1)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    fn snake(body: &[Pos], dir: Dir) -> Snake {
        Snake::from_parts(VecDeque::from(body.to_vec()), dir)
    }

    #[test]
    fn spawn_position_encoding() {
        let s = snake(&[(5, 5), (5, 4), (5, 3)], Dir::Up);
        let key = encode(&s, (4, 5), 10);
        // left of an up-facing head is (5, 4), the neck
        assert_eq!(key.danger(), [false, false, true]);
        assert_eq!(key.food(), [true, false, false, false]);
        assert_eq!(key.dir(), Dir::Up);
        assert_eq!(key.as_array(), [0, 0, 1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn walls_are_dangerous() {
        let s = snake(&[(0, 9), (1, 9), (2, 9)], Dir::Up);
        let key = encode(&s, (9, 0), 10);
        assert_eq!(key.danger(), [true, true, false], "straight and right are off-grid");
        assert_eq!(key.food(), [false, true, true, false]);
    }

    #[test]
    fn tail_is_not_dangerous() {
        // head at (4,4) facing left with the tail directly below it
        let s = snake(&[(4, 4), (4, 5), (5, 5), (5, 4)], Dir::Left);
        let key = encode(&s, (0, 0), 10);
        // left of a left-facing snake is down, onto the tail
        assert_eq!(key.danger(), [false, false, false]);

        let longer = snake(&[(4, 4), (4, 5), (5, 5), (5, 4), (5, 3)], Dir::Left);
        let key = encode(&longer, (0, 0), 10);
        assert_eq!(key.danger(), [false, false, true], "body segment below the head");
    }

    #[test]
    fn food_flags_on_same_axis() {
        let s = snake(&[(5, 5), (5, 4), (5, 3)], Dir::Right);
        let key = encode(&s, (5, 5), 10);
        assert_eq!(key.food(), [false; 4]);
        let key = encode(&s, (5, 8), 10);
        assert_eq!(key.food(), [false, false, false, true]);
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(StateKey::try_from([0, 1, 0, 1, 0, 0, 1, 3]).is_ok());
        assert!(StateKey::try_from([0, 2, 0, 1, 0, 0, 1, 3]).is_err());
        assert!(StateKey::try_from([0, 0, 0, 0, 0, 0, 0, 4]).is_err());
    }

    #[test]
    fn serializes_as_integer_array() {
        let key = StateKey::new([true, false, false], [false, true, false, true], Dir::Down);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "[1,0,0,0,1,0,1,2]");
        let back: StateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<StateKey>("[1,0,0,0,1,0,1,9]").is_err());
    }
}
