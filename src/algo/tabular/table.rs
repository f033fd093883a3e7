use std::{
    collections::{hash_map, HashMap},
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    gym::Turn,
};

use super::Hashable;

/// Number of relative actions, one q-value each
pub const NUM_ACTIONS: usize = 3;

/// Q-values of one state, indexed by [`Turn`]
pub type QRow = [f32; NUM_ACTIONS];

/// Sparse mapping from state to the action values of that state
///
/// Rows are created on first access with every value at `0.0`, so reads take `&mut self`.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable<S: Hashable> {
    rows: HashMap<S, QRow>,
}

impl<S: Hashable> Default for QTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Hashable> QTable<S> {
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }

    /// The row of `state`, inserting a neutral one if absent
    pub fn row(&mut self, state: S) -> &mut QRow {
        self.rows.entry(state).or_insert([0.0; NUM_ACTIONS])
    }

    pub fn get(&mut self, state: S, action: Turn) -> f32 {
        self.row(state)[action.index()]
    }

    pub fn set(&mut self, state: S, action: Turn, value: f32) {
        self.row(state)[action.index()] = value;
    }

    /// Greedy action of `state`, the lowest index among equal maxima
    pub fn best_action(&mut self, state: S) -> Turn {
        let row = self.row(state);
        let mut best = 0;
        for i in 1..NUM_ACTIONS {
            if row[i] > row[best] {
                best = i;
            }
        }
        Turn::from_repr(best as u8).expect("row index is a valid action")
    }

    /// Greedy value of `state`
    pub fn max_value(&mut self, state: S) -> f32 {
        self.row(state)
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Look up a row without inserting it
    pub fn peek(&self, state: &S) -> Option<&QRow> {
        self.rows.get(state)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.rows.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, S, QRow> {
        self.rows.iter()
    }
}

impl<S: Hashable> FromIterator<(S, QRow)> for QTable<S> {
    fn from_iter<I: IntoIterator<Item = (S, QRow)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Entry<S> {
    state: S,
    values: QRow,
}

impl<S> QTable<S>
where
    S: Hashable + Ord + Serialize + DeserializeOwned,
{
    /// Write the table as JSON, creating parent directories as needed
    ///
    /// Entries are sorted by state so that equal tables produce equal files.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut entries = self
            .rows
            .iter()
            .map(|(&state, &values)| Entry { state, values })
            .collect::<Vec<_>>();
        entries.sort_unstable_by(|a, b| a.state.cmp(&b.state));

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &entries)?;
        writer.flush()?;

        debug!("saved {} q-table rows to {}", entries.len(), path.display());
        Ok(())
    }

    /// Read a table written by [`QTable::save`]
    ///
    /// A missing file is reported as [`Error::MissingTable`].
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::MissingTable(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        let entries: Vec<Entry<S>> = serde_json::from_reader(BufReader::new(file))?;

        debug!("loaded {} q-table rows from {}", entries.len(), path.display());
        Ok(entries
            .into_iter()
            .map(|Entry { state, values }| (state, values))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::gym::{Dir, StateKey};

    fn key(danger: [bool; 3], dir: Dir) -> StateKey {
        StateKey::new(danger, [true, false, false, true], dir)
    }

    #[test]
    fn get_creates_neutral_row() {
        let mut table = QTable::<StateKey>::new();
        let s = key([false; 3], Dir::Up);
        assert!(!table.contains(&s));

        for action in [Turn::Straight, Turn::Right, Turn::Left] {
            assert_eq!(table.get(s, action), 0.0);
        }
        assert!(table.contains(&s), "get inserts the row");
        assert_eq!(table.peek(&s), Some(&[0.0; 3]));

        table.get(s, Turn::Left);
        assert_eq!(table.len(), 1, "repeated get is idempotent");
    }

    #[test]
    fn set_overwrites_one_entry() {
        let mut table = QTable::new();
        let s = key([true, false, false], Dir::Right);
        table.set(s, Turn::Right, 2.5);
        assert_eq!(table.peek(&s), Some(&[0.0, 2.5, 0.0]));
        table.set(s, Turn::Right, -1.0);
        assert_eq!(table.get(s, Turn::Right), -1.0);
        assert_eq!(table.get(s, Turn::Straight), 0.0);
    }

    #[test]
    fn best_action_prefers_lowest_index_on_ties() {
        let mut table = QTable::new();
        let s = key([false; 3], Dir::Down);
        assert_eq!(table.best_action(s), Turn::Straight, "all zero");

        table.set(s, Turn::Right, 1.0);
        table.set(s, Turn::Left, 1.0);
        assert_eq!(table.best_action(s), Turn::Right);

        table.set(s, Turn::Straight, 1.0);
        assert_eq!(table.best_action(s), Turn::Straight);

        table.set(s, Turn::Left, 1.5);
        assert_eq!(table.best_action(s), Turn::Left);
        assert_eq!(table.max_value(s), 1.5);
    }

    #[test]
    fn max_value_of_negative_row() {
        let mut table = QTable::new();
        let s = key([true; 3], Dir::Left);
        *table.row(s) = [-3.0, -0.5, -2.0];
        assert_eq!(table.max_value(s), -0.5);
        assert_eq!(table.best_action(s), Turn::Right);
    }

    #[test]
    fn save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/q_table.json");

        let mut table = QTable::new();
        *table.row(key([false, true, false], Dir::Up)) = [0.1, -9.999_99, 3.25];
        *table.row(key([true, true, true], Dir::Left)) = [-10.0, 1e-7, 0.0];
        *table.row(key([false; 3], Dir::Down)) = [1234.5678, f32::MIN_POSITIVE, -0.01];

        table.save(&path).unwrap();
        let loaded = QTable::<StateKey>::load(&path).unwrap();

        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded, table, "keys and values are identical");
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        match QTable::<StateKey>::load(&path) {
            Err(Error::MissingTable(p)) => assert_eq!(p, path),
            other => panic!("expected missing table, got {other:?}"),
        }
    }

    #[test]
    fn load_rejects_malformed_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"[{"state":[0,0,0,0,0,0,0,7],"values":[0.0,0.0,0.0]}]"#).unwrap();
        assert!(matches!(
            QTable::<StateKey>::load(&path),
            Err(Error::Json(_))
        ));
    }
}
