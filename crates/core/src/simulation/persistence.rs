//! Grid snapshots and the storage seam
//!
//! A [`GridSnapshot`] captures a grid together with the fire state and intensity
//! of a run. Where snapshots go is up to the caller: the core only talks to a
//! [`SnapshotStore`]. Two stores ship with the crate, one writing JSON files to a
//! directory and one keeping snapshots in memory.

use super::state::{FireStateField, SimulationContext};
use crate::error::{CoreError, CoreResult};
use crate::grid::{FieldData, FuelGrid};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Grid, fire state and intensity at one moment of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Grid with each cell's fire state stamped from `fire_state`
    pub grid: FuelGrid,
    pub fire_state: FireStateField,
    pub intensity: FieldData,
}

impl GridSnapshot {
    /// Capture a run's state on a copy of `grid`
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidGrid`] if the context was built for a grid
    /// with different dimensions
    pub fn capture(grid: &FuelGrid, ctx: &SimulationContext) -> CoreResult<Self> {
        let mut grid = grid.clone();
        grid.stamp_fire_states(&ctx.fire_state)?;
        Ok(Self {
            grid,
            fire_state: ctx.fire_state.clone(),
            intensity: ctx.intensity.clone(),
        })
    }
}

/// Keyed storage for grid snapshots
pub trait SnapshotStore {
    /// Store `snapshot` under `key`, replacing any previous snapshot
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be serialized or written
    fn save(&mut self, key: &str, snapshot: &GridSnapshot) -> CoreResult<()>;

    /// Load the snapshot stored under `key`
    ///
    /// # Errors
    /// Returns [`CoreError::SnapshotNotFound`] for an unknown key, or an I/O or
    /// parse error from the backing storage
    fn load(&self, key: &str) -> CoreResult<GridSnapshot>;
}

/// Snapshots as pretty-printed JSON files (`<dir>/<key>.json`)
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at `dir`, creating the directory if needed
    ///
    /// # Errors
    /// Returns an I/O error if the directory cannot be created
    pub fn new<P: AsRef<Path>>(dir: P) -> CoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the snapshot files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> CoreResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(CoreError::InvalidConfig(format!(
                "snapshot key {key:?} is not a plain file name"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&mut self, key: &str, snapshot: &GridSnapshot) -> CoreResult<()> {
        let path = self.path_for(key)?;
        let contents = serde_json::to_string_pretty(snapshot)?;
        fs::write(path, contents)?;
        Ok(())
    }

    fn load(&self, key: &str) -> CoreResult<GridSnapshot> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Err(CoreError::SnapshotNotFound(key.to_string()));
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// In-memory snapshot store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshots: FxHashMap<String, GridSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, key: &str, snapshot: &GridSnapshot) -> CoreResult<()> {
        self.snapshots.insert(key.to_string(), snapshot.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> CoreResult<GridSnapshot> {
        self.snapshots
            .get(key)
            .cloned()
            .ok_or_else(|| CoreError::SnapshotNotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::fuel::{FuelCode, FuelGroup, FuelTable};
    use crate::core_types::readings::EnvironmentReadings;
    use crate::core_types::rng::seeded_rng;
    use crate::simulation::state::FireState;
    use crate::simulation::FireSpreadSimulator;

    fn snapshot() -> GridSnapshot {
        let grid = FuelGrid::uniform(
            &FuelTable::scott_burgan(),
            FuelCode::new(FuelGroup::GrassShrub, 2),
            EnvironmentReadings::bone_dry(),
            5,
            4,
        )
        .unwrap();
        let sim = FireSpreadSimulator::default();
        let mut ctx = sim.context(&grid, (2, 2)).unwrap();
        sim.step(&grid, &mut ctx, &mut seeded_rng(11));
        GridSnapshot::capture(&grid, &ctx).unwrap()
    }

    #[test]
    fn test_capture_stamps_fire_state() {
        let snap = snapshot();
        assert_eq!(snap.grid.cell(2, 2).unwrap().fire_state, FireState::Burned);
        assert_eq!(snap.fire_state.get(2, 2), FireState::Burned);
    }

    #[test]
    fn test_json_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("snapshots")).unwrap();
        let snap = snapshot();

        store.save("best", &snap).unwrap();
        assert!(store.dir().join("best.json").exists());
        assert_eq!(store.load("best").unwrap(), snap);

        assert!(matches!(
            store.load("missing"),
            Err(CoreError::SnapshotNotFound(_))
        ));
        assert!(matches!(
            store.save("../escape", &snap),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        assert!(matches!(store.load("bad"), Err(CoreError::Json(_))));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        let snap = snapshot();
        store.save("a", &snap).unwrap();
        store.save("a", &snap).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load("a").unwrap(), snap);
        assert!(store.load("b").is_err());
    }
}
