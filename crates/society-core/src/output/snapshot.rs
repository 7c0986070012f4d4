//! Snapshot files
//!
//! Snapshots land in `<output>/snapshots/snap_<tick>.json`, and the latest one
//! is mirrored to `<output>/current_state.json`.

use std::fs;
use std::path::{Path, PathBuf};

use society_events::WorldSnapshot;

/// Decides which ticks get a snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotSchedule {
    snapshot_interval: u64,
    last_snapshot_tick: Option<u64>,
    snapshot_count: u64,
}

impl SnapshotSchedule {
    pub fn new(snapshot_interval: u64) -> Self {
        Self {
            snapshot_interval,
            last_snapshot_tick: None,
            snapshot_count: 0,
        }
    }

    /// Tick zero always, then every interval. An interval of zero only
    /// snapshots tick zero.
    pub fn should_snapshot(&self, current_tick: u64) -> bool {
        if self.last_snapshot_tick == Some(current_tick) {
            return false;
        }
        current_tick == 0
            || (self.snapshot_interval > 0 && current_tick % self.snapshot_interval == 0)
    }

    pub fn mark_snapshot(&mut self, tick: u64) {
        self.last_snapshot_tick = Some(tick);
        self.snapshot_count += 1;
    }

    pub fn last_snapshot_tick(&self) -> Option<u64> {
        self.last_snapshot_tick
    }

    pub fn snapshot_count(&self) -> u64 {
        self.snapshot_count
    }
}

/// Write a snapshot to a JSON file
pub fn write_snapshot(snapshot: &WorldSnapshot, path: impl AsRef<Path>) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)
}

/// Write a snapshot into `<output>/snapshots/`
pub fn write_snapshot_to_dir(snapshot: &WorldSnapshot, output: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let path = output
        .as_ref()
        .join("snapshots")
        .join(format!("snap_{:06}.json", snapshot.tick));
    write_snapshot(snapshot, &path)?;
    Ok(path)
}

/// Write current state (overwrites each time)
pub fn write_current_state(snapshot: &WorldSnapshot, output: impl AsRef<Path>) -> std::io::Result<()> {
    write_snapshot(snapshot, output.as_ref().join("current_state.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use society_events::EnvironmentSnapshot;

    fn snapshot(tick: u64) -> WorldSnapshot {
        WorldSnapshot {
            tick,
            num_agents: 2,
            rules: vec!["Revolution: dance".to_string()],
            culture: Vec::new(),
            agents: vec!["agent_0".to_string(), "agent_1".to_string()],
            generation: 0,
            environment: EnvironmentSnapshot {
                resources: 1000,
                stress_level: 0.2,
                recent_events: Vec::new(),
            },
        }
    }

    #[test]
    fn test_schedule() {
        let mut schedule = SnapshotSchedule::new(10);
        assert!(schedule.should_snapshot(0));
        assert!(!schedule.should_snapshot(5));
        assert!(schedule.should_snapshot(20));

        schedule.mark_snapshot(20);
        assert!(!schedule.should_snapshot(20));
        assert_eq!(schedule.snapshot_count(), 1);
        assert_eq!(schedule.last_snapshot_tick(), Some(20));
    }

    #[test]
    fn test_zero_interval_only_snapshots_start() {
        let schedule = SnapshotSchedule::new(0);
        assert!(schedule.should_snapshot(0));
        assert!(!schedule.should_snapshot(10));
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_snapshot_to_dir(&snapshot(30), dir.path()).unwrap();
        write_current_state(&snapshot(30), dir.path()).unwrap();

        assert!(path.ends_with("snapshots/snap_000030.json"));
        let current = fs::read_to_string(dir.path().join("current_state.json")).unwrap();
        let parsed: WorldSnapshot = serde_json::from_str(&current).unwrap();
        assert_eq!(parsed.tick, 30);
        assert_eq!(parsed.rules, vec!["Revolution: dance"]);
    }
}
