//! Serializable snapshots of a running machine.
//!
//! A snapshot captures what the machine currently is - state, substate,
//! tick, transition history - for debugging and telemetry. Behavior objects
//! and guards are not serializable, so a snapshot is observational: it can
//! be logged, shipped and diffed but not rehydrated into a running machine.

use crate::core::{StateHistory, StateKey};
use crate::machine::StateMachine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable observation of one machine at one tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MachineSnapshot<K: StateKey> {
    /// Snapshot format version
    pub version: u32,

    /// Id of the machine the snapshot was taken from
    pub machine_id: Uuid,

    /// When the snapshot was captured
    pub captured_at: DateTime<Utc>,

    /// Frame tick at capture time
    pub tick: u64,

    /// Current state key, `None` before `start`
    pub current_state: Option<K>,

    /// Active substate key, if any
    pub current_substate: Option<K>,

    /// Complete transition history
    pub history: StateHistory<K>,
}

impl<K: StateKey> MachineSnapshot<K> {
    /// Capture the machine's current observable state.
    pub fn capture<C>(machine: &StateMachine<K, C>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            machine_id: machine.id(),
            captured_at: Utc::now(),
            tick: machine.tick(),
            current_state: machine.current_state(),
            current_substate: machine.current_substate(),
            history: machine.history().clone(),
        }
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode from JSON, validating the format version.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate_version()?;
        Ok(snapshot)
    }

    /// Encode as compact binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode from binary, validating the format version.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate_version()?;
        Ok(snapshot)
    }

    fn validate_version(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }
}
