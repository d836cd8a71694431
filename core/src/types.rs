//! Shared primitive types used across the entire pipeline.

use serde::{Deserialize, Serialize};

/// A stable, unique identifier for an account within one dataset.
pub type AccountId = String;

/// The canonical run identifier.
pub type RunId = String;

/// Sequence number of a generate call within a session. 0 = nothing generated yet.
pub type Generation = u64;

/// Hours at or below this value count as late-night activity.
pub const LATE_NIGHT_LAST_HOUR: u8 = 4;

/// Layout position. Carried for the renderer only; the pipeline never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Per-account signals derived from the transaction list.
/// Reset and recomputed on every aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSignals {
    pub incoming:      u32,
    pub outgoing:      u32,
    pub volume:        f64,
    pub late_night_tx: u32,
    pub round_trip_tx: u32,
}

impl AccountSignals {
    /// Total edge touches (in + out).
    pub fn degree(&self) -> u32 {
        self.incoming + self.outgoing
    }

    pub fn imbalance(&self) -> u32 {
        self.incoming.abs_diff(self.outgoing)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id:       AccountId,
    pub position: Position,
    #[serde(flatten)]
    pub signals:  AccountSignals,
}

impl Account {
    pub fn new(id: impl Into<AccountId>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            signals: AccountSignals::default(),
        }
    }
}

/// A directed transfer between two distinct accounts. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from:   AccountId,
    pub to:     AccountId,
    pub amount: f64,
    /// Hour of day, 0..24.
    pub hour:   u8,
}

impl Transaction {
    pub fn is_late_night(&self) -> bool {
        self.hour <= LATE_NIGHT_LAST_HOUR
    }
}
