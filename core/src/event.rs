//! The session event log.
//!
//! RULE: Every trigger the desk handles is recorded here.
//! Two desks with the same seed and the same call sequence must
//! produce byte-identical logs.

use crate::types::{Generation, RunId};
use serde::{Deserialize, Serialize};

/// Every event emitted during a session.
/// Variants may be added, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    RunInitialized {
        run_id: RunId,
        seed:   u64,
    },
    DatasetGenerated {
        generation:        Generation,
        account_count:     usize,
        transaction_count: usize,
        ring_transactions: usize,
    },
    SignalsAggregated {
        generation:       Generation,
        distinct_edges:   usize,
        reciprocal_edges: usize,
    },
    /// The previous analysis no longer matches the data and was cleared.
    AnalysisReset {
        generation: Generation,
    },
    AnalysisCompleted {
        generation:        Generation,
        sensitivity:       f64,
        flagged_count:     usize,
        ring_count:        usize,
        suspicious_volume: f64,
    },
}

impl DeskEvent {
    /// Stable string name, used for the event_type field.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunInitialized { .. }    => "run_initialized",
            Self::DatasetGenerated { .. }  => "dataset_generated",
            Self::SignalsAggregated { .. } => "signals_aggregated",
            Self::AnalysisReset { .. }     => "analysis_reset",
            Self::AnalysisCompleted { .. } => "analysis_completed",
        }
    }
}

/// One serialized entry in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub sequence:   u64,
    pub run_id:     RunId,
    pub generation: Generation,
    pub event_type: String,
    pub payload:    String, // JSON
}
