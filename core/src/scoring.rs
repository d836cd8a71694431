//! Risk scoring.
//!
//! score = (volume + behavior + imbalance * 0.35 + centrality) * sensitivity
//!
//!   volume     = min(60, volume / 1600)
//!   behavior   = late_night_tx * 1.8 + round_trip_tx * 0.7
//!   imbalance  = |incoming - outgoing|
//!   centrality = min(30, (incoming + outgoing) * 0.35)
//!
//! An account is flagged when score >= 38. The weights are fixed; only
//! sensitivity is caller-controlled.

use serde::Serialize;

use crate::{
    config::validate_sensitivity,
    error::DeskResult,
    types::{Account, AccountSignals},
};

// ── Constants ────────────────────────────────────────────────────────────────

pub const FLAG_THRESHOLD: f64 = 38.0;

const VOLUME_DIVISOR: f64 = 1600.0;
const VOLUME_CAP: f64 = 60.0;
const LATE_NIGHT_WEIGHT: f64 = 1.8;
const ROUND_TRIP_WEIGHT: f64 = 0.7;
const IMBALANCE_WEIGHT: f64 = 0.35;
const CENTRALITY_WEIGHT: f64 = 0.35;
const CENTRALITY_CAP: f64 = 30.0;

// Ring candidates: flagged, with heavy two-way traffic.
const RING_MIN_ROUND_TRIPS: u32 = 6;
const RING_MIN_FLOW: u32 = 5;
const RING_CANDIDATES_PER_RING: usize = 3;

/// Every term of one account's score, before and after sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub volume:     f64,
    pub behavior:   f64,
    pub imbalance:  f64,
    pub centrality: f64,
    pub total:      f64,
}

/// An account with its score for one analysis. Never written back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAccount {
    #[serde(flatten)]
    pub account: Account,
    pub score:   f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub sensitivity:       f64,
    /// Score descending; equal scores keep account-list order.
    pub flagged:           Vec<ScoredAccount>,
    pub ring_count:        usize,
    pub suspicious_volume: f64,
}

impl Analysis {
    /// What the desk shows right after a generate: nothing flagged.
    pub fn empty() -> Self {
        Self {
            sensitivity: 0.0,
            flagged: Vec::new(),
            ring_count: 0,
            suspicious_volume: 0.0,
        }
    }
}

pub struct RiskScorer;

impl RiskScorer {
    pub fn breakdown(signals: &AccountSignals, sensitivity: f64) -> ScoreBreakdown {
        let volume = (signals.volume / VOLUME_DIVISOR).min(VOLUME_CAP);
        let behavior = f64::from(signals.late_night_tx) * LATE_NIGHT_WEIGHT
            + f64::from(signals.round_trip_tx) * ROUND_TRIP_WEIGHT;
        let imbalance = f64::from(signals.imbalance());
        let centrality = (f64::from(signals.degree()) * CENTRALITY_WEIGHT).min(CENTRALITY_CAP);

        let total = (volume + behavior + imbalance * IMBALANCE_WEIGHT + centrality) * sensitivity;
        ScoreBreakdown { volume, behavior, imbalance, centrality, total }
    }

    pub fn score(signals: &AccountSignals, sensitivity: f64) -> f64 {
        Self::breakdown(signals, sensitivity).total
    }

    /// Score every account, keep the flagged ones and derive the ring estimate.
    pub fn analyze(accounts: &[Account], sensitivity: f64) -> DeskResult<Analysis> {
        validate_sensitivity(sensitivity)?;

        let mut flagged: Vec<ScoredAccount> = accounts
            .iter()
            .filter_map(|account| {
                let score = Self::score(&account.signals, sensitivity);
                (score >= FLAG_THRESHOLD).then(|| ScoredAccount {
                    account: account.clone(),
                    score,
                })
            })
            .collect();
        // sort_by is stable: ties stay in account-list order.
        flagged.sort_by(|a, b| b.score.total_cmp(&a.score));

        // Deliberately not deduplicated: volume already counts each
        // transaction on both endpoints.
        let suspicious_volume = flagged.iter().map(|s| s.account.signals.volume).sum();

        let ring_candidates = flagged
            .iter()
            .filter(|s| is_ring_candidate(&s.account.signals))
            .count();
        let ring_count = ring_candidates / RING_CANDIDATES_PER_RING;

        log::debug!(
            "Analysis at sensitivity {sensitivity:.1}: {} flagged, {} ring candidates",
            flagged.len(),
            ring_candidates
        );

        Ok(Analysis {
            sensitivity,
            flagged,
            ring_count,
            suspicious_volume,
        })
    }
}

fn is_ring_candidate(signals: &AccountSignals) -> bool {
    signals.round_trip_tx > RING_MIN_ROUND_TRIPS
        && signals.incoming > RING_MIN_FLOW
        && signals.outgoing > RING_MIN_FLOW
}
