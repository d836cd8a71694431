//! Render model handed to the presentation layer.
//!
//! Nothing here draws. It shapes a dataset plus an analysis into what a
//! front end shows: summary counters, the top of the flagged list and
//! the graph with flagged accounts marked.

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    dataset::Dataset,
    scoring::{Analysis, ScoredAccount},
    types::{AccountId, Position},
};

/// At most this many flagged accounts are listed.
pub const DETAIL_LIMIT: usize = 18;
/// Only the first this-many transactions are drawn.
pub const EDGE_RENDER_LIMIT: usize = 900;
const HIGH_SEVERITY_SCORE: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Elevated,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub flagged_count:           usize,
    pub ring_count:              usize,
    pub suspicious_volume:       f64,
    pub suspicious_volume_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub id:       AccountId,
    pub score:    f64,
    pub volume:   f64,
    pub incoming: u32,
    pub outgoing: u32,
    pub severity: Severity,
}

impl From<&ScoredAccount> for DetailRow {
    fn from(scored: &ScoredAccount) -> Self {
        let signals = &scored.account.signals;
        Self {
            id: scored.account.id.clone(),
            score: scored.score,
            volume: signals.volume,
            incoming: signals.incoming,
            outgoing: signals.outgoing,
            severity: if scored.score > HIGH_SEVERITY_SCORE {
                Severity::High
            } else {
                Severity::Elevated
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id:       AccountId,
    pub position: Position,
    pub flagged:  bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub from: Position,
    pub to:   Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeskView {
    pub summary: SummaryView,
    pub details: Vec<DetailRow>,
    pub graph:   GraphView,
}

impl DeskView {
    pub fn build(dataset: &Dataset, analysis: &Analysis) -> Self {
        let summary = SummaryView {
            flagged_count: analysis.flagged.len(),
            ring_count: analysis.ring_count,
            suspicious_volume: analysis.suspicious_volume,
            suspicious_volume_label: format_currency(analysis.suspicious_volume),
        };

        let details = analysis
            .flagged
            .iter()
            .take(DETAIL_LIMIT)
            .map(DetailRow::from)
            .collect();

        let flagged_ids: HashSet<&str> = analysis
            .flagged
            .iter()
            .map(|s| s.account.id.as_str())
            .collect();

        let nodes = dataset
            .accounts
            .iter()
            .map(|a| NodeView {
                id: a.id.clone(),
                position: a.position,
                flagged: flagged_ids.contains(a.id.as_str()),
            })
            .collect();

        // Dataset validation guarantees both endpoints exist.
        let edges = dataset
            .transactions
            .iter()
            .take(EDGE_RENDER_LIMIT)
            .filter_map(|tx| {
                Some(EdgeView {
                    from: dataset.account(&tx.from)?.position,
                    to: dataset.account(&tx.to)?.position,
                })
            })
            .collect();

        Self {
            summary,
            details,
            graph: GraphView { nodes, edges },
        }
    }
}

/// Whole dollars with thousands separators: `$1,234,568`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}
