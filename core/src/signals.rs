//! Signal aggregation: one pass over the transaction list.
//!
//! For every transaction:
//!   - sender.outgoing += 1, receiver.incoming += 1
//!   - amount added to both endpoints' volume
//!   - hour <= 4 counts as late-night on both endpoints
//!   - if the reverse edge exists anywhere in the set, both endpoints
//!     count a round trip
//!
//! Edge existence is what matters, not multiplicity: duplicate
//! `from→to` pairs collapse in the edge set.

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    dataset::{AccountIndex, Dataset},
    error::DeskResult,
    types::{Account, AccountSignals, Transaction},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregationStats {
    pub transactions:     usize,
    pub distinct_edges:   usize,
    /// Distinct directed edges whose reverse is also present.
    pub reciprocal_edges: usize,
}

/// Recompute every account's signals in place.
pub fn aggregate(dataset: &mut Dataset) -> DeskResult<AggregationStats> {
    let (accounts, transactions, index) = dataset.parts_mut();
    aggregate_into(accounts, transactions, index)
}

/// Aggregate over borrowed parts. Unknown ids fail fast; on error the
/// signals are left zeroed, never half-counted.
pub fn aggregate_into(
    accounts: &mut [Account],
    transactions: &[Transaction],
    index: &AccountIndex,
) -> DeskResult<AggregationStats> {
    for account in accounts.iter_mut() {
        account.signals = AccountSignals::default();
    }

    // Resolve everything before touching any counter.
    let resolved = transactions
        .iter()
        .map(|tx| -> DeskResult<(usize, usize)> {
            Ok((index.position_of(&tx.from)?, index.position_of(&tx.to)?))
        })
        .collect::<DeskResult<Vec<(usize, usize)>>>()?;

    let edges: HashSet<(usize, usize)> = resolved.iter().copied().collect();

    for (tx, &(from, to)) in transactions.iter().zip(&resolved) {
        let round_trip = edges.contains(&(to, from));

        {
            let sender = &mut accounts[from].signals;
            sender.outgoing += 1;
            sender.volume += tx.amount;
            if tx.is_late_night() {
                sender.late_night_tx += 1;
            }
            if round_trip {
                sender.round_trip_tx += 1;
            }
        }

        let receiver = &mut accounts[to].signals;
        receiver.incoming += 1;
        receiver.volume += tx.amount;
        if tx.is_late_night() {
            receiver.late_night_tx += 1;
        }
        if round_trip {
            receiver.round_trip_tx += 1;
        }
    }

    let reciprocal_edges = edges
        .iter()
        .filter(|&&(from, to)| edges.contains(&(to, from)))
        .count();

    let stats = AggregationStats {
        transactions: transactions.len(),
        distinct_edges: edges.len(),
        reciprocal_edges,
    };
    log::debug!(
        "Aggregated {} transactions over {} distinct edges ({} reciprocal)",
        stats.transactions,
        stats.distinct_edges,
        stats.reciprocal_edges
    );
    Ok(stats)
}
