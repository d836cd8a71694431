//! Graph generator.
//!
//! Builds a fresh account list with random layout positions, plants a
//! fixed number of rings (contiguous slices of the account list), then
//! draws transactions. A share of the transactions is redirected into a
//! ring with larger amounts and early-morning hours.
//!
//! DRAW ORDER (fixed, changing it changes every seeded dataset):
//!   1. per account: x, y
//!   2. per ring: size, start
//!   3. per transaction: from, to, amount, hour, ring chance,
//!      then on ring traffic: ring, ring from, ring to,
//!      and only when the override holds: ring amount, ring hour

use serde::Serialize;

use crate::{
    config::GeneratorParams,
    dataset::{AccountIndex, Dataset},
    error::DeskResult,
    rng::RandomSource,
    types::{Account, AccountId, Position, Transaction},
};

// ── Constants ────────────────────────────────────────────────────────────────

pub const RING_COUNT: usize = 3;
pub const RING_SIZE_MIN: usize = 4;
pub const RING_SIZE_MAX: usize = 7;
pub const RING_TRAFFIC_PROBABILITY: f64 = 0.17;

const BASE_AMOUNT_MIN: f64 = 40.0;
const BASE_AMOUNT_MAX: f64 = 2500.0;
const RING_AMOUNT_MIN: f64 = 3200.0;
const RING_AMOUNT_MAX: f64 = 14000.0;
const BASE_HOUR_SPAN: f64 = 24.0;
const RING_HOUR_SPAN: f64 = 5.0;

const ID_PREFIX: char = 'A';
const ID_WIDTH: usize = 3;

/// `A001`, `A002`, ... for a zero-based sequence index.
pub fn account_id(sequence: usize) -> AccountId {
    format!("{ID_PREFIX}{:0width$}", sequence + 1, width = ID_WIDTH)
}

/// A planted cluster: a contiguous slice of the account list.
/// Generation-time only; never handed to the scorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ring {
    pub start:   usize,
    pub members: Vec<AccountId>,
}

impl Ring {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m == id)
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedGraph {
    pub dataset:           Dataset,
    pub rings:             Vec<Ring>,
    /// Transactions whose endpoints were redirected into a ring.
    pub ring_transactions: usize,
}

pub struct GraphGenerator {
    params: GeneratorParams,
}

impl GraphGenerator {
    pub fn new(params: GeneratorParams) -> DeskResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Produce a fresh dataset. Signals are zeroed; run the aggregator next.
    pub fn generate<R: RandomSource>(&self, rng: &mut R) -> GeneratedGraph {
        let accounts = self.place_accounts(rng);
        let rings = self.plant_rings(&accounts, rng);

        let mut transactions = Vec::with_capacity(self.params.transaction_count);
        let mut ring_transactions = 0;
        for _ in 0..self.params.transaction_count {
            let (tx, redirected) = self.draw_transaction(&accounts, &rings, rng);
            if redirected {
                ring_transactions += 1;
            }
            transactions.push(tx);
        }

        log::debug!(
            "Generated {} accounts, {} transactions ({} ring traffic)",
            accounts.len(),
            transactions.len(),
            ring_transactions
        );

        // Ids are sequence-derived, so the index cannot see duplicates.
        let index = AccountIndex::build(&accounts).unwrap_or_default();
        GeneratedGraph {
            dataset: Dataset::from_parts(accounts, transactions, index),
            rings,
            ring_transactions,
        }
    }

    fn place_accounts<R: RandomSource>(&self, rng: &mut R) -> Vec<Account> {
        let layout = self.params.layout;
        (0..self.params.account_count)
            .map(|i| {
                let x = rng.range(layout.margin, layout.width - layout.margin);
                let y = rng.range(layout.margin, layout.height - layout.margin);
                Account::new(account_id(i), Position { x, y })
            })
            .collect()
    }

    /// Overlapping or identical rings are allowed.
    fn plant_rings<R: RandomSource>(&self, accounts: &[Account], rng: &mut R) -> Vec<Ring> {
        let n = accounts.len();
        (0..RING_COUNT)
            .map(|_| {
                let drawn = RING_SIZE_MIN + rng.below(RING_SIZE_MAX - RING_SIZE_MIN + 1);
                let size = drawn.min(n);
                let slack = n - size;
                let start = (rng.range(0.0, slack as f64).floor() as usize).min(slack);
                Ring {
                    start,
                    members: accounts[start..start + size]
                        .iter()
                        .map(|a| a.id.clone())
                        .collect(),
                }
            })
            .collect()
    }

    /// Returns the transaction and whether ring traffic redirected it.
    fn draw_transaction<R: RandomSource>(
        &self,
        accounts: &[Account],
        rings: &[Ring],
        rng: &mut R,
    ) -> (Transaction, bool) {
        let n = accounts.len();
        let mut from = rng.below(n);
        let mut to = rng.below(n);
        if to == from {
            to = (from + 1) % n;
        }

        let mut amount = rng.range(BASE_AMOUNT_MIN, BASE_AMOUNT_MAX);
        let mut hour = draw_hour(rng, BASE_HOUR_SPAN);
        let mut redirected = false;

        if rng.chance(RING_TRAFFIC_PROBABILITY) {
            let ring = &rings[rng.below(rings.len())];
            let ring_from = rng.below(ring.len());
            let ring_to = rng.below(ring.len());
            // A self-pick drops the whole override, amount and hour included.
            if ring_from != ring_to {
                from = ring.start + ring_from;
                to = ring.start + ring_to;
                amount = rng.range(RING_AMOUNT_MIN, RING_AMOUNT_MAX);
                hour = draw_hour(rng, RING_HOUR_SPAN);
                redirected = true;
            }
        }

        let tx = Transaction {
            from: accounts[from].id.clone(),
            to: accounts[to].id.clone(),
            amount,
            hour,
        };
        (tx, redirected)
    }
}

fn draw_hour<R: RandomSource>(rng: &mut R, span: f64) -> u8 {
    (rng.range(0.0, span).floor() as u8).min(23)
}
