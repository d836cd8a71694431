//! Accounts, transactions and the id index shared by every stage.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    error::{DeskError, DeskResult},
    types::{Account, AccountId, Transaction},
};

/// id → position in the account list. Built once per dataset.
#[derive(Debug, Clone, Default)]
pub struct AccountIndex {
    positions: HashMap<AccountId, usize>,
}

impl AccountIndex {
    /// Rejects duplicate ids.
    pub fn build(accounts: &[Account]) -> DeskResult<Self> {
        let mut positions = HashMap::with_capacity(accounts.len());
        for (i, account) in accounts.iter().enumerate() {
            if positions.insert(account.id.clone(), i).is_some() {
                return Err(DeskError::DuplicateAccount { id: account.id.clone() });
            }
        }
        Ok(Self { positions })
    }

    pub fn get(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Lookup that fails fast on an unknown id.
    pub fn position_of(&self, id: &str) -> DeskResult<usize> {
        self.get(id)
            .ok_or_else(|| DeskError::UnknownAccount { id: id.to_string() })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// One generated (or externally supplied) transaction graph.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub accounts:     Vec<Account>,
    pub transactions: Vec<Transaction>,
    #[serde(skip)]
    index:            AccountIndex,
}

impl Dataset {
    /// Build a dataset from caller-supplied parts, checking every invariant
    /// the aggregator and scorer rely on.
    pub fn new(accounts: Vec<Account>, transactions: Vec<Transaction>) -> DeskResult<Self> {
        let index = AccountIndex::build(&accounts)?;

        for (i, tx) in transactions.iter().enumerate() {
            index.position_of(&tx.from)?;
            index.position_of(&tx.to)?;

            let reason = if tx.from == tx.to {
                Some(format!("self-transfer on '{}'", tx.from))
            } else if !tx.amount.is_finite() || tx.amount <= 0.0 {
                Some(format!("amount {} is not a positive number", tx.amount))
            } else if tx.hour >= 24 {
                Some(format!("hour {} is outside 0..24", tx.hour))
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(DeskError::InvalidTransaction { index: i, reason });
            }
        }

        Ok(Self { accounts, transactions, index })
    }

    /// Generator-side constructor: ids are unique and transactions valid by construction.
    pub(crate) fn from_parts(
        accounts: Vec<Account>,
        transactions: Vec<Transaction>,
        index: AccountIndex,
    ) -> Self {
        Self { accounts, transactions, index }
    }

    pub fn index(&self) -> &AccountIndex {
        &self.index
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.index.get(id).map(|i| &self.accounts[i])
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut [Account], &[Transaction], &AccountIndex) {
        (self.accounts.as_mut_slice(), self.transactions.as_slice(), &self.index)
    }
}
