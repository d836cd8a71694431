use thiserror::Error;

/// Everything the pipeline can reject.
///
/// The first group are precondition violations: invalid caller input that
/// would otherwise produce degenerate output. They are reported, never
/// swallowed. The last two come from config loading.
#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Account count must be at least 1, got {count}")]
    InvalidAccountCount { count: usize },

    #[error("Cannot draw {transactions} transfers between distinct accounts with only {accounts} account(s)")]
    UnsatisfiableTransfers { accounts: usize, transactions: usize },

    #[error("Layout {width}x{height} with margin {margin} leaves no drawable area")]
    InvalidLayout { width: f64, height: f64, margin: f64 },

    #[error("Sensitivity must be finite and > 0, got {value}")]
    InvalidSensitivity { value: f64 },

    #[error("Transaction references unknown account '{id}'")]
    UnknownAccount { id: String },

    #[error("Account id '{id}' appears more than once")]
    DuplicateAccount { id: String },

    #[error("Transaction {index} is invalid: {reason}")]
    InvalidTransaction { index: usize, reason: String },

    #[error("No dataset generated yet")]
    NoDataset,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeskError {
    /// True for errors caused by invalid caller input rather than the environment.
    pub fn is_precondition(&self) -> bool {
        !matches!(
            self,
            Self::Serialization(_) | Self::Other(_)
        )
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
