use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type EntryId = i64;
pub type UserId = i64;

/// Money is represented as integer cents to avoid floating-point precision
/// issues, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Whether an entry adds to or subtracts from the owner's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(EntryKind::Income),
            "expense" => Some(EntryKind::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a ledger entry. New entries always start out pending;
/// transitions are explicit service operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Settled,
    Canceled,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Settled => "settled",
            EntryStatus::Canceled => "canceled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(EntryStatus::Pending),
            "settled" => Some(EntryStatus::Settled),
            "canceled" => Some(EntryStatus::Canceled),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a candidate entry was rejected. Rules are checked in a fixed order
/// and the first violated rule wins, so each variant pinpoints one field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid description")]
    InvalidDescription,
    #[error("invalid month")]
    InvalidMonth,
    #[error("invalid year")]
    InvalidYear,
    #[error("missing user")]
    MissingUser,
    #[error("invalid value")]
    InvalidValue,
    #[error("missing type")]
    MissingKind,
}

/// Candidate entry data as supplied by a caller. A draft carries no id and
/// has not been persisted; `validate` decides whether it may become an
/// [`Entry`]. The default draft fails every rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryDraft {
    pub description: String,
    pub month: u32,
    pub year: i32,
    pub value: Cents,
    pub user_id: Option<UserId>,
    pub kind: Option<EntryKind>,
}

impl EntryDraft {
    pub fn new(description: impl Into<String>, month: u32, year: i32, value: Cents) -> Self {
        Self {
            description: description.into(),
            month,
            year,
            value,
            user_id: None,
            kind: None,
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Business-rule checks, evaluated in a fixed order. Pure: no store
    /// access, no side effects, so it can be exercised on its own.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::InvalidDescription);
        }
        if !(1..=12).contains(&self.month) {
            return Err(ValidationError::InvalidMonth);
        }
        // Four digits required; lower bound only, far-future years pass.
        if self.year < 1000 {
            return Err(ValidationError::InvalidYear);
        }
        if self.user_id.is_none() {
            return Err(ValidationError::MissingUser);
        }
        if self.value <= 0 {
            return Err(ValidationError::InvalidValue);
        }
        if self.kind.is_none() {
            return Err(ValidationError::MissingKind);
        }
        Ok(())
    }
}

/// A persisted ledger entry. Always carries a store-assigned id, so update
/// and delete cannot be handed an unsaved record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub description: String,
    pub month: u32,
    pub year: i32,
    pub value: Cents,
    pub user_id: UserId,
    pub kind: EntryKind,
    pub status: EntryStatus,
    /// Date the entry was first recorded. Set once on insert, never updated.
    pub recorded_at: NaiveDate,
}

impl Entry {
    /// Draft view of this entry, used to re-run the business rules before
    /// an update is persisted.
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            description: self.description.clone(),
            month: self.month,
            year: self.year,
            value: self.value,
            user_id: Some(self.user_id),
            kind: Some(self.kind),
        }
    }
}

/// Query-by-example criteria for entries. Unset fields act as wildcards;
/// `description` matches as a case-insensitive substring.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub description: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub user_id: Option<UserId>,
    pub kind: Option<EntryKind>,
    pub status: Option<EntryStatus>,
}
