use crate::domain::{Cents, Entry, EntryDraft, EntryFilter, EntryId, EntryStatus, UserId};
use crate::storage::Repository;

use super::AppError;

/// Ledger-entry lifecycle service: validates entries, manages status
/// transitions and delegates persistence to the repository. Stateless
/// beyond the repository handle, so it can be shared across requests.
pub struct EntryService {
    repo: Repository,
}

impl EntryService {
    /// Create a new entry service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Validate and persist a new entry. The repository is never reached
    /// when a rule fails; the stored entry starts out pending and carries
    /// the id assigned by the store.
    pub async fn create(&self, draft: EntryDraft) -> Result<Entry, AppError> {
        draft.validate()?;
        let entry = self.repo.insert_entry(&draft).await?;
        tracing::info!(id = entry.id, user_id = entry.user_id, "Recorded ledger entry");
        Ok(entry)
    }

    /// Re-validate an existing entry and persist its changes. The
    /// registration date is left as it was first recorded.
    pub async fn update(&self, entry: &Entry) -> Result<Entry, AppError> {
        entry.to_draft().validate()?;
        self.repo.update_entry(entry).await?;
        tracing::debug!(id = entry.id, "Updated ledger entry");
        Ok(entry.clone())
    }

    /// Delete a persisted entry.
    pub async fn delete(&self, entry: &Entry) -> Result<(), AppError> {
        self.repo.delete_entry(entry.id).await?;
        tracing::info!(id = entry.id, "Deleted ledger entry");
        Ok(())
    }

    /// Look up an entry by id. A missing id is not an error.
    pub async fn find_by_id(&self, id: EntryId) -> Result<Option<Entry>, AppError> {
        Ok(self.repo.get_entry(id).await?)
    }

    /// Query entries by example: unset filter fields act as wildcards.
    /// Result order follows the store (ascending id).
    pub async fn search(&self, filter: &EntryFilter) -> Result<Vec<Entry>, AppError> {
        Ok(self.repo.find_entries(filter).await?)
    }

    /// Move an entry to a new lifecycle status and persist it via `update`.
    pub async fn change_status(
        &self,
        entry: &mut Entry,
        status: EntryStatus,
    ) -> Result<Entry, AppError> {
        entry.status = status;
        self.update(entry).await
    }

    /// Balance for a user: settled income minus settled expenses.
    pub async fn balance(&self, user_id: UserId) -> Result<Cents, AppError> {
        Ok(self.repo.compute_balance(user_id).await?)
    }
}
