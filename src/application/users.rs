use crate::domain::{NewUser, User, UserId};
use crate::storage::Repository;

use super::AppError;

/// User-identity service: authenticates credentials and enforces email
/// uniqueness on registration.
pub struct UserService {
    repo: Repository,
}

impl UserService {
    /// Create a new user service with the given repository.
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

    /// Authenticate an email/password pair. Lookup first, then a direct
    /// equality compare; the two failure kinds stay distinct variants.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let Some(user) = self.repo.get_user_by_email(email).await? else {
            tracing::debug!(email, "Authentication failed: unknown email");
            return Err(AppError::UserNotFound);
        };

        if user.password != password {
            tracing::debug!(email, "Authentication failed: password mismatch");
            return Err(AppError::InvalidPassword);
        }

        Ok(user)
    }

    /// Register a new user after the email uniqueness gate. The repository
    /// save is never reached for a duplicate email.
    pub async fn register(&self, user: NewUser) -> Result<User, AppError> {
        self.validate_email_uniqueness(&user.email).await?;
        let user = self.repo.save_user(&user).await?;
        tracing::info!(id = user.id, email = %user.email, "Registered user");
        Ok(user)
    }

    /// Fail if the email is already taken by a registered user.
    pub async fn validate_email_uniqueness(&self, email: &str) -> Result<(), AppError> {
        if self.repo.user_exists_by_email(email).await? {
            return Err(AppError::EmailAlreadyRegistered(email.to_string()));
        }
        Ok(())
    }

    /// Look up a user by id. A missing id is not an error.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        Ok(self.repo.get_user(id).await?)
    }
}
