//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::{
    ApiTokenMetadata, ApiTokenVersion, AuthServiceError, IssuedApiToken, NewUser, Principal,
    UserRecord, UserUuid, format_api_token, generate_api_token_secret,
    models::NewApiToken, parse_api_token, repository::PgAuthRepository, token_verifier,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Register a user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::AlreadyExists`] when the email is taken.
    #[tracing::instrument(
        name = "auth.service.create_user",
        skip(self, user),
        fields(user_uuid = %user.uuid, role = %user.role),
        err
    )]
    pub async fn create_user(&self, user: NewUser) -> Result<UserRecord, AuthServiceError> {
        let record = self.repository.create_user(&user).await?;

        info!(user_uuid = %record.uuid, "created user");

        Ok(record)
    }

    /// Issue a new API token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the insert fails.
    #[tracing::instrument(
        name = "auth.service.issue_api_token",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    pub async fn issue_api_token(&self, user: UserUuid) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                user_uuid: user,
                version,
                token_hash: token_verifier(&token_uuid, version, user, &secret),
            })
            .await?;

        info!(token_uuid = %metadata.uuid, "issued api token");

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        self.repository
            .list_api_tokens_by_user(user)
            .await
            .map_err(AuthServiceError::from)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_api_token(token_uuid)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let parsed = parse_api_token(bearer_token).map_err(|_err| AuthServiceError::NotFound)?;

        let token = self
            .repository
            .find_active_api_token(parsed.token_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let expected = token_verifier(
            &parsed.token_uuid,
            parsed.version,
            token.user_uuid,
            &parsed.secret,
        );

        if expected != token.token_hash {
            return Err(AuthServiceError::NotFound);
        }

        // Failing to record usage must not fail authentication.
        let _touch_result = self
            .repository
            .touch_api_token_last_used(parsed.token_uuid)
            .await;

        Ok(Principal {
            user: token.user_uuid,
            role: token.role,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the calling user and their role.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{auth::Role, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates_as_owner() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::Staff).await?;
        let service = &ctx.auth;

        let issued = service.issue_api_token(user).await?;
        let principal = service.authenticate_bearer(&issued.token).await?;

        assert_eq!(principal.user, user);
        assert_eq!(principal.role, Role::Staff);

        Ok(())
    }

    #[tokio::test]
    async fn tampered_secret_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::Customer).await?;
        let service = &ctx.auth;

        let issued = service.issue_api_token(user).await?;
        let mut tampered = issued.token.clone();
        let last = if tampered.ends_with('0') { '1' } else { '0' };

        tampered.pop();
        tampered.push(last);

        let result = service.authenticate_bearer(&tampered).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn revoked_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::Customer).await?;
        let service = &ctx.auth;

        let issued = service.issue_api_token(user).await?;

        assert!(service.revoke_api_token(issued.metadata.uuid).await?);

        let result = service.authenticate_bearer(&issued.token).await;

        assert!(matches!(result, Err(AuthServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::Customer).await?;
        let service = &ctx.auth;

        let result = service
            .create_user(NewUser {
                uuid: UserUuid::new(),
                email: format!("{user}@drift.test"),
                name: "Someone Else".to_string(),
                role: Role::Customer,
            })
            .await;

        assert!(matches!(result, Err(AuthServiceError::AlreadyExists)));

        Ok(())
    }
}
