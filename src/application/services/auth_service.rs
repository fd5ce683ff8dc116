//! Login and bearer token verification.

use std::sync::Arc;
use std::time::Duration;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::domain::clock::Clock;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// Signing parameters for issued tokens.
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub ttl: Duration,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"***")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Token payload. `id` is the user id.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: i64,
    iat: i64,
    exp: i64,
}

/// Identity of an authenticated caller, inserted into request extensions by
/// the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

/// Hashes a password with Argon2 and a random salt, returning a PHC string.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal("Failed to hash password", json!({ "reason": e.to_string() })))
}

/// Checks `password` against a stored PHC string.
///
/// A malformed stored hash never matches.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Service for password login and HS256 bearer tokens.
pub struct AuthService<U: UserRepository + ?Sized> {
    user_repository: Arc<U>,
    settings: JwtSettings,
    clock: Arc<dyn Clock>,
}

impl<U: UserRepository + ?Sized> AuthService<U> {
    pub fn new(user_repository: Arc<U>, settings: JwtSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_repository,
            settings,
            clock,
        }
    }

    /// Exchanges credentials for a signed token.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] on bad credentials.
    /// Returns [`AppError::Internal`] on store or signing errors.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let invalid = || AppError::unauthenticated("Invalid credentials", json!({}));

        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| {
                AppError::internal("Password check failed", json!({ "reason": e.to_string() }))
            })?;

        if !matches {
            debug!(user_id = user.id, "Password mismatch");
            return Err(invalid());
        }

        let token = self.issue_token(user.id)?;
        info!(user_id = user.id, "User logged in");

        Ok(token)
    }

    /// Signs a token for `user_id`, valid for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if signing fails or the expiry does not
    /// fit in a timestamp.
    pub fn issue_token(&self, user_id: i64) -> Result<String, AppError> {
        let iat = self.clock.now().timestamp();
        let exp = i64::try_from(self.settings.ttl.as_secs())
            .ok()
            .and_then(|ttl| iat.checked_add(ttl))
            .ok_or_else(|| {
                AppError::internal(
                    "Token lifetime out of range",
                    json!({ "ttl_seconds": self.settings.ttl.as_secs() }),
                )
            })?;
        let claims = Claims {
            id: user_id,
            iat,
            exp,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.settings.secret.as_bytes()),
        )
        .map_err(|e| AppError::internal("Failed to sign token", json!({ "reason": e.to_string() })))
    }

    /// Verifies a bearer token and returns the caller it was issued to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the signature is invalid, the token
    /// is malformed, or it has expired.
    pub fn verify(&self, token: &str) -> Result<AuthUser, AppError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            AppError::unauthorized("Invalid token", json!({}))
        })?;

        Ok(AuthUser {
            id: data.claims.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::entities::User;
    use crate::domain::repositories::MockUserRepository;
    use chrono::Utc;

    fn settings(secret: &str) -> JwtSettings {
        JwtSettings {
            secret: secret.to_string(),
            ttl: Duration::from_secs(3600),
        }
    }

    fn service_with(repo: MockUserRepository, secret: &str) -> AuthService<MockUserRepository> {
        AuthService::new(
            Arc::new(repo),
            settings(secret),
            Arc::new(ManualClock::new(Utc::now())),
        )
    }

    fn user_with_password(password: &str) -> User {
        User {
            id: 7,
            email: "intern@dacoid.com".to_string(),
            password_hash: hash_password(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("Test123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Test123", &hash));
        assert!(!verify_password("test123", &hash));
    }

    #[test]
    fn test_verify_password_malformed_hash() {
        assert!(!verify_password("Test123", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_login_success_issues_verifiable_token() {
        let user = user_with_password("Test123");
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_email()
            .withf(|email| email == "intern@dacoid.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service_with(mock_repo, "secret");

        let token = service.login("intern@dacoid.com", "Test123").await.unwrap();

        assert_eq!(service.verify(&token).unwrap(), AuthUser { id: 7 });
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = user_with_password("Test123");
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = service_with(mock_repo, "secret");

        let err = service.login("intern@dacoid.com", "nope").await.unwrap_err();

        assert!(matches!(err, AppError::Unauthenticated { .. }));
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_email().returning(|_| Ok(None));

        let service = service_with(mock_repo, "secret");

        let err = service.login("ghost@example.com", "x").await.unwrap_err();

        assert!(matches!(err, AppError::Unauthenticated { .. }));
    }

    #[test]
    fn test_verify_rejects_foreign_signature() {
        let issuer = service_with(MockUserRepository::new(), "secret-a");
        let verifier = service_with(MockUserRepository::new(), "secret-b");

        let token = issuer.issue_token(1).unwrap();

        assert!(matches!(
            verifier.verify(&token).unwrap_err(),
            AppError::Unauthorized { .. }
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let clock = Arc::new(ManualClock::new(Utc::now() - chrono::Duration::days(2)));
        let service = AuthService::new(
            Arc::new(MockUserRepository::new()),
            settings("secret"),
            clock,
        );

        let token = service.issue_token(1).unwrap();

        assert!(matches!(
            service.verify(&token).unwrap_err(),
            AppError::Unauthorized { .. }
        ));
    }

    #[test]
    fn test_issue_token_rejects_unrepresentable_ttl() {
        let service = AuthService::new(
            Arc::new(MockUserRepository::new()),
            JwtSettings {
                secret: "secret".to_string(),
                ttl: Duration::from_secs(u64::MAX),
            },
            Arc::new(ManualClock::new(Utc::now())),
        );

        assert!(matches!(
            service.issue_token(1).unwrap_err(),
            AppError::Internal { .. }
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let service = service_with(MockUserRepository::new(), "secret");

        assert!(service.verify("not.a.jwt").is_err());
        assert!(service.verify("").is_err());
    }

    #[test]
    fn test_settings_debug_hides_secret() {
        let rendered = format!("{:?}", settings("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
