use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::auth::password::{hash_password, verify_dummy, verify_password};
use crate::auth::TokenIssuer;
use crate::database::{NewUser, Store, User, EMAIL_TAKEN, USERNAME_TAKEN};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Registration, credential checks and token resolution
pub struct UserService<'a> {
    store: &'a dyn Store,
    tokens: &'a TokenIssuer,
}

impl<'a> UserService<'a> {
    pub fn new(store: &'a dyn Store, tokens: &'a TokenIssuer) -> Self {
        Self { store, tokens }
    }

    /// Create an account. Only the Argon2 hash of the password is stored.
    pub async fn register(&self, body: RegisterRequest) -> Result<User, ApiError> {
        if self.store.user_by_username(&body.username).await?.is_some() {
            return Err(ApiError::conflict(USERNAME_TAKEN));
        }
        if self.store.user_by_email(&body.email).await?.is_some() {
            return Err(ApiError::conflict(EMAIL_TAKEN));
        }

        let password_hash = hash_password(&body.password)?;
        // A concurrent registration can still trip the unique constraints;
        // those surface as Conflict through DatabaseError::UniqueViolation.
        let user = self
            .store
            .insert_user(NewUser {
                name: body.name,
                username: body.username,
                email: body.email,
                password_hash,
            })
            .await?;

        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn login(&self, body: LoginRequest) -> Result<TokenResponse, ApiError> {
        let Some(user) = self.store.user_by_username(&body.username).await? else {
            verify_dummy(&body.password);
            warn!("Login failed: unknown username");
            return Err(ApiError::unauthorized("Invalid username or password"));
        };

        if !verify_password(&body.password, &user.password_hash)? {
            warn!("Login failed: wrong password for user {}", user.id);
            return Err(ApiError::unauthorized("Invalid username or password"));
        }

        let token = self.tokens.issue(user.id)?;
        debug!("Issued token for user {}", user.id);
        Ok(TokenResponse { token })
    }

    /// Resolve the bearer token in `headers` to a stored user
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<User, ApiError> {
        let token = extract_bearer_token(headers)?;

        let claims = self.tokens.verify(token).map_err(|e| {
            warn!("Rejected token: {}", e);
            ApiError::from(e)
        })?;
        let user_id = claims.user_id()?;

        self.store.user_by_id(user_id).await?.ok_or_else(|| {
            warn!("Token for user {} no longer matches an account", user_id);
            ApiError::unauthorized("User not found")
        })
    }

    /// Overwrite name and username. A blank name keeps the current one.
    pub async fn update_profile(&self, current: &User, body: ProfileUpdate) -> Result<User, ApiError> {
        let username = body.username.trim();
        if username.is_empty() {
            return Err(ApiError::bad_request("Username is required"));
        }

        if let Some(existing) = self.store.user_by_username(username).await? {
            if existing.id != current.id {
                return Err(ApiError::conflict(USERNAME_TAKEN));
            }
        }

        let name = match body.name.trim() {
            "" => current.name.as_str(),
            trimmed => trimmed,
        };

        let user = self
            .store
            .update_user_profile(current.id, name, username)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;

        info!("Updated profile for user {}", user.id);
        Ok(user)
    }

    /// Remove the account along with its subjects and notes
    pub async fn delete_account(&self, current: &User) -> Result<(), ApiError> {
        if !self.store.delete_user(current.id).await? {
            return Err(ApiError::unauthorized("User not found"));
        }
        info!("Deleted user {} and all owned subjects", current.id);
        Ok(())
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Token is missing"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    // Auth schemes are case-insensitive
    match auth_str.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("Bearer") => {
            match token.trim() {
                "" => Err(ApiError::unauthorized("Token is missing")),
                token => Ok(token),
            }
        }
        _ => Err(ApiError::unauthorized(
            "Authorization header must use Bearer token format",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;
    use crate::database::MemoryStore;
    use axum::http::{HeaderValue, StatusCode};
    use jsonwebtoken::Algorithm;

    fn tokens() -> TokenIssuer {
        TokenIssuer::new(&SecurityConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_algorithm: Algorithm::HS256,
            jwt_expiry_minutes: 30,
        })
    }

    fn registration(username: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ada Lovelace".to_string(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "correct horse".to_string(),
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn register_login_authenticate() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let users = UserService::new(&store, &tokens);

        let user = users.register(registration("ada")).await.unwrap();
        assert_ne!(user.password_hash, "correct horse");

        let login = users
            .login(LoginRequest {
                username: "ada".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();
        let resolved = users.authenticate(&bearer(&login.token)).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let users = UserService::new(&store, &tokens);
        users.register(registration("ada")).await.unwrap();

        let err = users.register(registration("ada")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let mut same_email = registration("grace");
        same_email.email = "ada@example.com".to_string();
        let err = users.register(same_email).await.unwrap_err();
        assert_eq!(err.message(), EMAIL_TAKEN);
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let users = UserService::new(&store, &tokens);
        users.register(registration("ada")).await.unwrap();

        for (username, password) in [("ada", "wrong"), ("nobody", "correct horse")] {
            let err = users
                .login(LoginRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                })
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn authenticate_rejects_missing_malformed_and_orphaned_tokens() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let users = UserService::new(&store, &tokens);

        let err = users.authenticate(&HeaderMap::new()).await.unwrap_err();
        assert_eq!(err.message(), "Token is missing");

        let mut basic = HeaderMap::new();
        basic.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(users.authenticate(&basic).await.is_err());

        assert!(users.authenticate(&bearer("garbage")).await.is_err());

        // Valid signature but the user was never stored
        let orphan = tokens.issue(999).unwrap();
        let err = users.authenticate(&bearer(&orphan)).await.unwrap_err();
        assert_eq!(err.message(), "User not found");
    }

    #[tokio::test]
    async fn bearer_scheme_is_case_insensitive() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let users = UserService::new(&store, &tokens);
        let ada = users.register(registration("ada")).await.unwrap();
        let token = tokens.issue(ada.id).unwrap();

        for scheme in ["Bearer", "bearer", "BEARER"] {
            let mut headers = HeaderMap::new();
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("{} {}", scheme, token)).unwrap(),
            );
            let resolved = users.authenticate(&headers).await.unwrap();
            assert_eq!(resolved.id, ada.id);
        }

        let mut empty = HeaderMap::new();
        empty.insert(AUTHORIZATION, HeaderValue::from_static("bearer "));
        let err = users.authenticate(&empty).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_username_costs_a_password_verification() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let users = UserService::new(&store, &tokens);
        users.register(registration("ada")).await.unwrap();
        let attempt = |username: &str| LoginRequest {
            username: username.to_string(),
            password: "wrong".to_string(),
        };

        // Warm up the lazily built dummy hash
        let _ = users.login(attempt("nobody")).await;

        let started = std::time::Instant::now();
        let _ = users.login(attempt("ada")).await;
        let wrong_password = started.elapsed();

        let started = std::time::Instant::now();
        let _ = users.login(attempt("nobody")).await;
        let unknown_user = started.elapsed();

        assert!(
            unknown_user * 4 >= wrong_password,
            "unknown user took {:?}, wrong password took {:?}",
            unknown_user,
            wrong_password
        );
    }

    #[tokio::test]
    async fn profile_update_rules() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let users = UserService::new(&store, &tokens);
        let ada = users.register(registration("ada")).await.unwrap();
        users.register(registration("grace")).await.unwrap();

        let err = users
            .update_profile(&ada, ProfileUpdate { name: "Ada".into(), username: "   ".into() })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = users
            .update_profile(&ada, ProfileUpdate { name: "Ada".into(), username: "grace".into() })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        // Keeping your own username is fine; a blank name keeps the old one
        let updated = users
            .update_profile(&ada, ProfileUpdate { name: "  ".into(), username: " ada ".into() })
            .await
            .unwrap();
        assert_eq!(updated.username, "ada");
        assert_eq!(updated.name, "Ada Lovelace");
    }
}
