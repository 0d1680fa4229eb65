//! Cookie/bearer sessions and role guards.

use std::time::Duration;

use axum::{
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
};
use model::entities::user;
use moka::future::Cache;
use rand::{distributions::Alphanumeric, Rng};
use service::ServiceError;
use tracing::{debug, trace, warn};

use crate::error::ApiError;
use crate::schemas::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "agri_session";

const TOKEN_LEN: usize = 48;

/// In-process session table: token -> user id.
///
/// Entries expire after `ttl` without use; every lookup refreshes them.
#[derive(Clone, Debug)]
pub struct SessionStore {
    sessions: Cache<String, i32>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(ttl)
            .build();
        Self { sessions, ttl }
    }

    /// Opens a session and returns its token.
    pub async fn create(&self, user_id: i32) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        self.sessions.insert(token.clone(), user_id).await;
        debug!(user_id, "Session created");
        token
    }

    pub async fn user_id(&self, token: &str) -> Option<i32> {
        self.sessions.get(token).await
    }

    pub async fn remove(&self, token: &str) {
        self.sessions.invalidate(token).await;
    }

    /// `Set-Cookie` value for a freshly created session.
    pub fn cookie(&self, token: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE,
            token,
            self.ttl.as_secs()
        )
    }

    /// `Set-Cookie` value that clears the session cookie.
    pub fn expired_cookie() -> String {
        format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// The logged-in user behind the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: user::Model,
    pub token: String,
}

impl CurrentUser {
    pub fn id(&self) -> i32 {
        self.user.id
    }

    pub fn is_employee(&self) -> bool {
        self.user.is_employee()
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts).or_else(|| cookie_token(parts)) else {
            trace!("Request without session token");
            return Err(ApiError::unauthorized());
        };

        let Some(user_id) = state.sessions.user_id(&token).await else {
            debug!("Unknown or expired session");
            return Err(ApiError::unauthorized());
        };

        let user = match state.auth().get_user_by_id(user_id).await {
            Ok(user) => user,
            Err(ServiceError::NotFound(_)) => {
                state.sessions.remove(&token).await;
                return Err(ApiError::unauthorized());
            }
            Err(e) => return Err(e.into()),
        };

        if !user.is_active {
            warn!(user_id, "Session of deactivated user rejected");
            state.sessions.remove(&token).await;
            return Err(ApiError::unauthorized());
        }

        Ok(CurrentUser { user, token })
    }
}

/// Guard: the caller must be an employee.
#[derive(Debug, Clone)]
pub struct Employee(pub CurrentUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for Employee {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        if !current.is_employee() {
            debug!(user_id = current.id(), "Employee role required");
            return Err(ApiError::forbidden("Employee role required"));
        }
        Ok(Employee(current))
    }
}

/// Guard: the caller must be a farmer with a farm profile.
#[derive(Debug, Clone)]
pub struct Farmer {
    pub current: CurrentUser,
    pub farmer_id: i32,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Farmer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        if current.user.role != user::UserRole::Farmer {
            debug!(user_id = current.id(), "Farmer role required");
            return Err(ApiError::forbidden("Farmer role required"));
        }

        let farmer_id = state
            .farmers()
            .farmer_id_for_user(current.id())
            .await?
            .ok_or_else(|| ApiError::forbidden("No farm profile for this account"))?;

        Ok(Farmer { current, farmer_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: (axum::http::HeaderName, &str)) -> Parts {
        let (parts, _) = Request::builder()
            .header(header.0, header.1)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(
            bearer_token(&parts((AUTHORIZATION, "Bearer abc123"))),
            Some("abc123".to_string())
        );
        assert_eq!(bearer_token(&parts((AUTHORIZATION, "Basic abc123"))), None);
        assert_eq!(bearer_token(&parts((AUTHORIZATION, "Bearer  "))), None);
    }

    #[test]
    fn test_cookie_token() {
        let found = cookie_token(&parts((COOKIE, "theme=dark; agri_session=tok42; lang=en")));
        assert_eq!(found, Some("tok42".to_string()));
        assert_eq!(cookie_token(&parts((COOKIE, "agri_session=; theme=dark"))), None);
        assert_eq!(cookie_token(&parts((COOKIE, "other=1"))), None);
    }

    #[tokio::test]
    async fn test_session_store() {
        let store = SessionStore::new(Duration::from_secs(3600));
        let token = store.create(7).await;

        assert_eq!(token.len(), TOKEN_LEN);
        assert_eq!(store.user_id(&token).await, Some(7));
        assert!(store.cookie(&token).contains("HttpOnly"));
        assert!(store.cookie(&token).contains("Max-Age=3600"));

        store.remove(&token).await;
        assert_eq!(store.user_id(&token).await, None);
    }
}
