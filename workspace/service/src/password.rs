use tracing::{instrument, trace, warn};

use crate::error::{Result, ServiceError};

/// Lowest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest cost bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// Hashes and verifies passwords with bcrypt.
///
/// bcrypt is CPU bound, so both operations run on tokio's blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    /// `cost` is clamped into the range bcrypt accepts.
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    #[instrument(skip_all, fields(cost = self.cost))]
    pub async fn hash(&self, password: &str) -> Result<String> {
        trace!("Hashing password");
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| ServiceError::PasswordHash(e.to_string()))?
            .map_err(ServiceError::from)
    }

    /// A malformed stored hash counts as a mismatch.
    pub async fn verify(&self, password: &str, hash: &str) -> bool {
        let password = password.to_owned();
        let hash = hash.to_owned();
        match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
            Ok(result) => result.unwrap_or(false),
            Err(e) => {
                warn!("Password verification task failed: {}", e);
                false
            }
        }
    }
}
