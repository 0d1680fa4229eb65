#[cfg(test)]
pub mod test_utils {
    use crate::config::{build_app_state, AppConfig};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
    use axum_test::TestServer;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
    use serde_json::{json, Value};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        db.execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .expect("Failed to enable foreign keys");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing, seeded with the demo accounts
    /// (`admin` employee and `jsmith` farmer, password `password`).
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            bcrypt_cost: 4,
            session_ttl_hours: 1,
        };
        let state = build_app_state(db, &config);

        service::seed_database(&state.db, &state.hasher, service::now())
            .await
            .expect("Failed to seed test database");

        state
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level comes from RUST_LOG and defaults to WARN.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Test server over the full router and a seeded database
    pub async fn setup_test_server() -> TestServer {
        let _guard = init_test_tracing();

        let state = setup_test_app_state().await;
        TestServer::new(create_router(state)).unwrap()
    }

    /// Logs in and returns the session token
    pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
        let response = server
            .post("/api/v1/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["data"]["token"]
            .as_str()
            .expect("login response carries a token")
            .to_string()
    }

    /// `Authorization: Bearer <token>` header pair
    pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
        (
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        )
    }
}
