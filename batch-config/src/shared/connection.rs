use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Connection configuration for the Postgres database backing the record sink.
///
/// This intentionally does not implement `Serialize` to avoid accidentally
/// leaking the password into serialized forms.
#[derive(Debug, Clone, Deserialize)]
pub struct PgConnectionConfig {
    /// Host on which Postgres is running.
    pub host: String,
    /// Port on which Postgres is listening.
    pub port: u16,
    /// Name of the database to connect to.
    pub name: String,
    /// Username for authentication.
    pub username: String,
    /// Optional password for authentication.
    pub password: Option<SecretString>,
}

impl PgConnectionConfig {
    /// Builds sqlx connect options for the configured database.
    pub fn with_db(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .ssl_mode(PgSslMode::Prefer)
            .database(&self.name);

        if let Some(password) = &self.password {
            options = options.password(password.expose_secret());
        }

        options
    }
}
