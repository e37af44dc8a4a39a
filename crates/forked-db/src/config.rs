use std::env;

/// Database configuration.
///
/// Reads from the `FORKED_DATABASE_URL` environment variable, falling back to
/// `postgresql://localhost:5432/forked` when unset.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full PostgreSQL connection URL.
    pub database_url: String,
}

impl DbConfig {
    /// The default connection URL used when no environment variable is set.
    pub const DEFAULT_URL: &str = "postgresql://localhost:5432/forked";

    /// Environment variable consulted by [`DbConfig::from_env`].
    pub const ENV_VAR: &str = "FORKED_DATABASE_URL";

    pub fn from_env() -> Self {
        let database_url =
            env::var(Self::ENV_VAR).unwrap_or_else(|_| Self::DEFAULT_URL.to_owned());
        Self { database_url }
    }

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Extract the database name from the URL, ignoring any query string.
    ///
    /// Returns `None` if the URL has no path component.
    pub fn database_name(&self) -> Option<&str> {
        let without_query = self
            .database_url
            .split_once('?')
            .map_or(self.database_url.as_str(), |(base, _)| base);
        without_query
            .rsplit_once('/')
            .filter(|(server, _)| !server.ends_with(":/"))
            .map(|(_, name)| name)
            .filter(|s| !s.is_empty() && !s.contains(':'))
    }

    /// The same server and query string, pointed at database `name`.
    ///
    /// A URL with no database segment gets one appended.
    pub fn for_database(&self, name: &str) -> Self {
        let (base, query) = match self.database_url.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (self.database_url.as_str(), None),
        };
        let server = match self.database_name() {
            Some(current) => &base[..base.len() - current.len() - 1],
            None => base.trim_end_matches('/'),
        };

        let mut database_url = format!("{server}/{name}");
        if let Some(query) = query {
            database_url.push('?');
            database_url.push_str(query);
        }
        Self { database_url }
    }

    /// URL of the `postgres` maintenance database on the same server, used
    /// to issue `CREATE DATABASE` before the target exists.
    pub fn maintenance_url(&self) -> String {
        self.for_database("postgres").database_url
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
