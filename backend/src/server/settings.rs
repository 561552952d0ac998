//! Application settings loaded via OrthoConfig.
//!
//! Values merge from CLI flags, `OKR_*` environment variables and config
//! files. Everything is optional so a bare `okr-backend` starts against the
//! in-memory store on the default port.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use okr_backend::inbound::http::session_config::SessionToggles;
use okr_backend::outbound::persistence::PoolConfig;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        /// Raw setting.
        value: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "OKR")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_timeout_secs: Option<u64>,
    /// Apply pending migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Insert the demo organisation after migrating.
    #[ortho_config(default = false)]
    pub seed_demo_organisation: bool,
    /// Serve the shared-password login from a release build.
    #[ortho_config(default = false)]
    pub allow_shared_password_login: bool,
    /// Session signing key location.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    pub session_cookie_secure: Option<String>,
    /// `SameSite` policy for session cookies.
    pub session_same_site: Option<String>,
    /// Allow a generated key when the key file is unreadable.
    pub session_allow_ephemeral: Option<String>,
}

impl AppSettings {
    /// Resolve the listening address.
    pub fn socket_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Pool configuration when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        let mut config = PoolConfig::new(url);
        if let Some(max_size) = self.pool_max_size {
            config = config.with_max_size(max_size);
        }
        if let Some(secs) = self.pool_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        Some(config)
    }

    /// Session toggles for validation by the HTTP adapter.
    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file.clone(),
            cookie_secure: self.session_cookie_secure.clone(),
            same_site: self.session_same_site.clone(),
            allow_ephemeral: self.session_allow_ephemeral.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 11] = [
        "OKR_BIND_ADDR",
        "OKR_DATABASE_URL",
        "OKR_POOL_MAX_SIZE",
        "OKR_POOL_TIMEOUT_SECS",
        "OKR_RUN_MIGRATIONS",
        "OKR_SEED_DEMO_ORGANISATION",
        "OKR_ALLOW_SHARED_PASSWORD_LOGIN",
        "OKR_SESSION_KEY_FILE",
        "OKR_SESSION_COOKIE_SECURE",
        "OKR_SESSION_SAME_SITE",
        "OKR_SESSION_ALLOW_EPHEMERAL",
    ];

    fn cleared_except(set: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = set
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("okr-backend")]).expect("settings load")
    }

    #[rstest]
    fn defaults_select_the_memory_store() {
        let _guard = lock_env(cleared_except(&[]));

        let settings = load();

        assert!(settings.pool_config().is_none());
        assert!(settings.run_migrations);
        assert!(!settings.seed_demo_organisation);
        assert!(!settings.allow_shared_password_login);
        assert_eq!(
            settings.socket_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal address")
        );
        assert_eq!(settings.session_toggles(), SessionToggles::default());
    }

    #[rstest]
    fn environment_configures_database_and_session() {
        let _guard = lock_env(cleared_except(&[
            ("OKR_BIND_ADDR", "127.0.0.1:9090"),
            ("OKR_DATABASE_URL", "postgres://okr@localhost/okr"),
            ("OKR_SESSION_SAME_SITE", "Strict"),
            ("OKR_SESSION_KEY_FILE", "/etc/okr/session_key"),
        ]));

        let settings = load();

        let pool = settings.pool_config().expect("database configured");
        assert_eq!(pool.database_url(), "postgres://okr@localhost/okr");
        assert_eq!(
            settings.socket_addr().expect("configured address").port(),
            9090
        );
        let toggles = settings.session_toggles();
        assert_eq!(toggles.same_site.as_deref(), Some("Strict"));
        assert_eq!(toggles.key_file, Some(PathBuf::from("/etc/okr/session_key")));
    }

    #[rstest]
    fn demo_seed_and_shared_login_are_opt_in() {
        let _guard = lock_env(cleared_except(&[
            ("OKR_SEED_DEMO_ORGANISATION", "true"),
            ("OKR_ALLOW_SHARED_PASSWORD_LOGIN", "true"),
        ]));

        let settings = load();

        assert!(settings.seed_demo_organisation);
        assert!(settings.allow_shared_password_login);
    }

    #[rstest]
    fn malformed_bind_addresses_are_reported() {
        let _guard = lock_env(cleared_except(&[("OKR_BIND_ADDR", "localhost-only")]));

        let error = load().socket_addr().expect_err("invalid address");

        assert!(error.to_string().contains("localhost-only"));
    }
}
