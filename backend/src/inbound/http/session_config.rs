//! Session cookie settings.
//!
//! Raw toggles arrive from the application settings as strings; this module
//! validates them against the build mode. Debug builds fall back to lenient
//! defaults with a warning. Release builds reject anything missing or
//! malformed and refuse ephemeral signing keys.

pub mod fingerprint;

use std::path::{Path, PathBuf};

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use tracing::{info, warn};
use zeroize::Zeroize;

use self::fingerprint::key_fingerprint;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/okr/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const SESSION_COOKIE_NAME: &str = "session";
const SESSION_TTL_HOURS: i64 = 8;

pub(crate) const COOKIE_SECURE_VAR: &str = "OKR_SESSION_COOKIE_SECURE";
pub(crate) const SAME_SITE_VAR: &str = "OKR_SESSION_SAME_SITE";
pub(crate) const ALLOW_EPHEMERAL_VAR: &str = "OKR_SESSION_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAME_SITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerates missing toggles and generates a key when none is readable.
    Debug,
    /// Requires explicit, valid toggles and a readable key of full length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use okr_backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub const fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Unvalidated session toggles as supplied by configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToggles {
    /// Path of the signing key; falls back to a well-known secrets path.
    pub key_file: Option<PathBuf>,
    /// Whether cookies carry the `Secure` attribute.
    pub cookie_secure: Option<String>,
    /// `Strict`, `Lax` or `None`.
    pub same_site: Option<String>,
    /// Permit a generated key when the key file cannot be read.
    pub allow_ephemeral: Option<String>,
}

/// Validated session settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Build the cookie-session middleware guarding the API scope.
    ///
    /// Cookies are private (encrypted), HTTP-only and expire after eight
    /// hours.
    #[must_use]
    pub fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE_NAME.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.cookie_secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required toggle is missing.
    #[error("missing required setting: {name}")]
    Missing {
        /// Environment variable naming the toggle.
        name: &'static str,
    },
    /// A toggle is present but malformed.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    Invalid {
        /// Environment variable naming the toggle.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Accepted spellings.
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Key file location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The key file is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Key file location.
        path: PathBuf,
        /// Bytes read.
        length: usize,
        /// Required minimum.
        min_len: usize,
    },
    /// `SameSite=None` without `Secure` in a release build.
    #[error("OKR_SESSION_SAME_SITE=None requires OKR_SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Ephemeral keys requested in a release build.
    #[error("OKR_SESSION_ALLOW_EPHEMERAL must be disabled in release builds")]
    EphemeralNotAllowed,
}

struct Toggle<'a, T> {
    name: &'static str,
    raw: Option<&'a str>,
    expected: &'static str,
    fallback: T,
}

impl<T> Toggle<'_, T> {
    fn resolve(
        self,
        mode: BuildMode,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, SessionConfigError> {
        let Some(raw) = self.raw else {
            if mode.is_debug() {
                warn!(setting = self.name, "setting missing; using debug default");
                return Ok(self.fallback);
            }
            return Err(SessionConfigError::Missing { name: self.name });
        };
        match parse(raw) {
            Some(value) => Ok(value),
            None if mode.is_debug() => {
                warn!(setting = self.name, value = raw, "invalid setting; using debug default");
                Ok(self.fallback)
            }
            None => Err(SessionConfigError::Invalid {
                name: self.name,
                value: raw.to_owned(),
                expected: self.expected,
            }),
        }
    }
}

/// Validate session toggles for the given build mode.
///
/// # Errors
///
/// Returns [`SessionConfigError`] when a release build is missing a toggle,
/// receives a malformed one, cannot read a full-length key, or asks for an
/// insecure combination.
///
/// # Examples
///
/// ```rust
/// use okr_backend::inbound::http::session_config::{
///     BuildMode, SessionToggles, session_settings,
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("okr_session_key_example");
/// std::fs::write(&key_path, vec![b'k'; 64])?;
///
/// let toggles = SessionToggles {
///     key_file: Some(key_path.clone()),
///     cookie_secure: Some("1".to_owned()),
///     same_site: Some("Strict".to_owned()),
///     allow_ephemeral: Some("0".to_owned()),
/// };
/// let settings = session_settings(&toggles, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
///
/// std::fs::remove_file(&key_path)?;
/// # Ok(())
/// # }
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = Toggle {
        name: COOKIE_SECURE_VAR,
        raw: toggles.cookie_secure.as_deref(),
        expected: BOOL_EXPECTED,
        fallback: true,
    }
    .resolve(mode, parse_bool)?;

    let same_site = Toggle {
        name: SAME_SITE_VAR,
        raw: toggles.same_site.as_deref(),
        expected: SAME_SITE_EXPECTED,
        fallback: if mode.is_debug() {
            SameSite::Lax
        } else {
            SameSite::Strict
        },
    }
    .resolve(mode, parse_same_site)?;
    if same_site == SameSite::None && !cookie_secure {
        if !mode.is_debug() {
            return Err(SessionConfigError::InsecureSameSiteNone);
        }
        warn!("SameSite=None without Secure; browsers may reject the session cookie");
    }

    let allow_ephemeral = Toggle {
        name: ALLOW_EPHEMERAL_VAR,
        raw: toggles.allow_ephemeral.as_deref(),
        expected: BOOL_EXPECTED,
        fallback: false,
    }
    .resolve(mode, parse_bool)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }

    let path = toggles
        .key_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));
    let key = load_key(&path, mode, allow_ephemeral)?;
    info!(fingerprint = %key_fingerprint(&key), "session key ready");

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn load_key(path: &Path, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if !mode.is_debug() && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                %error,
                "session key unreadable; generating an ephemeral key"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
