//! Unit tests for session toggle validation.

use super::*;
use rstest::{fixture, rstest};
use std::io::Write as _;
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary key file");
    file.write_all(&vec![b'k'; len]).expect("write key bytes");
    file
}

#[fixture]
fn full_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

fn release_toggles(key: &NamedTempFile) -> SessionToggles {
    SessionToggles {
        key_file: Some(key.path().to_path_buf()),
        cookie_secure: Some("1".to_owned()),
        same_site: Some("Strict".to_owned()),
        allow_ephemeral: Some("0".to_owned()),
    }
}

fn rejected(toggles: &SessionToggles) -> SessionConfigError {
    match session_settings(toggles, BuildMode::Release) {
        Ok(_) => panic!("release validation should fail"),
        Err(error) => error,
    }
}

#[rstest]
fn release_accepts_explicit_toggles(full_key: NamedTempFile) {
    let settings =
        session_settings(&release_toggles(&full_key), BuildMode::Release).expect("valid toggles");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn key_is_derived_from_file_contents(full_key: NamedTempFile) {
    let first = session_settings(&release_toggles(&full_key), BuildMode::Release)
        .expect("valid toggles");
    let second = session_settings(&release_toggles(&full_key), BuildMode::Release)
        .expect("valid toggles");

    assert_eq!(
        key_fingerprint(&first.key),
        key_fingerprint(&second.key)
    );
}

#[rstest]
#[case::cookie_secure(COOKIE_SECURE_VAR)]
#[case::same_site(SAME_SITE_VAR)]
#[case::allow_ephemeral(ALLOW_EPHEMERAL_VAR)]
fn release_requires_every_toggle(full_key: NamedTempFile, #[case] missing: &'static str) {
    let mut toggles = release_toggles(&full_key);
    match missing {
        COOKIE_SECURE_VAR => toggles.cookie_secure = None,
        SAME_SITE_VAR => toggles.same_site = None,
        _ => toggles.allow_ephemeral = None,
    }

    let error = rejected(&toggles);
    assert!(matches!(error, SessionConfigError::Missing { name } if name == missing));
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_rejects_malformed_booleans(full_key: NamedTempFile, #[case] value: &str) {
    let mut toggles = release_toggles(&full_key);
    toggles.cookie_secure = Some(value.to_owned());

    let error = rejected(&toggles);
    assert!(matches!(
        error,
        SessionConfigError::Invalid {
            name: COOKIE_SECURE_VAR,
            ..
        }
    ));
}

#[rstest]
fn release_rejects_unknown_same_site(full_key: NamedTempFile) {
    let mut toggles = release_toggles(&full_key);
    toggles.same_site = Some("Sometimes".to_owned());

    assert!(matches!(
        rejected(&toggles),
        SessionConfigError::Invalid {
            name: SAME_SITE_VAR,
            ..
        }
    ));
}

#[rstest]
fn release_rejects_insecure_same_site_none(full_key: NamedTempFile) {
    let mut toggles = release_toggles(&full_key);
    toggles.cookie_secure = Some("0".to_owned());
    toggles.same_site = Some("None".to_owned());

    assert!(matches!(
        rejected(&toggles),
        SessionConfigError::InsecureSameSiteNone
    ));
}

#[rstest]
fn release_refuses_ephemeral_keys(full_key: NamedTempFile) {
    let mut toggles = release_toggles(&full_key);
    toggles.allow_ephemeral = Some("yes".to_owned());

    assert!(matches!(
        rejected(&toggles),
        SessionConfigError::EphemeralNotAllowed
    ));
}

#[rstest]
fn release_rejects_short_keys() {
    let short = key_file(SESSION_KEY_MIN_LEN - 1);

    assert!(matches!(
        rejected(&release_toggles(&short)),
        SessionConfigError::KeyTooShort { length, .. } if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_requires_a_readable_key(full_key: NamedTempFile) {
    let mut toggles = release_toggles(&full_key);
    toggles.key_file = Some(PathBuf::from("/nonexistent/okr/session_key"));

    assert!(matches!(
        rejected(&toggles),
        SessionConfigError::KeyRead { .. }
    ));
}

#[rstest]
fn debug_falls_back_to_lenient_defaults() {
    let toggles = SessionToggles {
        key_file: Some(PathBuf::from("/nonexistent/okr/session_key")),
        cookie_secure: Some("perhaps".to_owned()),
        ..SessionToggles::default()
    };

    let settings = session_settings(&toggles, BuildMode::Debug).expect("debug defaults");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_accepts_short_keys() {
    let short = key_file(8);
    let toggles = SessionToggles {
        key_file: Some(short.path().to_path_buf()),
        ..SessionToggles::default()
    };

    assert!(session_settings(&toggles, BuildMode::Debug).is_ok());
}

#[rstest]
#[case("TRUE", Some(true))]
#[case(" n ", Some(false))]
#[case("on", None)]
fn booleans_accept_common_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}
