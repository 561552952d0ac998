//! Startup guard for the shared-password directory login.
//!
//! Every directory entry authenticates with the same password, so release
//! builds refuse to serve it unless the operator opts in.

use tracing::warn;

use super::session_config::BuildMode;

/// Opt-in toggle for the shared-password login in release builds.
pub const ALLOW_SHARED_PASSWORD_VAR: &str = "OKR_ALLOW_SHARED_PASSWORD_LOGIN";

/// Errors raised while validating the login configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginConfigError {
    /// Release build without the explicit opt-in.
    #[error(
        "shared-password login is disabled in release builds; \
         set OKR_ALLOW_SHARED_PASSWORD_LOGIN=true to serve it anyway"
    )]
    SharedPasswordNotAllowed,
}

/// Check whether the shared-password login may serve in `mode`.
///
/// # Errors
///
/// Returns [`LoginConfigError::SharedPasswordNotAllowed`] for release builds
/// without `allowed`.
///
/// # Examples
///
/// ```rust
/// use okr_backend::inbound::http::login_config::{LoginConfigError, check_shared_password_login};
/// use okr_backend::inbound::http::session_config::BuildMode;
///
/// assert!(check_shared_password_login(BuildMode::Debug, false).is_ok());
/// assert_eq!(
///     check_shared_password_login(BuildMode::Release, false),
///     Err(LoginConfigError::SharedPasswordNotAllowed)
/// );
/// ```
pub fn check_shared_password_login(mode: BuildMode, allowed: bool) -> Result<(), LoginConfigError> {
    match (mode, allowed) {
        (BuildMode::Debug, _) => Ok(()),
        (BuildMode::Release, true) => {
            warn!(
                setting = ALLOW_SHARED_PASSWORD_VAR,
                "shared-password login enabled in a release build"
            );
            Ok(())
        }
        (BuildMode::Release, false) => Err(LoginConfigError::SharedPasswordNotAllowed),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(BuildMode::Debug, false, true)]
    #[case(BuildMode::Debug, true, true)]
    #[case(BuildMode::Release, true, true)]
    #[case(BuildMode::Release, false, false)]
    fn release_builds_need_an_explicit_opt_in(
        #[case] mode: BuildMode,
        #[case] allowed: bool,
        #[case] accepted: bool,
    ) {
        assert_eq!(check_shared_password_login(mode, allowed).is_ok(), accepted);
    }

    #[test]
    fn refusal_names_the_opt_in_setting() {
        let message = LoginConfigError::SharedPasswordNotAllowed.to_string();
        assert!(message.contains(ALLOW_SHARED_PASSWORD_VAR));
    }
}
