//! Shared shape of driven-port failures.
//!
//! Every storage-backed port fails in one of two ways: the backend could not
//! be reached, or a statement it accepted went wrong. The macro generates the
//! error enum, `impl Into<String>` constructors, and the conversion onto the
//! transport-agnostic [`crate::domain::Error`].

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident for $subject:literal;
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            /// The backing store could not be reached.
            #[error("{subject} connection failed: {message}", subject = $subject)]
            Connection { message: String },
            /// A read or write failed during execution.
            #[error("{subject} query failed: {message}", subject = $subject)]
            Query { message: String },
        }

        impl $name {
            /// Build a [`Self::Connection`] failure.
            pub fn connection(message: impl Into<String>) -> Self {
                Self::Connection {
                    message: message.into(),
                }
            }

            /// Build a [`Self::Query`] failure.
            pub fn query(message: impl Into<String>) -> Self {
                Self::Query {
                    message: message.into(),
                }
            }
        }

        impl From<$name> for $crate::domain::Error {
            fn from(error: $name) -> Self {
                match error {
                    $name::Connection { message } => $crate::domain::Error::service_unavailable(
                        format!("{} unavailable: {message}", $subject),
                    ),
                    $name::Query { message } => $crate::domain::Error::internal(format!(
                        "{} error: {message}",
                        $subject
                    )),
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use crate::domain::{Error, ErrorCode};

    define_port_error! {
        pub enum LedgerError for "ledger";
    }

    #[test]
    fn constructors_accept_borrowed_messages() {
        assert_eq!(
            LedgerError::query("bad row").to_string(),
            "ledger query failed: bad row"
        );
        assert_eq!(
            LedgerError::connection(String::from("refused")).to_string(),
            "ledger connection failed: refused"
        );
    }

    #[test]
    fn connection_failures_surface_as_unavailable() {
        let error = Error::from(LedgerError::connection("refused"));
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(error.message(), "ledger unavailable: refused");
    }

    #[test]
    fn query_failures_surface_as_internal() {
        let error = Error::from(LedgerError::query("bad row"));
        assert_eq!(error.code(), ErrorCode::InternalError);
        assert_eq!(error.message(), "ledger error: bad row");
    }
}
