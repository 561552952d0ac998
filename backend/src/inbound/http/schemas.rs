//! Doc-only OpenAPI schemas.
//!
//! Domain types and the generic [`Envelope`](super::envelope::Envelope) do
//! not derive `ToSchema`. The wrappers below describe their wire shape for
//! the generated document and are never constructed.

use utoipa::ToSchema;

use crate::inbound::http::objectives_dto::{KeyResultResponse, ObjectiveResponse};
use crate::inbound::http::users::ActorResponse;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or violates a business rule.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A downstream dependency is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Failure envelope wrapping [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Always `false`.
    #[schema(example = false)]
    success: bool,
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "weight: weight must be between 1 and 100, got 0")]
    message: String,
    /// Field-level context such as `{ "field": "weight", "code": "out_of_range" }`.
    details: Option<serde_json::Value>,
    /// Correlation identifier echoed in the `Trace-Id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
}

/// Pagination metadata attached to list responses.
#[derive(ToSchema)]
#[schema(as = pagination::PageMeta, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageMetaSchema {
    #[schema(example = 41)]
    total: u64,
    #[schema(example = 1)]
    page: u32,
    #[schema(example = 20)]
    limit: u32,
    #[schema(example = 3)]
    total_pages: u64,
}

/// Success envelope around one objective.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ObjectiveEnvelopeSchema {
    #[schema(example = true)]
    success: bool,
    data: ObjectiveResponse,
    message: Option<String>,
}

/// Success envelope around one page of objectives.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ObjectivePageSchema {
    #[schema(example = true)]
    success: bool,
    data: Vec<ObjectiveResponse>,
    meta: PageMetaSchema,
}

/// Success envelope around one key result.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct KeyResultEnvelopeSchema {
    #[schema(example = true)]
    success: bool,
    data: KeyResultResponse,
    message: Option<String>,
}

/// Success envelope carrying the logged-in actor.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ActorEnvelopeSchema {
    #[schema(example = true)]
    success: bool,
    data: ActorResponse,
    message: Option<String>,
}

/// Success envelope with only a message, returned by deletions.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MessageEnvelopeSchema {
    #[schema(example = true)]
    success: bool,
    #[schema(example = "Objective deleted successfully")]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_uses_wire_field_names() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("traceId"));
        assert!(schema_json.contains("success"));
    }

    #[test]
    fn page_meta_schema_uses_camel_case() {
        let schema_json = schema_to_json::<PageMetaSchema>();
        assert!(schema_json.contains("totalPages"));
    }
}
