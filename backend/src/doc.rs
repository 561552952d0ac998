//! OpenAPI document for the objective lifecycle API.
//!
//! Registers every handler under `inbound::http`, the doc-only schema
//! wrappers from [`crate::inbound::http::schemas`] and the session cookie
//! security scheme. Swagger UI serves it in debug builds; the
//! `openapi-dump` binary prints it for external tooling.

use crate::inbound::http::schemas::{
    ActorEnvelopeSchema, ErrorCodeSchema, ErrorSchema, KeyResultEnvelopeSchema,
    MessageEnvelopeSchema, ObjectiveEnvelopeSchema, ObjectivePageSchema, PageMetaSchema,
};
use crate::inbound::http::objectives_dto::{KeyResultResponse, ObjectiveResponse, OwnerResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SessionCookieScheme;

impl Modify for SessionCookieScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default)
            .add_security_scheme(
                "SessionCookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "session",
                    "Private session cookie issued by POST /api/v1/login.",
                ))),
            );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieScheme),
    info(
        title = "OKR backend API",
        description = "Objectives, key results and progress reporting for performance reviews."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::objectives::create_objective,
        crate::inbound::http::objectives::list_objectives,
        crate::inbound::http::objectives::list_team_objectives,
        crate::inbound::http::objectives::get_objective,
        crate::inbound::http::objectives::update_objective,
        crate::inbound::http::objectives::update_progress,
        crate::inbound::http::objectives::link_review,
        crate::inbound::http::objectives::delete_objective,
        crate::inbound::http::key_results::add_key_result,
        crate::inbound::http::key_results::update_key_result,
        crate::inbound::http::key_results::delete_key_result,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        PageMetaSchema,
        ObjectiveResponse,
        KeyResultResponse,
        OwnerResponse,
        ObjectiveEnvelopeSchema,
        ObjectivePageSchema,
        KeyResultEnvelopeSchema,
        MessageEnvelopeSchema,
        ActorEnvelopeSchema,
        crate::inbound::http::health::ProbeBody,
        crate::inbound::http::health::StorageBackend,
    )),
    tags(
        (name = "objectives", description = "Objective lifecycle and progress"),
        (name = "key-results", description = "Measurable results attached to objectives"),
        (name = "users", description = "Session login"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
