//! Key-result HTTP handlers.
//!
//! ```text
//! POST   /api/v1/objectives/{id}/key-results
//! PATCH  /api/v1/objectives/{id}/key-results/{krId}
//! DELETE /api/v1/objectives/{id}/key-results/{krId}
//! ```

use actix_web::{HttpResponse, delete, patch, post, web};
use serde::Deserialize;

use crate::domain::ports::{
    AddKeyResultRequest, DeleteKeyResultRequest, KeyResultChanges, UpdateKeyResultRequest,
};
use crate::domain::{Error, KeyResultId, ObjectiveId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::objectives_dto::{KeyResultBody, KeyResultResponse, UpdateKeyResultBody};
use crate::inbound::http::schemas::{ErrorSchema, KeyResultEnvelopeSchema, MessageEnvelopeSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, non_blank, parse_optional_enum};

/// Path parameters addressing one key result of one objective.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyResultPath {
    pub id: i64,
    pub kr_id: i64,
}

fn parse_key_result_changes(body: UpdateKeyResultBody) -> Result<KeyResultChanges, Error> {
    const TITLE: FieldName = FieldName::new("title");
    Ok(KeyResultChanges {
        title: body.title.map(|title| non_blank(title, TITLE)).transpose()?,
        target_value: body.target_value,
        current_value: body.current_value,
        unit: body.unit,
        status: parse_optional_enum(body.status, FieldName::new("status"))?,
    })
}

/// Add a key result to an objective.
#[utoipa::path(
    post,
    path = "/api/v1/objectives/{id}/key-results",
    params(("id" = i64, Path, description = "Objective id")),
    request_body = KeyResultBody,
    responses(
        (status = 201, description = "Key result added", body = KeyResultEnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Objective not found", body = ErrorSchema)
    ),
    tags = ["key-results"],
    operation_id = "addKeyResult"
)]
#[post("/objectives/{id}/key-results")]
pub async fn add_key_result(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<KeyResultBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let key_result = payload.into_inner().into_draft()?;
    let created = state
        .objectives
        .add_key_result(AddKeyResultRequest {
            actor,
            objective_id: ObjectiveId::new(path.into_inner()),
            key_result,
        })
        .await?;
    Ok(Envelope::data(KeyResultResponse::from(created))
        .with_message("Key result added successfully")
        .created())
}

/// Partially update a key result.
#[utoipa::path(
    patch,
    path = "/api/v1/objectives/{id}/key-results/{krId}",
    params(
        ("id" = i64, Path, description = "Objective id"),
        ("krId" = i64, Path, description = "Key result id")
    ),
    request_body = UpdateKeyResultBody,
    responses(
        (status = 200, description = "Key result updated", body = KeyResultEnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Objective or key result not found", body = ErrorSchema)
    ),
    tags = ["key-results"],
    operation_id = "updateKeyResult"
)]
#[patch("/objectives/{id}/key-results/{krId}")]
pub async fn update_key_result(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<KeyResultPath>,
    payload: web::Json<UpdateKeyResultBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let KeyResultPath { id, kr_id } = path.into_inner();
    let changes = parse_key_result_changes(payload.into_inner())?;
    let updated = state
        .objectives
        .update_key_result(UpdateKeyResultRequest {
            actor,
            objective_id: ObjectiveId::new(id),
            key_result_id: KeyResultId::new(kr_id),
            changes,
        })
        .await?;
    Ok(Envelope::data(KeyResultResponse::from(updated))
        .with_message("Key result updated successfully")
        .ok())
}

/// Delete a key result.
#[utoipa::path(
    delete,
    path = "/api/v1/objectives/{id}/key-results/{krId}",
    params(
        ("id" = i64, Path, description = "Objective id"),
        ("krId" = i64, Path, description = "Key result id")
    ),
    responses(
        (status = 200, description = "Key result deleted", body = MessageEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Objective or key result not found", body = ErrorSchema)
    ),
    tags = ["key-results"],
    operation_id = "deleteKeyResult"
)]
#[delete("/objectives/{id}/key-results/{krId}")]
pub async fn delete_key_result(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<KeyResultPath>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let KeyResultPath { id, kr_id } = path.into_inner();
    state
        .objectives
        .delete_key_result(DeleteKeyResultRequest {
            actor,
            objective_id: ObjectiveId::new(id),
            key_result_id: KeyResultId::new(kr_id),
        })
        .await?;
    Ok(Envelope::message("Key result deleted successfully").ok())
}
