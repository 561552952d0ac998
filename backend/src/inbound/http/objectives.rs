//! Objective HTTP handlers.
//!
//! ```text
//! POST   /api/v1/objectives
//! GET    /api/v1/objectives?employeeId=&status=&type=&reviewId=&page=&limit=
//! GET    /api/v1/objectives/team?status=&page=&limit=
//! GET    /api/v1/objectives/{id}
//! PATCH  /api/v1/objectives/{id}
//! PUT    /api/v1/objectives/{id}/progress
//! POST   /api/v1/objectives/{id}/review
//! DELETE /api/v1/objectives/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};

use crate::domain::ports::{
    CreateObjectiveRequest, DeleteObjectiveRequest, GetObjectiveRequest, LinkReviewRequest,
    ListObjectivesRequest, ListTeamObjectivesRequest, ObjectiveChanges, UpdateObjectiveRequest,
    UpdateProgressRequest,
};
use crate::domain::{Actor, EmployeeId, Error, ObjectiveId, ReviewId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::objectives_dto::{
    CreateObjectiveBody, LinkReviewBody, ListObjectivesQuery, ObjectiveResponse, ProgressBody,
    TeamObjectivesQuery, UpdateObjectiveBody,
};
use crate::inbound::http::schemas::{
    ErrorSchema, MessageEnvelopeSchema, ObjectiveEnvelopeSchema, ObjectivePageSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, non_blank, parse_date, parse_optional_date, parse_optional_enum, parse_page,
    parse_progress, parse_weight, require,
};

const TITLE: FieldName = FieldName::new("title");
const TYPE: FieldName = FieldName::new("type");
const METRIC_TYPE: FieldName = FieldName::new("metricType");
const STATUS: FieldName = FieldName::new("status");
const START_DATE: FieldName = FieldName::new("startDate");
const DUE_DATE: FieldName = FieldName::new("dueDate");

fn parse_create_request(
    actor: Actor,
    body: CreateObjectiveBody,
) -> Result<CreateObjectiveRequest, Error> {
    let employee_id = require(body.employee_id, FieldName::new("employeeId"))?;
    let title = non_blank(require(body.title, TITLE)?, TITLE)?;
    let start_date = parse_date(&require(body.start_date, START_DATE)?, START_DATE)?;
    let due_date = parse_date(&require(body.due_date, DUE_DATE)?, DUE_DATE)?;
    let key_results = body
        .key_results
        .into_iter()
        .map(|seed| seed.into_draft())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CreateObjectiveRequest {
        actor,
        employee_id: EmployeeId::new(employee_id),
        review_id: body.review_id.map(ReviewId::new),
        title,
        description: body.description,
        objective_type: parse_optional_enum(body.objective_type, TYPE)?,
        category: body.category,
        metric_type: parse_optional_enum(body.metric_type, METRIC_TYPE)?,
        target_value: body.target_value,
        current_value: body.current_value,
        weight: parse_weight(body.weight)?,
        start_date,
        due_date,
        key_results,
    })
}

fn parse_changes(body: UpdateObjectiveBody) -> Result<ObjectiveChanges, Error> {
    Ok(ObjectiveChanges {
        title: body.title.map(|title| non_blank(title, TITLE)).transpose()?,
        description: body.description,
        objective_type: parse_optional_enum(body.objective_type, TYPE)?,
        category: body.category,
        metric_type: parse_optional_enum(body.metric_type, METRIC_TYPE)?,
        target_value: body.target_value,
        current_value: body.current_value,
        weight: parse_weight(body.weight)?,
        start_date: parse_optional_date(body.start_date, START_DATE)?,
        due_date: parse_optional_date(body.due_date, DUE_DATE)?,
        status: parse_optional_enum(body.status, STATUS)?,
    })
}

fn parse_list_request(
    actor: Actor,
    query: ListObjectivesQuery,
) -> Result<ListObjectivesRequest, Error> {
    Ok(ListObjectivesRequest {
        actor,
        employee_id: query.employee_id.map(EmployeeId::new),
        status: parse_optional_enum(query.status, STATUS)?,
        objective_type: parse_optional_enum(query.objective_type, TYPE)?,
        review_id: query.review_id.map(ReviewId::new),
        page: parse_page(query.page, query.limit)?,
    })
}

/// Create an objective, optionally linked to a review and seeded with key
/// results.
#[utoipa::path(
    post,
    path = "/api/v1/objectives",
    request_body = CreateObjectiveBody,
    responses(
        (status = 201, description = "Objective created", body = ObjectiveEnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Owner or review not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["objectives"],
    operation_id = "createObjective"
)]
#[post("/objectives")]
pub async fn create_objective(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateObjectiveBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let request = parse_create_request(actor, payload.into_inner())?;
    let details = state.objectives.create(request).await?;
    Ok(Envelope::data(ObjectiveResponse::from(details))
        .with_message("Objective created successfully")
        .created())
}

/// List objectives visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/objectives",
    params(ListObjectivesQuery),
    responses(
        (status = 200, description = "Objectives page", body = ObjectivePageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Employee outside the caller's scope", body = ErrorSchema)
    ),
    tags = ["objectives"],
    operation_id = "listObjectives"
)]
#[get("/objectives")]
pub async fn list_objectives(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListObjectivesQuery>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let request = parse_list_request(actor, query.into_inner())?;
    let page = state.objectives_query.list(request).await?;
    Ok(Envelope::page(page.map(ObjectiveResponse::from)).ok())
}

/// List objectives owned by the caller's direct reportees.
#[utoipa::path(
    get,
    path = "/api/v1/objectives/team",
    params(TeamObjectivesQuery),
    responses(
        (status = 200, description = "Team objectives page", body = ObjectivePageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["objectives"],
    operation_id = "listTeamObjectives"
)]
#[get("/objectives/team")]
pub async fn list_team_objectives(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<TeamObjectivesQuery>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let TeamObjectivesQuery {
        status,
        page,
        limit,
    } = query.into_inner();
    let request = ListTeamObjectivesRequest {
        actor,
        status: parse_optional_enum(status, STATUS)?,
        page: parse_page(page, limit)?,
    };
    let page = state.objectives_query.list_team(request).await?;
    Ok(Envelope::page(page.map(ObjectiveResponse::from)).ok())
}

/// Fetch one objective with its owner and key results.
#[utoipa::path(
    get,
    path = "/api/v1/objectives/{id}",
    params(("id" = i64, Path, description = "Objective id")),
    responses(
        (status = 200, description = "Objective", body = ObjectiveEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["objectives"],
    operation_id = "getObjective"
)]
#[get("/objectives/{id}")]
pub async fn get_objective(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let details = state
        .objectives_query
        .get(GetObjectiveRequest {
            actor,
            objective_id: ObjectiveId::new(path.into_inner()),
        })
        .await?;
    Ok(Envelope::data(ObjectiveResponse::from(details)).ok())
}

/// Partially update an objective's general fields.
#[utoipa::path(
    patch,
    path = "/api/v1/objectives/{id}",
    params(("id" = i64, Path, description = "Objective id")),
    request_body = UpdateObjectiveBody,
    responses(
        (status = 200, description = "Objective updated", body = ObjectiveEnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["objectives"],
    operation_id = "updateObjective"
)]
#[patch("/objectives/{id}")]
pub async fn update_objective(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<UpdateObjectiveBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let changes = parse_changes(payload.into_inner())?;
    let details = state
        .objectives
        .update(UpdateObjectiveRequest {
            actor,
            objective_id: ObjectiveId::new(path.into_inner()),
            changes,
        })
        .await?;
    Ok(Envelope::data(ObjectiveResponse::from(details))
        .with_message("Objective updated successfully")
        .ok())
}

/// Report self or manager progress.
#[utoipa::path(
    put,
    path = "/api/v1/objectives/{id}/progress",
    params(("id" = i64, Path, description = "Objective id")),
    request_body = ProgressBody,
    responses(
        (status = 200, description = "Progress recorded", body = ObjectiveEnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["objectives"],
    operation_id = "updateObjectiveProgress"
)]
#[put("/objectives/{id}/progress")]
pub async fn update_progress(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<ProgressBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let ProgressBody {
        progress,
        comments,
        current_value,
        as_manager,
    } = payload.into_inner();
    let details = state
        .objectives
        .update_progress(UpdateProgressRequest {
            actor,
            objective_id: ObjectiveId::new(path.into_inner()),
            progress: parse_progress(progress)?,
            comments,
            current_value,
            as_manager,
        })
        .await?;
    Ok(Envelope::data(ObjectiveResponse::from(details))
        .with_message("Progress updated successfully")
        .ok())
}

/// Link an unlinked objective to a performance review.
#[utoipa::path(
    post,
    path = "/api/v1/objectives/{id}/review",
    params(("id" = i64, Path, description = "Objective id")),
    request_body = LinkReviewBody,
    responses(
        (status = 200, description = "Objective linked", body = ObjectiveEnvelopeSchema),
        (status = 400, description = "Already linked or employee mismatch", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Objective or review not found", body = ErrorSchema)
    ),
    tags = ["objectives"],
    operation_id = "linkObjectiveToReview"
)]
#[post("/objectives/{id}/review")]
pub async fn link_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<LinkReviewBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let review_id = require(payload.into_inner().review_id, FieldName::new("reviewId"))?;
    let details = state
        .objectives
        .link_review(LinkReviewRequest {
            actor,
            objective_id: ObjectiveId::new(path.into_inner()),
            review_id: ReviewId::new(review_id),
        })
        .await?;
    Ok(Envelope::data(ObjectiveResponse::from(details))
        .with_message("Objective linked to review")
        .ok())
}

/// Delete an objective and its key results.
#[utoipa::path(
    delete,
    path = "/api/v1/objectives/{id}",
    params(("id" = i64, Path, description = "Objective id")),
    responses(
        (status = 200, description = "Objective deleted", body = MessageEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["objectives"],
    operation_id = "deleteObjective"
)]
#[delete("/objectives/{id}")]
pub async fn delete_objective(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    state
        .objectives
        .delete(DeleteObjectiveRequest {
            actor,
            objective_id: ObjectiveId::new(path.into_inner()),
        })
        .await?;
    Ok(Envelope::message("Objective deleted successfully").ok())
}

#[cfg(test)]
#[path = "objectives_tests.rs"]
mod tests;
