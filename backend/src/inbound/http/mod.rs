//! HTTP inbound adapter exposing the objective REST endpoints.
//!
//! Handlers parse and validate wire payloads, resolve the caller from the
//! session and delegate to the driving ports held in [`state::HttpState`].

pub mod envelope;
pub mod error;
pub mod health;
pub mod key_results;
pub mod login_config;
pub mod objectives;
pub mod objectives_dto;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use crate::domain::ApiResult;
pub use error::{json_config, query_config};

/// Register the `/api/v1` handlers and extractor configuration on a scope.
///
/// `/objectives/team` is registered ahead of `/objectives/{id}` so the
/// literal segment wins.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(users::login)
        .service(objectives::create_objective)
        .service(objectives::list_objectives)
        .service(objectives::list_team_objectives)
        .service(objectives::get_objective)
        .service(objectives::update_objective)
        .service(objectives::update_progress)
        .service(objectives::link_review)
        .service(objectives::delete_objective)
        .service(key_results::add_key_result)
        .service(key_results::update_key_result)
        .service(key_results::delete_key_result);
}
