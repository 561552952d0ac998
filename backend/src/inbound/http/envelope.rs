//! Uniform JSON response envelope.
//!
//! Successful responses are wrapped as `{ success, data?, message?, meta? }`;
//! list endpoints attach [`PageMeta`] under `meta`.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use pagination::{PageMeta, Paginated};
use serde::Serialize;

/// Response body shared by every successful endpoint.
///
/// # Examples
///
/// ```
/// use okr_backend::inbound::http::envelope::Envelope;
///
/// let body = serde_json::to_value(Envelope::data(7)).expect("serialise envelope");
/// assert_eq!(body, serde_json::json!({ "success": true, "data": 7 }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<PageMeta>,
}

impl<T> Envelope<T> {
    /// Wrap a payload.
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: None,
        }
    }

    /// Attach a human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<()> {
    /// Body carrying only a message, used by deletions.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            meta: None,
        }
    }
}

impl<T> Envelope<Vec<T>> {
    /// Wrap one page of items with its metadata.
    pub fn page(page: Paginated<T>) -> Self {
        Self {
            success: true,
            data: Some(page.items),
            message: None,
            meta: Some(page.meta),
        }
    }
}

impl<T: Serialize> Envelope<T> {
    /// Render with `200 OK`.
    #[must_use]
    pub fn ok(self) -> HttpResponse {
        self.respond(StatusCode::OK)
    }

    /// Render with `201 Created`.
    #[must_use]
    pub fn created(self) -> HttpResponse {
        self.respond(StatusCode::CREATED)
    }

    fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagination::PageRequest;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn message_only_body_omits_data() {
        let body = serde_json::to_value(Envelope::message("Objective deleted")).expect("json");
        assert_eq!(
            body,
            json!({ "success": true, "message": "Objective deleted" })
        );
    }

    #[rstest]
    fn pages_carry_camel_case_meta() {
        let request = PageRequest::new(Some(2), Some(2)).expect("page request");
        let body = serde_json::to_value(Envelope::page(Paginated::new(vec![3, 4], request, 5)))
            .expect("json");
        assert_eq!(
            body,
            json!({
                "success": true,
                "data": [3, 4],
                "meta": { "total": 5, "page": 2, "limit": 2, "totalPages": 3 }
            })
        );
    }

    #[rstest]
    fn created_sets_status() {
        let response = Envelope::data("x").with_message("Objective created").created();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
