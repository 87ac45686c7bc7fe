//! Store talking to the planner's JSON HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::CalendarStore;
use crate::error::{PlannerError, Result};
use crate::models::activity::{Activity, ActivityDraft, PlacedActivity, PlacementDetails, PlacementDraft};
use crate::models::event::{Event, EventDraft};
use crate::models::leave::{Leave, LeaveKind};
use crate::models::settings::Settings;
use crate::models::snapshot::YearSnapshot;
use crate::utils::date::format_date;

const REQUEST_TIMEOUT_SECS: u64 = 20;

/// Error payload returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Body of `POST /leaves`.
#[derive(Debug, Serialize)]
struct LeaveBody<'a> {
    date: &'a str,
    #[serde(rename = "type")]
    kind: LeaveKind,
}

pub struct HttpStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStore {
    /// `base_url` is the API root, e.g. `https://planner.example.com/api`.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| PlannerError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        log::warn!("API request failed with {}: {}", status, message);
        Err(status_error(status, message))
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| PlannerError::transport(format!("Malformed API response: {}", e)))
    }
}

/// Prefer the API's `{ "error": ... }` message, falling back to the status text.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

fn status_error(status: StatusCode, message: String) -> PlannerError {
    match status {
        StatusCode::NOT_FOUND => PlannerError::NotFound(message),
        StatusCode::BAD_REQUEST => PlannerError::Validation(message),
        _ => PlannerError::Transport(message),
    }
}

#[async_trait(?Send)]
impl CalendarStore for HttpStore {
    async fn fetch_year_snapshot(&self, year: i32) -> Result<YearSnapshot> {
        log::debug!("Fetching snapshot for {}", year);
        self.json(self.request(Method::GET, &format!("/init?year={}", year)))
            .await
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event> {
        draft.validate()?;
        self.json(self.request(Method::POST, "/events").json(&draft.normalized()))
            .await
    }

    async fn update_event(&self, id: i64, draft: &EventDraft) -> Result<Event> {
        self.json(
            self.request(Method::PUT, &format!("/events/{}", id))
                .json(&draft.normalized()),
        )
        .await
    }

    async fn delete_event(&self, id: i64) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/events/{}", id)))
            .await?;
        Ok(())
    }

    async fn create_activity(&self, draft: &ActivityDraft) -> Result<Activity> {
        draft.validate()?;
        self.json(self.request(Method::POST, "/activities").json(draft))
            .await
    }

    async fn update_activity(&self, id: &str, draft: &ActivityDraft) -> Result<Activity> {
        self.json(
            self.request(Method::PUT, &format!("/activities/{}", id))
                .json(draft),
        )
        .await
    }

    async fn delete_activity(&self, id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/activities/{}", id)))
            .await?;
        Ok(())
    }

    async fn create_placed_activity(&self, draft: &PlacementDraft) -> Result<PlacedActivity> {
        draft.validate()?;
        self.json(self.request(Method::POST, "/placed-activities").json(draft))
            .await
    }

    async fn update_placed_activity(&self, id: i64, details: &PlacementDetails) -> Result<PlacedActivity> {
        self.json(
            self.request(Method::PUT, &format!("/placed-activities/{}", id))
                .json(&details.normalized()),
        )
        .await
    }

    async fn delete_placed_activity(&self, id: i64) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/placed-activities/{}", id)))
            .await?;
        Ok(())
    }

    async fn upsert_leave(&self, date: NaiveDate, kind: LeaveKind) -> Result<Leave> {
        let date_str = format_date(date);
        let body = LeaveBody {
            date: &date_str,
            kind,
        };
        self.send(self.request(Method::POST, "/leaves").json(&body))
            .await?;
        Ok(Leave { date, kind })
    }

    async fn delete_leave(&self, date: NaiveDate) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/leaves/{}", format_date(date))))
            .await?;
        Ok(())
    }

    async fn update_settings(&self, settings: &Settings) -> Result<Settings> {
        settings.validate()?;
        self.json(self.request(Method::PUT, "/settings").json(settings))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpStore::new("https://planner.example.com/api/", None).unwrap();
        assert_eq!(store.url("/events/3"), "https://planner.example.com/api/events/3");
    }

    #[test_case(StatusCode::NOT_FOUND => matches PlannerError::NotFound(_) ; "not found")]
    #[test_case(StatusCode::BAD_REQUEST => matches PlannerError::Validation(_) ; "bad request")]
    #[test_case(StatusCode::UNAUTHORIZED => matches PlannerError::Transport(_) ; "unauthorized")]
    #[test_case(StatusCode::INTERNAL_SERVER_ERROR => matches PlannerError::Transport(_) ; "server error")]
    fn test_status_mapping(status: StatusCode) -> PlannerError {
        status_error(status, "boom".to_string())
    }

    #[test]
    fn test_error_message_prefers_body() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error":"date and type are required"}"#),
            "date and type are required"
        );
        assert_eq!(error_message(StatusCode::NOT_FOUND, "<html>"), "Not Found");
    }

    #[test]
    fn test_leave_body_uses_type_key() {
        let body = LeaveBody {
            date: "2024-03-01",
            kind: LeaveKind::Morning,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"date":"2024-03-01","type":"morning"}"#
        );
    }

    #[tokio::test]
    async fn test_invalid_draft_rejected_before_request() {
        let store = HttpStore::new("http://127.0.0.1:9", None).unwrap();
        let result = store.create_event(&EventDraft::default()).await;
        assert!(matches!(result, Err(PlannerError::Validation(_))));
    }
}
