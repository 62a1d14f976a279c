//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};

use super::error::ApiError;
use crate::models::{EnrollRequest, NewEnrollment};

/// Extract and validate a `POST /enroll` body.
///
/// The body is parsed as JSON whatever the declared content type. Any
/// failure, from unreadable bytes to an empty student id, is reported
/// as `ApiError::InvalidPayload`.
pub struct EnrollPayload(pub NewEnrollment);

impl<S> FromRequest<S> for EnrollPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Unreadable enroll body: {}", e);
            ApiError::InvalidPayload
        })?;

        let raw: EnrollRequest = serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!("Malformed enroll body: {}", e);
            ApiError::InvalidPayload
        })?;

        Ok(Self(NewEnrollment::try_from(raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    async fn extract(body: &'static str) -> Result<NewEnrollment, ApiError> {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/enroll")
            .body(Body::from(body))
            .unwrap();
        EnrollPayload::from_request(req, &()).await.map(|p| p.0)
    }

    #[tokio::test]
    async fn accepts_without_content_type() {
        let new = extract(r#"{"student_id":"S1","course_id":10}"#).await.unwrap();
        assert_eq!(new.student_id.as_str(), "S1");
        assert_eq!(new.course_id, 10);
    }

    #[tokio::test]
    async fn rejects_malformed_bodies() {
        for body in [
            "",
            "not json",
            "[]",
            r#"{"course_id":10}"#,
            r#"{"student_id":"S1"}"#,
            r#"{"student_id":"S1","course_id":"10"}"#,
            r#"{"student_id":"S1","course_id":1.5}"#,
            r#"{"student_id":7,"course_id":10}"#,
            r#"{"student_id":"","course_id":10}"#,
        ] {
            assert!(
                matches!(extract(body).await, Err(ApiError::InvalidPayload)),
                "{:?} should be rejected",
                body
            );
        }
    }
}
