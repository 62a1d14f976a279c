//! Enrollment endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::extractors::EnrollPayload;
use crate::http::server::AppState;
use crate::models::Enrollment;

/// GET /enrollments - every enrollment
async fn list_enrollments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Enrollment>>, ApiError> {
    let enrollments = state
        .store
        .list_all()
        .await
        .map_err(|e| ApiError::storage_with_details("Failed to fetch enrollments", e))?;

    Ok(Json(enrollments))
}

/// GET /enrollments/student/{student_id} - enrollments for one student
async fn list_for_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<Enrollment>>, ApiError> {
    let enrollments = state
        .store
        .list_by_student(&student_id)
        .await
        .map_err(|e| ApiError::storage("Query failed", e))?;

    Ok(Json(enrollments))
}

/// POST /enroll - validate and store a new enrollment
async fn enroll(
    State(state): State<Arc<AppState>>,
    EnrollPayload(new): EnrollPayload,
) -> Result<(StatusCode, Json<Enrollment>), ApiError> {
    let enrollment = state.workflow.enroll(new).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// Enrollment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/enrollments", get(list_enrollments))
        .route("/enrollments/student/{student_id}", get(list_for_student))
        .route("/enroll", post(enroll))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::db::{EnrollmentStore, MemoryStore};
    use crate::models::StudentId;
    use crate::validation::{LookupTargets, MockValidator};

    struct Harness {
        store: Arc<MemoryStore>,
        validator: Arc<MockValidator>,
        app: Router,
    }

    fn harness(validator: MockValidator) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let validator = Arc::new(validator);
        let state = AppState::new(
            store.clone(),
            validator.clone(),
            LookupTargets::new("http://students", "http://courses"),
        );
        Harness {
            store,
            validator,
            app: router().with_state(Arc::new(state)),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_enroll(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/enroll")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn enroll_then_query_by_student() {
        let h = harness(MockValidator::new(true));

        let (status, body) = send(&h.app, post_enroll(r#"{"student_id":"S1","course_id":10}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"id": 1, "student_id": "S1", "course_id": 10}));

        let (status, body) = send(&h.app, post_enroll(r#"{"student_id":"S1","course_id":10}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 2);

        let (status, body) = send(&h.app, get("/enrollments/student/S1")).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = body.as_array().unwrap().iter().map(|e| e["id"].clone()).collect();
        assert_eq!(ids, [json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn invalid_student_never_checks_course() {
        let validator = MockValidator::new(true);
        validator.answer("http://students/students/S404", false);
        let h = harness(validator);

        let (status, body) =
            send(&h.app, post_enroll(r#"{"student_id":"S404","course_id":10}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid student ID"}));
        assert_eq!(h.validator.calls_matching("/courses/"), 0);
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn invalid_course_rejected() {
        let validator = MockValidator::new(true);
        validator.answer("http://courses/courses/77", false);
        let h = harness(validator);

        let (status, body) = send(&h.app, post_enroll(r#"{"student_id":"S1","course_id":77}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid course ID"}));
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_makes_no_lookups() {
        let h = harness(MockValidator::new(true));

        for body in [
            r#"{"course_id":10}"#,
            r#"{"student_id":"S1","course_id":"abc"}"#,
            r#"{"student_id":"","course_id":10}"#,
            "garbage",
        ] {
            let (status, json_body) = send(&h.app, post_enroll(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
            assert_eq!(json_body, json!({"error": "Invalid payload"}));
        }
        assert!(h.validator.calls().is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_is_500_with_details() {
        let h = harness(MockValidator::new(true));
        h.store.set_unavailable(true);

        let (status, body) = send(&h.app, post_enroll(r#"{"student_id":"S1","course_id":10}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to enroll");
        assert!(body["details"].as_str().unwrap().contains("offline"));
    }

    #[tokio::test]
    async fn list_empty_is_array() {
        let h = harness(MockValidator::new(true));

        let (status, body) = send(&h.app, get("/enrollments")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = send(&h.app, get("/enrollments/student/nobody")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn list_by_student_returns_exact_subset() {
        let h = harness(MockValidator::new(true));
        for (student, course) in [("S1", 1), ("S2", 2), ("S1", 3), ("s1", 4)] {
            h.store
                .insert(&StudentId::new(student).unwrap(), course)
                .await
                .unwrap();
        }

        let (_, all) = send(&h.app, get("/enrollments")).await;
        assert_eq!(all.as_array().unwrap().len(), 4);

        let (_, body) = send(&h.app, get("/enrollments/student/S1")).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|e| e["student_id"] == "S1"));
    }

    #[tokio::test]
    async fn list_failures_are_500() {
        let h = harness(MockValidator::new(true));
        h.store.set_unavailable(true);

        let (status, body) = send(&h.app, get("/enrollments")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch enrollments");
        assert!(body["details"].is_string());

        let (status, body) = send(&h.app, get("/enrollments/student/S1")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Query failed"}));
    }
}
