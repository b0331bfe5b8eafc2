use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::livez,
        students::{create_student, get_student, list_students, remove_student, update_student},
    },
    middleware::basic_auth,
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Student routes, all behind basic auth. `route_layer` keeps unknown
    // paths a plain 404 instead of a 401.
    let student_routes = Router::new()
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/{id}",
            get(get_student)
                .patch(update_student)
                .delete(remove_student),
        )
        .route_layer(middleware::from_fn_with_state(
            state.credentials.clone(),
            basic_auth,
        ))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .merge(student_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use roster_core::auth::encode_basic_authorization;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::state::tests::{test_credentials, test_state, TEST_PASSWORD, TEST_USERNAME};
    use crate::students::tests::CountingRepository;

    fn authorization() -> String {
        encode_basic_authorization(TEST_USERNAME, TEST_PASSWORD)
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, authorization());

        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn alice() -> Value {
        json!({
            "name": "Alice Johnson",
            "email": "alice@example.com",
            "course": "Mathematics",
            "gender": "Female"
        })
    }

    #[tokio::test]
    async fn test_missing_credentials_is_unauthorized() {
        let app = create_app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/students")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let app = create_app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/students/1")
                    .header(
                        header::AUTHORIZATION,
                        encode_basic_authorization(TEST_USERNAME, "wrong"),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_livez_needs_no_credentials() {
        let app = create_app(test_state());

        let response = app
            .oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let app = create_app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/teachers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_empty_is_no_content() {
        let app = create_app(test_state());

        let response = app.oneshot(request("GET", "/students", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_student() {
        let app = create_app(test_state());

        let response = app
            .oneshot(request("GET", "/students/42", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({
                "data": null,
                "isSuccess": false,
                "message": "Student with Id 42 not found!"
            })
        );
    }

    #[tokio::test]
    async fn test_create_validation_problem() {
        let app = create_app(test_state());

        let response = app
            .oneshot(request(
                "POST",
                "/students",
                Some(json!({
                    "name": "",
                    "email": "not-an-email",
                    "course": "Mathematics",
                    "gender": "Robot"
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["title"], "One or more validation errors occurred.");
        assert_eq!(body["status"], 400);
        assert!(body["errors"]["name"].is_array());
        assert!(body["errors"]["email"].is_array());
        assert!(body["errors"]["gender"].is_array());
        assert!(body["errors"].get("course").is_none());
    }

    #[tokio::test]
    async fn test_null_field_is_a_validation_problem() {
        let app = create_app(test_state());

        let response = app
            .oneshot(request(
                "POST",
                "/students",
                Some(json!({
                    "name": null,
                    "email": "a@example.com",
                    "course": "Math",
                    "gender": "Male"
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(
            body["errors"],
            json!({ "name": ["Student Name is a required field!"] })
        );
    }

    #[tokio::test]
    async fn test_invalid_body_never_reaches_the_repository() {
        let repo = Arc::new(CountingRepository::default());
        let state = AppState::from_repository(repo.clone(), test_credentials()).unwrap();
        let app = create_app(state);
        let invalid = json!({ "name": "A", "email": "nope", "course": "", "gender": "Robot" });

        let response = app
            .clone()
            .oneshot(request("POST", "/students", Some(invalid.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(request("PATCH", "/students/1", Some(invalid)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 0);
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(repo.mutations(), 0);
    }

    #[tokio::test]
    async fn test_create_malformed_json() {
        let app = create_app(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/students")
                    .header(header::AUTHORIZATION, authorization())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"name\": "))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_and_remove_missing_student_are_bad_requests() {
        let app = create_app(test_state());

        let response = app
            .clone()
            .oneshot(request("PATCH", "/students/7", Some(alice())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["isSuccess"], false);
        assert_eq!(body["message"], "Student with Id 7 not found!");

        let response = app
            .oneshot(request("DELETE", "/students/7", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_student_lifecycle() {
        let app = create_app(test_state());

        // Create
        let response = app
            .clone()
            .oneshot(request("POST", "/students", Some(alice())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "data": true, "isSuccess": true, "message": "" })
        );

        // List
        let response = app
            .clone()
            .oneshot(request("GET", "/students", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let students = body["data"].as_array().unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0]["name"], "Alice Johnson");
        let id = students[0]["id"].as_i64().unwrap();

        // Get
        let response = app
            .clone()
            .oneshot(request("GET", &format!("/students/{id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["email"], "alice@example.com");
        assert_eq!(body["data"]["gender"], "Female");

        // Update
        let mut changed = alice();
        changed["course"] = json!("Physics");
        let response = app
            .clone()
            .oneshot(request("PATCH", &format!("/students/{id}"), Some(changed)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"], true);

        let response = app
            .clone()
            .oneshot(request("GET", &format!("/students/{id}"), None))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["data"]["course"], "Physics");

        // Remove
        let response = app
            .clone()
            .oneshot(request("DELETE", &format!("/students/{id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"], true);

        let response = app
            .oneshot(request("GET", &format!("/students/{id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
