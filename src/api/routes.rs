//! API routes

use crate::api::handlers::{
    create_employee, delete_employee, get_employee, list_employees, search_employees,
    update_employee, AppState,
};
use crate::auth::handlers::{login, register};
use crate::auth::middleware::authenticate;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

/// Headroom on top of the file cap for text fields and part boundaries
const BODY_LIMIT_HEADROOM: u64 = 64 * 1024;

/// Build the API routes
pub fn build_api_routes(state: AppState) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/health", get(health_check));

    // The default body limit sits below the configured upload cap, so it
    // has to be raised or multipart bodies get rejected before the store
    // can apply its own size check
    let body_limit = (state.uploads.max_bytes() + BODY_LIMIT_HEADROOM) as usize;

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/api/employees", get(list_employees).post(create_employee))
        // static segment must be registered alongside the :id matcher
        .route("/api/employees/search", get(search_employees))
        .route(
            "/api/employees/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    public_routes.merge(protected_routes).with_state(state)
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{EmployeeRepository, UserRepository};
    use crate::db::DatabaseManager;
    use crate::uploads::UploadStore;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router() -> (Router, tempfile::TempDir) {
        test_router_with_upload_cap(1024 * 1024)
    }

    fn test_router_with_upload_cap(max_bytes: u64) -> (Router, tempfile::TempDir) {
        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        let upload_dir = tempfile::tempdir().unwrap();
        let uploads = Arc::new(UploadStore::new(upload_dir.path(), max_bytes).unwrap());

        let state = AppState {
            employee_repo: Arc::new(EmployeeRepository::new(db.clone())),
            user_repo: Arc::new(UserRepository::new(db)),
            uploads,
            jwt_secret: Arc::new("route-test-secret".to_string()),
            token_ttl_days: 7,
        };

        (build_api_routes(state), upload_dir)
    }

    async fn send_json(router: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(router, request).await
    }

    async fn send_authed(
        router: &Router,
        method: &str,
        uri: &str,
        token: &str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        send(router, request).await
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    const BOUNDARY: &str = "stafftestboundary";

    fn multipart_body(
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, name, value
                )
                .as_bytes(),
            );
        }
        if let Some((filename, content_type, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"profilePic\"; \
                     filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    BOUNDARY, filename, content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    async fn send_multipart(
        router: &Router,
        method: &str,
        uri: &str,
        token: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(fields, file)))
            .unwrap();
        send(router, request).await
    }

    async fn register_and_login(router: &Router) -> String {
        let (status, _) = send_json(
            router,
            "POST",
            "/api/auth/register",
            json!({"username": "admin", "email": "admin@example.com", "password": "secret123"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send_json(
            router,
            "POST",
            "/api/auth/login",
            json!({"email": "admin@example.com", "password": "secret123"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    const TEST_FIELDS: &[(&str, &str)] = &[
        ("name", "Test User"),
        ("email", "testuser@example.com"),
        ("phone", "1234567890"),
        ("employeeType", "Full-Time"),
    ];

    #[tokio::test]
    async fn test_health_is_public() {
        let (router, _dir) = test_router();
        let (status, body) = send(
            &router,
            Request::builder().uri("/api/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let (router, _dir) = test_router();
        let payload =
            json!({"username": "a", "email": "dup@example.com", "password": "pw"});

        let (status, _) = send_json(&router, "POST", "/api/auth/register", payload.clone()).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send_json(&router, "POST", "/api/auth/register", payload).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "ConflictError");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_register_missing_fields_is_400() {
        let (router, _dir) = test_router();
        let (status, body) = send_json(
            &router,
            "POST",
            "/api/auth/register",
            json!({"username": "a", "email": "", "password": "pw"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let (router, _dir) = test_router();
        let _token = register_and_login(&router).await;

        let (status, _) = send_json(
            &router,
            "POST",
            "/api/auth/login",
            json!({"email": "admin@example.com", "password": "wrong"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send_json(
            &router,
            "POST",
            "/api/auth/login",
            json!({"email": "nobody@example.com", "password": "secret123"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_response_excludes_password_hash() {
        let (router, _dir) = test_router();
        let _ = register_and_login(&router).await;

        let (_, body) = send_json(
            &router,
            "POST",
            "/api/auth/login",
            json!({"email": "admin@example.com", "password": "secret123"}),
        )
        .await;
        assert_eq!(body["user"]["username"], "admin");
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_employee_routes_require_token() {
        let (router, _dir) = test_router();

        let (status, body) = send(
            &router,
            Request::builder().uri("/api/employees").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "AuthError");

        let (status, _) = send_authed(&router, "GET", "/api/employees", "garbage.token").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_then_list_returns_single_equal_record() {
        let (router, _dir) = test_router();
        let token = register_and_login(&router).await;

        let (status, created) =
            send_multipart(&router, "POST", "/api/employees", &token, TEST_FIELDS, None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created["id"].is_string());
        assert!(created["profilePic"].is_null());
        assert_eq!(created["name"], "Test User");
        assert_eq!(created["email"], "testuser@example.com");
        assert_eq!(created["phone"], "1234567890");
        assert_eq!(created["employeeType"], "Full-Time");

        let (status, list) = send_authed(&router, "GET", "/api/employees", &token).await;
        assert_eq!(status, StatusCode::OK);
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0], created);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_is_conflict() {
        let (router, _dir) = test_router();
        let token = register_and_login(&router).await;

        let (status, _) =
            send_multipart(&router, "POST", "/api/employees", &token, TEST_FIELDS, None).await;
        assert_eq!(status, StatusCode::CREATED);

        let second: &[(&str, &str)] = &[
            ("name", "Other User"),
            ("email", "testuser@example.com"),
            ("phone", "5550001111"),
            ("employeeType", "Intern"),
        ];
        let (status, body) =
            send_multipart(&router, "POST", "/api/employees", &token, second, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "ConflictError");

        let (_, list) = send_authed(&router, "GET", "/api/employees", &token).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_creates_resolve_to_one_record() {
        let (router, _dir) = test_router();
        let token = register_and_login(&router).await;

        let ((status_a, _), (status_b, _)) = tokio::join!(
            send_multipart(&router, "POST", "/api/employees", &token, TEST_FIELDS, None),
            send_multipart(&router, "POST", "/api/employees", &token, TEST_FIELDS, None),
        );

        let mut statuses = [status_a, status_b];
        statuses.sort();
        assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);

        let (_, list) = send_authed(&router, "GET", "/api/employees", &token).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_missing_field_and_bad_type_are_400() {
        let (router, _dir) = test_router();
        let token = register_and_login(&router).await;

        let missing: &[(&str, &str)] = &[
            ("name", "No Phone"),
            ("email", "nophone@example.com"),
            ("employeeType", "Intern"),
        ];
        let (status, _) =
            send_multipart(&router, "POST", "/api/employees", &token, missing, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let bad_type: &[(&str, &str)] = &[
            ("name", "Bad Type"),
            ("email", "badtype@example.com"),
            ("phone", "123"),
            ("employeeType", "Freelancer"),
        ];
        let (status, body) =
            send_multipart(&router, "POST", "/api/employees", &token, bad_type, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");
    }

    #[tokio::test]
    async fn test_create_with_picture_stores_file() {
        let (router, upload_dir) = test_router();
        let token = register_and_login(&router).await;

        let (status, created) = send_multipart(
            &router,
            "POST",
            "/api/employees",
            &token,
            TEST_FIELDS,
            Some(("avatar.png", "image/png", b"fake png bytes")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let pic = created["profilePic"].as_str().unwrap();
        assert!(pic.starts_with("/uploads/"));
        assert!(pic.ends_with(".png"));

        let on_disk = upload_dir.path().join(pic.strip_prefix("/uploads/").unwrap());
        assert_eq!(std::fs::read(on_disk).unwrap(), b"fake png bytes");
    }

    #[tokio::test]
    async fn test_create_accepts_picture_up_to_configured_cap() {
        // 3 MiB sits above axum's stock body limit but under the 5 MiB cap
        let (router, upload_dir) = test_router_with_upload_cap(5 * 1024 * 1024);
        let token = register_and_login(&router).await;

        let data = vec![0xAB_u8; 3 * 1024 * 1024];
        let (status, created) = send_multipart(
            &router,
            "POST",
            "/api/employees",
            &token,
            TEST_FIELDS,
            Some(("large.png", "image/png", &data)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let pic = created["profilePic"].as_str().unwrap();
        let on_disk = upload_dir.path().join(pic.strip_prefix("/uploads/").unwrap());
        assert_eq!(std::fs::metadata(on_disk).unwrap().len(), data.len() as u64);
    }

    #[tokio::test]
    async fn test_create_rejects_picture_over_configured_cap() {
        let (router, _dir) = test_router_with_upload_cap(1024);
        let token = register_and_login(&router).await;

        let data = vec![0xAB_u8; 2048];
        let (status, body) = send_multipart(
            &router,
            "POST",
            "/api/employees",
            &token,
            TEST_FIELDS,
            Some(("big.png", "image/png", &data)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_404() {
        let (router, _dir) = test_router();
        let token = register_and_login(&router).await;

        let (status, body) =
            send_authed(&router, "GET", "/api/employees/no-such-id", &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NotFoundError");
    }

    #[tokio::test]
    async fn test_update_only_phone_leaves_other_fields() {
        let (router, _dir) = test_router();
        let token = register_and_login(&router).await;

        let (_, created) =
            send_multipart(&router, "POST", "/api/employees", &token, TEST_FIELDS, None).await;
        let id = created["id"].as_str().unwrap();

        let patch: &[(&str, &str)] = &[("phone", "0987654321")];
        let (status, updated) = send_multipart(
            &router,
            "PUT",
            &format!("/api/employees/{}", id),
            &token,
            patch,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["phone"], "0987654321");
        assert_eq!(updated["name"], created["name"]);
        assert_eq!(updated["email"], created["email"]);
        assert_eq!(updated["employeeType"], created["employeeType"]);
        assert_eq!(updated["profilePic"], created["profilePic"]);
        assert_eq!(updated["createdAt"], created["createdAt"]);
    }

    #[tokio::test]
    async fn test_update_replaces_picture_and_omission_keeps_it() {
        let (router, _dir) = test_router();
        let token = register_and_login(&router).await;

        let (_, created) = send_multipart(
            &router,
            "POST",
            "/api/employees",
            &token,
            TEST_FIELDS,
            Some(("first.png", "image/png", b"first")),
        )
        .await;
        let id = created["id"].as_str().unwrap();
        let first_pic = created["profilePic"].as_str().unwrap().to_string();

        // update without a file keeps the picture
        let (_, updated) = send_multipart(
            &router,
            "PUT",
            &format!("/api/employees/{}", id),
            &token,
            &[("name", "Renamed")],
            None,
        )
        .await;
        assert_eq!(updated["profilePic"].as_str().unwrap(), first_pic);

        // a new file replaces it
        let (_, updated) = send_multipart(
            &router,
            "PUT",
            &format!("/api/employees/{}", id),
            &token,
            &[],
            Some(("second.jpg", "image/jpeg", b"second")),
        )
        .await;
        let second_pic = updated["profilePic"].as_str().unwrap();
        assert_ne!(second_pic, first_pic);
        assert!(second_pic.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_404() {
        let (router, _dir) = test_router();
        let token = register_and_login(&router).await;

        let (status, _) = send_multipart(
            &router,
            "PUT",
            "/api/employees/no-such-id",
            &token,
            &[("phone", "123")],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_404() {
        let (router, _dir) = test_router();
        let token = register_and_login(&router).await;

        let (_, created) =
            send_multipart(&router, "POST", "/api/employees", &token, TEST_FIELDS, None).await;
        let id = created["id"].as_str().unwrap();

        let (status, body) =
            send_authed(&router, "DELETE", &format!("/api/employees/{}", id), &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Employee deleted");

        let (status, _) =
            send_authed(&router, "GET", &format!("/api/employees/{}", id), &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            send_authed(&router, "DELETE", &format!("/api/employees/{}", id), &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_validates_and_matches_substring() {
        let (router, _dir) = test_router();
        let token = register_and_login(&router).await;

        send_multipart(&router, "POST", "/api/employees", &token, TEST_FIELDS, None).await;
        let other: &[(&str, &str)] = &[
            ("name", "Someone Else"),
            ("email", "someone@other.org"),
            ("phone", "222"),
            ("employeeType", "Contractor"),
        ];
        send_multipart(&router, "POST", "/api/employees", &token, other, None).await;

        let (status, body) =
            send_authed(&router, "GET", "/api/employees/search?q=", &token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");

        let (status, body) = send_authed(
            &router,
            "GET",
            "/api/employees/search?q=testuser%40example.com",
            &token,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let matches = body.as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["email"], "testuser@example.com");

        // case-insensitive against name
        let (_, body) = send_authed(&router, "GET", "/api/employees/search?q=TEST", &token).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_email_is_normalized_to_lowercase() {
        let (router, _dir) = test_router();
        let token = register_and_login(&router).await;

        let mixed: &[(&str, &str)] = &[
            ("name", "Mixed Case"),
            ("email", "Mixed.Case@Example.COM"),
            ("phone", "333"),
            ("employeeType", "Part-Time"),
        ];
        let (status, created) =
            send_multipart(&router, "POST", "/api/employees", &token, mixed, None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["email"], "mixed.case@example.com");
    }
}
