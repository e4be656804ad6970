use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use studyhub::config::Config;
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@studyhub.com";
const ADMIN_PASSWORD: &str = "admin123";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let state = studyhub::api::create_app_state(config)
        .await
        .expect("Failed to create app state");
    studyhub::api::router(state)
}

/// Logs in with the default admin credentials and returns the session
/// cookie to attach to subsequent requests.
async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/login",
            serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Login response missing session cookie")
        .to_str()
        .unwrap();

    cookie.split(';').next().unwrap().to_string()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, payload: serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    request_json("POST", uri, payload, cookie)
}

fn put_json(uri: &str, payload: serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    request_json("PUT", uri, payload, cookie)
}

fn request_json(
    method: &str,
    uri: &str,
    payload: serde_json::Value,
    cookie: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_string(&payload).unwrap()))
        .unwrap()
}

fn delete(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_admin_routes_require_session() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/categories", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/categories",
            serde_json::json!({ "name": "Physics", "description": "..." }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(delete("/api/questions/1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = app
        .clone()
        .oneshot(put_json(
            "/api/categories/1",
            serde_json::json!({ "name": "Renamed" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(body.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(body).await;
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn test_login_validation_and_failure() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/api/login", serde_json::json!({}), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Email and password are required");

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/login",
            serde_json::json!({ "email": ADMIN_EMAIL, "password": "nope" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid credentials");

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/login",
            serde_json::json!({ "email": "other@studyhub.com", "password": ADMIN_PASSWORD }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/auth/check", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["isAuthenticated"], false);

    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(get("/api/auth/check", Some(&cookie)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["isAuthenticated"], true);
    assert_eq!(body["user"]["email"], ADMIN_EMAIL);

    let response = app
        .clone()
        .oneshot(post_json("/api/logout", serde_json::json!({}), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Logout successful");

    let response = app
        .clone()
        .oneshot(get("/api/auth/check", Some(&cookie)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["isAuthenticated"], false);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/categories",
            serde_json::json!({ "name": "Physics", "description": "..." }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_default_categories_seeded() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/categories", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let categories = body.as_array().expect("Expected a category array");
    assert_eq!(categories.len(), 4);

    let names: Vec<&str> = categories
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["History", "Literature", "Mathematics", "Science"]);

    let science = &categories[3];
    assert!(science["id"].is_i64());
    assert!(science["description"].is_string());
    assert_eq!(science["icon"], "microscope");
    assert!(science["createdAt"].is_string());
}

#[tokio::test]
async fn test_category_crud() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    // Icon and color fall back to defaults when omitted
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/categories",
            serde_json::json!({ "name": "Physics", "description": "Mechanics and fields" }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["name"], "Physics");
    assert_eq!(created["icon"], "folder");
    assert_eq!(created["color"], "blue");
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/api/categories/{id}"),
            serde_json::json!({ "color": "red" }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["color"], "red");
    assert_eq!(updated["name"], "Physics");

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/categories/9999",
            serde_json::json!({ "color": "red" }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/categories/{id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/categories/{id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_delete_blocked_by_questions() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/categories",
            serde_json::json!({ "name": "Physics", "description": "..." }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let category = body_json(response).await;
    let category_id = category["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/questions",
            serde_json::json!({
                "title": "What is inertia?",
                "content": "Define inertia.",
                "answer": "Resistance to change in motion.",
                "categoryId": category_id
            }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let question = body_json(response).await;
    let question_id = question["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/categories/{category_id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Cannot delete category with existing questions");

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/questions/{question_id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/categories/{category_id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_question_detail_counts_views() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let categories = body_json(
        app.clone()
            .oneshot(get("/api/categories", None))
            .await
            .unwrap(),
    )
    .await;
    let category_id = categories[0]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/questions",
            serde_json::json!({
                "title": "When did WW2 end?",
                "content": "Give the year.",
                "answer": "1945",
                "categoryId": category_id
            }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["views"], 0);
    let id = created["id"].as_i64().unwrap();

    // Detail responses return the snapshot taken before the increment
    let response = app
        .clone()
        .oneshot(get(&format!("/api/questions/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["views"], 0);
    assert_eq!(first["category"]["id"], category_id);

    let second = body_json(
        app.clone()
            .oneshot(get(&format!("/api/questions/{id}"), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(second["views"], 1);

    let stats = body_json(app.clone().oneshot(get("/api/stats", None)).await.unwrap()).await;
    assert_eq!(stats["totalQuestions"], 1);
    assert_eq!(stats["totalCategories"], 4);
    assert_eq!(stats["totalViews"], 2);

    let response = app
        .clone()
        .oneshot(get("/api/questions/9999", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_question_update_and_delete() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let categories = body_json(
        app.clone()
            .oneshot(get("/api/categories", None))
            .await
            .unwrap(),
    )
    .await;
    let category_id = categories[0]["id"].as_i64().unwrap();

    let created = body_json(
        app.clone()
            .oneshot(post_json(
                "/api/questions",
                serde_json::json!({
                    "title": "Original title",
                    "content": "Original content",
                    "answer": "Original answer",
                    "categoryId": category_id
                }),
                Some(&cookie),
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // Partial update leaves untouched fields alone
    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/api/questions/{id}"),
            serde_json::json!({ "answer": "Revised answer" }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["answer"], "Revised answer");
    assert_eq!(updated["title"], "Original title");
    assert_eq!(updated["categoryId"], category_id);

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/questions/9999",
            serde_json::json!({ "answer": "x" }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/questions/{id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/questions/{id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_question_filters() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    let categories = body_json(
        app.clone()
            .oneshot(get("/api/categories", None))
            .await
            .unwrap(),
    )
    .await;
    let history_id = categories[0]["id"].as_i64().unwrap();
    let science_id = categories[3]["id"].as_i64().unwrap();

    for (title, content, answer, category_id) in [
        ("Photosynthesis", "What do plants produce?", "Oxygen and glucose", science_id),
        ("French Revolution", "When did it begin?", "1789", history_id),
    ] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/questions",
                serde_json::json!({
                    "title": title,
                    "content": content,
                    "answer": answer,
                    "categoryId": category_id
                }),
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let all = body_json(app.clone().oneshot(get("/api/questions", None)).await.unwrap()).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let filtered = body_json(
        app.clone()
            .oneshot(get(&format!("/api/questions?category={science_id}"), None))
            .await
            .unwrap(),
    )
    .await;
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["title"], "Photosynthesis");
    assert_eq!(filtered[0]["category"]["name"], "Science");

    // Case-insensitive match across title, content, and answer
    let searched = body_json(
        app.clone()
            .oneshot(get("/api/questions?search=REVOLUTION", None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(searched.as_array().unwrap().len(), 1);
    assert_eq!(searched[0]["title"], "French Revolution");

    let by_answer = body_json(
        app.clone()
            .oneshot(get("/api/questions?search=glucose", None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(by_answer.as_array().unwrap().len(), 1);

    // Search wins when both parameters are present
    let both = body_json(
        app.clone()
            .oneshot(get(
                &format!("/api/questions?category={science_id}&search=1789"),
                None,
            ))
            .await
            .unwrap(),
    )
    .await;
    let both = both.as_array().unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0]["title"], "French Revolution");

    // Empty parameters behave as absent
    let empty = body_json(
        app.clone()
            .oneshot(get("/api/questions?category=&search=", None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(empty.as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get("/api/questions?category=abc", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_payloads_return_400() {
    let app = spawn_app().await;
    let cookie = login(&app).await;

    // Missing required fields
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/questions",
            serde_json::json!({ "title": "No body" }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().starts_with("Invalid question data"));

    // Wrong field type
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/questions",
            serde_json::json!({
                "title": "x",
                "content": "y",
                "answer": "z",
                "categoryId": "not-a-number"
            }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/categories",
            serde_json::json!({ "description": "name missing" }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get("/api/questions/0", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
