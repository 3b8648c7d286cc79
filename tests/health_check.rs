mod common;

use common::spawn_app;

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/healthy"))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "status": "healthy" }));
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/healthy")).send().await.unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["referrer-policy"], "no-referrer");
}

#[tokio::test]
async fn rejected_requests_carry_security_headers() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/todos")).send().await.unwrap();

    assert_eq!(401, response.status().as_u16());
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["referrer-policy"], "no-referrer");
}

#[tokio::test]
async fn index_page_is_served() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/")).send().await.unwrap();

    assert_eq!(200, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(body.contains("<html"));
}

#[tokio::test]
async fn web_client_covers_every_screen() {
    let app = spawn_app().await;

    let page = app.client.get(app.url("/")).send().await.unwrap().text().await.unwrap();
    for id in ["login-form", "register-form", "todo-form", "password-form", "phone-form", "admin-view"] {
        assert!(page.contains(&format!("id=\"{}\"", id)), "page is missing #{}", id);
    }

    let response = app.client.get(app.url("/static/app.js")).send().await.unwrap();
    assert_eq!(200, response.status().as_u16());
    let script = response.text().await.unwrap();
    for route in [
        "/auth/new-user",
        "/auth/token",
        "/admin/todos",
        "/users/user-info",
        "/users/change-password",
        "/users/change-phone-number",
    ] {
        assert!(script.contains(route), "script never calls {}", route);
    }
}
