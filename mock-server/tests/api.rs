use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Contact};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_contacts_empty_envelope() {
    let app = app();
    let resp = app
        .oneshot(Request::builder().uri("/contacts").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Value = body_json(resp).await;
    assert_eq!(envelope["total"], 0);
    assert!(envelope["result"].as_array().unwrap().is_empty());
}

// --- create ---

#[tokio::test]
async fn create_contact_returns_201() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/contacts",
            r#"{"full_name":"Ada Lovelace"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let contact: Contact = body_json(resp).await;
    assert_eq!(contact.full_name, "Ada Lovelace");
    assert!(contact.is_active);
    assert!(contact.tags.is_empty());
}

#[tokio::test]
async fn create_contact_accepts_null_optionals() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/contacts",
            r#"{"full_name":"Ada","email":null,"phone_number":null,"tags":null}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let contact: Contact = body_json(resp).await;
    assert!(contact.email.is_none());
}

#[tokio::test]
async fn create_contact_malformed_json_returns_422() {
    let app = app();
    let resp = app
        .oneshot(json_request("POST", "/contacts", r#"{"not_a_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_contact_not_found() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/contacts/00000000-0000-0000-0000-000000000000")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_contact_bad_uuid_returns_400() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/contacts/not-a-uuid")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn put_contact_not_found() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "PUT",
            "/contacts/00000000-0000-0000-0000-000000000000",
            r#"{"full_name":"Nobody"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_contact_not_found() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "PATCH",
            "/contacts/00000000-0000-0000-0000-000000000000",
            r#"{"full_name":"Nobody"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_contact_not_found() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/contacts/00000000-0000-0000-0000-000000000000")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/contacts",
            r#"{"full_name":"Grace Hopper","email":"grace@navy.test"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Contact = body_json(resp).await;
    assert_eq!(created.full_name, "Grace Hopper");
    let id = created.id;

    // list — envelope with one element
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(Request::builder().uri("/contacts").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Value = body_json(resp).await;
    assert_eq!(envelope["total"], 1);
    assert_eq!(envelope["result"][0]["_id"], id.to_string());

    // filtered list — no inactive contacts yet
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .uri("/contacts?is_active=false")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    let envelope: Value = body_json(resp).await;
    assert_eq!(envelope["total"], 0);

    // patch — only the email
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            &format!("/contacts/{id}"),
            r#"{"email":"grace@acm.test"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Contact = body_json(resp).await;
    assert_eq!(patched.full_name, "Grace Hopper"); // unchanged
    assert_eq!(patched.email.as_deref(), Some("grace@acm.test"));

    // put — full replacement
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/contacts/{id}"),
            r#"{"full_name":"Grace B. Hopper","is_active":false}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let replaced: Contact = body_json(resp).await;
    assert_eq!(replaced.full_name, "Grace B. Hopper");
    assert!(replaced.email.is_none()); // replaced wholesale
    assert!(!replaced.is_active);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/contacts/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let body = body_bytes(resp).await;
    assert!(body.is_empty());

    // get after delete — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .uri(&format!("/contacts/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
