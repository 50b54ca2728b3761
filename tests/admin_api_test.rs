use actix_web::{test, web, App};
use assert_json_diff::assert_json_include;
use docmock::catalog::{Document, EndpointDefinition, HttpMethod};
use docmock::config::Config;
use docmock::server::{routes, AppState};
use serde_json::{json, Value};

const PING_URL: &str = "https://docs.example.com/ping";
const PING_ID_ENCODED: &str = "https%3A%2F%2Fdocs.example.com%2Fping";

fn import_body() -> Value {
    json!({
        "sourceUrl": PING_URL,
        "title": "Ping API",
        "endpoints": [
            {
                "method": "GET",
                "path": "ping",
                "description": "Liveness probe",
                "exampleResponses": [
                    {"statusCode": 500, "body": "{\"ok\":false}"},
                    {"statusCode": 200, "body": "{\"ok\":true}"}
                ]
            },
            {
                "method": "post",
                "path": "/ping",
                "exampleResponses": []
            }
        ]
    })
}

fn empty_state() -> web::Data<AppState> {
    web::Data::new(AppState::from_config(Config::default()).unwrap())
}

#[actix_web::test]
async fn test_import_activate_edit_reset_flow() {
    let state = empty_state();
    let app = test::init_service(App::new().configure(routes(state.clone()))).await;

    // Import
    let req = test::TestRequest::post()
        .uri("/admin/documents")
        .set_json(import_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let doc: Value = test::read_body_json(resp).await;
    assert_json_include!(
        actual: doc.clone(),
        expected: json!({
            "id": PING_URL,
            "title": "Ping API",
            "sourceUrl": PING_URL,
            "endpoints": [
                {"method": "GET", "path": "/ping", "defaultResponse": "{\"ok\":true}", "mockResponse": "{\"ok\":true}"},
                {"method": "POST", "path": "/ping", "defaultResponse": "", "mockResponse": ""}
            ]
        })
    );
    let endpoint_id = doc["endpoints"][0]["id"].as_str().unwrap().to_string();

    // Nothing active yet
    let req = test::TestRequest::get().uri("/api/mock/ping").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    // Activate by id
    let req = test::TestRequest::put()
        .uri(&format!("/admin/active/{}", PING_ID_ENCODED))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let result: Value = test::read_body_json(resp).await;
    assert_eq!(
        result,
        json!({
            "success": true,
            "message": "Mock server now active for \"Ping API\".",
            "activeDocId": PING_URL
        })
    );

    let req = test::TestRequest::get().uri("/api/mock/ping").to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    assert_eq!(body, web::Bytes::from_static(b"{\"ok\":true}"));

    // Edit the active document's mock response
    let req = test::TestRequest::put()
        .uri(&format!(
            "/admin/documents/{}/endpoints/{}/response",
            PING_ID_ENCODED, endpoint_id
        ))
        .set_json(json!({"mockResponse": "{\"ok\":\"edited\"}"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let endpoint: Value = test::read_body_json(resp).await;
    assert_eq!(endpoint["mockResponse"], "{\"ok\":\"edited\"}");
    assert_eq!(endpoint["defaultResponse"], "{\"ok\":true}");

    let req = test::TestRequest::get().uri("/api/mock/ping").to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    assert_eq!(body, web::Bytes::from_static(b"{\"ok\":\"edited\"}"));

    // Reset to the default
    let req = test::TestRequest::delete()
        .uri(&format!(
            "/admin/documents/{}/endpoints/{}/response",
            PING_ID_ENCODED, endpoint_id
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get().uri("/api/mock/ping").to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    assert_eq!(body, web::Bytes::from_static(b"{\"ok\":true}"));

    // Summary reflects activation
    let req = test::TestRequest::get().uri("/admin/documents").to_request();
    let summaries: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(
        summaries,
        json!([{
            "id": PING_URL,
            "title": "Ping API",
            "sourceUrl": PING_URL,
            "endpointCount": 2,
            "active": true
        }])
    );
}

#[actix_web::test]
async fn test_activate_and_deactivate_with_document_body() {
    let state = empty_state();
    let app = test::init_service(App::new().configure(routes(state.clone()))).await;

    let doc = Document::new("inline", "Inline Doc")
        .with_endpoint(EndpointDefinition::new(HttpMethod::Get, "/hello", "hi"));

    let req = test::TestRequest::put()
        .uri("/admin/active")
        .set_json(&doc)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let result: Value = test::read_body_json(resp).await;
    assert_eq!(result["activeDocId"], "inline");

    let req = test::TestRequest::get().uri("/admin/active").to_request();
    let active: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(active, json!({"activeDocId": "inline", "title": "Inline Doc"}));

    let req = test::TestRequest::get().uri("/api/mock/hello").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers().get("content-type").unwrap(), "text/plain; charset=utf-8");

    // null body deactivates
    let req = test::TestRequest::put()
        .uri("/admin/active")
        .insert_header(("content-type", "application/json"))
        .set_payload("null")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let result: Value = test::read_body_json(resp).await;
    assert_eq!(
        result,
        json!({"success": true, "message": "Mock server is now deactivated.", "activeDocId": null})
    );

    let req = test::TestRequest::get().uri("/api/mock/hello").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    // DELETE also deactivates, and is idempotent
    let req = test::TestRequest::delete().uri("/admin/active").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert!(state.catalog.registry.get_active().is_none());
}

#[actix_web::test]
async fn test_activate_unknown_id_keeps_current() {
    let mut config = Config::default();
    config.documents = vec![Document::new("d1", "T")];
    config.mock.active_document = Some("d1".to_string());
    let state = web::Data::new(AppState::from_config(config).unwrap());
    let app = test::init_service(App::new().configure(routes(state.clone()))).await;

    let req = test::TestRequest::put().uri("/admin/active/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let result: Value = test::read_body_json(resp).await;
    assert_eq!(result["success"], false);
    assert_eq!(result["activeDocId"], "d1");
    assert_eq!(state.catalog.registry.active_id().as_deref(), Some("d1"));
}

#[actix_web::test]
async fn test_delete_active_document_deactivates() {
    let state = empty_state();
    let app = test::init_service(App::new().configure(routes(state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/admin/documents")
        .set_json(import_body())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::put()
        .uri(&format!("/admin/active/{}", PING_ID_ENCODED))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/documents/{}", PING_ID_ENCODED))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);

    assert!(state.catalog.registry.get_active().is_none());

    let req = test::TestRequest::get()
        .uri(&format!("/admin/documents/{}", PING_ID_ENCODED))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_reimport_of_active_document_is_served() {
    let state = empty_state();
    let app = test::init_service(App::new().configure(routes(state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/admin/documents")
        .set_json(import_body())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::put()
        .uri(&format!("/admin/active/{}", PING_ID_ENCODED))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let mut body = import_body();
    body["endpoints"][0]["exampleResponses"] = json!([{"statusCode": 200, "body": "v2"}]);
    let req = test::TestRequest::post()
        .uri("/admin/documents")
        .set_json(body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::get().uri("/api/mock/ping").to_request();
    let body = test::read_body(test::call_service(&app, req).await).await;
    assert_eq!(body, web::Bytes::from_static(b"v2"));
}

#[actix_web::test]
async fn test_admin_errors() {
    let state = empty_state();
    let app = test::init_service(App::new().configure(routes(state))).await;

    // Bad source URL
    let req = test::TestRequest::post()
        .uri("/admin/documents")
        .set_json(json!({"sourceUrl": "ftp://docs.example.com/x", "endpoints": []}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("ftp://docs.example.com/x"));

    // Unsupported method is rejected while parsing the body
    let req = test::TestRequest::post()
        .uri("/admin/documents")
        .set_json(json!({
            "sourceUrl": PING_URL,
            "endpoints": [{"method": "TRACE", "path": "/x"}]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    // Unknown document
    let req = test::TestRequest::get()
        .uri("/admin/documents/unknown")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "document 'unknown' not found"}));

    // Unknown endpoint
    let req = test::TestRequest::post()
        .uri("/admin/documents")
        .set_json(import_body())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::put()
        .uri(&format!(
            "/admin/documents/{}/endpoints/nope/response",
            PING_ID_ENCODED
        ))
        .set_json(json!({"mockResponse": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
