//! Integration tests for the REST client against a `wiremock` server.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use maildesk_core::records::DeliveryStatus;
use maildesk_core::sharing::SharingOption;
use maildesk_core::template::EmailTemplate;
use maildesk_core::{Error, HttpApi, RecordId, RecordQuery, TemplateId};

fn client(server: &MockServer, token: Option<&str>) -> HttpApi {
    HttpApi::new(&server.uri(), Duration::from_secs(5), token.map(str::to_string)).unwrap()
}

fn record() -> serde_json::Value {
    json!({
        "id": 7,
        "recipient": "alice@example.com",
        "subject": "Invoice",
        "status": "error",
        "created_at": "2024-05-01T10:00:00Z",
        "error_message": "SMTP timeout"
    })
}

#[tokio::test]
async fn test_list_records_sends_query_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/email-records"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "20"))
        .and(query_param("status", "failed"))
        .and(query_param("search", "alice"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [record()],
            "total": 41,
            "page": 2,
            "page_size": 20
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = RecordQuery::with_page_size(20)
        .with_status(Some(DeliveryStatus::Failed))
        .with_search("alice")
        .with_page(2);
    let page = client(&server, Some("secret"))
        .list_records(&query)
        .await
        .unwrap();

    assert_eq!(page.total, 41);
    assert_eq!(page.page, 2);
    assert_eq!(page.items[0].id, RecordId(7));
    assert_eq!(page.items[0].status, DeliveryStatus::Failed);
}

#[tokio::test]
async fn test_bare_array_is_paged_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/email-records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([record()])))
        .mount(&server)
        .await;

    let page = client(&server, None)
        .list_records(&RecordQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.page, 1);
}

#[tokio::test]
async fn test_resend_posts_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/email-records/resend"))
        .and(body_json(json!({"ids": [1, 2, 3]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resent": 2})))
        .expect(1)
        .mount(&server)
        .await;

    let count = client(&server, None)
        .resend(&[RecordId(1), RecordId(2), RecordId(3)])
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_delete_without_count_assumes_all() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/email-records/delete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let count = client(&server, None)
        .delete_records(&[RecordId(4), RecordId(5)])
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_api_error_uses_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"detail": "ids must not be empty"})),
        )
        .mount(&server)
        .await;

    let err = client(&server, None).resend(&[]).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "ids must not be empty");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let ok_text = MockServer::start().await;
    Mock::given(path("/api/email-records/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_string("upstream down"))
        .mount(&ok_text)
        .await;
    let unavailable = MockServer::start().await;
    Mock::given(path("/api/email-records/summary"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&unavailable)
        .await;

    assert!(client(&ok_text, None).status_summary().await.is_err());
    let err = client(&unavailable, None)
        .status_summary()
        .await
        .unwrap_err();
    assert!(err.is_transient());
    assert!(err.to_string().contains("upstream down"));
}

#[tokio::test]
async fn test_fetch_logs_text_and_json() {
    let log = "2024-05-01 10:00:00,000 - INFO - {\"message\": \"ok\"}";
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("lines", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_string(log))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("lines", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lines": ["a", "b"]})))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, None);
    assert_eq!(api.fetch_logs(200).await.unwrap(), log);
    assert_eq!(api.fetch_logs(2).await.unwrap(), "a\nb");
}

#[tokio::test]
async fn test_save_template_put_and_post() {
    let server = MockServer::start().await;
    let saved = |id: u64| {
        ResponseTemplate::new(200).set_body_json(
            json!({"id": id, "name": "N", "subject": "S", "body_html": "<p>x</p>"}),
        )
    };
    Mock::given(method("PUT"))
        .and(path("/api/templates/3"))
        .respond_with(saved(3))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/templates"))
        .respond_with(saved(12))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, None);
    let existing = EmailTemplate {
        id: Some(TemplateId(3)),
        ..EmailTemplate::new("N", "S")
    };
    assert_eq!(
        api.save_template(&existing).await.unwrap().id,
        Some(TemplateId(3))
    );
    let created = api
        .save_template(&EmailTemplate::new("N", "S"))
        .await
        .unwrap();
    assert_eq!(created.id, Some(TemplateId(12)));
}

#[tokio::test]
async fn test_sharing_settings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/settings/sharing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "option": "specific",
            "allowed_emails": ["a@b.co"],
            "size_threshold_mb": 10
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/settings/sharing"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, None);
    let settings = api.sharing_settings().await.unwrap();
    assert_eq!(settings.option, SharingOption::Specific);
    assert_eq!(settings.size_threshold_mb, 10);
    assert!(!settings.notify_recipients);

    api.save_sharing_settings(&settings).await.unwrap();
    let requests = server.received_requests().await.unwrap();
    let put = requests.iter().find(|r| r.method.as_str() == "PUT").unwrap();
    let body: serde_json::Value = serde_json::from_slice(&put.body).unwrap();
    assert_eq!(body["option"], "specific");
    assert_eq!(body["allowed_emails"], json!(["a@b.co"]));
}
