//! Integration tests for `ResendMailer` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pulse_pipeline::{EmailContent, MailError, Mailer, ResendMailer};

fn content() -> EmailContent {
    EmailContent {
        subject: "Weekly Pulse: IND Money".to_owned(),
        html: "<h1>Pulse</h1>".to_owned(),
    }
}

fn mailer(base_url: &str) -> ResendMailer {
    ResendMailer::new(
        Some("re_test".to_owned()),
        "Weekly Pulse <pulse@example.com>",
        base_url,
        5,
    )
    .expect("mailer")
}

#[tokio::test]
async fn posts_message_with_bearer_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer re_test"))
        .and(body_json(json!({
            "from": "Weekly Pulse <pulse@example.com>",
            "to": ["lead@example.com"],
            "subject": "Weekly Pulse: IND Money",
            "html": "<h1>Pulse</h1>"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "49a3999c"})))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = mailer(&server.uri())
        .send_report("lead@example.com", &content())
        .await
        .expect("accepted");
    assert_eq!(receipt.id.as_deref(), Some("49a3999c"));
}

#[tokio::test]
async fn provider_rejection_carries_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "statusCode": 422,
            "name": "validation_error",
            "message": "Invalid `from` field."
        })))
        .mount(&server)
        .await;

    let err = mailer(&server.uri())
        .send_report("lead@example.com", &content())
        .await
        .expect_err("rejected");
    match err {
        MailError::Provider { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Invalid `from` field.");
        }
        other => panic!("expected Provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_recipient_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = mailer(&server.uri())
        .send_report("nobody", &content())
        .await
        .expect_err("bad address");
    assert!(matches!(err, MailError::InvalidRecipient(_)));
}
