use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use pinreset::config::{EmailJsConfig, SmtpConfig};
use pinreset::email::{templates, EmailJsTransport, SmtpMailer, Transport};
use pinreset::models::PinReset;

const DEEP_LINK: &str = "appwallet://resetPin?token=abc123";
const WEB_LINK: &str = "https://wallet.example.com/?token=abc123";

type Captured = Arc<Mutex<Vec<Value>>>;

async fn capture(State(captured): State<Captured>, Json(body): Json<Value>) -> StatusCode {
    captured.lock().unwrap().push(body);
    StatusCode::OK
}

async fn reject() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, "template not found")
}

/// Fake EmailJS endpoint recording every request body.
async fn spawn_emailjs() -> (String, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/api/v1.0/email/send", post(capture))
        .route("/reject", post(reject))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    (format!("http://{addr}"), captured)
}

fn emailjs_config(url: String) -> EmailJsConfig {
    EmailJsConfig {
        url,
        service_id: "service".to_string(),
        template_id: "template".to_string(),
        user_id: "user".to_string(),
    }
}

#[tokio::test]
async fn emailjs_sends_reset_link_in_template_params() {
    let (base, captured) = spawn_emailjs().await;
    let transport =
        EmailJsTransport::new(&emailjs_config(format!("{base}/api/v1.0/email/send"))).unwrap();
    let email = templates::pin_reset_email("a@example.com", DEEP_LINK, WEB_LINK, PinReset::TTL_MINUTES);

    transport.send(&email).await.unwrap();

    let bodies = captured.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["service_id"], "service");
    assert_eq!(body["template_id"], "template");
    assert_eq!(body["user_id"], "user");

    let params = &body["template_params"];
    assert_eq!(params["to_email"], "a@example.com");
    assert_eq!(params["subject"], templates::PIN_RESET_SUBJECT);
    assert_eq!(params["reset_link"], WEB_LINK);
    assert_eq!(params["deep_link"], DEEP_LINK);
    assert!(params["message_html"].as_str().unwrap().contains(WEB_LINK));
    assert!(params["message_text"].as_str().unwrap().contains(DEEP_LINK));
}

#[tokio::test]
async fn emailjs_error_status_fails_the_send() {
    let (base, captured) = spawn_emailjs().await;
    let transport = EmailJsTransport::new(&emailjs_config(format!("{base}/reject"))).unwrap();
    let email = templates::pin_reset_email("a@example.com", DEEP_LINK, WEB_LINK, PinReset::TTL_MINUTES);

    let err = transport.send(&email).await.unwrap_err();
    assert!(err.0.contains("400"));
    assert!(err.0.contains("template not found"));
    assert!(captured.lock().unwrap().is_empty());
}

#[test]
fn reset_email_carries_both_links() {
    let email = templates::pin_reset_email("a@example.com", DEEP_LINK, WEB_LINK, PinReset::TTL_MINUTES);
    assert_eq!(email.to, "a@example.com");
    assert_eq!(email.reset_link, WEB_LINK);
    assert_eq!(email.deep_link, DEEP_LINK);
    assert!(email.html_body.contains(DEEP_LINK));
    assert!(email.text_body.contains(WEB_LINK));
    assert!(email.text_body.contains("20 minutes"));
}

#[tokio::test]
async fn smtp_mailer_builds_for_starttls_and_implicit_tls() {
    let mut config = SmtpConfig {
        host: "smtp.example.com".to_string(),
        port: 587,
        user: "mailer".to_string(),
        pass: "secret".to_string(),
        from: "no-reply@example.com".to_string(),
        secure: false,
    };
    let starttls = SmtpMailer::new(&config).unwrap();
    assert_eq!(starttls.name(), "smtp");

    config.secure = true;
    config.port = 465;
    assert!(SmtpMailer::new(&config).is_ok());
}
