use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use whalewatch::alerts::{AlertPriority, AlertSink, TelegramAlertSink, create_sink};
use whalewatch::config::{AlertsConfig, TelegramAlertConfig};
use whalewatch::error::AlertError;
use whalewatch::gate::{CircuitBreakerGate, GateDecision};
use whalewatch::quality::{CheckResult, HealthAggregator, HealthReport, HealthStatus};

#[tokio::test]
async fn high_priority_alert_posts_audible_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_json(json!({
            "chat_id": "-1001",
            "text": "🚨 circuit open",
            "disable_notification": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let sink = TelegramAlertSink::new("123:abc", "-1001").with_api_base(server.uri());
    sink.send_alert("circuit open", AlertPriority::High)
        .await
        .unwrap();

    server.verify().await;
}

#[tokio::test]
async fn rejected_request_is_a_send_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"ok": false, "description": "chat not found"})),
        )
        .mount(&server)
        .await;

    let sink = TelegramAlertSink::new("123:abc", "-1001").with_api_base(server.uri());
    let err = sink
        .send_alert("drift high", AlertPriority::Normal)
        .await
        .unwrap_err();

    match err {
        AlertError::Send { sink, message } => {
            assert_eq!(sink, "telegram");
            assert!(message.contains("400"));
            assert!(message.contains("chat not found"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn critical_report() -> HealthReport {
    let now = Utc::now();
    HealthAggregator::default().build_report(
        vec![
            CheckResult::new("density", HealthStatus::Critical, 50.0, now)
                .with_issue("no snapshots found in the last 24h"),
        ],
        now,
    )
}

#[tokio::test]
async fn slow_bot_api_times_out_as_send_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true}))
                .set_delay(Duration::from_secs(8)),
        )
        .mount(&server)
        .await;

    let sink = TelegramAlertSink::new("123:abc", "-1001")
        .with_api_base(server.uri())
        .with_timeout(Duration::from_millis(200));

    let started = Instant::now();
    let err = sink
        .send_alert("circuit open", AlertPriority::High)
        .await
        .unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(matches!(err, AlertError::Send { ref sink, .. } if sink == "telegram"));
}

#[tokio::test]
async fn gate_decides_without_waiting_for_a_stalled_bot_api() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(60)))
        .mount(&server)
        .await;

    let sink = TelegramAlertSink::new("123:abc", "-1001").with_api_base(server.uri());
    let mut gate =
        CircuitBreakerGate::new(Arc::new(sink)).with_alert_timeout(Duration::from_millis(300));

    let started = Instant::now();
    let decision = gate.evaluate(&critical_report()).await;
    let waited = started.elapsed();

    assert_eq!(decision, GateDecision::Abort);
    assert!(waited < Duration::from_secs(3), "gate waited {waited:?} on alert delivery");

    let health = gate.monitor().snapshot();
    assert_eq!(health.aborts, 1);
    assert_eq!(health.alert_failures, 1);
    assert!(health.last_alert_error.unwrap().contains("timed out"));
}

#[tokio::test]
async fn failing_telegram_never_blocks_the_gate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let config = AlertsConfig {
        backend: "telegram".into(),
        telegram: Some(TelegramAlertConfig {
            bot_token: "123:abc".into(),
            chat_id: "-1001".into(),
            api_base: Some(server.uri()),
        }),
    };
    let sink = create_sink(&config);
    assert_eq!(sink.name(), "telegram");

    let mut gate = CircuitBreakerGate::new(Arc::clone(&sink));
    assert_eq!(gate.evaluate(&critical_report()).await, GateDecision::Abort);
    assert_eq!(gate.monitor().snapshot().alert_failures, 1);

    server.verify().await;
}
