use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{json, Value};

use crate::domain::entities::alert::Alert;
use crate::domain::ports::notifier::{NotificationError, Notifier};
use crate::domain::value_objects::status::CheckStatus;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Payload shape, chosen from the webhook host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WebhookFormat {
    Slack,
    Generic,
}

/// Posts alerts as JSON to an HTTP webhook.
///
/// Slack incoming webhooks get a `text` line plus a colored attachment; any
/// other URL receives the alert fields as a flat JSON object.
pub struct WebhookNotifier {
    url: Url,
    client: reqwest::Client,
    format: WebhookFormat,
}

impl WebhookNotifier {
    /// # Errors
    ///
    /// Returns `NotificationError::ChannelUnavailable` for an unparseable URL
    /// or when the HTTP client cannot be built.
    pub fn new(url: &str) -> Result<Self, NotificationError> {
        let url = Url::parse(url)
            .map_err(|e| NotificationError::ChannelUnavailable(format!("invalid webhook URL: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| {
                NotificationError::ChannelUnavailable(format!("cannot build HTTP client: {e}"))
            })?;
        let format = if url.host_str() == Some("hooks.slack.com") {
            WebhookFormat::Slack
        } else {
            WebhookFormat::Generic
        };
        Ok(Self {
            url,
            client,
            format,
        })
    }

    fn payload(&self, alert: &Alert) -> Value {
        match self.format {
            WebhookFormat::Slack => slack_payload(alert),
            WebhookFormat::Generic => generic_payload(alert),
        }
    }
}

fn slack_payload(alert: &Alert) -> Value {
    let color = match alert.status {
        CheckStatus::Fail => "danger",
        _ => "warning",
    };
    let mut value = format!("{} ({})", alert.message, alert.host);
    if let Some(details) = &alert.details {
        value.push('\n');
        value.push_str(details);
    }
    json!({
        "text": format!("🚨 vLLM Alert: {}", alert.title),
        "attachments": [{
            "color": color,
            "fields": [{
                "title": "Details",
                "value": value,
                "short": false
            }]
        }]
    })
}

fn generic_payload(alert: &Alert) -> Value {
    json!({
        "source": "preflight",
        "host": &alert.host,
        "status": alert.status,
        "title": &alert.title,
        "message": &alert.message,
        "details": &alert.details,
        "timestamp": alert.timestamp.to_rfc3339()
    })
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, alert: &Alert) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&self.payload(alert))
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("webhook unreachable: {e}")))?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!(alert = %alert.title, "alert delivered");
            Ok(())
        } else {
            Err(NotificationError::SendFailed(format!(
                "webhook answered HTTP {}",
                status.as_u16()
            )))
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::check_result::CheckResult;
    use crate::domain::value_objects::category::Category;
    use chrono::Utc;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn alert(status: CheckStatus) -> Alert {
        let result = CheckResult::new(Category::Gpu, "gpu_count", status, "no GPUs detected")
            .with_details("driver 550.54.15");
        Alert::from_result(&result, "gpu-node-01", Utc::now())
    }

    #[test]
    fn format_follows_host() {
        let slack = WebhookNotifier::new("https://hooks.slack.com/services/T0/B0/x").expect("url");
        assert_eq!(slack.format, WebhookFormat::Slack);
        let lookalike =
            WebhookNotifier::new("https://example.com/hooks.slack.com").expect("url");
        assert_eq!(lookalike.format, WebhookFormat::Generic);
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = WebhookNotifier::new("not a url").err().expect("invalid");
        assert!(matches!(err, NotificationError::ChannelUnavailable(_)));
    }

    #[test]
    fn slack_payload_carries_title_and_color() {
        let payload = slack_payload(&alert(CheckStatus::Fail));
        assert_eq!(payload["text"], "🚨 vLLM Alert: gpu/gpu_count");
        assert_eq!(payload["attachments"][0]["color"], "danger");
        assert_eq!(
            payload["attachments"][0]["fields"][0]["value"],
            "no GPUs detected (gpu-node-01)\ndriver 550.54.15"
        );
        let payload = slack_payload(&alert(CheckStatus::Warning));
        assert_eq!(payload["attachments"][0]["color"], "warning");
    }

    #[tokio::test]
    async fn posts_generic_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/alerts"))
            .and(body_partial_json(json!({
                "source": "preflight",
                "host": "gpu-node-01",
                "status": "FAIL",
                "title": "gpu/gpu_count"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier =
            WebhookNotifier::new(&format!("{}/alerts", server.uri())).expect("notifier");
        notifier.notify(&alert(CheckStatus::Fail)).await.expect("delivered");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let notifier = WebhookNotifier::new(&server.uri()).expect("notifier");
        let err = notifier
            .notify(&alert(CheckStatus::Warning))
            .await
            .expect_err("rejected");
        assert_eq!(err.to_string(), "failed to send notification: webhook answered HTTP 500");
    }

    #[tokio::test]
    async fn unreachable_webhook_is_reported() {
        let notifier = WebhookNotifier::new("http://127.0.0.1:1/hook").expect("notifier");
        let err = notifier
            .notify(&alert(CheckStatus::Fail))
            .await
            .expect_err("unreachable");
        assert!(err.to_string().contains("webhook unreachable"));
    }
}
