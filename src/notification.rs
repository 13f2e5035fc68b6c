use crate::error::NotifyError;
use async_trait::async_trait;
use reqwest::{Client, Request};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

#[async_trait]
pub trait Notifier {
    async fn send_message(&self, text: &str) -> Result<(), NotifyError>;
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

pub struct TelegramClient {
    client: Client,
    url: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(
        api_url: &str,
        token: &str,
        chat_id: String,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let url = format!("{}/bot{}/sendMessage", api_url.trim_end_matches('/'), token);
        let client = Client::builder().timeout(timeout).build()?;
        Ok(TelegramClient {
            client,
            url,
            chat_id,
        })
    }

    fn request(&self, text: &str) -> reqwest::Result<Request> {
        self.client
            .post(&self.url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .build()
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        let request = self.request(text)?;
        let response = self.client.execute(request).await?;
        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status()));
        }
        let reply = response.json::<TelegramResponse>().await?;
        if !reply.ok {
            return Err(NotifyError::NotOk(reply.description));
        }
        Ok(())
    }
}

/// Best-effort delivery: failures are logged and dropped, never retried.
pub async fn deliver<N>(notifier: &N, text: &str)
where
    N: Notifier + ?Sized + Sync,
{
    match notifier.send_message(text).await {
        Ok(()) => info!("message sent"),
        Err(e) => error!(error = %e, "send message fails"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;
    use reqwest::StatusCode;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client() -> TelegramClient {
        TelegramClient::new(
            "https://api.telegram.org/",
            "123:abc",
            "42".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn message_goes_to_send_message_endpoint() {
        let request = client().request("hello").unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
        assert_eq!(request.method(), reqwest::Method::POST);
    }

    #[test]
    fn body_names_the_chat_and_text() {
        let request = client().request("Изменился статус").unwrap();
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        let body: Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(body["chat_id"], "42");
        assert_eq!(body["text"], "Изменился статус");
    }

    fn client_for(base: &str) -> TelegramClient {
        TelegramClient::new(base, "123:abc", "42".to_string(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn ok_reply_is_delivered() {
        let base = serve_once("200 OK", r#"{"ok": true, "result": {"message_id": 7}}"#).await;
        assert!(client_for(&base).send_message("hello").await.is_ok());
    }

    #[tokio::test]
    async fn error_status_is_rejected() {
        let base = serve_once(
            "500 Internal Server Error",
            r#"{"ok": false, "description": "Internal Server Error"}"#,
        )
        .await;
        let err = client_for(&base).send_message("hello").await.unwrap_err();
        assert!(matches!(
            err,
            NotifyError::Rejected(status) if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn ok_false_carries_description() {
        let base = serve_once(
            "200 OK",
            r#"{"ok": false, "description": "Bad Request: chat not found"}"#,
        )
        .await;
        match client_for(&base).send_message("hello").await {
            Err(NotifyError::NotOk(Some(description))) => {
                assert_eq!(description, "Bad Request: chat not found")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    struct Failing {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for Failing {
        async fn send_message(&self, _text: &str) -> Result<(), NotifyError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(NotifyError::NotOk(Some("Forbidden: bot was blocked".to_string())))
        }
    }

    #[tokio::test]
    async fn deliver_swallows_failures_without_retrying() {
        let notifier = Failing {
            attempts: AtomicUsize::new(0),
        };
        deliver(&notifier, "hello").await;
        assert_eq!(notifier.attempts.load(Ordering::SeqCst), 1);
    }
}
