use crate::api::HomeworkApi;
use crate::error::{CheckError, ErrorKind};
use crate::homework::{check_response, parse_status};
use crate::notification::{deliver, Notifier};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// What a single polling cycle ended with.
#[derive(Debug, PartialEq)]
pub enum Cycle {
    Notified(String),
    Unchanged,
    Failed(String),
}

pub struct Poller<A, N> {
    api: A,
    notifier: N,
    from_date: i64,
    retry_time: Duration,
    last_status: String,
}

impl<A, N> Poller<A, N>
where
    A: HomeworkApi + Sync,
    N: Notifier + Sync,
{
    pub fn new(api: A, notifier: N, from_date: i64, retry_time: Duration) -> Self {
        Poller {
            api,
            notifier,
            from_date,
            retry_time,
            last_status: String::new(),
        }
    }

    /// Polls forever, sleeping `retry_time` after every cycle.
    pub async fn run(mut self) {
        info!(retry_time = ?self.retry_time, from_date = self.from_date, "polling started");
        loop {
            match self.poll_once().await {
                Cycle::Notified(status) => info!(%status, "status changed"),
                Cycle::Failed(message) => debug!(%message, "cycle failed"),
                Cycle::Unchanged => {}
            }
            sleep(self.retry_time).await;
        }
    }

    pub async fn poll_once(&mut self) -> Cycle {
        match self.check().await {
            Ok(status) if status != self.last_status => {
                self.last_status = status.clone();
                deliver(&self.notifier, &status).await;
                Cycle::Notified(status)
            }
            Ok(_) => {
                debug!("no new status");
                Cycle::Unchanged
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::Transport => warn!(error = %e, "homework api unavailable"),
                    ErrorKind::ResponseShape => error!(error = %e, "unexpected api response"),
                    ErrorKind::Domain => error!(error = %e, "unusable homework record"),
                }
                let message = format!("Ошибка: {}", e);
                deliver(&self.notifier, &message).await;
                Cycle::Failed(message)
            }
        }
    }

    async fn check(&self) -> Result<String, CheckError> {
        let response = self.api.get_api_answer(Some(self.from_date)).await?;
        let homeworks = check_response(&response)?;
        parse_status(homeworks)
    }
}
