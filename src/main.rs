mod api;
mod config;
mod error;
mod homework;
mod logging;
mod notification;
mod poller;
#[cfg(test)]
mod test_support;

use crate::api::PracticumClient;
use crate::config::{Credentials, Settings};
use crate::notification::TelegramClient;
use crate::poller::Poller;
use anyhow::Context;
use chrono::Utc;
use std::path::Path;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let settings = match std::env::var_os("HOMEWORK_BOT_SETTINGS") {
        Some(path) => config::load_settings_from(Path::new(&path)),
        None => config::load_settings(),
    }
    .context("failed to load settings")?;
    logging::init(&settings)?;

    let poller = build_poller(&settings, |name| std::env::var(name).ok())?;
    poller.run().await;
    Ok(())
}

/// Checks the secrets and wires both clients. Fails before any polling starts.
fn build_poller<F>(
    settings: &Settings,
    lookup: F,
) -> anyhow::Result<Poller<PracticumClient, TelegramClient>>
where
    F: Fn(&str) -> Option<String>,
{
    let credentials = match Credentials::from_lookup(lookup) {
        Ok(credentials) => credentials,
        Err(e) => {
            error!(critical = true, error = %e, "check tokens fails");
            return Err(e).context("refusing to start polling");
        }
    };

    let api = PracticumClient::new(
        settings.endpoint.clone(),
        credentials.practicum_token,
        settings.request_timeout(),
    )
    .context("failed to build homework api client")?;
    let bot = TelegramClient::new(
        &settings.telegram_api_url,
        &credentials.bot_token,
        credentials.chat_id,
        settings.request_timeout(),
    )
    .context("failed to build telegram client")?;

    Ok(Poller::new(
        api,
        bot,
        Utc::now().timestamp(),
        settings.retry_interval(),
    ))
}
