//! Rally Player - headless runner.
//!
//! Bootstraps a session for `RALLY_USER_ID`, keeps the push channels open
//! and logs slice changes until interrupted.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rally_player::client::RallyClient;
use rally_player::config::ClientConfig;
use rally_player::state::{ChannelsSlice, MessagesSlice, NotificationsSlice, SocialSlice};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rally_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Rally Player");

    let config = ClientConfig::from_env().context("Invalid configuration")?;
    let user_id = config
        .user_id
        .context("RALLY_USER_ID must be set to bootstrap a session")?;
    tracing::info!(api = %config.api_url, %user_id, "Loaded configuration");

    let client = RallyClient::from_config(&config);
    let store = client.store();

    let subscriptions = vec![
        store.subscribe::<SocialSlice>(|social| {
            tracing::info!(
                friends = social.friends.len(),
                received = social.friend_requests.received.len(),
                online = social.online_users,
                "Social updated"
            );
        }),
        store.subscribe::<MessagesSlice>(|messages| {
            tracing::info!(
                conversations = messages.conversations.len(),
                unread = messages.unread_count,
                "Messages updated"
            );
        }),
        store.subscribe::<NotificationsSlice>(|notifications| {
            if let Some(latest) = notifications.notifications.first() {
                tracing::info!(unread = notifications.unread_count, "{}", latest.message);
            }
        }),
        store.subscribe::<ChannelsSlice>(|channels| {
            tracing::info!(chat = ?channels.chat.state, notifications = ?channels.notifications.state, "Channels updated");
        }),
    ];

    client
        .session
        .bootstrap(user_id)
        .await
        .context("Bootstrap failed")?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    tracing::info!("Shutting down");
    for subscription in subscriptions {
        subscription.unsubscribe();
    }
    client.session.logout();
    Ok(())
}
