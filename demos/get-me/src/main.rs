//! Check a bot token, then optionally greet a chat.
//!
//! ```sh
//! TELEGRAM_BOT_TOKEN=123:abc cargo run -p get-me
//! TELEGRAM_BOT_TOKEN=123:abc cargo run -p get-me -- <chat_id> [sticker.webp]
//! ```
//!
//! `RUST_LOG=debug` shows every HTTP exchange.

use tgbot::{Attachment, BotBuilder, BotConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BotConfig::from_env()?;
    let bot = BotBuilder::from_config(&config).with_logging().build()?;

    let me = bot.get_me().await?;
    info!(
        id = me.id,
        username = me.username.as_deref().unwrap_or("-"),
        "authorized"
    );

    let mut args = std::env::args().skip(1);
    let Some(chat_id) = args.next() else {
        return Ok(());
    };

    let message = bot
        .send_message(&chat_id, format!("Hello from {}", me.first_name))
        .await?;
    info!(message_id = message.message_id, "message sent");

    if let Some(sticker) = args.next() {
        let message = bot
            .send_sticker(&chat_id, Attachment::from_path(sticker)?)
            .await?;
        let file_id = message.sticker.map(|s| s.file_id).unwrap_or_default();
        info!(message_id = message.message_id, %file_id, "sticker sent");
    }

    Ok(())
}
