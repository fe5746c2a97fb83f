//! Notifier implementations.
//!
//! - `DiscordNotifier` - posts to a Discord webhook (requires `discord` feature)
//! - `LogNotifier` - writes messages to the tracing log

#[cfg(feature = "discord")]
pub mod discord;
pub mod log;

#[cfg(feature = "discord")]
pub use discord::DiscordNotifier;
pub use log::LogNotifier;
