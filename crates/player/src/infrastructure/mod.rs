pub mod clock;
pub mod http_client;
pub mod message_translator;
pub mod realtime;
pub mod websocket;

#[cfg(test)]
pub mod testing;

pub use clock::SystemClock;
pub use http_client::HttpSocialApi;
pub use realtime::{ChannelEndpoints, ChannelManager};
pub use websocket::{ReconnectPolicy, TungsteniteTransport};
