//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to interact with the backend without
//! depending on concrete implementations.

pub mod channel_transport_port;
pub mod clock_port;
pub mod social_api_port;

pub use channel_transport_port::{ChannelTransport, FrameStream, TransportError};
pub use clock_port::ClockPort;
pub use social_api_port::{ApiError, SocialApi};

#[cfg(test)]
pub use clock_port::MockClockPort;
#[cfg(test)]
pub use social_api_port::MockSocialApi;
