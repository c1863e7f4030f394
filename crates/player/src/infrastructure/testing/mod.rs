//! Test doubles and fixtures shared by unit tests across the crate.

pub mod fixtures;
mod scripted_transport;

pub use scripted_transport::{ScriptedSocket, ScriptedTransport};
