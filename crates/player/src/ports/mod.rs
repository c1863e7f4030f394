//! Player port definitions.
//!
//! Outbound ports are the seams between the state core and the outside world
//! (REST backend, push sockets, wall clock). Adapters live in `infrastructure`.

pub mod outbound;
