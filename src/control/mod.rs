//! The plaintext TCP registration protocol.
//!
//! Backends announce themselves with `+:address:port:id:/mount` and
//! withdraw with `-:address:port:id:/mount`, one frame per connection.
//! [`frame`] holds the schema and parser, [`listener`] the broker's
//! accept loop, and [`client`] the sending side used by backends.

pub mod client;
pub mod frame;
pub mod listener;
