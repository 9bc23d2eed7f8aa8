//! Redis Client Protocol Shapes
//!
//! Only the parts needed to label spans live here: the command payloads a
//! client sends and the connection it sends them on.

mod command;
mod connection;

pub use command::{Command, CommandBatch, CommandPayload};
pub use connection::{PeerAddress, RedisConnection, RemoteConnection};
