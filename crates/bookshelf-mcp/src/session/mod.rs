//! Session management: maps session ids to their live event streams.

pub mod registry;

pub use registry::{generate_session_id, SessionHandle, SessionRegistry};
