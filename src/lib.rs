// Library surface for the typing-session engine and its ambient plumbing.
// The terminal UI and CLI live in main.rs.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod language;
pub mod layout;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod time_series;

pub use error::{Result, TypteaError};
pub use session::{Phase, Session, SessionConfig};
pub use stats::{compute_stats, TypingStats};
