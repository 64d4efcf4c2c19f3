//! Core library modules for focuswarden.
//!
//! - **Session core**: `monitor` (state machine), `session` (record and
//!   punishment ladder), `protocol` (device line protocol)
//! - **Collaborators**: `transport` (serial link), `classifier` (remote
//!   title classifier), `focus` (active window), `notifier` (email, dialogs)
//! - **Infrastructure**: `config`, `daemon`, `messages`, `view`

pub mod classifier;
pub mod config;
pub mod daemon;
pub mod focus;
pub mod messages;
pub mod monitor;
pub mod notifier;
pub mod protocol;
pub mod session;
pub mod transport;
pub mod view;
