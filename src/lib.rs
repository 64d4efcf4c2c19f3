//! # focuswarden
//!
//! Enforces focus sessions timed by a small microcontroller. While a session
//! runs, every newly focused window title is sent to a remote classifier;
//! distractions close the window, buzz the device and escalate from session
//! extensions to a candy lock and a failed session. Unplugging the device
//! mid-session counts as cheating and alerts a guardian by email.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use focuswarden::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod libs;
