//! Sync core of the Alva design tool.
//!
//! A renderer window and the host process exchange typed [`message`]s over a
//! [`transport`]. The renderer keeps the open project in a [`store`] with
//! undo/redo and broadcasts derived state; the [`host`] answers file, library
//! and OS requests.

pub mod config;
pub mod host;
pub mod logging;
pub mod message;
pub mod model;
pub mod renderer;
pub mod store;
pub mod transport;
