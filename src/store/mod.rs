//! View/edit store of the renderer.
//!
//! [`ViewStore`] owns the active project and the view state around it.
//! Every tree edit goes through an [`EditCommand`] so it can be undone, and
//! every mutation marks a [`ChangeSet`] that the session turns into
//! derived-state broadcasts.

mod changes;
mod command;
mod history;
mod state;
mod view_store;

pub use changes::ChangeSet;
pub use command::EditCommand;
pub use history::History;
pub use state::{AppState, Clipboard, ItemType, View};
pub use view_store::{ViewStore, DEFAULT_HISTORY_LIMIT};
