//! Renderer side: message handlers, their router and the session that wires
//! them to a transport.

mod broadcast;
pub mod handlers;
mod router;
mod session;

use crate::store::ViewStore;

pub use broadcast::derived_messages;
pub use router::RendererRouter;
pub use session::RendererSession;

/// What the renderer's UI layer exposes to handlers.
pub trait UiBridge: Send + Sync {
    /// A text input owns keyboard focus; edit commands must not fire.
    fn has_focused_input(&self) -> bool;
}

/// Everything a renderer handler may touch.
pub struct RendererContext<'a> {
    pub store: &'a mut ViewStore,
    pub app: &'a dyn UiBridge,
}
