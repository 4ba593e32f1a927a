pub mod drag;
pub mod session;

pub use drag::DragState;
pub use session::Session;
