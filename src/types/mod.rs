pub mod session;
pub mod window;

pub use session::{ClickSettings, SessionState, StartOutcome};
pub use window::{WindowGeometry, WindowHandle, WindowInfo};
