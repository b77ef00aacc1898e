pub mod click_engine;
pub mod desktop;
pub mod overlay;
pub mod session;
pub mod stop_key;
pub mod window_locator;

pub use click_engine::ClickEngine;
pub use session::SessionController;
pub use stop_key::StopKeyMonitor;
