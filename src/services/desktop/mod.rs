//! Desktop backend service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for talking to the
//! desktop: enumerating visible top-level windows, querying window geometry,
//! converting client coordinates to screen coordinates and dispatching a
//! synthetic click addressed to a concrete window. It MUST NOT contain any
//! business logic related to title matching, click timing or session state.
//! Title matching belongs to the WindowLocator, timing to the ClickEngine.

mod dry_run;
mod r#trait;
mod wmctrl;
mod xdotool;

pub use self::dry_run::DryRunBackend;
pub use self::r#trait::{create_backend, DesktopBackend};
