//! WindowLocator service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for finding the
//! Cookie Clicker window: enumerating visible windows through the desktop
//! backend, matching their titles against the dynamic title grammar and
//! returning the first match. It MUST NOT contain any click timing, session
//! state or geometry logic. NotFound is a normal outcome (Ok(None)), not an
//! error: the caller aborts the session and reports to the user.

mod locator;
mod title;

pub use self::locator::WindowLocator;
pub use self::title::is_cookie_clicker_title;
