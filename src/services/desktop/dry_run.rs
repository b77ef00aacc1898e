use crate::error::{ClickerError, Result};
use crate::types::{WindowGeometry, WindowHandle, WindowInfo};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use super::r#trait::DesktopBackend;

/// Эмулированный десктоп для dry-run режима и тестов: держит список
/// "видимых" окон в памяти и считает отправленные клики вместо реальных
pub struct DryRunBackend {
    windows: RwLock<Vec<WindowInfo>>,
    geometry: RwLock<WindowGeometry>,
    clicks_sent: AtomicU64,
    last_click: Mutex<Option<(WindowHandle, i32, i32)>>,
}

impl DryRunBackend {
    pub fn new() -> Self {
        let fake_windows = vec![
            WindowInfo::new(WindowHandle(0x100), "Steam".to_string()),
            WindowInfo::new(WindowHandle(0x200), "Terminal - dry_run".to_string()),
            WindowInfo::new(
                WindowHandle(0x300),
                "245 cookies - Cookie Clicker".to_string(),
            ),
        ];
        Self::with_windows(fake_windows)
    }

    pub fn with_windows(windows: Vec<WindowInfo>) -> Self {
        Self {
            windows: RwLock::new(windows),
            geometry: RwLock::new(WindowGeometry {
                x: 100,
                y: 50,
                width: 1000,
                height: 800,
            }),
            clicks_sent: AtomicU64::new(0),
            last_click: Mutex::new(None),
        }
    }

    pub fn set_geometry(&self, geometry: WindowGeometry) {
        *self.geometry.write() = geometry;
    }

    pub fn clicks_sent(&self) -> u64 {
        self.clicks_sent.load(Ordering::Relaxed)
    }

    pub fn last_click(&self) -> Option<(WindowHandle, i32, i32)> {
        *self.last_click.lock()
    }

    fn known_window(&self, handle: WindowHandle) -> bool {
        self.windows.read().iter().any(|w| w.handle == handle)
    }
}

impl Default for DryRunBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopBackend for DryRunBackend {
    fn test(&self) -> Result<()> {
        Ok(())
    }

    fn list_windows(&self) -> Result<Vec<WindowInfo>> {
        Ok(self.windows.read().clone())
    }

    fn geometry(&self, handle: WindowHandle) -> Result<WindowGeometry> {
        if !self.known_window(handle) {
            return Err(ClickerError::Backend(format!(
                "Окно {} не существует в эмулированном десктопе",
                handle
            )));
        }
        Ok(*self.geometry.read())
    }

    fn send_click(&self, handle: WindowHandle, x: i32, y: i32) -> Result<()> {
        if !self.known_window(handle) {
            return Err(ClickerError::Backend(format!(
                "Окно {} не существует в эмулированном десктопе",
                handle
            )));
        }

        let count = self.clicks_sent.fetch_add(1, Ordering::Relaxed) + 1;
        *self.last_click.lock() = Some((handle, x, y));
        info!("[DRY RUN] Клик #{} в ({}, {}) окна {}", count, x, y, handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_records_clicks() {
        let backend = DryRunBackend::new();
        let handle = WindowHandle(0x300);

        assert_eq!(backend.clicks_sent(), 0);
        backend.send_click(handle, 150, 312).unwrap();
        backend.send_click(handle, 150, 312).unwrap();

        assert_eq!(backend.clicks_sent(), 2);
        assert_eq!(backend.last_click(), Some((handle, 150, 312)));
    }

    #[test]
    fn test_unknown_window_is_backend_error() {
        let backend = DryRunBackend::new();
        let stale = WindowHandle(0xdead);

        assert!(backend.send_click(stale, 0, 0).is_err());
        assert!(backend.geometry(stale).is_err());
    }

    #[test]
    fn test_client_to_screen_adds_origin() {
        let backend = DryRunBackend::new();
        let handle = WindowHandle(0x300);

        // Геометрия по умолчанию: origin (100, 50)
        let (sx, sy) = backend.client_to_screen(handle, 150, 312).unwrap();
        assert_eq!((sx, sy), (250, 362));
    }
}
