use crate::error::{ClickerError, Result};
use crate::types::{WindowGeometry, WindowHandle, WindowInfo};
use std::process::Command;
use tracing::debug;

use super::r#trait::DesktopBackend;

pub struct WmctrlBackend;

impl WmctrlBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DesktopBackend for WmctrlBackend {
    fn test(&self) -> Result<()> {
        let output = Command::new("wmctrl").args(["-l"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ClickerError::Backend("wmctrl failed".to_string()))
        }
    }

    fn list_windows(&self) -> Result<Vec<WindowInfo>> {
        debug!("Перечисляем видимые окна через wmctrl");

        let output = Command::new("wmctrl")
            .args(["-l"])
            .output()
            .map_err(|e| ClickerError::Backend(format!("wmctrl не найден: {}", e)))?;

        if !output.status.success() {
            return Err(ClickerError::Backend("wmctrl вернул ошибку".to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut windows = Vec::new();

        // Формат: <id> <desktop> <host> <title...>
        for line in stdout.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() > 3 {
                if let Some(handle) = WindowHandle::parse(parts[0]) {
                    let title = parts[3..].join(" ");
                    if !title.is_empty() {
                        windows.push(WindowInfo::new(handle, title));
                    }
                }
            }
        }

        debug!("wmctrl нашёл {} окон", windows.len());
        Ok(windows)
    }

    fn geometry(&self, handle: WindowHandle) -> Result<WindowGeometry> {
        let output = Command::new("wmctrl")
            .args(["-l", "-G"])
            .output()
            .map_err(|e| ClickerError::Backend(format!("wmctrl не найден: {}", e)))?;

        if !output.status.success() {
            return Err(ClickerError::Backend("wmctrl вернул ошибку".to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);

        // Формат -G: <id> <desktop> <x> <y> <width> <height> <host> <title...>
        for line in stdout.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() > 6 && WindowHandle::parse(parts[0]) == Some(handle) {
                let parsed = (
                    parts[2].parse::<i32>(),
                    parts[3].parse::<i32>(),
                    parts[4].parse::<u32>(),
                    parts[5].parse::<u32>(),
                );
                if let (Ok(x), Ok(y), Ok(width), Ok(height)) = parsed {
                    return Ok(WindowGeometry {
                        x,
                        y,
                        width,
                        height,
                    });
                }
            }
        }

        Err(ClickerError::Backend(format!(
            "Окно {} не найдено в выводе wmctrl - возможно, уже закрыто",
            handle
        )))
    }

    fn send_click(&self, handle: WindowHandle, x: i32, y: i32) -> Result<()> {
        // wmctrl не умеет отправлять клики - делегируем клик xdotool,
        // оставляя wmctrl перечисление и геометрию
        debug!("Клик в ({}, {}) окна {}", x, y, handle);
        super::xdotool::send_window_click(handle)
    }
}
