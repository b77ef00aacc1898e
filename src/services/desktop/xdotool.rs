use crate::error::{ClickerError, Result};
use crate::types::{WindowGeometry, WindowHandle, WindowInfo};
use std::process::Command;
use tracing::debug;

use super::r#trait::DesktopBackend;

pub struct XdotoolBackend;

/// Аргументы window-адресованного клика. Событие уходит самому окну через
/// XSendEvent, в общую системную очередь ввода ничего не попадает и
/// физический курсор пользователя не двигается
pub(super) fn click_args(id: &str) -> [&str; 4] {
    ["click", "--window", id, "1"]
}

/// Общая отправка клика для бэкендов: wmctrl кликать не умеет и тоже
/// делегирует сюда
pub(super) fn send_window_click(handle: WindowHandle) -> Result<()> {
    let id = handle.value().to_string();

    let output = Command::new("xdotool")
        .args(click_args(&id))
        .output()
        .map_err(|e| ClickerError::Backend(format!("xdotool не найден: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ClickerError::Backend(format!(
            "xdotool click вернул ошибку для {}: {}",
            handle, stderr
        )));
    }

    Ok(())
}

impl XdotoolBackend {
    pub fn new() -> Self {
        Self
    }

    fn window_name(&self, handle: WindowHandle) -> Result<String> {
        let output = Command::new("xdotool")
            .args(["getwindowname", &handle.value().to_string()])
            .output()
            .map_err(|e| ClickerError::Backend(format!("xdotool не найден: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClickerError::Backend(format!(
                "xdotool getwindowname вернул ошибку для {}: {}",
                handle, stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl DesktopBackend for XdotoolBackend {
    fn test(&self) -> Result<()> {
        let output = Command::new("xdotool").arg("version").output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ClickerError::Backend("xdotool failed".to_string()))
        }
    }

    fn list_windows(&self) -> Result<Vec<WindowInfo>> {
        debug!("Перечисляем видимые окна через xdotool");

        // "." матчит любой непустой заголовок
        let output = Command::new("xdotool")
            .args(["search", "--onlyvisible", "--name", "."])
            .output()
            .map_err(|e| ClickerError::Backend(format!("xdotool не найден: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClickerError::Backend(format!(
                "xdotool search вернул ошибку: {}",
                stderr
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut windows = Vec::new();

        for line in stdout.lines() {
            let Some(handle) = WindowHandle::parse(line) else {
                continue;
            };

            // Окно могло закрыться между search и getwindowname - пропускаем
            match self.window_name(handle) {
                Ok(title) if !title.is_empty() => windows.push(WindowInfo::new(handle, title)),
                Ok(_) => {}
                Err(e) => debug!("Не удалось получить заголовок {}: {}", handle, e),
            }
        }

        debug!("xdotool нашёл {} видимых окон", windows.len());
        Ok(windows)
    }

    fn geometry(&self, handle: WindowHandle) -> Result<WindowGeometry> {
        let output = Command::new("xdotool")
            .args(["getwindowgeometry", "--shell", &handle.value().to_string()])
            .output()
            .map_err(|e| ClickerError::Backend(format!("xdotool не найден: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClickerError::Backend(format!(
                "xdotool getwindowgeometry вернул ошибку для {}: {}",
                handle, stderr
            )));
        }

        // Формат --shell: строки вида X=123, Y=456, WIDTH=800, HEIGHT=600
        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut x = None;
        let mut y = None;
        let mut width = None;
        let mut height = None;

        for line in stdout.lines() {
            if let Some((key, value)) = line.split_once('=') {
                match key {
                    "X" => x = value.trim().parse::<i32>().ok(),
                    "Y" => y = value.trim().parse::<i32>().ok(),
                    "WIDTH" => width = value.trim().parse::<u32>().ok(),
                    "HEIGHT" => height = value.trim().parse::<u32>().ok(),
                    _ => {}
                }
            }
        }

        match (x, y, width, height) {
            (Some(x), Some(y), Some(width), Some(height)) => Ok(WindowGeometry {
                x,
                y,
                width,
                height,
            }),
            _ => Err(ClickerError::Backend(format!(
                "Не удалось разобрать геометрию окна {}: {}",
                handle, stdout
            ))),
        }
    }

    fn send_click(&self, handle: WindowHandle, x: i32, y: i32) -> Result<()> {
        debug!("Клик в ({}, {}) окна {}", x, y, handle);
        send_window_click(handle)
    }
}
