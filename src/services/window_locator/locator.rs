use crate::error::Result;
use crate::services::desktop::DesktopBackend;
use crate::types::WindowInfo;
use std::sync::Arc;
use tracing::{info, warn};

use super::title::is_cookie_clicker_title;

pub struct WindowLocator {
    backend: Arc<dyn DesktopBackend>,
}

impl WindowLocator {
    pub fn new(backend: Arc<dyn DesktopBackend>) -> Self {
        Self { backend }
    }

    /// Найти окно Cookie Clicker среди видимых окон.
    ///
    /// Возвращает первое совпадение в порядке перечисления (ничем другим
    /// не сортируется). Ok(None) - окно не найдено, это штатный исход.
    pub fn locate(&self) -> Result<Option<WindowInfo>> {
        let windows = self.backend.list_windows()?;

        let matched = windows
            .iter()
            .find(|w| is_cookie_clicker_title(&w.title))
            .cloned();

        match matched {
            Some(window) => {
                info!("🎮 Игра обнаружена: {}", window);
                Ok(Some(window))
            }
            None => {
                warn!("❌ Окно с паттерном 'X cookies - Cookie Clicker' не найдено");
                self.log_diagnostic_info(&windows);
                Ok(None)
            }
        }
    }

    /// Диагностические списки окон для ручного разбора. Чисто
    /// информационные, на поведение не влияют
    fn log_diagnostic_info(&self, windows: &[WindowInfo]) {
        info!("📌 Окна, которые могут иметь отношение к игре:");
        for window in windows {
            if window.title.to_lowercase().contains("cookie") {
                info!("  - '{}'", window.title);
            }
        }

        info!("🔍 Обнаруженные окна Steam:");
        for window in windows {
            if window.title.to_lowercase().contains("steam") {
                info!("  - '{}'", window.title);
            }
        }
    }
}
