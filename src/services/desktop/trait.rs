use crate::config::Config;
use crate::error::{ClickerError, Result};
use crate::types::{WindowGeometry, WindowHandle, WindowInfo};
use std::sync::Arc;
use tracing::info;

/// Trait for desktop backends that can run against different window tools
pub trait DesktopBackend: Send + Sync {
    /// Проверить, что бэкенд работоспособен в текущем окружении
    fn test(&self) -> Result<()>;

    /// Перечислить видимые окна верхнего уровня в порядке, определяемом
    /// самим инструментом (порядок перечисления не сортируется)
    fn list_windows(&self) -> Result<Vec<WindowInfo>>;

    /// Геометрия окна в экранных координатах
    fn geometry(&self, handle: WindowHandle) -> Result<WindowGeometry>;

    /// Размер клиентской области окна
    fn client_size(&self, handle: WindowHandle) -> Result<(u32, u32)> {
        let geometry = self.geometry(handle)?;
        Ok((geometry.width, geometry.height))
    }

    /// Перевод клиентских координат в экранные
    fn client_to_screen(&self, handle: WindowHandle, x: i32, y: i32) -> Result<(i32, i32)> {
        let geometry = self.geometry(handle)?;
        Ok((geometry.x + x, geometry.y + y))
    }

    /// Отправить клик (нажатие + отпускание основной кнопки) в точку (x, y)
    /// клиентской области окна, адресованный именно этому окну
    fn send_click(&self, handle: WindowHandle, x: i32, y: i32) -> Result<()>;
}

/// Factory function to create an appropriate desktop backend based on the
/// configuration and the dry_run flag
pub fn create_backend(config: &Config, dry_run: bool) -> Result<Arc<dyn DesktopBackend>> {
    if dry_run {
        info!("Dry-run режим - используем эмулированный десктопный бэкенд");
        return Ok(Arc::new(super::dry_run::DryRunBackend::new()));
    }

    match config.window.backend.as_str() {
        "xdotool" => {
            let backend = super::xdotool::XdotoolBackend::new();
            backend.test()?;
            info!("Используем xdotool");
            Ok(Arc::new(backend))
        }
        "wmctrl" => {
            let backend = super::wmctrl::WmctrlBackend::new();
            backend.test()?;
            info!("Используем wmctrl");
            Ok(Arc::new(backend))
        }
        // "auto": проверяем инструменты по очереди, как при детекции окон
        _ => {
            let xdotool = super::xdotool::XdotoolBackend::new();
            if xdotool.test().is_ok() {
                info!("Используем xdotool");
                return Ok(Arc::new(xdotool));
            }

            let wmctrl = super::wmctrl::WmctrlBackend::new();
            if wmctrl.test().is_ok() {
                info!("Используем wmctrl");
                return Ok(Arc::new(wmctrl));
            }

            Err(ClickerError::Backend(
                "Ни один десктопный бэкенд не работает: установите xdotool или wmctrl".to_string(),
            ))
        }
    }
}
