use crate::error::{ClickerError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Поиск клавиатурного устройства для мониторинга стоп-клавиши
pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти подходящее клавиатурное устройство. "auto" включает автопоиск,
    /// иначе путь берётся как есть
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                ClickerError::device_not_found(format!(
                    "Указанное устройство не найдено: {:?}",
                    path
                ))
            };
        }

        // Автопоиск: сначала стабильные имена в by-id, затем перебор event*
        if let Ok(device) = Self::find_by_id() {
            info!("Найдена клавиатура по ID: {:?}", device);
            return Ok(device);
        }

        if let Ok(device) = Self::find_by_event_devices() {
            info!("Найдена клавиатура среди event устройств: {:?}", device);
            return Ok(device);
        }

        ClickerError::device_not_found(
            "Не удалось найти клавиатурное устройство. \
             Убедитесь, что пользователь добавлен в группу 'input'",
        )
    }

    fn find_by_id() -> Result<PathBuf> {
        let by_id_dir = Path::new("/dev/input/by-id");

        if !by_id_dir.exists() {
            return ClickerError::device_not_found("Директория by-id не найдена");
        }

        let entries = fs::read_dir(by_id_dir)
            .map_err(|e| ClickerError::Permission(format!("Нет доступа к /dev/input/by-id: {}", e)))?;

        for entry in entries {
            let path = entry.map_err(ClickerError::Io)?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            // Стабильные имена клавиатур оканчиваются на -event-kbd
            if !name.ends_with("event-kbd") {
                continue;
            }

            if Self::is_keyboard_device(&path)? && Self::is_device_accessible(&path) {
                return Ok(path);
            }
            debug!("Устройство {:?} не подошло или недоступно", path);
        }

        ClickerError::device_not_found("Клавиатурное устройство не найдено в by-id")
    }

    fn find_by_event_devices() -> Result<PathBuf> {
        let entries = fs::read_dir("/dev/input")
            .map_err(|e| ClickerError::Permission(format!("Нет доступа к /dev/input: {}", e)))?;

        let mut event_devices = Vec::new();
        for entry in entries {
            let path = entry.map_err(ClickerError::Io)?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with("event") {
                event_devices.push(path);
            }
        }

        event_devices.sort();

        for device_path in event_devices {
            debug!("Проверяем устройство: {:?}", device_path);
            if Self::is_keyboard_device(&device_path)? && Self::is_device_accessible(&device_path) {
                return Ok(device_path);
            }
        }

        ClickerError::device_not_found("Среди event устройств нет доступной клавиатуры")
    }

    fn is_keyboard_device(device_path: &Path) -> Result<bool> {
        match evdev::Device::open(device_path) {
            Ok(device) => {
                let device_name = device.name().unwrap_or("Unknown").to_lowercase();

                if device_name.contains("mouse")
                    || device_name.contains("touchpad")
                    || device_name.contains("trackpoint")
                {
                    debug!("Исключаем устройство-указатель: {:?}", device_path);
                    return Ok(false);
                }

                // Настоящая клавиатура несёт базовые клавиши и их много
                let has_keys = device.supported_keys().map_or(false, |keys| {
                    keys.contains(evdev::KeyCode::KEY_A)
                        && keys.contains(evdev::KeyCode::KEY_F1)
                        && keys.iter().count() > 20
                });

                if has_keys {
                    debug!("Устройство {:?} подходит как клавиатура", device_path);
                }
                Ok(has_keys)
            }
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                Ok(false)
            }
        }
    }

    fn is_device_accessible(device_path: &Path) -> bool {
        fs::File::open(device_path).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_keyboard_device_with_missing_explicit_path() {
        let result = DeviceFinder::find_keyboard_device("/non/existent/event99");
        assert!(matches!(result, Err(ClickerError::DeviceNotFound(_))));
    }
}
