use crate::config::Config;
use crate::error::{ClickerError, Result};
use crate::services::SessionController;
use crate::utils::DeviceFinder;
use evdev::{Device, EventType};
use std::sync::Arc;
use tracing::{error, info};

/// Мониторинг стоп-клавиши: отдельный путь исполнения, который читает
/// события клавиатуры и по нажатию назначенной клавиши останавливает
/// запущенную сессию.
///
/// Устройство не захватывается эксклюзивно - мы только наблюдаем,
/// клавиша продолжает доходить до остальной системы.
pub struct StopKeyMonitor {
    controller: Arc<SessionController>,
    key_name: String,
    stop_code: u16,
    device_path: String,
    dry_run: bool,
}

impl StopKeyMonitor {
    pub fn new(config: &Config, controller: Arc<SessionController>, dry_run: bool) -> Result<Self> {
        let key_name = config.hotkey.stop_key.clone();
        let stop_code = crate::utils::key_names::key_code_by_name(&key_name).ok_or_else(|| {
            ClickerError::InvalidConfiguration(format!("Неизвестная стоп-клавиша: {}", key_name))
        })?;

        Ok(Self {
            controller,
            key_name,
            stop_code,
            device_path: config.hotkey.device_path.clone(),
            dry_run,
        })
    }

    pub async fn run(self) -> Result<()> {
        if self.dry_run {
            info!("[DRY RUN] Мониторинг стоп-клавиши отключён");
            return Ok(());
        }

        let device_path = DeviceFinder::find_keyboard_device(&self.device_path)?;
        let mut device = Device::open(&device_path).map_err(|e| {
            ClickerError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        info!(
            "Мониторинг стоп-клавиши {} запущен на {:?} ({})",
            self.key_name.to_uppercase(),
            device_path,
            device.name().unwrap_or("Unknown")
        );

        loop {
            let events = match device.fetch_events() {
                Ok(events) => events.collect::<Vec<_>>(),
                Err(e) => {
                    error!("Ошибка чтения событий клавиатуры: {}", e);
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    continue;
                }
            };

            for event in events {
                // value == 1: нажатие (0 - отпускание, 2 - автоповтор)
                if event.event_type() == EventType::KEY
                    && event.code() == self.stop_code
                    && event.value() == 1
                {
                    info!("⌨️ Нажата стоп-клавиша {}", self.key_name.to_uppercase());
                    self.controller.stop_session();
                }
            }

            // Небольшая задержка для предотвращения 100% загрузки CPU
            tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
        }
    }
}
