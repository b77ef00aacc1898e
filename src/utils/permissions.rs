use crate::clicker_error;
use crate::error::Result;
use std::fs;
use tracing::{info, warn};

/// Проверить окружение перед запуском: X11-дисплей обязателен,
/// доступ к /dev/input нужен только для стоп-клавиши
pub fn check_permissions() -> Result<()> {
    info!("Проверка окружения...");

    check_display()?;
    check_input_devices_access();
    check_not_root();

    info!("Проверка окружения завершена успешно");
    Ok(())
}

fn check_display() -> Result<()> {
    // Без X11 ни перечисление окон, ни клики, ни оверлей не работают
    match std::env::var("DISPLAY") {
        Ok(display_var) if !display_var.is_empty() => {
            info!("X11 дисплей: {}", display_var);
            Ok(())
        }
        _ => Err(clicker_error!(
            permission,
            "Переменная DISPLAY не установлена - требуется X11 сессия"
        )),
    }
}

fn check_input_devices_access() {
    // Не критично: без доступа не будет стоп-клавиши, но Ctrl+C остаётся
    match fs::read_dir("/dev/input") {
        Ok(_) => {
            info!("Доступ к /dev/input подтверждён");
        }
        Err(e) => {
            warn!("Нет доступа к /dev/input: {}", e);
            warn!("Стоп-клавиша будет недоступна. Для её включения:");
            warn!("  sudo usermod -a -G input $USER");
            warn!("  (затем перезайдите в систему)");
        }
    }
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("⚠️  Приложение запущено от имени root!");
            warn!("   Рекомендуется добавить пользователя в группу 'input'");
            warn!("   и запускать приложение от имени обычного пользователя");
        }
        Ok(user) => {
            info!("Приложение запущено от имени пользователя: {}", user);
        }
        Err(_) => {
            warn!("Не удалось определить пользователя");
        }
    }
}
