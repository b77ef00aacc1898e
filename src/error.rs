use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClickerError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка десктопного бэкенда: {0}")]
    Backend(String),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Неверная конфигурация: {0}")]
    InvalidConfiguration(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl ClickerError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(ClickerError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, ClickerError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! clicker_error {
    (backend, $($arg:tt)*) => {
        $crate::error::ClickerError::Backend(format!($($arg)*))
    };
    (device_not_found, $($arg:tt)*) => {
        $crate::error::ClickerError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::ClickerError::Permission(format!($($arg)*))
    };
    (invalid_configuration, $($arg:tt)*) => {
        $crate::error::ClickerError::InvalidConfiguration(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::ClickerError::Internal(format!($($arg)*))
    };
}
