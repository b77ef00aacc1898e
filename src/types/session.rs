use std::fmt;

/// Состояние сессии автокликера. Владеет им исключительно SessionController
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Locating,
    Running,
    Stopping,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Idle => "остановлен",
            SessionState::Locating => "поиск окна",
            SessionState::Running => "работает",
            SessionState::Stopping => "останавливается",
        };
        write!(f, "{}", label)
    }
}

/// Результат запуска сессии
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    WindowNotFound,
}

/// Явный объект конфигурации сессии вместо глобальных переменных.
///
/// Владелец - SessionController; ClickEngine получает его по Arc при
/// создании и перечитывает при каждом update_position/update_rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickSettings {
    /// Кликов в секунду, всегда >= 1 (валидируется на границе)
    pub cps: u32,
    /// Доли клиентской области окна в [0, 1]
    pub relative_x: f64,
    pub relative_y: f64,
}

impl ClickSettings {
    pub fn new(cps: u32, relative_x: f64, relative_y: f64) -> Self {
        Self {
            cps,
            relative_x,
            relative_y,
        }
    }

    /// Интервал между кликами: обратная величина скорости
    pub fn click_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.cps as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_delay_is_inverse_of_rate() {
        let settings = ClickSettings::new(15, 0.15, 0.39);
        let delay = settings.click_delay().as_secs_f64();
        assert!((delay - 1.0 / 15.0).abs() < 1e-9);
        assert!((delay - 0.0667).abs() < 1e-3);

        let settings = ClickSettings::new(1, 0.5, 0.5);
        assert!((settings.click_delay().as_secs_f64() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_session_state_display() {
        assert_eq!(SessionState::Idle.to_string(), "остановлен");
        assert_eq!(SessionState::Running.to_string(), "работает");
    }
}
