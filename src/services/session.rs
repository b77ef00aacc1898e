use crate::config::Config;
use crate::error::{ClickerError, Result};
use crate::services::desktop::DesktopBackend;
use crate::services::overlay::Overlay;
use crate::services::window_locator::WindowLocator;
use crate::services::ClickEngine;
use crate::types::{ClickSettings, SessionState, StartOutcome};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Корневой компонент: владеет жизненным циклом запуск/остановка, собирает
/// найденное окно, движок и оверлей в работающую сессию и проводит живые
/// изменения конфигурации в запущенный движок без перезапуска.
///
/// Состояния: Idle -> Locating -> Running -> Stopping -> Idle.
pub struct SessionController {
    backend: Arc<dyn DesktopBackend>,
    settings: Arc<RwLock<ClickSettings>>,
    overlay_enabled: AtomicBool,
    overlay_size_px: u32,
    dry_run: bool,
    state: Arc<RwLock<SessionState>>,
    active: Arc<RwLock<Option<ActiveSession>>>,
}

struct ActiveSession {
    engine: Arc<ClickEngine>,
    stop_flag: Arc<AtomicBool>,
    overlay: Option<Arc<Overlay>>,
}

impl SessionController {
    pub fn new(config: &Config, backend: Arc<dyn DesktopBackend>, dry_run: bool) -> Self {
        info!("Инициализация SessionController (dry_run: {})", dry_run);

        Self {
            backend,
            settings: Arc::new(RwLock::new(ClickSettings::new(
                config.click.cps,
                config.click.relative_x,
                config.click.relative_y,
            ))),
            overlay_enabled: AtomicBool::new(config.overlay.enabled),
            overlay_size_px: config.overlay.size_px,
            dry_run,
            state: Arc::new(RwLock::new(SessionState::Idle)),
            active: Arc::new(RwLock::new(None)),
        }
    }

    /// Запустить сессию: найти окно, собрать движок и оверлей, отдать цикл
    /// кликов фоновой задаче. Ok(WindowNotFound) - штатный исход, сессия
    /// просто не стартует
    pub fn start_session(&self) -> Result<StartOutcome> {
        {
            let mut state = self.state.write();
            if *state != SessionState::Idle {
                return Err(ClickerError::Internal(format!(
                    "Сессия уже запущена (состояние: {})",
                    *state
                )));
            }
            *state = SessionState::Locating;
        }

        info!("🔍 Ищем окно Cookie Clicker (Steam)...");

        let locator = WindowLocator::new(self.backend.clone());
        let window = match locator.locate() {
            Ok(Some(window)) => window,
            Ok(None) => {
                *self.state.write() = SessionState::Idle;
                info!("❌ Убедитесь, что Cookie Clicker открыт");
                return Ok(StartOutcome::WindowNotFound);
            }
            Err(e) => {
                *self.state.write() = SessionState::Idle;
                return Err(e);
            }
        };

        let stop_flag = Arc::new(AtomicBool::new(false));
        let engine = match ClickEngine::new(
            self.backend.clone(),
            window.handle,
            self.settings.clone(),
            stop_flag.clone(),
        ) {
            Ok(engine) => Arc::new(engine),
            Err(e) => {
                *self.state.write() = SessionState::Idle;
                return Err(e);
            }
        };

        let overlay = self.build_overlay(&engine);

        *self.active.write() = Some(ActiveSession {
            engine: engine.clone(),
            stop_flag,
            overlay,
        });
        *self.state.write() = SessionState::Running;

        info!(
            "🖱️ Автокликер запущен ({} кликов/с)",
            self.settings.read().cps
        );
        info!("💡 Физический курсор остаётся свободным, можно работать дальше");

        // Цикл кликов уходит на фоновый путь исполнения; по его выходу
        // сессия переводится Stopping -> Idle
        let state = self.state.clone();
        let active = self.active.clone();
        tokio::spawn(async move {
            engine.run().await;

            if let Some(session) = active.write().take() {
                if let Some(overlay) = &session.overlay {
                    overlay.close();
                }
            }
            *state.write() = SessionState::Idle;
            info!("⏹️ Автокликер остановлен");
        });

        Ok(StartOutcome::Started)
    }

    fn build_overlay(&self, engine: &ClickEngine) -> Option<Arc<Overlay>> {
        if !self.overlay_enabled.load(Ordering::SeqCst) {
            return None;
        }
        if self.dry_run {
            info!("[DRY RUN] Оверлей не создаётся");
            return None;
        }

        let overlay = Arc::new(Overlay::new(self.overlay_size_px));
        match engine.screen_position() {
            Ok((x, y)) => overlay.set_position(x, y),
            Err(e) => {
                // Без позиции create() отвалится по таймауту сам
                warn!("Не удалось вычислить экранную позицию для оверлея: {}", e);
            }
        }

        overlay.create();
        if overlay.is_created() {
            info!("🎯 Визуальный индикатор активирован");
            Some(overlay)
        } else {
            // Таймаут создания не фатален - работаем без индикатора
            warn!("Продолжаем без визуального индикатора");
            None
        }
    }

    /// Остановить сессию: взводит сигнал отмены и закрывает оверлей.
    /// Кооперативно - цикл выйдет не позже чем через один интервал клика
    pub fn stop_session(&self) {
        {
            let mut state = self.state.write();
            if *state != SessionState::Running {
                debug!("Команда остановки проигнорирована: состояние {}", *state);
                return;
            }
            *state = SessionState::Stopping;
        }

        info!("Останавливаем автокликер...");

        if let Some(session) = &*self.active.read() {
            session.stop_flag.store(true, Ordering::SeqCst);
            if let Some(overlay) = &session.overlay {
                overlay.close();
            }
        }
    }

    /// Сменить скорость кликов на лету. Отвергается на границе при cps < 1
    pub fn set_rate(&self, cps: u32) -> Result<()> {
        if cps < 1 {
            return Err(ClickerError::InvalidConfiguration(format!(
                "Скорость кликов должна быть минимум 1, получено {}",
                cps
            )));
        }

        self.settings.write().cps = cps;

        if let Some(session) = &*self.active.read() {
            session.engine.update_rate();
        }

        Ok(())
    }

    /// Сменить относительную позицию клика на лету. Доли вне [0, 1]
    /// отвергаются здесь и никогда не доходят до движка
    pub fn set_relative_position(&self, x: f64, y: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return Err(ClickerError::InvalidConfiguration(format!(
                "Относительная позиция должна быть в [0, 1], получено ({}, {})",
                x, y
            )));
        }

        {
            let mut settings = self.settings.write();
            settings.relative_x = x;
            settings.relative_y = y;
        }

        // Fire-and-forget: подтверждения от движка и оверлея не ждём
        if let Some(session) = &*self.active.read() {
            if let Err(e) = session.engine.update_position() {
                warn!("Не удалось пересчитать точку клика: {}", e);
                return Ok(());
            }

            if let Some(overlay) = &session.overlay {
                match session.engine.screen_position() {
                    Ok((sx, sy)) => overlay.update_position(sx, sy),
                    Err(e) => error!("Не удалось обновить позицию оверлея: {}", e),
                }
            }
        }

        Ok(())
    }

    /// Включить/выключить индикатор. Вступает в силу при следующем запуске
    pub fn set_indicator_enabled(&self, enabled: bool) {
        self.overlay_enabled.store(enabled, Ordering::SeqCst);
        info!(
            "Индикатор {} (применится при следующем запуске)",
            if enabled { "включён" } else { "выключен" }
        );
    }

    pub fn session_state(&self) -> SessionState {
        *self.state.read()
    }

    /// Экранная позиция текущей цели. Валидна только в состоянии Running
    pub fn screen_position_of_current_target(&self) -> Option<(i32, i32)> {
        if self.session_state() != SessionState::Running {
            return None;
        }

        self.active
            .read()
            .as_ref()
            .and_then(|session| session.engine.screen_position().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::desktop::DryRunBackend;
    use crate::types::{WindowHandle, WindowInfo};
    use std::time::Duration;

    fn controller_with_titles(titles: &[&str]) -> (SessionController, Arc<DryRunBackend>) {
        let windows = titles
            .iter()
            .enumerate()
            .map(|(i, t)| WindowInfo::new(WindowHandle(0x100 + i as u64), t.to_string()))
            .collect();
        let backend = Arc::new(DryRunBackend::with_windows(windows));

        let mut config = Config::default();
        config.click.cps = 100; // быстрые тесты
        let controller = SessionController::new(&config, backend.clone(), true);
        (controller, backend)
    }

    async fn wait_for_state(controller: &SessionController, expected: SessionState) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while controller.session_state() != expected {
            assert!(
                tokio::time::Instant::now() < deadline,
                "не дождались состояния {:?}, текущее {:?}",
                expected,
                controller.session_state()
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn test_window_not_found_returns_to_idle_without_engine() {
        let (controller, backend) = controller_with_titles(&["Some Other Window"]);

        let outcome = controller.start_session().unwrap();
        assert_eq!(outcome, StartOutcome::WindowNotFound);
        assert_eq!(controller.session_state(), SessionState::Idle);
        assert!(controller.active.read().is_none());
        assert_eq!(backend.clicks_sent(), 0);
    }

    #[tokio::test]
    async fn test_full_session_lifecycle() {
        let (controller, backend) =
            controller_with_titles(&["Steam", "245 cookies - Cookie Clicker"]);

        let outcome = controller.start_session().unwrap();
        assert_eq!(outcome, StartOutcome::Started);
        assert_eq!(controller.session_state(), SessionState::Running);

        // Клиентская область 1000x800, доли (0.15, 0.39), origin (100, 50)
        assert_eq!(
            controller.screen_position_of_current_target(),
            Some((250, 362))
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(backend.clicks_sent() >= 1);

        controller.stop_session();
        wait_for_state(&controller, SessionState::Idle).await;
        assert!(controller.active.read().is_none());
        assert_eq!(controller.screen_position_of_current_target(), None);
    }

    #[tokio::test]
    async fn test_double_start_is_rejected() {
        let (controller, _) = controller_with_titles(&["245 cookies - Cookie Clicker"]);

        assert_eq!(controller.start_session().unwrap(), StartOutcome::Started);
        assert!(controller.start_session().is_err());

        controller.stop_session();
        wait_for_state(&controller, SessionState::Idle).await;
    }

    #[tokio::test]
    async fn test_stop_when_idle_is_noop() {
        let (controller, _) = controller_with_titles(&["Some Other Window"]);
        controller.stop_session();
        assert_eq!(controller.session_state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_invalid_configuration_rejected_at_boundary() {
        let (controller, _) = controller_with_titles(&["245 cookies - Cookie Clicker"]);

        assert!(controller.set_rate(0).is_err());
        assert!(controller.set_relative_position(1.5, 0.5).is_err());
        assert!(controller.set_relative_position(0.5, -0.1).is_err());

        // Настройки не изменились
        assert_eq!(controller.settings.read().cps, 100);
        assert_eq!(controller.settings.read().relative_x, 0.15);
    }

    #[tokio::test]
    async fn test_live_reconfiguration_reaches_running_engine() {
        let (controller, _) = controller_with_titles(&["245 cookies - Cookie Clicker"]);
        controller.start_session().unwrap();

        controller.set_relative_position(0.5, 0.5).unwrap();
        // origin (100, 50) + floor(1000*0.5), floor(800*0.5)
        assert_eq!(
            controller.screen_position_of_current_target(),
            Some((600, 450))
        );

        controller.set_rate(200).unwrap();
        assert_eq!(controller.settings.read().cps, 200);

        controller.stop_session();
        wait_for_state(&controller, SessionState::Idle).await;
    }

    #[tokio::test]
    async fn test_setters_work_while_idle() {
        let (controller, _) = controller_with_titles(&["Some Other Window"]);

        controller.set_rate(30).unwrap();
        controller.set_relative_position(0.25, 0.75).unwrap();
        controller.set_indicator_enabled(false);

        assert_eq!(controller.settings.read().cps, 30);
        assert_eq!(controller.settings.read().relative_y, 0.75);
        assert!(!controller.overlay_enabled.load(Ordering::SeqCst));
    }
}
