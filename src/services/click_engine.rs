use crate::debug_if_enabled;
use crate::error::Result;
use crate::services::desktop::DesktopBackend;
use crate::types::{ClickSettings, WindowHandle};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Движок кликов: владеет точкой клика и интервалом, крутит цикл
/// "клик -> сон" до взведения сигнала остановки.
///
/// Точка и интервал лежат за одним лёгким RwLock: обновления с пути
/// управления гонятся с чтениями цикла безобидно - максимум один клик
/// уйдёт по только что устаревшей позиции или задержке. Сигнал остановки -
/// атомарный флаг, единственное поле с настоящими гарантиями видимости
/// между путями исполнения.
pub struct ClickEngine {
    backend: Arc<dyn DesktopBackend>,
    handle: WindowHandle,
    settings: Arc<RwLock<ClickSettings>>,
    stop_flag: Arc<AtomicBool>,
    state: RwLock<EngineState>,
}

#[derive(Debug, Clone, Copy)]
struct EngineState {
    click_x: i32,
    click_y: i32,
    delay: Duration,
}

impl ClickEngine {
    pub fn new(
        backend: Arc<dyn DesktopBackend>,
        handle: WindowHandle,
        settings: Arc<RwLock<ClickSettings>>,
        stop_flag: Arc<AtomicBool>,
    ) -> Result<Self> {
        let current = *settings.read();
        let (click_x, click_y) = Self::compute_click_point(backend.as_ref(), handle, &current)?;

        info!(
            "ClickEngine создан для окна {}: точка ({}, {}), {} кликов/с",
            handle, click_x, click_y, current.cps
        );

        Ok(Self {
            backend,
            handle,
            settings,
            stop_flag,
            state: RwLock::new(EngineState {
                click_x,
                click_y,
                delay: current.click_delay(),
            }),
        })
    }

    /// Точка клика из размера клиентской области и относительных долей.
    /// Усечение, не округление: floor(W*rx), floor(H*ry)
    fn compute_click_point(
        backend: &dyn DesktopBackend,
        handle: WindowHandle,
        settings: &ClickSettings,
    ) -> Result<(i32, i32)> {
        let (width, height) = backend.client_size(handle)?;
        let x = (width as f64 * settings.relative_x) as i32;
        let y = (height as f64 * settings.relative_y) as i32;
        Ok((x, y))
    }

    /// Пересчитать точку клика из текущего размера окна и текущих долей.
    /// Можно вызывать во время работы цикла на другом пути исполнения
    pub fn update_position(&self) -> Result<()> {
        let current = *self.settings.read();
        let (x, y) = Self::compute_click_point(self.backend.as_ref(), self.handle, &current)?;

        let mut state = self.state.write();
        state.click_x = x;
        state.click_y = y;
        debug_if_enabled!("Точка клика обновлена: ({}, {})", x, y);
        Ok(())
    }

    /// Пересчитать интервал из текущей скорости. Вступает в силу на
    /// следующей итерации цикла, уже идущее ожидание не прерывается
    pub fn update_rate(&self) {
        let delay = self.settings.read().click_delay();
        self.state.write().delay = delay;
        debug_if_enabled!("Интервал между кликами обновлён: {:?}", delay);
    }

    /// Текущая точка клика в клиентских координатах
    pub fn click_point(&self) -> (i32, i32) {
        let state = self.state.read();
        (state.click_x, state.click_y)
    }

    /// Текущая точка клика в экранных координатах - для оверлея
    pub fn screen_position(&self) -> Result<(i32, i32)> {
        let (x, y) = self.click_point();
        self.backend.client_to_screen(self.handle, x, y)
    }

    /// Отправить один клик (нажатие + отпускание) в текущую точку,
    /// адресованный целевому окну
    pub fn send_click(&self) -> Result<()> {
        let (x, y) = self.click_point();
        self.backend.send_click(self.handle, x, y)
    }

    /// Основной цикл: клик, затем сон. Сигнал остановки проверяется между
    /// итерациями, так что худшая задержка остановки - один интервал
    pub async fn run(&self) {
        info!("Цикл автокликера запущен для окна {}", self.handle);

        let mut clicks = 0u64;
        while !self.stop_flag.load(Ordering::SeqCst) {
            clicks += 1;

            if let Err(e) = self.send_click() {
                // Окно могло закрыться: хэндл устарел молча, сами клики
                // просто перестают действовать. Цикл не прерываем -
                // это документированное легаси-поведение
                warn!("Клик #{} не доставлен: {}", clicks, e);
            }

            let delay = self.state.read().delay;
            sleep(delay).await;
        }

        info!("Цикл автокликера завершён после {} кликов", clicks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::desktop::DryRunBackend;
    use crate::types::WindowGeometry;
    use std::time::Duration;

    const COOKIE_WINDOW: WindowHandle = WindowHandle(0x300);

    fn make_engine(cps: u32, rx: f64, ry: f64) -> (Arc<ClickEngine>, Arc<DryRunBackend>, Arc<AtomicBool>) {
        let backend = Arc::new(DryRunBackend::new());
        let settings = Arc::new(RwLock::new(ClickSettings::new(cps, rx, ry)));
        let stop_flag = Arc::new(AtomicBool::new(false));
        let engine = Arc::new(
            ClickEngine::new(
                backend.clone(),
                COOKIE_WINDOW,
                settings,
                stop_flag.clone(),
            )
            .unwrap(),
        );
        (engine, backend, stop_flag)
    }

    #[test]
    fn test_click_point_is_truncated_not_rounded() {
        // Клиентская область по умолчанию 1000x800
        let (engine, _, _) = make_engine(15, 0.15, 0.39);
        assert_eq!(engine.click_point(), (150, 312));

        // 1000 * 0.999 = 999.0, 800 * 0.999 = 799.2 -> усечение до 799
        let (engine, _, _) = make_engine(15, 0.999, 0.999);
        assert_eq!(engine.click_point(), (999, 799));
    }

    #[test]
    fn test_click_point_corners() {
        let (engine, _, _) = make_engine(15, 0.0, 0.0);
        assert_eq!(engine.click_point(), (0, 0));

        let (engine, _, _) = make_engine(15, 1.0, 1.0);
        assert_eq!(engine.click_point(), (1000, 800));
    }

    #[test]
    fn test_update_position_follows_settings_and_resize() {
        let backend = Arc::new(DryRunBackend::new());
        let settings = Arc::new(RwLock::new(ClickSettings::new(15, 0.15, 0.39)));
        let engine = ClickEngine::new(
            backend.clone(),
            COOKIE_WINDOW,
            settings.clone(),
            Arc::new(AtomicBool::new(false)),
        )
        .unwrap();

        // Пользователь сдвинул ползунки
        settings.write().relative_x = 0.5;
        settings.write().relative_y = 0.5;
        engine.update_position().unwrap();
        assert_eq!(engine.click_point(), (500, 400));

        // Окно изменило размер - те же доли, новая точка
        backend.set_geometry(WindowGeometry {
            x: 100,
            y: 50,
            width: 600,
            height: 400,
        });
        engine.update_position().unwrap();
        assert_eq!(engine.click_point(), (300, 200));
    }

    #[test]
    fn test_update_rate_changes_delay() {
        let (engine, _, _) = make_engine(15, 0.15, 0.39);
        assert!((engine.state.read().delay.as_secs_f64() - 1.0 / 15.0).abs() < 1e-9);

        *engine.settings.write() = ClickSettings::new(50, 0.15, 0.39);
        engine.update_rate();
        assert!((engine.state.read().delay.as_secs_f64() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_screen_position_offsets_by_window_origin() {
        // origin (100, 50) + клиентская точка (150, 312)
        let (engine, _, _) = make_engine(15, 0.15, 0.39);
        assert_eq!(engine.screen_position().unwrap(), (250, 362));
    }

    #[test]
    fn test_send_click_targets_current_point() {
        let (engine, backend, _) = make_engine(15, 0.15, 0.39);
        engine.send_click().unwrap();
        assert_eq!(backend.last_click(), Some((COOKIE_WINDOW, 150, 312)));
    }

    #[tokio::test]
    async fn test_run_clicks_until_cancelled() {
        // 100 кликов/с, чтобы тест был быстрым
        let (engine, backend, stop_flag) = make_engine(100, 0.15, 0.39);

        let task = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.run().await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        stop_flag.store(true, Ordering::SeqCst);

        // Цикл обязан выйти не позже чем через один интервал сна
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("цикл не остановился после взведения сигнала")
            .unwrap();

        assert!(backend.clicks_sent() >= 1);
    }

    #[tokio::test]
    async fn test_run_survives_stale_handle() {
        // Окно "закрывается": бэкенд без окон отдаёт ошибку на каждый клик,
        // но цикл продолжает крутиться до явной остановки
        let backend = Arc::new(DryRunBackend::new());
        let settings = Arc::new(RwLock::new(ClickSettings::new(100, 0.15, 0.39)));
        let stop_flag = Arc::new(AtomicBool::new(false));
        let engine = Arc::new(
            ClickEngine::new(backend.clone(), COOKIE_WINDOW, settings, stop_flag.clone()).unwrap(),
        );

        let stale_backend = Arc::new(DryRunBackend::with_windows(Vec::new()));
        let stale_engine = Arc::new(ClickEngine {
            backend: stale_backend,
            handle: COOKIE_WINDOW,
            settings: engine.settings.clone(),
            stop_flag: stop_flag.clone(),
            state: RwLock::new(*engine.state.read()),
        });

        let task = {
            let engine = stale_engine.clone();
            tokio::spawn(async move { engine.run().await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        stop_flag.store(true, Ordering::SeqCst);

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("цикл упал вместо того чтобы пережить устаревший хэндл")
            .unwrap();
    }
}
