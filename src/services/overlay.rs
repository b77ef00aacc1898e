use eframe::egui;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Сколько ждать установки позиции перед тем, как отказаться от создания
const POSITION_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Радиус точки и размах перекрестья внутри маркера
const DOT_RADIUS: f32 = 8.0;
const CROSS_SIZE: f32 = 12.0;

enum OverlayCommand {
    Move(i32, i32),
    Close,
}

struct OverlayShared {
    position: Mutex<Option<(i32, i32)>>,
    position_ready: Condvar,
    active: AtomicBool,
}

/// Визуальный индикатор точки клика: маленькое квадратное окно без рамки,
/// поверх всех окон, прозрачное для мыши, с красной точкой и перекрестьем.
///
/// Окно маркера живёт на собственном UI-потоке (ограничение GUI-тулкита);
/// все манипуляции с других путей исполнения маршалятся в него через канал
/// команд и никогда не трогают окно напрямую.
pub struct Overlay {
    size_px: u32,
    shared: Arc<OverlayShared>,
    command_tx: Mutex<Option<Sender<OverlayCommand>>>,
}

impl Overlay {
    pub fn new(size_px: u32) -> Self {
        Self {
            size_px,
            shared: Arc::new(OverlayShared {
                position: Mutex::new(None),
                position_ready: Condvar::new(),
                active: AtomicBool::new(false),
            }),
            command_tx: Mutex::new(None),
        }
    }

    /// Записать целевую точку и разбудить create(). Можно вызывать до
    /// того, как окно маркера существует
    pub fn set_position(&self, x: i32, y: i32) {
        *self.shared.position.lock() = Some((x, y));
        self.shared.position_ready.notify_all();
    }

    /// Создать окно маркера, дождавшись позиции (с ограниченным таймаутом).
    /// Если позиция так и не пришла, создание молча отменяется - вызывающий
    /// проверяет is_created()
    pub fn create(&self) {
        self.create_with_timeout(POSITION_WAIT_TIMEOUT)
    }

    pub fn create_with_timeout(&self, timeout: Duration) {
        if self.shared.active.load(Ordering::SeqCst) {
            debug!("Оверлей уже создан");
            return;
        }

        let deadline = Instant::now() + timeout;
        let (x, y) = {
            let mut position = self.shared.position.lock();
            while position.is_none() {
                if self
                    .shared
                    .position_ready
                    .wait_until(&mut position, deadline)
                    .timed_out()
                {
                    break;
                }
            }

            match *position {
                Some(point) => point,
                None => {
                    warn!(
                        "Оверлей не создан: позиция не установлена за {:?}",
                        timeout
                    );
                    return;
                }
            }
        };

        let (tx, rx) = channel();
        *self.command_tx.lock() = Some(tx);
        self.shared.active.store(true, Ordering::SeqCst);

        let shared = self.shared.clone();
        let size_px = self.size_px;
        let spawned = std::thread::Builder::new()
            .name("overlay-ui".to_string())
            .spawn(move || {
                run_overlay_window(x, y, size_px, rx, shared.clone());
                // Цикл eframe завершился - окна больше нет
                shared.active.store(false, Ordering::SeqCst);
            });

        if let Err(e) = spawned {
            warn!("Не удалось запустить UI-поток оверлея: {}", e);
            self.abandon_creation();
            return;
        }

        info!("🎯 Оверлей создан в точке ({}, {})", x, y);
    }

    /// Откат неудавшегося создания: is_created() снова false, канал команд
    /// убран, update_position возвращается к no-op
    fn abandon_creation(&self) {
        self.shared.active.store(false, Ordering::SeqCst);
        self.command_tx.lock().take();
    }

    pub fn is_created(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Переместить маркер на новую точку. No-op (не ошибка), если окно
    /// ещё не создано или уже закрыто
    pub fn update_position(&self, x: i32, y: i32) {
        if !self.shared.active.load(Ordering::SeqCst) {
            return;
        }

        *self.shared.position.lock() = Some((x, y));
        if let Some(tx) = &*self.command_tx.lock() {
            // UI-поток мог уже выйти - глотаем ошибку отправки
            let _ = tx.send(OverlayCommand::Move(x, y));
        }
    }

    /// Идемпотентное закрытие: помечает оверлей неактивным и просит
    /// UI-поток уничтожить окно, глотая любые ошибки
    pub fn close(&self) {
        self.shared.active.store(false, Ordering::SeqCst);
        if let Some(tx) = self.command_tx.lock().take() {
            let _ = tx.send(OverlayCommand::Close);
            debug!("Оверлей закрыт");
        }
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        self.close();
    }
}

/// Тело UI-потока: цикл eframe с прозрачным окном маркера
fn run_overlay_window(
    x: i32,
    y: i32,
    size_px: u32,
    rx: Receiver<OverlayCommand>,
    shared: Arc<OverlayShared>,
) {
    let size = size_px as f32;
    let half = size / 2.0;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([size, size])
            .with_position([x as f32 - half, y as f32 - half])
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_mouse_passthrough(true)
            .with_resizable(false)
            .with_taskbar(false),
        // Окно живёт не на главном потоке - на X11 это допустимо
        event_loop_builder: Some(Box::new(|builder| {
            #[cfg(target_os = "linux")]
            {
                use winit::platform::x11::EventLoopBuilderExtX11;
                builder.with_any_thread(true);
            }
        })),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Click Overlay",
        options,
        Box::new(move |_cc| Box::new(OverlayApp { size, rx, shared })),
    );

    if let Err(e) = result {
        warn!("UI-поток оверлея завершился с ошибкой: {}", e);
    }
}

struct OverlayApp {
    size: f32,
    rx: Receiver<OverlayCommand>,
    shared: Arc<OverlayShared>,
}

impl eframe::App for OverlayApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Забираем накопившиеся команды с других путей исполнения
        while let Ok(command) = self.rx.try_recv() {
            match command {
                OverlayCommand::Move(x, y) => {
                    let half = self.size / 2.0;
                    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
                        x as f32 - half,
                        y as f32 - half,
                    )));
                }
                OverlayCommand::Close => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
        }

        if !self.shared.active.load(Ordering::SeqCst) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::TRANSPARENT))
            .show(ctx, |ui| {
                let painter = ui.painter();
                let center = egui::pos2(self.size / 2.0, self.size / 2.0);
                let stroke = egui::Stroke::new(2.0, egui::Color32::YELLOW);

                // Красная точка с жёлтой обводкой и перекрестьем
                painter.circle_filled(center, DOT_RADIUS, egui::Color32::RED);
                painter.circle_stroke(center, DOT_RADIUS, stroke);
                painter.line_segment(
                    [
                        egui::pos2(center.x - CROSS_SIZE, center.y),
                        egui::pos2(center.x + CROSS_SIZE, center.y),
                    ],
                    stroke,
                );
                painter.line_segment(
                    [
                        egui::pos2(center.x, center.y - CROSS_SIZE),
                        egui::pos2(center.x, center.y + CROSS_SIZE),
                    ],
                    stroke,
                );
            });

        // Периодическая перерисовка, чтобы канал команд опрашивался
        // даже без событий окна
        ctx.request_repaint_after(Duration::from_millis(50));
    }
}
