use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

mod config;
mod error;
mod services;
mod types;
mod utils;

use config::Config;
use services::{desktop, SessionController, StopKeyMonitor};
use types::{SessionState, StartOutcome};

#[derive(Parser, Debug)]
#[command(name = "cclicker-rust")]
#[command(about = "Автокликер для Cookie Clicker: клики в окно игры без захвата курсора")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "clicker.toml")]
    config: String,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Запуск без визуального индикатора точки клика
    #[arg(long)]
    no_overlay: bool,

    /// Уровень логирования
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Инициализация системы логирования
    init_tracing(&args.log_level)?;

    info!("Запуск Cookie Clicker автокликера v{}", env!("CARGO_PKG_VERSION"));

    // Загрузка конфигурации
    let mut config = Config::load(&args.config)?;
    info!("Конфигурация загружена из: {}", args.config);

    if args.no_overlay {
        config.overlay.enabled = false;
    }

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    } else {
        // Проверка окружения (X11, доступ к устройствам ввода)
        utils::permissions::check_permissions()?;
    }

    // Инициализация компонентов
    let backend = desktop::create_backend(&config, args.dry_run)?;
    let controller = Arc::new(SessionController::new(&config, backend, args.dry_run));
    let stop_monitor = StopKeyMonitor::new(&config, controller.clone(), args.dry_run)?;

    let monitor_handle = tokio::spawn(async move {
        if let Err(e) = stop_monitor.run().await {
            warn!("Мониторинг стоп-клавиши недоступен: {}", e);
            warn!("Для остановки используйте Ctrl+C");
        }
    });

    info!("💡 Заголовок игры меняется динамически (например, '123 cookies - Cookie Clicker')");

    match controller.start_session()? {
        StartOutcome::Started => {
            info!(
                "Нажмите {} или Ctrl+C для остановки",
                config.hotkey.stop_key.to_uppercase()
            );
        }
        StartOutcome::WindowNotFound => {
            info!("📌 Если игра в полноэкранном режиме, запустите её в оконном режиме без рамки");
            monitor_handle.abort();
            return Ok(());
        }
    }

    // Ждём либо остановки сессии (стоп-клавиша), либо Ctrl+C
    let controller_for_wait = controller.clone();
    let session_finished = async move {
        while controller_for_wait.session_state() != SessionState::Idle {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    };

    tokio::select! {
        _ = session_finished => {
            info!("Сессия завершена");
        }
        result = signal::ctrl_c() => match result {
            Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
            Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
        },
    }

    info!("Завершение работы...");

    // Кооперативная остановка цикла кликов (с таймаутом)
    controller.stop_session();
    monitor_handle.abort();

    let shutdown_timeout = Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        while controller.session_state() != SessionState::Idle {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Автокликер завершил работу корректно"),
        Err(_) => warn!("Таймаут при остановке цикла кликов"),
    }

    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
