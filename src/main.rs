use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod host;
mod services;
mod utils;

use config::Config;
use host::create_host_listener;

#[derive(Parser, Debug)]
#[command(name = "wab-rust")]
#[command(about = "Фоновый сервис блокировки установки страниц как приложений")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "wab.toml")]
    config: String,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Инициализация системы логирования
    init_tracing(&args.log_level)?;

    info!("Запуск WAB Rust v{}", env!("CARGO_PKG_VERSION"));

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    }

    // Инициализация компонентов: guard'ы создаются фабрикой вместе со связкой к хосту
    let host_listener = create_host_listener(config.clone(), args.dry_run)?;

    info!("Все компоненты инициализированы");

    let mut listener_handle = tokio::spawn(async move {
        if let Err(e) = host_listener.run().await {
            error!("Ошибка в HostListener: {}", e);
        }
    });

    info!("Сервис запущен");

    // Ожидание сигнала завершения или закрытия порта хостом
    tokio::select! {
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }

            info!("Завершение работы...");
            listener_handle.abort();

            let shutdown_timeout = tokio::time::Duration::from_secs(5);
            match tokio::time::timeout(shutdown_timeout, &mut listener_handle).await {
                Ok(_) => info!("Сервис завершил работу корректно"),
                Err(_) => warn!("Таймаут при завершении сервиса"),
            }
        }
        _ = &mut listener_handle => {
            info!("Приём событий завершён (хост закрыл порт)");
        }
    }

    info!("WAB Rust завершил работу");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    // stdout занят кадрами native messaging - логи только в stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    Ok(())
}
