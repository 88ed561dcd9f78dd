use anyhow::Result;
use clap::Parser;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

mod config;
mod error;
mod events;
mod i18n;
mod services;
mod utils;

use config::Settings;
use events::TriggerOrigin;
use services::hotkey::ModifierState;
use services::{
    create_focus_probe, create_hotkey_listener, PasteController, PasteEngine, VirtualKeyboard,
};

#[derive(Parser, Debug)]
#[command(name = "forcepaste-rust")]
#[command(about = "Утилита для принудительной вставки: печатает буфер обмена посимвольной эмуляцией клавиатуры")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "paste_config.json")]
    config: String,

    /// Путь к клавиатурному устройству ("auto" - автопоиск)
    #[arg(long, default_value = "auto")]
    device: String,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Записать текущую (слитую) конфигурацию в файл и выйти
    #[arg(long)]
    write_config: bool,

    /// Уровень логирования
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level)?;

    info!("Запуск ForcePaste v{}", env!("CARGO_PKG_VERSION"));

    let settings = Arc::new(Settings::load(&args.config));
    info!("Конфигурация загружена из: {}", args.config);

    if args.write_config {
        if let Err(e) = settings.save(&args.config) {
            let lang = i18n::Lang::from_tag(&settings.language);
            error!("{}: {}", i18n::tr("err_save", lang), e);
            return Err(e);
        }
        info!("Конфигурация сохранена в: {}", args.config);
        return Ok(());
    }

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    }

    // Проверка прав доступа: без /dev/input и /dev/uinput движок не работает
    utils::permissions::check_permissions()?;

    // Инициализация компонентов
    let keyboard = VirtualKeyboard::new("ForcePaste Virtual Keyboard", args.dry_run)?;
    let probe = create_focus_probe(args.dry_run)?;
    let modifier_state = Arc::new(RwLock::new(ModifierState::new()));
    let engine = Arc::new(PasteEngine::new(
        settings.clone(),
        Box::new(keyboard),
        probe,
        modifier_state.clone(),
    ));
    let controller = Arc::new(PasteController::new(settings.clone(), engine));

    let hotkey_listener = create_hotkey_listener(
        settings.clone(),
        controller.clone(),
        modifier_state.clone(),
        &args.device,
        args.dry_run,
    )?;

    info!("Все компоненты инициализированы");

    let hotkey_handle = tokio::spawn(async move {
        if let Err(e) = hotkey_listener.run().await {
            error!("Ошибка в HotkeyListener: {}", e);
        }
    });

    // Ручной триггер: SIGUSR1 играет роль кнопки запуска/остановки
    let manual_controller = controller.clone();
    let manual_handle = tokio::spawn(async move {
        let mut stream = match signal::unix::signal(signal::unix::SignalKind::user_defined1()) {
            Ok(stream) => stream,
            Err(e) => {
                error!("Не удалось подписаться на SIGUSR1: {}", e);
                return;
            }
        };

        while stream.recv().await.is_some() {
            info!("Получен SIGUSR1 - ручной запуск/остановка");
            manual_controller.handle_trigger(TriggerOrigin::Button);
        }
    });

    info!(
        "Все сервисы запущены (ручной триггер: kill -USR1 {})",
        std::process::id()
    );

    // Ожидание сигнала завершения
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Получен сигнал завершения (Ctrl+C)");
        }
        Err(err) => {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
        }
    }

    info!("Завершение работы...");

    // Отменяем активную сессию и дожидаемся её рабочего потока
    controller.shutdown();

    // Прерываем задачи сервисов
    hotkey_handle.abort();
    manual_handle.abort();

    // Ожидаем завершения задач (с таймаутом)
    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = hotkey_handle.await;
        let _ = manual_handle.await;
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    info!("ForcePaste завершил работу");
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
