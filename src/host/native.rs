use crate::error::{Result, WabError};
use crate::events::TabRecord;
use crate::services::{InstallGuard, WindowGuard};
use crate::wab_error;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tracing::{error, info, warn};

use super::protocol::{self, IncomingMessage, OutgoingMessage};
use super::r#trait::{HostListenerTrait, ManagementApi, WindowApi};

/// Полезная нагрузка ответа хоста на одну команду
#[derive(Debug)]
pub struct ReplyPayload {
    pub error: Option<String>,
    pub tabs: Option<Vec<TabRecord>>,
}

/// Исходящая сторона native messaging порта: пишет команды в stdout
/// и сопоставляет ответы по request_id.
pub struct NativeLink {
    stdout: Mutex<tokio::io::Stdout>,
    pending: DashMap<u64, oneshot::Sender<ReplyPayload>>,
    next_request_id: AtomicU64,
}

impl NativeLink {
    pub fn new() -> Self {
        Self {
            stdout: Mutex::new(tokio::io::stdout()),
            pending: DashMap::new(),
            next_request_id: AtomicU64::new(1),
        }
    }

    /// Одна команда хосту: записать кадр и дождаться ответа.
    /// Таймаутов нет - зависший вызов оставляет в ожидании только свою цепочку.
    async fn call(&self, build: impl FnOnce(u64) -> OutgoingMessage) -> Result<ReplyPayload> {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.insert(request_id, tx);

        let message = build(request_id);
        {
            let mut stdout = self.stdout.lock().await;
            if let Err(e) = protocol::write_message(&mut *stdout, &message).await {
                self.pending.remove(&request_id);
                return Err(e);
            }
        }

        let payload = rx
            .await
            .map_err(|_| wab_error!(host_unavailable, "канал ответа закрыт"))?;

        if let Some(message) = payload.error {
            return Err(WabError::Host(message));
        }

        Ok(payload)
    }

    /// Завершить ожидающий вызов ответом хоста
    pub fn complete(&self, request_id: u64, payload: ReplyPayload) {
        match self.pending.remove(&request_id) {
            Some((_, tx)) => {
                // Вызов мог быть отброшен - тогда ответ никому не нужен
                let _ = tx.send(payload);
            }
            None => warn!("Ответ хоста на неизвестный request_id {}", request_id),
        }
    }
}

#[async_trait::async_trait]
impl ManagementApi for NativeLink {
    async fn uninstall(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.call(|request_id| OutgoingMessage::Uninstall {
            request_id,
            id,
            show_confirm_dialog: false,
        })
        .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl WindowApi for NativeLink {
    async fn query_tabs(&self, window_id: i64) -> Result<Vec<TabRecord>> {
        let payload = self
            .call(|request_id| OutgoingMessage::QueryTabs {
                request_id,
                window_id,
            })
            .await?;
        Ok(payload.tabs.unwrap_or_default())
    }

    async fn close_window(&self, window_id: i64) -> Result<()> {
        self.call(|request_id| OutgoingMessage::CloseWindow {
            request_id,
            window_id,
        })
        .await?;
        Ok(())
    }

    async fn create_tab(&self, url: &str) -> Result<()> {
        let url = url.to_string();
        self.call(|request_id| OutgoingMessage::CreateTab { request_id, url })
            .await?;
        Ok(())
    }
}

/// Входящая сторона порта: читает кадры из stdin и раздаёт их
/// guard'ам и ожидающим вызовам.
pub struct NativeListener {
    link: Arc<NativeLink>,
    install_guard: Arc<InstallGuard>,
    window_guard: Arc<WindowGuard>,
}

impl NativeListener {
    pub fn new(
        link: Arc<NativeLink>,
        install_guard: Arc<InstallGuard>,
        window_guard: Arc<WindowGuard>,
    ) -> Self {
        Self {
            link,
            install_guard,
            window_guard,
        }
    }

    pub async fn run(self) -> Result<()> {
        info!("NativeListener запущен: читаем события хоста из stdin");

        let mut stdin = tokio::io::stdin();

        loop {
            let message = match protocol::read_message(&mut stdin).await {
                Ok(Some(message)) => message,
                Ok(None) => {
                    info!("Хост закрыл порт (EOF), завершаем приём событий");
                    return Ok(());
                }
                // Кадр считан целиком, но тело не разобралось - поток не сбит
                Err(WabError::Protocol(e)) => {
                    warn!("Пропускаем нечитаемое сообщение хоста: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            match message {
                IncomingMessage::AppInstalled { app } => {
                    // Независимая цепочка на каждое событие
                    let guard = Arc::clone(&self.install_guard);
                    tokio::spawn(async move {
                        if let Err(e) = guard.handle_event(&app).await {
                            error!("Ошибка обработки события установки: {}", e);
                        }
                    });
                }
                IncomingMessage::WindowCreated { window } => {
                    let guard = Arc::clone(&self.window_guard);
                    tokio::spawn(async move {
                        if let Err(e) = guard.handle_event(&window).await {
                            error!("Ошибка обработки события окна: {}", e);
                        }
                    });
                }
                IncomingMessage::Reply {
                    request_id,
                    error,
                    tabs,
                } => {
                    self.link.complete(request_id, ReplyPayload { error, tabs });
                }
            }
        }
    }
}

impl Drop for NativeListener {
    fn drop(&mut self) {
        info!("NativeListener завершает работу");
    }
}

#[async_trait::async_trait]
impl HostListenerTrait for NativeListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run().await
    }
}
