use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{WindowEvent, WindowType};
use crate::host::WindowApi;
use std::sync::Arc;
use tracing::{info, warn};

/// URL пустой вкладки - её переоткрывать бессмысленно
const NEW_TAB_URL: &str = "chrome://newtab/";

/// Привилегированная внутренняя схема - такие URL не переоткрываем
const PRIVILEGED_SCHEME: &str = "chrome://";

/// Реагирует на создание окон: app-окно вне allowlist закрывается,
/// а его URL переоткрывается обычной вкладкой. Конвейер на окно:
/// Created -> фильтр типа -> URL -> allowlist -> close -> reopen.
pub struct WindowGuard {
    config: Arc<Config>,
    windows: Arc<dyn WindowApi>,
}

impl WindowGuard {
    pub fn new(config: Arc<Config>, windows: Arc<dyn WindowApi>) -> Self {
        Self { config, windows }
    }

    /// Обработка события создания окна
    pub async fn handle_event(&self, event: &WindowEvent) -> Result<()> {
        debug_if_enabled!("Обработка события окна: {}", event);

        // Popup и прочие типы не трогаем: их используют легитимные
        // auth/embed-потоки
        if event.window_type != WindowType::App {
            debug_if_enabled!("Игнорируем {}: тип не app", event);
            return Ok(());
        }

        let url = match self.resolve_url(event.id).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                debug_if_enabled!("В окне #{} нет вкладок - ничего не делаем", event.id);
                return Ok(());
            }
            Err(e) => {
                warn!("Не удалось запросить вкладки окна #{}: {}", event.id, e);
                return Ok(());
            }
        };

        if self.config.is_allowlisted(&url) {
            info!("Окно #{} разрешено allowlist'ом: {}", event.id, url);
            return Ok(());
        }

        info!(
            "Закрываем app-окно #{} (url: {})",
            event.id,
            if url.is_empty() { "<нет>" } else { url.as_str() }
        );

        if let Err(e) = self.windows.close_window(event.id).await {
            warn!("Не удалось закрыть окно #{}: {}", event.id, e);
            return Ok(());
        }

        if url.is_empty() || url == NEW_TAB_URL || url.starts_with(PRIVILEGED_SCHEME) {
            debug_if_enabled!("URL '{}' не переоткрываем", url);
            return Ok(());
        }

        match self.windows.create_tab(&url).await {
            Ok(()) => info!(
                "Содержимое окна #{} переоткрыто обычной вкладкой: {}",
                event.id, url
            ),
            Err(e) => warn!("Не удалось открыть вкладку {}: {}", url, e),
        }

        Ok(())
    }

    /// URL первой вкладки окна: обычный, либо pending, пока навигация
    /// не завершилась. None - в окне нет вкладок; пустая строка -
    /// вкладка есть, но URL у неё отсутствует.
    async fn resolve_url(&self, window_id: i64) -> Result<Option<String>> {
        let tabs = self.windows.query_tabs(window_id).await?;

        let Some(first) = tabs.first() else {
            return Ok(None);
        };

        Ok(Some(first.effective_url().unwrap_or_default().to_string()))
    }
}
