use crate::config::Config;
use crate::error::Result;
use crate::events::TabRecord;
use crate::services::{InstallGuard, WindowGuard};
use std::sync::Arc;

/// Management-интерфейс хоста: удаление приложений
#[async_trait::async_trait]
pub trait ManagementApi: Send + Sync {
    /// Запросить удаление приложения по id с подавлением диалога подтверждения
    async fn uninstall(&self, id: &str) -> Result<()>;
}

/// Оконно-вкладочный интерфейс хоста
#[async_trait::async_trait]
pub trait WindowApi: Send + Sync {
    /// Вкладки, принадлежащие окну
    async fn query_tabs(&self, window_id: i64) -> Result<Vec<TabRecord>>;

    /// Закрыть окно по id
    async fn close_window(&self, window_id: i64) -> Result<()>;

    /// Открыть обычную вкладку с указанным URL
    async fn create_tab(&self, url: &str) -> Result<()>;
}

/// Trait for host listeners that can run in different modes
#[async_trait::async_trait]
pub trait HostListenerTrait {
    /// Run the host listener
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate host listener based on the dry_run flag
pub fn create_host_listener(
    config: Arc<Config>,
    dry_run: bool,
) -> Result<Box<dyn HostListenerTrait + Send>> {
    if dry_run {
        let link = Arc::new(super::dry_run::DryRunLink::new());
        let install_guard = Arc::new(InstallGuard::new(config.clone(), link.clone()));
        let window_guard = Arc::new(WindowGuard::new(config.clone(), link));
        Ok(Box::new(super::dry_run::DryRunListener::new(
            config,
            install_guard,
            window_guard,
        )))
    } else {
        let link = Arc::new(super::native::NativeLink::new());
        let install_guard = Arc::new(InstallGuard::new(config.clone(), link.clone()));
        let window_guard = Arc::new(WindowGuard::new(config, link.clone()));
        Ok(Box::new(super::native::NativeListener::new(
            link,
            install_guard,
            window_guard,
        )))
    }
}
