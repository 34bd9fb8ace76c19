use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::InstallEvent;
use crate::host::ManagementApi;
use std::sync::Arc;
use tracing::{info, warn};

/// Реагирует на события установки приложений: решает, подлежит ли
/// приложение удалению, и выдаёт запрос на удаление без диалога
/// подтверждения. Состояния нет - одна оценка и одно действие на событие.
pub struct InstallGuard {
    config: Arc<Config>,
    management: Arc<dyn ManagementApi>,
}

impl InstallGuard {
    pub fn new(config: Arc<Config>, management: Arc<dyn ManagementApi>) -> Self {
        Self { config, management }
    }

    /// Обработка события установки
    pub async fn handle_event(&self, event: &InstallEvent) -> Result<()> {
        debug_if_enabled!("Обработка события установки: {}", event);

        if !self.config.should_remove(event) {
            debug_if_enabled!(
                "Приложение {} не подлежит удалению (type={:?}, install={:?})",
                event,
                event.app_type,
                event.install_type
            );
            return Ok(());
        }

        info!("Заблокирована установка веб-приложения: {}. Удаляем...", event);

        // Отказ хоста только логируется: без повторов и без эскалации
        match self.management.uninstall(&event.id).await {
            Ok(()) => info!("Удалено веб-приложение: {}", event),
            Err(e) => warn!("Не удалось удалить {}: {}", event, e),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WabError;
    use crate::events::{AppType, InstallType};
    use parking_lot::Mutex;

    /// Записывающий management-хост; может отказывать начиная с N-го вызова
    struct RecordingManagement {
        uninstalls: Mutex<Vec<String>>,
        fail_from_call: Option<usize>,
    }

    impl RecordingManagement {
        fn new() -> Self {
            Self {
                uninstalls: Mutex::new(Vec::new()),
                fail_from_call: None,
            }
        }

        fn failing_from(call: usize) -> Self {
            Self {
                uninstalls: Mutex::new(Vec::new()),
                fail_from_call: Some(call),
            }
        }
    }

    #[async_trait::async_trait]
    impl ManagementApi for RecordingManagement {
        async fn uninstall(&self, id: &str) -> Result<()> {
            let mut uninstalls = self.uninstalls.lock();
            uninstalls.push(id.to_string());

            if let Some(from) = self.fail_from_call {
                if uninstalls.len() >= from {
                    return Err(WabError::Host(format!("{} уже удалён", id)));
                }
            }
            Ok(())
        }
    }

    fn guard_with(management: Arc<RecordingManagement>) -> InstallGuard {
        InstallGuard::new(Arc::new(Config::default()), management)
    }

    fn event(app_type: AppType, install_type: InstallType) -> InstallEvent {
        InstallEvent::new("abcdefgh", "Test App", app_type, install_type)
    }

    #[tokio::test]
    async fn test_hosted_app_normal_install_is_removed() {
        let management = Arc::new(RecordingManagement::new());
        let guard = guard_with(management.clone());

        guard
            .handle_event(&event(AppType::HostedApp, InstallType::Normal))
            .await
            .unwrap();

        assert_eq!(*management.uninstalls.lock(), vec!["abcdefgh".to_string()]);
    }

    #[tokio::test]
    async fn test_admin_install_is_untouched() {
        let management = Arc::new(RecordingManagement::new());
        let guard = guard_with(management.clone());

        guard
            .handle_event(&event(AppType::HostedApp, InstallType::Admin))
            .await
            .unwrap();

        assert!(management.uninstalls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_extension_is_untouched() {
        let management = Arc::new(RecordingManagement::new());
        let guard = guard_with(management.clone());

        guard
            .handle_event(&event(AppType::Extension, InstallType::Normal))
            .await
            .unwrap();

        assert!(management.uninstalls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_legacy_packaged_app_is_removed() {
        let management = Arc::new(RecordingManagement::new());
        let guard = guard_with(management.clone());

        guard
            .handle_event(&event(AppType::LegacyPackagedApp, InstallType::Sideload))
            .await
            .unwrap();

        assert_eq!(management.uninstalls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_event_makes_two_independent_attempts() {
        // Дедупликации нет: второй вызов получает ошибку хоста,
        // она логируется и проглатывается
        let management = Arc::new(RecordingManagement::failing_from(2));
        let guard = guard_with(management.clone());

        let event = event(AppType::HostedApp, InstallType::Normal);
        guard.handle_event(&event).await.unwrap();
        guard.handle_event(&event).await.unwrap();

        assert_eq!(management.uninstalls.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_uninstall_failure_is_swallowed() {
        let management = Arc::new(RecordingManagement::failing_from(1));
        let guard = guard_with(management.clone());

        let result = guard
            .handle_event(&event(AppType::HostedApp, InstallType::Normal))
            .await;

        assert!(result.is_ok());
        assert_eq!(management.uninstalls.lock().len(), 1);
    }
}
