use crate::config::Config;
use crate::error::Result;
use crate::events::{AppType, InstallEvent, InstallType, TabRecord, WindowEvent, WindowType};
use crate::services::{InstallGuard, WindowGuard};
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info};

use super::r#trait::{HostListenerTrait, ManagementApi, WindowApi};

/// Хост-заглушка: логирует команды вместо записи в stdout
pub struct DryRunLink;

impl DryRunLink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ManagementApi for DryRunLink {
    async fn uninstall(&self, id: &str) -> Result<()> {
        info!("[DRY RUN] uninstall {} (диалог подтверждения подавлен)", id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl WindowApi for DryRunLink {
    async fn query_tabs(&self, window_id: i64) -> Result<Vec<TabRecord>> {
        info!("[DRY RUN] query_tabs для окна #{}", window_id);
        Ok(vec![TabRecord::with_url("https://example.com/dry-run")])
    }

    async fn close_window(&self, window_id: i64) -> Result<()> {
        info!("[DRY RUN] close_window #{}", window_id);
        Ok(())
    }

    async fn create_tab(&self, url: &str) -> Result<()> {
        info!("[DRY RUN] create_tab {}", url);
        Ok(())
    }
}

pub struct DryRunListener {
    config: Arc<Config>,
    install_guard: Arc<InstallGuard>,
    window_guard: Arc<WindowGuard>,
}

impl DryRunListener {
    pub fn new(
        config: Arc<Config>,
        install_guard: Arc<InstallGuard>,
        window_guard: Arc<WindowGuard>,
    ) -> Self {
        Self {
            config,
            install_guard,
            window_guard,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("Dry-run режим - HostListener работает в режиме эмуляции");

        let fake_installs = vec![
            InstallEvent::new(
                "dryrunhostedapp00001",
                "Dry Run Hosted App",
                AppType::HostedApp,
                InstallType::Normal,
            ),
            InstallEvent::new(
                "dryrunadminapp000002",
                "Dry Run Admin App",
                AppType::HostedApp,
                InstallType::Admin,
            ),
            InstallEvent::new(
                "dryrunextension00003",
                "Dry Run Extension",
                AppType::Extension,
                InstallType::Normal,
            ),
        ];
        let fake_windows = vec![
            WindowEvent::new(101, WindowType::App),
            WindowEvent::new(102, WindowType::Popup),
            WindowEvent::new(103, WindowType::Normal),
        ];

        let mut index = 0;
        let mut interval = interval(Duration::from_millis(self.config.host.dry_run_interval_ms));

        loop {
            interval.tick().await;

            let install = &fake_installs[index];
            info!("Dry-run: эмулируем установку: {}", install);
            if let Err(e) = self.install_guard.handle_event(install).await {
                error!("Ошибка обработки события установки: {}", e);
            }

            let window = fake_windows[index];
            info!("Dry-run: эмулируем создание окна: {}", window);
            if let Err(e) = self.window_guard.handle_event(&window).await {
                error!("Ошибка обработки события окна: {}", e);
            }

            index = (index + 1) % fake_installs.len();
        }
    }
}

#[async_trait::async_trait]
impl HostListenerTrait for DryRunListener {
    async fn run(mut self: Box<Self>) -> Result<()> {
        (*self).run().await
    }
}
