use serde::{Deserialize, Serialize};
use std::fmt;

/// Тип окна браузера. Неизвестные значения хоста сворачиваются в Other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WindowType {
    Normal,
    Popup,
    App,
    Panel,
    Other,
}

impl From<String> for WindowType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "normal" => Self::Normal,
            "popup" => Self::Popup,
            "app" => Self::App,
            "panel" => Self::Panel,
            _ => Self::Other,
        }
    }
}

impl From<WindowType> for String {
    fn from(window_type: WindowType) -> Self {
        match window_type {
            WindowType::Normal => "normal",
            WindowType::Popup => "popup",
            WindowType::App => "app",
            WindowType::Panel => "panel",
            WindowType::Other => "other",
        }
        .to_string()
    }
}

/// Событие создания окна, доставленное хостом.
/// Создаётся хостом при открытии окна и обрабатывается ровно один раз.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowEvent {
    pub id: i64,
    #[serde(rename = "type")]
    pub window_type: WindowType,
}

impl WindowEvent {
    pub fn new(id: i64, window_type: WindowType) -> Self {
        Self { id, window_type }
    }
}

impl fmt::Display for WindowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "окно #{} ({:?})", self.id, self.window_type)
    }
}

/// Вкладка окна, возвращаемая запросом query_tabs.
/// Запрашивается по требованию и нигде не сохраняется.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    #[serde(default)]
    pub url: Option<String>,
    /// URL навигации, которая ещё не завершилась
    #[serde(default)]
    pub pending_url: Option<String>,
}

impl TabRecord {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            pending_url: None,
        }
    }

    /// URL вкладки: обычный, либо pending, если навигация ещё в полёте
    pub fn effective_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.pending_url.as_deref().filter(|u| !u.is_empty()))
    }
}
