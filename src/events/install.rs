use serde::{Deserialize, Serialize};
use std::fmt;

/// Тип установленного расширения или приложения (management API хоста).
/// Неизвестные значения хоста сворачиваются в Other, не ломая сообщение.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppType {
    Extension,
    HostedApp,
    PackagedApp,
    LegacyPackagedApp,
    Theme,
    Other,
}

impl AppType {
    /// Все имена типов, допустимые в конфигурации removal-набора
    pub const KNOWN_NAMES: [&'static str; 5] = [
        "extension",
        "hosted_app",
        "packaged_app",
        "legacy_packaged_app",
        "theme",
    ];

    pub fn from_config_name(name: &str) -> Option<Self> {
        match name {
            "extension" => Some(Self::Extension),
            "hosted_app" => Some(Self::HostedApp),
            "packaged_app" => Some(Self::PackagedApp),
            "legacy_packaged_app" => Some(Self::LegacyPackagedApp),
            "theme" => Some(Self::Theme),
            _ => None,
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::HostedApp => "hosted_app",
            Self::PackagedApp => "packaged_app",
            Self::LegacyPackagedApp => "legacy_packaged_app",
            Self::Theme => "theme",
            Self::Other => "other",
        }
    }
}

impl From<String> for AppType {
    fn from(name: String) -> Self {
        Self::from_config_name(&name).unwrap_or(Self::Other)
    }
}

impl From<AppType> for String {
    fn from(app_type: AppType) -> Self {
        app_type.wire_name().to_string()
    }
}

/// Способ установки приложения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstallType {
    Admin,
    Development,
    Normal,
    Sideload,
    Other,
}

impl InstallType {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Development => "development",
            Self::Normal => "normal",
            Self::Sideload => "sideload",
            Self::Other => "other",
        }
    }
}

impl From<String> for InstallType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "admin" => Self::Admin,
            "development" => Self::Development,
            "normal" => Self::Normal,
            "sideload" => Self::Sideload,
            _ => Self::Other,
        }
    }
}

impl From<InstallType> for String {
    fn from(install_type: InstallType) -> Self {
        install_type.wire_name().to_string()
    }
}

/// Событие установки приложения, доставленное хостом.
/// Создаётся хостом, обрабатывается ровно один раз и не сохраняется.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallEvent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub app_type: AppType,
    pub install_type: InstallType,
}

impl InstallEvent {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        app_type: AppType,
        install_type: InstallType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            app_type,
            install_type,
        }
    }
}

impl fmt::Display for InstallEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_event_deserialization() {
        let json = r#"{
            "id": "abcdefghijklmnop",
            "name": "Some Web App",
            "type": "hosted_app",
            "installType": "normal"
        }"#;

        let event: InstallEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, "abcdefghijklmnop");
        assert_eq!(event.app_type, AppType::HostedApp);
        assert_eq!(event.install_type, InstallType::Normal);
    }

    #[test]
    fn test_unknown_type_falls_back_to_other() {
        let json = r#"{
            "id": "x",
            "name": "y",
            "type": "login_screen_extension",
            "installType": "enterprise"
        }"#;

        let event: InstallEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.app_type, AppType::Other);
        assert_eq!(event.install_type, InstallType::Other);
    }

    #[test]
    fn test_from_config_name() {
        assert_eq!(
            AppType::from_config_name("hosted_app"),
            Some(AppType::HostedApp)
        );
        assert_eq!(
            AppType::from_config_name("legacy_packaged_app"),
            Some(AppType::LegacyPackagedApp)
        );
        assert_eq!(AppType::from_config_name("app"), None);

        for name in AppType::KNOWN_NAMES {
            assert!(AppType::from_config_name(name).is_some());
        }
    }

    #[test]
    fn test_wire_name_round_trip() {
        let json = serde_json::to_string(&AppType::HostedApp).unwrap();
        assert_eq!(json, "\"hosted_app\"");

        let json = serde_json::to_string(&InstallType::Sideload).unwrap();
        assert_eq!(json, "\"sideload\"");
    }

    #[test]
    fn test_display() {
        let event = InstallEvent::new("abc", "Docs", AppType::HostedApp, InstallType::Normal);
        assert_eq!(event.to_string(), "\"Docs\" (abc)");
    }
}
