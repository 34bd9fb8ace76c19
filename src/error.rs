use thiserror::Error;

#[derive(Error, Debug)]
pub enum WabError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка протокола: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("Повреждённый кадр сообщения: {0}")]
    Frame(String),

    #[error("Хост сообщил об ошибке: {0}")]
    Host(String),

    #[error("Хост недоступен: {0}")]
    HostUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, WabError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! wab_error {
    (frame, $($arg:tt)*) => {
        $crate::error::WabError::Frame(format!($($arg)*))
    };
    (host, $($arg:tt)*) => {
        $crate::error::WabError::Host(format!($($arg)*))
    };
    (host_unavailable, $($arg:tt)*) => {
        $crate::error::WabError::HostUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::WabError::Internal(format!($($arg)*))
    };
}
