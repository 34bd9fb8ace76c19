//! Кадрирование native messaging: 4 байта длины (little-endian) + JSON-тело

use crate::error::Result;
use crate::events::{InstallEvent, TabRecord, WindowEvent};
use crate::wab_error;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Лимит входящего сообщения (стандартный для native messaging)
pub const MAX_MESSAGE_LEN: u32 = 1024 * 1024;

/// Входящее сообщение от браузерной стороны: событие или ответ на команду
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IncomingMessage {
    AppInstalled {
        app: InstallEvent,
    },
    WindowCreated {
        window: WindowEvent,
    },
    Reply {
        request_id: u64,
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        tabs: Option<Vec<TabRecord>>,
    },
}

/// Исходящая команда браузерной стороне
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutgoingMessage {
    Uninstall {
        request_id: u64,
        id: String,
        show_confirm_dialog: bool,
    },
    QueryTabs {
        request_id: u64,
        window_id: i64,
    },
    CloseWindow {
        request_id: u64,
        window_id: i64,
    },
    CreateTab {
        request_id: u64,
        url: String,
    },
}

/// Прочитать один кадр. None - хост закрыл порт (EOF на границе кадра).
pub async fn read_message<R>(reader: &mut R) -> Result<Option<IncomingMessage>>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_le_bytes(len_buf);
    if len > MAX_MESSAGE_LEN {
        return Err(wab_error!(
            frame,
            "длина кадра {} превышает лимит {}",
            len,
            MAX_MESSAGE_LEN
        ));
    }

    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body).await?;

    let message = serde_json::from_slice(&body)?;
    Ok(Some(message))
}

/// Записать один кадр и сбросить буфер
pub async fn write_message<W>(writer: &mut W, message: &OutgoingMessage) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let body = serde_json::to_vec(message)?;
    let len = u32::try_from(body.len())
        .map_err(|_| wab_error!(frame, "слишком длинное сообщение: {} байт", body.len()))?;

    writer.write_all(&len.to_le_bytes()).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WabError;
    use crate::events::{AppType, InstallType, WindowType};

    fn frame(json: &str) -> Vec<u8> {
        let mut buf = (json.len() as u32).to_le_bytes().to_vec();
        buf.extend_from_slice(json.as_bytes());
        buf
    }

    #[tokio::test]
    async fn test_read_app_installed() {
        let buf = frame(
            r#"{"kind": "app_installed", "app": {
                "id": "abc", "name": "App",
                "type": "hosted_app", "installType": "normal"
            }}"#,
        );

        let message = read_message(&mut buf.as_slice()).await.unwrap().unwrap();
        match message {
            IncomingMessage::AppInstalled { app } => {
                assert_eq!(app.id, "abc");
                assert_eq!(app.app_type, AppType::HostedApp);
                assert_eq!(app.install_type, InstallType::Normal);
            }
            other => panic!("неожиданное сообщение: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_window_created_and_reply() {
        let mut buf = frame(r#"{"kind": "window_created", "window": {"id": 5, "type": "app"}}"#);
        buf.extend(frame(
            r#"{"kind": "reply", "request_id": 9, "tabs": [{"url": "https://a"}]}"#,
        ));

        let mut reader = buf.as_slice();

        let first = read_message(&mut reader).await.unwrap().unwrap();
        assert_eq!(
            first,
            IncomingMessage::WindowCreated {
                window: WindowEvent::new(5, WindowType::App)
            }
        );

        let second = read_message(&mut reader).await.unwrap().unwrap();
        match second {
            IncomingMessage::Reply {
                request_id,
                error,
                tabs,
            } => {
                assert_eq!(request_id, 9);
                assert_eq!(error, None);
                assert_eq!(tabs.unwrap()[0].url.as_deref(), Some("https://a"));
            }
            other => panic!("неожиданное сообщение: {:?}", other),
        }

        // После двух кадров - чистый EOF
        assert!(read_message(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_rejects_oversized_frame() {
        let buf = (MAX_MESSAGE_LEN + 1).to_le_bytes().to_vec();
        let err = read_message(&mut buf.as_slice()).await.unwrap_err();
        assert!(matches!(err, WabError::Frame(_)));
    }

    #[tokio::test]
    async fn test_read_malformed_body_is_protocol_error() {
        let buf = frame(r#"{"kind": "unknown_event"}"#);
        let err = read_message(&mut buf.as_slice()).await.unwrap_err();
        assert!(matches!(err, WabError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_write_message_framing() {
        let message = OutgoingMessage::Uninstall {
            request_id: 1,
            id: "abc".to_string(),
            show_confirm_dialog: false,
        };

        let mut buf: Vec<u8> = Vec::new();
        write_message(&mut buf, &message).await.unwrap();

        let len = u32::from_le_bytes(buf[..4].try_into().unwrap()) as usize;
        assert_eq!(len, buf.len() - 4);

        let value: serde_json::Value = serde_json::from_slice(&buf[4..]).unwrap();
        assert_eq!(value["kind"], "uninstall");
        assert_eq!(value["id"], "abc");
        assert_eq!(value["show_confirm_dialog"], false);
    }
}
