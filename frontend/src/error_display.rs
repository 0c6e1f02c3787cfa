use futures::StreamExt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::dataflow::{ActorVec, Relay, relay};

/// Notification variant for styling different types of flash messages
#[derive(Debug, Clone, PartialEq, Copy, Default)]
pub enum NotificationVariant {
    /// Red styling for errors
    #[default]
    Error,
    /// Blue styling for informational messages
    Info,
    /// Green styling for success messages
    Success,
}

impl NotificationVariant {
    pub fn title(&self) -> &'static str {
        match self {
            NotificationVariant::Error => "Error",
            NotificationVariant::Info => "Info",
            NotificationVariant::Success => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlashMessage {
    pub id: String,
    pub message: String,
    /// 0 keeps the message until it is dismissed by hand.
    pub auto_dismiss_ms: u32,
    pub variant: NotificationVariant,
}

static FLASH_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

impl FlashMessage {
    pub fn new(message: impl Into<String>, variant: NotificationVariant, auto_dismiss_ms: u32) -> Self {
        let id = FLASH_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("flash_{id}"),
            message: message.into(),
            auto_dismiss_ms,
            variant,
        }
    }

    pub fn error(technical_error: &str, auto_dismiss_ms: u32) -> Self {
        Self::new(
            make_error_user_friendly(technical_error),
            NotificationVariant::Error,
            auto_dismiss_ms,
        )
    }
}

pub fn make_error_user_friendly(error: &str) -> String {
    let error_lower = error.to_lowercase();

    if error_lower.contains("failed to fetch") || error_lower.contains("network") {
        "Could not reach the catch service. Please check your network connection.".to_string()
    } else if error_lower.contains("unauthorized") || error_lower.contains("forbidden") {
        "You are not allowed to do that. Please log in again.".to_string()
    } else if error_lower.contains("timeout") {
        "Operation timed out. Please try again.".to_string()
    } else if error_lower.contains("not found") {
        "That catch no longer exists.".to_string()
    } else {
        error.trim().to_string()
    }
}

/// Stack of flash messages shown by the toast layer.
#[derive(Clone)]
pub struct FlashMessages {
    pub active_messages: ActorVec<FlashMessage>,
    pub flash_added_relay: Relay<FlashMessage>,
    pub flash_dismissed_relay: Relay<String>,
}

impl FlashMessages {
    pub fn new() -> Self {
        let (flash_added_relay, mut flash_added_stream) = relay::<FlashMessage>();
        let (flash_dismissed_relay, mut flash_dismissed_stream) = relay::<String>();

        let active_messages = ActorVec::new(vec![], async move |messages| {
            loop {
                futures::select! {
                    added = flash_added_stream.next() => {
                        match added {
                            Some(message) => messages.lock_mut().push_cloned(message),
                            None => break,
                        }
                    }
                    dismissed_id = flash_dismissed_stream.next() => {
                        if let Some(id) = dismissed_id {
                            messages.lock_mut().retain(|message| message.id != id);
                        }
                    }
                }
            }
        });

        Self {
            active_messages,
            flash_added_relay,
            flash_dismissed_relay,
        }
    }

    pub fn flash(&self, message: FlashMessage) {
        match message.variant {
            NotificationVariant::Error => console_error!("Flash: {}", message.message),
            _ => console_log!("Flash: {}", message.message),
        }
        self.flash_added_relay.send(message);
    }

    pub fn dismiss(&self, id: &str) {
        self.flash_dismissed_relay.send(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        assert_eq!(
            make_error_user_friendly("TypeError: Failed to fetch"),
            "Could not reach the catch service. Please check your network connection."
        );
        assert_eq!(
            make_error_user_friendly("HTTP 404: Not Found"),
            "That catch no longer exists."
        );
        assert_eq!(
            make_error_user_friendly("  Database unavailable \n"),
            "Database unavailable"
        );
    }

    #[test]
    fn test_flash_ids_are_unique() {
        let first = FlashMessage::new("saved", NotificationVariant::Success, 5000);
        let second = FlashMessage::new("saved", NotificationVariant::Success, 5000);
        assert_ne!(first.id, second.id);
        assert_eq!(FlashMessage::error("timeout", 0).variant, NotificationVariant::Error);
    }
}
