//! Host event vocabulary and reporting messages.

use crate::commerce::CommerceEvent;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in milliseconds.
fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Message type tag carried by a [`ReportingMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Event,
    Breadcrumb,
    ScreenView,
    Error,
    OptOut,
    NetworkPerformance,
    CommerceEvent,
}

impl MessageType {
    /// Host wire code for this message type.
    pub fn code(&self) -> &'static str {
        match self {
            MessageType::Event => "e",
            MessageType::Breadcrumb => "bc",
            MessageType::ScreenView => "v",
            MessageType::Error => "x",
            MessageType::OptOut => "o",
            MessageType::NetworkPerformance => "npe",
            MessageType::CommerceEvent => "cm",
        }
    }
}

/// Acknowledgment returned to the host for each forwarded call.
///
/// Purely host-side bookkeeping: the vendor SDK never sees these.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingMessage {
    pub message_type: MessageType,
    /// Milliseconds since the Unix epoch, stamped at construction.
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<HashMap<String, String>>,
}

impl ReportingMessage {
    /// Create a message of the given type stamped with the current time.
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_type,
            timestamp: now_ms(),
            event_name: None,
            screen_name: None,
            exception_class_name: None,
            attributes: None,
        }
    }

    pub(crate) fn from_event(event: &Event) -> Self {
        let mut message = Self::new(MessageType::Event);
        message.event_name = Some(event.name.clone());
        if !event.attributes.is_empty() {
            message.attributes = Some(event.attributes.clone());
        }
        message
    }

    pub(crate) fn from_commerce_event(event: &CommerceEvent) -> Self {
        let mut message = Self::new(MessageType::CommerceEvent);
        message.event_name = Some(event.action.as_str().to_owned());
        if !event.attributes.is_empty() {
            message.attributes = Some(event.attributes.clone());
        }
        message
    }

    pub(crate) fn with_screen_name(mut self, screen_name: impl Into<String>) -> Self {
        self.screen_name = Some(screen_name.into());
        self
    }

    pub(crate) fn with_exception_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.exception_class_name = Some(class_name.into());
        self
    }

    pub(crate) fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        if !attributes.is_empty() {
            self.attributes = Some(attributes);
        }
        self
    }
}

/// Generic app event from the host vocabulary.
#[derive(Debug, Clone)]
pub struct Event {
    pub name: String,
    pub attributes: HashMap<String, String>,
}

impl Event {
    /// Create a new event with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Identity types the host framework may set on a user.
///
/// Only [`IdentityType::CustomerId`] reaches the vendor; Apteligent exposes a
/// single username field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityType {
    CustomerId,
    Email,
    Facebook,
    Google,
    Microsoft,
    Twitter,
    Yahoo,
    Other,
}

/// Handled-error report from the host.
#[derive(Debug, Clone)]
pub struct ExceptionEvent {
    pub class_name: String,
    pub message: String,
    pub attributes: HashMap<String, String>,
}

impl ExceptionEvent {
    /// Create an exception event with an explicit class name.
    pub fn new(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            message: message.into(),
            attributes: HashMap::new(),
        }
    }

    /// Build an exception event from an error, using its type name as the
    /// class name.
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        Self::new(std::any::type_name::<E>(), error.to_string())
    }

    /// Add a context attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Network timing measurement from the host.
#[derive(Debug, Clone)]
pub struct NetworkPerformance {
    pub url: String,
    /// Accepted from the host but not forwarded; the vendor call takes no
    /// start time.
    pub start_time: i64,
    pub method: String,
    pub length: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub response_code: u16,
}

/// Reportable host events.
///
/// [`crate::ApteligentKit::log`] matches this exhaustively, one handler per
/// variant.
#[derive(Debug, Clone)]
pub enum KitEvent {
    Breadcrumb(String),
    Event(Event),
    Commerce(CommerceEvent),
    ScreenView {
        name: String,
        attributes: HashMap<String, String>,
    },
    Exception(ExceptionEvent),
    NetworkPerformance(NetworkPerformance),
}
