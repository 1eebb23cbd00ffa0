//! Narrow interface over the Apteligent SDK.
//!
//! The kit only ever talks to the vendor through [`VendorSdk`], so the real
//! binding stays an external collaborator and tests run against
//! [`RecordingSdk`].

use serde_json::{Map, Value};
use url::Url;

/// Vendor log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggingLevel {
    Silent,
    #[default]
    Warning,
    Info,
}

/// Vendor SDK configuration assembled during kit creation.
#[derive(Debug, Clone, Default)]
pub struct VendorConfig {
    pub service_monitoring_enabled: bool,
}

/// The subset of the Apteligent SDK surface the kit calls into.
///
/// Calls are fire-and-forget: the vendor library buffers and reports on its
/// own schedule, and failures inside it are not surfaced here.
pub trait VendorSdk {
    fn initialize(&mut self, app_id: &str, config: VendorConfig);
    fn set_logging_level(&mut self, level: LoggingLevel);
    fn leave_breadcrumb(&mut self, breadcrumb: &str);
    fn begin_transaction(&mut self, name: &str);
    /// Record the transaction value in minor currency units.
    fn set_transaction_value(&mut self, name: &str, value_cents: i64);
    fn end_transaction(&mut self, name: &str);
    fn fail_transaction(&mut self, name: &str);
    fn set_username(&mut self, username: &str);
    /// Replace the whole user metadata object; there is no incremental API.
    fn set_metadata(&mut self, metadata: &Map<String, Value>);
    fn set_opt_out_status(&mut self, opt_out: bool);
    fn log_handled_exception(&mut self, class_name: &str, message: &str);
    /// `extra` is the vendor's free-form request-string slot; the kit always
    /// passes `None`.
    #[allow(clippy::too_many_arguments)]
    fn log_network_request(
        &mut self,
        method: &str,
        url: Option<&Url>,
        length: u64,
        bytes_received: u64,
        bytes_sent: u64,
        response_code: u16,
        extra: Option<&str>,
    );
}

/// One recorded vendor SDK call.
#[derive(Debug, Clone, PartialEq)]
pub enum VendorCall {
    Initialize {
        app_id: String,
        service_monitoring_enabled: bool,
    },
    SetLoggingLevel(LoggingLevel),
    LeaveBreadcrumb(String),
    BeginTransaction(String),
    SetTransactionValue {
        name: String,
        value_cents: i64,
    },
    EndTransaction(String),
    FailTransaction(String),
    SetUsername(String),
    SetMetadata(Map<String, Value>),
    SetOptOutStatus(bool),
    LogHandledException {
        class_name: String,
        message: String,
    },
    LogNetworkRequest {
        method: String,
        url: Option<String>,
        length: u64,
        bytes_received: u64,
        bytes_sent: u64,
        response_code: u16,
        extra: Option<String>,
    },
}

/// In-memory vendor binding that records every call.
///
/// The real Apteligent binding lives outside this crate; this double backs
/// the test suite and doubles as a reference implementation of [`VendorSdk`].
#[derive(Debug, Default)]
pub struct RecordingSdk {
    pub calls: Vec<VendorCall>,
}

impl RecordingSdk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls of the breadcrumb kind, in order.
    pub fn breadcrumbs(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                VendorCall::LeaveBreadcrumb(b) => Some(b.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The most recent metadata replacement, if any.
    pub fn last_metadata(&self) -> Option<&Map<String, Value>> {
        self.calls.iter().rev().find_map(|call| match call {
            VendorCall::SetMetadata(metadata) => Some(metadata),
            _ => None,
        })
    }
}

impl VendorSdk for RecordingSdk {
    fn initialize(&mut self, app_id: &str, config: VendorConfig) {
        self.calls.push(VendorCall::Initialize {
            app_id: app_id.to_owned(),
            service_monitoring_enabled: config.service_monitoring_enabled,
        });
    }

    fn set_logging_level(&mut self, level: LoggingLevel) {
        self.calls.push(VendorCall::SetLoggingLevel(level));
    }

    fn leave_breadcrumb(&mut self, breadcrumb: &str) {
        self.calls
            .push(VendorCall::LeaveBreadcrumb(breadcrumb.to_owned()));
    }

    fn begin_transaction(&mut self, name: &str) {
        self.calls.push(VendorCall::BeginTransaction(name.to_owned()));
    }

    fn set_transaction_value(&mut self, name: &str, value_cents: i64) {
        self.calls.push(VendorCall::SetTransactionValue {
            name: name.to_owned(),
            value_cents,
        });
    }

    fn end_transaction(&mut self, name: &str) {
        self.calls.push(VendorCall::EndTransaction(name.to_owned()));
    }

    fn fail_transaction(&mut self, name: &str) {
        self.calls.push(VendorCall::FailTransaction(name.to_owned()));
    }

    fn set_username(&mut self, username: &str) {
        self.calls.push(VendorCall::SetUsername(username.to_owned()));
    }

    fn set_metadata(&mut self, metadata: &Map<String, Value>) {
        self.calls.push(VendorCall::SetMetadata(metadata.clone()));
    }

    fn set_opt_out_status(&mut self, opt_out: bool) {
        self.calls.push(VendorCall::SetOptOutStatus(opt_out));
    }

    fn log_handled_exception(&mut self, class_name: &str, message: &str) {
        self.calls.push(VendorCall::LogHandledException {
            class_name: class_name.to_owned(),
            message: message.to_owned(),
        });
    }

    fn log_network_request(
        &mut self,
        method: &str,
        url: Option<&Url>,
        length: u64,
        bytes_received: u64,
        bytes_sent: u64,
        response_code: u16,
        extra: Option<&str>,
    ) {
        self.calls.push(VendorCall::LogNetworkRequest {
            method: method.to_owned(),
            url: url.map(|u| u.to_string()),
            length,
            bytes_received,
            bytes_sent,
            response_code,
            extra: extra.map(str::to_owned),
        });
    }
}
