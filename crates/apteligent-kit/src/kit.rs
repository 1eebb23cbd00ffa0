//! The Apteligent kit: translates host callbacks into vendor SDK calls.

use crate::commerce::{CommerceEvent, ProductAction};
use crate::config::{Environment, KitSettings, KIT_NAME};
use crate::types::{
    Event, ExceptionEvent, IdentityType, KitEvent, MessageType, NetworkPerformance,
    ReportingMessage,
};
use crate::vendor::{LoggingLevel, VendorConfig, VendorSdk};
use crate::Error;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

/// Strip the leading `$` the vendor metadata store rejects.
pub fn sanitize_attribute_key(key: &str) -> String {
    key.strip_prefix('$').unwrap_or(key).to_owned()
}

/// Convert a revenue amount to integer minor currency units, truncating.
fn to_minor_units(revenue: f64) -> i64 {
    (revenue * 100.0) as i64
}

/// Kit forwarding host analytics events to the Apteligent SDK.
///
/// Every reportable call returns the [`ReportingMessage`]s the host uses to
/// confirm delivery; non-reportable calls return an empty list. All calls are
/// synchronous and must be serialized by the host; the kit holds no locks.
///
/// # Example
///
/// ```rust
/// use apteligent_kit::vendor::RecordingSdk;
/// use apteligent_kit::{ApteligentKit, Environment, Event};
/// use std::collections::HashMap;
///
/// # fn main() -> Result<(), apteligent_kit::Error> {
/// let settings = HashMap::from([("appid".to_string(), "crit_app".to_string())]);
/// let mut kit = ApteligentKit::new(RecordingSdk::new(), &settings, Environment::Production)?;
///
/// let messages = kit.log_event(&Event::new("signup"));
/// assert_eq!(messages.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct ApteligentKit<S: VendorSdk> {
    settings: KitSettings,
    sdk: S,
    user_attributes: Map<String, Value>,
}

impl<S: VendorSdk> ApteligentKit<S> {
    /// Create the kit and initialize the vendor SDK.
    ///
    /// Initialization is not a reportable event and produces no reporting
    /// messages. Service monitoring is enabled per the
    /// `service_monitoring_enabled` setting, and vendor log verbosity is
    /// raised to Info in development.
    pub fn new(
        mut sdk: S,
        settings: &HashMap<String, String>,
        environment: Environment,
    ) -> Result<Self, Error> {
        let settings = KitSettings::from_map(settings)?;

        if environment == Environment::Development {
            sdk.set_logging_level(LoggingLevel::Info);
        }
        let config = VendorConfig {
            service_monitoring_enabled: settings.service_monitoring_enabled(),
        };
        debug!(app_id = settings.app_id(), "initializing vendor SDK");
        sdk.initialize(settings.app_id(), config);

        Ok(Self {
            settings,
            sdk,
            user_attributes: Map::new(),
        })
    }

    /// Name this kit registers under.
    pub fn name(&self) -> &'static str {
        KIT_NAME
    }

    /// Get the parsed kit settings.
    pub fn settings(&self) -> &KitSettings {
        &self.settings
    }

    /// Get the vendor binding.
    pub fn vendor(&self) -> &S {
        &self.sdk
    }

    /// Get the cached user attributes as forwarded to the vendor.
    pub fn user_attributes(&self) -> &Map<String, Value> {
        &self.user_attributes
    }

    /// Dispatch a reportable host event to its handler.
    pub fn log(&mut self, event: &KitEvent) -> Vec<ReportingMessage> {
        match event {
            KitEvent::Breadcrumb(breadcrumb) => self.leave_breadcrumb(breadcrumb),
            KitEvent::Event(event) => self.log_event(event),
            KitEvent::Commerce(event) => self.log_commerce_event(event),
            KitEvent::ScreenView { name, attributes } => self.log_screen(name, attributes),
            KitEvent::Exception(exception) => self.log_exception(exception),
            KitEvent::NetworkPerformance(perf) => self.log_network_performance(perf),
        }
    }

    /// Forward a breadcrumb to the vendor trail.
    pub fn leave_breadcrumb(&mut self, breadcrumb: &str) -> Vec<ReportingMessage> {
        self.sdk.leave_breadcrumb(breadcrumb);
        vec![ReportingMessage::new(MessageType::Breadcrumb)]
    }

    /// Forward a generic event.
    ///
    /// Apteligent has no custom-event primitive; the breadcrumb trail is the
    /// closest thing, so the event name is left as a breadcrumb.
    pub fn log_event(&mut self, event: &Event) -> Vec<ReportingMessage> {
        self.sdk.leave_breadcrumb(&event.name);
        vec![ReportingMessage::from_event(event)]
    }

    /// Forward a commerce event.
    ///
    /// Purchases and refunds map onto vendor transactions; every other action
    /// is expanded into generic sub-events. The host always gets exactly one
    /// message for the commerce event itself, however many sub-events were
    /// forwarded.
    pub fn log_commerce_event(&mut self, event: &CommerceEvent) -> Vec<ReportingMessage> {
        match event.action {
            ProductAction::Purchase | ProductAction::Refund => {
                let action = event.action.as_str();
                self.sdk.begin_transaction(action);
                if let Some(revenue) = event
                    .transaction_attributes
                    .as_ref()
                    .and_then(|transaction| transaction.revenue)
                {
                    self.sdk
                        .set_transaction_value(action, to_minor_units(revenue));
                }
                if event.action == ProductAction::Refund {
                    self.sdk.fail_transaction(action);
                } else {
                    self.sdk.end_transaction(action);
                }
            }
            _ => {
                for sub_event in event.expand() {
                    self.log_event(&sub_event);
                }
            }
        }
        vec![ReportingMessage::from_commerce_event(event)]
    }

    /// Forward a screen view as a breadcrumb.
    ///
    /// Screen attributes are host-side only; the vendor breadcrumb carries
    /// just the name.
    pub fn log_screen(
        &mut self,
        screen_name: &str,
        _attributes: &HashMap<String, String>,
    ) -> Vec<ReportingMessage> {
        self.sdk.leave_breadcrumb(screen_name);
        vec![ReportingMessage::new(MessageType::ScreenView).with_screen_name(screen_name)]
    }

    /// Forward a handled exception.
    ///
    /// Context attributes are returned to the host but not forwarded; the
    /// vendor call takes no structured context.
    pub fn log_exception(&mut self, exception: &ExceptionEvent) -> Vec<ReportingMessage> {
        self.sdk
            .log_handled_exception(&exception.class_name, &exception.message);
        vec![ReportingMessage::new(MessageType::Error)
            .with_exception_class_name(exception.class_name.clone())
            .with_attributes(exception.attributes.clone())]
    }

    /// Forward a network timing measurement.
    ///
    /// An unparsable URL degrades to a null URL with a warning; the vendor
    /// call still proceeds.
    pub fn log_network_performance(&mut self, perf: &NetworkPerformance) -> Vec<ReportingMessage> {
        let url = match Url::parse(&perf.url) {
            Ok(url) => Some(url),
            Err(error) => {
                warn!(url = %perf.url, %error, "invalid URL sent to log_network_performance");
                None
            }
        };
        self.sdk.log_network_request(
            &perf.method,
            url.as_ref(),
            perf.length,
            perf.bytes_received,
            perf.bytes_sent,
            perf.response_code,
            None,
        );
        vec![ReportingMessage::new(MessageType::NetworkPerformance)]
    }

    /// Set a user identity.
    ///
    /// Apteligent exposes a single username field, so only the customer id
    /// identity is forwarded.
    pub fn set_user_identity(&mut self, identity_type: IdentityType, identity: &str) {
        if identity_type == IdentityType::CustomerId {
            self.sdk.set_username(identity);
        }
    }

    /// Remove a user identity by clearing the vendor username.
    pub fn remove_user_identity(&mut self, identity_type: IdentityType) {
        if identity_type == IdentityType::CustomerId {
            self.sdk.set_username("");
        }
    }

    /// Set a user attribute and push the full metadata object to the vendor.
    ///
    /// A value that fails to serialize is dropped with a warning; the
    /// metadata push still happens.
    pub fn set_user_attribute(&mut self, key: &str, value: impl Serialize) {
        self.insert_attribute(key, value);
        self.push_metadata();
    }

    /// Set all user attributes in one pass, then push metadata once.
    ///
    /// A key that fails to serialize never aborts the rest of the batch.
    /// Attribute lists are unsupported and ignored; see
    /// [`Self::supports_attribute_lists`].
    pub fn set_all_user_attributes(
        &mut self,
        attributes: &HashMap<String, String>,
        _attribute_lists: &HashMap<String, Vec<String>>,
    ) {
        for (key, value) in attributes {
            self.insert_attribute(key, value);
        }
        self.push_metadata();
    }

    /// Remove a user attribute and push the full metadata object.
    ///
    /// Removing an absent key is a no-op apart from the push.
    pub fn remove_user_attribute(&mut self, key: &str) {
        self.user_attributes.remove(&sanitize_attribute_key(key));
        self.push_metadata();
    }

    /// Attribute lists never reach the vendor.
    pub fn set_user_attribute_list(&mut self, _key: &str, _list: &[String]) {}

    /// Whether multi-valued attributes are supported. Always false.
    pub fn supports_attribute_lists(&self) -> bool {
        false
    }

    /// Forward the opt-out flag to the vendor.
    ///
    /// Once set, the vendor suppresses its own future reporting.
    pub fn set_opt_out(&mut self, opt_out: bool) -> Vec<ReportingMessage> {
        self.sdk.set_opt_out_status(opt_out);
        vec![ReportingMessage::new(MessageType::OptOut)]
    }

    /// No vendor primitive; not a reportable event.
    pub fn logout(&mut self) -> Vec<ReportingMessage> {
        Vec::new()
    }

    /// No vendor primitive; not a reportable event.
    pub fn log_error(
        &mut self,
        _message: &str,
        _attributes: &HashMap<String, String>,
    ) -> Vec<ReportingMessage> {
        Vec::new()
    }

    /// No vendor primitive; not a reportable event.
    pub fn log_ltv_increase(
        &mut self,
        _value_increased: f64,
        _value_total: f64,
        _event_name: &str,
        _attributes: &HashMap<String, String>,
    ) -> Vec<ReportingMessage> {
        Vec::new()
    }

    fn insert_attribute(&mut self, key: &str, value: impl Serialize) {
        let key = sanitize_attribute_key(key);
        match serde_json::to_value(value) {
            Ok(value) => {
                self.user_attributes.insert(key, value);
            }
            Err(error) => {
                warn!(key = %key, %error, "dropping unserializable user attribute");
            }
        }
    }

    fn push_metadata(&mut self) {
        self.sdk.set_metadata(&self.user_attributes);
    }
}
