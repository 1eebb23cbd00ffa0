//! Integration tests for host-call forwarding.

use apteligent_kit::vendor::{LoggingLevel, RecordingSdk, VendorCall};
use apteligent_kit::{
    ApteligentKit, Environment, Event, ExceptionEvent, IdentityType, KitEvent, MessageType,
    NetworkPerformance,
};
use std::collections::HashMap;

fn settings() -> HashMap<String, String> {
    HashMap::from([("appid".to_string(), "crit_app".to_string())])
}

fn make_kit() -> ApteligentKit<RecordingSdk> {
    ApteligentKit::new(RecordingSdk::new(), &settings(), Environment::Production).unwrap()
}

fn perf(url: &str) -> NetworkPerformance {
    NetworkPerformance {
        url: url.to_string(),
        start_time: 1706400000000,
        method: "GET".to_string(),
        length: 512,
        bytes_sent: 128,
        bytes_received: 4096,
        response_code: 200,
    }
}

#[test]
fn test_initialize_carries_settings() {
    let mut settings = settings();
    settings.insert(
        "service_monitoring_enabled".to_string(),
        "true".to_string(),
    );
    let kit = ApteligentKit::new(RecordingSdk::new(), &settings, Environment::Production).unwrap();

    assert_eq!(
        kit.vendor().calls,
        vec![VendorCall::Initialize {
            app_id: "crit_app".to_string(),
            service_monitoring_enabled: true,
        }]
    );
    assert_eq!(kit.name(), "Apteligent");
}

#[test]
fn test_development_raises_log_verbosity_before_initialize() {
    let kit = ApteligentKit::new(RecordingSdk::new(), &settings(), Environment::Development).unwrap();

    assert_eq!(
        kit.vendor().calls[0],
        VendorCall::SetLoggingLevel(LoggingLevel::Info)
    );
    assert!(matches!(kit.vendor().calls[1], VendorCall::Initialize { .. }));
}

#[test]
fn test_production_never_touches_log_verbosity() {
    let kit = make_kit();

    assert!(!kit
        .vendor()
        .calls
        .iter()
        .any(|call| matches!(call, VendorCall::SetLoggingLevel(_))));
}

#[test]
fn test_missing_app_id_fails_creation() {
    let result = ApteligentKit::new(RecordingSdk::new(), &HashMap::new(), Environment::Production);
    assert!(result.is_err());
}

#[test]
fn test_breadcrumb_forwarding() {
    let mut kit = make_kit();

    let messages = kit.leave_breadcrumb("checkout started");

    assert_eq!(kit.vendor().breadcrumbs(), vec!["checkout started"]);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_type, MessageType::Breadcrumb);
}

#[test]
fn test_generic_event_becomes_breadcrumb() {
    let mut kit = make_kit();

    let event = Event::new("signup").with_attribute("plan", "pro");
    let messages = kit.log_event(&event);

    assert_eq!(kit.vendor().breadcrumbs(), vec!["signup"]);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_type, MessageType::Event);
    assert_eq!(messages[0].event_name.as_deref(), Some("signup"));
}

#[test]
fn test_screen_view_forwarding() {
    let mut kit = make_kit();

    let messages = kit.log_screen("Home", &HashMap::new());

    assert_eq!(kit.vendor().breadcrumbs(), vec!["Home"]);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_type, MessageType::ScreenView);
    assert_eq!(messages[0].screen_name.as_deref(), Some("Home"));
}

#[test]
fn test_exception_forwarding() {
    let mut kit = make_kit();

    let exception = ExceptionEvent::new("io::Error", "connection reset")
        .with_attribute("endpoint", "/sync");
    let messages = kit.log_exception(&exception);

    // The vendor call carries no structured context.
    assert_eq!(
        kit.vendor().calls[1],
        VendorCall::LogHandledException {
            class_name: "io::Error".to_string(),
            message: "connection reset".to_string(),
        }
    );
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_type, MessageType::Error);
    assert_eq!(messages[0].exception_class_name.as_deref(), Some("io::Error"));
    let attributes = messages[0].attributes.as_ref().unwrap();
    assert_eq!(attributes.get("endpoint").map(String::as_str), Some("/sync"));
}

#[test]
fn test_network_performance_forwarding() {
    let mut kit = make_kit();

    let messages = kit.log_network_performance(&perf("https://api.example.com/v1/sync"));

    assert_eq!(
        kit.vendor().calls[1],
        VendorCall::LogNetworkRequest {
            method: "GET".to_string(),
            url: Some("https://api.example.com/v1/sync".to_string()),
            length: 512,
            bytes_received: 4096,
            bytes_sent: 128,
            response_code: 200,
            extra: None,
        }
    );
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_type, MessageType::NetworkPerformance);
}

#[test]
fn test_malformed_url_degrades_to_null() {
    let mut kit = make_kit();

    let messages = kit.log_network_performance(&perf("not a url"));

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_type, MessageType::NetworkPerformance);
    match &kit.vendor().calls[1] {
        VendorCall::LogNetworkRequest { url, .. } => assert!(url.is_none()),
        other => panic!("unexpected vendor call: {other:?}"),
    }
}

#[test]
fn test_customer_id_identity_sets_username() {
    let mut kit = make_kit();

    kit.set_user_identity(IdentityType::CustomerId, "cust_123");
    kit.remove_user_identity(IdentityType::CustomerId);

    assert_eq!(kit.vendor().calls[1], VendorCall::SetUsername("cust_123".to_string()));
    assert_eq!(kit.vendor().calls[2], VendorCall::SetUsername(String::new()));
}

#[test]
fn test_other_identity_types_are_ignored() {
    let mut kit = make_kit();

    kit.set_user_identity(IdentityType::Email, "user@example.com");
    kit.remove_user_identity(IdentityType::Email);

    assert!(!kit
        .vendor()
        .calls
        .iter()
        .any(|call| matches!(call, VendorCall::SetUsername(_))));
}

#[test]
fn test_set_attribute_sanitizes_key_and_pushes_metadata() {
    let mut kit = make_kit();

    kit.set_user_attribute("$sign_up_date", "2026-08-28");

    let metadata = kit.vendor().last_metadata().unwrap();
    assert_eq!(metadata.get("sign_up_date").unwrap(), "2026-08-28");
    assert!(!metadata.contains_key("$sign_up_date"));
}

#[test]
fn test_unserializable_attribute_dropped_without_aborting() {
    let mut kit = make_kit();
    kit.set_user_attribute("plan", "pro");

    // Maps with non-string keys cannot become JSON; the value is dropped but
    // the metadata push still happens.
    let bad_value = HashMap::from([(vec![0u8, 159], "snowman".to_string())]);
    kit.set_user_attribute("device_blob", bad_value);

    let pushes = kit
        .vendor()
        .calls
        .iter()
        .filter(|call| matches!(call, VendorCall::SetMetadata(_)))
        .count();
    assert_eq!(pushes, 2);

    let metadata = kit.vendor().last_metadata().unwrap();
    assert!(!metadata.contains_key("device_blob"));
    assert_eq!(metadata.get("plan").unwrap(), "pro");
}

#[test]
fn test_bulk_set_pushes_metadata_once() {
    let mut kit = make_kit();

    let attributes = HashMap::from([
        ("plan".to_string(), "pro".to_string()),
        ("$tier".to_string(), "gold".to_string()),
    ]);
    kit.set_all_user_attributes(&attributes, &HashMap::new());

    let pushes: Vec<_> = kit
        .vendor()
        .calls
        .iter()
        .filter(|call| matches!(call, VendorCall::SetMetadata(_)))
        .collect();
    assert_eq!(pushes.len(), 1);

    let metadata = kit.vendor().last_metadata().unwrap();
    assert_eq!(metadata.get("plan").unwrap(), "pro");
    assert_eq!(metadata.get("tier").unwrap(), "gold");
}

#[test]
fn test_remove_absent_attribute_still_pushes_metadata() {
    let mut kit = make_kit();
    kit.set_user_attribute("plan", "pro");

    kit.remove_user_attribute("never_set");

    let pushes = kit
        .vendor()
        .calls
        .iter()
        .filter(|call| matches!(call, VendorCall::SetMetadata(_)))
        .count();
    assert_eq!(pushes, 2);
    let metadata = kit.vendor().last_metadata().unwrap();
    assert_eq!(metadata.get("plan").unwrap(), "pro");
}

#[test]
fn test_remove_attribute_sanitizes_lookup_key() {
    let mut kit = make_kit();
    kit.set_user_attribute("$tier", "gold");

    kit.remove_user_attribute("$tier");

    assert!(kit.vendor().last_metadata().unwrap().is_empty());
    assert!(kit.user_attributes().is_empty());
}

#[test]
fn test_attribute_lists_are_unsupported() {
    let mut kit = make_kit();

    kit.set_user_attribute_list("tags", &["a".to_string(), "b".to_string()]);

    assert!(!kit.supports_attribute_lists());
    // No metadata push, no mutation.
    assert_eq!(kit.vendor().calls.len(), 1);
    assert!(kit.user_attributes().is_empty());
}

#[test]
fn test_opt_out_forwarding() {
    let mut kit = make_kit();

    let messages = kit.set_opt_out(true);

    assert_eq!(kit.vendor().calls[1], VendorCall::SetOptOutStatus(true));
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_type, MessageType::OptOut);

    let messages = kit.set_opt_out(false);
    assert_eq!(kit.vendor().calls[2], VendorCall::SetOptOutStatus(false));
    assert_eq!(messages.len(), 1);
}

#[test]
fn test_unsupported_calls_return_no_messages() {
    let mut kit = make_kit();

    assert!(kit.logout().is_empty());
    assert!(kit.log_error("boom", &HashMap::new()).is_empty());
    assert!(kit
        .log_ltv_increase(9.99, 59.94, "renewal", &HashMap::new())
        .is_empty());
    // None of them reach the vendor either.
    assert_eq!(kit.vendor().calls.len(), 1);
}

#[test]
fn test_log_dispatches_by_event_kind() {
    let mut kit = make_kit();

    let messages = kit.log(&KitEvent::Breadcrumb("step one".to_string()));
    assert_eq!(messages[0].message_type, MessageType::Breadcrumb);

    let messages = kit.log(&KitEvent::ScreenView {
        name: "Settings".to_string(),
        attributes: HashMap::new(),
    });
    assert_eq!(messages[0].message_type, MessageType::ScreenView);

    let messages = kit.log(&KitEvent::NetworkPerformance(perf("https://example.com/")));
    assert_eq!(messages[0].message_type, MessageType::NetworkPerformance);

    assert_eq!(kit.vendor().breadcrumbs(), vec!["step one", "Settings"]);
}
