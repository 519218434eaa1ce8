//! Upgrade of the legacy flat settings layout:
//!
//! ```json
//! { "device_settings": { "ip_address": "...", "port": 4370, "timeout": 5, "password": "..." },
//!   "file_format": "excel", "export_path": "" }
//! ```
//!
//! into the multi-device layout used by `Config`.

use serde_yaml::{Mapping, Value};

const LEGACY_DEVICE_NAME: &str = "default";

/// Returns the (possibly rewritten) document and whether it was upgraded.
pub fn upgrade_legacy_settings(value: Value) -> (Value, bool) {
    let Value::Mapping(mut root) = value else {
        return (value, false);
    };

    if root.contains_key("devices") {
        return (Value::Mapping(root), false);
    }

    let Some(Value::Mapping(legacy)) = root.remove("device_settings") else {
        return (Value::Mapping(root), false);
    };

    let mut device = Mapping::new();
    device.insert("name".into(), LEGACY_DEVICE_NAME.into());

    for (old, new) in [
        ("ip_address", "ip"),
        ("port", "port"),
        ("timeout", "timeout"),
    ] {
        if let Some(v) = legacy.get(old) {
            device.insert(new.into(), v.clone());
        }
    }

    // numeric passwords are common on these terminals
    if let Some(pw) = legacy.get("password") {
        let pw = match pw {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        device.insert("password".into(), pw.into());
    }

    root.insert("devices".into(), Value::Sequence(vec![Value::Mapping(device)]));
    root.insert(
        "active_device".into(),
        Value::Number(serde_yaml::Number::from(0u64)),
    );

    (Value::Mapping(root), true)
}
