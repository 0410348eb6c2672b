use std::collections::BTreeMap;

use once_cell::sync::Lazy;

static MESSAGES: Lazy<BTreeMap<String, String>> = Lazy::new(|| {
    let raw = include_str!("../../i18n/es.json");
    serde_json::from_str(raw).unwrap_or_default()
});

pub fn tr(key: &str) -> String {
    MESSAGES
        .get(key)
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

/// `tr` with each `{}` replaced by the next argument.
pub fn trf(key: &str, args: &[&str]) -> String {
    let mut msg = tr(key);
    for arg in args {
        msg = msg.replacen("{}", arg, 1);
    }
    msg
}
