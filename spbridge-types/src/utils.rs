use std::time::{SystemTime, UNIX_EPOCH};

/// Get the current unix timestamp in milliseconds
pub fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Validate a bridge or device name.
///
/// Names end up as topic segments so they must be non empty and must not contain
/// the topic separator or MQTT wildcards.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name string must not be empty".into());
    }
    if name.contains(['+', '/', '#']) {
        return Err(format!(
            "name string {name} cannot contain '+', '/' or '#' characters"
        ));
    }
    Ok(())
}
