pub const SPBV01: &str = "spBv1.0";
pub const SPAV01: &str = "A";

pub const DBIRTH: &str = "DBIRTH";
pub const DDEATH: &str = "DDEATH";
pub const DDATA: &str = "DDATA";

/// Key carrying the metric list in a Sparkplug A payload
pub const METRIC_KEY_A: &str = "metric";
/// Key carrying the metric list in a Sparkplug B payload
pub const METRICS_KEY_B: &str = "metrics";
pub const TIMESTAMP_KEY: &str = "timestamp";

/// Downstream topic used to signal a rebirth request when device caching is disabled
pub const REBIRTH_TOPIC: &str = "rebirth";
