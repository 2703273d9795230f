use std::collections::HashMap;

use spbridge_types::{DeviceId, Metric};

use crate::CacheError;

/// The last known metrics of every birthed device.
///
/// A device has an entry from the time its DBIRTH is processed until its DDEATH. The metric
/// list keeps the order the metrics were first seen in.
#[derive(Debug, Default)]
pub struct DeviceCache {
    devices: HashMap<DeviceId, Vec<Metric>>,
}

impl DeviceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, device_id: &str) -> Option<&[Metric]> {
        self.devices.get(device_id).map(Vec::as_slice)
    }

    pub fn contains(&self, device_id: &str) -> bool {
        self.devices.contains_key(device_id)
    }

    /// Replace the metrics of a device, creating the entry if needed.
    pub fn set_birth<S: Into<DeviceId>>(&mut self, device_id: S, metrics: Vec<Metric>) {
        self.devices.insert(device_id.into(), metrics);
    }

    /// Merge a DDATA metric list into a device's cached metrics.
    ///
    /// Metrics are matched by name. A matching metric has its value updated in place, unless the
    /// incoming metric carries no value. Others are appended to the end of the list. Returns the
    /// names of the appended metrics.
    pub fn apply_data(
        &mut self,
        device_id: &str,
        incoming: Vec<Metric>,
    ) -> Result<Vec<String>, CacheError> {
        let cached = self
            .devices
            .get_mut(device_id)
            .ok_or_else(|| CacheError::UnknownDevice(device_id.to_string()))?;

        let mut unknown = Vec::new();
        for metric in incoming {
            match cached.iter_mut().find(|x| x.name == metric.name) {
                Some(existing) => {
                    if metric.value.is_some() {
                        existing.value = metric.value
                    }
                }
                None => {
                    unknown.push(metric.name.clone());
                    cached.push(metric);
                }
            }
        }
        Ok(unknown)
    }

    /// Remove a device, returning its metrics if it was cached.
    pub fn remove(&mut self, device_id: &str) -> Option<Vec<Metric>> {
        self.devices.remove(device_id)
    }

    /// Snapshot of the cached device ids
    pub fn keys(&self) -> Vec<DeviceId> {
        self.devices.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn birthed(device_id: &str, metrics: Vec<Metric>) -> DeviceCache {
        let mut cache = DeviceCache::new();
        cache.set_birth(device_id, metrics);
        cache
    }

    #[test]
    fn data_updates_known_metric() {
        let mut cache = birthed("dev1", vec![Metric::new("temp", 20)]);
        let unknown = cache
            .apply_data("dev1", vec![Metric::new("temp", 25)])
            .unwrap();
        assert!(unknown.is_empty());
        assert_eq!(cache.get("dev1").unwrap(), &[Metric::new("temp", 25)]);
    }

    #[test]
    fn data_appends_unknown_metric() {
        let mut cache = birthed("dev1", vec![Metric::new("temp", 20)]);
        let unknown = cache
            .apply_data("dev1", vec![Metric::new("humidity", 40)])
            .unwrap();
        assert_eq!(unknown, vec!["humidity".to_string()]);
        assert_eq!(
            cache.get("dev1").unwrap(),
            &[Metric::new("temp", 20), Metric::new("humidity", 40)]
        );
    }

    #[test]
    fn data_for_unknown_device() {
        let mut cache = birthed("dev1", vec![Metric::new("temp", 20)]);
        assert_eq!(
            cache.apply_data("dev2", vec![Metric::new("temp", 1)]),
            Err(CacheError::UnknownDevice("dev2".into()))
        );
        assert!(!cache.contains("dev2"));
        assert_eq!(cache.get("dev1").unwrap(), &[Metric::new("temp", 20)]);
    }

    #[test]
    fn data_applied_twice_is_idempotent() {
        let data = vec![Metric::new("b", 5), Metric::new("new", true)];
        let mut cache = birthed("dev1", vec![Metric::new("a", 1), Metric::new("b", 2)]);
        cache.apply_data("dev1", data.clone()).unwrap();
        let once = cache.get("dev1").unwrap().to_vec();
        let unknown = cache.apply_data("dev1", data).unwrap();
        assert!(unknown.is_empty());
        assert_eq!(cache.get("dev1").unwrap(), once.as_slice());
    }

    #[test]
    fn data_preserves_order() {
        let mut cache = birthed(
            "dev1",
            vec![Metric::new("a", 1), Metric::new("b", 2), Metric::new("c", 3)],
        );
        cache
            .apply_data(
                "dev1",
                vec![Metric::new("x", 0), Metric::new("c", 30), Metric::new("a", 10)],
            )
            .unwrap();
        let names: Vec<&str> = cache
            .get("dev1")
            .unwrap()
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "x"]);
        assert_eq!(cache.get("dev1").unwrap()[0].value, Some(10.into()));
        assert_eq!(cache.get("dev1").unwrap()[2].value, Some(30.into()));
    }

    #[test]
    fn data_only_updates_value() {
        let mut birth = Metric::new("temp", 20);
        birth.set_field("type", "Int32");
        let mut cache = birthed("dev1", vec![birth]);
        let mut update = Metric::new("temp", 21);
        update.set_field("timestamp", 5);
        cache.apply_data("dev1", vec![update]).unwrap();
        let cached = &cache.get("dev1").unwrap()[0];
        assert_eq!(cached.value, Some(21.into()));
        assert_eq!(cached.extra.get("type").unwrap(), "Int32");
        assert!(cached.extra.get("timestamp").is_none());
    }

    #[test]
    fn data_without_value_keeps_cached_value() {
        let mut cache = birthed("dev1", vec![Metric::new("temp", 20)]);
        let mut update = Metric::new("temp", 0);
        update.value = None;
        update.set_field("is_null", true);
        cache.apply_data("dev1", vec![update]).unwrap();
        assert_eq!(cache.get("dev1").unwrap(), &[Metric::new("temp", 20)]);
    }

    #[test]
    fn rebirth_replaces_metrics() {
        let mut cache = birthed("dev1", vec![Metric::new("temp", 20)]);
        cache.set_birth("dev1", vec![Metric::new("pressure", 1)]);
        assert_eq!(cache.get("dev1").unwrap(), &[Metric::new("pressure", 1)]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remove_device() {
        let mut cache = birthed("dev1", vec![Metric::new("temp", 20)]);
        assert!(cache.remove("dev1").is_some());
        assert!(cache.get("dev1").is_none());
        assert!(cache.remove("dev1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn keys_snapshot() {
        let mut cache = DeviceCache::new();
        cache.set_birth("dev1", vec![]);
        cache.set_birth("dev2", vec![]);
        let mut keys = cache.keys();
        keys.sort();
        assert_eq!(keys, vec!["dev1".to_string(), "dev2".to_string()]);
        cache.remove("dev1");
        assert_eq!(cache.keys(), vec!["dev2".to_string()]);
    }
}
