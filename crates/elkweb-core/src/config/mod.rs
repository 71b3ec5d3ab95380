use crate::defaults::DefaultSizes;
use crate::parse::ParseError;
use serde_json::{Map, Value, json};

/// Editor settings as a JSON object with dotted-path access.
///
/// User files only need to name the keys they override; everything else comes from
/// [`EditorConfig::default`].
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig(Value);

impl Default for EditorConfig {
    fn default() -> Self {
        Self(json!({
            "clientId": "sprotty",
            "layoutVersion": "snapshot",
            "applyDefaults": true,
            "defaults": {
                "nodeSize": 30,
                "portSize": 5,
                "labelCharWidth": 9,
                "labelHeight": 16
            }
        }))
    }
}

impl EditorConfig {
    /// Defaults with the overrides in `text` (JSON5) merged on top.
    pub fn from_json5_str(text: &str) -> Result<Self, ParseError> {
        let overrides: Value = json5::from_str(text)?;
        let mut config = Self::default();
        config.merge(&overrides);
        Ok(config)
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.lookup(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.lookup(dotted_path)?.as_f64()
    }

    /// Sets one dotted key, replacing any non-object value met on the way.
    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        let mut slot = &mut self.0;
        for segment in dotted_path.split('.') {
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(map) = slot.as_object_mut() else {
                return;
            };
            slot = map.entry(segment).or_insert(Value::Null);
        }
        *slot = value;
    }

    /// Objects merge key by key; any other override replaces what was there.
    pub fn merge(&mut self, overrides: &Value) {
        merge_into(&mut self.0, overrides);
    }

    pub fn client_id(&self) -> &str {
        self.get_str("clientId").unwrap_or("sprotty")
    }

    /// The configured engine version, if any. Resolving a fallback is up to the caller.
    pub fn layout_version(&self) -> Option<&str> {
        self.get_str("layoutVersion")
    }

    pub fn apply_defaults(&self) -> bool {
        self.get_bool("applyDefaults").unwrap_or(true)
    }

    pub fn default_sizes(&self) -> DefaultSizes {
        let base = DefaultSizes::default();
        DefaultSizes {
            node_size: self.get_f64("defaults.nodeSize").unwrap_or(base.node_size),
            port_size: self.get_f64("defaults.portSize").unwrap_or(base.port_size),
            label_char_width: self
                .get_f64("defaults.labelCharWidth")
                .unwrap_or(base.label_char_width),
            label_height: self
                .get_f64("defaults.labelHeight")
                .unwrap_or(base.label_height),
        }
    }
}

fn merge_into(slot: &mut Value, overrides: &Value) {
    if let (Value::Object(base), Value::Object(overrides)) = (&mut *slot, overrides) {
        for (key, value) in overrides {
            merge_into(base.entry(key.clone()).or_insert(Value::Null), value);
        }
        return;
    }
    *slot = overrides.clone();
}

#[cfg(test)]
mod tests {
    use super::EditorConfig;
    use serde_json::json;

    #[test]
    fn overrides_merge_onto_defaults() {
        let config = EditorConfig::from_json5_str("{ defaults: { nodeSize: 50 }, clientId: 'web' }")
            .unwrap();
        let sizes = config.default_sizes();
        assert_eq!(sizes.node_size, 50.0);
        assert_eq!(sizes.port_size, 5.0);
        assert_eq!(config.client_id(), "web");
        assert_eq!(config.layout_version(), Some("snapshot"));
    }

    #[test]
    fn set_value_creates_intermediate_objects() {
        let mut config = EditorConfig::default();
        config.set_value("clientId.name", json!("web"));
        assert_eq!(config.get_str("clientId.name"), Some("web"));
        assert_eq!(config.client_id(), "sprotty");

        config.set_value("defaults.labelHeight", json!(20));
        assert_eq!(config.default_sizes().label_height, 20.0);
        assert_eq!(config.default_sizes().node_size, 30.0);
    }

    #[test]
    fn merge_replaces_scalars_and_keeps_sibling_keys() {
        let mut config = EditorConfig::default();
        config.merge(&json!({ "defaults": { "portSize": 8 }, "applyDefaults": false }));
        config.merge(&json!({ "defaults": null }));
        assert!(!config.apply_defaults());
        assert_eq!(config.default_sizes().port_size, 5.0);
        assert_eq!(config.layout_version(), Some("snapshot"));
    }
}
