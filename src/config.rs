//! JSON configuration store backed by ~/.sagesh/config.json.
//!
//! Settings live in a single `serde_json::Value` tree addressed by dotted
//! key paths. Loading merges the user file over built-in defaults so new
//! settings appear automatically and unknown user keys survive round trips.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

pub fn state_dir() -> PathBuf {
    dirs::home_dir()
        .expect("Could not determine home directory")
        .join(".sagesh")
}

fn defaults() -> Value {
    json!({
        "terminal": {
            "history_size": 1000,
            "prompt_style": "simple",
            "start_with_sudo": false
        },
        "ai": {
            "model": "llama2",
            "enabled": true,
            "help_on_error": true,
            "base_url": "http://localhost:11434"
        }
    })
}

fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                if let Some(base_val) = base_map.get_mut(key) {
                    deep_merge(base_val, overlay_val);
                } else {
                    base_map.insert(key.clone(), overlay_val.clone());
                }
            }
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    settings: Value,
}

impl ConfigStore {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(state_dir().join("config.json"))
    }

    pub fn load_from(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut store = Self {
            path,
            settings: defaults(),
        };

        if !store.path.exists() {
            eprintln!("Creating config file at {}", store.path.display());
            store.save_quiet();
            return Ok(store);
        }

        let content = match std::fs::read_to_string(&store.path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Warning: Could not load config file ({e}). Using defaults.");
                store.save_quiet();
                return Ok(store);
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(user) if user.is_object() => {
                let mut merged = defaults();
                deep_merge(&mut merged, &user);
                let gained_defaults = merged != user;
                store.settings = merged;
                if gained_defaults {
                    store.save_quiet();
                }
            }
            Ok(_) => {
                eprintln!("Warning: config file is not a JSON object. Using defaults.");
                store.save_quiet();
            }
            Err(e) => {
                eprintln!("Warning: Could not load config file ({e}). Using defaults.");
                store.save_quiet();
            }
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut content = serde_json::to_string_pretty(&self.settings)?;
        content.push('\n');
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn save_quiet(&self) {
        if let Err(e) = self.save() {
            eprintln!("Warning: Could not save config file: {e}");
        }
    }

    /// Look up a value by dotted key path, e.g. `ai.model`.
    pub fn get(&self, key_path: &str) -> Option<&Value> {
        let mut current = &self.settings;
        for segment in key_path.split('.') {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Set a value by dotted key path, creating intermediate objects as
    /// needed. A non-object intermediate gets replaced.
    pub fn set(&mut self, key_path: &str, value: Value) {
        let segments: Vec<&str> = key_path.split('.').collect();
        let (leaf, parents) = match segments.split_last() {
            Some((leaf, parents)) => (*leaf, parents),
            None => return,
        };
        let mut current = &mut self.settings;
        for segment in parents {
            if !current.is_object() {
                *current = Value::Object(serde_json::Map::new());
            }
            current = match current {
                Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
                _ => return,
            };
        }
        if !current.is_object() {
            *current = Value::Object(serde_json::Map::new());
        }
        if let Value::Object(map) = current {
            map.insert(leaf.to_string(), value);
        }
    }

    pub fn to_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.settings).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn ai_enabled(&self) -> bool {
        self.get("ai.enabled").and_then(Value::as_bool).unwrap_or(true)
    }

    pub fn help_on_error(&self) -> bool {
        self.get("ai.help_on_error")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    pub fn model(&self) -> String {
        self.get("ai.model")
            .and_then(Value::as_str)
            .unwrap_or("llama2")
            .to_string()
    }

    pub fn set_model(&mut self, model: &str) -> anyhow::Result<()> {
        self.set("ai.model", Value::String(model.to_string()));
        self.save()
    }

    /// Ollama base URL with any trailing slash removed.
    pub fn base_url(&self) -> String {
        self.get("ai.base_url")
            .and_then(Value::as_str)
            .unwrap_or("http://localhost:11434")
            .trim_end_matches('/')
            .to_string()
    }

    pub fn history_size(&self) -> usize {
        self.get("terminal.history_size")
            .and_then(Value::as_u64)
            .unwrap_or(1000) as usize
    }

    pub fn start_with_sudo(&self) -> bool {
        self.get("terminal.start_with_sudo")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn history_path(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) => parent.join("history"),
            None => state_dir().join("history"),
        }
    }

    fn marker_path(&self, name: &str) -> Option<PathBuf> {
        self.path
            .parent()
            .map(|parent| parent.join(format!(".{name}_completed")))
    }

    pub fn marker_exists(&self, name: &str) -> bool {
        self.marker_path(name).map_or(false, |path| path.exists())
    }

    /// Drop a completion marker in the state directory. Best effort.
    pub fn write_marker(&self, name: &str) {
        if let Some(path) = self.marker_path(name) {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = std::fs::write(path, b"");
        }
    }
}
