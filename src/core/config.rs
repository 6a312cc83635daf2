

use serde::{Deserialize, Serialize};

use crate::DEFAULT_FILTER_NAME;


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftDeleteSettings {
    /// Emit `soft_delete.rewritten` events when an event bus is attached.
    pub emit_events: bool,
    /// Hide soft-deleted rows from `find` unless the caller opts out.
    pub filter_by_default: bool,
    pub filter_name: String,
}

impl SoftDeleteSettings {
    
    pub fn new() -> Self {
        Self {
            emit_events: true,
            filter_by_default: true,
            filter_name: DEFAULT_FILTER_NAME.to_string(),
        }
    }

    
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(emit) = lookup("SOFT_DELETE_EMIT_EVENTS").and_then(|v| parse_flag(&v)) {
            config.emit_events = emit;
        }
        if let Some(filter) = lookup("SOFT_DELETE_FILTER_DEFAULT").and_then(|v| parse_flag(&v)) {
            config.filter_by_default = filter;
        }
        if let Some(name) = lookup("SOFT_DELETE_FILTER_NAME") {
            if !name.trim().is_empty() {
                config.filter_name = name;
            }
        }

        config
    }
}

impl Default for SoftDeleteSettings {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
