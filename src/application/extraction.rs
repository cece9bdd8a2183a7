use anyhow::{bail, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

// ─── Logical fields ───────────────────────────────────────────────────────────

/// Logical fields the merge engine reads out of a controller record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum FetchedField {
    SwitchName,
    SwitchInterface,
    ServerName,
    ServerInterface,
    LinkSpeed,
    IsExternal,
    LagName,
    LagMode,
    ConnectivityTemplates,
}

impl FetchedField {
    pub const ALL: [FetchedField; 9] = [
        FetchedField::SwitchName,
        FetchedField::SwitchInterface,
        FetchedField::ServerName,
        FetchedField::ServerInterface,
        FetchedField::LinkSpeed,
        FetchedField::IsExternal,
        FetchedField::LagName,
        FetchedField::LagMode,
        FetchedField::ConnectivityTemplates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FetchedField::SwitchName => "switch_name",
            FetchedField::SwitchInterface => "switch_interface",
            FetchedField::ServerName => "server_name",
            FetchedField::ServerInterface => "server_interface",
            FetchedField::LinkSpeed => "link_speed",
            FetchedField::IsExternal => "is_external",
            FetchedField::LagName => "lag_name",
            FetchedField::LagMode => "lag_mode",
            FetchedField::ConnectivityTemplates => "connectivity_templates",
        }
    }

    fn default_paths(&self) -> &'static [&'static str] {
        match self {
            FetchedField::SwitchName => &["switch.label", "switch.hostname", "leaf.label"],
            FetchedField::SwitchInterface => &["switch_intf.if_name", "intf1.if_name"],
            FetchedField::ServerName => &[
                "server.label",
                "server.hostname",
                "generic.label",
                "system.label",
            ],
            FetchedField::ServerInterface => {
                &["server_intf.if_name", "intf2.if_name", "server.if_name"]
            }
            FetchedField::LinkSpeed => &["link1.speed", "link.speed", "speed"],
            FetchedField::IsExternal => &["server.external", "generic.external", "external"],
            FetchedField::LagName => &["evpn1.if_name", "lag.if_name", "link_group.ifname"],
            FetchedField::LagMode => &["evpn1.lag_mode", "lag.mode", "aggregation.mode"],
            FetchedField::ConnectivityTemplates => &[
                "ct_names",
                "connectivity_templates[*].label",
                "ct[*].label",
            ],
        }
    }
}

impl FromStr for FetchedField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        FetchedField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = FetchedField::ALL.iter().map(|f| f.as_str()).collect();
                anyhow::anyhow!(
                    "unknown extraction field '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                )
            })
    }
}

impl std::fmt::Display for FetchedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Rule table ───────────────────────────────────────────────────────────────

/// Ordered accessor paths for one logical field. The first path that yields
/// a non-empty value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRule {
    pub field: FetchedField,
    pub paths: Vec<String>,
}

/// The full fallback policy, one rule per logical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRules {
    rules: BTreeMap<FetchedField, ExtractionRule>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        let rules = FetchedField::ALL
            .iter()
            .map(|&field| {
                let paths = field.default_paths().iter().map(|p| p.to_string()).collect();
                (field, ExtractionRule { field, paths })
            })
            .collect();
        Self { rules }
    }
}

impl ExtractionRules {
    /// Replace the path list of every field named in `overrides`.
    ///
    /// Unknown field names and empty path lists are configuration errors.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        for (name, paths) in overrides {
            let field: FetchedField = name.parse()?;
            if paths.iter().all(|p| p.trim().is_empty()) {
                bail!("extraction field '{}' needs at least one path", name);
            }
            self.rules.insert(
                field,
                ExtractionRule {
                    field,
                    paths: paths.clone(),
                },
            );
        }
        Ok(self)
    }

    /// Evaluate `field`'s paths against `record` in priority order.
    ///
    /// Returns the first non-empty value, coerced to a string.
    pub fn extract(&self, field: FetchedField, record: &Map<String, Value>) -> Option<String> {
        let rule = self.rules.get(&field)?;

        for path in &rule.paths {
            if let Some(value) = resolve_path(path, record).and_then(|v| coerce_to_string(&v)) {
                debug!(field = %field, path = %path, value = %value, "extracted");
                return Some(value);
            }
        }

        debug!(field = %field, "no extraction path matched");
        None
    }

    /// Boolean view of [`extract`](Self::extract); non-boolean text is absent.
    pub fn extract_bool(&self, field: FetchedField, record: &Map<String, Value>) -> Option<bool> {
        let raw = self.extract(field, record)?;
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => {
                debug!(field = %field, value = %raw, "not a boolean, ignoring");
                None
            }
        }
    }
}

// ─── Path evaluation ──────────────────────────────────────────────────────────

/// Resolve a dotted accessor path against a record.
///
/// `$` segments are root markers and skipped. `name?` is an optional segment
/// (same lookup, kept for compatibility with hand-written maps). `name[*]`
/// projects the rest of the path over every element of the array `name`,
/// dropping elements where it does not resolve.
fn resolve_path(path: &str, record: &Map<String, Value>) -> Option<Value> {
    let segments: Vec<&str> = path
        .split('.')
        .filter(|s| !s.is_empty() && !s.starts_with('$'))
        .collect();
    let (head, rest) = segments.split_first()?;
    let (name, project) = parse_segment(head);
    descend(record.get(name)?, rest, project)
}

fn resolve_segments(segments: &[&str], current: &Value) -> Option<Value> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(current.clone());
    };
    let (name, project) = parse_segment(head);
    descend(current.get(name)?, rest, project)
}

fn descend(value: &Value, rest: &[&str], project: bool) -> Option<Value> {
    if !project {
        return resolve_segments(rest, value);
    }
    let projected: Vec<Value> = value
        .as_array()?
        .iter()
        .filter_map(|item| resolve_segments(rest, item))
        .filter(|v| !v.is_null())
        .collect();
    Some(Value::Array(projected))
}

fn parse_segment(segment: &str) -> (&str, bool) {
    match segment.strip_suffix("[*]") {
        Some(name) => (name, true),
        None => (segment.strip_suffix('?').unwrap_or(segment), false),
    }
}

/// Strings are trimmed, scalars use their display form, arrays of scalars
/// are comma-joined. Empty results and objects count as absent.
fn coerce_to_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::Null | Value::Object(_) => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .filter(|v| !v.is_array())
            .filter_map(coerce_to_string)
            .collect::<Vec<_>>()
            .join(","),
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
