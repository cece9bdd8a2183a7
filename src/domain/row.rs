use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::entry::ProvisioningEntry;

/// One flat spreadsheet row, with headers already mapped to canonical field
/// names by the conversion map.
///
/// Only `switch_label` and `switch_ifname` are needed for a row to be usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfigRow {
    pub blueprint: Option<String>,
    pub server_label: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_external: Option<bool>,
    pub server_tags: Option<String>,
    pub switch_tags: Option<String>,
    pub link_group_ifname: Option<String>,
    pub link_group_lag_mode: Option<String>,
    pub link_group_ct_names: Option<String>,
    pub link_group_tags: Option<String>,
    pub link_tags: Option<String>,
    pub link_speed: Option<String>,
    pub server_ifname: Option<String>,
    pub switch_label: Option<String>,
    pub switch_ifname: Option<String>,
    pub comment: Option<String>,
}

impl NetworkConfigRow {
    /// The switch identifier, if the row carries a non-blank one.
    pub fn switch(&self) -> Option<&str> {
        non_blank(self.switch_label.as_deref())
    }

    pub fn interface(&self) -> Option<&str> {
        non_blank(self.switch_ifname.as_deref())
    }
}

/// Spreadsheets spell flags many ways: `true`, `TRUE`, `yes`, `1`, `x`.
/// Blank and unrecognised text read as absent.
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolLike {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<BoolLike>::deserialize(deserializer)? {
        None => None,
        Some(BoolLike::Bool(b)) => Some(b),
        Some(BoolLike::Int(i)) => Some(i != 0),
        Some(BoolLike::Text(t)) => match t.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "x" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Reverse of the entry builder: every entry maps to exactly one row,
/// preferring input values and falling back to fetched ones.
impl From<&ProvisioningEntry> for NetworkConfigRow {
    fn from(entry: &ProvisioningEntry) -> Self {
        NetworkConfigRow {
            blueprint: entry.metadata.blueprint.clone(),
            server_label: entry.server.name.preferred(),
            is_external: entry.network.is_external.preferred(),
            server_tags: entry.tags.server.preferred(),
            switch_tags: entry.tags.switch.preferred(),
            link_group_ifname: entry.lag.name.preferred(),
            link_group_lag_mode: entry.lag.mode.preferred(),
            link_group_ct_names: entry.connectivity.templates.preferred(),
            link_group_tags: entry.tags.link_group.preferred(),
            link_tags: entry.tags.link.preferred(),
            link_speed: entry.network.speed.preferred(),
            server_ifname: entry.server.interface.preferred(),
            switch_label: Some(entry.switch_name().to_string()),
            switch_ifname: Some(entry.switch_interface().to_string()),
            comment: entry.metadata.comment.clone(),
        }
    }
}
