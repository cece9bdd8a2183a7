use tracing::{debug, warn};

use crate::application::speed::normalize_speed_opt;
use crate::domain::{
    entry::{EntrySource, FieldPair, ProvisioningEntry},
    entry_set::EntrySet,
    row::NetworkConfigRow,
    value_objects::ConnectionKey,
};

/// Convert spreadsheet rows into canonical entries keyed by connection.
///
/// Rows missing either identity field are skipped. A row whose connection
/// key was already seen is skipped too: the first row claiming a connection
/// wins and the two are never merged. Only input sides are populated.
pub fn build_entries(rows: &[NetworkConfigRow]) -> EntrySet {
    let mut entries = EntrySet::new();

    for (index, row) in rows.iter().enumerate() {
        let (switch, interface) = match (row.switch(), row.interface()) {
            (Some(s), Some(i)) => (s, i),
            _ => {
                warn!(
                    row = index,
                    switch_label = ?row.switch_label,
                    switch_ifname = ?row.switch_ifname,
                    "skipping row without switch identity"
                );
                continue;
            }
        };

        let key = ConnectionKey::new(switch, interface);
        if entries.contains(&key) {
            warn!(row = index, key = %key, "skipping duplicate connection key, first row wins");
            continue;
        }

        entries.insert(entry_from_row(row, switch, interface));
    }

    debug!(rows = rows.len(), entries = entries.len(), "built entries");
    entries
}

fn entry_from_row(row: &NetworkConfigRow, switch: &str, interface: &str) -> ProvisioningEntry {
    let mut entry = ProvisioningEntry::new(switch, interface, EntrySource::InputOnly);

    entry.server.name = FieldPair::from_input(row.server_label.clone());
    entry.server.interface = FieldPair::from_input(row.server_ifname.clone());
    entry.network.speed = FieldPair::from_input(normalize_speed_opt(row.link_speed.as_deref()));
    entry.network.is_external = FieldPair::from_input(row.is_external);
    entry.lag.name = FieldPair::from_input(row.link_group_ifname.clone());
    entry.lag.mode = FieldPair::from_input(row.link_group_lag_mode.clone());
    entry.connectivity.templates = FieldPair::from_input(row.link_group_ct_names.clone());
    entry.tags.server = FieldPair::from_input(row.server_tags.clone());
    entry.tags.switch = FieldPair::from_input(row.switch_tags.clone());
    entry.tags.link = FieldPair::from_input(row.link_tags.clone());
    entry.tags.link_group = FieldPair::from_input(row.link_group_tags.clone());

    entry.metadata.blueprint = row.blueprint.clone();
    entry.metadata.comment = row.comment.clone();
    entry
}
