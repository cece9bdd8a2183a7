use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::application::extraction::{ExtractionRules, FetchedField};
use crate::application::speed::normalize_speed_opt;
use crate::domain::{
    api_data::ApiDataMap,
    entry::{EntrySource, ProvisioningEntry, ONLY_IN_BLUEPRINT},
    entry_set::EntrySet,
    value_objects::ConnectionKey,
};

/// Fold controller payloads into the canonical entries.
///
/// - Entries whose key has a payload get their fetched sides refreshed and
///   are touched. Input-only entries become `both`; `api-only` and `both`
///   keep their provenance. Input sides and identity are left alone.
/// - Payload keys with no entry become `api-only` entries appended after the
///   existing ones, in key order, commented [`ONLY_IN_BLUEPRINT`].
/// - Entries without a payload pass through unchanged.
///
/// Nothing is ever removed, so every key of either input appears exactly once
/// in the result.
pub fn merge_api_data(
    entries: &EntrySet,
    api_data: &ApiDataMap,
    rules: &ExtractionRules,
) -> EntrySet {
    let mut merged = entries.clone();
    let mut updated = 0usize;
    let mut synthesized = 0usize;

    for (key, record) in api_data.iter() {
        match merged.get_mut(key) {
            Some(entry) => {
                apply_fetched(entry, record, rules);
                if entry.metadata.source == EntrySource::InputOnly {
                    entry.metadata.source = EntrySource::Both;
                }
                entry.touch();
                updated += 1;
            }
            None => {
                merged.insert(api_only_entry(key, record, rules));
                synthesized += 1;
            }
        }
    }

    info!(
        entries = entries.len(),
        api_records = api_data.len(),
        updated,
        synthesized,
        "merged controller data"
    );
    merged
}

fn api_only_entry(
    key: &ConnectionKey,
    record: &Map<String, Value>,
    rules: &ExtractionRules,
) -> ProvisioningEntry {
    let (switch_name, switch_interface) = recover_identity(key, record, rules);
    debug!(key = %key, switch = %switch_name, interface = %switch_interface, "synthesizing api-only entry");

    let mut entry = ProvisioningEntry::with_key(
        key.clone(),
        &switch_name,
        &switch_interface,
        EntrySource::ApiOnly,
    );
    apply_fetched(&mut entry, record, rules);
    entry.metadata.comment = Some(ONLY_IN_BLUEPRINT.to_string());
    entry
}

/// Prefer the record's own switch/interface when they reproduce the key,
/// otherwise split the key.
fn recover_identity(
    key: &ConnectionKey,
    record: &Map<String, Value>,
    rules: &ExtractionRules,
) -> (String, String) {
    let switch = rules.extract(FetchedField::SwitchName, record);
    let interface = rules.extract(FetchedField::SwitchInterface, record);

    if let (Some(s), Some(i)) = (switch, interface) {
        if ConnectionKey::new(&s, &i) == *key {
            return (s, i);
        }
        debug!(key = %key, switch = %s, interface = %i, "record identity disagrees with key, splitting key");
    }
    key.split()
}

fn apply_fetched(entry: &mut ProvisioningEntry, record: &Map<String, Value>, rules: &ExtractionRules) {
    entry.server.name.fetched = rules.extract(FetchedField::ServerName, record);
    entry.server.interface.fetched = rules.extract(FetchedField::ServerInterface, record);
    entry.network.speed.fetched =
        normalize_speed_opt(rules.extract(FetchedField::LinkSpeed, record).as_deref());
    entry.network.is_external.fetched = rules.extract_bool(FetchedField::IsExternal, record);
    entry.lag.name.fetched = rules.extract(FetchedField::LagName, record);
    entry.lag.mode.fetched = rules.extract(FetchedField::LagMode, record);
    entry.connectivity.templates.fetched =
        rules.extract(FetchedField::ConnectivityTemplates, record);
    entry.raw_api_data = Some(Value::Object(record.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::builder::build_entries;
    use crate::domain::row::NetworkConfigRow;
    use serde_json::json;

    fn api(v: Value) -> ApiDataMap {
        ApiDataMap::from_value(v).unwrap()
    }

    fn rows() -> Vec<NetworkConfigRow> {
        vec![
            NetworkConfigRow {
                switch_label: Some("leaf-01".into()),
                switch_ifname: Some("et-0/0/1".into()),
                server_label: Some("srv1".into()),
                link_speed: Some("25G".into()),
                ..Default::default()
            },
            NetworkConfigRow {
                switch_label: Some("leaf-01".into()),
                switch_ifname: Some("et-0/0/2".into()),
                server_label: Some("srv2".into()),
                ..Default::default()
            },
        ]
    }

    fn key(s: &str) -> ConnectionKey {
        ConnectionKey::from(s)
    }

    #[test]
    fn matching_key_fills_fetched_side() {
        let entries = build_entries(&rows());
        let data = api(json!({
            "leaf-01-et-0/0/1": {
                "server": {"label": "srv1"},
                "link1": {"speed": "25 Gbps"},
                "evpn1": {"if_name": "ae1", "lag_mode": "lacp_active"}
            }
        }));

        let merged = merge_api_data(&entries, &data, &ExtractionRules::default());
        let entry = merged.get(&key("leaf-01-et-0/0/1")).unwrap();

        assert_eq!(entry.metadata.source, EntrySource::Both);
        assert_eq!(entry.server.name.input.as_deref(), Some("srv1"));
        assert_eq!(entry.server.name.fetched.as_deref(), Some("srv1"));
        assert_eq!(entry.network.speed.fetched.as_deref(), Some("25G"));
        assert_eq!(entry.lag.name.fetched.as_deref(), Some("ae1"));
        assert_eq!(entry.lag.mode.fetched.as_deref(), Some("lacp_active"));
        assert!(entry.raw_api_data.is_some());
        assert!(entry.metadata.last_updated >= entries.iter().next().unwrap().metadata.last_updated);
    }

    #[test]
    fn unrecognized_fetched_speed_passes_through() {
        let entries = build_entries(&rows());
        let data = api(json!({
            "leaf-01-et-0/0/1": {"server": {"label": "srv1"}, "link1": {"speed": "25000"}}
        }));
        let merged = merge_api_data(&entries, &data, &ExtractionRules::default());
        let entry = merged.get(&key("leaf-01-et-0/0/1")).unwrap();
        assert_eq!(entry.network.speed.input.as_deref(), Some("25G"));
        assert_eq!(entry.network.speed.fetched.as_deref(), Some("25000"));
    }

    #[test]
    fn entries_without_payload_pass_through() {
        let entries = build_entries(&rows());
        let data = api(json!({"leaf-01-et-0/0/1": {}}));
        let merged = merge_api_data(&entries, &data, &ExtractionRules::default());

        let untouched = merged.get(&key("leaf-01-et-0/0/2")).unwrap();
        let original = entries.get(&key("leaf-01-et-0/0/2")).unwrap();
        assert_eq!(untouched, original);
        assert_eq!(untouched.metadata.source, EntrySource::InputOnly);
    }

    #[test]
    fn unknown_key_synthesizes_api_only_entry() {
        let entries = build_entries(&rows());
        let data = api(json!({
            "leaf-02-et-0/0/3": {"server": {"label": "srv9"}}
        }));
        let merged = merge_api_data(&entries, &data, &ExtractionRules::default());

        assert_eq!(merged.len(), 3);
        let entry = merged.get(&key("leaf-02-et-0/0/3")).unwrap();
        assert_eq!(entry.metadata.source, EntrySource::ApiOnly);
        assert_eq!(entry.metadata.comment.as_deref(), Some(ONLY_IN_BLUEPRINT));
        assert_eq!(entry.switch_name(), "leaf-02");
        assert_eq!(entry.switch_interface(), "et-0/0/3");
        assert!(entry.server.name.input.is_none());
        assert_eq!(entry.server.name.fetched.as_deref(), Some("srv9"));

        // appended after the spreadsheet entries
        assert_eq!(merged.as_slice()[2].key(), &key("leaf-02-et-0/0/3"));
    }

    #[test]
    fn api_only_identity_prefers_record_fields() {
        let data = api(json!({
            "border-leaf-a-xe-1/0/1": {
                "switch": {"label": "border-leaf-a"},
                "switch_intf": {"if_name": "xe-1/0/1"}
            }
        }));
        let merged = merge_api_data(&EntrySet::new(), &data, &ExtractionRules::default());
        let entry = merged.iter().next().unwrap();
        assert_eq!(entry.switch_name(), "border-leaf-a");
        assert_eq!(entry.switch_interface(), "xe-1/0/1");
    }

    #[test]
    fn api_only_identity_ignores_disagreeing_record() {
        let data = api(json!({
            "leaf-02-et-0/0/3": {
                "switch": {"label": "something-else"},
                "switch_intf": {"if_name": "et-0/0/3"}
            }
        }));
        let merged = merge_api_data(&EntrySet::new(), &data, &ExtractionRules::default());
        let entry = merged.iter().next().unwrap();
        assert_eq!(entry.switch_name(), "leaf-02");
        assert_eq!(entry.key(), &key("leaf-02-et-0/0/3"));
    }

    #[test]
    fn remerge_keeps_api_only_provenance() {
        let data = api(json!({"leaf-02-et-0/0/3": {"server": {"label": "srv9"}}}));
        let first = merge_api_data(&build_entries(&rows()), &data, &ExtractionRules::default());

        let refreshed = api(json!({"leaf-02-et-0/0/3": {"server": {"label": "srv10"}}}));
        let second = merge_api_data(&first, &refreshed, &ExtractionRules::default());

        let entry = second.get(&key("leaf-02-et-0/0/3")).unwrap();
        assert_eq!(entry.metadata.source, EntrySource::ApiOnly);
        assert_eq!(entry.metadata.comment.as_deref(), Some(ONLY_IN_BLUEPRINT));
        assert_eq!(entry.server.name.fetched.as_deref(), Some("srv10"));
        assert_eq!(second.len(), first.len());
    }

    #[test]
    fn merge_is_total() {
        let entries = build_entries(&rows());
        let data = api(json!({
            "leaf-01-et-0/0/1": {},
            "leaf-03-et-0/0/1": {},
            "leaf-04-et-0/0/8": {}
        }));
        let merged = merge_api_data(&entries, &data, &ExtractionRules::default());

        let mut expected: Vec<ConnectionKey> = entries.keys().cloned().collect();
        for (k, _) in data.iter() {
            if !expected.contains(k) {
                expected.push(k.clone());
            }
        }
        assert_eq!(merged.len(), expected.len());
        for k in &expected {
            assert_eq!(merged.keys().filter(|m| *m == k).count(), 1, "key {k}");
        }
    }

    #[test]
    fn input_collection_is_not_mutated() {
        let entries = build_entries(&rows());
        let before = entries.clone();
        let data = api(json!({"leaf-01-et-0/0/1": {"server": {"label": "x"}}}));
        let _ = merge_api_data(&entries, &data, &ExtractionRules::default());
        assert_eq!(entries, before);
    }
}
