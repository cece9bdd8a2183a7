use std::io::Write;

use linkrecon::{
    analyze, build_entries, merge_api_data, reconcile, ApiDataMap, AppConfig, ConnectionKey,
    EntrySource, ExtractionRules, FieldStatus, NetworkConfigRow, OverallStatus,
    ONLY_IN_BLUEPRINT,
};
use serde_json::json;

fn row(switch: &str, intf: &str) -> NetworkConfigRow {
    NetworkConfigRow {
        switch_label: Some(switch.into()),
        switch_ifname: Some(intf.into()),
        ..Default::default()
    }
}

fn srv1_row() -> NetworkConfigRow {
    NetworkConfigRow {
        server_label: Some("srv1".into()),
        link_speed: Some("25G".into()),
        ..row("leaf-01", "et-0/0/1")
    }
}

fn api(v: serde_json::Value) -> ApiDataMap {
    ApiDataMap::from_value(v).unwrap()
}

fn key(s: &str) -> ConnectionKey {
    ConnectionKey::from(s)
}

#[test]
fn row_becomes_input_only_entry() {
    let entries = build_entries(&[srv1_row()]);

    assert_eq!(entries.len(), 1);
    let entry = entries.get(&key("leaf-01-et-0/0/1")).unwrap();
    assert_eq!(entry.server.name.input.as_deref(), Some("srv1"));
    assert_eq!(entry.network.speed.input.as_deref(), Some("25G"));
    assert_eq!(entry.source(), EntrySource::InputOnly);
}

#[test]
fn unrecognised_fetched_speed_is_reported_as_mismatch() {
    let built = build_entries(&[srv1_row()]);
    let merged = merge_api_data(
        &built,
        &api(json!({
            "leaf-01-et-0/0/1": {"server": {"label": "srv1"}, "link1": {"speed": "25000"}}
        })),
        &ExtractionRules::default(),
    );

    let analysis = analyze(&merged);
    let speed = analysis.entries[0]
        .comparisons
        .iter()
        .find(|c| c.field == "link_speed")
        .unwrap();
    assert_eq!(speed.input_value.as_deref(), Some("25G"));
    assert_eq!(speed.fetched_value.as_deref(), Some("25000"));
    assert_eq!(speed.status, FieldStatus::Mismatch);
    assert_eq!(analysis.entries[0].overall_status, OverallStatus::PartialMatch);
}

#[test]
fn blueprint_only_connection_is_synthesized() {
    let built = build_entries(&[srv1_row()]);
    let merged = merge_api_data(
        &built,
        &api(json!({
            "leaf-01-et-0/0/1": {"server": {"label": "srv1"}},
            "leaf-02-et-0/0/3": {"server": {"label": "srv9"}}
        })),
        &ExtractionRules::default(),
    );

    let extra = merged.get(&key("leaf-02-et-0/0/3")).unwrap();
    assert_eq!(extra.source(), EntrySource::ApiOnly);
    assert_eq!(extra.metadata.comment.as_deref(), Some(ONLY_IN_BLUEPRINT));
    assert_eq!(extra.switch_name(), "leaf-02");
    assert_eq!(extra.switch_interface(), "et-0/0/3");

    let analysis = analyze(&merged);
    let status = analysis
        .entries
        .iter()
        .find(|e| e.entry.key() == &key("leaf-02-et-0/0/3"))
        .map(|e| e.overall_status);
    assert_eq!(status, Some(OverallStatus::FetchedOnly));
}

#[test]
fn duplicate_rows_keep_the_first() {
    let second = NetworkConfigRow {
        server_label: Some("srv-dup".into()),
        ..row("leaf-01", "et-0/0/1")
    };
    let entries = build_entries(&[srv1_row(), second]);

    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries.get(&key("leaf-01-et-0/0/1")).unwrap().server.name.input.as_deref(),
        Some("srv1")
    );
}

#[test]
fn template_lists_compare_as_sets() {
    let input = NetworkConfigRow {
        link_group_ct_names: Some("CT1, CT2".into()),
        ..row("leaf-01", "et-0/0/1")
    };
    let merged = merge_api_data(
        &build_entries(&[input]),
        &api(json!({"leaf-01-et-0/0/1": {"ct_names": "CT2,CT1"}})),
        &ExtractionRules::default(),
    );

    let analysis = analyze(&merged);
    let templates = analysis.entries[0]
        .comparisons
        .iter()
        .find(|c| c.field == "connectivity_templates")
        .unwrap();
    assert_eq!(templates.status, FieldStatus::Match);
    assert!(templates.matches);
}

#[test]
fn fully_agreeing_entry_is_complete_match() {
    let input = NetworkConfigRow {
        server_label: Some("srv1".into()),
        server_ifname: Some("eth0".into()),
        link_speed: Some("25G".into()),
        is_external: Some(false),
        link_group_ifname: Some("ae1".into()),
        link_group_lag_mode: Some("lacp_active".into()),
        link_group_ct_names: Some("CT1,CT2".into()),
        ..row("leaf-01", "et-0/0/1")
    };
    let payload = json!({
        "leaf-01-et-0/0/1": {
            "server": {"label": "srv1", "external": false},
            "server_intf": {"if_name": "eth0"},
            "link1": {"speed": "25 Gbps"},
            "evpn1": {"if_name": "ae1", "lag_mode": "lacp_active"},
            "ct_names": ["CT2", "CT1"]
        }
    });

    let result = reconcile(&[input], &api(payload), &ExtractionRules::default());
    let entry = &result.analysis.entries[0];

    assert_eq!(entry.comparisons.len(), 7);
    assert!(entry.comparisons.iter().all(|c| c.status == FieldStatus::Match));
    assert_eq!(entry.match_score, 100.0);
    assert_eq!(entry.overall_status, OverallStatus::CompleteMatch);
}

#[test]
fn rows_on_switches_unknown_to_the_blueprint_are_dropped() {
    let result = reconcile(
        &[srv1_row(), row("leaf-07", "et-0/0/1"), NetworkConfigRow {
            switch_label: Some("leaf-01".into()),
            switch_ifname: Some("et-0/0/9".into()),
            ..Default::default()
        }],
        &api(json!({"leaf-01-et-0/0/1": {"server": {"label": "srv1"}}})),
        &ExtractionRules::default(),
    );

    let keys: Vec<&str> = result.entries.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["leaf-01-et-0/0/1", "leaf-01-et-0/0/9"]);

    let a = &result.analysis;
    assert_eq!(
        a.complete_matches + a.partial_matches + a.no_matches + a.input_only_entries
            + a.fetched_only_entries,
        a.total_entries
    );
}

#[tokio::test]
async fn run_reads_configured_files() {
    let dir = tempfile::tempdir().unwrap();
    let rows_path = dir.path().join("rows.csv");
    let snapshot_path = dir.path().join("blueprint.json");
    let config_path = dir.path().join("linkrecon.toml");

    std::fs::write(
        &rows_path,
        "switch_label,switch_ifname,server_label,link_speed\n\
         leaf-01,et-0/0/1,srv1,25G\n",
    )
    .unwrap();
    std::fs::write(
        &snapshot_path,
        r#"{"leaf-01-et-0/0/1": {"server": {"label": "srv1"}, "link1": {"speed": "25G"}}}"#,
    )
    .unwrap();

    let mut config = std::fs::File::create(&config_path).unwrap();
    write!(
        config,
        "[input]\nrows = {:?}\n\n[controller]\nsnapshot = {:?}\n\n[output]\ndir = {:?}\n",
        rows_path.to_str().unwrap(),
        snapshot_path.to_str().unwrap(),
        dir.path().join("out").to_str().unwrap(),
    )
    .unwrap();

    let cfg = AppConfig::load(config_path.to_str().unwrap()).unwrap();
    let (result, perf) = linkrecon::run_with_timing(&cfg).await.unwrap();

    assert!(result.merged);
    assert_eq!(result.analysis.complete_matches, 1);
    assert_eq!(perf.total_records_fetched, 2);
    assert!(perf.timings.iter().any(|t| t.operation == "fetch_rows"));
    assert!(perf.timings.iter().any(|t| t.operation == "analyze"));
}
