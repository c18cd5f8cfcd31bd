use std::collections::HashSet;

use serde_json::json;

use incident_map_core::*;
use incident_map_session::*;

const HEADERS: [&str; 14] = [
    "id", "name", "date", "lat", "long", "city", "state", "gender", "race", "officer_races", "death_cause",
    "v_armed", "age", "circumstances",
];

fn cells(i: usize) -> Vec<String> {
    let states = ["CA", "TX", "GU", "XX"];
    let races = ["Black", "White", "Unknown race", "Hispanic"];
    vec![
        i.to_string(),
        format!("Person {i}"),
        format!("20{:02}-03-01", 13 + i % 10),
        "36.1".to_string(),
        "-115.1".to_string(),
        "Somewhere".to_string(),
        states[i % 4].to_string(),
        if i % 5 == 0 { "Female" } else { "Male" }.to_string(),
        races[i % 4].to_string(),
        if i % 3 == 0 { String::new() } else { "white".to_string() },
        "Gunshot".to_string(),
        "Unarmed".to_string(),
        (18 + i % 40).to_string(),
        String::new(),
    ]
}

fn load(n: usize) -> Vec<IncidentRecord> {
    let data: Vec<Vec<String>> = (0..n).map(cells).collect();
    let rows: Vec<TabularRow<'_>> = data.iter().map(|v| TabularRow::from_pairs(&HEADERS, v)).collect();
    load_records(&ColumnRowBuilder, &rows).unwrap()
}

fn seeded_cfg() -> EngineCfg {
    EngineCfg {
        seed: Some(42),
        ..EngineCfg::default()
    }
}

#[test]
fn adapter_builds_records_from_columns() {
    let records = load(8);
    assert_eq!(records.len(), 8);
    assert_eq!(records[0].state, "California");
    assert_eq!(records[2].victim_race, "Unknown");
    assert_eq!(records[3].state, "");
    assert_eq!(records[0].officer_races, "Unknown");
    assert_eq!(records[1].officer_races, "White");
    assert_eq!(records[1].circumstances, "Unknown");
    assert_eq!(records[1].lon, -115.1);
}

#[test]
fn adapter_rejects_missing_column() {
    let row = TabularRow::new().with_cell("id", "1").with_cell("name", "A");
    let err = ColumnRowBuilder.build(&row).unwrap_err();
    assert_eq!(err, NormalizeError::MissingColumn("date".to_string()));
}

#[test]
fn adapter_rejects_bad_coordinates() {
    let mut v = cells(0);
    v[3] = "north".to_string();
    let rows = vec![TabularRow::from_pairs(&HEADERS, &v)];
    assert!(matches!(load_records(&ColumnRowBuilder, &rows), Err(NormalizeError::InvalidCoordinate { .. })));
}

#[test]
fn thousands_separator() {
    assert_eq!(format_thousands(0), "0");
    assert_eq!(format_thousands(999), "999");
    assert_eq!(format_thousands(1234), "1,234");
    assert_eq!(format_thousands(1234567), "1,234,567");
    assert_eq!(incident_label(Some(1234)), "Incidents: 1,234");
    assert_eq!(incident_label(None), "0");
}

#[test]
fn region_view_joins_on_boundary_names() {
    let agg: RegionAggregate = [("California".to_string(), 1234), ("Guam".to_string(), 2)]
        .into_iter()
        .collect();
    let view = RegionMapView::join(&agg, 1236, ["Texas", "California"], Viewport::default());

    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0], RegionRow { region_name: "Texas".into(), count: 0, display: "0".into() });
    let ca = view.row("California").unwrap();
    assert_eq!(ca.count, 1234);
    assert_eq!(ca.display, "Incidents: 1,234");
    // Guam has no boundary feature here.
    assert_eq!(view.unjoined, vec![("Guam".to_string(), 2)]);
    assert!(view.notice.is_none());

    let empty = RegionMapView::join(&RegionAggregate::default(), 0, ["Texas"], Viewport::default());
    assert_eq!(empty.notice.as_deref(), Some(NO_DATA_MESSAGE));
    assert_eq!(empty.rows[0].count, 0);
}

#[test]
fn geojson_annotation_leaves_geometry_alone() {
    let mut geo = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "name": "California" }, "geometry": { "type": "Point", "coordinates": [0, 0] } },
            { "type": "Feature", "properties": { "name": "Texas" }, "geometry": null },
            { "type": "Feature", "properties": {}, "geometry": null }
        ]
    });
    assert_eq!(boundary_names(&geo), ["California", "Texas"]);

    let agg: RegionAggregate = [("California".to_string(), 3)].into_iter().collect();
    assert_eq!(annotate_boundaries(&mut geo, &agg), 2);
    assert_eq!(geo["features"][0]["properties"]["incident"], "Incidents: 3");
    assert_eq!(geo["features"][1]["properties"]["incident"], "0");
    assert_eq!(geo["features"][0]["geometry"]["coordinates"], json!([0, 0]));
    assert!(geo["features"][2]["properties"].get("incident").is_none());
}

#[test]
fn individual_view_serializes_markers() {
    let records = load(3);
    let registry = SessionRegistry::new(Dataset::new(records), seeded_cfg(), 1).unwrap();
    let view = registry.open("s1");
    assert_eq!(view.markers.len(), 3);
    assert_eq!(view.markers[0].coordinates, (36.1, -115.1));
    assert_eq!(view.markers[0].popup.date, "2013-03-01");

    let v = serde_json::to_value(&view).unwrap();
    assert_eq!(v["markers"][0]["popup"]["state"], "California");
    assert_eq!(v["markers"][1]["popup"]["officer_races"], "White");
    assert_eq!(v["viewport"]["zoom"], 4);
    assert!(v.get("notice").is_none());
}

#[test]
fn registry_sessions_are_independent_and_stable() {
    let registry = SessionRegistry::new(Dataset::new(load(600)), seeded_cfg(), 4).unwrap();
    let a0 = registry.open("alice");
    let b0 = registry.open("bob");
    assert_eq!(a0.markers.len(), 70);
    assert_eq!(registry.session_count(), 2);

    // Re-opening and reading do not resample.
    assert_eq!(registry.open("alice"), a0);
    assert_eq!(registry.current("alice").unwrap(), a0);

    let spec = FilterSpec::any().with(Facet::Gender, "Female");
    let a1 = registry.refresh("alice", &spec);
    assert_eq!(a1.markers.len(), 70);
    assert!(a1.markers.iter().all(|m| m.popup.gender == "Female"));
    let names: HashSet<&str> = a1.markers.iter().map(|m| m.popup.name.as_str()).collect();
    assert_eq!(names.len(), 70);

    // Bob is untouched by Alice's refresh.
    assert_eq!(registry.current("bob").unwrap(), b0);

    assert!(registry.close("alice"));
    assert!(!registry.close("alice"));
    assert!(registry.current("alice").is_none());
    assert_eq!(registry.session_count(), 1);
}

#[test]
fn registry_refresh_with_no_matches_reports_notice() {
    let registry = SessionRegistry::new(Dataset::new(load(50)), seeded_cfg(), 1).unwrap();
    let spec = FilterSpec::any().with(Facet::DeathCause, "Vehicle");
    let view = registry.refresh("carol", &spec);
    assert!(view.is_empty());
    assert_eq!(view.notice.as_deref(), Some(NO_DATA_MESSAGE));
}

#[test]
fn registry_region_view_and_options() {
    let registry = SessionRegistry::new(Dataset::new(load(400)), seeded_cfg(), 2).unwrap();
    let names = ["California", "Texas", "Ohio"];
    let view = registry.region_view(&FilterSpec::any(), names);

    // 400 rows cycle CA, TX, GU, XX.
    assert_eq!(view.row("California").unwrap().count, 100);
    assert_eq!(view.row("Texas").unwrap().count, 100);
    assert_eq!(view.row("Ohio").unwrap().display, "0");
    assert_eq!(view.unjoined, vec![("Guam".to_string(), 100)]);
    assert_eq!(registry.aggregate(&FilterSpec::any()).total(), 300);

    let opts = registry.facet_options();
    assert_eq!(opts.year[0], FacetValue::Any);
    assert_eq!(opts.year[1], FacetValue::exact("2022"));
    assert_eq!(opts.gender, vec![FacetValue::Any, "Male".into(), "Female".into()]);
}

#[test]
fn region_view_without_regions_is_not_no_data() {
    // Two Black victims, neither in a known region.
    let data: Vec<Vec<String>> = [0, 4]
        .into_iter()
        .map(|i| {
            let mut v = cells(i);
            v[6] = "XX".to_string();
            v
        })
        .collect();
    let rows: Vec<TabularRow<'_>> = data.iter().map(|v| TabularRow::from_pairs(&HEADERS, v)).collect();
    let records = load_records(&ColumnRowBuilder, &rows).unwrap();
    assert!(records.iter().all(|r| r.state.is_empty() && r.victim_race == "Black"));

    let registry = SessionRegistry::new(Dataset::new(records), seeded_cfg(), 1).unwrap();
    let spec = FilterSpec::any().with(Facet::VictimRace, "Black");
    let view = registry.region_view(&spec, ["Texas"]);
    assert!(view.notice.is_none());
    assert_eq!(view.row("Texas").unwrap().count, 0);
    assert!(view.unjoined.is_empty());

    let none = registry.region_view(&FilterSpec::any().with(Facet::VictimRace, "Asian"), ["Texas"]);
    assert_eq!(none.notice.as_deref(), Some(NO_DATA_MESSAGE));
}

#[test]
fn registry_rejects_invalid_config() {
    let cfg = EngineCfg {
        sample_cap: 0,
        ..seeded_cfg()
    };
    let err = SessionRegistry::new(Dataset::new(load(3)), cfg, 1).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
