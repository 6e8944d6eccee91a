//! Tests for whole-file CSV mapping

use super::super::mapper::normalize_parameters;
use super::{create_glider_csv, create_test_csv, default_parameters, utc_mapper};
use crate::Error;
use crate::app::services::csv_mapper::CsvObservationMapper;
use crate::config::OutputTimeZone;
use std::str::FromStr;

#[test]
fn test_map_single_row_scenario() {
    let csv = create_test_csv(&["1631968840,58.144699,7.998280,33.33,69.69,420.69"]);

    let result = utc_mapper().map_str(&default_parameters(), &csv).unwrap();

    let temperature = result.observations_for("temperature");
    let conductivity = result.observations_for("conductivity");
    assert_eq!(temperature.len(), 1);
    assert_eq!(conductivity.len(), 1);

    assert_eq!(temperature[0].body.value, "69.69");
    assert_eq!(conductivity[0].body.value, "420.69");
    assert_eq!(temperature[0].time, "2021-09-18T12:40:40Z");
    assert_eq!(temperature[0].time, conductivity[0].time);

    let pos = &temperature[0].body.pos;
    assert_eq!(pos.lat, "58.144699");
    assert_eq!(pos.lon, "7.998280");
    assert_eq!(pos.depth, "33.33");
    assert_eq!(pos.qc_flag, "2");
    assert_eq!(pos, &conductivity[0].body.pos);

    assert_eq!(temperature[0].body.qc_flag, "2");
    assert_eq!(conductivity[0].body.qc_flag, "2");
}

#[test]
fn test_map_row_count_and_alignment() {
    let rows: Vec<String> = (0..25)
        .map(|i| {
            format!(
                "{},{}.5,{}.25,{},{}.1,{}.2",
                1631968840 + i * 60,
                58 + i % 3,
                7 + i % 5,
                i,
                i,
                i
            )
        })
        .collect();
    let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let csv = create_test_csv(&row_refs);

    let result = utc_mapper().map_str(&default_parameters(), &csv).unwrap();

    assert_eq!(result.observations.len(), 2);
    assert_eq!(result.stats.rows_mapped, 25);
    assert_eq!(result.stats.parameters_mapped, 2);
    assert_eq!(result.stats.observations_created, 50);

    let temperature = result.observations_for("temperature");
    let conductivity = result.observations_for("conductivity");
    assert_eq!(temperature.len(), 25);
    assert_eq!(conductivity.len(), 25);

    for (i, (t, c)) in temperature.iter().zip(conductivity).enumerate() {
        assert_eq!(t.time, c.time, "time mismatch at row {}", i);
        assert_eq!(t.body.pos, c.body.pos, "position mismatch at row {}", i);
        assert_eq!(t.body.value, format!("{}.1", i));
        assert_eq!(c.body.value, format!("{}.2", i));
    }

    // File order is preserved
    assert_eq!(temperature[0].time, "2021-09-18T12:40:40Z");
    assert_eq!(temperature[1].time, "2021-09-18T12:41:40Z");
}

#[test]
fn test_map_is_idempotent() {
    let csv = create_glider_csv();
    let mapper = utc_mapper();

    let first = mapper.map_str(&default_parameters(), &csv).unwrap();
    let second = mapper.map_str(&default_parameters(), &csv).unwrap();

    for parameter in default_parameters() {
        let a = serde_json::to_vec(first.observations_for(&parameter)).unwrap();
        let b = serde_json::to_vec(second.observations_for(&parameter)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_map_missing_depth_column() {
    let csv = "timestamp,lat,lon,temperature,conductivity\n1631968840,58.1,7.9,69.69,420.69\n";

    match utc_mapper().map_str(&default_parameters(), csv) {
        Err(Error::MissingColumn { column }) => assert_eq!(column, "depth"),
        other => panic!("expected MissingColumn, got {:?}", other),
    }
}

#[test]
fn test_map_missing_parameter_column() {
    let csv = create_glider_csv();
    let parameters = vec!["temperature".to_string(), "salinity".to_string()];

    match utc_mapper().map_str(&parameters, &csv) {
        Err(Error::MissingColumn { column }) => assert_eq!(column, "salinity"),
        other => panic!("expected MissingColumn, got {:?}", other),
    }
}

#[test]
fn test_map_malformed_timestamp_discards_prior_rows() {
    let csv = create_test_csv(&[
        "1631968840,58.144699,7.998280,33.33,69.69,420.69",
        "1631969344,50.421478,8.593940,12.34,56.78,910.11",
        "not-a-number,50.421478,8.593940,12.34,56.78,910.11",
    ]);

    match utc_mapper().map_str(&default_parameters(), &csv) {
        Err(Error::MalformedTimestamp { row, value }) => {
            assert_eq!(row, 2);
            assert_eq!(value, "not-a-number");
        }
        other => panic!("expected MalformedTimestamp, got {:?}", other),
    }
}

#[test]
fn test_map_zero_rows() {
    let csv = create_test_csv(&[]);

    let result = utc_mapper().map_str(&default_parameters(), &csv).unwrap();

    assert_eq!(result.observations.len(), 2);
    assert!(result.observations["temperature"].is_empty());
    assert!(result.observations["conductivity"].is_empty());
    assert_eq!(result.stats.rows_mapped, 0);
}

#[test]
fn test_map_empty_input() {
    let result = utc_mapper().map_str(&default_parameters(), "");
    assert!(matches!(result, Err(Error::EmptyInput)));
}

#[test]
fn test_map_ragged_row_rejected() {
    let csv = create_test_csv(&[
        "1631968840,58.144699,7.998280,33.33,69.69,420.69",
        "1631969344,50.421478,8.593940,12.34",
    ]);

    let result = utc_mapper().map_str(&default_parameters(), &csv);
    assert!(matches!(result, Err(Error::CsvParsing { .. })));
}

#[test]
fn test_map_values_are_verbatim() {
    let csv = "timestamp,lat,lon,depth,temperature\n\
               1631968840, 58.1 ,N/A,-,\"1,5\"\n";
    let parameters = vec!["temperature".to_string()];

    let result = utc_mapper().map_str(&parameters, csv).unwrap();
    let obs = &result.observations["temperature"][0];

    assert_eq!(obs.body.pos.lat, " 58.1 ");
    assert_eq!(obs.body.pos.lon, "N/A");
    assert_eq!(obs.body.pos.depth, "-");
    assert_eq!(obs.body.value, "1,5");
}

#[test]
fn test_map_respects_time_zone() {
    let mapper = CsvObservationMapper::new(OutputTimeZone::from_str("+02:00").unwrap());
    let csv = create_glider_csv();

    let result = mapper.map_str(&default_parameters(), &csv).unwrap();

    assert_eq!(
        result.observations["temperature"][0].time,
        "2021-09-18T14:40:40+02:00"
    );
}

#[test]
fn test_map_duplicate_parameters_collapse() {
    let csv = create_glider_csv();
    let parameters = vec![
        "temperature".to_string(),
        "conductivity".to_string(),
        "temperature".to_string(),
    ];

    let result = utc_mapper().map_str(&parameters, &csv).unwrap();

    assert_eq!(result.parameters, vec!["temperature", "conductivity"]);
    assert_eq!(result.observations["temperature"].len(), 2);
}

#[test]
fn test_map_from_reader() {
    let csv = create_glider_csv();
    let cursor = std::io::Cursor::new(csv.into_bytes());

    let result = utc_mapper().map(&default_parameters(), cursor).unwrap();
    assert_eq!(result.stats.rows_mapped, 2);
}

#[test]
fn test_normalize_parameters() {
    assert!(matches!(
        normalize_parameters(&[]),
        Err(Error::InvalidRequest { .. })
    ));
    assert!(matches!(
        normalize_parameters(&["".to_string()]),
        Err(Error::InvalidRequest { .. })
    ));

    let normalized = normalize_parameters(&[
        "b".to_string(),
        "a".to_string(),
        "b".to_string(),
    ])
    .unwrap();
    assert_eq!(normalized, vec!["b", "a"]);
}

#[test]
fn test_map_offset_overflow_is_malformed_timestamp() {
    let mapper = CsvObservationMapper::new(OutputTimeZone::from_str("+23:59").unwrap());
    let csv = "timestamp,lat,lon,depth,t\n8210266876799,1,2,3,4\n";

    let result = mapper.map_str(&["t".to_string()], csv);
    assert!(matches!(
        result,
        Err(Error::MalformedTimestamp { row: 0, .. })
    ));
}
