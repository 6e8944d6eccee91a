//! Test utilities for CSV mapper testing
//!
//! This module provides common fixtures and helper functions used across the
//! mapper test modules.

use super::CsvObservationMapper;
use crate::config::OutputTimeZone;

mod mapper_tests;

/// Header shared by most fixtures
pub const TEST_HEADER: &str = "timestamp,lat,lon,depth,temperature,conductivity";

/// Helper to create a CSV upload with the standard header
pub fn create_test_csv(rows: &[&str]) -> String {
    let mut content = String::from(TEST_HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    content
}

/// Helper to create a two-row glider upload
pub fn create_glider_csv() -> String {
    create_test_csv(&[
        "1631968840,58.144699,7.998280,33.33,69.69,420.69",
        "1631969344,50.421478,8.593940,12.34,56.78,910.11",
    ])
}

/// Parameters requested by most tests
pub fn default_parameters() -> Vec<String> {
    vec!["temperature".to_string(), "conductivity".to_string()]
}

/// Helper to create a mapper rendering UTC timestamps
pub fn utc_mapper() -> CsvObservationMapper {
    CsvObservationMapper::new(OutputTimeZone::utc())
}
