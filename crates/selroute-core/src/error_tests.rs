//! Tests for `error` module.

use crate::error::{ConfigError, RoutingError};

#[test]
fn test_length_mismatch_display() {
    let err = RoutingError::LengthMismatch {
        queries: 4,
        worlds: 4,
        out: 3,
    };
    assert_eq!(
        err.to_string(),
        "Batch length mismatch: 4 query volumes, 4 world volumes, 3 output slots"
    );
}

#[test]
fn test_check_lengths_accepts_equal() {
    assert_eq!(RoutingError::check_lengths(0, 0, 0), Ok(()));
    assert_eq!(RoutingError::check_lengths(9, 9, 9), Ok(()));
}

#[test]
fn test_check_lengths_rejects_any_difference() {
    for (q, w, o) in [(4, 4, 3), (4, 3, 4), (3, 4, 4), (1, 2, 3)] {
        assert_eq!(
            RoutingError::check_lengths(q, w, o),
            Err(RoutingError::LengthMismatch {
                queries: q,
                worlds: w,
                out: o
            })
        );
    }
}

#[test]
fn test_config_error_from_figment() {
    let err: ConfigError = figment::Error::from(String::from("bad value")).into();
    assert!(matches!(err, ConfigError::Extract(_)));
    assert!(err.to_string().starts_with("Configuration error:"));
}
