//! Lenient accessors for scene parameters stored in a `serde_json::Value`.
//!
//! Every helper takes the params object, a key and a default, and never
//! fails: a missing key or a value of the wrong JSON type yields the default.
//! Range checks belong to each scene's `validate`.

use crate::color::Srgb;
use log::warn;
use serde_json::Value;

/// Reads a number (integers included) as `f64`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads a non-negative integer as `usize`. Floats and negatives fall back.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Reads a `"#rrggbb"` color. Unparsable strings are logged and fall back.
pub fn param_color(params: &Value, name: &str, default: Srgb) -> Srgb {
    match params.get(name).and_then(Value::as_str) {
        Some(hex) => Srgb::from_hex(hex).unwrap_or_else(|e| {
            warn!("ignoring parameter '{name}': {e}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_reads_floats_and_integers() {
        let params = json!({"speed": 2.5, "levels": 10});
        assert_eq!(param_f64(&params, "speed", 1.0), 2.5);
        assert_eq!(param_f64(&params, "levels", 0.0), 10.0);
    }

    #[test]
    fn param_f64_falls_back_on_missing_wrong_type_or_null() {
        let params = json!({"speed": "fast", "tolerance": null});
        assert_eq!(param_f64(&params, "speed", 1.0), 1.0);
        assert_eq!(param_f64(&params, "tolerance", 0.5), 0.5);
        assert_eq!(param_f64(&params, "absent", 3.0), 3.0);
    }

    #[test]
    fn param_f64_falls_back_for_non_object() {
        assert_eq!(param_f64(&json!([1, 2]), "speed", 7.0), 7.0);
    }

    #[test]
    fn param_usize_reads_non_negative_integers_only() {
        let params = json!({"a": 42, "b": 2.5, "c": -1, "d": "many"});
        assert_eq!(param_usize(&params, "a", 0), 42);
        assert_eq!(param_usize(&params, "b", 9), 9);
        assert_eq!(param_usize(&params, "c", 5), 5);
        assert_eq!(param_usize(&params, "d", 8), 8);
    }

    #[test]
    fn param_color_parses_hex_or_defaults() {
        let fallback = Srgb {
            r: 0.0,
            g: 0.0,
            b: 0.0,
        };
        let params = json!({"bg": "#ffffff", "bad": "#12", "num": 3});
        assert_eq!(param_color(&params, "bg", fallback).to_hex(), "#ffffff");
        assert_eq!(param_color(&params, "bad", fallback), fallback);
        assert_eq!(param_color(&params, "num", fallback), fallback);
        assert_eq!(param_color(&params, "missing", fallback), fallback);
    }
}
