//! Tunable constants of the topographic scene.

use contour_field_core::color::Srgb;
use contour_field_core::error::FieldError;
use contour_field_core::params::{param_color, param_f64, param_usize};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Spacing of the coarse field grid, in pixels.
pub const DEFAULT_CELL_SIZE: f64 = 8.0;
/// Marching-squares cell size, in pixels.
pub const DEFAULT_RESOLUTION: f64 = 8.0;
/// Number of contour levels drawn per frame.
pub const DEFAULT_LEVELS: usize = 12;
/// Lowest threshold. The field spans roughly [-1, 1]; levels cover a sub-range.
pub const DEFAULT_LEVEL_MIN: f64 = -0.6;
/// Highest threshold.
pub const DEFAULT_LEVEL_MAX: f64 = 0.6;
/// Simulated seconds per wall-clock second.
pub const DEFAULT_SPEED: f64 = 0.6;
/// Endpoint matching distance when chaining segments, in pixels.
pub const DEFAULT_TOLERANCE: f64 = 0.5;
/// Radius of the pointer ripple, in pixels.
pub const DEFAULT_POINTER_RADIUS: f64 = 140.0;
/// Peak ripple contribution at the pointer.
pub const DEFAULT_RIPPLE_AMPLITUDE: f64 = 0.35;
/// Ripple wave number, radians per pixel.
pub const DEFAULT_RIPPLE_FREQUENCY: f64 = 0.06;
/// Ripple phase speed, radians per simulated second.
pub const DEFAULT_RIPPLE_SPEED: f64 = 3.0;
/// Per-frame follow factor while the pointer is over the surface.
pub const DEFAULT_FOLLOW_ACTIVE: f64 = 0.15;
/// Per-frame follow factor after the pointer left.
pub const DEFAULT_FOLLOW_INACTIVE: f64 = 0.04;
/// Hue of the lowest level, degrees.
pub const DEFAULT_HUE: f64 = 200.0;
/// Hue shift from lowest to highest level, degrees.
pub const DEFAULT_HUE_SPAN: f64 = 40.0;
/// Smallest accepted grid and marching-squares cell, in pixels.
pub const MIN_CELL_SIZE: f64 = 1.0;
/// Most contour levels drawn per frame.
pub const MAX_LEVELS: usize = 64;

pub const DEFAULT_BACKGROUND_INNER: Srgb = Srgb {
    r: 0x13 as f64 / 255.0,
    g: 0x26 as f64 / 255.0,
    b: 0x3a as f64 / 255.0,
};
pub const DEFAULT_BACKGROUND_OUTER: Srgb = Srgb {
    r: 0x05 as f64 / 255.0,
    g: 0x09 as f64 / 255.0,
    b: 0x0f as f64 / 255.0,
};

/// Parameters of the topographic scene.
///
/// Use [`Default`] for the reference look; [`TopoParams::from_json`] for
/// partial overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopoParams {
    pub cell_size: f64,
    pub resolution: f64,
    pub levels: usize,
    pub level_min: f64,
    pub level_max: f64,
    pub speed: f64,
    pub tolerance: f64,
    pub pointer_radius: f64,
    pub ripple_amplitude: f64,
    pub ripple_frequency: f64,
    pub ripple_speed: f64,
    pub follow_active: f64,
    pub follow_inactive: f64,
    pub hue: f64,
    pub hue_span: f64,
    pub background_inner: Srgb,
    pub background_outer: Srgb,
}

impl Default for TopoParams {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            resolution: DEFAULT_RESOLUTION,
            levels: DEFAULT_LEVELS,
            level_min: DEFAULT_LEVEL_MIN,
            level_max: DEFAULT_LEVEL_MAX,
            speed: DEFAULT_SPEED,
            tolerance: DEFAULT_TOLERANCE,
            pointer_radius: DEFAULT_POINTER_RADIUS,
            ripple_amplitude: DEFAULT_RIPPLE_AMPLITUDE,
            ripple_frequency: DEFAULT_RIPPLE_FREQUENCY,
            ripple_speed: DEFAULT_RIPPLE_SPEED,
            follow_active: DEFAULT_FOLLOW_ACTIVE,
            follow_inactive: DEFAULT_FOLLOW_INACTIVE,
            hue: DEFAULT_HUE,
            hue_span: DEFAULT_HUE_SPAN,
            background_inner: DEFAULT_BACKGROUND_INNER,
            background_outer: DEFAULT_BACKGROUND_OUTER,
        }
    }
}

impl TopoParams {
    /// Reads overrides from a JSON object, falling back to defaults per key.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            cell_size: param_f64(params, "cell_size", d.cell_size),
            resolution: param_f64(params, "resolution", d.resolution),
            levels: param_usize(params, "levels", d.levels),
            level_min: param_f64(params, "level_min", d.level_min),
            level_max: param_f64(params, "level_max", d.level_max),
            speed: param_f64(params, "speed", d.speed),
            tolerance: param_f64(params, "tolerance", d.tolerance),
            pointer_radius: param_f64(params, "pointer_radius", d.pointer_radius),
            ripple_amplitude: param_f64(params, "ripple_amplitude", d.ripple_amplitude),
            ripple_frequency: param_f64(params, "ripple_frequency", d.ripple_frequency),
            ripple_speed: param_f64(params, "ripple_speed", d.ripple_speed),
            follow_active: param_f64(params, "follow_active", d.follow_active),
            follow_inactive: param_f64(params, "follow_inactive", d.follow_inactive),
            hue: param_f64(params, "hue", d.hue),
            hue_span: param_f64(params, "hue_span", d.hue_span),
            background_inner: param_color(params, "background_inner", d.background_inner),
            background_outer: param_color(params, "background_outer", d.background_outer),
        }
    }

    /// Checks ranges that the per-frame path relies on.
    pub fn validate(&self) -> Result<(), FieldError> {
        let finite = [
            ("cell_size", self.cell_size),
            ("resolution", self.resolution),
            ("level_min", self.level_min),
            ("level_max", self.level_max),
            ("speed", self.speed),
            ("tolerance", self.tolerance),
            ("pointer_radius", self.pointer_radius),
            ("ripple_amplitude", self.ripple_amplitude),
            ("ripple_frequency", self.ripple_frequency),
            ("ripple_speed", self.ripple_speed),
            ("follow_active", self.follow_active),
            ("follow_inactive", self.follow_inactive),
            ("hue", self.hue),
            ("hue_span", self.hue_span),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(FieldError::invalid_param(name, "must be finite"));
        }
        for (name, v) in [
            ("cell_size", self.cell_size),
            ("resolution", self.resolution),
        ] {
            if v < MIN_CELL_SIZE {
                return Err(FieldError::invalid_param(name, "must be at least 1 pixel"));
            }
        }
        if self.tolerance <= 0.0 {
            return Err(FieldError::invalid_param("tolerance", "must be positive"));
        }
        if self.speed < 0.0 {
            return Err(FieldError::invalid_param("speed", "must not be negative"));
        }
        if !(1..=MAX_LEVELS).contains(&self.levels) {
            return Err(FieldError::invalid_param("levels", "must lie in [1, 64]"));
        }
        if self.level_min >= self.level_max {
            return Err(FieldError::invalid_param(
                "level_min",
                "must be below level_max",
            ));
        }
        if self.pointer_radius < 0.0 {
            return Err(FieldError::invalid_param(
                "pointer_radius",
                "must not be negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.ripple_amplitude) {
            return Err(FieldError::invalid_param(
                "ripple_amplitude",
                "must lie in [0, 1]",
            ));
        }
        for (name, v) in [
            ("follow_active", self.follow_active),
            ("follow_inactive", self.follow_inactive),
        ] {
            if v <= 0.0 || v > 1.0 {
                return Err(FieldError::invalid_param(name, "must lie in (0, 1]"));
            }
        }
        Ok(())
    }

    /// Current values as a JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            "cell_size": self.cell_size,
            "resolution": self.resolution,
            "levels": self.levels,
            "level_min": self.level_min,
            "level_max": self.level_max,
            "speed": self.speed,
            "tolerance": self.tolerance,
            "pointer_radius": self.pointer_radius,
            "ripple_amplitude": self.ripple_amplitude,
            "ripple_frequency": self.ripple_frequency,
            "ripple_speed": self.ripple_speed,
            "follow_active": self.follow_active,
            "follow_inactive": self.follow_inactive,
            "hue": self.hue,
            "hue_span": self.hue_span,
            "background_inner": self.background_inner.to_hex(),
            "background_outer": self.background_outer.to_hex(),
        })
    }

    /// Type, default, range and description of every parameter.
    pub fn schema() -> Value {
        let d = Self::default();
        json!({
            "cell_size": {
                "type": "number", "default": d.cell_size, "min": MIN_CELL_SIZE, "max": 64.0,
                "description": "Spacing of the coarse field grid in pixels"
            },
            "resolution": {
                "type": "number", "default": d.resolution, "min": MIN_CELL_SIZE, "max": 64.0,
                "description": "Marching-squares cell size in pixels; the main cost/quality lever"
            },
            "levels": {
                "type": "integer", "default": d.levels, "min": 1, "max": MAX_LEVELS,
                "description": "Number of contour levels"
            },
            "level_min": {
                "type": "number", "default": d.level_min, "min": -1.0, "max": 1.0,
                "description": "Lowest contour threshold"
            },
            "level_max": {
                "type": "number", "default": d.level_max, "min": -1.0, "max": 1.0,
                "description": "Highest contour threshold"
            },
            "speed": {
                "type": "number", "default": d.speed, "min": 0.0, "max": 5.0,
                "description": "Simulated seconds per wall-clock second"
            },
            "tolerance": {
                "type": "number", "default": d.tolerance, "min": 0.01, "max": 4.0,
                "description": "Endpoint matching distance when chaining segments"
            },
            "pointer_radius": {
                "type": "number", "default": d.pointer_radius, "min": 0.0, "max": 1000.0,
                "description": "Radius of the pointer ripple in pixels"
            },
            "ripple_amplitude": {
                "type": "number", "default": d.ripple_amplitude, "min": 0.0, "max": 1.0,
                "description": "Peak ripple contribution at the pointer"
            },
            "ripple_frequency": {
                "type": "number", "default": d.ripple_frequency, "min": 0.0, "max": 1.0,
                "description": "Ripple wave number in radians per pixel"
            },
            "ripple_speed": {
                "type": "number", "default": d.ripple_speed, "min": 0.0, "max": 20.0,
                "description": "Ripple phase speed in radians per simulated second"
            },
            "follow_active": {
                "type": "number", "default": d.follow_active, "min": 0.01, "max": 1.0,
                "description": "Per-frame pointer follow factor while hovering"
            },
            "follow_inactive": {
                "type": "number", "default": d.follow_inactive, "min": 0.01, "max": 1.0,
                "description": "Per-frame follow factor back to rest after the pointer leaves"
            },
            "hue": {
                "type": "number", "default": d.hue, "min": 0.0, "max": 360.0,
                "description": "Hue of the lowest level in degrees"
            },
            "hue_span": {
                "type": "number", "default": d.hue_span, "min": -360.0, "max": 360.0,
                "description": "Hue shift from lowest to highest level"
            },
            "background_inner": {
                "type": "string", "default": d.background_inner.to_hex(),
                "description": "Background gradient color at the center"
            },
            "background_outer": {
                "type": "string", "default": d.background_outer.to_hex(),
                "description": "Background gradient color at the corners"
            }
        })
    }
}
