//! Numeric validation utilities.
//!
//! Every mutator funnels user-supplied numbers through these helpers:
//! `safe_parse_number` never fails, and the `validate_*` / `clamp_*` pairs
//! test and project vectors onto the configured limits axis by axis.

use serde_json::Value;

use crate::state::settings::{RotationLimits, ScaleLimits, WorkspaceBounds};

/// Anything a UI field or an imported document may hand us as a number.
pub trait NumericInput {
    /// The parsed value, finite or not. `None` if it does not look numeric at all.
    fn to_number(&self) -> Option<f64>;
}

impl NumericInput for str {
    fn to_number(&self) -> Option<f64> {
        self.trim().parse::<f64>().ok()
    }
}

impl NumericInput for String {
    fn to_number(&self) -> Option<f64> {
        self.as_str().to_number()
    }
}

impl NumericInput for f64 {
    fn to_number(&self) -> Option<f64> {
        Some(*self)
    }
}

impl NumericInput for f32 {
    fn to_number(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl NumericInput for i32 {
    fn to_number(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl NumericInput for Value {
    fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.to_number(),
            _ => None,
        }
    }
}

impl<T: NumericInput + ?Sized> NumericInput for &T {
    fn to_number(&self) -> Option<f64> {
        (**self).to_number()
    }
}

/// Parse `value`, returning `fallback` unless the result is finite.
pub fn safe_parse_number<T: NumericInput + ?Sized>(value: &T, fallback: f64) -> f64 {
    match value.to_number() {
        Some(n) if n.is_finite() => n,
        _ => fallback,
    }
}

/// True iff `value` is an array of exactly `expected_len` finite numbers.
pub fn is_valid_number_array(value: &Value, expected_len: usize) -> bool {
    match value.as_array() {
        Some(items) => items.len() == expected_len && items.iter().all(is_finite_number),
        None => false,
    }
}

fn is_finite_number(value: &Value) -> bool {
    value.as_f64().is_some_and(f64::is_finite)
}

/// Exactly `N` finite numbers.
pub fn number_array<const N: usize>(value: &Value) -> Option<[f64; N]> {
    if !is_valid_number_array(value, N) {
        return None;
    }
    leading_numbers(value)
}

/// At least `N` entries, the first `N` of them finite numbers. Extra entries are ignored.
pub fn leading_numbers<const N: usize>(value: &Value) -> Option<[f64; N]> {
    let items = value.as_array()?;
    if items.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_f64().filter(|v| v.is_finite())?;
    }
    Some(out)
}

/// Wrap degrees into [0, 360).
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg % 360.0;
    let r = if r < 0.0 { r + 360.0 } else { r + 0.0 };
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

pub fn radians_to_degrees(rad: [f64; 3]) -> [f64; 3] {
    rad.map(f64::to_degrees)
}

pub fn degrees_to_radians(deg: [f64; 3]) -> [f64; 3] {
    deg.map(f64::to_radians)
}

// ── Position ──────────────────────────────────────────────

pub fn validate_position(position: [f64; 3], bounds: &WorkspaceBounds) -> bool {
    (0..3).all(|i| {
        position[i].is_finite() && position[i] >= bounds.min[i] && position[i] <= bounds.max[i]
    })
}

/// Clamp each axis independently into the workspace box.
pub fn clamp_position(position: [f64; 3], bounds: &WorkspaceBounds) -> [f64; 3] {
    let mut out = position;
    for (i, v) in out.iter_mut().enumerate() {
        let value = if v.is_nan() { 0.0 } else { *v };
        *v = value.clamp(bounds.min[i], bounds.max[i]);
    }
    out
}

// ── Rotation (degrees) ────────────────────────────────────

pub fn validate_rotation(degrees: [f64; 3], limits: &RotationLimits) -> bool {
    degrees.iter().all(|&d| {
        d.is_finite() && normalize_degrees(d) == d && d >= limits.min_deg && d <= limits.max_deg
    })
}

/// Normalize each axis to [0, 360) and clamp it to the configured limits.
pub fn clamp_rotation(degrees: [f64; 3], limits: &RotationLimits) -> [f64; 3] {
    degrees.map(|d| {
        let d = if d.is_finite() { d } else { 0.0 };
        normalize_degrees(d).clamp(limits.min_deg, limits.max_deg)
    })
}

// ── Scale ─────────────────────────────────────────────────

pub fn validate_scale(scale: [f64; 3], limits: &ScaleLimits) -> bool {
    scale
        .iter()
        .all(|&s| s.is_finite() && s >= limits.min && s <= limits.max)
}

pub fn clamp_scale_value(value: f64, limits: &ScaleLimits) -> f64 {
    let value = if value.is_nan() { 1.0 } else { value };
    value.clamp(limits.min, limits.max)
}

pub fn clamp_scale(scale: [f64; 3], limits: &ScaleLimits) -> [f64; 3] {
    scale.map(|s| clamp_scale_value(s, limits))
}
