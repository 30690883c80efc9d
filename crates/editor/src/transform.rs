//! Validated position/rotation/scale edits on a single entity.
//!
//! These are plain value mutations. They never record history and never fail:
//! malformed input falls back to the entity's current value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::state::settings::{RotationLimits, ScaleLimits, WorkspaceBounds};
use crate::validation::{
    clamp_position, clamp_scale, clamp_scale_value, normalize_degrees, safe_parse_number,
    validate_position, validate_scale, NumericInput,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn all() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(format!("Unknown axis '{other}'")),
        }
    }
}

/// Set one position axis, then re-clamp the whole vector into the workspace.
/// Returns true if the stored position changed.
pub fn update_position<T: NumericInput + ?Sized>(
    entity: &mut Entity,
    axis: Axis,
    raw: &T,
    bounds: &WorkspaceBounds,
) -> bool {
    let before = entity.transform.position;
    let i = axis.index();
    entity.transform.position[i] = safe_parse_number(raw, before[i]);
    if !validate_position(entity.transform.position, bounds) {
        entity.transform.position = clamp_position(entity.transform.position, bounds);
    }
    entity.transform.position != before
}

/// Set one rotation axis from degrees: normalize to [0, 360), clamp, store as radians.
pub fn update_rotation_deg<T: NumericInput + ?Sized>(
    entity: &mut Entity,
    axis: Axis,
    raw_degrees: &T,
    limits: &RotationLimits,
) -> bool {
    let i = axis.index();
    let before = entity.transform.rotation[i];
    let current_deg = if before.is_finite() { before.to_degrees() } else { 0.0 };
    let degrees = normalize_degrees(safe_parse_number(raw_degrees, current_deg))
        .clamp(limits.min_deg, limits.max_deg);
    entity.transform.rotation[i] = degrees.to_radians();
    entity.transform.rotation[i] != before
}

/// Set one scale axis. Clamped as a scalar before assignment and re-validated
/// as a vector afterwards.
pub fn update_scale<T: NumericInput + ?Sized>(
    entity: &mut Entity,
    axis: Axis,
    raw: &T,
    limits: &ScaleLimits,
) -> bool {
    let before = entity.transform.scale;
    let i = axis.index();
    let current = if before[i].is_finite() { before[i] } else { 1.0 };
    entity.transform.scale[i] = clamp_scale_value(safe_parse_number(raw, current), limits);
    if !validate_scale(entity.transform.scale, limits) {
        entity.transform.scale = clamp_scale(entity.transform.scale, limits);
    }
    entity.transform.scale != before
}

/// Move by a world-space delta (gizmo drag), clamped into the workspace.
pub fn translate(entity: &mut Entity, delta: [f64; 3], bounds: &WorkspaceBounds) -> bool {
    let before = entity.transform.position;
    let moved = [
        before[0] + delta[0],
        before[1] + delta[1],
        before[2] + delta[2],
    ];
    entity.transform.position = clamp_position(moved, bounds);
    entity.transform.position != before
}
