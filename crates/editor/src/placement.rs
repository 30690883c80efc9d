//! Spawn-position search for new entities.
//!
//! The anchor rests the entity on the ground plane at the origin (or at a
//! caller-supplied target), optionally snapped to the grid and always clamped
//! into the workspace. With overlap checking on, a bounded spiral walks
//! outward from the anchor on the X/Z plane until the entity's box clears
//! every existing box.

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use shared::EntityKind;

use crate::state::settings::WorkspaceBounds;
use crate::validation::clamp_position;
use crate::viewport::picking::Aabb;

/// Number of spiral candidates tried before giving up
pub const MAX_ATTEMPTS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementOptions {
    pub snap_to_grid: bool,
    pub grid_size: f64,
    pub check_overlap: bool,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            snap_to_grid: false,
            grid_size: 1.0,
            check_overlap: true,
        }
    }
}

impl PlacementOptions {
    fn grid(&self) -> f64 {
        if self.grid_size.is_finite() && self.grid_size > 0.0 {
            self.grid_size
        } else {
            1.0
        }
    }
}

/// What the entity to place looks like
#[derive(Debug, Clone)]
pub struct PlacementRequest {
    pub kind: EntityKind,
    /// Intrinsic bounds of the geometry around its own origin, if known
    pub geometry: Option<Aabb>,
    /// Where the caller would like it; defaults to the origin resting on the ground
    pub target: Option<[f64; 3]>,
}

impl PlacementRequest {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            geometry: None,
            target: None,
        }
    }

    pub fn at(mut self, target: [f64; 3]) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_geometry(mut self, geometry: Aabb) -> Self {
        self.geometry = Some(geometry);
        self
    }

    fn half_height(&self) -> f64 {
        self.geometry
            .map(|g| g.size().y * 0.5)
            .unwrap_or_else(|| self.kind.fallback_half_height())
    }

    fn half_extents(&self) -> DVec3 {
        match self.geometry {
            Some(g) => g.size() * 0.5,
            None => {
                let [x, _, z] = self.kind.half_extents();
                DVec3::new(x, self.half_height(), z)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementStatus {
    /// The anchor itself was free (or overlap checking was off)
    Anchor,
    /// The spiral found a free spot at the given attempt index
    Relocated { attempt: usize },
    /// No free spot within `MAX_ATTEMPTS`; the anchor is returned even though it overlaps
    Exhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub position: [f64; 3],
    pub status: PlacementStatus,
}

impl Placement {
    /// Whether the caller should tell the user the object may overlap others
    pub fn needs_notice(&self) -> bool {
        self.status == PlacementStatus::Exhausted
    }
}

/// Compute a spawn position for `request` given the boxes of existing entities.
pub fn place(
    request: &PlacementRequest,
    existing: &[Aabb],
    options: &PlacementOptions,
    bounds: &WorkspaceBounds,
) -> Placement {
    let grid = options.grid();
    let mut anchor = request
        .target
        .unwrap_or([0.0, request.half_height(), 0.0]);

    if options.snap_to_grid {
        anchor = anchor.map(|v| (v / grid).round() * grid);
        anchor[1] = anchor[1].max(grid / 2.0);
    }
    let anchor = clamp_position(anchor, bounds);

    if !options.check_overlap {
        return Placement {
            position: anchor,
            status: PlacementStatus::Anchor,
        };
    }

    let half = request.half_extents();
    let collides = |pos: [f64; 3]| {
        let candidate = Aabb::from_center_half_extents(DVec3::from(pos), half);
        existing.iter().any(|other| candidate.intersects(other))
    };

    if !collides(anchor) {
        return Placement {
            position: anchor,
            status: PlacementStatus::Anchor,
        };
    }

    for attempt in 0..MAX_ATTEMPTS {
        let angle = attempt as f64 * FRAC_PI_2;
        let radius = (attempt / 4 + 1) as f64;
        let candidate = clamp_position(
            [
                anchor[0] + radius * grid * angle.cos(),
                anchor[1],
                anchor[2] + radius * grid * angle.sin(),
            ],
            bounds,
        );
        if !collides(candidate) {
            return Placement {
                position: candidate,
                status: PlacementStatus::Relocated { attempt },
            };
        }
    }

    tracing::warn!(
        "No overlap-free position for new {} after {MAX_ATTEMPTS} attempts",
        request.kind
    );
    Placement {
        position: anchor,
        status: PlacementStatus::Exhausted,
    }
}
