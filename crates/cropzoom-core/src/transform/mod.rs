//! Geometry primitives: rotation-aware sizing and crop derivation.
//!
//! Everything in this module is a pure function of its inputs. The state
//! machine calls into it whenever the rotation, the crop viewport or the
//! source resolution changes, and on every crop request.
//!
//! # Coordinate System
//!
//! - Rotation angles are in radians, positive = clockwise on screen
//! - Only whole quarter turns are committed to state
//! - Sizes are in screen units, resolutions in source pixels
//! - Origin is the top-left corner

mod crop;
mod rotation;

pub use crop::{derive_crop, CropParams, CropResult};
pub use rotation::{
    container_size, floor_to_quarter_turn, max_scale_from_resolution, normalize_rotation,
    quarter_turns, rotated_size, rotation_degrees, swaps_axes,
};
