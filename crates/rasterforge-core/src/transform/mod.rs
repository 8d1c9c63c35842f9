//! Affine transforms and transformed drawing.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y points down
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Pixel `(x, y)` covers `[x, x+1) × [y, y+1)`, its center is `(x+0.5, y+0.5)`

mod affine;
mod draw;

pub use affine::Affine;
pub use draw::draw_transformed;
