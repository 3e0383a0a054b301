//! In-memory geometry model for the Meridian DB spatial extension.
//!
//! This crate owns the recursive geometry tree ([`Geom`]/[`Shape`]), the
//! shared flag byte ([`GFlags`]), type codes and the collection
//! compatibility table ([`GeomType`]), bounding boxes with outward `f32`
//! rounding ([`GBox`]), SRID clamping, spherical helpers, and ISO WKT
//! rendering.
//!
//! The sibling `meridian-db-geoblob` crate serializes these trees into the
//! blob format stored by the database; this crate knows nothing about that
//! layout beyond the sizes [`GBox::serialized_size`] reports.
//!
//! # Modules
//!
//! - [`geom`]: the tree — `Geom`, `Shape`, and the per-kind node structs
//! - [`point`]: packed vertex arrays, owned or borrowed (zero-copy)
//! - [`flags`]: the one-byte flag set
//! - [`types`]: wire type codes and subtype compatibility
//! - [`gbox`]: bounding boxes and outward `f32` rounding
//! - [`srid`]: SRID constants and clamping
//! - [`geodetic`]: unit-sphere conversions for geodetic boxes
//! - [`wkt`]: ISO WKT rendering
//! - [`error`]: error types

pub mod error;
pub mod flags;
pub mod gbox;
pub mod geodetic;
pub mod geom;
pub mod point;
pub mod srid;
pub mod types;
pub mod wkt;

pub use error::{GeomError, Result};
pub use flags::GFlags;
pub use gbox::{next_float_down, next_float_up, GBox};
pub use geodetic::{cart2geog, geog2cart, normalize, Point3};
pub use geom::{CircularString, Collection, Geom, Line, Point, Polygon, Shape, Triangle};
pub use point::{Point4, PointArray};
pub use srid::{clamp_srid, SRID_MAXIMUM, SRID_UNKNOWN, SRID_USER_MAXIMUM};
pub use types::GeomType;
pub use wkt::to_wkt;
