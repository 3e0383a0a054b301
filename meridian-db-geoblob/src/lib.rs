//! Serialized geometry blobs for Meridian DB.
//!
//! This crate owns the binary format geometric values are stored in, the
//! codec between it and the `meridian-db-geom` tree, the metadata peeks
//! that avoid decoding, and the total-order comparator backing geometry
//! B-tree indexes.
//!
//! # Wire format (version 1)
//!
//! ```text
//! offset  bytes  field
//! 0       4      size_varlen   total length << 2 (low 2 bits: DB varlena flags)
//! 4       3      srid          21-bit two's complement, high byte first
//! 7       1      flags         Z / M / bbox / geodetic / read-only / solid
//! 8       V      bbox          optional f32 (min,max) pairs, outward-rounded
//! 8+V     ..     body          recursive nodes: [u32 type][u32 count][payload]
//! ```
//!
//! Counts mean vertices for simple nodes, rings for polygons (whose ring
//! table is padded to 8-byte alignment when odd), and children for
//! collections. Everything is little-endian in the host's native order;
//! the format carries no endian marker and is not portable across
//! byte orders.
//!
//! # Reading without decoding
//!
//! [`GeoBlobRef`] answers type, SRID, dimensionality, emptiness, and — for
//! cheap shapes — a tight bounding box straight off the bytes. The
//! [`GeoBlobRef::get_gbox`] chain degrades from the cached box to a peek to
//! a full decode. [`cmp`] normally never leaves this metadata layer.
//!
//! # Modules
//!
//! - [`header`]: the fixed header, [`GeoBlob`] / [`GeoBlobRef`]
//! - [`bbox`]: packed box codec and the Z-order centroid hash
//! - [`serialize`](mod@serialize) / [`deserialize`](mod@deserialize): the tree codec
//! - [`peek`]: decode-free metadata accessors
//! - [`compare`]: the index comparator
//! - [`error`]: error types

// The size word, type words, counts, and ordinates are all stored in the
// host's byte order, and the on-disk files only make sense on the order
// they were written with.
const _: () = assert!(
    cfg!(target_endian = "little"),
    "the serialized geometry format requires a little-endian host"
);

pub mod bbox;
pub mod compare;
pub mod deserialize;
pub mod error;
pub mod header;
pub mod peek;
pub mod serialize;

pub use bbox::sortable_hash;
pub use compare::cmp;
pub use deserialize::deserialize;
pub use error::{BlobError, Result};
pub use header::{max_header_size, GeoBlob, GeoBlobRef, HEADER_SIZE};
pub use serialize::serialize;
