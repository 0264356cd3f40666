//! # Serialization Layer
//!
//! JSON (camelCase wire shape, RFC 3339 timestamps), the compact string form,
//! and MusicXML frame export.
//!
//! ## JSON
//! [`serialize`] validates before emitting unless told not to, and can drop the
//! metadata or alternatives sections or embed the MusicXML frame markup under
//! `"frame"`. [`deserialize`] goes through an all-optional raw shape so missing
//! fields are either back-filled or reported by name.
//!
//! ## Compact form
//! `name:instrument:frets[:bFret-start-end][:cCapo]`, e.g. `F:guitar:133211:b1-1-6`.
//! Lossy: fingers come back as 1 and metadata is regenerated.

mod compact;
mod json;
mod musicxml;


pub use compact::{from_compact_format, to_compact_format, verify_compact_round_trip};
pub use json::{
    deserialize, deserialize_collection, serialize, serialize_collection, verify_round_trip, DeserializeOptions,
    SerializeOptions,
};
pub use musicxml::to_musicxml_frame;
