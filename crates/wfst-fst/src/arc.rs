// Arcs and their fixed-size binary record.

use bytemuck::{Pod, Zeroable};

/// Arc label. Label 0 is epsilon.
pub type Label = u32;

/// Dense state identifier.
pub type StateId = u32;

/// The empty label.
pub const EPSILON: Label = 0;

/// A weighted transition between two states.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc<W> {
    pub ilabel: Label,
    pub olabel: Label,
    pub weight: W,
    pub nextstate: StateId,
}

impl<W> Arc<W> {
    pub fn new(ilabel: Label, olabel: Label, weight: W, nextstate: StateId) -> Self {
        Self {
            ilabel,
            olabel,
            weight,
            nextstate,
        }
    }
}

/// Label and destination part of a serialized arc (16 bytes).
///
/// The arc weight follows the record in its own encoding. Fields are stored
/// little-endian regardless of host byte order.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ArcRecord {
    pub ilabel: u32,
    pub olabel: u32,
    pub nextstate: u32,
    pub _reserved: u32,
}

const _: () = assert!(size_of::<ArcRecord>() == 16);

impl ArcRecord {
    /// Record for `arc` in on-disk byte order.
    pub fn from_arc<W>(arc: &Arc<W>) -> Self {
        Self {
            ilabel: arc.ilabel.to_le(),
            olabel: arc.olabel.to_le(),
            nextstate: arc.nextstate.to_le(),
            _reserved: 0,
        }
    }

    /// Rebuild an arc from an on-disk record and its decoded weight.
    pub fn into_arc<W>(self, weight: W) -> Arc<W> {
        Arc::new(
            u32::from_le(self.ilabel),
            u32::from_le(self.olabel),
            weight,
            u32::from_le(self.nextstate),
        )
    }
}
