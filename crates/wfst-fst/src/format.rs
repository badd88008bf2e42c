// Binary container: header parsing, serialization and validated loading.
//
// Layout (all integers little-endian):
//
//   header       32 bytes, see `FstHeader`
//   weight type  u32 length + UTF-8 bytes
//   per state    final marker u8 (0 or 1) | final weight if marked |
//                arc count u32 | arcs (ArcRecord + weight)...

use std::io::{self, Write};

use bytemuck::{Pod, Zeroable};
use wfst_weight::Weight;

use crate::FstError;
use crate::arc::{ArcRecord, StateId};
use crate::fst::{Fst, MutableFst};
use crate::vector_fst::VectorFst;

/// Magic number at the start of every serialized transducer.
pub const MAGIC: u32 = 0x7EB2_FDD6;

/// Current container version.
pub const VERSION: u32 = 1;

/// Size of the binary header in bytes.
pub const HEADER_SIZE: usize = 32;

/// Header start value for a graph without a start state.
const NO_START: u32 = u32::MAX;

const NOT_FINAL: u8 = 0;
const FINAL: u8 = 1;

/// Smallest possible encoding of one state: a marker and an arc count.
const MIN_STATE_SIZE: usize = 5;

/// Fixed-size header of a serialized transducer.
///
/// - bytes 0..4: magic
/// - bytes 4..8: version
/// - bytes 8..12: start state (`u32::MAX` for none)
/// - bytes 12..16: reserved (zero)
/// - bytes 16..24: number of states
/// - bytes 24..32: total number of arcs
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct FstHeader {
    pub magic: u32,
    pub version: u32,
    pub start: u32,
    pub _reserved: u32,
    pub num_states: u64,
    pub num_arcs: u64,
}

const _: () = assert!(size_of::<FstHeader>() == HEADER_SIZE);

impl FstHeader {
    /// Start state, or `None` for the sentinel.
    pub fn start_state(&self) -> Option<StateId> {
        (self.start != NO_START).then_some(self.start)
    }
}

/// Parse and validate the header at the start of `data`.
///
/// Returns the header with fields in host byte order. Trailing data after
/// the header is not inspected.
pub fn parse_header(data: &[u8]) -> Result<FstHeader, FstError> {
    if data.len() < HEADER_SIZE {
        return Err(FstError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }

    let raw: FstHeader = bytemuck::pod_read_unaligned(&data[..HEADER_SIZE]);
    let header = FstHeader {
        magic: u32::from_le(raw.magic),
        version: u32::from_le(raw.version),
        start: u32::from_le(raw.start),
        _reserved: u32::from_le(raw._reserved),
        num_states: u64::from_le(raw.num_states),
        num_arcs: u64::from_le(raw.num_arcs),
    };

    if header.magic != MAGIC {
        return Err(FstError::InvalidMagic);
    }
    if header.version != VERSION {
        return Err(FstError::UnsupportedVersion(header.version));
    }
    Ok(header)
}

/// Read the weight type identifier stored after the header.
pub fn peek_weight_type(data: &[u8]) -> Result<String, FstError> {
    parse_header(data)?;
    let mut cursor = &data[HEADER_SIZE..];
    read_weight_type(&mut cursor)
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Serialize `fst` to `out`.
pub fn write_fst<F, O>(fst: &F, out: &mut O) -> Result<(), FstError>
where
    F: Fst + ?Sized,
    O: Write + ?Sized,
{
    let header = FstHeader {
        magic: MAGIC.to_le(),
        version: VERSION.to_le(),
        start: fst.start().unwrap_or(NO_START).to_le(),
        _reserved: 0,
        num_states: (fst.num_states() as u64).to_le(),
        num_arcs: (fst.total_arcs() as u64).to_le(),
    };
    out.write_all(bytemuck::bytes_of(&header))?;

    let weight_type = <F::W as Weight>::weight_type();
    write_len(out, weight_type.len())?;
    out.write_all(weight_type.as_bytes())?;

    for s in fst.states() {
        match fst.final_weight(s)? {
            Some(w) => {
                out.write_all(&[FINAL])?;
                w.write_binary(out)?;
            }
            None => out.write_all(&[NOT_FINAL])?,
        }
        write_len(out, fst.num_arcs(s)?)?;
        for arc in fst.arcs(s)? {
            out.write_all(bytemuck::bytes_of(&ArcRecord::from_arc(arc)))?;
            arc.weight.write_binary(out)?;
        }
    }
    Ok(())
}

/// Serialize `fst` into a new buffer.
pub fn to_bytes<F: Fst + ?Sized>(fst: &F) -> Result<Vec<u8>, FstError> {
    let mut buf = Vec::new();
    write_fst(fst, &mut buf)?;
    Ok(buf)
}

fn write_len<O: Write + ?Sized>(out: &mut O, len: usize) -> Result<(), FstError> {
    let len = u32::try_from(len)
        .map_err(|_| FstError::Corrupt(format!("length {len} does not fit in 32 bits")))?;
    out.write_all(&len.to_le_bytes())?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Load a transducer with weight type `W` from `data`.
///
/// Every structural field is validated; the result always satisfies the
/// graph invariants. Truncated input, trailing bytes, a different stored
/// weight type or out-of-range state ids are errors.
pub fn read_fst<W: Weight>(data: &[u8]) -> Result<VectorFst<W>, FstError> {
    let header = parse_header(data)?;
    let mut cursor = &data[HEADER_SIZE..];

    let stored = read_weight_type(&mut cursor)?;
    let expected = W::weight_type();
    if stored != expected {
        return Err(FstError::WeightTypeMismatch {
            expected,
            actual: stored,
        });
    }

    if header.num_states > (cursor.len() / MIN_STATE_SIZE) as u64 {
        return Err(FstError::Truncated);
    }
    if header.num_states > NO_START as u64 {
        return Err(FstError::Corrupt(format!(
            "{} states exceed the state id range",
            header.num_states
        )));
    }
    let num_states = header.num_states as usize;

    let mut fst = VectorFst::with_capacity(num_states);
    for _ in 0..num_states {
        fst.add_state();
    }
    if let Some(start) = header.start_state() {
        if start as usize >= num_states {
            return Err(FstError::Corrupt(format!("start state {start} out of range")));
        }
        fst.set_start(start)?;
    }

    let mut num_arcs: u64 = 0;
    for s in 0..num_states as StateId {
        match read_u8(&mut cursor)? {
            NOT_FINAL => {}
            FINAL => fst.set_final(s, W::read_binary(&mut cursor).map_err(io_error)?)?,
            marker => {
                return Err(FstError::Corrupt(format!(
                    "invalid final marker {marker:#04x} for state {s}"
                )));
            }
        }

        let count = read_u32(&mut cursor)?;
        for _ in 0..count {
            let record: ArcRecord = bytemuck::pod_read_unaligned(take(&mut cursor, 16)?);
            let weight = W::read_binary(&mut cursor).map_err(io_error)?;
            let arc = record.into_arc(weight);
            if arc.nextstate as usize >= num_states {
                return Err(FstError::Corrupt(format!(
                    "arc from state {s} to missing state {}",
                    arc.nextstate
                )));
            }
            fst.add_arc(s, arc)?;
        }
        num_arcs += u64::from(count);
    }

    if num_arcs != header.num_arcs {
        return Err(FstError::Corrupt(format!(
            "header declares {} arcs, found {num_arcs}",
            header.num_arcs
        )));
    }
    if !cursor.is_empty() {
        return Err(FstError::Corrupt(format!(
            "{} trailing bytes",
            cursor.len()
        )));
    }

    tracing::debug!(
        weight_type = %expected,
        states = num_states,
        arcs = num_arcs,
        "loaded transducer"
    );
    Ok(fst)
}

fn read_weight_type(cursor: &mut &[u8]) -> Result<String, FstError> {
    let len = read_u32(cursor)? as usize;
    let bytes = take(cursor, len)?;
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| FstError::Corrupt("weight type is not valid UTF-8".to_string()))
}

fn take<'a>(cursor: &mut &'a [u8], n: usize) -> Result<&'a [u8], FstError> {
    if cursor.len() < n {
        return Err(FstError::Truncated);
    }
    let (head, rest) = cursor.split_at(n);
    *cursor = rest;
    Ok(head)
}

fn read_u8(cursor: &mut &[u8]) -> Result<u8, FstError> {
    Ok(take(cursor, 1)?[0])
}

fn read_u32(cursor: &mut &[u8]) -> Result<u32, FstError> {
    let bytes = take(cursor, 4)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn io_error(err: io::Error) -> FstError {
    match err.kind() {
        io::ErrorKind::UnexpectedEof => FstError::Truncated,
        io::ErrorKind::InvalidData => FstError::Corrupt(err.to_string()),
        _ => FstError::Io(err),
    }
}
