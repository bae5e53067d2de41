//! # Table Codec
//!
//! Slot-indexed layer over the `flatbuffers` runtime. Records name their
//! fields by slot number; slot `n` lives at vtable offset `4 + 2n`, the layout
//! the on-chain program's generated readers expect.
//!
//! ```text
//! buffer:  [root: u32] ... vtables, tables, vectors ...
//!
//! vtable:  [vtable_len: u16][inline_len: u16][slot 0: u16][slot 1: u16]...
//!          slot entry = field offset from table start, 0 = absent
//!
//! table:   [soffset: i32 = table_pos - vtable_pos][inline fields...]
//!
//! vector:  [count: u32][elements...]          (string: + trailing 0)
//! ```
//!
//! Building collects fields per slot and serializes them through
//! [`FlatBufferBuilder`], children first. Reading goes through
//! [`flatbuffers::Table`]; every field is checked by a [`Verifier`] before it
//! is followed.

use crate::config::CodecConfig;
use crate::error::{BuildError, DecodeError};
use flatbuffers::{
    FlatBufferBuilder, Follow, ForwardsUOffset, InvalidFlatbuffer, Push, SimpleToVerifyInSlice,
    Table, TableFinishedWIPOffset, UnionWIPOffset, VOffsetT, Vector, Verifiable, Verifier,
    VerifierOptions, WIPOffset,
};
use std::cmp::Reverse;
use std::fmt;

/// Size of the `vtable_len` + `inline_len` header of every vtable
const VTABLE_HEADER: usize = 4;

/// Size of the `soffset` at the start of every table
const TABLE_HEADER: usize = 4;

/// Size of a reference (uoffset) field
const REF_SIZE: usize = 4;

/// Vtable offset of a slot, if it is addressable at all
fn voffset(slot: usize) -> Option<VOffsetT> {
    slot.checked_mul(2)
        .and_then(|n| n.checked_add(VTABLE_HEADER))
        .and_then(|n| VOffsetT::try_from(n).ok())
        .filter(|&n| n < VOffsetT::MAX)
}

fn check_len(len: usize) -> Result<(), BuildError> {
    u32::try_from(len)
        .map(|_| ())
        .map_err(|_| BuildError::VectorTooLong(len))
}

// ============================================================================
// Scalars and Structs
// ============================================================================

/// Fixed-width little-endian value stored inline in a table
pub trait Scalar:
    Copy + PartialEq + Verifiable + for<'a> Follow<'a, Inner = Self> + 'static
{
    const SIZE: usize;

    /// Little-endian bytes, zero-extended to eight
    fn to_le(self) -> [u8; 8];
}

macro_rules! impl_scalar {
    ($($ty:ty),*) => {
        $(
            impl Scalar for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn to_le(self) -> [u8; 8] {
                    let mut out = [0u8; 8];
                    out[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
                    out
                }
            }
        )*
    };
}

impl_scalar!(u8, u16, u32, u64, i32, i64);

impl Scalar for bool {
    const SIZE: usize = 1;

    #[inline]
    fn to_le(self) -> [u8; 8] {
        [u8::from(self), 0, 0, 0, 0, 0, 0, 0]
    }
}

/// Fixed-size record stored back to back inside a vector
///
/// The record's [`Push::alignment`] places every element, not the count, on
/// the record alignment.
pub trait WireStruct:
    Push<Output = Self>
    + SimpleToVerifyInSlice
    + for<'a> Follow<'a, Inner = Self>
    + Copy
    + fmt::Debug
    + 'static
{
}

trait StructVector: fmt::Debug {
    fn create<'f>(&self, fbb: &mut FlatBufferBuilder<'f>) -> WIPOffset<UnionWIPOffset>;
}

impl<T: WireStruct> StructVector for Vec<T> {
    fn create<'f>(&self, fbb: &mut FlatBufferBuilder<'f>) -> WIPOffset<UnionWIPOffset> {
        fbb.create_vector(self.as_slice()).as_union_value()
    }
}

/// Follows an offset to the absolute position of the table behind it
struct TablePosition;

impl<'a> Follow<'a> for TablePosition {
    type Inner = usize;

    #[inline]
    unsafe fn follow(_buf: &'a [u8], loc: usize) -> Self::Inner {
        loc
    }
}

impl Verifiable for TablePosition {
    #[inline]
    fn run_verifier(v: &mut Verifier, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?.finish();
        Ok(())
    }
}

// ============================================================================
// Builder
// ============================================================================

#[derive(Debug)]
enum Field {
    Scalar { bytes: [u8; 8], size: usize },
    Bytes(Vec<u8>),
    String(String),
    Structs(Box<dyn StructVector>),
    Table(TableBuilder),
    Tables(Vec<TableBuilder>),
}

impl Field {
    /// Bytes the field occupies inside its table (also its alignment)
    fn inline_size(&self) -> usize {
        match self {
            Field::Scalar { size, .. } => *size,
            _ => REF_SIZE,
        }
    }
}

/// One record under construction
///
/// Fields are keyed by slot number; slot numbers are part of the wire contract.
/// Unset slots cost nothing beyond their vtable entry, and trailing unset slots
/// are dropped from the vtable entirely.
#[derive(Debug, Default)]
pub struct TableBuilder {
    fields: Vec<Option<Field>>,
}

impl TableBuilder {
    pub fn new(field_count: usize) -> Self {
        let mut fields = Vec::with_capacity(field_count);
        fields.resize_with(field_count, || None);
        Self { fields }
    }

    fn set(&mut self, slot: usize, field: Field) {
        if slot >= self.fields.len() {
            self.fields.resize_with(slot + 1, || None);
        }
        self.fields[slot] = Some(field);
    }

    /// Store a scalar, omitting it when it equals the slot's default
    pub fn push_scalar<T: Scalar>(&mut self, slot: usize, value: T, default: T) -> &mut Self {
        if value != default {
            self.push_scalar_always(slot, value);
        }
        self
    }

    /// Store a scalar even when it equals the default
    pub fn push_scalar_always<T: Scalar>(&mut self, slot: usize, value: T) -> &mut Self {
        self.set(
            slot,
            Field::Scalar {
                bytes: value.to_le(),
                size: T::SIZE,
            },
        );
        self
    }

    /// Store a byte vector
    pub fn push_vector(&mut self, slot: usize, bytes: &[u8]) -> Result<&mut Self, BuildError> {
        check_len(bytes.len())?;
        self.set(slot, Field::Bytes(bytes.to_vec()));
        Ok(self)
    }

    /// Store a UTF-8 string (byte vector plus terminator)
    pub fn push_string(&mut self, slot: usize, value: &str) -> Result<&mut Self, BuildError> {
        check_len(value.len())?;
        self.set(slot, Field::String(value.to_owned()));
        Ok(self)
    }

    /// Store a vector of fixed-size records
    pub fn push_structs<T: WireStruct>(
        &mut self,
        slot: usize,
        records: Vec<T>,
    ) -> Result<&mut Self, BuildError> {
        check_len(records.len())?;
        self.set(slot, Field::Structs(Box::new(records)));
        Ok(self)
    }

    /// Store a nested table
    pub fn push_table(&mut self, slot: usize, table: TableBuilder) -> &mut Self {
        self.set(slot, Field::Table(table));
        self
    }

    /// Store a vector of nested tables
    pub fn push_tables(
        &mut self,
        slot: usize,
        tables: Vec<TableBuilder>,
    ) -> Result<&mut Self, BuildError> {
        check_len(tables.len())?;
        self.set(slot, Field::Tables(tables));
        Ok(self)
    }

    /// Serialize as a complete buffer with this table as root
    pub fn finish(&self) -> Result<Vec<u8>, BuildError> {
        let mut fbb = FlatBufferBuilder::new();
        let root = self.build(&mut fbb)?;
        fbb.finish_minimal(root);
        Ok(fbb.finished_data().to_vec())
    }

    fn build<'f>(
        &self,
        fbb: &mut FlatBufferBuilder<'f>,
    ) -> Result<WIPOffset<TableFinishedWIPOffset>, BuildError> {
        let mut present = Vec::new();
        let mut inline_bound = TABLE_HEADER;
        for (slot, field) in self.fields.iter().enumerate() {
            if let Some(field) = field {
                let voffset = voffset(slot).ok_or(BuildError::SlotOutOfRange(slot))?;
                // worst case one field's worth of alignment padding ahead of it
                inline_bound += 2 * field.inline_size();
                present.push((voffset, field));
            }
        }
        if u16::try_from(inline_bound).is_err() {
            return Err(BuildError::TableTooLarge(inline_bound));
        }

        // The builder writes back to front: children go in before their table
        let mut children = Vec::new();
        for &(voffset, field) in &present {
            let child = match field {
                Field::Scalar { .. } => continue,
                Field::Bytes(bytes) => fbb.create_vector(bytes.as_slice()).as_union_value(),
                Field::String(value) => fbb.create_string(value).as_union_value(),
                Field::Structs(records) => records.create(fbb),
                Field::Table(table) => table.build(fbb)?.as_union_value(),
                Field::Tables(tables) => {
                    let offsets = tables
                        .iter()
                        .map(|table| table.build(fbb))
                        .collect::<Result<Vec<_>, _>>()?;
                    fbb.create_vector(&offsets).as_union_value()
                }
            };
            children.push((voffset, child));
        }

        // Widest inline fields first, as flatc-generated builders order them
        present.sort_by_key(|(_, field)| Reverse(field.inline_size()));
        let start = fbb.start_table();
        let mut children = children.into_iter();
        for (voffset, field) in present {
            match field {
                Field::Scalar { bytes: b, size: 1 } => fbb.push_slot_always(voffset, b[0]),
                Field::Scalar { bytes: b, size: 2 } => {
                    fbb.push_slot_always(voffset, u16::from_le_bytes([b[0], b[1]]))
                }
                Field::Scalar { bytes: b, size: 4 } => {
                    fbb.push_slot_always(voffset, u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                }
                Field::Scalar { bytes, .. } => {
                    fbb.push_slot_always(voffset, u64::from_le_bytes(*bytes))
                }
                _ => {
                    if let Some((child_voffset, child)) = children.next() {
                        fbb.push_slot_always(child_voffset, child);
                    }
                }
            }
        }
        Ok(fbb.end_table(start))
    }
}

// ============================================================================
// Reader
// ============================================================================

fn decode_error(err: InvalidFlatbuffer, len: usize) -> DecodeError {
    match err {
        InvalidFlatbuffer::RangeOutOfBounds { range, .. } => DecodeError::Truncated {
            offset: range.start,
            needed: range.end.saturating_sub(range.start),
            len,
        },
        InvalidFlatbuffer::SignedOffsetOutOfBounds {
            soffset, position, ..
        } => DecodeError::OffsetOutOfRange {
            position,
            offset: i64::from(soffset),
        },
        InvalidFlatbuffer::Unaligned { position, .. } => DecodeError::Unaligned(position),
        InvalidFlatbuffer::Utf8Error { .. } => DecodeError::InvalidUtf8,
        InvalidFlatbuffer::MissingNullTerminator { range, .. } => {
            DecodeError::MissingTerminator(range.start)
        }
        other => DecodeError::Malformed(other.to_string()),
    }
}

/// Read-only view of one table inside a buffer
///
/// Every accessor verifies the field it reads; nothing past a declared vector
/// length or the buffer end is ever followed.
#[derive(Debug, Clone, Copy)]
pub struct TableReader<'a> {
    buf: &'a [u8],
    pos: usize,
    depth: usize,
    config: CodecConfig,
}

impl<'a> TableReader<'a> {
    /// Open the root table with default limits
    pub fn root(buf: &'a [u8]) -> Result<Self, DecodeError> {
        Self::root_with_config(buf, CodecConfig::DEFAULT)
    }

    pub fn root_with_config(buf: &'a [u8], config: CodecConfig) -> Result<Self, DecodeError> {
        let opts = VerifierOptions::default();
        let mut verifier = Verifier::new(&opts, buf);
        <ForwardsUOffset<TablePosition>>::run_verifier(&mut verifier, 0)
            .map_err(|err| decode_error(err, buf.len()))?;
        // Safety: the root offset was verified above
        let pos = unsafe { <ForwardsUOffset<TablePosition>>::follow(buf, 0) };
        Self::at(buf, pos, 0, config)
    }

    fn at(buf: &'a [u8], pos: usize, depth: usize, config: CodecConfig) -> Result<Self, DecodeError> {
        if depth > config.max_depth {
            return Err(DecodeError::TooDeep {
                depth,
                limit: config.max_depth,
            });
        }
        let opts = VerifierOptions::default();
        Verifier::new(&opts, buf)
            .visit_table(pos)
            .map(|table| {
                table.finish();
            })
            .map_err(|err| decode_error(err, buf.len()))?;

        Ok(Self {
            buf,
            pos,
            depth,
            config,
        })
    }

    /// Absolute position of the table
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn config(&self) -> CodecConfig {
        self.config
    }

    fn raw(&self) -> Table<'a> {
        // Safety: `at` verified the table header and its vtable
        unsafe { Table::new(self.buf, self.pos) }
    }

    /// Verify the slot as a `T`; `None` when it is absent
    fn verify<T: Verifiable>(&self, slot: usize) -> Result<Option<VOffsetT>, DecodeError> {
        let Some(voffset) = voffset(slot) else {
            return Ok(None);
        };
        if self.raw().vtable().get(voffset) == 0 {
            return Ok(None);
        }
        let opts = VerifierOptions::default();
        Verifier::new(&opts, self.buf)
            .visit_table(self.pos)
            .and_then(|table| table.visit_field::<T>("slot", voffset, false))
            .map(|table| {
                table.finish();
            })
            .map_err(|err| decode_error(err, self.buf.len()))?;
        Ok(Some(voffset))
    }

    fn check_count(&self, len: usize) -> Result<(), DecodeError> {
        if len > self.config.max_vector_len {
            return Err(DecodeError::VectorTooLong {
                len,
                limit: self.config.max_vector_len,
            });
        }
        Ok(())
    }

    /// Whether the slot is populated
    pub fn has_field(&self, slot: usize) -> bool {
        voffset(slot).is_some_and(|voffset| self.raw().vtable().get(voffset) != 0)
    }

    /// Read a scalar, or `default` when the slot is absent
    pub fn scalar<T: Scalar>(&self, slot: usize, default: T) -> Result<T, DecodeError> {
        let Some(voffset) = self.verify::<T>(slot)? else {
            return Ok(default);
        };
        // Safety: the field was verified to hold a `T`
        let value = unsafe { self.raw().get::<T>(voffset, Some(default)) };
        Ok(value.unwrap_or(default))
    }

    /// Read a byte vector
    pub fn vector(&self, slot: usize) -> Result<Option<&'a [u8]>, DecodeError> {
        let Some(voffset) = self.verify::<ForwardsUOffset<Vector<'a, u8>>>(slot)? else {
            return Ok(None);
        };
        // Safety: verified as a byte vector
        let vector = unsafe {
            self.raw()
                .get::<ForwardsUOffset<Vector<'a, u8>>>(voffset, None)
        };
        match vector {
            Some(vector) => {
                self.check_count(vector.len())?;
                Ok(Some(vector.bytes()))
            }
            None => Ok(None),
        }
    }

    /// Read a UTF-8 string
    pub fn string(&self, slot: usize) -> Result<Option<&'a str>, DecodeError> {
        let Some(voffset) = self.verify::<ForwardsUOffset<&str>>(slot)? else {
            return Ok(None);
        };
        // Safety: verified as a terminated UTF-8 string
        Ok(unsafe { self.raw().get::<ForwardsUOffset<&'a str>>(voffset, None) })
    }

    /// Read a string the record cannot do without
    pub fn required_string(&self, slot: usize, name: &'static str) -> Result<&'a str, DecodeError> {
        self.string(slot)?.ok_or(DecodeError::MissingField(name))
    }

    /// Read a nested table
    pub fn table(&self, slot: usize) -> Result<Option<TableReader<'a>>, DecodeError> {
        let Some(voffset) = self.verify::<ForwardsUOffset<TablePosition>>(slot)? else {
            return Ok(None);
        };
        // Safety: verified as a table offset
        let target = unsafe {
            self.raw()
                .get::<ForwardsUOffset<TablePosition>>(voffset, None)
        };
        target
            .map(|pos| Self::at(self.buf, pos, self.depth + 1, self.config))
            .transpose()
    }

    /// Read a vector of nested tables
    pub fn tables(&self, slot: usize) -> Result<Option<Vec<TableReader<'a>>>, DecodeError> {
        type Offsets<'b> = ForwardsUOffset<Vector<'b, ForwardsUOffset<TablePosition>>>;

        let Some(voffset) = self.verify::<Offsets<'a>>(slot)? else {
            return Ok(None);
        };
        // Safety: verified as a vector of table offsets
        let Some(vector) = (unsafe { self.raw().get::<Offsets<'a>>(voffset, None) }) else {
            return Ok(None);
        };
        self.check_count(vector.len())?;
        vector
            .iter()
            .map(|pos| Self::at(self.buf, pos, self.depth + 1, self.config))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Read a vector of fixed-size records as raw record-sized chunks
    pub fn structs<T: WireStruct>(&self, slot: usize) -> Result<Option<Vec<&'a [u8]>>, DecodeError> {
        let Some(voffset) = self.verify::<ForwardsUOffset<Vector<'a, T>>>(slot)? else {
            return Ok(None);
        };
        // Safety: verified as a vector of `T`
        let Some(vector) =
            (unsafe { self.raw().get::<ForwardsUOffset<Vector<'a, T>>>(voffset, None) })
        else {
            return Ok(None);
        };
        self.check_count(vector.len())?;
        let width = std::mem::size_of::<T>();
        Ok(Some(vector.bytes().chunks_exact(width).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatbuffers::PushAlignment;

    #[derive(Debug, Clone, Copy, PartialEq)]
    #[repr(transparent)]
    struct Pair([u8; 16]);

    impl Push for Pair {
        type Output = Pair;

        unsafe fn push(&self, dst: &mut [u8], _written_len: usize) {
            dst.copy_from_slice(&self.0);
        }

        fn alignment() -> PushAlignment {
            PushAlignment::new(8)
        }
    }

    impl Verifiable for Pair {
        fn run_verifier(v: &mut Verifier, pos: usize) -> Result<(), InvalidFlatbuffer> {
            v.in_buffer::<Self>(pos)
        }
    }

    impl<'a> Follow<'a> for Pair {
        type Inner = Pair;

        unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
            let mut bytes = [0u8; 16];
            bytes.copy_from_slice(&buf[loc..loc + 16]);
            Pair(bytes)
        }
    }

    impl SimpleToVerifyInSlice for Pair {}
    impl WireStruct for Pair {}

    /// Offset of the first occurrence of `needle`
    fn find(bytes: &[u8], needle: &[u8]) -> usize {
        bytes
            .windows(needle.len())
            .position(|window| window == needle)
            .unwrap()
    }

    #[test]
    fn test_empty_table_layout() {
        let bytes = TableBuilder::new(0).finish().unwrap();
        // root -> 8, vtable {len 4, inline 4}, soffset 4
        assert_eq!(bytes, vec![8, 0, 0, 0, 4, 0, 4, 0, 4, 0, 0, 0]);

        let table = TableReader::root(&bytes).unwrap();
        assert_eq!(table.position(), 8);
        assert!(!table.has_field(0));
        assert_eq!(table.scalar(0, 7u64).unwrap(), 7);
    }

    #[test]
    fn test_default_is_omitted() {
        let mut with_default = TableBuilder::new(2);
        with_default.push_scalar(0, 0u64, 0).push_scalar(1, true, true);
        let omitted = TableBuilder::new(2);
        assert_eq!(with_default.finish().unwrap(), omitted.finish().unwrap());

        let bytes = with_default.finish().unwrap();
        let table = TableReader::root(&bytes).unwrap();
        assert_eq!(table.scalar(0, 0u64).unwrap(), 0);
        assert!(table.scalar(1, true).unwrap());
    }

    #[test]
    fn test_scalar_roundtrip_and_alignment() {
        let mut builder = TableBuilder::new(4);
        builder
            .push_scalar(0, 1u8, 0)
            .push_scalar(1, u64::MAX, 0)
            .push_scalar(2, 0xDEADBEEFu32, 0)
            .push_scalar(3, false, true);
        let bytes = builder.finish().unwrap();

        let table = TableReader::root(&bytes).unwrap();
        assert_eq!(table.scalar(0, 0u8).unwrap(), 1);
        assert_eq!(table.scalar(1, 0u64).unwrap(), u64::MAX);
        assert_eq!(table.scalar(2, 0u32).unwrap(), 0xDEADBEEF);
        assert!(!table.scalar(3, true).unwrap());

        let field = table.raw().vtable().get(voffset(1).unwrap()) as usize;
        assert_eq!((table.position() + field) % 8, 0);
    }

    #[test]
    fn test_scalar_always_writes_default() {
        let mut builder = TableBuilder::new(1);
        builder.push_scalar_always(0, 0u8);
        let bytes = builder.finish().unwrap();
        let table = TableReader::root(&bytes).unwrap();
        assert!(table.has_field(0));
        assert_eq!(table.scalar(0, 9u8).unwrap(), 0);
    }

    #[test]
    fn test_vector_and_string() {
        let mut builder = TableBuilder::new(3);
        builder.push_vector(0, &[1, 2, 3]).unwrap();
        builder.push_string(2, "hello").unwrap();
        let bytes = builder.finish().unwrap();

        let table = TableReader::root(&bytes).unwrap();
        assert_eq!(table.vector(0).unwrap(), Some(&[1u8, 2, 3][..]));
        assert_eq!(table.vector(1).unwrap(), None);
        assert_eq!(table.string(2).unwrap(), Some("hello"));
        assert_eq!(
            table.required_string(1, "missing"),
            Err(DecodeError::MissingField("missing"))
        );
    }

    #[test]
    fn test_empty_vector_is_present() {
        let mut builder = TableBuilder::new(1);
        builder.push_vector(0, &[]).unwrap();
        let bytes = builder.finish().unwrap();
        let table = TableReader::root(&bytes).unwrap();
        assert_eq!(table.vector(0).unwrap(), Some(&[][..]));
    }

    #[test]
    fn test_nested_tables() {
        let mut child = TableBuilder::new(1);
        child.push_string(0, "inner").unwrap();
        let mut a = TableBuilder::new(2);
        a.push_scalar(0, 6u8, 0).push_vector(1, &[9]).unwrap();
        let b = TableBuilder::new(2);

        let mut root = TableBuilder::new(2);
        root.push_table(0, child);
        root.push_tables(1, vec![a, b]).unwrap();
        let bytes = root.finish().unwrap();

        let table = TableReader::root(&bytes).unwrap();
        let inner = table.table(0).unwrap().unwrap();
        assert_eq!(inner.string(0).unwrap(), Some("inner"));

        let list = table.tables(1).unwrap().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].scalar(0, 0u8).unwrap(), 6);
        assert_eq!(list[0].vector(1).unwrap(), Some(&[9u8][..]));
        assert_eq!(list[1].scalar(0, 0u8).unwrap(), 0);
        assert_eq!(list[1].vector(1).unwrap(), None);
    }

    #[test]
    fn test_struct_vector_alignment() {
        let mut first = [0u8; 16];
        first[0] = 1;
        let mut second = [0u8; 16];
        second[0] = 2;
        let mut builder = TableBuilder::new(2);
        builder.push_vector(0, &[1]).unwrap();
        builder.push_structs(1, vec![Pair(first), Pair(second)]).unwrap();
        let bytes = builder.finish().unwrap();

        let table = TableReader::root(&bytes).unwrap();
        let records = table.structs::<Pair>(1).unwrap().unwrap();
        assert_eq!(records, vec![&first[..], &second[..]]);

        // the record alignment comes from the record type
        let start = records[0].as_ptr() as usize - bytes.as_ptr() as usize;
        assert_eq!(start % 8, 0);
    }

    #[test]
    fn test_slot_out_of_range() {
        let mut builder = TableBuilder::new(1);
        builder.push_scalar(40_000, 1u8, 0);
        assert_eq!(builder.finish(), Err(BuildError::SlotOutOfRange(40_000)));
    }

    #[test]
    fn test_table_too_large() {
        let mut builder = TableBuilder::new(0);
        for slot in 0..5_000 {
            builder.push_scalar(slot, 1u64, 0);
        }
        assert!(matches!(builder.finish(), Err(BuildError::TableTooLarge(_))));
    }

    #[test]
    fn test_truncated_root() {
        assert!(matches!(
            TableReader::root(&[1, 0]),
            Err(DecodeError::Truncated { .. })
        ));
        assert!(TableReader::root(&[]).is_err());
    }

    #[test]
    fn test_truncated_vector() {
        let mut builder = TableBuilder::new(1);
        builder.push_vector(0, &[0xAA; 16]).unwrap();
        let bytes = builder.finish().unwrap();

        let cut = &bytes[..bytes.len() - 1];
        let table = TableReader::root(cut).unwrap();
        assert!(matches!(table.vector(0), Err(DecodeError::Truncated { .. })));
    }

    #[test]
    fn test_oversized_vector_length() {
        let mut builder = TableBuilder::new(1);
        builder.push_vector(0, &[0xAA; 4]).unwrap();
        let mut bytes = builder.finish().unwrap();
        let count = find(&bytes, &[0xAA; 4]) - 4;

        bytes[count..count + 4].copy_from_slice(&1000u32.to_le_bytes());
        let table = TableReader::root(&bytes).unwrap();
        assert!(matches!(table.vector(0), Err(DecodeError::Truncated { .. })));

        bytes[count..count + 4].copy_from_slice(&u32::MAX.to_le_bytes());
        let table = TableReader::root(&bytes).unwrap();
        assert!(table.vector(0).is_err());
    }

    #[test]
    fn test_vector_limit() {
        let mut builder = TableBuilder::new(1);
        builder.push_vector(0, &[0xAA; 32]).unwrap();
        let bytes = builder.finish().unwrap();
        let config = CodecConfig::new(8, 16, 16).unwrap();
        let table = TableReader::root_with_config(&bytes, config).unwrap();
        assert_eq!(
            table.vector(0),
            Err(DecodeError::VectorTooLong { len: 32, limit: 16 })
        );
    }

    #[test]
    fn test_missing_terminator() {
        let mut builder = TableBuilder::new(1);
        builder.push_string(0, "abc").unwrap();
        let mut bytes = builder.finish().unwrap();
        let terminator = find(&bytes, b"abc") + 3;
        bytes[terminator] = b'!';
        let table = TableReader::root(&bytes).unwrap();
        assert!(matches!(
            table.string(0),
            Err(DecodeError::MissingTerminator(_))
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut builder = TableBuilder::new(1);
        builder.push_string(0, "ab").unwrap();
        let mut bytes = builder.finish().unwrap();
        let start = find(&bytes, b"ab");
        bytes[start] = 0xFF;
        let table = TableReader::root(&bytes).unwrap();
        assert_eq!(table.string(0), Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn test_bad_soffset() {
        let mut bytes = TableBuilder::new(0).finish().unwrap();
        bytes[8..12].copy_from_slice(&100i32.to_le_bytes());
        assert!(matches!(
            TableReader::root(&bytes),
            Err(DecodeError::OffsetOutOfRange { .. })
        ));
    }

    #[test]
    fn test_field_outside_buffer() {
        let mut builder = TableBuilder::new(1);
        builder.push_scalar(0, 5u32, 0);
        let mut bytes = builder.finish().unwrap();
        let table = TableReader::root(&bytes).unwrap();
        let entry = table.position() - 2;
        // point slot 0 far past the end of the buffer
        bytes[entry..entry + 2].copy_from_slice(&0x4000u16.to_le_bytes());
        let table = TableReader::root(&bytes).unwrap();
        assert!(matches!(
            table.scalar(0, 0u32),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut table = TableBuilder::new(1);
        for _ in 0..3 {
            let mut parent = TableBuilder::new(1);
            parent.push_table(0, table);
            table = parent;
        }
        let bytes = table.finish().unwrap();
        let config = CodecConfig::new(2, 16, 16).unwrap();

        let root = TableReader::root_with_config(&bytes, config).unwrap();
        let one = root.table(0).unwrap().unwrap();
        let two = one.table(0).unwrap().unwrap();
        assert!(matches!(
            two.table(0),
            Err(DecodeError::TooDeep { depth: 3, limit: 2 })
        ));
    }
}
