// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::execution::{ExceptionType, JsError, JsResult};
use crate::ecmascript::types::{MAX_ARRAY_INDEX, Value};

#[cfg(feature = "byte-view")]
use super::byte_elements::ByteElements;
use super::hole_filter::{HoleRangeFilter, HoleSetFilter};
use super::int_elements::IntElements;
use super::integrity_filter::{FrozenFilter, SealedFilter};
use super::long_elements::LongElements;
use super::number_elements::NumberElements;
use super::object_elements::ObjectElements;
use super::sparse_elements::SparseElements;
use crate::ecmascript::abstract_operations::type_conversion::{
    is_representable_as_int, is_representable_as_long,
};

/// Allocation granule for dense buffers.
pub(crate) const CHUNK_SIZE: u32 = 16;

/// Dense occupancy ceiling. A required index at or past this converts the
/// backing to sparse storage.
pub(crate) const MAX_DENSE_LENGTH: u32 = 512 * 1024;

/// Growth function for dense buffers: a fresh buffer gets one chunk,
/// anything else is rounded up to the chunk granule and doubled.
pub(crate) fn next_size(length: u32) -> u32 {
    if length == 0 {
        return CHUNK_SIZE;
    }
    length.div_ceil(CHUNK_SIZE) * CHUNK_SIZE * 2
}

/// Element kind of a dense backing, ordered from narrowest to widest.
/// Conversions only ever move towards `Object`; they never narrow back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ElementsKind {
    Int,
    Long,
    Number,
    Object,
}

/// The storage representation behind one array object.
///
/// A closed variant set: four dense typed backings, the sparse
/// prefix-plus-map backing, the hole-tracking filters, the integrity
/// filters, and the fixed-capacity byte view. Filters own their wrapped
/// representation and repoint it whenever an inner operation substitutes a
/// new one.
///
/// Every mutating operation either mutates the current representation in
/// place and returns it, or constructs a replacement and returns that; the
/// caller must always continue with the returned value. The
/// [`Array`](crate::ecmascript::builtins::Array) handle wraps this protocol
/// behind `&mut self` methods.
#[derive(Debug)]
pub enum ArrayStorage {
    Int(IntElements),
    Long(LongElements),
    Number(NumberElements),
    Object(ObjectElements),
    Sparse(SparseElements),
    HoleRange(HoleRangeFilter),
    HoleSet(HoleSetFilter),
    Sealed(SealedFilter),
    Frozen(FrozenFilter),
    #[cfg(feature = "byte-view")]
    ByteView(ByteElements),
}

impl Default for ArrayStorage {
    /// A fresh array starts as an empty dense int backing.
    fn default() -> ArrayStorage {
        ArrayStorage::Int(IntElements::new())
    }
}

macro_rules! dispatch {
    ($storage:expr, $elements:pat => $expr:expr) => {
        match $storage {
            ArrayStorage::Int($elements) => $expr,
            ArrayStorage::Long($elements) => $expr,
            ArrayStorage::Number($elements) => $expr,
            ArrayStorage::Object($elements) => $expr,
            ArrayStorage::Sparse($elements) => $expr,
            ArrayStorage::HoleRange($elements) => $expr,
            ArrayStorage::HoleSet($elements) => $expr,
            ArrayStorage::Sealed($elements) => $expr,
            ArrayStorage::Frozen($elements) => $expr,
            #[cfg(feature = "byte-view")]
            ArrayStorage::ByteView($elements) => $expr,
        }
    };
}

impl ArrayStorage {
    /// Virtual length of the array.
    pub fn length(&self) -> u32 {
        dispatch!(self, elements => elements.length())
    }

    /// Grows or converts the representation so `index` is safely writable.
    pub fn ensure(self, index: u32) -> ArrayStorage {
        dispatch!(self, elements => elements.ensure(index))
    }

    /// Shortens the array to `length`, clearing the vacated tail. Physical
    /// capacity may be retained.
    pub fn shrink(self, length: u32) -> ArrayStorage {
        dispatch!(self, elements => elements.shrink(length))
    }

    /// Moves every element `by` positions towards index 0, shortening the
    /// array.
    pub fn shift_left(&mut self, by: u32) {
        dispatch!(self, elements => elements.shift_left(by))
    }

    /// Moves every element `by` positions away from index 0, lengthening the
    /// array.
    pub fn shift_right(self, by: u32) -> ArrayStorage {
        dispatch!(self, elements => elements.shift_right(by))
    }

    pub fn get_int(&self, index: u32) -> i32 {
        dispatch!(self, elements => elements.get_int(index))
    }

    pub fn get_long(&self, index: u32) -> i64 {
        dispatch!(self, elements => elements.get_long(index))
    }

    pub fn get_double(&self, index: u32) -> f64 {
        dispatch!(self, elements => elements.get_double(index))
    }

    pub fn get_object(&self, index: u32) -> Value {
        dispatch!(self, elements => elements.get_object(index))
    }

    /// Stores a boxed value, widening the representation as needed. An
    /// `undefined` write on a numeric backing is delegated to hole tracking
    /// rather than forcing a conversion.
    pub fn set(self, index: u32, value: Value, strict: bool) -> JsResult<ArrayStorage> {
        dispatch!(self, elements => elements.set(index, value, strict))
    }

    pub fn set_int(self, index: u32, value: i32, strict: bool) -> JsResult<ArrayStorage> {
        dispatch!(self, elements => elements.set_int(index, value, strict))
    }

    pub fn set_long(self, index: u32, value: i64, strict: bool) -> JsResult<ArrayStorage> {
        dispatch!(self, elements => elements.set_long(index, value, strict))
    }

    pub fn set_double(self, index: u32, value: f64, strict: bool) -> JsResult<ArrayStorage> {
        dispatch!(self, elements => elements.set_double(index, value, strict))
    }

    pub fn has(&self, index: u32) -> bool {
        dispatch!(self, elements => elements.has(index))
    }

    /// Removes the element at `index`, leaving a hole. The caller has
    /// already consulted [`can_delete`](Self::can_delete).
    pub fn delete(self, index: u32) -> ArrayStorage {
        dispatch!(self, elements => elements.delete(index))
    }

    /// Removes the inclusive index range `[from, to]`, leaving holes.
    pub fn delete_range(self, from: u32, to: u32) -> ArrayStorage {
        dispatch!(self, elements => elements.delete_range(from, to))
    }

    /// Marks `index` as a hole without any deletion bookkeeping.
    pub fn set_empty(self, index: u32) -> ArrayStorage {
        dispatch!(self, elements => elements.set_empty(index))
    }

    /// Marks the inclusive range `[from, to]` as holes.
    pub fn set_empty_range(self, from: u32, to: u32) -> ArrayStorage {
        dispatch!(self, elements => elements.set_empty_range(from, to))
    }

    /// Removes and returns the last element; `undefined` on an empty array.
    pub fn pop(self) -> (ArrayStorage, Value) {
        dispatch!(self, elements => elements.pop())
    }

    /// Appends `values`, converting once to the widest kind they need.
    pub fn push(self, values: &[Value]) -> ArrayStorage {
        dispatch!(self, elements => elements.push(values))
    }

    /// Copies the half-open range `[from, to)` into a fresh storage of the
    /// same kind, propagating hole state.
    pub fn slice(&self, from: u32, to: u32) -> ArrayStorage {
        dispatch!(self, elements => elements.slice(from, to))
    }

    /// Explicitly widens to `kind`. Narrowing is an engine bug.
    pub fn convert(self, kind: ElementsKind) -> ArrayStorage {
        dispatch!(self, elements => elements.convert(kind))
    }

    /// Next populated index at or past `from`, skipping holes. `None` once
    /// the live range is exhausted.
    pub fn next_index(&self, from: u32) -> Option<u32> {
        dispatch!(self, elements => elements.next_index(from))
    }

    /// Strict-mode guard for deletions. Sealed and frozen storage refuses;
    /// in strict mode the refusal is a catchable type error naming the
    /// index.
    pub fn can_delete(&self, index: u32, strict: bool) -> JsResult<bool> {
        match self {
            ArrayStorage::Sealed(_) => {
                if strict {
                    Err(JsError::new(
                        ExceptionType::TypeError,
                        format!("Cannot delete property {index} of sealed array"),
                    ))
                } else {
                    Ok(false)
                }
            }
            ArrayStorage::Frozen(_) => {
                if strict {
                    Err(JsError::new(
                        ExceptionType::TypeError,
                        format!("Cannot delete property {index} of frozen array"),
                    ))
                } else {
                    Ok(false)
                }
            }
            ArrayStorage::HoleRange(filter) => filter.inner().can_delete(index, strict),
            ArrayStorage::HoleSet(filter) => filter.inner().can_delete(index, strict),
            #[cfg(feature = "byte-view")]
            ArrayStorage::ByteView(_) => {
                panic!("byte view storage does not support element deletion")
            }
            _ => Ok(true),
        }
    }

    /// Strict-mode guard for value writes. Only frozen storage refuses.
    pub fn write_guard(&self, index: u32, strict: bool) -> JsResult<()> {
        match self {
            ArrayStorage::Frozen(_) => {
                if strict {
                    Err(JsError::new(
                        ExceptionType::TypeError,
                        format!("Cannot assign to read only property {index} of frozen array"),
                    ))
                } else {
                    Ok(())
                }
            }
            ArrayStorage::Sealed(filter) => filter.inner().write_guard(index, strict),
            ArrayStorage::HoleRange(filter) => filter.inner().write_guard(index, strict),
            ArrayStorage::HoleSet(filter) => filter.inner().write_guard(index, strict),
            _ => Ok(()),
        }
    }

    /// Element kind of the dense backing underneath any filters; the sparse
    /// backing reports its dense prefix.
    pub fn elements_kind(&self) -> ElementsKind {
        match self {
            ArrayStorage::Int(_) => ElementsKind::Int,
            ArrayStorage::Long(_) => ElementsKind::Long,
            ArrayStorage::Number(_) => ElementsKind::Number,
            ArrayStorage::Object(_) => ElementsKind::Object,
            ArrayStorage::Sparse(elements) => elements.dense_kind(),
            ArrayStorage::HoleRange(filter) => filter.inner().elements_kind(),
            ArrayStorage::HoleSet(filter) => filter.inner().elements_kind(),
            ArrayStorage::Sealed(filter) => filter.inner().elements_kind(),
            ArrayStorage::Frozen(filter) => filter.inner().elements_kind(),
            #[cfg(feature = "byte-view")]
            ArrayStorage::ByteView(_) => ElementsKind::Int,
        }
    }

    /// A frozen array is also sealed.
    pub fn is_sealed(&self) -> bool {
        match self {
            ArrayStorage::Sealed(_) | ArrayStorage::Frozen(_) => true,
            ArrayStorage::HoleRange(filter) => filter.inner().is_sealed(),
            ArrayStorage::HoleSet(filter) => filter.inner().is_sealed(),
            _ => false,
        }
    }

    pub fn is_frozen(&self) -> bool {
        match self {
            ArrayStorage::Frozen(_) => true,
            ArrayStorage::HoleRange(filter) => filter.inner().is_frozen(),
            ArrayStorage::HoleSet(filter) => filter.inner().is_frozen(),
            _ => false,
        }
    }

    pub fn is_sparse(&self) -> bool {
        match self {
            ArrayStorage::Sparse(_) => true,
            ArrayStorage::HoleRange(filter) => filter.inner().is_sparse(),
            ArrayStorage::HoleSet(filter) => filter.inner().is_sparse(),
            ArrayStorage::Sealed(filter) => filter.inner().is_sparse(),
            ArrayStorage::Frozen(filter) => filter.inner().is_sparse(),
            _ => false,
        }
    }
}

/// Widest element kind needed across `values`, starting from `kind`. Any
/// non-numeric value forces `Object` immediately.
pub(crate) fn widest_elements_kind(mut kind: ElementsKind, values: &[Value]) -> ElementsKind {
    for value in values {
        let required = match value {
            Value::Integer(value) => {
                if i32::try_from(value.into_i64()).is_ok() {
                    ElementsKind::Int
                } else {
                    ElementsKind::Long
                }
            }
            Value::Number(value) => {
                if is_representable_as_int(*value) {
                    ElementsKind::Int
                } else if is_representable_as_long(*value) {
                    ElementsKind::Long
                } else {
                    ElementsKind::Number
                }
            }
            _ => ElementsKind::Object,
        };
        kind = kind.max(required);
        if kind == ElementsKind::Object {
            break;
        }
    }
    kind
}

/// Shared append loop for the dense backings: one conversion up front, then
/// in-kind writes. Crossing the dense ceiling mid-append promotes to sparse
/// through the ordinary `ensure` path.
pub(crate) fn push_dense(storage: ArrayStorage, values: &[Value]) -> ArrayStorage {
    let kind = widest_elements_kind(storage.elements_kind(), values);
    let mut storage = storage.convert(kind);
    for value in values {
        let index = storage.length();
        if index > MAX_ARRAY_INDEX {
            // Past the index domain, appended values become ordinary
            // properties upstream; the storage layer stops here.
            break;
        }
        storage = storage.ensure(index);
        storage = storage
            .set(index, value.clone(), false)
            .expect("append cannot hit an integrity filter");
    }
    storage
}

#[test]
fn next_size_rounds_to_chunks_and_doubles() {
    assert_eq!(next_size(0), 16);
    assert_eq!(next_size(1), 32);
    assert_eq!(next_size(16), 32);
    assert_eq!(next_size(17), 64);
    assert_eq!(next_size(100), 224);
}

#[test]
fn widest_kind_is_monotonic() {
    use crate::SmallInteger;
    let int = Value::Integer(SmallInteger::from(1));
    let long = Value::from_i64(5_000_000_000);
    let double = Value::Number(0.5);
    let object = Value::from("foo");

    assert_eq!(
        widest_elements_kind(ElementsKind::Int, &[int.clone()]),
        ElementsKind::Int
    );
    assert_eq!(
        widest_elements_kind(ElementsKind::Int, &[int.clone(), long.clone()]),
        ElementsKind::Long
    );
    assert_eq!(
        widest_elements_kind(ElementsKind::Int, &[long, double.clone()]),
        ElementsKind::Number
    );
    assert_eq!(
        widest_elements_kind(ElementsKind::Int, &[int, object, double]),
        ElementsKind::Object
    );
    assert_eq!(
        widest_elements_kind(ElementsKind::Number, &[Value::Integer(SmallInteger::from(1))]),
        ElementsKind::Number
    );
    assert_eq!(
        widest_elements_kind(ElementsKind::Int, &[Value::Undefined]),
        ElementsKind::Object
    );
}
