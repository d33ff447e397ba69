// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use vesper_vm::ecmascript::builtins::{Array, ElementsKind};
use vesper_vm::ecmascript::execution::ExceptionType;
use vesper_vm::ecmascript::types::Value;

fn int_array(values: &[i32]) -> Array {
    values.iter().map(|&value| Value::from(value)).collect()
}

#[test]
fn fresh_array_starts_dense_int() {
    let mut array = Array::new();
    assert_eq!(array.length(), 0);
    assert_eq!(array.elements_kind(), ElementsKind::Int);
    array
        .push(&[Value::from(1), Value::from(2), Value::from(3)])
        .unwrap();
    assert_eq!(array.elements_kind(), ElementsKind::Int);
    assert_eq!(array.length(), 3);
    assert_eq!(array.get(0), Value::from(1));
}

#[test]
fn incompatible_write_widens_to_object() {
    let mut array = int_array(&[1, 2, 3]);
    array.set(0, Value::from("foo"), false).unwrap();
    assert_eq!(array.elements_kind(), ElementsKind::Object);
    assert_eq!(array.length(), 3);
    assert_eq!(array.get(0), Value::from("foo"));
    assert_eq!(array.get(1), Value::from(2));
}

#[test]
fn widening_is_monotonic_across_pushes() {
    let mut array = Array::new();
    array.push(&[Value::from(1)]).unwrap();
    assert_eq!(array.elements_kind(), ElementsKind::Int);
    array.push(&[Value::from_i64(5_000_000_000)]).unwrap();
    assert_eq!(array.elements_kind(), ElementsKind::Long);
    array.push(&[Value::from(0.5)]).unwrap();
    assert_eq!(array.elements_kind(), ElementsKind::Number);
    // Removing the double does not narrow the backing.
    array.pop().unwrap();
    assert_eq!(array.elements_kind(), ElementsKind::Number);
    array.push(&[Value::from("x")]).unwrap();
    assert_eq!(array.elements_kind(), ElementsKind::Object);
    // Values survive every conversion.
    assert_eq!(array.get(0), Value::from(1));
    assert_eq!(array.get(1), Value::from_i64(5_000_000_000));
}

#[test]
fn heterogeneous_push_converts_once_to_the_widest_kind() {
    let mut array = Array::new();
    array
        .push(&[Value::from(1), Value::from(2.5), Value::from(3)])
        .unwrap();
    assert_eq!(array.elements_kind(), ElementsKind::Number);
    assert_eq!(array.length(), 3);
    assert_eq!(array.get(1), Value::from(2.5));
}

#[test]
fn integral_double_writes_stay_int() {
    let mut array = Array::new();
    array.set_double(0, 3.0, false).unwrap();
    assert_eq!(array.elements_kind(), ElementsKind::Int);
    assert_eq!(array.get_int(0), 3);
}

#[test]
fn negative_zero_is_not_representable_as_int() {
    let mut array = Array::new();
    array.set_double(0, -0.0, false).unwrap();
    assert_eq!(array.elements_kind(), ElementsKind::Number);
    let read = array.get_double(0);
    assert_eq!(read, 0.0);
    assert!(read.is_sign_negative());
}

#[test]
fn long_backing_coerces_narrowing_reads() {
    let mut array = Array::new();
    array.set_long(0, 5_000_000_000, false).unwrap();
    assert_eq!(array.elements_kind(), ElementsKind::Long);
    assert_eq!(array.get_double(0), 5e9);
    // Int reads keep the low 32 bits.
    assert_eq!(array.get_int(0), 705_032_704);
    assert_eq!(array.get(0), Value::from_i64(5_000_000_000));
}

#[test]
fn double_backing_truncates_on_int_reads() {
    let mut array = Array::new();
    array.set_double(0, 3.99, false).unwrap();
    array.set_double(1, -1.5, false).unwrap();
    assert_eq!(array.elements_kind(), ElementsKind::Number);
    assert_eq!(array.get_int(0), 3);
    assert_eq!(array.get_long(0), 3);
    assert_eq!(array.get_int(1), -1);
}

#[test]
fn object_backing_coerces_numeric_reads() {
    let mut array: Array = [Value::from("42")].into_iter().collect();
    assert_eq!(array.elements_kind(), ElementsKind::Object);
    assert_eq!(array.get_int(0), 42);
    assert_eq!(array.get_double(0), 42.0);
}

#[test]
fn delete_leaves_a_hole_and_keeps_length() {
    let mut array = int_array(&[1, 2, 3, 4, 5]);
    assert!(array.delete(1, false).unwrap());
    assert!(!array.has(1));
    assert_eq!(array.get(1), Value::Undefined);
    assert_eq!(array.length(), 5);
    assert_eq!(array.get(2), Value::from(3));
}

#[test]
fn delete_range_is_inclusive() {
    let mut array = int_array(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert!(array.delete_range(2, 5, false).unwrap());
    for index in 2..=5 {
        assert!(!array.has(index), "index {index} should be a hole");
    }
    assert!(array.has(1) && array.has(6));
    assert_eq!(array.length(), 10);
}

#[test]
fn disjoint_holes_survive_re_set() {
    let mut array = int_array(&[10, 20, 30, 40, 50]);
    array.delete(1, false).unwrap();
    array.delete(3, false).unwrap();
    assert!(!array.has(1) && !array.has(3));
    array.set(3, Value::from(99), false).unwrap();
    assert!(array.has(3));
    assert!(!array.has(1));
    assert_eq!(array.get(3), Value::from(99));
}

#[test]
fn gap_writes_create_holes_not_zeroes() {
    let mut array = Array::new();
    array.set(0, Value::from(1), false).unwrap();
    array.set(5, Value::from(2), false).unwrap();
    assert_eq!(array.length(), 6);
    assert!(array.has(0) && array.has(5));
    for index in 1..5 {
        assert!(!array.has(index));
    }
    assert_eq!(array.next_index(1), Some(5));
}

#[test]
fn undefined_write_becomes_a_hole_on_numeric_backings() {
    let mut array = int_array(&[1, 2, 3]);
    array.set(1, Value::Undefined, false).unwrap();
    assert_eq!(array.elements_kind(), ElementsKind::Int);
    assert!(!array.has(1));
    assert_eq!(array.get(1), Value::Undefined);
}

#[test]
fn undefined_is_stored_inline_on_object_backings() {
    let mut array: Array = [Value::from("x"), Value::from("y")].into_iter().collect();
    array.set(0, Value::Undefined, false).unwrap();
    assert!(array.has(0));
    assert_eq!(array.get(0), Value::Undefined);
}

#[test]
fn far_write_goes_sparse() {
    let mut array = Array::new();
    array.push(&[Value::from(1)]).unwrap();
    array.set(1_000_000, Value::from(7), false).unwrap();
    assert!(array.is_sparse());
    assert_eq!(array.length(), 1_000_001);
    assert!(!array.has(999_999));
    assert_eq!(array.get(1_000_000), Value::from(7));
    assert!(array.has(0));
    assert_eq!(array.get(0), Value::from(1));
}

#[test]
fn sparse_next_index_jumps_to_live_keys() {
    let mut array = Array::new();
    array.set(1, Value::from(1), false).unwrap();
    array.set(800_000, Value::from(2), false).unwrap();
    array.set(900_000, Value::from(3), false).unwrap();
    assert_eq!(array.next_index(0), Some(1));
    assert_eq!(array.next_index(2), Some(800_000));
    assert_eq!(array.next_index(800_001), Some(900_000));
    assert_eq!(array.next_index(900_001), None);
}

#[test]
fn sparse_pop_consumes_map_entries() {
    let mut array = Array::new();
    array.set(700_000, Value::from(5), false).unwrap();
    assert_eq!(array.length(), 700_001);
    assert_eq!(array.pop().unwrap(), Value::from(5));
    assert_eq!(array.length(), 700_000);
    assert_eq!(array.pop().unwrap(), Value::Undefined);
    assert_eq!(array.length(), 699_999);
}

#[test]
fn sparse_shifts_re_key_and_migrate() {
    let mut array = Array::new();
    array.set(0, Value::from(1), false).unwrap();
    array.set(600_000, Value::from(2), false).unwrap();
    assert!(array.is_sparse());

    array.shift_right(3).unwrap();
    assert_eq!(array.length(), 600_004);
    assert_eq!(array.get(3), Value::from(1));
    assert_eq!(array.get(600_003), Value::from(2));

    array.shift_left(4).unwrap();
    assert_eq!(array.length(), 600_000);
    assert_eq!(array.get(599_999), Value::from(2));

    // A large left shift pulls the map entry across the ceiling into the
    // dense prefix.
    array.shift_left(100_000).unwrap();
    assert_eq!(array.length(), 500_000);
    assert!(array.is_sparse());
    assert_eq!(array.get(499_999), Value::from(2));
    assert!(!array.has(10));
}

#[test]
fn pop_returns_last_and_zero_fills() {
    let mut array = int_array(&[1, 2]);
    assert_eq!(array.pop().unwrap(), Value::from(2));
    assert_eq!(array.pop().unwrap(), Value::from(1));
    assert_eq!(array.pop().unwrap(), Value::Undefined);
    assert_eq!(array.length(), 0);
}

#[test]
fn shift_left_and_right_move_elements() {
    let mut array = int_array(&[1, 2, 3, 4]);
    array.shift_left(1).unwrap();
    assert_eq!(array.length(), 3);
    assert_eq!(array.get(0), Value::from(2));
    array.shift_right(2).unwrap();
    assert_eq!(array.length(), 5);
    assert_eq!(array.get(2), Value::from(2));
    // Vacated slots read as zero until the caller writes them.
    assert_eq!(array.get_int(0), 0);
    array.set(0, Value::from(9), false).unwrap();
    assert_eq!(array.get(0), Value::from(9));
}

#[test]
fn slice_copies_half_open_range_and_preserves_holes() {
    let mut array = int_array(&[0, 1, 2, 3, 4, 5]);
    array.delete(3, false).unwrap();
    let sliced = array.slice(2, 5);
    assert_eq!(sliced.length(), 3);
    assert!(sliced.has(0));
    assert!(!sliced.has(1));
    assert_eq!(sliced.get(0), Value::from(2));
    assert_eq!(sliced.get(2), Value::from(4));
    // The source is untouched.
    assert_eq!(array.length(), 6);
    assert!(!array.has(3));
}

#[test]
fn slice_of_clean_range_is_same_kind_dense() {
    let array = int_array(&[1, 2, 3, 4]);
    let sliced = array.slice(1, 3);
    assert_eq!(sliced.elements_kind(), ElementsKind::Int);
    assert_eq!(sliced.length(), 2);
    assert_eq!(sliced.get(0), Value::from(2));
    assert_eq!(sliced.get(1), Value::from(3));
}

#[test]
fn grow_then_shrink_round_trips() {
    let mut array = int_array(&[1, 2, 3]);
    array.set_length(10).unwrap();
    assert_eq!(array.length(), 10);
    assert!(!array.has(5));
    array.set_length(3).unwrap();
    assert_eq!(array.length(), 3);
    assert!(array.has(2));
    assert_eq!(array.get(0), Value::from(1));
    assert_eq!(array.get(2), Value::from(3));
}

#[test]
fn with_length_allocates_holes() {
    let array = Array::with_length(5);
    assert_eq!(array.length(), 5);
    assert!(!array.has(0) && !array.has(4));
    assert_eq!(array.next_index(0), None);
}

#[test]
fn sealed_blocks_deletion_but_not_writes() {
    let mut array = int_array(&[1, 2, 3]);
    array.seal();
    assert!(array.is_sealed());
    assert!(!array.is_frozen());

    array.set(0, Value::from(9), false).unwrap();
    assert_eq!(array.get(0), Value::from(9));

    let error = array.delete(0, true).unwrap_err();
    assert_eq!(error.kind(), ExceptionType::TypeError);
    assert!(error.message().contains("0"));
    assert!(!array.delete(0, false).unwrap());
    assert!(array.has(0));
}

#[test]
fn sealed_refuses_new_elements() {
    let mut array = int_array(&[1, 2, 3]);
    array.seal();
    array.set(10, Value::from(1), false).unwrap();
    assert_eq!(array.length(), 3);
    assert!(!array.has(10));
    let error = array.set(10, Value::from(1), true).unwrap_err();
    assert_eq!(error.kind(), ExceptionType::TypeError);
    assert!(array.push(&[Value::from(4)]).is_err());
}

#[test]
fn sealed_length_can_grow_but_shrink_clamps() {
    let mut array = int_array(&[1, 2, 3]);
    array.seal();
    array.set_length(5).unwrap();
    assert_eq!(array.length(), 5);
    array.set_length(0).unwrap();
    // Sealed elements are non-configurable; length stops above them.
    assert_eq!(array.length(), 3);
    assert_eq!(array.get(2), Value::from(3));
}

#[test]
fn frozen_writes_are_ignored_or_raise() {
    let mut array = int_array(&[1, 2, 3]);
    array.freeze();
    assert!(array.is_frozen());
    assert!(array.is_sealed());

    let error = array.set(0, Value::from(99), true).unwrap_err();
    assert_eq!(error.kind(), ExceptionType::TypeError);
    assert!(error.message().contains("0"));
    assert_eq!(array.get(0), Value::from(1));

    array.set(0, Value::from(99), false).unwrap();
    assert_eq!(array.get(0), Value::from(1));
    assert_eq!(array.length(), 3);

    let error = array.delete(1, true).unwrap_err();
    assert_eq!(error.kind(), ExceptionType::TypeError);
    assert!(!array.delete(1, false).unwrap());
    assert!(array.has(1));

    assert!(array.pop().is_err());
    assert!(array.push(&[Value::from(4)]).is_err());
    assert!(array.set_length(0).is_err());
    assert_eq!(array.length(), 3);
}

#[test]
fn descriptor_flags_follow_integrity_level() {
    let mut array = int_array(&[7]);
    let descriptor = array.own_element_descriptor(0).unwrap();
    assert_eq!(descriptor.value, Some(Value::from(7)));
    assert_eq!(descriptor.writable, Some(true));
    assert_eq!(descriptor.enumerable, Some(true));
    assert_eq!(descriptor.configurable, Some(true));
    assert!(array.own_element_descriptor(1).is_none());

    array.seal();
    let descriptor = array.own_element_descriptor(0).unwrap();
    assert_eq!(descriptor.writable, Some(true));
    assert_eq!(descriptor.configurable, Some(false));

    array.freeze();
    let descriptor = array.own_element_descriptor(0).unwrap();
    assert_eq!(descriptor.writable, Some(false));
    assert_eq!(descriptor.configurable, Some(false));
}

#[test]
fn holes_do_not_outlive_pop() {
    let mut array = int_array(&[1, 2, 3]);
    array.delete(2, false).unwrap();
    assert_eq!(array.pop().unwrap(), Value::Undefined);
    assert_eq!(array.length(), 2);
    assert_eq!(array.pop().unwrap(), Value::from(2));
}

#[cfg(feature = "byte-view")]
mod byte_view {
    use super::*;

    #[test]
    fn bounded_get_and_set() {
        let mut array = Array::from_byte_buffer(vec![0u8; 4]);
        assert_eq!(array.length(), 4);
        array.set_int(0, 200, false).unwrap();
        array.set_int(1, 300, false).unwrap();
        array.set_double(2, 3.7, false).unwrap();
        assert_eq!(array.get_int(0), 200);
        // Stores wrap to a byte, like any narrowing integer store.
        assert_eq!(array.get_int(1), 44);
        assert_eq!(array.get_int(2), 3);
        assert_eq!(array.get(3), Value::from(0));
        assert!(array.has(3));
        assert!(!array.has(4));
    }

    #[test]
    #[should_panic(expected = "byte view")]
    fn growth_is_fatal() {
        let mut array = Array::from_byte_buffer(vec![0u8; 4]);
        let _ = array.set_int(10, 1, false);
    }

    #[test]
    #[should_panic(expected = "byte view")]
    fn push_is_fatal() {
        let mut array = Array::from_byte_buffer(vec![0u8; 4]);
        let _ = array.push(&[Value::from(1)]);
    }

    #[test]
    #[should_panic(expected = "byte view")]
    fn non_numeric_store_is_fatal() {
        let mut array = Array::from_byte_buffer(vec![0u8; 4]);
        let _ = array.set(0, Value::from("x"), false);
    }
}
