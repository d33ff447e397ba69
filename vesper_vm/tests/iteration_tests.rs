// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::RefCell;
use std::rc::Rc;

use vesper_vm::ecmascript::builtins::{Array, ArrayLikeIterator, IteratorAction};
use vesper_vm::ecmascript::execution::{Agent, ExceptionType};
use vesper_vm::ecmascript::types::{ArrayLikeObject, JsFunction, Value};

fn int_array_value(values: &[i32]) -> Value {
    Value::from_array(values.iter().map(|&value| Value::from(value)).collect())
}

#[test]
fn forward_cursor_skips_holes_by_default() {
    let mut array: Array = [1, 2, 3].iter().map(|&v| Value::from(v)).collect();
    array.delete(1, false).unwrap();
    let source = Value::from_array(array);

    let visited: Vec<(u32, Value)> =
        ArrayLikeIterator::array_like_iterator(&source, false).collect();
    assert_eq!(visited, vec![(0, Value::from(1)), (2, Value::from(3))]);
}

#[test]
fn forward_cursor_can_surface_holes_as_undefined() {
    let mut array: Array = [1, 2, 3].iter().map(|&v| Value::from(v)).collect();
    array.delete(1, false).unwrap();
    let source = Value::from_array(array);

    let visited: Vec<(u32, Value)> = ArrayLikeIterator::array_like_iterator(&source, true).collect();
    assert_eq!(visited.len(), 3);
    assert_eq!(visited[1], (1, Value::Undefined));
}

#[test]
fn reverse_cursor_counts_down() {
    let mut array: Array = [1, 2, 3].iter().map(|&v| Value::from(v)).collect();
    array.delete(1, false).unwrap();
    let source = Value::from_array(array);

    let visited: Vec<u32> = ArrayLikeIterator::reverse_array_like_iterator(&source, false)
        .map(|(index, _)| index)
        .collect();
    assert_eq!(visited, vec![2, 0]);
}

#[test]
fn host_list_and_host_array_sources() {
    let list = Value::from_list(vec![Value::from(1), Value::from(2)]);
    let visited: Vec<Value> = ArrayLikeIterator::array_like_iterator(&list, false)
        .map(|(_, value)| value)
        .collect();
    assert_eq!(visited, vec![Value::from(1), Value::from(2)]);

    let host = Value::from_host_array(vec![Value::from("a"), Value::from("b")]);
    let visited: Vec<Value> = ArrayLikeIterator::array_like_iterator(&host, false)
        .map(|(_, value)| value)
        .collect();
    assert_eq!(visited, vec![Value::from("a"), Value::from("b")]);
}

#[test]
fn non_array_like_source_yields_the_empty_cursor() {
    let visited: Vec<(u32, Value)> =
        ArrayLikeIterator::array_like_iterator(&Value::from(42), false).collect();
    assert!(visited.is_empty());
}

struct Evens;

impl ArrayLikeObject for Evens {
    fn length(&self) -> u32 {
        4
    }

    fn get(&self, index: u32) -> Value {
        Value::from(index * 2)
    }
}

#[test]
fn foreign_objects_iterate_through_their_contract() {
    let source = Value::from_array_like(Evens);
    let visited: Vec<Value> = ArrayLikeIterator::array_like_iterator(&source, false)
        .map(|(_, value)| value)
        .collect();
    assert_eq!(
        visited,
        vec![Value::from(0u32), Value::from(2u32), Value::from(4u32), Value::from(6u32)]
    );
}

#[test]
fn driver_invokes_callback_with_value_and_index() {
    let mut agent = Agent::new();
    let source = int_array_value(&[10, 20, 30]);

    let log = Rc::new(RefCell::new(Vec::new()));
    let callback_log = log.clone();
    let callback = Value::Function(JsFunction::new("logger", true, move |_agent, _this, args| {
        callback_log
            .borrow_mut()
            .push((args[1].clone(), args[0].clone()));
        Ok(Value::Undefined)
    }));

    let mut action =
        IteratorAction::new(&mut agent, &source, callback, Value::Undefined, false).unwrap();
    action.apply(&mut agent, |_, _, _, _| Ok(true)).unwrap();

    let log = log.borrow();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0], (Value::from(0u32), Value::from(10)));
    assert_eq!(log[2], (Value::from(2u32), Value::from(30)));
}

#[test]
fn non_callable_callback_is_a_type_error_naming_the_value() {
    let mut agent = Agent::new();
    let source = int_array_value(&[1]);

    let error =
        IteratorAction::new(&mut agent, &source, Value::from(42), Value::Undefined, false)
            .unwrap_err();
    assert_eq!(error.kind(), ExceptionType::TypeError);
    assert_eq!(error.message(), "42 is not a function");
}

#[test]
fn non_strict_callback_gets_the_global_receiver() {
    let mut agent = Agent::new();
    agent.set_global_this(Value::from("the global"));
    let source = int_array_value(&[1]);

    let seen = Rc::new(RefCell::new(Vec::new()));

    let seen_non_strict = seen.clone();
    let callback = Value::Function(JsFunction::new("sloppy", false, move |_agent, this, _args| {
        seen_non_strict.borrow_mut().push(this);
        Ok(Value::Undefined)
    }));
    let mut action =
        IteratorAction::new(&mut agent, &source, callback, Value::Undefined, false).unwrap();
    action.apply(&mut agent, |_, _, _, _| Ok(true)).unwrap();

    let seen_strict = seen.clone();
    let callback = Value::Function(JsFunction::new("strict", true, move |_agent, this, _args| {
        seen_strict.borrow_mut().push(this);
        Ok(Value::Undefined)
    }));
    let mut action =
        IteratorAction::new(&mut agent, &source, callback, Value::Undefined, false).unwrap();
    action.apply(&mut agent, |_, _, _, _| Ok(true)).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen[0], Value::from("the global"));
    assert_eq!(seen[1], Value::Undefined);
}

#[test]
fn search_style_actions_short_circuit() {
    let mut agent = Agent::new();
    let source = int_array_value(&[10, 20, 30, 40]);

    let calls = Rc::new(RefCell::new(0));
    let callback_calls = calls.clone();
    let callback = Value::Function(JsFunction::new("matcher", true, move |_agent, _this, args| {
        *callback_calls.borrow_mut() += 1;
        Ok(Value::Boolean(args[0] == Value::from(20)))
    }));

    let mut found = None;
    let mut action =
        IteratorAction::new(&mut agent, &source, callback, Value::Undefined, false).unwrap();
    action
        .apply(&mut agent, |_, _, index, result| {
            if result == Value::Boolean(true) {
                found = Some(index);
                Ok(false)
            } else {
                Ok(true)
            }
        })
        .unwrap();

    assert_eq!(found, Some(1));
    assert_eq!(*calls.borrow(), 2);
}

#[test]
fn callback_errors_propagate() {
    let mut agent = Agent::new();
    let source = int_array_value(&[1, 2]);

    let callback = Value::Function(JsFunction::new("thrower", true, |agent, _this, _args| {
        Err(agent.throw_exception_with_static_message(ExceptionType::RangeError, "boom"))
    }));
    let mut action =
        IteratorAction::new(&mut agent, &source, callback, Value::Undefined, false).unwrap();
    let error = action.apply(&mut agent, |_, _, _, _| Ok(true)).unwrap_err();
    assert_eq!(error.kind(), ExceptionType::RangeError);
    assert_eq!(error.message(), "boom");
}

#[test]
fn callback_truncating_the_array_is_visible_to_the_cursor() {
    let array: Array = [1, 2, 3, 4].iter().map(|&v| Value::from(v)).collect();
    let shared = Rc::new(RefCell::new(array));
    let source = Value::Array(shared.clone());
    let mut agent = Agent::new();

    let callback_array = shared.clone();
    let callback = Value::Function(JsFunction::new("truncator", true, move |_agent, _this, args| {
        if args[1] == Value::from(0u32) {
            callback_array.borrow_mut().set_length(2).unwrap();
        }
        Ok(Value::Undefined)
    }));

    let visited = Rc::new(RefCell::new(Vec::new()));
    let visited_log = visited.clone();
    let mut action =
        IteratorAction::new(&mut agent, &source, callback, Value::Undefined, false).unwrap();
    action
        .apply(&mut agent, move |_, _, index, _| {
            visited_log.borrow_mut().push(index);
            Ok(true)
        })
        .unwrap();

    assert_eq!(*visited.borrow(), vec![0, 1]);
    assert_eq!(shared.borrow().length(), 2);
}

#[test]
fn callback_growing_the_array_is_visible_to_the_cursor() {
    let array: Array = [1, 2].iter().map(|&v| Value::from(v)).collect();
    let shared = Rc::new(RefCell::new(array));
    let source = Value::Array(shared.clone());
    let mut agent = Agent::new();

    let callback_array = shared.clone();
    let callback = Value::Function(JsFunction::new("grower", true, move |_agent, _this, args| {
        if args[1] == Value::from(0u32) {
            callback_array.borrow_mut().push(&[Value::from(9)]).unwrap();
        }
        Ok(Value::Undefined)
    }));

    let visited = Rc::new(RefCell::new(Vec::new()));
    let visited_log = visited.clone();
    let mut action =
        IteratorAction::new(&mut agent, &source, callback, Value::Undefined, false).unwrap();
    action
        .apply(&mut agent, move |_, value, index, _| {
            visited_log.borrow_mut().push((index, value.clone()));
            Ok(true)
        })
        .unwrap();

    assert_eq!(
        *visited.borrow(),
        vec![
            (0, Value::from(1)),
            (1, Value::from(2)),
            (2, Value::from(9)),
        ]
    );
}

#[test]
fn callback_widening_the_array_is_visible_to_the_cursor() {
    let array: Array = [1, 2].iter().map(|&v| Value::from(v)).collect();
    let shared = Rc::new(RefCell::new(array));
    let source = Value::Array(shared.clone());
    let mut agent = Agent::new();

    let callback_array = shared.clone();
    let callback = Value::Function(JsFunction::new("widener", true, move |_agent, _this, args| {
        if args[1] == Value::from(0u32) {
            // Force a representation change under the live cursor.
            callback_array
                .borrow_mut()
                .set(1, Value::from("swapped"), false)
                .unwrap();
        }
        Ok(Value::Undefined)
    }));

    let visited = Rc::new(RefCell::new(Vec::new()));
    let visited_log = visited.clone();
    let mut action =
        IteratorAction::new(&mut agent, &source, callback, Value::Undefined, false).unwrap();
    action
        .apply(&mut agent, move |_, value, index, _| {
            visited_log.borrow_mut().push((index, value.clone()));
            Ok(true)
        })
        .unwrap();

    assert_eq!(
        *visited.borrow(),
        vec![(0, Value::from(1)), (1, Value::from("swapped"))]
    );
}
