// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use criterion::{Criterion, criterion_group, criterion_main};
use vesper_vm::ecmascript::builtins::Array;
use vesper_vm::ecmascript::types::Value;

fn bench_array_storage(c: &mut Criterion) {
    c.bench_function("dense int push x1000", |b| {
        b.iter(|| {
            let mut array = Array::new();
            for i in 0..1000 {
                array.push(&[Value::from(i)]).unwrap();
            }
            array
        })
    });

    c.bench_function("widen int to object mid-stream", |b| {
        b.iter(|| {
            let mut array = Array::new();
            for i in 0..500 {
                array.push(&[Value::from(i)]).unwrap();
            }
            array.set(250, Value::from("boxed"), false).unwrap();
            for i in 500..1000 {
                array.push(&[Value::from(i)]).unwrap();
            }
            array
        })
    });

    c.bench_function("sparse far writes", |b| {
        b.iter(|| {
            let mut array = Array::new();
            for i in 0..100u32 {
                array
                    .set(600_000 + i * 1000, Value::from(i), false)
                    .unwrap();
            }
            array
        })
    });

    c.bench_function("hole skip iteration", |b| {
        let mut array = Array::new();
        for i in 0..1000 {
            array.push(&[Value::from(i)]).unwrap();
        }
        for i in (0..1000u32).step_by(2) {
            array.delete(i, false).unwrap();
        }
        b.iter(|| {
            let mut count = 0;
            let mut next = array.next_index(0);
            while let Some(index) = next {
                count += 1;
                next = array.next_index(index + 1);
            }
            count
        })
    });
}

criterion_group!(benches, bench_array_storage);
criterion_main!(benches);
