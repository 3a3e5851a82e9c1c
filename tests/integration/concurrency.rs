//! Concurrent derivations share only immutable trait entries

use rayon::prelude::*;

use class_traits::demo::QueueTraits;
use class_traits::is_derived;
use class_traits::runtime::value::Value;

#[test]
fn test_parallel_derivations_are_independent() {
    let traits = QueueTraits::declare();

    let results: Vec<Value> = (0..64i64)
        .into_par_iter()
        .map(|i| {
            let q = traits.compose().unwrap().instantiate(&[]).unwrap();
            q.call("put", &[Value::Int(i)]).unwrap();
            q.call("get", &[]).unwrap()
        })
        .collect();

    for (i, v) in results.iter().enumerate() {
        assert_eq!(*v, Value::Int(i as i64 * 2 + 1));
    }
}

#[test]
fn test_instance_shared_across_threads() {
    let traits = QueueTraits::declare();
    let q = traits.compose().unwrap().instantiate(&[]).unwrap();

    (0..16i64).into_par_iter().for_each(|i| {
        q.call("put", &[Value::Int(i)]).unwrap();
    });

    let mut drained = Vec::new();
    loop {
        match q.call("get", &[]).unwrap() {
            Value::Undefined => break,
            v => drained.push(v.expect_int().unwrap()),
        }
    }
    drained.sort();
    let expected: Vec<i64> = (0..16).map(|i| i * 2 + 1).collect();
    assert_eq!(drained, expected);
    assert!(is_derived(&Value::from(q), &traits.base));
}
