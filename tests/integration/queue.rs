//! Cooperative chaining through the queue composition

use class_traits::demo::{run_queue, QueueTraits};
use class_traits::runtime::value::Value;
use class_traits::traits::{Declarer, IdentityStrategy};
use class_traits::{derive, is_derived, ComposeError};

#[test]
fn test_queue_literal_sequence() {
    let results = run_queue(&Declarer::default(), &[-1, 1, 10]).unwrap();
    assert_eq!(results, vec![Value::Undefined, Value::Int(3), Value::Int(21)]);
}

#[test]
fn test_queue_preserves_fifo_order() {
    let queue = QueueTraits::declare().compose().unwrap();
    let q = queue.instantiate(&[]).unwrap();
    for v in [4, -3, 0, 7] {
        q.call("put", &[Value::Int(v)]).unwrap();
    }

    let drained: Vec<Value> = (0..4).map(|_| q.call("get", &[]).unwrap()).collect();
    assert_eq!(
        drained,
        vec![Value::Int(9), Value::Int(1), Value::Int(15), Value::Undefined]
    );
}

#[test]
fn test_layer_order_changes_arithmetic() {
    let traits = QueueTraits::declare();
    // Increment now sits outside Double: 1 -> 2 -> 4
    let class = derive([&traits.filter, &traits.increment, &traits.double, &traits.base]).unwrap();
    let q = class.instantiate(&[]).unwrap();

    q.call("put", &[Value::Int(1)]).unwrap();
    assert_eq!(q.call("get", &[]).unwrap(), Value::Int(4));
}

#[test]
fn test_queue_without_filter_keeps_negatives() {
    let traits = QueueTraits::declare();
    let class = derive([&traits.double, &traits.base]).unwrap();
    let q = class.instantiate(&[]).unwrap();

    q.call("put", &[Value::Int(-2)]).unwrap();
    assert_eq!(q.call("get", &[]).unwrap(), Value::Int(-4));
}

#[test]
fn test_queue_membership() {
    let traits = QueueTraits::declare();
    let q = Value::from(traits.compose().unwrap().instantiate(&[]).unwrap());
    for t in traits.ordered() {
        assert!(is_derived(&q, t));
    }

    let partial = Value::from(
        derive([&traits.filter, &traits.base])
            .unwrap()
            .instantiate(&[])
            .unwrap(),
    );
    assert!(is_derived(&partial, &traits.base));
    assert!(!is_derived(&partial, &traits.double));
}

#[test]
fn test_fresh_declarations_share_identity() {
    let first = QueueTraits::declare();
    let second = QueueTraits::declare();
    assert_eq!(first.filter.id(), second.filter.id());

    let q = Value::from(first.compose().unwrap().instantiate(&[]).unwrap());
    assert!(is_derived(&q, &second.increment));
}

#[test]
fn test_doubling_past_i64_is_an_error() {
    let result = run_queue(&Declarer::default(), &[i64::MAX]);
    assert!(matches!(result, Err(ComposeError::Overflow { .. })));
}

#[test]
fn test_increment_past_i64_is_an_error() {
    let traits = QueueTraits::declare();
    let q = derive([&traits.increment, &traits.base])
        .unwrap()
        .instantiate(&[])
        .unwrap();

    let err = q.call("put", &[Value::Int(i64::MAX)]).unwrap_err();
    assert_eq!(err.to_string(), "integer overflow in 'Increment.put'");
    // nothing reached the buffer
    assert_eq!(q.call("get", &[]).unwrap(), Value::Undefined);
}

#[test]
fn test_per_declaration_queue_uses_counter_ids() {
    let declarer = Declarer::new(IdentityStrategy::PerDeclaration);
    let first = QueueTraits::declare_with(&declarer);
    let second = QueueTraits::declare_with(&declarer);

    for t in first.ordered() {
        assert!(t.id().0 >= 0x8000_0000);
    }
    assert_ne!(first.filter.id(), second.filter.id());

    let results = run_queue(&declarer, &[-1, 1, 10]).unwrap();
    assert_eq!(results, vec![Value::Undefined, Value::Int(3), Value::Int(21)]);

    let q = Value::from(first.compose().unwrap().instantiate(&[]).unwrap());
    assert!(is_derived(&q, &first.double));
    assert!(!is_derived(&q, &second.double));
}
