//! Property tests checking `GrowableArray` against `Vec` as a model.

use growarr_common::{collections::GrowableArray, growarr};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Push(i32),
    Pop,
    Insert(usize, i32),
    Erase(usize),
    Resize(usize),
    Reserve(usize),
    Truncate(usize),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::Push),
        1 => Just(Op::Pop),
        2 => (any::<usize>(), any::<i32>()).prop_map(|(idx, val)| Op::Insert(idx, val)),
        1 => any::<usize>().prop_map(Op::Erase),
        1 => (0usize..64).prop_map(Op::Resize),
        1 => (0usize..64).prop_map(Op::Reserve),
        1 => (0usize..32).prop_map(Op::Truncate),
        1 => Just(Op::Clear),
    ]
}

/// Apply `op` to both containers, wrapping indices into the valid range
fn apply(arr: &mut GrowableArray<i32>, model: &mut Vec<i32>, op: &Op) {
    match *op {
        Op::Push(val) => {
            arr.push(val);
            model.push(val);
        },
        Op::Pop => {
            assert_eq!(arr.pop(), model.pop());
        },
        Op::Insert(idx, val) => {
            let idx = idx % (model.len() + 1);
            assert_eq!(arr.insert(idx, val), idx);
            model.insert(idx, val);
        },
        Op::Erase(idx) => {
            if !model.is_empty() {
                let idx = idx % model.len();
                assert_eq!(arr.erase(idx), idx);
                model.remove(idx);
            }
        },
        Op::Resize(len) => {
            arr.resize(len);
            model.resize(len, 0);
        },
        Op::Reserve(cap) => {
            let old_cap = arr.capacity();
            arr.reserve(cap);
            assert_eq!(arr.capacity(), old_cap.max(cap));
        },
        Op::Truncate(len) => {
            arr.truncate(len);
            model.truncate(len);
        },
        Op::Clear => {
            let old_cap = arr.capacity();
            arr.clear();
            model.clear();
            assert_eq!(arr.capacity(), old_cap);
        },
    }
}

proptest! {
    #[test]
    fn behaves_like_vec(ops in prop::collection::vec(op_strategy(), 0..128)) {
        let mut arr = GrowableArray::new();
        let mut model = Vec::new();

        for op in &ops {
            apply(&mut arr, &mut model, op);
            prop_assert!(arr.len() <= arr.capacity());
            prop_assert_eq!(arr.as_slice(), model.as_slice());
        }
    }

    #[test]
    fn push_then_index(values in prop::collection::vec(any::<u64>(), 0..200)) {
        let mut arr = GrowableArray::new();
        for &v in &values {
            arr.push(v);
        }
        prop_assert_eq!(arr.len(), values.len());
        for (i, v) in values.iter().enumerate() {
            prop_assert_eq!(&arr[i], v);
        }
    }

    #[test]
    fn push_capacities_are_powers_of_two(count in 1usize..300) {
        let mut arr = GrowableArray::<u8>::new();
        for i in 0..count {
            arr.push(i as u8);
            prop_assert!(arr.capacity().is_power_of_two());
            prop_assert!(arr.capacity() < 2 * arr.len());
        }
    }

    #[test]
    fn literal_roundtrip(values in prop::collection::vec(any::<i16>(), 0..64)) {
        let arr = GrowableArray::from(values.as_slice());
        prop_assert_eq!(arr.capacity(), values.len());
        prop_assert_eq!(arr.into_iter().collect::<Vec<_>>(), values);
    }

    #[test]
    fn insert_then_erase_restores(values in prop::collection::vec(any::<i32>(), 0..64), pos in any::<usize>(), val in any::<i32>()) {
        let original = GrowableArray::from(values.as_slice());
        let mut arr = original.clone();
        let pos = pos % (values.len() + 1);
        let index = arr.insert(pos, val);
        arr.erase(index);
        prop_assert_eq!(arr, original);
    }

    #[test]
    fn checked_access(values in prop::collection::vec(any::<i32>(), 1..64)) {
        let arr = GrowableArray::from(values.as_slice());
        prop_assert!(arr.at(arr.len()).is_err());
        prop_assert_eq!(arr.at(arr.len() - 1), Ok(values.last().unwrap()));
    }

    #[test]
    fn reserve_never_shrinks(first in 0usize..1024, second in 0usize..1024) {
        let mut arr = GrowableArray::<u32>::new();
        arr.reserve(first);
        arr.reserve(second);
        prop_assert_eq!(arr.capacity(), first.max(second));
    }

    #[test]
    fn ordering_matches_slices(a in prop::collection::vec(0u8..4, 0..6), b in prop::collection::vec(0u8..4, 0..6)) {
        let ga = GrowableArray::from(a.as_slice());
        let gb = GrowableArray::from(b.as_slice());
        prop_assert_eq!(ga == gb, a == b);
        prop_assert_eq!(ga < gb, a < b);
        prop_assert_eq!(ga <= gb, a <= b);
        prop_assert_eq!(ga > gb, a > b);
        prop_assert_eq!(ga >= gb, a >= b);
    }
}

#[test]
fn take_leaves_source_empty() {
    let mut a = growarr![1, 2, 3];
    let b = a.take();
    assert_eq!((a.len(), a.capacity()), (0, 0));
    assert_eq!(b, [1, 2, 3]);
}
