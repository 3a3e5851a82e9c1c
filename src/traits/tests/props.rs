//! Property tests for linearization and identity

use proptest::prelude::*;

use super::returning;
use crate::traits::{crc32, derive, linearize, tag, Trait, TraitRef};

/// A small family of traits where trait `i` may require any trait `j < i`
fn family(edges: &[Vec<usize>]) -> Vec<Trait> {
    let mut traits: Vec<Trait> = Vec::new();
    for (i, deps) in edges.iter().enumerate() {
        let supers: Vec<TraitRef> = deps
            .iter()
            .filter(|&&j| j < i)
            .map(|&j| TraitRef::from(&traits[j]))
            .collect();
        let source = format!("family:{}", i);
        let t = crate::traits::declare_trait_with(supers, &source, move |base| {
            crate::runtime::class::ClassBuilder::extend(base, format!("T{}", i)).build()
        });
        traits.push(t);
    }
    traits
}

fn edges_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0usize..8, 0..4), 1..8)
}

proptest! {
    /// No identifier appears twice in a linearization
    #[test]
    fn prop_linearization_has_no_duplicates(
        edges in edges_strategy(),
        picks in prop::collection::vec(0usize..8, 0..10),
    ) {
        let traits = family(&edges);
        let listed: Vec<&Trait> = picks.iter().map(|&p| &traits[p % traits.len()]).collect();
        let order = linearize(listed.iter().copied()).unwrap();

        let mut ids: Vec<_> = order.iter().map(|t| t.id()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
    }

    /// Every supertrait is placed before the trait requiring it
    #[test]
    fn prop_supertraits_precede_dependents(
        edges in edges_strategy(),
        picks in prop::collection::vec(0usize..8, 1..10),
    ) {
        let traits = family(&edges);
        let listed: Vec<&Trait> = picks.iter().map(|&p| &traits[p % traits.len()]).collect();
        let order = linearize(listed.iter().copied()).unwrap();
        let position = |id| order.iter().position(|t| t.id() == id);

        for t in &order {
            let at = position(t.id()).unwrap();
            for s in t.supertraits() {
                let s_at = position(s.resolve().id());
                prop_assert!(s_at.is_some());
                prop_assert!(s_at.unwrap() < at);
            }
        }
    }

    /// Listing a trait twice changes nothing
    #[test]
    fn prop_repeat_is_idempotent(
        edges in edges_strategy(),
        pick in 0usize..8,
    ) {
        let traits = family(&edges);
        let t = &traits[pick % traits.len()];
        let once = derive([t]).unwrap();
        let twice = derive([t, t]).unwrap();
        prop_assert_eq!(once.depth(), twice.depth());
    }

    /// Every listed trait is a member of the derived class
    #[test]
    fn prop_listed_traits_are_members(
        values in prop::collection::vec(0i64..50, 0..6),
    ) {
        let traits: Vec<Trait> = values.iter().map(|&v| returning("m", v)).collect();
        let class = derive(&traits).unwrap();
        for t in &traits {
            prop_assert!(class.has_trait(t));
        }
    }
}

#[cfg(test)]
mod quickcheck_tests {
    use super::*;
    use crate::traits::TraitId;
    use quickcheck::{quickcheck, TestResult};

    #[test]
    fn quickcheck_tag_is_crc_of_text() {
        fn prop(text: String) -> bool {
            tag(&text) == TraitId(crc32(&text))
        }
        quickcheck(prop as fn(String) -> bool);
    }

    #[test]
    fn quickcheck_single_bit_flip_changes_crc() {
        fn prop(text: String) -> TestResult {
            let mut bytes = text.clone().into_bytes();
            match bytes.first_mut() {
                Some(b) if b.is_ascii() => *b ^= 1,
                _ => return TestResult::discard(),
            }
            let flipped = match String::from_utf8(bytes) {
                Ok(s) => s,
                Err(_) => return TestResult::discard(),
            };
            TestResult::from_bool(crc32(&text) != crc32(&flipped))
        }
        quickcheck(prop as fn(String) -> TestResult);
    }
}
