//! Properties of the reorder engine over arbitrary (possibly gapped or
//! duplicated) order values.

use std::collections::HashMap;

use filter_cms::reorder::plan;
use filter_cms::{
    is_contiguous, sort_by_order, DocumentStore, DragEnd, DragOutcome, FlatScope,
    InMemoryDocumentStore, ReorderSession, Skip,
};
use proptest::prelude::*;

use crate::support::{stored_orders, Card};

fn arb_sequence() -> impl Strategy<Value = (Vec<Card>, usize, usize)> {
    (1usize..16).prop_flat_map(|len| {
        (
            prop::collection::vec(0u32..40, len),
            0..len,
            0..len,
        )
            .prop_map(|(orders, from, to)| {
                let mut cards: Vec<Card> = orders
                    .into_iter()
                    .enumerate()
                    .map(|(index, order)| Card {
                        id: format!("card-{index:02}"),
                        title: String::new(),
                        order,
                    })
                    .collect();
                sort_by_order(&mut cards);
                (cards, from, to)
            })
    })
}

fn ids(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|card| card.id.as_str()).collect()
}

proptest! {
    #[test]
    fn moved_record_lands_on_target((cards, from, to) in arb_sequence()) {
        let drag = DragEnd::new(cards[from].id.clone(), cards[to].id.clone());

        match plan(&cards, &drag) {
            Ok(planned) => {
                prop_assert_ne!(from, to);
                prop_assert_eq!(&planned.reordered[to].id, &cards[from].id);
            }
            Err(reason) => {
                prop_assert_eq!(from, to);
                prop_assert_eq!(reason, Skip::SameTarget);
            }
        }
    }

    #[test]
    fn other_records_keep_relative_order((cards, from, to) in arb_sequence()) {
        prop_assume!(from != to);
        let moved = cards[from].id.clone();
        let drag = DragEnd::new(moved.clone(), cards[to].id.clone());
        let planned = plan(&cards, &drag).unwrap();

        let before: Vec<&str> = ids(&cards).into_iter().filter(|id| *id != moved).collect();
        let after: Vec<&str> = ids(&planned.reordered).into_iter().filter(|id| *id != moved).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn orders_are_exactly_positions((cards, from, to) in arb_sequence()) {
        prop_assume!(from != to);
        let drag = DragEnd::new(cards[from].id.clone(), cards[to].id.clone());
        let planned = plan(&cards, &drag).unwrap();

        prop_assert_eq!(planned.reordered.len(), cards.len());
        prop_assert!(is_contiguous(&planned.reordered));
    }

    #[test]
    fn changes_are_exactly_the_moved_values((cards, from, to) in arb_sequence()) {
        prop_assume!(from != to);
        let drag = DragEnd::new(cards[from].id.clone(), cards[to].id.clone());
        let planned = plan(&cards, &drag).unwrap();

        let original: HashMap<&str, u32> =
            cards.iter().map(|card| (card.id.as_str(), card.order)).collect();
        let expected: Vec<(String, u32)> = planned
            .reordered
            .iter()
            .filter(|card| original[card.id.as_str()] != card.order)
            .map(|card| (card.id.clone(), card.order))
            .collect();
        let actual: Vec<(String, u32)> = planned
            .changes
            .iter()
            .map(|change| (change.id.clone(), change.order))
            .collect();
        prop_assert_eq!(actual, expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn persisted_reorder_matches_the_view((cards, from, to) in arb_sequence()) {
        prop_assume!(from != to);
        let store = InMemoryDocumentStore::new();
        for card in &cards {
            store.save_document(card).unwrap();
        }
        let mut session = ReorderSession::<_, FlatScope<Card>>::flat(&store).unwrap();
        let drag = DragEnd::new(cards[from].id.clone(), cards[to].id.clone());

        let outcome = session.drag_end(&drag);
        let persisted = matches!(outcome, DragOutcome::Committed { .. } | DragOutcome::Unchanged);
        prop_assert!(persisted, "unexpected outcome {:?}", outcome);

        session.pump().unwrap();
        let stored: Vec<String> = stored_orders(&store).into_iter().map(|(id, _)| id).collect();
        let shown: Vec<String> = session.view().ids().into_iter().map(str::to_string).collect();
        prop_assert_eq!(stored, shown);
        prop_assert!(is_contiguous(session.view().records()));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn drags_without_echo_stay_contiguous(
        (cards, _, _) in arb_sequence(),
        moves in prop::collection::vec((0usize..16, 0usize..16), 1..6),
    ) {
        let store = InMemoryDocumentStore::new();
        for card in &cards {
            store.save_document(card).unwrap();
        }
        let mut session = ReorderSession::<_, FlatScope<Card>>::flat(&store).unwrap();

        let mut committed = false;
        for (from, to) in moves {
            let (from, to) = (from % cards.len(), to % cards.len());
            let drag = DragEnd::new(
                session.view().records()[from].id.clone(),
                session.view().records()[to].id.clone(),
            );
            committed |= session.drag_end(&drag).is_committed();
        }
        prop_assume!(committed);

        let shown: Vec<String> = session.view().ids().into_iter().map(str::to_string).collect();
        let stored: Vec<String> = stored_orders(&store).into_iter().map(|(id, _)| id).collect();
        prop_assert_eq!(&stored, &shown);
        let orders: Vec<u32> = stored_orders(&store).into_iter().map(|(_, order)| order).collect();
        prop_assert_eq!(orders, (0..cards.len() as u32).collect::<Vec<_>>());
    }
}
