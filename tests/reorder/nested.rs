//! Nested scopes: the ordered list is an array field of a parent document.

use filter_cms::catalog::{append_option, remove_option, PromptCategory, PromptOption};
use filter_cms::{
    append, is_contiguous, DocumentStore, DragEnd, DragOutcome, InMemoryDocumentStore,
    NestedScope, ReorderSession, Skip,
};

fn lighting(store: &InMemoryDocumentStore) {
    append(store, PromptCategory::new("lighting", "Lighting"), None).unwrap();
    append(store, PromptCategory::new("mood", "Mood"), None).unwrap();
    for (id, label) in [("soft", "Soft"), ("neon", "Neon"), ("golden", "Golden hour")] {
        let option = PromptOption::new(id, label, label.to_lowercase());
        append_option(store, "lighting", option, None).unwrap();
    }
}

fn stored(store: &InMemoryDocumentStore, id: &str) -> PromptCategory {
    store
        .get_document::<PromptCategory>(id)
        .unwrap()
        .unwrap()
        .data
}

#[test]
fn options_get_creation_order() {
    let store = InMemoryDocumentStore::new();
    lighting(&store);

    let orders: Vec<(String, u32)> = stored(&store, "lighting")
        .sorted_options()
        .into_iter()
        .map(|option| (option.id, option.order))
        .collect();
    assert_eq!(
        orders,
        vec![
            ("soft".to_string(), 0),
            ("neon".to_string(), 1),
            ("golden".to_string(), 2)
        ]
    );
}

#[test]
fn nested_reorder_is_one_write() {
    let store = InMemoryDocumentStore::new();
    lighting(&store);
    let mut session =
        ReorderSession::<_, NestedScope<PromptCategory>>::nested(&store, "lighting").unwrap();
    assert_eq!(session.view().ids(), vec!["soft", "neon", "golden"]);
    let before = store.sequence().unwrap();

    let outcome = session.drag_end(&DragEnd::new("golden", "soft"));

    assert!(outcome.is_committed());
    assert_eq!(store.sequence().unwrap(), before + 1);

    let category = stored(&store, "lighting");
    let ids: Vec<&str> = category.options.iter().map(|option| option.id.as_str()).collect();
    assert_eq!(ids, vec!["golden", "soft", "neon"]);
    assert!(is_contiguous(&category.options));
}

#[test]
fn nested_reorder_preserves_parent_fields() {
    let store = InMemoryDocumentStore::new();
    lighting(&store);
    let mut session =
        ReorderSession::<_, NestedScope<PromptCategory>>::nested(&store, "lighting").unwrap();

    session.drag_end(&DragEnd::new("soft", "neon"));

    let category = stored(&store, "lighting");
    assert_eq!(category.name, "Lighting");
    assert_eq!(category.order, 0);
    assert_eq!(category.compose(&["soft", "neon"]), "neon, soft");
}

#[test]
fn nested_echo_replaces_optimistic_view() {
    let store = InMemoryDocumentStore::new();
    lighting(&store);
    let mut session =
        ReorderSession::<_, NestedScope<PromptCategory>>::nested(&store, "lighting").unwrap();

    session.drag_end(&DragEnd::new("soft", "golden"));
    assert!(session.view().is_optimistic());

    assert!(session.pump().unwrap());
    assert!(!session.view().is_optimistic());
    assert_eq!(session.view().ids(), vec!["neon", "golden", "soft"]);
    let orders: Vec<u32> = session.view().records().iter().map(|o| o.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[test]
fn sibling_category_snapshot_leaves_view_alone() {
    let store = InMemoryDocumentStore::new();
    lighting(&store);
    let mut session =
        ReorderSession::<_, NestedScope<PromptCategory>>::nested(&store, "lighting").unwrap();

    append_option(&store, "mood", PromptOption::new("calm", "Calm", "calm"), None).unwrap();

    assert!(session.pump().unwrap());
    assert_eq!(session.view().ids(), vec!["soft", "neon", "golden"]);
}

#[test]
fn removed_option_leaves_a_gap_until_reorder() {
    let store = InMemoryDocumentStore::new();
    lighting(&store);
    assert!(remove_option(&store, "lighting", "soft").unwrap());
    assert!(!is_contiguous(&stored(&store, "lighting").options));

    let mut session =
        ReorderSession::<_, NestedScope<PromptCategory>>::nested(&store, "lighting").unwrap();
    session.drag_end(&DragEnd::new("golden", "neon"));

    let category = stored(&store, "lighting");
    assert!(is_contiguous(&category.options));
    assert_eq!(category.option("golden").map(|o| o.order), Some(0));
    assert_eq!(category.option("neon").map(|o| o.order), Some(1));
}

#[test]
fn missing_parent_has_nothing_to_move() {
    let store = InMemoryDocumentStore::new();
    let mut session =
        ReorderSession::<_, NestedScope<PromptCategory>>::nested(&store, "ghost").unwrap();

    assert!(session.view().is_empty());
    assert_eq!(
        session.drag_end(&DragEnd::new("a", "b")),
        DragOutcome::Skipped { reason: Skip::Unresolved }
    );
    assert_eq!(store.sequence().unwrap(), 0);
}
