use super::*;

fn place(store: &mut TextStore, content: &str) -> ArborResult<u64> {
    store
        .place(content, Point::new(100.0, 100.0), Rgb8::BLACK, 16.0)
        .map(|t| t.id)
}

#[test]
fn at_most_one_pending_item() {
    let mut store = TextStore::new();
    place(&mut store, "hello").unwrap();
    assert!(place(&mut store, "again").is_err());
    assert_eq!(store.items().len(), 1);
    assert!(store.pending().is_some());
}

#[test]
fn blank_text_is_rejected() {
    let mut store = TextStore::new();
    assert!(place(&mut store, "   ").is_err());
    assert!(store.pending().is_none());
    assert_eq!(store.placements(), 0);
}

#[test]
fn confirm_clears_pending_and_keeps_item() {
    let mut store = TextStore::new();
    place(&mut store, "roots").unwrap();
    let item = store.confirm().unwrap();
    assert!(!item.pending);
    assert!(store.pending().is_none());
    assert_eq!(store.items().len(), 1);
    assert!(!store.items()[0].pending);
    assert!(store.confirm().is_none());
}

#[test]
fn cancel_removes_only_the_pending_item() {
    let mut store = TextStore::new();
    place(&mut store, "kept").unwrap();
    store.confirm().unwrap();
    place(&mut store, "dropped").unwrap();
    let gone = store.cancel().unwrap();
    assert_eq!(gone.content, "dropped");
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.items()[0].content, "kept");
    assert_eq!(store.placements(), 2);
}

#[test]
fn hit_test_and_drag_pending_item() {
    let mut store = TextStore::new();
    place(&mut store, "abcd").unwrap();
    // 4 chars * 16 * 0.6 = 38.4 wide, 20 tall.
    assert!(store.hit_pending(Point::new(110.0, 110.0)));
    assert!(!store.hit_pending(Point::new(150.0, 110.0)));

    assert!(store.move_pending(Vec2::new(5.0, -5.0)));
    assert_eq!(store.pending().unwrap().position, Point::new(105.0, 95.0));

    store.confirm();
    assert!(!store.hit_pending(Point::new(110.0, 100.0)));
    assert!(!store.move_pending(Vec2::new(1.0, 1.0)));
}

#[test]
fn restore_keeps_pending_on_top() {
    let mut store = TextStore::new();
    place(&mut store, "first").unwrap();
    let first = store.confirm().unwrap();
    place(&mut store, "draft").unwrap();

    store.restore(&[]);
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.pending().unwrap().content, "draft");

    store.restore(std::slice::from_ref(&first));
    assert_eq!(store.items().len(), 2);
    assert_eq!(store.items()[0].content, "first");
    assert_eq!(store.pending().unwrap().content, "draft");
}
