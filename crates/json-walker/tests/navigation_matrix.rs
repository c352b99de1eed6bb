use json_walker::{wrap, Node, NodeKind, WalkError};
use json_walker_raw::{Key, Raw};
use serde_json::json;

fn doc() -> Node {
    wrap(json!({
        "store": {
            "books": [
                {"title": "Dune", "tags": ["sf", "classic"]},
                {"title": "Emma", "tags": ["romance"]},
                {"title": "Ubik", "tags": []}
            ],
            "open": true
        },
        "": "empty key"
    }))
}

#[test]
fn get_returns_child_views() {
    let root = doc();
    let store = root.get("store").unwrap().unwrap();
    assert_eq!(store.kind(), NodeKind::Object);
    let books = store.get("books").unwrap().unwrap();
    assert_eq!(books.kind(), NodeKind::Array);
    assert!(books.is_numeric_array());
    let open = store.get("open").unwrap().unwrap();
    assert_eq!(open.kind(), NodeKind::Value);
    assert_eq!(open.raw(), Raw::from(true));
}

#[test]
fn get_missing_is_none() {
    let root = doc();
    assert!(root.get("nope").unwrap().is_none());
    let books = root.find("store/books").unwrap().unwrap();
    assert!(books.get("3").unwrap().is_none());
    assert!(books.get("title").unwrap().is_none());
}

#[test]
fn get_empty_key_is_a_literal_lookup() {
    let root = doc();
    let empty = root.get("").unwrap().unwrap();
    assert_eq!(empty.raw(), Raw::from("empty key"));
}

#[test]
fn pseudo_selectors_on_child() {
    let root = doc();
    let store = root.get("store").unwrap().unwrap();

    let first = store.get("books::first()").unwrap().unwrap();
    assert_eq!(first.get("title").unwrap().unwrap().raw(), Raw::from("Dune"));

    let last = store.get("books::last()").unwrap().unwrap();
    assert_eq!(last.get("title").unwrap().unwrap().raw(), Raw::from("Ubik"));

    let second = store.get("books::nthChild(2)").unwrap().unwrap();
    assert_eq!(second.get("title").unwrap().unwrap().raw(), Raw::from("Emma"));

    let parent = store.get("books::parent()").unwrap().unwrap();
    assert!(Node::ptr_eq(&parent, &store));
}

#[test]
fn pseudo_selectors_on_self() {
    let root = doc();
    let books = root.find("store/books").unwrap().unwrap();
    assert_eq!(
        books.get("::first()").unwrap().unwrap().key(),
        Some(Key::Index(0))
    );
    assert_eq!(
        books.get("::last()").unwrap().unwrap().key(),
        Some(Key::Index(2))
    );
    let store = books.get("::parent()").unwrap().unwrap();
    assert_eq!(store.key(), Some(Key::Name("store".into())));
}

#[test]
fn selector_names_are_case_insensitive() {
    let root = doc();
    let books = root.find("store/books").unwrap().unwrap();
    let a = books.get("::NTHCHILD(1)").unwrap().unwrap();
    let b = books.get("::nthchild(1)").unwrap().unwrap();
    assert_eq!(a.raw(), b.raw());
}

#[test]
fn nth_child_out_of_range() {
    let root = doc();
    let books = root.find("store/books").unwrap().unwrap();
    assert!(books.get("::nthChild(0)").unwrap().is_none());
    assert!(books.get("::nthChild(4)").unwrap().is_none());
    assert!(books.get("::nthChild(-1)").unwrap().is_none());
    assert!(books.nth_child_with(|| 3).unwrap().is_some());
}

#[test]
fn selector_on_leaf_child_is_none() {
    let root = doc();
    let store = root.get("store").unwrap().unwrap();
    assert!(store.get("open::first()").unwrap().is_none());
}

#[test]
fn selector_on_empty_container_is_none() {
    let root = doc();
    let tags = root.find("store/books/2/tags").unwrap().unwrap();
    assert!(tags.get("::first()").unwrap().is_none());
    assert!(tags.get("::last()").unwrap().is_none());
}

#[test]
fn closest_walks_up_by_key() {
    let root = doc();
    let tag = root.find("store/books/0/tags/1").unwrap().unwrap();
    let store = tag.closest("store").unwrap().unwrap();
    assert_eq!(store.key(), Some(Key::Name("store".into())));
    let book = tag.closest("0").unwrap().unwrap();
    assert_eq!(book.get("title").unwrap().unwrap().raw(), Raw::from("Dune"));
    assert!(tag.closest("missing").unwrap().is_none());

    let tags = root.find("store/books/0/tags").unwrap().unwrap();
    let via_selector = tags.get("::closest(books)").unwrap().unwrap();
    assert_eq!(via_selector.count(), 3);
}

#[test]
fn malformed_selectors_are_invalid_paths() {
    let root = doc();
    for key in [
        "store::bogus()",
        "store::first(",
        "store::(x)",
        "store/books::nthChild(two)",
    ] {
        let result = root.find(key);
        assert!(
            matches!(result, Err(WalkError::InvalidPath(_))),
            "expected invalid path for {key}: {result:?}"
        );
    }
}

#[test]
fn plain_double_colon_is_part_of_the_key() {
    let root = wrap(json!({"std::vec": 1}));
    assert_eq!(root.get("std::vec").unwrap().unwrap().raw(), Raw::from(1));
}

#[test]
fn keys_items_and_count() {
    let root = doc();
    let book = root.find("store/books/0").unwrap().unwrap();
    assert_eq!(
        book.keys(),
        vec![Key::Name("title".into()), Key::Name("tags".into())]
    );
    assert_eq!(book.count(), 2);
    assert!(book.has("tags"));
    assert!(!book.has("tags::first()"));

    let items = book.items().unwrap();
    let tags = &items[&Key::Name("tags".into())];
    assert!(Node::ptr_eq(&tags.parent().unwrap(), &book));
}

#[test]
fn paths_and_json_paths() {
    let root = doc();
    let tag = root.find("store/books/1/tags/0").unwrap().unwrap();
    assert_eq!(tag.path(), "store/books/1/tags/0");
    assert_eq!(tag.path_with("."), "store.books.1.tags.0");
    assert_eq!(tag.json_path(), ".store.books[1].tags[0]");
    assert_eq!(root.path(), "");
    assert!(Node::ptr_eq(&tag.root(), &root));
}

#[test]
fn associative_array_navigation() {
    let slots = [
        (Key::Name("x".into()), Raw::from(1)),
        (Key::Index(5), Raw::from(2)),
    ];
    let root = wrap(Raw::Array(slots.into_iter().collect()));
    assert!(root.is_array());
    assert!(!root.is_numeric_array());
    assert_eq!(root.get("x").unwrap().unwrap().raw(), Raw::from(1));
    assert_eq!(root.get("5").unwrap().unwrap().raw(), Raw::from(2));
    assert_eq!(root.get("::nthChild(2)").unwrap().unwrap().key(), Some(Key::Index(5)));
}
