use super::*;

#[test]
fn test_intern_is_idempotent() {
    let interner = StringInterner::new();
    let a = interner.intern("close");
    let b = interner.intern("close");
    assert_eq!(a, b);
    assert_eq!(interner.lookup(a), "close");
}

#[test]
fn test_empty_is_preinterned() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert!(interner.is_empty());
}

#[test]
fn test_get_does_not_insert() {
    let interner = StringInterner::new();
    assert_eq!(interner.get("Cursor"), None);
    let name = interner.intern("Cursor");
    assert_eq!(interner.get("Cursor"), Some(name));
    assert_eq!(interner.len(), 2);
}

#[test]
fn test_shared_across_threads() {
    let interner = StringInterner::shared();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let interner = Arc::clone(&interner);
            std::thread::spawn(move || interner.intern("recycle"))
        })
        .collect();
    let names: Vec<Name> = handles
        .into_iter()
        .map(|h| h.join().unwrap_or(Name::EMPTY))
        .collect();
    assert!(names.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(interner.lookup(names[0]), "recycle");
}
