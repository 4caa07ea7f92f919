use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tuplecore::memory::{release_objects, ObjectHeap, Pool};
use tuplecore::tuple::{DataType, PoolBackedTuple, Schema, StandaloneTuple, Value};
use tuplecore::{ObjectOwner, TupleError};

fn create_item_schema(allow_inlined: bool) -> Arc<Schema> {
    Schema::builder()
        .column("id", DataType::Integer)
        .column("code", DataType::VarChar(8))
        .nullable_column("description", DataType::VarChar(40))
        .nullable_column("notes", DataType::VarChar(200))
        .allow_inlined_objects(allow_inlined)
        .build_arc()
}

fn random_text(rng: &mut impl Rng, max: usize) -> String {
    let len = rng.gen_range(1..=max);
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

/// Builds a heap-backed row; out-of-line values are copied into the heap.
fn build_row(
    schema: &Arc<Schema>,
    id: i32,
    code: &str,
    description: &str,
    notes: &str,
) -> StandaloneTuple {
    let mut row = StandaloneTuple::new(schema.clone());
    let mut view = row.tuple_mut();
    view.set_value(0, &Value::Integer(id)).unwrap();
    view.set_value_with_copy(1, &Value::from(code), None).unwrap();
    view.set_value_with_copy(2, &Value::from(description), None).unwrap();
    view.set_value_with_copy(3, &Value::from(notes), None).unwrap();
    row
}

#[test]
fn test_copy_then_equal() {
    let mut rng = StdRng::seed_from_u64(5);
    let schema = create_item_schema(true);
    let pool = Pool::new();

    for _ in 0..100 {
        let code = random_text(&mut rng, 8);
        let description = random_text(&mut rng, 40);
        let notes = random_text(&mut rng, 200);
        let mut source = build_row(&schema, rng.gen_range(0..1000), &code, &description, &notes);
        source.tuple_mut().set_dirty(rng.gen());

        let mut dest = PoolBackedTuple::allocate_active(schema.clone(), &pool);
        dest.tuple_mut().copy(&source.tuple()).unwrap();

        assert!(dest.tuple().equals_ignoring_schema(&source.tuple()).unwrap());
        assert_eq!(dest.tuple().is_dirty(), source.tuple().is_dirty());
        // Shallow copy shares the source's objects
        assert_eq!(
            dest.tuple().uninlined_objects().unwrap(),
            source.tuple().uninlined_objects().unwrap()
        );

        source.tuple_mut().free_object_columns().unwrap();
    }
}

#[test]
fn test_copy_across_policies_column_by_column() {
    let uninlined = create_item_schema(false);
    let inlined = create_item_schema(true);
    let mut source = build_row(&uninlined, 1, "abc", "described", "noted");

    // Out-of-line source values can be stored shallowly into either layout
    let mut dest = StandaloneTuple::new(inlined.clone());
    dest.tuple_mut().copy(&source.tuple()).unwrap();
    assert!(dest.tuple().equals_ignoring_schema(&source.tuple()).unwrap());

    // Inlined source values have no object to reference
    let mut back = StandaloneTuple::new(uninlined.clone());
    assert_eq!(
        back.tuple_mut().copy(&dest.tuple()),
        Err(TupleError::UnbackedObject { column: 1 })
    );

    source.tuple_mut().free_object_columns().unwrap();
}

#[test]
fn test_copy_rejects_incompatible_schemas() {
    let schema = create_item_schema(true);
    let other = Schema::builder()
        .column("id", DataType::BigInt)
        .column("code", DataType::VarChar(8))
        .build_arc();

    let source = StandaloneTuple::new(other);
    let mut dest = StandaloneTuple::new(schema);
    assert!(matches!(
        dest.tuple_mut().copy(&source.tuple()),
        Err(TupleError::IncompatibleSchemas(_))
    ));
    assert!(matches!(
        dest.tuple_mut().copy_for_insert(&source.tuple(), None),
        Err(TupleError::IncompatibleSchemas(_))
    ));
}

#[test]
fn test_copy_for_insert_does_not_alias_when_policies_differ() {
    // "description" is out of line in the source and inline in the destination;
    // "notes" is out of line in both
    let source_schema = create_item_schema(false);
    let dest_schema = create_item_schema(true);
    let pool = Pool::new();

    let mut source = build_row(&source_schema, 8, "short", "forty bytes or less", "two hundred");
    let source_notes = source.tuple().value_at(3).unwrap().object_ref().unwrap();
    let source_description = source.tuple().value_at(2).unwrap().object_ref().unwrap();

    let mut dest = PoolBackedTuple::allocate_active(dest_schema, &pool);
    dest.tuple_mut()
        .copy_for_insert(&source.tuple(), Some(&pool))
        .unwrap();

    let dest_notes = dest.tuple().value_at(3).unwrap().object_ref().unwrap();
    assert_ne!(dest_notes, source_notes);
    assert_eq!(dest_notes.owner(), ObjectOwner::Pool(pool.id()));
    assert_eq!(dest.tuple().value_at(2).unwrap().object_ref(), None);

    // Rewriting the source's objects leaves the destination untouched
    let heap = ObjectHeap::global();
    heap.overwrite(source_notes, b"rewritten notes").unwrap();
    heap.overwrite(source_description, b"rewritten").unwrap();
    assert_eq!(dest.tuple().value_at(3).unwrap(), Value::from("two hundred"));
    assert_eq!(
        dest.tuple().value_at(2).unwrap(),
        Value::from("forty bytes or less")
    );
    assert!(!dest.tuple().equals_ignoring_schema(&source.tuple()).unwrap());

    source.tuple_mut().free_object_columns().unwrap();
}

#[test]
fn test_copy_for_insert_same_policy_copies_every_object() {
    let schema = create_item_schema(true);
    let pool = Pool::new();
    let mut source = build_row(&schema, 2, "c", "d", "n");
    source.tuple_mut().set_pending_delete(true);

    let mut dest = PoolBackedTuple::allocate_active(schema.clone(), &pool);
    dest.tuple_mut().copy_for_insert(&source.tuple(), Some(&pool)).unwrap();

    let source_objects = source.tuple().uninlined_objects().unwrap();
    let dest_objects = dest.tuple().uninlined_objects().unwrap();
    assert_eq!(source_objects.len(), dest_objects.len());
    for (s, d) in source_objects.iter().zip(&dest_objects) {
        assert_ne!(s, d);
    }
    assert!(dest.tuple().is_pending_delete());
    assert!(dest.tuple().equals(&source.tuple()).unwrap());

    source.tuple_mut().free_object_columns().unwrap();
    // The destination keeps its own copies
    assert_eq!(dest.tuple().value_at(3).unwrap(), Value::from("n"));
}

#[test]
fn test_copy_for_update_skips_unchanged_objects() {
    let schema = create_item_schema(false);
    let mut stored = StandaloneTuple::new(schema.clone());
    let mut original = build_row(&schema, 1, "code", "desc", "notes");
    stored.tuple_mut().copy_for_insert(&original.tuple(), None).unwrap();

    // An update that only changes the id shares every object with the stored row
    let mut update = StandaloneTuple::new(schema.clone());
    update.tuple_mut().copy(&stored.tuple()).unwrap();
    update.tuple_mut().set_value(0, &Value::Integer(2)).unwrap();

    let before = stored.tuple().uninlined_objects().unwrap();
    for _ in 0..2 {
        let (mut old, mut new) = (Vec::new(), Vec::new());
        stored
            .tuple_mut()
            .copy_for_update(&update.tuple(), &mut old, &mut new)
            .unwrap();
        assert!(old.is_empty());
        assert!(new.is_empty());
    }

    assert_eq!(stored.tuple().value_at(0).unwrap(), Value::Integer(2));
    assert_eq!(stored.tuple().uninlined_objects().unwrap(), before);

    original.tuple_mut().free_object_columns().unwrap();
    stored.tuple_mut().free_object_columns().unwrap();
}

#[test]
fn test_copy_for_update_tracks_changed_objects() {
    let schema = create_item_schema(false);
    let mut stored = StandaloneTuple::new(schema.clone());
    let mut original = build_row(&schema, 1, "code", "desc", "notes");
    stored.tuple_mut().copy_for_insert(&original.tuple(), None).unwrap();

    let mut update = StandaloneTuple::new(schema.clone());
    update.tuple_mut().copy(&stored.tuple()).unwrap();
    update
        .tuple_mut()
        .set_value_with_copy(3, &Value::from("revised notes"), None)
        .unwrap();
    let update_notes = update.tuple().value_at(3).unwrap().object_ref().unwrap();
    let old_notes = stored.tuple().value_at(3).unwrap().object_ref().unwrap();

    let (mut old, mut new) = (Vec::new(), Vec::new());
    stored
        .tuple_mut()
        .copy_for_update(&update.tuple(), &mut old, &mut new)
        .unwrap();

    assert_eq!(old, vec![old_notes]);
    assert_eq!(new.len(), 1);
    assert_ne!(new[0], update_notes);
    assert_eq!(stored.tuple().value_at(3).unwrap().object_ref(), Some(new[0]));
    assert_eq!(new[0].owner(), ObjectOwner::Heap);
    assert_eq!(
        stored.tuple().value_at(3).unwrap(),
        Value::from("revised notes")
    );

    // Commit: the old generation goes away, the new one stays
    assert_eq!(release_objects(&old), 1);
    assert!(stored.tuple().value_at(3).is_ok());

    // The update only owns its notes object; the rest belong to the stored row
    assert_eq!(release_objects(&[update_notes]), 1);
    original.tuple_mut().free_object_columns().unwrap();
    stored.tuple_mut().free_object_columns().unwrap();
}

#[test]
fn test_copy_for_update_with_null_columns() {
    let schema = create_item_schema(false);
    let mut stored = build_row(&schema, 1, "a", "b", "c");
    let mut update = StandaloneTuple::new(schema.clone());
    update.tuple_mut().copy(&stored.tuple()).unwrap();
    update.tuple_mut().set_value(3, &Value::Null).unwrap();

    let notes = stored.tuple().value_at(3).unwrap().object_ref().unwrap();
    let (mut old, mut new) = (Vec::new(), Vec::new());
    stored
        .tuple_mut()
        .copy_for_update(&update.tuple(), &mut old, &mut new)
        .unwrap();

    assert_eq!(old, vec![notes]);
    assert!(new.is_empty());
    assert!(stored.tuple().is_null(3).unwrap());

    release_objects(&old);
    stored.tuple_mut().free_object_columns().unwrap();
}

#[test]
fn test_purged_pool_objects_are_stale() {
    let schema = create_item_schema(true);
    let mut pool = Pool::new();
    let mut source = build_row(&schema, 4, "x", "y", "z");

    let mut copy = StandaloneTuple::new(schema.clone());
    copy.tuple_mut()
        .copy_for_insert(&source.tuple(), Some(&pool))
        .unwrap();
    let notes = copy.tuple().value_at(3).unwrap().object_ref().unwrap();

    pool.purge();
    assert_eq!(
        copy.tuple().value_at(3),
        Err(TupleError::StaleObject(notes))
    );
    // Releasing through the tuple afterwards is harmless
    assert_eq!(copy.tuple_mut().free_object_columns().unwrap(), 0);

    source.tuple_mut().free_object_columns().unwrap();
}

#[test]
fn test_failed_copy_for_update_leaves_row_unchanged() {
    let schema = create_item_schema(false);
    let mut stored = build_row(&schema, 1, "code", "desc", "notes");

    // The update changes "code" and the id, but its notes object is gone
    let mut update = StandaloneTuple::new(schema.clone());
    update.tuple_mut().copy(&stored.tuple()).unwrap();
    update.tuple_mut().set_value(0, &Value::Integer(9)).unwrap();
    let new_code = update
        .tuple_mut()
        .set_value_with_copy(1, &Value::from("new code"), None)
        .unwrap()
        .unwrap();
    let gone = update
        .tuple_mut()
        .set_value_with_copy(3, &Value::from("gone"), None)
        .unwrap()
        .unwrap();
    assert_eq!(release_objects(&[gone]), 1);
    update.tuple_mut().set_dirty(true);

    let before = stored.tuple().data().to_vec();
    let (mut old, mut new) = (Vec::new(), Vec::new());
    assert_eq!(
        stored
            .tuple_mut()
            .copy_for_update(&update.tuple(), &mut old, &mut new),
        Err(TupleError::StaleObject(gone))
    );

    assert!(old.is_empty());
    assert!(new.is_empty());
    assert_eq!(stored.tuple().data(), &before[..]);
    assert_eq!(stored.tuple().value_at(0).unwrap(), Value::Integer(1));
    assert_eq!(stored.tuple().value_at(1).unwrap(), Value::from("code"));
    assert!(!stored.tuple().is_dirty());

    release_objects(&[new_code]);
    stored.tuple_mut().free_object_columns().unwrap();
}
