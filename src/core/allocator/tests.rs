use crate::{
  api::{
    scalar::ScalarEntity,
    vertex::{VertexKind, VertexPayload},
  },
  core::{allocator::VertexArena, error::DagError},
};

fn scalar(name: &str) -> VertexPayload {
  VertexPayload::Scalar(ScalarEntity::runtime(name))
}

#[test]
fn slots_are_reused_under_new_serials() {
  let mut arena = VertexArena::new();
  let a = arena.insert(scalar("a"));
  let b = arena.insert(scalar("b"));
  assert_eq!(arena.len(), 2);

  let removed = arena.remove(a).unwrap();
  assert_eq!(removed.kind(), VertexKind::Scalar);
  assert_eq!(arena.len(), 1);

  let c = arena.insert(scalar("c"));
  assert_eq!(c.index, a.index);
  assert_ne!(c.serial(), a.serial());

  assert_eq!(arena.get(a).err(), Some(DagError::StaleVertex(a)));
  assert_eq!(&*arena.get(c).unwrap().label(), "c");
  assert!(arena.contains(b));
}

#[test]
fn clear_invalidates_every_handle() {
  let mut arena = VertexArena::new();
  let handles: Vec<_> = ["x", "y", "z"].iter().map(|name| arena.insert(scalar(name))).collect();
  arena.clear();
  assert!(arena.is_empty());

  let fresh = arena.insert(scalar("x"));
  assert_eq!(fresh.index, handles[0].index);
  for handle in handles {
    assert!(!arena.contains(handle));
  }
}

#[test]
fn id_at_resolves_live_slots_only() {
  let mut arena = VertexArena::new();
  let a = arena.insert(scalar("a"));
  let b = arena.insert(scalar("b"));
  arena.remove(a).unwrap();

  assert_eq!(arena.id_at(a.index()), None);
  assert_eq!(arena.id_at(b.index()), Some(b));
  assert_eq!(arena.id_at(99), None);
  assert_eq!(arena.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![b]);
}
