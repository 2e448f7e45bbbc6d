/*!

The interning registry maps structural keys to the one live vertex for that key.

A key is computed from a quantity's semantic parameters before any payload exists, so a lookup never has to build a
throwaway candidate. The registry itself is a plain map; the atomic lookup-or-create step, ownership, and arc wiring
live in `DagContext::get_or_insert`.

*/

use std::{
  any::TypeId,
  collections::{hash_map::Entry, HashMap},
  fmt::{Display, Formatter},
};

use crate::{
  abstractions::IString,
  api::{algebra::OperatorType, scalar::ScalarOrigin, vertex::VertexId},
};

/// Parameters identifying an integral set. The components are the unambiguous renderings of the set's parameters, so
/// two sets of the same family have equal keys exactly when their parameters are equal.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct IntegralKey {
  pub(crate) family: TypeId,
  pub(crate) oper  : IString,
  pub(crate) bra   : IString,
  pub(crate) ket   : IString,
  pub(crate) aux   : IString,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum StructuralKey {
  Integral(IntegralKey),
  Scalar {
    name  : IString,
    origin: ScalarOrigin,
  },
  /// Operator keyed by the serials of its operands, for the reference policy.
  OperatorByIdentity {
    operator_type: OperatorType,
    left         : u64,
    right        : u64,
  },
  /// Operator keyed by the signatures of its operands, for the structural policy.
  OperatorByStructure {
    operator_type: OperatorType,
    left         : IString,
    right        : IString,
  },
}

impl Display for StructuralKey {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      StructuralKey::Integral(key) => {
        write!(f, "integral[{}|{}|{}]{}", key.bra, key.oper, key.ket, key.aux)
      }
      StructuralKey::Scalar { name, origin } => write!(f, "scalar[{}:{}]", name, origin),
      StructuralKey::OperatorByIdentity { operator_type, left, right } => {
        write!(f, "op[v{} {} v{}]", left, operator_type, right)
      }
      StructuralKey::OperatorByStructure { operator_type, left, right } => {
        write!(f, "op[( {} ) {} ( {} )]", left, operator_type, right)
      }
    }
  }
}

#[derive(Default)]
pub struct Registry {
  entries: HashMap<StructuralKey, VertexId>,
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  #[inline(always)]
  pub fn find(&self, key: &StructuralKey) -> Option<VertexId> {
    self.entries.get(key).copied()
  }

  #[inline(always)]
  pub fn contains(&self, key: &StructuralKey) -> bool {
    self.entries.contains_key(key)
  }

  /// Maps `key` to `vertex` unless the key is taken, in which case the existing mapping wins and is returned as the
  /// error value.
  pub fn insert(&mut self, key: StructuralKey, vertex: VertexId) -> Result<(), VertexId> {
    match self.entries.entry(key) {
      Entry::Occupied(existing) => Err(*existing.get()),
      Entry::Vacant(slot) => {
        slot.insert(vertex);
        Ok(())
      }
    }
  }

  /// Removes the mapping for `key` only if it still points at `vertex`.
  pub fn remove(&mut self, key: &StructuralKey, vertex: VertexId) -> bool {
    match self.entries.get(key) {
      Some(current) if *current == vertex => {
        self.entries.remove(key);
        true
      }
      _ => false,
    }
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn id(index: u32, serial: u64) -> VertexId {
    VertexId { index, serial }
  }

  #[test]
  fn first_mapping_wins() {
    let mut registry = Registry::new();
    let key = StructuralKey::Scalar { name: IString::from("a"), origin: ScalarOrigin::Runtime };

    assert_eq!(registry.insert(key.clone(), id(0, 10)), Ok(()));
    assert_eq!(registry.insert(key.clone(), id(1, 11)), Err(id(0, 10)));
    assert_eq!(registry.find(&key), Some(id(0, 10)));
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn remove_ignores_a_stale_mapping() {
    let mut registry = Registry::new();
    let key = StructuralKey::OperatorByIdentity { operator_type: OperatorType::Times, left: 1, right: 2 };
    registry.insert(key.clone(), id(3, 30)).unwrap();

    assert!(!registry.remove(&key, id(3, 31)));
    assert!(registry.contains(&key));
    assert!(registry.remove(&key, id(3, 30)));
    assert!(registry.is_empty());
  }

  #[test]
  fn operator_keys_render_readably() {
    let key = StructuralKey::OperatorByStructure {
      operator_type: OperatorType::Plus,
      left         : IString::from("a"),
      right        : IString::from("b"),
    };
    assert_eq!(key.to_string(), "op[( a ) + ( b )]");
  }
}
