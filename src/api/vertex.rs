/*!

A `Vertex` is one node of the graph: an algebraic operator, an integral set, or a named scalar. Vertices live in the
arena owned by a `DagContext` and are addressed by `VertexId` handles.

|                | pointer graph                           | intdag                              |
|:---------------|:----------------------------------------|:------------------------------------|
| node kinds     | trait objects per node type             | `VertexPayload` enum                |
| identity       | address of the heap object              | arena index + process-unique serial |
| ownership      | shared pointers                         | owner count per arena slot          |
| back-references| weak pointers                           | `NatSet` of arena indices           |
| state bits     | scattered booleans                      | `VertexFlags`                       |

A handle carries the serial of the vertex it was issued for. Once that vertex is reclaimed (or the context is reset)
the slot may be reused, but never with the same serial, so a stale handle is rejected instead of silently pointing at
a newer vertex.

*/

use std::fmt::{Display, Formatter};

use enumflags2::{bitflags, make_bitflags, BitFlags};

use crate::{
  abstractions::{IString, NatSet},
  api::{
    algebra::AlgebraicOperator,
    integral::IntegralClass,
    recurrence::RrPtr,
    scalar::ScalarEntity,
  },
  core::registry::StructuralKey,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VertexId {
  pub(crate) index : u32,
  pub(crate) serial: u64,
}

impl VertexId {
  /// The process-unique serial assigned when the vertex was registered.
  #[inline(always)]
  pub fn serial(&self) -> u64 {
    self.serial
  }

  #[inline(always)]
  pub(crate) fn index(&self) -> usize {
    self.index as usize
  }
}

impl Display for VertexId {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "v{}", self.serial)
  }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VertexKind {
  Operator,
  Integral,
  Scalar,
}

impl Display for VertexKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      VertexKind::Operator => write!(f, "operator"),
      VertexKind::Integral => write!(f, "integral"),
      VertexKind::Scalar   => write!(f, "scalar"),
    }
  }
}

#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VertexFlag {
  /// The registry holds the canonical mapping for this vertex's key.
  Registered,
  /// Held by the context's root set.
  Root,
  /// A recurrence relation has been applied; exit arcs lead to its children.
  Expanded,
  /// Value is assumed available without derivation.
  Precomputed,
  /// Must be reduced by a recurrence relation; may not be left opaque.
  AutoUnroll,
}

impl VertexFlag {
  #![allow(non_upper_case_globals)]

  /// Flags fixed by the payload at construction.
  pub const PolicyFlags: VertexFlags = make_bitflags!(VertexFlag::{Precomputed | AutoUnroll});
}

pub type VertexFlags = BitFlags<VertexFlag, u8>;

pub enum VertexPayload {
  Operator(AlgebraicOperator<VertexId>),
  Integral(Box<dyn IntegralClass>),
  Scalar(ScalarEntity),
}

impl VertexPayload {
  pub fn kind(&self) -> VertexKind {
    match self {
      VertexPayload::Operator(_) => VertexKind::Operator,
      VertexPayload::Integral(_) => VertexKind::Integral,
      VertexPayload::Scalar(_)   => VertexKind::Scalar,
    }
  }

  pub fn label(&self) -> IString {
    match self {
      VertexPayload::Operator(op)     => op.label().clone(),
      VertexPayload::Integral(set)    => set.label(),
      VertexPayload::Scalar(scalar)   => scalar.name().clone(),
    }
  }

  pub fn size(&self) -> usize {
    match self {
      VertexPayload::Operator(op)   => op.size(),
      VertexPayload::Integral(set)  => set.size(),
      VertexPayload::Scalar(_)      => 1,
    }
  }

  /// Vertices the payload refers to, which must be wired as exit arcs before the vertex is exposed.
  pub(crate) fn operands(&self) -> Vec<VertexId> {
    match self {
      VertexPayload::Operator(op) => vec![*op.left(), *op.right()],
      _ => vec![],
    }
  }

  pub(crate) fn policy_flags(&self) -> VertexFlags {
    let mut flags = VertexFlags::empty();
    match self {
      VertexPayload::Operator(_) => {}
      VertexPayload::Integral(set) => {
        if set.this_precomputed() {
          flags.insert(VertexFlag::Precomputed);
        }
        if set.auto_unroll() {
          flags.insert(VertexFlag::AutoUnroll);
        }
      }
      VertexPayload::Scalar(_) => flags.insert(VertexFlag::Precomputed),
    }
    flags
  }
}

pub struct Vertex {
  pub(crate) serial    : u64,
  pub(crate) payload   : VertexPayload,
  /// The key this vertex is registered under; `None` once unregistered.
  pub(crate) key       : Option<StructuralKey>,
  pub(crate) exit_arcs : Vec<VertexId>,
  pub(crate) entry_arcs: NatSet,
  /// Registry entry + one per incoming arc + client retains + root membership.
  pub(crate) owners    : u32,
  /// The share of `owners` held by client `retain` calls.
  pub(crate) retains   : u32,
  pub(crate) flags     : VertexFlags,
  /// The recurrence relation chosen when the vertex was expanded.
  pub(crate) relation  : Option<RrPtr>,
}

impl Vertex {
  pub(crate) fn new(serial: u64, payload: VertexPayload) -> Vertex {
    let flags = payload.policy_flags() & VertexFlag::PolicyFlags;
    Vertex {
      serial,
      payload,
      key       : None,
      exit_arcs : Vec::new(),
      entry_arcs: NatSet::new(),
      owners    : 0,
      retains   : 0,
      flags,
      relation  : None,
    }
  }

  // region Accessors

  #[inline(always)]
  pub fn kind(&self) -> VertexKind {
    self.payload.kind()
  }

  #[inline(always)]
  pub fn payload(&self) -> &VertexPayload {
    &self.payload
  }

  #[inline(always)]
  pub fn label(&self) -> IString {
    self.payload.label()
  }

  #[inline(always)]
  pub fn size(&self) -> usize {
    self.payload.size()
  }

  #[inline(always)]
  pub fn exit_arcs(&self) -> &[VertexId] {
    &self.exit_arcs
  }

  #[inline(always)]
  pub fn num_exit_arcs(&self) -> usize {
    self.exit_arcs.len()
  }

  #[inline(always)]
  pub fn num_entry_arcs(&self) -> usize {
    self.entry_arcs.len()
  }

  #[inline(always)]
  pub fn owners(&self) -> u32 {
    self.owners
  }

  #[inline(always)]
  pub fn retains(&self) -> u32 {
    self.retains
  }

  #[inline(always)]
  pub fn flags(&self) -> VertexFlags {
    self.flags
  }

  #[inline(always)]
  pub fn is_precomputed(&self) -> bool {
    self.flags.contains(VertexFlag::Precomputed)
  }

  #[inline(always)]
  pub fn is_registered(&self) -> bool {
    self.flags.contains(VertexFlag::Registered)
  }

  #[inline(always)]
  pub fn is_expanded(&self) -> bool {
    self.flags.contains(VertexFlag::Expanded)
  }

  #[inline(always)]
  pub fn auto_unroll(&self) -> bool {
    self.flags.contains(VertexFlag::AutoUnroll)
  }

  pub fn key(&self) -> Option<&StructuralKey> {
    self.key.as_ref()
  }

  pub fn relation(&self) -> Option<&RrPtr> {
    self.relation.as_ref()
  }

  pub fn as_operator(&self) -> Option<&AlgebraicOperator<VertexId>> {
    match &self.payload {
      VertexPayload::Operator(op) => Some(op),
      _ => None,
    }
  }

  pub fn as_integral(&self) -> Option<&dyn IntegralClass> {
    match &self.payload {
      VertexPayload::Integral(set) => Some(set.as_ref()),
      _ => None,
    }
  }

  pub fn as_scalar(&self) -> Option<&ScalarEntity> {
    match &self.payload {
      VertexPayload::Scalar(scalar) => Some(scalar),
      _ => None,
    }
  }

  // endregion Accessors

  /// Number of exit arcs from this vertex to `to`. More than one for e.g. `x * x`.
  pub(crate) fn arcs_to(&self, to: VertexId) -> usize {
    self.exit_arcs.iter().filter(|dest| **dest == to).count()
  }
}

impl Display for Vertex {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}<{}>", self.kind(), self.label())
  }
}
