/*!

The contract with recurrence-relation libraries.

A recurrence relation expresses a target quantity through simpler ones. A `RelationLibrary` builds the relations that
apply to a target, instantiating their children through the registry as it goes; a `Tactic` picks one; and
`DagContext::expand` wires the target's exit arcs to the chosen relation's children and recurses.

Which relations exist and when they apply is entirely the library's business. The graph only needs the children, and
optionally the root of the operator tree that evaluates the target from them, for the emitter.

*/

use std::rc::Rc;

use crate::{
  api::vertex::VertexId,
  core::{context::DagContext, error::DagError},
};

pub trait RecurrenceRelation {
  fn label(&self) -> String;

  fn target(&self) -> VertexId;

  /// The precursor quantities, in the order the relation lists them.
  fn children(&self) -> &[VertexId];

  /// Root of the operator tree computing the target from the children.
  fn expression(&self) -> Option<VertexId> {
    None
  }

  /// Direction quanta move between particles: positive toward higher particle indices, negative toward lower, zero
  /// if the relation does not transfer between particles.
  fn partindex_direction(&self) -> i8 {
    0
  }
}

pub type RrPtr = Rc<dyn RecurrenceRelation>;

pub trait RelationLibrary {
  /// Every relation that can reduce `target`. An empty list means the target cannot be reduced.
  fn candidates(&self, ctx: &mut DagContext, target: VertexId) -> Result<Vec<RrPtr>, DagError>;
}
