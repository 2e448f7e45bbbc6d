/*!

A hash-consed directed acyclic graph of the symbolic quantities that an integral-kernel generator manipulates:
integral sets, named scalars, and the binary algebraic operators that combine them.

Every quantity is interned: asking a `DagContext` for the same quantity twice returns the same vertex, so common
subexpressions are shared by construction. Recurrence-relation libraries grow the graph from its roots through
`DagContext::expand`, and an emitter walks the result in `topological_order`.

*/

pub mod api;
pub mod abstractions;
pub mod core;

// We re-export abstractions that are meant to be used publicly.
pub use abstractions::{
  log,
  IString
};

pub use crate::core::{DagConfig, DagContext, DagError, EquivalencePolicy};
