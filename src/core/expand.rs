/*!

Growing the graph by recurrence relations, and walking it in evaluation order.

`DagContext::expand` reduces a root depth-first. At each integral vertex the relation library proposes candidate
relations, the tactic picks one, and the vertex gets exit arcs to the chosen relation's children, which are reduced in
turn. Precomputed and already expanded vertices stop the descent. A vertex for which the tactic picks nothing is left
opaque, unless its family requires it to be unrolled, which is an error.

`DagContext::topological_order` lists everything reachable from a set of roots so that each vertex comes after all
of its exit-arc destinations, which is the order an emitter evaluates them in.

*/

use crate::{
  abstractions::NatSet,
  api::{
    recurrence::RelationLibrary,
    tactic::Tactic,
    vertex::{VertexFlag, VertexId, VertexKind},
  },
  core::{context::DagContext, error::DagError},
  log::{debug, info},
};

/// What one call to `expand` did.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ExpansionSummary {
  /// Vertices a relation was applied to.
  pub expanded: usize,
  /// Vertices left without a relation.
  pub opaque  : usize,
}

impl DagContext {
  /// Adds `root` to the root set and reduces it and everything it comes to depend on.
  pub fn expand(
    &mut self,
    root   : VertexId,
    library: &dyn RelationLibrary,
    tactic : &dyn Tactic
  ) -> Result<ExpansionSummary, DagError> {
    self.add_root(root)?;

    let mut summary = ExpansionSummary::default();
    let mut visited = NatSet::new();
    let mut stack   = vec![root];

    while let Some(id) = stack.pop() {
      if !visited.insert(id.index()) {
        continue;
      }
      let vertex = self.vertex(id)?;
      if vertex.is_precomputed() || vertex.is_expanded() {
        continue;
      }
      if vertex.kind() != VertexKind::Integral {
        // Operators and scalars are not reduced, but integrals below an operator still are.
        stack.extend(vertex.exit_arcs().iter().rev().copied());
        continue;
      }

      let candidates = library.candidates(self, id)?;
      match tactic.optimal_rr(self, &candidates) {

        Some(rr) => {
          let label = self.label(id)?;
          debug!(3, "{} reduced by {} into {} children", label, rr.label(), rr.children().len());
          // Every arc is checked before any is wired.
          for child in rr.children() {
            self.vertex(*child)?;
            if self.config().check_cycles && self.reaches(*child, id)? {
              return Err(DagError::InvalidMutation {
                vertex: id,
                reason: format!("an arc to {} would close a cycle", child),
              });
            }
          }
          if let Some(expression) = rr.expression() {
            self.vertex(expression)?;
          }

          for child in rr.children() {
            self.link(id, *child)?;
          }
          if let Some(expression) = rr.expression() {
            self.add_owner(expression)?;
          }
          stack.extend(rr.children().iter().rev().copied());

          let vertex = self.vertex_mut(id)?;
          vertex.flags.insert(VertexFlag::Expanded);
          vertex.relation = Some(rr);
          summary.expanded += 1;
        }

        None => {
          let vertex = self.vertex(id)?;
          if vertex.auto_unroll() {
            return Err(DagError::NoRecurrence { vertex: id, label: vertex.label().to_string() });
          }
          info!(2, "no recurrence relation chosen for {}; left opaque", vertex.label());
          summary.opaque += 1;
        }

      } // end match on chosen relation
    }

    let label = self.label(root)?;
    info!(
      1,
      "expanded {}: {} vertices reduced, {} left opaque, {} live",
      label,
      summary.expanded,
      summary.opaque,
      self.num_vertices()
    );
    Ok(summary)
  }

  /// Every vertex reachable from `roots`, each after all of its exit-arc destinations and after the expression of
  /// its recurrence relation, if any. Ties are broken by root order and then by arc order, so the result is
  /// deterministic.
  pub fn topological_order(&self, roots: &[VertexId]) -> Result<Vec<VertexId>, DagError> {
    let mut order   = Vec::new();
    let mut entered = NatSet::new();
    let mut done    = NatSet::new();
    let mut stack: Vec<(VertexId, bool)> = roots.iter().rev().map(|root| (*root, false)).collect();

    while let Some((id, ready)) = stack.pop() {
      if ready {
        if done.insert(id.index()) {
          order.push(id);
        }
        continue;
      }
      if done.contains(id.index()) || !entered.insert(id.index()) {
        continue;
      }

      let vertex = self.vertex(id)?;
      stack.push((id, true));
      if let Some(expression) = vertex.relation().and_then(|rr| rr.expression()) {
        stack.push((expression, false));
      }
      stack.extend(vertex.exit_arcs().iter().rev().map(|dest| (*dest, false)));
    }

    Ok(order)
  }
}
