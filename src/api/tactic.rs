/*!

A `Tactic` chooses the recurrence relation used to reduce a vertex when several apply.

| tactic                    | choice                                                               |
|:--------------------------|:---------------------------------------------------------------------|
| `FirstChoiceTactic`       | the first candidate, optionally shifted by a `RandomizePolicy`        |
| `RandomChoiceTactic`      | a uniformly random candidate                                         |
| `NullTactic`              | nothing; the vertex stays opaque                                     |
| `FewestNewVerticesTactic` | the candidate whose children add the fewest vertices to the graph    |
| `ZeroNewVerticesTactic`   | the first candidate whose children are all on the graph already      |
| `ParticleDirectionTactic` | the first candidate moving quanta in the requested particle direction |

"On the graph" means a root or a vertex some other vertex depends on, see `DagContext::is_on_graph`. Children that
a library merely instantiated while building candidates are registered but not yet on the graph.

*/

use std::cell::RefCell;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
  api::recurrence::RrPtr,
  core::context::DagContext,
};

pub trait Tactic {
  fn optimal_rr(&self, ctx: &DagContext, stack: &[RrPtr]) -> Option<RrPtr>;
}

// region Randomize policies

/// Shifts `FirstChoiceTactic` away from the first candidate.
pub trait RandomizePolicy {
  /// An offset in `0..nrrs`.
  fn noise(&self, nrrs: usize) -> usize;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct DummyRandomizePolicy;

impl RandomizePolicy for DummyRandomizePolicy {
  fn noise(&self, _nrrs: usize) -> usize {
    0
  }
}

/// Offset is `floor(nrrs * scale * u)` for uniform `u` in `[0, 1)`, clamped to a valid index. A `scale` of zero
/// never shifts; a `scale` of one shifts uniformly over all candidates.
pub struct StdRandomizePolicy {
  scale: f64,
  rng  : RefCell<StdRng>,
}

impl StdRandomizePolicy {
  pub fn new(scale: f64) -> Self {
    StdRandomizePolicy { scale, rng: RefCell::new(StdRng::from_entropy()) }
  }

  /// Reproducible noise, for tests and for regenerating a particular graph.
  pub fn with_seed(scale: f64, seed: u64) -> Self {
    StdRandomizePolicy { scale, rng: RefCell::new(StdRng::seed_from_u64(seed)) }
  }
}

impl RandomizePolicy for StdRandomizePolicy {
  fn noise(&self, nrrs: usize) -> usize {
    if nrrs == 0 {
      return 0;
    }
    let u: f64 = self.rng.borrow_mut().gen();
    let shift = (nrrs as f64 * self.scale * u).floor();
    if shift <= 0.0 {
      0
    } else {
      (shift as usize).min(nrrs - 1)
    }
  }
}

// endregion Randomize policies

#[derive(Default)]
pub struct FirstChoiceTactic<P: RandomizePolicy = DummyRandomizePolicy> {
  rpolicy: P,
}

impl FirstChoiceTactic<DummyRandomizePolicy> {
  pub fn new() -> Self {
    FirstChoiceTactic { rpolicy: DummyRandomizePolicy }
  }
}

impl<P: RandomizePolicy> FirstChoiceTactic<P> {
  pub fn with_policy(rpolicy: P) -> Self {
    FirstChoiceTactic { rpolicy }
  }
}

impl<P: RandomizePolicy> Tactic for FirstChoiceTactic<P> {
  fn optimal_rr(&self, _ctx: &DagContext, stack: &[RrPtr]) -> Option<RrPtr> {
    if stack.is_empty() {
      return None;
    }
    let offset = self.rpolicy.noise(stack.len()).min(stack.len() - 1);
    stack.get(offset).cloned()
  }
}

pub struct RandomChoiceTactic {
  rng: RefCell<StdRng>,
}

impl RandomChoiceTactic {
  pub fn new() -> Self {
    RandomChoiceTactic { rng: RefCell::new(StdRng::from_entropy()) }
  }

  pub fn with_seed(seed: u64) -> Self {
    RandomChoiceTactic { rng: RefCell::new(StdRng::seed_from_u64(seed)) }
  }
}

impl Default for RandomChoiceTactic {
  fn default() -> Self {
    Self::new()
  }
}

impl Tactic for RandomChoiceTactic {
  fn optimal_rr(&self, _ctx: &DagContext, stack: &[RrPtr]) -> Option<RrPtr> {
    if stack.is_empty() {
      return None;
    }
    let i = self.rng.borrow_mut().gen_range(0..stack.len());
    stack.get(i).cloned()
  }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct NullTactic;

impl Tactic for NullTactic {
  fn optimal_rr(&self, _ctx: &DagContext, _stack: &[RrPtr]) -> Option<RrPtr> {
    None
  }
}

/// Children of `rr` that are not yet on the graph.
fn num_new_vertices(ctx: &DagContext, rr: &RrPtr) -> usize {
  rr.children()
    .iter()
    .filter(|child| !ctx.is_on_graph(**child))
    .count()
}

#[derive(Copy, Clone, Debug, Default)]
pub struct FewestNewVerticesTactic;

impl Tactic for FewestNewVerticesTactic {
  fn optimal_rr(&self, ctx: &DagContext, stack: &[RrPtr]) -> Option<RrPtr> {
    // Ties go to the earliest candidate, which is what `min_by_key` keeps.
    stack.iter()
         .min_by_key(|rr| num_new_vertices(ctx, rr))
         .cloned()
  }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct ZeroNewVerticesTactic;

impl Tactic for ZeroNewVerticesTactic {
  fn optimal_rr(&self, ctx: &DagContext, stack: &[RrPtr]) -> Option<RrPtr> {
    stack.iter()
         .find(|rr| num_new_vertices(ctx, rr) == 0)
         .cloned()
  }
}

/// Prefers relations moving quanta toward higher (`increase`) or lower particle indices. Falls back to the first
/// relation that does not transfer between particles at all.
#[derive(Copy, Clone, Debug)]
pub struct ParticleDirectionTactic {
  increase: bool,
}

impl ParticleDirectionTactic {
  pub fn new(increase: bool) -> Self {
    ParticleDirectionTactic { increase }
  }
}

impl Tactic for ParticleDirectionTactic {
  fn optimal_rr(&self, _ctx: &DagContext, stack: &[RrPtr]) -> Option<RrPtr> {
    let wanted = |rr: &&RrPtr| {
      let direction = rr.partindex_direction();
      if self.increase { direction > 0 } else { direction < 0 }
    };

    stack.iter()
         .find(wanted)
         .or_else(|| stack.iter().find(|rr| rr.partindex_direction() == 0))
         .cloned()
  }
}

#[cfg(test)]
mod tests {
  use std::rc::Rc;

  use super::*;
  use crate::api::{recurrence::RecurrenceRelation, vertex::VertexId};

  struct Fixed {
    label    : &'static str,
    target   : VertexId,
    children : Vec<VertexId>,
    direction: i8,
  }

  impl RecurrenceRelation for Fixed {
    fn label(&self) -> String {
      self.label.to_string()
    }

    fn target(&self) -> VertexId {
      self.target
    }

    fn children(&self) -> &[VertexId] {
      &self.children
    }

    fn partindex_direction(&self) -> i8 {
      self.direction
    }
  }

  fn rr(label: &'static str, target: VertexId, children: &[VertexId], direction: i8) -> RrPtr {
    Rc::new(Fixed { label, target, children: children.to_vec(), direction })
  }

  fn labels(choice: Option<RrPtr>) -> Option<String> {
    choice.map(|rr| rr.label())
  }

  /// Scalars `t a b c`, with `a` made a root so it counts as on the graph.
  fn setup() -> (DagContext, [VertexId; 4]) {
    let mut ctx = DagContext::default();
    let ids = ["t", "a", "b", "c"].map(|name| ctx.runtime_scalar(name).unwrap());
    ctx.add_root(ids[1]).unwrap();
    (ctx, ids)
  }

  #[test]
  fn first_and_null() {
    let (ctx, [t, a, b, _]) = setup();
    let stack = vec![rr("one", t, &[a], 0), rr("two", t, &[b], 0)];

    assert_eq!(labels(FirstChoiceTactic::new().optimal_rr(&ctx, &stack)), Some("one".to_string()));
    assert_eq!(labels(FirstChoiceTactic::new().optimal_rr(&ctx, &[])), None);
    assert_eq!(labels(NullTactic.optimal_rr(&ctx, &stack)), None);

    // Zero scale never shifts away from the first candidate.
    let unshifted = FirstChoiceTactic::with_policy(StdRandomizePolicy::with_seed(0.0, 3));
    for _ in 0..10 {
      assert_eq!(labels(unshifted.optimal_rr(&ctx, &stack)), Some("one".to_string()));
    }
  }

  #[test]
  fn seeded_choices_are_reproducible() {
    let (ctx, [t, a, b, c]) = setup();
    let stack = vec![rr("a", t, &[a], 0), rr("b", t, &[b], 0), rr("c", t, &[c], 0)];

    let draw = |tactic: &dyn Tactic| -> Vec<Option<String>> {
      (0..20).map(|_| labels(tactic.optimal_rr(&ctx, &stack))).collect()
    };

    let shifted = draw(&FirstChoiceTactic::with_policy(StdRandomizePolicy::with_seed(1.0, 11)));
    assert_eq!(shifted, draw(&FirstChoiceTactic::with_policy(StdRandomizePolicy::with_seed(1.0, 11))));
    assert!(shifted.iter().all(|choice| choice.is_some()));

    let random = draw(&RandomChoiceTactic::with_seed(5));
    assert_eq!(random, draw(&RandomChoiceTactic::with_seed(5)));
  }

  #[test]
  fn noise_stays_in_range() {
    let policy = StdRandomizePolicy::with_seed(4.0, 1);
    for _ in 0..100 {
      assert!(policy.noise(3) < 3);
    }
    assert_eq!(policy.noise(0), 0);
  }

  #[test]
  fn new_vertex_counting() {
    let (ctx, [t, a, b, c]) = setup();
    let two_new = rr("two new", t, &[b, c], 0);
    let one_new = rr("one new", t, &[a, b], 0);
    let none_new = rr("none new", t, &[a, a], 0);

    let stack = vec![two_new.clone(), one_new.clone(), none_new.clone()];
    assert_eq!(labels(FewestNewVerticesTactic.optimal_rr(&ctx, &stack)), Some("none new".to_string()));
    assert_eq!(labels(ZeroNewVerticesTactic.optimal_rr(&ctx, &stack)), Some("none new".to_string()));

    let stack = vec![two_new, one_new];
    assert_eq!(labels(FewestNewVerticesTactic.optimal_rr(&ctx, &stack)), Some("one new".to_string()));
    assert_eq!(labels(ZeroNewVerticesTactic.optimal_rr(&ctx, &stack)), None);
  }

  #[test]
  fn fewest_new_vertices_prefers_earlier_on_ties() {
    let (ctx, [t, _, b, c]) = setup();
    let stack = vec![rr("b", t, &[b], 0), rr("c", t, &[c], 0)];
    assert_eq!(labels(FewestNewVerticesTactic.optimal_rr(&ctx, &stack)), Some("b".to_string()));
  }

  #[test]
  fn particle_direction() {
    let (ctx, [t, a, _, _]) = setup();
    let stack = vec![rr("still", t, &[a], 0), rr("down", t, &[a], -1), rr("up", t, &[a], 1)];

    assert_eq!(labels(ParticleDirectionTactic::new(true).optimal_rr(&ctx, &stack)), Some("up".to_string()));
    assert_eq!(labels(ParticleDirectionTactic::new(false).optimal_rr(&ctx, &stack)), Some("down".to_string()));

    let only_down = vec![rr("down", t, &[a], -1)];
    assert_eq!(labels(ParticleDirectionTactic::new(true).optimal_rr(&ctx, &only_down)), None);

    let fallback = vec![rr("down", t, &[a], -1), rr("still", t, &[a], 0)];
    assert_eq!(labels(ParticleDirectionTactic::new(true).optimal_rr(&ctx, &fallback)), Some("still".to_string()));
  }
}
