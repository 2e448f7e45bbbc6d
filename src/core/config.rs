/*!

Per-run configuration. A `DagConfig` is handed to `DagContext::new` and stays fixed for the life of the context, so
the equivalence policy used to key the registry is always the one used by `equiv`.

*/

use std::fmt::{Display, Formatter};

/// How operator vertices decide whether their operands match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EquivalencePolicy {
  /// Operands match only when they are the same vertex. Equivalent-but-distinct operands are reported as anomalies.
  Reference,
  /// Operands match when they are structurally equivalent, recursively.
  Structural,
}

impl Default for EquivalencePolicy {
  fn default() -> Self {
    if cfg!(feature = "structural_equiv") {
      EquivalencePolicy::Structural
    } else {
      EquivalencePolicy::Reference
    }
  }
}

impl Display for EquivalencePolicy {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      EquivalencePolicy::Reference  => write!(f, "reference"),
      EquivalencePolicy::Structural => write!(f, "structural"),
    }
  }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DagConfig {
  pub policy      : EquivalencePolicy,
  /// Reject `add_exit_arc` calls that would close a cycle. Costs a walk of the destination's subgraph per arc.
  pub check_cycles: bool,
}

impl Default for DagConfig {
  fn default() -> Self {
    DagConfig {
      policy      : EquivalencePolicy::default(),
      check_cycles: true,
    }
  }
}

impl DagConfig {
  pub fn with_policy(policy: EquivalencePolicy) -> Self {
    DagConfig { policy, ..DagConfig::default() }
  }
}
