/*!

The value types an integral is parametrized by: basis function sets, the operator being integrated, and the auxiliary
index. The graph treats all three as opaque comparable keys; it only needs equality, hashing, and a label.

Concrete implementations are provided for the common case of Cartesian Gaussian shells, the Coulomb (electron
repulsion) and overlap operators, and the Boys-function order `m` used as auxiliary index by Obara-Saika-type
recurrences.

*/

use std::{
  fmt::{Debug, Display, Formatter},
  hash::Hash,
};

/// A set of basis functions, e.g. a shell of Cartesian Gaussians of a given angular momentum.
pub trait BasisFunctionSet: Clone + Eq + Hash + Debug + 'static {
  fn label(&self) -> String;

  /// Number of individual functions in the set.
  fn num_bf(&self) -> usize;
}

/// The operator an integral is taken over.
pub trait IntegralOperator: Clone + Eq + Hash + Debug + Default + 'static {
  fn label(&self) -> String;

  fn description(&self) -> String {
    self.label()
  }

  /// Number of particles the operator couples.
  fn num_particles(&self) -> usize;
}

/// Extra quantum numbers that distinguish otherwise identical integrals.
pub trait AuxIndex: Clone + Eq + Hash + Debug + Default + 'static {
  /// Rendered after the braket; empty for no auxiliary index.
  fn label(&self) -> String;
}

// region Cartesian shells

const SHELL_LABELS: &[u8] = b"spdfghiklmnoqrtuvwxyz";

/// A shell of Cartesian Gaussian functions with total angular momentum `l`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CartesianShell {
  l: u8,
}

impl CartesianShell {
  pub fn new(l: u8) -> Self {
    CartesianShell { l }
  }

  #[inline(always)]
  pub fn l(&self) -> u8 {
    self.l
  }

  /// The shell with angular momentum lowered by one, if there is one.
  pub fn lowered(&self) -> Option<CartesianShell> {
    self.l.checked_sub(1).map(CartesianShell::new)
  }

  /// The shell with angular momentum raised by one, if it is still representable.
  pub fn raised(&self) -> Option<CartesianShell> {
    self.l.checked_add(1).map(CartesianShell::new)
  }
}

impl BasisFunctionSet for CartesianShell {
  fn label(&self) -> String {
    match SHELL_LABELS.get(self.l as usize) {
      Some(c) => (*c as char).to_string(),
      None    => format!("l{}", self.l),
    }
  }

  fn num_bf(&self) -> usize {
    let l = self.l as usize;
    (l + 1) * (l + 2) / 2
  }
}

impl Display for CartesianShell {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&BasisFunctionSet::label(self))
  }
}

// endregion Cartesian shells

// region Operators

/// The Coulomb operator 1/r12 between two particles.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ElectronRepulsion;

impl IntegralOperator for ElectronRepulsion {
  fn label(&self) -> String {
    "TwoPRep".to_string()
  }

  fn description(&self) -> String {
    "Coulomb 1/r_{12}".to_string()
  }

  fn num_particles(&self) -> usize {
    2
  }
}

/// The one-particle overlap.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Overlap;

impl IntegralOperator for Overlap {
  fn label(&self) -> String {
    "Overlap".to_string()
  }

  fn num_particles(&self) -> usize {
    1
  }
}

// endregion Operators

// region Auxiliary indices

/// No auxiliary index.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct EmptySet;

impl AuxIndex for EmptySet {
  fn label(&self) -> String {
    String::new()
  }
}

/// The order `m` of the Boys function an auxiliary integral is defined with.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct MType(pub u32);

impl MType {
  pub fn next(&self) -> MType {
    MType(self.0 + 1)
  }
}

impl AuxIndex for MType {
  fn label(&self) -> String {
    format!("^{{{}}}", self.0)
  }
}

// endregion Auxiliary indices
