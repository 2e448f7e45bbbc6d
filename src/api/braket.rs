/*!

Brakets: the two sides of an integral, each a list of basis function sets per particle.

`VectorBraket` is the general form stored in an integral. `BraketPair` is the two-function bra or ket used when writing
an integral by hand, in either physicists' notation `<a b|c d>` (bra holds both particles' first functions) or
chemists' notation `(a c|b d)` (bra holds particle 0). The notation is a type parameter, so a chemists' bra cannot be
wedged into a physicists' integral by mistake.

```
use intdag::api::{
  basis::CartesianShell,
  braket::{BraketPair, PBra, PKet},
  algebra::WedgeProduct,
};

let (s, p) = (CartesianShell::new(0), CartesianShell::new(1));
let bra = BraketPair::<_, PBra>::new(p, s);
let ket = BraketPair::<_, PKet>::new(s, s);
assert_eq!(bra.wedge(&ket).to_string(), "<p s| ^ |s s>");
```

*/

use std::{
  fmt::{Display, Formatter},
  marker::PhantomData,
  ops::Index,
};

use crate::{
  abstractions::{join_string, join_with},
  api::{
    algebra::{make_wedge, Wedge, WedgeProduct},
    basis::BasisFunctionSet,
  },
};

/// Per-particle lists of basis function sets.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct VectorBraket<B> {
  members: Vec<Vec<B>>,
}

impl<B: BasisFunctionSet> VectorBraket<B> {
  pub fn new(members: Vec<Vec<B>>) -> Self {
    VectorBraket { members }
  }

  /// One function set per particle.
  pub fn from_singles(functions: impl IntoIterator<Item = B>) -> Self {
    VectorBraket { members: functions.into_iter().map(|f| vec![f]).collect() }
  }

  #[inline(always)]
  pub fn num_part(&self) -> usize {
    self.members.len()
  }

  /// Number of function sets for `particle`; zero for a particle the braket does not describe.
  pub fn num_members(&self, particle: usize) -> usize {
    self.members.get(particle).map_or(0, |m| m.len())
  }

  pub fn member(&self, particle: usize, i: usize) -> Option<&B> {
    self.members.get(particle).and_then(|m| m.get(i))
  }

  pub fn particle(&self, particle: usize) -> &[B] {
    self.members.get(particle).map(|m| m.as_slice()).unwrap_or(&[])
  }

  /// Returns a copy with member `i` of `particle` replaced.
  pub fn with_member(&self, particle: usize, i: usize, function: B) -> Option<Self> {
    let mut copy = self.clone();
    let slot = copy.members.get_mut(particle)?.get_mut(i)?;
    *slot = function;
    Some(copy)
  }

  /// Total number of basis functions: the product over all members.
  pub fn size(&self) -> usize {
    self.members.iter().flatten().map(|f| f.num_bf()).product()
  }

  /// Particles separated by spaces, members of one particle concatenated.
  pub fn label(&self) -> String {
    join_with(self.members.iter(), " ", |functions, out| {
      if functions.is_empty() {
        out.push('-');
      } else {
        out.push_str(&join_string(functions.iter().map(|f| f.label()), ""));
      }
      Ok(())
    })
  }

  /// Like `label`, but each particle is parenthesized, which keeps empty and multi-member particles readable.
  pub fn description(&self) -> String {
    join_with(self.members.iter(), "", |functions, out| {
      out.push('(');
      out.push_str(&join_string(functions.iter().map(|f| f.label()), " "));
      out.push(')');
      Ok(())
    })
  }

  /// The unambiguous form used in structural keys.
  pub(crate) fn key_string(&self) -> String {
    format!("{:?}", self.members)
  }
}

// region Notation tags

pub trait BraketNotation: 'static {
  const OPEN : &'static str;
  const CLOSE: &'static str;
}

/// Physicists' bra `<a b|`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PBra;
/// Physicists' ket `|c d>`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PKet;
/// Chemists' bra `(a b|`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct CBra;
/// Chemists' ket `|c d)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct CKet;

impl BraketNotation for PBra { const OPEN: &'static str = "<"; const CLOSE: &'static str = "|"; }
impl BraketNotation for PKet { const OPEN: &'static str = "|"; const CLOSE: &'static str = ">"; }
impl BraketNotation for CBra { const OPEN: &'static str = "("; const CLOSE: &'static str = "|"; }
impl BraketNotation for CKet { const OPEN: &'static str = "|"; const CLOSE: &'static str = ")"; }

// endregion Notation tags

/// Two basis function sets forming one side of a two-particle integral.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct BraketPair<B, N> {
  first   : B,
  second  : B,
  notation: PhantomData<N>,
}

impl<B, N: BraketNotation> BraketPair<B, N> {
  pub fn new(first: B, second: B) -> Self {
    BraketPair { first, second, notation: PhantomData }
  }
}

impl<B, N> Index<usize> for BraketPair<B, N> {
  type Output = B;

  fn index(&self, index: usize) -> &B {
    match index {
      0 => &self.first,
      1 => &self.second,
      _ => panic!("BraketPair index {} out of range", index),
    }
  }
}

impl<B: BasisFunctionSet, N: BraketNotation> Display for BraketPair<B, N> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}{} {}{}", N::OPEN, self.first.label(), self.second.label(), N::CLOSE)
  }
}

impl<B: Clone, L: Clone, R: Clone> WedgeProduct<BraketPair<B, R>> for BraketPair<B, L> {
  type Output = Wedge<BraketPair<B, L>, BraketPair<B, R>>;

  fn wedge(&self, rhs: &BraketPair<B, R>) -> Self::Output {
    make_wedge(self.clone(), rhs.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::basis::CartesianShell;

  fn shells(ls: &[u8]) -> Vec<CartesianShell> {
    ls.iter().map(|l| CartesianShell::new(*l)).collect()
  }

  #[test]
  fn arity_accessors() {
    let braket = VectorBraket::new(vec![shells(&[1]), shells(&[0, 2]), vec![]]);
    assert_eq!(braket.num_part(), 3);
    assert_eq!(braket.num_members(0), 1);
    assert_eq!(braket.num_members(1), 2);
    assert_eq!(braket.num_members(2), 0);
    assert_eq!(braket.num_members(7), 0);
    assert_eq!(braket.size(), 3 * 1 * 6);
    assert_eq!(braket.label(), "p sd -");
    assert_eq!(braket.description(), "(p)(s d)()");
  }

  #[test]
  fn with_member_replaces_one_function() {
    let braket = VectorBraket::from_singles(shells(&[1, 0]));
    let lowered = braket.with_member(0, 0, CartesianShell::new(0)).unwrap();
    assert_eq!(lowered.label(), "s s");
    assert!(braket.with_member(2, 0, CartesianShell::new(0)).is_none());
  }

  #[test]
  fn braket_pairs_render_in_their_notation() {
    let pair = BraketPair::<_, CKet>::new(CartesianShell::new(2), CartesianShell::new(1));
    assert_eq!(pair.to_string(), "|d p)");
    assert_eq!(pair[1], CartesianShell::new(1));
  }
}
