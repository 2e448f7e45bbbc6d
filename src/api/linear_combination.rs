/*!

An ordered list of `(coefficient, term)` pairs. Order matters only for deterministic rendering.

The wedge of two combinations is their outer product: one entry per pair `(l, r)` in row-major order, with coefficient
`c_l * c_r` and term `t_l ^ t_r`. This is how a two-particle quantity is assembled from one-particle pieces.

```
use intdag::api::{algebra::WedgeProduct, linear_combination::LinearCombination};

#[derive(Clone, Debug, PartialEq)]
struct Axis(char);

impl WedgeProduct for Axis {
  type Output = String;
  fn wedge(&self, rhs: &Axis) -> String { format!("{}{}", self.0, rhs.0) }
}

let mut l = LinearCombination::new();
l.push(2, Axis('x'));
l.push(3, Axis('y'));
let mut r = LinearCombination::new();
r.push(5, Axis('z'));

let w = &l ^ &r;
assert_eq!(w.len(), 2);
assert_eq!(w[1], (15, "yz".to_string()));
```

*/

use std::ops::{BitXor, Index, Mul};

use crate::api::algebra::WedgeProduct;

#[derive(Clone, Debug, PartialEq)]
pub struct LinearCombination<C, T> {
  data: Vec<(C, T)>,
}

impl<C, T> Default for LinearCombination<C, T> {
  fn default() -> Self {
    LinearCombination { data: Vec::new() }
  }
}

impl<C, T> LinearCombination<C, T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a term. No deduplication.
  pub fn push(&mut self, coefficient: C, term: T) -> &mut Self {
    self.data.push((coefficient, term));
    self
  }

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.data.len()
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn get(&self, i: usize) -> Option<&(C, T)> {
    self.data.get(i)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, (C, T)> {
    self.data.iter()
  }
}

impl<C, T> LinearCombination<C, T>
where
    C: Clone + Mul<Output = C>,
{
  /// Outer product with `rhs`. See the module documentation.
  pub fn wedge<Tr>(&self, rhs: &LinearCombination<C, Tr>) -> LinearCombination<C, T::Output>
  where
      T: WedgeProduct<Tr>,
  {
    let mut data = Vec::with_capacity(self.len() * rhs.len());
    for (cl, tl) in &self.data {
      for (cr, tr) in &rhs.data {
        data.push((cl.clone() * cr.clone(), tl.wedge(tr)));
      }
    }
    LinearCombination { data }
  }
}

/// Wedges a bare term against every entry of `rhs`, keeping the coefficients as they are (the bare term acts as a
/// singleton combination with unit coefficient).
pub fn wedge_term<C, Tl, Tr>(lhs: &Tl, rhs: &LinearCombination<C, Tr>) -> LinearCombination<C, Tl::Output>
where
    C : Clone,
    Tl: WedgeProduct<Tr>,
{
  LinearCombination {
    data: rhs.data
             .iter()
             .map(|(c, t)| (c.clone(), lhs.wedge(t)))
             .collect()
  }
}

impl<'a, 'b, C, Tl, Tr> BitXor<&'b LinearCombination<C, Tr>> for &'a LinearCombination<C, Tl>
where
    C : Clone + Mul<Output = C>,
    Tl: WedgeProduct<Tr>,
{
  type Output = LinearCombination<C, Tl::Output>;

  fn bitxor(self, rhs: &'b LinearCombination<C, Tr>) -> Self::Output {
    self.wedge(rhs)
  }
}

impl<C, T> Index<usize> for LinearCombination<C, T> {
  type Output = (C, T);

  fn index(&self, index: usize) -> &Self::Output {
    &self.data[index]
  }
}

impl<C, T> FromIterator<(C, T)> for LinearCombination<C, T> {
  fn from_iter<I: IntoIterator<Item = (C, T)>>(iter: I) -> Self {
    LinearCombination { data: iter.into_iter().collect() }
  }
}

impl<'a, C, T> IntoIterator for &'a LinearCombination<C, T> {
  type Item = &'a (C, T);
  type IntoIter = std::slice::Iter<'a, (C, T)>;

  fn into_iter(self) -> Self::IntoIter {
    self.data.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::algebra::{make_wedge, Wedge};

  #[derive(Clone, Debug, PartialEq)]
  struct Term(&'static str);

  impl WedgeProduct for Term {
    type Output = Wedge<Term, Term>;

    fn wedge(&self, rhs: &Term) -> Self::Output {
      make_wedge(self.clone(), rhs.clone())
    }
  }

  fn combination(entries: &[(i64, &'static str)]) -> LinearCombination<i64, Term> {
    entries.iter().map(|(c, t)| (*c, Term(*t))).collect()
  }

  #[test]
  fn push_appends_without_dedup() {
    let mut lc = LinearCombination::new();
    lc.push(1, Term("a")).push(1, Term("a"));
    assert_eq!(lc.len(), 2);
    assert_eq!(lc[0], lc[1]);
  }

  #[test]
  fn wedge_cardinality_and_order() {
    let l = combination(&[(2, "a"), (3, "b"), (5, "c")]);
    let r = combination(&[(7, "x"), (11, "y")]);

    let w = &l ^ &r;
    assert_eq!(w.len(), 6);

    let rendered: Vec<(i64, &str, &str)> = w.iter()
                                            .map(|(c, t)| (*c, t.left.0, t.right.0))
                                            .collect();
    assert_eq!(
      rendered,
      vec![
        (14, "a", "x"), (22, "a", "y"),
        (21, "b", "x"), (33, "b", "y"),
        (35, "c", "x"), (55, "c", "y"),
      ]
    );
  }

  #[test]
  fn wedge_with_empty_is_empty() {
    let l = combination(&[(2, "a")]);
    let r: LinearCombination<i64, Term> = LinearCombination::new();
    assert!((&l ^ &r).is_empty());
    assert!((&r ^ &l).is_empty());
  }

  #[test]
  fn bare_term_wedge_keeps_coefficients() {
    let r = combination(&[(7, "x"), (11, "y")]);
    let w = wedge_term(&Term("a"), &r);
    assert_eq!(w.len(), 2);
    assert_eq!(w[0].0, 7);
    assert_eq!(w[1].0, 11);
    assert_eq!(w[1].1, make_wedge(Term("a"), Term("y")));
  }
}
