/*!

Construction shortcuts for two-particle integral sets with one basis function set per particle on each side, the
`<a b|c d>` shape of electron repulsion integrals. All of them normalize their arguments into a bra and a ket and go
through `GenIntegralSet::instance`.

*/

use crate::{
  api::{
    algebra::Wedge,
    braket::{BraketPair, CBra, CKet, PBra, PKet, VectorBraket},
    integral::{GenIntegralSet, IntegralFamily, Shape11_11},
    vertex::VertexId,
  },
  core::{context::DagContext, error::DagError},
};

impl<F> GenIntegralSet<F>
where
    F: IntegralFamily<Shape = Shape11_11>,
{
  /// From four basis function sets in Mulliken order, `(bra0 ket0|bra1 ket1)`.
  ///
  /// The order is the practical one (functions of particle 0 first), not the logical `<bra0 bra1|ket0 ket1>` one.
  pub fn instance_from_bfs(
    ctx : &mut DagContext,
    bra0: F::Bfs,
    ket0: F::Bfs,
    bra1: F::Bfs,
    ket1: F::Bfs,
    aux : F::Aux,
    oper: F::Oper
  ) -> Result<VertexId, DagError> {
    let bra = VectorBraket::from_singles([bra0, bra1]);
    let ket = VectorBraket::from_singles([ket0, ket1]);
    Self::instance(ctx, bra, ket, aux, oper)
  }

  /// From a wedge of physicists' brakets, `<bra0 bra1| ^ |ket0 ket1>`.
  pub fn instance_from_physicists(
    ctx   : &mut DagContext,
    braket: &Wedge<BraketPair<F::Bfs, PBra>, BraketPair<F::Bfs, PKet>>,
    aux   : F::Aux,
    oper  : F::Oper
  ) -> Result<VertexId, DagError> {
    Self::instance_from_bfs(
      ctx,
      braket.left[0].clone(),
      braket.right[0].clone(),
      braket.left[1].clone(),
      braket.right[1].clone(),
      aux,
      oper
    )
  }

  /// From a wedge of chemists' brakets, `(bra0 ket0| ^ |bra1 ket1)`.
  pub fn instance_from_chemists(
    ctx   : &mut DagContext,
    braket: &Wedge<BraketPair<F::Bfs, CBra>, BraketPair<F::Bfs, CKet>>,
    aux   : F::Aux,
    oper  : F::Oper
  ) -> Result<VertexId, DagError> {
    Self::instance_from_bfs(
      ctx,
      braket.left[0].clone(),
      braket.left[1].clone(),
      braket.right[0].clone(),
      braket.right[1].clone(),
      aux,
      oper
    )
  }
}
