/*!

Integral sets: the domain quantities of the graph.

A `GenIntegralSet<F>` is the set of integrals `<bra| oper |ket>` with auxiliary index `aux`, where the family `F` fixes
the basis function set type, the operator type, the auxiliary index type, the shape of the brakets, and two policy
decisions that only the family can make:

 - `auto_unroll`: must this quantity always be reduced by a recurrence relation, rather than being left opaque?
 - `this_precomputed`: is this exact quantity available without derivation?

Integral sets are never constructed directly into the graph. `GenIntegralSet::instance` computes the structural key and
asks the context for the canonical vertex, building a candidate only when the key is new. A candidate whose brakets do
not match the family's shape fails with `DagError::InvalidArity` and is never registered.

Inside the graph an integral set is stored behind the object-safe `IntegralClass` trait, which lets one graph hold
several families at once. Use `DagContext::integral::<F>` to get the typed set back.

*/

use std::{
  any::{Any, TypeId},
  fmt::{Display, Formatter},
};

use crate::{
  abstractions::IString,
  api::{
    basis::{AuxIndex, BasisFunctionSet, IntegralOperator},
    braket::VectorBraket,
    vertex::{VertexId, VertexPayload},
  },
  core::{
    context::DagContext,
    error::{BraketSide, DagError},
    format::{FormatStyle, Formattable},
    registry::{IntegralKey, StructuralKey},
  },
};

/// How many basis function sets each particle carries, on each side.
pub trait BraketShape: 'static {
  const NAME: &'static str;
  const BRA : &'static [usize];
  const KET : &'static [usize];
}

/// One function per particle in bra and ket, two particles: `<a b|c d>`.
pub struct Shape11_11;

impl BraketShape for Shape11_11 {
  const NAME: &'static str = "11_11";
  const BRA : &'static [usize] = &[1, 1];
  const KET : &'static [usize] = &[1, 1];
}

/// One function on each side, one particle: `<a|b>`.
pub struct Shape1_1;

impl BraketShape for Shape1_1 {
  const NAME: &'static str = "1_1";
  const BRA : &'static [usize] = &[1];
  const KET : &'static [usize] = &[1];
}

pub trait IntegralFamily: Sized + 'static {
  type Bfs  : BasisFunctionSet;
  type Oper : IntegralOperator;
  type Aux  : AuxIndex;
  type Shape: BraketShape;

  const NAME: &'static str;

  fn auto_unroll(set: &GenIntegralSet<Self>) -> bool;

  fn this_precomputed(set: &GenIntegralSet<Self>) -> bool;
}

pub struct GenIntegralSet<F: IntegralFamily> {
  oper : F::Oper,
  bra  : VectorBraket<F::Bfs>,
  ket  : VectorBraket<F::Bfs>,
  aux  : F::Aux,
  label: IString,
}

impl<F: IntegralFamily> GenIntegralSet<F> {
  /// Validates the brakets against `F::Shape`. Only `instance` should call this; a set built here is a candidate
  /// that has no identity until the context registers it.
  pub(crate) fn new(
    oper: F::Oper,
    bra : VectorBraket<F::Bfs>,
    ket : VectorBraket<F::Bfs>,
    aux : F::Aux
  ) -> Result<Self, DagError> {
    // The operator decides how many particles the brakets must describe.
    if oper.num_particles() != F::Shape::BRA.len() {
      return Err(DagError::InvalidParticleCount {
        family  : F::NAME,
        side    : BraketSide::Bra,
        expected: oper.num_particles(),
        found   : F::Shape::BRA.len(),
      });
    }
    Self::check_side(BraketSide::Bra, &bra, F::Shape::BRA)?;
    Self::check_side(BraketSide::Ket, &ket, F::Shape::KET)?;

    let label = IString::from(
      format!("<{}|{}|{}>{}", bra.label(), oper.label(), ket.label(), aux.label())
    );
    Ok(GenIntegralSet { oper, bra, ket, aux, label })
  }

  fn check_side(side: BraketSide, braket: &VectorBraket<F::Bfs>, shape: &[usize]) -> Result<(), DagError> {
    for (particle, expected) in shape.iter().enumerate() {
      let found = braket.num_members(particle);
      if found != *expected {
        return Err(DagError::InvalidArity {
          family: F::NAME,
          side,
          particle,
          expected: *expected,
          found
        });
      }
    }
    if braket.num_part() != shape.len() {
      return Err(DagError::InvalidParticleCount {
        family  : F::NAME,
        side,
        expected: shape.len(),
        found   : braket.num_part()
      });
    }
    Ok(())
  }

  /// The key an integral with these parameters is registered under. Depends on the parameters only.
  pub fn compute_key(
    oper: &F::Oper,
    bra : &VectorBraket<F::Bfs>,
    ket : &VectorBraket<F::Bfs>,
    aux : &F::Aux
  ) -> StructuralKey {
    StructuralKey::Integral(IntegralKey {
      family: TypeId::of::<F>(),
      oper  : IString::from(format!("{:?}", oper)),
      bra   : IString::from(bra.key_string()),
      ket   : IString::from(ket.key_string()),
      aux   : IString::from(format!("{:?}", aux)),
    })
  }

  /// Returns the canonical vertex for these parameters, constructing and registering it on first request.
  ///
  /// The argument order (bra, ket, aux, oper) follows how often each is varied in practice, not the logical
  /// `<bra|oper|ket>` order.
  pub fn instance(
    ctx : &mut DagContext,
    bra : VectorBraket<F::Bfs>,
    ket : VectorBraket<F::Bfs>,
    aux : F::Aux,
    oper: F::Oper
  ) -> Result<VertexId, DagError> {
    let key = Self::compute_key(&oper, &bra, &ket, &aux);
    ctx.get_or_insert(key, move || {
      let set = GenIntegralSet::<F>::new(oper, bra, ket, aux)?;
      Ok(VertexPayload::Integral(Box::new(set)))
    })
  }

  // region Accessors

  #[inline(always)]
  pub fn oper(&self) -> &F::Oper {
    &self.oper
  }

  #[inline(always)]
  pub fn bra(&self) -> &VectorBraket<F::Bfs> {
    &self.bra
  }

  #[inline(always)]
  pub fn ket(&self) -> &VectorBraket<F::Bfs> {
    &self.ket
  }

  #[inline(always)]
  pub fn aux(&self) -> &F::Aux {
    &self.aux
  }

  // endregion Accessors
}

impl<F: IntegralFamily> PartialEq for GenIntegralSet<F> {
  fn eq(&self, other: &Self) -> bool {
    self.oper == other.oper && self.bra == other.bra && self.ket == other.ket && self.aux == other.aux
  }
}

impl<F: IntegralFamily> Eq for GenIntegralSet<F> {}

impl<F: IntegralFamily> Display for GenIntegralSet<F> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.label)
  }
}

impl<F: IntegralFamily> Formattable for GenIntegralSet<F> {
  fn repr(&self, style: FormatStyle) -> String {
    match style {
      FormatStyle::Simple  => self.label.to_string(),
      FormatStyle::Default => {
        format!(
          "{} <{}| {} |{}>{}",
          F::NAME,
          self.bra.description(),
          self.oper.description(),
          self.ket.description(),
          self.aux.label()
        )
      }
      FormatStyle::Debug => format!("{}_{}<{}>", F::NAME, F::Shape::NAME, self.label),
    }
  }
}

/// The object-safe face of an integral set, as stored in a vertex.
pub trait IntegralClass: Any {
  fn as_any(&self) -> &dyn Any;

  fn family_name(&self) -> &'static str;

  fn label(&self) -> IString;

  fn description(&self) -> String;

  /// Number of integrals in the set.
  fn size(&self) -> usize;

  fn key(&self) -> StructuralKey;

  /// Same family and same parameters.
  fn equiv(&self, other: &dyn IntegralClass) -> bool;

  fn auto_unroll(&self) -> bool;

  fn this_precomputed(&self) -> bool;

  fn repr(&self, style: FormatStyle) -> String;
}

impl<F: IntegralFamily> IntegralClass for GenIntegralSet<F> {
  fn as_any(&self) -> &dyn Any {
    self
  }

  fn family_name(&self) -> &'static str {
    F::NAME
  }

  fn label(&self) -> IString {
    self.label.clone()
  }

  fn description(&self) -> String {
    Formattable::repr(self, FormatStyle::Default)
  }

  fn size(&self) -> usize {
    self.bra.size() * self.ket.size()
  }

  fn key(&self) -> StructuralKey {
    Self::compute_key(&self.oper, &self.bra, &self.ket, &self.aux)
  }

  fn equiv(&self, other: &dyn IntegralClass) -> bool {
    other.as_any()
         .downcast_ref::<GenIntegralSet<F>>()
         .map_or(false, |other| self == other)
  }

  fn auto_unroll(&self) -> bool {
    F::auto_unroll(self)
  }

  fn this_precomputed(&self) -> bool {
    F::this_precomputed(self)
  }

  fn repr(&self, style: FormatStyle) -> String {
    Formattable::repr(self, style)
  }
}
