/*!

Binary algebraic operators and the wedge product.

An `AlgebraicOperator` is `left op right` where `op` is one of `+ - * /`. Inside the graph the operands are vertex
handles, `AlgebraicOperator<VertexId>`, and the context wires one exit arc per operand when the operator is
registered. The operands are fixed slots: the only permitted arc mutation on an operator is rebinding a slot to an
equivalent vertex (`DagContext::add_exit_arc`), and clearing its arcs is always refused.

`Wedge` holds the result of composing two terms with `^`. Term types opt in by implementing `WedgeProduct`.

*/

use std::fmt::{Display, Formatter};

use crate::{
  abstractions::IString,
  core::format::{FormatStyle, Formattable},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum OperatorType {
  Plus,
  Minus,
  Times,
  Divide,
}

impl OperatorType {
  pub const ALL: [OperatorType; 4] = [
    OperatorType::Plus,
    OperatorType::Minus,
    OperatorType::Times,
    OperatorType::Divide
  ];

  pub fn symbol(self) -> &'static str {
    match self {
      OperatorType::Plus   => "+",
      OperatorType::Minus  => "-",
      OperatorType::Times  => "*",
      OperatorType::Divide => "/",
    }
  }
}

impl Display for OperatorType {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.symbol())
  }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct AlgebraicOperator<T> {
  operator_type: OperatorType,
  left         : T,
  right        : T,
  label        : IString,
}

impl<T> AlgebraicOperator<T> {
  pub fn new(operator_type: OperatorType, left: T, right: T) -> Self {
    AlgebraicOperator {
      operator_type,
      left,
      right,
      label: IString::from(operator_type.symbol()),
    }
  }

  /// Copies everything but the operands from `self`.
  pub fn with_operands(&self, left: T, right: T) -> Self {
    AlgebraicOperator {
      operator_type: self.operator_type,
      left,
      right,
      label: self.label.clone(),
    }
  }

  // region Accessors

  #[inline(always)]
  pub fn operator_type(&self) -> OperatorType {
    self.operator_type
  }

  #[inline(always)]
  pub fn left(&self) -> &T {
    &self.left
  }

  #[inline(always)]
  pub fn right(&self) -> &T {
    &self.right
  }

  #[inline(always)]
  pub fn label(&self) -> &IString {
    &self.label
  }

  /// An operator always produces a single value.
  #[inline(always)]
  pub fn size(&self) -> usize {
    1
  }

  pub(crate) fn set_left(&mut self, left: T) {
    self.left = left;
  }

  pub(crate) fn set_right(&mut self, right: T) {
    self.right = right;
  }

  // endregion Accessors
}

impl<T: Display> Formattable for AlgebraicOperator<T> {
  fn repr(&self, style: FormatStyle) -> String {
    match style {
      FormatStyle::Simple => self.label.to_string(),
      FormatStyle::Debug  => format!("op<{}>({}, {})", self.label, self.left, self.right),
      FormatStyle::Default => {
        format!("( ( {} ) {} ( {} ) )", self.left, self.operator_type.symbol(), self.right)
      }
    }
  }
}

/// The result of `left ^ right`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Wedge<L, R> {
  pub left : L,
  pub right: R,
}

impl<L, R> Wedge<L, R> {
  pub fn new(left: L, right: R) -> Self {
    Wedge { left, right }
  }
}

pub fn make_wedge<L, R>(left: L, right: R) -> Wedge<L, R> {
  Wedge::new(left, right)
}

impl<L: Display, R: Display> Display for Wedge<L, R> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} ^ {}", self.left, self.right)
  }
}

/// How two terms compose under `^`. Any term type used in a wedge of linear combinations supplies this.
pub trait WedgeProduct<Rhs = Self> {
  type Output;

  fn wedge(&self, rhs: &Rhs) -> Self::Output;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn operator_labels_and_description() {
    let op = AlgebraicOperator::new(OperatorType::Times, "PA_x", "(ss|ss)");
    assert_eq!(&**op.label(), "*");
    assert_eq!(op.size(), 1);
    assert_eq!(op.repr(FormatStyle::Default), "( ( PA_x ) * ( (ss|ss) ) )");
    assert_eq!(op.repr(FormatStyle::Simple), "*");
  }

  #[test]
  fn with_operands_keeps_metadata() {
    let op = AlgebraicOperator::new(OperatorType::Divide, 1, 2);
    let copy = op.with_operands(3, 4);
    assert_eq!(copy.operator_type(), OperatorType::Divide);
    assert_eq!(copy.label(), op.label());
    assert_eq!((*copy.left(), *copy.right()), (3, 4));
  }

  #[test]
  fn symbols() {
    let symbols: Vec<&str> = OperatorType::ALL.iter().map(|t| t.symbol()).collect();
    assert_eq!(symbols, ["+", "-", "*", "/"]);
  }
}
