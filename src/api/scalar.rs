/*!

Named scalar quantities that show up as factors in recurrence right-hand sides: geometric intermediates such as
`PA_x` or `oo2z` that the generated kernel receives at run time, and literal constants known when the kernel is
generated. Both are leaves: always precomputed, never expanded. A scalar is interned by name and origin, so a
runtime `1` and a literal `1` are different vertices.

*/

use std::fmt::{Display, Formatter};

use crate::{
  abstractions::IString,
  core::format::{FormatStyle, Formattable},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ScalarOrigin {
  /// Supplied to the kernel at run time.
  Runtime,
  /// Known when the kernel is generated; emitted as a literal.
  CompileTime,
}

impl Display for ScalarOrigin {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      ScalarOrigin::Runtime     => write!(f, "rt"),
      ScalarOrigin::CompileTime => write!(f, "ct"),
    }
  }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ScalarEntity {
  name  : IString,
  origin: ScalarOrigin,
}

impl ScalarEntity {
  pub fn runtime(name: &str) -> Self {
    ScalarEntity { name: IString::from(name), origin: ScalarOrigin::Runtime }
  }

  pub fn compile_time(name: &str) -> Self {
    ScalarEntity { name: IString::from(name), origin: ScalarOrigin::CompileTime }
  }

  #[inline(always)]
  pub fn name(&self) -> &IString {
    &self.name
  }

  #[inline(always)]
  pub fn origin(&self) -> ScalarOrigin {
    self.origin
  }
}

impl Display for ScalarEntity {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name)
  }
}

impl Formattable for ScalarEntity {
  fn repr(&self, style: FormatStyle) -> String {
    match style {
      FormatStyle::Debug => format!("scalar<{}:{}>", self.name, self.origin),
      _ => self.name.to_string(),
    }
  }
}
