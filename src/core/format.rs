/*!

Vertices are rendered differently depending on who is asking: the emitter wants short labels, structural comparison
wants the full recursive description, and a human debugging the graph wants handles and flags. This module provides
the shared vocabulary for that.

Payload types implement `Formattable` on their own. Rendering a whole vertex needs the context, because an operator's
description nests the descriptions of its operands; see `DagContext::repr`.

*/

use std::fmt::Display;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum FormatStyle {
  #[default]
  Default, // Full description, recursively
  Simple,  // The label only
  Debug,   // Handles, kinds and flags
}

pub trait Formattable {
  /// Writes a text representation of `self` according to the given `FormatStyle`.
  fn repr(&self, style: FormatStyle) -> String;
}

impl Display for dyn Formattable {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", Formattable::repr(self, FormatStyle::Default))
  }
}
