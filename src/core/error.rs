/*!

Errors raised while building the graph. All of them are synchronous and leave the graph as it was before the failing
call: a candidate that fails validation is never registered, and a rejected arc mutation changes nothing.

Identity anomalies (equivalent operands with different identities) are deliberately *not* errors. They are reported
through the log and recorded on the context; see `DagContext::anomalies`.

*/

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

use crate::api::vertex::VertexId;

/// Which side of an integral an arity violation was found on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BraketSide {
  Bra,
  Ket,
}

impl Display for BraketSide {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      BraketSide::Bra => write!(f, "bra"),
      BraketSide::Ket => write!(f, "ket"),
    }
  }
}

#[derive(Clone, Eq, PartialEq)]
pub enum DagError {
  /// An integral's bra or ket does not have the shape its family requires.
  InvalidArity {
    family  : &'static str,
    side    : BraketSide,
    particle: usize,
    expected: usize,
    found   : usize,
  },
  /// The bra or ket has the wrong number of particles altogether, or the operator couples a different number of
  /// particles than the braket shape describes.
  InvalidParticleCount {
    family  : &'static str,
    side    : BraketSide,
    expected: usize,
    found   : usize,
  },
  /// An arc operation the vertex kind forbids, or one that would break the graph.
  InvalidMutation {
    vertex: VertexId,
    reason: String,
  },
  /// Replacement operands are not equivalent to the ones they replace.
  InvalidOperand {
    operator: VertexId,
    operand : VertexId,
  },
  /// The handle refers to a vertex that was reclaimed, or to a previous run.
  StaleVertex(VertexId),
  /// The vertex exists but is not of the requested kind or family.
  WrongKind {
    vertex  : VertexId,
    expected: &'static str,
  },
  /// A vertex that must be unrolled has no applicable recurrence relation.
  NoRecurrence {
    vertex: VertexId,
    label : String,
  },
}

impl Display for DagError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {

      DagError::InvalidArity { family, side, particle, expected, found } => {
        write!(
          f,
          "{}: number of basis function sets in {} for particle {} must be {}, found {}",
          family, side, particle, expected, found
        )
      }

      DagError::InvalidParticleCount { family, side, expected, found } => {
        write!(f, "{}: {} must describe {} particles, found {}", family, side, expected, found)
      }

      DagError::InvalidMutation { vertex, reason } => {
        write!(f, "invalid mutation of vertex {}: {}", vertex, reason)
      }

      DagError::InvalidOperand { operator, operand } => {
        write!(
          f,
          "vertex {} is not equivalent to any operand of operator {}",
          operand, operator
        )
      }

      DagError::StaleVertex(vertex) => {
        write!(f, "vertex {} is not live in this context", vertex)
      }

      DagError::WrongKind { vertex, expected } => {
        write!(f, "vertex {} is not a {}", vertex, expected)
      }

      DagError::NoRecurrence { vertex, label } => {
        write!(f, "no recurrence relation applies to {} ({}), which must be unrolled", label, vertex)
      }

    } // end match on `DagError`
  }
}

impl Debug for DagError {
  fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
    Display::fmt(self, f)
  }
}

impl Error for DagError {}
