/*!

The public API of the library: the quantities that appear in the graph, how they are composed, and the contract with
the recurrence-relation libraries that grow it.

*/

pub mod algebra;
pub mod basis;
pub mod braket;
pub mod integral;
mod integral_11_11;
pub mod linear_combination;
pub mod recurrence;
pub mod scalar;
pub mod tactic;
pub mod vertex;

// Reexports of the names nearly every client needs
pub use algebra::{OperatorType, Wedge, WedgeProduct};
pub use integral::{GenIntegralSet, IntegralFamily};
pub use linear_combination::LinearCombination;
pub use vertex::{VertexId, VertexKind};
