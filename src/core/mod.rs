/*!

The graph engine behind the API: vertex storage, the interning registry, and the per-run `DagContext` that ties them
together and enforces the ownership and arc invariants.

|                 | what it holds                                  | who mutates it                      |
|:----------------|:-----------------------------------------------|:------------------------------------|
| `VertexArena`   | every live vertex, addressed by `VertexId`     | `DagContext` only                   |
| `Registry`      | structural key to canonical vertex             | `get_or_insert`, `unregister`       |
| `DagContext`    | arena, registry, roots, anomalies, config      | clients, relation libraries, tactics |

*/

pub(crate) mod allocator;
pub mod config;
pub mod context;
pub mod error;
pub mod expand;
pub mod format;
pub mod registry;

// Reexports to flatten some of the smaller modules
pub use config::{DagConfig, EquivalencePolicy};
pub use context::{DagContext, IdentityAnomaly};
pub use error::{BraketSide, DagError};
pub use expand::ExpansionSummary;
pub use format::{FormatStyle, Formattable};
pub use registry::StructuralKey;
