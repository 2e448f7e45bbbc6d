/*!

Types/type aliases that abstract over the implementing backing type, so the rest of the crate names a concept
(an interned string, a set of small naturals) rather than the crate that happens to provide it.

*/

mod string_join;

pub mod log;

// A set of natural numbers. Used for entry-arc sets keyed by arena index.
pub type NatSet = bit_set::BitSet;

// Interned string. Labels and structural key components are interned.
pub use string_cache::DefaultAtom as IString;

// Join sequences with a separator
pub use string_join::{join_string, join_with};
