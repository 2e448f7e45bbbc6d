/*!
Storage for vertices. Every vertex of a context lives in one `VertexArena`; ownership counting and reclamation are
done by `DagContext`, which is the only code that moves vertices in and out of the arena.
*/
mod arena;

#[cfg(test)]
mod tests;

pub use arena::VertexArena;
