/*!

An arena of `Vertex` slots with a free list.

Slots are reused after a vertex is reclaimed, but every vertex gets a fresh serial from a process-wide counter, and a
`VertexId` only resolves when both its index and its serial match the occupant. Clearing the arena therefore needs no
epoch bookkeeping: handles from before the clear can never match again.

*/

use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
  api::vertex::{Vertex, VertexId, VertexPayload},
  core::error::DagError,
};

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

#[inline(always)]
fn next_serial() -> u64 {
  NEXT_SERIAL.fetch_add(1, Ordering::Relaxed)
}

#[derive(Default)]
pub struct VertexArena {
  slots: Vec<Option<Vertex>>,
  free : Vec<u32>,
  live : usize,
}

impl VertexArena {
  pub fn new() -> Self {
    Self::default()
  }

  /// Moves `payload` into a vacant slot under a new serial.
  pub fn insert(&mut self, payload: VertexPayload) -> VertexId {
    let serial = next_serial();
    let vertex = Vertex::new(serial, payload);
    self.live += 1;

    match self.free.pop() {
      Some(index) => {
        self.slots[index as usize] = Some(vertex);
        VertexId { index, serial }
      }
      None => {
        let index = self.slots.len() as u32;
        self.slots.push(Some(vertex));
        VertexId { index, serial }
      }
    }
  }

  pub fn get(&self, id: VertexId) -> Result<&Vertex, DagError> {
    match self.slots.get(id.index()) {
      Some(Some(vertex)) if vertex.serial == id.serial => Ok(vertex),
      _ => Err(DagError::StaleVertex(id)),
    }
  }

  pub fn get_mut(&mut self, id: VertexId) -> Result<&mut Vertex, DagError> {
    match self.slots.get_mut(id.index()) {
      Some(Some(vertex)) if vertex.serial == id.serial => Ok(vertex),
      _ => Err(DagError::StaleVertex(id)),
    }
  }

  #[inline(always)]
  pub fn contains(&self, id: VertexId) -> bool {
    self.get(id).is_ok()
  }

  /// The live occupant of slot `index`, if any. Entry arcs are stored as slot indices, so this is how they are
  /// turned back into handles.
  pub fn id_at(&self, index: usize) -> Option<VertexId> {
    self.slots
        .get(index)
        .and_then(|slot| slot.as_ref())
        .map(|vertex| VertexId { index: index as u32, serial: vertex.serial })
  }

  /// Takes the vertex out of its slot and puts the slot on the free list.
  pub fn remove(&mut self, id: VertexId) -> Result<Vertex, DagError> {
    self.get(id)?;
    let vertex = self.slots[id.index()].take().ok_or(DagError::StaleVertex(id))?;
    self.free.push(id.index);
    self.live -= 1;
    Ok(vertex)
  }

  pub fn clear(&mut self) {
    self.slots.clear();
    self.free.clear();
    self.live = 0;
  }

  /// Number of live vertices.
  #[inline(always)]
  pub fn len(&self) -> usize {
    self.live
  }

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.live == 0
  }

  /// Live vertices in slot order.
  pub fn iter(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
    self.slots
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| {
          slot.as_ref()
              .map(|vertex| (VertexId { index: index as u32, serial: vertex.serial }, vertex))
        })
  }
}
