/*!

`DagContext` owns everything belonging to one run: the vertex arena, the interning registry, the root set, and the
identity anomalies recorded so far. There are no global graph tables; two contexts never share vertices.

# Ownership

Each vertex carries an owner count. The registry entry, each incoming arc, each client `retain`, and membership in
the root set count as one owner each. When the count reaches zero the vertex is reclaimed and releases its own exit
arcs, which may cascade. Reclamation is iterative, so deep chains do not recurse.

# Interning

`get_or_insert` is the only way a payload enters the arena. The constructor closure builds a payload and nothing
else: it has no access to the context, so it cannot re-enter the registry for the same key, and if it fails nothing
has been touched. Operand arcs are wired before the key becomes visible.

```
use intdag::core::{context::DagContext, format::FormatStyle};

let mut ctx = DagContext::default();
let a = ctx.runtime_scalar("a").unwrap();
let b = ctx.runtime_scalar("b").unwrap();
let sum = ctx.plus(a, b).unwrap();

assert_eq!(ctx.plus(a, b).unwrap(), sum);
assert_eq!(ctx.repr(sum, FormatStyle::Default).unwrap(), "( ( a ) + ( b ) )");
```

*/

use std::{
  cell::{Ref, RefCell},
  fmt::{Display, Formatter},
};

use crate::{
  abstractions::{IString, NatSet},
  api::{
    algebra::{AlgebraicOperator, OperatorType},
    integral::{GenIntegralSet, IntegralFamily},
    scalar::ScalarEntity,
    vertex::{Vertex, VertexFlag, VertexId, VertexKind, VertexPayload},
  },
  core::{
    allocator::VertexArena,
    config::{DagConfig, EquivalencePolicy},
    error::DagError,
    format::{FormatStyle, Formattable},
    registry::{Registry, StructuralKey},
  },
  log::{critical, debug, info, trace, warning},
};

/// Two operands that are structurally equivalent but are different vertices, found while comparing operators under
/// the reference policy. Under a working registry this cannot happen, so each one points at a vertex that was
/// unregistered and reconstructed while the old instance was still in use.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdentityAnomaly {
  pub operator   : VertexId,
  pub other      : VertexId,
  pub first      : VertexId,
  pub second     : VertexId,
  pub description: String,
}

impl Display for IdentityAnomaly {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "operators {} and {} have equivalent operands {} and {} with different identities: {}",
      self.operator, self.other, self.first, self.second, self.description
    )
  }
}

pub struct DagContext {
  config   : DagConfig,
  arena    : VertexArena,
  registry : Registry,
  roots    : Vec<VertexId>,
  anomalies: RefCell<Vec<IdentityAnomaly>>,
}

impl Default for DagContext {
  fn default() -> Self {
    DagContext::new(DagConfig::default())
  }
}

impl DagContext {
  pub fn new(config: DagConfig) -> Self {
    DagContext {
      config,
      arena    : VertexArena::new(),
      registry : Registry::new(),
      roots    : Vec::new(),
      anomalies: RefCell::new(Vec::new()),
    }
  }

  #[inline(always)]
  pub fn config(&self) -> &DagConfig {
    &self.config
  }

  #[inline(always)]
  pub fn policy(&self) -> EquivalencePolicy {
    self.config.policy
  }

  // region Registry

  pub fn find(&self, key: &StructuralKey) -> Option<VertexId> {
    self.registry.find(key)
  }

  /// Returns the vertex registered under `key`, or builds one with `constructor`, registers it, and returns it.
  ///
  /// A failed constructor leaves the context untouched. Operands named by the payload must be live.
  pub fn get_or_insert<C>(&mut self, key: StructuralKey, constructor: C) -> Result<VertexId, DagError>
    where C: FnOnce() -> Result<VertexPayload, DagError>
  {
    if let Some(existing) = self.registry.find(&key) {
      return Ok(existing);
    }

    let payload  = constructor()?;
    let operands = payload.operands();
    for operand in &operands {
      self.arena.get(*operand)?;
    }

    let id = self.arena.insert(payload);
    for operand in operands {
      self.link(id, operand)?;
    }
    {
      let vertex = self.arena.get_mut(id)?;
      vertex.key = Some(key.clone());
      vertex.flags.insert(VertexFlag::Registered);
      vertex.owners += 1;
    }
    info!(3, "registered {} as {}", key, id);

    // The key was vacant above and nothing since could have filled it.
    if let Err(existing) = self.registry.insert(key, id) {
      critical!(0, "registry key for {} was taken by {} during construction", id, existing);
    }
    Ok(id)
  }

  /// Removes the registry's mapping for `id` and the registry's ownership of it. The vertex lives on while anything
  /// else owns it; the next request for the same key constructs a new instance.
  pub fn unregister(&mut self, id: VertexId) -> Result<(), DagError> {
    let vertex = self.arena.get_mut(id)?;
    if !vertex.is_registered() {
      return Ok(());
    }
    vertex.flags.remove(VertexFlag::Registered);
    if let Some(key) = vertex.key.take() {
      self.registry.remove(&key, id);
      info!(2, "unregistered {} ({})", id, key);
    }
    self.drop_owner(id)
  }

  /// Clears every vertex, registry entry, root, and recorded anomaly. Handles issued before the reset are stale
  /// afterward.
  pub fn reset(&mut self) {
    info!(
      1,
      "resetting context: {} vertices, {} registered, {} roots",
      self.arena.len(),
      self.registry.len(),
      self.roots.len()
    );
    self.arena.clear();
    self.registry.clear();
    self.roots.clear();
    self.anomalies.borrow_mut().clear();
  }

  // endregion Registry

  // region Builders

  pub fn scalar(&mut self, scalar: ScalarEntity) -> Result<VertexId, DagError> {
    let key = StructuralKey::Scalar { name: scalar.name().clone(), origin: scalar.origin() };
    self.get_or_insert(key, move || Ok(VertexPayload::Scalar(scalar)))
  }

  pub fn runtime_scalar(&mut self, name: &str) -> Result<VertexId, DagError> {
    self.scalar(ScalarEntity::runtime(name))
  }

  /// Interns `left op right` under the key the configured policy prescribes.
  pub fn operator(
    &mut self,
    operator_type: OperatorType,
    left         : VertexId,
    right        : VertexId
  ) -> Result<VertexId, DagError> {
    let key = self.operator_key(operator_type, left, right)?;
    self.get_or_insert(key, move || {
      Ok(VertexPayload::Operator(AlgebraicOperator::new(operator_type, left, right)))
    })
  }

  /// Interns a copy of `original` over new operands, each of which must be structurally equivalent to the operand
  /// it replaces.
  pub fn clone_operator(
    &mut self,
    original: VertexId,
    left    : VertexId,
    right   : VertexId
  ) -> Result<VertexId, DagError> {
    let op = self.operator_payload(original)?.clone();

    for (old, new) in [(*op.left(), left), (*op.right(), right)] {
      if !self.structurally_equivalent(old, new)? {
        return Err(DagError::InvalidOperand { operator: original, operand: new });
      }
    }

    let key = self.operator_key(op.operator_type(), left, right)?;
    self.get_or_insert(key, move || Ok(VertexPayload::Operator(op.with_operands(left, right))))
  }

  fn operator_key(
    &self,
    operator_type: OperatorType,
    left         : VertexId,
    right        : VertexId
  ) -> Result<StructuralKey, DagError> {
    match self.config.policy {
      EquivalencePolicy::Reference => {
        self.arena.get(left)?;
        self.arena.get(right)?;
        Ok(StructuralKey::OperatorByIdentity { operator_type, left: left.serial(), right: right.serial() })
      }
      EquivalencePolicy::Structural => {
        Ok(StructuralKey::OperatorByStructure {
          operator_type,
          left : IString::from(self.signature(left)?),
          right: IString::from(self.signature(right)?),
        })
      }
    }
  }

  /// Like `description`, but scalars carry their origin, so distinct keys never share a signature.
  fn signature(&self, id: VertexId) -> Result<String, DagError> {
    let vertex = self.arena.get(id)?;
    match vertex.payload() {
      VertexPayload::Operator(op) => {
        Ok(format!(
          "( ( {} ) {} ( {} ) )",
          self.signature(*op.left())?,
          op.operator_type().symbol(),
          self.signature(*op.right())?
        ))
      }
      VertexPayload::Integral(set) => Ok(set.description()),
      VertexPayload::Scalar(scalar) => Ok(scalar.repr(FormatStyle::Debug)),
    }
  }

  fn operator_payload(&self, id: VertexId) -> Result<&AlgebraicOperator<VertexId>, DagError> {
    self.arena
        .get(id)?
        .as_operator()
        .ok_or(DagError::WrongKind { vertex: id, expected: "operator" })
  }

  // endregion Builders

  // region Accessors

  pub fn vertex(&self, id: VertexId) -> Result<&Vertex, DagError> {
    self.arena.get(id)
  }

  pub(crate) fn vertex_mut(&mut self, id: VertexId) -> Result<&mut Vertex, DagError> {
    self.arena.get_mut(id)
  }

  pub fn contains(&self, id: VertexId) -> bool {
    self.arena.contains(id)
  }

  pub fn kind(&self, id: VertexId) -> Result<VertexKind, DagError> {
    Ok(self.arena.get(id)?.kind())
  }

  pub fn label(&self, id: VertexId) -> Result<IString, DagError> {
    Ok(self.arena.get(id)?.label())
  }

  pub fn size(&self, id: VertexId) -> Result<usize, DagError> {
    Ok(self.arena.get(id)?.size())
  }

  pub fn is_precomputed(&self, id: VertexId) -> Result<bool, DagError> {
    Ok(self.arena.get(id)?.is_precomputed())
  }

  /// Full rendering of the subtree rooted at `id`. Operators render as `( ( L ) op ( R ) )`.
  pub fn description(&self, id: VertexId) -> Result<String, DagError> {
    let vertex = self.arena.get(id)?;
    match vertex.payload() {
      VertexPayload::Operator(op) => {
        Ok(format!(
          "( ( {} ) {} ( {} ) )",
          self.description(*op.left())?,
          op.operator_type().symbol(),
          self.description(*op.right())?
        ))
      }
      VertexPayload::Integral(set) => Ok(set.description()),
      VertexPayload::Scalar(scalar) => Ok(scalar.name().to_string()),
    }
  }

  pub fn repr(&self, id: VertexId, style: FormatStyle) -> Result<String, DagError> {
    let vertex = self.arena.get(id)?;
    match (style, vertex.payload()) {
      (FormatStyle::Default, _) => self.description(id),
      (_, VertexPayload::Operator(op))     => Ok(op.repr(style)),
      (_, VertexPayload::Integral(set))    => Ok(set.repr(style)),
      (_, VertexPayload::Scalar(scalar))   => Ok(scalar.repr(style)),
    }
  }

  pub fn exit_arcs(&self, id: VertexId) -> Result<&[VertexId], DagError> {
    Ok(self.arena.get(id)?.exit_arcs())
  }

  /// The vertices with an arc to `id`, in slot order.
  pub fn entry_arcs(&self, id: VertexId) -> Result<Vec<VertexId>, DagError> {
    let vertex = self.arena.get(id)?;
    Ok(vertex.entry_arcs.iter().filter_map(|index| self.arena.id_at(index)).collect())
  }

  /// The typed integral set stored at `id`.
  pub fn integral<F: IntegralFamily>(&self, id: VertexId) -> Result<&GenIntegralSet<F>, DagError> {
    self.arena
        .get(id)?
        .as_integral()
        .and_then(|set| set.as_any().downcast_ref::<GenIntegralSet<F>>())
        .ok_or(DagError::WrongKind { vertex: id, expected: F::NAME })
  }

  /// Is `id` a root or the destination of some arc? Vertices that were only interned, for example children a
  /// relation library built while collecting candidates, are not.
  pub fn is_on_graph(&self, id: VertexId) -> bool {
    match self.arena.get(id) {
      Ok(vertex) => vertex.flags.contains(VertexFlag::Root) || !vertex.entry_arcs.is_empty(),
      Err(_) => false,
    }
  }

  pub fn num_vertices(&self) -> usize {
    self.arena.len()
  }

  pub fn num_registered(&self) -> usize {
    self.registry.len()
  }

  pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
    self.arena.iter()
  }

  // endregion Accessors

  // region Ownership

  /// Adds a client owner. Balance with `release`.
  pub fn retain(&mut self, id: VertexId) -> Result<(), DagError> {
    let vertex = self.arena.get_mut(id)?;
    vertex.retains += 1;
    vertex.owners  += 1;
    Ok(())
  }

  /// Gives back one client owner taken by `retain`. The shares held by the registry, by arcs, and by the root set
  /// cannot be released this way.
  pub fn release(&mut self, id: VertexId) -> Result<(), DagError> {
    let vertex = self.arena.get_mut(id)?;
    if vertex.retains == 0 {
      return Err(DagError::InvalidMutation {
        vertex: id,
        reason: "release without a matching retain".to_string(),
      });
    }
    vertex.retains -= 1;
    self.drop_owner(id)
  }

  /// Adds an owner on behalf of the graph rather than a client, e.g. a relation holding its expression.
  pub(crate) fn add_owner(&mut self, id: VertexId) -> Result<(), DagError> {
    self.arena.get_mut(id)?.owners += 1;
    Ok(())
  }

  /// Adds `id` to the root set. Adding a root twice is a no-op.
  pub fn add_root(&mut self, id: VertexId) -> Result<(), DagError> {
    let vertex = self.arena.get_mut(id)?;
    if vertex.flags.contains(VertexFlag::Root) {
      return Ok(());
    }
    vertex.flags.insert(VertexFlag::Root);
    vertex.owners += 1;
    self.roots.push(id);
    Ok(())
  }

  pub fn roots(&self) -> &[VertexId] {
    &self.roots
  }

  pub fn clear_roots(&mut self) -> Result<(), DagError> {
    for root in std::mem::take(&mut self.roots) {
      if let Ok(vertex) = self.arena.get_mut(root) {
        vertex.flags.remove(VertexFlag::Root);
        self.drop_owner(root)?;
      }
    }
    Ok(())
  }

  /// Removes one owner from `id` and reclaims every vertex whose count drops to zero as a result.
  pub(crate) fn drop_owner(&mut self, id: VertexId) -> Result<(), DagError> {
    self.arena.get(id)?;
    let mut pending = vec![id];

    while let Some(id) = pending.pop() {
      let vertex = match self.arena.get_mut(id) {
        Ok(vertex) => vertex,
        // Reclaimed earlier in this cascade through another path.
        Err(_) => continue,
      };
      vertex.owners = vertex.owners.saturating_sub(1);
      if vertex.owners > 0 {
        continue;
      }

      let vertex = self.arena.remove(id)?;
      #[cfg(feature = "dag_debug")]
      {
        if !vertex.entry_arcs.is_empty() || vertex.is_registered() {
          critical!(0, "reclaimed {} while it still has entry arcs or a registry entry", id);
        }
      }
      // The registry must never hand out a reclaimed vertex.
      if let Some(key) = &vertex.key {
        self.registry.remove(key, id);
      }
      trace!(4, "reclaimed {} {}", id, vertex);

      for dest in vertex.exit_arcs.iter().copied() {
        if let Ok(dest_vertex) = self.arena.get_mut(dest) {
          dest_vertex.entry_arcs.remove(id.index());
          pending.push(dest);
        }
      }
      if let Some(expression) = vertex.relation.as_ref().and_then(|rr| rr.expression()) {
        pending.push(expression);
      }
    }
    Ok(())
  }

  // endregion Ownership

  // region Arcs

  /// Wires `from -> to` with no checks beyond liveness.
  pub(crate) fn link(&mut self, from: VertexId, to: VertexId) -> Result<(), DagError> {
    let dest = self.arena.get_mut(to)?;
    dest.entry_arcs.insert(from.index());
    dest.owners += 1;
    self.arena.get_mut(from)?.exit_arcs.push(to);
    Ok(())
  }

  /// Adds an exit arc from `from` to `to`.
  ///
  /// Operators have exactly two operand slots, so for an operator this instead rebinds the slot whose operand is
  /// structurally equivalent to `to` (left first), and re-keys the operator if it is registered. Rebinding fails if
  /// neither operand matches, or if the re-keyed operator already exists.
  pub fn add_exit_arc(&mut self, from: VertexId, to: VertexId) -> Result<(), DagError> {
    self.arena.get(to)?;
    if self.arena.get(from)?.kind() == VertexKind::Operator {
      return self.rebind_operand(from, to);
    }
    if self.config.check_cycles && self.reaches(to, from)? {
      return Err(DagError::InvalidMutation {
        vertex: from,
        reason: format!("an arc to {} would close a cycle", to),
      });
    }
    self.link(from, to)
  }

  fn rebind_operand(&mut self, from: VertexId, to: VertexId) -> Result<(), DagError> {
    let op = self.operator_payload(from)?.clone();
    let slot = if self.structurally_equivalent(*op.left(), to)? {
      0
    } else if self.structurally_equivalent(*op.right(), to)? {
      1
    } else {
      return Err(DagError::InvalidMutation {
        vertex: from,
        reason: format!("{} is not equivalent to either operand", to),
      });
    };
    let old = if slot == 0 { *op.left() } else { *op.right() };
    if old == to {
      return Ok(());
    }
    if self.config.check_cycles && self.reaches(to, from)? {
      return Err(DagError::InvalidMutation {
        vertex: from,
        reason: format!("rebinding to {} would close a cycle", to),
      });
    }

    // Re-key before touching any arcs so a collision leaves the operator as it was.
    let (left, right) = if slot == 0 { (to, *op.right()) } else { (*op.left(), to) };
    let old_key = self.arena.get(from)?.key.clone();
    let mut new_key = None;
    if let Some(old_key) = &old_key {
      let key = self.operator_key(op.operator_type(), left, right)?;
      match self.registry.find(&key) {
        Some(existing) if existing != from => {
          return Err(DagError::InvalidMutation {
            vertex: from,
            reason: format!("rebinding would duplicate operator {}", existing),
          });
        }
        Some(_) => {}
        None => {
          self.registry.remove(old_key, from);
          if let Err(existing) = self.registry.insert(key.clone(), from) {
            critical!(0, "registry key for {} was taken by {} during rebinding", from, existing);
          }
          new_key = Some(key);
        }
      }
    }

    {
      let dest = self.arena.get_mut(to)?;
      dest.entry_arcs.insert(from.index());
      dest.owners += 1;
    }
    let still_linked = {
      let vertex = self.arena.get_mut(from)?;
      if let VertexPayload::Operator(op) = &mut vertex.payload {
        if slot == 0 { op.set_left(to) } else { op.set_right(to) }
      }
      if let Some(arc) = vertex.exit_arcs.get_mut(slot) {
        *arc = to;
      }
      if let Some(key) = new_key {
        vertex.key = Some(key);
      }
      vertex.arcs_to(old) > 0
    };
    if !still_linked {
      self.arena.get_mut(old)?.entry_arcs.remove(from.index());
    }
    debug!(3, "rebound operand {} of {} from {} to {}", slot, from, old, to);
    self.drop_owner(old)
  }

  /// Removes every exit arc of `from`, releasing the destinations. Operators refuse: their arcs are their operands.
  pub fn del_exit_arcs(&mut self, from: VertexId) -> Result<(), DagError> {
    let vertex = self.arena.get_mut(from)?;
    if vertex.kind() == VertexKind::Operator {
      return Err(DagError::InvalidMutation {
        vertex: from,
        reason: "operator arcs are its operands and cannot be removed".to_string(),
      });
    }

    let arcs     = std::mem::take(&mut vertex.exit_arcs);
    let relation = vertex.relation.take();
    vertex.flags.remove(VertexFlag::Expanded);

    for dest in arcs.iter().copied() {
      if let Ok(dest_vertex) = self.arena.get_mut(dest) {
        dest_vertex.entry_arcs.remove(from.index());
      }
    }
    for dest in arcs {
      self.drop_owner(dest)?;
    }
    if let Some(expression) = relation.and_then(|rr| rr.expression()) {
      self.drop_owner(expression)?;
    }
    Ok(())
  }

  /// Is `target` reachable from `start` along exit arcs? A vertex reaches itself.
  pub(crate) fn reaches(&self, start: VertexId, target: VertexId) -> Result<bool, DagError> {
    let mut visited = NatSet::new();
    let mut stack   = vec![start];
    while let Some(id) = stack.pop() {
      if id == target {
        return Ok(true);
      }
      if !visited.insert(id.index()) {
        continue;
      }
      stack.extend(self.arena.get(id)?.exit_arcs.iter().copied());
    }
    Ok(false)
  }

  // endregion Arcs

  // region Equivalence

  /// Kind first, then the kind's own comparison. Operators follow the configured policy.
  pub fn equiv(&self, a: VertexId, b: VertexId) -> Result<bool, DagError> {
    if a == b {
      self.arena.get(a)?;
      return Ok(true);
    }
    let (va, vb) = (self.arena.get(a)?, self.arena.get(b)?);
    if va.kind() != vb.kind() {
      return Ok(false);
    }

    match (va.payload(), vb.payload()) {
      (VertexPayload::Operator(x), VertexPayload::Operator(y)) => {
        if x.operator_type() != y.operator_type() {
          return Ok(false);
        }
        match self.config.policy {
          EquivalencePolicy::Structural => self.structurally_equivalent(a, b),
          EquivalencePolicy::Reference  => {
            let mut equal = true;
            for (first, second) in [(*x.left(), *y.left()), (*x.right(), *y.right())] {
              if first == second {
                continue;
              }
              equal = false;
              if self.structurally_equivalent(first, second)? {
                self.report_anomaly(a, b, first, second)?;
              }
            }
            Ok(equal)
          }
        }
      }
      _ => self.structurally_equivalent(a, b),
    }
  }

  /// Recursive comparison of parameters, ignoring identity.
  pub fn structurally_equivalent(&self, a: VertexId, b: VertexId) -> Result<bool, DagError> {
    let mut pending = vec![(a, b)];
    while let Some((a, b)) = pending.pop() {
      if a == b {
        self.arena.get(a)?;
        continue;
      }
      let same = match (self.arena.get(a)?.payload(), self.arena.get(b)?.payload()) {
        (VertexPayload::Operator(x), VertexPayload::Operator(y)) => {
          pending.push((*x.left(), *y.left()));
          pending.push((*x.right(), *y.right()));
          x.operator_type() == y.operator_type()
        }
        (VertexPayload::Integral(x), VertexPayload::Integral(y)) => x.equiv(y.as_ref()),
        (VertexPayload::Scalar(x), VertexPayload::Scalar(y))     => x == y,
        _ => false,
      };
      if !same {
        return Ok(false);
      }
    }
    Ok(true)
  }

  fn report_anomaly(
    &self,
    operator: VertexId,
    other   : VertexId,
    first   : VertexId,
    second  : VertexId
  ) -> Result<(), DagError> {
    let anomaly = IdentityAnomaly {
      operator,
      other,
      first,
      second,
      description: self.description(first)?,
    };
    warning!(0, "{}", anomaly);
    self.anomalies.borrow_mut().push(anomaly);
    Ok(())
  }

  /// Identity anomalies recorded since the last reset.
  pub fn anomalies(&self) -> Ref<'_, Vec<IdentityAnomaly>> {
    self.anomalies.borrow()
  }

  pub fn take_anomalies(&self) -> Vec<IdentityAnomaly> {
    std::mem::take(&mut *self.anomalies.borrow_mut())
  }

  // endregion Equivalence
}

macro_rules! implement_operator_builders {
  ($($kind:ident),+) => {
    paste::paste!{
      impl DagContext {
        $(
          #[doc = "Interns the `" $kind "` operator over `left` and `right`."]
          pub fn [<$kind:lower>](&mut self, left: VertexId, right: VertexId) -> Result<VertexId, DagError> {
            self.operator(OperatorType::$kind, left, right)
          }
        )+
      }
    } // end paste!
  };
}

implement_operator_builders!(Plus, Minus, Times, Divide);
