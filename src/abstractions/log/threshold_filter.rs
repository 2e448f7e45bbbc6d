use std::fmt::Debug;
use tracing::{
  field::{Field, Visit},
  Event,
  Subscriber
};
use tracing_subscriber::{
  Layer,
  layer::Context,
  registry::LookupSpan
};

use super::get_global_logging_threshold;

/// Lets an event through only when its `threshold` field is at most the global threshold. Events without the field
/// (from other crates using `tracing` directly) always pass.
pub(crate) struct ThresholdFilterLayer;

impl<S> Layer<S> for ThresholdFilterLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
  fn event_enabled(&self, event: &Event<'_>, _ctx: Context<'_, S>) -> bool {
    let mut visitor = ThresholdVisitor { threshold: None };
    event.record(&mut visitor);

    match visitor.threshold {
      Some(threshold) => threshold <= get_global_logging_threshold(),
      None => true,
    }
  }
}

/// Pulls the `threshold` field out of an event. Out-of-range values saturate to `u8::MAX`, i.e. "most verbose".
struct ThresholdVisitor {
  threshold: Option<u8>,
}

impl ThresholdVisitor {
  fn saturate(value: i128) -> u8 {
    value.clamp(0, u8::MAX as i128) as u8
  }
}

impl Visit for ThresholdVisitor {
  fn record_i64(&mut self, field: &Field, value: i64) {
    if field.name() == "threshold" {
      self.threshold = Some(Self::saturate(value as i128));
    }
  }

  fn record_u64(&mut self, field: &Field, value: u64) {
    if field.name() == "threshold" {
      self.threshold = Some(Self::saturate(value as i128));
    }
  }

  fn record_debug(&mut self, field: &Field, _value: &dyn Debug) {
    if field.name() == "threshold" {
      // Not a number; treat as maximally verbose rather than losing the event silently.
      self.threshold = Some(u8::MAX);
    }
  }
}
