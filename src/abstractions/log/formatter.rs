use std::fmt::Write as _;

use tracing::field::{Field, Visit};
use tracing_subscriber::{
  field::RecordFields,
  fmt::{
    format::Writer,
    FormatFields
  }
};

/// Writes the message and any extra fields, dropping the bookkeeping fields `threshold` and `critical`. A critical
/// event gets a `[CRITICAL]` prefix instead of a `critical=true` field.
pub(crate) struct VertexFieldFormatter;

impl<'writer> FormatFields<'writer> for VertexFieldFormatter {
  fn format_fields<R: RecordFields>(
    &self,
    writer: Writer<'writer>,
    fields: R,
  ) -> std::fmt::Result {
    let mut visitor = FieldFilterVisitor { writer, prefix: String::new(), body: String::new() };
    fields.record(&mut visitor);
    visitor.finish()
  }
}

struct FieldFilterVisitor<'writer> {
  writer: Writer<'writer>,
  prefix: String,
  body  : String,
}

impl FieldFilterVisitor<'_> {
  fn finish(mut self) -> std::fmt::Result {
    write!(self.writer, "{}{}", self.prefix, self.body.trim_end())
  }
}

impl Visit for FieldFilterVisitor<'_> {
  fn record_i64(&mut self, field: &Field, value: i64) {
    if field.name() != "threshold" {
      let _ = write!(self.body, "{}={} ", field.name(), value);
    }
  }

  fn record_u64(&mut self, field: &Field, value: u64) {
    if field.name() != "threshold" {
      let _ = write!(self.body, "{}={} ", field.name(), value);
    }
  }

  fn record_bool(&mut self, field: &Field, value: bool) {
    match field.name() {
      "critical" => {
        if value {
          self.prefix.push_str("[CRITICAL] ");
        }
      }
      name => {
        let _ = write!(self.body, "{}={} ", name, value);
      }
    }
  }

  fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
    match field.name() {
      "message" => {
        let _ = write!(self.body, "{:?} ", value);
      }

      "threshold" | "critical" => { /* bookkeeping */ }

      name => {
        let _ = write!(self.body, "{}={:?} ", name, value);
      }
    }
  }
}
