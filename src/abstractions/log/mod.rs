/*!

# Overview

Threshold-based logging for graph construction. Every message has a *level* (what kind of message it is) and a
numeric *threshold* (how chatty it is). A message is emitted only when its threshold is at most the global
threshold, so a low global threshold gives a quiet build and a high one traces every registry insertion.

```
use intdag::log::*;

set_global_logging_threshold(1);

info!(1, "building graph for {} roots", 3);          // Emitted
debug!(4, "registry lookup for key {}", "(ss|ss)");  // Not emitted
warning!("operand pointers differ");                 // Threshold 0, always emitted
```

## Threshold

The threshold is shared by all levels. It starts at the value of the `INTDAG_LOG_THRESHOLD` environment
variable, or 2 when the variable is absent or unparsable, and can be changed at any time:

```
use intdag::log::{set_global_logging_threshold, get_global_logging_threshold};

set_global_logging_threshold(5);
assert_eq!(get_global_logging_threshold(), 5);
```

Conventions used inside the crate:

| threshold | used for                                                   |
|:----------|:-----------------------------------------------------------|
| 0         | identity anomalies, errors the caller must see             |
| 1         | run-level events: reset, expansion summaries               |
| 2         | unregistration, vertices left opaque                       |
| 3         | registry insertions, tactic choices                        |
| 4         | reclamation of individual vertices                         |

## Levels

Critical, Error, Warning, Info, Debug, Trace, each with a macro of the same name (`warning!` for Warning). Omitting
the threshold means threshold 0.

```ignore
level!(threshold, "format string", args...);
level!("format string", args...);
```

The subscriber is installed lazily by the first macro invocation. If the embedding program already installed a
global subscriber, that one is kept and our filter layer is simply not used.

*/
mod formatter;
mod threshold_filter;
mod macros;

use std::sync::atomic::{AtomicU8, Ordering};

use once_cell::sync::Lazy;
use tracing_subscriber::{
  fmt,
  layer::SubscriberExt,
  Registry
};

use threshold_filter::ThresholdFilterLayer;
use formatter::VertexFieldFormatter;
pub use macros::*;

/// Environment variable consulted for the initial threshold.
pub const THRESHOLD_ENV_VAR: &str = "INTDAG_LOG_THRESHOLD";

const DEFAULT_THRESHOLD: u8 = 2;

static INIT_LOGGER: Lazy<()> = Lazy::new(|| {
  let subscriber = Registry::default()
      .with(ThresholdFilterLayer)
      .with(
        fmt::layer()
            .fmt_fields(VertexFieldFormatter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr),
      );

  // Somebody else owns the global subscriber; defer to them.
  let _ = tracing::subscriber::set_global_default(subscriber);
});

static GLOBAL_LOGGING_THRESHOLD: Lazy<AtomicU8> = Lazy::new(|| {
  AtomicU8::new(threshold_from_env(std::env::var(THRESHOLD_ENV_VAR).ok().as_deref()))
});

fn threshold_from_env(value: Option<&str>) -> u8 {
  value
      .and_then(|v| v.trim().parse::<u8>().ok())
      .unwrap_or(DEFAULT_THRESHOLD)
}

/// Called by the logging macros. Installs the subscriber on first use.
pub fn init_logger() {
  Lazy::force(&INIT_LOGGER);
}

pub fn set_global_logging_threshold(new_threshold: u8) {
  GLOBAL_LOGGING_THRESHOLD.store(new_threshold, Ordering::SeqCst);
}

pub fn get_global_logging_threshold() -> u8 {
  GLOBAL_LOGGING_THRESHOLD.load(Ordering::SeqCst)
}
