//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events, subscriber setup)
//!     → metrics.rs (counters and histograms through the `metrics` facade)
//!
//! Consumers:
//!     → stdout / stderr log sink installed by the binary
//!     → whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Library code only emits; installing subscribers/recorders is the binary's job
//! - Every pipeline invocation carries an invocation id in its span

pub mod logging;
pub mod metrics;
