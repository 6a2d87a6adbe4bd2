//! OpenTelemetry-based observability with file-based trace export.
//!
//! The plugin runs inside Zellij's WASM sandbox with no network exporter, so
//! spans are serialized as OTLP JSON lines into a rotating file under the
//! plugin data directory.
//!
//! ```text
//! tracing → tracing-opentelemetry → SDK TracerProvider → FileSpanExporter → JSON lines
//! ```
//!
//! - **File**: `~/.local/share/zellij/medboard/medboard-otlp.json`
//! - **Rotation**: at 10 MiB, keeping 3 numbered backups
//! - **Level**: the `trace_level` config option, `"info"` by default
//!
//! # Usage
//!
//! ```rust
//! use medboard::observability::init_tracing;
//! use medboard::Config;
//!
//! init_tracing(&Config::default());
//! tracing::debug!("plugin initialized");
//! ```

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;

/// `service.name` resource attribute and instrumentation scope name.
const SERVICE_NAME: &str = "medboard";
