//! # xprint: compile-once, run-many receipt interpreters
//!
//! Submitters upload short interpreter scripts. Each one is screened by the
//! validation gate, compiled once by the script sandbox, and cached under
//! the submitter's key. Later invocations run the cached program against a
//! JSON payload and a round's order fixture with a 5 second deadline. The
//! script cannot print anything itself; it drives a recording printer, and
//! the service returns the recorded command sequence.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xprint::{PrintService, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = PrintService::new(ServiceConfig::default());
//!     let source = r#"
//! fn interpret(json_string, printer, order) {
//!     printer.add_text(order.store_name);
//!     printer.cut_paper();
//! }
//! "#;
//!     service.compile("team-1", source, Some("Team One")).await.unwrap();
//!     let commands = service.execute("team-1", "{}", 1).await.unwrap();
//!     println!("{:?}", commands);
//! }
//! ```
//!
//! # Feature Flags
//!
//! | Flag | Description |
//! |------|-------------|
//! | `webhook-notify` | POST compile outcomes to `notify_url` via reqwest (default) |

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod jobs;
pub mod notify;
pub mod service;
pub mod supervisor;
pub mod validation;

pub use crate::cache::{CompiledProgram, ProgramCache};
pub use crate::clock::{FakeTimeProvider, RealTimeProvider, TimeProvider};
pub use crate::config::{ConfigError, ServiceConfig};
pub use crate::error::{ErrorKind, ServiceError, ServiceResult};
pub use crate::fixtures::StaticFixtures;
pub use crate::jobs::{Job, JobStatus, JobTracker};
#[cfg(feature = "webhook-notify")]
pub use crate::notify::WebhookNotifier;
pub use crate::notify::{CompilationStatus, CompileEvent, Notifier, NotifyError, TracingNotifier};
pub use crate::service::{CompileResponse, ExecuteResponse, PrintService, PrintServiceBuilder};
pub use crate::supervisor::{header_commands, ExecutionSupervisor};
pub use crate::validation::{SubmissionValidator, ValidationConfig, ValidationError};

pub use xprint_sandbox_rhai::{RhaiSandbox, ScriptLimits};
pub use xprint_types::{
    Alignment, BarcodeType, CapabilityRecorder, Command, Fixture, FixtureSource, PrinterCommand,
    TextSize,
};
