//! End-to-end pulse runs: fetch, aggregate, classify, synthesize, export.
//!
//! One core run ([`Pipeline::run`]) serves both the blocking and the
//! streaming callers; they differ only in the [`ProgressObserver`] they pass.
//! The weekly trigger ([`run_weekly_pulse`]) adds email delivery on top.

pub mod email;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod progress;
pub mod services;
pub mod trigger;

pub use email::{DeliveryReceipt, EmailContent, Mailer, ResendMailer};
pub use error::{BuildError, ExportError, MailError, PipelineError, TriggerError};
pub use export::{reviews_csv, ExportPaths, Exporter};
pub use pipeline::{Pipeline, PipelineOutcome, PipelineSettings, PulseRun};
pub use progress::{
    ChannelObserver, NoopObserver, ProgressEvent, ProgressObserver, ProgressStep, ProgressTracker,
};
pub use services::{build_services, Services};
pub use trigger::{run_weekly_pulse, WeeklyOutcome};
