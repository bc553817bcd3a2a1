//! Failure values and their normalization into crash reports.

mod failure;
mod normalize;
mod payload;

pub use failure::{FailureInput, NativeError};
pub use normalize::{normalize, normalize_text, strip_rejection_header};
pub use payload::{NormalizedReport, ReportPayload};
