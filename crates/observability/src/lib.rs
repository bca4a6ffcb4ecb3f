//! Process-wide tracing setup shared by the binaries.

mod tracing;

pub use crate::tracing::{LogFormat, ParseLogFormatError, init};
