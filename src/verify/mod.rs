mod orchestrator;
mod verdict;

pub use orchestrator::{Oracle, VerifyError, virginal_status};
pub use verdict::{Failure, Stage, Verdict};
