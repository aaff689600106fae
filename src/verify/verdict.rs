use std::fmt;

use derive_more::Display;

use crate::compare::MismatchReport;

/// Which comparison of a verification chain failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    #[display("command output")]
    Output,
    #[display("working copy on disk")]
    Disk,
    #[display("status output")]
    Status,
}

/// Why a verification did not pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Mismatch {
        stage: Stage,
        report: MismatchReport,
    },
    /// The commit output did not end with the success sentinel.
    CommitNotConfirmed { last_line: Option<String> },
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Mismatch { stage, report } => write!(f, "{stage} differs from expected, {report}"),
            Failure::CommitNotConfirmed {
                last_line: Some(line),
            } => write!(f, "commit did not succeed, final line was '{line}'"),
            Failure::CommitNotConfirmed { last_line: None } => {
                write!(f, "commit did not succeed, no output")
            }
        }
    }
}

/// Pass/fail signal of one orchestrator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(Failure),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(failure) => Some(failure),
        }
    }
}
