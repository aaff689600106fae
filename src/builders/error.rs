use snafu::Snafu;

use crate::tree::TreeError;

#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum ParseError {
    #[snafu(display("Cannot parse line {} of {} output: '{}'", line_number, format, line))]
    UnparsableOutput {
        format: &'static str,
        line_number: usize,
        line: String,
    },
    #[snafu(display("{} output does not form a valid tree", format))]
    InvalidTree {
        format: &'static str,
        source: TreeError,
    },
}
