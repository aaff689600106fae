use std::path::Path;

use colored::Colorize;
use snafu::prelude::*;
use tracing::debug;

use svn_oracle::builders::{DiskTreeError, build_tree_from_wc};
use svn_oracle::collaborators::WalkdirScanner;
use svn_oracle::compare::Handlers;
use svn_oracle::config::{ConfigError, HarnessConfig};
use svn_oracle::tree::TreeError;
use svn_oracle::verify::{Oracle, Verdict, VerifyError, virginal_status};

use crate::application::RuntimeConfig;
use crate::cli::Command;

pub struct Application;

impl Application {
    pub fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        let root = &runtime_config.root;
        let config = HarnessConfig::read(root).context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        match runtime_config.command {
            Command::Bootstrap { test_name } => {
                let oracle = Oracle::from_config(config);
                let verdict = oracle
                    .make_repo_and_wc(&test_name)
                    .context(VerificationSnafu)?;
                report(&test_name, verdict)
            }
            Command::Status { wc, rev } => {
                let wc = root.join(wc);
                let expected = virginal_status(&wc, rev).context(ExpectedTreeSnafu)?;
                let oracle = Oracle::from_config(config);
                let verdict = oracle
                    .verify_status(&wc, &expected, Handlers::none())
                    .context(VerificationSnafu)?;
                report(&wc.to_string_lossy(), verdict)
            }
            Command::Scan { dir } => scan(&root.join(dir), &config),
        }
    }
}

fn report(label: &str, verdict: Verdict) -> Result<(), ApplicationError> {
    match verdict {
        Verdict::Pass => {
            println!("{} {}", "PASS".green().bold(), label);
            Ok(())
        }
        Verdict::Fail(failure) => {
            println!("{} {}", "FAIL".red().bold(), label);
            println!("{failure}");
            VerificationFailedSnafu { label }.fail()
        }
    }
}

fn scan(dir: &Path, config: &HarnessConfig) -> Result<(), ApplicationError> {
    let scanner = WalkdirScanner::new(config.admin_area.clone());
    let tree = build_tree_from_wc(&scanner, dir).context(ScanSnafu)?;

    for node in tree.entries() {
        match node.contents() {
            Some(contents) => println!("{} ({} bytes)", node.path(), contents.len()),
            None => println!("{}/", node.path()),
        }
    }
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ConfigError },
    #[snafu(display("Critical failure encountered during verification"))]
    VerificationError { source: VerifyError },
    #[snafu(display("Verification of {} failed", label))]
    VerificationFailed { label: String },
    #[snafu(display("Could not build the expected tree"))]
    ExpectedTreeError { source: TreeError },
    #[snafu(display("Could not scan the directory"))]
    ScanError { source: DiskTreeError },
}
