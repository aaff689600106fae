use std::path::Path;

use snafu::{ResultExt, Snafu};
use tracing::{debug, info, warn};

use crate::bootstrap::{BootstrapError, Bootstrapper, CopyError, clear_target};
use crate::builders::{
    DiskTreeError, ParseError, attrs, build_generic_tree, build_tree_from_checkout,
    build_tree_from_commit, build_tree_from_status, build_tree_from_wc, extract_sentinel, props,
};
use crate::collaborators::{
    AdminCommandCreator, ClientPropertyReader, CommandRunner, RepositoryCreator, ToolError,
    ToolRunner, WalkdirScanner, WorkingCopyScanner, seed_disk_tree, seed_paths,
};
use crate::compare::{Comparison, Handlers, compare_trees};
use crate::config::HarnessConfig;
use crate::ext::BestEffortPathExt;
use crate::tree::{REPOS_REV, STATUS, Tree, TreeError, TreePath, WC_REV};
use crate::verify::{Failure, Stage, Verdict};

/// Drives the client through one operation at a time and checks what it
/// printed, what it left on disk and what status reports afterwards.
///
/// Each chain stops at the first failing comparison.
pub struct Oracle {
    config: HarnessConfig,
    runner: Box<dyn ToolRunner>,
    scanner: Box<dyn WorkingCopyScanner>,
    bootstrapper: Bootstrapper,
}

impl Oracle {
    pub fn new(
        config: HarnessConfig,
        runner: Box<dyn ToolRunner>,
        scanner: Box<dyn WorkingCopyScanner>,
        creator: Box<dyn RepositoryCreator>,
    ) -> Self {
        let bootstrapper = Bootstrapper::new(&config, creator);
        Self {
            config,
            runner,
            scanner,
            bootstrapper,
        }
    }

    /// Oracle running the configured client and admin binaries. Disk scans
    /// ask the client for each entry's recorded properties.
    pub fn from_config(config: HarnessConfig) -> Self {
        let client = CommandRunner::new(config.client.clone());
        let scanner = Box::new(
            WalkdirScanner::new(config.admin_area.clone())
                .with_property_reader(ClientPropertyReader::new(client.clone())),
        );
        let runner = Box::new(client);
        let creator = Box::new(AdminCommandCreator::new(config.admin.clone()));
        Self::new(config, runner, scanner, creator)
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn guarantee_repository(&self, path: &Path) -> Result<(), VerifyError> {
        self.bootstrapper
            .guarantee_repository(self.runner.as_ref(), path)
            .context(BootstrapSnafu)
    }

    /// Checks out `url` into a clean `wc`, then checks the printed output and
    /// the disk tree. `handlers` apply to the disk comparison.
    pub fn verify_checkout(
        &self,
        url: &str,
        wc: &Path,
        expected_output: &Tree,
        expected_disk: &Tree,
        handlers: Handlers<'_>,
    ) -> Result<Verdict, VerifyError> {
        clear_target(wc).context(PrepareWorkingCopySnafu)?;

        let wc_arg = wc.to_string_lossy().to_string();
        let output = self.run("checkout", &[url, wc_arg.as_str()])?;
        let actual = build_tree_from_checkout(&output).context(ParseSnafu {
            stage: Stage::Output,
        })?;
        if let Some(verdict) = check(Stage::Output, &actual, expected_output, Handlers::none()) {
            return Ok(verdict);
        }

        let actual = build_tree_from_wc(self.scanner.as_ref(), wc).context(DiskSnafu)?;
        if let Some(verdict) = check(Stage::Disk, &actual, expected_disk, handlers) {
            return Ok(verdict);
        }

        Ok(Verdict::Pass)
    }

    /// Updates `wc` and checks output, disk and, when given, status.
    /// `handlers` apply to the disk comparison.
    pub fn verify_update(
        &self,
        wc: &Path,
        expected_output: &Tree,
        expected_disk: &Tree,
        expected_status: Option<&Tree>,
        handlers: Handlers<'_>,
        extra_args: &[&str],
    ) -> Result<Verdict, VerifyError> {
        let wc_arg = wc.to_string_lossy().to_string();
        let args = [&[wc_arg.as_str()][..], extra_args].concat();
        let output = self.run("update", &args)?;
        let actual = build_tree_from_checkout(&output).context(ParseSnafu {
            stage: Stage::Output,
        })?;
        if let Some(verdict) = check(Stage::Output, &actual, expected_output, Handlers::none()) {
            return Ok(verdict);
        }

        let actual = build_tree_from_wc(self.scanner.as_ref(), wc).context(DiskSnafu)?;
        if let Some(verdict) = check(Stage::Disk, &actual, expected_disk, handlers) {
            return Ok(verdict);
        }

        match expected_status {
            Some(expected_status) => self.verify_status(wc, expected_status, Handlers::none()),
            None => Ok(Verdict::Pass),
        }
    }

    /// Commits `wc`. The final output line must be the configured sentinel;
    /// the lines before it are checked against `expected_output` (with
    /// `handlers`), then status when given.
    ///
    /// Runners report diagnostics after regular output, so a commit that
    /// succeeds with a warning is still reported as unconfirmed.
    pub fn verify_commit(
        &self,
        wc: &Path,
        expected_output: &Tree,
        expected_status: Option<&Tree>,
        handlers: Handlers<'_>,
        extra_args: &[&str],
    ) -> Result<Verdict, VerifyError> {
        let wc_arg = wc.to_string_lossy().to_string();
        let args = [&[wc_arg.as_str()][..], extra_args].concat();
        let output = self.run("commit", &args)?;

        let (sentinel, lines) = extract_sentinel(&output);
        if sentinel != Some(self.config.commit_sentinel.as_str()) {
            warn!("Commit did not succeed, final line: {:?}", sentinel);
            return Ok(Verdict::Fail(Failure::CommitNotConfirmed {
                last_line: sentinel.map(str::to_string),
            }));
        }

        let actual = build_tree_from_commit(lines).context(ParseSnafu {
            stage: Stage::Output,
        })?;
        if let Some(verdict) = check(Stage::Output, &actual, expected_output, handlers) {
            return Ok(verdict);
        }

        match expected_status {
            Some(expected_status) => self.verify_status(wc, expected_status, Handlers::none()),
            None => Ok(Verdict::Pass),
        }
    }

    /// Runs status on `wc` and compares it with `expected_status`.
    pub fn verify_status(
        &self,
        wc: &Path,
        expected_status: &Tree,
        handlers: Handlers<'_>,
    ) -> Result<Verdict, VerifyError> {
        let wc_arg = wc.to_string_lossy().to_string();
        let output = self.run("status", &[wc_arg.as_str()])?;
        let actual = build_tree_from_status(&output).context(ParseSnafu {
            stage: Stage::Status,
        })?;

        Ok(check(Stage::Status, &actual, expected_status, handlers).unwrap_or(Verdict::Pass))
    }

    /// Gives `test_name` its own copy of the seed repository and checks out a
    /// working copy of it, verifying the checkout.
    pub fn make_repo_and_wc(&self, test_name: &str) -> Result<Verdict, VerifyError> {
        let wc = self.config.wc_dir.join(test_name);
        let repos = self.config.repos_dir.join(test_name);

        self.guarantee_repository(&repos)?;

        let wc_path = TreePath::from_path(&wc);
        let expected_output = build_generic_tree(seed_paths().map(|path| {
            (
                wc_path.join(path),
                None::<&str>,
                props([]),
                attrs([(STATUS, "A ")]),
            )
        }))
        .context(ExpectedTreeSnafu)?;
        let expected_disk = seed_disk_tree().context(ExpectedTreeSnafu)?;

        self.verify_checkout(
            &repos.to_file_url(),
            &wc,
            &expected_output,
            &expected_disk,
            Handlers::none(),
        )
    }

    fn run(&self, subcommand: &str, args: &[&str]) -> Result<Vec<String>, VerifyError> {
        self.runner.run(subcommand, args).context(ToolSnafu { subcommand })
    }
}

/// Expected status of an untouched working copy at `rev`: the root and every
/// seed path, unmodified, at `rev` on both sides.
pub fn virginal_status(wc: &Path, rev: u64) -> Result<Tree, TreeError> {
    let wc_path = TreePath::from_path(wc);
    let rev = rev.to_string();
    let unchanged = || attrs([(STATUS, "_ "), (WC_REV, rev.as_str()), (REPOS_REV, rev.as_str())]);

    build_generic_tree(
        std::iter::once(wc_path.clone())
            .chain(seed_paths().map(|path| wc_path.join(path)))
            .map(|path| (path, None::<&str>, props([]), unchanged())),
    )
}

fn check(stage: Stage, actual: &Tree, expected: &Tree, handlers: Handlers<'_>) -> Option<Verdict> {
    match compare_trees(actual, expected, handlers) {
        Comparison::Match => {
            debug!("{} matches", stage);
            None
        }
        Comparison::Mismatch(report) => {
            info!("{} differs from expected", stage);
            Some(Verdict::Fail(Failure::Mismatch { stage, report }))
        }
    }
}

#[derive(Debug, Snafu)]
pub enum VerifyError {
    #[snafu(display("Failed to run the client '{}' subcommand", subcommand))]
    ToolError { subcommand: String, source: ToolError },
    #[snafu(display("Cannot build a tree from the {}", stage))]
    ParseError { stage: Stage, source: ParseError },
    #[snafu(display("Cannot build a tree from the working copy"))]
    DiskError { source: DiskTreeError },
    #[snafu(display("Failed to prepare the working copy location"))]
    PrepareWorkingCopyError { source: CopyError },
    #[snafu(display("Failed to provide a repository"))]
    BootstrapError { source: BootstrapError },
    #[snafu(display("Invalid expected tree"))]
    ExpectedTreeError { source: TreeError },
}

impl VerifyError {
    /// Broken fixtures and unparsable client output end the run.
    pub fn is_fatal(&self) -> bool {
        match self {
            VerifyError::ParseError { .. } => true,
            VerifyError::BootstrapError { source } => source.is_fatal(),
            _ => false,
        }
    }
}
