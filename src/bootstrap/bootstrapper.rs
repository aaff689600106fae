use std::cell::Cell;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu, ensure};
use tracing::{error, info, warn};

use crate::bootstrap::copy::{CopyError, duplicate_dir, remove_dir_if_present};
use crate::builders::{
    ParseError, attrs, build_generic_tree, build_tree_from_commit, extract_sentinel, props,
};
use crate::collaborators::{
    GREEK_TREE, RepositoryCreator, RepositoryError, SeedError, ToolError, ToolRunner, seed_paths,
    write_tree,
};
use crate::compare::{Comparison, Handlers, MismatchReport, compare_trees};
use crate::config::HarnessConfig;
use crate::ext::{BestEffortPathExt, best_effort_absolute};
use crate::tree::{TreeError, VERB};

/// Keeps one pristine repository holding the seed tree and hands out
/// independent copies of it.
///
/// The pristine repository is created on first demand, verified once and
/// never written again. Concurrent processes sharing one pristine location
/// may race on that first creation.
pub struct Bootstrapper {
    pristine_dir: PathBuf,
    seed_staging_dir: PathBuf,
    commit_sentinel: String,
    creator: Box<dyn RepositoryCreator>,
    pristine_ready: Cell<bool>,
}

impl Bootstrapper {
    pub fn new(config: &HarnessConfig, creator: Box<dyn RepositoryCreator>) -> Self {
        Self {
            pristine_dir: config.pristine_dir.clone(),
            seed_staging_dir: config.seed_staging_dir.clone(),
            commit_sentinel: config.commit_sentinel.clone(),
            creator,
            pristine_ready: Cell::new(false),
        }
    }

    pub fn pristine_dir(&self) -> &Path {
        &self.pristine_dir
    }

    /// Makes `path` a fresh copy of the pristine repository, creating the
    /// pristine one first if needed.
    ///
    /// `path` may neither contain nor lie inside the pristine repository.
    pub fn guarantee_repository(
        &self,
        runner: &dyn ToolRunner,
        path: &Path,
    ) -> Result<(), BootstrapError> {
        let target = best_effort_absolute(path);
        let pristine = best_effort_absolute(&self.pristine_dir);
        ensure!(
            !pristine.starts_with(&target) && !target.starts_with(&pristine),
            PristineOverwriteSnafu { path }
        );

        if !self.pristine_ready.get() {
            if !self.pristine_dir.exists() {
                self.create_pristine(runner).inspect_err(|_| self.discard_pristine())?;
            }
            self.pristine_ready.set(true);
        }

        duplicate_dir(&self.pristine_dir, path).context(CopySnafu)?;
        info!("Repository ready at {}", path.best_effort_path_display());
        Ok(())
    }

    /// A half-built pristine repository must not be picked up by a later call.
    fn discard_pristine(&self) {
        if let Err(err) = remove_dir_if_present(&self.pristine_dir) {
            warn!("Failed to discard the broken pristine repository: {}", err);
        }
    }

    fn create_pristine(&self, runner: &dyn ToolRunner) -> Result<(), BootstrapError> {
        info!(
            "Creating pristine repository at {}",
            self.pristine_dir.best_effort_path_display()
        );
        self.creator
            .create(&self.pristine_dir)
            .context(CreateRepositorySnafu)?;

        write_tree(&self.seed_staging_dir, GREEK_TREE).context(WriteSeedSnafu)?;

        let url = self.pristine_dir.to_file_url();
        let staging = self.seed_staging_dir.to_string_lossy().to_string();
        let output = runner
            .run("import", &[url.as_str(), staging.as_str()])
            .context(ImportToolSnafu)?;

        let (sentinel, lines) = extract_sentinel(&output);
        if sentinel != Some(self.commit_sentinel.as_str()) {
            error!("Import did not succeed while creating the pristine repository");
            return SeedImportNotConfirmedSnafu {
                last_line: sentinel.unwrap_or_default(),
            }
            .fail();
        }

        // The client may report paths with the staging directory in front.
        let prefix = format!("{}/", staging.trim_end_matches('/'));
        let lines = lines
            .iter()
            .map(|line| line.replacen(&prefix, "", 1))
            .collect::<Vec<_>>();
        let actual = build_tree_from_commit(&lines).context(SeedImportUnparsableSnafu)?;

        let expected = build_generic_tree(
            seed_paths().map(|path| (path, None::<&str>, props([]), attrs([(VERB, "Adding")]))),
        )
        .context(SeedTreeSnafu)?;

        if let Comparison::Mismatch(report) = compare_trees(&actual, &expected, Handlers::none()) {
            error!("Output of the seed import is unexpected");
            return SeedVerificationSnafu { report }.fail();
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum BootstrapError {
    #[snafu(display(
        "Refusing to overwrite the pristine repository at {}",
        path.best_effort_path_display()
    ))]
    PristineOverwrite { path: PathBuf },
    #[snafu(display("Failed to create the pristine repository"))]
    CreateRepository { source: RepositoryError },
    #[snafu(display("Failed to stage the seed tree"))]
    WriteSeed { source: SeedError },
    #[snafu(display("Failed to run the seed import"))]
    ImportTool { source: ToolError },
    #[snafu(display("Seed import did not succeed, final line was '{}'", last_line))]
    SeedImportNotConfirmed { last_line: String },
    #[snafu(display("Seed import printed unparsable output"))]
    SeedImportUnparsable { source: ParseError },
    #[snafu(display("Seed tree is invalid"))]
    SeedTree { source: TreeError },
    #[snafu(display("Seed import reported unexpected output:\n{}", report))]
    SeedVerification { report: MismatchReport },
    #[snafu(display("Failed to copy the pristine repository"))]
    Copy { source: CopyError },
}

impl BootstrapError {
    /// Whether the test environment itself is broken and the run must stop.
    /// Only copy failures are specific to the requested repository.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, BootstrapError::Copy { .. })
    }
}
