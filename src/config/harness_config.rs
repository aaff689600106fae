use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::collaborators::DEFAULT_ADMIN_AREA;
use crate::ext::BestEffortPathExt;

const CONFIG_FILE_NAME: &str = "oracle.yaml";
const KNOWN_KEYS: &[&str] = &[
    "client",
    "admin",
    "pristine_dir",
    "repos_dir",
    "wc_dir",
    "seed_staging_dir",
    "admin_area",
    "commit_sentinel",
];

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Where the harness keeps its repositories and working copies, and which
/// binaries it drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// The version-control client.
    pub client: PathBuf,
    /// The repository administration tool.
    pub admin: PathBuf,
    pub pristine_dir: PathBuf,
    pub repos_dir: PathBuf,
    pub wc_dir: PathBuf,
    pub seed_staging_dir: PathBuf,
    /// Name of the per-directory administrative area skipped by disk scans.
    pub admin_area: String,
    /// Last line of a successful commit.
    pub commit_sentinel: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            client: PathBuf::from("svn"),
            admin: PathBuf::from("svnadmin"),
            pristine_dir: PathBuf::from("local_tmp/repos"),
            repos_dir: PathBuf::from("repositories"),
            wc_dir: PathBuf::from("working_copies"),
            seed_staging_dir: PathBuf::from("local_tmp/greekfiles"),
            admin_area: DEFAULT_ADMIN_AREA.to_string(),
            commit_sentinel: "Commit succeeded.".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Reads `oracle.yaml` below `root`, falling back to the defaults when
    /// the file does not exist. Relative directories resolve against `root`.
    pub fn read(root: &Path) -> Result<Self, ConfigError> {
        let path = get_config_file_path(root);
        let config = if path.exists() {
            Self::from_path(&path)?
        } else {
            debug!(
                "No config file at {}, using defaults",
                path.best_effort_path_display()
            );
            Self::default()
        };
        Ok(config.resolved_against(root))
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        debug!("Reading config file: {}", path.best_effort_path_display());
        let contents = fs::read_to_string(path).context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read config file: {} bytes", contents.len());
        contents.as_str().try_into()
    }

    /// Joins every relative directory onto `root`. Program paths are left
    /// alone so they can still be looked up on `PATH`.
    pub fn resolved_against(mut self, root: &Path) -> Self {
        for dir in [
            &mut self.pristine_dir,
            &mut self.repos_dir,
            &mut self.wc_dir,
            &mut self.seed_staging_dir,
        ] {
            if dir.is_relative() {
                *dir = root.join(&*dir);
            }
        }
        self
    }

    fn apply_yaml(
        mut self,
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Self, ConfigError> {
        for (key, _) in top_level.iter() {
            match key.as_str() {
                Some(name) if KNOWN_KEYS.contains(&name) => {}
                _ => warn!("Ignoring unknown config entry: {:?}", key),
            }
        }

        if let Some(value) = get_string(top_level, "client")? {
            self.client = PathBuf::from(value);
        }
        if let Some(value) = get_string(top_level, "admin")? {
            self.admin = PathBuf::from(value);
        }
        if let Some(value) = get_string(top_level, "pristine_dir")? {
            self.pristine_dir = PathBuf::from(value);
        }
        if let Some(value) = get_string(top_level, "repos_dir")? {
            self.repos_dir = PathBuf::from(value);
        }
        if let Some(value) = get_string(top_level, "wc_dir")? {
            self.wc_dir = PathBuf::from(value);
        }
        if let Some(value) = get_string(top_level, "seed_staging_dir")? {
            self.seed_staging_dir = PathBuf::from(value);
        }
        if let Some(value) = get_string(top_level, "admin_area")? {
            self.admin_area = value;
        }
        if let Some(value) = get_string(top_level, "commit_sentinel")? {
            self.commit_sentinel = value;
        }

        Ok(self)
    }
}

fn get_string(
    top_level: &LinkedHashMap<Yaml, Yaml>,
    key: &'static str,
) -> Result<Option<String>, ConfigError> {
    match top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(key)))) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|value| Some(value.to_string()))
            .context(NotAStringSnafu { key }),
    }
}

impl TryFrom<&str> for HarnessConfig {
    type Error = ConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let contents_vec =
            Yaml::load_from_str(contents).map_err(|e| ConfigError::ParseError { source: e })?;
        let contents = contents_vec
            .first()
            .ok_or(ConfigError::MalformedConfig)?;

        let top_level = contents.as_mapping().ok_or(ConfigError::TopLevelNotMap)?;

        HarnessConfig::default().apply_yaml(top_level)
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Config entry '{}' should be a string", key))]
    NotAString { key: &'static str },
}
