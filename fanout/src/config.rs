use crate::error::{Error, Result};
use crate::types::{JobSpec, Program};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROGRAM: &str = "bazel";
pub const DEFAULT_SUBCOMMAND: &str = "build";
pub const DEFAULT_TARGETS: [&str; 4] = [
    ":linux_amd64",
    ":darwin_amd64",
    ":windows_amd64",
    ":tests",
];

/// Which build-tool invocations to fan out.
///
/// Every target becomes one job running `<program> <subcommand> <target>`, in the order listed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub program: Program,
    pub subcommand: String,
    pub targets: Vec<String>,
    pub dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.into(),
            subcommand: DEFAULT_SUBCOMMAND.into(),
            targets: DEFAULT_TARGETS.iter().map(|t| t.to_string()).collect(),
            dir: None,
        }
    }
}

impl Config {
    pub fn from_toml(s: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn job_specs(&self) -> Vec<JobSpec> {
        self.targets
            .iter()
            .map(|target| {
                let spec = JobSpec::new(
                    self.program.clone(),
                    [self.subcommand.as_str(), target.as_str()],
                );
                match &self.dir {
                    Some(dir) => spec.with_dir(dir),
                    None => spec,
                }
            })
            .collect()
    }
}
