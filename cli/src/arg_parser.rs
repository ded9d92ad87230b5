use clap::{ArgEnum, Parser};
use fanout::{error, Config};
use std::path::PathBuf;

/// Run several build-tool invocations in parallel and relay their output
#[derive(Debug, Parser)]
pub struct ArgParser {
    /// TOML file listing the program, subcommand and targets
    #[clap(short = 'c', long = "config", parse(from_os_str))]
    pub config: Option<PathBuf>,

    /// The build tool to run
    #[clap(long, env = "FANOUT_PROGRAM")]
    pub program: Option<String>,

    /// The build tool sub-command, e.g. build or test
    #[clap(long)]
    pub subcommand: Option<String>,

    /// A target to build, one job per target. Repeat for several targets
    #[clap(short = 't', long = "target")]
    pub targets: Vec<String>,

    /// Working directory for every job
    #[clap(long, parse(from_os_str))]
    pub dir: Option<PathBuf>,

    /// How job outcomes affect this process's exit code
    #[clap(long, arg_enum, default_value = "ignore")]
    pub exit_code: ExitPolicy,

    /// Print one line per job to stderr once all output has been relayed
    #[clap(long)]
    pub summary: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
pub enum ExitPolicy {
    /// exit non-zero unless every job exited with code 0
    Aggregate,
    /// exit zero whatever the jobs did, unless a job could not be started
    Ignore,
}

impl ArgParser {
    /// Defaults, overridden by the config file, overridden by flags.
    pub fn config(&self) -> error::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(program) = &self.program {
            config.program = program.clone();
        }
        if let Some(subcommand) = &self.subcommand {
            config.subcommand = subcommand.clone();
        }
        if !self.targets.is_empty() {
            config.targets = self.targets.clone();
        }
        if let Some(dir) = &self.dir {
            config.dir = Some(dir.clone());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn no_args_is_the_default_matrix() {
        let args = ArgParser::try_parse_from(["fanout"]).unwrap();
        assert_eq!(args.exit_code, ExitPolicy::Ignore);
        assert!(!args.summary);
        let config = args.config().unwrap();
        assert_eq!(config.targets.len(), 4);
        assert_eq!(config.subcommand, "build");
    }

    #[test]
    fn flags_override_defaults() {
        let args = ArgParser::try_parse_from([
            "fanout",
            "--program",
            "bazelisk",
            "--subcommand",
            "test",
            "-t",
            ":tests",
            "--target",
            ":linux_amd64",
            "--exit-code",
            "aggregate",
            "--summary",
        ])
        .unwrap();
        assert_eq!(args.exit_code, ExitPolicy::Aggregate);
        assert!(args.summary);
        let config = args.config().unwrap();
        assert_eq!(config.program, "bazelisk");
        assert_eq!(config.subcommand, "test");
        assert_eq!(config.targets, vec![":tests", ":linux_amd64"]);
    }

    #[test]
    fn config_file_sits_between_defaults_and_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            program = "bazelisk"
            subcommand = "test"
            targets = ["//a:all", "//b:all"]
            dir = "/from/file"
            "#
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let from_file = ArgParser::try_parse_from(["fanout", "--config", path])
            .unwrap()
            .config()
            .unwrap();
        assert_eq!(from_file.program, "bazelisk");
        assert_eq!(from_file.subcommand, "test");
        assert_eq!(from_file.targets, vec!["//a:all", "//b:all"]);
        assert_eq!(from_file.dir, Some(PathBuf::from("/from/file")));

        let overridden = ArgParser::try_parse_from([
            "fanout",
            "--config",
            path,
            "--target",
            ":tests",
            "--dir",
            "/from/flag",
        ])
        .unwrap()
        .config()
        .unwrap();
        assert_eq!(overridden.program, "bazelisk");
        assert_eq!(overridden.subcommand, "test");
        assert_eq!(overridden.targets, vec![":tests"]);
        assert_eq!(overridden.dir, Some(PathBuf::from("/from/flag")));

        // the environment stands in for --program and still beats the file
        std::env::set_var("FANOUT_PROGRAM", "/opt/bin/bazel");
        let from_env = ArgParser::try_parse_from(["fanout", "--config", path]);
        std::env::remove_var("FANOUT_PROGRAM");
        assert_eq!(from_env.unwrap().config().unwrap().program, "/opt/bin/bazel");
    }

    #[test]
    fn dir_flag_without_config() {
        let config = ArgParser::try_parse_from(["fanout", "--dir", "/src/repo"])
            .unwrap()
            .config()
            .unwrap();
        assert_eq!(config.dir, Some(PathBuf::from("/src/repo")));
        assert!(config
            .job_specs()
            .iter()
            .all(|spec| spec.dir.as_deref() == Some(std::path::Path::new("/src/repo"))));
    }

    #[test]
    fn unknown_exit_policy_is_rejected() {
        assert!(ArgParser::try_parse_from(["fanout", "--exit-code", "sometimes"]).is_err());
    }
}
