// src/cli.rs
//! CLI definitions for mvncopy
//!
//! Every option can also come from the environment variable named in its
//! help, which keeps build scripts that export `PACKAGES_TO_COPY` and
//! `TARGET_DIR` working unchanged.

use clap::Parser;
use clap::builder::FalseyValueParser;
use mvncopy::config::Overrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mvncopy")]
#[command(author = "mvncopy Contributors")]
#[command(version)]
#[command(about = "Resolve Maven artifacts and copy them into a directory", long_about = None)]
pub struct Cli {
    /// Package coordinates (group:artifact[:version][@classifier]), separated by ';', ',' or spaces
    #[arg(short, long, value_name = "COORDS", env = "PACKAGES_TO_COPY")]
    pub packages: Vec<String>,

    /// Directory the artifacts are copied into
    #[arg(short, long, value_name = "DIR", env = "TARGET_DIR")]
    pub target_dir: Option<PathBuf>,

    /// Additional repository URL or path, searched before the defaults
    #[arg(long = "repo", value_name = "URL", env = "MAVEN_REPOS", value_delimiter = ';')]
    pub repos: Vec<String>,

    /// Android SDK root; its bundled m2repositories are searched
    #[arg(long, value_name = "DIR", env = "ANDROID_HOME")]
    pub android_sdk: Option<PathBuf>,

    /// Search the Maven local repository (~/.m2/repository)
    #[arg(long, env = "USE_MAVEN_LOCAL_REPO", value_parser = FalseyValueParser::new())]
    pub maven_local: bool,

    /// Do not search Google Maven and Maven Central
    #[arg(long, env = "NO_REMOTE_MAVEN_REPOS", value_parser = FalseyValueParser::new())]
    pub no_remote_repos: bool,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Hide the progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log resolution details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Command-line values to merge over the configuration file
    pub fn overrides(&self) -> Overrides {
        Overrides {
            packages: self.packages.clone(),
            target_dir: self.target_dir.clone(),
            repositories: self.repos.clone(),
            android_sdk: self.android_sdk.clone(),
            maven_local: self.maven_local,
            no_remote_repos: self.no_remote_repos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "mvncopy",
            "--packages",
            "a:b:1.0;c:d",
            "-t",
            "out",
            "--repo",
            "https://one.example.com;/opt/two",
            "--maven-local",
            "--json",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.packages, vec!["a:b:1.0;c:d"]);
        assert_eq!(overrides.target_dir, Some(PathBuf::from("out")));
        assert_eq!(
            overrides.repositories,
            vec!["https://one.example.com", "/opt/two"]
        );
        assert!(overrides.maven_local);
        assert!(!overrides.no_remote_repos);
        assert!(cli.json);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["mvncopy", "-q", "-v"]).is_err());
    }
}
