use crate::{Error, Host, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Repository whose workflow artifacts are searched by default.
pub const DEFAULT_REPO: &str = "NREL/lk";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Name of the downloaded archive in the working directory.
pub const ARCHIVE_NAME: &str = "wx.zip";

/// Downloads the wxWidgets build for this machine from GitHub Actions and
/// extracts it into DIR.
#[derive(Clone, Debug, Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to extract into, relative to the working directory
    #[clap(value_name = "DIR")]
    dir: String,
    /// Repository whose workflow artifacts are searched
    #[clap(long, value_name = "OWNER/NAME", default_value = DEFAULT_REPO)]
    repo: Repo,
    /// Base url of the GitHub REST API
    #[clap(long, default_value = DEFAULT_API_URL)]
    api_url: String,
    /// Token sent as bearer credential with every request
    #[clap(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Only print the artifact that would be downloaded
    #[clap(long)]
    dry_run: bool,
    /// Use verbose output
    #[clap(long, short)]
    verbose: bool,
}

impl Args {
    pub fn from_env() -> Result<Self> {
        Self::parse_args(std::env::args_os())
    }

    /// Parses command line arguments. A missing DIR is reported as
    /// [`Error::MissingArgument`], every other problem as [`Error::Cli`].
    pub fn parse_args<I, T>(itr: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(itr).map_err(|err| match err.kind() {
            ErrorKind::MissingRequiredArgument => Error::MissingArgument,
            _ => Error::Cli(err),
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl std::str::FromStr for Repo {
    type Err = Error;

    fn from_str(repo: &str) -> Result<Self> {
        match repo.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(Error::InvalidRepo(repo.to_string())),
        }
    }
}

/// Everything a run needs, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    token: Option<String>,
    repo: Repo,
    api_url: String,
    host: Host,
    archive: PathBuf,
    dest: PathBuf,
    dry_run: bool,
    verbose: bool,
}

impl Config {
    pub fn new(args: Args, host: Host, cwd: &Path) -> Self {
        Self {
            token: args.token,
            repo: args.repo,
            api_url: args.api_url,
            host,
            archive: cwd.join(ARCHIVE_NAME),
            dest: cwd.join(&args.dir),
            dry_run: args.dry_run,
            verbose: args.verbose,
        }
    }

    /// Resolves `args` against the running host and working directory.
    pub fn from_env(args: Args) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(Error::CurrentDir)?;
        Ok(Self::new(args, Host::detect(), &cwd))
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn repo(&self) -> &Repo {
        &self.repo
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dir() {
        let err = Args::parse_args(["wxfetch"]).unwrap_err();
        assert!(matches!(err, Error::MissingArgument), "{:?}", err);
        let err = Args::parse_args(["wxfetch", "--dry-run"]).unwrap_err();
        assert!(matches!(err, Error::MissingArgument), "{:?}", err);
    }

    #[test]
    fn unknown_flag() {
        let err = Args::parse_args(["wxfetch", "wxout", "--frobnicate"]).unwrap_err();
        assert!(matches!(err, Error::Cli(_)), "{:?}", err);
    }

    #[test]
    fn defaults() {
        let args = Args::parse_args(["wxfetch", "wxout"]).unwrap();
        let config = Config::new(args, Host::new("linux", "linux-x86_64"), Path::new("/work"));
        assert_eq!(config.repo().to_string(), "NREL/lk");
        assert_eq!(config.api_url(), "https://api.github.com");
        assert_eq!(config.archive(), Path::new("/work/wx.zip"));
        assert_eq!(config.dest(), Path::new("/work/wxout"));
        assert!(!config.dry_run());
        assert!(!config.verbose());
    }

    #[test]
    fn overrides() {
        let args = Args::parse_args([
            "wxfetch",
            "deps/wx",
            "--repo",
            "octo/cat",
            "--api-url",
            "http://localhost:1234",
            "--token",
            "secret",
            "--dry-run",
            "-v",
        ])
        .unwrap();
        let config = Config::new(args, Host::new("linux", "linux-x86_64"), Path::new("/work"));
        assert_eq!(config.repo().owner(), "octo");
        assert_eq!(config.repo().name(), "cat");
        assert_eq!(config.api_url(), "http://localhost:1234");
        assert_eq!(config.token(), Some("secret"));
        assert_eq!(config.dest(), Path::new("/work/deps/wx"));
        assert!(config.dry_run());
        assert!(config.verbose());
    }

    #[test]
    fn repo_names() {
        assert!("NREL/lk".parse::<Repo>().is_ok());
        for repo in ["", "NREL", "/lk", "NREL/", "NREL/lk/extra"] {
            assert!(
                matches!(repo.parse::<Repo>(), Err(Error::InvalidRepo(_))),
                "{}",
                repo
            );
        }
        let err = Args::parse_args(["wxfetch", "wxout", "--repo", "nope"]).unwrap_err();
        assert!(matches!(err, Error::Cli(_)), "{:?}", err);
    }
}
