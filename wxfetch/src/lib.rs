use regex::Regex;
use std::path::Path;

pub mod command;
mod config;
mod download;
mod error;
pub mod github;
mod task;

pub use crate::config::{Args, Config, Repo};
pub use crate::error::{Error, HttpError, Result};
pub use crate::github::{Artifact, GithubClient};

/// Source of CI artifacts.
pub trait ArtifactSource {
    /// Lists the available artifacts in the order the service returns them.
    fn list_artifacts(&self) -> Result<Vec<Artifact>>;

    /// Stores the archive behind `url` at `dest`, replacing any existing file.
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Platform {
    Linux,
    Macos,
    Windows,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Macos => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = Error;

    fn from_str(os: &str) -> Result<Self> {
        Ok(match os.to_ascii_lowercase().as_str() {
            "linux" => Self::Linux,
            "macos" | "darwin" => Self::Macos,
            "windows" => Self::Windows,
            _ => return Err(Error::UnsupportedPlatform(os.to_string())),
        })
    }
}

/// The machine wxfetch runs on, as reported by the OS.
///
/// `details` is a free-form description of the platform that includes the
/// cpu architecture, e.g. `macos-arm64`. It is only consulted on macOS to
/// tell Apple silicon runners from Intel ones.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Host {
    os: String,
    details: String,
}

impl Host {
    pub fn new(os: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            details: details.into(),
        }
    }

    pub fn detect() -> Self {
        let os = std::env::consts::OS;
        let machine = match std::env::consts::ARCH {
            "aarch64" => "arm64",
            arch => arch,
        };
        Self::new(os, format!("{}-{}", os, machine))
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn platform(&self) -> Result<Platform> {
        self.os.parse()
    }

    /// Pattern an artifact name has to contain to be usable on this host.
    pub fn artifact_pattern(&self) -> Result<ArtifactPattern> {
        let pattern = match self.platform()? {
            Platform::Windows => "wxWidgets-windows",
            Platform::Linux => "wxWidgets-linux",
            Platform::Macos if self.details.contains("arm") => "wxWidgets-macos-latest",
            Platform::Macos => "wxWidgets-macos-[0-9][0-9]-large",
        };
        ArtifactPattern::new(pattern)
    }
}

impl std::fmt::Display for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({})", self.os, self.details)
    }
}

/// Unanchored regular expression searched for in artifact names.
#[derive(Clone, Debug)]
pub struct ArtifactPattern {
    regex: Regex,
}

impl ArtifactPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl std::fmt::Display for ArtifactPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
