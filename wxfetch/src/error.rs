use std::path::PathBuf;
use wxcommon::ExtractError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing argument: name of the directory to extract wxWidgets into")]
    MissingArgument,
    #[error("{0} operating system not implemented")]
    UnsupportedPlatform(String),
    #[error("GET {url} failed")]
    UpstreamRequestFailed {
        url: String,
        #[source]
        source: HttpError,
    },
    #[error("no artifact name matches `{pattern}`")]
    NoMatchingArtifact { pattern: String },
    #[error("downloading {url} failed")]
    DownloadFailed {
        url: String,
        #[source]
        source: HttpError,
    },
    #[error("{} is not a valid archive", .path.display())]
    CorruptArchive {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },
    #[error("extracting into {} failed", .dest.display())]
    ExtractionFailed {
        dest: PathBuf,
        #[source]
        source: ExtractError,
    },
    #[error("invalid repository `{0}`, expected OWNER/NAME")]
    InvalidRepo(String),
    #[error("invalid artifact pattern")]
    InvalidPattern(#[from] regex::Error),
    #[error("token is not a valid header value")]
    InvalidToken(#[source] reqwest::header::InvalidHeaderValue),
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),
    #[error("failed to determine the working directory")]
    CurrentDir(#[source] std::io::Error),
    #[error(transparent)]
    Cli(#[from] clap::Error),
}

/// Why a single request failed.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("returned status code {0}")]
    Status(reqwest::StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("failed to store response body")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Sorts an extraction failure into a corrupt archive or a filesystem
    /// problem at the destination.
    pub(crate) fn extract(archive: PathBuf, dest: PathBuf, source: ExtractError) -> Self {
        match source {
            ExtractError::Corrupt(_) => Self::CorruptArchive {
                path: archive,
                source,
            },
            ExtractError::Io { .. } => Self::ExtractionFailed { dest, source },
        }
    }
}
