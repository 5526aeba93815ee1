use crate::{ArtifactPattern, ArtifactSource, Config, Error, HttpError, Repo, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use std::path::Path;

pub const API_VERSION: &str = "2022-11-28";
const MEDIA_TYPE: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("wxfetch/", env!("CARGO_PKG_VERSION"));

/// A workflow artifact as listed by the GitHub actions API.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Artifact {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub archive_download_url: String,
    #[serde(default)]
    pub size_in_bytes: u64,
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArtifactList {
    #[serde(default)]
    pub total_count: u64,
    pub artifacts: Vec<Artifact>,
}

/// Picks the first artifact whose name matches `pattern`.
pub fn select_artifact<'a>(
    artifacts: &'a [Artifact],
    pattern: &ArtifactPattern,
) -> Result<&'a Artifact> {
    artifacts
        .iter()
        .find(|artifact| pattern.is_match(&artifact.name))
        .ok_or_else(|| Error::NoMatchingArtifact {
            pattern: pattern.to_string(),
        })
}

pub struct GithubClient {
    client: Client,
    api_url: String,
    repo: Repo,
}

impl GithubClient {
    /// Creates a client for `repo`. Without a token the authorization header
    /// still goes out, carrying the placeholder `None`, and GitHub answers
    /// with 401.
    pub fn new(api_url: &str, repo: Repo, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.unwrap_or("None")))
            .map_err(Error::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(Error::Client)?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            repo,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_url(), config.repo().clone(), config.token())
    }

    pub fn artifacts_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/actions/artifacts",
            self.api_url,
            self.repo.owner(),
            self.repo.name()
        )
    }
}

impl ArtifactSource for GithubClient {
    fn list_artifacts(&self) -> Result<Vec<Artifact>> {
        let url = self.artifacts_url();
        let fail = |source: HttpError| Error::UpstreamRequestFailed {
            url: url.clone(),
            source,
        };
        tracing::debug!("GET {}", url);
        let resp = self.client.get(&url).send().map_err(|err| fail(err.into()))?;
        if !resp.status().is_success() {
            return Err(fail(HttpError::Status(resp.status())));
        }
        let list: ArtifactList = resp.json().map_err(|err| fail(err.into()))?;
        tracing::info!(
            "{} lists {} artifacts ({} total)",
            self.repo,
            list.artifacts.len(),
            list.total_count
        );
        Ok(list.artifacts)
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        crate::download::download(&self.client, url, dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACTS: &str = r#"{
        "total_count": 3,
        "artifacts": [
            {
                "id": 1370526340,
                "node_id": "MDg6QXJ0aWZhY3QxMzcwNTI2MzQw",
                "name": "wxWidgets-windows",
                "size_in_bytes": 215326245,
                "url": "https://api.github.com/repos/NREL/lk/actions/artifacts/1370526340",
                "archive_download_url": "https://api.github.com/repos/NREL/lk/actions/artifacts/1370526340/zip",
                "expired": false,
                "created_at": "2024-04-03T20:21:52Z"
            },
            {
                "name": "wxWidgets-macos-13-large",
                "archive_download_url": "https://api.github.com/repos/NREL/lk/actions/artifacts/1370526341/zip"
            },
            {
                "id": 1370526342,
                "name": "wxWidgets-linux",
                "archive_download_url": "https://api.github.com/repos/NREL/lk/actions/artifacts/1370526342/zip",
                "expired": true
            }
        ]
    }"#;

    fn artifact(name: &str, url: &str) -> Artifact {
        Artifact {
            id: 0,
            name: name.to_string(),
            archive_download_url: url.to_string(),
            size_in_bytes: 0,
            expired: false,
            created_at: None,
        }
    }

    #[test]
    fn parse_artifact_list() {
        let list: ArtifactList = serde_json::from_str(ARTIFACTS).unwrap();
        assert_eq!(list.total_count, 3);
        assert_eq!(list.artifacts.len(), 3);
        assert_eq!(list.artifacts[0].id, 1370526340);
        assert_eq!(list.artifacts[0].size_in_bytes, 215326245);
        assert_eq!(list.artifacts[0].created_at.as_deref(), Some("2024-04-03T20:21:52Z"));
        assert_eq!(list.artifacts[1].id, 0);
        assert_eq!(list.artifacts[1].created_at, None);
        assert!(list.artifacts[2].expired);
    }

    #[test]
    fn select_first_match() {
        let artifacts = vec![
            artifact("wxWidgets-windows-build-1", "https://example/w"),
            artifact("wxWidgets-linux-build-42", "https://example/a"),
            artifact("wxWidgets-linux-build-41", "https://example/b"),
        ];
        let pattern = ArtifactPattern::new("wxWidgets-linux").unwrap();
        let selected = select_artifact(&artifacts, &pattern).unwrap();
        assert_eq!(selected.name, "wxWidgets-linux-build-42");
        assert_eq!(selected.archive_download_url, "https://example/a");
    }

    #[test]
    fn select_follows_list_order() {
        let mut artifacts = vec![
            artifact("wxWidgets-macos-12-large", "https://example/12"),
            artifact("wxWidgets-macos-14-large", "https://example/14"),
        ];
        let pattern = ArtifactPattern::new("wxWidgets-macos-[0-9][0-9]-large").unwrap();
        assert_eq!(
            select_artifact(&artifacts, &pattern).unwrap().archive_download_url,
            "https://example/12"
        );
        artifacts.reverse();
        assert_eq!(
            select_artifact(&artifacts, &pattern).unwrap().archive_download_url,
            "https://example/14"
        );
    }

    #[test]
    fn select_without_match() {
        let list: ArtifactList = serde_json::from_str(ARTIFACTS).unwrap();
        let pattern = ArtifactPattern::new("wxWidgets-macos-latest").unwrap();
        match select_artifact(&list.artifacts, &pattern) {
            Err(Error::NoMatchingArtifact { pattern }) => {
                assert_eq!(pattern, "wxWidgets-macos-latest")
            }
            res => panic!("unexpected {:?}", res),
        }
        assert!(matches!(
            select_artifact(&[], &pattern),
            Err(Error::NoMatchingArtifact { .. })
        ));
    }

    #[test]
    fn artifacts_url() {
        let client =
            GithubClient::new("https://ghe.example.com/api/v3/", "NREL/lk".parse().unwrap(), None)
                .unwrap();
        assert_eq!(
            client.artifacts_url(),
            "https://ghe.example.com/api/v3/repos/NREL/lk/actions/artifacts"
        );
    }
}
