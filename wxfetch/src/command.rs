use crate::github::select_artifact;
use crate::task::TaskRunner;
use crate::{ArtifactSource, Config, Error, Result};
use std::path::PathBuf;

/// Locates the artifact for the configured host, downloads it next to the
/// destination and extracts it.
///
/// Returns the canonical extraction directory, or `None` for a dry run.
/// The host is checked before `source` is consulted at all.
pub fn fetch<S: ArtifactSource + ?Sized>(
    config: &Config,
    source: &S,
) -> Result<Option<PathBuf>> {
    let pattern = config.host().artifact_pattern()?;
    tracing::info!("artifacts for {} match `{}`", config.host(), pattern);

    let num_tasks = if config.dry_run() { 1 } else { 3 };
    let mut task = TaskRunner::new(num_tasks, config.verbose());

    task.start_task(format!("Locating `{}` in {}", pattern, config.repo()));
    let artifacts = source.list_artifacts()?;
    let artifact = select_artifact(&artifacts, &pattern)?;
    tracing::info!(
        "selected {} (id {}, {} bytes)",
        artifact.name,
        artifact.id,
        artifact.size_in_bytes
    );
    task.end_task();

    if config.dry_run() {
        println!("{} {}", artifact.name, artifact.archive_download_url);
        return Ok(None);
    }

    task.start_task(format!("Downloading {}", artifact.name));
    source.download(&artifact.archive_download_url, config.archive())?;
    task.end_verbose_task();

    task.start_task(format!("Extracting to {}", config.dest().display()));
    let files = wxcommon::extract_zip(config.archive(), config.dest()).map_err(|err| {
        Error::extract(config.archive().to_path_buf(), config.dest().to_path_buf(), err)
    })?;
    tracing::info!("extracted {} files", files.len());
    task.end_task();

    let dest =
        dunce::canonicalize(config.dest()).unwrap_or_else(|_| config.dest().to_path_buf());
    println!("Extracted to {}", dest.display());
    Ok(Some(dest))
}
