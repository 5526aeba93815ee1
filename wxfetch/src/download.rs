use crate::{Error, HttpError, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use reqwest::blocking::Client;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const TEMPLATE: &str =
    "{spinner:.green} {prefix:.bold} [{elapsed}] {wide_bar:.green} {bytes}/{total_bytes} {msg}";

fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▇▆▅▄▃▂▁  ")
}

/// Streams the body of `url` into `dest`. Non-success statuses fail before
/// `dest` is touched.
pub(crate) fn download(client: &Client, url: &str, dest: &Path) -> Result<()> {
    let fail = |source: HttpError| Error::DownloadFailed {
        url: url.to_string(),
        source,
    };
    let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
        .with_style(progress_style());
    let file_name = dest
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    pb.set_prefix(file_name);
    pb.set_message("📥 downloading");

    tracing::debug!("GET {}", url);
    let mut resp = client.get(url).send().map_err(|err| fail(err.into()))?;
    if !resp.status().is_success() {
        pb.abandon_with_message("📥 failed");
        return Err(fail(HttpError::Status(resp.status())));
    }
    pb.set_length(resp.content_length().unwrap_or_default());

    let file = File::create(dest).map_err(|err| fail(err.into()))?;
    let mut w = pb.wrap_write(BufWriter::new(file));
    let len = std::io::copy(&mut resp, &mut w).map_err(|err| fail(err.into()))?;
    w.flush().map_err(|err| fail(err.into()))?;
    pb.finish_with_message("📥 downloaded");
    tracing::info!("downloaded {} bytes from {} to {}", len, url, dest.display());
    Ok(())
}
