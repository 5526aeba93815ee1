use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};
pub use zip::result::ZipError;
use zip::ZipArchive;

/// Failure while unpacking an archive.
///
/// `Corrupt` covers everything that comes out of the zip reader (bad
/// central directory, unsupported compression, checksum mismatch), `Io`
/// covers the destination filesystem.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid zip archive")]
    Corrupt(#[source] ZipError),
    #[error("failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;

/// Extracts all entries of the zip file at `archive` into `dest`.
///
/// `dest` and any intermediate directories are created. Returns the
/// relative paths of the extracted files in archive order. Entries that
/// would land outside of `dest` are skipped. Nothing is cleaned up when
/// extraction fails halfway.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive).map_err(ExtractError::io(archive))?;
    extract_zip_from(BufReader::new(file), dest)
}

pub fn extract_zip_from<R: Read + Seek>(reader: R, dest: &Path) -> Result<Vec<PathBuf>> {
    let mut zip = ZipArchive::new(reader).map_err(ExtractError::Corrupt)?;
    std::fs::create_dir_all(dest).map_err(ExtractError::io(dest))?;
    let mut extracted = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(ExtractError::Corrupt)?;
        let name = match entry.enclosed_name() {
            Some(name) => name.to_path_buf(),
            None => {
                log::warn!("skipping zip entry with unsafe path {}", entry.name());
                continue;
            }
        };
        let out = dest.join(&name);
        if entry.is_dir() {
            std::fs::create_dir_all(&out).map_err(ExtractError::io(&out))?;
            continue;
        }
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent).map_err(ExtractError::io(parent))?;
        }
        let mut w = BufWriter::new(File::create(&out).map_err(ExtractError::io(&out))?);
        let mut buf = [0; 8192];
        loop {
            // read errors come from decompression or the crc check
            let n = entry
                .read(&mut buf)
                .map_err(|err| ExtractError::Corrupt(ZipError::Io(err)))?;
            if n == 0 {
                break;
            }
            w.write_all(&buf[..n]).map_err(ExtractError::io(&out))?;
        }
        w.flush().map_err(ExtractError::io(&out))?;
        if let Some(mode) = entry.unix_mode() {
            set_mode(&out, mode)?;
        }
        log::debug!("extracted {}", name.display());
        extracted.push(name);
    }
    Ok(extracted)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .map_err(ExtractError::io(path))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
