//! Fetching the NVD dictionary archive and cleaning up after it.
//!
//! NVD publishes the dictionary as a zip holding one XML file. Both the
//! archive and the extracted XML use fixed, well-known file names so that
//! [`cleanup`] can remove exactly what a fetch created.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// Where NVD serves the current dictionary archive.
pub const NVD_DICTIONARY_URL: &str =
    "https://nvd.nist.gov/feeds/xml/cpe/dictionary/official-cpe-dictionary_v2.3.xml.zip";

/// File name of the downloaded archive.
pub const ARCHIVE_FILE: &str = "official-cpe-dictionary_v2.3.xml.zip";

/// File name of the dictionary inside the archive, and of the extracted copy.
pub const DICTIONARY_FILE: &str = "official-cpe-dictionary_v2.3.xml";

/// Write buffer size for the downloaded body.
pub const DOWNLOAD_CHUNK_SIZE: usize = 8192;

/// Download the archive at `url` into `dir` and extract the dictionary.
///
/// Returns the path of the extracted XML file.
#[cfg(feature = "download")]
pub async fn fetch_dictionary(url: &str, dir: &Path) -> Result<PathBuf> {
    let archive = dir.join(ARCHIVE_FILE);
    download_archive(url, &archive).await?;
    extract_dictionary(&archive, dir)
}

/// Stream the body of a GET to `url` into `dest`.
///
/// The body is written chunk by chunk and never held in memory as a whole.
/// Returns the number of bytes written. A single attempt is made.
#[cfg(feature = "download")]
pub async fn download_archive(url: &str, dest: &Path) -> Result<u64> {
    info!("Fetching the latest dictionary archive from {url}");

    let mut response = reqwest::get(url)
        .await
        .map_err(|e| Error::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::Download(format!(
            "GET {url} returned {}",
            response.status()
        )));
    }

    let write_err = |e| Error::Write {
        path: dest.to_path_buf(),
        source: e,
    };
    let file = File::create(dest).map_err(write_err)?;
    let mut out = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);

    let mut written = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| Error::Download(format!("reading response body: {e}")))?
    {
        out.write_all(&chunk).map_err(write_err)?;
        written += chunk.len() as u64;
    }
    out.flush().map_err(write_err)?;

    info!("Saved {written} bytes to {}", dest.display());
    Ok(written)
}

/// Decompress [`DICTIONARY_FILE`] from `archive` into `dir`.
///
/// Only that entry is extracted; other members are ignored.
pub fn extract_dictionary(archive: &Path, dir: &Path) -> Result<PathBuf> {
    info!("Unzipping {}", archive.display());

    let file = File::open(archive).map_err(|e| Error::Read {
        path: archive.to_path_buf(),
        source: e,
    })?;
    let mut zip = zip::ZipArchive::new(file)?;
    let mut entry = zip.by_name(DICTIONARY_FILE)?;

    let dest = dir.join(DICTIONARY_FILE);
    let write_err = |e| Error::Write {
        path: dest.clone(),
        source: e,
    };
    let mut out = BufWriter::new(File::create(&dest).map_err(write_err)?);
    std::io::copy(&mut entry, &mut out).map_err(write_err)?;
    out.flush().map_err(write_err)?;

    Ok(dest)
}

/// Remove the archive and the extracted dictionary from `dir`.
///
/// Both files must exist; a missing one is an error.
pub fn cleanup(dir: &Path) -> Result<()> {
    info!("Cleaning up downloaded files");

    for name in [ARCHIVE_FILE, DICTIONARY_FILE] {
        let path = dir.join(name);
        std::fs::remove_file(&path).map_err(|e| Error::Remove { path, source: e })?;
    }
    Ok(())
}
