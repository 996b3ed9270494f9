//! Batch trimming of GPX files inside a ZIP archive.
//!
//! Every `.gpx` entry is trimmed and written to the output archive as
//! `<stem>_trimmed.gpx` under the same folder path. Directories, other files
//! and macOS resource forks (`._*`) are skipped. A failing entry is reported
//! and left out of the output; it does not abort the archive.

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use log::{info, warn};
use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Result, TrimError};
use crate::gpx_io::{apply_times, read_gpx, track_points, trimmed_file_name, write_gpx};
use crate::report::PauseReport;
use crate::trimmer::{trim_track, TrimResult};
use crate::TrimConfig;

/// Outcome for one archive entry.
#[derive(Debug, Serialize)]
pub struct ArchiveEntryReport {
    /// Entry name in the input archive
    pub name: String,
    /// Entry name in the output archive, if written
    pub output_name: Option<String>,
    pub report: Option<PauseReport>,
    /// Error message when the entry could not be trimmed
    pub error: Option<String>,
}

impl ArchiveEntryReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn archive_error(e: zip::result::ZipError) -> TrimError {
    TrimError::Archive {
        message: e.to_string(),
    }
}

fn is_track_entry(name: &str) -> bool {
    let path = Path::new(name);
    let is_gpx = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gpx"));
    let is_resource_fork = path
        .file_name()
        .is_some_and(|f| f.to_string_lossy().starts_with("._"));
    is_gpx && !is_resource_fork
}

/// Entry name from its raw bytes.
///
/// Archives written without the UTF-8 flag usually still hold UTF-8 names,
/// which the CP437 default would garble. Bytes that are not valid UTF-8 are
/// read as Latin-1.
fn decode_entry_name(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(name) => name.to_string(),
        Err(_) => raw.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Trim one GPX document held in memory, returning the rewritten bytes.
fn trim_entry(data: &[u8], config: &TrimConfig) -> Result<(Vec<u8>, PauseReport)> {
    let gpx = read_gpx(Cursor::new(data))?;
    let points = track_points(&gpx)?;
    let TrimResult { points, report } = trim_track(&points, config)?;
    let trimmed = apply_times(&gpx, &points)?;
    let mut out = Vec::new();
    write_gpx(&trimmed, &mut out)?;
    Ok((out, report))
}

/// Trim every GPX file in a ZIP archive and write a new archive.
///
/// Returns one report per GPX entry, in archive order. Entries are trimmed
/// in parallel when the `parallel` feature is enabled.
pub fn trim_archive<R, W>(reader: R, writer: W, config: &TrimConfig) -> Result<Vec<ArchiveEntryReport>>
where
    R: Read + Seek,
    W: Write + Seek,
{
    config.validate()?;
    let mut archive = ZipArchive::new(reader).map_err(archive_error)?;

    let mut entries: Vec<(String, Vec<u8>)> = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(archive_error)?;
        let name = decode_entry_name(file.name_raw());
        if file.is_dir() || !is_track_entry(&name) {
            continue;
        }
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        entries.push((name, data));
    }

    #[cfg(feature = "parallel")]
    let results: Vec<Result<(Vec<u8>, PauseReport)>> = {
        use rayon::prelude::*;
        entries
            .par_iter()
            .map(|(_, data)| trim_entry(data, config))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<(Vec<u8>, PauseReport)>> = entries
        .iter()
        .map(|(_, data)| trim_entry(data, config))
        .collect();

    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut reports = Vec::with_capacity(entries.len());

    for ((name, _), result) in entries.into_iter().zip(results) {
        match result {
            Ok((bytes, report)) => {
                let output_name = trimmed_file_name(Path::new(&name))
                    .to_string_lossy()
                    .replace('\\', "/");
                zip.start_file(output_name.as_str(), options)
                    .map_err(archive_error)?;
                zip.write_all(&bytes)?;
                reports.push(ArchiveEntryReport {
                    name,
                    output_name: Some(output_name),
                    report: Some(report),
                    error: None,
                });
            }
            Err(e) => {
                warn!("[Archive] Skipping {}: {}", name, e);
                reports.push(ArchiveEntryReport {
                    name,
                    output_name: None,
                    report: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }
    zip.finish().map_err(archive_error)?;

    info!(
        "[Archive] Trimmed {} of {} GPX files",
        reports.iter().filter(|r| r.is_ok()).count(),
        reports.len()
    );
    Ok(reports)
}
