use crate::StravaError;
use crate::projector::{ActivityRow, ExportProfile};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// What survives the run: where the rows went and how many there were.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportResult {
    pub row_count: usize,
    pub file_path: PathBuf,
}

/// Write a header line and one record per row to `path`.
///
/// Rows go to a temporary file next to `path` which replaces the target
/// only once everything is flushed; on error the target is left as it was
/// and the temporary file is removed.
pub fn write_csv(
    path: &Path,
    profile: ExportProfile,
    rows: &[ActivityRow],
) -> Result<ExportResult, StravaError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| StravaError::io(path, e))?;

    let mut writer = csv::Writer::from_writer(tmp);
    writer
        .write_record(profile.header())
        .map_err(|e| csv_error(path, e))?;
    for row in rows {
        writer
            .write_record(row.to_record())
            .map_err(|e| csv_error(path, e))?;
    }
    let mut tmp = writer
        .into_inner()
        .map_err(|e| StravaError::io(path, e.into_error()))?;
    tmp.flush().map_err(|e| StravaError::io(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StravaError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| StravaError::io(path, e.error))?;

    tracing::info!("wrote {} rows to {}", rows.len(), path.display());
    Ok(ExportResult {
        row_count: rows.len(),
        file_path: path.to_path_buf(),
    })
}

/// I/O failures surfaced by the csv writer are reported against `path`
/// like any other write error.
fn csv_error(path: &Path, e: csv::Error) -> StravaError {
    if !e.is_io_error() {
        return StravaError::Csv(e);
    }
    match e.into_kind() {
        csv::ErrorKind::Io(source) => StravaError::io(path, source),
        other => StravaError::io(path, std::io::Error::other(format!("{other:?}"))),
    }
}

/// Join `dir` and `filename`, appending `.csv` when the name lacks it.
pub fn resolve_output_path(dir: &Path, filename: &str) -> PathBuf {
    let filename = filename.trim();
    let has_ext = Path::new(filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if has_ext {
        dir.join(filename)
    } else {
        dir.join(format!("{filename}.csv"))
    }
}

/// The user's Downloads directory, or the current directory when the
/// platform has none.
pub fn downloads_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
