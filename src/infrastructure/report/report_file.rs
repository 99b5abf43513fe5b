use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("cannot write report {}: {source}", .path.display())]
pub struct ReportWriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Files produced by one save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    pub markdown: PathBuf,
    pub json: Option<PathBuf>,
}

/// `health-report-YYYYmmdd-HHMMSS`, shared by the markdown file and its JSON sibling.
#[must_use]
pub fn report_stem(at: DateTime<Local>) -> String {
    format!("health-report-{}", at.format("%Y%m%d-%H%M%S"))
}

/// Reports saved within the same second get `-1`, `-2`, ... appended.
const MAX_SUFFIX: u32 = 99;

/// Writes `<stem>.md` and, when given, `<stem>.json` into `dir`, creating it if needed.
///
/// Existing reports are never overwritten: when `<stem>.md` exists the next
/// free `<stem>-N` is used for both files.
///
/// # Errors
///
/// Returns `ReportWriteError` naming the path that could not be created or written.
pub fn save_report(
    dir: &Path,
    stem: &str,
    markdown: &str,
    json: Option<&str>,
) -> Result<SavedReport, ReportWriteError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportWriteError {
        path: dir.to_path_buf(),
        source,
    })?;

    let (stem, markdown) = create_markdown(dir, stem, markdown)?;
    let json = json
        .map(|content| {
            let path = dir.join(format!("{stem}.json"));
            write_new(&path, content)
                .map(|()| path.clone())
                .map_err(|source| ReportWriteError { path, source })
        })
        .transpose()?;

    tracing::info!(path = %markdown.display(), "report saved");
    Ok(SavedReport { markdown, json })
}

/// Creates the first free `<stem>[-N].md`, returning the stem actually used.
fn create_markdown(
    dir: &Path,
    stem: &str,
    content: &str,
) -> Result<(String, PathBuf), ReportWriteError> {
    let candidates = (0..=MAX_SUFFIX).map(|n| match n {
        0 => stem.to_string(),
        n => format!("{stem}-{n}"),
    });
    for candidate in candidates {
        if dir.join(format!("{candidate}.json")).exists() {
            continue;
        }
        let path = dir.join(format!("{candidate}.md"));
        match write_new(&path, content) {
            Ok(()) => return Ok((candidate, path)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(source) => return Err(ReportWriteError { path, source }),
        }
    }
    Err(ReportWriteError {
        path: dir.join(format!("{stem}-{MAX_SUFFIX}.md")),
        source: io::Error::from(io::ErrorKind::AlreadyExists),
    })
}

fn write_new(path: &Path, content: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(content.as_bytes())
}
