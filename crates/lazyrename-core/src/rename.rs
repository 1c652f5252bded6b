//! Folder resolution and the rename loop.
//!
//! Every regular file in a folder is visited in name order. A file whose base
//! name (name without its final extension) is at least `trim` characters long
//! loses its last `trim` characters and receives `.NNNN` before the
//! extension, where `NNNN` is a counter that starts at 1 in each folder and
//! only advances on a successful rename. The first failed rename stops the
//! current folder; the remaining folders are still processed.

use std::fs;
use std::io;
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{RenameError, RenameFailure};
use crate::mode::Mode;
use crate::state::AppState;

/// Result of processing a single folder.
#[derive(Debug)]
pub struct FolderOutcome {
    /// Folder that was processed.
    pub folder: PathBuf,
    /// Files renamed in this folder.
    pub renamed: usize,
    /// The rename that stopped this folder, if any.
    pub failure: Option<RenameFailure>,
    /// Set when the folder could not be listed at all.
    pub list_error: Option<io::Error>,
}

impl FolderOutcome {
    fn new(folder: &Path) -> Self {
        Self {
            folder: folder.to_path_buf(),
            renamed: 0,
            failure: None,
            list_error: None,
        }
    }

    /// Returns `true` if the folder was processed to the end.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failure.is_none() && self.list_error.is_none()
    }
}

/// Aggregate result of a rename run.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct RenameReport {
    /// Files renamed across all folders.
    pub total_renamed: usize,
    /// One entry per processed folder, in processing order.
    pub folders: Vec<FolderOutcome>,
}

impl RenameReport {
    /// Rename failures, in the order they happened.
    pub fn failures(&self) -> impl Iterator<Item = &RenameFailure> {
        self.folders.iter().filter_map(|f| f.failure.as_ref())
    }

    /// Returns `true` if every folder was processed to the end.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.folders.iter().all(FolderOutcome::is_complete)
    }
}

/// Parses the raw trim count. Surrounding whitespace is ignored.
///
/// Integers too large for `usize` saturate to `usize::MAX`: no file name is
/// that long, so every file is skipped.
///
/// # Errors
///
/// Returns [`RenameError::InvalidParameter`] if `raw` is not a non-negative integer.
pub fn parse_trim_count(raw: &str) -> Result<usize, RenameError> {
    match raw.trim().parse::<usize>() {
        Ok(trim) => Ok(trim),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(usize::MAX),
        Err(_) => Err(RenameError::InvalidParameter(String::from(raw))),
    }
}

/// Splits a file name into base name and final extension (dot included).
///
/// Leading dots never start an extension: `.bashrc` has none, `.a.b`
/// splits into `.a` and `.b`.
#[must_use]
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name
        .len()
        .saturating_sub(name.trim_start_matches('.').len());
    match name.rfind('.') {
        Some(idx) if idx >= leading_dots => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Computes the new name for `name`, or `None` if its base name is shorter
/// than `trim` characters.
#[must_use]
pub fn new_file_name(name: &str, trim: usize, counter: usize) -> Option<String> {
    let (base, ext) = split_extension(name);
    let keep = base.chars().count().checked_sub(trim)?;
    let trimmed: String = base.chars().take(keep).collect();
    Some(format!("{trimmed}.{counter:04}{ext}"))
}

/// Derives the effective folder set from the folder rows.
///
/// - [`Mode::Manual`]: every row that names an existing directory.
/// - [`Mode::Subfolders`]: the immediate subdirectories of the first row, in
///   name order. The parent itself is never included.
#[must_use]
pub fn resolve_folders(mode: Mode, entries: &[String]) -> Vec<PathBuf> {
    match mode {
        Mode::Manual => entries
            .iter()
            .map(|entry| PathBuf::from(entry.trim()))
            .filter(|path| path.is_dir())
            .inspect(|path| tracing::info!("Added folder: {}", path.display()))
            .collect(),
        Mode::Subfolders => entries
            .first()
            .map(|parent| subfolders_of(Path::new(parent.trim())))
            .unwrap_or_default(),
    }
}

/// Lists the immediate child directories of `parent`.
fn subfolders_of(parent: &Path) -> Vec<PathBuf> {
    if !parent.is_dir() {
        return Vec::new();
    }
    let entries = match fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Could not list parent folder {}: {e}", parent.display());
            return Vec::new();
        }
    };

    let mut children: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    children.sort();

    for child in &children {
        tracing::info!("Added subfolder: {}", child.display());
    }
    children
}

/// Runs a rename with the current application state.
///
/// # Errors
///
/// Returns [`RenameError::InvalidParameter`] if the trim text is not a
/// number, or [`RenameError::NoValidFolders`] if no folder resolves. In both
/// cases nothing on disk is touched.
pub fn run_rename(state: &AppState) -> Result<RenameReport, RenameError> {
    let trim = parse_trim_count(state.trim_text()).inspect_err(|_| {
        tracing::error!("Invalid input for digits to trim: {:?}", state.trim_text());
    })?;
    let folders = resolve_folders(state.mode(), state.rows().entries());
    rename_in_folders(&folders, trim)
}

/// Renames files in each folder, in order.
///
/// # Errors
///
/// Returns [`RenameError::NoValidFolders`] if `folders` is empty.
pub fn rename_in_folders(folders: &[PathBuf], trim: usize) -> Result<RenameReport, RenameError> {
    if folders.is_empty() {
        tracing::warn!("No valid folders were selected for renaming.");
        return Err(RenameError::NoValidFolders);
    }

    tracing::info!("Renaming files with digits_to_trim: {trim}");

    let mut report = RenameReport::default();
    for folder in folders {
        let outcome = rename_folder(folder, trim);
        report.total_renamed = report.total_renamed.saturating_add(outcome.renamed);
        report.folders.push(outcome);
    }

    tracing::info!("Total files renamed: {}", report.total_renamed);
    Ok(report)
}

/// Renames the files of a single folder. The counter starts at 1.
#[must_use]
pub fn rename_folder(folder: &Path, trim: usize) -> FolderOutcome {
    tracing::info!("Processing folder: {}", folder.display());
    let mut outcome = FolderOutcome::new(folder);

    let names = match list_files(folder) {
        Ok(names) => names,
        Err(e) => {
            tracing::error!("Could not list folder {}: {e}", folder.display());
            outcome.list_error = Some(e);
            return outcome;
        }
    };

    let mut counter: usize = 1;
    for name in names {
        let Some(new_name) = new_file_name(&name, trim, counter) else {
            tracing::debug!("Skipping file {name}: Name too short.");
            continue;
        };

        if let Err(reason) = rename_within(folder, &name, &new_name) {
            tracing::error!("Could not rename {name}: {reason}");
            outcome.failure = Some(RenameFailure {
                folder: folder.to_path_buf(),
                file: name,
                new_name,
                reason,
            });
            break;
        }

        tracing::info!("Renamed {name} to {new_name}");
        outcome.renamed = outcome.renamed.saturating_add(1);
        counter = counter.saturating_add(1);
    }

    tracing::info!(
        "Renamed {} file(s) in folder: {}",
        outcome.renamed,
        folder.display()
    );
    outcome
}

/// Regular file names in `folder` (symlinks followed), sorted ascending.
fn list_files(folder: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                tracing::debug!(
                    "Skipping file {}: name is not valid UTF-8.",
                    raw.to_string_lossy()
                );
            }
        }
    }
    names.sort_unstable();
    Ok(names)
}

/// Renames `name` to `new_name` inside `folder`, refusing to overwrite.
fn rename_within(folder: &Path, name: &str, new_name: &str) -> io::Result<()> {
    if name == new_name {
        return Ok(());
    }
    let src = folder.join(name);
    let dst = folder.join(new_name);
    if fs::symlink_metadata(&dst).is_ok() && !is_case_variant_of(&src, &dst, name, new_name) {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{new_name} already exists"),
        ));
    }
    fs::rename(src, dst)
}

/// Returns `true` if `dst` only differs from `src` in letter case and both
/// paths reach the same directory entry, as on a case-insensitive filesystem.
fn is_case_variant_of(src: &Path, dst: &Path, name: &str, new_name: &str) -> bool {
    if name.to_lowercase() != new_name.to_lowercase() {
        return false;
    }
    same_entry(src, dst)
}

#[cfg(unix)]
fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

// Without inode numbers, a case-only clash on an existing path is taken to
// be the source itself.
#[cfg(not(unix))]
fn same_entry(a: &Path, b: &Path) -> bool {
    fs::symlink_metadata(a).is_ok() && fs::symlink_metadata(b).is_ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::state::FolderRows;
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name).unwrap();
    }

    fn names_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_parse_trim_count() {
        assert_eq!(parse_trim_count("4"), Ok(4));
        assert_eq!(parse_trim_count(" 10 "), Ok(10));
        assert_eq!(parse_trim_count("0"), Ok(0));
        assert_eq!(
            parse_trim_count("four"),
            Err(RenameError::InvalidParameter(String::from("four")))
        );
        assert_eq!(
            parse_trim_count("-1"),
            Err(RenameError::InvalidParameter(String::from("-1")))
        );
        assert_eq!(
            parse_trim_count(""),
            Err(RenameError::InvalidParameter(String::new()))
        );
    }

    #[test]
    fn test_parse_trim_count_saturates_huge_integers() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "img1001.jpg");

        // Act
        let trim = parse_trim_count("99999999999999999999999");
        let outcome = rename_folder(dir.path(), *trim.as_ref().unwrap());

        // Assert
        assert_eq!(trim, Ok(usize::MAX));
        assert_eq!(
            parse_trim_count("-99999999999999999999999"),
            Err(RenameError::InvalidParameter(String::from(
                "-99999999999999999999999"
            )))
        );
        assert_eq!(outcome.renamed, 0);
        assert!(outcome.is_complete());
        assert_eq!(names_in(dir.path()), vec!["img1001.jpg"]);
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("img1001.jpg"), ("img1001", ".jpg"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".bashrc"), (".bashrc", ""));
        assert_eq!(split_extension(".a.b"), (".a", ".b"));
        assert_eq!(split_extension("file."), ("file", "."));
        assert_eq!(split_extension(".."), ("..", ""));
    }

    #[test]
    fn test_new_file_name() {
        assert_eq!(
            new_file_name("img1001.jpg", 4, 1).as_deref(),
            Some("img.0001.jpg")
        );
        assert_eq!(new_file_name("short.txt", 10, 1), None);
        assert_eq!(new_file_name("abcd.txt", 4, 2).as_deref(), Some(".0002.txt"));
        assert_eq!(new_file_name("photo.png", 0, 3).as_deref(), Some("photo.0003.png"));
        assert_eq!(new_file_name("noext123", 3, 1).as_deref(), Some("noext.0001"));
    }

    #[test]
    fn test_new_file_name_counter_grows_past_four_digits() {
        assert_eq!(
            new_file_name("img1001.jpg", 4, 12345).as_deref(),
            Some("img.12345.jpg")
        );
    }

    #[test]
    fn test_new_file_name_counts_characters_not_bytes() {
        // Arrange: "写真" is 2 characters but 6 bytes.
        let name = "写真01.jpg";

        // Act & Assert
        assert_eq!(new_file_name(name, 2, 1).as_deref(), Some("写真.0001.jpg"));
        assert_eq!(new_file_name(name, 5, 1), None);
    }

    #[test]
    fn test_rename_folder_basic() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        for name in ["img1003.jpg", "img1001.jpg", "img1002.jpg"] {
            touch(dir.path(), name);
        }

        // Act
        let outcome = rename_folder(dir.path(), 4);

        // Assert
        assert_eq!(outcome.renamed, 3);
        assert!(outcome.is_complete());
        assert_eq!(
            names_in(dir.path()),
            vec!["img.0001.jpg", "img.0002.jpg", "img.0003.jpg"]
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("img.0002.jpg")).unwrap(),
            "img1002.jpg"
        );
    }

    #[test]
    fn test_short_names_are_skipped_without_consuming_counter() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.txt");
        touch(dir.path(), "b12345.txt");
        touch(dir.path(), "c12345.txt");

        // Act
        let outcome = rename_folder(dir.path(), 5);

        // Assert
        assert_eq!(outcome.renamed, 2);
        assert_eq!(
            names_in(dir.path()),
            vec!["a.txt", "b.0001.txt", "c.0002.txt"]
        );
    }

    #[test]
    fn test_directories_are_not_renamed() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub1234")).unwrap();
        touch(dir.path(), "doc1234.pdf");

        // Act
        let outcome = rename_folder(dir.path(), 4);

        // Assert
        assert_eq!(outcome.renamed, 1);
        assert_eq!(names_in(dir.path()), vec!["doc.0001.pdf", "sub1234"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_and_non_utf8_names() {
        use std::ffi::{OsStr, OsString};
        use std::os::unix::ffi::OsStrExt;
        use std::os::unix::fs::symlink;

        // Arrange
        let outside = tempfile::tempdir().unwrap();
        let real_dir = outside.path().join("real_dir");
        fs::create_dir(&real_dir).unwrap();
        touch(outside.path(), "target.txt");

        let dir = tempfile::tempdir().unwrap();
        symlink(&real_dir, dir.path().join("linkdir1234")).unwrap();
        symlink(
            outside.path().join("target.txt"),
            dir.path().join("linkfile1234.txt"),
        )
        .unwrap();
        let bad = OsStr::from_bytes(b"bad\xff1234.txt");
        fs::write(dir.path().join(bad), b"").unwrap();

        // Act
        let outcome = rename_folder(dir.path(), 4);

        // Assert
        assert_eq!(outcome.renamed, 1);
        assert!(outcome.failure.is_none());
        let mut names: Vec<OsString> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                OsString::from(bad),
                OsString::from("linkdir1234"),
                OsString::from("linkfile.0001.txt"),
            ]
        );
        assert!(
            fs::symlink_metadata(dir.path().join("linkfile.0001.txt"))
                .unwrap()
                .file_type()
                .is_symlink()
        );
        assert!(outside.path().join("target.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_case_only_rename_of_the_same_entry_is_not_a_clash() {
        // Arrange: a hard link stands in for the case-insensitive view of the source.
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "IMG.0001.jpg");
        fs::hard_link(
            dir.path().join("IMG.0001.jpg"),
            dir.path().join("img.0001.jpg"),
        )
        .unwrap();

        // Act
        let result = rename_within(dir.path(), "IMG.0001.jpg", "img.0001.jpg");

        // Assert
        assert!(result.is_ok());
        assert!(dir.path().join("img.0001.jpg").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_other_entry_with_case_variant_name_is_a_clash() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "IMG.0001.jpg");
        touch(dir.path(), "img.0001.jpg");

        // Act
        let result = rename_within(dir.path(), "IMG.0001.jpg", "img.0001.jpg");

        // Assert
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(
            fs::read_to_string(dir.path().join("img.0001.jpg")).unwrap(),
            "img.0001.jpg"
        );
    }

    #[test]
    fn test_collision_aborts_rest_of_folder() {
        // Arrange: "a-001.txt" sorts before "a.0001.txt" and would be renamed onto it.
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a-001.txt");
        touch(dir.path(), "a.0001.txt");
        touch(dir.path(), "b1234.txt");

        // Act
        let outcome = rename_folder(dir.path(), 4);

        // Assert
        assert_eq!(outcome.renamed, 0);
        let failure = outcome.failure.unwrap();
        assert_eq!(failure.file, "a-001.txt");
        assert_eq!(failure.new_name, "a.0001.txt");
        assert_eq!(failure.reason.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(
            names_in(dir.path()),
            vec!["a-001.txt", "a.0001.txt", "b1234.txt"]
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("a.0001.txt")).unwrap(),
            "a.0001.txt"
        );
    }

    #[test]
    fn test_rename_to_same_name_is_a_successful_noop() {
        // Arrange: base "img.0001" minus 5 chars is "img", giving "img.0001.jpg" again.
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "img.0001.jpg");

        // Act
        let outcome = rename_folder(dir.path(), 5);

        // Assert
        assert_eq!(outcome.renamed, 1);
        assert!(outcome.failure.is_none());
        assert_eq!(names_in(dir.path()), vec!["img.0001.jpg"]);
    }

    #[test]
    fn test_missing_folder_reports_list_error() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone");

        // Act
        let outcome = rename_folder(&gone, 4);

        // Assert
        assert_eq!(outcome.renamed, 0);
        assert!(outcome.list_error.is_some());
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_resolve_manual_keeps_existing_directories_only() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        fs::create_dir(&a).unwrap();
        touch(dir.path(), "file.txt");
        let entries = vec![
            format!("  {}  ", a.display()),
            dir.path().join("file.txt").display().to_string(),
            dir.path().join("missing").display().to_string(),
            String::new(),
        ];

        // Act
        let folders = resolve_folders(Mode::Manual, &entries);

        // Assert
        assert_eq!(folders, vec![a]);
    }

    #[test]
    fn test_resolve_subfolders_ignores_files_and_parent() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        touch(dir.path(), "loose.jpg");
        let entries = vec![
            dir.path().display().to_string(),
            String::from("/ignored/in/subfolders/mode"),
        ];

        // Act
        let folders = resolve_folders(Mode::Subfolders, &entries);

        // Assert
        assert_eq!(folders, vec![dir.path().join("a"), dir.path().join("b")]);
    }

    #[test]
    fn test_resolve_subfolders_missing_parent() {
        // Arrange
        let entries = vec![String::from("/definitely/not/a/real/parent")];

        // Act & Assert
        assert!(resolve_folders(Mode::Subfolders, &entries).is_empty());
        assert!(resolve_folders(Mode::Subfolders, &[]).is_empty());
    }

    #[test]
    fn test_rename_in_folders_resets_counter_per_folder() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();
        touch(&first, "a0001.jpg");
        touch(&first, "a0002.jpg");
        touch(&second, "b0001.jpg");

        // Act
        let report = rename_in_folders(&[first.clone(), second.clone()], 4).unwrap();

        // Assert
        assert_eq!(report.total_renamed, 3);
        assert!(report.is_clean());
        assert_eq!(names_in(&first), vec!["a.0001.jpg", "a.0002.jpg"]);
        assert_eq!(names_in(&second), vec!["b.0001.jpg"]);
    }

    #[test]
    fn test_failure_in_one_folder_does_not_stop_the_next() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();
        touch(&first, "a-001.txt");
        touch(&first, "a.0001.txt");
        touch(&second, "q0001.jpg");

        // Act
        let report = rename_in_folders(&[first.clone(), second.clone()], 4).unwrap();

        // Assert
        assert_eq!(report.total_renamed, 1);
        assert!(!report.is_clean());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(names_in(&first), vec!["a-001.txt", "a.0001.txt"]);
        assert_eq!(names_in(&second), vec!["q.0001.jpg"]);
    }

    #[test]
    fn test_rename_in_folders_empty() {
        // Arrange & Act
        let result = rename_in_folders(&[], 4);

        // Assert
        assert!(matches!(result, Err(RenameError::NoValidFolders)));
    }

    #[test]
    fn test_run_rename_invalid_trim_touches_nothing() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "img1001.jpg");
        let mut state = AppState::default();
        *state.rows_mut() = FolderRows::from_entries([dir.path().display().to_string()]);
        *state.trim_text_mut() = String::from("abc");

        // Act
        let result = run_rename(&state);

        // Assert
        assert!(matches!(result, Err(RenameError::InvalidParameter(_))));
        assert_eq!(names_in(dir.path()), vec!["img1001.jpg"]);
    }

    #[test]
    fn test_run_rename_empty_rows_only_warns() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(
                expect::event()
                    .at_level(tracing::Level::WARN)
                    .with_fields(expect::msg("No valid folders were selected for renaming.")),
            )
            .only()
            .run_with_handle();
        let state = AppState::default();

        // Act
        let result = with_default(subscriber, || run_rename(&state));

        // Assert
        handle.assert_finished();
        assert!(matches!(result, Err(RenameError::NoValidFolders)));
    }
}
