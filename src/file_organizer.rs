//! Moves a single file into its category folder.
//!
//! The category folder is created on demand under the destination root.
//! A file is never moved over an existing file of the same name. The
//! existence check and the rename are separate calls, so another process
//! creating the same destination in between can still be overwritten on
//! Unix.

use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A completed relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// True if this move had to create the category folder.
    pub created_dir: bool,
}

/// Errors that can occur while moving one file.
#[derive(Debug)]
pub enum MoveError {
    /// Failed to create the category directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// A file with the same name already exists in the category directory.
    DestinationExists { path: PathBuf },
    /// Failed to move the file.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// The source path has no file name component.
    NoFileName { path: PathBuf },
}

impl MoveError {
    /// Collisions leave the file in place on purpose; everything else is a failure.
    pub fn is_collision(&self) -> bool {
        matches!(self, Self::DestinationExists { .. })
    }
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::DestinationExists { path } => {
                write!(f, "Destination already exists: {}", path.display())
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::NoFileName { path } => {
                write!(f, "Path has no file name: {}", path.display())
            }
        }
    }
}

impl std::error::Error for MoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DirectoryCreationFailed { source, .. } => Some(source),
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
            _ => None,
        }
    }
}

/// Result type for move operations.
pub type MoveResult<T> = Result<T, MoveError>;

pub struct FileOrganizer;

impl FileOrganizer {
    /// Moves `file_path` to `dest_root/category/<file name>`.
    ///
    /// The category directory and any missing parents are created if absent;
    /// an existing directory is not an error. Moves across filesystems fall
    /// back to copy and remove.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use foldersort::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// match FileOrganizer::move_to_category(
    ///     Path::new("/home/me/Downloads/photo.jpg"),
    ///     Path::new("/home/me/Downloads"),
    ///     "Images",
    /// ) {
    ///     Ok(moved) => println!("Moved to {}", moved.destination.display()),
    ///     Err(e) => eprintln!("{}", e),
    /// }
    /// ```
    pub fn move_to_category(
        file_path: &Path,
        dest_root: &Path,
        category: &str,
    ) -> MoveResult<MovedFile> {
        let file_name = file_path.file_name().ok_or_else(|| MoveError::NoFileName {
            path: file_path.to_path_buf(),
        })?;

        let category_path = dest_root.join(category);
        let created_dir = Self::ensure_dir(&category_path)?;

        let destination = category_path.join(file_name);
        if destination.exists() {
            return Err(MoveError::DestinationExists { path: destination });
        }

        Self::relocate(file_path, &destination).map_err(|e| MoveError::FileMoveFailure {
            source: file_path.to_path_buf(),
            destination: destination.clone(),
            source_error: e,
        })?;

        Ok(MovedFile {
            source: file_path.to_path_buf(),
            destination,
            created_dir,
        })
    }

    /// Creates `path` if needed. Returns whether it was created by this call.
    fn ensure_dir(path: &Path) -> MoveResult<bool> {
        if path.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(path).map_err(|e| MoveError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!("created directory {}", path.display());
        Ok(true)
    }

    fn relocate(source: &Path, destination: &Path) -> io::Result<()> {
        match fs::rename(source, destination) {
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                debug!(
                    "rename across devices, copying {} instead",
                    source.display()
                );
                copy_then_remove(source, destination)
            }
            result => result,
        }
    }
}

/// Copies `source` to `destination` and removes the original. If the
/// original cannot be removed the copy is deleted again, so a failure leaves
/// only the source in place.
fn copy_then_remove(source: &Path, destination: &Path) -> io::Result<()> {
    fs::copy(source, destination)?;
    discard_copy_on_error(destination, fs::remove_file(source))
}

fn discard_copy_on_error(destination: &Path, removed: io::Result<()>) -> io::Result<()> {
    if removed.is_err() {
        debug!("removing copy {} after failed move", destination.display());
        if let Err(e) = fs::remove_file(destination) {
            debug!("could not remove {}: {}", destination.display(), e);
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_to_category_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let moved = FileOrganizer::move_to_category(&file_path, base_path, "Documents")
            .expect("Failed to move file");

        let category_dir = base_path.join("Documents");
        assert!(category_dir.is_dir());
        assert!(moved.created_dir);
        assert!(!file_path.exists());
        assert_eq!(moved.destination, category_dir.join("test.txt"));
        assert_eq!(
            fs::read_to_string(&moved.destination).unwrap(),
            "test content"
        );
    }

    #[test]
    fn test_move_to_category_uses_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        fs::create_dir(base_path.join("Images")).unwrap();
        let file_path = base_path.join("test.png");
        fs::write(&file_path, "png").unwrap();

        let moved = FileOrganizer::move_to_category(&file_path, base_path, "Images")
            .expect("Failed to move file");

        assert!(!moved.created_dir);
        assert!(base_path.join("Images").join("test.png").exists());
    }

    #[test]
    fn test_move_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        fs::create_dir(base_path.join("Documents")).unwrap();
        fs::write(base_path.join("Documents").join("a.txt"), "old").unwrap();
        let file_path = base_path.join("a.txt");
        fs::write(&file_path, "new").unwrap();

        let err = FileOrganizer::move_to_category(&file_path, base_path, "Documents").unwrap_err();

        assert!(err.is_collision());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new");
        assert_eq!(
            fs::read_to_string(base_path.join("Documents").join("a.txt")).unwrap(),
            "old"
        );
    }

    #[test]
    fn test_directory_creation_failure() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        // A regular file where the category folder should go.
        fs::write(base_path.join("Programs"), "not a dir").unwrap();
        let file_path = base_path.join("setup.exe");
        fs::write(&file_path, "exe").unwrap();

        let err = FileOrganizer::move_to_category(&file_path, base_path, "Programs").unwrap_err();

        assert!(matches!(err, MoveError::DirectoryCreationFailed { .. }));
        assert!(file_path.exists());
    }

    #[test]
    fn test_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();

        let err = FileOrganizer::move_to_category(&base_path.join("gone.pdf"), base_path, "Documents")
            .unwrap_err();

        assert!(matches!(err, MoveError::FileMoveFailure { .. }));
        assert!(!err.is_collision());
    }

    #[test]
    fn test_copy_then_remove_relocates_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("song.mp3");
        let destination = temp_dir.path().join("copy.mp3");
        fs::write(&source, "tune").expect("Failed to write test file");

        copy_then_remove(&source, &destination).expect("Copy fallback failed");

        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&destination).unwrap(), "tune");
    }

    #[test]
    fn test_failed_source_removal_discards_copy() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let destination = temp_dir.path().join("copy.mp3");
        fs::write(&destination, "tune").expect("Failed to write test file");

        let result = discard_copy_on_error(
            &destination,
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only")),
        );

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::PermissionDenied);
        assert!(!destination.exists());
    }

    #[test]
    fn test_successful_removal_keeps_copy() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let destination = temp_dir.path().join("copy.mp3");
        fs::write(&destination, "tune").expect("Failed to write test file");

        discard_copy_on_error(&destination, Ok(())).expect("Should pass through");

        assert!(destination.is_file());
    }
}
