//! Locating the OMIM exports in a data directory.

use std::path::Path;

use crate::types::{OmimConfig, OmimError, OmimFiles, OmimResult};

/// Locates the three required OMIM files in `path`.
///
/// File names come from `config`. Every missing file is reported, not just
/// the first.
///
/// # Errors
/// Returns [`OmimError::DirectoryNotFound`] if `path` is not a directory and
/// [`OmimError::RequiredFilesMissing`] if any file is absent.
pub fn discover_omim_files<P: AsRef<Path>>(path: P, config: &OmimConfig) -> OmimResult<OmimFiles> {
    let path = path.as_ref();

    if !path.is_dir() {
        return Err(OmimError::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }

    let missing: Vec<&str> = config
        .required_files()
        .into_iter()
        .filter(|name| !path.join(name).is_file())
        .collect();

    if !missing.is_empty() {
        return Err(OmimError::RequiredFilesMissing {
            files: missing.join(", "),
            directory: path.display().to_string(),
        });
    }

    Ok(OmimFiles {
        morbidmap_file: path.join(&config.morbidmap_file),
        titles_file: path.join(&config.titles_file),
        pubmed_file: path.join(&config.pubmed_file),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_all_files_present() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["mimTitles.txt", "morbidmap.txt", "pubmed_cited"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let files = discover_omim_files(dir.path(), &OmimConfig::default()).unwrap();
        assert_eq!(files.morbidmap_file, dir.path().join("morbidmap.txt"));
        assert_eq!(files.pubmed_file, dir.path().join("pubmed_cited"));
    }

    #[test]
    fn test_reports_every_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("morbidmap.txt"), "").unwrap();

        let err = discover_omim_files(dir.path(), &OmimConfig::default()).unwrap_err();
        match err {
            OmimError::RequiredFilesMissing { files, .. } => {
                assert_eq!(files, "mimTitles.txt, pubmed_cited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_directory() {
        let err = discover_omim_files("/nonexistent/omim", &OmimConfig::default()).unwrap_err();
        assert!(matches!(err, OmimError::DirectoryNotFound { .. }));
    }
}
