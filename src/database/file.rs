//! Pre-open checks on a candidate database file.

use std::fs::{File, OpenOptions};
use std::io::Read;
use std::path::Path;

use crate::error::SqlFieldsError;

/// First 16 bytes of every SQLite 3 database file.
pub const SQLITE_HEADER: [u8; 16] = *b"SQLite format 3\0";

/// True when the file starts with [`SQLITE_HEADER`]. Read errors and short files count as a mismatch.
#[must_use]
pub fn is_database_file(path: impl AsRef<Path>) -> bool {
    let mut header = [0u8; SQLITE_HEADER.len()];
    File::open(path.as_ref())
        .and_then(|mut file| file.read_exact(&mut header))
        .is_ok_and(|()| header == SQLITE_HEADER)
}

/// The file must exist and be readable and writable; optionally it must carry the header.
pub(crate) fn validate_existing(path: &Path, verify_header: bool) -> Result<(), SqlFieldsError> {
    if !path.try_exists()? {
        return Err(SqlFieldsError::file_validation(path, "file does not exist"));
    }
    if File::open(path).is_err() {
        return Err(SqlFieldsError::file_validation(path, "file is not readable"));
    }
    if OpenOptions::new().write(true).open(path).is_err() {
        return Err(SqlFieldsError::file_validation(path, "file is not writable"));
    }
    if verify_header && !is_database_file(path) {
        return Err(SqlFieldsError::file_validation(
            path,
            "missing SQLite format 3 header",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn header_constant_matches_engine_bytes() {
        assert_eq!(
            SQLITE_HEADER,
            [
                0x53, 0x51, 0x4c, 0x69, 0x74, 0x65, 0x20, 0x66, 0x6f, 0x72, 0x6d, 0x61, 0x74,
                0x20, 0x33, 0x00
            ]
        );
    }

    #[test]
    fn short_and_foreign_files_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let short = dir.path().join("short.db");
        fs::write(&short, b"SQLite format")?;
        assert!(!is_database_file(&short));

        let text = dir.path().join("notes.txt");
        fs::write(&text, "just some notes, definitely not a database\n")?;
        assert!(!is_database_file(&text));

        assert!(!is_database_file(dir.path().join("missing.db")));
        Ok(())
    }

    #[test]
    fn header_alone_is_enough() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let fake = dir.path().join("fake.db");
        let mut bytes = SQLITE_HEADER.to_vec();
        bytes.extend_from_slice(&[0u8; 84]);
        fs::write(&fake, bytes)?;
        assert!(is_database_file(&fake));
        Ok(())
    }

    #[test]
    fn missing_file_fails_validation() {
        let err = validate_existing(Path::new("/definitely/not/here.db"), true).unwrap_err();
        assert!(matches!(err, SqlFieldsError::FileValidation { .. }));
    }
}
