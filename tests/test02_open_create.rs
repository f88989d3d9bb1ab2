mod common;

use std::cell::Cell;
use std::fs;

use common::{create_users_table, init_tracing};
use sql_fields::prelude::*;
use sql_fields::is_database_file;
use tempfile::tempdir;

#[test]
fn open_rejects_plain_text_file() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let dir = tempdir()?;
    let path = dir.path().join("notes.txt");
    fs::write(&path, "this is not a database, just text that is long enough\n")?;

    let db = Database::new();
    assert!(matches!(
        db.open(&path),
        Err(SqlFieldsError::FileValidation { .. })
    ));
    assert!(!db.is_open());
    assert!(matches!(
        db.select("SELECT 1"),
        Err(SqlFieldsError::ConnectionError(_))
    ));
    Ok(())
}

#[test]
fn open_rejects_missing_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("absent.db");

    let db = Database::new();
    assert!(matches!(
        db.open(&path),
        Err(SqlFieldsError::FileValidation { .. })
    ));
    // open never creates the file
    assert!(!path.exists());
    Ok(())
}

#[test]
fn open_rejects_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let nested = dir.path().join("looks_like.db");
    fs::create_dir(&nested)?;

    let db = Database::new();
    match db.open(&nested) {
        Err(SqlFieldsError::FileValidation { reason, .. }) => {
            assert_eq!(reason, "file is not writable");
        }
        other => panic!("expected FileValidation, got {other:?}"),
    }
    assert!(!db.is_open());
    Ok(())
}

#[cfg(unix)]
#[test]
fn open_rejects_read_only_file() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    let path = dir.path().join("frozen.db");
    let db = Database::new();
    db.create(&path, create_users_table, false)?;
    db.close()?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o444))?;

    // root ignores permission bits
    if fs::OpenOptions::new().write(true).open(&path).is_ok() {
        return Ok(());
    }

    match db.open(&path) {
        Err(SqlFieldsError::FileValidation { reason, .. }) => {
            assert_eq!(reason, "file is not writable");
        }
        other => panic!("expected FileValidation, got {other:?}"),
    }
    assert!(!db.is_open());
    Ok(())
}

#[cfg(unix)]
#[test]
fn open_rejects_unreadable_file() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    let path = dir.path().join("sealed.db");
    let db = Database::new();
    db.create(&path, create_users_table, false)?;
    db.close()?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o200))?;

    // root ignores permission bits
    if fs::File::open(&path).is_ok() {
        return Ok(());
    }

    match db.open(&path) {
        Err(SqlFieldsError::FileValidation { reason, .. }) => {
            assert_eq!(reason, "file is not readable");
        }
        other => panic!("expected FileValidation, got {other:?}"),
    }
    assert!(!db.is_open());
    Ok(())
}

#[test]
fn create_close_and_reopen() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let dir = tempdir()?;
    let path = dir.path().join("app.db");

    let db = Database::new();
    db.create(&path, create_users_table, false)?;
    assert!(db.is_open());
    assert_eq!(db.path().as_deref(), Some(path.as_path()));
    let id = db.insert("users", &[Field::new("name", "Ann")])?;

    // a second open or create while connected is refused
    assert!(matches!(db.open(&path), Err(SqlFieldsError::ConnectionError(_))));
    assert!(matches!(
        db.create(&path, |_| Ok(()), true),
        Err(SqlFieldsError::ConnectionError(_))
    ));

    db.close()?;
    assert!(!db.is_open());
    assert!(matches!(db.close(), Err(SqlFieldsError::ConnectionError(_))));
    assert!(matches!(
        db.exec("SELECT 1"),
        Err(SqlFieldsError::ConnectionError(_))
    ));
    assert!(is_database_file(&path));

    db.open(&path)?;
    let rows = db.select(&format!("SELECT name FROM users WHERE id={id}"))?;
    assert_eq!(rows.first().unwrap().get("name").unwrap().as_text()?, "Ann");
    Ok(())
}

#[test]
fn create_without_overwrite_leaves_existing_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("taken.db");
    fs::write(&path, b"precious contents")?;

    let called = Cell::new(false);
    let db = Database::new();
    let result = db.create(
        &path,
        |_| {
            called.set(true);
            Ok(())
        },
        false,
    );
    assert!(matches!(result, Err(SqlFieldsError::FileValidation { .. })));
    assert!(!called.get());
    assert!(!db.is_open());
    assert_eq!(fs::read(&path)?, b"precious contents");
    Ok(())
}

#[test]
fn create_with_overwrite_replaces_file() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let dir = tempdir()?;
    let path = dir.path().join("test.db");
    fs::write(&path, b"old junk")?;

    let called = Cell::new(0);
    let db = Database::new();
    db.create(
        &path,
        |db| {
            called.set(called.get() + 1);
            assert!(db.is_open());
            create_users_table(db)
        },
        true,
    )?;
    assert_eq!(called.get(), 1);
    assert!(is_database_file(&path));
    assert!(db.select("SELECT * FROM users")?.is_empty());
    Ok(())
}

#[test]
fn create_passes_initializer_failure_through() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let dir = tempdir()?;
    let path = dir.path().join("broken.db");

    let db = Database::new();
    let result = db.create(&path, |db| db.exec("CREATE TABLE oops ("), false);
    assert!(matches!(result, Err(SqlFieldsError::Sqlite(_))));
    assert!(!db.is_open());

    let result = db.create(
        &path,
        |_| Err(SqlFieldsError::ParameterError("schema rejected".into())),
        true,
    );
    assert!(matches!(result, Err(SqlFieldsError::ParameterError(_))));
    assert!(!db.is_open());
    Ok(())
}

#[test]
fn header_check_can_be_switched_off() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("empty.db");
    fs::write(&path, b"")?;

    let strict = Database::new();
    assert!(strict.open(&path).is_err());

    // an empty file is a valid, empty SQLite database to the engine
    let lenient = Database::builder().verify_header(false).build();
    lenient.open(&path)?;
    lenient.exec("CREATE TABLE t (x INTEGER)")?;
    lenient.close()?;
    assert!(is_database_file(&path));
    Ok(())
}
