use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tuning_engine::{CodeBlock, Materializer, PersistError};

fn root_with_dirs() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("boot")).unwrap();
    fs::create_dir(temp.path().join("etc")).unwrap();
    temp
}

#[test]
fn written_file_is_block_without_first_line() {
    let temp = root_with_dirs();
    let block = CodeBlock::from_text(
        "# /boot/loader.conf\r\nkern.maxfiles=1000000\r\n\r\naio_load=\"YES\"",
    );
    let (path, bytes) = Materializer::new(temp.path())
        .materialize("boot/loader.conf", &block)
        .unwrap();

    let expected = "kern.maxfiles=1000000\r\n\r\naio_load=\"YES\"";
    assert_eq!(path, temp.path().join("boot/loader.conf"));
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    assert_eq!(bytes, expected.len() as u64);
}

#[test]
fn existing_file_is_truncated() {
    let temp = root_with_dirs();
    let target = temp.path().join("etc/sysctl.conf");
    fs::write(&target, "a much longer previous content that must disappear\n").unwrap();

    Materializer::new(temp.path())
        .materialize("etc/sysctl.conf", &CodeBlock::from_text("label\nshort\n"))
        .unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "short\n");
}

#[test]
fn single_line_block_produces_empty_file() {
    let temp = root_with_dirs();
    let (path, bytes) = Materializer::new(temp.path())
        .materialize("etc/rc.conf", &CodeBlock::from_text("only a label"))
        .unwrap();
    assert_eq!(bytes, 0);
    assert_eq!(fs::read(&path).unwrap(), Vec::<u8>::new());
}

#[test]
fn missing_parent_directory_is_not_created() {
    let temp = TempDir::new().unwrap();
    let err = Materializer::new(temp.path())
        .materialize("boot/loader.conf", &CodeBlock::from_text("label\nx\n"))
        .unwrap_err();
    assert!(matches!(err, PersistError::MissingParent(_)));
    assert!(!temp.path().join("boot").exists());
}

#[test]
fn parent_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("etc"), "not a dir").unwrap();
    let err = Materializer::new(temp.path())
        .materialize("etc/rc.conf", &CodeBlock::from_text("label\nx\n"))
        .unwrap_err();
    assert!(matches!(err, PersistError::MissingParent(_)));
}
