//! Integration tests for arcguard-core.
//!
//! These tests build real archives on disk and run them through the public
//! extraction and validation entry points.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use arcguard_core::ExtractionError;
use arcguard_core::ExtractionStrategy;
use arcguard_core::SecurityConfig;
use arcguard_core::SizeLimit;
use arcguard_core::Thresholds;
use arcguard_core::extract_archive;
use arcguard_core::extract_prechecked;
use arcguard_core::extract_streaming;
use arcguard_core::extract_tar_stream;
use arcguard_core::test_utils::TarTestBuilder;
use arcguard_core::test_utils::ZipTestBuilder;
use arcguard_core::test_utils::bzip2;
use arcguard_core::test_utils::gzip;
use arcguard_core::test_utils::set_zip_compression_method;
use arcguard_core::test_utils::set_zip_external_attributes;
use arcguard_core::test_utils::write_archive;
use arcguard_core::test_utils::xz;
use arcguard_core::test_utils::zstd;
use arcguard_core::validate_archive;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn sample_tar() -> Vec<u8> {
    TarTestBuilder::new()
        .add_directory("project/")
        .add_file("project/README.md", b"# project\n")
        .add_file("project/src/lib.rs", b"pub fn answer() -> u32 { 42 }\n")
        .build()
}

fn assert_sample_extracted(out: &Path) {
    assert_eq!(
        fs::read_to_string(out.join("project/README.md")).unwrap(),
        "# project\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("project/src/lib.rs")).unwrap(),
        "pub fn answer() -> u32 { 42 }\n"
    );
}

fn dir_is_empty(path: &Path) -> bool {
    !path.exists() || fs::read_dir(path).unwrap().next().is_none()
}

#[test]
fn test_extract_plain_tar() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(temp.path(), "sample.tar", &sample_tar());
    let out = temp.path().join("out");

    let report = extract_prechecked(&archive, &out, &SecurityConfig::default()).unwrap();
    assert_eq!(report.files_extracted, 2);
    assert_eq!(report.directories_created, 1);
    assert_sample_extracted(&out);
}

#[test]
fn test_extract_compressed_tars() {
    let temp = TempDir::new().unwrap();
    let tar = sample_tar();
    let variants = [
        ("sample.tar.gz", gzip(&tar)),
        ("sample.tar.bz2", bzip2(&tar)),
        ("sample.tar.xz", xz(&tar)),
        ("sample.tar.zst", zstd(&tar)),
    ];

    for (name, data) in variants {
        let archive = write_archive(temp.path(), name, &data);
        let out = temp.path().join(format!("out-{name}"));
        for strategy in [ExtractionStrategy::Precheck, ExtractionStrategy::Streaming] {
            let config = SecurityConfig::default().with_overwrite(true);
            extract_archive(&archive, &out, &config, strategy)
                .unwrap_or_else(|e| panic!("{name} with {strategy}: {e}"));
            assert_sample_extracted(&out);
        }
    }
}

#[test]
fn test_extract_zip() {
    let temp = TempDir::new().unwrap();
    let data = ZipTestBuilder::new()
        .add_directory("docs/")
        .add_file("docs/guide.txt", b"stored")
        .add_deflated_file("docs/notes.txt", b"deflated deflated deflated")
        .build();
    let archive = write_archive(temp.path(), "docs.zip", &data);
    let out = temp.path().join("out");

    let report = extract_prechecked(&archive, &out, &SecurityConfig::default()).unwrap();
    assert_eq!(report.files_extracted, 2);
    assert_eq!(report.directories_created, 1);
    assert_eq!(fs::read(out.join("docs/guide.txt")).unwrap(), b"stored");
    assert_eq!(
        fs::read(out.join("docs/notes.txt")).unwrap(),
        b"deflated deflated deflated"
    );
}

#[test]
fn test_traversal_leaves_root_untouched() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("innocent.txt", b"ok")
        .add_file_with_raw_name("../invalid", b"escaped")
        .build();
    let archive = write_archive(temp.path(), "traversal.tar", &data);
    let out = temp.path().join("out");

    let err = extract_prechecked(&archive, &out, &SecurityConfig::default()).unwrap_err();
    assert!(matches!(err, ExtractionError::MemberName { ref name } if name == "../invalid"));
    assert!(err.is_security_violation());
    assert!(dir_is_empty(&out));
    assert!(!temp.path().join("invalid").exists());
}

#[test]
fn test_zip_traversal_rejected() {
    let temp = TempDir::new().unwrap();
    let data = ZipTestBuilder::new()
        .add_file("../../etc/cron.d/job", b"* * * * * root true")
        .build();
    let archive = write_archive(temp.path(), "evil.zip", &data);
    let out = temp.path().join("out");

    let err = extract_prechecked(&archive, &out, &SecurityConfig::default()).unwrap_err();
    assert!(err.to_string().contains("Invalid file path"));
    assert!(dir_is_empty(&out));
}

#[test]
fn test_tar_symlink_rejected() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("target.txt", b"x")
        .add_symlink("link", "/etc/passwd")
        .build();
    let archive = write_archive(temp.path(), "link.tar", &data);

    let err = extract_prechecked(&archive, temp.path().join("out"), &SecurityConfig::default())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "File 'link' has unsupported type: SYM"
    );
}

#[test]
fn test_tar_hardlink_and_devices_rejected() {
    let temp = TempDir::new().unwrap();
    let cases = [
        ("hard.tar", TarTestBuilder::new().add_hardlink("hard", "a").build(), "LNK"),
        (
            "chr.tar",
            TarTestBuilder::new()
                .add_special("tty", tar::EntryType::Char)
                .build(),
            "CHR",
        ),
        (
            "blk.tar",
            TarTestBuilder::new()
                .add_special("sda", tar::EntryType::Block)
                .build(),
            "BLK",
        ),
    ];

    for (name, data, label) in cases {
        let archive = write_archive(temp.path(), name, &data);
        let err = validate_archive(&archive, None::<&Path>, &SecurityConfig::default()).unwrap_err();
        assert!(
            matches!(err, ExtractionError::MemberType { ref file_type, .. } if file_type == label),
            "{name}: {err}"
        );
    }
}

#[test]
fn test_zip_fifo_rejected() {
    let temp = TempDir::new().unwrap();
    let mut data = ZipTestBuilder::new()
        .add_file("readme.txt", b"hello")
        .add_file("pipe", b"")
        .build();
    set_zip_external_attributes(&mut data, "pipe", 0o010_644 << 16);
    let archive = write_archive(temp.path(), "fifo.zip", &data);
    let out = temp.path().join("out");

    let err = extract_prechecked(&archive, &out, &SecurityConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "File 'pipe' has unsupported type: FIFO");
    assert!(dir_is_empty(&out));
}

#[test]
fn test_zip_symlink_rejected() {
    let temp = TempDir::new().unwrap();
    let data = ZipTestBuilder::new().add_symlink("link", "../../secret").build();
    let archive = write_archive(temp.path(), "link.zip", &data);

    let err = validate_archive(&archive, None::<&Path>, &SecurityConfig::default()).unwrap_err();
    assert!(err.to_string().contains("SYM"));
}

#[test]
fn test_zip_without_unix_mode_is_accepted() {
    let temp = TempDir::new().unwrap();
    let mut data = ZipTestBuilder::new().add_file("dos.txt", b"dos").build();
    set_zip_external_attributes(&mut data, "dos.txt", 0);
    let archive = write_archive(temp.path(), "dos.zip", &data);
    let out = temp.path().join("out");

    extract_prechecked(&archive, &out, &SecurityConfig::default()).unwrap();
    assert_eq!(fs::read(out.join("dos.txt")).unwrap(), b"dos");
}

#[test]
fn test_repeat_extraction_with_overwrite() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(temp.path(), "sample.tar", &sample_tar());
    let out = temp.path().join("out");
    let config = SecurityConfig::default().with_overwrite(true);

    extract_prechecked(&archive, &out, &config).unwrap();
    extract_prechecked(&archive, &out, &config).unwrap();
    assert_sample_extracted(&out);
}

#[test]
fn test_repeat_extraction_without_overwrite() {
    let temp = TempDir::new().unwrap();
    let data = ZipTestBuilder::new().add_file("config.ini", b"[a]").build();
    let archive = write_archive(temp.path(), "config.zip", &data);
    let out = temp.path().join("out");
    let config = SecurityConfig::default();

    extract_prechecked(&archive, &out, &config).unwrap();
    fs::write(out.join("config.ini"), b"local edits").unwrap();

    let err = extract_prechecked(&archive, &out, &config).unwrap_err();
    assert!(matches!(err, ExtractionError::MemberOverwrite { ref name } if name == "config.ini"));
    assert_eq!(fs::read(out.join("config.ini")).unwrap(), b"local edits");
}

#[cfg(unix)]
#[test]
fn test_non_utf8_name_overwrite_rejected() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file_with_raw_bytes(b"caf\xe9.txt", b"from archive")
        .build();
    let archive = write_archive(temp.path(), "latin1.tar", &data);
    let out = temp.path().join("out");
    fs::create_dir(&out).unwrap();
    let existing = out.join(OsStr::from_bytes(b"caf\xe9.txt"));
    fs::write(&existing, b"local edits").unwrap();

    for strategy in [ExtractionStrategy::Precheck, ExtractionStrategy::Streaming] {
        let err = extract_archive(&archive, &out, &SecurityConfig::default(), strategy).unwrap_err();
        assert!(
            matches!(err, ExtractionError::MemberOverwrite { ref name } if name == "caf\u{fffd}.txt"),
            "unexpected error: {err}"
        );
        assert_eq!(fs::read(&existing).unwrap(), b"local edits");
    }
}

#[test]
fn test_existing_directory_is_not_an_overwrite() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(temp.path(), "sample.tar", &sample_tar());
    let out = temp.path().join("out");
    fs::create_dir_all(out.join("project")).unwrap();

    extract_prechecked(&archive, &out, &SecurityConfig::default()).unwrap();
    assert_sample_extracted(&out);
}

#[test]
fn test_object_limit() {
    let temp = TempDir::new().unwrap();
    let data = ZipTestBuilder::new()
        .add_directory("d/")
        .add_file("d/1", b"1")
        .add_file("d/2", b"2")
        .add_file("d/3", b"3")
        .build();
    let archive = write_archive(temp.path(), "three_files.zip", &data);

    let at_limit = SecurityConfig::default().with_thresholds(Thresholds {
        max_objects: Some(3),
        ..Thresholds::default()
    });
    let members = validate_archive(&archive, None::<&Path>, &at_limit).unwrap();
    assert_eq!(members.len(), 4);

    let below = SecurityConfig::default().with_thresholds(Thresholds {
        max_objects: Some(2),
        ..Thresholds::default()
    });
    let out = temp.path().join("out");
    let err = extract_prechecked(&archive, &out, &below).unwrap_err();
    assert!(matches!(err, ExtractionError::ObjectCount { count: 3, max: 2, .. }));
    assert!(err.to_string().contains("too many objects"));
    assert!(dir_is_empty(&out));
}

#[test]
fn test_size_limit() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("a", &[1u8; 600])
        .add_file("b", &[2u8; 600])
        .build();
    let archive = write_archive(temp.path(), "sized.tar", &data);
    let config = SecurityConfig::default().with_thresholds(Thresholds {
        max_size: Some(1000),
        ..Thresholds::unlimited()
    });

    let err = validate_archive(&archive, None::<&Path>, &config).unwrap_err();
    assert_eq!(err.size_limit(), Some(&SizeLimit::TotalSize { max: 1000 }));
    assert!(err.to_string().contains("uncompressed size"));
}

#[test]
fn test_zip_bomb_rejected_before_writing() {
    let temp = TempDir::new().unwrap();
    let data = ZipTestBuilder::new()
        .add_deflated_file("zeros.bin", &vec![0u8; 1024 * 1024])
        .build();
    let archive = write_archive(temp.path(), "bomb.zip", &data);
    let out = temp.path().join("out");

    let err = extract_prechecked(&archive, &out, &SecurityConfig::default()).unwrap_err();
    assert!(err.to_string().contains("compression ratio"), "{err}");
    assert!(matches!(
        err.size_limit(),
        Some(SizeLimit::MemberRatio { max: 100, .. })
    ));
    assert!(!out.join("zeros.bin").exists());
}

#[test]
fn test_gzip_bomb_rejected_by_archive_ratio() {
    let temp = TempDir::new().unwrap();
    let data = gzip(
        &TarTestBuilder::new()
            .add_file("zeros.bin", &vec![0u8; 4 * 1024 * 1024])
            .build(),
    );
    let archive = write_archive(temp.path(), "bomb.tar.gz", &data);

    let err = validate_archive(&archive, None::<&Path>, &SecurityConfig::default()).unwrap_err();
    assert!(matches!(
        err.size_limit(),
        Some(SizeLimit::ArchiveRatio { max: 100 })
    ));
}

#[test]
fn test_ratio_limit_disabled() {
    let temp = TempDir::new().unwrap();
    let data = ZipTestBuilder::new()
        .add_deflated_file("zeros.bin", &vec![0u8; 1024 * 1024])
        .build();
    let archive = write_archive(temp.path(), "bomb.zip", &data);
    let config = SecurityConfig::default().with_thresholds(Thresholds {
        max_ratio: None,
        ..Thresholds::default()
    });

    let report = extract_prechecked(&archive, temp.path().join("out"), &config).unwrap();
    assert_eq!(report.bytes_written, 1024 * 1024);
}

#[test]
fn test_unsupported_zip_method() {
    let temp = TempDir::new().unwrap();
    let mut data = ZipTestBuilder::new().add_file("data.bin", b"payload").build();
    set_zip_compression_method(&mut data, 98);
    let archive = write_archive(temp.path(), "ppmd.zip", &data);
    let out = temp.path().join("out");

    let err = extract_prechecked(&archive, &out, &SecurityConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "Compression type not supported: ppmd");
    assert!(dir_is_empty(&out));
}

#[test]
fn test_blank_tar_rejected() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(temp.path(), "blank.tar", &TarTestBuilder::new().build());

    let err = validate_archive(&archive, None::<&Path>, &SecurityConfig::default()).unwrap_err();
    assert!(matches!(err, ExtractionError::BlankArchive { .. }));
    assert_eq!(err.to_string(), "Blank tar archives are not supported");
}

#[test]
fn test_blank_gzip_tar_rejected() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(
        temp.path(),
        "blank.tar.gz",
        &gzip(&TarTestBuilder::new().build()),
    );

    let err = extract_prechecked(&archive, temp.path().join("out"), &SecurityConfig::default())
        .unwrap_err();
    assert!(matches!(err, ExtractionError::BlankArchive { .. }));
}

#[test]
fn test_empty_zip_is_accepted() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(temp.path(), "empty.zip", &ZipTestBuilder::new().build());

    let members = validate_archive(&archive, None::<&Path>, &SecurityConfig::default()).unwrap();
    assert!(members.is_empty());
}

#[test]
fn test_non_archive_rejected() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(temp.path(), "notes.txt", b"just some text, not an archive\n");

    let err = extract_prechecked(&archive, temp.path().join("out"), &SecurityConfig::default())
        .unwrap_err();
    assert!(matches!(err, ExtractionError::UnsupportedContainer { .. }));
    assert!(err.to_string().contains("is not supported"));
}

#[test]
fn test_streaming_leaves_partial_tree() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("a.txt", b"a")
        .add_file("b.txt", b"b")
        .add_special("fifo", tar::EntryType::Fifo)
        .add_file("c.txt", b"c")
        .build();
    let archive = write_archive(temp.path(), "partial.tar", &data);
    let out = temp.path().join("out");

    let partial = extract_streaming(&archive, &out, &SecurityConfig::default()).unwrap_err();
    assert!(matches!(partial.error, ExtractionError::MemberType { .. }));
    assert_eq!(partial.written.len(), 2);
    assert!(out.join("a.txt").exists());
    assert!(out.join("b.txt").exists());
    assert!(!out.join("fifo").exists());
    assert!(!out.join("c.txt").exists());
}

#[test]
fn test_precheck_and_streaming_agree() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(temp.path(), "sample.tar.gz", &gzip(&sample_tar()));

    let pre = extract_prechecked(&archive, temp.path().join("pre"), &SecurityConfig::default())
        .unwrap();
    let streamed =
        extract_streaming(&archive, temp.path().join("streamed"), &SecurityConfig::default())
            .unwrap();

    assert_eq!(pre.files_extracted, streamed.files_extracted);
    assert_eq!(pre.directories_created, streamed.directories_created);
    assert_eq!(pre.bytes_written, streamed.bytes_written);
    assert_sample_extracted(&temp.path().join("pre"));
    assert_sample_extracted(&temp.path().join("streamed"));
}

#[test]
fn test_tar_stream_from_reader() {
    let temp = TempDir::new().unwrap();
    let data = xz(&sample_tar());

    let report = extract_tar_stream(Cursor::new(data), temp.path(), &SecurityConfig::default())
        .unwrap();
    assert_eq!(report.files_extracted, 2);
    assert_sample_extracted(temp.path());
}

#[test]
fn test_validate_with_root_reports_conflicts() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(temp.path(), "sample.tar", &sample_tar());
    let out = temp.path().join("out");
    fs::create_dir_all(out.join("project")).unwrap();
    fs::write(out.join("project/README.md"), b"mine").unwrap();

    assert!(validate_archive(&archive, None::<&Path>, &SecurityConfig::default()).is_ok());
    let err = validate_archive(&archive, Some(&out), &SecurityConfig::default()).unwrap_err();
    assert_eq!(
        err.member_name(),
        Some("project/README.md")
    );
}
