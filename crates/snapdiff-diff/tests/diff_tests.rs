//! End-to-end comparison tests over real scanned trees.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use snapdiff_diff::{ChangeFlags, ComparisonOptions, DiffReport, TreeComparator};
use snapdiff_scan::{FsReader, ScanOptions, Snapshot, SnapshotScanner};

fn scan(path: &Path) -> Snapshot {
    SnapshotScanner::new()
        .scan(path, &ScanOptions::default())
        .unwrap()
}

fn compare(left: &Snapshot, right: &Snapshot, options: ComparisonOptions) -> DiffReport {
    TreeComparator::new(FsReader::new(), options).compare(left, right)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[test]
fn test_self_compare_is_empty_under_all_options() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("a")).unwrap();
    fs::write(temp.path().join("a/x.txt"), "contents").unwrap();
    fs::write(temp.path().join("top.txt"), "more").unwrap();

    let snapshot = scan(temp.path());
    let report = compare(&snapshot, &snapshot, ComparisonOptions::all());

    assert!(report.is_empty());
    assert!(!report.has_differences());
    assert_eq!(report.stats.read_errors, 0);
}

#[test]
fn test_no_options_never_emits_modified_flags() {
    let left_dir = TempDir::new().unwrap();
    let right_dir = TempDir::new().unwrap();
    fs::write(left_dir.path().join("same.txt"), "aaa").unwrap();
    fs::write(right_dir.path().join("same.txt"), "completely different").unwrap();
    fs::write(left_dir.path().join("only_left.txt"), "x").unwrap();
    fs::write(right_dir.path().join("only_right.txt"), "y").unwrap();

    let left = scan(left_dir.path());
    let right = scan(right_dir.path());
    let report = compare(&left, &right, ComparisonOptions::empty());

    assert!(!report.records.is_empty());
    for record in &report.records {
        assert!(record.flags.is_structural());
        assert!(!record.flags.is_modification());
    }
}

#[cfg(unix)]
#[test]
fn test_permission_change_detected_under_ownership_only() {
    // Scenario: same file contents, different mode bits.
    let left_dir = TempDir::new().unwrap();
    let right_dir = TempDir::new().unwrap();
    for root in [left_dir.path(), right_dir.path()] {
        fs::create_dir(root.join("a")).unwrap();
        fs::write(root.join("a/x.txt"), "hi").unwrap();
    }
    set_mode(&left_dir.path().join("a/x.txt"), 0o644);
    set_mode(&right_dir.path().join("a/x.txt"), 0o600);

    let left = scan(left_dir.path());
    let right = scan(right_dir.path());

    let report = compare(&left, &right, ComparisonOptions::OWNERSHIP);
    assert_eq!(report.len(), 1);
    assert_eq!(report.records[0].flags, ChangeFlags::MODIFIED_PERMISSIONS);
    assert_eq!(report.records[0].relative_path, Path::new("a/x.txt"));

    // Content alone does not care about the mode bits.
    let report = compare(&left, &right, ComparisonOptions::CONTENT);
    assert!(report.is_empty());
}

#[test]
fn test_kind_replacement_suppresses_subtree() {
    // Left has a directory `a` with contents, right has a file `a`.
    let left_dir = TempDir::new().unwrap();
    let right_dir = TempDir::new().unwrap();
    fs::create_dir(left_dir.path().join("a")).unwrap();
    fs::write(left_dir.path().join("a/inner.txt"), "inner").unwrap();
    fs::write(right_dir.path().join("a"), "now a file").unwrap();

    let left = scan(left_dir.path());
    let right = scan(right_dir.path());
    let report = compare(&left, &right, ComparisonOptions::empty());

    assert_eq!(report.len(), 1);
    assert_eq!(report.records[0].flags, ChangeFlags::REPLACED);
    assert_eq!(report.records[0].relative_path, Path::new("a"));
}

#[test]
fn test_added_removed_preorder() {
    // Left: a/{b,c}; right: a/{b,d}.
    let left_dir = TempDir::new().unwrap();
    let right_dir = TempDir::new().unwrap();
    fs::create_dir(left_dir.path().join("a")).unwrap();
    fs::create_dir(right_dir.path().join("a")).unwrap();
    fs::write(left_dir.path().join("a/b"), "b").unwrap();
    fs::write(left_dir.path().join("a/c"), "c").unwrap();
    fs::write(right_dir.path().join("a/b"), "b").unwrap();
    fs::write(right_dir.path().join("a/d"), "d").unwrap();

    let left = scan(left_dir.path());
    let right = scan(right_dir.path());
    let report = compare(&left, &right, ComparisonOptions::empty());

    let summary: Vec<(ChangeFlags, &Path)> = report
        .records
        .iter()
        .map(|r| (r.flags, r.relative_path.as_path()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (ChangeFlags::REMOVED, Path::new("a/c")),
            (ChangeFlags::ADDED, Path::new("a/d")),
        ]
    );
}

#[test]
fn test_structural_symmetry() {
    let left_dir = TempDir::new().unwrap();
    let right_dir = TempDir::new().unwrap();
    fs::create_dir(left_dir.path().join("only_left")).unwrap();
    fs::write(left_dir.path().join("only_left/f.txt"), "f").unwrap();
    fs::write(right_dir.path().join("only_right.txt"), "g").unwrap();

    let left = scan(left_dir.path());
    let right = scan(right_dir.path());

    let forward = compare(&left, &right, ComparisonOptions::empty());
    let backward = compare(&right, &left, ComparisonOptions::empty());

    let removed_forward: Vec<&Path> = forward
        .records
        .iter()
        .filter(|r| r.flags == ChangeFlags::REMOVED)
        .map(|r| r.relative_path.as_path())
        .collect();
    let added_backward: Vec<&Path> = backward
        .records
        .iter()
        .filter(|r| r.flags == ChangeFlags::ADDED)
        .map(|r| r.relative_path.as_path())
        .collect();
    assert_eq!(removed_forward, added_backward);
    assert_eq!(forward.stats.removed, backward.stats.added);
    assert_eq!(forward.stats.added, backward.stats.removed);
}

#[test]
fn test_content_change_same_size() {
    let left_dir = TempDir::new().unwrap();
    let right_dir = TempDir::new().unwrap();
    fs::write(left_dir.path().join("data.bin"), "AAAA").unwrap();
    fs::write(right_dir.path().join("data.bin"), "AAAB").unwrap();

    let left = scan(left_dir.path());
    let right = scan(right_dir.path());

    // Without the content option the files look identical (sizes match).
    let report = compare(&left, &right, ComparisonOptions::empty());
    assert!(report.is_empty());

    let report = compare(&left, &right, ComparisonOptions::CONTENT);
    assert_eq!(report.len(), 1);
    assert_eq!(report.records[0].flags, ChangeFlags::MODIFIED_DATA_CONTENT);
    assert!(report.stats.bytes_read > 0);
}

#[test]
fn test_size_change_under_properties_and_content() {
    let left_dir = TempDir::new().unwrap();
    let right_dir = TempDir::new().unwrap();
    fs::write(left_dir.path().join("grow.txt"), "12").unwrap();
    fs::write(right_dir.path().join("grow.txt"), "123456").unwrap();

    let left = scan(left_dir.path());
    let right = scan(right_dir.path());

    let report = compare(
        &left,
        &right,
        ComparisonOptions::PROPERTIES | ComparisonOptions::CONTENT,
    );
    // The directory pairs may report date drift; pick the file's record.
    let entry = report
        .records
        .iter()
        .find(|r| r.relative_path == Path::new("grow.txt"))
        .unwrap();
    assert!(entry.flags.contains(ChangeFlags::MODIFIED_FILE_SIZE));
    assert!(entry.flags.contains(ChangeFlags::MODIFIED_DATA_CONTENT));
    // The size mismatch already proves inequality; no bytes were read.
    assert_eq!(report.stats.bytes_read, 0);

    // Properties disabled: the size check still short-circuits content,
    // but is not itself reported.
    let report = compare(&left, &right, ComparisonOptions::CONTENT);
    assert_eq!(report.records[0].flags, ChangeFlags::MODIFIED_DATA_CONTENT);
}

#[cfg(unix)]
#[test]
fn test_symlink_kind_change_is_replacement() {
    let left_dir = TempDir::new().unwrap();
    let right_dir = TempDir::new().unwrap();
    fs::write(left_dir.path().join("entry"), "plain file").unwrap();
    fs::write(right_dir.path().join("target.txt"), "t").unwrap();
    std::os::unix::fs::symlink(
        right_dir.path().join("target.txt"),
        right_dir.path().join("entry"),
    )
    .unwrap();

    let left = scan(left_dir.path());
    let right = scan(right_dir.path());
    let report = compare(&left, &right, ComparisonOptions::empty());

    let entry = report
        .records
        .iter()
        .find(|r| r.relative_path == Path::new("entry"))
        .unwrap();
    assert_eq!(entry.flags, ChangeFlags::REPLACED);
}

#[test]
fn test_nested_modifications_arrive_in_preorder() {
    let left_dir = TempDir::new().unwrap();
    let right_dir = TempDir::new().unwrap();
    for root in [left_dir.path(), right_dir.path()] {
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::create_dir(root.join("z")).unwrap();
    }
    fs::write(left_dir.path().join("a/b/deep.txt"), "one").unwrap();
    fs::write(right_dir.path().join("a/b/deep.txt"), "two").unwrap();
    fs::write(left_dir.path().join("z/tail.txt"), "xx").unwrap();
    fs::write(right_dir.path().join("z/tail.txt"), "yy").unwrap();
    fs::write(left_dir.path().join("first.txt"), "p").unwrap();
    fs::write(right_dir.path().join("first.txt"), "q").unwrap();

    let left = scan(left_dir.path());
    let right = scan(right_dir.path());
    let report = compare(&left, &right, ComparisonOptions::CONTENT);

    let paths: Vec<&Path> = report
        .records
        .iter()
        .map(|r| r.relative_path.as_path())
        .collect();
    assert_eq!(
        paths,
        vec![
            Path::new("a/b/deep.txt"),
            Path::new("first.txt"),
            Path::new("z/tail.txt"),
        ]
    );
}

#[test]
fn test_report_counts() {
    let left_dir = TempDir::new().unwrap();
    let right_dir = TempDir::new().unwrap();
    fs::write(left_dir.path().join("removed.txt"), "r").unwrap();
    fs::write(right_dir.path().join("added.txt"), "a").unwrap();
    fs::write(left_dir.path().join("changed.txt"), "v1").unwrap();
    fs::write(right_dir.path().join("changed.txt"), "v2").unwrap();

    let left = scan(left_dir.path());
    let right = scan(right_dir.path());
    let report = compare(&left, &right, ComparisonOptions::CONTENT);

    assert_eq!(report.stats.added, 1);
    assert_eq!(report.stats.removed, 1);
    assert_eq!(report.stats.modified, 1);
    assert_eq!(report.stats.total_differences(), 3);
    assert!(report.has_differences());
}
