//! Bind and unmount through the real kernel.
//!
//! Run with `--features integration` as root.

#![cfg(all(feature = "integration", target_os = "linux"))]

use std::path::{Path, PathBuf};

use hostutil::mount::{bind_mount, bind_mount_all, unmount, unmount_all};
use hostutil_common::HostutilError;
use tempfile::TempDir;

fn is_root() -> bool {
    rustix::process::geteuid().is_root()
}

/// Unmounts whatever a test left under its root.
struct Cleanup(PathBuf);

impl Drop for Cleanup {
    fn drop(&mut self) {
        let _ = unmount(&self.0);
        let _ = unmount_all(&self.0);
    }
}

fn make_dirs(root: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = root.join(name);
            std::fs::create_dir(&path).unwrap();
            path
        })
        .collect()
}

#[test]
fn bound_content_is_visible_until_unmounted() {
    if !is_root() {
        eprintln!("skipping: bind mounts need root");
        return;
    }
    let temp = TempDir::new().unwrap();
    let dirs = make_dirs(temp.path(), &["src", "tgt"]);
    let (src, tgt) = (&dirs[0], &dirs[1]);
    let _cleanup = Cleanup(tgt.clone());

    std::fs::write(src.join("somefile.txt"), b"Some content").unwrap();
    std::fs::write(tgt.join("somefile.txt"), b"original").unwrap();

    bind_mount(src, tgt).unwrap();
    assert_eq!(std::fs::read(tgt.join("somefile.txt")).unwrap(), b"Some content");

    unmount(tgt).unwrap();
    assert_eq!(std::fs::read(tgt.join("somefile.txt")).unwrap(), b"original");
}

#[test]
fn bind_all_then_unmount_all() {
    if !is_root() {
        eprintln!("skipping: bind mounts need root");
        return;
    }
    let src_root = TempDir::new().unwrap();
    let tgt_root = TempDir::new().unwrap();
    let names = ["somedir", "anotherdir", "dir3", "dirfour"];
    let mut paths = make_dirs(src_root.path(), &names);
    paths.push(tgt_root.path().to_path_buf());
    let _cleanup = Cleanup(tgt_root.path().to_path_buf());

    bind_mount_all(&paths).unwrap();

    for (i, name) in names.iter().enumerate() {
        let content = format!("Some content in dir {name}");
        let file = format!("somefile{}.txt", i + 1);
        std::fs::write(src_root.path().join(name).join(&file), &content).unwrap();
        let read = std::fs::read_to_string(tgt_root.path().join(name).join(&file)).unwrap();
        assert_eq!(read, content);
    }

    // Already unbound entries must not fail the batch.
    unmount(tgt_root.path().join("dirfour")).unwrap();
    unmount_all(tgt_root.path()).unwrap();

    for name in names {
        assert!(std::fs::read_dir(tgt_root.path().join(name)).unwrap().next().is_none());
    }
}

#[test]
fn missing_source_does_not_block_the_rest() {
    if !is_root() {
        eprintln!("skipping: bind mounts need root");
        return;
    }
    let src_root = TempDir::new().unwrap();
    let tgt_root = TempDir::new().unwrap();
    let dirs = make_dirs(src_root.path(), &["a", "b"]);
    let missing = src_root.path().join("missing");
    std::fs::write(dirs[1].join("marker"), b"b").unwrap();
    let _cleanup = Cleanup(tgt_root.path().to_path_buf());

    let err = bind_mount_all(&[
        dirs[0].clone(),
        missing.clone(),
        dirs[1].clone(),
        tgt_root.path().to_path_buf(),
    ])
    .unwrap_err();

    let HostutilError::Batch(errors) = err else {
        panic!("expected a batch error");
    };
    assert_eq!(errors.subjects(), vec![missing.as_path()]);
    assert_eq!(
        std::fs::read(tgt_root.path().join("b").join("marker")).unwrap(),
        b"b"
    );
    assert!(!tgt_root.path().join("missing").exists());
}
