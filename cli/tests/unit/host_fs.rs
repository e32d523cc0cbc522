//! Tests for the `HostFs` filesystem adapter against a real temp directory.

#![allow(clippy::expect_used)]

use std::os::unix::fs::PermissionsExt;

use firstboot_cli::application::ports::LocalFs;
use firstboot_cli::infra::fs::HostFs;

#[test]
fn append_creates_then_extends() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sudoers");

    HostFs.append(&path, "first\n").expect("append");
    HostFs.append(&path, "second\n").expect("append");

    assert_eq!(
        HostFs.read_to_string(&path).expect("read"),
        "first\nsecond\n"
    );
}

#[test]
fn list_dir_is_sorted() {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in ["ssh_host_rsa_key", "moduli", "ssh_host_ed25519_key"] {
        HostFs.write(&dir.path().join(name), "x").expect("write");
    }

    let names: Vec<String> = HostFs
        .list_dir(dir.path())
        .expect("list")
        .iter()
        .filter_map(|p| p.file_name()?.to_str().map(String::from))
        .collect();

    assert_eq!(names, vec!["moduli", "ssh_host_ed25519_key", "ssh_host_rsa_key"]);
}

#[test]
fn set_permissions_applies_mode() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ssh = dir.path().join(".ssh");
    HostFs.create_dir_all(&ssh).expect("mkdir");

    HostFs.set_permissions(&ssh, 0o700).expect("chmod");

    let mode = std::fs::metadata(&ssh).expect("stat").permissions().mode();
    assert_eq!(mode & 0o777, 0o700);
}

#[test]
fn copy_and_remove_swap_profile_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let profile = dir.path().join(".profile");
    let backup = dir.path().join(".profile.original");
    HostFs.write(&profile, "sudo ./firstboot\n").expect("write");
    HostFs.write(&backup, "export PATH\n").expect("write");

    HostFs.copy(&backup, &profile).expect("copy");
    HostFs.remove_file(&backup).expect("remove");

    assert!(!HostFs.exists(&backup));
    assert_eq!(HostFs.read_to_string(&profile).expect("read"), "export PATH\n");
}

#[test]
fn missing_file_errors_name_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("sshd_config");

    let err = HostFs.read_to_string(&missing).expect_err("missing");

    assert!(format!("{err:#}").contains("sshd_config"));
}
