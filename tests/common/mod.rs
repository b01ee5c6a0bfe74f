#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub use runall_test_utils::{init_tracing, with_timeout};

/// Write a task file into `dir` and return its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("writing test script");
    path
}

/// Same as [`write_script`], but with a shebang and the executable bit so
/// the file can run without an interpreter.
#[cfg(unix)]
pub fn write_executable(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = write_script(dir, name, &format!("#!/bin/sh\n{body}"));
    let mut perms = std::fs::metadata(&path).expect("stat test script").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod test script");
    path
}
