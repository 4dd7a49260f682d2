use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn run_cli(args: &[&str], stdin: &str, cwd: &Path) -> std::process::Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_stitch"))
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("cli process should start");

    child
        .stdin
        .take()
        .expect("stdin handle should exist")
        .write_all(stdin.as_bytes())
        .expect("stdin write should succeed");

    child
        .wait_with_output()
        .expect("cli process should finish")
}

#[test]
fn no_preview_flag_applies_patch_and_prints_done() {
    let temp = TempDir::new().expect("tempdir should create");
    std::fs::write(temp.path().join("sample.txt"), "hello\n").expect("seed write should succeed");

    let patch = "\
*** Begin Patch
*** Update File: sample.txt
@@
-hello
+patched
*** End Patch
";
    let output = run_cli(&["--no-preview"], patch, temp.path());

    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf8");
    assert!(stdout.contains("Done!"));

    let updated = std::fs::read_to_string(temp.path().join("sample.txt"))
        .expect("read back should succeed");
    assert_eq!(updated, "patched\n");
}

#[test]
fn preview_flag_renders_diff_without_modifying_file() {
    let temp = TempDir::new().expect("tempdir should create");
    std::fs::write(temp.path().join("sample.txt"), "hello\n").expect("seed write should succeed");

    let patch = "\
*** Begin Patch
*** Update File: sample.txt
@@
-hello
+patched
*** End Patch
";
    let output = run_cli(&["--preview"], patch, temp.path());

    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf8");
    assert!(stdout.contains("update file: sample.txt"));
    assert!(stdout.contains("preview complete"));

    let untouched = std::fs::read_to_string(temp.path().join("sample.txt"))
        .expect("read back should succeed");
    assert_eq!(untouched, "hello\n");
}

#[test]
fn piped_stdin_without_terminal_cancels_instead_of_applying() {
    let temp = TempDir::new().expect("tempdir should create");
    std::fs::write(temp.path().join("sample.txt"), "hello\n").expect("seed write should succeed");

    let patch = "\
*** Begin Patch
*** Update File: sample.txt
@@
-hello
+patched
*** End Patch
";
    let output = run_cli(&[], patch, temp.path());

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf8");
    assert!(stdout.contains("no interactive terminal"));

    let untouched = std::fs::read_to_string(temp.path().join("sample.txt"))
        .expect("read back should succeed");
    assert_eq!(untouched, "hello\n");
}

#[test]
fn malformed_patch_reports_error_on_stderr() {
    let temp = TempDir::new().expect("tempdir should create");
    let output = run_cli(&["--no-preview"], "not a patch\n", temp.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("stderr should be utf8");
    assert!(stderr.contains("must start with '*** Begin Patch'"));
}

#[test]
fn add_and_delete_directives_apply_together() {
    let temp = TempDir::new().expect("tempdir should create");
    std::fs::write(temp.path().join("old.txt"), "bye\n").expect("seed write should succeed");

    let patch = "\
*** Begin Patch
*** Add File: nested/new.txt
+fresh content
*** Delete File: old.txt
*** End Patch
";
    let output = run_cli(&["--no-preview"], patch, temp.path());

    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(!temp.path().join("old.txt").exists());
    let created = std::fs::read_to_string(temp.path().join("nested/new.txt"))
        .expect("created file should read");
    assert_eq!(created, "fresh content");
}
