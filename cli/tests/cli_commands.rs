use assert_cmd::Command;
use std::io::Write;
use tempfile::NamedTempFile;

const SAMPLE: &str = r#"
fn main(n) {
    total = 0;
    while (n > 0) {
        if (n == 2) { break; }
        total = total + n;
        n = n - 1;
    }
    return total;
}
"#;

fn script(source: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".fl").tempfile().expect("temp file");
    file.write_all(source.as_bytes()).expect("write script");
    file
}

fn flatline() -> Command {
    Command::cargo_bin("flatline").expect("flatline binary")
}

#[test]
fn run_prints_entry_result() {
    let file = script(SAMPLE);
    let output = flatline()
        .arg("run")
        .arg(file.path())
        .args(["--arg", "5"])
        .output()
        .expect("spawn flatline");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    // 5 + 4 + 3, then break at 2
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "12");
}

#[test]
fn run_step_limit_fails() {
    let file = script("fn main() { while (true) { } }");
    let output = flatline()
        .arg("run")
        .arg(file.path())
        .args(["--max-steps", "50"])
        .output()
        .expect("spawn flatline");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("step limit of 50 exceeded"));
}

#[test]
fn build_dumps_ir_text() {
    let file = script("fn f(x) { while (x) { break; } }");
    let output = flatline()
        .arg("build")
        .arg(file.path())
        .args(["--dump", "ir"])
        .output()
        .expect("spawn flatline");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0002: BrFalse r0 -> L1"), "{}", stdout);
    assert!(stdout.contains("0003: Jump L1"), "{}", stdout);
    assert!(stdout.contains("0005: L1:"), "{}", stdout);
}

#[test]
fn build_writes_json_dump_to_file() {
    let file = script(SAMPLE);
    let dir = tempfile::tempdir().expect("temp dir");
    let out_path = dir.path().join("ir.json");

    flatline()
        .arg("build")
        .arg(file.path())
        .args(["--dump", "ir", "--format", "json", "--output"])
        .arg(&out_path)
        .assert()
        .success();

    let text = std::fs::read_to_string(&out_path).expect("dump written");
    let json: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(json[0]["name"], "main");
    assert_eq!(json[0]["ops"][0]["op"], "LConst");
}

#[test]
fn build_reports_break_outside_loop() {
    let file = script("fn f() {\n  break;\n}\n");
    let output = flatline().arg("build").arg(file.path()).output().expect("spawn flatline");

    assert_eq!(output.status.code(), Some(1));
    let stderr = console::strip_ansi_codes(&String::from_utf8_lossy(&output.stderr)).to_string();
    assert!(stderr.contains("[ERROR]"), "{}", stderr);
    assert!(stderr.contains("'break' used outside of a loop"), "{}", stderr);
}

#[test]
fn missing_file_is_a_diagnostic() {
    flatline().args(["build", "does/not/exist.fl"]).assert().failure();
}
