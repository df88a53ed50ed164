use std::borrow::Cow;

/// Strip common ANSI escape sequences (CSI/OSC) from a string.
/// Keeps everything else verbatim and is tolerant to malformed sequences.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !has_ansi(s) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        // CSI sequences: ESC '[' params intermediates final
        if bytes[i] == 0x1B && i + 1 < bytes.len() && bytes[i + 1] == b'[' {
            i += 2;
            while i < bytes.len() && (b'0'..=b'?').contains(&bytes[i]) {
                i += 1;
            }
            while i < bytes.len() && (b' '..=b'/').contains(&bytes[i]) {
                i += 1;
            }
            if i < bytes.len() && (b'@'..=b'~').contains(&bytes[i]) {
                i += 1;
                continue;
            }
            out.push('\x1b');
            out.push('[');
            continue;
        }
        out.push(bytes[i] as char);
        i += 1;
    }
    Cow::Owned(out)
}

pub fn has_ansi(s: &str) -> bool {
    s.bytes().any(|b| b == 0x1B)
}

/// Substring assertion with enough context to debug a failure.
pub fn assert_contains_with_context(haystack: &str, needle: &str, context_msg: &str) {
    if haystack.contains(needle) {
        return;
    }
    let head = haystack.lines().take(10).collect::<Vec<_>>().join("\n");
    panic!(
        "{}\n--- needle ---\n{}\n--- head(10) ---\n{}",
        context_msg, needle, head
    );
}

/// Assert that no ANSI escapes are present (for --no-color runs).
pub fn assert_no_ansi(s: &str, context_msg: &str) {
    if has_ansi(s) {
        let sample = s.lines().take(8).collect::<Vec<_>>().join("\n");
        panic!(
            "{}\nANSI escapes detected\n--- sample (first 8 lines) ---\n{}",
            context_msg, sample
        );
    }
}

pub fn run_cli(args: &[&str]) -> (i32, String, String) {
    let bin = env!("CARGO_BIN_EXE_locsync");
    let output = std::process::Command::new(bin)
        .args(args)
        .output()
        .expect("failed to spawn locsync");
    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}
