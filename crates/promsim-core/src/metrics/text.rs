//! Text exposition helpers shared by all instruments.

use std::fmt::Write;

/// Content type served on the scrape endpoint.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Escape HELP text (backslash and newline only; quotes are legal here).
pub fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Render a float the way scrapers expect special values.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf".into() } else { "-Inf".into() }
    } else {
        format!("{v}")
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// Write the `# HELP` / `# TYPE` pair that opens a metric family.
pub(crate) fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(help));
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

/// Write the `<name>_created` gauge family that accompanies counters and summaries.
pub(crate) fn write_created(out: &mut String, base: &str, help: &str, created: f64) {
    let name = format!("{base}_created");
    write_header(out, &name, help, "gauge");
    let _ = writeln!(out, "{} {}", name, format_float(created));
}
