use locsync_core::Catalog;

/// Escape a key or value for the strings format:
/// \ -> \\, " -> \", \n -> \n, \r -> \r, \t -> \t
/// Everything structurally significant is escaped, so entries always fit
/// on one line and decode back exactly.
fn escape_strings(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a comment body: \ -> \\ and the closing delimiter */ -> *\/
/// so a comment can never terminate itself early. Newlines stay literal,
/// the comment block simply spans lines.
fn escape_comment(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '*' if chars.peek() == Some(&'/') => {
                chars.next();
                out.push_str("*\\/");
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Encode a catalog into the line-oriented strings resource text.
///
/// Each entry renders as `"id" = "text";`, preceded by `/* comment */` when
/// the comment is non-blank (the single-space default is blank and produces
/// no comment line). Entries are emitted in catalog order.
pub fn compile_strings(catalog: &Catalog) -> String {
    let mut out = String::new();

    for (id, entry) in catalog {
        if !entry.comment.trim().is_empty() {
            out.push_str("/* ");
            out.push_str(&escape_comment(&entry.comment));
            out.push_str(" */\n");
        }
        out.push('"');
        out.push_str(&escape_strings(id));
        out.push_str("\" = \"");
        out.push_str(&escape_strings(&entry.text));
        out.push_str("\";\n\n");
    }

    out
}
