use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;

use locsync_core::{Catalog, CatalogEntry, Result, SyncError, TranslationMap, EMPTY_COMMENT};
use serde::Serialize;

/// Decode strings resource text into a catalog.
///
/// Tolerant of surrounding whitespace and blank lines. A `/* ... */` block
/// (possibly spanning lines) attaches to the next entry; entries without one
/// get the single-space default comment. Malformed entries fail with the
/// 1-based line number where the entry started.
pub fn parse_strings(text: &str) -> std::result::Result<Catalog, SyncError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut catalog = Catalog::new();
    let mut pending_comment: Option<String> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        let line_no = i + 1;

        if line.is_empty() {
            i += 1;
            continue;
        }

        if let Some(rest) = line.strip_prefix("/*") {
            // Comment block. The encoder escapes `*/` inside bodies, so the
            // first unescaped `*/` terminates the block.
            let mut body = String::new();
            let mut rest = rest.to_string();
            loop {
                if let Some(pos) = rest.find("*/") {
                    let tail = rest[pos + 2..].trim();
                    if !tail.is_empty() {
                        return Err(SyncError::MalformedResource {
                            line: line_no,
                            reason: "unexpected text after comment close".to_string(),
                        });
                    }
                    body.push_str(&rest[..pos]);
                    break;
                }
                body.push_str(&rest);
                body.push('\n');
                i += 1;
                match lines.get(i) {
                    Some(next) => rest = (*next).to_string(),
                    None => {
                        return Err(SyncError::MalformedResource {
                            line: line_no,
                            reason: "unterminated comment".to_string(),
                        })
                    }
                }
            }
            pending_comment = Some(unescape_comment(strip_one_space(&body)));
            i += 1;
            continue;
        }

        let (id, value) = parse_entry_line(line).map_err(|reason| SyncError::MalformedResource {
            line: line_no,
            reason,
        })?;
        let comment = pending_comment
            .take()
            .unwrap_or_else(|| EMPTY_COMMENT.to_string());
        catalog.insert(id, CatalogEntry {
            text: value,
            comment,
        });
        i += 1;
    }

    Ok(catalog)
}

/// Strip the single space the encoder pads the comment body with.
fn strip_one_space(body: &str) -> &str {
    let body = body.strip_prefix(' ').unwrap_or(body);
    body.strip_suffix(' ').unwrap_or(body)
}

fn unescape_comment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('/') => out.push('/'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse one `"key" = "value";` line.
fn parse_entry_line(line: &str) -> std::result::Result<(String, String), String> {
    let mut chars = line.chars().peekable();

    let key = parse_quoted(&mut chars)?;
    skip_spaces(&mut chars);
    if chars.next() != Some('=') {
        return Err("expected `=` after key".to_string());
    }
    skip_spaces(&mut chars);
    let value = parse_quoted(&mut chars)?;
    skip_spaces(&mut chars);
    if chars.next() != Some(';') {
        return Err("expected `;` after value".to_string());
    }
    skip_spaces(&mut chars);
    if chars.next().is_some() {
        return Err("unexpected trailing characters after entry".to_string());
    }

    Ok((key, value))
}

fn skip_spaces(chars: &mut Peekable<Chars>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn parse_quoted(chars: &mut Peekable<Chars>) -> std::result::Result<String, String> {
    if chars.next() != Some('"') {
        return Err("expected opening quote".to_string());
    }
    let mut out = String::new();
    while let Some(c) = chars.next() {
        match c {
            '"' => return Ok(out),
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => out.push(other),
                None => return Err("unterminated string".to_string()),
            },
            _ => out.push(c),
        }
    }
    Err("unterminated string".to_string())
}

/// Project a decoded catalog into the flat id -> text map persisted per
/// language. Comments are dropped here.
pub fn project_translations(catalog: &Catalog) -> TranslationMap {
    catalog
        .iter()
        .map(|(id, entry)| (id.clone(), entry.text.clone()))
        .collect()
}

/// Write a translation map to `<out_dir>/<language>.json`, 4-space indented,
/// overwriting any existing file.
pub fn write_translation_map(
    out_dir: &Path,
    language: &str,
    map: &TranslationMap,
) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{language}.json"));
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);

    // serde_json's pretty printer indents with 2 spaces; the persisted
    // artifact uses 4.
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    map.serialize(&mut ser)?;
    writer.flush()?;

    Ok(path)
}
