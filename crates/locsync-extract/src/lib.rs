use std::collections::BTreeMap;
use std::path::Path;

use globset::Glob;
use locsync_core::{Description, MessageDescriptor, Result, SyncError};
use serde::Deserialize;
use walkdir::WalkDir;

/// Trait implemented by statically linked extraction plugins.
///
/// A plugin turns the text of one scanned file into raw message
/// descriptors. The scanner feeds it every file matching the configured
/// pattern; `matches` lets a plugin opt out of files it cannot read.
pub trait ExtractPlugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, _path: &Path) -> bool {
        true
    }

    fn extract(&self, path: &Path, text: &str) -> Result<Vec<MessageDescriptor>>;
}

/// Descriptor files come in two shapes: a plain array of descriptors, or
/// the id-keyed map an extraction step writes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptorFile {
    List(Vec<MessageDescriptor>),
    Keyed(BTreeMap<String, KeyedDescriptor>),
}

#[derive(Debug, Deserialize)]
struct KeyedDescriptor {
    #[serde(rename = "defaultMessage")]
    default_message: String,
    #[serde(default)]
    description: Option<Description>,
}

/// Built-in plugin reading JSON descriptor files emitted by an upstream
/// extraction step.
pub struct JsonDescriptorPlugin;

impl ExtractPlugin for JsonDescriptorPlugin {
    fn name(&self) -> &'static str {
        "json"
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension().map(|e| e == "json").unwrap_or(false)
    }

    fn extract(&self, path: &Path, text: &str) -> Result<Vec<MessageDescriptor>> {
        let parsed: DescriptorFile =
            serde_json::from_str(text).map_err(|e| SyncError::Scan {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(match parsed {
            DescriptorFile::List(descriptors) => descriptors,
            DescriptorFile::Keyed(map) => map
                .into_iter()
                .map(|(id, d)| MessageDescriptor {
                    id,
                    default_message: d.default_message,
                    description: d.description,
                })
                .collect(),
        })
    }
}

/// The default plugin set.
pub fn default_plugins() -> Vec<Box<dyn ExtractPlugin>> {
    vec![Box::new(JsonDescriptorPlugin)]
}

/// Walk `root`, match relative paths against the glob `pattern`, and yield
/// one descriptor batch per (file, plugin) pair, in walk order.
///
/// Unreadable files are skipped with a warning; a plugin failure aborts the
/// scan, since a partial catalog must never be uploaded.
pub fn scan_descriptors(
    root: &Path,
    pattern: &str,
    plugins: &[Box<dyn ExtractPlugin>],
) -> Result<Vec<Vec<MessageDescriptor>>> {
    let matcher = Glob::new(pattern)?.compile_matcher();
    let mut batches: Vec<Vec<MessageDescriptor>> = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let rel = path.strip_prefix(root).unwrap_or(path);
        if !matcher.is_match(rel) {
            continue;
        }

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("[locsync] WARN: {path:?}: {e}");
                continue;
            }
        };

        for plugin in plugins {
            if !plugin.matches(path) {
                continue;
            }
            batches.push(plugin.extract(path, &text)?);
        }
    }

    Ok(batches)
}
