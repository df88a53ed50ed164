use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod merge;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// One occurrence of a translatable string reported by the scanner.
/// Several occurrences may share an `id`; the merger collapses them and
/// rejects the ones that disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDescriptor {
    pub id: String,
    #[serde(rename = "defaultMessage")]
    pub default_message: String,
    #[serde(default)]
    pub description: Option<Description>,
}

/// Descriptor metadata as extraction tools emit it: either a bare comment
/// string, or a structured value with an optional comment and an optional
/// "leave me out of the upload" flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Plain(String),
    Structured {
        comment: Option<String>,
        #[serde(rename = "skipUpload")]
        skip_upload: Option<bool>,
    },
}

impl MessageDescriptor {
    /// True when the descriptor asked to be left out of the upload catalog.
    pub fn skip_upload(&self) -> bool {
        matches!(
            self.description,
            Some(Description::Structured {
                skip_upload: Some(true),
                ..
            })
        )
    }

    /// Comment as the merger sees it: plain strings verbatim, structured
    /// comments when present, empty otherwise.
    pub fn resolved_comment(&self) -> &str {
        match &self.description {
            Some(Description::Plain(s)) => s,
            Some(Description::Structured {
                comment: Some(c), ..
            }) => c,
            _ => "",
        }
    }
}

/// Canonical deduplicated record for one id.
/// `comment` is never empty: the strings format cannot carry an empty
/// comment field, so a missing comment is stored as a single space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub text: String,
    pub comment: String,
}

/// Deduplicated mapping id -> entry. Built once per upload or download
/// operation, never persisted between runs.
pub type Catalog = BTreeMap<String, CatalogEntry>;

/// Flat id -> translated text projection persisted per language.
pub type TranslationMap = BTreeMap<String, String>;

/// Comment stored for entries that carry none.
pub const EMPTY_COMMENT: &str = " ";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to scan {path}: {reason}")]
    Scan { path: String, reason: String },

    #[error("duplicate message id {id:?}, but the `defaultMessage` are different: {conflicting:?} != {existing:?}")]
    DuplicateMessage {
        id: String,
        existing: String,
        conflicting: String,
    },

    #[error("duplicate message id {id:?}, but the `description` are different: {conflicting:?} != {existing:?}")]
    DuplicateComment {
        id: String,
        existing: String,
        conflicting: String,
    },

    #[error("malformed resource text at line {line}: {reason}")]
    MalformedResource { line: usize, reason: String },

    #[error("no localization keys found for {language:?}")]
    EmptyCatalog { language: String },
}
