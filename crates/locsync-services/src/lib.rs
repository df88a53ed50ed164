//! High-level orchestration layer over lower-level crates.
//! Intentionally thin: exposes stable functions used by the CLI.

use std::path::{Path, PathBuf};

use locsync_net::StringsServer;
use tracing::debug;

pub use locsync_core::{Catalog, Result, SyncError, TranslationMap};

/// Everything the upload pipeline needs, resolved by the caller — no
/// ambient configuration state.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub root: PathBuf,
    pub file_pattern: String,
    pub base_url: String,
    pub pid: String,
    pub version: String,
    pub group: String,
    pub upload_language: String,
    pub insecure: bool,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct UploadReport {
    pub message_count: usize,
    /// Human-readable change entries from the service; empty on dry runs.
    pub changes: Vec<String>,
    /// The encoded resource text that was (or would have been) sent.
    pub resource_text: String,
    pub dry_run: bool,
}

/// The upload pipeline: scan -> merge -> encode -> envelope -> POST.
/// Sequential, no partial upload: any scan, merge, or transport failure
/// aborts before or instead of the request.
pub fn upload(opts: &UploadOptions) -> Result<UploadReport> {
    let plugins = locsync_extract::default_plugins();
    let batches = locsync_extract::scan_descriptors(&opts.root, &opts.file_pattern, &plugins)?;
    debug!("scanned {} descriptor batches", batches.len());

    let catalog = locsync_core::merge::merge_batches(batches)?;
    let message_count = catalog.len();
    let resource_text = locsync_export_strings::compile_strings(&catalog);
    debug!(
        "compiled {} messages into {} bytes of resource text",
        message_count,
        resource_text.len()
    );

    if opts.dry_run {
        return Ok(UploadReport {
            message_count,
            changes: Vec::new(),
            resource_text,
            dry_run: true,
        });
    }

    let server = StringsServer::new(
        &opts.base_url,
        &opts.pid,
        &opts.version,
        &opts.group,
        opts.insecure,
    )?;
    let body = server.upload_strings(&opts.upload_language, &resource_text)?;

    Ok(UploadReport {
        message_count,
        changes: locsync_net::parse_change_report(&body),
        resource_text,
        dry_run: false,
    })
}

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub base_url: String,
    pub pid: String,
    pub version: String,
    pub group: String,
    pub languages: Vec<String>,
    pub output_path: PathBuf,
    pub fail_empty: bool,
    pub insecure: bool,
}

#[derive(Debug)]
pub struct DownloadReport {
    pub keys: usize,
    pub path: PathBuf,
}

/// Result of one language's fetch+ingest. Failures stay scoped here so the
/// loop can keep going.
#[derive(Debug)]
pub struct LanguageOutcome {
    pub language: String,
    pub result: Result<DownloadReport>,
}

/// Fetch and ingest every configured language, sequentially and
/// independently: one language failing never stops the others.
pub fn download(opts: &DownloadOptions) -> Result<Vec<LanguageOutcome>> {
    let server = StringsServer::new(
        &opts.base_url,
        &opts.pid,
        &opts.version,
        &opts.group,
        opts.insecure,
    )?;

    let mut outcomes = Vec::with_capacity(opts.languages.len());
    for language in &opts.languages {
        debug!("loading translations for {language}");
        let result = server
            .fetch_strings(language)
            .and_then(|text| ingest_strings(&text, language, &opts.output_path, opts.fail_empty));
        outcomes.push(LanguageOutcome {
            language: language.clone(),
            result,
        });
    }

    Ok(outcomes)
}

/// Turn one language's resource text into its persisted translation file.
/// With `fail_empty` set, a zero-entry catalog fails and nothing is
/// written; otherwise even an empty map produces a (possibly `{}`) file.
pub fn ingest_strings(
    text: &str,
    language: &str,
    out_dir: &Path,
    fail_empty: bool,
) -> Result<DownloadReport> {
    let catalog = locsync_import_strings::parse_strings(text)?;
    let map = locsync_import_strings::project_translations(&catalog);

    if fail_empty && map.is_empty() {
        return Err(SyncError::EmptyCatalog {
            language: language.to_string(),
        }
        .into());
    }

    let path = locsync_import_strings::write_translation_map(out_dir, language, &map)?;
    Ok(DownloadReport {
        keys: map.len(),
        path,
    })
}
