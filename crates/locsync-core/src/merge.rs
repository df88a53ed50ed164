//! Folds scanner output into the canonical upload catalog.

use std::collections::BTreeMap;

use crate::{Catalog, CatalogEntry, MessageDescriptor, SyncError, EMPTY_COMMENT};

/// Merge descriptor batches (one per scanned file per plugin) into a single
/// catalog, failing on the first duplicate id whose text or comment differs.
///
/// The input is consumed once, in order. Descriptors flagged `skipUpload`
/// are dropped before any conflict checking.
pub fn merge_batches<I>(batches: I) -> Result<Catalog, SyncError>
where
    I: IntoIterator<Item = Vec<MessageDescriptor>>,
{
    // id -> (text, raw comment). The " " default is applied only when an
    // entry enters the catalog; conflicts are checked against the raw
    // comment, so a literal-space comment and a missing one stay distinct.
    let mut merged: BTreeMap<String, (String, String)> = BTreeMap::new();

    for batch in batches {
        for descriptor in batch {
            if descriptor.skip_upload() {
                continue;
            }

            let comment = descriptor.resolved_comment().to_string();

            match merged.get(&descriptor.id) {
                Some((text, existing_comment)) => {
                    if *text != descriptor.default_message {
                        return Err(SyncError::DuplicateMessage {
                            id: descriptor.id,
                            existing: text.clone(),
                            conflicting: descriptor.default_message,
                        });
                    }
                    if *existing_comment != comment {
                        return Err(SyncError::DuplicateComment {
                            id: descriptor.id,
                            existing: existing_comment.clone(),
                            conflicting: comment,
                        });
                    }
                }
                None => {
                    merged.insert(descriptor.id, (descriptor.default_message, comment));
                }
            }
        }
    }

    Ok(merged
        .into_iter()
        .map(|(id, (text, comment))| {
            let comment = if comment.is_empty() {
                EMPTY_COMMENT.to_string()
            } else {
                comment
            };
            (id, CatalogEntry { text, comment })
        })
        .collect())
}
