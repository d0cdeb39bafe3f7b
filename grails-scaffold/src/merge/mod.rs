//! Incremental merging of generated fragments into existing artifacts
//!
//! Every generated artifact that is shared between entities (migrations,
//! routes, the entity registry, the model index) is maintained by merging
//! one [`Fragment`] per entity into whatever is already on disk. A fragment
//! carries the [`InsertionPolicy`] that decides where its text goes.
//!
//! All policies obey the same laws:
//!
//! - **Idempotence**: merging a fragment into the result of merging that
//!   same fragment returns the input unchanged, byte for byte.
//! - **Non-interference**: fragments for distinct entities never overwrite
//!   each other's text.
//! - **Fail fast**: if an existing artifact lacks the anchor a policy needs,
//!   the merge returns [`ScaffoldError::MalformedArtifact`] and produces no
//!   text at all. Nothing guesses an insertion point.
//!
//! Insertion points are always computed from the content passed in, never
//! cached between merges.
//!
//! # Example
//!
//! ```
//! use grails_scaffold::merge::{merge, Fragment, InsertionPolicy, MergeOutcome};
//! use std::path::Path;
//!
//! let fragment = Fragment::new(
//!     "\tdb.AutoMigrate(&models.Post{})\n",
//!     InsertionPolicy::AppendBeforeTerminator {
//!         preamble: "func Migrate(db *gorm.DB) {\n".to_string(),
//!         terminator: "}\n".to_string(),
//!     },
//! );
//!
//! let created = merge(Path::new("migrations.go"), None, &fragment).unwrap();
//! assert_eq!(created.outcome, MergeOutcome::Created);
//! assert!(created.text.ends_with("}\n"));
//!
//! let again = merge(Path::new("migrations.go"), Some(&created.text), &fragment).unwrap();
//! assert_eq!(again.outcome, MergeOutcome::Unchanged);
//! assert_eq!(again.text, created.text);
//! ```

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ScaffoldError, ScaffoldResult};

/// Structural rule governing where a fragment lands in an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertionPolicy {
    /// The artifact is a fixed preamble followed by entries and a single
    /// trailing terminator. New entries go right before the last terminator.
    AppendBeforeTerminator {
        /// Text an absent artifact starts with
        preamble: String,
        /// Closing text the artifact always ends with (e.g. `"}\n"`)
        terminator: String,
    },

    /// The artifact is a JSON object; the fragment is the value stored
    /// under `key`, replacing any previous value.
    AppendToKeyedContainer {
        /// Entity identifier the fragment is stored under
        key: String,
    },

    /// The fragment is one entry line of a block that additionally needs a
    /// declaration (an import) present exactly once in the artifact.
    AppendWithDeclarationHeader {
        /// Marker line every valid artifact contains (e.g. a package clause).
        /// Missing declarations are inserted right after it.
        anchor: String,
        /// Declaration that must appear exactly once
        declaration: String,
        /// Opening line(s) of the block entries live in
        block_open: String,
        /// Line that closes the block
        block_close: String,
    },
}

/// A generated unit of text destined for one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Rendered text
    pub text: String,
    /// Where the text belongs
    pub policy: InsertionPolicy,
}

impl Fragment {
    /// Create a fragment
    pub fn new(text: impl Into<String>, policy: InsertionPolicy) -> Self {
        Self {
            text: text.into(),
            policy,
        }
    }
}

/// What a merge did to the artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The artifact did not exist and was created
    Created,
    /// The artifact existed and gained or replaced content
    Updated,
    /// The fragment was already present
    Unchanged,
}

/// Result of a successful merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    /// Full new artifact text
    pub text: String,
    /// Whether anything changed
    pub outcome: MergeOutcome,
}

/// Merge `fragment` into the artifact at `path`
///
/// `existing` is the artifact's current content, or `None` if it does not
/// exist. Whitespace-only content is treated like an absent artifact.
/// `path` is only used for error reporting.
///
/// # Errors
///
/// - [`ScaffoldError::MalformedArtifact`] if the existing artifact lacks the
///   structural anchor the policy needs
/// - [`ScaffoldError::Registry`] if a keyed-container fragment is not valid JSON
pub fn merge(path: &Path, existing: Option<&str>, fragment: &Fragment) -> ScaffoldResult<Merged> {
    let existing = existing.filter(|text| !text.trim().is_empty());

    let text = match (&fragment.policy, existing) {
        (InsertionPolicy::AppendBeforeTerminator { preamble, terminator }, None) => {
            format!("{preamble}{}{terminator}", fragment.text)
        }
        (InsertionPolicy::AppendBeforeTerminator { terminator, .. }, Some(current)) => {
            append_before_terminator(path, current, &fragment.text, terminator)?
        }
        (InsertionPolicy::AppendToKeyedContainer { key }, current) => {
            upsert_keyed(path, current, key, &fragment.text)?
        }
        (
            InsertionPolicy::AppendWithDeclarationHeader {
                anchor,
                declaration,
                block_open,
                block_close,
            },
            None,
        ) => format!(
            "{anchor}\n\n{declaration}\n\n{block_open}\n{}{block_close}\n",
            fragment.text
        ),
        (
            InsertionPolicy::AppendWithDeclarationHeader {
                anchor,
                declaration,
                block_open,
                block_close,
            },
            Some(current),
        ) => append_with_declaration(
            path,
            current,
            &fragment.text,
            anchor,
            declaration,
            block_open,
            block_close,
        )?,
    };

    let outcome = match existing {
        None => MergeOutcome::Created,
        Some(current) if current == text => MergeOutcome::Unchanged,
        Some(_) => MergeOutcome::Updated,
    };

    tracing::debug!(path = %path.display(), ?outcome, "merged fragment");

    Ok(Merged { text, outcome })
}

/// Splice `entry` in front of the last terminator
///
/// Only whitespace may follow the terminator; it is normalized away so the
/// artifact always ends with exactly one terminator.
fn append_before_terminator(
    path: &Path,
    current: &str,
    entry: &str,
    terminator: &str,
) -> ScaffoldResult<String> {
    let token = terminator.trim_end();
    let Some(index) = current.rfind(token) else {
        return Err(ScaffoldError::malformed(
            path,
            format!("terminator '{token}' not found"),
        ));
    };

    let trailing = &current[index + token.len()..];
    if !trailing.trim().is_empty() {
        return Err(ScaffoldError::malformed(
            path,
            format!("unexpected content after final terminator '{token}'"),
        ));
    }

    let head = &current[..index];
    if head.contains(entry) {
        return Ok(current.to_string());
    }

    Ok(format!("{head}{entry}{terminator}"))
}

/// Upsert `value_json` under `key` in a JSON object artifact
///
/// Keys are written sorted, so the result never depends on merge order.
fn upsert_keyed(
    path: &Path,
    current: Option<&str>,
    key: &str,
    value_json: &str,
) -> ScaffoldResult<String> {
    let before: BTreeMap<String, Value> = match current {
        None => BTreeMap::new(),
        Some(text) => serde_json::from_str(text).map_err(|err| {
            ScaffoldError::malformed(path, format!("expected a JSON object: {err}"))
        })?,
    };

    let value: Value = serde_json::from_str(value_json)?;
    if let Some(text) = current {
        // A no-op upsert keeps the caller's bytes, whatever their formatting.
        if before.get(key) == Some(&value) {
            return Ok(text.to_string());
        }
    }

    let mut container = before;
    container.insert(key.to_string(), value);

    let mut rendered = serde_json::to_string_pretty(&container)?;
    rendered.push('\n');
    Ok(rendered)
}

fn append_with_declaration(
    path: &Path,
    current: &str,
    entry: &str,
    anchor: &str,
    declaration: &str,
    block_open: &str,
    block_close: &str,
) -> ScaffoldResult<String> {
    let Some(anchor_at) = current.find(anchor) else {
        return Err(ScaffoldError::malformed(
            path,
            format!("declaration anchor '{anchor}' not found"),
        ));
    };

    let mut text = current.to_string();

    if !text.contains(declaration) {
        let insert_at = line_end(&text, anchor_at);
        text.insert_str(insert_at, &format!("\n{declaration}\n"));
    }

    if !text.contains(block_open) {
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&format!("\n{block_open}\n{block_close}\n"));
    }

    if text.contains(entry) {
        return Ok(text);
    }

    // Measured on the current text: the declaration may just have shifted it.
    let open_at = text
        .find(block_open)
        .map(|at| at + block_open.len())
        .unwrap_or_default();
    let Some(close_at) = find_line(&text, open_at, block_close) else {
        return Err(ScaffoldError::malformed(
            path,
            format!("block '{}' is never closed", block_open.trim()),
        ));
    };

    text.insert_str(close_at, entry);
    Ok(text)
}

/// Byte offset just past the newline ending the line that contains `at`
fn line_end(text: &str, at: usize) -> usize {
    text[at..]
        .find('\n')
        .map_or(text.len(), |offset| at + offset + 1)
}

/// Start offset of the first line at or after `from` whose trimmed content
/// equals `line`
fn find_line(text: &str, from: usize, line: &str) -> Option<usize> {
    let wanted = line.trim();
    let mut offset = line_end(text, from);
    for candidate in text[offset..].split_inclusive('\n') {
        if candidate.trim() == wanted {
            return Some(offset);
        }
        offset += candidate.len();
    }
    None
}
