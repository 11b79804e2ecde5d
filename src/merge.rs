//! Merging two overlapping exports of the same conversation.
//!
//! WhatsApp exports are bounded snapshots; archiving a long-running group
//! chat means stitching an older export and a newer one together. Messages
//! are aligned on a [`MergeKey`] — two messages with the same timestamp,
//! sender and occurrence rank are taken to be the same message — and every
//! collision is reconciled into one body.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::config::ArchiveConfig;
use crate::error::Result;
use crate::media::MediaIndex;
use crate::message::Message;

/// Join key aligning two message sequences.
///
/// `occurrence` is the 1-based rank of this (timestamp, sender) pair within
/// its own sequence: a sender posting three times in one minute yields
/// occurrences 1, 2, 3, so repeated messages still align pairwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MergeKey {
    pub timestamp: NaiveDateTime,
    pub sender: String,
    pub occurrence: u32,
}

/// Computes the merge key of every message in a sequence.
pub fn merge_keys(messages: &[Message]) -> Vec<MergeKey> {
    let mut seen: HashMap<(NaiveDateTime, &str), u32> = HashMap::new();
    messages
        .iter()
        .map(|msg| {
            let count = seen.entry((msg.timestamp, msg.sender.as_str())).or_insert(0);
            *count += 1;
            MergeKey {
                timestamp: msg.timestamp,
                sender: msg.sender.clone(),
                occurrence: *count,
            }
        })
        .collect()
}

/// Merges two independently assembled exports into one sequence.
///
/// Full outer join on [`MergeKey`]: keys present on only one side keep that
/// side's message; keys present on both are reconciled (media placeholders
/// substituted from `media`, otherwise the longer body wins). Output order
/// is the join's natural order — the left sequence in place, then the
/// right-only messages in their own order. No re-sort by timestamp happens.
///
/// Substituting against an exhausted media bucket aborts the merge with
/// [`ArchiveError::MediaUnderflow`](crate::error::ArchiveError::MediaUnderflow).
pub fn merge_exports(
    left: Vec<Message>,
    right: Vec<Message>,
    media: &mut MediaIndex,
    config: &ArchiveConfig,
) -> Result<Vec<Message>> {
    let left_keys = merge_keys(&left);
    let right_keys = merge_keys(&right);

    let mut right_by_key: HashMap<MergeKey, usize> = right_keys
        .into_iter()
        .enumerate()
        .map(|(idx, key)| (key, idx))
        .collect();
    let mut right_slots: Vec<Option<Message>> = right.into_iter().map(Some).collect();

    let mut merged = Vec::with_capacity(left.len() + right_slots.len());
    for (msg, key) in left.into_iter().zip(left_keys) {
        match right_by_key
            .remove(&key)
            .and_then(|idx| right_slots[idx].take())
        {
            Some(other) => merged.push(reconcile(msg, other, media, config)?),
            None => merged.push(msg),
        }
    }
    merged.extend(right_slots.into_iter().flatten());
    Ok(merged)
}

/// Reconciles two messages that share a merge key.
fn reconcile(
    left: Message,
    right: Message,
    media: &mut MediaIndex,
    config: &ArchiveConfig,
) -> Result<Message> {
    let timestamp = left.timestamp;

    if let Some(mut body) = media.substitute(&left.body, timestamp, config)? {
        if appendable(&right.body, config) {
            body.push('\n');
            body.push_str(&right.body);
        }
        return Ok(Message { body, ..left });
    }
    if let Some(mut body) = media.substitute(&right.body, timestamp, config)? {
        if appendable(&left.body, config) {
            body.push('\n');
            body.push_str(&left.body);
        }
        return Ok(Message { body, ..left });
    }

    // Neither side carries a placeholder: the longer body is assumed to be
    // the more complete one, ties keep the left side.
    if right.body.len() > left.body.len() {
        Ok(Message {
            body: right.body,
            ..left
        })
    } else {
        Ok(left)
    }
}

/// The other side's body is worth appending unless it is empty or nothing
/// but the placeholder itself.
fn appendable(body: &str, config: &ArchiveConfig) -> bool {
    !body.is_empty() && body != config.media_placeholder
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 6, 15)
            .unwrap()
            .and_hms_opt(14, minute, 0)
            .unwrap()
    }

    fn msg(minute: u32, sender: &str, body: &str) -> Message {
        Message::new(ts(minute), sender, body)
    }

    #[test]
    fn test_merge_keys_occurrence_ranks() {
        let messages = vec![
            msg(30, "Alice", "one"),
            msg(30, "Alice", "two"),
            msg(30, "Bob", "other"),
            msg(31, "Alice", "later"),
        ];
        let keys = merge_keys(&messages);
        assert_eq!(keys[0].occurrence, 1);
        assert_eq!(keys[1].occurrence, 2);
        assert_eq!(keys[2].occurrence, 1);
        assert_eq!(keys[3].occurrence, 1);
    }

    #[test]
    fn test_merge_with_itself_is_identity() {
        let config = ArchiveConfig::default();
        let mut media = MediaIndex::new();
        let a = vec![
            msg(30, "Alice", "Hello"),
            msg(30, "Alice", "again"),
            msg(31, "Bob", "Hi"),
        ];
        let merged = merge_exports(a.clone(), a.clone(), &mut media, &config).unwrap();
        assert_eq!(merged, a);
    }

    #[test]
    fn test_merge_disjoint_keeps_both_sides() {
        let config = ArchiveConfig::default();
        let mut media = MediaIndex::new();
        let left = vec![msg(30, "Alice", "early")];
        let right = vec![msg(31, "Bob", "late")];
        let merged = merge_exports(left, right, &mut media, &config).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].body, "early");
        assert_eq!(merged[1].body, "late");
    }

    #[test]
    fn test_merge_right_only_appended_after_left_order() {
        let config = ArchiveConfig::default();
        let mut media = MediaIndex::new();
        let left = vec![msg(32, "Alice", "left one"), msg(33, "Alice", "left two")];
        let right = vec![msg(30, "Bob", "right only"), msg(33, "Alice", "left two")];
        let merged = merge_exports(left, right, &mut media, &config).unwrap();
        // Right-only messages come after the left sequence; no timestamp
        // re-sort happens.
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].body, "left one");
        assert_eq!(merged[1].body, "left two");
        assert_eq!(merged[2].body, "right only");
    }

    #[test]
    fn test_merge_longer_body_wins() {
        let config = ArchiveConfig::default();
        let mut media = MediaIndex::new();
        let left = vec![msg(30, "Alice", "short")];
        let right = vec![msg(30, "Alice", "short but longer")];
        let merged = merge_exports(left, right, &mut media, &config).unwrap();
        assert_eq!(merged[0].body, "short but longer");
    }

    #[test]
    fn test_merge_equal_length_keeps_left() {
        let config = ArchiveConfig::default();
        let mut media = MediaIndex::new();
        let left = vec![msg(30, "Alice", "aaaa")];
        let right = vec![msg(30, "Alice", "bbbb")];
        let merged = merge_exports(left, right, &mut media, &config).unwrap();
        assert_eq!(merged[0].body, "aaaa");
    }

    fn media_with(minute: u32) -> MediaIndex {
        use tempfile::tempdir;
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path()
                .join(format!("2021-06-15_at_14.{minute:02}.00.jpg")),
            b"",
        )
        .unwrap();
        MediaIndex::scan(dir.path()).unwrap()
    }

    #[test]
    fn test_merge_left_placeholder_substituted_with_right_appended() {
        let config = ArchiveConfig::default();
        let mut media = media_with(30);
        let left = vec![msg(30, "Alice", "<Medien ausgeschlossen>")];
        let right = vec![msg(30, "Alice", "a caption")];
        let merged = merge_exports(left, right, &mut media, &config).unwrap();
        assert_eq!(
            merged[0].body,
            "2021-06-15_at_14.30.00.jpg (Datei angehängt)\na caption"
        );
    }

    #[test]
    fn test_merge_right_placeholder_substituted_with_left_appended() {
        let config = ArchiveConfig::default();
        let mut media = media_with(30);
        let left = vec![msg(30, "Alice", "a caption")];
        let right = vec![msg(30, "Alice", "<Medien ausgeschlossen>")];
        let merged = merge_exports(left, right, &mut media, &config).unwrap();
        assert_eq!(
            merged[0].body,
            "2021-06-15_at_14.30.00.jpg (Datei angehängt)\na caption"
        );
    }

    #[test]
    fn test_merge_both_placeholders_pops_once() {
        let config = ArchiveConfig::default();
        let mut media = media_with(30);
        let left = vec![msg(30, "Alice", "<Medien ausgeschlossen>")];
        let right = vec![msg(30, "Alice", "<Medien ausgeschlossen>")];
        let merged = merge_exports(left, right, &mut media, &config).unwrap();
        // The placeholder-only right body is not appended, and the single
        // media file is consumed exactly once.
        assert_eq!(
            merged[0].body,
            "2021-06-15_at_14.30.00.jpg (Datei angehängt)"
        );
        assert_eq!(media.len(), 0);
    }

    #[test]
    fn test_merge_underflow_aborts() {
        let config = ArchiveConfig::default();
        let mut media = MediaIndex::new();
        let left = vec![msg(30, "Alice", "<Medien ausgeschlossen>")];
        let right = vec![msg(30, "Alice", "caption")];
        let err = merge_exports(left, right, &mut media, &config).unwrap_err();
        assert!(err.is_media_underflow());
    }
}
