use std::collections::HashSet;

use serde_json::{Map, Value};

use cgo_core::{focus, Bucket, Buckets, ClassificationResult, DailyFocusItem};

use crate::ClassifyError;

/// Turn a raw model reply into a validated result.
///
/// Buckets are deduplicated (first occurrence wins, in display order) and a
/// supplied Daily Focus is normalized against them. When none survives, it
/// is derived.
pub fn parse_reply(raw: &str) -> Result<ClassificationResult, ClassifyError> {
    let object = extract_json_object(raw).ok_or(ClassifyError::Parse)?;

    let mut buckets = Buckets::default();
    for bucket in Bucket::ALL {
        *buckets.get_mut(bucket) = string_array(&object, bucket.as_str())?;
    }
    let buckets = dedupe(buckets);

    let supplied = object
        .get("dailyFocus")
        .map(focus_items)
        .unwrap_or_default();
    let mut daily_focus = focus::normalize(&supplied, &buckets);
    if daily_focus.is_empty() {
        daily_focus = focus::derive(&buckets);
    }

    Ok(ClassificationResult {
        buckets,
        daily_focus,
    })
}

/// Find the JSON object in a reply that may wrap it in prose or code fences.
/// Tries the widest `{ ... }` span first, then each balanced span in turn.
fn extract_json_object(raw: &str) -> Option<Map<String, Value>> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end > start {
        if let Ok(Value::Object(map)) = serde_json::from_str(&raw[start..=end]) {
            return Some(map);
        }
    }

    balanced_spans(raw).find_map(|span| match serde_json::from_str(span) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    })
}

/// Top-level `{ ... }` spans, skipping braces inside string literals.
fn balanced_spans(raw: &str) -> impl Iterator<Item = &str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in raw.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        spans.push(&raw[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    spans.into_iter()
}

fn string_array(object: &Map<String, Value>, key: &str) -> Result<Vec<String>, ClassifyError> {
    let items = object
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| ClassifyError::Structure(format!("missing `{key}` array")))?;

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let text = item
            .as_str()
            .ok_or_else(|| ClassifyError::Structure(format!("non-string entry in `{key}`")))?;
        let text = text.trim();
        if !text.is_empty() {
            out.push(text.to_string());
        }
    }
    Ok(out)
}

fn focus_items(value: &Value) -> Vec<DailyFocusItem> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let priority = item.get("priority")?.as_u64()?;
                    let task = item.get("task")?.as_str()?.trim();
                    Some(DailyFocusItem {
                        priority: u32::try_from(priority).ok()?,
                        task: task.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn dedupe(buckets: Buckets) -> Buckets {
    let mut seen = HashSet::new();
    let mut out = Buckets::default();
    for (bucket, task) in buckets.iter() {
        if seen.insert(task.as_str()) {
            out.get_mut(bucket).push(task.clone());
        }
    }
    out
}
