//! Pure transforms over [`Buckets`].
//!
//! Items are addressed positionally by `"<bucket>-<index>"` keys, the same
//! keys a drag-and-drop front end hands out for every card. Every transform
//! is total: a reference that does not resolve returns the input unchanged,
//! so handlers can call these with stale coordinates without checking first.

use crate::{Bucket, Buckets};

/// A positional reference into one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRef {
    pub bucket: Bucket,
    pub index: usize,
}

impl ItemRef {
    pub fn new(bucket: Bucket, index: usize) -> Self {
        Self { bucket, index }
    }

    /// Parse a `"core-2"` style key.
    pub fn parse(key: &str) -> Option<Self> {
        let (bucket, _) = key.split_once('-')?;
        Some(Self {
            bucket: Bucket::parse(bucket)?,
            index: parse_index(key)?,
        })
    }

    pub fn key(&self) -> String {
        format!("{}-{}", self.bucket, self.index)
    }

    fn resolves_in<T>(&self, buckets: &Buckets<T>) -> bool {
        self.index < buckets.get(self.bucket).len()
    }
}

/// Index part of a key: the leading digits after the first `-`.
/// The bucket part is not checked.
pub fn parse_index(key: &str) -> Option<usize> {
    let (_, rest) = key.split_once('-')?;
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

/// Move the item at `item_ref` to the end of `to_bucket`.
///
/// `from_bucket` is what the caller believes the source is; the bucket
/// encoded in `item_ref` wins.
pub fn move_item<T: Clone>(
    buckets: &Buckets<T>,
    from_bucket: &str,
    to_bucket: &str,
    item_ref: &str,
) -> Buckets<T> {
    if from_bucket == to_bucket {
        return buckets.clone();
    }
    match (ItemRef::parse(item_ref), Bucket::parse(to_bucket)) {
        (Some(source), Some(target)) => move_to(buckets, source, target),
        _ => buckets.clone(),
    }
}

/// Reorder inside one bucket with splice semantics: remove at the from
/// index, then insert at the to index of the shortened list.
pub fn reorder<T: Clone>(
    buckets: &Buckets<T>,
    bucket: &str,
    from_ref: &str,
    to_ref: &str,
) -> Buckets<T> {
    match (
        Bucket::parse(bucket),
        parse_index(from_ref),
        parse_index(to_ref),
    ) {
        (Some(bucket), Some(from), Some(to)) => reorder_within(buckets, bucket, from, to),
        _ => buckets.clone(),
    }
}

/// Delete the item at `item_ref`.
pub fn remove<T: Clone>(buckets: &Buckets<T>, item_ref: &str) -> Buckets<T> {
    match ItemRef::parse(item_ref) {
        Some(r) => remove_at(buckets, r),
        None => buckets.clone(),
    }
}

/// Replace the text at `item_ref`.
pub fn update(buckets: &Buckets, item_ref: &str, new_text: &str) -> Buckets {
    match ItemRef::parse(item_ref) {
        Some(r) => replace_at(buckets, r, new_text.to_string()),
        None => buckets.clone(),
    }
}

// --- Typed forms ---

pub fn move_to<T: Clone>(buckets: &Buckets<T>, source: ItemRef, target: Bucket) -> Buckets<T> {
    if source.bucket == target || !source.resolves_in(buckets) {
        return buckets.clone();
    }
    let mut out = buckets.clone();
    let item = out.get_mut(source.bucket).remove(source.index);
    out.get_mut(target).push(item);
    out
}

pub fn reorder_within<T: Clone>(
    buckets: &Buckets<T>,
    bucket: Bucket,
    from: usize,
    to: usize,
) -> Buckets<T> {
    let len = buckets.get(bucket).len();
    if from >= len || to >= len {
        return buckets.clone();
    }
    let mut out = buckets.clone();
    let list = out.get_mut(bucket);
    let item = list.remove(from);
    list.insert(to, item);
    out
}

pub fn remove_at<T: Clone>(buckets: &Buckets<T>, item: ItemRef) -> Buckets<T> {
    if !item.resolves_in(buckets) {
        return buckets.clone();
    }
    let mut out = buckets.clone();
    out.get_mut(item.bucket).remove(item.index);
    out
}

pub fn replace_at<T: Clone>(buckets: &Buckets<T>, item: ItemRef, value: T) -> Buckets<T> {
    if !item.resolves_in(buckets) {
        return buckets.clone();
    }
    let mut out = buckets.clone();
    out.get_mut(item.bucket)[item.index] = value;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Buckets {
        Buckets {
            core: vec!["a".into(), "b".into(), "c".into()],
            growth: vec!["d".into()],
            optional: vec!["e".into()],
        }
    }

    #[test]
    fn parses_keys() {
        assert_eq!(ItemRef::parse("core-2"), Some(ItemRef::new(Bucket::Core, 2)));
        assert_eq!(ItemRef::parse("optional-0"), Some(ItemRef::new(Bucket::Optional, 0)));
        assert_eq!(ItemRef::parse("growth-3x"), Some(ItemRef::new(Bucket::Growth, 3)));
        assert_eq!(ItemRef::parse("core-"), None);
        assert_eq!(ItemRef::parse("core--1"), None);
        assert_eq!(ItemRef::parse("later-1"), None);
        assert_eq!(ItemRef::parse("core"), None);
        assert_eq!(ItemRef::new(Bucket::Growth, 4).key(), "growth-4");
    }

    #[test]
    fn move_appends_to_target_and_shifts_source() {
        let out = move_item(&sample(), "core", "growth", "core-0");
        assert_eq!(out.core, vec!["b", "c"]);
        assert_eq!(out.growth, vec!["d", "a"]);
    }

    #[test]
    fn move_trusts_the_key_over_the_advisory_source() {
        let out = move_item(&sample(), "optional", "core", "growth-0");
        assert_eq!(out.growth, Vec::<String>::new());
        assert_eq!(out.core, vec!["a", "b", "c", "d"]);
        assert_eq!(out.optional, vec!["e"]);
    }

    #[test]
    fn move_is_a_no_op_on_bad_input() {
        let b = sample();
        assert_eq!(move_item(&b, "core", "core", "core-0"), b);
        assert_eq!(move_item(&b, "core", "later", "core-0"), b);
        assert_eq!(move_item(&b, "core", "growth", "core-9"), b);
        assert_eq!(move_item(&b, "core", "growth", "nope-0"), b);
        // Key already points into the target bucket.
        assert_eq!(move_item(&b, "optional", "core", "core-1"), b);
    }

    #[test]
    fn move_and_move_back_changes_order() {
        let b = sample();
        let there = move_item(&b, "core", "growth", "core-0");
        let back = move_item(&there, "growth", "core", "growth-1");
        assert_eq!(back.core, vec!["b", "c", "a"]);
        assert_ne!(back, b);
        assert_eq!(back.growth, b.growth);
    }

    #[test]
    fn reorder_uses_splice_semantics() {
        let b = sample();
        let down = reorder(&b, "core", "core-0", "core-2");
        assert_eq!(down.core, vec!["b", "c", "a"]);
        let up = reorder(&b, "core", "core-2", "core-0");
        assert_eq!(up.core, vec!["c", "a", "b"]);
        let same = reorder(&b, "core", "core-1", "core-1");
        assert_eq!(same, b);
    }

    #[test]
    fn reorder_is_a_no_op_on_bad_input() {
        let b = sample();
        assert_eq!(reorder(&b, "someday", "core-0", "core-1"), b);
        assert_eq!(reorder(&b, "core", "core-x", "core-1"), b);
        assert_eq!(reorder(&b, "core", "core-0", "core-3"), b);
        assert_eq!(reorder(&b, "growth", "growth-0", "growth-1"), b);
    }

    #[test]
    fn remove_with_stale_reference_is_a_no_op() {
        let b = sample();
        let once = remove(&b, "growth-0");
        assert!(once.growth.is_empty());
        let twice = remove(&once, "growth-0");
        assert_eq!(twice, once);
        assert_eq!(remove(&b, "bogus"), b);
    }

    #[test]
    fn update_replaces_only_the_target() {
        let b = sample();
        let out = update(&b, "core-1", "B");
        assert_eq!(out.core, vec!["a", "B", "c"]);
        assert_eq!(out.growth, b.growth);
        assert_eq!(update(&b, "core-5", "x"), b);
    }

    #[test]
    fn input_is_never_mutated() {
        let b = sample();
        let snapshot = b.clone();
        let _ = move_item(&b, "core", "optional", "core-1");
        let _ = reorder(&b, "core", "core-0", "core-1");
        let _ = remove(&b, "core-0");
        let _ = update(&b, "core-0", "z");
        assert_eq!(b, snapshot);
    }
}
