use crate::{Bucket, Buckets, Locale};

/// Render buckets as a Markdown checklist, one `##` section per bucket in
/// Core, Growth, Optional order. Empty buckets keep their heading.
pub fn to_markdown(buckets: &Buckets, locale: Locale) -> String {
    Bucket::ALL
        .into_iter()
        .map(|b| {
            let items: Vec<String> = buckets
                .get(b)
                .iter()
                .map(|task| format!("- [ ] {task}"))
                .collect();
            format!("## {}\n\n{}", locale.bucket_title(b), items.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_follow_bucket_order_and_keep_empty_ones() {
        let b = Buckets {
            core: vec!["x".to_string()],
            growth: vec![],
            optional: vec!["y".to_string()],
        };
        assert_eq!(
            to_markdown(&b, Locale::En),
            "## Core\n\n- [ ] x\n\n## Growth\n\n\n\n## Optional\n\n- [ ] y"
        );
    }

    #[test]
    fn multiple_tasks_are_one_line_each() {
        let b = Buckets {
            core: vec!["a".to_string(), "b".to_string()],
            growth: vec![],
            optional: vec![],
        };
        let md = to_markdown(&b, Locale::Ko);
        assert!(md.starts_with("## Core\n\n- [ ] a\n- [ ] b\n\n## Growth"));
    }
}
