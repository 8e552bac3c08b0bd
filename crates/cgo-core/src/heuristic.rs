//! Local keyword classifier. Deterministic, no network.

use std::sync::LazyLock;

use regex::Regex;

use crate::policy;
use crate::{Bucket, Buckets};

fn compile(keywords: &[&str]) -> Regex {
    Regex::new(&policy::alternation(keywords)).expect("keyword policy must be a valid regex")
}

static STRONG_ENTERTAINMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(policy::STRONG_ENTERTAINMENT));
static CORE_HARD: LazyLock<Regex> = LazyLock::new(|| compile(policy::CORE_HARD));
static CORE_SOFT: LazyLock<Regex> = LazyLock::new(|| compile(policy::CORE_SOFT));
static GROWTH: LazyLock<Regex> = LazyLock::new(|| compile(policy::GROWTH));
static OPTIONAL: LazyLock<Regex> = LazyLock::new(|| compile(policy::OPTIONAL));

/// Split pasted text into trimmed, non-empty lines.
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scores {
    pub core: u32,
    pub growth: u32,
    pub optional: u32,
}

impl Scores {
    /// Resolve scores to a bucket. The order of these checks decides ties:
    /// Core needs strict dominance, Growth wins ties with Core, Optional
    /// must be positive and at least tie the others.
    pub fn bucket(&self) -> Bucket {
        let Scores {
            core,
            growth,
            optional,
        } = *self;
        if core > growth && core > optional {
            Bucket::Core
        } else if growth >= core && growth > optional {
            Bucket::Growth
        } else if optional > 0 && optional >= core && optional >= growth {
            Bucket::Optional
        } else {
            policy::DEFAULT_BUCKET
        }
    }
}

pub fn is_strong_entertainment(line: &str) -> bool {
    STRONG_ENTERTAINMENT.is_match(line)
}

/// Keyword scores for one line, ignoring the entertainment short-circuit.
pub fn score(line: &str) -> Scores {
    let mut s = Scores::default();
    if CORE_HARD.is_match(line) {
        s.core += policy::CORE_HARD_SCORE;
    }
    if CORE_SOFT.is_match(line) {
        s.core += policy::CORE_SOFT_SCORE;
    }
    if GROWTH.is_match(line) {
        s.growth += policy::GROWTH_SCORE;
    }
    if OPTIONAL.is_match(line) {
        s.optional += policy::OPTIONAL_SCORE;
    }
    s
}

pub fn classify_line(line: &str) -> Bucket {
    let line = line.trim();
    if is_strong_entertainment(line) {
        return Bucket::Optional;
    }
    score(line).bucket()
}

/// Assign every line to exactly one bucket, keeping input order per bucket.
pub fn classify<S: AsRef<str>>(lines: &[S]) -> Buckets {
    let mut out = Buckets::default();
    for raw in lines {
        let line = raw.as_ref().trim();
        out.get_mut(classify_line(line)).push(line.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::WORKED_EXAMPLES;
    use crate::Locale;

    #[test]
    fn parse_lines_drops_blanks_and_trims() {
        assert_eq!(
            parse_lines("  write report \r\n\n   \nplay game\n"),
            vec!["write report", "play game"]
        );
        assert!(parse_lines("\n \n").is_empty());
    }

    #[test]
    fn entertainment_wins_over_any_other_keyword() {
        // "presentation" alone would score core=3.
        assert_eq!(classify_line("presentation about game design"), Bucket::Optional);
        assert_eq!(classify_line("유튜브 리포트 정리"), Bucket::Optional);
        assert_eq!(classify_line("Netflix deadline"), Bucket::Optional);
    }

    #[test]
    fn hard_core_line_scores_three() {
        let s = score("customer demo");
        assert_eq!(s, Scores { core: 3, growth: 0, optional: 0 });
        assert_eq!(classify_line("customer demo"), Bucket::Core);
    }

    #[test]
    fn hard_and_soft_core_add_up() {
        assert_eq!(score("weekly report").core, 4);
    }

    #[test]
    fn unmatched_lines_default_to_growth() {
        assert_eq!(classify_line("call mom"), Bucket::Growth);
        assert_eq!(classify_line("장보기"), Bucket::Growth);
    }

    #[test]
    fn substring_matches_are_intentional() {
        // "build" contains "ui": growth=2, but prototype's core=3 still dominates.
        assert_eq!(score("build prototype"), Scores { core: 3, growth: 2, optional: 0 });
        assert_eq!(classify_line("build prototype"), Bucket::Core);
        assert_eq!(classify_line("build shelves"), Bucket::Growth);
    }

    #[test]
    fn tie_break_precedence() {
        assert_eq!(Scores { core: 2, growth: 2, optional: 0 }.bucket(), Bucket::Growth);
        assert_eq!(Scores { core: 1, growth: 0, optional: 1 }.bucket(), Bucket::Optional);
        assert_eq!(Scores { core: 3, growth: 2, optional: 1 }.bucket(), Bucket::Core);
        assert_eq!(Scores { core: 0, growth: 2, optional: 2 }.bucket(), Bucket::Optional);
        assert_eq!(Scores::default().bucket(), Bucket::Growth);
    }

    #[test]
    fn growth_beats_soft_core() {
        // plan (core 1) + study (growth 2)
        assert_eq!(classify_line("plan study session"), Bucket::Growth);
    }

    #[test]
    fn optional_beats_soft_core_on_tie() {
        // plan (core 1) + maybe (optional 1)
        assert_eq!(classify_line("maybe plan a trip"), Bucket::Optional);
    }

    #[test]
    fn classify_is_total_and_stable() {
        let lines = [
            "write weekly report",
            "read book",
            "watch youtube",
            "launch v2",
            "refactor parser",
            "someday learn piano",
        ];
        let out = classify(&lines);
        assert_eq!(out.len(), lines.len());
        assert_eq!(out.core, vec!["write weekly report", "launch v2"]);
        assert_eq!(out.growth, vec!["read book", "refactor parser"]);
        assert_eq!(out.optional, vec!["watch youtube", "someday learn piano"]);
    }

    #[test]
    fn worked_examples_agree_with_keywords_in_both_languages() {
        for locale in [Locale::Ko, Locale::En] {
            for ex in WORKED_EXAMPLES {
                assert_eq!(
                    classify_line(ex.text(locale)),
                    ex.bucket,
                    "{:?} example {:?}",
                    locale,
                    ex.text(locale)
                );
            }
        }
    }
}
