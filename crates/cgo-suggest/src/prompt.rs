//! Instruction text for the remote classifier, rendered from
//! [`cgo_core::policy`] so both languages carry the same rubric.

use cgo_core::policy::{self, WORKED_EXAMPLES};
use cgo_core::{Bucket, Locale};

/// System and user halves of one classification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Both halves as one block of text.
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

pub fn system_prompt(locale: Locale) -> String {
    let rubric = policy::rubric(locale);
    let mut out = String::with_capacity(2048);

    out.push_str(rubric.role);
    out.push_str("\n\n[");
    out.push_str(rubric.criteria_heading);
    out.push_str("]\n");
    for bucket in Bucket::ALL {
        out.push_str("- ");
        out.push_str(rubric.criterion(bucket));
        out.push('\n');
    }

    out.push_str("\n[");
    out.push_str(rubric.examples_heading);
    out.push_str("]\n");
    for ex in WORKED_EXAMPLES {
        out.push_str(&format!(
            "- \"{}\" → {}\n",
            ex.text(locale),
            locale.bucket_title(ex.bucket)
        ));
    }

    out.push_str("\n[");
    out.push_str(rubric.rules_heading);
    out.push_str("]\n");
    for rule in rubric.rules {
        out.push_str("- ");
        out.push_str(rule);
        out.push('\n');
    }

    out.push_str("\nJSON:\n");
    out.push_str(policy::RESPONSE_SHAPE);
    out
}

pub fn user_message<S: AsRef<str>>(lines: &[S], locale: Locale) -> String {
    let tasks: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
    format!("{}\n{}", policy::rubric(locale).request, tasks.join("\n"))
}

pub fn build_prompt<S: AsRef<str>>(lines: &[S], locale: Locale) -> Prompt {
    Prompt {
        system: system_prompt(locale),
        user: user_message(lines, locale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_prompt_lists_rubric_examples_and_shape() {
        let p = system_prompt(Locale::En);
        assert!(p.starts_with("You are a prioritization expert."));
        assert!(p.contains("[Criteria]\n- Core: presentations"));
        assert!(p.contains("- \"Watch Netflix\" → Optional\n"));
        assert!(p.contains("- If uncertain, choose Growth.\n"));
        assert!(p.ends_with(policy::RESPONSE_SHAPE));
    }

    #[test]
    fn korean_prompt_uses_korean_rubric() {
        let p = system_prompt(Locale::Ko);
        assert!(p.contains("[분류 기준]"));
        assert!(p.contains("- \"운동 30분\" → Growth\n"));
        assert!(p.contains("애매하면 Growth."));
    }

    #[test]
    fn user_section_lists_tasks_one_per_line() {
        let u = user_message(&["a", "b"], Locale::En);
        assert_eq!(u, "Classify these tasks by the rules:\na\nb");
        let ko = user_message(&["가"], Locale::Ko);
        assert_eq!(ko, "다음 작업들을 위 기준으로 분류하세요:\n가");
    }

    #[test]
    fn rendered_prompt_puts_tasks_last() {
        let p = build_prompt(&["ship it"], Locale::En).render();
        assert!(p.ends_with("\n\nClassify these tasks by the rules:\nship it"));
    }

    #[test]
    fn both_locales_list_the_same_number_of_examples() {
        let count = |l| {
            system_prompt(l)
                .lines()
                .filter(|line| line.contains("\" → "))
                .count()
        };
        assert_eq!(count(Locale::Ko), count(Locale::En));
        assert_eq!(count(Locale::En), WORKED_EXAMPLES.len());
    }
}
