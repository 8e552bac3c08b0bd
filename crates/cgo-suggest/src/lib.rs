pub mod engine;
mod error;
mod parse;
pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cgo_core::settings::AiSettings;
use cgo_core::{heuristic, ClassificationResult, Locale};

pub use engine::{Completion, LlmEngine, Timed};
pub use error::ClassifyError;
pub use parse::parse_reply;

/// Which classifier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Model,
    Rules,
}

/// A result that is always present, plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub result: ClassificationResult,
    pub source: Source,
    /// Why the model was not used, when it was attempted or unavailable.
    pub failure: Option<ClassifyError>,
}

impl Classified {
    /// Classify with the keyword rules only.
    pub fn from_rules<S: AsRef<str>>(lines: &[S], failure: Option<ClassifyError>) -> Self {
        Self {
            result: ClassificationResult::derived(heuristic::classify(&usable(lines))),
            source: Source::Rules,
            failure,
        }
    }
}

/// Trimmed, non-empty lines.
fn usable<S: AsRef<str>>(lines: &[S]) -> Vec<&str> {
    lines
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .collect()
}

fn require_tasks(lines: &[&str]) -> Result<(), ClassifyError> {
    if lines.is_empty() {
        return Err(ClassifyError::InputValidation(
            "no tasks to classify".to_string(),
        ));
    }
    Ok(())
}

/// Ask the model to classify `lines`. Errors are returned as-is; nothing is
/// retried and nothing falls back.
pub async fn classify<C, S>(
    engine: &C,
    lines: &[S],
    locale: Locale,
) -> Result<ClassificationResult, ClassifyError>
where
    C: Completion + ?Sized,
    S: AsRef<str>,
{
    let lines = usable(lines);
    require_tasks(&lines)?;

    let prompt = prompt::build_prompt(&lines, locale);
    let raw = engine.complete(&prompt).await?;
    tracing::debug!(bytes = raw.len(), "classifier replied");
    parse::parse_reply(&raw)
}

/// Classify with the model when one is available, otherwise or on failure
/// with the keyword rules. Empty input is still an error.
pub async fn classify_or_fallback<S: AsRef<str>>(
    engine: Option<&dyn Completion>,
    lines: &[S],
    locale: Locale,
) -> Result<Classified, ClassifyError> {
    let lines = usable(lines);
    require_tasks(&lines)?;

    let Some(engine) = engine else {
        return Ok(Classified::from_rules(&lines, None));
    };

    match classify(engine, &lines, locale).await {
        Ok(result) => Ok(Classified {
            result,
            source: Source::Model,
            failure: None,
        }),
        Err(e @ ClassifyError::InputValidation(_)) => Err(e),
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "model classification failed, using rules");
            Ok(Classified::from_rules(&lines, Some(e)))
        }
    }
}

/// How classification requests are served.
#[derive(Clone)]
pub enum Engine {
    /// Keyword rules only, by choice.
    Local,
    Remote(Arc<dyn Completion>),
    /// A remote model was wanted but the settings cannot reach one.
    Unavailable(ClassifyError),
}

impl Engine {
    pub fn configure(settings: AiSettings, local_only: bool, timeout: Duration) -> Self {
        if local_only {
            return Engine::Local;
        }
        match LlmEngine::new(settings) {
            Ok(engine) => {
                info!(
                    provider = %engine.settings().provider,
                    model = %engine.settings().model,
                    "remote classifier configured"
                );
                Engine::Remote(Arc::new(Timed::new(engine, timeout)))
            }
            Err(e) => {
                warn!(error = %e, "remote classifier unavailable, using keyword rules");
                Engine::Unavailable(e)
            }
        }
    }

    pub fn remote(&self) -> Option<&dyn Completion> {
        match self {
            Engine::Remote(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Engine::Remote(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Engine::Local => "local",
            Engine::Remote(_) => "remote",
            Engine::Unavailable(_) => "unavailable",
        }
    }

    /// Classify without falling back: a remote engine reports its failures
    /// and an unavailable one reports why. The local engine uses the rules.
    pub async fn classify<S: AsRef<str>>(
        &self,
        lines: &[S],
        locale: Locale,
    ) -> Result<ClassificationResult, ClassifyError> {
        match self {
            Engine::Remote(c) => classify(c.as_ref(), lines, locale).await,
            Engine::Local => classify_or_fallback(None, lines, locale)
                .await
                .map(|c| c.result),
            Engine::Unavailable(e) => {
                require_tasks(&usable(lines))?;
                Err(e.clone())
            }
        }
    }

    /// Classify, falling back to the rules whenever the model gives no result.
    pub async fn classify_or_fallback<S: AsRef<str>>(
        &self,
        lines: &[S],
        locale: Locale,
    ) -> Result<Classified, ClassifyError> {
        match self {
            Engine::Unavailable(e) => {
                let lines = usable(lines);
                require_tasks(&lines)?;
                Ok(Classified::from_rules(&lines, Some(e.clone())))
            }
            _ => classify_or_fallback(self.remote(), lines, locale).await,
        }
    }
}
