//! Exploration session with a busy-flag gate around generation.

use super::generator::Generator;
use super::theme::Theme;
use super::{GenerationError, GenerationResult};
use crate::model::{IdSequence, Insight, InsightId};

/// What the generator is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub theme: Theme,
    pub stage_index: usize,
    pub user_input: String,
}

#[derive(Debug, Clone)]
struct Passage {
    stage_index: usize,
    text: String,
}

/// State of one user's walk through a theme.
///
/// While a generation is outstanding the session is busy and refuses to
/// start another one. Nothing here touches the collection store, so drags
/// and drops can proceed while the session is busy.
#[derive(Debug, Clone, Default)]
pub struct ExplorationSession {
    theme: Option<Theme>,
    input: String,
    passages: Vec<Passage>,
    stage: usize,
    busy: bool,
    insight_ids: IdSequence,
}

impl ExplorationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `ids` for insights captured from this session.
    pub fn with_insight_ids(mut self, ids: IdSequence) -> Self {
        self.insight_ids = ids;
        self
    }

    /// Switch to a theme, clearing generated content, input and stage.
    pub fn select_theme(&mut self, theme: Theme) {
        log::debug!("Theme selected: {}", theme.title);
        self.theme = Some(theme);
        self.input.clear();
        self.passages.clear();
        self.stage = 0;
    }

    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Index of the next stage to generate.
    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Check if a generation is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Check if a generation could start now.
    pub fn can_generate(&self) -> bool {
        !self.busy && self.theme.is_some() && !self.input.trim().is_empty()
    }

    /// All generated passages, separated by blank lines.
    pub fn generated_content(&self) -> String {
        self.passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// The most recent passage.
    pub fn latest_passage(&self) -> Option<&str> {
        self.passages.last().map(|p| p.text.as_str())
    }

    /// Mark the session busy and describe the generation to run.
    pub fn begin_generation(&mut self) -> GenerationResult<GenerationRequest> {
        if self.busy {
            return Err(GenerationError::Busy);
        }
        let theme = self.theme.clone().ok_or(GenerationError::NoThemeSelected)?;
        if self.input.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }

        self.busy = true;
        Ok(GenerationRequest {
            theme,
            stage_index: self.stage,
            user_input: self.input.clone(),
        })
    }

    /// Record the outcome of a generation and clear the busy flag.
    ///
    /// On success the passage is appended and the stage advances.
    pub fn finish_generation(
        &mut self,
        result: GenerationResult<String>,
    ) -> GenerationResult<String> {
        self.busy = false;
        let text = result?;
        self.passages.push(Passage {
            stage_index: self.stage,
            text: text.clone(),
        });
        self.stage += 1;
        Ok(text)
    }

    /// Run a full generation against `generator`.
    pub async fn generate(&mut self, generator: &dyn Generator) -> GenerationResult<String> {
        let request = self.begin_generation()?;
        let result = generator.generate(request).await;
        if let Err(e) = &result {
            log::warn!("Generation failed: {}", e);
        }
        self.finish_generation(result)
    }

    /// Turn the latest passage into an unassigned insight.
    ///
    /// The insight is tagged with the stage that produced it. Returns `None`
    /// when nothing was generated yet or the insight ids are used up.
    pub fn capture_insight(&mut self) -> Option<Insight> {
        let theme = self.theme.as_ref()?;
        let passage = self.passages.last()?;

        let id = InsightId::new(self.insight_ids.next_id()?);
        let tags: Vec<&str> = theme.stage(passage.stage_index).into_iter().collect();
        Some(Insight::new(id, passage.text.clone(), theme.title.clone()).with_tags(tags))
    }
}
