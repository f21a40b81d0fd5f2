//! Content generation service.

use super::session::GenerationRequest;
use super::{BoxFuture, GenerationError, GenerationResult};
use futures::channel::oneshot;
use std::thread;
use std::time::Duration;

/// Simulated latency of [`MockGenerator`].
pub const DEFAULT_GENERATION_DELAY: Duration = Duration::from_millis(1500);

/// Produces a passage of text for a theme stage and a user's key element.
pub trait Generator: Send + Sync {
    fn generate(&self, request: GenerationRequest) -> BoxFuture<'_, GenerationResult<String>>;
}

/// Stand-in generator that answers with a canned passage after a delay.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    delay: Duration,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATION_DELAY)
    }
}

impl MockGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// A generator that answers immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Generator for MockGenerator {
    fn generate(&self, request: GenerationRequest) -> BoxFuture<'_, GenerationResult<String>> {
        let delay = self.delay;
        Box::pin(async move {
            if !delay.is_zero() {
                // Timer thread so the future stays runtime-agnostic.
                let (tx, rx) = oneshot::channel();
                thread::Builder::new()
                    .name("mythic-generation-timer".to_string())
                    .spawn(move || {
                        thread::sleep(delay);
                        let _ = tx.send(());
                    })
                    .map_err(|e| GenerationError::Failed(e.to_string()))?;
                rx.await
                    .map_err(|_| GenerationError::Failed("timer dropped".to_string()))?;
            }

            Ok(format!(
                "Generated content for {} with {}...",
                request.theme.title, request.user_input
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explore::ThemeCatalog;

    fn request(input: &str) -> GenerationRequest {
        GenerationRequest {
            theme: ThemeCatalog::builtin().get(1).cloned().unwrap(),
            stage_index: 0,
            user_input: input.to_string(),
        }
    }

    #[test]
    fn test_instant_mock() {
        let generator = MockGenerator::instant();
        let text = pollster::block_on(generator.generate(request("silicon"))).unwrap();
        assert_eq!(text, "Generated content for The Creation Myth with silicon...");
    }

    #[test]
    fn test_delayed_mock_waits() {
        let generator = MockGenerator::new(Duration::from_millis(20));
        let started = std::time::Instant::now();
        let text = pollster::block_on(generator.generate(request("ember"))).unwrap();

        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(text.ends_with("with ember..."));
    }
}
