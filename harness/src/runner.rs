//! Sequential lesson executor.
//!
//! Each lesson runs to completion before the next starts; a failing
//! lesson never stops the batch. The runner catches both returned
//! errors and panics, so the only way out of a run is the summary.

use crate::lesson::{Lesson, LessonError};
use crate::registry::LessonRegistry;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use store::Provider;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The lesson ran and every check held.
    Passed,
    /// A check did not hold; carries the check's message verbatim.
    Failed(String),
    /// Something other than a check ended the lesson.
    Errored(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonReport {
    pub title: String,
    pub category: String,
    pub outcome: RunOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub reports: Vec<LessonReport>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

fn describe_panic(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panic: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panic: {message}")
    } else {
        "panic: <non-string payload>".to_string()
    }
}

/// Run one lesson and classify what came out of it.
pub fn execute(lesson: &Lesson, provider: Provider) -> RunOutcome {
    match catch_unwind(AssertUnwindSafe(|| (lesson.run)(provider))) {
        Ok(Ok(())) => RunOutcome::Passed,
        Ok(Err(LessonError::Check(failure))) => RunOutcome::Failed(failure.message),
        Ok(Err(LessonError::Store(error))) => {
            RunOutcome::Errored(format!("store error: {error}"))
        }
        Err(payload) => RunOutcome::Errored(describe_panic(payload)),
    }
}

/// Run the filtered lesson set and print the report.
pub fn run_lessons(
    registry: &LessonRegistry,
    pattern: Option<&str>,
    provider: Provider,
) -> RunSummary {
    let selected = registry.filter(pattern);

    if selected.is_empty() {
        println!("No lessons matched the filter.");
        return RunSummary::default();
    }

    let mut summary = RunSummary::default();

    for lesson in selected {
        debug!(title = lesson.title(), category = lesson.category(), "running lesson");
        let outcome = execute(lesson, provider);

        match &outcome {
            RunOutcome::Passed => {
                summary.passed += 1;
                println!("✓ PASSED  [{}] {}", lesson.category(), lesson.title());
            }
            RunOutcome::Failed(message) => {
                summary.failed += 1;
                println!("✗ FAILED  [{}] {}", lesson.category(), lesson.title());
                println!("    {message}");
            }
            RunOutcome::Errored(description) => {
                summary.errored += 1;
                println!("✗ ERROR   [{}] {}", lesson.category(), lesson.title());
                println!("    {description}");
            }
        }

        summary.reports.push(LessonReport {
            title: lesson.title().to_string(),
            category: lesson.category().to_string(),
            outcome,
        });
    }

    println!();
    println!(
        "{} lessons: {} passed, {} failed, {} errored",
        summary.total(),
        summary.passed,
        summary.failed,
        summary.errored
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckFailure;
    use crate::lesson::{LessonMeta, LessonResult};

    fn passing(_provider: Provider) -> LessonResult<()> {
        Ok(())
    }

    fn failing(_provider: Provider) -> LessonResult<()> {
        Err(CheckFailure::new("x").into())
    }

    fn erroring(_provider: Provider) -> LessonResult<()> {
        Err(store::StoreError::RowNotFound {
            entity: "author",
            id: 7,
        }
        .into())
    }

    fn panicking(_provider: Provider) -> LessonResult<()> {
        panic!("boom");
    }

    fn registry() -> LessonRegistry {
        let mut registry = LessonRegistry::new();
        registry
            .register(LessonMeta::new("passes", "Demo"), passing)
            .unwrap();
        registry
            .register(LessonMeta::new("fails", "Demo"), failing)
            .unwrap();
        registry
            .register(LessonMeta::new("errors", "Demo"), erroring)
            .unwrap();
        registry
    }

    #[test]
    fn test_classification_and_counts() {
        let summary = run_lessons(&registry(), None, Provider::InMemory);

        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.total(), 3);
        assert!(!summary.all_passed());

        let failed = &summary.reports[1];
        assert_eq!(failed.outcome, RunOutcome::Failed("x".to_string()));
    }

    #[test]
    fn test_counts_sum_to_executed() {
        let summary = run_lessons(&registry(), Some("demo"), Provider::InMemory);
        assert_eq!(
            summary.passed + summary.failed + summary.errored,
            summary.total()
        );
    }

    #[test]
    fn test_no_match_is_empty_summary() {
        let summary = run_lessons(&registry(), Some("NoMatch123"), Provider::InMemory);
        assert_eq!(summary.total(), 0);
        assert!(summary.all_passed());
    }

    #[test]
    fn test_panic_is_classified_errored() {
        let mut registry = LessonRegistry::new();
        registry
            .register(LessonMeta::new("panics", "Demo"), panicking)
            .unwrap();

        let lesson = &registry.lessons()[0];
        match execute(lesson, Provider::InMemory) {
            RunOutcome::Errored(description) => assert!(description.contains("boom")),
            other => panic!("expected Errored, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_does_not_halt_the_run() {
        let mut registry = LessonRegistry::new();
        registry
            .register(LessonMeta::new("fails first", "Demo").with_order(1), failing)
            .unwrap();
        registry
            .register(LessonMeta::new("still runs", "Demo").with_order(2), passing)
            .unwrap();

        let summary = run_lessons(&registry, None, Provider::InMemory);
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.passed, 1);
    }
}
