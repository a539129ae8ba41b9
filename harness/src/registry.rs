//! Ordered collection of registered lessons.
//!
//! Lesson modules register explicitly at startup; there is no scanning.
//! Registration order is preserved and doubles as the category order in
//! the generated documentation.

use crate::lesson::{Lesson, LessonFn, LessonMeta};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Duplicate lesson \"{title}\" in category \"{category}\"")]
    DuplicateLesson { title: String, category: String },
}

pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Default)]
pub struct LessonRegistry {
    lessons: Vec<Lesson>,
}

impl LessonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lesson. Rejects a second lesson with the same
    /// `(title, category)` identity; this fails startup, before any
    /// lesson has run.
    pub fn register(&mut self, meta: LessonMeta, run: LessonFn) -> HarnessResult<()> {
        if self
            .lessons
            .iter()
            .any(|l| l.title() == meta.title && l.category() == meta.category)
        {
            return Err(HarnessError::DuplicateLesson {
                title: meta.title,
                category: meta.category,
            });
        }

        self.lessons.push(Lesson::new(meta, run));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// Categories in first-registration order, deduplicated.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for lesson in &self.lessons {
            if !seen.contains(&lesson.category()) {
                seen.push(lesson.category());
            }
        }
        seen
    }

    /// Lessons of one category, sorted by ordering key (lower first,
    /// unkeyed after keyed in registration order).
    pub fn lessons_in(&self, category: &str) -> Vec<&Lesson> {
        let mut selected: Vec<&Lesson> = self
            .lessons
            .iter()
            .filter(|l| l.category() == category)
            .collect();
        selected.sort_by_key(|l| l.meta.order.unwrap_or(u32::MAX));
        selected
    }

    /// All lessons in execution order: stable sort on the ordering key,
    /// so unkeyed lessons keep their registration order at the end.
    pub fn run_order(&self) -> Vec<&Lesson> {
        let mut ordered: Vec<&Lesson> = self.lessons.iter().collect();
        ordered.sort_by_key(|l| l.meta.order.unwrap_or(u32::MAX));
        ordered
    }

    /// Execution-ordered lessons whose title or category contains the
    /// pattern, case-insensitively. An empty or absent pattern selects
    /// everything.
    pub fn filter(&self, pattern: Option<&str>) -> Vec<&Lesson> {
        let ordered = self.run_order();
        match pattern {
            None => ordered,
            Some(p) if p.is_empty() => ordered,
            Some(p) => {
                let needle = p.to_lowercase();
                ordered
                    .into_iter()
                    .filter(|l| {
                        l.title().to_lowercase().contains(&needle)
                            || l.category().to_lowercase().contains(&needle)
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::LessonResult;
    use store::Provider;

    fn noop(_provider: Provider) -> LessonResult<()> {
        Ok(())
    }

    fn meta(title: &str, category: &str) -> LessonMeta {
        LessonMeta::new(title, category)
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let mut registry = LessonRegistry::new();
        registry.register(meta("A", "X"), noop).unwrap();

        let duplicate = registry.register(meta("A", "X"), noop);
        assert!(matches!(
            duplicate,
            Err(HarnessError::DuplicateLesson { .. })
        ));

        // Same title in another category is a different identity.
        registry.register(meta("A", "Y"), noop).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let mut registry = LessonRegistry::new();
        registry.register(meta("A", "X"), noop).unwrap();
        registry.register(meta("B", "Y"), noop).unwrap();
        registry.register(meta("C", "X"), noop).unwrap();

        assert_eq!(registry.categories(), vec!["X", "Y"]);
    }

    #[test]
    fn test_run_order_respects_keys() {
        let mut registry = LessonRegistry::new();
        registry.register(meta("second", "X").with_order(2), noop).unwrap();
        registry.register(meta("first", "X").with_order(1), noop).unwrap();
        registry.register(meta("unkeyed-a", "X"), noop).unwrap();
        registry.register(meta("unkeyed-b", "X"), noop).unwrap();

        let titles: Vec<&str> = registry.run_order().iter().map(|l| l.title()).collect();
        assert_eq!(titles, vec!["first", "second", "unkeyed-a", "unkeyed-b"]);
    }

    #[test]
    fn test_filter_matches_title_and_category() {
        let mut registry = LessonRegistry::new();
        registry.register(meta("Alpha lesson", "Transactions"), noop).unwrap();
        registry.register(meta("Beta lesson", "Relationships"), noop).unwrap();

        assert_eq!(registry.filter(Some("TRANSAC")).len(), 1);
        assert_eq!(registry.filter(Some("lesson")).len(), 2);
        assert_eq!(registry.filter(Some("nomatch123")).len(), 0);
        assert_eq!(registry.filter(None).len(), 2);
        assert_eq!(registry.filter(Some("")).len(), 2);
    }
}
