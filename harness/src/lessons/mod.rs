//! The lesson set.
//!
//! Each module covers one category and registers its lessons
//! explicitly; `builtin_lessons` invokes the modules in a fixed order,
//! which becomes the category order in the generated documentation.

pub mod change_tracking;
pub mod many_to_many;
pub mod providers;
pub mod relationships;
pub mod transactions;

use crate::lesson::LessonResult;
use crate::registry::{HarnessResult, LessonRegistry};
use store::{destroy, unique_store_name, Provider, StoreConfig};

pub fn builtin_lessons() -> HarnessResult<LessonRegistry> {
    let mut registry = LessonRegistry::new();
    change_tracking::register(&mut registry)?;
    providers::register(&mut registry)?;
    transactions::register(&mut registry)?;
    relationships::register(&mut registry)?;
    many_to_many::register(&mut registry)?;
    Ok(registry)
}

/// Run a lesson body against a uniquely named store, then release the
/// store. Cleanup is best-effort; the body's outcome wins.
pub(crate) fn with_store<F>(provider: Provider, prefix: &str, body: F) -> LessonResult<()>
where
    F: FnOnce(&StoreConfig) -> LessonResult<()>,
{
    let config = StoreConfig::new(provider, unique_store_name(prefix));
    let result = body(&config);
    let _ = destroy(&config);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lessons_register_cleanly() {
        let registry = builtin_lessons().unwrap();
        assert!(registry.len() >= 10);
        assert_eq!(
            registry.categories(),
            vec![
                "Change Tracking",
                "Providers",
                "Transactions",
                "Relationships",
                "Many-to-Many"
            ]
        );
    }

    #[test]
    fn test_every_lesson_is_documented() {
        let registry = builtin_lessons().unwrap();
        for lesson in registry.lessons() {
            assert!(!lesson.meta.concept.is_empty(), "{}", lesson.title());
            assert!(!lesson.meta.pitfall.is_empty(), "{}", lesson.title());
            assert!(!lesson.meta.fix.is_empty(), "{}", lesson.title());
        }
    }
}
