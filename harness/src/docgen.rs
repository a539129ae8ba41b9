//! Markdown documentation generator.
//!
//! Renders the registered lesson metadata into a single document:
//! categories in registration order, lessons within a category by their
//! ordering key. Rendering is a pure function of the registry, so two
//! runs over the same lesson set produce byte-identical output.

use crate::registry::LessonRegistry;
use std::fs;
use std::io;
use std::path::Path;

pub const DEFAULT_DOC_PATH: &str = "LESSONS.md";

const PREAMBLE: &str = "\
# Datastore Pitfalls

Lessons on the gap between an in-memory fake and a real relational
engine. Each lesson is a runnable unit; run the whole set with
`harness`, or a subset with `harness --test <substring>`. Lessons that
fail on the in-memory provider are failing on purpose: the failure
message is the lesson.
";

fn render_lesson(doc: &mut String, meta: &crate::lesson::LessonMeta) {
    doc.push_str(&format!("### {}\n\n", meta.title));
    doc.push_str(&format!("**Concept.** {}\n\n", meta.concept));
    doc.push_str(&format!("**Pitfall.** {}\n\n", meta.pitfall));
    doc.push_str(&format!("**Fix.** {}\n\n", meta.fix));
    if let Some(notes) = &meta.notes {
        doc.push_str(&format!("> {notes}\n\n"));
    }
    doc.push_str("---\n\n");
}

/// Render the whole document.
pub fn render(registry: &LessonRegistry) -> String {
    let mut doc = String::from(PREAMBLE);

    for category in registry.categories() {
        doc.push_str(&format!("\n## {category}\n\n"));
        for lesson in registry.lessons_in(category) {
            render_lesson(&mut doc, &lesson.meta);
        }
    }

    doc
}

/// Write the document, replacing whatever is at `path`. Writes a
/// sibling temp file first and renames it over the target, so an
/// interrupted run leaves the previous document intact.
pub fn write_docs(registry: &LessonRegistry, path: &Path) -> io::Result<()> {
    let rendered = render(registry);

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_DOC_PATH);
    let tmp = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(format!(".{file_name}.tmp"))
        }
        _ => std::path::PathBuf::from(format!(".{file_name}.tmp")),
    };

    fs::write(&tmp, rendered)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::{LessonMeta, LessonResult};
    use store::Provider;

    fn noop(_provider: Provider) -> LessonResult<()> {
        Ok(())
    }

    fn sample_registry() -> LessonRegistry {
        let mut registry = LessonRegistry::new();
        registry
            .register(
                LessonMeta::new("X second", "X")
                    .with_concept("c2")
                    .with_pitfall("p2")
                    .with_fix("f2")
                    .with_order(2),
                noop,
            )
            .unwrap();
        registry
            .register(
                LessonMeta::new("X first", "X")
                    .with_concept("c1")
                    .with_pitfall("p1")
                    .with_fix("f1")
                    .with_notes("watch out")
                    .with_order(1),
                noop,
            )
            .unwrap();
        registry
            .register(
                LessonMeta::new("Y only", "Y")
                    .with_concept("c3")
                    .with_pitfall("p3")
                    .with_fix("f3")
                    .with_order(1),
                noop,
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_categories_in_registration_order() {
        let doc = render(&sample_registry());

        let x = doc.find("## X").unwrap();
        let y = doc.find("## Y").unwrap();
        assert!(x < y);
    }

    #[test]
    fn test_lessons_ordered_within_category() {
        let doc = render(&sample_registry());

        let first = doc.find("### X first").unwrap();
        let second = doc.find("### X second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_render_is_idempotent() {
        let registry = sample_registry();
        assert_eq!(render(&registry), render(&registry));
    }

    #[test]
    fn test_notes_rendered_as_blockquote() {
        let doc = render(&sample_registry());
        assert!(doc.contains("> watch out"));
    }

    #[test]
    fn test_write_docs_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LESSONS.md");

        fs::write(&path, "stale").unwrap();
        write_docs(&sample_registry(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Datastore Pitfalls"));
        assert!(!written.contains("stale"));

        // Second run produces identical bytes.
        write_docs(&sample_registry(), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), written);
    }
}
