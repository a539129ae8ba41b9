//! Transactions: begin/commit/rollback, and where they are theater.

use super::with_store;
use crate::check;
use crate::lesson::{LessonMeta, LessonResult};
use crate::registry::{HarnessResult, LessonRegistry};
use store::prelude::*;

pub fn register(registry: &mut LessonRegistry) -> HarnessResult<()> {
    registry.register(
        LessonMeta::new("Rollback restores the previous state", "Transactions")
            .with_concept(
                "Work done inside a transaction disappears when the \
                 transaction rolls back.",
            )
            .with_pitfall(
                "The in-memory fake accepts begin and rollback calls without \
                 complaint and restores nothing, so rollback-dependent logic \
                 tests green against the fake while being completely broken.",
            )
            .with_fix(
                "Test transactional behavior against the embedded relational \
                 provider; the fake's transaction calls are no-ops.",
            )
            .with_notes("This lesson fails on the in-memory provider.")
            .with_order(1),
        rollback_restores_the_previous_state,
    )?;

    registry.register(
        LessonMeta::new("Committed work is visible everywhere", "Transactions")
            .with_concept(
                "After commit, a second context opened on the same store sees \
                 the new rows.",
            )
            .with_pitfall(
                "Forgetting the commit and reading from a second context: the \
                 uncommitted rows are invisible there.",
            )
            .with_fix("Commit before expecting other contexts to observe the work.")
            .with_order(2),
        committed_work_is_visible_everywhere,
    )?;

    Ok(())
}

/// Passes on the relational provider, fails on the fake.
fn rollback_restores_the_previous_state(provider: Provider) -> LessonResult<()> {
    with_store(provider, "rollback", |config| {
        let mut ctx = open(config)?;
        ctx.begin()?;
        ctx.insert_author(NewAuthor::new("Ephemeral", "gone@example.com"))?;
        ctx.rollback()?;

        check::equal(ctx.author_count()?, 0)?;
        Ok(())
    })
}

fn committed_work_is_visible_everywhere(provider: Provider) -> LessonResult<()> {
    with_store(provider, "commit", |config| {
        let mut writer = open(config)?;
        writer.begin()?;
        let id = writer.insert_author(NewAuthor::new("Durable", "kept@example.com"))?;
        writer.commit()?;

        let reader = open(config)?;
        check::found(reader.author(id)?, "committed author via a second context")?;
        Ok(())
    })
}
