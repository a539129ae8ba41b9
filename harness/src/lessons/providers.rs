//! Providers: how far the in-memory fake can be trusted.

use super::with_store;
use crate::check;
use crate::lesson::{LessonMeta, LessonResult};
use crate::registry::{HarnessResult, LessonRegistry};
use store::prelude::*;

pub fn register(registry: &mut LessonRegistry) -> HarnessResult<()> {
    registry.register(
        LessonMeta::new("Named stores share state", "Providers")
            .with_concept(
                "Two contexts opened with the same store name read and write \
                 the same data, on either provider.",
            )
            .with_pitfall(
                "Reusing a store name across tests and wondering why rows from \
                 one test appear in another.",
            )
            .with_fix("Give every test its own uniquely named store.")
            .with_order(1),
        named_stores_share_state,
    )?;

    registry.register(
        LessonMeta::new("The fake accepts dangling references", "Providers")
            .with_concept(
                "A relational engine refuses a child row whose parent does not \
                 exist. The in-memory fake stores whatever it is given.",
            )
            .with_pitfall(
                "Code that inserts orphaned rows sails through tests on the \
                 fake, then blows up with a constraint violation in production.",
            )
            .with_fix(
                "Run integrity-sensitive tests against the embedded relational \
                 provider, where the constraint actually exists.",
            )
            .with_notes("This lesson fails on the in-memory provider. That failure is the point.")
            .with_order(2),
        the_fake_accepts_dangling_references,
    )?;

    registry.register(
        LessonMeta::new("Uniqueness is only skin deep", "Providers")
            .with_concept(
                "The fake guarantees unique ids and nothing else. Column-level \
                 UNIQUE constraints exist only in the relational engine.",
            )
            .with_pitfall(
                "Relying on a duplicate insert to fail as a guard. On the fake \
                 the second insert succeeds and the table silently holds two \
                 rows with the same label.",
            )
            .with_fix(
                "Treat uniqueness as a database constraint, and test it where \
                 the database is real.",
            )
            .with_notes("This lesson fails on the in-memory provider.")
            .with_order(3),
        uniqueness_is_only_skin_deep,
    )?;

    Ok(())
}

fn named_stores_share_state(provider: Provider) -> LessonResult<()> {
    with_store(provider, "share", |config| {
        let mut writer = open(config)?;
        let id = writer.insert_author(NewAuthor::new("Ada Lovelace", "ada@example.com"))?;

        let reader = open(config)?;
        let seen = check::found(reader.author(id)?, "author through a second context")?;
        check::equal(seen.name.as_str(), "Ada Lovelace")?;
        Ok(())
    })
}

/// Passes on the relational provider, fails on the fake.
fn the_fake_accepts_dangling_references(provider: Provider) -> LessonResult<()> {
    with_store(provider, "dangling", |config| {
        let mut ctx = open(config)?;
        // No author with id 42 exists anywhere.
        check::rejects_with_constraint(ctx.insert_post(NewPost::new(42, "Ghost-written")))?;
        Ok(())
    })
}

/// Passes on the relational provider, fails on the fake.
fn uniqueness_is_only_skin_deep(provider: Provider) -> LessonResult<()> {
    with_store(provider, "unique", |config| {
        let mut ctx = open(config)?;
        ctx.insert_tag(NewTag::new("databases"))?;
        check::rejects_with_constraint(ctx.insert_tag(NewTag::new("databases")))?;
        Ok(())
    })
}
