//! Change Tracking: what the store notices, and what it never sees.

use super::with_store;
use crate::check;
use crate::lesson::{LessonMeta, LessonResult};
use crate::registry::{HarnessResult, LessonRegistry};
use store::prelude::*;

pub fn register(registry: &mut LessonRegistry) -> HarnessResult<()> {
    registry.register(
        LessonMeta::new("Detached copies do not track", "Change Tracking")
            .with_concept(
                "Fetching a row hands back a detached copy of the stored data, \
                 not a live view into the store.",
            )
            .with_pitfall(
                "Mutating the copy and expecting the store to notice. Nothing \
                 watches the struct; the change exists only in local memory, \
                 and a re-read returns the original values.",
            )
            .with_fix(
                "Write the change back explicitly with an update call, then \
                 re-read to observe it.",
            )
            .with_order(1),
        detached_copies_do_not_track,
    )?;

    registry.register(
        LessonMeta::new("An explicit update persists", "Change Tracking")
            .with_concept("Updates are operations, not side effects of mutation.")
            .with_pitfall(
                "Assuming the previous lesson means changes cannot be saved at \
                 all. They can; the store just has to be told.",
            )
            .with_fix("Mutate the copy, call update, re-read.")
            .with_order(2),
        an_explicit_update_persists,
    )?;

    Ok(())
}

/// Fails on every provider, on purpose: the mutated copy is never
/// written back.
fn detached_copies_do_not_track(provider: Provider) -> LessonResult<()> {
    with_store(provider, "detached", |config| {
        let mut ctx = open(config)?;
        let id = ctx.insert_author(NewAuthor::new("Ada Lovelace", "ada@example.com"))?;

        let mut copy = check::found(ctx.author(id)?, "freshly inserted author")?;
        copy.name = "Augusta Ada King".to_string();
        // No update call here. That is the mistake being taught.

        let reread = check::found(ctx.author(id)?, "author on re-read")?;
        check::equal(reread.name.as_str(), "Augusta Ada King")?;
        Ok(())
    })
}

fn an_explicit_update_persists(provider: Provider) -> LessonResult<()> {
    with_store(provider, "update", |config| {
        let mut ctx = open(config)?;
        let id = ctx.insert_author(NewAuthor::new("Grace Hopper", "grace@example.com"))?;

        let mut author = check::found(ctx.author(id)?, "freshly inserted author")?;
        author.email = "grace@navy.mil".to_string();
        ctx.update_author(&author)?;

        let reread = check::found(ctx.author(id)?, "author on re-read")?;
        check::equal(reread.email.as_str(), "grace@navy.mil")?;
        Ok(())
    })
}
