//! Relationships: related rows, and who loads them.

use super::with_store;
use crate::check;
use crate::lesson::{LessonMeta, LessonResult};
use crate::registry::{HarnessResult, LessonRegistry};
use store::prelude::*;

pub fn register(registry: &mut LessonRegistry) -> HarnessResult<()> {
    registry.register(
        LessonMeta::new("Related rows load explicitly", "Relationships")
            .with_concept(
                "A post row carries its author's id, not its author. Loading \
                 the related row is a separate, explicit query.",
            )
            .with_pitfall(
                "Expecting a fetched post to come with its author attached. \
                 There is no lazy loading; forgetting the second query means \
                 working with an id and nothing else.",
            )
            .with_fix("Load the related row yourself, using the foreign key on the child.")
            .with_order(1),
        related_rows_load_explicitly,
    )?;

    registry.register(
        LessonMeta::new("Deleting a parent strands its children", "Relationships")
            .with_concept(
                "A relational engine refuses to delete a row that other rows \
                 still reference.",
            )
            .with_pitfall(
                "The fake deletes the parent without a word, leaving child \
                 rows pointing at an author that no longer exists. Cleanup \
                 code tested on the fake corrupts real data.",
            )
            .with_fix(
                "Delete or re-home the children first; let the relational \
                 engine's foreign keys catch the ordering mistake.",
            )
            .with_notes("This lesson fails on the in-memory provider.")
            .with_order(2),
        deleting_a_parent_strands_its_children,
    )?;

    Ok(())
}

fn related_rows_load_explicitly(provider: Provider) -> LessonResult<()> {
    with_store(provider, "related", |config| {
        let mut ctx = open(config)?;
        let author = ctx.insert_author(NewAuthor::new("Ada Lovelace", "ada@example.com"))?;
        ctx.insert_post(NewPost::new(author, "Notes on the Engine"))?;
        ctx.insert_post(NewPost::new(author, "On Computable Numbers").published())?;

        let posts = ctx.posts_by_author(author)?;
        check::has_len(&posts, 2)?;

        // The post only knows the author's id; the author row is a
        // second, explicit load.
        let loaded = check::found(ctx.author(posts[0].author_id)?, "author loaded by id")?;
        check::equal(loaded.id, author)?;
        Ok(())
    })
}

/// Passes on the relational provider, fails on the fake.
fn deleting_a_parent_strands_its_children(provider: Provider) -> LessonResult<()> {
    with_store(provider, "strand", |config| {
        let mut ctx = open(config)?;
        let author = ctx.insert_author(NewAuthor::new("Ada Lovelace", "ada@example.com"))?;
        ctx.insert_post(NewPost::new(author, "Still referenced"))?;

        check::rejects_with_constraint(ctx.delete_author(author))?;
        Ok(())
    })
}
