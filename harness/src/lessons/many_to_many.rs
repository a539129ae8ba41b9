//! Many-to-Many: link rows between posts and tags.

use super::with_store;
use crate::check;
use crate::lesson::{LessonMeta, LessonResult};
use crate::registry::{HarnessResult, LessonRegistry};
use store::prelude::*;

pub fn register(registry: &mut LessonRegistry) -> HarnessResult<()> {
    registry.register(
        LessonMeta::new("Join rows are not a set", "Many-to-Many")
            .with_concept(
                "A many-to-many association is a table of link rows with a \
                 composite primary key: one row per (post, tag) pair.",
            )
            .with_pitfall(
                "The fake's link storage is a plain list, so tagging the same \
                 post twice records two rows and every join afterwards counts \
                 double. The relational engine rejects the second link.",
            )
            .with_fix(
                "Let the composite primary key enforce one-link-per-pair, and \
                 treat a duplicate-link insert as the error it is.",
            )
            .with_notes("This lesson fails on the in-memory provider.")
            .with_order(1),
        join_rows_are_not_a_set,
    )?;

    registry.register(
        LessonMeta::new("Shared tags connect posts", "Many-to-Many")
            .with_concept("Traversing the association from the tag side finds every linked post.")
            .with_pitfall(
                "Querying only from the post side and assuming the reverse \
                 direction needs separate bookkeeping. It does not; the link \
                 table serves both directions.",
            )
            .with_fix("Query the link table from whichever side the question starts.")
            .with_order(2),
        shared_tags_connect_posts,
    )?;

    registry.register(
        LessonMeta::new("Untagging removes the link, not the tag", "Many-to-Many")
            .with_concept("Dissolving an association deletes a link row and nothing else.")
            .with_pitfall(
                "Deleting the tag itself to detach it from one post, which \
                 detaches it from every other post too.",
            )
            .with_fix("Delete the link row for the one pair; both endpoints survive."),
        untagging_removes_the_link,
    )?;

    Ok(())
}

/// Passes on the relational provider, fails on the fake.
fn join_rows_are_not_a_set(provider: Provider) -> LessonResult<()> {
    with_store(provider, "joinrows", |config| {
        let mut ctx = open(config)?;
        let author = ctx.insert_author(NewAuthor::new("Ada Lovelace", "ada@example.com"))?;
        let post = ctx.insert_post(NewPost::new(author, "On Tags"))?;
        let tag = ctx.insert_tag(NewTag::new("metadata"))?;

        ctx.tag_post(post, tag)?;
        check::rejects_with_constraint(ctx.tag_post(post, tag))?;

        check::has_len(&ctx.tags_for_post(post)?, 1)?;
        Ok(())
    })
}

fn shared_tags_connect_posts(provider: Provider) -> LessonResult<()> {
    with_store(provider, "shared", |config| {
        let mut ctx = open(config)?;
        let author = ctx.insert_author(NewAuthor::new("Ada Lovelace", "ada@example.com"))?;
        let first = ctx.insert_post(NewPost::new(author, "First"))?;
        let second = ctx.insert_post(NewPost::new(author, "Second"))?;
        let tag = ctx.insert_tag(NewTag::new("engines"))?;

        ctx.tag_post(first, tag)?;
        ctx.tag_post(second, tag)?;

        let posts = ctx.posts_with_tag(tag)?;
        check::has_len(&posts, 2)?;

        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        check::contains(&titles, &"First")?;
        check::contains(&titles, &"Second")?;
        Ok(())
    })
}

fn untagging_removes_the_link(provider: Provider) -> LessonResult<()> {
    with_store(provider, "untag", |config| {
        let mut ctx = open(config)?;
        let author = ctx.insert_author(NewAuthor::new("Ada Lovelace", "ada@example.com"))?;
        let post = ctx.insert_post(NewPost::new(author, "Tagged"))?;
        let tag = ctx.insert_tag(NewTag::new("transient"))?;

        ctx.tag_post(post, tag)?;
        ctx.untag_post(post, tag)?;

        check::empty(&ctx.tags_for_post(post)?)?;
        // The tag itself survives; only the link row is gone.
        check::has_len(&ctx.posts_with_tag(tag)?, 0)?;
        Ok(())
    })
}
