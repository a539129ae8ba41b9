use crate::config::{Provider, StoreConfig};
use crate::entities::{Author, NewAuthor, NewPost, NewTag, Post, Tag};
use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryBackend;
use crate::sqlite::SqliteBackend;
use tracing::debug;

/// The operation surface a lesson sees, regardless of provider.
///
/// The in-memory backend deliberately under-enforces: it accepts
/// dangling foreign keys, duplicate labels, and duplicate link rows, and
/// its transaction calls restore nothing. The embedded-relational
/// backend rejects all of those. The divergence is the point.
pub trait Backend {
    fn insert_author(&mut self, author: NewAuthor) -> StoreResult<i64>;
    fn author(&self, id: i64) -> StoreResult<Option<Author>>;
    fn update_author(&mut self, author: &Author) -> StoreResult<()>;
    fn delete_author(&mut self, id: i64) -> StoreResult<()>;
    fn author_count(&self) -> StoreResult<usize>;

    fn insert_post(&mut self, post: NewPost) -> StoreResult<i64>;
    fn post(&self, id: i64) -> StoreResult<Option<Post>>;
    fn posts_by_author(&self, author_id: i64) -> StoreResult<Vec<Post>>;
    fn update_post(&mut self, post: &Post) -> StoreResult<()>;
    fn post_count(&self) -> StoreResult<usize>;

    fn insert_tag(&mut self, tag: NewTag) -> StoreResult<i64>;
    fn tag_post(&mut self, post_id: i64, tag_id: i64) -> StoreResult<()>;
    fn untag_post(&mut self, post_id: i64, tag_id: i64) -> StoreResult<()>;
    fn tags_for_post(&self, post_id: i64) -> StoreResult<Vec<Tag>>;
    fn posts_with_tag(&self, tag_id: i64) -> StoreResult<Vec<Post>>;

    fn begin(&mut self) -> StoreResult<()>;
    fn commit(&mut self) -> StoreResult<()>;
    fn rollback(&mut self) -> StoreResult<()>;

    fn provider_name(&self) -> &'static str;
}

/// Build a data-access context for the configured provider.
pub fn open(config: &StoreConfig) -> StoreResult<Box<dyn Backend>> {
    config
        .validate()
        .map_err(|message| StoreError::InvalidConfig { message })?;

    let backend: Box<dyn Backend> = match config.provider {
        Provider::InMemory => Box::new(MemoryBackend::open(&config.store_name)),
        Provider::EmbeddedRelational => Box::new(SqliteBackend::open(&config.database_path())?),
    };

    debug!(
        store = %config.store_name,
        provider = backend.provider_name(),
        "opened store context"
    );

    Ok(backend)
}

/// Release the named backing store: drops the in-memory data or deletes
/// the database file. Callers own cleanup; the harness never invokes
/// this on a lesson's behalf.
pub fn destroy(config: &StoreConfig) -> StoreResult<()> {
    match config.provider {
        Provider::InMemory => {
            MemoryBackend::destroy(&config.store_name);
            Ok(())
        }
        Provider::EmbeddedRelational => SqliteBackend::destroy(&config.database_path()),
    }
}
