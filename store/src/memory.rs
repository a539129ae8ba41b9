//! The permissive in-memory provider.
//!
//! Data lives in a process-wide registry keyed by store name, so every
//! context opened with the same name shares the same tables. Nothing is
//! validated: foreign keys may dangle, labels may repeat, link rows may
//! duplicate, and transaction calls are accepted but restore nothing.

use crate::entities::{Author, NewAuthor, NewPost, NewTag, Post, Tag};
use crate::error::{StoreError, StoreResult};
use crate::Backend;
use chrono::Utc;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of named in-memory stores. Entries live until [`MemoryBackend::destroy`]
/// removes them or the process exits.
static NAMED_STORES: Lazy<Mutex<HashMap<String, Arc<Mutex<MemoryData>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

#[derive(Debug, Default)]
struct MemoryData {
    next_author_id: i64,
    next_post_id: i64,
    next_tag_id: i64,
    authors: Vec<Author>,
    posts: Vec<Post>,
    tags: Vec<Tag>,
    post_tags: Vec<(i64, i64)>,
}

fn alloc(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

pub struct MemoryBackend {
    data: Arc<Mutex<MemoryData>>,
}

impl MemoryBackend {
    /// Attach to the named store, creating it on first use.
    pub fn open(name: &str) -> Self {
        let mut stores = NAMED_STORES.lock();
        let data = stores
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(MemoryData::default())))
            .clone();
        Self { data }
    }

    /// Drop the named store and everything in it.
    pub fn destroy(name: &str) {
        NAMED_STORES.lock().remove(name);
    }
}

impl Backend for MemoryBackend {
    fn insert_author(&mut self, author: NewAuthor) -> StoreResult<i64> {
        let mut data = self.data.lock();
        let id = alloc(&mut data.next_author_id);
        data.authors.push(Author {
            id,
            name: author.name,
            email: author.email,
        });
        Ok(id)
    }

    fn author(&self, id: i64) -> StoreResult<Option<Author>> {
        let data = self.data.lock();
        Ok(data.authors.iter().find(|a| a.id == id).cloned())
    }

    fn update_author(&mut self, author: &Author) -> StoreResult<()> {
        let mut data = self.data.lock();
        match data.authors.iter_mut().find(|a| a.id == author.id) {
            Some(existing) => {
                *existing = author.clone();
                Ok(())
            }
            None => Err(StoreError::RowNotFound {
                entity: "author",
                id: author.id,
            }),
        }
    }

    fn delete_author(&mut self, id: i64) -> StoreResult<()> {
        // Succeeds even when posts still reference the author.
        let mut data = self.data.lock();
        data.authors.retain(|a| a.id != id);
        Ok(())
    }

    fn author_count(&self) -> StoreResult<usize> {
        Ok(self.data.lock().authors.len())
    }

    fn insert_post(&mut self, post: NewPost) -> StoreResult<i64> {
        // author_id is taken at face value; no referential check.
        let mut data = self.data.lock();
        let id = alloc(&mut data.next_post_id);
        data.posts.push(Post {
            id,
            author_id: post.author_id,
            title: post.title,
            body: post.body,
            published: post.published,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn post(&self, id: i64) -> StoreResult<Option<Post>> {
        let data = self.data.lock();
        Ok(data.posts.iter().find(|p| p.id == id).cloned())
    }

    fn posts_by_author(&self, author_id: i64) -> StoreResult<Vec<Post>> {
        let data = self.data.lock();
        Ok(data
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect())
    }

    fn update_post(&mut self, post: &Post) -> StoreResult<()> {
        let mut data = self.data.lock();
        match data.posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => {
                *existing = post.clone();
                Ok(())
            }
            None => Err(StoreError::RowNotFound {
                entity: "post",
                id: post.id,
            }),
        }
    }

    fn post_count(&self) -> StoreResult<usize> {
        Ok(self.data.lock().posts.len())
    }

    fn insert_tag(&mut self, tag: NewTag) -> StoreResult<i64> {
        // Duplicate labels are accepted; only the id is unique.
        let mut data = self.data.lock();
        let id = alloc(&mut data.next_tag_id);
        data.tags.push(Tag {
            id,
            label: tag.label,
        });
        Ok(id)
    }

    fn tag_post(&mut self, post_id: i64, tag_id: i64) -> StoreResult<()> {
        // Link rows are a plain list; tagging twice records two rows.
        let mut data = self.data.lock();
        data.post_tags.push((post_id, tag_id));
        Ok(())
    }

    fn untag_post(&mut self, post_id: i64, tag_id: i64) -> StoreResult<()> {
        let mut data = self.data.lock();
        data.post_tags.retain(|&(p, t)| !(p == post_id && t == tag_id));
        Ok(())
    }

    fn tags_for_post(&self, post_id: i64) -> StoreResult<Vec<Tag>> {
        let data = self.data.lock();
        Ok(data
            .post_tags
            .iter()
            .filter(|&&(p, _)| p == post_id)
            .filter_map(|&(_, t)| data.tags.iter().find(|tag| tag.id == t).cloned())
            .collect())
    }

    fn posts_with_tag(&self, tag_id: i64) -> StoreResult<Vec<Post>> {
        let data = self.data.lock();
        Ok(data
            .post_tags
            .iter()
            .filter(|&&(_, t)| t == tag_id)
            .filter_map(|&(p, _)| data.posts.iter().find(|post| post.id == p).cloned())
            .collect())
    }

    fn begin(&mut self) -> StoreResult<()> {
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        // Accepted, restores nothing.
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "in-memory"
    }
}
