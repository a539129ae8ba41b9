//! The embedded-relational provider, backed by a SQLite database file.
//!
//! Everything the in-memory provider waves through is enforced here:
//! foreign keys, label uniqueness, link-row primary keys, and real
//! transactions.

use crate::entities::{Author, NewAuthor, NewPost, NewTag, Post, Tag};
use crate::error::{StoreError, StoreResult};
use crate::Backend;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS authors (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL,
  email TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  author_id INTEGER NOT NULL,
  title TEXT NOT NULL,
  body TEXT NOT NULL,
  published INTEGER NOT NULL DEFAULT 0 CHECK (published IN (0, 1)),
  created_at TEXT NOT NULL,
  FOREIGN KEY (author_id) REFERENCES authors(id)
);

CREATE TABLE IF NOT EXISTS tags (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  label TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS post_tags (
  post_id INTEGER NOT NULL,
  tag_id INTEGER NOT NULL,
  PRIMARY KEY (post_id, tag_id),
  FOREIGN KEY (post_id) REFERENCES posts(id),
  FOREIGN KEY (tag_id) REFERENCES tags(id)
);
"#;

pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        debug!(path = %path.display(), "sqlite schema initialized");

        Ok(Self { conn })
    }

    /// Delete the database file. Missing files are fine; destroy is
    /// idempotent.
    pub fn destroy(path: &Path) -> StoreResult<()> {
        match std::fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "sqlite database removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn map_err(err: rusqlite::Error) -> StoreError {
        match err {
            rusqlite::Error::SqliteFailure(e, message)
                if e.code == ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint {
                    message: message.unwrap_or_else(|| e.to_string()),
                }
            }
            other => StoreError::Database(other),
        }
    }

    fn post_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
        Ok(Post {
            id: row.get(0)?,
            author_id: row.get(1)?,
            title: row.get(2)?,
            body: row.get(3)?,
            published: row.get(4)?,
            created_at: row.get::<_, DateTime<Utc>>(5)?,
        })
    }
}

impl Backend for SqliteBackend {
    fn insert_author(&mut self, author: NewAuthor) -> StoreResult<i64> {
        self.conn
            .execute(
                "INSERT INTO authors (name, email) VALUES (?1, ?2)",
                params![author.name, author.email],
            )
            .map_err(Self::map_err)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn author(&self, id: i64) -> StoreResult<Option<Author>> {
        self.conn
            .query_row(
                "SELECT id, name, email FROM authors WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Author {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(Self::map_err)
    }

    fn update_author(&mut self, author: &Author) -> StoreResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE authors SET name = ?1, email = ?2 WHERE id = ?3",
                params![author.name, author.email, author.id],
            )
            .map_err(Self::map_err)?;

        if changed == 0 {
            return Err(StoreError::RowNotFound {
                entity: "author",
                id: author.id,
            });
        }
        Ok(())
    }

    fn delete_author(&mut self, id: i64) -> StoreResult<()> {
        // Fails with a constraint violation while posts still reference
        // the author.
        self.conn
            .execute("DELETE FROM authors WHERE id = ?1", params![id])
            .map_err(Self::map_err)?;
        Ok(())
    }

    fn author_count(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM authors", [], |row| row.get(0))
            .map_err(Self::map_err)?;
        Ok(count as usize)
    }

    fn insert_post(&mut self, post: NewPost) -> StoreResult<i64> {
        self.conn
            .execute(
                "INSERT INTO posts (author_id, title, body, published, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![post.author_id, post.title, post.body, post.published, Utc::now()],
            )
            .map_err(Self::map_err)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn post(&self, id: i64) -> StoreResult<Option<Post>> {
        self.conn
            .query_row(
                "SELECT id, author_id, title, body, published, created_at
                 FROM posts WHERE id = ?1",
                params![id],
                Self::post_from_row,
            )
            .optional()
            .map_err(Self::map_err)
    }

    fn posts_by_author(&self, author_id: i64) -> StoreResult<Vec<Post>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, author_id, title, body, published, created_at
                 FROM posts WHERE author_id = ?1 ORDER BY id",
            )
            .map_err(Self::map_err)?;
        let posts = stmt
            .query_map(params![author_id], Self::post_from_row)
            .map_err(Self::map_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Self::map_err)?;
        Ok(posts)
    }

    fn update_post(&mut self, post: &Post) -> StoreResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE posts SET author_id = ?1, title = ?2, body = ?3, published = ?4
                 WHERE id = ?5",
                params![post.author_id, post.title, post.body, post.published, post.id],
            )
            .map_err(Self::map_err)?;

        if changed == 0 {
            return Err(StoreError::RowNotFound {
                entity: "post",
                id: post.id,
            });
        }
        Ok(())
    }

    fn post_count(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
            .map_err(Self::map_err)?;
        Ok(count as usize)
    }

    fn insert_tag(&mut self, tag: NewTag) -> StoreResult<i64> {
        self.conn
            .execute("INSERT INTO tags (label) VALUES (?1)", params![tag.label])
            .map_err(Self::map_err)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn tag_post(&mut self, post_id: i64, tag_id: i64) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO post_tags (post_id, tag_id) VALUES (?1, ?2)",
                params![post_id, tag_id],
            )
            .map_err(Self::map_err)?;
        Ok(())
    }

    fn untag_post(&mut self, post_id: i64, tag_id: i64) -> StoreResult<()> {
        self.conn
            .execute(
                "DELETE FROM post_tags WHERE post_id = ?1 AND tag_id = ?2",
                params![post_id, tag_id],
            )
            .map_err(Self::map_err)?;
        Ok(())
    }

    fn tags_for_post(&self, post_id: i64) -> StoreResult<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT t.id, t.label FROM tags t
                 JOIN post_tags pt ON pt.tag_id = t.id
                 WHERE pt.post_id = ?1 ORDER BY t.id",
            )
            .map_err(Self::map_err)?;
        let tags = stmt
            .query_map(params![post_id], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    label: row.get(1)?,
                })
            })
            .map_err(Self::map_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Self::map_err)?;
        Ok(tags)
    }

    fn posts_with_tag(&self, tag_id: i64) -> StoreResult<Vec<Post>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT p.id, p.author_id, p.title, p.body, p.published, p.created_at
                 FROM posts p
                 JOIN post_tags pt ON pt.post_id = p.id
                 WHERE pt.tag_id = ?1 ORDER BY p.id",
            )
            .map_err(Self::map_err)?;
        let posts = stmt
            .query_map(params![tag_id], Self::post_from_row)
            .map_err(Self::map_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Self::map_err)?;
        Ok(posts)
    }

    fn begin(&mut self) -> StoreResult<()> {
        self.conn.execute_batch("BEGIN").map_err(Self::map_err)
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.conn.execute_batch("COMMIT").map_err(Self::map_err)
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.conn.execute_batch("ROLLBACK").map_err(Self::map_err)
    }

    fn provider_name(&self) -> &'static str {
        "embedded-relational"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_backend(dir: &tempfile::TempDir, name: &str) -> SqliteBackend {
        SqliteBackend::open(&dir.path().join(format!("{name}.db"))).unwrap()
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = scratch_backend(&dir, "fk");

        let result = backend.insert_post(NewPost::new(999, "Orphan"));
        assert!(matches!(result, Err(StoreError::Constraint { .. })));
    }

    #[test]
    fn test_label_uniqueness_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = scratch_backend(&dir, "labels");

        backend.insert_tag(NewTag::new("rust")).unwrap();
        let result = backend.insert_tag(NewTag::new("rust"));
        assert!(matches!(result, Err(StoreError::Constraint { .. })));
    }

    #[test]
    fn test_duplicate_link_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = scratch_backend(&dir, "links");

        let author = backend
            .insert_author(NewAuthor::new("Ada", "ada@example.com"))
            .unwrap();
        let post = backend.insert_post(NewPost::new(author, "Post")).unwrap();
        let tag = backend.insert_tag(NewTag::new("rust")).unwrap();

        backend.tag_post(post, tag).unwrap();
        let second = backend.tag_post(post, tag);
        assert!(matches!(second, Err(StoreError::Constraint { .. })));
        assert_eq!(backend.tags_for_post(post).unwrap().len(), 1);
    }

    #[test]
    fn test_rollback_discards_work() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = scratch_backend(&dir, "tx");

        backend.begin().unwrap();
        backend
            .insert_author(NewAuthor::new("Ada", "ada@example.com"))
            .unwrap();
        backend.rollback().unwrap();
        assert_eq!(backend.author_count().unwrap(), 0);
    }

    #[test]
    fn test_roundtrip_post() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = scratch_backend(&dir, "roundtrip");

        let author = backend
            .insert_author(NewAuthor::new("Ada", "ada@example.com"))
            .unwrap();
        let id = backend
            .insert_post(NewPost::new(author, "Title").with_body("Body").published())
            .unwrap();

        let post = backend.post(id).unwrap().unwrap();
        assert_eq!(post.title, "Title");
        assert_eq!(post.body, "Body");
        assert!(post.published);
        assert_eq!(post.author_id, author);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.db");
        assert!(SqliteBackend::destroy(&path).is_ok());

        SqliteBackend::open(&path).unwrap();
        assert!(SqliteBackend::destroy(&path).is_ok());
        assert!(!path.exists());
    }
}
