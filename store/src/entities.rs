use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    pub email: String,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub published: bool,
}

impl NewPost {
    pub fn new(author_id: i64, title: impl Into<String>) -> Self {
        Self {
            author_id,
            title: title.into(),
            body: String::new(),
            published: false,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn published(mut self) -> Self {
        self.published = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTag {
    pub label: String,
}

impl NewTag {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}
