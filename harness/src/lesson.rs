//! Lesson units and their outcome taxonomy.

use crate::check::CheckFailure;
use serde::{Deserialize, Serialize};
use store::{Provider, StoreError};
use thiserror::Error;

/// Everything a lesson body can end with, short of a panic.
///
/// The runner classifies `Check` as the lesson's point not holding and
/// everything else as an unexpected error.
#[derive(Error, Debug)]
pub enum LessonError {
    #[error(transparent)]
    Check(#[from] CheckFailure),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type LessonResult<T> = Result<T, LessonError>;

/// A lesson body: takes the provider selected at startup, builds its own
/// data-access contexts, returns nothing on success.
pub type LessonFn = fn(Provider) -> LessonResult<()>;

/// The tutorial narrative attached to a lesson. The concept/pitfall/fix
/// triple is what the documentation generator renders; `order` controls
/// run and render position (lower first, unkeyed after keyed).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LessonMeta {
    pub title: String,
    pub category: String,
    pub concept: String,
    pub pitfall: String,
    pub fix: String,
    pub notes: Option<String>,
    pub order: Option<u32>,
}

impl LessonMeta {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            concept: String::new(),
            pitfall: String::new(),
            fix: String::new(),
            notes: None,
            order: None,
        }
    }

    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = concept.into();
        self
    }

    pub fn with_pitfall(mut self, pitfall: impl Into<String>) -> Self {
        self.pitfall = pitfall.into();
        self
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = fix.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

/// A registered lesson. Identity is `(title, category)`; immutable once
/// registered and owned by the registry.
pub struct Lesson {
    pub meta: LessonMeta,
    pub run: LessonFn,
}

impl Lesson {
    pub fn new(meta: LessonMeta, run: LessonFn) -> Self {
        Self { meta, run }
    }

    pub fn title(&self) -> &str {
        &self.meta.title
    }

    pub fn category(&self) -> &str {
        &self.meta.category
    }
}
