use anyhow::Context;
use chrono::{DateTime, Utc};
use shared::domain::{Story, StoryDraft, StoryId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    config::{normalize_database_url, StoreSettings},
    error::StoreError,
    slot::{KeyValueSlot, SqliteSlot},
};

pub const STORIES_KEY: &str = "stories";

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Owner of the persisted story collection.
///
/// The whole collection lives under [`STORIES_KEY`] as a JSON array in
/// display order. Every mutation reads the array, changes it in memory and
/// writes it back in full. Mutations through one store instance are
/// serialized by `write_gate`; two instances over the same slot are still
/// last-write-wins.
pub struct StoryStore<S, C = SystemClock> {
    slot: S,
    clock: C,
    write_gate: Mutex<()>,
}

impl StoryStore<SqliteSlot> {
    pub async fn open(settings: &StoreSettings) -> anyhow::Result<Self> {
        let database_url = normalize_database_url(&settings.database_url);
        let slot = SqliteSlot::connect(&database_url, settings.max_connections)
            .await
            .context("failed to open story storage")?;
        Ok(Self::new(slot))
    }
}

impl<S: KeyValueSlot> StoryStore<S> {
    pub fn new(slot: S) -> Self {
        Self::with_clock(slot, SystemClock)
    }
}

impl<S: KeyValueSlot, C: Clock> StoryStore<S, C> {
    pub fn with_clock(slot: S, clock: C) -> Self {
        Self {
            slot,
            clock,
            write_gate: Mutex::new(()),
        }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Stories in display order, newest first. An absent slot is an empty
    /// collection.
    pub async fn list(&self) -> Result<Vec<Story>, StoreError> {
        let raw = self.slot.get(STORIES_KEY).await.map_err(|err| {
            warn!(error = %err, "story slot read failed");
            StoreError::StorageRead(err)
        })?;

        let Some(raw) = raw else {
            debug!("story slot empty");
            return Ok(Vec::new());
        };

        let stories: Vec<Story> = serde_json::from_str(&raw).map_err(|err| {
            warn!(error = %err, "story slot holds malformed data");
            StoreError::StorageRead(anyhow::Error::new(err).context("stored stories are not valid JSON"))
        })?;
        debug!(count = stories.len(), "loaded stories");
        Ok(stories)
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.list().await?.len())
    }

    pub async fn get(&self, id: &StoryId) -> Result<Story, StoreError> {
        self.list()
            .await?
            .into_iter()
            .find(|story| &story.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    pub async fn create(&self, title: &str, content: &str) -> Result<Story, StoreError> {
        let draft = StoryDraft::new(title, content)?;

        let _guard = self.write_gate.lock().await;
        let mut stories = self.list().await?;
        let story = Story::new(draft, self.clock.now());
        stories.insert(0, story.clone());
        self.save(&stories).await?;

        info!(story_id = %story.id, count = stories.len(), "story created");
        Ok(story)
    }

    /// Replaces title and content in place; the story keeps its position.
    pub async fn update(
        &self,
        id: &StoryId,
        title: &str,
        content: &str,
    ) -> Result<Story, StoreError> {
        let draft = StoryDraft::new(title, content)?;

        let _guard = self.write_gate.lock().await;
        let mut stories = self.list().await?;
        let Some(story) = stories.iter_mut().find(|story| &story.id == id) else {
            warn!(story_id = %id, "update for unknown story");
            return Err(StoreError::NotFound(id.clone()));
        };
        story.apply(draft, self.clock.now());
        let updated = story.clone();
        self.save(&stories).await?;

        info!(story_id = %id, "story updated");
        Ok(updated)
    }

    /// Removes the story with `id`. Unknown ids succeed without change.
    pub async fn delete(&self, id: &StoryId) -> Result<(), StoreError> {
        let _guard = self.write_gate.lock().await;
        let mut stories = self.list().await?;
        let before = stories.len();
        stories.retain(|story| &story.id != id);
        self.save(&stories).await?;

        info!(
            story_id = %id,
            removed = before - stories.len(),
            count = stories.len(),
            "story deleted"
        );
        Ok(())
    }

    async fn save(&self, stories: &[Story]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(stories)
            .context("failed to serialize stories")
            .map_err(StoreError::StorageWrite)?;
        self.slot.set(STORIES_KEY, &raw).await.map_err(|err| {
            warn!(error = %err, "story slot write failed");
            StoreError::StorageWrite(err)
        })
    }
}
