//! Culture Store
//!
//! Owns every live artifact. Agents read it every tick; writes go through
//! the world, one at a time.

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

use society_events::ArtifactSnapshot;

use super::artifact::{Artifact, ArtifactDraft, ArtifactHandle, ArtifactId, ArtifactIdentity};
use crate::config::CultureConfig;

/// The collective store of artifacts
#[derive(Debug, Clone)]
pub struct CultureStore {
    config: CultureConfig,
    artifacts: Vec<Artifact>,
    next_artifact_id: u64,
}

impl CultureStore {
    pub fn new(config: CultureConfig) -> Self {
        Self {
            config,
            artifacts: Vec::new(),
            next_artifact_id: 1,
        }
    }

    pub fn config(&self) -> &CultureConfig {
        &self.config
    }

    /// Create an artifact with initial popularity and empty history.
    pub fn add<I, S>(
        &mut self,
        content: impl Into<String>,
        author_id: impl Into<String>,
        tags: I,
    ) -> ArtifactHandle
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_draft(ArtifactDraft::new(content, author_id).with_tags(tags))
    }

    pub fn add_draft(&mut self, draft: ArtifactDraft) -> ArtifactHandle {
        let id = ArtifactId(self.next_artifact_id);
        self.next_artifact_id += 1;

        let identity = Arc::new(ArtifactIdentity {
            id,
            content: draft.content,
            author_id: draft.author_id,
            tags: draft.tags,
        });
        self.artifacts
            .push(Artifact::new(Arc::clone(&identity), self.config.initial_popularity));
        identity
    }

    /// Boost an artifact's popularity by the spread multiplier with a little
    /// noise. Returns false when the store no longer holds the artifact.
    pub fn spread<R: Rng + ?Sized>(
        &mut self,
        id: ArtifactId,
        agent_id: &str,
        tick: u64,
        rng: &mut R,
    ) -> bool {
        let noise = symmetric(rng, self.config.spread_noise);
        let multiplier = self.config.spread_multiplier + noise;
        match self.artifacts.iter_mut().find(|a| a.id() == id) {
            Some(artifact) => {
                artifact.spread(agent_id, tick, multiplier);
                true
            }
            None => false,
        }
    }

    /// Decay every artifact, then forget the ones at or below the threshold.
    /// Returns the forgotten identities in store order.
    pub fn decay(&mut self) -> Vec<ArtifactHandle> {
        let factor = self.config.decay_factor;
        let threshold = self.config.forget_threshold;

        for artifact in &mut self.artifacts {
            artifact.decay(factor);
        }

        let mut forgotten = Vec::new();
        self.artifacts.retain(|a| {
            if a.popularity() > threshold {
                true
            } else {
                forgotten.push(Arc::clone(a.identity()));
                false
            }
        });
        forgotten
    }

    pub fn trending(&self) -> Vec<&Artifact> {
        let threshold = self.config.trending_threshold;
        self.artifacts
            .iter()
            .filter(|a| a.is_trending(threshold))
            .collect()
    }

    /// Pick one artifact uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<ArtifactHandle> {
        self.artifacts
            .choose(rng)
            .map(|a| Arc::clone(a.identity()))
    }

    pub fn get(&self, id: ArtifactId) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn next_artifact_id(&self) -> u64 {
        self.next_artifact_id
    }

    pub fn snapshot(&self) -> Vec<ArtifactSnapshot> {
        self.artifacts.iter().map(Artifact::to_snapshot).collect()
    }

    /// Replace the whole store, keeping the configuration.
    pub fn restore(&mut self, artifacts: Vec<Artifact>, next_artifact_id: u64) {
        let floor = artifacts.iter().map(|a| a.id().0 + 1).max().unwrap_or(1);
        self.artifacts = artifacts;
        self.next_artifact_id = next_artifact_id.max(floor);
    }
}

/// Uniform draw in `-amplitude..amplitude`, zero when the amplitude is not positive.
pub(crate) fn symmetric<R: Rng + ?Sized>(rng: &mut R, amplitude: f32) -> f32 {
    if amplitude > 0.0 {
        rng.gen_range(-amplitude..amplitude)
    } else {
        0.0
    }
}
