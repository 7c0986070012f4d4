//! Artifact synthesis: two artifacts combine into a hybrid.

use crate::components::artifact::{ArtifactDraft, ArtifactIdentity};

#[derive(Debug, Clone, Copy)]
pub struct Synthesizer {
    /// Characters kept from each parent's content
    prefix_chars: usize,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self { prefix_chars: 10 }
    }
}

impl Synthesizer {
    /// Describe a hybrid of `a` and `b`. The result is not in any culture
    /// store; the caller decides where it goes.
    pub fn synthesize(
        &self,
        a: &ArtifactIdentity,
        b: &ArtifactIdentity,
        first_agent: &str,
        second_agent: &str,
    ) -> ArtifactDraft {
        let content = format!(
            "{}...+{}...",
            prefix(&a.content, self.prefix_chars),
            prefix(&b.content, self.prefix_chars)
        );
        let mut draft = ArtifactDraft::new(content, format!("{}&{}", first_agent, second_agent));
        draft.tags = a.tags.union(&b.tags).cloned().collect();
        draft
    }
}

fn prefix(s: &str, chars: usize) -> &str {
    match s.char_indices().nth(chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
