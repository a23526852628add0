/*!
 * Source lookup: resolve a topic to background text.
 */

use log::{debug, info};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::KnowledgeBase;

/// Resolves a topic to an encyclopedia summary
#[derive(Clone)]
pub struct SourceLookup {
    knowledge_base: Arc<dyn KnowledgeBase>,
    search_limit: usize,
}

impl SourceLookup {
    /// Create a lookup over a knowledge base, trying at most `search_limit` related titles
    pub fn new(knowledge_base: Arc<dyn KnowledgeBase>, search_limit: usize) -> Self {
        Self {
            knowledge_base,
            search_limit,
        }
    }

    /// Find background text for a topic
    ///
    /// Tries the exact title first, then the related titles from a search in
    /// ranking order. `Ok(None)` means nothing resolved, which is an expected
    /// outcome rather than a failure.
    pub async fn lookup(&self, topic: &str) -> Result<Option<String>, ProviderError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Ok(None);
        }

        if let Some(summary) = self.knowledge_base.summary(topic).await? {
            info!("Found background text for '{}'", topic);
            return Ok(Some(summary));
        }

        let candidates = self.knowledge_base.search(topic, self.search_limit).await?;
        debug!("No exact page for '{}', trying {:?}", topic, candidates);

        for title in candidates.iter().take(self.search_limit) {
            if let Some(summary) = self.knowledge_base.summary(title).await? {
                info!("Using background text from related page '{}'", title);
                return Ok(Some(summary));
            }
        }

        info!("No background text found for '{}'", topic);
        Ok(None)
    }
}
