use async_trait::async_trait;

use super::news_model::{ClassificationResult, NewsArticle};

/// Decides which path an article takes through the pipeline.
///
/// Implementations recover from their own parse and transport failures; the
/// result always carries a defined confidence.
#[async_trait]
pub trait NewsClassifierTrait: Send + Sync {
    async fn classify(&self, article: &NewsArticle) -> ClassificationResult;
}
