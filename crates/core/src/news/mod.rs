//! News module - articles, classification results and the classifier seam.

mod news_model;
mod news_traits;

pub use news_model::{Category, ClassificationResult, NewsArticle};
pub use news_traits::NewsClassifierTrait;
