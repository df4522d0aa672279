use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("post {post_id} has more than one sentiment score")]
    DuplicateScore { post_id: String },

    #[error("no post could be matched to a sentiment score")]
    NoScoredPosts,
}
