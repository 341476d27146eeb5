//! Feed posts and comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Item;
use crate::types::{CommentId, PostId, ProfileId};

/// A published look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: ProfileId,
    pub author_name: String,
    /// Generated image, as a data URL or remote URL.
    pub image: String,
    /// Items worn in the look.
    pub items: Vec<Item>,
    pub likes: u32,
    pub liked: bool,
    /// Comments in the order they were added.
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Flip the like flag, keeping the counter consistent with it.
    pub fn toggle_like(&mut self) {
        if self.liked {
            self.likes = self.likes.saturating_sub(1);
        } else {
            self.likes = self.likes.saturating_add(1);
        }
        self.liked = !self.liked;
    }
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post {
            id: PostId::random(),
            author_id: ProfileId::random(),
            author_name: "Ana".to_string(),
            image: "data:image/png;base64,AAAA".to_string(),
            items: Vec::new(),
            likes: 4,
            liked: false,
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_toggle_like_twice_restores_count() {
        let mut post = post();
        post.toggle_like();
        assert!(post.liked);
        assert_eq!(post.likes, 5);
        post.toggle_like();
        assert!(!post.liked);
        assert_eq!(post.likes, 4);
    }

    #[test]
    fn test_unlike_never_underflows() {
        let mut post = post();
        post.likes = 0;
        post.liked = true;
        post.toggle_like();
        assert_eq!(post.likes, 0);
    }
}
