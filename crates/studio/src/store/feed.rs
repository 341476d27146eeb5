//! Social feed of published looks.

use chrono::Utc;
use lookbook_core::{Comment, CommentId, Item, Post, PostId, Profile};

use super::StoreError;

/// Longest accepted comment, in characters.
pub const MAX_COMMENT_CHARS: usize = 500;

/// Posts, newest first.
#[derive(Debug, Clone)]
pub struct Feed {
    posts: Vec<Post>,
    next_comment_id: i32,
}

impl Default for Feed {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            next_comment_id: 1,
        }
    }
}

impl Feed {
    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Publish a look by `author`.
    pub fn publish(&mut self, author: &Profile, image: String, items: Vec<Item>) -> &Post {
        let post = Post {
            id: PostId::random(),
            author_id: author.id,
            author_name: author.display_name.clone(),
            image,
            items,
            likes: 0,
            liked: false,
            comments: Vec::new(),
            created_at: Utc::now(),
        };
        self.posts.insert(0, post);
        &self.posts[0]
    }

    /// Flip the like state of a post.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown post.
    pub fn toggle_like(&mut self, id: PostId) -> Result<&Post, StoreError> {
        let post = self.find_mut(id)?;
        post.toggle_like();
        Ok(post)
    }

    /// Append a comment to a post.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Invalid` for blank or oversized text and
    /// `StoreError::NotFound` for an unknown post.
    pub fn add_comment(
        &mut self,
        id: PostId,
        author_name: &str,
        text: &str,
    ) -> Result<&Post, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::Invalid("comment text is empty".to_string()));
        }
        if text.chars().count() > MAX_COMMENT_CHARS {
            return Err(StoreError::Invalid(format!(
                "comment exceeds {MAX_COMMENT_CHARS} characters"
            )));
        }

        let Self {
            posts,
            next_comment_id,
        } = self;
        let post = posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "post",
                id: id.to_string(),
            })?;
        let comment_id = CommentId::new(*next_comment_id);
        *next_comment_id += 1;

        post.comments.push(Comment {
            id: comment_id,
            author_name: author_name.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        });
        Ok(post)
    }

    fn find_mut(&mut self, id: PostId) -> Result<&mut Post, StoreError> {
        self.posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "post",
                id: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> Profile {
        Profile::new("Ana", None)
    }

    #[test]
    fn test_newest_first() {
        let mut feed = Feed::default();
        let first = feed.publish(&author(), "a".to_string(), vec![]).id;
        let second = feed.publish(&author(), "b".to_string(), vec![]).id;
        let ids: Vec<PostId> = feed.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn test_like_toggles() {
        let mut feed = Feed::default();
        let id = feed.publish(&author(), "a".to_string(), vec![]).id;
        assert_eq!(feed.toggle_like(id).expect("like").likes, 1);
        let post = feed.toggle_like(id).expect("unlike");
        assert_eq!(post.likes, 0);
        assert!(!post.liked);
    }

    #[test]
    fn test_comments_append_in_order() {
        let mut feed = Feed::default();
        let id = feed.publish(&author(), "a".to_string(), vec![]).id;
        feed.add_comment(id, "Bia", "Lindo!").expect("comment");
        let post = feed.add_comment(id, "Caio", "  Amei  ").expect("comment");
        let texts: Vec<&str> = post.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Lindo!", "Amei"]);
        assert_ne!(post.comments[0].id, post.comments[1].id);
    }

    #[test]
    fn test_blank_comment_rejected() {
        let mut feed = Feed::default();
        let id = feed.publish(&author(), "a".to_string(), vec![]).id;
        assert!(matches!(
            feed.add_comment(id, "Bia", "   "),
            Err(StoreError::Invalid(_))
        ));
        assert!(feed.posts()[0].comments.is_empty());
    }

    #[test]
    fn test_comment_ids_unique_across_posts() {
        let mut feed = Feed::default();
        let first = feed.publish(&author(), "a".to_string(), vec![]).id;
        let second = feed.publish(&author(), "b".to_string(), vec![]).id;
        let a = feed.add_comment(first, "Bia", "Oi").expect("comment").comments[0].id;
        assert!(feed.add_comment(PostId::random(), "Bia", "Oi").is_err());
        let b = feed.add_comment(second, "Caio", "Oi").expect("comment").comments[0].id;
        assert_eq!(a, CommentId::new(1));
        assert_eq!(b, CommentId::new(2));
    }

    #[test]
    fn test_unknown_post() {
        let mut feed = Feed::default();
        assert!(matches!(
            feed.toggle_like(PostId::random()),
            Err(StoreError::NotFound { entity: "post", .. })
        ));
    }
}
