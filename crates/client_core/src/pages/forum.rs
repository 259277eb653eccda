use chrono::Utc;
use serde::Serialize;
use shared::protocol::ForumPost;

use crate::error::{ControllerError, Result};

#[derive(Debug, Clone, Default)]
pub struct ForumPage {
    pub posts: Vec<ForumPost>,
    pub trending: Vec<String>,
    pub draft: String,
}

impl ForumPage {
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Puts the draft at the top of the feed and clears it.
    pub fn publish(&mut self, author: &str) -> Result<ForumPost> {
        let content = self.draft.trim();
        if content.is_empty() {
            return Err(ControllerError::MissingField("Post"));
        }

        let post = ForumPost {
            author: author.to_string(),
            posted_at: Utc::now(),
            content: content.to_string(),
            likes: 0,
            comments: 0,
            liked: false,
        };
        self.posts.insert(0, post.clone());
        self.draft.clear();
        Ok(post)
    }

    /// Toggles the like on one post and returns its new like count.
    pub fn toggle_like(&mut self, index: usize) -> Result<u32> {
        let post = self
            .posts
            .get_mut(index)
            .ok_or(ControllerError::UnknownPost(index))?;
        if post.liked {
            post.likes = post.likes.saturating_sub(1);
        } else {
            post.likes += 1;
        }
        post.liked = !post.liked;
        Ok(post.likes)
    }

    pub fn snapshot(&self) -> ForumSnapshot {
        ForumSnapshot {
            posts: self.posts.clone(),
            trending: self.trending.clone(),
            draft: self.draft.clone(),
            can_publish: !self.draft.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForumSnapshot {
    pub posts: Vec<ForumPost>,
    pub trending: Vec<String>,
    pub draft: String,
    pub can_publish: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_prepends_and_clears_draft() {
        let mut page = ForumPage::default();
        page.set_draft("  Anyone tried mulching for rabi wheat?  ");
        let post = page.publish("You").expect("publish");
        assert_eq!(post.content, "Anyone tried mulching for rabi wheat?");
        assert_eq!(page.posts.len(), 1);
        assert!(page.draft.is_empty());
        assert!(page.publish("You").is_err());
    }

    #[test]
    fn like_toggles() {
        let mut page = ForumPage::default();
        page.set_draft("hello");
        page.publish("You").expect("publish");
        assert_eq!(page.toggle_like(0), Ok(1));
        assert_eq!(page.toggle_like(0), Ok(0));
        assert_eq!(page.toggle_like(3), Err(ControllerError::UnknownPost(3)));
    }
}
