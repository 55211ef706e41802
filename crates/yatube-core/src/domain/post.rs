use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Characters of text shown as a post's label.
const LABEL_CHARS: usize = 15;

/// Characters of text shown as the preview on the detail page.
pub const DETAIL_PREVIEW_CHARS: usize = 30;

/// Post entity - a single user-authored text entry.
///
/// `pub_date` is set once on creation. Only `text` and `group_id` change on edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
}

impl Post {
    /// Create a new post published now.
    pub fn new(author_id: Uuid, text: String, group_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            pub_date: Utc::now(),
            author_id,
            group_id,
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// First `chars` characters of the text.
    pub fn preview(&self, chars: usize) -> &str {
        match self.text.char_indices().nth(chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }
}

impl std::fmt::Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.preview(LABEL_CHARS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let post = Post::new(Uuid::new_v4(), "Тестовый текст для превью".to_string(), None);
        assert_eq!(post.preview(8), "Тестовый");
        assert_eq!(post.preview(100), post.text);
    }

    #[test]
    fn test_display_uses_short_label() {
        let post = Post::new(
            Uuid::new_v4(),
            "A fairly long first post on the blog".to_string(),
            None,
        );
        assert_eq!(post.to_string(), "A fairly long f");
    }

    #[test]
    fn test_authorship() {
        let author = Uuid::new_v4();
        let post = Post::new(author, "text".to_string(), None);
        assert!(post.is_authored_by(author));
        assert!(!post.is_authored_by(Uuid::new_v4()));
    }
}
