//! Post form - the one validator behind both the create and edit flows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Group, Post};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str = "Select a valid choice.";

/// Raw post form input, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub text: String,
    /// Group id; empty means "no group".
    #[serde(default)]
    pub group: Option<String>,
}

/// Field-level validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

/// Validated form data ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<Uuid>,
}

impl PostForm {
    /// Empty form for the create flow.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Form pre-populated from an existing post for the edit flow.
    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id.map(|id| id.to_string()),
        }
    }

    /// Validate against the groups a post may be assigned to.
    pub fn clean(&self, choices: &[Group]) -> Result<CleanedPost, FormErrors> {
        let mut errors = FormErrors::default();

        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let group_id = match self.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) if choices.iter().any(|g| g.id == id) => Some(id),
                _ => {
                    errors.add("group", INVALID_CHOICE);
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CleanedPost {
            text: text.to_string(),
            group_id,
        })
    }
}

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.0.iter().map(|(field, messages)| (*field, messages.as_slice()))
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(text: &str, group: Option<&str>) -> PostForm {
        PostForm {
            text: text.to_string(),
            group: group.map(String::from),
        }
    }

    #[test]
    fn test_empty_and_blank_text_rejected() {
        for text in ["", "   ", "\n\t "] {
            let errors = form(text, None).clean(&[]).unwrap_err();
            assert_eq!(errors.field("text"), [REQUIRED.to_string()]);
            assert!(errors.field("group").is_empty());
        }
    }

    #[test]
    fn test_text_is_trimmed() {
        let cleaned = form("  hello  ", Some("")).clean(&[]).unwrap();
        assert_eq!(cleaned.text, "hello");
        assert_eq!(cleaned.group_id, None);
    }

    #[test]
    fn test_known_group_accepted() {
        let group = Group::new("Cats", "cats", "All about cats");
        let cleaned = form("meow", Some(&group.id.to_string()))
            .clean(std::slice::from_ref(&group))
            .unwrap();
        assert_eq!(cleaned.group_id, Some(group.id));
    }

    #[test]
    fn test_unknown_or_malformed_group_rejected() {
        let group = Group::new("Cats", "cats", "All about cats");
        let unknown = uuid::Uuid::new_v4().to_string();
        for raw in ["not-a-uuid", unknown.as_str()] {
            let errors = form("meow", Some(raw))
                .clean(std::slice::from_ref(&group))
                .unwrap_err();
            assert_eq!(errors.field("group"), [INVALID_CHOICE.to_string()]);
        }
    }

    #[test]
    fn test_errors_serialize_by_field() {
        let errors = form(" ", Some("nope")).clean(&[]).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "group": [INVALID_CHOICE],
                "text": [REQUIRED],
            })
        );
        assert_eq!(
            errors.to_string(),
            format!("group: {INVALID_CHOICE}, text: {REQUIRED}")
        );
    }

    #[test]
    fn test_edit_form_prefilled_from_post() {
        let group_id = uuid::Uuid::new_v4();
        let post = Post::new(uuid::Uuid::new_v4(), "old text".to_string(), Some(group_id));
        let form = PostForm::from_post(&post);
        assert_eq!(form.text, "old text");
        assert_eq!(form.group, Some(group_id.to_string()));
    }
}
