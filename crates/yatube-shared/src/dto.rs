//! Data Transfer Objects - request bodies and the page contexts handlers render.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// A post as shown in listings and on its detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    /// Author's username.
    pub author: String,
    pub group: Option<GroupResponse>,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub object_list: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u64>,
    pub previous_page_number: Option<u64>,
}

/// `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexContext {
    pub page_obj: PageResponse<PostResponse>,
}

/// `GET /group/{slug}/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupContext {
    pub group: GroupResponse,
    pub page_obj: PageResponse<PostResponse>,
}

/// `GET /profile/{username}/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileContext {
    pub title: String,
    pub author: UserResponse,
    pub count_posts: u64,
    pub page_obj: PageResponse<PostResponse>,
}

/// `GET /posts/{id}/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailContext {
    pub title: String,
    pub post: PostResponse,
    /// Opening characters of the text.
    pub short_word: String,
    /// How many posts the author has in total.
    pub posts_count: u64,
}

/// A group offered by the post form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupChoice {
    pub id: Uuid,
    pub title: String,
}

/// Current values of the post form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFormFields {
    pub text: String,
    pub group: Option<String>,
}

/// `GET|POST /create/` and `GET|POST /posts/{id}/edit/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormContext {
    pub title: String,
    pub is_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Uuid>,
    pub form: PostFormFields,
    /// Field name to messages; empty when the form is unbound or valid.
    pub errors: BTreeMap<String, Vec<String>>,
    pub groups: Vec<GroupChoice>,
}

/// `GET /about/{page}/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticPage {
    pub title: String,
    pub body: String,
}
