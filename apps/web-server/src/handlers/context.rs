//! Builds page context documents from domain records.

use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

use yatube_core::Page;
use yatube_core::domain::{Group, Post, User};
use yatube_core::forms::{FormErrors, PostForm};
use yatube_shared::dto::{
    GroupChoice, GroupResponse, PageResponse, PostFormContext, PostFormFields, PostResponse,
    UserResponse,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

pub fn group_response(group: Group) -> GroupResponse {
    GroupResponse {
        id: group.id,
        title: group.title,
        slug: group.slug,
        description: group.description,
    }
}

pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
    }
}

pub fn post_response(post: Post, author: &User, group: Option<Group>) -> PostResponse {
    PostResponse {
        id: post.id,
        text: post.text,
        pub_date: post.pub_date,
        author: author.username.clone(),
        group: group.map(group_response),
    }
}

fn unique_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Resolve authors and groups for a page of posts, in two lookups.
pub async fn post_page(
    state: &AppState,
    page: Page<Post>,
) -> AppResult<PageResponse<PostResponse>> {
    let author_ids = unique_ids(page.items.iter().map(|p| p.author_id));
    let group_ids = unique_ids(page.items.iter().filter_map(|p| p.group_id));

    let authors: HashMap<Uuid, User> = state
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let groups: HashMap<Uuid, Group> = state
        .groups
        .find_by_ids(&group_ids)
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();

    let page = page.map(|post| {
        let group = post.group_id.and_then(|id| groups.get(&id).cloned());
        match authors.get(&post.author_id) {
            Some(author) => Some(post_response(post, author, group)),
            None => {
                // Author deleted between the two queries; the cascade removes the post too.
                tracing::warn!(post_id = %post.id, "Skipping post without author");
                None
            }
        }
    });

    Ok(PageResponse {
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        next_page_number: page.next_page_number(),
        previous_page_number: page.previous_page_number(),
        number: page.number,
        num_pages: page.num_pages,
        count: page.count,
        object_list: page.items.into_iter().flatten().collect(),
    })
}

/// Context for the create and edit forms.
pub fn form_context(
    title: &str,
    post_id: Option<Uuid>,
    form: PostForm,
    errors: Option<&FormErrors>,
    groups: Vec<Group>,
) -> PostFormContext {
    let errors: BTreeMap<String, Vec<String>> = errors
        .map(|errors| {
            errors
                .iter()
                .map(|(field, messages)| (field.to_string(), messages.to_vec()))
                .collect()
        })
        .unwrap_or_default();

    PostFormContext {
        title: title.to_string(),
        is_edit: post_id.is_some(),
        post_id,
        form: PostFormFields {
            text: form.text,
            group: form.group,
        },
        errors,
        groups: groups
            .into_iter()
            .map(|g| GroupChoice {
                id: g.id,
                title: g.title,
            })
            .collect(),
    }
}
