//! Post listings, detail, and the create/edit forms.

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use uuid::Uuid;

use yatube_core::DomainError;
use yatube_core::domain::{DETAIL_PREVIEW_CHARS, Post, User};
use yatube_core::forms::PostForm;
use yatube_core::ports::PostFilter;
use yatube_shared::dto::{GroupContext, IndexContext, PostDetailContext, ProfileContext};

use super::context;
use crate::middleware::auth::{OptionalIdentity, login_redirect};
use crate::middleware::error::AppResult;
use crate::state::AppState;

const PROFILE_TITLE: &str = "User profile";
const DETAIL_TITLE: &str = "Post";
const CREATE_TITLE: &str = "New post";
const EDIT_TITLE: &str = "Edit post";

/// The `page` query parameter; the last one wins when it is repeated.
fn page_param(req: &HttpRequest) -> Option<String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(req.query_string())
        .unwrap_or_default()
        .into_iter()
        .rev()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value)
}

/// Bind the submitted body to the post form. Anything that is not a readable
/// urlencoded form binds as blank and fails validation like an empty submit.
fn bind_form(body: &[u8]) -> PostForm {
    serde_urlencoded::from_bytes(body).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "Unreadable post form body");
        PostForm::blank()
    })
}

fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn profile_url(username: &str) -> String {
    format!("/profile/{username}/")
}

fn detail_url(post_id: Uuid) -> String {
    format!("/posts/{post_id}/")
}

/// GET /
pub async fn index(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .page(PostFilter::All, state.paginator, page_param(&req).as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(IndexContext {
        page_obj: context::post_page(&state, page).await?,
    }))
}

/// GET /group/{slug}/
pub async fn group_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = slug.into_inner();
    let group = state
        .groups
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| DomainError::not_found("Group", &slug))?;

    let page = state
        .posts
        .page(
            PostFilter::Group(group.id),
            state.paginator,
            page_param(&req).as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(GroupContext {
        page_obj: context::post_page(&state, page).await?,
        group: context::group_response(group),
    }))
}

/// GET /profile/{username}/
pub async fn profile(
    req: HttpRequest,
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let username = username.into_inner();
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| DomainError::not_found("User", &username))?;

    let page = state
        .posts
        .page(
            PostFilter::Author(author.id),
            state.paginator,
            page_param(&req).as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ProfileContext {
        title: PROFILE_TITLE.to_string(),
        author: context::user_response(&author),
        count_posts: page.count,
        page_obj: context::post_page(&state, page).await?,
    }))
}

/// GET /posts/{id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id))?;

    let author = state
        .users
        .find_by_id(post.author_id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", post.author_id))?;
    let group = match post.group_id {
        Some(group_id) => state.groups.find_by_id(group_id).await?,
        None => None,
    };
    let posts_count = state.posts.count(PostFilter::Author(author.id)).await?;

    Ok(HttpResponse::Ok().json(PostDetailContext {
        title: DETAIL_TITLE.to_string(),
        short_word: post.preview(DETAIL_PREVIEW_CHARS).to_string(),
        posts_count,
        post: context::post_response(post, &author, group),
    }))
}

/// The logged-in account, if the token still names an existing user.
async fn current_user(state: &AppState, identity: OptionalIdentity) -> AppResult<Option<User>> {
    match identity.0 {
        Some(identity) => Ok(state.users.find_by_id(identity.user_id).await?),
        None => Ok(None),
    }
}

/// GET /create/
pub async fn create_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    if current_user(&state, identity).await?.is_none() {
        return Ok(login_redirect(&state.login_url, &req));
    }

    let groups = state.groups.list_all().await?;

    Ok(HttpResponse::Ok().json(context::form_context(
        CREATE_TITLE,
        None,
        PostForm::blank(),
        None,
        groups,
    )))
}

/// POST /create/
pub async fn create_submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let Some(author) = current_user(&state, identity).await? else {
        return Ok(login_redirect(&state.login_url, &req));
    };

    let form = bind_form(&body);
    let groups = state.groups.list_all().await?;

    let cleaned = match form.clean(&groups) {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            tracing::debug!(author = %author.username, %errors, "Rejected new post");
            return Ok(HttpResponse::UnprocessableEntity().json(context::form_context(
                CREATE_TITLE,
                None,
                form,
                Some(&errors),
                groups,
            )));
        }
    };

    let post = state
        .posts
        .insert(Post::new(author.id, cleaned.text, cleaned.group_id))
        .await?;
    tracing::info!(post_id = %post.id, post = %post, author = %author.username, "Post created");

    Ok(redirect(profile_url(&author.username)))
}

/// Shared gatekeeping for the edit form: login, existence, then authorship.
enum EditAccess {
    Allowed(Post),
    Denied(HttpResponse),
}

async fn edit_access(
    req: &HttpRequest,
    state: &AppState,
    identity: OptionalIdentity,
    post_id: Uuid,
) -> AppResult<EditAccess> {
    let Some(user) = current_user(state, identity).await? else {
        return Ok(EditAccess::Denied(login_redirect(&state.login_url, req)));
    };

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id))?;

    if !post.is_authored_by(user.id) {
        tracing::debug!(%post_id, user = %user.username, "Non-author sent back to post");
        return Ok(EditAccess::Denied(redirect(detail_url(post_id))));
    }

    Ok(EditAccess::Allowed(post))
}

/// GET /posts/{id}/edit/
pub async fn edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = match edit_access(&req, &state, identity, post_id.into_inner()).await? {
        EditAccess::Allowed(post) => post,
        EditAccess::Denied(response) => return Ok(response),
    };

    let groups = state.groups.list_all().await?;

    Ok(HttpResponse::Ok().json(context::form_context(
        EDIT_TITLE,
        Some(post.id),
        PostForm::from_post(&post),
        None,
        groups,
    )))
}

/// POST /posts/{id}/edit/
pub async fn edit_submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<Uuid>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let mut post = match edit_access(&req, &state, identity, post_id.into_inner()).await? {
        EditAccess::Allowed(post) => post,
        EditAccess::Denied(response) => return Ok(response),
    };

    let form = bind_form(&body);
    let groups = state.groups.list_all().await?;

    let cleaned = match form.clean(&groups) {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            return Ok(HttpResponse::UnprocessableEntity().json(context::form_context(
                EDIT_TITLE,
                Some(post.id),
                form,
                Some(&errors),
                groups,
            )));
        }
    };

    post.text = cleaned.text;
    post.group_id = cleaned.group_id;
    let post = state.posts.update(post).await?;
    tracing::info!(post_id = %post.id, post = %post, "Post updated");

    Ok(redirect(detail_url(post.id)))
}
