use std::collections::BTreeMap;

use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use yatube_core::domain::{Group, Post};
use yatube_core::error::RepoError;
use yatube_core::ports::{BaseRepository, GroupRepository, PostFilter, PostRepository};
use yatube_core::Paginator;

use crate::database::entity::{group, post};
use crate::database::postgres_repo::{PostgresGroupRepository, PostgresPostRepository};

fn post_model(author_id: Uuid, text: &str, group_id: Option<Uuid>) -> post::Model {
    post::Model {
        id: Uuid::new_v4(),
        text: text.to_owned(),
        pub_date: chrono::Utc::now().into(),
        author_id,
        group_id,
    }
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

#[tokio::test]
async fn test_find_post_by_id() {
    let author_id = Uuid::new_v4();
    let model = post_model(author_id, "Test Post", None);
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post: Post = repo.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.text, "Test Post");
    assert_eq!(post.author_id, author_id);
    assert_eq!(post.group_id, None);
}

#[tokio::test]
async fn test_find_group_by_slug() {
    let model = group::Model {
        id: Uuid::new_v4(),
        title: "test-group".to_owned(),
        slug: "test-slug".to_owned(),
        description: "test description".to_owned(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model.clone()], vec![]])
        .into_connection();

    let repo = PostgresGroupRepository::new(db);

    let found: Group = repo.find_by_slug("test-slug").await.unwrap().unwrap();
    assert_eq!(found.id, model.id);
    assert_eq!(found.title, "test-group");

    assert!(repo.find_by_slug("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_page_counts_then_fetches_window() {
    let author_id = Uuid::new_v4();
    let rows: Vec<post::Model> = (0..3)
        .map(|i| post_model(author_id, &format!("text {i}"), None))
        .collect();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![count_row(13)]])
        .append_query_results(vec![rows])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let page = repo
        .page(PostFilter::Author(author_id), Paginator::default(), Some("2"))
        .await
        .unwrap();

    assert_eq!(page.len(), 3);
    assert_eq!(page.number, 2);
    assert_eq!(page.num_pages, 2);
    assert_eq!(page.count, 13);
    assert!(page.has_previous());
}

#[tokio::test]
async fn test_empty_listing_skips_fetch() {
    // Only the count query is mocked; a second query would fail.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![count_row(0)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let page = repo
        .page(PostFilter::All, Paginator::default(), Some("3"))
        .await
        .unwrap();

    assert!(page.is_empty());
    assert_eq!(page.number, 1);
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = repo
        .update(Post::new(Uuid::new_v4(), "ghost".to_owned(), None))
        .await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}
