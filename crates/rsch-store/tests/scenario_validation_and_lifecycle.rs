//! Scenario: validation boundaries, delete/mark idempotence, eligibility.

use rsch_schemas::{Post, PostData};
use rsch_store::{Store, StoreCallError};

fn db_path() -> tempfile::TempPath {
    tempfile::NamedTempFile::new().unwrap().into_temp_path()
}

fn base_post(data: PostData) -> Post {
    Post {
        title: "T".into(),
        subreddit: "s".into(),
        scheduled_time: 1,
        data,
        flair_id: None,
        flair_text: None,
    }
}

#[tokio::test]
async fn empty_image_is_rejected_without_creating_a_row() {
    let path = db_path();
    let (store, join) = Store::spawn(&path).unwrap();

    let post = base_post(PostData::Image {
        image_bytes: vec![],
        extension: "png".into(),
        nsfw: false,
    });
    let err = store.add(post).await.unwrap_err();
    assert!(matches!(err, StoreCallError::Validation(_)));
    assert_eq!(err.to_string(), "cannot post empty image post");

    assert!(store.list_all().await.unwrap().is_empty());

    store.stop().await;
    join.join().unwrap();
}

#[tokio::test]
async fn missing_required_fields_are_rejected() {
    let path = db_path();
    let (store, join) = Store::spawn(&path).unwrap();

    let mut post = base_post(PostData::Text { body: "b".into() });
    post.title = String::new();
    assert!(store.add(post).await.is_err());

    let mut post = base_post(PostData::Text { body: "b".into() });
    post.subreddit = String::new();
    assert!(store.add(post).await.is_err());

    let mut post = base_post(PostData::Text { body: "b".into() });
    post.scheduled_time = 0;
    assert!(store.add(post).await.is_err());

    assert!(store.list_all().await.unwrap().is_empty());

    store.stop().await;
    join.join().unwrap();
}

#[tokio::test]
async fn delete_on_absent_id_is_a_no_op() {
    let path = db_path();
    let (store, join) = Store::spawn(&path).unwrap();

    store.delete(999).await.unwrap();

    store.stop().await;
    join.join().unwrap();
}

#[tokio::test]
async fn mark_posted_applied_twice_is_equivalent_to_once() {
    let path = db_path();
    let (store, join) = Store::spawn(&path).unwrap();

    store
        .add(base_post(PostData::Text { body: "b".into() }))
        .await
        .unwrap();
    let id = store.list_all().await.unwrap()[0].id;

    store.mark_posted(id).await.unwrap();
    store.mark_posted(id).await.unwrap();

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, rsch_schemas::PostStatus::Posted);

    store.stop().await;
    join.join().unwrap();
}

#[tokio::test]
async fn mark_error_preserves_multiline_text_byte_for_byte() {
    let path = db_path();
    let (store, join) = Store::spawn(&path).unwrap();

    store
        .add(base_post(PostData::Poll {
            selftext: "x".into(),
            duration_days: 0,
            options: vec!["a".into(), "b".into()],
        }))
        .await
        .unwrap();
    let id = store.list_all().await.unwrap()[0].id;

    store.mark_error(id, "line1\nline2".into()).await.unwrap();

    let all = store.list_all().await.unwrap();
    assert_eq!(all[0].status, rsch_schemas::PostStatus::Error);
    assert_eq!(all[0].error.as_deref(), Some("line1\nline2"));

    store.stop().await;
    join.join().unwrap();
}

#[tokio::test]
async fn delete_while_scheduled_removes_the_row() {
    let path = db_path();
    let (store, join) = Store::spawn(&path).unwrap();

    store
        .add(base_post(PostData::Text { body: "b".into() }))
        .await
        .unwrap();
    let id = store.list_all().await.unwrap()[0].id;

    store.delete(id).await.unwrap();

    let all = store.list_all().await.unwrap();
    assert!(all.iter().all(|e| e.id != id));

    store.stop().await;
    join.join().unwrap();
}

#[tokio::test]
async fn error_status_rows_remain_eligible_for_retry() {
    let path = db_path();
    let (store, join) = Store::spawn(&path).unwrap();

    let mut post = base_post(PostData::Text { body: "b".into() });
    post.scheduled_time = 1; // long past
    store.add(post).await.unwrap();
    let id = store.list_all().await.unwrap()[0].id;

    store.mark_error(id, "boom".into()).await.unwrap();

    let eligible = store.list_eligible().await.unwrap();
    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].id, id);

    store.stop().await;
    join.join().unwrap();
}

#[tokio::test]
async fn posted_rows_are_never_returned_by_list_eligible() {
    let path = db_path();
    let (store, join) = Store::spawn(&path).unwrap();

    let mut post = base_post(PostData::Text { body: "b".into() });
    post.scheduled_time = 1;
    store.add(post).await.unwrap();
    let id = store.list_all().await.unwrap()[0].id;

    store.mark_posted(id).await.unwrap();

    let eligible = store.list_eligible().await.unwrap();
    assert!(eligible.is_empty());

    store.stop().await;
    join.join().unwrap();
}
