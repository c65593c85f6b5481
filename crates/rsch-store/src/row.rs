//! Row <-> domain mapping. The effective status is always derived from
//! `(posted, error)` rather than stored directly.

use rsch_schemas::{decode_post_data, Post, PostEntry, PostStatus};

pub const QUERY_ALL_WHERE: &str = "";
pub const QUERY_ELIGIBLE_WHERE: &str = "WHERE scheduled_time < strftime('%s','now') AND posted = 0";

pub fn post_entry_from_row(row: &rusqlite::Row) -> rusqlite::Result<PostEntry> {
    let id: i64 = row.get("id")?;
    let title: String = row.get("title")?;
    let subreddit: String = row.get("subreddit")?;
    let blob: Vec<u8> = row.get("data")?;
    let scheduled_time: i64 = row.get("scheduled_time")?;
    let posted: i64 = row.get("posted")?;
    let flair_id: Option<String> = row.get("flair_id")?;
    let error: Option<String> = row.get("error")?;

    let data = decode_post_data(&blob).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            blob.len(),
            rusqlite::types::Type::Blob,
            Box::new(e),
        )
    })?;

    let status = if posted != 0 {
        PostStatus::Posted
    } else if error.is_some() {
        PostStatus::Error
    } else {
        PostStatus::Pending
    };

    Ok(PostEntry {
        id,
        post: Post {
            title,
            subreddit,
            scheduled_time,
            data,
            flair_id,
            flair_text: None,
        },
        status,
        error,
    })
}
