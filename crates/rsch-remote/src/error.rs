/// One `(error_type, message)` pair as returned by the remote API's error
/// array. The Dispatcher formats a sequence of these into a post's `error`
/// column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditErrorItem {
    pub error_type: String,
    pub message: String,
}

/// A failed remote submission. Carries the structured items the source's
/// exception-inspection produced, rather than a single flattened string, so
/// callers can choose how to render them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditApiError(pub Vec<RedditErrorItem>);

impl std::fmt::Display for RedditApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_items(&self.0))
    }
}

impl std::error::Error for RedditApiError {}

impl RedditApiError {
    pub fn single(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![RedditErrorItem {
            error_type: error_type.into(),
            message: message.into(),
        }])
    }

    pub fn items(&self) -> &[RedditErrorItem] {
        &self.0
    }
}

fn format_items(items: &[RedditErrorItem]) -> String {
    items
        .iter()
        .map(|i| format!("-> {}: {}", i.error_type, i.message))
        .collect::<Vec<_>>()
        .join("\n")
}
