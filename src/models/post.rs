use serde::{Deserialize, Serialize};

/// Title used for the placeholder post when a statement yields no result set.
pub const NO_RESULTS_TITLE: &str = "No Results Found";

/// Content used for the placeholder post when a statement yields no result set.
pub const NO_RESULTS_CONTENT: &str = "Please rephrase your search term and try again.";

/// Projection of a `blog_page.blog_post` row returned to the front end.
///
/// `content` is raw markup and is passed through untouched; only JSON string
/// escaping is applied on the way out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl BlogPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        BlogPost {
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }

    /// Placeholder emitted when the statement produced no result set at all.
    pub fn no_results() -> Self {
        BlogPost::new(NO_RESULTS_TITLE, NO_RESULTS_CONTENT)
    }

    /// Reads the projected columns by name, so `SELECT *` column order does not matter.
    pub fn from_row(row: &tokio_postgres::Row) -> Result<Self, tokio_postgres::Error> {
        Ok(BlogPost {
            title: row.try_get("title")?,
            content: row.try_get("content")?,
        })
    }

    /// Maps a statement outcome into the posts to return.
    /// `None` means no result set was produced, which is distinct from an empty one.
    pub fn from_result_set(result_set: Option<Vec<BlogPost>>) -> Vec<BlogPost> {
        match result_set {
            Some(posts) => posts,
            None => vec![BlogPost::no_results()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_serialization_keeps_markup() {
        let post = BlogPost::new("A", "<b>x</b>");

        let json = serde_json::to_string(&post).expect("Failed to serialize post");
        assert_eq!(json, r#"{"title":"A","content":"<b>x</b>"}"#);
    }

    #[test]
    fn test_post_serialization_escapes_quotes() {
        let post = BlogPost::new("Say \"hi\"", "<p class=\"lead\">line\nbreak</p>");

        let json = serde_json::to_string(&post).expect("Failed to serialize post");
        assert_eq!(
            json,
            r#"{"title":"Say \"hi\"","content":"<p class=\"lead\">line\nbreak</p>"}"#
        );
    }

    #[test]
    fn test_post_serialization_with_null_content() {
        let post = BlogPost {
            title: Some("Draft".to_string()),
            content: None,
        };

        let json = serde_json::to_string(&post).expect("Failed to serialize post");
        assert_eq!(json, r#"{"title":"Draft","content":null}"#);
    }

    #[test]
    fn test_missing_result_set_yields_placeholder() {
        let posts = BlogPost::from_result_set(None);

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title.as_deref(), Some(NO_RESULTS_TITLE));
        assert_eq!(posts[0].content.as_deref(), Some(NO_RESULTS_CONTENT));
    }

    #[test]
    fn test_empty_result_set_stays_empty() {
        assert!(BlogPost::from_result_set(Some(Vec::new())).is_empty());
    }

    #[test]
    fn test_result_set_order_is_preserved() {
        let rows = vec![BlogPost::new("newest", "c"), BlogPost::new("older", "b")];
        let posts = BlogPost::from_result_set(Some(rows.clone()));
        assert_eq!(posts, rows);
    }
}
