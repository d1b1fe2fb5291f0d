//! Articles: long-form posts with a draft/published lifecycle.

use serde::{Deserialize, Serialize};

use super::foundation::{PublishStatus, RecordId, Timestamp, ValidationError};
use super::resource::{require_text, Resource, ResourceKind, WriteStamp};

/// An article in its public (camelCase) shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: RecordId,
    pub title: String,
    /// Rich text or markdown body.
    pub content: String,
    pub status: PublishStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Writable fields of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub status: PublishStatus,
}

impl ArticleDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, status: PublishStatus) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            status,
        }
    }
}

/// Persisted row in the hosted `articles` table.
///
/// Accepts camelCase timestamps on input as well, since rows proxied through
/// older gateways arrive in the public shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRow {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub status: PublishStatus,
    #[serde(alias = "createdAt")]
    pub created_at: Timestamp,
    #[serde(alias = "updatedAt")]
    pub updated_at: Timestamp,
}

/// Insert/update payload for the `articles` table.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleWrite {
    pub title: String,
    pub content: String,
    pub status: PublishStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl Resource for Article {
    type Draft = ArticleDraft;
    type Row = ArticleRow;
    type Write = ArticleWrite;

    const KIND: ResourceKind = ResourceKind::Articles;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn status(&self) -> PublishStatus {
        self.status
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn order_key(&self) -> Timestamp {
        self.created_at
    }

    fn from_row(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn to_row(&self) -> ArticleRow {
        ArticleRow {
            id: self.id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn write_row(draft: &ArticleDraft, stamp: WriteStamp) -> ArticleWrite {
        ArticleWrite {
            title: draft.title.clone(),
            content: draft.content.clone(),
            status: draft.status,
            created_at: stamp.created_at(),
            updated_at: stamp.updated_at(),
        }
    }

    fn create(id: RecordId, draft: ArticleDraft, now: Timestamp) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn revise(&mut self, draft: ArticleDraft, now: Timestamp) {
        self.title = draft.title;
        self.content = draft.content;
        self.status = draft.status;
        self.updated_at = now.advanced_past(self.updated_at);
    }

    fn validate_draft(draft: &ArticleDraft) -> Result<(), ValidationError> {
        require_text("title", &draft.title)?;
        require_text("content", &draft.content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Article {
        Article::create(
            RecordId::new("a1").unwrap(),
            ArticleDraft::new("Hi", "Body", PublishStatus::Draft),
            Timestamp::parse("2024-03-01T09:00:00Z").unwrap(),
        )
    }

    #[test]
    fn create_sets_equal_timestamps() {
        let article = sample();
        assert_eq!(article.created_at, article.updated_at);
        assert_eq!(article.status, PublishStatus::Draft);
    }

    #[test]
    fn revise_advances_updated_at_strictly() {
        let mut article = sample();
        let before = article.updated_at;

        article.revise(
            ArticleDraft::new("Hi", "Body", PublishStatus::Published),
            before,
        );

        assert!(article.updated_at.is_after(&before));
        assert_eq!(article.created_at, before);
        assert_eq!(article.status, PublishStatus::Published);
    }

    #[test]
    fn public_shape_uses_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn row_shape_uses_snake_case() {
        let value = serde_json::to_value(sample().to_row()).unwrap();
        assert!(value.get("created_at").is_some());
        assert!(value.get("updatedAt").is_none());
    }

    #[test]
    fn row_accepts_camel_case_timestamps() {
        let row: ArticleRow = serde_json::from_value(json!({
            "id": "a1",
            "title": "Hi",
            "content": "Body",
            "status": "draft",
            "createdAt": "2024-03-01T09:00:00Z",
            "updatedAt": "2024-03-01T09:00:00Z"
        }))
        .unwrap();

        assert_eq!(Article::from_row(row), sample());
    }

    #[test]
    fn row_roundtrip_is_identity() {
        let article = sample();
        assert_eq!(Article::from_row(article.to_row()), article);
    }

    #[test]
    fn insert_payload_carries_both_timestamps() {
        let now = Timestamp::now();
        let draft = ArticleDraft::new("Hi", "Body", PublishStatus::Draft);

        let insert = serde_json::to_value(Article::write_row(&draft, WriteStamp::Created(now))).unwrap();
        let update = serde_json::to_value(Article::write_row(&draft, WriteStamp::Updated(now))).unwrap();

        assert_eq!(insert["created_at"], insert["updated_at"]);
        assert!(update.get("created_at").is_none());
        assert!(update.get("id").is_none());
    }

    #[test]
    fn validation_requires_title_and_content() {
        let missing_title = ArticleDraft::new(" ", "Body", PublishStatus::Draft);
        let missing_content = ArticleDraft::new("Hi", "", PublishStatus::Draft);

        assert_eq!(
            Article::validate_draft(&missing_title),
            Err(ValidationError::empty_field("title"))
        );
        assert_eq!(
            Article::validate_draft(&missing_content),
            Err(ValidationError::empty_field("content"))
        );
        assert!(Article::validate_draft(&ArticleDraft::new("Hi", "Body", PublishStatus::Draft)).is_ok());
    }
}
