//! Domain layer - records, value objects and the pure decision logic of the
//! data access layer (backend selection, pagination windows).

pub mod article;
pub mod backend;
pub mod event;
pub mod foundation;
pub mod pagination;
pub mod resource;

pub use article::{Article, ArticleDraft, ArticleRow, ArticleWrite};
pub use backend::{BackendChoice, BackendSelector, DeploymentSignals, Privilege};
pub use event::{Event, EventDraft, EventRow, EventWrite};
pub use pagination::{Page, PageWindow, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
pub use resource::{Audience, Resource, ResourceKind, SortOrder, WriteStamp};
