//! Application layer - the data access layer proper.
//!
//! - `ClientManager` / `ClientSlot` - one shared hosted client handle
//! - `SessionGuard` - session check before privileged calls
//! - `ResourceFacade` - per-resource CRUD and pagination over either backend
//! - `AuthService` - sign-in and session lookup
//! - `DataService` - wiring of the above from configuration
//! - `RecordService` - list/create/update/delete behind the local gateway

mod auth_service;
mod client_manager;
mod data_service;
mod error;
mod facade;
mod record_service;
mod session_guard;

pub use auth_service::AuthService;
pub use client_manager::{ClientManager, ClientSlot, ReadinessBudget};
pub use data_service::DataService;
pub use error::{AccessError, RecordServiceError, SetupError};
pub use facade::ResourceFacade;
pub use record_service::RecordService;
pub use session_guard::SessionGuard;
