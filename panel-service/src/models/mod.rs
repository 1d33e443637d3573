pub mod permission;
pub mod principal;
pub mod server;
pub mod task;
pub mod user;

pub use permission::{Grant, PermissionLevel};
pub use principal::Principal;
pub use server::{Server, ServerFolder, ServerType, ServerUpdate, ServerUrl};
pub use task::{ScanType, Task};
pub use user::{User, UserDetailResponse};
