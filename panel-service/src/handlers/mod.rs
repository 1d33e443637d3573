pub mod app;
pub mod servers;
pub mod tasks;
pub mod users;
