pub mod accounts;
pub mod ai;
pub mod analytics;
pub mod approvals;
pub mod auth;
pub mod brand;
pub mod inbox;
pub mod posts;
pub mod team;
pub mod workspaces;
