pub mod brand_profiles;
pub mod connected_accounts;
pub mod invitations;
pub mod posts;
pub mod team_members;
pub mod user_profiles;
pub mod workspaces;
