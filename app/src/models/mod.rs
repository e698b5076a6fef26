pub mod brand_profile;
pub mod connected_account;
pub mod post;
pub mod team_invitation;
pub mod team_member;
pub mod user_profile;
pub mod workspace;
