pub mod approval;
pub mod invitations;
pub mod linking;
pub mod permissions;
pub mod server;
pub mod state;
