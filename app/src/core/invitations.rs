use sea_orm::prelude::DateTime;
use thiserror::Error;

use crate::models::team_invitation::{InvitationStatus, Model as Invitation};

/// Why an invitation cannot be acted on. Handlers map these onto 403/409/410.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InviteRefusal {
    #[error("this invitation was already {0}")]
    AlreadyResolved(&'static str),
    #[error("this invitation has expired")]
    Expired,
    #[error("this invitation was sent to a different email address")]
    EmailMismatch,
    #[error("you cannot accept an invitation to your own workspace")]
    OwnInvitation,
}

impl From<InviteRefusal> for crate::utils::response::APIError {
    fn from(err: InviteRefusal) -> Self {
        match err {
            InviteRefusal::AlreadyResolved(_) => Self::Conflict(err.to_string()),
            InviteRefusal::Expired => Self::Gone(err.to_string()),
            InviteRefusal::EmailMismatch => Self::Forbidden(err.to_string()),
            InviteRefusal::OwnInvitation => Self::BadRequest(err.to_string()),
        }
    }
}

/// Status with lazy expiry applied. Rows are never flipped by a background
/// job; a pending invitation past its deadline reads as expired and the
/// caller persists the flip when convenient.
pub fn effective_status(invite: &Invitation, now: DateTime) -> InvitationStatus {
    if invite.status == InvitationStatus::Pending && invite.expires_at < now {
        InvitationStatus::Expired
    } else {
        invite.status
    }
}

/// Invitations match on address, not account, so casing differences between
/// the inviter's spelling and the login email must not lock anyone out.
pub fn email_matches(invite: &Invitation, user_email: &str) -> bool {
    invite.email.eq_ignore_ascii_case(user_email.trim())
}

fn check_open(invite: &Invitation, now: DateTime) -> Result<(), InviteRefusal> {
    match effective_status(invite, now) {
        InvitationStatus::Pending => Ok(()),
        InvitationStatus::Expired => Err(InviteRefusal::Expired),
        resolved => Err(InviteRefusal::AlreadyResolved(resolved.label())),
    }
}

pub fn check_accept(
    invite: &Invitation,
    user_id: &str,
    user_email: &str,
    now: DateTime,
) -> Result<(), InviteRefusal> {
    check_open(invite, now)?;
    if !email_matches(invite, user_email) {
        return Err(InviteRefusal::EmailMismatch);
    }
    if invite.owner_id == user_id {
        return Err(InviteRefusal::OwnInvitation);
    }
    Ok(())
}

pub fn check_decline(
    invite: &Invitation,
    user_email: &str,
    now: DateTime,
) -> Result<(), InviteRefusal> {
    check_open(invite, now)?;
    if !email_matches(invite, user_email) {
        return Err(InviteRefusal::EmailMismatch);
    }
    Ok(())
}

/// Owner-side withdrawal. Only open invitations can be cancelled; resolving
/// twice would clobber the recipient's answer.
pub fn check_cancel(invite: &Invitation, now: DateTime) -> Result<(), InviteRefusal> {
    check_open(invite, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::team_member::Role;
    use chrono::{Duration, Utc};

    fn invite(status: InvitationStatus, expires_in_hours: i64) -> Invitation {
        let now = Utc::now().naive_utc();
        Invitation {
            id: "inv-1".to_string(),
            owner_id: "owner-1".to_string(),
            email: "Alice@Example.com".to_string(),
            role: Role::Member,
            status,
            invite_token: "tok".to_string(),
            expires_at: now + Duration::hours(expires_in_hours),
            created_at: now,
            responded_at: None,
        }
    }

    #[test]
    fn test_accept_is_case_insensitive_on_email() {
        let inv = invite(InvitationStatus::Pending, 24);
        let now = Utc::now().naive_utc();
        assert_eq!(
            check_accept(&inv, "user-2", "alice@example.com", now),
            Ok(())
        );
        assert_eq!(
            check_accept(&inv, "user-2", "ALICE@EXAMPLE.COM", now),
            Ok(())
        );
    }

    #[test]
    fn test_accept_refuses_other_users() {
        let inv = invite(InvitationStatus::Pending, 24);
        let now = Utc::now().naive_utc();
        assert_eq!(
            check_accept(&inv, "user-3", "bob@example.com", now),
            Err(InviteRefusal::EmailMismatch)
        );
    }

    #[test]
    fn test_accept_refuses_the_inviting_owner() {
        let inv = invite(InvitationStatus::Pending, 24);
        let now = Utc::now().naive_utc();
        assert_eq!(
            check_accept(&inv, "owner-1", "alice@example.com", now),
            Err(InviteRefusal::OwnInvitation)
        );
    }

    #[test]
    fn test_resolved_invitations_stay_resolved() {
        let now = Utc::now().naive_utc();
        let accepted = invite(InvitationStatus::Accepted, 24);
        assert_eq!(
            check_accept(&accepted, "user-2", "alice@example.com", now),
            Err(InviteRefusal::AlreadyResolved("accepted"))
        );
        let cancelled = invite(InvitationStatus::Cancelled, 24);
        assert_eq!(
            check_decline(&cancelled, "alice@example.com", now),
            Err(InviteRefusal::AlreadyResolved("cancelled"))
        );
    }

    #[test]
    fn test_lazy_expiry() {
        let stale = invite(InvitationStatus::Pending, -1);
        let now = Utc::now().naive_utc();
        assert_eq!(effective_status(&stale, now), InvitationStatus::Expired);
        assert_eq!(
            check_accept(&stale, "user-2", "alice@example.com", now),
            Err(InviteRefusal::Expired)
        );
        assert_eq!(check_cancel(&stale, now), Err(InviteRefusal::Expired));

        let fresh = invite(InvitationStatus::Pending, 24);
        assert_eq!(effective_status(&fresh, now), InvitationStatus::Pending);
        assert_eq!(check_cancel(&fresh, now), Ok(()));
    }
}
