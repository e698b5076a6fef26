use thiserror::Error;

use crate::core::permissions::Capabilities;
use crate::models::post::{ApprovalStatus, PostStatus};
use crate::models::workspace::ApprovalMode;

/// Reviewer/author actions that move a post through the approval pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction {
    Submit,
    Approve,
    ForwardToClient,
    RequestChanges,
    Reject,
}

impl ApprovalAction {
    pub fn label(&self) -> &'static str {
        match self {
            ApprovalAction::Submit => "submit",
            ApprovalAction::Approve => "approve",
            ApprovalAction::ForwardToClient => "forward",
            ApprovalAction::RequestChanges => "request changes on",
            ApprovalAction::Reject => "reject",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("cannot {action} a post that is {from}")]
    InvalidTransition {
        action: &'static str,
        from: &'static str,
    },
    #[error("you are not allowed to {action} posts in this workspace")]
    NotPermitted { action: &'static str },
}

impl From<ApprovalError> for crate::utils::response::APIError {
    fn from(err: ApprovalError) -> Self {
        match err {
            ApprovalError::InvalidTransition { .. } => Self::Conflict(err.to_string()),
            ApprovalError::NotPermitted { .. } => Self::Forbidden(err.to_string()),
        }
    }
}

fn invalid(action: ApprovalAction, from: ApprovalStatus) -> ApprovalError {
    ApprovalError::InvalidTransition {
        action: action.label(),
        from: from.label(),
    }
}

fn not_permitted(action: ApprovalAction) -> ApprovalError {
    ApprovalError::NotPermitted {
        action: action.label(),
    }
}

/// Author submits a post for review. The workspace mode picks the entry
/// state; with approvals off the post stays auto-approved (`none`).
/// Resubmission after changes-requested or rejection starts over.
pub fn submit(
    mode: ApprovalMode,
    current: ApprovalStatus,
) -> Result<ApprovalStatus, ApprovalError> {
    match current {
        ApprovalStatus::None | ApprovalStatus::ChangesRequested | ApprovalStatus::Rejected => {
            Ok(match mode {
                ApprovalMode::None => ApprovalStatus::None,
                ApprovalMode::Single => ApprovalStatus::Pending,
                ApprovalMode::TwoTier => ApprovalStatus::PendingInternal,
            })
        }
        other => Err(invalid(ApprovalAction::Submit, other)),
    }
}

/// Apply a reviewer action. Permission gates come first so a reviewer who is
/// not allowed to act gets a 403, not a state complaint.
pub fn review(
    action: ApprovalAction,
    mode: ApprovalMode,
    current: ApprovalStatus,
    caps: &Capabilities,
) -> Result<ApprovalStatus, ApprovalError> {
    let can_review = caps.approve_posts || caps.final_approval;

    match action {
        ApprovalAction::Submit => submit(mode, current),
        ApprovalAction::Approve => match current {
            ApprovalStatus::Pending => {
                if !can_review {
                    return Err(not_permitted(action));
                }
                Ok(ApprovalStatus::Approved)
            }
            ApprovalStatus::PendingInternal => {
                if !caps.approve_posts {
                    return Err(not_permitted(action));
                }
                // Internal sign-off in a two-tier workspace hands the post to
                // the client queue instead of finishing it.
                Ok(match mode {
                    ApprovalMode::TwoTier => ApprovalStatus::PendingClient,
                    _ => ApprovalStatus::Approved,
                })
            }
            ApprovalStatus::PendingClient => {
                if !caps.final_approval {
                    return Err(not_permitted(action));
                }
                Ok(ApprovalStatus::Approved)
            }
            other => Err(invalid(action, other)),
        },
        ApprovalAction::ForwardToClient => match current {
            ApprovalStatus::PendingInternal if mode == ApprovalMode::TwoTier => {
                if !caps.approve_posts {
                    return Err(not_permitted(action));
                }
                Ok(ApprovalStatus::PendingClient)
            }
            other => Err(invalid(action, other)),
        },
        ApprovalAction::RequestChanges | ApprovalAction::Reject => {
            let target = if action == ApprovalAction::Reject {
                ApprovalStatus::Rejected
            } else {
                ApprovalStatus::ChangesRequested
            };
            match current {
                ApprovalStatus::Pending | ApprovalStatus::PendingInternal => {
                    if !can_review {
                        return Err(not_permitted(action));
                    }
                    Ok(target)
                }
                // The client tier is reserved for final approvers.
                ApprovalStatus::PendingClient => {
                    if !caps.final_approval {
                        return Err(not_permitted(action));
                    }
                    Ok(target)
                }
                other => Err(invalid(action, other)),
            }
        }
    }
}

/// A post may go out (now or scheduled) only from draft or failed, and only
/// once approval is settled.
pub fn can_publish(status: PostStatus, approval: ApprovalStatus) -> bool {
    matches!(status, PostStatus::Draft | PostStatus::Failed)
        && matches!(approval, ApprovalStatus::None | ApprovalStatus::Approved)
}

/// Content edits stop once a post enters review or gets approved; the author
/// regains the pen after changes-requested or rejection.
pub fn can_edit(status: PostStatus, approval: ApprovalStatus) -> bool {
    status == PostStatus::Draft
        && matches!(
            approval,
            ApprovalStatus::None | ApprovalStatus::ChangesRequested | ApprovalStatus::Rejected
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::permissions::{resolve, PermissionToggles};
    use crate::models::team_member::Role;

    fn reviewer_caps() -> Capabilities {
        resolve(
            Role::Member,
            PermissionToggles {
                can_manage_agency: None,
                can_approve_posts: Some(true),
                can_final_approval: None,
            },
        )
    }

    fn client_caps() -> Capabilities {
        resolve(
            Role::Viewer,
            PermissionToggles {
                can_manage_agency: None,
                can_approve_posts: None,
                can_final_approval: Some(true),
            },
        )
    }

    fn plain_member_caps() -> Capabilities {
        resolve(Role::Member, PermissionToggles::default())
    }

    #[test]
    fn test_submit_entry_state_follows_mode() {
        assert_eq!(
            submit(ApprovalMode::None, ApprovalStatus::None),
            Ok(ApprovalStatus::None)
        );
        assert_eq!(
            submit(ApprovalMode::Single, ApprovalStatus::None),
            Ok(ApprovalStatus::Pending)
        );
        assert_eq!(
            submit(ApprovalMode::TwoTier, ApprovalStatus::None),
            Ok(ApprovalStatus::PendingInternal)
        );
    }

    #[test]
    fn test_resubmit_after_changes_requested_and_rejection() {
        assert_eq!(
            submit(ApprovalMode::Single, ApprovalStatus::ChangesRequested),
            Ok(ApprovalStatus::Pending)
        );
        assert_eq!(
            submit(ApprovalMode::TwoTier, ApprovalStatus::Rejected),
            Ok(ApprovalStatus::PendingInternal)
        );
    }

    #[test]
    fn test_submit_rejected_while_in_review_or_approved() {
        for state in [
            ApprovalStatus::Pending,
            ApprovalStatus::PendingInternal,
            ApprovalStatus::PendingClient,
            ApprovalStatus::Approved,
        ] {
            assert!(submit(ApprovalMode::Single, state).is_err());
        }
    }

    #[test]
    fn test_single_tier_approve() {
        let caps = reviewer_caps();
        assert_eq!(
            review(
                ApprovalAction::Approve,
                ApprovalMode::Single,
                ApprovalStatus::Pending,
                &caps
            ),
            Ok(ApprovalStatus::Approved)
        );
    }

    #[test]
    fn test_two_tier_internal_approval_moves_to_client_queue() {
        let caps = reviewer_caps();
        assert_eq!(
            review(
                ApprovalAction::Approve,
                ApprovalMode::TwoTier,
                ApprovalStatus::PendingInternal,
                &caps
            ),
            Ok(ApprovalStatus::PendingClient)
        );
        assert_eq!(
            review(
                ApprovalAction::ForwardToClient,
                ApprovalMode::TwoTier,
                ApprovalStatus::PendingInternal,
                &caps
            ),
            Ok(ApprovalStatus::PendingClient)
        );
    }

    #[test]
    fn test_client_tier_requires_final_approval() {
        let internal = reviewer_caps();
        let client = client_caps();

        assert_eq!(
            review(
                ApprovalAction::Approve,
                ApprovalMode::TwoTier,
                ApprovalStatus::PendingClient,
                &internal
            ),
            Err(ApprovalError::NotPermitted { action: "approve" })
        );
        assert_eq!(
            review(
                ApprovalAction::Approve,
                ApprovalMode::TwoTier,
                ApprovalStatus::PendingClient,
                &client
            ),
            Ok(ApprovalStatus::Approved)
        );
        assert_eq!(
            review(
                ApprovalAction::Reject,
                ApprovalMode::TwoTier,
                ApprovalStatus::PendingClient,
                &client
            ),
            Ok(ApprovalStatus::Rejected)
        );
    }

    #[test]
    fn test_plain_member_cannot_review() {
        let caps = plain_member_caps();
        let err = review(
            ApprovalAction::Approve,
            ApprovalMode::Single,
            ApprovalStatus::Pending,
            &caps,
        );
        assert_eq!(err, Err(ApprovalError::NotPermitted { action: "approve" }));
    }

    #[test]
    fn test_forward_only_from_internal_queue_in_two_tier() {
        let caps = reviewer_caps();
        assert!(review(
            ApprovalAction::ForwardToClient,
            ApprovalMode::Single,
            ApprovalStatus::Pending,
            &caps
        )
        .is_err());
        assert!(review(
            ApprovalAction::ForwardToClient,
            ApprovalMode::TwoTier,
            ApprovalStatus::PendingClient,
            &caps
        )
        .is_err());
    }

    #[test]
    fn test_no_review_action_from_settled_states() {
        let caps = reviewer_caps();
        for state in [
            ApprovalStatus::None,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
            ApprovalStatus::ChangesRequested,
        ] {
            for action in [
                ApprovalAction::Approve,
                ApprovalAction::RequestChanges,
                ApprovalAction::Reject,
            ] {
                assert!(
                    review(action, ApprovalMode::Single, state, &caps).is_err(),
                    "{action:?} from {state:?} should be invalid"
                );
            }
        }
    }

    #[test]
    fn test_publish_gate() {
        assert!(can_publish(PostStatus::Draft, ApprovalStatus::None));
        assert!(can_publish(PostStatus::Draft, ApprovalStatus::Approved));
        assert!(can_publish(PostStatus::Failed, ApprovalStatus::Approved));

        // rejected or still-in-review drafts cannot go out
        assert!(!can_publish(PostStatus::Draft, ApprovalStatus::Rejected));
        assert!(!can_publish(PostStatus::Draft, ApprovalStatus::Pending));
        assert!(!can_publish(
            PostStatus::Draft,
            ApprovalStatus::PendingClient
        ));
        // already live or queued
        assert!(!can_publish(PostStatus::Posted, ApprovalStatus::Approved));
        assert!(!can_publish(PostStatus::Scheduled, ApprovalStatus::Approved));
    }

    #[test]
    fn test_edit_gate() {
        assert!(can_edit(PostStatus::Draft, ApprovalStatus::None));
        assert!(can_edit(PostStatus::Draft, ApprovalStatus::ChangesRequested));
        assert!(can_edit(PostStatus::Draft, ApprovalStatus::Rejected));

        assert!(!can_edit(PostStatus::Draft, ApprovalStatus::Pending));
        assert!(!can_edit(PostStatus::Draft, ApprovalStatus::Approved));
        assert!(!can_edit(PostStatus::Scheduled, ApprovalStatus::Approved));
        assert!(!can_edit(PostStatus::Posted, ApprovalStatus::None));
    }
}
