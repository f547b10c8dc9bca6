//! Recipient resolver - maps a directive's role set to concrete users.
//!
//! Fail-fast per directive: if any requested role cannot be resolved, the
//! whole directive fails and the caller reports it. No partial or stale
//! recipient sets.

use std::collections::HashSet;
use std::time::Duration;

use tracing::debug;

use crate::common::Role;
use crate::domains::notifications::errors::DispatchError;
use crate::kernel::traits::{BaseUserDirectory, DirectoryUser};

/// Resolve the active users holding any of the requested roles.
///
/// The returned sequence is deduplicated by user id (a user reachable via
/// two requested roles appears once) and preserves role order, then
/// directory order within a role. Each role lookup runs under `timeout`.
pub async fn resolve(
    directory: &dyn BaseUserDirectory,
    roles: &[Role],
    timeout: Duration,
) -> Result<Vec<DirectoryUser>, DispatchError> {
    let mut seen = HashSet::new();
    let mut recipients = Vec::new();

    for &role in roles {
        let users = match tokio::time::timeout(timeout, directory.active_users(role)).await {
            Err(_) => {
                return Err(DispatchError::DirectoryTimeout {
                    role,
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
            Ok(Err(source)) => return Err(DispatchError::DirectoryUnavailable { role, source }),
            Ok(Ok(users)) => users,
        };

        debug!(role = %role, count = users.len(), "resolved role members");

        for user in users {
            if seen.insert(user.id) {
                recipients.push(user);
            }
        }
    }

    Ok(recipients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockUserDirectory;

    const TIMEOUT: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn resolves_all_requested_roles_in_order() {
        let directory = MockUserDirectory::new();
        let admin = directory.add_user(Role::Admin, "Ada");
        let manager = directory.add_user(Role::SiteManager, "Sam");

        let recipients = resolve(&directory, &[Role::Admin, Role::SiteManager], TIMEOUT)
            .await
            .unwrap();

        assert_eq!(recipients.len(), 2);
        assert_eq!(recipients[0].id, admin);
        assert_eq!(recipients[1].id, manager);
        assert_eq!(directory.calls(), vec![Role::Admin, Role::SiteManager]);
    }

    #[tokio::test]
    async fn empty_role_resolves_to_no_recipients() {
        let directory = MockUserDirectory::new();
        let recipients = resolve(&directory, &[Role::Customer], TIMEOUT).await.unwrap();
        assert!(recipients.is_empty());
    }

    #[tokio::test]
    async fn recipients_are_deduplicated_by_user_id() {
        let directory = MockUserDirectory::new();
        let admin = directory.add_user(Role::Admin, "Ada");
        // Same identity also listed under site_manager in the directory.
        directory.add(
            Role::SiteManager,
            DirectoryUser {
                id: admin,
                display_name: "Ada".to_string(),
                email: "ada@example.org".to_string(),
                role: Role::SiteManager,
            },
        );

        let recipients = resolve(&directory, &[Role::Admin, Role::SiteManager], TIMEOUT)
            .await
            .unwrap();

        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].role, Role::Admin);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_directory_lookup_times_out_and_fails_the_directive() {
        let directory = MockUserDirectory::new();
        directory.add_user(Role::Admin, "Ada");
        directory.hang_role(Role::SiteManager);

        let err = resolve(&directory, &[Role::Admin, Role::SiteManager], TIMEOUT)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::DirectoryTimeout {
                role: Role::SiteManager,
                timeout_ms: 200,
            }
        ));
    }

    #[tokio::test]
    async fn unreachable_directory_fails_the_whole_directive() {
        let directory = MockUserDirectory::new();
        directory.add_user(Role::Admin, "Ada");
        directory.fail_role(Role::SiteManager);

        let err = resolve(&directory, &[Role::Admin, Role::SiteManager], TIMEOUT)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::DirectoryUnavailable {
                role: Role::SiteManager,
                ..
            }
        ));
    }
}
