//! Role-based authorization.
//!
//! Pure functions over [`RoleLevel`] and [`OperationType`]. Callers must
//! consult them before mutating the request queue or fanning out an
//! emergency broadcast.
//!
//! | Operation | Request | Approve |
//! |-----------|---------|---------|
//! | DRE       | 0       | 1       |
//! | ACE       | 1       | 2       |
//! | OEM       | 2       | 3       |

use emcom_proto::{OperationType, RoleLevel};

/// What a client wants to do with an operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Request,
    Approve,
}

/// Lowest role allowed to perform `action` on `op`.
pub fn minimum_level(op: OperationType, action: Action) -> RoleLevel {
    use OperationType::*;
    use RoleLevel::*;
    match (op, action) {
        (Dre, Action::Request) => Public,
        (Dre, Action::Approve) => RegionalCoordinator,
        (Ace, Action::Request) => RegionalCoordinator,
        (Ace, Action::Approve) => MidLevelOperator,
        (Oem, Action::Request) => MidLevelOperator,
        (Oem, Action::Approve) => Administrator,
    }
}

pub fn can_perform(role: RoleLevel, op: OperationType, action: Action) -> bool {
    role >= minimum_level(op, action)
}

/// Emergency broadcast is reserved to administrators.
pub fn can_send_emergency(role: RoleLevel) -> bool {
    role == RoleLevel::Administrator
}

/// `criar_user` gate; `min_level` comes from `[security] user_creation_min_level`.
pub fn can_create_user(role: RoleLevel, min_level: u8) -> bool {
    role.level() >= min_level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_hierarchy() {
        assert!(can_perform(RoleLevel::Public, OperationType::Dre, Action::Request));
        assert!(!can_perform(RoleLevel::Public, OperationType::Dre, Action::Approve));
        assert!(can_perform(RoleLevel::RegionalCoordinator, OperationType::Dre, Action::Approve));
        assert!(!can_perform(RoleLevel::Public, OperationType::Ace, Action::Request));
        assert!(!can_perform(RoleLevel::RegionalCoordinator, OperationType::Oem, Action::Request));
        assert!(!can_perform(RoleLevel::MidLevelOperator, OperationType::Oem, Action::Approve));
        assert!(can_perform(RoleLevel::Administrator, OperationType::Oem, Action::Approve));
    }

    #[test]
    fn permissions_are_monotonic_in_level() {
        for op in OperationType::ALL {
            for action in [Action::Request, Action::Approve] {
                for (i, low) in RoleLevel::ALL.iter().enumerate() {
                    if can_perform(*low, op, action) {
                        for high in &RoleLevel::ALL[i..] {
                            assert!(
                                can_perform(*high, op, action),
                                "{high:?} lost {action:?} on {op} held by {low:?}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn approving_never_easier_than_requesting() {
        for op in OperationType::ALL {
            assert!(minimum_level(op, Action::Approve) > minimum_level(op, Action::Request));
        }
    }

    #[test]
    fn emergency_is_admin_only() {
        assert!(can_send_emergency(RoleLevel::Administrator));
        for role in &RoleLevel::ALL[..3] {
            assert!(!can_send_emergency(*role));
        }
    }

    #[test]
    fn user_creation_threshold() {
        assert!(can_create_user(RoleLevel::Public, 0));
        assert!(!can_create_user(RoleLevel::MidLevelOperator, 3));
        assert!(can_create_user(RoleLevel::Administrator, 3));
    }
}
