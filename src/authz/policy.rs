use uuid::Uuid;

use super::principal::Principal;

/// Visibility of a list operation for a given principal. Listing never
/// errors on permission grounds; out-of-scope principals get `Nothing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Every record (admin).
    All,
    /// Records of employees assigned to this supervisor.
    AssignedTo(Uuid),
    /// The principal's own records.
    OwnedBy(Uuid),
    /// Empty result set.
    Nothing,
}

/// Admins and supervisors onboard employees; employees never do.
pub fn can_create_employee(principal: &Principal) -> bool {
    principal.is_admin || principal.is_supervisor()
}

/// Employees file for themselves only; admins may file on anyone's behalf.
pub fn can_create_leave_request(principal: &Principal, owner_id: Uuid) -> bool {
    if principal.is_admin {
        return true;
    }
    principal.is_employee() && principal.account_id == owner_id
}

pub fn employee_list_scope(principal: &Principal) -> ListScope {
    if principal.is_admin {
        ListScope::All
    } else if principal.is_supervisor() {
        ListScope::AssignedTo(principal.account_id)
    } else {
        ListScope::Nothing
    }
}

pub fn leave_list_scope(principal: &Principal) -> ListScope {
    if principal.is_admin {
        ListScope::All
    } else if principal.is_supervisor() {
        ListScope::AssignedTo(principal.account_id)
    } else if principal.is_employee() {
        ListScope::OwnedBy(principal.account_id)
    } else {
        ListScope::Nothing
    }
}

/// Transitions are for the assigned supervisor of the request's employee, or
/// an admin. An unassigned employee's requests are admin-only.
pub fn can_transition(principal: &Principal, assigned_supervisor: Option<Uuid>) -> bool {
    if principal.is_admin {
        return true;
    }
    principal.is_supervisor() && assigned_supervisor == Some(principal.account_id)
}

/// Deletion belongs to the owning employee alone; admin and supervisor
/// deletes are denied. The pending-only rule is the lifecycle's to enforce.
pub fn can_delete(principal: &Principal, owner_id: Uuid) -> bool {
    principal.is_employee() && principal.account_id == owner_id
}
