//! Authorization model: the resolved [`Principal`] and the pure policy
//! functions gating every mutating or list operation.

mod policy;
mod principal;

pub use policy::{
    can_create_employee, can_create_leave_request, can_delete, can_transition,
    employee_list_scope, leave_list_scope, ListScope,
};
pub use principal::{employee_record, Principal};
