use shared_models::accounts::{Role, User};

use crate::error::StoreError;
use crate::table::Table;

/// A reference to a user that is only valid while that user holds `expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffRef {
    field: &'static str,
    user_id: i64,
    expected: Role,
}

impl StaffRef {
    pub fn new(field: &'static str, user_id: i64, expected: Role) -> Self {
        Self { field, user_id, expected }
    }

    pub fn driver(field: &'static str, user_id: i64) -> Self {
        Self::new(field, user_id, Role::Driver)
    }

    pub fn paramedic(field: &'static str, user_id: i64) -> Self {
        Self::new(field, user_id, Role::Paramedic)
    }

    pub fn dispatcher(field: &'static str, user_id: i64) -> Self {
        Self::new(field, user_id, Role::Dispatcher)
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn expected(&self) -> Role {
        self.expected
    }

    pub fn resolve<'t>(&self, users: &'t Table<User>) -> Result<&'t User, StoreError> {
        let user = users.get(self.user_id).ok_or(StoreError::MissingReference {
            field: self.field,
            id: self.user_id,
        })?;

        if user.role != self.expected {
            return Err(StoreError::RoleMismatch {
                field: self.field,
                user_id: self.user_id,
                expected: self.expected,
                actual: user.role,
            });
        }

        Ok(user)
    }
}
