use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Application {
    Office,
    Mil,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    #[serde(rename = "task_ordering_officer")]
    Too,
    #[serde(rename = "task_invoicing_officer")]
    Tio,
    ServicesCounselor,
    Qae,
    CustomerServiceRepresentative,
    Headquarters,
    Customer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    Safety,
    Supervisor,
}

/// Authenticated caller, resolved once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub application: Application,
    pub user_id: Uuid,
    #[serde(default)]
    pub office_user_id: Option<Uuid>,
    #[serde(default)]
    pub service_member_id: Option<Uuid>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<RoleType>,
    #[serde(default)]
    pub privileges: Vec<Privilege>,
}

impl Session {
    /// An office-application session for an office user with `roles`.
    pub fn office(office_user_id: Uuid, roles: impl IntoIterator<Item = RoleType>) -> Self {
        Self {
            application: Application::Office,
            user_id: Uuid::new_v4(),
            office_user_id: Some(office_user_id),
            service_member_id: None,
            email: String::new(),
            roles: roles.into_iter().collect(),
            privileges: Vec::new(),
        }
    }

    pub fn with_privilege(mut self, privilege: Privilege) -> Self {
        if !self.privileges.contains(&privilege) {
            self.privileges.push(privilege);
        }
        self
    }

    pub fn is_office_app(&self) -> bool {
        self.application == Application::Office
    }

    pub fn is_office_user(&self) -> bool {
        self.is_office_app() && self.office_user_id.is_some()
    }

    pub fn has_role(&self, role: RoleType) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_privilege(&self, privilege: Privilege) -> bool {
        self.privileges.contains(&privilege)
    }
}
