use serde::{Deserialize, Serialize};

use crate::shared::entity::{trim_field, EntityDraft, FormMode, ListEntity};
use crate::shared::validation::FieldRules;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login_at: Option<String>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    /// Only sent when creating a user
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl EntityDraft for UserDraft {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "full_name" => &self.full_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "role" => &self.role,
            "password" => &self.password,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "full_name" => &mut self.full_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "role" => &mut self.role,
            "password" => &mut self.password,
            _ => return false,
        };
        *slot = value;
        true
    }

    fn rules(mode: FormMode) -> Vec<FieldRules> {
        let mut rules = vec![
            FieldRules::new("full_name", "Full name")
                .required()
                .min_length(2),
            FieldRules::new("email", "Email").required().email(),
            FieldRules::new("phone", "Phone").phone(),
            FieldRules::new("role", "Role").required(),
        ];
        if mode == FormMode::Creating {
            rules.push(FieldRules::new("password", "Password").required().password());
        }
        rules
    }

    fn trimmed(&self) -> Self {
        Self {
            full_name: trim_field(&self.full_name),
            email: trim_field(&self.email),
            phone: trim_field(&self.phone),
            role: trim_field(&self.role),
            // passwords are sent exactly as typed
            password: self.password.clone(),
        }
    }
}

impl ListEntity for User {
    type Draft = UserDraft;
    const RESOURCE: &'static str = "users";

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> UserDraft {
        UserDraft {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone().unwrap_or_default(),
            role: self.role.clone(),
            password: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> UserDraft {
        UserDraft {
            full_name: "Jo".into(),
            email: "jo@example.com".into(),
            role: "admin".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_password_checked_only_on_create() {
        let draft = valid_draft();
        let errors = draft.validate(FormMode::Creating);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["password"], "Password is required");

        assert!(draft.validate(FormMode::Editing).is_empty());
    }

    #[test]
    fn test_password_not_sent_when_empty() {
        let value = serde_json::to_value(valid_draft()).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["fullName"], "Jo");
    }
}
