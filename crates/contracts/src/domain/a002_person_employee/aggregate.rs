use serde::{Deserialize, Serialize};

use crate::shared::entity::{trim_field, EntityDraft, FormMode, ListEntity};
use crate::shared::validation::FieldRules;

/// Сотрудник (физ. лицо), за которым закрепляются активы
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonEmployee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub employee_number: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    /// Opaque location reference
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
}

impl PersonEmployee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonEmployeeDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub employee_number: String,
    pub department: String,
    pub job_title: String,
    pub location_id: String,
}

impl EntityDraft for PersonEmployeeDraft {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "employee_number" => &self.employee_number,
            "department" => &self.department,
            "job_title" => &self.job_title,
            "location_id" => &self.location_id,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "first_name" => &mut self.first_name,
            "last_name" => &mut self.last_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "employee_number" => &mut self.employee_number,
            "department" => &mut self.department,
            "job_title" => &mut self.job_title,
            "location_id" => &mut self.location_id,
            _ => return false,
        };
        *slot = value;
        true
    }

    fn rules(_mode: FormMode) -> Vec<FieldRules> {
        vec![
            FieldRules::new("first_name", "First name")
                .required()
                .min_length(2),
            FieldRules::new("last_name", "Last name").required().min_length(2),
            FieldRules::new("email", "Email").required().email(),
            FieldRules::new("phone", "Phone").phone(),
        ]
    }

    fn trimmed(&self) -> Self {
        Self {
            first_name: trim_field(&self.first_name),
            last_name: trim_field(&self.last_name),
            email: trim_field(&self.email),
            phone: trim_field(&self.phone),
            employee_number: trim_field(&self.employee_number),
            department: trim_field(&self.department),
            job_title: trim_field(&self.job_title),
            location_id: trim_field(&self.location_id),
        }
    }
}

impl ListEntity for PersonEmployee {
    type Draft = PersonEmployeeDraft;
    const RESOURCE: &'static str = "persons";

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> PersonEmployeeDraft {
        PersonEmployeeDraft {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone().unwrap_or_default(),
            employee_number: self.employee_number.clone().unwrap_or_default(),
            department: self.department.clone().unwrap_or_default(),
            job_title: self.job_title.clone().unwrap_or_default(),
            location_id: self.location_id.clone().unwrap_or_default(),
        }
    }
}
