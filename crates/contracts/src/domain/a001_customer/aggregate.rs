use serde::{Deserialize, Serialize};

use crate::shared::entity::{trim_field, EntityDraft, FormMode, ListEntity};
use crate::shared::validation::FieldRules;

// ============================================================================
// Record
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Opaque site reference
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ============================================================================
// Draft
// ============================================================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: String,
    pub site_id: String,
    pub notes: String,
}

impl EntityDraft for CustomerDraft {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "name" => &self.name,
            "email" => &self.email,
            "phone" => &self.phone,
            "company" => &self.company,
            "address" => &self.address,
            "site_id" => &self.site_id,
            "notes" => &self.notes,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "company" => &mut self.company,
            "address" => &mut self.address,
            "site_id" => &mut self.site_id,
            "notes" => &mut self.notes,
            _ => return false,
        };
        *slot = value;
        true
    }

    fn rules(_mode: FormMode) -> Vec<FieldRules> {
        vec![
            FieldRules::new("name", "Name").required().min_length(2),
            FieldRules::new("email", "Email").required().email(),
            FieldRules::new("phone", "Phone").phone(),
        ]
    }

    fn trimmed(&self) -> Self {
        Self {
            name: trim_field(&self.name),
            email: trim_field(&self.email),
            phone: trim_field(&self.phone),
            company: trim_field(&self.company),
            address: trim_field(&self.address),
            site_id: trim_field(&self.site_id),
            notes: trim_field(&self.notes),
        }
    }
}

impl ListEntity for Customer {
    type Draft = CustomerDraft;
    const RESOURCE: &'static str = "customers";

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> CustomerDraft {
        CustomerDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone().unwrap_or_default(),
            company: self.company.clone().unwrap_or_default(),
            address: self.address.clone().unwrap_or_default(),
            site_id: self.site_id.clone().unwrap_or_default(),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}
