use serde::{Deserialize, Serialize};

use crate::shared::entity::{
    format_amount, serialize_amount, trim_field, EntityDraft, FormMode, ListEntity,
};
use crate::shared::validation::FieldRules;

// ============================================================================
// Record
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    pub id: String,
    /// Opaque asset reference
    pub asset_id: String,
    #[serde(default)]
    pub asset_name: Option<String>,
    pub title: String,
    #[serde(default)]
    pub maintenance_type: String,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub completion_date: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Maintenance {
    pub fn is_completed(&self) -> bool {
        self.completion_date
            .as_deref()
            .map(|d| !d.trim().is_empty())
            .unwrap_or(false)
    }
}

// ============================================================================
// Draft
// ============================================================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceDraft {
    pub asset_id: String,
    pub title: String,
    pub maintenance_type: String,
    pub supplier: String,
    pub start_date: String,
    pub completion_date: String,
    #[serde(serialize_with = "serialize_amount")]
    pub cost: String,
    pub notes: String,
}

impl EntityDraft for MaintenanceDraft {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "asset_id" => &self.asset_id,
            "title" => &self.title,
            "maintenance_type" => &self.maintenance_type,
            "supplier" => &self.supplier,
            "start_date" => &self.start_date,
            "completion_date" => &self.completion_date,
            "cost" => &self.cost,
            "notes" => &self.notes,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "asset_id" => &mut self.asset_id,
            "title" => &mut self.title,
            "maintenance_type" => &mut self.maintenance_type,
            "supplier" => &mut self.supplier,
            "start_date" => &mut self.start_date,
            "completion_date" => &mut self.completion_date,
            "cost" => &mut self.cost,
            "notes" => &mut self.notes,
            _ => return false,
        };
        *slot = value;
        true
    }

    fn rules(_mode: FormMode) -> Vec<FieldRules> {
        vec![
            FieldRules::new("asset_id", "Asset").required(),
            FieldRules::new("title", "Title").required().min_length(2),
            FieldRules::new("maintenance_type", "Maintenance type").required(),
            FieldRules::new("start_date", "Start date").required(),
        ]
    }

    fn trimmed(&self) -> Self {
        Self {
            asset_id: trim_field(&self.asset_id),
            title: trim_field(&self.title),
            maintenance_type: trim_field(&self.maintenance_type),
            supplier: trim_field(&self.supplier),
            start_date: trim_field(&self.start_date),
            completion_date: trim_field(&self.completion_date),
            cost: trim_field(&self.cost),
            notes: trim_field(&self.notes),
        }
    }
}

impl ListEntity for Maintenance {
    type Draft = MaintenanceDraft;
    const RESOURCE: &'static str = "maintenances";

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> MaintenanceDraft {
        MaintenanceDraft {
            asset_id: self.asset_id.clone(),
            title: self.title.clone(),
            maintenance_type: self.maintenance_type.clone(),
            supplier: self.supplier.clone().unwrap_or_default(),
            start_date: self.start_date.clone(),
            completion_date: self.completion_date.clone().unwrap_or_default(),
            cost: format_amount(self.cost),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}
