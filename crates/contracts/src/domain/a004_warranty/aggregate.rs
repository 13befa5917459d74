use serde::{Deserialize, Serialize};

use crate::shared::entity::{
    format_amount, serialize_amount, trim_field, EntityDraft, FormMode, ListEntity,
};
use crate::shared::validation::FieldRules;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warranty {
    pub id: String,
    pub asset_id: String,
    #[serde(default)]
    pub asset_name: Option<String>,
    pub provider: String,
    #[serde(default)]
    pub warranty_type: Option<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Warranty {
    /// ISO даты сравниваются лексикографически
    pub fn is_expired_on(&self, today: &str) -> bool {
        !self.end_date.is_empty() && self.end_date.as_str() < today
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyDraft {
    pub asset_id: String,
    pub provider: String,
    pub warranty_type: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(serialize_with = "serialize_amount")]
    pub cost: String,
    pub notes: String,
}

impl EntityDraft for WarrantyDraft {
    fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "asset_id" => &self.asset_id,
            "provider" => &self.provider,
            "warranty_type" => &self.warranty_type,
            "start_date" => &self.start_date,
            "end_date" => &self.end_date,
            "cost" => &self.cost,
            "notes" => &self.notes,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "asset_id" => &mut self.asset_id,
            "provider" => &mut self.provider,
            "warranty_type" => &mut self.warranty_type,
            "start_date" => &mut self.start_date,
            "end_date" => &mut self.end_date,
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
            FieldRules::new("provider", "Provider").required().min_length(2),
            FieldRules::new("start_date", "Start date").required(),
            FieldRules::new("end_date", "End date").required(),
        ]
    }

    fn trimmed(&self) -> Self {
        Self {
            asset_id: trim_field(&self.asset_id),
            provider: trim_field(&self.provider),
            warranty_type: trim_field(&self.warranty_type),
            start_date: trim_field(&self.start_date),
            end_date: trim_field(&self.end_date),
            cost: trim_field(&self.cost),
            notes: trim_field(&self.notes),
        }
    }
}

impl ListEntity for Warranty {
    type Draft = WarrantyDraft;
    const RESOURCE: &'static str = "warranties";

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> WarrantyDraft {
        WarrantyDraft {
            asset_id: self.asset_id.clone(),
            provider: self.provider.clone(),
            warranty_type: self.warranty_type.clone().unwrap_or_default(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            cost: format_amount(self.cost),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}
