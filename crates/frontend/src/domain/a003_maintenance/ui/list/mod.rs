use contracts::domain::a003_maintenance::Maintenance;
use contracts::shared::dropdown::kinds;
use contracts::shared::list::SortDirection;
use leptos::prelude::*;

use crate::shared::date_utils::{format_date, format_money};
use crate::shared::export::CsvExportable;
use crate::shared::list_page::{list_page, or_dash, Column, EntityPage, FieldKind, FormField};
use crate::shared::list_utils::SearchFieldOption;

fn asset_label(m: &Maintenance) -> String {
    m.asset_name.clone().unwrap_or_else(|| m.asset_id.clone())
}

fn status_label(m: &Maintenance) -> String {
    if m.is_completed() { "Completed" } else { "In progress" }.to_string()
}

impl CsvExportable for Maintenance {
    fn headers() -> Vec<&'static str> {
        vec![
            "Asset",
            "Title",
            "Type",
            "Supplier",
            "Start date",
            "Completion date",
            "Cost",
            "Notes",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            asset_label(self),
            self.title.clone(),
            self.maintenance_type.clone(),
            self.supplier.clone().unwrap_or_default(),
            self.start_date.clone(),
            self.completion_date.clone().unwrap_or_default(),
            self.cost.map(|c| format!("{:.2}", c)).unwrap_or_default(),
            self.notes.clone().unwrap_or_default(),
        ]
    }
}

pub struct MaintenancesPage;

impl EntityPage for MaintenancesPage {
    type Entity = Maintenance;

    const TITLE: &'static str = "Maintenances";
    const SINGULAR: &'static str = "Maintenance";

    fn columns() -> Vec<Column<Maintenance>> {
        vec![
            Column::sortable("title", "Title", |m: &Maintenance| m.title.clone()).width(180.0),
            Column::sortable("assetName", "Asset", asset_label),
            Column::sortable("maintenanceType", "Type", |m: &Maintenance| m.maintenance_type.clone()),
            Column::plain("Supplier", |m: &Maintenance| or_dash(&m.supplier)),
            Column::sortable("startDate", "Start", |m: &Maintenance| format_date(&m.start_date)),
            Column::sortable("completionDate", "Completed", |m: &Maintenance| {
                m.completion_date.as_deref().map(format_date).unwrap_or_else(|| "-".to_string())
            }),
            Column::plain("Status", status_label).width(90.0),
            Column::sortable("cost", "Cost", |m: &Maintenance| format_money(m.cost)).width(90.0),
        ]
    }

    fn form_fields() -> Vec<FormField> {
        vec![
            FormField::new("asset_id", "Asset", FieldKind::Text).required(),
            FormField::new("title", "Title", FieldKind::Text).required(),
            FormField::new(
                "maintenance_type",
                "Maintenance type",
                FieldKind::Dropdown(kinds::MAINTENANCE_TYPE),
            )
            .required(),
            FormField::new("supplier", "Supplier", FieldKind::Text),
            FormField::new("start_date", "Start date", FieldKind::Date).required(),
            FormField::new("completion_date", "Completion date", FieldKind::Date),
            FormField::new("cost", "Cost", FieldKind::Number),
            FormField::new("notes", "Notes", FieldKind::TextArea),
        ]
    }

    fn search_fields() -> Vec<SearchFieldOption> {
        vec![
            ("title", "Title"),
            ("assetName", "Asset"),
            ("maintenanceType", "Type"),
            ("supplier", "Supplier"),
        ]
    }

    fn default_sort() -> Option<(&'static str, SortDirection)> {
        Some(("startDate", SortDirection::Desc))
    }
}

#[component]
pub fn MaintenanceList() -> impl IntoView {
    list_page::<MaintenancesPage>()
}
