use contracts::domain::a004_warranty::Warranty;
use contracts::shared::dropdown::kinds;
use contracts::shared::list::SortDirection;
use leptos::prelude::*;

use crate::shared::date_utils::{format_date, format_money, today_iso};
use crate::shared::export::CsvExportable;
use crate::shared::list_page::{list_page, or_dash, Column, EntityPage, FieldKind, FormField};
use crate::shared::list_utils::SearchFieldOption;

impl CsvExportable for Warranty {
    fn headers() -> Vec<&'static str> {
        vec!["Asset", "Provider", "Type", "Start date", "End date", "Cost", "Notes"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.asset_name.clone().unwrap_or_else(|| self.asset_id.clone()),
            self.provider.clone(),
            self.warranty_type.clone().unwrap_or_default(),
            self.start_date.clone(),
            self.end_date.clone(),
            self.cost.map(|c| format!("{:.2}", c)).unwrap_or_default(),
            self.notes.clone().unwrap_or_default(),
        ]
    }
}

fn end_date_label(w: &Warranty, today: &str) -> String {
    let date = format_date(&w.end_date);
    if w.is_expired_on(today) {
        format!("{} (expired)", date)
    } else {
        date
    }
}

pub struct WarrantiesPage;

impl EntityPage for WarrantiesPage {
    type Entity = Warranty;

    const TITLE: &'static str = "Warranties";
    const SINGULAR: &'static str = "Warranty";

    fn columns() -> Vec<Column<Warranty>> {
        vec![
            Column::sortable("assetName", "Asset", |w: &Warranty| {
                w.asset_name.clone().unwrap_or_else(|| w.asset_id.clone())
            })
            .width(160.0),
            Column::sortable("provider", "Provider", |w: &Warranty| w.provider.clone()),
            Column::plain("Type", |w: &Warranty| or_dash(&w.warranty_type)),
            Column::sortable("startDate", "Start", |w: &Warranty| format_date(&w.start_date)),
            Column::sortable("endDate", "End", |w: &Warranty| end_date_label(w, &today_iso())),
            Column::sortable("cost", "Cost", |w: &Warranty| format_money(w.cost)).width(90.0),
        ]
    }

    fn form_fields() -> Vec<FormField> {
        vec![
            FormField::new("asset_id", "Asset", FieldKind::Text).required(),
            FormField::new("provider", "Provider", FieldKind::Text).required(),
            FormField::new("warranty_type", "Warranty type", FieldKind::Dropdown(kinds::WARRANTY_TYPE)),
            FormField::new("start_date", "Start date", FieldKind::Date).required(),
            FormField::new("end_date", "End date", FieldKind::Date).required(),
            FormField::new("cost", "Cost", FieldKind::Number),
            FormField::new("notes", "Notes", FieldKind::TextArea),
        ]
    }

    fn search_fields() -> Vec<SearchFieldOption> {
        vec![("provider", "Provider"), ("assetName", "Asset"), ("warrantyType", "Type")]
    }

    fn default_sort() -> Option<(&'static str, SortDirection)> {
        Some(("endDate", SortDirection::Asc))
    }
}

#[component]
pub fn WarrantyList() -> impl IntoView {
    list_page::<WarrantiesPage>()
}
