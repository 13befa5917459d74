use contracts::domain::a002_person_employee::PersonEmployee;
use contracts::shared::dropdown::kinds;
use contracts::shared::list::SortDirection;
use leptos::prelude::*;

use crate::shared::export::CsvExportable;
use crate::shared::list_page::{list_page, or_dash, Column, EntityPage, FieldKind, FormField};
use crate::shared::list_utils::SearchFieldOption;

impl CsvExportable for PersonEmployee {
    fn headers() -> Vec<&'static str> {
        vec![
            "First name",
            "Last name",
            "Email",
            "Phone",
            "Employee number",
            "Department",
            "Job title",
            "Location",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.phone.clone().unwrap_or_default(),
            self.employee_number.clone().unwrap_or_default(),
            self.department.clone().unwrap_or_default(),
            self.job_title.clone().unwrap_or_default(),
            self.location_name
                .clone()
                .or_else(|| self.location_id.clone())
                .unwrap_or_default(),
        ]
    }
}

pub struct PersonsPage;

impl EntityPage for PersonsPage {
    type Entity = PersonEmployee;

    const TITLE: &'static str = "Employees";
    const SINGULAR: &'static str = "Employee";

    fn columns() -> Vec<Column<PersonEmployee>> {
        vec![
            Column::sortable("lastName", "Name", |p: &PersonEmployee| p.full_name()).width(180.0),
            Column::sortable("email", "Email", |p: &PersonEmployee| p.email.clone()).width(180.0),
            Column::plain("Phone", |p: &PersonEmployee| or_dash(&p.phone)),
            Column::sortable("employeeNumber", "No.", |p: &PersonEmployee| or_dash(&p.employee_number))
                .width(80.0),
            Column::sortable("department", "Department", |p: &PersonEmployee| or_dash(&p.department)),
            Column::plain("Job title", |p: &PersonEmployee| or_dash(&p.job_title)),
            Column::plain("Location", |p: &PersonEmployee| or_dash(&p.location_name)),
        ]
    }

    fn form_fields() -> Vec<FormField> {
        vec![
            FormField::new("first_name", "First name", FieldKind::Text).required(),
            FormField::new("last_name", "Last name", FieldKind::Text).required(),
            FormField::new("email", "Email", FieldKind::Email).required(),
            FormField::new("phone", "Phone", FieldKind::Phone),
            FormField::new("employee_number", "Employee number", FieldKind::Text),
            FormField::new("department", "Department", FieldKind::Dropdown(kinds::DEPARTMENT)),
            FormField::new("job_title", "Job title", FieldKind::Text),
            FormField::new("location_id", "Location", FieldKind::Dropdown(kinds::SITE)),
        ]
    }

    fn search_fields() -> Vec<SearchFieldOption> {
        vec![
            ("firstName", "First name"),
            ("lastName", "Last name"),
            ("email", "Email"),
            ("employeeNumber", "Employee number"),
            ("department", "Department"),
        ]
    }

    fn default_sort() -> Option<(&'static str, SortDirection)> {
        Some(("lastName", SortDirection::Asc))
    }
}

#[component]
pub fn PersonEmployeeList() -> impl IntoView {
    list_page::<PersonsPage>()
}
