use contracts::domain::a001_customer::Customer;
use contracts::shared::dropdown::kinds;
use contracts::shared::list::SortDirection;
use leptos::prelude::*;

use crate::shared::date_utils::format_date;
use crate::shared::export::CsvExportable;
use crate::shared::list_page::{list_page, or_dash, Column, EntityPage, FieldKind, FormField};
use crate::shared::list_utils::SearchFieldOption;

impl CsvExportable for Customer {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Email", "Phone", "Company", "Address", "Site", "Notes", "Created"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.phone.clone().unwrap_or_default(),
            self.company.clone().unwrap_or_default(),
            self.address.clone().unwrap_or_default(),
            self.site_name.clone().or_else(|| self.site_id.clone()).unwrap_or_default(),
            self.notes.clone().unwrap_or_default(),
            self.created_at.as_deref().map(format_date).unwrap_or_default(),
        ]
    }
}

pub struct CustomersPage;

impl EntityPage for CustomersPage {
    type Entity = Customer;

    const TITLE: &'static str = "Customers";
    const SINGULAR: &'static str = "Customer";

    fn columns() -> Vec<Column<Customer>> {
        vec![
            Column::sortable("name", "Name", |c: &Customer| c.name.clone()).width(180.0),
            Column::sortable("email", "Email", |c: &Customer| c.email.clone()).width(180.0),
            Column::plain("Phone", |c: &Customer| or_dash(&c.phone)),
            Column::sortable("company", "Company", |c: &Customer| or_dash(&c.company)),
            Column::plain("Site", |c: &Customer| or_dash(&c.site_name)),
            Column::sortable("createdAt", "Created", |c: &Customer| {
                c.created_at.as_deref().map(format_date).unwrap_or_else(|| "-".to_string())
            }),
        ]
    }

    fn form_fields() -> Vec<FormField> {
        vec![
            FormField::new("name", "Name", FieldKind::Text).required(),
            FormField::new("email", "Email", FieldKind::Email).required(),
            FormField::new("phone", "Phone", FieldKind::Phone),
            FormField::new("company", "Company", FieldKind::Text),
            FormField::new("address", "Address", FieldKind::Text),
            FormField::new("site_id", "Site", FieldKind::Dropdown(kinds::SITE)),
            FormField::new("notes", "Notes", FieldKind::TextArea),
        ]
    }

    fn search_fields() -> Vec<SearchFieldOption> {
        vec![("name", "Name"), ("email", "Email"), ("company", "Company"), ("phone", "Phone")]
    }

    fn default_sort() -> Option<(&'static str, SortDirection)> {
        Some(("name", SortDirection::Asc))
    }
}

#[component]
pub fn CustomerList() -> impl IntoView {
    list_page::<CustomersPage>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::entity::{EntityDraft, FormMode};
    use contracts::domain::a001_customer::CustomerDraft;

    #[test]
    fn test_csv_row_matches_headers() {
        let customer = Customer {
            id: "c-1".into(),
            name: "Acme".into(),
            email: "ops@acme.io".into(),
            phone: None,
            company: Some("Acme Inc".into()),
            address: None,
            site_id: Some("s-1".into()),
            site_name: None,
            notes: None,
            created_at: Some("2024-03-15T10:00:00Z".into()),
        };
        let row = customer.to_csv_row();
        assert_eq!(row.len(), Customer::headers().len());
        assert_eq!(row[5], "s-1");
        assert_eq!(row[7], "15.03.2024");
    }

    #[test]
    fn test_form_fields_exist_in_draft() {
        let draft = CustomerDraft::default();
        for field in CustomersPage::form_fields() {
            assert!(draft.field(field.name).is_some(), "unknown field {}", field.name);
        }
        // every validated field is on the form
        for rule in CustomerDraft::rules(FormMode::Creating) {
            assert!(CustomersPage::form_fields().iter().any(|f| f.name == rule.field));
        }
    }
}
