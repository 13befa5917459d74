use contracts::shared::dropdown::kinds;
use contracts::shared::list::SortDirection;
use contracts::system::users::User;
use leptos::prelude::*;

use crate::shared::date_utils::format_datetime;
use crate::shared::export::CsvExportable;
use crate::shared::list_page::{list_page, or_dash, Column, EntityPage, FieldKind, FormField};
use crate::shared::list_utils::SearchFieldOption;
use crate::system::auth::guard::RequireAdmin;

fn status_label(user: &User) -> String {
    if user.is_active { "Active" } else { "Inactive" }.to_string()
}

fn last_login_label(user: &User) -> String {
    user.last_login_at
        .as_deref()
        .map(format_datetime)
        .unwrap_or_else(|| "Never".to_string())
}

impl CsvExportable for User {
    fn headers() -> Vec<&'static str> {
        vec!["Full name", "Email", "Phone", "Role", "Status", "Last login"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.full_name.clone(),
            self.email.clone(),
            self.phone.clone().unwrap_or_default(),
            self.role.clone(),
            status_label(self),
            self.last_login_at.clone().unwrap_or_default(),
        ]
    }
}

pub struct UsersPage;

impl EntityPage for UsersPage {
    type Entity = User;

    const TITLE: &'static str = "Users";
    const SINGULAR: &'static str = "User";

    fn columns() -> Vec<Column<User>> {
        vec![
            Column::sortable("fullName", "Full name", |u: &User| u.full_name.clone()).width(180.0),
            Column::sortable("email", "Email", |u: &User| u.email.clone()).width(180.0),
            Column::plain("Phone", |u: &User| or_dash(&u.phone)),
            Column::sortable("role", "Role", |u: &User| u.role.clone()).width(90.0),
            Column::sortable("isActive", "Status", status_label).width(80.0),
            Column::sortable("lastLoginAt", "Last login", last_login_label),
        ]
    }

    fn form_fields() -> Vec<FormField> {
        vec![
            FormField::new("full_name", "Full name", FieldKind::Text).required(),
            FormField::new("email", "Email", FieldKind::Email).required(),
            FormField::new("phone", "Phone", FieldKind::Phone),
            FormField::new("role", "Role", FieldKind::Dropdown(kinds::USER_ROLE)).required(),
            FormField::new("password", "Password", FieldKind::Password)
                .required()
                .create_only(),
        ]
    }

    fn search_fields() -> Vec<SearchFieldOption> {
        vec![("fullName", "Full name"), ("email", "Email"), ("role", "Role")]
    }

    fn default_sort() -> Option<(&'static str, SortDirection)> {
        Some(("fullName", SortDirection::Asc))
    }
}

#[component]
pub fn UserList() -> impl IntoView {
    view! {
        <RequireAdmin>
            {list_page::<UsersPage>()}
        </RequireAdmin>
    }
}
