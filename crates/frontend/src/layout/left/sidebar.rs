//! Sidebar navigation between the list pages

use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use leptos::prelude::*;
use leptos_router::components::A;

#[derive(Clone, Debug, PartialEq)]
struct MenuItem {
    href: &'static str,
    label: &'static str,
    icon: &'static str,
    admin_only: bool,
}

fn menu_items() -> Vec<MenuItem> {
    vec![
        MenuItem { href: "/customers", label: "Customers", icon: "customers", admin_only: false },
        MenuItem { href: "/employees", label: "Employees", icon: "employees", admin_only: false },
        MenuItem { href: "/maintenances", label: "Maintenances", icon: "maintenance", admin_only: false },
        MenuItem { href: "/warranties", label: "Warranties", icon: "warranty", admin_only: false },
        MenuItem { href: "/users", label: "Users", icon: "users", admin_only: true },
    ]
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let (auth_state, _) = use_auth();
    let is_admin = move || {
        auth_state.with(|s| s.user_info.as_ref().map(|u| u.is_admin()).unwrap_or(false))
    };

    view! {
        <nav class="sidebar">
            {move || {
                let admin = is_admin();
                menu_items()
                    .into_iter()
                    .filter(|item| admin || !item.admin_only)
                    .map(|item| view! {
                        <A href=item.href attr:class="sidebar__item">
                            <span class="sidebar__icon">{icon(item.icon)}</span>
                            <span class="sidebar__label">{item.label}</span>
                        </A>
                    })
                    .collect_view()
            }}
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_users_page_is_admin_only() {
        let admin_only: Vec<_> = menu_items()
            .into_iter()
            .filter(|i| i.admin_only)
            .map(|i| i.href)
            .collect();
        assert_eq!(admin_only, vec!["/users"]);
    }
}
