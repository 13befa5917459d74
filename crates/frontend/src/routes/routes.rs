use crate::domain::a001_customer::ui::list::CustomerList;
use crate::domain::a002_person_employee::ui::list::PersonEmployeeList;
use crate::domain::a003_maintenance::ui::list::MaintenanceList;
use crate::domain::a004_warranty::ui::list::WarrantyList;
use crate::layout::left::Sidebar;
use crate::layout::Shell;
use crate::system::auth::context::use_auth;
use crate::system::pages::login::LoginPage;
use crate::system::users::ui::list::UserList;
use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

#[component]
fn PageRoutes() -> impl IntoView {
    view! {
        <Routes fallback=|| view! { <div class="alert alert--error">"Page not found"</div> }>
            <Route path=path!("/") view=|| view! { <Redirect path="/customers" /> } />
            <Route path=path!("/customers") view=CustomerList />
            <Route path=path!("/employees") view=PersonEmployeeList />
            <Route path=path!("/maintenances") view=MaintenanceList />
            <Route path=path!("/warranties") view=WarrantyList />
            <Route path=path!("/users") view=UserList />
        </Routes>
    }
}

#[component]
fn MainLayout() -> impl IntoView {
    view! {
        <Shell
            left=|| view! { <Sidebar /> }.into_any()
            center=|| view! { <PageRoutes /> }.into_any()
        />
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Router>
            <Show
                when=move || auth_state.with(|s| s.access_token.is_some())
                fallback=|| view! { <LoginPage /> }
            >
                <MainLayout />
            </Show>
        </Router>
    }
}
