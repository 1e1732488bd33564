mod components;
mod csv;
mod error;
mod request;
mod session;
mod telemetry;
mod utils;
mod validate;

use yew::prelude::*;
use yew_router::prelude::*;

use components::guards::{RequireAdmin, RequireAuth};
use session::{SessionCtx, SessionEvent};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Login,
    #[at("/register")]
    Register,
    #[at("/reset-password")]
    ResetPassword,
    #[at("/dashboard")]
    Dashboard,
    #[at("/admin/devices")]
    AdminDevices,
    #[at("/admin/users")]
    AdminUsers,
    #[at("/admin/organisations")]
    AdminOrganisations,
    #[not_found]
    #[at("/404")]
    NotFound,
}

#[function_component(App)]
fn app() -> Html {
    // the only mutators of the persisted identity are login and logout
    let session = use_state(session::load);

    let onchange = {
        let session = session.clone();
        Callback::from(move |event| match event {
            SessionEvent::LoggedIn(new_session) => {
                session::store(&new_session);
                session.set(Some(new_session));
            }
            SessionEvent::LoggedOut => {
                session::clear();
                session.set(None);
            }
        })
    };

    let ctx = SessionCtx {
        session: (*session).clone(),
        onchange,
    };

    html! {
        <ContextProvider<SessionCtx> context={ctx}>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<SessionCtx>>
    }
}

#[function_component(Navbar)]
fn navbar() -> Html {
    let ctx = use_context::<SessionCtx>().expect("session context");
    let navigator = use_navigator().expect("navigator");

    let onlogout = {
        let onchange = ctx.onchange.clone();
        Callback::from(move |_: MouseEvent| {
            onchange.emit(SessionEvent::LoggedOut);
            navigator.push(&Route::Login);
        })
    };

    let (identity, is_admin) = match &ctx.session {
        Some(s) => (s.display_name().to_string(), s.is_admin()),
        None => (String::new(), false),
    };

    html! {
        <nav class="navbar">
            <span class="navbar-brand">{"Flowsight"}</span>
            <Link<Route> to={Route::Dashboard}>{"Dashboard"}</Link<Route>>
            if is_admin {
                <Link<Route> to={Route::AdminDevices}>{"Devices"}</Link<Route>>
                <Link<Route> to={Route::AdminUsers}>{"Users"}</Link<Route>>
                <Link<Route> to={Route::AdminOrganisations}>{"Organisations"}</Link<Route>>
            }
            <span class="navbar-identity">{identity}</span>
            <button class="btn" onclick={onlogout}>{"Logout"}</button>
        </nav>
    }
}

#[derive(Properties, PartialEq)]
struct PageProps {
    #[prop_or_default]
    children: Html,
}

#[function_component(Page)]
fn page(props: &PageProps) -> Html {
    html! {
        <>
            <Navbar />
            <div class="main">{props.children.clone()}</div>
        </>
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Login => html! { <components::login::Login /> },
        Route::Register => html! { <components::register::Register /> },
        Route::ResetPassword => html! { <components::reset_password::ResetPassword /> },
        Route::Dashboard => html! {
            <RequireAuth>
                <Page><components::dashboard::Dashboard /></Page>
            </RequireAuth>
        },
        Route::AdminDevices => html! {
            <RequireAdmin>
                <Page><components::admin_devices::AdminDevices /></Page>
            </RequireAdmin>
        },
        Route::AdminUsers => html! {
            <RequireAdmin>
                <Page><components::admin_users::AdminUsers /></Page>
            </RequireAdmin>
        },
        Route::AdminOrganisations => html! {
            <RequireAdmin>
                <Page><components::admin_orgs::AdminOrganisations /></Page>
            </RequireAdmin>
        },
        Route::NotFound => html! { <h1>{"404"}</h1> },
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
