use common::req::RegisterRequest;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::session::{Session, SessionCtx, SessionEvent};
use crate::{request, utils, validate, Route};

#[function_component(Register)]
pub fn register() -> Html {
    let ctx = use_context::<SessionCtx>().expect("session context");
    let navigator = use_navigator().expect("navigator");

    let name = use_state(String::new);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let onsubmit = {
        let ctx = ctx.clone();
        let navigator = navigator.clone();
        let name = name.clone();
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let loading = loading.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *loading {
                return;
            }
            error.set(None);

            if name.trim().is_empty() {
                error.set(Some("Please enter your name.".to_string()));
                return;
            }
            if !validate::valid_email(email.trim()) {
                error.set(Some("Please enter a valid email address.".to_string()));
                return;
            }
            if !validate::valid_password(&password) {
                error.set(Some(format!(
                    "Password must be at least {} characters long.",
                    validate::MIN_PASSWORD_LEN
                )));
                return;
            }

            loading.set(true);
            let payload = RegisterRequest {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                password: (*password).clone(),
            };
            let ctx = ctx.clone();
            let navigator = navigator.clone();
            let error = error.clone();
            let loading = loading.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match request::register(&payload).await {
                    Ok(resp) => {
                        ctx.onchange
                            .emit(SessionEvent::LoggedIn(Session::from_auth(resp)));
                        navigator.push(&Route::Dashboard);
                    }
                    Err(err) => {
                        log::error!("registration failed: {err}");
                        error.set(Some(err.to_string()));
                        loading.set(false);
                    }
                }
            });
        })
    };

    let on_name = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| name.set(utils::input_value(&e)))
    };
    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| email.set(utils::input_value(&e)))
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| password.set(utils::input_value(&e)))
    };

    let strength = validate::password_strength(&password);

    html! {
        <div class="page-center">
            <div class="card">
                <h2>{"Register"}</h2>

                <form {onsubmit}>
                    <div class="form-field">
                        <input type="text" placeholder="Name"
                            value={(*name).clone()} oninput={on_name} />
                    </div>
                    <div class="form-field">
                        <input type="email" placeholder="Email"
                            value={(*email).clone()} oninput={on_email} />
                    </div>
                    <div class="form-field">
                        <input type="password" placeholder="Password"
                            value={(*password).clone()} oninput={on_password} />
                        <p class="muted">
                            {"Password strength: "}<strong>{strength.label()}</strong>
                        </p>
                    </div>

                    <button type="submit" class="btn btn-primary" disabled={*loading}>
                        { if *loading { "Registering…" } else { "Register" } }
                    </button>
                </form>

                if let Some(message) = &*error {
                    <div class="banner banner-error">{message}</div>
                }

                <div class="card-footer">
                    <Link<Route> to={Route::Login}>{"Already have an account? Login"}</Link<Route>>
                </div>
            </div>
        </div>
    }
}
