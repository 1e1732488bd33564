use common::req::Credentials;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::error::FetchError;
use crate::session::{self, Session, SessionCtx, SessionEvent};
use crate::{request, utils, validate, Route};

/// Entry point of the app: email/password sign-in.
///
/// Validation runs before any network call; backend rejections land on
/// the password field the way the platform has always shown them.
#[function_component(Login)]
pub fn login() -> Html {
    let ctx = use_context::<SessionCtx>().expect("session context");
    let navigator = use_navigator().expect("navigator");

    let email = use_state(String::new);
    let password = use_state(String::new);
    let email_error = use_state(|| None::<String>);
    let password_error = use_state(|| None::<String>);
    let global_error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let onsubmit = {
        let ctx = ctx.clone();
        let navigator = navigator.clone();
        let email = email.clone();
        let password = password.clone();
        let email_error = email_error.clone();
        let password_error = password_error.clone();
        let global_error = global_error.clone();
        let loading = loading.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *loading {
                return;
            }

            let address = email.trim().to_string();
            let secret = (*password).clone();

            email_error.set(
                (!validate::valid_email(&address))
                    .then(|| "Please enter a valid email address.".to_string()),
            );
            password_error
                .set(secret.is_empty().then(|| "Please enter your password.".to_string()));
            global_error.set(None);
            if !validate::valid_email(&address) || secret.is_empty() {
                return;
            }

            loading.set(true);
            let ctx = ctx.clone();
            let navigator = navigator.clone();
            let password_error = password_error.clone();
            let global_error = global_error.clone();
            let loading = loading.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let credentials = Credentials {
                    email: address,
                    password: secret,
                };
                match request::login(&credentials).await {
                    Ok(resp) => {
                        let session = Session::from_auth(resp);
                        ctx.onchange.emit(SessionEvent::LoggedIn(session));
                        let target =
                            session::post_login_target(session::take_requested_path());
                        navigator.push(&Route::recognize(&target).unwrap_or(Route::Dashboard));
                    }
                    Err(FetchError::Api { detail, .. }) => {
                        password_error.set(Some(detail));
                        loading.set(false);
                    }
                    Err(err) => {
                        log::error!("login failed: {err}");
                        global_error
                            .set(Some("Something went wrong. Please try again.".to_string()));
                        loading.set(false);
                    }
                }
            });
        })
    };

    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| email.set(utils::input_value(&e)))
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| password.set(utils::input_value(&e)))
    };

    html! {
        <div class="page-center">
            <div class="card">
                <h2>{"Sign in to your account"}</h2>

                <form {onsubmit}>
                    <div class="form-field">
                        <label for="email">{"Email address"}</label>
                        <input id="email" type="email" placeholder="you@example.com"
                            value={(*email).clone()} oninput={on_email} />
                        if let Some(message) = &*email_error {
                            <p class="field-error">{message}</p>
                        }
                    </div>

                    <div class="form-field">
                        <div class="form-field-row">
                            <label for="password">{"Password"}</label>
                            <Link<Route> to={Route::ResetPassword}>{"Forgot password?"}</Link<Route>>
                        </div>
                        <input id="password" type="password" placeholder="••••••••"
                            value={(*password).clone()} oninput={on_password} />
                        if let Some(message) = &*password_error {
                            <p class="field-error">{message}</p>
                        }
                    </div>

                    <button type="submit" class="btn btn-primary" disabled={*loading}>
                        { if *loading { "Signing in…" } else { "Sign in" } }
                    </button>
                </form>

                if let Some(message) = &*global_error {
                    <div class="banner banner-error">{message}</div>
                }

                <div class="card-footer">
                    {"Don't have an account? "}
                    <Link<Route> to={Route::Register}>{"Register"}</Link<Route>>
                </div>
            </div>
        </div>
    }
}
