use yew::prelude::*;
use yew_router::prelude::*;

use crate::{request, utils, validate, Route};

#[function_component(ResetPassword)]
pub fn reset_password() -> Html {
    let email = use_state(String::new);
    let message = use_state(|| None::<String>);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let onsubmit = {
        let email = email.clone();
        let message = message.clone();
        let error = error.clone();
        let loading = loading.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *loading {
                return;
            }
            message.set(None);
            error.set(None);

            let address = email.trim().to_string();
            if !validate::valid_email(&address) {
                error.set(Some("Please enter a valid email address.".to_string()));
                return;
            }

            loading.set(true);
            let message = message.clone();
            let error = error.clone();
            let loading = loading.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match request::reset_password(&address).await {
                    Ok(()) => {
                        message.set(Some(
                            "Check your email for a password reset link.".to_string(),
                        ));
                    }
                    Err(err) => {
                        log::error!("password reset failed: {err}");
                        error.set(Some(err.to_string()));
                    }
                }
                loading.set(false);
            });
        })
    };

    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| email.set(utils::input_value(&e)))
    };

    html! {
        <div class="page-center">
            <div class="card">
                <h2>{"Reset Password"}</h2>

                <form {onsubmit}>
                    <div class="form-field">
                        <input type="email" placeholder="Enter your email"
                            value={(*email).clone()} oninput={on_email} />
                    </div>
                    <button type="submit" class="btn btn-primary" disabled={*loading}>
                        { if *loading { "Sending…" } else { "Send Reset Link" } }
                    </button>
                </form>

                if let Some(text) = &*message {
                    <div class="banner banner-success">{text}</div>
                }
                if let Some(text) = &*error {
                    <div class="banner banner-error">{text}</div>
                }

                <div class="card-footer">
                    <Link<Route> to={Route::Login}>{"Back to Login"}</Link<Route>>
                </div>
            </div>
        </div>
    }
}
