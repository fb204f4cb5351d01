use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::actions::submit_login;
use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::field::TextField;
use crate::error::SubmitError;
use crate::validation::{FieldErrors, LoginForm, field};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = LoginForm {
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        set_error_msg.set(None);

        if let Err(field_errors) = form.validate() {
            errors.set(field_errors);
            return;
        }
        errors.set(FieldErrors::new());
        set_is_submitting.set(true);

        let api = api.clone();
        spawn_local(async move {
            match submit_login(&api, &form).await {
                Ok(session) => {
                    auth.login(session);
                    router.navigate(AppRoute::auth_success_redirect().to_path());
                }
                Err(SubmitError::Invalid(field_errors)) => {
                    errors.try_set(field_errors);
                }
                Err(SubmitError::Api(e)) => {
                    log::warn!("login failed: {}", e);
                    set_error_msg.try_set(Some(e.user_message("Login failed. Please try again.")));
                }
            }
            set_is_submitting.try_set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"TaskDeck"</h1>
                    <p class="text-base-content/70">"Sign in to manage your tasks"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                                <button type="button" class="btn btn-ghost btn-xs" on:click=move |_| set_error_msg.set(None)>"✕"</button>
                            </div>
                        </Show>

                        <TextField
                            name=field::EMAIL
                            label="Email"
                            input_type="email"
                            placeholder="you@example.com"
                            autocomplete="email"
                            value=email
                            errors=errors
                        />
                        <TextField
                            name=field::PASSWORD
                            label="Password"
                            input_type="password"
                            placeholder="••••••••"
                            autocomplete="current-password"
                            value=password
                            errors=errors
                        />

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>

                        <p class="text-sm text-center mt-2">
                            "No account yet? "
                            <Link to=AppRoute::Signup class="link link-primary">"Create one"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
