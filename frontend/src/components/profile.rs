use leptos::prelude::*;
use leptos::task::spawn_local;
use taskdeck_shared::User;

use crate::actions::submit_profile;
use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::field::TextField;
use crate::components::nav::NavBar;
use crate::components::notice::{Notice, NoticeToast};
use crate::error::SubmitError;
use crate::validation::{FieldErrors, ProfileForm, field};

/// 仅当输入框仍是挂载时的预填值时才替换为服务端的值
fn refreshed_value(current: &str, seeded: &str, server: &str) -> Option<String> {
    (current == seeded && current != server).then(|| server.to_string())
}

fn refresh_input(input: RwSignal<String>, seeded: &str, server: &str) {
    if let Some(value) = input
        .try_with_untracked(|current| refreshed_value(current, seeded, server))
        .flatten()
    {
        input.try_set(value);
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let notice = RwSignal::new(Option::<Notice>::None);
    let (is_submitting, set_is_submitting) = signal(false);

    let fill = move |user: &User| {
        name.try_set(user.name.clone());
        email.try_set(user.email.clone());
    };

    if let Some(user) = auth.state.with_untracked(|s| s.user().cloned()) {
        fill(&user);
    }

    // 挂载时以服务端数据为准刷新会话中的用户；用户已开始编辑的输入框保持不动
    {
        let api = api.clone();
        let seeded_name = name.get_untracked();
        let seeded_email = email.get_untracked();
        spawn_local(async move {
            match api.get_profile().await {
                Ok(user) => {
                    refresh_input(name, &seeded_name, &user.name);
                    refresh_input(email, &seeded_email, &user.email);
                    auth.update_user(user);
                }
                Err(e) if e.is_unauthorized() => {}
                Err(e) => {
                    log::warn!("failed to load profile: {}", e);
                    notice.try_set(Some(Notice::error(e.user_message("Failed to load profile"))));
                }
            }
        });
    }

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = ProfileForm {
            name: name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
        };

        if let Err(field_errors) = form.validate() {
            errors.set(field_errors);
            return;
        }
        errors.set(FieldErrors::new());
        set_is_submitting.set(true);

        let api = api.clone();
        spawn_local(async move {
            match submit_profile(&api, &form).await {
                Ok(user) => {
                    fill(&user);
                    auth.update_user(user);
                    password.try_set(String::new());
                    confirm_password.try_set(String::new());
                    notice.try_set(Some(Notice::success("Profile updated successfully")));
                }
                Err(SubmitError::Invalid(field_errors)) => {
                    errors.try_set(field_errors);
                }
                Err(SubmitError::Api(e)) => {
                    log::warn!("profile update failed: {}", e);
                    notice.try_set(Some(Notice::error(e.user_message("Failed to update profile"))));
                }
            }
            set_is_submitting.try_set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-3xl mx-auto space-y-8">
                <NoticeToast notice=notice />
                <NavBar />

                <div class="card bg-base-100 shadow-xl">
                    <form class="card-body" on:submit=on_submit novalidate>
                        <h2 class="card-title">"Profile"</h2>
                        <p class="text-base-content/70 text-sm">
                            "Update your details. Leave the password blank to keep the current one."
                        </p>

                        <TextField name=field::NAME label="Name" autocomplete="name" value=name errors=errors />
                        <TextField
                            name=field::EMAIL
                            label="Email"
                            input_type="email"
                            autocomplete="email"
                            value=email
                            errors=errors
                        />
                        <TextField
                            name=field::PASSWORD
                            label="New password"
                            input_type="password"
                            autocomplete="new-password"
                            value=password
                            errors=errors
                        />
                        <TextField
                            name=field::CONFIRM_PASSWORD
                            label="Confirm new password"
                            input_type="password"
                            autocomplete="new-password"
                            value=confirm_password
                            errors=errors
                        />

                        <div class="card-actions justify-end mt-4">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                <Show when=move || is_submitting.get()>
                                    <span class="loading loading-spinner"></span>
                                </Show>
                                "Save changes"
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_input_takes_server_value() {
        assert_eq!(
            refreshed_value("Ada", "Ada", "Ada Lovelace").as_deref(),
            Some("Ada Lovelace")
        );
    }

    #[test]
    fn test_edited_input_is_kept() {
        assert_eq!(refreshed_value("Countess", "Ada", "Ada Lovelace"), None);
    }

    #[test]
    fn test_unchanged_server_value_is_a_no_op() {
        assert_eq!(refreshed_value("Ada", "Ada", "Ada"), None);
    }

    #[test]
    fn test_refresh_input_respects_edits() {
        let owner = Owner::new();
        owner.set();

        let typed = RwSignal::new("Countess".to_string());
        refresh_input(typed, "Ada", "Ada Lovelace");
        assert_eq!(typed.get_untracked(), "Countess");

        let untouched = RwSignal::new("Ada".to_string());
        refresh_input(untouched, "Ada", "Ada Lovelace");
        assert_eq!(untouched.get_untracked(), "Ada Lovelace");
    }
}
