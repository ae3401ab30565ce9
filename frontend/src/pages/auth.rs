use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::app::use_app;
use crate::backend::auth::{self, SignUpOutcome};
use crate::backend::Session;
use crate::model::ValidationError;
use crate::ui::form::{form_error, TextField, PRIMARY_BUTTON};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Login,
    SignUp,
    /// Sign-up went through but the address has to be confirmed first.
    CheckEmail,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl AuthForm {
    pub fn validate_login(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::Required("Email"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::Required("Password"));
        }
        Ok(())
    }

    pub fn validate_signup(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::Required("Nama lengkap"));
        }
        self.validate_login()?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

#[derive(Properties, PartialEq)]
pub struct AuthPageProps {
    pub on_session: Callback<Session>,
}

#[function_component(AuthPage)]
pub fn auth_page(props: &AuthPageProps) -> Html {
    let ctx = use_app();
    let mode = use_state(|| Mode::Login);
    let form = use_state(AuthForm::default);
    let error = use_state(|| None::<String>);
    let busy = use_state(|| false);

    let field = |apply: fn(&mut AuthForm, String)| {
        let form = form.clone();
        Callback::from(move |value: String| {
            let mut next = (*form).clone();
            apply(&mut next, value);
            form.set(next);
        })
    };

    let on_submit = {
        let ctx = ctx.clone();
        let mode = mode.clone();
        let form = form.clone();
        let error = error.clone();
        let busy = busy.clone();
        let on_session = props.on_session.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let is_login = *mode == Mode::Login;
            let values = (*form).clone();
            let checked = if is_login {
                values.validate_login()
            } else {
                values.validate_signup()
            };
            if let Err(err) = checked {
                error.set(Some(err.to_string()));
                return;
            }

            busy.set(true);
            error.set(None);
            let ctx = ctx.clone();
            let mode = mode.clone();
            let error = error.clone();
            let busy = busy.clone();
            let on_session = on_session.clone();
            spawn_local(async move {
                let config = ctx.backend.config().clone();
                let email = values.email.trim().to_string();
                if is_login {
                    match auth::sign_in(&config, &email, &values.password).await {
                        Ok(session) => {
                            ctx.success("Berhasil masuk");
                            on_session.emit(session);
                        }
                        Err(err) => {
                            log::warn!("sign-in failed: {}", err);
                            error.set(Some(err.user_message()));
                        }
                    }
                } else {
                    match auth::sign_up(&config, &email, &values.password, values.full_name.trim()).await {
                        Ok(SignUpOutcome::SignedIn(session)) => {
                            ctx.success("Akun berhasil dibuat");
                            on_session.emit(session);
                        }
                        Ok(SignUpOutcome::ConfirmationRequired) => {
                            log::info!("sign-up for {} awaits email confirmation", email);
                            mode.set(Mode::CheckEmail);
                        }
                        Err(err) => {
                            log::warn!("sign-up failed: {}", err);
                            error.set(Some(err.user_message()));
                        }
                    }
                }
                busy.set(false);
            });
        })
    };

    let switch_to = |target: Mode| {
        let mode = mode.clone();
        let error = error.clone();
        Callback::from(move |_| {
            error.set(None);
            mode.set(target);
        })
    };

    if *mode == Mode::CheckEmail {
        return html! {
            <div class="min-h-screen flex items-center justify-center bg-background">
                <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8 text-center space-y-4">
                    <h1 class="text-2xl font-bold text-foreground">{"Cek email Anda"}</h1>
                    <p class="text-sm text-muted-foreground">
                        { format!("Kami telah mengirim tautan konfirmasi ke {}. Buka tautan tersebut lalu masuk kembali.", form.email.trim()) }
                    </p>
                    <button class={PRIMARY_BUTTON} onclick={switch_to(Mode::Login)}>{"Kembali ke halaman masuk"}</button>
                </div>
            </div>
        };
    }

    let is_login = *mode == Mode::Login;
    html! {
        <div class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-foreground">{ if is_login { "Selamat datang" } else { "Buat akun" } }</h1>
                    <p class="text-sm text-muted-foreground mt-2">
                        { if is_login { "Masuk untuk melanjutkan." } else { "Mulai kelola keuangan bisnis Anda." } }
                    </p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    if !is_login {
                        <TextField label="Nama Lengkap" value={form.full_name.clone()} required=true
                            on_input={field(|f, v| f.full_name = v)} />
                    }
                    <TextField label="Email" kind="email" value={form.email.clone()} required=true
                        on_input={field(|f, v| f.email = v)} />
                    <TextField label="Password" kind="password" value={form.password.clone()} required=true
                        on_input={field(|f, v| f.password = v)} />
                    if !is_login {
                        <TextField label="Konfirmasi Password" kind="password" value={form.confirm_password.clone()} required=true
                            on_input={field(|f, v| f.confirm_password = v)} />
                    }

                    { form_error(&error) }

                    <button type="submit" class={classes!(PRIMARY_BUTTON, "w-full", "justify-center")} disabled={*busy}>
                        { if *busy { "Mohon tunggu..." } else if is_login { "Masuk" } else { "Daftar" } }
                    </button>
                </form>

                <div class="mt-6 text-center text-sm text-muted-foreground">
                    { if is_login { "Belum punya akun?" } else { "Sudah punya akun?" } }
                    <button class="ml-2 text-[#173E63] font-semibold"
                        onclick={switch_to(if is_login { Mode::SignUp } else { Mode::Login })}>
                        { if is_login { "Daftar" } else { "Masuk" } }
                    </button>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn form(name: &str, email: &str, password: &str, confirm: &str) -> AuthForm {
        AuthForm {
            full_name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[rstest]
    #[case(form("", "", "secret", ""), Err(ValidationError::Required("Email")))]
    #[case(form("", "a@b.c", "", ""), Err(ValidationError::Required("Password")))]
    #[case(form("", "a@b.c", "short", ""), Ok(()))]
    fn login_needs_email_and_password(#[case] input: AuthForm, #[case] expected: Result<(), ValidationError>) {
        assert_eq!(input.validate_login(), expected);
    }

    #[rstest]
    #[case(form(" ", "a@b.c", "password1", "password1"), Err(ValidationError::Required("Nama lengkap")))]
    #[case(form("Ani", "a@b.c", "pass", "pass"), Err(ValidationError::PasswordTooShort))]
    #[case(form("Ani", "a@b.c", "password1", "password2"), Err(ValidationError::PasswordMismatch))]
    #[case(form("Ani", "a@b.c", "password1", "password1"), Ok(()))]
    fn signup_rules(#[case] input: AuthForm, #[case] expected: Result<(), ValidationError>) {
        assert_eq!(input.validate_signup(), expected);
    }

    #[test]
    fn password_length_counts_characters() {
        assert!(form("Ani", "a@b.c", "ééééééé", "ééééééé").validate_signup().is_err());
        assert!(form("Ani", "a@b.c", "éééééééé", "éééééééé").validate_signup().is_ok());
    }
}
