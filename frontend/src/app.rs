use std::rc::Rc;

use gloo_timers::callback::Interval;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::backend::auth::{self, session_change};
use crate::backend::realtime::{self, ChangeEvent, ChangeKind};
use crate::backend::{AuthEvent, Backend, BackendError, Session};
use crate::config::BackendConfig;
use crate::model::{ValidationError, RECON_MISMATCH};
use crate::pages::{AuthPage, BankPage, ClientsPage, DashboardPage, FinancePage, InvoicePage, ReconPage, ReportsPage};
use crate::ui::icons::{
    icon_bank, icon_bar_chart, icon_check_circle, icon_file_text, icon_layout_grid, icon_users, icon_wallet,
};
use crate::ui::{Layout, LoadingOverlay, ToastAction, ToastKind, ToastMessage, ToastQueue, ToastStack};

/// How often a signed-in session is checked for expiry.
const SESSION_CHECK_MS: u32 = 30_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Clients,
    Bank,
    Finance,
    Invoice,
    Recon,
    Reports,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Dashboard,
        Page::Clients,
        Page::Bank,
        Page::Finance,
        Page::Invoice,
        Page::Recon,
        Page::Reports,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Clients => "Data Mitra",
            Page::Bank => "Bank",
            Page::Finance => "Keuangan",
            Page::Invoice => "Invoice",
            Page::Recon => "Rekonsiliasi",
            Page::Reports => "Laporan",
        }
    }

    pub fn icon(self) -> Html {
        match self {
            Page::Dashboard => icon_layout_grid(),
            Page::Clients => icon_users(),
            Page::Bank => icon_bank(),
            Page::Finance => icon_wallet(),
            Page::Invoice => icon_file_text(),
            Page::Recon => icon_check_circle(),
            Page::Reports => icon_bar_chart(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    Checking,
    Authenticated,
    Unauthenticated,
}

pub enum AuthAction {
    /// First look at the stored session after start-up.
    Checked(Option<Session>),
    Changed(Option<Session>),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub status: AuthStatus,
    pub session: Option<Session>,
    pub last_event: Option<AuthEvent>,
}

impl AuthState {
    fn user_id(&self) -> Option<String> {
        self.session.as_ref().map(|session| session.user.id.clone())
    }
}

impl Reducible for AuthState {
    type Action = AuthAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let (session, event) = match action {
            AuthAction::Checked(session) => {
                let event = session.as_ref().map(|_| AuthEvent::SignedIn);
                (session, event)
            }
            AuthAction::Changed(session) => {
                let Some(event) = session_change(self.session.as_ref(), session.as_ref()) else {
                    return self;
                };
                (session, Some(event))
            }
        };
        if let Some(event) = event {
            log::info!("auth state changed: {:?}", event);
        }
        let status = if session.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        };
        Rc::new(AuthState {
            status,
            session,
            last_event: event,
        })
    }
}

/// Per-table counters bumped by realtime events; pages list them as reload
/// dependencies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiveRevision {
    pub notifications: u32,
    pub invoices: u32,
    pub reconciliations: u32,
}

impl Reducible for LiveRevision {
    type Action = String;

    fn reduce(self: Rc<Self>, table: String) -> Rc<Self> {
        let mut next = *self;
        match table.as_str() {
            "notifications" => next.notifications = next.notifications.wrapping_add(1),
            "invoices" => next.invoices = next.invoices.wrapping_add(1),
            "reconciliations" => next.reconciliations = next.reconciliations.wrapping_add(1),
            _ => return self,
        }
        Rc::new(next)
    }
}

/// Toast raised for a pushed change. Mismatch notifications are already
/// announced by the page that saved the reconciliation.
pub fn change_toast(change: &ChangeEvent) -> Option<ToastMessage> {
    match (change.table.as_str(), change.kind) {
        ("notifications", ChangeKind::Insert) => {
            if change.field("type") == Some(RECON_MISMATCH) {
                return None;
            }
            Some(ToastMessage::new(
                ToastKind::Info,
                change.field("title").unwrap_or("Notifikasi baru"),
                change.field("message").unwrap_or_default(),
            ))
        }
        ("invoices", ChangeKind::Update) => {
            let before = change.old_record.get("status").and_then(Value::as_str)?;
            if change.field("status") != Some("paid") || before == "paid" {
                return None;
            }
            Some(ToastMessage::new(
                ToastKind::Success,
                "Invoice lunas",
                format!("{} telah dibayar", change.field("invoice_number").unwrap_or("Invoice")),
            ))
        }
        _ => None,
    }
}

/// Everything a page needs from the shell.
#[derive(Clone, PartialEq)]
pub struct AppContext {
    pub backend: Backend,
    pub live: LiveRevision,
    toasts: Callback<ToastMessage>,
    loading: Callback<Option<String>>,
    sign_out: Callback<()>,
    navigate: Callback<Page>,
}

impl AppContext {
    fn detached() -> Self {
        Self {
            backend: Backend::new(BackendConfig {
                url: String::new(),
                anon_key: String::new(),
            }),
            live: LiveRevision::default(),
            toasts: Callback::noop(),
            loading: Callback::noop(),
            sign_out: Callback::noop(),
            navigate: Callback::noop(),
        }
    }

    pub fn user_id(&self) -> Result<String, BackendError> {
        self.backend.user_id()
    }

    pub fn toast(&self, kind: ToastKind, title: impl Into<String>, message: impl Into<String>) {
        self.toasts.emit(ToastMessage::new(kind, title, message));
    }

    pub fn success(&self, title: impl Into<String>) {
        self.toast(ToastKind::Success, title, "");
    }

    /// Logs a failed backend call and shows it as an error toast.
    pub fn report(&self, action: &str, err: &BackendError) {
        log::error!("{}: {}", action, err);
        self.toast(ToastKind::Error, action, err.user_message());
    }

    pub fn invalid(&self, err: &ValidationError) {
        log::debug!("rejected form: {}", err);
        self.toast(ToastKind::Warning, "Periksa kembali isian", err.to_string());
    }

    pub fn show_loading(&self, message: &str) {
        self.loading.emit(Some(message.to_string()));
    }

    pub fn hide_loading(&self) {
        self.loading.emit(None);
    }

    pub fn sign_out(&self) {
        self.sign_out.emit(());
    }

    pub fn navigate(&self, page: Page) {
        self.navigate.emit(page);
    }
}

#[hook]
pub fn use_app() -> AppContext {
    use_context::<AppContext>().unwrap_or_else(|| {
        log::error!("component rendered outside the app context");
        AppContext::detached()
    })
}

fn page_view(page: Page) -> Html {
    match page {
        Page::Dashboard => html! { <DashboardPage /> },
        Page::Clients => html! { <ClientsPage /> },
        Page::Bank => html! { <BankPage /> },
        Page::Finance => html! { <FinancePage /> },
        Page::Invoice => html! { <InvoicePage /> },
        Page::Recon => html! { <ReconPage /> },
        Page::Reports => html! { <ReportsPage /> },
    }
}

fn status_screen(title: &str, detail: Option<String>) -> Html {
    html! {
        <div class="flex items-center justify-center h-screen bg-background">
            <div class="text-center space-y-2">
                <p class="text-[#173E63] font-semibold">{ title.to_string() }</p>
                if let Some(detail) = detail {
                    <p class="text-sm text-slate-500">{ detail }</p>
                }
            </div>
        </div>
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let base = use_memo(|_| BackendConfig::load().map(Backend::new), ());
    let auth_state = use_reducer(AuthState::default);
    let toasts = use_reducer(ToastQueue::default);
    let live = use_reducer(LiveRevision::default);
    let loading = use_state(|| None::<String>);
    let page = use_state(|| Page::Dashboard);

    let backend = match &*base {
        Ok(backend) => Some(backend.with_session(auth_state.session.clone())),
        Err(_) => None,
    };
    let user_id = auth_state.user_id();

    {
        let base = base.clone();
        let dispatcher = auth_state.dispatcher();
        use_effect_with_deps(
            move |_| {
                match &*base {
                    Ok(backend) => {
                        let config = backend.config().clone();
                        spawn_local(async move {
                            let session = match auth::get_session(&config).await {
                                Ok(session) => session,
                                Err(err) => {
                                    log::warn!("session check failed: {}", err);
                                    auth::stored_session()
                                }
                            };
                            dispatcher.dispatch(AuthAction::Checked(session));
                        });
                    }
                    Err(err) => log::error!("backend is not configured: {}", err),
                }
                || ()
            },
            (),
        );
    }

    {
        let base = base.clone();
        let dispatcher = auth_state.dispatcher();
        use_effect_with_deps(
            move |user_id: &Option<String>| {
                let interval = match (user_id, &*base) {
                    (Some(_), Ok(backend)) => {
                        let config = backend.config().clone();
                        Some(Interval::new(SESSION_CHECK_MS, move || {
                            let config = config.clone();
                            let dispatcher = dispatcher.clone();
                            spawn_local(async move {
                                match auth::get_session(&config).await {
                                    Ok(session) => dispatcher.dispatch(AuthAction::Changed(session)),
                                    Err(err) => log::warn!("session refresh failed: {}", err),
                                }
                            });
                        }))
                    }
                    _ => None,
                };
                move || drop(interval)
            },
            user_id.clone(),
        );
    }

    {
        let backend = backend.clone();
        let toasts = toasts.dispatcher();
        let live = live.dispatcher();
        use_effect_with_deps(
            move |user_id: &Option<String>| {
                let mut subscription = None;
                if let (Some(user_id), Some(backend)) = (user_id, backend) {
                    {
                        let backend = backend.clone();
                        spawn_local(async move {
                            if let Err(err) = auth::ensure_user_record(&backend).await {
                                log::error!("could not prepare user record: {}", err);
                            }
                        });
                    }
                    let on_change = move |change: ChangeEvent| {
                        if let Some(toast) = change_toast(&change) {
                            toasts.dispatch(ToastAction::Push(toast));
                        }
                        live.dispatch(change.table);
                    };
                    match realtime::subscribe(&backend, realtime::user_channels(user_id), on_change) {
                        Ok(handle) => subscription = Some(handle),
                        Err(err) => log::warn!("realtime unavailable: {}", err),
                    }
                }
                move || drop(subscription)
            },
            user_id.clone(),
        );
    }

    let push_toast = {
        let toasts = toasts.dispatcher();
        Callback::from(move |toast: ToastMessage| toasts.dispatch(ToastAction::Push(toast)))
    };
    let dismiss_toast = {
        let toasts = toasts.dispatcher();
        Callback::from(move |id: u32| toasts.dispatch(ToastAction::Dismiss(id)))
    };
    let set_loading = {
        let loading = loading.clone();
        Callback::from(move |message: Option<String>| loading.set(message))
    };
    let navigate = {
        let page = page.clone();
        Callback::from(move |next: Page| page.set(next))
    };
    let on_session = {
        let dispatcher = auth_state.dispatcher();
        let page = page.clone();
        Callback::from(move |session: Session| {
            page.set(Page::Dashboard);
            dispatcher.dispatch(AuthAction::Changed(Some(session)));
        })
    };
    let sign_out = {
        let backend = backend.clone();
        let dispatcher = auth_state.dispatcher();
        let loading = loading.clone();
        let push_toast = push_toast.clone();
        Callback::from(move |_| {
            let Some(backend) = backend.clone() else {
                return;
            };
            let dispatcher = dispatcher.clone();
            let loading = loading.clone();
            let push_toast = push_toast.clone();
            loading.set(Some("Keluar...".to_string()));
            spawn_local(async move {
                if let Err(err) = auth::sign_out(&backend).await {
                    log::warn!("server sign-out failed, local session cleared anyway: {}", err);
                }
                loading.set(None);
                dispatcher.dispatch(AuthAction::Changed(None));
                push_toast.emit(ToastMessage::new(ToastKind::Info, "Anda telah keluar", ""));
            });
        })
    };

    let context = AppContext {
        backend: backend.clone().unwrap_or_else(|| AppContext::detached().backend),
        live: *live,
        toasts: push_toast,
        loading: set_loading,
        sign_out,
        navigate: navigate.clone(),
    };

    let body = match (&*base, auth_state.status) {
        (Err(err), _) => status_screen("Konfigurasi backend tidak valid", Some(err.to_string())),
        (Ok(_), AuthStatus::Checking) => status_screen("Memeriksa sesi...", None),
        (Ok(_), AuthStatus::Unauthenticated) => html! { <AuthPage {on_session} /> },
        (Ok(_), AuthStatus::Authenticated) => html! {
            <Layout active_page={*page} on_select={navigate}>
                { page_view(*page) }
            </Layout>
        },
    };

    html! {
        <ContextProvider<AppContext> context={context}>
            { body }
            <LoadingOverlay message={(*loading).clone()} />
            <ToastStack queue={(*toasts).clone()} on_dismiss={dismiss_toast} />
        </ContextProvider<AppContext>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn session(token: &str) -> Session {
        serde_json::from_value(json!({
            "access_token": token,
            "refresh_token": "r",
            "expires_in": 3600,
            "user": { "id": "u-1", "email": "ani@example.com" }
        }))
        .unwrap()
    }

    fn change(table: &str, kind: ChangeKind, record: Value, old_record: Value) -> ChangeEvent {
        ChangeEvent {
            channel: table.to_string(),
            table: table.to_string(),
            kind,
            record,
            old_record,
        }
    }

    #[test]
    fn auth_state_follows_session_events() {
        let state = Rc::new(AuthState::default());
        assert_eq!(state.status, AuthStatus::Checking);

        let state = state.reduce(AuthAction::Checked(None));
        assert_eq!(state.status, AuthStatus::Unauthenticated);
        assert_eq!(state.last_event, None);

        let state = state.reduce(AuthAction::Changed(Some(session("a"))));
        assert_eq!(state.status, AuthStatus::Authenticated);
        assert_eq!(state.last_event, Some(AuthEvent::SignedIn));

        let state = state.reduce(AuthAction::Changed(Some(session("b"))));
        assert_eq!(state.last_event, Some(AuthEvent::TokenRefreshed));

        let state = state.reduce(AuthAction::Changed(None));
        assert_eq!(state.status, AuthStatus::Unauthenticated);
        assert_eq!(state.last_event, Some(AuthEvent::SignedOut));
    }

    #[test]
    fn unchanged_session_keeps_state() {
        let state = Rc::new(AuthState::default()).reduce(AuthAction::Checked(Some(session("a"))));
        let same = Rc::clone(&state).reduce(AuthAction::Changed(Some(session("a"))));
        assert!(Rc::ptr_eq(&state, &same));
    }

    #[test]
    fn revisions_count_per_table() {
        let live = Rc::new(LiveRevision::default())
            .reduce("invoices".to_string())
            .reduce("invoices".to_string())
            .reduce("reconciliations".to_string())
            .reduce("clients".to_string());
        assert_eq!(
            *live,
            LiveRevision { notifications: 0, invoices: 2, reconciliations: 1 }
        );
    }

    #[test]
    fn notification_insert_becomes_info_toast() {
        let event = change(
            "notifications",
            ChangeKind::Insert,
            json!({ "type": "info", "title": "Halo", "message": "Pesan" }),
            Value::Null,
        );
        assert_eq!(
            change_toast(&event),
            Some(ToastMessage::new(ToastKind::Info, "Halo", "Pesan"))
        );

        let mismatch = change(
            "notifications",
            ChangeKind::Insert,
            json!({ "type": RECON_MISMATCH, "title": "x", "message": "y" }),
            Value::Null,
        );
        assert_eq!(change_toast(&mismatch), None);
    }

    #[rstest]
    #[case(json!({ "status": "pending" }), json!({ "status": "paid", "invoice_number": "INV-1" }), true)]
    #[case(json!({ "status": "paid" }), json!({ "status": "paid" }), false)]
    #[case(json!({ "id": 1 }), json!({ "status": "paid" }), false)]
    #[case(json!({ "status": "pending" }), json!({ "status": "sent" }), false)]
    fn invoice_paid_toast(#[case] old: Value, #[case] new: Value, #[case] toasts: bool) {
        let event = change("invoices", ChangeKind::Update, new, old);
        assert_eq!(change_toast(&event).is_some(), toasts);
    }

    #[test]
    fn pages_have_distinct_labels() {
        let mut labels: Vec<_> = Page::ALL.iter().map(|page| page.label()).collect();
        labels.dedup();
        assert_eq!(labels.len(), Page::ALL.len());
    }
}
