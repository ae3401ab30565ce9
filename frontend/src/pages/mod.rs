//! One component per screen. Each loads its own rows for the signed-in user
//! and re-loads after every write.

mod auth;
mod bank;
mod clients;
mod dashboard;
mod finance;
mod invoice;
mod recon;
mod reports;

use gloo_timers::callback::Timeout;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::app::AppContext;
use crate::backend::Order;

pub use auth::AuthPage;
pub use bank::BankPage;
pub use clients::ClientsPage;
pub use dashboard::DashboardPage;
pub use finance::FinancePage;
pub use invoice::InvoicePage;
pub use recon::ReconPage;
pub use reports::ReportsPage;

/// Delay between the last keystroke and re-filtering on the busier lists.
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Fetches every row of `table` owned by the current user into `rows`.
pub fn load_owned<T>(
    ctx: &AppContext,
    table: &'static str,
    order: (&'static str, Order),
    rows: UseStateHandle<Vec<T>>,
    loading: UseStateHandle<bool>,
) where
    T: DeserializeOwned + 'static,
{
    let Ok(user_id) = ctx.user_id() else {
        log::warn!("skipping {} load without a session", table);
        return;
    };
    let ctx = ctx.clone();
    loading.set(true);
    spawn_local(async move {
        match ctx
            .backend
            .from(table)
            .eq("user_id", &user_id)
            .order(order.0, order.1)
            .fetch::<T>()
            .await
        {
            Ok(list) => {
                log::debug!("loaded {} {} row(s)", list.len(), table);
                rows.set(list);
            }
            Err(err) => ctx.report("Gagal memuat data", &err),
        }
        loading.set(false);
    });
}

/// Inserts `draft`, or updates row `id` when editing, then runs `after`.
pub fn save_row<B>(ctx: &AppContext, table: &'static str, id: Option<String>, draft: B, done: &'static str, after: Callback<()>)
where
    B: Serialize + 'static,
{
    let ctx = ctx.clone();
    ctx.show_loading("Menyimpan...");
    spawn_local(async move {
        let query = ctx.backend.from(table);
        let result = match &id {
            Some(id) => query.eq("id", id).update(&draft).await,
            None => query.insert(&draft).await,
        };
        ctx.hide_loading();
        match result {
            Ok(()) => {
                log::info!("saved {} row {}", table, id.as_deref().unwrap_or("(new)"));
                ctx.success(done);
                after.emit(());
            }
            Err(err) => ctx.report("Gagal menyimpan data", &err),
        }
    });
}

pub fn delete_row(ctx: &AppContext, table: &'static str, id: String, done: &'static str, after: Callback<()>) {
    let ctx = ctx.clone();
    ctx.show_loading("Menghapus...");
    spawn_local(async move {
        let result = ctx.backend.from(table).eq("id", &id).delete().await;
        ctx.hide_loading();
        match result {
            Ok(()) => {
                log::info!("deleted {} row {}", table, id);
                ctx.success(done);
                after.emit(());
            }
            Err(err) => ctx.report("Gagal menghapus data", &err),
        }
    });
}

/// `value` once it has stopped changing for `delay_ms`.
#[hook]
pub fn use_debounced(value: String, delay_ms: u32) -> String {
    let debounced = use_state(|| value.clone());
    {
        let debounced = debounced.clone();
        use_effect_with_deps(
            move |value: &String| {
                let value = value.clone();
                let timeout = Timeout::new(delay_ms, move || debounced.set(value));
                move || drop(timeout)
            },
            value,
        );
    }
    (*debounced).clone()
}

/// Bumps a reload counter; list pages use it as an effect dependency.
pub fn bump(counter: &UseStateHandle<u32>) {
    counter.set(counter.wrapping_add(1));
}
