use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{bump, delete_row, load_owned, save_row, use_debounced, SEARCH_DEBOUNCE_MS};
use crate::app::{use_app, AppContext};
use crate::backend::{notifications, Order};
use crate::format::{display_date, format_currency, iso_date, today};
use crate::listing::{clamp_page, filter_rows, page_count, paginate, PAGE_SIZE};
use crate::model::{NotificationDraft, ReconForm, ReconStatus, Reconciliation, ReconciliationDraft};
use crate::ui::form::{
    filter_select, SearchBox, SelectField, TextAreaField, TextField, ICON_BUTTON, PRIMARY_BUTTON, SECONDARY_BUTTON,
};
use crate::ui::icons::{icon_edit, icon_plus, icon_trash};
use crate::ui::{badge, confirm, empty_row, loading_row, page_shell, table_card, Modal, Pagination, ToastKind};

const TABLE: &str = "reconciliations";

fn status_options() -> Vec<(String, String)> {
    ReconStatus::ALL
        .iter()
        .map(|status| (status.as_str().to_string(), status.label().to_string()))
        .collect()
}

fn difference_class(balanced: bool) -> &'static str {
    if balanced {
        "text-emerald-600"
    } else {
        "text-red-600"
    }
}

/// Warns about an unbalanced row and leaves a notification for it.
fn flag_mismatch(ctx: &AppContext, draft: &ReconciliationDraft) {
    ctx.toast(
        ToastKind::Warning,
        "Rekonsiliasi tidak cocok",
        format!("Selisih {} untuk {}", format_currency(draft.difference), draft.customer_name),
    );
    let user_id = match ctx.user_id() {
        Ok(user_id) => user_id,
        Err(err) => {
            log::warn!("mismatch notification skipped: {}", err);
            return;
        }
    };
    let notification = NotificationDraft::recon_mismatch(&user_id, draft);
    let ctx = ctx.clone();
    spawn_local(async move {
        if let Err(err) = notifications::create(&ctx.backend, &notification).await {
            log::error!("could not store mismatch notification: {}", err);
        }
    });
}

#[function_component(ReconPage)]
pub fn recon_page() -> Html {
    let ctx = use_app();
    let rows = use_state(Vec::<Reconciliation>::new);
    let loading = use_state(|| true);
    let reload = use_state(|| 0u32);
    let search = use_state(String::new);
    let term = use_debounced((*search).clone(), SEARCH_DEBOUNCE_MS);
    let status_filter = use_state(String::new);
    let page = use_state(|| 1usize);
    let editing = use_state(|| None::<Option<String>>);
    let form = use_state(|| ReconForm::new(&iso_date(today())));

    {
        let live = ctx.live.reconciliations;
        let ctx = ctx.clone();
        let rows = rows.clone();
        let loading = loading.clone();
        use_effect_with_deps(
            move |_| {
                load_owned(&ctx, TABLE, ("created_at", Order::Desc), rows, loading);
                || ()
            },
            (*reload, live),
        );
    }

    let wanted = ReconStatus::parse(&status_filter);
    let filtered = filter_rows(&rows, &term, |recon| wanted.map_or(true, |status| recon.status == status));
    let total_pages = page_count(filtered.len(), PAGE_SIZE);
    let current_page = clamp_page(*page, filtered.len(), PAGE_SIZE);
    let visible = paginate(&filtered, PAGE_SIZE, current_page);

    let close = {
        let editing = editing.clone();
        Callback::from(move |_: ()| editing.set(None))
    };
    let after_write = {
        let editing = editing.clone();
        let reload = reload.clone();
        Callback::from(move |_: ()| {
            editing.set(None);
            bump(&reload);
        })
    };
    let open_create = {
        let editing = editing.clone();
        let form = form.clone();
        Callback::from(move |_| {
            form.set(ReconForm::new(&iso_date(today())));
            editing.set(Some(None));
        })
    };
    let on_search = {
        let search = search.clone();
        let page = page.clone();
        Callback::from(move |value: String| {
            search.set(value);
            page.set(1);
        })
    };
    let on_status_filter = {
        let status_filter = status_filter.clone();
        let page = page.clone();
        Callback::from(move |value: String| {
            status_filter.set(value);
            page.set(1);
        })
    };
    let on_page = {
        let page = page.clone();
        Callback::from(move |next: usize| page.set(next))
    };
    let field = |apply: fn(&mut ReconForm, String)| {
        let form = form.clone();
        Callback::from(move |value: String| {
            let mut next = (*form).clone();
            apply(&mut next, value);
            form.set(next);
        })
    };

    let on_save = {
        let ctx = ctx.clone();
        let editing = editing.clone();
        let form = form.clone();
        let after_write = after_write.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let id = (*editing).clone().flatten();
            let owner = if id.is_some() {
                None
            } else {
                match ctx.user_id() {
                    Ok(user_id) => Some(user_id),
                    Err(err) => return ctx.report("Gagal menyimpan data", &err),
                }
            };
            let draft = match form.to_draft(owner.as_deref()) {
                Ok(draft) => draft,
                Err(err) => return ctx.invalid(&err),
            };
            let after = if draft.is_mismatch() {
                let ctx = ctx.clone();
                let flagged = draft.clone();
                let after_write = after_write.clone();
                Callback::from(move |_: ()| {
                    flag_mismatch(&ctx, &flagged);
                    after_write.emit(());
                })
            } else {
                after_write.clone()
            };
            let done = if id.is_some() { "Rekonsiliasi diperbarui" } else { "Rekonsiliasi ditambahkan" };
            save_row(&ctx, TABLE, id, draft, done, after);
        })
    };

    let row_actions = |recon: &Reconciliation| {
        let on_edit = {
            let editing = editing.clone();
            let form = form.clone();
            let recon = recon.clone();
            Callback::from(move |_| {
                form.set(ReconForm::from_reconciliation(&recon));
                editing.set(Some(Some(recon.id.clone())));
            })
        };
        let on_delete = {
            let ctx = ctx.clone();
            let after_write = after_write.clone();
            let id = recon.id.clone();
            Callback::from(move |_| {
                if confirm("Hapus data rekonsiliasi ini?") {
                    delete_row(&ctx, TABLE, id.clone(), "Rekonsiliasi dihapus", after_write.clone());
                }
            })
        };
        html! {
            <div class="flex gap-1">
                <button class={ICON_BUTTON} title="Ubah" onclick={on_edit}>{ icon_edit() }</button>
                <button class={ICON_BUTTON} title="Hapus" onclick={on_delete}>{ icon_trash() }</button>
            </div>
        }
    };

    let body = if *loading && rows.is_empty() {
        loading_row(9)
    } else if visible.is_empty() {
        empty_row(9, "Belum ada data rekonsiliasi")
    } else {
        visible
            .iter()
            .map(|recon| html! {
                <tr key={recon.id.clone()} class="hover:bg-slate-50">
                    <td class="px-4 py-3 whitespace-nowrap">{ display_date(Some(&recon.recon_date)) }</td>
                    <td class="px-4 py-3">{ recon.partner_code.clone().unwrap_or_else(|| "-".into()) }</td>
                    <td class="px-4 py-3">{ recon.pdam_code.clone().unwrap_or_else(|| "-".into()) }</td>
                    <td class="px-4 py-3 font-semibold text-slate-800">{ &recon.customer_name }</td>
                    <td class="px-4 py-3 text-right">{ format_currency(recon.total_bill) }</td>
                    <td class="px-4 py-3 text-right">{ format_currency(recon.payment_amount) }</td>
                    <td class={classes!("px-4", "py-3", "text-right", "font-semibold", difference_class(recon.is_balanced()))}>
                        { format_currency(recon.difference) }
                    </td>
                    <td class="px-4 py-3">{ badge(recon.status.tone(), recon.status.label()) }</td>
                    <td class="px-4 py-3">{ row_actions(recon) }</td>
                </tr>
            })
            .collect::<Html>()
    };

    let head = html! {
        <tr>
            <th class="px-4 py-3">{"Tanggal"}</th>
            <th class="px-4 py-3">{"Kode Mitra"}</th>
            <th class="px-4 py-3">{"PDAM"}</th>
            <th class="px-4 py-3">{"Pelanggan"}</th>
            <th class="px-4 py-3 text-right">{"Tagihan"}</th>
            <th class="px-4 py-3 text-right">{"Dibayar"}</th>
            <th class="px-4 py-3 text-right">{"Selisih"}</th>
            <th class="px-4 py-3">{"Status"}</th>
            <th class="px-4 py-3">{"Aksi"}</th>
        </tr>
    };
    let footer = html! {
        <Pagination page={current_page} {total_pages} total_rows={filtered.len()} {on_page} />
    };

    let mut filter_options = vec![(String::new(), "Semua status".to_string())];
    filter_options.extend(status_options());

    let modal = match &*editing {
        None => html! {},
        Some(id) => {
            let title = if id.is_some() { "Ubah Rekonsiliasi" } else { "Tambah Rekonsiliasi" };
            let on_status = {
                let form = form.clone();
                Callback::from(move |raw: String| {
                    let mut next = (*form).clone();
                    next.status = ReconStatus::parse(&raw).unwrap_or_default();
                    form.set(next);
                })
            };
            let live = form.live_difference();
            html! {
                <Modal {title} on_close={close.clone()} wide=true>
                    <form class="space-y-3" onsubmit={on_save}>
                        <div class="grid grid-cols-1 md:grid-cols-3 gap-3">
                            <TextField label="Tanggal Rekonsiliasi" kind="date" value={form.recon_date.clone()} required=true
                                on_input={field(|f, v| f.recon_date = v)} />
                            <TextField label="Kode Mitra" value={form.partner_code.clone()}
                                on_input={field(|f, v| f.partner_code = v)} />
                            <TextField label="Kode PDAM" value={form.pdam_code.clone()}
                                on_input={field(|f, v| f.pdam_code = v)} />
                            <TextField label="No. Sambungan" value={form.connection_number.clone()}
                                on_input={field(|f, v| f.connection_number = v)} />
                            <TextField label="Nama Pelanggan" value={form.customer_name.clone()} required=true
                                on_input={field(|f, v| f.customer_name = v)} />
                            <TextField label="No. Rekening" value={form.account_number.clone()}
                                on_input={field(|f, v| f.account_number = v)} />
                            <TextField label="Total Tagihan (Rp)" kind="number" value={form.total_bill.clone()} required=true
                                on_input={field(|f, v| f.total_bill = v)} />
                            <TextField label="Jumlah Bayar (Rp)" kind="number" value={form.payment_amount.clone()} required=true
                                on_input={field(|f, v| f.payment_amount = v)} />
                            <TextField label="Tanggal Bayar" kind="date" value={form.payment_date.clone()}
                                on_input={field(|f, v| f.payment_date = v)} />
                            <TextField label="Lokasi Pembayaran" value={form.payment_location.clone()}
                                on_input={field(|f, v| f.payment_location = v)} />
                            <SelectField label="Status" value={form.status.as_str()} options={status_options()} on_change={on_status} />
                            <div class="rounded-xl bg-slate-50 px-4 py-2 self-end">
                                <p class="text-xs text-slate-500">{"Selisih"}</p>
                                <p class={classes!("text-lg", "font-bold", difference_class(live == 0))}>{ format_currency(live) }</p>
                            </div>
                        </div>
                        <TextAreaField label="Catatan" value={form.notes.clone()} on_input={field(|f, v| f.notes = v)} />
                        <div class="flex justify-end gap-2 pt-2">
                            <button type="button" class={SECONDARY_BUTTON} onclick={close.reform(|_: MouseEvent| ())}>{"Batal"}</button>
                            <button type="submit" class={PRIMARY_BUTTON}>{"Simpan"}</button>
                        </div>
                    </form>
                </Modal>
            }
        }
    };

    page_shell(
        "Rekonsiliasi",
        html! {
            <button class={PRIMARY_BUTTON} onclick={open_create}>{ icon_plus() }{"Tambah Data"}</button>
        },
        html! {
            <>
                <div class="flex flex-col md:flex-row gap-2">
                    <SearchBox value={(*search).clone()} on_input={on_search} placeholder="Cari pelanggan, kode mitra atau PDAM..." />
                    { filter_select(&status_filter, filter_options, on_status_filter) }
                </div>
                { table_card(head, body, footer) }
                { modal }
            </>
        },
    )
}
