use yew::prelude::*;

use super::{bump, delete_row, load_owned, save_row, use_debounced, SEARCH_DEBOUNCE_MS};
use crate::app::use_app;
use crate::backend::Order;
use crate::export::{self, ExportError};
use crate::format::{display_date, format_currency, iso_date, today};
use crate::listing::{clamp_page, filter_rows, page_count, paginate, PAGE_SIZE};
use crate::model::{CashflowTotals, Tone, Transaction, TransactionForm, TransactionType};
use crate::ui::form::{
    filter_select, SearchBox, SelectField, TextAreaField, TextField, ICON_BUTTON, PRIMARY_BUTTON, SECONDARY_BUTTON,
};
use crate::ui::icons::{icon_arrow_down_right, icon_arrow_up_right, icon_download, icon_edit, icon_plus, icon_trash, icon_wallet};
use crate::ui::{badge, confirm, empty_row, loading_row, page_shell, table_card, Accent, Modal, Pagination, StatCard, ToastKind};

const TABLE: &str = "transactions";

fn type_tone(kind: TransactionType) -> Tone {
    match kind {
        TransactionType::Income => Tone::Success,
        TransactionType::Expense => Tone::Danger,
    }
}

fn type_options() -> Vec<(String, String)> {
    [TransactionType::Income, TransactionType::Expense]
        .iter()
        .map(|kind| (kind.as_str().to_string(), kind.label().to_string()))
        .collect()
}

#[function_component(FinancePage)]
pub fn finance_page() -> Html {
    let ctx = use_app();
    let rows = use_state(Vec::<Transaction>::new);
    let loading = use_state(|| true);
    let reload = use_state(|| 0u32);
    let search = use_state(String::new);
    let term = use_debounced((*search).clone(), SEARCH_DEBOUNCE_MS);
    let type_filter = use_state(String::new);
    let page = use_state(|| 1usize);
    let editing = use_state(|| None::<Option<String>>);
    let form = use_state(|| TransactionForm::new(&iso_date(today())));

    {
        let ctx = ctx.clone();
        let rows = rows.clone();
        let loading = loading.clone();
        use_effect_with_deps(
            move |_| {
                load_owned(&ctx, TABLE, ("transaction_date", Order::Desc), rows, loading);
                || ()
            },
            *reload,
        );
    }

    let wanted = TransactionType::parse(&type_filter);
    let filtered = filter_rows(&rows, &term, |tx| wanted.map_or(true, |kind| tx.kind == kind));
    let totals = CashflowTotals::from_transactions(rows.iter());
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
            form.set(TransactionForm::new(&iso_date(today())));
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
    let on_type_filter = {
        let type_filter = type_filter.clone();
        let page = page.clone();
        Callback::from(move |value: String| {
            type_filter.set(value);
            page.set(1);
        })
    };
    let on_page = {
        let page = page.clone();
        Callback::from(move |next: usize| page.set(next))
    };
    let on_download = {
        let ctx = ctx.clone();
        let rows: Vec<Transaction> = filtered.iter().map(|tx| (*tx).clone()).collect();
        Callback::from(move |_| {
            let today = today();
            let result = export::finance_csv(&rows, today)
                .and_then(|csv| export::download(&format!("laporan_keuangan_{}.csv", iso_date(today)), &csv));
            match result {
                Ok(()) => ctx.success("Laporan diunduh"),
                Err(ExportError::Empty) => ctx.toast(ToastKind::Warning, ExportError::Empty.to_string(), ""),
                Err(err) => {
                    log::error!("finance export failed: {}", err);
                    ctx.toast(ToastKind::Error, "Gagal mengunduh laporan", err.to_string());
                }
            }
        })
    };
    let field = |apply: fn(&mut TransactionForm, String)| {
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
            match form.to_draft(owner.as_deref()) {
                Ok(draft) => {
                    let done = if id.is_some() { "Transaksi diperbarui" } else { "Transaksi ditambahkan" };
                    save_row(&ctx, TABLE, id, draft, done, after_write.clone());
                }
                Err(err) => ctx.invalid(&err),
            }
        })
    };

    let row_actions = |tx: &Transaction| {
        let on_edit = {
            let editing = editing.clone();
            let form = form.clone();
            let tx = tx.clone();
            Callback::from(move |_| {
                form.set(TransactionForm::from_transaction(&tx));
                editing.set(Some(Some(tx.id.clone())));
            })
        };
        let on_delete = {
            let ctx = ctx.clone();
            let after_write = after_write.clone();
            let id = tx.id.clone();
            Callback::from(move |_| {
                if confirm("Hapus transaksi ini?") {
                    delete_row(&ctx, TABLE, id.clone(), "Transaksi dihapus", after_write.clone());
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
        loading_row(6)
    } else if visible.is_empty() {
        empty_row(6, "Belum ada transaksi")
    } else {
        visible
            .iter()
            .map(|tx| {
                let amount_class = match tx.kind {
                    TransactionType::Income => "px-4 py-3 text-right font-semibold text-emerald-600",
                    TransactionType::Expense => "px-4 py-3 text-right font-semibold text-red-600",
                };
                html! {
                    <tr key={tx.id.clone()} class="hover:bg-slate-50">
                        <td class="px-4 py-3 whitespace-nowrap">{ display_date(Some(&tx.transaction_date)) }</td>
                        <td class="px-4 py-3">{ badge(type_tone(tx.kind), tx.kind.label()) }</td>
                        <td class="px-4 py-3">{ tx.category.clone().unwrap_or_else(|| "-".into()) }</td>
                        <td class="px-4 py-3">{ tx.description.clone().unwrap_or_else(|| "-".into()) }</td>
                        <td class={amount_class}>{ format_currency(tx.signed_amount()) }</td>
                        <td class="px-4 py-3">{ row_actions(tx) }</td>
                    </tr>
                }
            })
            .collect::<Html>()
    };

    let head = html! {
        <tr>
            <th class="px-4 py-3">{"Tanggal"}</th>
            <th class="px-4 py-3">{"Jenis"}</th>
            <th class="px-4 py-3">{"Kategori"}</th>
            <th class="px-4 py-3">{"Keterangan"}</th>
            <th class="px-4 py-3 text-right">{"Jumlah"}</th>
            <th class="px-4 py-3">{"Aksi"}</th>
        </tr>
    };
    let footer = html! {
        <Pagination page={current_page} {total_pages} total_rows={filtered.len()} {on_page} />
    };

    let mut filter_options = vec![(String::new(), "Semua jenis".to_string())];
    filter_options.extend(type_options());

    let modal = match &*editing {
        None => html! {},
        Some(id) => {
            let title = if id.is_some() { "Ubah Transaksi" } else { "Tambah Transaksi" };
            let on_kind = {
                let form = form.clone();
                Callback::from(move |raw: String| {
                    let mut next = (*form).clone();
                    next.kind = TransactionType::parse(&raw).unwrap_or_default();
                    form.set(next);
                })
            };
            html! {
                <Modal {title} on_close={close.clone()}>
                    <form class="space-y-3" onsubmit={on_save}>
                        <div class="grid grid-cols-1 md:grid-cols-2 gap-3">
                            <SelectField label="Jenis" value={form.kind.as_str()} options={type_options()} on_change={on_kind} />
                            <TextField label="Tanggal" kind="date" value={form.transaction_date.clone()} required=true
                                on_input={field(|f, v| f.transaction_date = v)} />
                            <TextField label="Jumlah (Rp)" kind="number" value={form.amount.clone()} required=true
                                on_input={field(|f, v| f.amount = v)} />
                            <TextField label="Kategori" value={form.category.clone()}
                                on_input={field(|f, v| f.category = v)} />
                        </div>
                        <TextAreaField label="Keterangan" value={form.description.clone()} on_input={field(|f, v| f.description = v)} />
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
        "Keuangan",
        html! {
            <>
                <button class={SECONDARY_BUTTON} onclick={on_download}>{ icon_download() }{"Unduh CSV"}</button>
                <button class={PRIMARY_BUTTON} onclick={open_create}>{ icon_plus() }{"Tambah Transaksi"}</button>
            </>
        },
        html! {
            <>
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <StatCard title="Total Pemasukan" value={format_currency(totals.income)} icon={icon_arrow_up_right()} accent={Accent::Positive} />
                    <StatCard title="Total Pengeluaran" value={format_currency(totals.expense)} icon={icon_arrow_down_right()} accent={Accent::Negative} />
                    <StatCard title="Saldo" value={format_currency(totals.balance())} icon={icon_wallet()} accent={Accent::for_amount(totals.balance())} />
                </div>
                <div class="flex flex-col md:flex-row gap-2">
                    <SearchBox value={(*search).clone()} on_input={on_search} placeholder="Cari keterangan atau kategori..." />
                    { filter_select(&type_filter, filter_options, on_type_filter) }
                </div>
                { table_card(head, body, footer) }
                { modal }
            </>
        },
    )
}
