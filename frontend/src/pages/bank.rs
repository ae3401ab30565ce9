use chrono::Utc;
use yew::prelude::*;

use super::{bump, delete_row, load_owned, save_row};
use crate::app::use_app;
use crate::backend::Order;
use crate::format::display_date;
use crate::listing::{clamp_page, filter_rows, page_count, paginate, PAGE_SIZE};
use crate::model::{Bank, BankForm, BankStatus};
use crate::ui::form::{SearchBox, SelectField, TextField, ICON_BUTTON, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::ui::icons::{icon_edit, icon_plus, icon_trash};
use crate::ui::{badge, confirm, empty_row, loading_row, page_shell, table_card, Modal, Pagination};

const TABLE: &str = "banks";

#[function_component(BankPage)]
pub fn bank_page() -> Html {
    let ctx = use_app();
    let rows = use_state(Vec::<Bank>::new);
    let loading = use_state(|| true);
    let reload = use_state(|| 0u32);
    let search = use_state(String::new);
    let page = use_state(|| 1usize);
    // `Some(None)` is the create form, `Some(Some(id))` edits row `id`.
    let editing = use_state(|| None::<Option<String>>);
    let form = use_state(BankForm::default);

    {
        let ctx = ctx.clone();
        let rows = rows.clone();
        let loading = loading.clone();
        use_effect_with_deps(
            move |_| {
                load_owned(&ctx, TABLE, ("bank_name", Order::Asc), rows, loading);
                || ()
            },
            *reload,
        );
    }

    let filtered = filter_rows(&rows, &search, |_| true);
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
            form.set(BankForm::default());
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
    let on_page = {
        let page = page.clone();
        Callback::from(move |next: usize| page.set(next))
    };
    let field = |apply: fn(&mut BankForm, String)| {
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
            match form.to_draft(owner.as_deref(), &Utc::now().to_rfc3339()) {
                Ok(draft) => {
                    let done = if id.is_some() { "Rekening diperbarui" } else { "Rekening ditambahkan" };
                    save_row(&ctx, TABLE, id, draft, done, after_write.clone());
                }
                Err(err) => ctx.invalid(&err),
            }
        })
    };

    let row_actions = |bank: &Bank| {
        let on_edit = {
            let editing = editing.clone();
            let form = form.clone();
            let bank = bank.clone();
            Callback::from(move |_| {
                form.set(BankForm::from_bank(&bank));
                editing.set(Some(Some(bank.id.clone())));
            })
        };
        let on_delete = {
            let ctx = ctx.clone();
            let after_write = after_write.clone();
            let id = bank.id.clone();
            let prompt = format!("Hapus rekening {} - {}?", bank.bank_name, bank.account_number);
            Callback::from(move |_| {
                if confirm(&prompt) {
                    delete_row(&ctx, TABLE, id.clone(), "Rekening dihapus", after_write.clone());
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
        empty_row(6, "Belum ada rekening bank")
    } else {
        visible
            .iter()
            .map(|bank| html! {
                <tr key={bank.id.clone()} class="hover:bg-slate-50">
                    <td class="px-4 py-3 font-semibold text-slate-800">{ &bank.bank_name }</td>
                    <td class="px-4 py-3 font-mono">{ &bank.account_number }</td>
                    <td class="px-4 py-3">{ &bank.account_holder }</td>
                    <td class="px-4 py-3">{ badge(bank.status.tone(), bank.status.label()) }</td>
                    <td class="px-4 py-3">{ display_date(bank.updated_at.as_deref().or(bank.created_at.as_deref())) }</td>
                    <td class="px-4 py-3">{ row_actions(bank) }</td>
                </tr>
            })
            .collect::<Html>()
    };

    let head = html! {
        <tr>
            <th class="px-4 py-3">{"Bank"}</th>
            <th class="px-4 py-3">{"No. Rekening"}</th>
            <th class="px-4 py-3">{"Atas Nama"}</th>
            <th class="px-4 py-3">{"Status"}</th>
            <th class="px-4 py-3">{"Diperbarui"}</th>
            <th class="px-4 py-3">{"Aksi"}</th>
        </tr>
    };
    let footer = html! {
        <Pagination page={current_page} {total_pages} total_rows={filtered.len()} {on_page} />
    };

    let modal = match &*editing {
        None => html! {},
        Some(id) => {
            let title = if id.is_some() { "Ubah Rekening" } else { "Tambah Rekening" };
            let status_options = BankStatus::ALL
                .iter()
                .map(|status| (status.as_str().to_string(), status.label().to_string()))
                .collect::<Vec<_>>();
            let on_status = {
                let form = form.clone();
                Callback::from(move |raw: String| {
                    let mut next = (*form).clone();
                    next.status = BankStatus::parse(&raw).unwrap_or_default();
                    form.set(next);
                })
            };
            html! {
                <Modal {title} on_close={close.clone()}>
                    <form class="space-y-3" onsubmit={on_save}>
                        <TextField label="Nama Bank" value={form.bank_name.clone()} required=true placeholder="BCA, BNI, Mandiri..."
                            on_input={field(|f, v| f.bank_name = v)} />
                        <TextField label="Nomor Rekening" value={form.account_number.clone()} required=true
                            on_input={field(|f, v| f.account_number = v)} />
                        <TextField label="Atas Nama" value={form.account_holder.clone()} required=true
                            on_input={field(|f, v| f.account_holder = v)} />
                        <SelectField label="Status" value={form.status.as_str()} options={status_options} on_change={on_status} />
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
        "Rekening Bank",
        html! {
            <>
                <SearchBox value={(*search).clone()} on_input={on_search} placeholder="Cari bank, rekening..." />
                <button class={PRIMARY_BUTTON} onclick={open_create}>{ icon_plus() }{"Tambah Rekening"}</button>
            </>
        },
        html! {
            <>
                { table_card(head, body, footer) }
                { modal }
            </>
        },
    )
}
