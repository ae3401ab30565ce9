use yew::prelude::*;

use super::{bump, delete_row, load_owned, save_row};
use crate::app::use_app;
use crate::backend::Order;
use crate::listing::{clamp_page, filter_rows, page_count, paginate, PAGE_SIZE};
use crate::model::{Client, ClientForm};
use crate::ui::form::{SearchBox, TextAreaField, TextField, ICON_BUTTON, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::ui::icons::{icon_edit, icon_eye, icon_plus, icon_trash};
use crate::ui::{detail_row, empty_row, loading_row, page_shell, table_card, ConfirmModal, Modal, Pagination};

const TABLE: &str = "clients";

#[derive(Clone, PartialEq)]
enum Dialog {
    Closed,
    Create,
    Edit(Client),
    View(Client),
    Delete(Client),
}

#[function_component(ClientsPage)]
pub fn clients_page() -> Html {
    let ctx = use_app();
    let rows = use_state(Vec::<Client>::new);
    let loading = use_state(|| true);
    let reload = use_state(|| 0u32);
    let search = use_state(String::new);
    let page = use_state(|| 1usize);
    let dialog = use_state(|| Dialog::Closed);
    let form = use_state(ClientForm::default);

    {
        let ctx = ctx.clone();
        let rows = rows.clone();
        let loading = loading.clone();
        use_effect_with_deps(
            move |_| {
                load_owned(&ctx, TABLE, ("name", Order::Asc), rows, loading);
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
        let dialog = dialog.clone();
        Callback::from(move |_: ()| dialog.set(Dialog::Closed))
    };
    let after_write = {
        let dialog = dialog.clone();
        let reload = reload.clone();
        Callback::from(move |_: ()| {
            dialog.set(Dialog::Closed);
            bump(&reload);
        })
    };
    let open_create = {
        let dialog = dialog.clone();
        let form = form.clone();
        Callback::from(move |_| {
            form.set(ClientForm::default());
            dialog.set(Dialog::Create);
        })
    };
    let open = |target: fn(Client) -> Dialog, client: &Client| {
        let dialog = dialog.clone();
        let form = form.clone();
        let client = client.clone();
        Callback::from(move |_| {
            form.set(ClientForm::from_client(&client));
            dialog.set(target(client.clone()));
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
    let field = |apply: fn(&mut ClientForm, String)| {
        let form = form.clone();
        Callback::from(move |value: String| {
            let mut next = (*form).clone();
            apply(&mut next, value);
            form.set(next);
        })
    };

    let on_save = {
        let ctx = ctx.clone();
        let dialog = dialog.clone();
        let form = form.clone();
        let after_write = after_write.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (id, owner) = match &*dialog {
                Dialog::Edit(client) => (Some(client.id.clone()), None),
                _ => match ctx.user_id() {
                    Ok(user_id) => (None, Some(user_id)),
                    Err(err) => return ctx.report("Gagal menyimpan data", &err),
                },
            };
            match form.to_draft(owner.as_deref()) {
                Ok(draft) => {
                    let done = if id.is_some() { "Data mitra diperbarui" } else { "Mitra ditambahkan" };
                    save_row(&ctx, TABLE, id, draft, done, after_write.clone());
                }
                Err(err) => ctx.invalid(&err),
            }
        })
    };

    let body = if *loading && rows.is_empty() {
        loading_row(7)
    } else if visible.is_empty() {
        empty_row(7, "Belum ada data mitra")
    } else {
        visible
            .iter()
            .map(|client| html! {
                <tr key={client.id.clone()} class="hover:bg-slate-50">
                    <td class="px-4 py-3 font-semibold text-slate-800">{ &client.name }</td>
                    <td class="px-4 py-3">{ client.email.clone().unwrap_or_else(|| "-".into()) }</td>
                    <td class="px-4 py-3">{ client.phone.clone().unwrap_or_else(|| "-".into()) }</td>
                    <td class="px-4 py-3">{ client.npwp.clone().unwrap_or_else(|| "-".into()) }</td>
                    <td class="px-4 py-3">{ client.pks_number.clone().unwrap_or_else(|| "-".into()) }</td>
                    <td class="px-4 py-3">{ client.pks_duration_label() }</td>
                    <td class="px-4 py-3">
                        <div class="flex gap-1">
                            <button class={ICON_BUTTON} title="Detail" onclick={open(Dialog::View, client)}>{ icon_eye() }</button>
                            <button class={ICON_BUTTON} title="Ubah" onclick={open(Dialog::Edit, client)}>{ icon_edit() }</button>
                            <button class={ICON_BUTTON} title="Hapus" onclick={open(Dialog::Delete, client)}>{ icon_trash() }</button>
                        </div>
                    </td>
                </tr>
            })
            .collect::<Html>()
    };

    let head = html! {
        <tr>
            <th class="px-4 py-3">{"Nama"}</th>
            <th class="px-4 py-3">{"Email"}</th>
            <th class="px-4 py-3">{"Telepon"}</th>
            <th class="px-4 py-3">{"NPWP"}</th>
            <th class="px-4 py-3">{"No. PKS"}</th>
            <th class="px-4 py-3">{"Durasi PKS"}</th>
            <th class="px-4 py-3">{"Aksi"}</th>
        </tr>
    };
    let footer = html! {
        <Pagination page={current_page} {total_pages} total_rows={filtered.len()} {on_page} />
    };

    let modal = match &*dialog {
        Dialog::Closed => html! {},
        Dialog::View(client) => html! {
            <Modal title="Detail Mitra" on_close={close.clone()}>
                <dl>
                    { detail_row("Nama", client.name.clone()) }
                    { detail_row("Email", client.email.clone().unwrap_or_default()) }
                    { detail_row("Telepon", client.phone.clone().unwrap_or_default()) }
                    { detail_row("Alamat", client.address.clone().unwrap_or_default()) }
                    { detail_row("NPWP", client.npwp.clone().unwrap_or_default()) }
                    { detail_row("No. PKS", client.pks_number.clone().unwrap_or_default()) }
                    { detail_row("Durasi PKS", client.pks_duration_label()) }
                    { detail_row("Catatan", client.notes.clone().unwrap_or_default()) }
                </dl>
            </Modal>
        },
        Dialog::Delete(client) => {
            let on_confirm = {
                let ctx = ctx.clone();
                let id = client.id.clone();
                let after_write = after_write.clone();
                Callback::from(move |_: ()| delete_row(&ctx, TABLE, id.clone(), "Mitra dihapus", after_write.clone()))
            };
            html! {
                <ConfirmModal
                    title="Hapus Mitra"
                    message={format!("Hapus mitra \"{}\"? Tindakan ini tidak dapat dibatalkan.", client.name)}
                    confirm_label="Hapus"
                    {on_confirm}
                    on_cancel={close.clone()}
                />
            }
        }
        Dialog::Create | Dialog::Edit(_) => {
            let title = if matches!(*dialog, Dialog::Create) { "Tambah Mitra" } else { "Ubah Mitra" };
            html! {
                <Modal {title} on_close={close.clone()}>
                    <form class="space-y-3" onsubmit={on_save}>
                        <TextField label="Nama Mitra" value={form.name.clone()} required=true on_input={field(|f, v| f.name = v)} />
                        <div class="grid grid-cols-1 md:grid-cols-2 gap-3">
                            <TextField label="Email" kind="email" value={form.email.clone()} on_input={field(|f, v| f.email = v)} />
                            <TextField label="Telepon" value={form.phone.clone()} on_input={field(|f, v| f.phone = v)} />
                            <TextField label="NPWP" value={form.npwp.clone()} on_input={field(|f, v| f.npwp = v)} />
                            <TextField label="No. PKS" value={form.pks_number.clone()} on_input={field(|f, v| f.pks_number = v)} />
                            <TextField label="Durasi PKS (bulan)" kind="number" value={form.pks_duration.clone()} on_input={field(|f, v| f.pks_duration = v)} />
                        </div>
                        <TextAreaField label="Alamat" value={form.address.clone()} on_input={field(|f, v| f.address = v)} />
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
        "Data Mitra",
        html! {
            <>
                <SearchBox value={(*search).clone()} on_input={on_search} placeholder="Cari nama, email, NPWP..." />
                <button class={PRIMARY_BUTTON} onclick={open_create}>{ icon_plus() }{"Tambah Mitra"}</button>
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
