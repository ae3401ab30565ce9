use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::app::use_app;
use crate::format::format_currency;
use crate::model::{Bank, Client, InvoiceForm, InvoiceStatus, ItemForm};
use crate::pages::save_row;
use crate::ui::form::{SelectField, TextAreaField, TextField, ICON_BUTTON, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::ui::icons::{icon_plus, icon_trash};
use crate::ui::Modal;

use super::TABLE;

#[derive(Properties, PartialEq)]
pub struct InvoiceEditorProps {
    pub initial: InvoiceForm,
    /// Row being edited; `None` creates a new invoice.
    pub editing_id: Option<String>,
    pub clients: Vec<Client>,
    pub banks: Vec<Bank>,
    pub on_saved: Callback<()>,
    pub on_close: Callback<()>,
}

fn item_input(value: &str, kind: &'static str, class: &'static str, on_input: Callback<String>) -> Html {
    let oninput = Callback::from(move |e: InputEvent| {
        on_input.emit(e.target_unchecked_into::<HtmlInputElement>().value());
    });
    html! {
        <input
            class={classes!("w-full", "px-2", "py-1", "rounded-lg", "border", "border-border", "text-sm", class)}
            type={kind}
            value={value.to_string()}
            {oninput}
        />
    }
}

#[function_component(InvoiceEditor)]
pub fn invoice_editor(props: &InvoiceEditorProps) -> Html {
    let ctx = use_app();
    let form = use_state(|| props.initial.clone());

    let update = |apply: fn(&mut InvoiceForm, String)| {
        let form = form.clone();
        Callback::from(move |value: String| {
            let mut next = (*form).clone();
            apply(&mut next, value);
            form.set(next);
        })
    };
    let update_item = |index: usize, apply: fn(&mut ItemForm, String)| {
        let form = form.clone();
        Callback::from(move |value: String| {
            let mut next = (*form).clone();
            if let Some(item) = next.items.get_mut(index) {
                apply(item, value);
            }
            form.set(next);
        })
    };
    let toggle_subitem = |index: usize| {
        let form = form.clone();
        Callback::from(move |_: Event| {
            let mut next = (*form).clone();
            if let Some(item) = next.items.get_mut(index) {
                item.is_subitem = !item.is_subitem;
            }
            form.set(next);
        })
    };
    let remove_item = |index: usize| {
        let form = form.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*form).clone();
            if next.items.len() > 1 {
                next.items.remove(index);
            }
            form.set(next);
        })
    };
    let add_item = {
        let form = form.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*form).clone();
            next.items.push(ItemForm::default());
            form.set(next);
        })
    };
    let on_client = {
        let form = form.clone();
        let clients = props.clients.clone();
        Callback::from(move |id: String| {
            let mut next = (*form).clone();
            next.apply_client(clients.iter().find(|client| client.id == id));
            form.set(next);
        })
    };
    let on_status = {
        let form = form.clone();
        Callback::from(move |raw: String| {
            let mut next = (*form).clone();
            next.status = InvoiceStatus::parse(&raw).unwrap_or_default();
            form.set(next);
        })
    };

    let on_submit = {
        let ctx = ctx.clone();
        let form = form.clone();
        let banks = props.banks.clone();
        let editing_id = props.editing_id.clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let owner = match (&editing_id, ctx.user_id()) {
                (Some(_), _) => None,
                (None, Ok(user_id)) => Some(user_id),
                (None, Err(err)) => return ctx.report("Gagal menyimpan invoice", &err),
            };
            match form.to_draft(owner.as_deref(), &banks) {
                Ok(draft) => {
                    let done = if editing_id.is_some() { "Invoice diperbarui" } else { "Invoice dibuat" };
                    save_row(&ctx, TABLE, editing_id.clone(), draft, done, on_saved.clone());
                }
                Err(err) => ctx.invalid(&err),
            }
        })
    };

    let client_options = props
        .clients
        .iter()
        .map(|client| (client.id.clone(), client.name.clone()))
        .collect::<Vec<_>>();
    let bank_options = props
        .banks
        .iter()
        .map(|bank| (bank.id.clone(), bank.picker_label()))
        .collect::<Vec<_>>();
    let status_options = InvoiceStatus::ALL
        .iter()
        .map(|status| (status.as_str().to_string(), status.label().to_string()))
        .collect::<Vec<_>>();
    let totals = form.totals();
    let title = if props.editing_id.is_some() { "Ubah Invoice" } else { "Buat Invoice" };
    let cancel = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <Modal {title} on_close={props.on_close.clone()} wide=true>
            <form class="space-y-4" onsubmit={on_submit}>
                <div class="grid grid-cols-1 md:grid-cols-3 gap-3">
                    <TextField label="Nomor Invoice" value={form.invoice_number.clone()} required=true
                        on_input={update(|f, v| f.invoice_number = v)} />
                    <TextField label="Jatuh Tempo" kind="date" value={form.due_date.clone()}
                        on_input={update(|f, v| f.due_date = v)} />
                    <SelectField label="Status" value={form.status.as_str()} options={status_options} on_change={on_status} />
                </div>

                <div class="grid grid-cols-1 md:grid-cols-2 gap-3">
                    <SelectField label="Pilih Mitra" value={form.client_id.clone()} options={client_options}
                        placeholder="-- Isi manual --" on_change={on_client} />
                    <TextField label="Nama Klien" value={form.client_name.clone()} required=true
                        on_input={update(|f, v| f.client_name = v)} />
                    <TextField label="Email Klien" kind="email" value={form.client_email.clone()}
                        on_input={update(|f, v| f.client_email = v)} />
                    <SelectField label="Rekening Transfer" value={form.bank_id.clone()} options={bank_options}
                        placeholder="-- Rekening default --" on_change={update(|f, v| f.bank_id = v)} />
                </div>
                <TextAreaField label="Alamat Klien" rows={2} value={form.client_address.clone()}
                    on_input={update(|f, v| f.client_address = v)} />

                <div class="border border-border rounded-xl overflow-hidden">
                    <table class="w-full text-sm">
                        <thead class="bg-slate-50 text-left text-xs uppercase tracking-wider text-slate-500">
                            <tr>
                                <th class="px-3 py-2">{"Deskripsi"}</th>
                                <th class="px-3 py-2 w-20">{"Qty"}</th>
                                <th class="px-3 py-2 w-36">{"Harga"}</th>
                                <th class="px-3 py-2 w-16">{"Sub"}</th>
                                <th class="px-3 py-2 w-36 text-right">{"Total"}</th>
                                <th class="px-3 py-2 w-10"></th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-border">
                            { for form.items.iter().enumerate().map(|(index, item)| html! {
                                <tr>
                                    <td class="px-3 py-2">{ item_input(&item.description, "text", "", update_item(index, |i, v| i.description = v)) }</td>
                                    <td class="px-3 py-2">{ item_input(&item.quantity, "number", "text-right", update_item(index, |i, v| i.quantity = v)) }</td>
                                    <td class="px-3 py-2">{ item_input(&item.unit_price, "number", "text-right", update_item(index, |i, v| i.unit_price = v)) }</td>
                                    <td class="px-3 py-2 text-center">
                                        <input type="checkbox" checked={item.is_subitem} onchange={toggle_subitem(index)} />
                                    </td>
                                    <td class="px-3 py-2 text-right">{ format_currency(item.to_line_item().line_total()) }</td>
                                    <td class="px-3 py-2">
                                        <button type="button" class={ICON_BUTTON} title="Hapus item"
                                            disabled={form.items.len() <= 1} onclick={remove_item(index)}>
                                            { icon_trash() }
                                        </button>
                                    </td>
                                </tr>
                            }) }
                        </tbody>
                    </table>
                    <div class="px-3 py-2 border-t border-border">
                        <button type="button" class={SECONDARY_BUTTON} onclick={add_item}>{ icon_plus() }{"Tambah Item"}</button>
                    </div>
                </div>

                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <div class="space-y-3">
                        <TextField label="Pajak (Rp)" kind="number" value={form.tax.clone()} on_input={update(|f, v| f.tax = v)} />
                        <TextField label="Diskon (Rp)" kind="number" value={form.discount.clone()} on_input={update(|f, v| f.discount = v)} />
                        <TextAreaField label="Catatan" rows={2} value={form.notes.clone()} on_input={update(|f, v| f.notes = v)} />
                    </div>
                    <dl class="bg-slate-50 rounded-xl p-4 space-y-2 text-sm self-start">
                        <div class="flex justify-between"><dt>{"Subtotal"}</dt><dd>{ format_currency(totals.subtotal) }</dd></div>
                        <div class="flex justify-between"><dt>{"Pajak"}</dt><dd>{ format_currency(totals.tax) }</dd></div>
                        <div class="flex justify-between"><dt>{"Diskon"}</dt><dd>{ format!("- {}", format_currency(totals.discount)) }</dd></div>
                        <div class="flex justify-between border-t border-border pt-2 font-bold text-[#173E63]">
                            <dt>{"Total"}</dt><dd>{ format_currency(totals.total) }</dd>
                        </div>
                    </dl>
                </div>

                <div class="flex justify-end gap-2 pt-2">
                    <button type="button" class={SECONDARY_BUTTON} onclick={cancel}>{"Batal"}</button>
                    <button type="submit" class={PRIMARY_BUTTON}>{"Simpan Invoice"}</button>
                </div>
            </form>
        </Modal>
    }
}
