mod editor;
mod print;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{bump, delete_row, load_owned, use_debounced, SEARCH_DEBOUNCE_MS};
use crate::app::{use_app, AppContext};
use crate::backend::Order;
use crate::format::{display_date, format_currency, iso_date, today};
use crate::listing::{clamp_page, filter_rows, page_count, paginate, PAGE_SIZE};
use crate::model::{
    next_invoice_number, Bank, Client, Invoice, InvoiceForm, InvoicePaidUpdate, InvoiceStatus, Tone,
};
use crate::ui::form::{filter_select, SearchBox, ICON_BUTTON, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::ui::icons::{icon_check_circle, icon_edit, icon_eye, icon_plus, icon_printer, icon_trash};
use crate::ui::{badge, detail_row, empty_row, loading_row, page_shell, table_card, ConfirmModal, Modal, Pagination};

use editor::InvoiceEditor;
use print::InvoicePrint;

const TABLE: &str = "invoices";

#[derive(Clone, PartialEq)]
enum Dialog {
    Closed,
    Create(InvoiceForm),
    Edit(Invoice),
    Detail(Invoice),
    Print(Invoice),
    Delete(Invoice),
}

fn status_badge(invoice: &Invoice) -> Html {
    if invoice.is_overdue(today()) {
        badge(Tone::Danger, "Jatuh Tempo")
    } else {
        badge(invoice.status.tone(), invoice.status.label())
    }
}

/// Marks the invoice paid today and books the matching income transaction.
fn mark_paid(ctx: &AppContext, invoice: Invoice, after: Callback<()>) {
    let user_id = match ctx.user_id() {
        Ok(user_id) => user_id,
        Err(err) => return ctx.report("Gagal memperbarui invoice", &err),
    };
    let ctx = ctx.clone();
    let paid_on = iso_date(today());
    ctx.show_loading("Memproses pembayaran...");
    spawn_local(async move {
        let updated = ctx
            .backend
            .from(TABLE)
            .eq("id", &invoice.id)
            .update(&InvoicePaidUpdate::on(&paid_on))
            .await;
        if let Err(err) = updated {
            ctx.hide_loading();
            return ctx.report("Gagal memperbarui invoice", &err);
        }
        let booked = ctx
            .backend
            .from("transactions")
            .insert(&invoice.payment_transaction(&user_id, &paid_on))
            .await;
        ctx.hide_loading();
        match booked {
            Ok(()) => {
                log::info!("invoice {} paid on {}", invoice.invoice_number, paid_on);
                ctx.success(format!("Invoice {} lunas", invoice.invoice_number));
            }
            Err(err) => ctx.report("Invoice lunas, tetapi transaksi gagal dicatat", &err),
        }
        after.emit(());
    });
}

#[function_component(InvoicePage)]
pub fn invoice_page() -> Html {
    let ctx = use_app();
    let rows = use_state(Vec::<Invoice>::new);
    let clients = use_state(Vec::<Client>::new);
    let banks = use_state(Vec::<Bank>::new);
    let loading = use_state(|| true);
    let lookups_loading = use_state(|| true);
    let reload = use_state(|| 0u32);
    let search = use_state(String::new);
    let term = use_debounced((*search).clone(), SEARCH_DEBOUNCE_MS);
    let status_filter = use_state(String::new);
    let page = use_state(|| 1usize);
    let dialog = use_state(|| Dialog::Closed);

    {
        let live = ctx.live.invoices;
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
    {
        let ctx = ctx.clone();
        let clients = clients.clone();
        let banks = banks.clone();
        let lookups_loading = lookups_loading.clone();
        use_effect_with_deps(
            move |_| {
                load_owned(&ctx, "clients", ("name", Order::Asc), clients, lookups_loading.clone());
                load_owned(&ctx, "banks", ("bank_name", Order::Asc), banks, lookups_loading);
                || ()
            },
            (),
        );
    }

    let wanted = InvoiceStatus::parse(&status_filter);
    let filtered = filter_rows(&rows, &term, |invoice| wanted.map_or(true, |status| invoice.status == status));
    let total_pages = page_count(filtered.len(), PAGE_SIZE);
    let current_page = clamp_page(*page, filtered.len(), PAGE_SIZE);
    let visible = paginate(&filtered, PAGE_SIZE, current_page);
    let active_banks: Vec<Bank> = banks.iter().filter(|bank| bank.is_active()).cloned().collect();

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
        Callback::from(move |_| {
            let today = today();
            let number = next_invoice_number(today, js_sys::Date::now() as i64);
            dialog.set(Dialog::Create(InvoiceForm::new(number, today)));
        })
    };
    let open = |target: fn(Invoice) -> Dialog, invoice: &Invoice| {
        let dialog = dialog.clone();
        let invoice = invoice.clone();
        Callback::from(move |_: MouseEvent| dialog.set(target(invoice.clone())))
    };
    let pay = |invoice: &Invoice| {
        let ctx = ctx.clone();
        let after_write = after_write.clone();
        let invoice = invoice.clone();
        Callback::from(move |_: MouseEvent| {
            let prompt = format!(
                "Tandai {} sebagai lunas? Pemasukan {} akan dicatat.",
                invoice.invoice_number,
                format_currency(invoice.totals().total)
            );
            if crate::ui::confirm(&prompt) {
                mark_paid(&ctx, invoice.clone(), after_write.clone());
            }
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

    let body = if *loading && rows.is_empty() {
        loading_row(7)
    } else if visible.is_empty() {
        empty_row(7, "Belum ada invoice")
    } else {
        visible
            .iter()
            .map(|invoice| html! {
                <tr key={invoice.id.clone()} class="hover:bg-slate-50">
                    <td class="px-4 py-3 font-mono text-xs">{ &invoice.invoice_number }</td>
                    <td class="px-4 py-3 font-semibold text-slate-800">{ &invoice.client_name }</td>
                    <td class="px-4 py-3 whitespace-nowrap">{ display_date(invoice.created_at.as_deref()) }</td>
                    <td class="px-4 py-3 whitespace-nowrap">{ display_date(invoice.due_date.as_deref()) }</td>
                    <td class="px-4 py-3 text-right font-semibold">{ format_currency(invoice.totals().total) }</td>
                    <td class="px-4 py-3">{ status_badge(invoice) }</td>
                    <td class="px-4 py-3">
                        <div class="flex gap-1">
                            <button class={ICON_BUTTON} title="Detail" onclick={open(Dialog::Detail, invoice)}>{ icon_eye() }</button>
                            <button class={ICON_BUTTON} title="Cetak" onclick={open(Dialog::Print, invoice)}>{ icon_printer() }</button>
                            if !invoice.is_paid() {
                                <>
                                    <button class={ICON_BUTTON} title="Ubah" onclick={open(Dialog::Edit, invoice)}>{ icon_edit() }</button>
                                    <button class={ICON_BUTTON} title="Tandai lunas" onclick={pay(invoice)}>{ icon_check_circle() }</button>
                                    <button class={ICON_BUTTON} title="Hapus" onclick={open(Dialog::Delete, invoice)}>{ icon_trash() }</button>
                                </>
                            }
                        </div>
                    </td>
                </tr>
            })
            .collect::<Html>()
    };

    let head = html! {
        <tr>
            <th class="px-4 py-3">{"No. Invoice"}</th>
            <th class="px-4 py-3">{"Klien"}</th>
            <th class="px-4 py-3">{"Tanggal"}</th>
            <th class="px-4 py-3">{"Jatuh Tempo"}</th>
            <th class="px-4 py-3 text-right">{"Total"}</th>
            <th class="px-4 py-3">{"Status"}</th>
            <th class="px-4 py-3">{"Aksi"}</th>
        </tr>
    };
    let footer = html! {
        <Pagination page={current_page} {total_pages} total_rows={filtered.len()} {on_page} />
    };

    let modal = match &*dialog {
        Dialog::Closed => html! {},
        Dialog::Create(initial) => html! {
            <InvoiceEditor
                initial={initial.clone()}
                editing_id={None::<String>}
                clients={(*clients).clone()}
                banks={active_banks.clone()}
                on_saved={after_write.clone()}
                on_close={close.clone()}
            />
        },
        Dialog::Edit(invoice) => html! {
            <InvoiceEditor
                initial={InvoiceForm::from_invoice(invoice, &clients, &banks)}
                editing_id={Some(invoice.id.clone())}
                clients={(*clients).clone()}
                banks={active_banks.clone()}
                on_saved={after_write.clone()}
                on_close={close.clone()}
            />
        },
        Dialog::Print(invoice) => html! {
            <InvoicePrint invoice={invoice.clone()} on_close={close.clone()} />
        },
        Dialog::Delete(invoice) => {
            let on_confirm = {
                let ctx = ctx.clone();
                let id = invoice.id.clone();
                let after_write = after_write.clone();
                Callback::from(move |_: ()| delete_row(&ctx, TABLE, id.clone(), "Invoice dihapus", after_write.clone()))
            };
            html! {
                <ConfirmModal
                    title="Hapus Invoice"
                    message={format!("Hapus invoice {}? Tindakan ini tidak dapat dibatalkan.", invoice.invoice_number)}
                    confirm_label="Hapus"
                    {on_confirm}
                    on_cancel={close.clone()}
                />
            }
        }
        Dialog::Detail(invoice) => {
            let totals = invoice.totals();
            let bank = match (&invoice.bank_name, &invoice.account_number) {
                (Some(name), Some(number)) => format!("{} - {}", name, number),
                _ => String::new(),
            };
            let footer = html! {
                <>
                    <button class={SECONDARY_BUTTON} onclick={open(Dialog::Print, invoice)}>{ icon_printer() }{"Cetak"}</button>
                    if !invoice.is_paid() {
                        <button class={PRIMARY_BUTTON} onclick={pay(invoice)}>{ icon_check_circle() }{"Tandai Lunas"}</button>
                    }
                </>
            };
            html! {
                <Modal title={format!("Invoice {}", invoice.invoice_number)} on_close={close.clone()} {footer} wide=true>
                    <dl class="mb-4">
                        { detail_row("Klien", invoice.client_name.clone()) }
                        { detail_row("Email", invoice.client_email.clone().unwrap_or_default()) }
                        { detail_row("Alamat", invoice.client_address.clone().unwrap_or_default()) }
                        { detail_row("Tanggal", display_date(invoice.created_at.as_deref())) }
                        { detail_row("Jatuh Tempo", display_date(invoice.due_date.as_deref())) }
                        { detail_row("Status", invoice.status.label()) }
                        if invoice.is_paid() {
                            { detail_row("Tanggal Bayar", display_date(invoice.paid_date.as_deref())) }
                        }
                        { detail_row("Rekening", bank) }
                        { detail_row("Catatan", invoice.notes.clone().unwrap_or_default()) }
                    </dl>
                    { table_card(
                        html! {
                            <tr>
                                <th class="px-4 py-2">{"Deskripsi"}</th>
                                <th class="px-4 py-2 text-right">{"Qty"}</th>
                                <th class="px-4 py-2 text-right">{"Harga"}</th>
                                <th class="px-4 py-2 text-right">{"Total"}</th>
                            </tr>
                        },
                        invoice.items.iter().map(|item| html! {
                            <tr>
                                <td class={classes!("px-4", "py-2", item.is_subitem.then_some("pl-10"))}>{ &item.description }</td>
                                <td class="px-4 py-2 text-right">{ item.quantity }</td>
                                <td class="px-4 py-2 text-right">{ format_currency(item.unit_price) }</td>
                                <td class="px-4 py-2 text-right">{ format_currency(item.line_total()) }</td>
                            </tr>
                        }).collect::<Html>(),
                        html! {
                            <dl class="px-4 py-3 space-y-1 text-sm border-t border-border">
                                <div class="flex justify-between"><dt>{"Subtotal"}</dt><dd>{ format_currency(totals.subtotal) }</dd></div>
                                <div class="flex justify-between"><dt>{"Pajak"}</dt><dd>{ format_currency(totals.tax) }</dd></div>
                                <div class="flex justify-between"><dt>{"Diskon"}</dt><dd>{ format!("- {}", format_currency(totals.discount)) }</dd></div>
                                <div class="flex justify-between font-bold text-[#173E63]"><dt>{"Total"}</dt><dd>{ format_currency(totals.total) }</dd></div>
                            </dl>
                        },
                    ) }
                </Modal>
            }
        }
    };

    let mut filter_options = vec![(String::new(), "Semua status".to_string())];
    filter_options.extend(
        InvoiceStatus::ALL
            .iter()
            .map(|status| (status.as_str().to_string(), status.label().to_string())),
    );

    page_shell(
        "Invoice",
        html! {
            <button class={PRIMARY_BUTTON} onclick={open_create} disabled={*lookups_loading}>{ icon_plus() }{"Buat Invoice"}</button>
        },
        html! {
            <>
                <div class="flex flex-col md:flex-row gap-2">
                    <SearchBox value={(*search).clone()} on_input={on_search} placeholder="Cari nomor invoice atau klien..." />
                    { filter_select(&status_filter, filter_options, on_status_filter) }
                </div>
                { table_card(head, body, footer) }
                { modal }
            </>
        },
    )
}
