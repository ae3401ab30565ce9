use yew::prelude::*;

use crate::app::use_app;
use crate::export;
use crate::format::{format_currency, format_thousands, today};
use crate::model::{Invoice, InvoiceDocument};
use crate::ui::form::{PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::ui::icons::icon_printer;
use crate::ui::{Modal, ToastKind};

#[derive(Properties, PartialEq)]
pub struct InvoicePrintProps {
    pub invoice: Invoice,
    pub on_close: Callback<()>,
}

/// Print preview of the invoice document; printing goes through the browser.
#[function_component(InvoicePrint)]
pub fn invoice_print(props: &InvoicePrintProps) -> Html {
    let ctx = use_app();
    let doc = InvoiceDocument::build(&props.invoice, today());

    let on_print = Callback::from(move |_| {
        if let Err(err) = export::print_page() {
            log::error!("print failed: {}", err);
            ctx.toast(ToastKind::Error, "Gagal mencetak", err.to_string());
        }
    });
    let footer = html! {
        <>
            <button class={SECONDARY_BUTTON} onclick={props.on_close.reform(|_: MouseEvent| ())}>{"Tutup"}</button>
            <button class={PRIMARY_BUTTON} onclick={on_print}>{ icon_printer() }{"Cetak"}</button>
        </>
    };

    html! {
        <Modal title="Pratinjau Invoice" on_close={props.on_close.clone()} {footer} wide=true>
            <div id="invoice-print" class="bg-white text-slate-800 text-sm space-y-6 p-4">
                <div class="flex justify-between items-start">
                    <div>
                        <h2 class="text-2xl font-black text-[#173E63]">{ doc.issuer.name }</h2>
                        { for doc.issuer.address.iter().map(|line| html! { <p class="text-xs text-slate-500">{ *line }</p> }) }
                    </div>
                    <div class="text-right">
                        <p class="text-3xl font-black tracking-widest text-[#173E63]">{"INVOICE"}</p>
                        <p class="text-xs mt-1">{ format!("No: {}", doc.invoice_number) }</p>
                        <p class="text-xs">{ format!("Tanggal: {}", doc.invoice_date) }</p>
                    </div>
                </div>

                <div>
                    <p class="text-xs font-bold uppercase text-slate-500">{"Kepada"}</p>
                    <p class="font-semibold">{ &doc.client_name }</p>
                    <p class="text-xs whitespace-pre-line">{ &doc.client_address }</p>
                </div>

                <table class="w-full border border-slate-300">
                    <thead class="bg-[#173E63] text-white text-xs">
                        <tr>
                            <th class="px-3 py-2 text-left">{"Deskripsi"}</th>
                            <th class="px-3 py-2 text-right w-16">{"Qty"}</th>
                            <th class="px-3 py-2 text-right w-32">{"Harga"}</th>
                            <th class="px-3 py-2 text-right w-32">{"Jumlah"}</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-slate-200">
                        { for doc.rows.iter().map(|row| html! {
                            <tr>
                                <td class={classes!("px-3", "py-2", row.indented.then_some("pl-8"))}>{ &row.description }</td>
                                <td class="px-3 py-2 text-right">{ row.quantity }</td>
                                <td class="px-3 py-2 text-right">{ format_thousands(row.unit_price) }</td>
                                <td class="px-3 py-2 text-right">{ format_thousands(row.total) }</td>
                            </tr>
                        }) }
                    </tbody>
                </table>

                <div class="flex justify-end">
                    <dl class="w-64 space-y-1">
                        <div class="flex justify-between"><dt>{"Subtotal"}</dt><dd>{ format_currency(doc.totals.subtotal) }</dd></div>
                        if doc.totals.tax != 0 {
                            <div class="flex justify-between"><dt>{"Pajak"}</dt><dd>{ format_currency(doc.totals.tax) }</dd></div>
                        }
                        if doc.totals.discount != 0 {
                            <div class="flex justify-between"><dt>{"Diskon"}</dt><dd>{ format!("- {}", format_currency(doc.totals.discount)) }</dd></div>
                        }
                        <div class="flex justify-between border-t border-slate-300 pt-1 font-bold">
                            <dt>{"Total"}</dt><dd>{ format_currency(doc.totals.total) }</dd>
                        </div>
                    </dl>
                </div>

                <p class="italic text-xs border-y border-slate-200 py-2">
                    <span class="font-bold not-italic">{"Terbilang: "}</span>{ &doc.say }
                </p>

                <div class="flex justify-between items-end">
                    <div class="text-xs space-y-0.5">
                        <p class="font-bold">{"Pembayaran melalui transfer:"}</p>
                        <p>{ &doc.transfer.bank_name }</p>
                        <p>{ format!("a.n. {}", doc.transfer.account_holder) }</p>
                        <p>{ format!("No. Rek: {}", doc.transfer.account_number) }</p>
                    </div>
                    <div class="text-center text-xs">
                        <p>{ doc.issuer.name }</p>
                        <div class="h-16"></div>
                        <p class="font-bold underline">{ doc.issuer.signatory }</p>
                        <p>{ doc.issuer.signatory_title }</p>
                    </div>
                </div>

                <p class="text-center text-[10px] text-slate-400">{ doc.issuer.contact }</p>
            </div>
        </Modal>
    }
}
