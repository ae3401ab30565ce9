use serde::de::DeserializeOwned;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::app::{use_app, AppContext};
use crate::backend::{BackendError, Order};
use crate::export::{self, ExportError, ReportKind, ReportRows};
use crate::format::{display_date, format_currency, iso_date, today};
use crate::model::{CashflowTotals, Invoice, Reconciliation, Transaction};
use crate::stats::{month_range, InvoiceSummary, ReconSummary};
use crate::ui::form::{SelectField, TextField, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::ui::icons::{icon_arrow_down_right, icon_arrow_up_right, icon_bar_chart, icon_check_circle, icon_download, icon_file_text, icon_printer, icon_wallet};
use crate::ui::{badge, empty_row, page_shell, table_card, Accent, StatCard, ToastKind};

/// Generated report together with the period it covers.
#[derive(Clone, PartialEq)]
struct Generated {
    rows: ReportRows,
    from: String,
    to: String,
}

/// Inclusive upper bound for the range filter. Timestamp columns need the
/// end of the day or rows created on `to` fall out.
fn range_end(kind: ReportKind, to: &str) -> String {
    match kind {
        ReportKind::Invoice => format!("{}T23:59:59", to),
        ReportKind::Finance | ReportKind::Recon => to.to_string(),
    }
}

async fn fetch_range<T: DeserializeOwned>(
    ctx: &AppContext,
    kind: ReportKind,
    user_id: &str,
    from: &str,
    to: &str,
) -> Result<Vec<T>, BackendError> {
    let column = kind.date_column();
    ctx.backend
        .from(kind.table())
        .eq("user_id", user_id)
        .gte(column, from)
        .lte(column, range_end(kind, to))
        .order(column, Order::Asc)
        .fetch()
        .await
}

async fn fetch_report(ctx: &AppContext, kind: ReportKind, user_id: &str, from: &str, to: &str) -> Result<ReportRows, BackendError> {
    Ok(match kind {
        ReportKind::Finance => ReportRows::Finance(fetch_range(ctx, kind, user_id, from, to).await?),
        ReportKind::Invoice => ReportRows::Invoice(fetch_range(ctx, kind, user_id, from, to).await?),
        ReportKind::Recon => ReportRows::Recon(fetch_range(ctx, kind, user_id, from, to).await?),
    })
}

fn finance_view(rows: &[Transaction]) -> (Html, Html, Html) {
    let totals = CashflowTotals::from_transactions(rows);
    let cards = html! {
        <>
            <StatCard title="Pemasukan" value={format_currency(totals.income)} icon={icon_arrow_up_right()} accent={Accent::Positive} />
            <StatCard title="Pengeluaran" value={format_currency(totals.expense)} icon={icon_arrow_down_right()} accent={Accent::Negative} />
            <StatCard title="Saldo" value={format_currency(totals.balance())} icon={icon_wallet()} accent={Accent::for_amount(totals.balance())} />
        </>
    };
    let head = html! {
        <tr>
            <th class="px-4 py-3">{"Tanggal"}</th>
            <th class="px-4 py-3">{"Jenis"}</th>
            <th class="px-4 py-3">{"Kategori"}</th>
            <th class="px-4 py-3">{"Keterangan"}</th>
            <th class="px-4 py-3 text-right">{"Jumlah"}</th>
        </tr>
    };
    let body = rows
        .iter()
        .map(|tx| html! {
            <tr key={tx.id.clone()}>
                <td class="px-4 py-3 whitespace-nowrap">{ display_date(Some(&tx.transaction_date)) }</td>
                <td class="px-4 py-3">{ tx.kind.label() }</td>
                <td class="px-4 py-3">{ tx.category.clone().unwrap_or_else(|| "-".into()) }</td>
                <td class="px-4 py-3">{ tx.description.clone().unwrap_or_else(|| "-".into()) }</td>
                <td class="px-4 py-3 text-right font-semibold">{ format_currency(tx.signed_amount()) }</td>
            </tr>
        })
        .collect::<Html>();
    (cards, head, body)
}

fn invoice_view(rows: &[Invoice]) -> (Html, Html, Html) {
    let summary = InvoiceSummary::compute(rows);
    let cards = html! {
        <>
            <StatCard title="Total Ditagihkan" value={format_currency(summary.invoiced)} icon={icon_file_text()}
                hint={AttrValue::from(format!("{} invoice", summary.count))} />
            <StatCard title="Sudah Dibayar" value={format_currency(summary.paid)} icon={icon_check_circle()} accent={Accent::Positive} />
            <StatCard title="Belum Dibayar" value={format_currency(summary.outstanding)} icon={icon_wallet()} accent={Accent::Negative} />
        </>
    };
    let head = html! {
        <tr>
            <th class="px-4 py-3">{"No. Invoice"}</th>
            <th class="px-4 py-3">{"Mitra"}</th>
            <th class="px-4 py-3">{"Tanggal"}</th>
            <th class="px-4 py-3">{"Jatuh Tempo"}</th>
            <th class="px-4 py-3 text-right">{"Total"}</th>
            <th class="px-4 py-3">{"Status"}</th>
        </tr>
    };
    let body = rows
        .iter()
        .map(|invoice| html! {
            <tr key={invoice.id.clone()}>
                <td class="px-4 py-3 font-mono text-xs">{ &invoice.invoice_number }</td>
                <td class="px-4 py-3">{ &invoice.client_name }</td>
                <td class="px-4 py-3 whitespace-nowrap">{ display_date(invoice.created_at.as_deref()) }</td>
                <td class="px-4 py-3 whitespace-nowrap">{ display_date(invoice.due_date.as_deref()) }</td>
                <td class="px-4 py-3 text-right font-semibold">{ format_currency(invoice.totals().total) }</td>
                <td class="px-4 py-3">{ badge(invoice.status.tone(), invoice.status.label()) }</td>
            </tr>
        })
        .collect::<Html>();
    (cards, head, body)
}

fn recon_view(rows: &[Reconciliation]) -> (Html, Html, Html) {
    let summary = ReconSummary::compute(rows);
    let cards = html! {
        <>
            <StatCard title="Cocok" value={summary.matched.to_string()} icon={icon_check_circle()} accent={Accent::Positive}
                hint={AttrValue::from(format!("dari {} data", summary.count))} />
            <StatCard title="Tidak Cocok" value={summary.unmatched.to_string()} icon={icon_bar_chart()} accent={Accent::Negative} />
            <StatCard title="Selisih Terbuka" value={format_currency(summary.open_difference)} icon={icon_wallet()} />
        </>
    };
    let head = html! {
        <tr>
            <th class="px-4 py-3">{"Tanggal"}</th>
            <th class="px-4 py-3">{"Kode Mitra"}</th>
            <th class="px-4 py-3">{"PDAM"}</th>
            <th class="px-4 py-3">{"Pelanggan"}</th>
            <th class="px-4 py-3 text-right">{"Tagihan"}</th>
            <th class="px-4 py-3">{"Status"}</th>
            <th class="px-4 py-3 text-right">{"Selisih"}</th>
        </tr>
    };
    let body = rows
        .iter()
        .map(|recon| html! {
            <tr key={recon.id.clone()}>
                <td class="px-4 py-3 whitespace-nowrap">{ display_date(Some(&recon.recon_date)) }</td>
                <td class="px-4 py-3">{ recon.partner_code.clone().unwrap_or_else(|| "-".into()) }</td>
                <td class="px-4 py-3">{ recon.pdam_code.clone().unwrap_or_else(|| "-".into()) }</td>
                <td class="px-4 py-3">{ &recon.customer_name }</td>
                <td class="px-4 py-3 text-right">{ format_currency(recon.total_bill) }</td>
                <td class="px-4 py-3">{ badge(recon.status.tone(), recon.status.label()) }</td>
                <td class="px-4 py-3 text-right font-semibold">{ format_currency(recon.difference) }</td>
            </tr>
        })
        .collect::<Html>();
    (cards, head, body)
}

#[function_component(ReportsPage)]
pub fn reports_page() -> Html {
    let ctx = use_app();
    let kind = use_state(ReportKind::default);
    let period = use_memo(|_| month_range(today()), ());
    let from = use_state(|| iso_date(period.start));
    let to = use_state(|| iso_date(period.end));
    let generated = use_state(|| None::<Generated>);
    let busy = use_state(|| false);

    let on_kind = {
        let kind = kind.clone();
        let generated = generated.clone();
        Callback::from(move |raw: String| {
            kind.set(ReportKind::parse(&raw).unwrap_or_default());
            generated.set(None);
        })
    };
    let on_from = {
        let from = from.clone();
        Callback::from(move |value: String| from.set(value))
    };
    let on_to = {
        let to = to.clone();
        Callback::from(move |value: String| to.set(value))
    };

    let on_generate = {
        let ctx = ctx.clone();
        let kind = kind.clone();
        let from = from.clone();
        let to = to.clone();
        let generated = generated.clone();
        let busy = busy.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if from.is_empty() || to.is_empty() {
                return ctx.toast(ToastKind::Warning, "Periksa kembali isian", "Tanggal awal dan akhir wajib diisi");
            }
            if *from > *to {
                return ctx.toast(ToastKind::Warning, "Periksa kembali isian", "Tanggal awal melewati tanggal akhir");
            }
            let user_id = match ctx.user_id() {
                Ok(user_id) => user_id,
                Err(err) => return ctx.report("Gagal membuat laporan", &err),
            };
            let ctx = ctx.clone();
            let kind = *kind;
            let (from, to) = ((*from).clone(), (*to).clone());
            let generated = generated.clone();
            let busy = busy.clone();
            busy.set(true);
            spawn_local(async move {
                match fetch_report(&ctx, kind, &user_id, &from, &to).await {
                    Ok(rows) => {
                        log::info!("{} report {}..{}: {} row(s)", kind.as_str(), from, to, rows.len());
                        generated.set(Some(Generated { rows, from, to }));
                    }
                    Err(err) => ctx.report("Gagal membuat laporan", &err),
                }
                busy.set(false);
            });
        })
    };

    let on_download = {
        let ctx = ctx.clone();
        let generated = generated.clone();
        Callback::from(move |_| {
            let Some(report) = generated.as_ref() else {
                return;
            };
            let result = export::report_csv(&report.rows, &report.from, &report.to)
                .and_then(|csv| export::download(&report.rows.kind().file_name(&report.from, &report.to), &csv));
            match result {
                Ok(()) => ctx.success("Laporan diunduh"),
                Err(ExportError::Empty) => ctx.toast(ToastKind::Warning, ExportError::Empty.to_string(), ""),
                Err(err) => {
                    log::error!("report export failed: {}", err);
                    ctx.toast(ToastKind::Error, "Gagal mengunduh laporan", err.to_string());
                }
            }
        })
    };
    let on_print = {
        let ctx = ctx.clone();
        Callback::from(move |_| {
            if let Err(err) = export::print_page() {
                log::error!("print failed: {}", err);
                ctx.toast(ToastKind::Error, "Gagal mencetak", err.to_string());
            }
        })
    };

    let kind_options = ReportKind::ALL
        .iter()
        .map(|kind| (kind.as_str().to_string(), kind.label().to_string()))
        .collect::<Vec<_>>();

    let result = match &*generated {
        None => html! {
            <p class="text-sm text-slate-500">{"Pilih jenis laporan dan periode, lalu tampilkan."}</p>
        },
        Some(report) => {
            let (cards, head, body) = match &report.rows {
                ReportRows::Finance(rows) => finance_view(rows),
                ReportRows::Invoice(rows) => invoice_view(rows),
                ReportRows::Recon(rows) => recon_view(rows),
            };
            let body = if report.rows.is_empty() {
                empty_row(7, "Tidak ada data pada periode ini")
            } else {
                body
            };
            html! {
                <div id="report-print" class="space-y-4">
                    <div>
                        <h2 class="text-lg font-bold text-[#173E63]">{ report.rows.kind().label() }</h2>
                        <p class="text-xs text-slate-500">
                            { format!("Periode {} s/d {}", display_date(Some(&report.from)), display_date(Some(&report.to))) }
                        </p>
                    </div>
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">{ cards }</div>
                    { table_card(head, body, html! {}) }
                </div>
            }
        }
    };

    page_shell(
        "Laporan",
        html! {
            if generated.is_some() {
                <>
                    <button class={SECONDARY_BUTTON} onclick={on_print}>{ icon_printer() }{"Cetak"}</button>
                    <button class={PRIMARY_BUTTON} onclick={on_download}>{ icon_download() }{"Unduh CSV"}</button>
                </>
            }
        },
        html! {
            <>
                <form class="bg-card p-4 rounded-[10px] shadow-sm border border-border grid grid-cols-1 md:grid-cols-4 gap-3 items-end"
                    onsubmit={on_generate}>
                    <SelectField label="Jenis Laporan" value={kind.as_str()} options={kind_options} on_change={on_kind} />
                    <TextField label="Dari Tanggal" kind="date" value={(*from).clone()} on_input={on_from} required=true />
                    <TextField label="Sampai Tanggal" kind="date" value={(*to).clone()} on_input={on_to} required=true />
                    <button type="submit" class={PRIMARY_BUTTON} disabled={*busy}>
                        { if *busy { "Memuat..." } else { "Tampilkan" } }
                    </button>
                </form>
                { result }
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ReportKind::Finance, "2025-01-31")]
    #[case(ReportKind::Recon, "2025-01-31")]
    #[case(ReportKind::Invoice, "2025-01-31T23:59:59")]
    fn range_end_covers_last_day(#[case] kind: ReportKind, #[case] expected: &str) {
        assert_eq!(range_end(kind, "2025-01-31"), expected);
    }
}
