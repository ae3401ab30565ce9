use yew::prelude::*;

use super::load_owned;
use crate::app::{use_app, Page};
use crate::backend::Order;
use crate::format::{display_date, format_currency, format_date, today, DateStyle};
use crate::model::{Invoice, Transaction, TransactionType};
use crate::stats::{format_percent, monthly_series, DashboardSummary, MonthlyBar, CHART_MONTHS};
use crate::ui::icons::{icon_arrow_down_right, icon_arrow_up_right, icon_file_text, icon_wallet};
use crate::ui::{badge, Accent, StatCard, ToastKind};

const RECENT: usize = 5;
const CHART_HEIGHT_PX: i64 = 160;

fn bar_height(value: i64, max: i64) -> String {
    let px = if max <= 0 { 0 } else { value.max(0) * CHART_HEIGHT_PX / max };
    format!("height: {}px", px)
}

fn chart(bars: &[MonthlyBar]) -> Html {
    let max = bars
        .iter()
        .map(|bar| bar.income.max(bar.expense))
        .max()
        .unwrap_or(0);
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border">
            <div class="flex items-center justify-between mb-4">
                <h3 class="font-bold text-foreground">{ format!("Arus Kas {} Bulan Terakhir", CHART_MONTHS) }</h3>
                <div class="flex gap-3 text-xs text-slate-500">
                    <span class="flex items-center gap-1"><span class="w-3 h-3 rounded-sm bg-emerald-500"></span>{"Pemasukan"}</span>
                    <span class="flex items-center gap-1"><span class="w-3 h-3 rounded-sm bg-red-400"></span>{"Pengeluaran"}</span>
                </div>
            </div>
            <div class="flex items-end justify-between gap-4" style={format!("height: {}px", CHART_HEIGHT_PX + 24)}>
                { for bars.iter().map(|bar| html! {
                    <div class="flex-1 flex flex-col items-center gap-1">
                        <div class="flex items-end gap-1 w-full justify-center">
                            <div class="w-1/3 bg-emerald-500 rounded-t" style={bar_height(bar.income, max)}
                                title={format_currency(bar.income)}></div>
                            <div class="w-1/3 bg-red-400 rounded-t" style={bar_height(bar.expense, max)}
                                title={format_currency(bar.expense)}></div>
                        </div>
                        <span class="text-xs text-slate-500">{ bar.label }</span>
                    </div>
                }) }
            </div>
        </div>
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let ctx = use_app();
    let transactions = use_state(Vec::<Transaction>::new);
    let invoices = use_state(Vec::<Invoice>::new);
    let tx_loading = use_state(|| true);
    let invoices_loading = use_state(|| true);
    let overdue_warned = use_mut_ref(|| false);

    {
        let ctx = ctx.clone();
        let transactions = transactions.clone();
        let tx_loading = tx_loading.clone();
        use_effect_with_deps(
            move |_| {
                load_owned(&ctx, "transactions", ("transaction_date", Order::Desc), transactions, tx_loading);
                || ()
            },
            (),
        );
    }
    {
        let live = ctx.live.invoices;
        let ctx = ctx.clone();
        let invoices = invoices.clone();
        let invoices_loading = invoices_loading.clone();
        use_effect_with_deps(
            move |_| {
                load_owned(&ctx, "invoices", ("created_at", Order::Desc), invoices, invoices_loading);
                || ()
            },
            live,
        );
    }

    let today = today();
    let summary = DashboardSummary::compute(&transactions, &invoices, today);

    {
        let ctx = ctx.clone();
        let overdue = summary.overdue_count;
        use_effect_with_deps(
            move |loading: &bool| {
                if !*loading && overdue > 0 && !*overdue_warned.borrow() {
                    *overdue_warned.borrow_mut() = true;
                    ctx.toast(
                        ToastKind::Warning,
                        "Invoice jatuh tempo",
                        format!("{} invoice tertunda sudah melewati jatuh tempo", overdue),
                    );
                }
                || ()
            },
            *invoices_loading,
        );
    }

    let bars = monthly_series(&transactions, today, CHART_MONTHS);
    let balance = summary.month.balance();
    let change_hint = format!("{} dari bulan lalu", format_percent(summary.income_change));
    let invoice_hint = format!("{} tertunda", summary.pending_count);

    let recent_invoices = invoices
        .iter()
        .take(RECENT)
        .map(|invoice| html! {
            <li key={invoice.id.clone()} class="flex items-center justify-between py-3">
                <div>
                    <p class="text-sm font-semibold text-slate-800">{ &invoice.client_name }</p>
                    <p class="text-xs text-slate-500">{ format!("{} · {}", invoice.invoice_number, display_date(invoice.created_at.as_deref())) }</p>
                </div>
                <div class="text-right">
                    <p class="text-sm font-semibold">{ format_currency(invoice.totals().total) }</p>
                    { badge(invoice.status.tone(), invoice.status.label()) }
                </div>
            </li>
        })
        .collect::<Html>();
    let recent_transactions = transactions
        .iter()
        .take(RECENT)
        .map(|tx| {
            let amount_class = match tx.kind {
                TransactionType::Income => "text-sm font-semibold text-emerald-600",
                TransactionType::Expense => "text-sm font-semibold text-red-600",
            };
            html! {
                <li key={tx.id.clone()} class="flex items-center justify-between py-3">
                    <div>
                        <p class="text-sm font-semibold text-slate-800">{ tx.description.clone().unwrap_or_else(|| tx.kind.label().to_string()) }</p>
                        <p class="text-xs text-slate-500">{ display_date(Some(&tx.transaction_date)) }</p>
                    </div>
                    <p class={amount_class}>{ format_currency(tx.signed_amount()) }</p>
                </li>
            }
        })
        .collect::<Html>();

    let see_all = |page: Page| {
        let ctx = ctx.clone();
        Callback::from(move |_: MouseEvent| ctx.navigate(page))
    };
    let empty = |loading: bool, message: &'static str| {
        if loading {
            html! { <li class="py-6 text-center text-sm text-slate-400">{"Memuat..."}</li> }
        } else {
            html! { <li class="py-6 text-center text-sm text-slate-400">{ message }</li> }
        }
    };

    html! {
        <div class="p-6 max-w-7xl mx-auto space-y-6">
            <div class="pb-4 border-b border-border">
                <h1 class="text-2xl font-bold text-foreground">{"Dashboard"}</h1>
                <p class="text-sm text-slate-500">{ format_date(today, DateStyle::Long) }</p>
            </div>

            <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-4 gap-4">
                <StatCard title="Pemasukan Bulan Ini" value={format_currency(summary.month.income)} icon={icon_arrow_up_right()}
                    accent={Accent::Positive} hint={AttrValue::from(change_hint)} />
                <StatCard title="Pengeluaran Bulan Ini" value={format_currency(summary.month.expense)} icon={icon_arrow_down_right()}
                    accent={Accent::Negative} />
                <StatCard title="Saldo Bulan Ini" value={format_currency(balance)} icon={icon_wallet()}
                    accent={Accent::for_amount(balance)} />
                <StatCard title="Invoice" value={summary.invoice_count.to_string()} icon={icon_file_text()}
                    hint={AttrValue::from(invoice_hint)} />
            </div>

            { chart(&bars) }

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border">
                    <div class="flex items-center justify-between mb-2">
                        <h3 class="font-bold text-foreground">{"Invoice Terbaru"}</h3>
                        <button class="text-xs font-semibold text-[#1D617A] hover:underline" onclick={see_all(Page::Invoice)}>{"Lihat semua"}</button>
                    </div>
                    <ul class="divide-y divide-border">
                        if invoices.is_empty() {
                            { empty(*invoices_loading, "Belum ada invoice") }
                        } else {
                            { recent_invoices }
                        }
                    </ul>
                </div>
                <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border">
                    <div class="flex items-center justify-between mb-2">
                        <h3 class="font-bold text-foreground">{"Transaksi Terbaru"}</h3>
                        <button class="text-xs font-semibold text-[#1D617A] hover:underline" onclick={see_all(Page::Finance)}>{"Lihat semua"}</button>
                    </div>
                    <ul class="divide-y divide-border">
                        if transactions.is_empty() {
                            { empty(*tx_loading, "Belum ada transaksi") }
                        } else {
                            { recent_transactions }
                        }
                    </ul>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 100, "height: 0px")]
    #[case(50, 100, "height: 80px")]
    #[case(100, 100, "height: 160px")]
    #[case(10, 0, "height: 0px")]
    fn bars_scale_to_the_tallest_month(#[case] value: i64, #[case] max: i64, #[case] expected: &str) {
        assert_eq!(bar_height(value, max), expected);
    }
}
