use chrono::{Datelike, Months, NaiveDate};

use crate::format::{month_label, parse_date};
use crate::model::{CashflowTotals, Invoice, InvoiceStatus, ReconStatus, Reconciliation, Transaction};

/// Months shown in the dashboard chart, current month included.
pub const CHART_MONTHS: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First to last day of the month containing `date`.
pub fn month_range(date: NaiveDate) -> DateRange {
    let start = first_of_month(date);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(start);
    DateRange { start, end }
}

pub fn months_back(date: NaiveDate, months: u32) -> NaiveDate {
    first_of_month(date)
        .checked_sub_months(Months::new(months))
        .unwrap_or_else(|| first_of_month(date))
}

/// Change from `previous` to `current` in percent. Growth from nothing
/// counts as 100%.
pub fn percent_change(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        return if current == 0 { 0.0 } else { 100.0 };
    }
    (current - previous) as f64 / previous.unsigned_abs() as f64 * 100.0
}

pub fn format_percent(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}{:.1}%", sign, value)
}

fn transaction_date(tx: &Transaction) -> Option<NaiveDate> {
    parse_date(&tx.transaction_date)
}

pub fn totals_in(rows: &[Transaction], range: DateRange) -> CashflowTotals {
    CashflowTotals::from_transactions(
        rows.iter()
            .filter(|tx| transaction_date(tx).map_or(false, |date| range.contains(date))),
    )
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyBar {
    pub label: &'static str,
    pub income: i64,
    pub expense: i64,
}

/// Income and expense per month, oldest first, ending with `today`'s month.
pub fn monthly_series(rows: &[Transaction], today: NaiveDate, months: u32) -> Vec<MonthlyBar> {
    (0..months)
        .rev()
        .map(|back| {
            let range = month_range(months_back(today, back));
            let totals = totals_in(rows, range);
            MonthlyBar {
                label: month_label(range.start),
                income: totals.income,
                expense: totals.expense,
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardSummary {
    pub month: CashflowTotals,
    pub invoice_count: usize,
    pub pending_count: usize,
    pub overdue_count: usize,
    pub income_change: f64,
}

impl DashboardSummary {
    pub fn compute(transactions: &[Transaction], invoices: &[Invoice], today: NaiveDate) -> Self {
        let month = totals_in(transactions, month_range(today));
        let previous = totals_in(transactions, month_range(months_back(today, 1)));
        Self {
            month,
            invoice_count: invoices.len(),
            pending_count: invoices
                .iter()
                .filter(|invoice| invoice.status == InvoiceStatus::Pending)
                .count(),
            overdue_count: invoices.iter().filter(|invoice| invoice.is_overdue(today)).count(),
            income_change: percent_change(month.income, previous.income),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InvoiceSummary {
    pub count: usize,
    pub invoiced: i64,
    pub paid: i64,
    pub outstanding: i64,
}

impl InvoiceSummary {
    pub fn compute(rows: &[Invoice]) -> Self {
        rows.iter().fold(Self::default(), |mut summary, invoice| {
            summary.count += 1;
            summary.invoiced += invoice.totals().total;
            if invoice.is_paid() {
                summary.paid += invoice.totals().total;
            } else {
                summary.outstanding += invoice.totals().total;
            }
            summary
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconSummary {
    pub count: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Sum of absolute differences on rows that are not matched.
    pub open_difference: i64,
}

impl ReconSummary {
    pub fn compute(rows: &[Reconciliation]) -> Self {
        rows.iter().fold(Self::default(), |mut summary, recon| {
            summary.count += 1;
            match recon.status {
                ReconStatus::Matched => summary.matched += 1,
                ReconStatus::Unmatched => summary.unmatched += 1,
                ReconStatus::Pending => {}
            }
            if recon.status != ReconStatus::Matched {
                summary.open_difference += recon.difference.abs();
            }
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(kind: &str, amount: i64, date: &str) -> Transaction {
        serde_json::from_value(json!({
            "id": date, "type": kind, "amount": amount, "transaction_date": date
        }))
        .unwrap()
    }

    fn invoice(status: &str, total: i64, due: &str) -> Invoice {
        serde_json::from_value(json!({
            "id": "i", "invoice_number": "INV", "client_name": "A",
            "status": status, "total": total, "due_date": due,
            "items": [{ "description": "Jasa", "quantity": 1, "unit_price": total }]
        }))
        .unwrap()
    }

    #[rstest]
    #[case(day(2025, 2, 14), day(2025, 2, 1), day(2025, 2, 28))]
    #[case(day(2024, 2, 29), day(2024, 2, 1), day(2024, 2, 29))]
    #[case(day(2024, 12, 31), day(2024, 12, 1), day(2024, 12, 31))]
    fn month_bounds(#[case] date: NaiveDate, #[case] start: NaiveDate, #[case] end: NaiveDate) {
        assert_eq!(month_range(date), DateRange { start, end });
    }

    #[test]
    fn months_back_crosses_years() {
        assert_eq!(months_back(day(2025, 1, 31), 1), day(2024, 12, 1));
        assert_eq!(months_back(day(2025, 3, 31), 5), day(2024, 10, 1));
    }

    #[rstest]
    #[case(150, 100, 50.0)]
    #[case(50, 100, -50.0)]
    #[case(100, 0, 100.0)]
    #[case(0, 0, 0.0)]
    fn percent_changes(#[case] current: i64, #[case] previous: i64, #[case] expected: f64) {
        assert!((percent_change(current, previous) - expected).abs() < 1e-9);
    }

    #[test]
    fn percent_text_has_sign() {
        assert_eq!(format_percent(12.345), "+12.3%");
        assert_eq!(format_percent(0.0), "+0.0%");
        assert_eq!(format_percent(-3.0), "-3.0%");
    }

    #[test]
    fn dashboard_summary_for_current_month() {
        let rows = vec![
            tx("income", 3_000_000, "2025-03-02"),
            tx("expense", 500_000, "2025-03-10"),
            tx("income", 2_000_000, "2025-02-20"),
            tx("income", 9_000_000, "2024-03-05"),
        ];
        let invoices = vec![
            invoice("pending", 100, "2025-03-01"),
            invoice("pending", 100, "2025-04-01"),
            invoice("paid", 100, "2025-01-01"),
        ];
        let summary = DashboardSummary::compute(&rows, &invoices, day(2025, 3, 15));
        assert_eq!(summary.month.income, 3_000_000);
        assert_eq!(summary.month.balance(), 2_500_000);
        assert_eq!(summary.invoice_count, 3);
        assert_eq!(summary.pending_count, 2);
        assert_eq!(summary.overdue_count, 1);
        assert_eq!(format_percent(summary.income_change), "+50.0%");
    }

    #[test]
    fn series_spans_six_months_oldest_first() {
        let rows = vec![tx("income", 10, "2024-10-31"), tx("expense", 4, "2025-03-01")];
        let series = monthly_series(&rows, day(2025, 3, 15), CHART_MONTHS);
        let labels: Vec<_> = series.iter().map(|bar| bar.label).collect();
        assert_eq!(labels, vec!["Okt", "Nov", "Des", "Jan", "Feb", "Mar"]);
        assert_eq!(series[0].income, 10);
        assert_eq!(series[5].expense, 4);
    }

    #[test]
    fn invoice_and_recon_summaries() {
        let invoices = vec![invoice("paid", 300, ""), invoice("sent", 200, ""), invoice("pending", 100, "")];
        assert_eq!(
            InvoiceSummary::compute(&invoices),
            InvoiceSummary { count: 3, invoiced: 600, paid: 300, outstanding: 300 }
        );

        let recons: Vec<Reconciliation> = serde_json::from_value(json!([
            { "id": 1, "status": "matched", "difference": 0 },
            { "id": 2, "status": "unmatched", "difference": -5000 },
            { "id": 3, "status": "pending", "difference": 2500 }
        ]))
        .unwrap();
        assert_eq!(
            ReconSummary::compute(&recons),
            ReconSummary { count: 3, matched: 1, unmatched: 1, open_difference: 7_500 }
        );
    }
}
