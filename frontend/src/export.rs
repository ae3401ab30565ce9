//! CSV reports and browser-side download / print.

use chrono::NaiveDate;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::format::{display_date, format_currency, format_date, DateStyle};
use crate::model::{CashflowTotals, Invoice, Reconciliation, Transaction};

const CSV_MIME: &str = "text/csv;charset=utf-8";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Tidak ada data untuk diunduh")]
    Empty,
    #[error("could not write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not finish csv: {0}")]
    Buffer(String),
    #[error("browser rejected the export: {0}")]
    Browser(String),
}

impl From<JsValue> for ExportError {
    fn from(value: JsValue) -> Self {
        ExportError::Browser(format!("{:?}", value))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportKind {
    #[default]
    Finance,
    Invoice,
    Recon,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [ReportKind::Finance, ReportKind::Invoice, ReportKind::Recon];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Finance => "finance",
            ReportKind::Invoice => "invoice",
            ReportKind::Recon => "recon",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportKind::Finance => "Laporan Keuangan",
            ReportKind::Invoice => "Laporan Invoice",
            ReportKind::Recon => "Laporan Rekonsiliasi",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            ReportKind::Finance => "transactions",
            ReportKind::Invoice => "invoices",
            ReportKind::Recon => "reconciliations",
        }
    }

    /// Column the period filter and ordering apply to.
    pub fn date_column(self) -> &'static str {
        match self {
            ReportKind::Finance => "transaction_date",
            ReportKind::Invoice => "created_at",
            ReportKind::Recon => "recon_date",
        }
    }

    pub fn file_name(self, from: &str, to: &str) -> String {
        format!("laporan_{}_{}_{}.csv", self.as_str(), from, to)
    }
}

/// Rows of one generated report.
#[derive(Clone, Debug, PartialEq)]
pub enum ReportRows {
    Finance(Vec<Transaction>),
    Invoice(Vec<Invoice>),
    Recon(Vec<Reconciliation>),
}

impl ReportRows {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportRows::Finance(_) => ReportKind::Finance,
            ReportRows::Invoice(_) => ReportKind::Invoice,
            ReportRows::Recon(_) => ReportKind::Recon,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReportRows::Finance(rows) => rows.len(),
            ReportRows::Invoice(rows) => rows.len(),
            ReportRows::Recon(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Buffer(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ExportError::Buffer(err.to_string()))
}

fn writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new().flexible(true).from_writer(Vec::new())
}

/// Summary block followed by numbered detail rows; expenses are negative.
pub fn finance_csv(rows: &[Transaction], downloaded_on: NaiveDate) -> Result<String, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }
    let totals = CashflowTotals::from_transactions(rows);
    let mut out = writer();
    out.write_record(["LAPORAN KEUANGAN"])?;
    out.write_record([format!("Tanggal Unduh: {}", format_date(downloaded_on, DateStyle::Short))])?;
    out.write_record([""])?;
    out.write_record(["RINGKASAN"])?;
    out.write_record(["Total Pemasukan".to_string(), format_currency(totals.income)])?;
    out.write_record(["Total Pengeluaran".to_string(), format_currency(totals.expense)])?;
    out.write_record(["Saldo".to_string(), format_currency(totals.balance())])?;
    out.write_record([""])?;
    out.write_record(["DETAIL TRANSAKSI"])?;
    out.write_record(["No", "Tanggal", "Jenis", "Kategori", "Keterangan", "Jumlah"])?;
    for (i, tx) in rows.iter().enumerate() {
        out.write_record([
            (i + 1).to_string(),
            display_date(Some(&tx.transaction_date)),
            tx.kind.label().to_string(),
            tx.category.clone().unwrap_or_else(|| "-".to_string()),
            tx.description.clone().unwrap_or_else(|| "-".to_string()),
            tx.signed_amount().to_string(),
        ])?;
    }
    finish(out)
}

/// Period report with a title block, header row and one line per record.
pub fn report_csv(rows: &ReportRows, from: &str, to: &str) -> Result<String, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }
    let mut out = writer();
    out.write_record([rows.kind().label().to_uppercase()])?;
    out.write_record([format!("Periode: {} s/d {}", from, to)])?;
    out.write_record([""])?;
    match rows {
        ReportRows::Finance(data) => {
            out.write_record(["Tanggal", "Jenis", "Kategori", "Keterangan", "Jumlah"])?;
            for tx in data {
                out.write_record([
                    tx.transaction_date.clone(),
                    tx.kind.label().to_string(),
                    tx.category.clone().unwrap_or_default(),
                    tx.description.clone().unwrap_or_default(),
                    tx.amount.to_string(),
                ])?;
            }
        }
        ReportRows::Invoice(data) => {
            out.write_record(["No. Invoice", "Mitra", "Tanggal", "Jatuh Tempo", "Total", "Status"])?;
            for invoice in data {
                out.write_record([
                    invoice.invoice_number.clone(),
                    invoice.client_name.clone(),
                    invoice.created_at.clone().unwrap_or_default(),
                    invoice.due_date.clone().unwrap_or_default(),
                    invoice.totals().total.to_string(),
                    invoice.status.label().to_string(),
                ])?;
            }
        }
        ReportRows::Recon(data) => {
            out.write_record(["Tanggal", "Kode Mitra", "PDAM", "Pelanggan", "Tagihan", "Status", "Selisih"])?;
            for recon in data {
                out.write_record([
                    recon.recon_date.clone(),
                    recon.partner_code.clone().unwrap_or_default(),
                    recon.pdam_code.clone().unwrap_or_default(),
                    recon.customer_name.clone(),
                    recon.total_bill.to_string(),
                    recon.status.label().to_string(),
                    recon.difference.to_string(),
                ])?;
            }
        }
    }
    finish(out)
}

/// Saves `content` through a temporary object URL.
pub fn download(file_name: &str, content: &str) -> Result<(), ExportError> {
    let window = web_sys::window().ok_or_else(|| ExportError::Browser("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| ExportError::Browser("no document".into()))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(content));
    let options = BlobPropertyBag::new();
    options.set_type(CSV_MIME);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| ExportError::Browser("anchor element unavailable".into()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    Url::revoke_object_url(&url)?;
    log::info!("downloaded {}", file_name);
    Ok(())
}

/// Opens the browser print dialog for the current page.
pub fn print_page() -> Result<(), ExportError> {
    let window = web_sys::window().ok_or_else(|| ExportError::Browser("no window".into()))?;
    window.print()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transactions() -> Vec<Transaction> {
        serde_json::from_value(json!([
            { "id": 1, "type": "income", "amount": 2000000, "category": "Jasa", "description": "Termin 1", "transaction_date": "2025-01-05" },
            { "id": 2, "type": "expense", "amount": 350000, "category": null, "description": "Listrik, air", "transaction_date": "2025-01-07" }
        ]))
        .unwrap()
    }

    #[test]
    fn finance_csv_has_summary_then_details() {
        let csv = finance_csv(&transactions(), NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "LAPORAN KEUANGAN");
        assert_eq!(lines[1], "Tanggal Unduh: 31 Jan 2025");
        assert_eq!(lines[4], "Total Pemasukan,Rp 2.000.000");
        assert_eq!(lines[6], "Saldo,Rp 1.650.000");
        assert_eq!(lines[9], "No,Tanggal,Jenis,Kategori,Keterangan,Jumlah");
        assert_eq!(lines[10], "1,5 Jan 2025,Pemasukan,Jasa,Termin 1,2000000");
        assert_eq!(lines[11], "2,7 Jan 2025,Pengeluaran,-,\"Listrik, air\",-350000");
    }

    #[test]
    fn empty_exports_are_refused() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(matches!(finance_csv(&[], today), Err(ExportError::Empty)));
        assert!(matches!(
            report_csv(&ReportRows::Invoice(Vec::new()), "a", "b"),
            Err(ExportError::Empty)
        ));
    }

    #[test]
    fn period_report_layout() {
        let rows = ReportRows::Finance(transactions());
        let csv = report_csv(&rows, "2025-01-01", "2025-01-31").unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "LAPORAN KEUANGAN");
        assert_eq!(lines[1], "Periode: 2025-01-01 s/d 2025-01-31");
        assert_eq!(lines[3], "Tanggal,Jenis,Kategori,Keterangan,Jumlah");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn recon_report_rows() {
        let recons: Vec<Reconciliation> = serde_json::from_value(json!([
            { "id": 1, "recon_date": "2025-01-02", "pdam_code": "PDAM-JKT", "customer_name": "Budi",
              "total_bill": 150000, "payment_amount": 100000, "status": "unmatched", "difference": -50000 }
        ]))
        .unwrap();
        let csv = report_csv(&ReportRows::Recon(recons), "2025-01-01", "2025-01-31").unwrap();
        assert!(csv.lines().any(|line| line == "2025-01-02,,PDAM-JKT,Budi,150000,Tidak Cocok,-50000"));
    }

    #[test]
    fn report_kinds_map_to_tables() {
        assert_eq!(ReportKind::parse("recon"), Some(ReportKind::Recon));
        assert_eq!(ReportKind::Invoice.date_column(), "created_at");
        assert_eq!(
            ReportKind::Finance.file_name("2025-01-01", "2025-01-31"),
            "laporan_finance_2025-01-01_2025-01-31.csv"
        );
    }
}
