use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{expect_ok, read_json, Backend, BackendError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_str(self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Eq,
    Gte,
    Lte,
}

impl Op {
    fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Gte => "gte",
            Op::Lte => "lte",
        }
    }
}

/// Builder for one PostgREST request, e.g.
/// `backend.from("clients").eq("user_id", id).order("name", Order::Asc).fetch()`.
#[derive(Clone, Debug)]
pub struct TableQuery {
    backend: Backend,
    table: String,
    columns: String,
    filters: Vec<(String, Op, String)>,
    order: Vec<(String, Order)>,
    limit: Option<usize>,
}

impl TableQuery {
    pub(super) fn new(backend: Backend, table: &str) -> Self {
        Self {
            backend,
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    fn filter(mut self, column: &str, op: Op, value: impl ToString) -> Self {
        self.filters.push((column.to_string(), op, value.to_string()));
        self
    }

    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, Op::Eq, value)
    }

    pub fn gte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, Op::Gte, value)
    }

    pub fn lte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, Op::Lte, value)
    }

    pub fn order(mut self, column: &str, order: Order) -> Self {
        self.order.push((column.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn filter_pairs(&self) -> Vec<(String, String)> {
        self.filters
            .iter()
            .map(|(column, op, value)| {
                (
                    column.clone(),
                    format!("{}.{}", op.as_str(), urlencoding::encode(value)),
                )
            })
            .collect()
    }

    fn read_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        pairs.extend(self.filter_pairs());
        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|(column, order)| format!("{}.{}", column, order.as_str()))
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("order".to_string(), order));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    fn with_query(&self, pairs: Vec<(String, String)>) -> String {
        let base = self.backend.config().rest_url(&self.table);
        if pairs.is_empty() {
            return base;
        }
        let query = pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", base, query)
    }

    /// URL of a read with every clause applied.
    pub fn url(&self) -> String {
        self.with_query(self.read_pairs())
    }

    /// URL of an update or delete: filters only.
    pub fn mutation_url(&self) -> String {
        self.with_query(self.filter_pairs())
    }

    fn guard(&self, action: &'static str) -> Result<(), BackendError> {
        if self.filters.is_empty() {
            return Err(BackendError::UnfilteredMutation(action, self.table.clone()));
        }
        Ok(())
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        self.backend.authorize(builder)
    }

    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, BackendError> {
        let resp = self.request(Request::get(&self.url())).send().await?;
        read_json(resp).await
    }

    /// Exactly one row; a missing row fails with code `PGRST116`.
    pub async fn single<T: DeserializeOwned>(self) -> Result<T, BackendError> {
        let resp = self
            .request(Request::get(&self.url()))
            .header("Accept", "application/vnd.pgrst.object+json")
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn insert<B: Serialize>(self, body: &B) -> Result<(), BackendError> {
        let resp = self
            .request(Request::post(&self.backend.config().rest_url(&self.table)))
            .header("Prefer", "return=minimal")
            .json(body)?
            .send()
            .await?;
        expect_ok(resp).await?;
        log::debug!("inserted into {}", self.table);
        Ok(())
    }

    pub async fn update<B: Serialize>(self, body: &B) -> Result<(), BackendError> {
        self.guard("update")?;
        let resp = self
            .request(Request::patch(&self.mutation_url()))
            .header("Prefer", "return=minimal")
            .json(body)?
            .send()
            .await?;
        expect_ok(resp).await?;
        log::debug!("updated {}", self.table);
        Ok(())
    }

    pub async fn delete(self) -> Result<(), BackendError> {
        self.guard("delete")?;
        let resp = self
            .request(Request::delete(&self.mutation_url()))
            .send()
            .await?;
        expect_ok(resp).await?;
        log::debug!("deleted from {}", self.table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    fn backend() -> Backend {
        Backend::new(BackendConfig::new("https://abc.supabase.co", "anon").unwrap())
    }

    #[test]
    fn bare_read_selects_everything() {
        let url = backend().from("banks").url();
        assert_eq!(url, "https://abc.supabase.co/rest/v1/banks?select=*");
    }

    #[test]
    fn read_applies_filters_order_and_limit() {
        let url = backend()
            .from("transactions")
            .eq("user_id", "u-1")
            .gte("transaction_date", "2025-01-01")
            .lte("transaction_date", "2025-01-31")
            .order("transaction_date", Order::Desc)
            .limit(5)
            .url();
        assert_eq!(
            url,
            "https://abc.supabase.co/rest/v1/transactions?select=*&user_id=eq.u-1\
             &transaction_date=gte.2025-01-01&transaction_date=lte.2025-01-31\
             &order=transaction_date.desc&limit=5"
        );
    }

    #[test]
    fn filter_values_are_encoded() {
        let url = backend().from("clients").eq("name", "PT A&B Jaya").url();
        assert!(url.ends_with("name=eq.PT%20A%26B%20Jaya"));
    }

    #[test]
    fn multiple_orders_are_joined() {
        let url = backend()
            .from("invoices")
            .select("id,total")
            .order("status", Order::Asc)
            .order("created_at", Order::Desc)
            .url();
        assert!(url.contains("select=id,total"));
        assert!(url.ends_with("order=status.asc,created_at.desc"));
    }

    #[test]
    fn mutations_carry_filters_only() {
        let query = backend()
            .from("notifications")
            .eq("user_id", "u-1")
            .eq("is_read", false)
            .order("created_at", Order::Desc);
        assert_eq!(
            query.mutation_url(),
            "https://abc.supabase.co/rest/v1/notifications?user_id=eq.u-1&is_read=eq.false"
        );
    }

    #[test]
    fn unfiltered_mutations_are_refused() {
        let query = backend().from("clients");
        assert_eq!(
            query.guard("delete"),
            Err(BackendError::UnfilteredMutation("delete", "clients".into()))
        );
        assert!(query.eq("id", 4).guard("update").is_ok());
    }
}
