//! Table/query endpoints (`/rest/v1`).

use crate::error::{GatewayError, Result};
use crate::response::{error_from, parse_json};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Select query: columns, equality filters and ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    select: String,
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
}

impl Default for Query {
    fn default() -> Self {
        Self::select("*")
    }
}

impl Query {
    /// Start a query with a select expression (e.g. `*, genres(name)`).
    pub fn select(columns: impl Into<String>) -> Self {
        Self {
            select: columns.into().replace(' ', ""),
            filters: Vec::new(),
            order: None,
        }
    }

    /// Keep rows where `column` equals `value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters
            .push((column.into(), format!("eq.{}", value.to_string())));
        self
    }

    /// Order by a column.
    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some((column.into(), ascending));
        self
    }

    /// Query-string pairs for the request.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.select.clone())];
        params.extend(self.filters.iter().cloned());
        if let Some((column, ascending)) = &self.order {
            let direction = if *ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{}", column, direction)));
        }
        params
    }
}

/// Client for one table.
pub struct TableClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    api_key: &'a str,
    bearer: &'a str,
    table: &'a str,
}

impl<'a> TableClient<'a> {
    pub(crate) fn new(
        http: &'a Client,
        base_url: &'a str,
        api_key: &'a str,
        bearer: &'a str,
        table: &'a str,
    ) -> Self {
        Self {
            http,
            base_url,
            api_key,
            bearer,
            table,
        }
    }

    fn request(&self, method: reqwest::Method) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);
        debug!(url = %url, method = %method, "Table request");
        self.http
            .request(method, url)
            .header("apikey", self.api_key)
            .bearer_auth(self.bearer)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(GatewayError::from_send)?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            Err(error_from(response).await)
        }
    }

    /// Fetch rows matching a query.
    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>> {
        let response = self
            .send(self.request(reqwest::Method::GET).query(&query.params()))
            .await?;
        let rows: Vec<T> = parse_json(response, self.table).await?;
        debug!(table = self.table, rows = rows.len(), "Fetched rows");
        Ok(rows)
    }

    /// Insert one row and return it as stored.
    pub async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(&self, row: &B) -> Result<T> {
        let response = self
            .send(
                self.request(reqwest::Method::POST)
                    .header("Prefer", "return=representation")
                    .json(row),
            )
            .await?;
        first_row(parse_json(response, self.table).await?, self.table, "insert")
    }

    /// Update the row with `id` and return it.
    pub async fn update_by_id<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        id: &str,
        patch: &B,
    ) -> Result<T> {
        let response = self
            .send(
                self.request(reqwest::Method::PATCH)
                    .query(&[("id", format!("eq.{}", id))])
                    .header("Prefer", "return=representation")
                    .json(patch),
            )
            .await?;
        first_row(parse_json(response, self.table).await?, self.table, id)
    }

    /// Delete the row with `id`.
    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.send(
            self.request(reqwest::Method::DELETE)
                .query(&[("id", format!("eq.{}", id))]),
        )
        .await?;
        debug!(table = self.table, id, "Row deleted");
        Ok(())
    }
}

fn first_row<T>(rows: Vec<T>, table: &str, id: &str) -> Result<T> {
    rows.into_iter().next().ok_or_else(|| GatewayError::RowNotFound {
        table: table.to_string(),
        id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_list_params() {
        let query = Query::select("*, genres(name)")
            .eq("is_active", true)
            .order("created_at", false);

        assert_eq!(
            query.params(),
            vec![
                ("select".to_string(), "*,genres(name)".to_string()),
                ("is_active".to_string(), "eq.true".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn default_selects_everything() {
        assert_eq!(
            Query::default().params(),
            vec![("select".to_string(), "*".to_string())]
        );
    }
}
