use crate::error::{DataOp, DbError};
use crate::query::{
    invoice_search_filter, page_offset, search_pattern, total_pages, ITEMS_PER_PAGE,
    LATEST_INVOICES_LIMIT,
};
use chrono::NaiveDate;
use core_types::{CustomerField, InvoiceChanges, InvoiceStatus, Money, NewInvoice, Revenue, User};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use std::future::Future;
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

// --- Raw rows ---

#[derive(Debug, FromRow)]
struct LatestInvoiceRow {
    id: Uuid,
    name: String,
    image_url: String,
    email: String,
    amount: Money,
}

#[derive(Debug, FromRow)]
struct InvoiceFormRow {
    id: Uuid,
    customer_id: Uuid,
    amount: Money,
    status: InvoiceStatus,
}

#[derive(Debug, FromRow)]
struct CustomersTableRaw {
    id: Uuid,
    name: String,
    email: String,
    image_url: String,
    total_invoices: i64,
    total_pending: Money,
    total_paid: Money,
}

// --- Dashboard views ---

/// One entry of the "latest invoices" card, with the amount already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestInvoice {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub email: String,
    pub amount: String,
}

/// One row of the paginated invoices table. `amount` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct InvoicesTableRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub date: NaiveDate,
    pub amount: Money,
    pub status: InvoiceStatus,
}

/// An invoice prepared for the edit form. `amount` is in dollars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceForm {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: Decimal,
    pub status: InvoiceStatus,
}

/// One row of the customers table with per-customer invoice totals formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomersTableRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: String,
    pub total_paid: String,
}

/// Totals shown on the dashboard cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub number_of_customers: i64,
    pub number_of_invoices: i64,
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
}

/// Sums of invoice amounts by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct StatusTotals {
    pub paid: Money,
    pub pending: Money,
}

/// Awaits the three card queries concurrently. Any failure fails the whole
/// call and the other results are dropped.
pub async fn combine_card_data<I, C, T>(
    invoice_count: I,
    customer_count: C,
    status_totals: T,
) -> Result<CardData, DbError>
where
    I: Future<Output = Result<i64, DbError>>,
    C: Future<Output = Result<i64, DbError>>,
    T: Future<Output = Result<StatusTotals, DbError>>,
{
    let (number_of_invoices, number_of_customers, totals) =
        tokio::try_join!(invoice_count, customer_count, status_totals)?;

    Ok(CardData {
        number_of_customers,
        number_of_invoices,
        total_paid_invoices: totals.paid.format(),
        total_pending_invoices: totals.pending.format(),
    })
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fetches the monthly revenue series.
    pub async fn fetch_revenue(&self) -> Result<Vec<Revenue>, DbError> {
        tracing::debug!("Fetching revenue data...");
        sqlx::query_as::<_, Revenue>("SELECT month, revenue FROM revenue")
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::query(DataOp::Revenue))
    }

    /// Fetches the five most recent invoices with their customer, amounts formatted.
    pub async fn fetch_latest_invoices(&self) -> Result<Vec<LatestInvoice>, DbError> {
        let rows = sqlx::query_as::<_, LatestInvoiceRow>(
            r#"
            SELECT invoices.amount, customers.name, customers.image_url, customers.email, invoices.id
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            ORDER BY invoices.date DESC
            LIMIT $1
            "#,
        )
        .bind(LATEST_INVOICES_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::query(DataOp::LatestInvoices))?;

        Ok(rows
            .into_iter()
            .map(|row| LatestInvoice {
                id: row.id,
                name: row.name,
                image_url: row.image_url,
                email: row.email,
                amount: row.amount.format(),
            })
            .collect())
    }

    pub async fn count_invoices(&self) -> Result<i64, DbError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::query(DataOp::CardData))
    }

    pub async fn count_customers(&self) -> Result<i64, DbError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::query(DataOp::CardData))
    }

    pub async fn invoice_status_totals(&self) -> Result<StatusTotals, DbError> {
        sqlx::query_as::<_, StatusTotals>(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END), 0)::BIGINT AS paid,
                COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0)::BIGINT AS pending
            FROM invoices
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::query(DataOp::CardData))
    }

    /// Fetches the dashboard card totals. The three queries run concurrently.
    pub async fn fetch_card_data(&self) -> Result<CardData, DbError> {
        combine_card_data(
            self.count_invoices(),
            self.count_customers(),
            self.invoice_status_totals(),
        )
        .await
    }

    /// Fetches one page of invoices matching `query`, newest first.
    pub async fn fetch_filtered_invoices(
        &self,
        query: &str,
        current_page: i64,
    ) -> Result<Vec<InvoicesTableRow>, DbError> {
        sqlx::query_as::<_, InvoicesTableRow>(concat!(
            r#"
            SELECT
                invoices.id,
                invoices.customer_id,
                invoices.amount,
                invoices.date,
                invoices.status,
                customers.name,
                customers.email,
                customers.image_url
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            "#,
            invoice_search_filter!(),
            "ORDER BY invoices.date DESC, invoices.id LIMIT $2 OFFSET $3"
        ))
        .bind(search_pattern(query))
        .bind(ITEMS_PER_PAGE)
        .bind(page_offset(current_page))
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::query(DataOp::FilteredInvoices))
    }

    /// Number of pages of invoices matching `query`.
    pub async fn fetch_invoices_pages(&self, query: &str) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>(concat!(
            r#"
            SELECT COUNT(*)
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            "#,
            invoice_search_filter!()
        ))
        .bind(search_pattern(query))
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::query(DataOp::InvoicePages))?;

        Ok(total_pages(count))
    }

    /// Fetches a single invoice for editing, with its amount converted to dollars.
    pub async fn fetch_invoice_by_id(&self, id: Uuid) -> Result<InvoiceForm, DbError> {
        let row = sqlx::query_as::<_, InvoiceFormRow>(
            r#"
            SELECT invoices.id, invoices.customer_id, invoices.amount, invoices.status
            FROM invoices
            WHERE invoices.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::query(DataOp::InvoiceById))?
        .ok_or(DbError::NotFound)?;

        Ok(InvoiceForm {
            id: row.id,
            customer_id: row.customer_id,
            amount: row.amount.to_dollars(),
            status: row.status,
        })
    }

    /// Fetches every customer's id and name, for the invoice form's customer picker.
    pub async fn fetch_customers(&self) -> Result<Vec<CustomerField>, DbError> {
        sqlx::query_as::<_, CustomerField>("SELECT id, name FROM customers ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::query(DataOp::Customers))
    }

    /// Fetches customers whose name or email matches `query`, with invoice totals.
    pub async fn fetch_filtered_customers(
        &self,
        query: &str,
    ) -> Result<Vec<CustomersTableRow>, DbError> {
        let rows = sqlx::query_as::<_, CustomersTableRaw>(
            r#"
            SELECT
                customers.id,
                customers.name,
                customers.email,
                customers.image_url,
                COUNT(invoices.id) AS total_invoices,
                COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0)
                    ::BIGINT AS total_pending,
                COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0)
                    ::BIGINT AS total_paid
            FROM customers
            LEFT JOIN invoices ON customers.id = invoices.customer_id
            WHERE
                customers.name ILIKE $1 OR
                customers.email ILIKE $1
            GROUP BY customers.id, customers.name, customers.email, customers.image_url
            ORDER BY customers.name ASC
            "#,
        )
        .bind(search_pattern(query))
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::query(DataOp::CustomerTable))?;

        Ok(rows
            .into_iter()
            .map(|row| CustomersTableRow {
                id: row.id,
                name: row.name,
                email: row.email,
                image_url: row.image_url,
                total_invoices: row.total_invoices,
                total_pending: row.total_pending.format(),
                total_paid: row.total_paid.format(),
            })
            .collect())
    }

    /// Inserts a new invoice and returns its id.
    pub async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Uuid, DbError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1::uuid, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&invoice.customer_id)
        .bind(invoice.amount)
        .bind(invoice.status)
        .bind(invoice.date)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::query(DataOp::CreateInvoice))?;

        tracing::info!(invoice_id = %id, amount = invoice.amount.cents(), "Invoice created.");
        Ok(id)
    }

    /// Updates the amount and status of an invoice.
    /// Returns `DbError::NotFound` if no invoice has this id.
    pub async fn update_invoice(&self, id: Uuid, changes: &InvoiceChanges) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE invoices SET amount = $1, status = $2 WHERE id = $3")
            .bind(changes.amount)
            .bind(changes.status)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError::query(DataOp::UpdateInvoice))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        tracing::info!(invoice_id = %id, "Invoice updated.");
        Ok(())
    }

    /// Deletes an invoice. Deleting an id that does not exist is not an error.
    pub async fn delete_invoice(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError::query(DataOp::DeleteInvoice))?;

        tracing::info!(invoice_id = %id, deleted = result.rows_affected(), "Invoice deleted.");
        Ok(())
    }

    /// Looks up a user by email for credential checking.
    pub async fn get_user(&self, email: &str) -> Result<Option<User>, DbError> {
        sqlx::query_as::<_, User>("SELECT id, name, email, password FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::query(DataOp::User))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::ready;

    fn totals(paid: i64, pending: i64) -> StatusTotals {
        StatusTotals {
            paid: Money::from_cents(paid),
            pending: Money::from_cents(pending),
        }
    }

    #[tokio::test]
    async fn card_data_combines_all_three_results() {
        let cards = combine_card_data(
            ready(Ok(15)),
            ready(Ok(8)),
            ready(Ok(totals(123_456, 4250))),
        )
        .await
        .unwrap();

        assert_eq!(
            cards,
            CardData {
                number_of_customers: 8,
                number_of_invoices: 15,
                total_paid_invoices: "$1,234.56".to_string(),
                total_pending_invoices: "$42.50".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn card_data_fails_if_any_query_fails() {
        let failed = || ready(Err::<i64, _>(DbError::Query(DataOp::CardData)));

        let first = combine_card_data(failed(), ready(Ok(8)), ready(Ok(totals(1, 1)))).await;
        let second = combine_card_data(ready(Ok(15)), failed(), ready(Ok(totals(1, 1)))).await;
        let third = combine_card_data(
            ready(Ok(15)),
            ready(Ok(8)),
            ready(Err(DbError::Query(DataOp::CardData))),
        )
        .await;

        for result in [first, second, third] {
            let err = result.unwrap_err();
            assert_eq!(err.to_string(), "Failed to fetch card data.");
        }
    }

    #[test]
    fn card_data_serializes_camel_case() {
        let cards = CardData {
            number_of_customers: 1,
            number_of_invoices: 2,
            total_paid_invoices: "$0.00".to_string(),
            total_pending_invoices: "$0.00".to_string(),
        };
        let json = serde_json::to_value(&cards).unwrap();
        assert_eq!(json["numberOfCustomers"], 1);
        assert_eq!(json["totalPendingInvoices"], "$0.00");
    }
}
