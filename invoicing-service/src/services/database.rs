//! Postgres-backed store.

use crate::models::{BusinessProfile, Expense, InvoiceRow, LineItemRow, Mileage};
use crate::services::store::{DateRange, InvoiceStore};
use async_trait::async_trait;
use chrono::Utc;
use invoice_engine::Invoice;
use service_core::error::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const INVOICE_COLUMNS: &str = r#"
    invoice_id, user_id, invoice_number, invoice_name, invoice_date, terms, status,
    share_token,
    from_name, from_email, from_address, from_phone, from_mobile, from_fax,
    from_website, from_business_number, from_owner,
    bill_to_name, bill_to_email, bill_to_address, bill_to_phone, bill_to_mobile,
    bill_to_fax, bill_to_website, bill_to_business_number, bill_to_owner,
    subtotal, total, balance_due, notes, created_utc, updated_utc
"#;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and run pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::Error::new(e)))?;

        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn line_items(&self, invoice_id: Uuid) -> Result<Vec<LineItemRow>, AppError> {
        let rows = sqlx::query_as::<_, LineItemRow>(
            r#"
            SELECT line_item_id, invoice_id, name, description, rate, quantity, amount, sort_order
            FROM line_items
            WHERE invoice_id = $1
            ORDER BY sort_order
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn assemble(&self, row: InvoiceRow) -> Result<Invoice, AppError> {
        let items = self.line_items(row.invoice_id).await?;
        Ok(row.into_invoice(items))
    }

    async fn insert_line_items(
        tx: &mut Transaction<'_, Postgres>,
        invoice: &Invoice,
    ) -> Result<(), AppError> {
        for (index, item) in invoice.line_items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO line_items (
                    line_item_id, invoice_id, name, description, rate, quantity, amount, sort_order
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(invoice.id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.rate)
            .bind(item.quantity)
            .bind(item.amount)
            .bind(index as i32)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for PgStore {
    async fn create_invoice(&self, invoice: &Invoice) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO invoices (
                invoice_id, user_id, invoice_number, invoice_name, invoice_date, terms, status,
                share_token,
                from_name, from_email, from_address, from_phone, from_mobile, from_fax,
                from_website, from_business_number, from_owner,
                bill_to_name, bill_to_email, bill_to_address, bill_to_phone, bill_to_mobile,
                bill_to_fax, bill_to_website, bill_to_business_number, bill_to_owner,
                subtotal, total, balance_due, notes, created_utc, updated_utc
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8,
                $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23, $24, $25, $26,
                $27, $28, $29, $30, $31, $32
            )
            "#,
        )
        .bind(invoice.id)
        .bind(&invoice.user_id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.invoice_name)
        .bind(invoice.date)
        .bind(invoice.terms.as_str())
        .bind(invoice.status.as_str())
        .bind(&invoice.share_token)
        .bind(&invoice.from.name)
        .bind(&invoice.from.email)
        .bind(&invoice.from.address)
        .bind(&invoice.from.phone)
        .bind(&invoice.from.mobile)
        .bind(&invoice.from.fax)
        .bind(&invoice.from.website)
        .bind(&invoice.from.business_number)
        .bind(&invoice.from.owner)
        .bind(&invoice.bill_to.name)
        .bind(&invoice.bill_to.email)
        .bind(&invoice.bill_to.address)
        .bind(&invoice.bill_to.phone)
        .bind(&invoice.bill_to.mobile)
        .bind(&invoice.bill_to.fax)
        .bind(&invoice.bill_to.website)
        .bind(&invoice.bill_to.business_number)
        .bind(&invoice.bill_to.owner)
        .bind(invoice.subtotal)
        .bind(invoice.total)
        .bind(invoice.balance_due)
        .bind(&invoice.notes)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        Self::insert_line_items(&mut tx, invoice).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get_invoice(&self, user_id: &str, id: Uuid) -> Result<Option<Invoice>, AppError> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    async fn get_invoice_by_share_token(
        &self,
        token: &str,
    ) -> Result<Option<Invoice>, AppError> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE share_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    async fn list_invoices(&self, user_id: &str) -> Result<Vec<Invoice>, AppError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE user_id = $1 ORDER BY invoice_date DESC, created_utc DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut invoices = Vec::with_capacity(rows.len());
        for row in rows {
            invoices.push(self.assemble(row).await?);
        }
        Ok(invoices)
    }

    async fn replace_invoice(&self, invoice: &Invoice) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                invoice_number = $3, invoice_name = $4, invoice_date = $5, terms = $6,
                status = $7,
                from_name = $8, from_email = $9, from_address = $10, from_phone = $11,
                from_mobile = $12, from_fax = $13, from_website = $14,
                from_business_number = $15, from_owner = $16,
                bill_to_name = $17, bill_to_email = $18, bill_to_address = $19,
                bill_to_phone = $20, bill_to_mobile = $21, bill_to_fax = $22,
                bill_to_website = $23, bill_to_business_number = $24, bill_to_owner = $25,
                subtotal = $26, total = $27, balance_due = $28, notes = $29,
                updated_utc = $30
            WHERE invoice_id = $1 AND user_id = $2
            "#,
        )
        .bind(invoice.id)
        .bind(&invoice.user_id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.invoice_name)
        .bind(invoice.date)
        .bind(invoice.terms.as_str())
        .bind(invoice.status.as_str())
        .bind(&invoice.from.name)
        .bind(&invoice.from.email)
        .bind(&invoice.from.address)
        .bind(&invoice.from.phone)
        .bind(&invoice.from.mobile)
        .bind(&invoice.from.fax)
        .bind(&invoice.from.website)
        .bind(&invoice.from.business_number)
        .bind(&invoice.from.owner)
        .bind(&invoice.bill_to.name)
        .bind(&invoice.bill_to.email)
        .bind(&invoice.bill_to.address)
        .bind(&invoice.bill_to.phone)
        .bind(&invoice.bill_to.mobile)
        .bind(&invoice.bill_to.fax)
        .bind(&invoice.bill_to.website)
        .bind(&invoice.bill_to.business_number)
        .bind(&invoice.bill_to.owner)
        .bind(invoice.subtotal)
        .bind(invoice.total)
        .bind(invoice.balance_due)
        .bind(&invoice.notes)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM line_items WHERE invoice_id = $1")
            .bind(invoice.id)
            .execute(&mut *tx)
            .await?;
        Self::insert_line_items(&mut tx, invoice).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete_invoice(&self, user_id: &str, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM invoices WHERE invoice_id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_share_token(
        &self,
        user_id: &str,
        id: Uuid,
        token: Option<&str>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE invoices SET share_token = $3, updated_utc = $4 WHERE invoice_id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .bind(token)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<BusinessProfile>, AppError> {
        let profile = sqlx::query_as::<_, BusinessProfile>(
            r#"
            SELECT user_id, from_name, from_email, from_address, from_phone, from_mobile,
                   from_fax, from_website, from_business_number, from_owner,
                   invoice_prefix, next_invoice_number
            FROM business_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn upsert_profile(&self, profile: &BusinessProfile) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO business_profiles (
                user_id, from_name, from_email, from_address, from_phone, from_mobile,
                from_fax, from_website, from_business_number, from_owner,
                invoice_prefix, next_invoice_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (user_id) DO UPDATE SET
                from_name = $2, from_email = $3, from_address = $4, from_phone = $5,
                from_mobile = $6, from_fax = $7, from_website = $8,
                from_business_number = $9, from_owner = $10,
                invoice_prefix = $11, next_invoice_number = $12
            "#,
        )
        .bind(&profile.user_id)
        .bind(&profile.from_name)
        .bind(&profile.from_email)
        .bind(&profile.from_address)
        .bind(&profile.from_phone)
        .bind(&profile.from_mobile)
        .bind(&profile.from_fax)
        .bind(&profile.from_website)
        .bind(&profile.from_business_number)
        .bind(&profile.from_owner)
        .bind(&profile.invoice_prefix)
        .bind(profile.next_invoice_number)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn next_invoice_number(&self, user_id: &str) -> Result<String, AppError> {
        sqlx::query("INSERT INTO business_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        let (prefix, sequence): (String, i64) = sqlx::query_as(
            r#"
            UPDATE business_profiles
            SET next_invoice_number = next_invoice_number + 1
            WHERE user_id = $1
            RETURNING invoice_prefix, next_invoice_number - 1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(format!("{}{:04}", prefix, sequence))
    }

    async fn create_expense(&self, expense: &Expense) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO expenses (
                expense_id, user_id, expense_date, category, description, amount, created_utc
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(expense.expense_id)
        .bind(&expense.user_id)
        .bind(expense.expense_date)
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(expense.created_utc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_expenses(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<Expense>, AppError> {
        let rows = sqlx::query_as::<_, Expense>(
            r#"
            SELECT expense_id, user_id, expense_date, category, description, amount, created_utc
            FROM expenses
            WHERE user_id = $1
              AND ($2::date IS NULL OR expense_date >= $2)
              AND ($3::date IS NULL OR expense_date <= $3)
            ORDER BY expense_date DESC, created_utc DESC
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_expense(&self, user_id: &str, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM expenses WHERE expense_id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_mileage(&self, mileage: &Mileage) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO mileage (
                mileage_id, user_id, trip_date, description, miles, rate_per_mile,
                deduction, created_utc
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(mileage.mileage_id)
        .bind(&mileage.user_id)
        .bind(mileage.trip_date)
        .bind(&mileage.description)
        .bind(mileage.miles)
        .bind(mileage.rate_per_mile)
        .bind(mileage.deduction)
        .bind(mileage.created_utc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_mileage(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<Mileage>, AppError> {
        let rows = sqlx::query_as::<_, Mileage>(
            r#"
            SELECT mileage_id, user_id, trip_date, description, miles, rate_per_mile,
                   deduction, created_utc
            FROM mileage
            WHERE user_id = $1
              AND ($2::date IS NULL OR trip_date >= $2)
              AND ($3::date IS NULL OR trip_date <= $3)
            ORDER BY trip_date DESC, created_utc DESC
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_mileage(&self, user_id: &str, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM mileage WHERE mileage_id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
