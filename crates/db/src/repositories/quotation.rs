//! Quotation repository.
//!
//! Reads for the report service plus every quotation mutation. Each mutation
//! runs in one database transaction; an early return drops the transaction
//! and rolls back whatever was written.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::RoundingStrategy;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use obrix_core::quotation::{
    AdditionalCostValues, CreateItemDetailInput, CreateItemInput, CreateQuotationInput,
    DetailPricing, Input, PercentageValues, PricingService, Quotation, QuotationAdditionalCost,
    QuotationError, QuotationItem, QuotationItemDetail, QuotationPercentage,
    QuotationReportService, QuotationRepository as QuotationRepoTrait, UpdateItemDetailInput,
    UpdateItemInput, UpdateQuotationInput,
};
use obrix_shared::config::QuotationConfig;
use obrix_shared::types::{
    EmployeeId, InputId, QuotationId, QuotationItemDetailId, QuotationItemId, QuotationStatusId,
};

use crate::entities::{
    inputs, quotation_additional_costs, quotation_item_details, quotation_items,
    quotation_percentages, quotations,
};

/// Scale of the cached quotation total.
const CACHED_TOTAL_SCALE: u32 = 2;

/// Error types for quotation persistence.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Domain rule or lookup failure.
    #[error(transparent)]
    Quotation(#[from] QuotationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Quotation repository backed by `SeaORM`.
#[derive(Debug, Clone)]
pub struct QuotationRepository {
    db: DatabaseConnection,
    numbering: QuotationConfig,
}

impl QuotationRepository {
    /// Creates a new quotation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, numbering: QuotationConfig) -> Self {
        Self { db, numbering }
    }

    // ========================================================================
    // Quotations
    // ========================================================================

    /// Creates a quotation and assigns its consecutive code from the generated id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_quotation(
        &self,
        input: CreateQuotationInput,
    ) -> Result<Quotation, RepositoryError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let inserted = quotations::ActiveModel {
            name: Set(input.name),
            client: Set(input.client),
            builder: Set(input.builder),
            responsible_employee_id: Set(input.responsible_employee_id.map(EmployeeId::into_inner)),
            status_id: Set(input.status_id.map(QuotationStatusId::into_inner)),
            consecutive_code: Set(None),
            total_cost: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let code = Quotation::consecutive_code(
            &self.numbering.code_prefix,
            self.numbering.code_width,
            QuotationId::new(inserted.id),
        );
        let mut active: quotations::ActiveModel = inserted.into();
        active.consecutive_code = Set(Some(code));
        let model = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            quotation_id = model.id,
            consecutive_code = ?model.consecutive_code,
            "Quotation created"
        );
        Ok(quotation_to_domain(model))
    }

    /// Gets a live quotation by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the quotation does not exist or was deleted.
    pub async fn get_quotation(&self, id: QuotationId) -> Result<Quotation, RepositoryError> {
        let model = live_quotation(&self.db, id).await?;
        Ok(quotation_to_domain(model))
    }

    /// Updates quotation fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the quotation does not exist or was deleted.
    pub async fn update_quotation(
        &self,
        id: QuotationId,
        input: UpdateQuotationInput,
    ) -> Result<Quotation, RepositoryError> {
        let txn = self.db.begin().await?;
        let current = live_quotation(&txn, id).await?;

        let mut active: quotations::ActiveModel = current.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(client) = input.client {
            active.client = Set(client);
        }
        if let Some(builder) = input.builder {
            active.builder = Set(builder);
        }
        if let Some(employee) = input.responsible_employee_id {
            active.responsible_employee_id = Set(employee.map(EmployeeId::into_inner));
        }
        if let Some(status) = input.status_id {
            active.status_id = Set(status.map(QuotationStatusId::into_inner));
        }
        active.updated_at = Set(Utc::now().into());

        let model = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(quotation_id = %id, "Quotation updated");
        Ok(quotation_to_domain(model))
    }

    /// Soft-deletes a quotation. Its rows are kept but no longer resolve.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the quotation does not exist or was already deleted.
    pub async fn delete_quotation(&self, id: QuotationId) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        let current = live_quotation(&txn, id).await?;

        let now = Utc::now().into();
        let mut active: quotations::ActiveModel = current.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(quotation_id = %id, "Quotation soft-deleted");
        Ok(())
    }

    /// Recomputes the report and caches its total value on the quotation.
    ///
    /// The report is read inside the same transaction as the write.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the quotation does not exist or was deleted.
    pub async fn refresh_total_cost(&self, id: QuotationId) -> Result<Quotation, RepositoryError> {
        let txn = self.db.begin().await?;
        let current = live_quotation(&txn, id).await?;

        let report = QuotationReportService::new(Arc::new(Reader::new(&txn)))
            .build_report(id)
            .await?;
        let total = report
            .summary
            .total_value
            .round_dp_with_strategy(CACHED_TOTAL_SCALE, RoundingStrategy::MidpointAwayFromZero);

        let mut active: quotations::ActiveModel = current.into();
        active.total_cost = Set(Some(total));
        active.updated_at = Set(Utc::now().into());
        let model = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(quotation_id = %id, total_cost = %total, "Quotation total cost refreshed");
        Ok(quotation_to_domain(model))
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// Creates an item with `total = quantity × unit_price`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown quotation and `NegativeValue` for negative amounts.
    pub async fn create_item(&self, input: CreateItemInput) -> Result<QuotationItem, RepositoryError> {
        PricingService::validate_item(input.quantity, input.unit_price)?;

        let total = PricingService::item_total(input.quantity, input.unit_price)?;

        let txn = self.db.begin().await?;
        live_quotation(&txn, input.quotation_id).await?;

        let now = Utc::now().into();
        let model = quotation_items::ActiveModel {
            quotation_id: Set(input.quotation_id.into_inner()),
            item: Set(input.item),
            technical_specification: Set(input.technical_specification),
            unit_of_measure: Set(input.unit_of_measure),
            quantity: Set(input.quantity),
            unit_price: Set(input.unit_price),
            total: Set(total),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            quotation_id = %input.quotation_id,
            item_id = model.id,
            "Quotation item created"
        );
        Ok(item_to_domain(model))
    }

    /// Updates an item. A quantity or unit price change recomputes the item
    /// total and every child detail in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound`, a validation error, or a database error. Nothing
    /// is written when any detail fails to re-derive.
    pub async fn update_item(
        &self,
        id: QuotationItemId,
        input: UpdateItemInput,
    ) -> Result<QuotationItem, RepositoryError> {
        let txn = self.db.begin().await?;
        let current = live_item(&txn, id).await?;

        let quantity = input.quantity.unwrap_or(current.quantity);
        let unit_price = input.unit_price.unwrap_or(current.unit_price);
        PricingService::validate_item(quantity, unit_price)?;
        let total = PricingService::item_total(quantity, unit_price)?;

        let reprice = quantity != current.quantity || unit_price != current.unit_price;
        let now = Utc::now().into();

        let mut active: quotation_items::ActiveModel = current.into();
        if let Some(item) = input.item {
            active.item = Set(item);
        }
        if let Some(spec) = input.technical_specification {
            active.technical_specification = Set(spec);
        }
        if let Some(unit) = input.unit_of_measure {
            active.unit_of_measure = Set(unit);
        }
        active.quantity = Set(quantity);
        active.unit_price = Set(unit_price);
        active.total = Set(total);
        active.updated_at = Set(now);
        let model = active.update(&txn).await?;

        if reprice {
            let details = quotation_item_details::Entity::find()
                .filter(quotation_item_details::Column::QuotationItemId.eq(model.id))
                .order_by_asc(quotation_item_details::Column::Id)
                .all(&txn)
                .await?;
            let count = details.len();

            for detail in details {
                let derived = PricingService::derive_detail(
                    quantity,
                    DetailPricing {
                        unit_cost: detail.unit_cost,
                        performance: detail.performance,
                    },
                )?;

                let mut detail: quotation_item_details::ActiveModel = detail.into();
                detail.quantity = Set(derived.quantity);
                detail.total_cost = Set(derived.total_cost);
                detail.updated_at = Set(now);
                detail.update(&txn).await?;
            }

            tracing::debug!(item_id = %id, details = count, "Cascaded item change to details");
        }

        txn.commit().await?;

        tracing::info!(item_id = %id, "Quotation item updated");
        Ok(item_to_domain(model))
    }

    /// Deletes an item and its details.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item does not exist.
    pub async fn delete_item(&self, id: QuotationItemId) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        let current = live_item(&txn, id).await?;

        quotation_item_details::Entity::delete_many()
            .filter(quotation_item_details::Column::QuotationItemId.eq(current.id))
            .exec(&txn)
            .await?;
        quotation_items::Entity::delete_by_id(current.id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(item_id = %id, "Quotation item deleted");
        Ok(())
    }

    // ========================================================================
    // Item details
    // ========================================================================

    /// Attaches a catalog input to an item.
    ///
    /// Cost and performance default to the input's catalog values; quantity
    /// and total cost are derived from the parent item.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound`, `InputNotFound`, or a validation error.
    pub async fn create_item_detail(
        &self,
        input: CreateItemDetailInput,
    ) -> Result<QuotationItemDetail, RepositoryError> {
        let txn = self.db.begin().await?;
        let item = live_item(&txn, input.quotation_item_id).await?;
        let catalog = find_input(&txn, input.input_id).await?;

        let pricing = PricingService::resolve_new(&catalog, input.unit_cost, input.performance);
        PricingService::validate_detail(pricing)?;
        let derived = PricingService::derive_detail(item.quantity, pricing)?;

        let now = Utc::now().into();
        let model = quotation_item_details::ActiveModel {
            quotation_item_id: Set(item.id),
            input_id: Set(catalog.id.into_inner()),
            quantity: Set(derived.quantity),
            performance: Set(pricing.performance),
            unit_cost: Set(pricing.unit_cost),
            total_cost: Set(derived.total_cost),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            item_id = item.id,
            detail_id = model.id,
            input_id = %input.input_id,
            "Quotation item detail created"
        );
        Ok(detail_to_domain(model))
    }

    /// Updates a detail and re-derives its quantity and total cost.
    ///
    /// Changing the input re-reads cost and performance from the new input
    /// unless they are given explicitly.
    ///
    /// # Errors
    ///
    /// Returns `DetailNotFound`, `InputNotFound`, or a validation error.
    pub async fn update_item_detail(
        &self,
        id: QuotationItemDetailId,
        input: UpdateItemDetailInput,
    ) -> Result<QuotationItemDetail, RepositoryError> {
        let txn = self.db.begin().await?;
        let current = live_detail(&txn, id).await?;
        let item = live_item(&txn, QuotationItemId::new(current.quotation_item_id)).await?;

        let new_input = match input.input_id {
            Some(input_id) if input_id.into_inner() != current.input_id => {
                Some(find_input(&txn, input_id).await?)
            }
            _ => None,
        };

        let stored = detail_to_domain(current.clone());
        let pricing = PricingService::resolve_update(
            &stored,
            new_input.as_ref(),
            input.unit_cost,
            input.performance,
        );
        PricingService::validate_detail(pricing)?;
        let derived = PricingService::derive_detail(item.quantity, pricing)?;

        let mut active: quotation_item_details::ActiveModel = current.into();
        if let Some(catalog) = &new_input {
            active.input_id = Set(catalog.id.into_inner());
        }
        active.performance = Set(pricing.performance);
        active.unit_cost = Set(pricing.unit_cost);
        active.quantity = Set(derived.quantity);
        active.total_cost = Set(derived.total_cost);
        active.updated_at = Set(Utc::now().into());
        let model = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(detail_id = %id, "Quotation item detail updated");
        Ok(detail_to_domain(model))
    }

    /// Deletes a detail.
    ///
    /// # Errors
    ///
    /// Returns `DetailNotFound` if the detail does not exist.
    pub async fn delete_item_detail(&self, id: QuotationItemDetailId) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        let current = live_detail(&txn, id).await?;

        quotation_item_details::Entity::delete_by_id(current.id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(detail_id = %id, "Quotation item detail deleted");
        Ok(())
    }

    /// Lists the details of an item, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item does not exist.
    pub async fn list_item_details(
        &self,
        item_id: QuotationItemId,
    ) -> Result<Vec<QuotationItemDetail>, RepositoryError> {
        let item = live_item(&self.db, item_id).await?;

        let models = quotation_item_details::Entity::find()
            .filter(quotation_item_details::Column::QuotationItemId.eq(item.id))
            .order_by_asc(quotation_item_details::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(detail_to_domain).collect())
    }

    /// Gets a catalog input by ID.
    ///
    /// # Errors
    ///
    /// Returns `InputNotFound` if the input does not exist.
    pub async fn find_input(&self, id: InputId) -> Result<Input, RepositoryError> {
        find_input(&self.db, id).await
    }

    // ========================================================================
    // Pricing configuration
    // ========================================================================

    /// Sets the overhead percentages of a quotation, creating the row on first use.
    ///
    /// Every field is overwritten, so repeating a call is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown quotation and `NegativeValue` for negative rates.
    pub async fn set_percentage(
        &self,
        quotation_id: QuotationId,
        values: PercentageValues,
    ) -> Result<QuotationPercentage, RepositoryError> {
        PricingService::validate_percentages(&values)?;

        let txn = self.db.begin().await?;
        live_quotation(&txn, quotation_id).await?;

        let existing = quotation_percentages::Entity::find()
            .filter(quotation_percentages::Column::QuotationId.eq(quotation_id.into_inner()))
            .one(&txn)
            .await?;

        let mut active: quotation_percentages::ActiveModel = match existing {
            Some(model) => model.into(),
            None => quotation_percentages::ActiveModel {
                quotation_id: Set(quotation_id.into_inner()),
                ..Default::default()
            },
        };
        active.administration = Set(values.administration);
        active.unforeseen = Set(values.unforeseen);
        active.utility = Set(values.utility);
        active.vat = Set(values.vat);
        active.updated_at = Set(Utc::now().into());
        active.save(&txn).await?;

        txn.commit().await?;

        tracing::info!(quotation_id = %quotation_id, "Quotation percentage set");
        Ok(QuotationPercentage {
            quotation_id,
            administration: values.administration,
            unforeseen: values.unforeseen,
            utility: values.utility,
            vat: values.vat,
        })
    }

    /// Sets the additional costs of a quotation, creating the row on first use.
    ///
    /// Every field is overwritten, so repeating a call is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown quotation and `NegativeValue` for negative values.
    pub async fn set_additional_cost(
        &self,
        quotation_id: QuotationId,
        values: AdditionalCostValues,
    ) -> Result<QuotationAdditionalCost, RepositoryError> {
        PricingService::validate_additional_costs(&values)?;

        let txn = self.db.begin().await?;
        live_quotation(&txn, quotation_id).await?;

        let existing = quotation_additional_costs::Entity::find()
            .filter(quotation_additional_costs::Column::QuotationId.eq(quotation_id.into_inner()))
            .one(&txn)
            .await?;

        let mut active: quotation_additional_costs::ActiveModel = match existing {
            Some(model) => model.into(),
            None => quotation_additional_costs::ActiveModel {
                quotation_id: Set(quotation_id.into_inner()),
                ..Default::default()
            },
        };
        active.per_diem = Set(values.per_diem);
        active.siso_value = Set(values.siso_value);
        active.tax = Set(values.tax);
        active.commission = Set(values.commission);
        active.petty_cash = Set(values.petty_cash);
        active.policy = Set(values.policy);
        active.utility = Set(values.utility);
        active.updated_at = Set(Utc::now().into());
        active.save(&txn).await?;

        txn.commit().await?;

        tracing::info!(quotation_id = %quotation_id, "Quotation additional cost set");
        Ok(QuotationAdditionalCost {
            quotation_id,
            per_diem: values.per_diem,
            siso_value: values.siso_value,
            tax: values.tax,
            commission: values.commission,
            petty_cash: values.petty_cash,
            policy: values.policy,
            utility: values.utility,
        })
    }
}

impl QuotationRepoTrait for QuotationRepository {
    async fn find_quotation(&self, id: QuotationId) -> Result<Option<Quotation>, QuotationError> {
        Reader::new(&self.db).find_quotation(id).await
    }

    async fn list_items(
        &self,
        quotation_id: QuotationId,
    ) -> Result<Vec<QuotationItem>, QuotationError> {
        Reader::new(&self.db).list_items(quotation_id).await
    }

    async fn list_details(
        &self,
        item_ids: &[QuotationItemId],
    ) -> Result<Vec<QuotationItemDetail>, QuotationError> {
        Reader::new(&self.db).list_details(item_ids).await
    }

    async fn find_percentage(
        &self,
        quotation_id: QuotationId,
    ) -> Result<Option<QuotationPercentage>, QuotationError> {
        Reader::new(&self.db).find_percentage(quotation_id).await
    }

    async fn find_additional_cost(
        &self,
        quotation_id: QuotationId,
    ) -> Result<Option<QuotationAdditionalCost>, QuotationError> {
        Reader::new(&self.db).find_additional_cost(quotation_id).await
    }
}

/// Report reads over a pooled connection or an open transaction.
struct Reader<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> Reader<'a, C> {
    const fn new(conn: &'a C) -> Self {
        Self { conn }
    }
}

impl<C: ConnectionTrait> QuotationRepoTrait for Reader<'_, C> {
    async fn find_quotation(&self, id: QuotationId) -> Result<Option<Quotation>, QuotationError> {
        let model = quotations::Entity::find_by_id(id.into_inner())
            .filter(quotations::Column::DeletedAt.is_null())
            .one(self.conn)
            .await
            .map_err(|e| QuotationError::repository(e.to_string()))?;

        Ok(model.map(quotation_to_domain))
    }

    async fn list_items(
        &self,
        quotation_id: QuotationId,
    ) -> Result<Vec<QuotationItem>, QuotationError> {
        let models = quotation_items::Entity::find()
            .filter(quotation_items::Column::QuotationId.eq(quotation_id.into_inner()))
            .order_by_asc(quotation_items::Column::Id)
            .all(self.conn)
            .await
            .map_err(|e| QuotationError::repository(e.to_string()))?;

        Ok(models.into_iter().map(item_to_domain).collect())
    }

    async fn list_details(
        &self,
        item_ids: &[QuotationItemId],
    ) -> Result<Vec<QuotationItemDetail>, QuotationError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = quotation_item_details::Entity::find()
            .filter(
                quotation_item_details::Column::QuotationItemId
                    .is_in(item_ids.iter().map(|id| id.into_inner())),
            )
            .order_by_asc(quotation_item_details::Column::Id)
            .all(self.conn)
            .await
            .map_err(|e| QuotationError::repository(e.to_string()))?;

        Ok(models.into_iter().map(detail_to_domain).collect())
    }

    async fn find_percentage(
        &self,
        quotation_id: QuotationId,
    ) -> Result<Option<QuotationPercentage>, QuotationError> {
        let model = quotation_percentages::Entity::find()
            .filter(quotation_percentages::Column::QuotationId.eq(quotation_id.into_inner()))
            .one(self.conn)
            .await
            .map_err(|e| QuotationError::repository(e.to_string()))?;

        Ok(model.map(|m| QuotationPercentage {
            quotation_id: QuotationId::new(m.quotation_id),
            administration: m.administration,
            unforeseen: m.unforeseen,
            utility: m.utility,
            vat: m.vat,
        }))
    }

    async fn find_additional_cost(
        &self,
        quotation_id: QuotationId,
    ) -> Result<Option<QuotationAdditionalCost>, QuotationError> {
        let model = quotation_additional_costs::Entity::find()
            .filter(quotation_additional_costs::Column::QuotationId.eq(quotation_id.into_inner()))
            .one(self.conn)
            .await
            .map_err(|e| QuotationError::repository(e.to_string()))?;

        Ok(model.map(|m| QuotationAdditionalCost {
            quotation_id: QuotationId::new(m.quotation_id),
            per_diem: m.per_diem,
            siso_value: m.siso_value,
            tax: m.tax,
            commission: m.commission,
            petty_cash: m.petty_cash,
            policy: m.policy,
            utility: m.utility,
        }))
    }
}

// ============================================================================
// Lookups shared by the connection and transaction paths
// ============================================================================

async fn live_quotation<C: ConnectionTrait>(
    conn: &C,
    id: QuotationId,
) -> Result<quotations::Model, RepositoryError> {
    quotations::Entity::find_by_id(id.into_inner())
        .filter(quotations::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or_else(|| QuotationError::NotFound(id).into())
}

/// An item whose quotation is still live.
async fn live_item<C: ConnectionTrait>(
    conn: &C,
    id: QuotationItemId,
) -> Result<quotation_items::Model, RepositoryError> {
    let item = quotation_items::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or(QuotationError::ItemNotFound(id))?;

    match live_quotation(conn, QuotationId::new(item.quotation_id)).await {
        Ok(_) => Ok(item),
        Err(RepositoryError::Quotation(QuotationError::NotFound(_))) => {
            Err(QuotationError::ItemNotFound(id).into())
        }
        Err(e) => Err(e),
    }
}

async fn live_detail<C: ConnectionTrait>(
    conn: &C,
    id: QuotationItemDetailId,
) -> Result<quotation_item_details::Model, RepositoryError> {
    let detail = quotation_item_details::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or(QuotationError::DetailNotFound(id))?;

    match live_item(conn, QuotationItemId::new(detail.quotation_item_id)).await {
        Ok(_) => Ok(detail),
        Err(RepositoryError::Quotation(QuotationError::ItemNotFound(_))) => {
            Err(QuotationError::DetailNotFound(id).into())
        }
        Err(e) => Err(e),
    }
}

async fn find_input<C: ConnectionTrait>(conn: &C, id: InputId) -> Result<Input, RepositoryError> {
    let model = inputs::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or(QuotationError::InputNotFound(id))?;

    Ok(Input {
        id: InputId::new(model.id),
        name: model.name,
        unit: model.unit,
        cost: model.cost,
        performance: model.performance,
    })
}

// ============================================================================
// Model conversion
// ============================================================================

fn quotation_to_domain(model: quotations::Model) -> Quotation {
    Quotation {
        id: QuotationId::new(model.id),
        name: model.name,
        client: model.client,
        builder: model.builder,
        responsible_employee_id: model.responsible_employee_id.map(EmployeeId::new),
        status_id: model.status_id.map(QuotationStatusId::new),
        consecutive_code: model.consecutive_code,
        total_cost: model.total_cost,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn item_to_domain(model: quotation_items::Model) -> QuotationItem {
    QuotationItem {
        id: QuotationItemId::new(model.id),
        quotation_id: QuotationId::new(model.quotation_id),
        item: model.item,
        technical_specification: model.technical_specification,
        unit_of_measure: model.unit_of_measure,
        quantity: model.quantity,
        unit_price: model.unit_price,
        total: model.total,
    }
}

fn detail_to_domain(model: quotation_item_details::Model) -> QuotationItemDetail {
    QuotationItemDetail {
        id: QuotationItemDetailId::new(model.id),
        quotation_item_id: QuotationItemId::new(model.quotation_item_id),
        input_id: InputId::new(model.input_id),
        quantity: model.quantity,
        performance: model.performance,
        unit_cost: model.unit_cost,
        total_cost: model.total_cost,
    }
}
