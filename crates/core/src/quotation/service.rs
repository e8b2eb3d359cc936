//! Quotation report service.

use std::sync::Arc;

use obrix_shared::types::{QuotationId, QuotationItemId};

use super::error::{MissingConfiguration, QuotationError};
use super::rollup::{RollupEngine, RollupInput};
use super::types::{
    PricedItem, Quotation, QuotationAdditionalCost, QuotationItem, QuotationItemDetail,
    QuotationPercentage, QuotationReport,
};

/// Read access to quotation data.
///
/// This trait is implemented by the db crate. Soft-deleted quotations must
/// not resolve through `find_quotation`.
pub trait QuotationRepository: Send + Sync {
    /// Find a live quotation by ID.
    fn find_quotation(
        &self,
        id: QuotationId,
    ) -> impl std::future::Future<Output = Result<Option<Quotation>, QuotationError>> + Send;

    /// List the items of a quotation, ordered by ID.
    fn list_items(
        &self,
        quotation_id: QuotationId,
    ) -> impl std::future::Future<Output = Result<Vec<QuotationItem>, QuotationError>> + Send;

    /// List the details belonging to any of the given items.
    fn list_details(
        &self,
        item_ids: &[QuotationItemId],
    ) -> impl std::future::Future<Output = Result<Vec<QuotationItemDetail>, QuotationError>> + Send;

    /// Find the percentage row of a quotation.
    fn find_percentage(
        &self,
        quotation_id: QuotationId,
    ) -> impl std::future::Future<Output = Result<Option<QuotationPercentage>, QuotationError>> + Send;

    /// Find the additional cost row of a quotation.
    fn find_additional_cost(
        &self,
        quotation_id: QuotationId,
    ) -> impl std::future::Future<Output = Result<Option<QuotationAdditionalCost>, QuotationError>>
    + Send;
}

/// Everything loaded for one rollup.
struct Snapshot {
    items: Vec<QuotationItem>,
    details: Vec<QuotationItemDetail>,
    percentage: QuotationPercentage,
    additional_cost: QuotationAdditionalCost,
}

impl Snapshot {
    fn report(&self) -> QuotationReport {
        RollupEngine::build(&RollupInput {
            items: &self.items,
            details: &self.details,
            percentage: &self.percentage,
            additional_cost: &self.additional_cost,
        })
    }
}

/// Builds cost reports from stored quotation data.
pub struct QuotationReportService<R: QuotationRepository> {
    repo: Arc<R>,
}

impl<R: QuotationRepository> QuotationReportService<R> {
    /// Create a new report service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Builds the report for a quotation.
    ///
    /// Quotations that are missing, soft-deleted, without items, or without a
    /// percentage or additional cost row yield [`QuotationReport::empty`].
    ///
    /// # Errors
    ///
    /// Returns an error only if the repository fails.
    pub async fn build_report(&self, id: QuotationId) -> Result<QuotationReport, QuotationError> {
        match self.load(id).await? {
            Ok(snapshot) => Ok(snapshot.report()),
            Err(_) => Ok(QuotationReport::empty()),
        }
    }

    /// Builds the report, failing when the quotation cannot be priced.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing quotation and `NotConfigured` naming the
    /// first missing part otherwise.
    pub async fn build_complete_report(
        &self,
        id: QuotationId,
    ) -> Result<QuotationReport, QuotationError> {
        match self.load(id).await? {
            Ok(snapshot) => Ok(snapshot.report()),
            Err(MissingConfiguration::Quotation) => Err(QuotationError::NotFound(id)),
            Err(missing) => Err(QuotationError::NotConfigured {
                quotation_id: id,
                missing,
            }),
        }
    }

    /// Lists the items of a quotation with their apportioned pricing.
    ///
    /// Items of a quotation that cannot be priced yet carry zeros.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the quotation does not exist.
    pub async fn priced_items(&self, id: QuotationId) -> Result<Vec<PricedItem>, QuotationError> {
        if self.repo.find_quotation(id).await?.is_none() {
            return Err(QuotationError::NotFound(id));
        }

        let items = self.repo.list_items(id).await?;
        let report = self.build_report(id).await?;

        Ok(items
            .into_iter()
            .map(|item| {
                let line = report
                    .items
                    .iter()
                    .find(|line| line.quotation_item_id == item.id);
                PricedItem {
                    percentage: line.map(|l| l.percentage).unwrap_or_default(),
                    unit_value: line.map(|l| l.unit_value).unwrap_or_default(),
                    apportioned_total: line.map(|l| l.total_cost).unwrap_or_default(),
                    item,
                }
            })
            .collect())
    }

    /// Loads a snapshot, or names the first missing part.
    async fn load(
        &self,
        id: QuotationId,
    ) -> Result<Result<Snapshot, MissingConfiguration>, QuotationError> {
        if self.repo.find_quotation(id).await?.is_none() {
            return Ok(Err(MissingConfiguration::Quotation));
        }

        let items = self.repo.list_items(id).await?;
        if items.is_empty() {
            return Ok(Err(MissingConfiguration::Items));
        }

        let Some(percentage) = self.repo.find_percentage(id).await? else {
            return Ok(Err(MissingConfiguration::Percentage));
        };

        let Some(additional_cost) = self.repo.find_additional_cost(id).await? else {
            return Ok(Err(MissingConfiguration::AdditionalCost));
        };

        let item_ids: Vec<QuotationItemId> = items.iter().map(|i| i.id).collect();
        let details = self.repo.list_details(&item_ids).await?;

        Ok(Ok(Snapshot {
            items,
            details,
            percentage,
            additional_cost,
        }))
    }
}
