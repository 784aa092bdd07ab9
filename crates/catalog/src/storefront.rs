//! Listing state container.
//!
//! Owns the single `FilterCriteria` value, the product snapshot fetched for
//! it and the last computed page. Commands replace the criteria wholesale;
//! the visible page is always derived by re-running the engine.

use thiserror::Error;

use storefront_core::{DomainError, DomainResult, ProductId};
use storefront_products::{ProductRecord, find_by_id, related_products};

use crate::bounds::PriceBounds;
use crate::config::CatalogConfig;
use crate::criteria::{CriteriaCommand, FilterCriteria, PriceRange};
use crate::engine::{CatalogPage, query};
use crate::sequence::{RequestSequencer, Ticket};
use crate::source::{ProductSource, SourceError};
use crate::strategy::FetchPlan;

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// An in-flight fetch. Hand it back to [`Storefront::complete_fetch`] with
/// the products the source returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: Ticket,
    pub plan: FetchPlan,
}

pub struct Storefront<S> {
    source: S,
    config: CatalogConfig,
    criteria: FilterCriteria,
    products: Vec<ProductRecord>,
    loaded_plan: Option<FetchPlan>,
    bounds: Option<PriceBounds>,
    sequencer: RequestSequencer,
    last_page: Option<(FilterCriteria, CatalogPage)>,
}

impl<S> Storefront<S>
where
    S: ProductSource,
{
    /// A storefront with the configured initial criteria and nothing loaded.
    pub fn new(source: S, config: CatalogConfig) -> Self {
        let criteria = config.initial_criteria();
        Self {
            source,
            config,
            criteria,
            products: Vec::new(),
            loaded_plan: None,
            bounds: None,
            sequencer: RequestSequencer::new(),
            last_page: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Current product snapshot (possibly pre-filtered by the server).
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn bounds(&self) -> Option<PriceBounds> {
        self.bounds
    }

    /// Price window for the slider: the explicit bounds clamped into the
    /// observed ones, or the observed ones when none are set.
    pub fn price_window(&self) -> Option<PriceRange> {
        self.bounds.map(|bounds| bounds.resolve(&self.criteria))
    }

    /// The plan the current criteria call for.
    pub fn required_plan(&self) -> FetchPlan {
        FetchPlan::for_criteria(&self.criteria, self.config.server_filtering)
    }

    /// Whether the loaded snapshot can't serve the current criteria.
    pub fn needs_fetch(&self) -> bool {
        !self.serves(&self.required_plan())
    }

    fn serves(&self, plan: &FetchPlan) -> bool {
        self.loaded_plan
            .as_ref()
            .is_some_and(|loaded| loaded.covers(plan))
    }

    /// Start a fetch for the current criteria.
    ///
    /// For callers that run the source themselves (off-thread or async);
    /// [`Storefront::load`] does both halves inline.
    pub fn begin_fetch(&self) -> FetchRequest {
        self.begin_fetch_for(self.required_plan())
    }

    fn begin_fetch_for(&self, plan: FetchPlan) -> FetchRequest {
        let request = FetchRequest {
            ticket: self.sequencer.issue(),
            plan,
        };
        tracing::info!(ticket = request.ticket.get(), plan = %request.plan, "fetching products");
        request
    }

    /// Install the result of `request`. Returns `false`, leaving state
    /// untouched, when a newer request has already completed.
    ///
    /// Price bounds are only taken from unfiltered listings; until one
    /// arrives they stay `None`.
    pub fn complete_fetch(&mut self, request: FetchRequest, products: Vec<ProductRecord>) -> bool {
        if !self.sequencer.accept(request.ticket) {
            return false;
        }

        if request.plan == FetchPlan::All {
            self.bounds = PriceBounds::observe(&products);
        }

        tracing::info!(
            ticket = request.ticket.get(),
            plan = %request.plan,
            count = products.len(),
            "products loaded"
        );

        self.products = products;
        self.loaded_plan = Some(request.plan);
        self.last_page = None;
        true
    }

    /// Fetch from the source when the snapshot doesn't cover the current
    /// criteria. A failed fetch keeps the previous snapshot; the next call
    /// retries.
    pub fn load(&mut self) -> Result<(), SourceError> {
        self.ensure_loaded(self.required_plan())
    }

    fn ensure_loaded(&mut self, plan: FetchPlan) -> Result<(), SourceError> {
        if self.serves(&plan) {
            return Ok(());
        }

        let request = self.begin_fetch_for(plan);
        let products = self.source.fetch(&request.plan).inspect_err(|e| {
            tracing::warn!(plan = %request.plan, error = %e, "product fetch failed");
        })?;
        let plan = request.plan.clone();
        if !self.complete_fetch(request, products) {
            return Err(SourceError::Unavailable(format!(
                "response for {plan} was superseded"
            )));
        }
        Ok(())
    }

    /// Apply a shopper command and return the resulting page.
    ///
    /// The new criteria replace the current ones only once they validate and
    /// the snapshot can serve them. On error, criteria and snapshot are left
    /// as they were. `Clear` goes back to the configured defaults.
    pub fn dispatch(&mut self, command: CriteriaCommand) -> Result<CatalogPage, StorefrontError> {
        let next = self
            .criteria
            .apply_with_defaults(command, &self.config.initial_criteria());
        next.validate()?;

        self.ensure_loaded(FetchPlan::for_criteria(&next, self.config.server_filtering))?;
        self.criteria = next;
        Ok(self.view()?)
    }

    /// The page for the current criteria, recomputed only when the criteria
    /// or the snapshot changed since the last call.
    pub fn view(&mut self) -> DomainResult<CatalogPage> {
        if let Some((criteria, page)) = &self.last_page {
            if *criteria == self.criteria {
                return Ok(page.clone());
            }
        }

        let page = query(&self.products, &self.criteria)?;
        self.last_page = Some((self.criteria.clone(), page.clone()));
        Ok(page)
    }

    /// Products related to `id` within the loaded snapshot.
    pub fn related(&self, id: ProductId) -> DomainResult<Vec<&ProductRecord>> {
        let product = find_by_id(&self.products, id)?;
        Ok(related_products(&self.products, product, self.config.related_limit))
    }
}
