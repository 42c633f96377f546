//! AWS Lambda handler for pricing quotations
//!
//! Accepts a batch of quotation requests as JSON and returns the computed
//! totals per quotation. The request layer owns persistence and HTTP; this
//! function only runs the engine.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use precast_quotation::engine::{QuotationEngine, QuotationRequest};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Input payload: one or more quotations priced with the same reference data
#[derive(Debug, Deserialize)]
pub struct BatchQuotationRequest {
    pub quotations: Vec<QuotationRequest>,

    /// Also return the per-piece breakdown rows (default: totals only)
    #[serde(default)]
    pub include_breakdowns: bool,
}

/// Outcome for one quotation of the batch
#[derive(Debug, Serialize)]
pub struct QuotationOutcome {
    /// Position in the request batch
    pub index: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<precast_quotation::QuotationTotals>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub polynomial_factor: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub truck_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdowns: Option<Vec<precast_quotation::costing::CostBreakdown>>,

    pub partial_pricing: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response payload
#[derive(Debug, Serialize)]
pub struct BatchQuotationResponse {
    pub outcomes: Vec<QuotationOutcome>,
    pub priced: usize,
    pub failed: usize,
}

async fn handler(event: LambdaEvent<BatchQuotationRequest>) -> Result<BatchQuotationResponse, Error> {
    let request = event.payload;
    let engine = QuotationEngine::new();

    let outcomes: Vec<QuotationOutcome> = request
        .quotations
        .par_iter()
        .enumerate()
        .map(|(index, quotation)| match engine.price(quotation) {
            Ok(result) => QuotationOutcome {
                index,
                partial_pricing: result.partial_pricing,
                totals: Some(result.totals),
                polynomial_factor: Some(result.polynomial_factor),
                truck_count: Some(result.freight.truck_count),
                breakdowns: request.include_breakdowns.then_some(result.breakdowns),
                error: None,
            },
            Err(err) => QuotationOutcome {
                index,
                partial_pricing: false,
                totals: None,
                polynomial_factor: None,
                truck_count: None,
                breakdowns: None,
                error: Some(err.to_string()),
            },
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();

    Ok(BatchQuotationResponse {
        priced: outcomes.len() - failed,
        failed,
        outcomes,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
