//! Structured payload the model returns for a thread.

use serde::{Deserialize, Serialize};

use crate::types::business::DiscoveredBusiness;

/// Parsed model verdict for one thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutput {
    /// The thread describes no qualifying business.
    NotFound,
    Found(BusinessFound),
}

impl AnalysisOutput {
    pub fn business_found(&self) -> bool {
        matches!(self, AnalysisOutput::Found(_))
    }
}

/// Fields the model must provide when `business_found` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessFound {
    pub product_name: String,
    pub product_description: String,
    #[serde(default)]
    pub link_to_product: Option<String>,
    #[serde(default)]
    pub revenue_in_usd: Option<f64>,
    pub detailed_tactics_used_for_revenue: String,
    #[serde(default)]
    pub technical_details: Option<String>,
    pub additional_tips: Vec<String>,
    pub tags: Vec<String>,
}

impl BusinessFound {
    /// Attach the source URL and map model field names onto the record.
    pub fn into_discovered(self, scraped_url: impl Into<String>) -> DiscoveredBusiness {
        DiscoveredBusiness {
            scraped_url: scraped_url.into(),
            name: self.product_name,
            description: self.product_description,
            url: self.link_to_product,
            revenue: self.revenue_in_usd,
            revenue_tactics: self.detailed_tactics_used_for_revenue,
            technical_details: self.technical_details,
            tips: self.additional_tips,
            tags: self.tags,
        }
    }
}
