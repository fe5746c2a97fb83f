//! Business records: the validated extraction result and its persisted rows.

use serde::{Deserialize, Serialize};

pub type BusinessId = i64;

/// A validated extraction result, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredBusiness {
    /// Source URL the business was derived from
    pub scraped_url: String,
    pub name: String,
    pub description: String,
    /// Link to the product, if the model found one
    pub url: Option<String>,
    /// Revenue in USD, if stated in the thread
    pub revenue: Option<f64>,
    pub revenue_tactics: String,
    pub technical_details: Option<String>,
    pub tips: Vec<String>,
    pub tags: Vec<String>,
}

impl DiscoveredBusiness {
    /// The business row, without its child collections.
    pub fn to_new_business(&self) -> NewBusiness {
        NewBusiness {
            scraped_url: self.scraped_url.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            url: self.url.clone(),
            revenue: self.revenue,
            revenue_tactics: self.revenue_tactics.clone(),
            technical_details: self.technical_details.clone(),
        }
    }

    pub fn tip_rows(&self, business_id: BusinessId) -> Vec<NewBusinessTip> {
        self.tips
            .iter()
            .map(|tip| NewBusinessTip {
                business_id,
                tip: tip.clone(),
            })
            .collect()
    }

    pub fn tag_rows(&self, business_id: BusinessId) -> Vec<NewBusinessTag> {
        self.tags
            .iter()
            .map(|tag| NewBusinessTag {
                business_id,
                tag: tag.clone(),
            })
            .collect()
    }
}

/// Insert payload for the `businesses` table.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBusiness {
    pub scraped_url: String,
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    pub revenue: Option<f64>,
    pub revenue_tactics: String,
    pub technical_details: Option<String>,
}

/// Persisted business row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::FromRow))]
pub struct Business {
    pub id: BusinessId,
    pub scraped_url: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub revenue: Option<f64>,
    pub revenue_tactics: Option<String>,
    pub technical_details: Option<String>,
}

impl Business {
    pub fn from_new(id: BusinessId, new: &NewBusiness) -> Self {
        Self {
            id,
            scraped_url: new.scraped_url.clone(),
            name: Some(new.name.clone()),
            description: Some(new.description.clone()),
            url: new.url.clone(),
            revenue: new.revenue,
            revenue_tactics: Some(new.revenue_tactics.clone()),
            technical_details: new.technical_details.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBusinessTip {
    pub business_id: BusinessId,
    pub tip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBusinessTag {
    pub business_id: BusinessId,
    pub tag: String,
}
