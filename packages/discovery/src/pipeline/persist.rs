//! Persistence of a discovered business across business, tip, and tag rows.

use tracing::debug;

use crate::error::Result;
use crate::traits::store::BusinessStore;
use crate::types::business::{BusinessId, DiscoveredBusiness};

/// Insert a business and its tips and tags, returning the new business id.
///
/// The business row is written first so child rows can reference its id.
/// Empty collections are skipped without calling the store. Insert failures
/// surface unchanged; rows already written are not rolled back.
pub async fn persist_business<S: BusinessStore + ?Sized>(
    store: &S,
    business: &DiscoveredBusiness,
) -> Result<BusinessId> {
    let business_id = store.insert_business(&business.to_new_business()).await?;

    let tips = business.tip_rows(business_id);
    if !tips.is_empty() {
        store.insert_tips(&tips).await?;
    }

    let tags = business.tag_rows(business_id);
    if !tags.is_empty() {
        store.insert_tags(&tags).await?;
    }

    debug!(
        business_id = business_id,
        tips = tips.len(),
        tags = tags.len(),
        "Persisted business"
    );

    Ok(business_id)
}
