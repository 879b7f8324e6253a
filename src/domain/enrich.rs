//! Member detail enrichment.

use crate::domain::error::HousewatchError;
use crate::ports::feed_port::DisclosureFeed;
use crate::ports::store_port::TradeStore;
use tracing::{info, warn};

/// Progress-cursor task name for this job.
pub const MEMBERS_TASK: &str = "members";

/// Fetch and store the biographical document for every distinct filer past
/// the stored watermark, in ascending full-name order.
///
/// The cursor advances after every attempted filer, success or not: a
/// permanently failing filer is marked processed-but-unavailable and is never
/// automatically retried. Forward progress over completeness.
pub fn enrich_members(
    feed: &dyn DisclosureFeed,
    store: &dyn TradeStore,
) -> Result<(), HousewatchError> {
    let filers = store.distinct_filers()?;
    let cursor = store.get_cursor(MEMBERS_TASK)?;
    for filer in filers {
        let full_name = filer.full_name();
        if cursor.as_deref().is_some_and(|last| full_name.as_str() <= last) {
            continue;
        }
        match feed.fetch_member_detail(&full_name) {
            Ok(detail) => {
                store.store_member_detail(&full_name, &detail)?;
                info!(member = %full_name, "stored member detail");
            }
            Err(e) => {
                warn!(member = %full_name, error = %e, "detail fetch failed");
            }
        }
        store.set_cursor(MEMBERS_TASK, &full_name)?;
    }
    Ok(())
}
