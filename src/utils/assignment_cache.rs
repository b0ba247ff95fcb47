use anyhow::Result;
use chrono::NaiveDate;
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::time::Duration;

use crate::model::assignment::ResolvedShift;
use crate::store::Stores;

/// Resolution cache for "what shift is this employee on that day."
/// A cached `None` means the resolver already looked and found nothing.
pub static ASSIGNMENT_CACHE: Lazy<Cache<(u64, NaiveDate), Option<ResolvedShift>>> =
    Lazy::new(|| {
        Cache::builder()
            .max_capacity(100_000)
            .time_to_live(Duration::from_secs(300)) // 5 min TTL
            .build()
    });

pub async fn get(employee_id: u64, date: NaiveDate) -> Option<Option<ResolvedShift>> {
    ASSIGNMENT_CACHE.get(&(employee_id, date)).await
}

pub async fn put(employee_id: u64, date: NaiveDate, resolved: Option<ResolvedShift>) {
    ASSIGNMENT_CACHE.insert((employee_id, date), resolved).await;
}

/// Any catalog or assignment write may change what resolves; drop everything.
pub fn invalidate_all() {
    ASSIGNMENT_CACHE.invalidate_all();
}

/// Pre-resolve every employee with an approved assignment covering `date`.
pub async fn warmup_assignment_cache(stores: &Stores, date: NaiveDate) -> Result<()> {
    let assignments = stores.assignments.approved_on(date).await?;

    let mut seen = HashSet::new();
    let mut inserts = Vec::new();
    for assignment in assignments {
        // Lowest id wins on overlap, same as the resolver.
        if !seen.insert(assignment.employee_id) {
            continue;
        }
        if let Some(shift) = stores.catalog.get_shift(assignment.shift_id).await? {
            let key = (assignment.employee_id, date);
            inserts.push(ASSIGNMENT_CACHE.insert(key, Some(ResolvedShift { assignment, shift })));
        }
    }

    let total = inserts.len();
    futures::future::join_all(inserts).await;

    log::info!(
        "Assignment cache warmup complete: {} employees resolved for {}",
        total,
        date
    );

    Ok(())
}
