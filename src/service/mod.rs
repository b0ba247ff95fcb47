pub mod assignment;
pub mod catalog;
pub mod correction;
pub mod exception;
pub mod notify;
pub mod report;
pub mod timeclock;
pub mod work_rules;

#[cfg(test)]
pub mod test_support;

use std::sync::Arc;

use crate::config::Config;
use crate::store::Stores;
use crate::utils::clock::Clock;

/// Service handles shared with every handler; wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<catalog::CatalogService>,
    pub assignments: Arc<assignment::AssignmentService>,
    pub timeclock: Arc<timeclock::TimeClockService>,
    pub corrections: Arc<correction::CorrectionService>,
    pub exceptions: Arc<exception::ExceptionService>,
    pub reports: Arc<report::ReportService>,
    pub work_rules: Arc<work_rules::WorkRuleService>,
}

impl AppState {
    pub fn build(stores: Stores, clock: Arc<dyn Clock>, config: &Config) -> Self {
        let notifier = Arc::new(notify::Notifier::new(
            stores.notifications.clone(),
            clock.clone(),
        ));
        let catalog = Arc::new(catalog::CatalogService::new(stores.catalog.clone()));
        let assignments = Arc::new(assignment::AssignmentService::new(
            stores.assignments.clone(),
            stores.catalog.clone(),
            clock.clone(),
        ));
        let exceptions = Arc::new(exception::ExceptionService::new(
            stores.exceptions.clone(),
            stores.attendance.clone(),
            notifier.clone(),
            clock.clone(),
            config.exception_escalation_hours,
            config.sweep_batch_limit,
        ));
        let timeclock = Arc::new(timeclock::TimeClockService::new(
            stores.attendance.clone(),
            assignments.clone(),
            exceptions.clone(),
            notifier.clone(),
            clock.clone(),
        ));
        let corrections = Arc::new(correction::CorrectionService::new(
            stores.corrections.clone(),
            stores.attendance.clone(),
            stores.exceptions.clone(),
            notifier.clone(),
            clock.clone(),
            config.sweep_batch_limit,
        ));
        let reports = Arc::new(report::ReportService::new(
            stores.attendance.clone(),
            stores.exceptions.clone(),
            stores.work_rules.clone(),
            assignments.clone(),
        ));
        let work_rules = Arc::new(work_rules::WorkRuleService::new(stores.work_rules.clone()));

        Self {
            catalog,
            assignments,
            timeclock,
            corrections,
            exceptions,
            reports,
            work_rules,
        }
    }
}
