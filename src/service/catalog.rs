use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::schedule_rule::ScheduleRule;
use crate::model::shift::{Shift, ShiftType, parse_hhmm};
use crate::store::{
    CatalogStore, NewScheduleRule, NewShift, ScheduleRuleUpdate, ShiftTypeUpdate, ShiftUpdate,
};
use crate::utils::assignment_cache;

/// Reusable shift/shift-type templates and schedule rules. Configuration
/// data; the only cross-entity rule is referential validity.
pub struct CatalogService {
    catalog: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    // -------------------------
    // Shift types
    // -------------------------

    pub async fn create_shift_type(&self, name: String) -> Result<ShiftType> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::invalid("shift type name must not be empty"));
        }
        self.catalog.insert_shift_type(name).await
    }

    pub async fn get_shift_type(&self, id: u64) -> Result<ShiftType> {
        self.catalog
            .get_shift_type(id)
            .await?
            .ok_or(Error::NotFound("shift type", id))
    }

    pub async fn list_shift_types(&self) -> Result<Vec<ShiftType>> {
        self.catalog.list_shift_types().await
    }

    pub async fn update_shift_type(&self, id: u64, update: ShiftTypeUpdate) -> Result<ShiftType> {
        self.catalog
            .update_shift_type(id, update)
            .await?
            .ok_or(Error::NotFound("shift type", id))
    }

    // -------------------------
    // Shifts
    // -------------------------

    pub async fn create_shift(&self, new: NewShift) -> Result<Shift> {
        parse_hhmm(&new.start_time)?;
        parse_hhmm(&new.end_time)?;
        self.get_shift_type(new.shift_type_id).await?;
        let shift = self.catalog.insert_shift(new).await?;
        assignment_cache::invalidate_all();
        Ok(shift)
    }

    pub async fn get_shift(&self, id: u64) -> Result<Shift> {
        self.catalog
            .get_shift(id)
            .await?
            .ok_or(Error::NotFound("shift", id))
    }

    pub async fn list_shifts(&self) -> Result<Vec<Shift>> {
        self.catalog.list_shifts().await
    }

    pub async fn update_shift(&self, id: u64, update: ShiftUpdate) -> Result<Shift> {
        if let Some(start_time) = update.start_time.as_deref() {
            parse_hhmm(start_time)?;
        }
        if let Some(end_time) = update.end_time.as_deref() {
            parse_hhmm(end_time)?;
        }
        if let Some(shift_type_id) = update.shift_type_id {
            self.get_shift_type(shift_type_id).await?;
        }
        let shift = self
            .catalog
            .update_shift(id, update)
            .await?
            .ok_or(Error::NotFound("shift", id))?;
        assignment_cache::invalidate_all();
        Ok(shift)
    }

    // -------------------------
    // Schedule rules
    // -------------------------

    pub async fn create_schedule_rule(&self, new: NewScheduleRule) -> Result<ScheduleRule> {
        if new.name.trim().is_empty() {
            return Err(Error::invalid("schedule rule name must not be empty"));
        }
        self.catalog.insert_schedule_rule(new).await
    }

    pub async fn get_schedule_rule(&self, id: u64) -> Result<ScheduleRule> {
        self.catalog
            .get_schedule_rule(id)
            .await?
            .ok_or(Error::NotFound("schedule rule", id))
    }

    pub async fn list_schedule_rules(&self) -> Result<Vec<ScheduleRule>> {
        self.catalog.list_schedule_rules().await
    }

    pub async fn update_schedule_rule(
        &self,
        id: u64,
        update: ScheduleRuleUpdate,
    ) -> Result<ScheduleRule> {
        self.catalog
            .update_schedule_rule(id, update)
            .await?
            .ok_or(Error::NotFound("schedule rule", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shift::PunchPolicy;
    use crate::store::Stores;

    fn service() -> CatalogService {
        CatalogService::new(Stores::memory().catalog)
    }

    #[actix_web::test]
    async fn shift_requires_existing_shift_type() {
        let catalog = service();
        let err = catalog
            .create_shift(NewShift {
                shift_type_id: 999,
                start_time: "09:00".into(),
                end_time: "17:00".into(),
                punch_policy: PunchPolicy::All,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound("shift type", 999)));
    }

    #[actix_web::test]
    async fn shift_rejects_malformed_times() {
        let catalog = service();
        let shift_type = catalog.create_shift_type("General".into()).await.unwrap();
        let err = catalog
            .create_shift(NewShift {
                shift_type_id: shift_type.id,
                start_time: "9am".into(),
                end_time: "17:00".into(),
                punch_policy: PunchPolicy::All,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StructuralInvalid(_)));
    }

    #[actix_web::test]
    async fn lifecycle_toggle_round_trips() {
        let catalog = service();
        let shift_type = catalog.create_shift_type("General".into()).await.unwrap();
        let updated = catalog
            .update_shift_type(
                shift_type.id,
                ShiftTypeUpdate {
                    name: None,
                    active: Some(false),
                },
            )
            .await
            .unwrap();
        assert!(!updated.active);
        assert_eq!(updated.name, "General");
    }
}
