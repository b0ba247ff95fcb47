use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::work_rules::{Holiday, LatenessRule, OvertimeRule};
use crate::store::{
    LatenessRuleUpdate, NewHoliday, NewLatenessRule, NewOvertimeRule, OvertimeRuleUpdate,
    WorkRuleStore,
};

/// Administrative CRUD over the reporting configuration entities. No
/// cross-entity side effects.
pub struct WorkRuleService {
    work_rules: Arc<dyn WorkRuleStore>,
}

impl WorkRuleService {
    pub fn new(work_rules: Arc<dyn WorkRuleStore>) -> Self {
        Self { work_rules }
    }

    pub async fn create_overtime_rule(&self, new: NewOvertimeRule) -> Result<OvertimeRule> {
        if new.multiplier <= 0.0 {
            return Err(Error::invalid("overtime multiplier must be positive"));
        }
        self.work_rules.insert_overtime_rule(new).await
    }

    pub async fn list_overtime_rules(&self) -> Result<Vec<OvertimeRule>> {
        self.work_rules.list_overtime_rules().await
    }

    pub async fn update_overtime_rule(
        &self,
        id: u64,
        update: OvertimeRuleUpdate,
    ) -> Result<OvertimeRule> {
        if matches!(update.multiplier, Some(m) if m <= 0.0) {
            return Err(Error::invalid("overtime multiplier must be positive"));
        }
        self.work_rules
            .update_overtime_rule(id, update)
            .await?
            .ok_or(Error::NotFound("overtime rule", id))
    }

    pub async fn create_lateness_rule(&self, new: NewLatenessRule) -> Result<LatenessRule> {
        if new.grace_minutes < 0 {
            return Err(Error::invalid("grace minutes cannot be negative"));
        }
        self.work_rules.insert_lateness_rule(new).await
    }

    pub async fn list_lateness_rules(&self) -> Result<Vec<LatenessRule>> {
        self.work_rules.list_lateness_rules().await
    }

    pub async fn update_lateness_rule(
        &self,
        id: u64,
        update: LatenessRuleUpdate,
    ) -> Result<LatenessRule> {
        self.work_rules
            .update_lateness_rule(id, update)
            .await?
            .ok_or(Error::NotFound("lateness rule", id))
    }

    pub async fn create_holiday(&self, new: NewHoliday) -> Result<Holiday> {
        self.work_rules.insert_holiday(new).await
    }

    pub async fn list_holidays(&self) -> Result<Vec<Holiday>> {
        self.work_rules.list_holidays().await
    }

    pub async fn delete_holiday(&self, id: u64) -> Result<()> {
        if !self.work_rules.delete_holiday(id).await? {
            return Err(Error::NotFound("holiday", id));
        }
        Ok(())
    }
}
