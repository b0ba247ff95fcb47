use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{Error, Result};
use crate::model::assignment::{AssignmentStatus, ResolvedShift, ShiftAssignment};
use crate::store::{AssignmentStore, CatalogStore, NewAssignment};
use crate::utils::assignment_cache;
use crate::utils::clock::Clock;

/// Bulk creation target: either an explicit employee list, or a
/// department/position criterion that needs the employee directory.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkAssignmentRequest {
    #[schema(example = json!([1001, 1002, 1003]))]
    pub employee_ids: Option<Vec<u64>>,
    #[schema(example = 10, nullable = true)]
    pub department_id: Option<u64>,
    #[schema(example = 3, nullable = true)]
    pub position_id: Option<u64>,
    #[schema(example = 1)]
    pub shift_id: u64,
    #[schema(example = 1, nullable = true)]
    pub schedule_rule_id: Option<u64>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-06-30", format = "date", value_type = Option<String>, nullable = true)]
    pub end_date: Option<NaiveDate>,
}

/// Binds employees to shifts and answers "what shift is this employee on
/// today" for the punch processor.
pub struct AssignmentService {
    assignments: Arc<dyn AssignmentStore>,
    catalog: Arc<dyn CatalogStore>,
    clock: Arc<dyn Clock>,
}

impl AssignmentService {
    pub fn new(
        assignments: Arc<dyn AssignmentStore>,
        catalog: Arc<dyn CatalogStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            assignments,
            catalog,
            clock,
        }
    }

    async fn validate_references(
        &self,
        shift_id: u64,
        schedule_rule_id: Option<u64>,
    ) -> Result<()> {
        if self.catalog.get_shift(shift_id).await?.is_none() {
            return Err(Error::NotFound("shift", shift_id));
        }
        if let Some(rule_id) = schedule_rule_id {
            if self.catalog.get_schedule_rule(rule_id).await?.is_none() {
                return Err(Error::NotFound("schedule rule", rule_id));
            }
        }
        Ok(())
    }

    pub async fn create(&self, new: NewAssignment) -> Result<ShiftAssignment> {
        self.validate_references(new.shift_id, new.schedule_rule_id)
            .await?;
        if let Some(end_date) = new.end_date {
            if end_date < new.start_date {
                return Err(Error::invalid("end_date cannot be before start_date"));
            }
        }
        let assignment = self
            .assignments
            .insert_assignment(ShiftAssignment {
                id: 0,
                employee_id: new.employee_id,
                shift_id: new.shift_id,
                schedule_rule_id: new.schedule_rule_id,
                department_id: new.department_id,
                position_id: new.position_id,
                start_date: new.start_date,
                end_date: new.end_date,
                status: AssignmentStatus::Pending,
                created_at: self.clock.now(),
            })
            .await?;
        assignment_cache::invalidate_all();
        Ok(assignment)
    }

    pub async fn get(&self, id: u64) -> Result<ShiftAssignment> {
        self.assignments
            .get_assignment(id)
            .await?
            .ok_or(Error::NotFound("shift assignment", id))
    }

    pub async fn list(&self, employee_id: Option<u64>) -> Result<Vec<ShiftAssignment>> {
        self.assignments.list_assignments(employee_id).await
    }

    pub async fn set_status(&self, id: u64, status: AssignmentStatus) -> Result<ShiftAssignment> {
        let assignment = self
            .assignments
            .set_assignment_status(id, status)
            .await?
            .ok_or(Error::NotFound("shift assignment", id))?;
        assignment_cache::invalidate_all();
        Ok(assignment)
    }

    /// The APPROVED assignment covering `date`, joined with its shift.
    ///
    /// Overlapping approved assignments are not deduplicated here; the
    /// lowest-id match wins. `None` means the caller falls back to the ALL
    /// punch policy.
    pub async fn resolve(&self, employee_id: u64, date: NaiveDate) -> Result<Option<ResolvedShift>> {
        if let Some(cached) = assignment_cache::get(employee_id, date).await {
            return Ok(cached);
        }

        let mut resolved = None;
        for assignment in self.assignments.approved_for_employee(employee_id).await? {
            if !assignment.covers(date) {
                continue;
            }
            if let Some(shift) = self.catalog.get_shift(assignment.shift_id).await? {
                resolved = Some(ResolvedShift { assignment, shift });
                break;
            }
        }

        assignment_cache::put(employee_id, date, resolved.clone()).await;
        Ok(resolved)
    }

    /// Create one assignment per target employee. The explicit-list path is
    /// synchronous; the department/position path requires the employee
    /// directory collaborator and fails fast until that is wired.
    pub async fn bulk_create(&self, request: BulkAssignmentRequest) -> Result<Vec<ShiftAssignment>> {
        match request.employee_ids {
            Some(employee_ids) if !employee_ids.is_empty() => {
                self.validate_references(request.shift_id, request.schedule_rule_id)
                    .await?;
                let mut created = Vec::with_capacity(employee_ids.len());
                for employee_id in employee_ids {
                    created.push(
                        self.create(NewAssignment {
                            employee_id,
                            shift_id: request.shift_id,
                            schedule_rule_id: request.schedule_rule_id,
                            department_id: request.department_id,
                            position_id: request.position_id,
                            start_date: request.start_date,
                            end_date: request.end_date,
                        })
                        .await?,
                    );
                }
                Ok(created)
            }
            _ if request.department_id.is_some() || request.position_id.is_some() => {
                Err(Error::invalid(
                    "department/position bulk assignment requires the employee directory, which is not wired to this service",
                ))
            }
            _ => Err(Error::invalid(
                "bulk assignment needs a non-empty employee_ids list",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shift::PunchPolicy;
    use crate::store::{NewShift, Stores};
    use crate::utils::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    async fn fixture() -> (AssignmentService, u64) {
        let stores = Stores::memory();
        let clock = Arc::new(FixedClock::at(
            Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap(),
        ));
        let shift_type = stores
            .catalog
            .insert_shift_type("General".into())
            .await
            .unwrap();
        let shift = stores
            .catalog
            .insert_shift(NewShift {
                shift_type_id: shift_type.id,
                start_time: "09:00".into(),
                end_time: "17:00".into(),
                punch_policy: PunchPolicy::FirstLast,
            })
            .await
            .unwrap();
        let service =
            AssignmentService::new(stores.assignments.clone(), stores.catalog.clone(), clock);
        (service, shift.id)
    }

    fn new_assignment(employee_id: u64, shift_id: u64) -> NewAssignment {
        NewAssignment {
            employee_id,
            shift_id,
            schedule_rule_id: None,
            department_id: None,
            position_id: None,
            start_date: "2026-01-01".parse().unwrap(),
            end_date: None,
        }
    }

    #[actix_web::test]
    async fn create_rejects_dangling_shift() {
        let (service, _) = fixture().await;
        let err = service.create(new_assignment(2001, 777)).await.unwrap_err();
        assert!(matches!(err, Error::NotFound("shift", 777)));
    }

    #[actix_web::test]
    async fn resolve_only_sees_approved_covering_assignments() {
        let (service, shift_id) = fixture().await;
        let date = "2026-01-05".parse().unwrap();

        let pending = service.create(new_assignment(2002, shift_id)).await.unwrap();
        assert!(service.resolve(2002, date).await.unwrap().is_none());

        service
            .set_status(pending.id, AssignmentStatus::Approved)
            .await
            .unwrap();
        let resolved = service.resolve(2002, date).await.unwrap().unwrap();
        assert_eq!(resolved.shift.id, shift_id);
        assert_eq!(resolved.shift.punch_policy, PunchPolicy::FirstLast);

        // Outside the range nothing resolves.
        assert!(service
            .resolve(2002, "2025-12-31".parse().unwrap())
            .await
            .unwrap()
            .is_none());
    }

    #[actix_web::test]
    async fn bulk_explicit_list_creates_one_per_employee() {
        let (service, shift_id) = fixture().await;
        let created = service
            .bulk_create(BulkAssignmentRequest {
                employee_ids: Some(vec![2003, 2004, 2005]),
                department_id: None,
                position_id: None,
                shift_id,
                schedule_rule_id: None,
                start_date: "2026-01-01".parse().unwrap(),
                end_date: None,
            })
            .await
            .unwrap();
        assert_eq!(created.len(), 3);
        assert!(created.iter().all(|a| a.status == AssignmentStatus::Pending));
    }

    #[actix_web::test]
    async fn bulk_by_department_fails_fast() {
        let (service, shift_id) = fixture().await;
        let err = service
            .bulk_create(BulkAssignmentRequest {
                employee_ids: None,
                department_id: Some(10),
                position_id: None,
                shift_id,
                schedule_rule_id: None,
                start_date: "2026-01-01".parse().unwrap(),
                end_date: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StructuralInvalid(_)));
        assert!(service.list(None).await.unwrap().is_empty());
    }
}
