pub mod assignment;
pub mod attendance;
pub mod correction;
pub mod exception;
pub mod report;
pub mod schedule_rule;
pub mod shift;
pub mod work_rules;
