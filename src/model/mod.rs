pub mod assignment;
pub mod attendance;
pub mod correction;
pub mod notification;
pub mod schedule_rule;
pub mod shift;
pub mod time_exception;
pub mod work_rules;
