use sqlx::MySqlPool;

pub async fn init_db(database_url: &str) -> MySqlPool {
    MySqlPool::connect(database_url)
        .await
        .expect("Failed to connect to database")
}

/// Idempotent schema bootstrap, run once at startup.
pub async fn init_schema(pool: &MySqlPool) -> anyhow::Result<()> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS shift_types (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS shifts (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            shift_type_id BIGINT UNSIGNED NOT NULL,
            start_time VARCHAR(5) NOT NULL,
            end_time VARCHAR(5) NOT NULL,
            punch_policy VARCHAR(16) NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS schedule_rules (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            recurrence VARCHAR(64) NOT NULL,
            rest_days VARCHAR(64) NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS shift_assignments (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            employee_id BIGINT UNSIGNED NOT NULL,
            shift_id BIGINT UNSIGNED NOT NULL,
            schedule_rule_id BIGINT UNSIGNED NULL,
            department_id BIGINT UNSIGNED NULL,
            position_id BIGINT UNSIGNED NULL,
            start_date DATE NOT NULL,
            end_date DATE NULL,
            status VARCHAR(16) NOT NULL,
            created_at DATETIME(6) NOT NULL,
            KEY idx_assignment_employee_status (employee_id, status)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS attendance_records (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            employee_id BIGINT UNSIGNED NOT NULL,
            record_date DATE NOT NULL,
            punches TEXT NOT NULL,
            work_minutes BIGINT NOT NULL,
            has_missed_punch BOOLEAN NOT NULL,
            exception_ids TEXT NOT NULL,
            finalised_for_payroll BOOLEAN NOT NULL DEFAULT TRUE,
            created_at DATETIME(6) NOT NULL,
            updated_at DATETIME(6) NOT NULL,
            UNIQUE KEY uq_attendance_employee_day (employee_id, record_date)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS attendance_corrections (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            employee_id BIGINT UNSIGNED NOT NULL,
            record_id BIGINT UNSIGNED NOT NULL,
            reason TEXT NOT NULL,
            status VARCHAR(16) NOT NULL,
            created_at DATETIME(6) NOT NULL,
            updated_at DATETIME(6) NOT NULL,
            KEY idx_correction_status_created (status, created_at)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS time_exceptions (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            employee_id BIGINT UNSIGNED NOT NULL,
            exception_type VARCHAR(32) NOT NULL,
            record_id BIGINT UNSIGNED NOT NULL,
            assignee_id BIGINT UNSIGNED NOT NULL,
            status VARCHAR(16) NOT NULL,
            reason TEXT NULL,
            created_at DATETIME(6) NOT NULL,
            updated_at DATETIME(6) NOT NULL,
            KEY idx_exception_status_updated (status, updated_at)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS overtime_rules (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            multiplier DOUBLE NOT NULL,
            daily_threshold_minutes BIGINT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS lateness_rules (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            grace_minutes BIGINT NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS holidays (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            date DATE NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS notification_log (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            recipient_id BIGINT UNSIGNED NOT NULL,
            notification_type VARCHAR(32) NOT NULL,
            message TEXT NOT NULL,
            created_at DATETIME(6) NOT NULL
        )
        "#,
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
