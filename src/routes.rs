use crate::{
    api::{assignment, attendance, correction, exception, report, schedule_rule, shift, work_rules},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(build_limiter(config.rate_default_per_min))
            .service(
                web::scope("/shift-types")
                    .service(
                        web::resource("")
                            .route(web::post().to(shift::create_shift_type))
                            .route(web::get().to(shift::list_shift_types)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(shift::get_shift_type))
                            .route(web::put().to(shift::update_shift_type)),
                    ),
            )
            .service(
                web::scope("/shifts")
                    .service(
                        web::resource("")
                            .route(web::post().to(shift::create_shift))
                            .route(web::get().to(shift::list_shifts)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(shift::get_shift))
                            .route(web::put().to(shift::update_shift)),
                    ),
            )
            .service(
                web::scope("/schedule-rules")
                    .service(
                        web::resource("")
                            .route(web::post().to(schedule_rule::create_schedule_rule))
                            .route(web::get().to(schedule_rule::list_schedule_rules)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(schedule_rule::get_schedule_rule))
                            .route(web::put().to(schedule_rule::update_schedule_rule)),
                    ),
            )
            .service(
                web::scope("/assignments")
                    .service(
                        web::resource("")
                            .route(web::post().to(assignment::create_assignment))
                            .route(web::get().to(assignment::list_assignments)),
                    )
                    // /assignments/bulk before /{id}
                    .service(
                        web::resource("/bulk")
                            .route(web::post().to(assignment::bulk_create_assignments)),
                    )
                    .service(
                        web::resource("/{id}").route(web::get().to(assignment::get_assignment)),
                    )
                    .service(
                        web::resource("/{id}/status")
                            .route(web::put().to(assignment::set_assignment_status)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // Clock terminals hammer this one; it gets its own limiter.
                    .service(
                        web::resource("/punch")
                            .wrap(build_limiter(config.rate_punch_per_min))
                            .route(web::post().to(attendance::punch)),
                    )
                    .service(web::resource("").route(web::get().to(attendance::list_records)))
                    .service(web::resource("/{id}").route(web::get().to(attendance::get_record)))
                    .service(
                        web::resource("/{id}/punches")
                            .route(web::put().to(attendance::overwrite_punches)),
                    ),
            )
            .service(
                web::scope("/corrections")
                    .service(
                        web::resource("")
                            .route(web::post().to(correction::create_correction))
                            .route(web::get().to(correction::list_corrections)),
                    )
                    .service(
                        web::resource("/{id}").route(web::get().to(correction::get_correction)),
                    )
                    .service(
                        web::resource("/{id}/status")
                            .route(web::put().to(correction::update_correction_status)),
                    ),
            )
            .service(
                web::scope("/exceptions")
                    .service(
                        web::resource("")
                            .route(web::post().to(exception::create_exception))
                            .route(web::get().to(exception::list_exceptions)),
                    )
                    .service(
                        web::resource("/{id}").route(web::get().to(exception::get_exception)),
                    )
                    .service(
                        web::resource("/{id}/status")
                            .route(web::put().to(exception::update_exception_status)),
                    ),
            )
            .service(
                web::scope("/sweeps")
                    .service(
                        web::resource("/exceptions")
                            .route(web::post().to(exception::sweep_stale_exceptions)),
                    )
                    .service(
                        web::resource("/payroll-cutoff")
                            .route(web::post().to(exception::sweep_payroll_cutoff)),
                    )
                    .service(
                        web::resource("/missed-punches")
                            .route(web::post().to(exception::scan_missed_punches)),
                    ),
            )
            .service(
                web::scope("/reports")
                    .service(
                        web::resource("/attendance")
                            .route(web::get().to(report::attendance_report)),
                    )
                    .service(
                        web::resource("/overtime").route(web::get().to(report::overtime_report)),
                    )
                    .service(
                        web::resource("/exceptions")
                            .route(web::get().to(report::exception_report)),
                    ),
            )
            .service(
                web::scope("/overtime-rules")
                    .service(
                        web::resource("")
                            .route(web::post().to(work_rules::create_overtime_rule))
                            .route(web::get().to(work_rules::list_overtime_rules)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(work_rules::update_overtime_rule)),
                    ),
            )
            .service(
                web::scope("/lateness-rules")
                    .service(
                        web::resource("")
                            .route(web::post().to(work_rules::create_lateness_rule))
                            .route(web::get().to(work_rules::list_lateness_rules)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(work_rules::update_lateness_rule)),
                    ),
            )
            .service(
                web::scope("/holidays")
                    .service(
                        web::resource("")
                            .route(web::post().to(work_rules::create_holiday))
                            .route(web::get().to(work_rules::list_holidays)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::delete().to(work_rules::delete_holiday)),
                    ),
            ),
    );
}

// PUNCH EVENT
//  ├─ resolve today's shift (APPROVED assignment covering today)
//  ├─ apply punch policy (ALL keeps everything, FIRST_LAST collapses)
//  └─ recompute work minutes + missed-punch flag

// CORRECTION REQUEST
//  ├─ SUBMITTED  → record held back from payroll
//  ├─ IN_REVIEW  → APPROVED (record re-finalised) | REJECTED
//  └─ ESCALATED  ← payroll-cutoff sweep only
