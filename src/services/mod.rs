pub mod assignment_service;
pub mod cohort_service;
pub mod identity_service;
pub mod registration_service;
pub mod session_service;
pub mod stats_service;

pub use assignment_service::{AssignmentService, Perspective};
pub use cohort_service::CohortService;
pub use identity_service::IdentityService;
pub use registration_service::RegistrationService;
pub use session_service::SessionService;
pub use stats_service::StatsService;
