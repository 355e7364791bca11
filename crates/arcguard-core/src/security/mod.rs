//! Security validation modules.

pub mod classify;
pub mod path;
pub mod ratio;
pub mod validator;

pub use classify::Classification;
pub use classify::classify;
pub use path::PathGuard;
pub use ratio::RatioAccountant;
pub use ratio::ValidationState;
pub use ratio::exceeds_ratio;
pub use validator::ArchiveValidator;
