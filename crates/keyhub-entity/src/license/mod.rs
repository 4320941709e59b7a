//! License entity: model, lifecycle status, verification outcome, and the
//! persistence seam used by the activation engine.

pub mod model;
pub mod status;
pub mod store;
pub mod verification;

pub use model::{
    BulkDeleteFilter, License, LicenseDateField, LicenseSearch, MonthlyLicenseCount, NewLicense,
    RunningClient,
};
pub use status::LicenseStatus;
pub use store::ActivationStore;
pub use verification::VerificationOutcome;
