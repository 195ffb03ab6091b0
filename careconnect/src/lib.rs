pub mod coordinates;
pub mod credentials;
pub mod error;
pub mod facility;
pub mod hospital;
pub mod registration;
pub mod registry;
pub mod resource_status;
pub mod seed;
pub mod user_role;

pub use coordinates::Coordinates;
pub use error::CareError;
pub use facility::Facility;
pub use hospital::{Hospital, HospitalDetails, HospitalId, NewHospital};
pub use registry::Registry;
pub use resource_status::ResourceStatus;
pub use user_role::UserRole;
