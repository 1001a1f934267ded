pub mod codes;
pub mod state;
pub mod verification_handlers;
pub mod verification_service;

pub use codes::{generate_code, generate_code_pair};
pub use state::{expected_code, role_of, verification_state, Role, VerificationState};
pub use verification_handlers::{verify_task, VerifyRequest};
pub use verification_service::{VerificationService, VerifyResponse};
