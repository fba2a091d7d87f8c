pub mod enums;
pub mod patient;
pub mod medical_history;
pub mod allergy;
pub mod visit;

pub use enums::*;
pub use patient::*;
pub use medical_history::*;
pub use allergy::*;
pub use visit::*;
