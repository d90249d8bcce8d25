//! Family member records and loading

mod data;
pub mod loader;

pub use data::{age_on, find_member, parse_date, FamilyMember, DATE_FORMAT};
pub use loader::{load_family, load_family_from_reader};
