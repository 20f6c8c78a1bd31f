mod entity;
mod requests;
mod types;

pub use entity::{Entity, EntityKind};
pub use requests::{
    CreateFaculty, CreateSpecialty, CreateUniversity, UpdateFaculty, UpdateSpecialty,
    UpdateUniversity,
};
pub use types::{Faculty, Specialty, University};
