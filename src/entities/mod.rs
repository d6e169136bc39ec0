//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene tutte le entità (models) che rappresentano i dati persistiti nel database.
//! Ogni entity corrisponde a una tabella nel database.

pub mod announcement;
pub mod department;
pub mod donation;
pub mod enums;
pub mod event;
pub mod family;
pub mod member;
pub mod staff;
pub mod team;

// Re-exports per facilitare l'import
pub use announcement::Announcement;
pub use department::Department;
pub use donation::Donation;
pub use enums::{
    DonationType, FamilyRelationship, FamilyStatus, Gender, MemberStatus, PaymentMethod,
    StaffRole, TeamRole,
};
pub use event::Event;
pub use family::Family;
pub use member::Member;
pub use staff::Staff;
pub use team::{Team, TeamMembership};
