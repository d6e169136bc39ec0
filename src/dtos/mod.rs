//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod announcement;
pub mod department;
pub mod donation;
pub mod event;
pub mod family;
pub mod member;
pub mod query;
pub mod staff;

// Re-exports per facilitare l'import
pub use announcement::{AnnouncementDTO, CreateAnnouncementDTO, UpdateAnnouncementDTO};
pub use department::{
    AddTeamMemberDTO, CreateDepartmentDTO, CreateTeamDTO, DepartmentDTO, DepartmentDetailDTO,
    MemberTeamDTO, MoveTeamMemberDTO, TeamDTO, TeamMemberDTO, UpdateDepartmentDTO, UpdateTeamDTO,
    UpdateTeamMemberDTO,
};
pub use donation::{
    CreateDonationDTO, DonationDTO, DonationSummaryDTO, DonationTypeTotalDTO, UpdateDonationDTO,
};
pub use event::{CreateEventDTO, EventDTO, UpdateEventDTO};
pub use family::{CreateFamilyDTO, FamilyDTO, FamilyDetailDTO, UpdateFamilyDTO};
pub use member::{AssignFamilyDTO, CreateMemberDTO, MemberDTO, UpdateMemberDTO};
pub use query::{
    AnnouncementQuery, DonationQuery, EventQuery, FamilyQuery, MemberQuery, TeamQuery,
};
pub use staff::{CreateStaffDTO, LoginDTO, StaffDTO, UpdateStaffDTO};
