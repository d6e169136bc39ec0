//! Application State - Stato globale dell'applicazione
//!
//! Contiene tutti i repository, configurazioni e stato condiviso
//! necessario per gestire l'applicazione.

use crate::repositories::{
    AnnouncementRepository, DepartmentRepository, DonationRepository, EventRepository,
    FamilyRepository, MemberRepository, StaffRepository, TeamRepository,
};
use crate::storage::UploadStore;
use sqlx::SqlitePool;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Repository per la gestione delle famiglie
    pub family: FamilyRepository,

    /// Repository per la gestione dei membri
    pub member: MemberRepository,

    /// Repository per la gestione dello staff
    pub staff: StaffRepository,

    /// Repository per la gestione delle offerte
    pub donation: DonationRepository,

    /// Repository per la gestione dei reparti
    pub department: DepartmentRepository,

    /// Repository per la gestione dei team e delle appartenenze
    pub team: TeamRepository,

    /// Repository per la gestione degli eventi
    pub event: EventRepository,

    /// Repository per la gestione degli avvisi
    pub announcement: AnnouncementRepository,

    /// Storage locale per le foto profilo
    pub uploads: UploadStore,

    /// Secret key per JWT token
    pub jwt_secret: String,
}

impl AppState {
    /// Crea una nuova istanza di AppState inizializzando tutti i repository
    /// con il pool di connessioni fornito.
    ///
    /// # Arguments
    /// * `pool` - Pool di connessioni SQLite condiviso
    /// * `jwt_secret` - Chiave segreta per la firma dei token JWT
    /// * `uploads` - Storage delle immagini caricate
    pub fn new(pool: SqlitePool, jwt_secret: String, uploads: UploadStore) -> Self {
        Self {
            family: FamilyRepository::new(pool.clone()),
            member: MemberRepository::new(pool.clone()),
            staff: StaffRepository::new(pool.clone()),
            donation: DonationRepository::new(pool.clone()),
            department: DepartmentRepository::new(pool.clone()),
            team: TeamRepository::new(pool.clone()),
            event: EventRepository::new(pool.clone()),
            announcement: AnnouncementRepository::new(pool),
            uploads,
            jwt_secret,
        }
    }
}
