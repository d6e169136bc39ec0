//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Questo modulo organizza i repository in sotto-moduli separati per una migliore manutenibilità.
//! Ogni repository gestisce le operazioni di database per una specifica entità.

// ************************* NOTA SU SQLX ************************* //

/*
   Le query usano le funzioni runtime `sqlx::query` / `sqlx::query_as::<_, T>` con le entità
   che derivano `sqlx::FromRow`, non le macro `query!` / `query_as!`: le macro vogliono un
   database raggiungibile (o la cache offline) già in compilazione.
   Le colonne della SELECT devono avere lo stesso nome dei campi della struct.

   Per i filtri opzionali delle liste e per gli update parziali si usa `QueryBuilder`:
   `push` per il testo SQL, `push_bind` per i valori (mai concatenare valori nella stringa!).

   Metodi di esecuzione:
   .execute(...)         INSERT/UPDATE/DELETE, ritorna SqliteQueryResult (rows_affected, last_insert_rowid)
   .fetch_optional(...)  zero o una riga  -> Option<T>
   .fetch_one(...)       esattamente una  -> T, altrimenti RowNotFound
   .fetch_all(...)       tutte le righe   -> Vec<T>

   Gli errori sqlx risalgono con `?` fino al service, dove `AppError: From<sqlx::Error>`
   li traduce nello status HTTP giusto (RowNotFound -> 404, UNIQUE -> 409, ...).
*/

// ************************* MODULI REPOSITORY ************************* //

pub mod announcement;
pub mod department;
pub mod donation;
pub mod event;
pub mod family;
pub mod member;
pub mod staff;
pub mod team;
pub mod traits;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, Delete, Read, Update};
pub(crate) use traits::ensure_affected;

// Re-esportazione delle struct dei repository per facilitare l'import
pub use announcement::AnnouncementRepository;
pub use department::DepartmentRepository;
pub use donation::DonationRepository;
pub use event::EventRepository;
pub use family::FamilyRepository;
pub use member::MemberRepository;
pub use staff::StaffRepository;
pub use team::TeamRepository;
