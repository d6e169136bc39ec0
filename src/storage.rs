//! Storage module - Salvataggio locale delle foto profilo
//!
//! Le immagini caricate vengono scritte nella upload dir con un nome generato
//! (`<uuid>.<ext>`), il nome fornito dal client non tocca mai il filesystem.
//! Le immagini sono servite sotto [`PUBLIC_PREFIX`].

use crate::core::AppError;
use axum::body::Bytes;
use axum::extract::Multipart;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Prefisso delle URL pubbliche delle immagini
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Nome del campo multipart che contiene il file
pub const FILE_FIELD: &str = "file";

/// Costruisce la URL pubblica di un file salvato
pub fn picture_url(stored_name: &str) -> String {
    format!("{}/{}", PUBLIC_PREFIX, stored_name)
}

/// Estensione associata ai content type accettati
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// File estratto da una richiesta multipart
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Legge il campo `file` dal body multipart, gli altri campi vengono ignorati
pub async fn read_file_field(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;
        return Ok(UploadedFile {
            file_name,
            content_type,
            data,
        });
    }

    warn!("Multipart body without '{}' field", FILE_FIELD);
    Err(AppError::bad_request("Missing 'file' field in multipart body"))
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Crea la upload dir se non esiste
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Valida e salva un'immagine, ritorna il nome con cui è stata salvata
    #[instrument(skip(self, file), fields(size = file.data.len(), content_type = ?file.content_type))]
    pub async fn save_image(&self, file: &UploadedFile) -> Result<String, AppError> {
        if file.data.is_empty() {
            warn!("Rejected empty upload");
            return Err(AppError::bad_request("Uploaded file is empty"));
        }

        if file.data.len() > self.max_bytes {
            warn!("Rejected upload of {} bytes (max {})", file.data.len(), self.max_bytes);
            return Err(AppError::payload_too_large("Uploaded file is too large")
                .with_details(format!("Maximum size is {} bytes", self.max_bytes)));
        }

        let extension = file
            .content_type
            .as_deref()
            .and_then(extension_for)
            .ok_or_else(|| {
                warn!("Rejected upload with content type {:?}", file.content_type);
                AppError::bad_request("Unsupported image type")
                    .with_details("Accepted types: image/jpeg, image/png, image/gif, image/webp")
            })?;

        let stored_name = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(self.dir.join(&stored_name), &file.data).await?;

        info!("Stored upload {:?} as {}", file.file_name, stored_name);
        Ok(stored_name)
    }

    /// Cancella un file salvato; un file già assente non è un errore
    #[instrument(skip(self))]
    pub async fn remove(&self, stored_name: &str) -> Result<(), AppError> {
        if !is_plain_file_name(stored_name) {
            warn!("Refusing to remove suspicious path {}", stored_name);
            return Err(AppError::bad_request("Invalid file name"));
        }

        match tokio::fs::remove_file(self.dir.join(stored_name)).await {
            Ok(()) => {
                debug!("Removed upload {}", stored_name);
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("Upload {} already gone", stored_name);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}
