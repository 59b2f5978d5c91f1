use crate::error::StorageError;
use crate::storage::KeyValueStore;
use log::info;
use uuid::Uuid;

/// Local key under which the voter id is persisted.
pub const VOTER_ID_KEY: &str = "voter_id";

pub trait IdentityGenerator: Send + Sync {
    fn generate(&self) -> String;
}

pub struct UuidGenerator;

impl IdentityGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Return the stored voter id, creating and persisting one on first use.
///
/// An existing id is never replaced.
pub async fn voter_id(
    store: &dyn KeyValueStore,
    generator: &dyn IdentityGenerator,
) -> Result<String, StorageError> {
    if let Some(existing) = store.get(VOTER_ID_KEY).await? {
        if !existing.is_empty() {
            return Ok(existing);
        }
    }

    let fresh = generator.generate();
    store.set(VOTER_ID_KEY, &fresh).await?;
    info!("Generated new voter id {}", fresh);
    Ok(fresh)
}
