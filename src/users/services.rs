use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

use crate::error::ApiError;
use crate::recipes::RECIPES_COLLECTION;
use crate::store::{encode, DocumentStore, FieldUpdates, StoreError, WriteBatch};

use super::dto::{LoginRequest, ProfileChanges, RegisterRequest, UserRecord};
use super::USERS_COLLECTION;

/// Exact-match lookup, case-sensitive. `exclude_id` drops the user's own
/// record from the check during profile updates.
pub(crate) async fn is_username_taken(
    store: &dyn DocumentStore,
    username: &str,
    exclude_id: Option<&str>,
) -> Result<bool, StoreError> {
    let hits = store
        .query_eq(USERS_COLLECTION, &[("username", json!(username))])
        .await?;
    Ok(hits
        .iter()
        .any(|doc| exclude_id.map_or(true, |id| doc.id != id)))
}

pub(crate) async fn register(
    store: &dyn DocumentStore,
    req: RegisterRequest,
) -> Result<Value, ApiError> {
    let email_hits = store
        .query_eq(USERS_COLLECTION, &[("email", json!(req.email))])
        .await?;
    if !email_hits.is_empty() {
        return Err(ApiError::conflict("El email ya está registrado."));
    }
    if is_username_taken(store, &req.username, None).await? {
        return Err(ApiError::conflict("El nombre de usuario ya está en uso."));
    }

    let record = UserRecord {
        email: req.email,
        password: req.password,
        username: req.username,
        avatar: req.avatar,
        created_at: timestamp_now(),
    };
    let doc = store.add(USERS_COLLECTION, encode(&record)?).await?;
    info!(user_id = %doc.id, username = %record.username, "user registered");
    Ok(doc.to_json())
}

/// Plaintext equality query on both fields, exactly as the original service
/// does. The matched record, password included, goes back to the client.
pub(crate) async fn login(store: &dyn DocumentStore, req: LoginRequest) -> Result<Value, ApiError> {
    let hits = store
        .query_eq(
            USERS_COLLECTION,
            &[
                ("email", json!(req.email)),
                ("password", json!(req.password)),
            ],
        )
        .await?;
    hits.into_iter()
        .next()
        .map(|doc| doc.to_json())
        .ok_or_else(|| ApiError::Auth("Credenciales inválidas".into()))
}

pub(crate) async fn list(store: &dyn DocumentStore) -> Result<Vec<Value>, ApiError> {
    let docs = store.list(USERS_COLLECTION).await?;
    Ok(docs.iter().map(|doc| doc.to_json()).collect())
}

/// Deletes the user document and every recipe carrying their author
/// snapshot, all in one batch. An unknown id stays a no-op success: the
/// single unconditional delete commits with nothing to cascade.
pub(crate) async fn delete_with_recipes(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<usize, ApiError> {
    let mut batch = WriteBatch::new();
    batch.delete(USERS_COLLECTION, id);

    let mut cascaded = 0;
    if let Some(doc) = store.get(USERS_COLLECTION, id).await? {
        let user: UserRecord = doc.decode()?;
        let recipes = store
            .query_eq(
                RECIPES_COLLECTION,
                &[("autor.nombre", json!(user.username))],
            )
            .await?;
        cascaded = recipes.len();
        for recipe in &recipes {
            batch.delete(RECIPES_COLLECTION, &recipe.id);
        }
    }

    store.commit(batch).await?;
    info!(user_id = %id, recipes = cascaded, "user deleted with authored recipes");
    Ok(cascaded)
}

#[derive(Debug)]
pub(crate) enum ProfileUpdate {
    /// No fields supplied; the store was not touched.
    Nothing,
    Applied {
        changes: ProfileChanges,
        recipes_synced: usize,
    },
}

/// The profile update and its propagation to author snapshots. Affected
/// recipes are found by the user's *previous* username — the snapshots
/// still carry it until the batch commits — and everything lands in a
/// single atomic commit.
pub(crate) async fn update_profile(
    store: &dyn DocumentStore,
    id: &str,
    changes: ProfileChanges,
) -> Result<ProfileUpdate, ApiError> {
    let doc = store
        .get(USERS_COLLECTION, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Usuario no encontrado"))?;
    let current: UserRecord = doc.decode()?;

    if let Some(username) = &changes.username {
        if username != &current.username && is_username_taken(store, username, Some(id)).await? {
            return Err(ApiError::conflict("El nombre de usuario ya está ocupado."));
        }
    }

    let mut user_updates = FieldUpdates::new();
    if let Some(username) = &changes.username {
        user_updates.push("username", json!(username));
    }
    if let Some(avatar) = &changes.avatar {
        user_updates.push("avatar", json!(avatar));
    }
    if user_updates.is_empty() {
        return Ok(ProfileUpdate::Nothing);
    }

    let affected = store
        .query_eq(
            RECIPES_COLLECTION,
            &[("autor.nombre", json!(current.username))],
        )
        .await?;

    let mut batch = WriteBatch::new();
    batch.update(USERS_COLLECTION, id, user_updates);
    for recipe in &affected {
        let mut fields = FieldUpdates::new();
        if let Some(username) = &changes.username {
            fields.push("autor.nombre", json!(username));
        }
        if let Some(avatar) = &changes.avatar {
            fields.push("autor.avatar", json!(avatar));
        }
        batch.update(RECIPES_COLLECTION, &recipe.id, fields);
    }
    store.commit(batch).await?;

    info!(user_id = %id, recipes = affected.len(), "profile update propagated");
    Ok(ProfileUpdate::Applied {
        changes,
        recipes_synced: affected.len(),
    })
}

fn timestamp_now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .expect("RFC 3339 formatting of a UTC timestamp")
}
