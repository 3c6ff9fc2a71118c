use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Wire representation of a contact. Field names deliberately differ from
/// what a client would call them internally (`_id`, `full_name`, ...).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct CreateContact {
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct UpdateContact {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Contact>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route(
            "/contacts/{id}",
            get(get_contact)
                .put(replace_contact)
                .patch(patch_contact)
                .delete(delete_contact),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// List responses are wrapped in an envelope so clients have to locate the
/// list inside the body. `?is_active=true|false` filters.
async fn list_contacts(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let contacts = db.read().await;
    let filter = params.get("is_active").map(|v| v == "true");
    let result: Vec<&Contact> = contacts
        .values()
        .filter(|c| filter.is_none_or(|active| c.is_active == active))
        .collect();
    let total = result.len();
    Json(json!({ "result": result, "total": total }))
}

async fn create_contact(
    State(db): State<Db>,
    Json(input): Json<CreateContact>,
) -> (StatusCode, Json<Contact>) {
    let contact = Contact {
        id: Uuid::new_v4(),
        full_name: input.full_name,
        email: input.email,
        phone_number: input.phone_number,
        is_active: input.is_active.unwrap_or(true),
        tags: input.tags.unwrap_or_default(),
    };
    db.write().await.insert(contact.id, contact.clone());
    tracing::debug!(id = %contact.id, "created contact");
    (StatusCode::CREATED, Json(contact))
}

async fn get_contact(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Contact>, StatusCode> {
    let contacts = db.read().await;
    contacts.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn replace_contact(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateContact>,
) -> Result<Json<Contact>, StatusCode> {
    let mut contacts = db.write().await;
    if !contacts.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let contact = Contact {
        id,
        full_name: input.full_name,
        email: input.email,
        phone_number: input.phone_number,
        is_active: input.is_active.unwrap_or(true),
        tags: input.tags.unwrap_or_default(),
    };
    contacts.insert(id, contact.clone());
    Ok(Json(contact))
}

async fn patch_contact(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateContact>,
) -> Result<Json<Contact>, StatusCode> {
    let mut contacts = db.write().await;
    let contact = contacts.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(full_name) = input.full_name {
        contact.full_name = full_name;
    }
    if let Some(email) = input.email {
        contact.email = Some(email);
    }
    if let Some(phone_number) = input.phone_number {
        contact.phone_number = Some(phone_number);
    }
    if let Some(is_active) = input.is_active {
        contact.is_active = is_active;
    }
    if let Some(tags) = input.tags {
        contact.tags = tags;
    }
    Ok(Json(contact.clone()))
}

async fn delete_contact(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut contacts = db.write().await;
    contacts
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_serializes_with_wire_field_names() {
        let contact = Contact {
            id: Uuid::nil(),
            full_name: "Ada Lovelace".to_string(),
            email: None,
            phone_number: None,
            is_active: true,
            tags: Vec::new(),
        };
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["_id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["full_name"], "Ada Lovelace");
        assert_eq!(json["is_active"], true);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn create_contact_defaults_optional_fields() {
        let input: CreateContact =
            serde_json::from_str(r#"{"full_name":"Ada Lovelace"}"#).unwrap();
        assert!(input.email.is_none());
        assert!(input.is_active.is_none());
        assert!(input.tags.is_none());
    }

    #[test]
    fn create_contact_accepts_null_optionals() {
        let input: CreateContact = serde_json::from_str(
            r#"{"full_name":"Ada","email":null,"phone_number":null,"tags":null}"#,
        )
        .unwrap();
        assert!(input.email.is_none());
        assert!(input.tags.is_none());
    }

    #[test]
    fn create_contact_rejects_missing_full_name() {
        let result: Result<CreateContact, _> = serde_json::from_str(r#"{"email":"a@x.test"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_contact_all_fields_optional() {
        let input: UpdateContact = serde_json::from_str("{}").unwrap();
        assert!(input.full_name.is_none());
        assert!(input.is_active.is_none());
    }
}
