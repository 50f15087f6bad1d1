//! User map API handlers.
//!
//! Each handler validates its input, runs exactly one store operation and
//! returns the owner's full map. Validation always happens before the store
//! is touched.

use axum::{
    Json,
    extract::{Path, State},
    http::Uri,
};
use chrono::Utc;
use serde::Deserialize;

use mapa_core::{Coordinates, Email, MarkerId};

use crate::error::{AppError, MISSING_FIELDS, Result};
use crate::extract::ApiJson;
use crate::models::{NewMarker, UserMap, Visit};
use crate::state::AppState;

const USER_NOT_FOUND: &str = "Usuario no encontrado.";
const USER_OR_MARKER_NOT_FOUND: &str = "Usuario o marcador no encontrado.";

const ADD_MARKER_FAILED: &str = "Error al añadir marcador.";
const GET_MAP_FAILED: &str = "Error al obtener el mapa del usuario.";
const ADD_VISIT_FAILED: &str = "Error al registrar la visita.";
const DELETE_MARKER_FAILED: &str = "Error al eliminar marcador.";

/// Body of `POST /api/mapa/marcador`.
#[derive(Debug, Deserialize)]
pub struct AddMarkerRequest {
    pub email: Option<String>,
    #[serde(rename = "nombreLugar")]
    pub place_name: Option<String>,
    #[serde(rename = "coordenadas")]
    pub coordinates: Option<CoordinatesInput>,
    #[serde(rename = "imagenUrl")]
    pub image_url: Option<String>,
}

/// Coordinates as submitted; either component may be missing or `null`.
#[derive(Debug, Deserialize)]
pub struct CoordinatesInput {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Body of `POST /api/mapa/visita`.
#[derive(Debug, Deserialize)]
pub struct AddVisitRequest {
    pub email: Option<String>,
    #[serde(rename = "visitanteEmail")]
    pub visitor_email: Option<String>,
}

/// Body of `DELETE /api/mapa/marcador`.
#[derive(Debug, Deserialize)]
pub struct DeleteMarkerRequest {
    pub email: Option<String>,
    #[serde(rename = "marcadorId")]
    pub marker_id: Option<String>,
}

impl AddMarkerRequest {
    /// Check required fields and split into owner and marker.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the owner, place name or either
    /// coordinate is missing or blank.
    pub fn validate(self) -> Result<(Email, NewMarker)> {
        let email = required_email(self.email)?;
        let place_name = required_text(self.place_name)?;
        let (lat, lng) = match self.coordinates {
            Some(CoordinatesInput {
                lat: Some(lat),
                lng: Some(lng),
            }) => (lat, lng),
            _ => return Err(missing_fields()),
        };

        Ok((
            email,
            NewMarker {
                place_name,
                coordinates: Coordinates::new(lat, lng),
                image_url: self.image_url,
            },
        ))
    }
}

impl AddVisitRequest {
    /// Check required fields and return `(owner, visitor)`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if either email is missing or blank.
    pub fn validate(self) -> Result<(Email, Email)> {
        Ok((
            required_email(self.email)?,
            required_email(self.visitor_email)?,
        ))
    }
}

impl DeleteMarkerRequest {
    /// Resolve the owner and marker ID.
    ///
    /// Returns `None` when either is missing or blank, or the marker ID is
    /// not a UUID: such a request cannot name an existing marker.
    #[must_use]
    pub fn target(&self) -> Option<(Email, MarkerId)> {
        let email = Email::parse(self.email.as_deref()?).ok()?;
        let marker_id = self.marker_id.as_deref()?.trim().parse().ok()?;
        Some((email, marker_id))
    }
}

fn missing_fields() -> AppError {
    AppError::BadRequest(MISSING_FIELDS.to_owned())
}

fn required_text(value: Option<String>) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(missing_fields)
}

fn required_email(value: Option<String>) -> Result<Email> {
    value
        .as_deref()
        .and_then(|v| Email::parse(v).ok())
        .ok_or_else(missing_fields)
}

/// Add a marker to the owner's map, creating the map on first use.
///
/// # Errors
///
/// 400 on missing fields, 500 if the store fails.
pub async fn add_marker(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AddMarkerRequest>,
) -> Result<Json<UserMap>> {
    let (email, new_marker) = body.validate()?;
    let marker = new_marker.into_marker(Utc::now());
    let marker_id = marker.id;

    let map = state
        .store()
        .push_marker(&email, marker)
        .await
        .map_err(AppError::database(ADD_MARKER_FAILED))?;

    tracing::info!(email = %email, marker_id = %marker_id, markers = map.markers.len(), "Marker added");
    Ok(Json(map))
}

/// Get the owner's full map.
///
/// # Errors
///
/// 404 if the owner has no map, 500 if the store fails.
pub async fn get_map(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserMap>> {
    // A blank owner cannot belong to any stored map.
    let email = Email::parse(&email).map_err(|_| AppError::NotFound(USER_NOT_FOUND))?;

    state
        .store()
        .find_by_email(&email)
        .await
        .map_err(AppError::database(GET_MAP_FAILED))?
        .map(Json)
        .ok_or(AppError::NotFound(USER_NOT_FOUND))
}

/// `GET` on a path that a static route shadows (`/marcador`, `/visita`).
///
/// The segment is still an owner lookup, exactly as `/{email}` would do it.
///
/// # Errors
///
/// Same as [`get_map`].
pub async fn get_shadowed_map(state: State<AppState>, uri: Uri) -> Result<Json<UserMap>> {
    let owner = uri.path().trim_start_matches('/').to_owned();
    get_map(state, Path(owner)).await
}

/// Record a visit on an existing map. Never creates the map.
///
/// # Errors
///
/// 400 on missing fields, 404 if the owner has no map, 500 if the store fails.
pub async fn add_visit(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AddVisitRequest>,
) -> Result<Json<UserMap>> {
    let (email, visitor) = body.validate()?;

    let map = state
        .store()
        .push_visit(&email, Visit::new(visitor.clone(), Utc::now()))
        .await
        .map_err(AppError::database(ADD_VISIT_FAILED))?
        .ok_or(AppError::NotFound(USER_NOT_FOUND))?;

    tracing::info!(email = %email, visitor = %visitor, "Visit recorded");
    Ok(Json(map))
}

/// Remove one marker from the owner's map.
///
/// A missing or unreadable body cannot name a marker either, so it is a 404
/// like any other unknown target.
///
/// # Errors
///
/// 404 if the owner has no map or the map has no such marker, 500 if the
/// store fails.
pub async fn delete_marker(
    State(state): State<AppState>,
    body: Result<ApiJson<DeleteMarkerRequest>>,
) -> Result<Json<UserMap>> {
    let (email, marker_id) = body
        .ok()
        .and_then(|ApiJson(body)| body.target())
        .ok_or(AppError::NotFound(USER_OR_MARKER_NOT_FOUND))?;

    let map = state
        .store()
        .pull_marker(&email, marker_id)
        .await
        .map_err(AppError::database(DELETE_MARKER_FAILED))?
        .ok_or(AppError::NotFound(USER_OR_MARKER_NOT_FOUND))?;

    tracing::info!(email = %email, marker_id = %marker_id, "Marker deleted");
    Ok(Json(map))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn add_marker_req(value: serde_json::Value) -> AddMarkerRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_add_marker_valid() {
        let (email, marker) = add_marker_req(json!({
            "email": "a@x.com",
            "nombreLugar": "Park",
            "coordenadas": {"lat": 10, "lng": 20},
            "imagenUrl": "https://img.example/park.jpg"
        }))
        .validate()
        .unwrap();

        assert_eq!(email.as_str(), "a@x.com");
        assert_eq!(marker.place_name, "Park");
        assert_eq!(marker.coordinates, Coordinates::new(10.0, 20.0));
        assert_eq!(marker.image_url.as_deref(), Some("https://img.example/park.jpg"));
    }

    #[test]
    fn test_add_marker_zero_coordinates_are_present() {
        let (_, marker) = add_marker_req(json!({
            "email": "a@x.com",
            "nombreLugar": "Null Island",
            "coordenadas": {"lat": 0, "lng": 0}
        }))
        .validate()
        .unwrap();

        assert_eq!(marker.coordinates, Coordinates::new(0.0, 0.0));
        assert!(marker.image_url.is_none());
    }

    #[test]
    fn test_add_marker_missing_fields() {
        let cases = [
            json!({"nombreLugar": "Park", "coordenadas": {"lat": 1, "lng": 2}}),
            json!({"email": "", "nombreLugar": "Park", "coordenadas": {"lat": 1, "lng": 2}}),
            json!({"email": "a@x.com", "coordenadas": {"lat": 1, "lng": 2}}),
            json!({"email": "a@x.com", "nombreLugar": "  ", "coordenadas": {"lat": 1, "lng": 2}}),
            json!({"email": "a@x.com", "nombreLugar": "Park"}),
            json!({"email": "a@x.com", "nombreLugar": "Park", "coordenadas": {"lng": 2}}),
            json!({"email": "a@x.com", "nombreLugar": "Park", "coordenadas": {"lat": 1, "lng": null}}),
        ];

        for case in cases {
            let err = add_marker_req(case.clone()).validate().unwrap_err();
            assert!(
                matches!(err, AppError::BadRequest(ref m) if m == MISSING_FIELDS),
                "{case} should be rejected as missing data"
            );
        }
    }

    #[test]
    fn test_add_marker_owner_is_any_non_blank_identity() {
        let (email, marker) = add_marker_req(json!({
            "email": "alice",
            "nombreLugar": "Park",
            "coordenadas": {"lat": 1, "lng": 2}
        }))
        .validate()
        .unwrap();

        assert_eq!(email.as_str(), "alice");
        assert_eq!(marker.place_name, "Park");
    }

    #[test]
    fn test_add_marker_keeps_empty_image_url() {
        let (_, marker) = add_marker_req(json!({
            "email": "a@x.com",
            "nombreLugar": "Park",
            "coordenadas": {"lat": 1, "lng": 2},
            "imagenUrl": ""
        }))
        .validate()
        .unwrap();

        assert_eq!(marker.image_url.as_deref(), Some(""));
    }

    #[test]
    fn test_add_visit_validation() {
        let ok: AddVisitRequest =
            serde_json::from_value(json!({"email": "a@x.com", "visitanteEmail": "b@y.com"}))
                .unwrap();
        let (owner, visitor) = ok.validate().unwrap();
        assert_eq!((owner.as_str(), visitor.as_str()), ("a@x.com", "b@y.com"));

        let missing: AddVisitRequest = serde_json::from_value(json!({"email": "a@x.com"})).unwrap();
        assert!(matches!(missing.validate(), Err(AppError::BadRequest(ref m)) if m == MISSING_FIELDS));

        let blank: AddVisitRequest =
            serde_json::from_value(json!({"email": "a@x.com", "visitanteEmail": " "})).unwrap();
        assert!(matches!(blank.validate(), Err(AppError::BadRequest(ref m)) if m == MISSING_FIELDS));

        let plain: AddVisitRequest =
            serde_json::from_value(json!({"email": "alice", "visitanteEmail": "bob"})).unwrap();
        let (owner, visitor) = plain.validate().unwrap();
        assert_eq!((owner.as_str(), visitor.as_str()), ("alice", "bob"));
    }

    #[test]
    fn test_delete_marker_target() {
        let id = MarkerId::generate();
        let req: DeleteMarkerRequest =
            serde_json::from_value(json!({"email": "a@x.com", "marcadorId": id.to_string()}))
                .unwrap();
        let (email, marker_id) = req.target().unwrap();
        assert_eq!(email.as_str(), "a@x.com");
        assert_eq!(marker_id, id);

        let bad_id: DeleteMarkerRequest =
            serde_json::from_value(json!({"email": "a@x.com", "marcadorId": "123"})).unwrap();
        assert!(bad_id.target().is_none());

        let no_email: DeleteMarkerRequest =
            serde_json::from_value(json!({"marcadorId": id.to_string()})).unwrap();
        assert!(no_email.target().is_none());
    }
}
