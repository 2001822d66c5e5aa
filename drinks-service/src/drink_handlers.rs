use axum::extract::{Path, State};
use axum::Json;
use common_auth::extractors::AuthContext;
use common_auth::permissions::{
    PERM_DELETE_DRINKS, PERM_GET_DRINKS_DETAIL, PERM_PATCH_DRINKS, PERM_POST_DRINKS,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::{query, query_as};

use crate::app_state::AppState;
use crate::ApiError;

#[derive(Debug, sqlx::FromRow)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Value,
}

impl Drink {
    /// Full representation including ingredient names.
    pub fn long(&self) -> Value {
        json!({ "id": self.id, "title": self.title, "recipe": self.recipe })
    }

    /// Public representation: recipe parts reduced to color and volume so the
    /// listing does not leak ingredients.
    pub fn short(&self) -> Value {
        let recipe = match &self.recipe {
            Value::Array(parts) => Value::Array(
                parts
                    .iter()
                    .map(|part| json!({ "color": part.get("color"), "parts": part.get("parts") }))
                    .collect(),
            ),
            other => other.clone(),
        };
        json!({ "id": self.id, "title": self.title, "recipe": recipe })
    }
}

const SELECT_DRINKS: &str = "SELECT id, title, recipe FROM drinks ORDER BY id";

/// Public endpoint: all drinks in short form.
pub async fn list_drinks(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let drinks = query_as::<_, Drink>(SELECT_DRINKS)
        .fetch_all(&state.db)
        .await
        .map_err(|err| {
            tracing::error!(?err, "failed to list drinks");
            ApiError::Internal
        })?;

    let formatted = drinks.iter().map(Drink::short).collect::<Vec<_>>();
    Ok(Json(json!({ "success": true, "drinks": formatted })))
}

/// All drinks in long form; requires `get:drinks-detail`.
pub async fn list_drinks_detail(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Value>, ApiError> {
    auth.require(PERM_GET_DRINKS_DETAIL)?;

    let drinks = query_as::<_, Drink>(SELECT_DRINKS)
        .fetch_all(&state.db)
        .await
        .map_err(|err| {
            tracing::error!(?err, "failed to list drink details");
            ApiError::Internal
        })?;

    let formatted = drinks.iter().map(Drink::long).collect::<Vec<_>>();
    Ok(Json(json!({ "success": true, "drinks": formatted })))
}

#[derive(Debug, Deserialize)]
pub struct NewDrink {
    pub title: String,
    #[serde(default)]
    pub recipe: Value,
}

/// Creates a drink; requires `post:drinks`. The body is bound as `Option` so
/// the permission check runs before body validation.
pub async fn create_drink(
    State(state): State<AppState>,
    auth: AuthContext,
    body: Option<Json<NewDrink>>,
) -> Result<Json<Value>, ApiError> {
    auth.require(PERM_POST_DRINKS)?;

    let Json(new_drink) = body.ok_or(ApiError::Unprocessable)?;

    let drink = query_as::<_, Drink>(
        "INSERT INTO drinks (title, recipe) VALUES ($1, $2) RETURNING id, title, recipe",
    )
    .bind(new_drink.title)
    .bind(new_drink.recipe)
    .fetch_one(&state.db)
    .await
    .map_err(|err| {
        tracing::warn!(?err, "failed to insert drink");
        ApiError::Unprocessable
    })?;

    Ok(Json(json!({ "success": true, "drinks": drink.long() })))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDrink {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Value>,
}

/// Updates a drink's title (and optionally recipe); requires `patch:drinks`.
pub async fn update_drink(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(drink_id): Path<i64>,
    body: Option<Json<UpdateDrink>>,
) -> Result<Json<Value>, ApiError> {
    auth.require(PERM_PATCH_DRINKS)?;

    let upd = body.map(|Json(value)| value).unwrap_or_default();

    let existing = query_as::<_, Drink>("SELECT id, title, recipe FROM drinks WHERE id = $1")
        .bind(drink_id)
        .fetch_optional(&state.db)
        .await
        .map_err(|err| {
            tracing::error!(?err, drink_id, "failed to load drink");
            ApiError::Internal
        })?;
    if existing.is_none() {
        return Err(ApiError::NotFound);
    }

    let title = upd.title.ok_or(ApiError::BadRequest)?;

    let drink = query_as::<_, Drink>(
        "UPDATE drinks SET title = $1, recipe = COALESCE($2, recipe) WHERE id = $3 \
         RETURNING id, title, recipe",
    )
    .bind(title)
    .bind(upd.recipe)
    .bind(drink_id)
    .fetch_one(&state.db)
    .await
    .map_err(|err| {
        tracing::warn!(?err, drink_id, "failed to update drink");
        ApiError::Unprocessable
    })?;

    Ok(Json(json!({ "success": true, "drinks": [drink.long()] })))
}

/// Deletes a drink; requires `delete:drinks`.
pub async fn delete_drink(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(drink_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    auth.require(PERM_DELETE_DRINKS)?;

    let result = query("DELETE FROM drinks WHERE id = $1")
        .bind(drink_id)
        .execute(&state.db)
        .await
        .map_err(|err| {
            tracing::warn!(?err, drink_id, "failed to delete drink");
            ApiError::Unprocessable
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }

    Ok(Json(json!({ "success": true, "deleted": drink_id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Drink {
        Drink {
            id: 1,
            title: "Water".to_string(),
            recipe: json!([
                { "name": "water", "color": "blue", "parts": 1 },
                { "name": "ice", "color": "white", "parts": 2 }
            ]),
        }
    }

    #[test]
    fn short_hides_ingredient_names() {
        let value = water().short();
        assert_eq!(value["title"], "Water");
        assert_eq!(
            value["recipe"],
            json!([
                { "color": "blue", "parts": 1 },
                { "color": "white", "parts": 2 }
            ])
        );
    }

    #[test]
    fn long_keeps_full_recipe() {
        let value = water().long();
        assert_eq!(value["recipe"][0]["name"], "water");
        assert_eq!(value["recipe"][1]["parts"], 2);
    }

    #[test]
    fn short_passes_non_array_recipe_through() {
        let drink = Drink {
            id: 2,
            title: "Mystery".to_string(),
            recipe: json!({}),
        };
        assert_eq!(drink.short()["recipe"], json!({}));
    }
}
