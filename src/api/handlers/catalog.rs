//! Menu, category, and product endpoints.
//!
//! Mutations are attributed to the [`Actor`] behind the request.

use crate::{
    api::{
        ApiState,
        dto::{
            CategoryRequest, CreateProductRequest, IdRequest, UpdateCategoryRequest,
            UpdateProductRequest,
        },
        error::ApiResult,
        extract::{Actor, ApiJson},
    },
    core::{category as categories, product as products},
    entities::{CategoryModel, ProductModel},
    errors::Error,
};
use axum::{Json, extract::State};
use serde_json::{Value, json};
use std::{collections::BTreeMap, sync::Arc};

fn required_id(payload: &IdRequest) -> Result<i64, Error> {
    payload.id.ok_or_else(|| Error::validation("id is required"))
}

/// `GET /api/menu`
pub async fn menu(
    State(state): State<Arc<ApiState>>,
) -> ApiResult<Json<BTreeMap<String, Vec<ProductModel>>>> {
    Ok(Json(products::get_menu(&state.database).await?))
}

/// `GET /api/categories`
pub async fn list_categories(
    State(state): State<Arc<ApiState>>,
) -> ApiResult<Json<Vec<CategoryModel>>> {
    Ok(Json(categories::list_categories(&state.database).await?))
}

/// `POST /api/categories/add`
pub async fn add_category(
    State(state): State<Arc<ApiState>>,
    actor: Actor,
    ApiJson(payload): ApiJson<CategoryRequest>,
) -> ApiResult<Json<Value>> {
    let created = categories::create_category(&state.database, &payload.name, &actor.username).await?;
    Ok(Json(json!({ "success": true, "category": created })))
}

/// `POST /api/categories/update`
pub async fn update_category(
    State(state): State<Arc<ApiState>>,
    actor: Actor,
    ApiJson(payload): ApiJson<UpdateCategoryRequest>,
) -> ApiResult<Json<Value>> {
    let updated =
        categories::rename_category(&state.database, payload.id, &payload.name, &actor.username)
            .await?;
    Ok(Json(json!({ "success": true, "category": updated })))
}

/// `POST /api/categories/delete`: removes the category and its products.
pub async fn delete_category(
    State(state): State<Arc<ApiState>>,
    actor: Actor,
    ApiJson(payload): ApiJson<IdRequest>,
) -> ApiResult<Json<Value>> {
    let id = required_id(&payload)?;
    let removed = categories::delete_category(&state.database, id, &actor.username).await?;
    Ok(Json(json!({ "success": true, "productsRemoved": removed })))
}

/// Serves both `/api/products/add` and `/api/add-product`.
pub async fn add_product(
    State(state): State<Arc<ApiState>>,
    actor: Actor,
    ApiJson(payload): ApiJson<CreateProductRequest>,
) -> ApiResult<Json<Value>> {
    let created = match (payload.category_id, payload.category.as_deref()) {
        (Some(category_id), _) => {
            products::create_product(
                &state.database,
                category_id,
                &payload.name,
                payload.price,
                &actor.username,
            )
            .await?
        }
        (None, Some(category_name)) => {
            products::create_product_in_category(
                &state.database,
                category_name,
                &payload.name,
                payload.price,
                &actor.username,
            )
            .await?
        }
        (None, None) => return Err(Error::validation("category or category_id is required").into()),
    };
    Ok(Json(json!({ "success": true, "product": created })))
}

/// `POST /api/products/update`
pub async fn update_product(
    State(state): State<Arc<ApiState>>,
    actor: Actor,
    ApiJson(payload): ApiJson<UpdateProductRequest>,
) -> ApiResult<Json<Value>> {
    let updated = products::update_product(
        &state.database,
        payload.id,
        &payload.name,
        payload.price,
        payload.category_id,
        &actor.username,
    )
    .await?;
    Ok(Json(json!({ "success": true, "product": updated })))
}

/// `POST /api/products/delete`
pub async fn delete_product(
    State(state): State<Arc<ApiState>>,
    actor: Actor,
    ApiJson(payload): ApiJson<IdRequest>,
) -> ApiResult<Json<Value>> {
    let id = required_id(&payload)?;
    products::delete_product(&state.database, id, &actor.username).await?;
    Ok(Json(json!({ "success": true })))
}
