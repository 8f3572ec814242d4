use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::log_audit,
    dto::products::{CreateProductRequest, UpdateProductRequest},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Product, StringList},
    response::{ApiResponse, Pagination},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
};

/// Slug derivation used by the catalog: lowercase, every non-alphanumeric
/// byte replaced with a dash.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }
    if let Some(category) = query.category {
        condition = condition.add(Column::CategoryId.eq(category));
    }
    if let Some(is_active) = query.is_active {
        condition = condition.add(Column::IsActive.eq(is_active));
    }
    if let Some(is_featured) = query.is_featured {
        condition = condition.add(Column::IsFeatured.eq(is_featured));
    }
    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };
    let mut finder = Products::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items: Vec<Product> = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let pagination = Pagination::from_window(page, limit, total);
    let count = items.len();
    Ok(ApiResponse::list(items, count, pagination))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;
    Ok(ApiResponse::success(product_from_entity(product)))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.clone()),
        slug: Set(slugify(&payload.name)),
        description: Set(payload.description),
        price: Set(payload.price),
        compare_price: Set(payload.compare_price),
        category_id: Set(payload.category),
        images: Set(StringList(payload.images)),
        stock: Set(payload.stock),
        sku: Set(payload.sku),
        tags: Set(StringList(payload.tags)),
        is_active: Set(payload.is_active),
        is_featured: Set(payload.is_featured),
        average_rating: Set(payload.average_rating),
        created_at: Set(Utc::now().into()),
    };
    // Unique-SKU violations come back as a database error and surface to the
    // caller as a 400.
    let product = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::with_message(
        "Product created",
        product_from_entity(product),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.slug = Set(slugify(&name));
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(compare_price) = payload.compare_price {
        active.compare_price = Set(Some(compare_price));
    }
    if let Some(category) = payload.category {
        active.category_id = Set(category);
    }
    if let Some(images) = payload.images {
        active.images = Set(StringList(images));
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(sku) = payload.sku {
        active.sku = Set(Some(sku));
    }
    if let Some(tags) = payload.tags {
        active.tags = Set(StringList(tags));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(is_featured) = payload.is_featured {
        active.is_featured = Set(is_featured);
    }
    if let Some(average_rating) = payload.average_rating {
        active.average_rating = Set(Some(average_rating));
    }

    let product = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::with_message(
        "Updated",
        product_from_entity(product),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Product not found".into()));
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(serde_json::json!({})))
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        slug: model.slug,
        description: model.description,
        price: model.price,
        compare_price: model.compare_price,
        category: model.category_id,
        images: model.images.0,
        stock: model.stock,
        sku: model.sku,
        tags: model.tags.0,
        is_active: model.is_active,
        is_featured: model.is_featured,
        average_rating: model.average_rating,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
