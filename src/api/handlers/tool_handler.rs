//! Tool listing and tool image handlers.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{read_image_field, ApiPath, ValidatedJson};
use crate::api::middleware::{require_auth, CurrentUser};
use crate::api::AppState;
use crate::domain::{NewTool, Tool, ToolChanges, ToolDetails, ToolImage};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

/// Tool creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateToolRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Cordless drill")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "power-tools")]
    pub category: Option<String>,
    #[validate(range(min = 0.0, message = "Price per day must be a non-negative number"))]
    #[schema(example = 25.0)]
    pub price_per_day: f64,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    #[schema(example = 52.2297)]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    #[schema(example = 21.0122)]
    pub longitude: f64,
}

/// Partial tool update
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateToolRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0.0, message = "Price per day must be a non-negative number"))]
    pub price_per_day: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
}

/// Attach an image hosted elsewhere
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddImageRequest {
    #[validate(url(message = "Image URL must be a valid URL"))]
    #[schema(example = "https://cdn.example.com/drill.jpg")]
    pub image_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolCreatedResponse {
    pub message: String,
    pub tool_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToolUpdatedResponse {
    pub message: String,
    pub tool: Tool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageAddedResponse {
    pub message: String,
    pub tool_image_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Routes under `/api/tools`; reads are public
pub fn tool_routes(state: AppState) -> Router<AppState> {
    let protected = require_auth(
        Router::new()
            .route("/", post(create_tool))
            .route("/:id", put(update_tool).delete(delete_tool))
            .route("/:id/images", post(add_image))
            .route("/:id/images/upload", post(upload_image))
            .route("/:id/images/:image_id", delete(delete_image)),
        state,
    );

    Router::new()
        .route("/", get(list_tools))
        .route("/:id", get(get_tool))
        .route("/:id/images", get(list_images))
        .merge(protected)
}

/// Create a tool owned by the caller
#[utoipa::path(
    post,
    path = "/api/tools",
    tag = "Tools",
    security(("bearer_auth" = [])),
    request_body = CreateToolRequest,
    responses(
        (status = 201, description = "Tool created", body = ToolCreatedResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Owner not found")
    )
)]
pub async fn create_tool(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateToolRequest>,
) -> AppResult<Created<ToolCreatedResponse>> {
    let new_tool = NewTool {
        name: payload.name,
        description: payload.description,
        category: payload.category,
        price_per_day: payload.price_per_day,
        latitude: payload.latitude,
        longitude: payload.longitude,
    };
    let tool = state
        .services
        .tools()
        .create_tool(current.id, new_tool)
        .await?;

    Ok(Created(ToolCreatedResponse {
        message: "Tool created successfully".to_string(),
        tool_id: tool.id,
    }))
}

/// List every tool with its owner and images
#[utoipa::path(
    get,
    path = "/api/tools",
    tag = "Tools",
    responses((status = 200, description = "All tools", body = [ToolDetails]))
)]
pub async fn list_tools(State(state): State<AppState>) -> AppResult<Json<Vec<ToolDetails>>> {
    Ok(Json(state.services.tools().list_tools().await?))
}

#[utoipa::path(
    get,
    path = "/api/tools/{id}",
    tag = "Tools",
    params(("id" = i32, Path, description = "Tool ID")),
    responses(
        (status = 200, description = "Tool found", body = ToolDetails),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn get_tool(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ToolDetails>> {
    Ok(Json(state.services.tools().get_tool(id).await?))
}

/// Update a tool the caller owns
#[utoipa::path(
    put,
    path = "/api/tools/{id}",
    tag = "Tools",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tool ID")),
    request_body = UpdateToolRequest,
    responses(
        (status = 200, description = "Tool updated", body = ToolUpdatedResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn update_tool(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateToolRequest>,
) -> AppResult<Json<ToolUpdatedResponse>> {
    let changes = ToolChanges {
        name: payload.name,
        description: payload.description,
        category: payload.category,
        price_per_day: payload.price_per_day,
        latitude: payload.latitude,
        longitude: payload.longitude,
    };
    let tool = state
        .services
        .tools()
        .update_tool(current.id, id, changes)
        .await?;

    Ok(Json(ToolUpdatedResponse {
        message: "Tool updated successfully".to_string(),
        tool,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/tools/{id}",
    tag = "Tools",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tool ID")),
    responses(
        (status = 200, description = "Tool deleted", body = MessageResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn delete_tool(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.tools().delete_tool(current.id, id).await?;
    Ok(Json(MessageResponse::new("Tool deleted successfully")))
}

/// Attach an image by URL
#[utoipa::path(
    post,
    path = "/api/tools/{id}/images",
    tag = "Tools",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tool ID")),
    request_body = AddImageRequest,
    responses(
        (status = 201, description = "Image added", body = ImageAddedResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn add_image(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(tool_id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<AddImageRequest>,
) -> AppResult<Created<ImageAddedResponse>> {
    let image = state
        .services
        .tools()
        .add_image_url(current.id, tool_id, payload.image_url)
        .await?;

    Ok(Created(ImageAddedResponse {
        message: "Image added successfully".to_string(),
        tool_image_id: image.id,
        image_url: None,
    }))
}

/// Upload an image file (multipart field `image`)
#[utoipa::path(
    post,
    path = "/api/tools/{id}/images/upload",
    tag = "Tools",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tool ID")),
    request_body(content = String, content_type = "multipart/form-data", description = "Image in the `image` field"),
    responses(
        (status = 201, description = "Image uploaded", body = ImageAddedResponse),
        (status = 400, description = "Missing, empty, oversized or non-image file"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(tool_id): ApiPath<i32>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Created<ImageAddedResponse>> {
    let upload = read_image_field(multipart?, "image", state.max_upload_bytes).await?;
    let image = state
        .services
        .tools()
        .upload_image(current.id, tool_id, upload.data, upload.mime_type)
        .await?;

    Ok(Created(ImageAddedResponse {
        message: "Image uploaded successfully".to_string(),
        tool_image_id: image.id,
        image_url: Some(image.image_url),
    }))
}

#[utoipa::path(
    get,
    path = "/api/tools/{id}/images",
    tag = "Tools",
    params(("id" = i32, Path, description = "Tool ID")),
    responses(
        (status = 200, description = "Images of the tool", body = [ToolImage]),
        (status = 404, description = "Tool not found")
    )
)]
pub async fn list_images(
    State(state): State<AppState>,
    ApiPath(tool_id): ApiPath<i32>,
) -> AppResult<Json<Vec<ToolImage>>> {
    Ok(Json(state.services.tools().list_images(tool_id).await?))
}

/// Remove an image from a tool the caller owns
#[utoipa::path(
    delete,
    path = "/api/tools/{id}/images/{image_id}",
    tag = "Tools",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Tool ID"),
        ("image_id" = i32, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image deleted", body = MessageResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Tool or image not found")
    )
)]
pub async fn delete_image(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath((tool_id, image_id)): ApiPath<(i32, i32)>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .tools()
        .delete_image(current.id, tool_id, image_id)
        .await?;

    Ok(Json(MessageResponse::new("Image deleted successfully")))
}
