//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/api-docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{favorite_handler, review_handler, tool_handler, user_handler};
use crate::domain::{
    Favorite, FavoriteDetails, FavoriteTool, Review, ReviewDetails, Tool, ToolDetails, ToolImage,
    UserResponse, UserRole, UserSummary,
};
use crate::types::MessageResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tool Rental API",
        version = "0.1.0",
        description = "Peer-to-peer tool rental marketplace: accounts, tool listings, reviews and favorites"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        user_handler::register,
        user_handler::login,
        user_handler::get_me,
        user_handler::update_me,
        user_handler::delete_me,
        user_handler::upload_profile_image,
        user_handler::delete_profile_image,
        user_handler::change_email,
        user_handler::change_password,
        user_handler::get_user,
        tool_handler::create_tool,
        tool_handler::list_tools,
        tool_handler::get_tool,
        tool_handler::update_tool,
        tool_handler::delete_tool,
        tool_handler::add_image,
        tool_handler::upload_image,
        tool_handler::list_images,
        tool_handler::delete_image,
        review_handler::create_review,
        review_handler::list_reviews,
        review_handler::reviews_of_user,
        review_handler::update_review,
        review_handler::delete_review,
        favorite_handler::add_favorite,
        favorite_handler::list_favorites,
        favorite_handler::remove_favorite,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            UserSummary,
            Tool,
            ToolImage,
            ToolDetails,
            Review,
            ReviewDetails,
            Favorite,
            FavoriteTool,
            FavoriteDetails,
            MessageResponse,
            user_handler::RegisterRequest,
            user_handler::LoginRequest,
            user_handler::UpdateProfileRequest,
            user_handler::ChangeEmailRequest,
            user_handler::ChangePasswordRequest,
            user_handler::RegisterResponse,
            user_handler::LoginResponse,
            user_handler::ProfileResponse,
            user_handler::ProfileImageResponse,
            user_handler::EmailChangedResponse,
            tool_handler::CreateToolRequest,
            tool_handler::UpdateToolRequest,
            tool_handler::AddImageRequest,
            tool_handler::ToolCreatedResponse,
            tool_handler::ToolUpdatedResponse,
            tool_handler::ImageAddedResponse,
            review_handler::CreateReviewRequest,
            review_handler::UpdateReviewRequest,
            review_handler::ReviewCreatedResponse,
            review_handler::ReviewUpdatedResponse,
            favorite_handler::AddFavoriteRequest,
            favorite_handler::FavoriteCreatedResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Registration, login and profile management"),
        (name = "Tools", description = "Tool listings and their images"),
        (name = "Reviews", description = "User reviews"),
        (name = "Favorites", description = "Bookmarked tools")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /api/users/login"))
                        .build(),
                ),
            );
        }
    }
}
