//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod categories;
mod comments;
mod health;
mod posts;
mod profile;
mod views;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(vec![err.to_string()]).into()
    }))
    .route("/health", web::get().to(health::health_check))
        // Reading
        .route("/", web::get().to(posts::index))
        .route("/posts/{id}/", web::get().to(posts::detail))
        .route("/category/{slug}/", web::get().to(categories::category_posts))
        .route("/profile/{username}/", web::get().to(profile::profile))
        // Posts
        .route("/posts/new/", web::post().to(posts::create))
        .route("/posts/{id}/edit/", web::post().to(posts::update))
        .route("/posts/{id}/delete/", web::post().to(posts::delete))
        // Comments
        .route("/posts/{id}/comment/", web::post().to(comments::create))
        .route("/comments/{id}/edit/", web::post().to(comments::update))
        .route("/comments/{id}/delete/", web::post().to(comments::delete))
        // Profile editing
        .route("/profile/{username}/edit/", web::get().to(profile::edit_form))
        .route("/profile/{username}/edit/", web::post().to(profile::edit))
        // Auth routes
        .service(
            web::scope("/auth")
                .route("/registration/", web::post().to(auth::register))
                .route("/login/", web::post().to(auth::login))
                .route("/me/", web::get().to(auth::me)),
        )
        // Back office
        .service(
            web::scope("/admin")
                .route("/", web::get().to(admin::site))
                .route("/categories/", web::post().to(admin::create_category))
                .route("/locations/", web::post().to(admin::create_location)),
        );
}
