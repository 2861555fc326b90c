//! Back-office registry: which columns the admin lists, edits and filters
//! for each model.
//!
//! Built once by [`register_models`] at startup and read-only afterwards.

use serde::Serialize;

/// Shown in admin listings for absent optional values.
pub const EMPTY_VALUE_DISPLAY: &str = "Not set";

#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelAdmin {
    pub model: &'static str,
    pub list_display: &'static [&'static str],
    pub list_editable: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    pub list_filter: &'static [&'static str],
    pub list_display_links: &'static [&'static str],
}

impl ModelAdmin {
    pub fn new(model: &'static str, list_display: &'static [&'static str]) -> Self {
        Self {
            model,
            list_display,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminSite {
    pub empty_value_display: &'static str,
    models: Vec<ModelAdmin>,
}

impl AdminSite {
    pub fn new() -> Self {
        Self {
            empty_value_display: EMPTY_VALUE_DISPLAY,
            models: Vec::new(),
        }
    }

    /// Registering a model twice replaces the earlier descriptor.
    pub fn register(&mut self, admin: ModelAdmin) {
        self.models.retain(|m| m.model != admin.model);
        self.models.push(admin);
    }

    pub fn models(&self) -> &[ModelAdmin] {
        &self.models
    }
}

impl Default for AdminSite {
    fn default() -> Self {
        Self::new()
    }
}

pub fn register_models() -> AdminSite {
    let mut site = AdminSite::new();

    site.register(ModelAdmin {
        list_editable: &["is_published"],
        search_fields: &["title", "author", "category"],
        list_filter: &[
            "category",
            "is_published",
            "created_at",
            "pub_date",
            "location",
            "author",
        ],
        list_display_links: &["title"],
        ..ModelAdmin::new(
            "post",
            &[
                "is_published",
                "created_at",
                "title",
                "text",
                "pub_date",
                "author",
                "location",
                "category",
            ],
        )
    });
    site.register(ModelAdmin::new(
        "category",
        &["is_published", "created_at", "title", "description", "slug"],
    ));
    site.register(ModelAdmin::new(
        "location",
        &["is_published", "created_at", "name"],
    ));
    site.register(ModelAdmin {
        list_editable: &["text"],
        list_display_links: &["created_at"],
        ..ModelAdmin::new("comment", &["created_at", "text", "author"])
    });

    site
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(site: &'a AdminSite, model: &str) -> &'a ModelAdmin {
        site.models().iter().find(|m| m.model == model).unwrap()
    }

    #[test]
    fn test_all_blog_models_are_registered() {
        let site = register_models();

        let names: Vec<_> = site.models().iter().map(|m| m.model).collect();
        assert_eq!(names, ["post", "category", "location", "comment"]);
        assert_eq!(site.empty_value_display, "Not set");
    }

    #[test]
    fn test_post_admin_links_title_and_edits_publication() {
        let site = register_models();
        let post = find(&site, "post");

        assert_eq!(post.list_display_links, ["title"]);
        assert_eq!(post.list_editable, ["is_published"]);
        assert!(post.list_filter.contains(&"pub_date"));
    }

    #[test]
    fn test_register_replaces_existing_descriptor() {
        let mut site = register_models();
        site.register(ModelAdmin::new("location", &["name"]));

        assert_eq!(site.models().len(), 4);
        assert_eq!(find(&site, "location").list_display, ["name"]);
    }
}
