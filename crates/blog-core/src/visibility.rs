//! Visibility rules for posts and categories.
//!
//! A post is publicly visible when it is published, its `pub_date` has been
//! reached (inclusive), and its category, if any, is published. Authors
//! always see their own posts, drafts and scheduled ones included.
//!
//! The PostgreSQL repository expresses the same predicate as a SQL condition
//! for listings; any change here must be mirrored there.

use chrono::{DateTime, Utc};

use crate::domain::{Category, CategoryRef, Post, Viewer};

/// Visibility of `post` to an anonymous or non-owning viewer.
pub fn is_publicly_visible(post: &Post, category: Option<&CategoryRef>, now: DateTime<Utc>) -> bool {
    post.is_published && post.pub_date <= now && category.is_none_or(|c| c.is_published)
}

/// Visibility of `post` to `viewer` at `now`.
///
/// `category` must be the post's own category (`None` when the post has none).
pub fn is_visible(
    post: &Post,
    category: Option<&CategoryRef>,
    viewer: &Viewer,
    now: DateTime<Utc>,
) -> bool {
    viewer.is(post.author_id) || is_publicly_visible(post, category, now)
}

/// Categories have no owner; only the published flag counts.
pub fn is_category_visible(category: &Category) -> bool {
    category.is_published
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn post(author: Uuid, pub_date: DateTime<Utc>) -> Post {
        Post::new(author, "Title".into(), "Text".into(), pub_date)
    }

    fn category(is_published: bool) -> CategoryRef {
        CategoryRef {
            id: Uuid::new_v4(),
            title: "Travel".into(),
            slug: "travel".into(),
            is_published,
        }
    }

    #[test]
    fn test_pub_date_equal_to_now_is_visible() {
        let p = post(Uuid::new_v4(), now());
        assert!(is_visible(&p, None, &Viewer::Anonymous, now()));
    }

    #[test]
    fn test_scheduled_post_hidden_from_others_but_not_author() {
        let author = Uuid::new_v4();
        let p = post(author, now() + Duration::seconds(1));

        assert!(!is_visible(&p, None, &Viewer::Anonymous, now()));
        assert!(!is_visible(&p, None, &Viewer::User(Uuid::new_v4()), now()));
        assert!(is_visible(&p, None, &Viewer::User(author), now()));
    }

    #[test]
    fn test_unpublished_post_visible_only_to_author() {
        let author = Uuid::new_v4();
        let mut p = post(author, now() - Duration::days(1));
        p.is_published = false;

        assert!(!is_visible(&p, None, &Viewer::Anonymous, now()));
        assert!(is_visible(&p, None, &Viewer::User(author), now()));
    }

    #[test]
    fn test_unpublished_category_hides_post() {
        let author = Uuid::new_v4();
        let hidden = category(false);
        let shown = category(true);
        let p = post(author, now() - Duration::hours(1));

        assert!(!is_visible(&p, Some(&hidden), &Viewer::Anonymous, now()));
        assert!(is_visible(&p, Some(&shown), &Viewer::Anonymous, now()));
        assert!(is_visible(&p, Some(&hidden), &Viewer::User(author), now()));
    }

    #[test]
    fn test_visibility_matches_rule_for_all_flag_combinations() {
        let author = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        for is_published in [true, false] {
            for offset in [-60, 0, 60] {
                for cat in [None, Some(true), Some(false)] {
                    let mut p = post(author, now() + Duration::seconds(offset));
                    p.is_published = is_published;
                    let c = cat.map(category);

                    let expected_public = is_published && offset <= 0 && cat != Some(false);
                    for viewer in [Viewer::Anonymous, Viewer::User(stranger)] {
                        assert_eq!(is_visible(&p, c.as_ref(), &viewer, now()), expected_public);
                    }
                    assert!(is_visible(&p, c.as_ref(), &Viewer::User(author), now()));
                }
            }
        }
    }

    #[test]
    fn test_category_visibility() {
        let mut c = Category::new("News".into(), "Daily".into(), "news".into());
        assert!(is_category_visible(&c));
        c.is_published = false;
        assert!(!is_category_visible(&c));
    }
}
