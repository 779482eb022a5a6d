//! Collection schemas
//!
//! Each local collection declares its shape as a plain struct. Validation is
//! explicit: [`Schema::validate`] turns an untyped JSON value into the typed
//! entry or a [`SchemaError`] naming the collection, the entry and the
//! failing field. Unknown keys are ignored; every declared field without
//! `Option` is required.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::collection::CollectionName;
use crate::error::SchemaError;

/// A typed collection entry shape
pub trait Schema: DeserializeOwned + Serialize + Sized {
    /// Collection this schema belongs to
    const COLLECTION: CollectionName;

    /// Validate an untyped value for the entry `entry`
    fn validate(entry: &str, value: Value) -> Result<Self, SchemaError> {
        serde_json::from_value(value)
            .map_err(|e| SchemaError::new(Self::COLLECTION.as_str(), entry, e.to_string()))
    }
}

/// Front matter of a `blog` post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub description: String,
}

impl Schema for BlogPost {
    const COLLECTION: CollectionName = CollectionName::Blog;
}

/// Landing page data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landing {
    pub title: String,
    pub description: String,
    pub sections: Vec<Section>,
    pub cta: Cta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Call to action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cta {
    pub text: String,
    pub link: String,
}

impl Schema for Landing {
    const COLLECTION: CollectionName = CollectionName::Landing;
}

/// About page bio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
    pub name: String,
    pub image: String,
    pub bio: String,
    #[serde(rename = "socialLinks")]
    pub social_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    pub icon: String,
}

impl Schema for About {
    const COLLECTION: CollectionName = CollectionName::About;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blog_post_valid() {
        let post = BlogPost::validate(
            "hello",
            json!({ "title": "Hello", "description": "First post", "draft": true }),
        )
        .unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.description, "First post");
    }

    #[test]
    fn test_blog_post_missing_description() {
        let err = BlogPost::validate("hello", json!({ "title": "Hello" })).unwrap_err();
        assert_eq!(err.collection, "blog");
        assert_eq!(err.entry, "hello");
        assert!(err.message.contains("description"));
    }

    #[test]
    fn test_blog_post_wrong_type() {
        let err =
            BlogPost::validate("hello", json!({ "title": 42, "description": "x" })).unwrap_err();
        assert!(err.message.contains("invalid type"));
    }

    #[test]
    fn test_landing_optional_image() {
        let landing = Landing::validate(
            "index",
            json!({
                "title": "Acme",
                "description": "We build things",
                "sections": [
                    { "title": "Fast", "content": "Very fast", "image": "/fast.png" },
                    { "title": "Safe", "content": "Very safe" }
                ],
                "cta": { "text": "Start", "link": "/signup" }
            }),
        )
        .unwrap();
        assert_eq!(landing.sections.len(), 2);
        assert_eq!(landing.sections[0].image.as_deref(), Some("/fast.png"));
        assert!(landing.sections[1].image.is_none());
        assert_eq!(landing.cta.link, "/signup");
    }

    #[test]
    fn test_landing_missing_cta() {
        let err = Landing::validate(
            "index",
            json!({ "title": "Acme", "description": "x", "sections": [] }),
        )
        .unwrap_err();
        assert_eq!(err.collection, "landing");
        assert!(err.message.contains("cta"));
    }

    #[test]
    fn test_about_social_links() {
        let about = About::validate(
            "me",
            json!({
                "name": "Sam",
                "image": "/sam.jpg",
                "bio": "Writes things",
                "socialLinks": [
                    { "platform": "GitHub", "url": "https://github.com/sam", "icon": "github" }
                ]
            }),
        )
        .unwrap();
        assert_eq!(about.social_links[0].platform, "GitHub");
    }

    #[test]
    fn test_about_social_link_missing_icon() {
        let err = About::validate(
            "me",
            json!({
                "name": "Sam",
                "image": "/sam.jpg",
                "bio": "Writes things",
                "socialLinks": [{ "platform": "GitHub", "url": "https://github.com/sam" }]
            }),
        )
        .unwrap_err();
        assert!(err.message.contains("icon"));
    }
}
