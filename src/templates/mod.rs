//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary; pages extend `layout.html`.
//! Autoescaping is off: every view struct below escapes its text fields
//! when it is built, and pre-rendered HTML (post bodies, blocks, the like
//! button) is inserted as is.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{About, Landing};
use crate::helpers::{escape_html, truncate, url_for};

const SUMMARY_LENGTH: usize = 160;

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("blog_index.html", include_str!("site/blog_index.html")),
            ("blog_post.html", include_str!("site/blog_post.html")),
            ("about.html", include_str!("site/about.html")),
            ("articles_index.html", include_str!("site/articles_index.html")),
            ("article.html", include_str!("site/article.html")),
            (
                "partials/post_list.html",
                include_str!("site/partials/post_list.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub root: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        let author = if config.author.is_empty() {
            &config.title
        } else {
            &config.author
        };

        Self {
            title: escape_html(&config.title),
            description: escape_html(&config.description),
            author: escape_html(author),
            language: escape_html(&config.language),
            root: escape_html(&url_for(config, "/")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub description: String,
    pub summary: String,
    pub path: String,
    /// Rendered markdown
    pub body: String,
}

impl PostData {
    pub fn new(title: &str, description: &str, path: &str, body: String) -> Self {
        Self {
            title: escape_html(title),
            description: escape_html(description),
            summary: escape_html(&truncate(description, SUMMARY_LENGTH)),
            path: escape_html(path),
            body,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LandingData {
    pub title: String,
    pub description: String,
    pub sections: Vec<SectionData>,
    pub cta: LinkData,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkData {
    pub text: String,
    pub link: String,
}

impl From<&Landing> for LandingData {
    fn from(landing: &Landing) -> Self {
        Self {
            title: escape_html(&landing.title),
            description: escape_html(&landing.description),
            sections: landing
                .sections
                .iter()
                .map(|s| SectionData {
                    title: escape_html(&s.title),
                    content: escape_html(&s.content),
                    image: s.image.as_deref().map(escape_html),
                })
                .collect(),
            cta: LinkData {
                text: escape_html(&landing.cta.text),
                link: escape_html(&landing.cta.link),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AboutData {
    pub name: String,
    pub image: String,
    pub bio: String,
    pub social_links: Vec<SocialLinkData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialLinkData {
    pub platform: String,
    pub url: String,
    pub icon: String,
}

impl From<&About> for AboutData {
    fn from(about: &About) -> Self {
        Self {
            name: escape_html(&about.name),
            image: escape_html(&about.image),
            bio: escape_html(&about.bio),
            social_links: about
                .social_links
                .iter()
                .map(|l| SocialLinkData {
                    platform: escape_html(&l.platform),
                    url: escape_html(&l.url),
                    icon: escape_html(&l.icon),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleData {
    pub title: String,
    pub description: Option<String>,
    pub path: String,
    pub date: Option<String>,
    pub date_xml: Option<String>,
    /// Pre-rendered `<img>` tag
    pub cover: Option<String>,
    pub blocks: Vec<BlockData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockData {
    pub kind: String,
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Cta, Section};

    fn base_context() -> Context {
        let config = SiteConfig {
            title: "Acme".to_string(),
            ..Default::default()
        };
        let mut context = Context::new();
        context.insert("site", &SiteData::from(&config));
        context.insert("nav", &Vec::<NavItem>::new());
        context.insert("current_path", "/");
        context.insert("current_year", "2024");
        context.insert("canonical", "http://localhost:4321/");
        context.insert("version", "0.0.0");
        context
    }

    #[test]
    fn test_templates_compile() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_blog_post_escapes_front_matter() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert(
            "post",
            &PostData::new(
                "Tom & Jerry",
                "<b>bold</b>",
                "/blog/tom/",
                "<p>Body</p>".to_string(),
            ),
        );
        context.insert("like_button", "<button>Like</button>");
        context.insert("like_script", "");

        let html = renderer.render("blog_post.html", &context).unwrap();
        assert!(html.contains("<h1>Tom &amp; Jerry</h1>"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("<button>Like</button>"));
    }

    #[test]
    fn test_index_renders_landing() {
        let renderer = TemplateRenderer::new().unwrap();
        let landing = Landing {
            title: "Ship faster".to_string(),
            description: "Tools for teams".to_string(),
            sections: vec![Section {
                title: "Fast".to_string(),
                content: "Really fast".to_string(),
                image: None,
            }],
            cta: Cta {
                text: "Start".to_string(),
                link: "/signup".to_string(),
            },
        };

        let mut context = base_context();
        context.insert("landing", &LandingData::from(&landing));
        context.insert("posts", &Vec::<PostData>::new());

        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains("<title>Ship faster</title>"));
        assert!(html.contains(r#"<a class="cta" href="/signup">Start</a>"#));
        assert!(html.contains("<h2>Fast</h2>"));
        assert!(!html.contains("Latest posts"));
    }

    #[test]
    fn test_site_data_author_falls_back_to_title() {
        let config = SiteConfig {
            title: "Acme".to_string(),
            ..Default::default()
        };
        assert_eq!(SiteData::from(&config).author, "Acme");
    }

    #[test]
    fn test_post_summary_is_truncated() {
        let long = "word ".repeat(100);
        let post = PostData::new("t", &long, "/blog/t/", String::new());
        assert!(post.summary.chars().count() <= SUMMARY_LENGTH);
        assert!(post.summary.ends_with("..."));
    }
}
