//! Generator module - renders validated collections to static HTML

use anyhow::{Context as _, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::components::{LikeButton, LIKE_BUTTON_SCRIPT};
use crate::content::{Article, Block, Collections, Media, MarkdownRenderer};
use crate::helpers::{date_xml, escape_html, full_date, full_url_for, image_tag, media_url, url_for};
use crate::templates::{
    AboutData, ArticleData, BlockData, LandingData, NavItem, PostData, SiteData, TemplateRenderer,
};
use crate::Site;

/// Heart icon placed inside every like button
const HEART_ICON: &str = r#"<svg aria-hidden="true" width="20" height="20" viewBox="0 0 24 24" fill="currentColor"><path d="M12 21s-6.7-4.4-9.3-8.1C.6 9.8 2.1 5.5 6 5c2.1-.3 3.9.8 4.9 2.3h2.2C14.1 5.8 15.9 4.7 18 5c3.9.5 5.4 4.8 3.3 7.9C18.7 16.6 12 21 12 21z"/></svg>"#;

/// Static site generator using Tera templates
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl Generator {
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            renderer: TemplateRenderer::new()?,
            markdown: MarkdownRenderer::new(),
        })
    }

    /// Generate the entire site, returning the number of pages written
    pub fn generate(&self, collections: &Collections) -> Result<usize> {
        // Remote entries are validated here; a malformed article stops the build
        let mut articles = collections
            .strapi_posts()
            .iter()
            .map(|entry| entry.article())
            .collect::<Result<Vec<_>, _>>()?;
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        check_output_paths(collections, &articles)?;

        fs::create_dir_all(&self.site.public_dir).with_context(|| {
            format!("Failed to create {}", self.site.public_dir.display())
        })?;

        self.copy_static_assets()?;

        let posts: Vec<PostData> = collections
            .blog()
            .iter()
            .map(|entry| {
                PostData::new(
                    &entry.data.title,
                    &entry.data.description,
                    &url_for(&self.site.config, &format!("blog/{}/", entry.id)),
                    entry.body.clone().unwrap_or_default(),
                )
            })
            .collect();

        let mut pages = 0;
        pages += self.generate_index(collections, &posts)?;
        pages += self.generate_blog(collections, &posts)?;
        pages += self.generate_about(collections)?;
        pages += self.generate_articles(&articles)?;

        tracing::info!(
            "Generated {} pages in {}",
            pages,
            self.site.public_dir.display()
        );
        Ok(pages)
    }

    fn nav(&self) -> Vec<NavItem> {
        [
            ("Home", "/"),
            ("Blog", "/blog/"),
            ("Articles", "/articles/"),
            ("About", "/about/"),
        ]
        .iter()
        .map(|(name, path)| NavItem {
            name: name.to_string(),
            path: url_for(&self.site.config, path),
        })
        .collect()
    }

    /// Create a base context with common variables
    fn create_base_context(&self, path: &str) -> Context {
        let config = &self.site.config;
        let mut context = Context::new();
        context.insert("site", &SiteData::from(config));
        context.insert("nav", &self.nav());
        context.insert("current_path", &url_for(config, path));
        context.insert("canonical", &escape_html(&full_url_for(config, path)));
        context.insert("current_year", &chrono::Utc::now().format("%Y").to_string());
        context.insert("version", env!("CARGO_PKG_VERSION"));
        context.insert("like_script", LIKE_BUTTON_SCRIPT);
        context
    }

    /// Landing page plus the latest posts
    fn generate_index(&self, collections: &Collections, posts: &[PostData]) -> Result<usize> {
        let landing = collections.landing().first().map(|e| LandingData::from(&e.data));
        if collections.landing().len() > 1 {
            tracing::warn!(
                "{} landing entries found, using {}",
                collections.landing().len(),
                collections.landing()[0].id
            );
        }

        let mut context = self.create_base_context("/");
        context.insert("landing", &landing);
        context.insert("posts", &posts.iter().take(3).collect::<Vec<_>>());

        let html = self.renderer.render("index.html", &context)?;
        self.write_page("/", &html)?;
        Ok(1)
    }

    /// Blog index and one page per post
    fn generate_blog(&self, collections: &Collections, posts: &[PostData]) -> Result<usize> {
        let mut context = self.create_base_context("/blog/");
        context.insert("posts", posts);
        let html = self.renderer.render("blog_index.html", &context)?;
        self.write_page("/blog/", &html)?;

        for (entry, post) in collections.blog().iter().zip(posts) {
            let path = format!("/blog/{}/", entry.id);
            let mut context = self.create_base_context(&path);
            context.insert("post", post);
            context.insert("like_button", &LikeButton::new().render(HEART_ICON));

            let html = self.renderer.render("blog_post.html", &context)?;
            self.write_page(&path, &html)?;
        }

        Ok(posts.len() + 1)
    }

    fn generate_about(&self, collections: &Collections) -> Result<usize> {
        let about = collections.about().first().map(|e| AboutData::from(&e.data));

        let mut context = self.create_base_context("/about/");
        context.insert("about", &about);
        let html = self.renderer.render("about.html", &context)?;
        self.write_page("/about/", &html)?;
        Ok(1)
    }

    /// Article index and one page per remote article
    fn generate_articles(&self, articles: &[Article]) -> Result<usize> {
        let data = articles
            .iter()
            .map(|article| self.article_data(article))
            .collect::<Result<Vec<_>>>()?;

        let mut context = self.create_base_context("/articles/");
        context.insert("articles", &data);
        let html = self.renderer.render("articles_index.html", &context)?;
        self.write_page("/articles/", &html)?;

        for (article, view) in articles.iter().zip(&data) {
            let path = format!("/articles/{}/", article.url_slug());
            let mut context = self.create_base_context(&path);
            context.insert("article", view);
            context.insert("like_button", &LikeButton::new().render(HEART_ICON));

            let html = self.renderer.render("article.html", &context)?;
            self.write_page(&path, &html)?;
        }

        Ok(articles.len() + 1)
    }

    fn article_data(&self, article: &Article) -> Result<ArticleData> {
        let blocks = article
            .blocks
            .iter()
            .map(|block| {
                Ok(BlockData {
                    kind: block.kind().as_str().replace('.', "-"),
                    html: self.render_block(block)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ArticleData {
            title: escape_html(&article.title),
            description: article.description.as_deref().map(escape_html),
            path: escape_html(&url_for(
                &self.site.config,
                &format!("/articles/{}/", article.url_slug()),
            )),
            date: article.published_at.as_ref().map(full_date),
            date_xml: article.published_at.as_ref().map(date_xml),
            cover: article.cover.as_ref().map(|m| self.media_tag(m)),
            blocks,
        })
    }

    fn render_block(&self, block: &Block) -> Result<String> {
        let html = match block {
            Block::Media { file } => match file {
                Some(file) => format!("<figure>{}</figure>", self.media_tag(file)),
                None => String::new(),
            },
            Block::Slider { files } => {
                let slides: String = files
                    .iter()
                    .map(|f| format!(r#"<div class="slide">{}</div>"#, self.media_tag(f)))
                    .collect();
                format!(r#"<div class="slider">{}</div>"#, slides)
            }
            Block::Quote { title, body } => {
                let cite = title
                    .as_deref()
                    .map(|t| format!("<footer>{}</footer>", escape_html(t)))
                    .unwrap_or_default();
                format!(
                    "<blockquote><p>{}</p>{}</blockquote>",
                    escape_html(body.as_deref().unwrap_or("")),
                    cite
                )
            }
            Block::RichText { body } => self.markdown.render(body.as_deref().unwrap_or(""))?,
        };
        Ok(html)
    }

    fn media_tag(&self, media: &Media) -> String {
        let src = media_url(self.site.config.strapi.url.as_deref(), &media.url);
        let size = media.width.zip(media.height);
        image_tag(&src, media.alternative_text.as_deref(), size)
    }

    /// Write `html` to `<public_dir>/<path>/index.html`
    fn write_page(&self, path: &str, html: &str) -> Result<()> {
        // Strip leading slash from path to avoid creating absolute paths
        let clean_path = path.trim_matches('/');
        let output_path = self.site.public_dir.join(clean_path).join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Copy the static directory into the output as is
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = self.site.base_dir.join(&self.site.config.static_dir);
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(&static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(&static_dir)?;
            copy_file(path, &self.site.public_dir.join(relative))?;
        }

        Ok(())
    }
}

/// Every page must land on its own path; empty ids or slugs and duplicates
/// would overwrite another page
fn check_output_paths(collections: &Collections, articles: &[Article]) -> Result<()> {
    let mut owners: HashMap<String, String> = ["/", "/blog/", "/about/", "/articles/"]
        .iter()
        .map(|path| (path.to_string(), format!("the {} page", path)))
        .collect();

    let mut claim = |path: String, owner: String| -> Result<()> {
        match owners.get(&path) {
            Some(first) => anyhow::bail!("{} and {} both render to {}", first, owner, path),
            None => {
                owners.insert(path, owner);
                Ok(())
            }
        }
    };

    for entry in collections.blog() {
        if entry.id.is_empty() {
            anyhow::bail!("blog entry {:?} has an empty id", entry.source);
        }
        claim(
            format!("/blog/{}/", entry.id),
            format!("blog entry `{}`", entry.id),
        )?;
    }

    for article in articles {
        let slug = article.url_slug();
        if slug.is_empty() {
            anyhow::bail!("article `{}` has no usable slug", article.title);
        }
        claim(
            format!("/articles/{}/", slug),
            format!("article `{}`", article.title),
        )?;
    }

    Ok(())
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).with_context(|| format!("Failed to copy {:?}", from))?;
    Ok(())
}
