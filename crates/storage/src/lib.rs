use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use shared::protocol::{BlogDetail, BlogSummary, ContentFormat, DocumentRecord, ProjectSummary};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use tracing::info;

/// SQLite-backed content store for the portfolio: knowledge-base documents,
/// projects and blog posts. Schema is ensured at open; rows are written by
/// the JSON seed loader and read by the API layer.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub documents: usize,
    pub projects: usize,
    pub blogs: usize,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        let storage = Self { pool };
        storage.ensure_schema().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                doc_id   TEXT PRIMARY KEY,
                title    TEXT NOT NULL,
                category TEXT NOT NULL,
                tags     TEXT NOT NULL,
                content  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("failed to ensure documents table exists")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                slug          TEXT PRIMARY KEY,
                name          TEXT NOT NULL,
                short_summary TEXT NOT NULL,
                long_summary  TEXT,
                tags          TEXT NOT NULL,
                github_url    TEXT,
                demo_url      TEXT,
                hero_image    TEXT,
                display_order INTEGER NOT NULL DEFAULT 0,
                project_type  TEXT NOT NULL DEFAULT 'personal'
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("failed to ensure projects table exists")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blogs (
                slug           TEXT PRIMARY KEY,
                title          TEXT NOT NULL,
                excerpt        TEXT NOT NULL,
                content        TEXT NOT NULL,
                content_format TEXT NOT NULL DEFAULT 'markdown',
                published_at   TEXT,
                tags           TEXT NOT NULL,
                hero_image     TEXT,
                medium_link    TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("failed to ensure blogs table exists")?;

        Ok(())
    }

    // ---- seeding -------------------------------------------------------

    /// Loads the JSON seed files from `dir` (missing files are skipped) and
    /// upserts their contents. Re-running against the same directory is
    /// harmless.
    pub async fn seed_from_dir(&self, dir: &Path) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        if let Some(documents) =
            read_seed::<DocumentRecord>(&dir.join("knowledge_base.json"))?
        {
            for document in &documents {
                self.upsert_document(document).await?;
            }
            report.documents = documents.len();
        }

        if let Some(projects) = read_seed::<ProjectSummary>(&dir.join("projects_seed.json"))? {
            for project in &projects {
                self.upsert_project(project).await?;
            }
            report.projects = projects.len();
        }

        if let Some(blogs) = read_seed::<BlogDetail>(&dir.join("blogs_seed.json"))? {
            for blog in &blogs {
                self.upsert_blog(blog).await?;
            }
            report.blogs = blogs.len();
        }

        info!(
            documents = report.documents,
            projects = report.projects,
            blogs = report.blogs,
            "seeded content store"
        );
        Ok(report)
    }

    pub async fn upsert_document(&self, document: &DocumentRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO documents (doc_id, title, category, tags, content)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&document.doc_id)
        .bind(&document.title)
        .bind(&document.category)
        .bind(join_tags(&document.tags))
        .bind(&document.content)
        .execute(&self.pool)
        .await
        .context("failed to upsert document")?;
        Ok(())
    }

    pub async fn upsert_project(&self, project: &ProjectSummary) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO projects
                (slug, name, short_summary, long_summary, tags,
                 github_url, demo_url, hero_image, display_order, project_type)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&project.slug)
        .bind(&project.name)
        .bind(&project.short_summary)
        .bind(&project.long_summary)
        .bind(join_tags(&project.tags))
        .bind(&project.github_url)
        .bind(&project.demo_url)
        .bind(&project.hero_image)
        .bind(project.display_order)
        .bind(project.project_type.as_deref().unwrap_or("personal"))
        .execute(&self.pool)
        .await
        .context("failed to upsert project")?;
        Ok(())
    }

    pub async fn upsert_blog(&self, blog: &BlogDetail) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO blogs
                (slug, title, excerpt, content, content_format,
                 published_at, tags, hero_image, medium_link)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&blog.slug)
        .bind(&blog.title)
        .bind(&blog.excerpt)
        .bind(&blog.content)
        .bind(content_format_str(blog.content_format))
        .bind(blog.published_at.map(|at| at.to_rfc3339()))
        .bind(join_tags(&blog.tags))
        .bind(&blog.hero_image)
        .bind(&blog.medium_link)
        .execute(&self.pool)
        .await
        .context("failed to upsert blog")?;
        Ok(())
    }

    // ---- queries -------------------------------------------------------

    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT slug, name, short_summary, long_summary, tags,
                   github_url, demo_url, hero_image, display_order, project_type
            FROM projects
            ORDER BY display_order, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list projects")?;

        rows.into_iter()
            .map(|row| {
                Ok(ProjectSummary {
                    slug: row.try_get("slug")?,
                    name: row.try_get("name")?,
                    short_summary: row.try_get("short_summary")?,
                    long_summary: row.try_get("long_summary")?,
                    tags: split_tags(&row.try_get::<String, _>("tags")?),
                    github_url: row.try_get("github_url")?,
                    demo_url: row.try_get("demo_url")?,
                    hero_image: row.try_get("hero_image")?,
                    display_order: row.try_get("display_order")?,
                    project_type: row.try_get("project_type")?,
                })
            })
            .collect()
    }

    pub async fn list_blogs(&self) -> Result<Vec<BlogSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT slug, title, excerpt, published_at, tags, hero_image, medium_link
            FROM blogs
            ORDER BY published_at IS NULL, published_at DESC, slug
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list blogs")?;

        rows.into_iter()
            .map(|row| {
                Ok(BlogSummary {
                    slug: row.try_get("slug")?,
                    title: row.try_get("title")?,
                    excerpt: row.try_get("excerpt")?,
                    published_at: parse_published_at(row.try_get("published_at")?),
                    tags: split_tags(&row.try_get::<String, _>("tags")?),
                    hero_image: row.try_get("hero_image")?,
                    medium_link: row.try_get("medium_link")?,
                })
            })
            .collect()
    }

    pub async fn blog_by_slug(&self, slug: &str) -> Result<Option<BlogDetail>> {
        let row = sqlx::query(
            r#"
            SELECT slug, title, excerpt, content, content_format,
                   published_at, tags, hero_image, medium_link
            FROM blogs
            WHERE slug = ?1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch blog by slug")?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(BlogDetail {
            slug: row.try_get("slug")?,
            title: row.try_get("title")?,
            excerpt: row.try_get("excerpt")?,
            published_at: parse_published_at(row.try_get("published_at")?),
            tags: split_tags(&row.try_get::<String, _>("tags")?),
            hero_image: row.try_get("hero_image")?,
            medium_link: row.try_get("medium_link")?,
            content_format: parse_content_format(&row.try_get::<String, _>("content_format")?),
            content: row.try_get("content")?,
        }))
    }

    pub async fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT doc_id, title, category, tags, content
            FROM documents
            ORDER BY doc_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list documents")?;

        rows.into_iter()
            .map(|row| {
                Ok(DocumentRecord {
                    doc_id: row.try_get("doc_id")?,
                    title: row.try_get("title")?,
                    category: row.try_get("category")?,
                    tags: split_tags(&row.try_get::<String, _>("tags")?),
                    content: row.try_get("content")?,
                })
            })
            .collect()
    }
}

fn join_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_published_at(raw: Option<String>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    DateTime::parse_from_rfc3339(&raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

fn content_format_str(format: ContentFormat) -> &'static str {
    match format {
        ContentFormat::Markdown => "markdown",
        ContentFormat::Html => "html",
        ContentFormat::Plaintext => "plaintext",
    }
}

fn parse_content_format(raw: &str) -> ContentFormat {
    match raw {
        "html" => ContentFormat::Html,
        "plaintext" => ContentFormat::Plaintext,
        _ => ContentFormat::Markdown,
    }
}

fn read_seed<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let entries: Vec<T> = serde_json::from_str(&raw)
        .with_context(|| format!("seed file {} must contain a JSON list", path.display()))?;
    Ok(Some(entries))
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(raw_path) = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };
    if raw_path.is_empty() || raw_path == ":memory:" {
        return Ok(());
    }
    let path = PathBuf::from(raw_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
