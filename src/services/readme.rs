// src/services/readme.rs

//! README index writer.
//!
//! The template is plain Markdown with `{placeholder}` markers:
//! `{title}`, `{generated}`, `{blog_count}`, `{category_count}` and
//! `{categories}`.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{CategoryMap, Config, sorted_categories};
use crate::storage::write_output;

/// Renders the grouped records into a Markdown index.
pub struct ReadmeWriter {
    title: String,
    uncategorized_label: String,
}

impl ReadmeWriter {
    pub fn new(config: &Config) -> Self {
        Self {
            title: config.output.title.clone(),
            uncategorized_label: config.readme.uncategorized_label.clone(),
        }
    }

    /// Fill `template` with the grouped records.
    pub fn render(&self, template: &str, groups: &CategoryMap, generated: DateTime<Utc>) -> String {
        let blog_count: usize = groups.values().map(Vec::len).sum();

        template
            .replace("{title}", &self.title)
            .replace("{generated}", &generated.to_rfc2822())
            .replace("{blog_count}", &blog_count.to_string())
            .replace("{category_count}", &groups.len().to_string())
            .replace("{categories}", &self.categories_section(groups))
    }

    /// Read the template at `template_path` and write the result to `path`.
    pub async fn write(
        &self,
        groups: &CategoryMap,
        template_path: &Path,
        path: &Path,
    ) -> Result<()> {
        let template = tokio::fs::read_to_string(template_path)
            .await
            .map_err(|e| AppError::render(template_path.display().to_string(), e))?;

        let content = self.render(&template, groups, Utc::now());
        write_output(path, content.as_bytes()).await?;
        log::info!("README written to {}", path.display());
        Ok(())
    }

    fn categories_section(&self, groups: &CategoryMap) -> String {
        let mut out = String::new();

        for category in sorted_categories(groups) {
            let heading = if category.is_empty() {
                self.uncategorized_label.as_str()
            } else {
                category
            };
            out.push_str(&format!("## {heading}\n\n"));

            for record in &groups[category] {
                if record.feed_url.is_empty() {
                    out.push_str(&format!("- [{}]({})\n", record.name, record.url));
                } else {
                    out.push_str(&format!(
                        "- [{}]({}) ([feed]({}))\n",
                        record.name, record.url, record.feed_url
                    ));
                }
            }
            out.push('\n');
        }

        out.trim_end().to_string()
    }
}
