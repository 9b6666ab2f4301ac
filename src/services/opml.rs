// src/services/opml.rs

//! OPML subscription list writer.

use std::io::Cursor;
use std::path::Path;

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{AppError, Result};
use crate::models::{CategoryMap, OutputConfig, sorted_categories};
use crate::storage::write_output;

const TARGET: &str = "OPML document";

/// Renders grouped records into an OPML 2.0 document.
///
/// Categories are emitted in lexicographic order; blogs keep their order
/// within a category.
pub struct OpmlWriter {
    title: String,
    root_outline: String,
}

impl OpmlWriter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            title: config.title.clone(),
            root_outline: config.root_outline.clone(),
        }
    }

    /// Render the document with `created` as its `dateCreated`.
    pub fn render(&self, groups: &CategoryMap, created: DateTime<Utc>) -> Result<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;

        let mut opml = BytesStart::new("opml");
        opml.push_attribute(("version", "2.0"));
        emit(&mut writer, Event::Start(opml))?;

        emit(&mut writer, Event::Start(BytesStart::new("head")))?;
        text_element(&mut writer, "title", &self.title)?;
        text_element(&mut writer, "dateCreated", &created.to_rfc2822())?;
        emit(&mut writer, Event::End(BytesEnd::new("head")))?;

        emit(&mut writer, Event::Start(BytesStart::new("body")))?;

        let wrapped = !self.root_outline.is_empty();
        if wrapped {
            let mut root = BytesStart::new("outline");
            root.push_attribute(("text", self.root_outline.as_str()));
            emit(&mut writer, Event::Start(root))?;
        }

        for category in sorted_categories(groups) {
            let mut outline = BytesStart::new("outline");
            outline.push_attribute(("text", category));
            emit(&mut writer, Event::Start(outline))?;

            for record in &groups[category] {
                let mut blog = BytesStart::new("outline");
                blog.push_attribute(("type", "rss"));
                blog.push_attribute(("text", record.name.as_str()));
                blog.push_attribute(("xmlUrl", record.feed_url.as_str()));
                blog.push_attribute(("htmlUrl", record.url.as_str()));
                emit(&mut writer, Event::Empty(blog))?;
            }

            emit(&mut writer, Event::End(BytesEnd::new("outline")))?;
        }

        if wrapped {
            emit(&mut writer, Event::End(BytesEnd::new("outline")))?;
        }

        emit(&mut writer, Event::End(BytesEnd::new("body")))?;
        emit(&mut writer, Event::End(BytesEnd::new("opml")))?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| AppError::render(TARGET, e))
    }

    /// Render with the current time and overwrite `path`.
    pub async fn write(&self, groups: &CategoryMap, path: &Path) -> Result<()> {
        let document = self.render(groups, Utc::now())?;
        write_output(path, document.as_bytes()).await?;
        log::info!(
            "OPML with {} categories written to {}",
            groups.len(),
            path.display()
        );
        Ok(())
    }
}

fn emit(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| AppError::render(TARGET, e))
}

fn text_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str, text: &str) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}
