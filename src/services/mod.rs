//! Service layer for feedfinder.
//!
//! This module contains the business logic for:
//! - Blog discovery from the root page (`BlogDirectory`)
//! - Feed URL and category extraction (`FeedEnricher`)
//! - OPML output (`OpmlWriter`)
//! - README output (`ReadmeWriter`)

mod directory;
mod enricher;
mod opml;
mod readme;

pub use directory::BlogDirectory;
pub use enricher::FeedEnricher;
pub use opml::OpmlWriter;
pub use readme::ReadmeWriter;
