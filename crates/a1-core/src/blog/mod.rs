pub mod delta_html;
pub mod seo;
pub mod wordpress;

pub use delta_html::{convert, convert_json, escape_html, parse_ops};
pub use seo::{analyze, SeoAnalyzer, SeoCheck, SeoInput, SeoRating, SeoReport, SeoThresholds};
pub use wordpress::{
    PostDraft, PostStatus, PublishError, PublishedPost, WordPressClient, WordPressConfig,
};
