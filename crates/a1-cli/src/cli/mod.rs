pub mod blog;
pub mod watch;

pub use blog::{run_publish, run_render, run_seo, PublishArgs, SeoArgs};
pub use watch::{run_watch, LoggingClickHandler};
