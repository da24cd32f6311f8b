use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use a1_core::blog::{
    analyze, convert_json, PostDraft, PostStatus, PublishedPost, SeoInput, WordPressClient,
};
use a1_core::A1Config;

/// Read a post body. `.json` files are editor op logs and get converted,
/// anything else is taken as HTML.
fn load_html(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let is_ops = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_ops {
        convert_json(&content)
            .with_context(|| format!("Failed to parse editor ops in {}", path.display()))
    } else {
        Ok(content)
    }
}

pub fn run_render(path: &Path) -> Result<String> {
    load_html(path)
}

pub struct SeoArgs {
    pub input: PathBuf,
    pub keyword: String,
    pub title: String,
    pub meta: String,
    pub slug: String,
    pub json: bool,
}

pub fn run_seo(args: &SeoArgs) -> Result<String> {
    let input = SeoInput {
        title: args.title.clone(),
        meta_description: args.meta.clone(),
        slug: args.slug.clone(),
        content_html: load_html(&args.input)?,
        focus_keyword: args.keyword.clone(),
    };
    let report = analyze(&input);

    if args.json {
        return serde_json::to_string_pretty(&report).context("Failed to serialize SEO report");
    }

    let mut out = format!(
        "SEO score: {}/100 ({:?})\nWords: {}  Keyword density: {:.1}%\n",
        report.score, report.rating, report.word_count, report.keyword_density
    );
    for check in &report.checks {
        let mark = if check.passed { "ok " } else { "fix" };
        out.push_str(&format!("  [{}] {}\n", mark, check.message));
    }
    Ok(out)
}

pub struct PublishArgs {
    pub input: PathBuf,
    pub title: String,
    pub status: PostStatus,
    pub post_id: Option<u64>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
}

pub async fn run_publish(config: &A1Config, args: &PublishArgs) -> Result<PublishedPost> {
    let wordpress = config
        .wordpress
        .clone()
        .context("No \"wordpress\" section in the config file")?;

    let draft = PostDraft {
        title: args.title.clone(),
        content: load_html(&args.input)?,
        status: args.status,
        excerpt: args.excerpt.clone(),
        slug: args.slug.clone(),
    };

    let client = WordPressClient::new(wordpress).context("Failed to build HTTP client")?;
    let post = match args.post_id {
        Some(id) => client.update_post(id, &draft).await,
        None => client.create_post(&draft).await,
    }
    .context("Failed to publish post")?;
    Ok(post)
}
