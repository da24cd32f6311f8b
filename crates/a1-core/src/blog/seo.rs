//! Focus-keyword SEO checks for blog drafts
//!
//! Mirrors the checks the editor shows next to a post: where the keyword
//! appears (title, meta description, slug, intro, subheadings), how dense it
//! is in the body, and whether the title, description and body have
//! reasonable lengths. The score is the sum of the weights of passing checks.

use html2text::render::text_renderer::TrivialDecorator;
use serde::Serialize;

/// Line width for html2text, wide so long words are never split
const TEXT_WIDTH: usize = 10_000;

#[derive(Debug, Clone, Default)]
pub struct SeoInput {
    pub title: String,
    pub meta_description: String,
    pub slug: String,
    /// Post body as HTML, usually the output of [`super::convert`]
    pub content_html: String,
    pub focus_keyword: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeoRating {
    Good,
    Ok,
    Poor,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeoCheck {
    pub id: &'static str,
    pub passed: bool,
    pub weight: u8,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeoReport {
    pub score: u8,
    pub rating: SeoRating,
    pub word_count: usize,
    /// Percentage of body words taken up by the keyword
    pub keyword_density: f64,
    pub checks: Vec<SeoCheck>,
}

impl SeoReport {
    pub fn failed(&self) -> impl Iterator<Item = &SeoCheck> {
        self.checks.iter().filter(|check| !check.passed)
    }
}

/// Length and density bounds used by the analyzer.
#[derive(Debug, Clone)]
pub struct SeoThresholds {
    pub title_chars: (usize, usize),
    pub meta_chars: (usize, usize),
    pub density_percent: (f64, f64),
    pub min_words: usize,
    pub intro_min_words: usize,
}

impl Default for SeoThresholds {
    fn default() -> Self {
        Self {
            title_chars: (30, 60),
            meta_chars: (120, 160),
            density_percent: (0.5, 2.5),
            min_words: 300,
            intro_min_words: 50,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SeoAnalyzer {
    thresholds: SeoThresholds,
}

impl SeoAnalyzer {
    pub fn new(thresholds: SeoThresholds) -> Self {
        Self { thresholds }
    }

    pub fn analyze(&self, input: &SeoInput) -> SeoReport {
        let words = words(&html_to_text(&input.content_html));
        let keyword = input.focus_keyword.trim().to_lowercase();
        let keyword_words: Vec<&str> = keyword.split_whitespace().collect();

        if keyword_words.is_empty() {
            return SeoReport {
                score: 0,
                rating: SeoRating::Poor,
                word_count: words.len(),
                keyword_density: 0.0,
                checks: vec![SeoCheck {
                    id: "keyword_set",
                    passed: false,
                    weight: 0,
                    message: "Set a focus keyword to analyze this post".to_string(),
                }],
            };
        }

        let t = &self.thresholds;
        let mut checks = Vec::with_capacity(11);
        checks.push(SeoCheck {
            id: "keyword_set",
            passed: true,
            weight: 0,
            message: format!("Focus keyword: \"{}\"", keyword),
        });

        let title = input.title.trim().to_lowercase();
        checks.push(check(
            "keyword_in_title",
            15,
            title.contains(&keyword),
            "Focus keyword appears in the title",
            "Add the focus keyword to the title",
        ));
        checks.push(check(
            "keyword_title_start",
            5,
            title.starts_with(&keyword),
            "Title starts with the focus keyword",
            "Move the focus keyword to the beginning of the title",
        ));

        let title_len = input.title.trim().chars().count();
        checks.push(check(
            "title_length",
            10,
            (t.title_chars.0..=t.title_chars.1).contains(&title_len),
            &format!("Title length is {} characters", title_len),
            &format!(
                "Title is {} characters; aim for {}-{}",
                title_len, t.title_chars.0, t.title_chars.1
            ),
        ));

        let meta = input.meta_description.trim();
        checks.push(check(
            "keyword_in_meta",
            10,
            meta.to_lowercase().contains(&keyword),
            "Meta description contains the focus keyword",
            "Add the focus keyword to the meta description",
        ));
        let meta_len = meta.chars().count();
        checks.push(check(
            "meta_length",
            10,
            (t.meta_chars.0..=t.meta_chars.1).contains(&meta_len),
            &format!("Meta description length is {} characters", meta_len),
            &format!(
                "Meta description is {} characters; aim for {}-{}",
                meta_len, t.meta_chars.0, t.meta_chars.1
            ),
        ));

        let slug_keyword = keyword_words.join("-");
        checks.push(check(
            "keyword_in_slug",
            10,
            input.slug.to_lowercase().contains(&slug_keyword),
            "Slug contains the focus keyword",
            &format!("Use \"{}\" in the slug", slug_keyword),
        ));

        let intro_window = (words.len() / 10).max(t.intro_min_words).min(words.len());
        checks.push(check(
            "keyword_in_intro",
            10,
            count_phrase(&words[..intro_window], &keyword_words) > 0,
            "Focus keyword appears in the introduction",
            "Use the focus keyword near the start of the post",
        ));

        let occurrences = count_phrase(&words, &keyword_words);
        let density = if words.is_empty() {
            0.0
        } else {
            (occurrences * keyword_words.len()) as f64 / words.len() as f64 * 100.0
        };
        checks.push(check(
            "keyword_density",
            15,
            density >= t.density_percent.0 && density <= t.density_percent.1,
            &format!("Keyword density is {:.1}%", density),
            &format!(
                "Keyword density is {:.1}% ({} uses); aim for {}-{}%",
                density, occurrences, t.density_percent.0, t.density_percent.1
            ),
        ));

        checks.push(check(
            "content_length",
            10,
            words.len() >= t.min_words,
            &format!("Post has {} words", words.len()),
            &format!(
                "Post has {} words; write at least {}",
                words.len(),
                t.min_words
            ),
        ));

        let in_subheading = subheadings(&input.content_html)
            .iter()
            .any(|heading| count_phrase(&words_of(heading), &keyword_words) > 0);
        checks.push(check(
            "keyword_in_subheading",
            5,
            in_subheading,
            "Focus keyword appears in a subheading",
            "Use the focus keyword in at least one subheading",
        ));

        let score: u8 = checks
            .iter()
            .filter(|c| c.passed)
            .map(|c| c.weight)
            .sum();
        let rating = match score {
            80..=u8::MAX => SeoRating::Good,
            50..=79 => SeoRating::Ok,
            _ => SeoRating::Poor,
        };

        SeoReport {
            score,
            rating,
            word_count: words.len(),
            keyword_density: density,
            checks,
        }
    }
}

/// Analyze with the default thresholds.
pub fn analyze(input: &SeoInput) -> SeoReport {
    SeoAnalyzer::default().analyze(input)
}

fn check(id: &'static str, weight: u8, passed: bool, ok: &str, fix: &str) -> SeoCheck {
    SeoCheck {
        id,
        passed,
        weight,
        message: if passed { ok.to_string() } else { fix.to_string() },
    }
}

/// Plain text of an HTML fragment, entities decoded and no markup markers.
pub fn html_to_text(html: &str) -> String {
    html2text::from_read_with_decorator(html.as_bytes(), TEXT_WIDTH, TrivialDecorator::new())
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn words_of(html: &str) -> Vec<String> {
    words(&html_to_text(html))
}

fn count_phrase(words: &[String], phrase: &[&str]) -> usize {
    if phrase.is_empty() || words.len() < phrase.len() {
        return 0;
    }
    let phrase: Vec<String> = phrase
        .iter()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .collect();
    words
        .windows(phrase.len())
        .filter(|window| window.iter().zip(&phrase).all(|(a, b)| a == b))
        .count()
}

/// Inner HTML of every `<h2>`..`<h6>` element.
fn subheadings(html: &str) -> Vec<String> {
    let lower = html.to_ascii_lowercase();
    let mut headings = Vec::new();
    let mut pos = 0;

    while let Some(offset) = lower[pos..].find("<h") {
        let start = pos + offset;
        pos = start + 2;
        let level = lower.as_bytes().get(start + 2).copied();
        let after = lower.as_bytes().get(start + 3).copied();
        if !matches!(level, Some(b'2'..=b'6')) || !matches!(after, Some(b'>') | Some(b' ')) {
            continue;
        }
        let Some(open_end) = lower[start..].find('>').map(|i| start + i + 1) else {
            break;
        };
        let Some(close) = lower[open_end..].find("</h").map(|i| open_end + i) else {
            break;
        };
        headings.push(html[open_end..close].to_string());
        pos = close;
    }

    headings
}
