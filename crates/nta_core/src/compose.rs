use crate::types::Article;

pub const NO_NEWS: &str = "No news articles available at the moment.";
pub const PREAMBLE: &str = "Today's top news headlines. ";
pub const CLOSING: &str = "That's all for today's news update.";

pub const NO_TITLE: &str = "No title";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_SOURCE: &str = "No source available";

fn field_or<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    match value.as_deref() {
        Some(text) if !text.trim().is_empty() => text,
        _ => placeholder,
    }
}

/// Builds the narration script read out by the speech provider.
///
/// Articles are narrated in input order with a 1-based index. The output is not
/// truncated, so very long inputs may exceed what the provider accepts.
pub fn compose_narration(articles: &[Article]) -> String {
    if articles.is_empty() {
        return NO_NEWS.to_string();
    }

    let mut text = String::from(PREAMBLE);
    for (i, article) in articles.iter().enumerate() {
        text.push_str(&format!(
            "News {}. From {}. {}. {}. ",
            i + 1,
            field_or(&article.source_name, NO_SOURCE),
            field_or(&article.title, NO_TITLE),
            field_or(&article.description, NO_DESCRIPTION),
        ));
    }
    text.push_str(CLOSING);
    text
}
