//! # Template Articles
//!
//! Renders a LinkedIn post straight from a summary record using the fixed
//! pieces in `tasks.yaml` (`write_article.article`). No model call involved.

use crate::config::ArticleTemplate;
use crate::summary::{ArticleSummary, SummaryDocument};
use std::path::Path;

/// Sections rendered, in order, when the template names a heading for them
pub const SECTION_ORDER: [&str; 4] = ["gap", "objectives", "methodology", "results"];

const TAG_LINE: &str = "🔬 #ScienceInPractice";

/// Paper title from a file name shaped like `"<authors> - <title>.pdf"`.
///
/// Falls back to the whole stem when there is no `" - "` separator.
pub fn title_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    match stem.split_once(" - ") {
        Some((_, title)) if !title.trim().is_empty() => title.trim().to_string(),
        _ => stem.trim().to_string(),
    }
}

fn section_body<'a>(summary: &'a ArticleSummary, key: &str) -> &'a str {
    match key {
        "gap" => &summary.gap,
        "objectives" => &summary.objectives,
        "methodology" => &summary.methodology,
        "results" => &summary.results,
        _ => "",
    }
}

/// Render one summary as Markdown.
pub fn render_article(summary: &ArticleSummary, template: &ArticleTemplate) -> String {
    let title = title_from_filename(&summary.filename);
    let mut content = vec![TAG_LINE.to_string()];

    if template.title.trim().is_empty() {
        content.push(format!("# {}", title));
    } else {
        content.push(format!("# {}: {}", title, template.title.trim()));
    }
    content.push("\n---\n".to_string());

    if !template.hook.trim().is_empty() {
        content.push(template.hook.trim().to_string());
        content.push(String::new());
    }

    for key in SECTION_ORDER {
        let Some(heading) = template.sections.get(key) else {
            continue;
        };
        let body = section_body(summary, key).trim();
        if body.is_empty() {
            continue;
        }
        content.push(format!("## {}", heading.trim()));
        content.push(format!("\n{}\n", body));
    }

    content.push("\n## Your turn to share! 💭".to_string());
    if !template.call_to_action.trim().is_empty() {
        content.push(format!("\n{}", template.call_to_action.trim()));
    }
    content.push("\nShare your thoughts in the comments! 👇".to_string());

    content.push("\n---\n".to_string());
    content.push(template.hashtags.trim().to_string());

    content.join("\n")
}

/// Render every record of a summary document, paired with its file name.
pub fn render_document(
    document: &SummaryDocument,
    template: &ArticleTemplate,
) -> Vec<(String, String)> {
    document
        .articles
        .iter()
        .map(|summary| (summary.filename.clone(), render_article(summary, template)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrewPrompts;
    use crate::summary::sample_summary;

    fn template() -> ArticleTemplate {
        CrewPrompts::bundled().unwrap().tasks.write_article.article
    }

    #[test]
    fn test_title_from_filename() {
        assert_eq!(
            title_from_filename("Smith 2023 - Graph Transformers for Traffic.pdf"),
            "Graph Transformers for Traffic"
        );
        assert_eq!(title_from_filename("plain-name.pdf"), "plain-name");
        assert_eq!(title_from_filename("A - B - C.pdf"), "B - C");
    }

    #[test]
    fn test_render_contains_sections_in_order() {
        let article = render_article(&sample_summary(), &template());

        assert!(article.starts_with(TAG_LINE));
        assert!(article.contains("# Graph Transformers for Traffic: what this research changes"));

        let gap = article.find("## The problem nobody had solved").unwrap();
        let objectives = article.find("## What the authors set out to do").unwrap();
        let methodology = article.find("## How they did it").unwrap();
        let results = article.find("## What they found").unwrap();
        assert!(gap < objectives && objectives < methodology && methodology < results);

        assert!(article.contains("3.60 to 3.12"));
        assert!(article.trim_end().ends_with("#Innovation"));
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let mut summary = sample_summary();
        summary.gap = "  ".to_string();
        let article = render_article(&summary, &template());
        assert!(!article.contains("## The problem nobody had solved"));
    }

    #[test]
    fn test_sections_without_heading_are_skipped() {
        let mut template = template();
        template.sections.remove("methodology");
        template.title.clear();
        let article = render_article(&sample_summary(), &template);
        assert!(!article.contains("## How they did it"));
        assert!(article.contains("# Graph Transformers for Traffic\n"));
    }

    #[test]
    fn test_render_document() {
        let document = SummaryDocument::new(vec![sample_summary(), sample_summary()]);
        let rendered = render_document(&document, &template());
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].0, "Smith 2023 - Graph Transformers for Traffic.pdf");
    }
}
