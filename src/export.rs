//! Markdown export of summarised articles.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::summary::SectionSummary;

/// Render a title and its section summaries as a Markdown document.
pub fn render_markdown(title: &str, summaries: &[SectionSummary]) -> String {
    let mut markdown = format!("# {title}\n\n");
    for section in summaries {
        markdown.push_str(&format!("## {}\n\n{}\n\n", section.heading, section.summary));
    }
    markdown
}

/// Suggested download name: the title with spaces replaced by underscores.
pub fn download_filename(title: &str) -> String {
    format!("{}.md", title.replace(' ', "_"))
}

/// `Content-Disposition` header value for a download of `title`.
pub fn content_disposition(title: &str) -> String {
    format!("attachment; filename=\"{}\"", download_filename(title))
}

/// Write the rendered document into `dir`, returning the file path.
///
/// Path separators in the title are replaced so the file always lands
/// directly inside `dir`.
pub fn write_markdown(dir: &Path, title: &str, summaries: &[SectionSummary]) -> io::Result<PathBuf> {
    let filename = download_filename(title).replace(['/', '\\'], "_");
    let path = dir.join(filename);
    fs::create_dir_all(dir)?;
    fs::write(&path, render_markdown(title, summaries))?;
    Ok(path)
}
