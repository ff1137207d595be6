//! Syntax Highlighting
//!
//! Turns a file on disk into styled ratatui lines. Rendering never panics:
//! unreadable, binary, or non-UTF-8 files come back as
//! [`RenderOutcome::RenderFailed`] so the UI can show a trace instead.

use std::error::Error as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;
use tracing::{debug, warn};

use super::config::SyntaxOptions;

pub const FALLBACK_THEME: &str = "base16-ocean.dark";
const INDENT_WIDTH: usize = 4;

#[derive(Error, Debug)]
pub enum RenderFailure {
    #[error("could not read {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} looks like a binary file", path.display())]
    Binary { path: PathBuf },

    #[error("{} is not valid UTF-8", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("failed to highlight {}", path.display())]
    Highlight {
        path: PathBuf,
        #[source]
        source: syntect::Error,
    },
}

impl RenderFailure {
    /// Error followed by its chain of causes, one entry per line
    pub fn trace(&self) -> Vec<String> {
        let mut lines = vec![format!("Error: {}", self)];
        let mut source = self.source();
        while let Some(cause) = source {
            lines.push(format!("Caused by: {}", cause));
            source = cause.source();
        }
        lines
    }
}

/// A highlighted file, one entry in `lines` per source line
#[derive(Debug, Clone)]
pub struct HighlightedFile {
    pub path: PathBuf,
    pub syntax_name: String,
    pub lines: Vec<Line<'static>>,
}

impl HighlightedFile {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn to_text(&self) -> Text<'static> {
        Text::from(self.lines.clone())
    }
}

#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(HighlightedFile),
    RenderFailed(RenderFailure),
}

pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    options: SyntaxOptions,
}

impl Highlighter {
    pub fn new(options: SyntaxOptions) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();

        let theme = match theme_set.themes.remove(&options.theme) {
            Some(theme) => theme,
            None => {
                warn!(
                    requested = %options.theme,
                    fallback = FALLBACK_THEME,
                    "unknown syntax theme, using fallback"
                );
                theme_set
                    .themes
                    .remove(FALLBACK_THEME)
                    .unwrap_or_default()
            }
        };

        Self {
            syntax_set,
            theme,
            options,
        }
    }

    /// Read and highlight the file at `path`
    pub fn render_file(&self, path: &Path) -> RenderOutcome {
        match self.try_render(path) {
            Ok(file) => {
                debug!(
                    path = %path.display(),
                    lines = file.line_count(),
                    syntax = %file.syntax_name,
                    "rendered file"
                );
                RenderOutcome::Rendered(file)
            }
            Err(failure) => {
                warn!(path = %path.display(), error = %failure, "could not render file");
                RenderOutcome::RenderFailed(failure)
            }
        }
    }

    fn try_render(&self, path: &Path) -> Result<HighlightedFile, RenderFailure> {
        let bytes = fs::read(path).map_err(|source| RenderFailure::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.contains(&0) {
            return Err(RenderFailure::Binary {
                path: path.to_path_buf(),
            });
        }
        let code = String::from_utf8(bytes).map_err(|source| RenderFailure::Encoding {
            path: path.to_path_buf(),
            source,
        })?;

        let syntax = self.syntax_for(path, &code);
        let lines = self
            .highlight(&code, syntax)
            .map_err(|source| RenderFailure::Highlight {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(HighlightedFile {
            path: path.to_path_buf(),
            syntax_name: syntax.name.clone(),
            lines,
        })
    }

    fn syntax_for(&self, path: &Path, code: &str) -> &SyntaxReference {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.syntax_set.find_syntax_by_extension(ext))
            .or_else(|| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| self.syntax_set.find_syntax_by_extension(name))
            })
            .or_else(|| {
                code.lines()
                    .next()
                    .and_then(|first| self.syntax_set.find_syntax_by_first_line(first))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Highlight `code` into one styled line per source line
    pub fn highlight(
        &self,
        code: &str,
        syntax: &SyntaxReference,
    ) -> Result<Vec<Line<'static>>, syntect::Error> {
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let total = LinesWithEndings::from(code).count();
        let gutter_width = total.max(1).to_string().len();
        let gutter_style = Style::default().fg(Color::DarkGray);

        let mut lines = Vec::with_capacity(total);
        for (index, line) in LinesWithEndings::from(code).enumerate() {
            let ranges = highlighter.highlight_line(line, &self.syntax_set)?;
            let mut spans: Vec<Span<'static>> = ranges
                .into_iter()
                .filter_map(|(style, text)| to_span(style, text))
                .collect();

            if self.options.indent_guides {
                spans = indent_guides(spans, gutter_style);
            }
            if self.options.line_numbers {
                spans.insert(
                    0,
                    Span::styled(format!("{:>width$} ", index + 1, width = gutter_width), gutter_style),
                );
            }
            lines.push(Line::from(spans));
        }
        Ok(lines)
    }
}

fn to_span(style: syntect::highlighting::Style, text: &str) -> Option<Span<'static>> {
    let text = text.trim_end_matches(&['\n', '\r'][..]);
    if text.is_empty() {
        return None;
    }

    let fg = style.foreground;
    let mut ratatui_style = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Some(Span::styled(text.replace('\t', "    "), ratatui_style))
}

/// Replace the first space of each indent level with a guide character
fn indent_guides(spans: Vec<Span<'static>>, guide_style: Style) -> Vec<Span<'static>> {
    let mut out = Vec::with_capacity(spans.len() + 2);
    let mut column = 0usize;
    let mut in_indent = true;

    for span in spans {
        if !in_indent {
            out.push(span);
            continue;
        }

        let mut run = String::new();
        for ch in span.content.chars() {
            if in_indent && ch == ' ' {
                if column % INDENT_WIDTH == 0 {
                    if !run.is_empty() {
                        out.push(Span::styled(std::mem::take(&mut run), span.style));
                    }
                    out.push(Span::styled("│", guide_style));
                } else {
                    run.push(ch);
                }
                column += 1;
            } else {
                in_indent = false;
                run.push(ch);
            }
        }
        if !run.is_empty() {
            out.push(Span::styled(run, span.style));
        }
    }

    out
}
