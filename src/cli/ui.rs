//! Widget builders for the browser layout.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::{AnswerState, ContentView};
use super::commands::Action;
use super::editor::PromptEditor;
use super::file_browser::DirectoryTree;

const TITLE: &str = "tool-browser";

fn pane(title: String, focused: bool) -> Block<'static> {
    let color = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

pub fn header(sub_title: &str, is_error: bool) -> Paragraph<'static> {
    let sub_style = if is_error {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut spans = vec![Span::styled(
        TITLE,
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];
    if !sub_title.is_empty() {
        spans.push(Span::raw(" - "));
        spans.push(Span::styled(sub_title.to_string(), sub_style));
    }
    Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Blue))
}

pub fn tree_list(tree: &DirectoryTree, focused: bool) -> (List<'static>, ListState) {
    let items: Vec<ListItem> = tree
        .nodes()
        .iter()
        .map(|node| {
            let style = if node.entry.is_directory {
                Style::default().fg(Color::LightBlue)
            } else if node.entry.is_hidden {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(node.label(), style)))
        })
        .collect();

    let mut title = tree.root().display().to_string();
    if !tree.show_hidden() {
        title.push_str(" (hidden files off)");
    }
    let list = List::new(items)
        .block(pane(title, focused))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    let state = ListState::default().with_selected(tree.selected_index());
    (list, state)
}

pub fn content_view(
    content: &ContentView,
    scroll: (u16, u16),
    word_wrap: bool,
    focused: bool,
) -> Paragraph<'static> {
    let (title, text) = match content {
        ContentView::Empty => (
            "Content".to_string(),
            Text::styled(
                "Select a file in the tree to view it.",
                Style::default().fg(Color::DarkGray),
            ),
        ),
        ContentView::File(file) => (
            format!("{} ({})", file.path.display(), file.syntax_name),
            file.to_text(),
        ),
        ContentView::Failed { path, trace } => {
            let lines: Vec<Line> = trace
                .iter()
                .map(|line| Line::from(Span::styled(line.clone(), Style::default().fg(Color::Red))))
                .collect();
            (format!("Traceback - {}", path.display()), Text::from(lines))
        }
    };

    let paragraph = Paragraph::new(text)
        .block(pane(title, focused))
        .scroll(scroll);
    if word_wrap {
        paragraph.wrap(Wrap { trim: false })
    } else {
        paragraph
    }
}

pub fn prompt_box(editor: &PromptEditor, composing: bool) -> Paragraph<'static> {
    let title = if composing {
        "Prompt (enter to send, esc to leave)"
    } else {
        "Prompt (a to edit)"
    };
    let style = if editor.is_empty() && !composing {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    Paragraph::new(Line::from(Span::styled(editor.text().to_string(), style)))
        .block(pane(title.to_string(), composing))
}

pub fn answer_view(answer: &AnswerState) -> Paragraph<'static> {
    let (title, text) = match answer {
        AnswerState::Idle => ("Answer", Text::raw("")),
        AnswerState::Pending => (
            "Answer",
            Text::styled("Waiting for the model...", Style::default().fg(Color::Yellow)),
        ),
        AnswerState::Answered(answer) => ("Answer", Text::raw(answer.clone())),
        AnswerState::Failed(message) => (
            "Answer - ERROR",
            Text::styled(message.clone(), Style::default().fg(Color::Red)),
        ),
    };
    Paragraph::new(text)
        .block(pane(title.to_string(), false))
        .wrap(Wrap { trim: true })
}

pub fn footer() -> Paragraph<'static> {
    let mut spans = Vec::new();
    for action in Action::footer() {
        spans.push(Span::styled(
            format!(" {} ", action.key_hint()),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
        spans.push(Span::raw(format!(" {}  ", action.description())));
    }
    Paragraph::new(Line::from(spans))
}
