//! Plain-text renderer
//!
//! Turns view state into lines of text. Used by the `list` command of the
//! binary and by tests; richer front ends consume the view state directly.

use super::{
    chrome::{Landing, NavLink, PageHeader, APP_NAME, NAV_LINKS},
    dialog::{Dialog, Field},
    list_view::{Card, ListState, ListView},
    loading::{skeleton_cards, SkeletonCard},
};

/// Inner width of a card or dialog box
pub const BOX_WIDTH: usize = 48;

const SKELETON_CHAR: char = '░';

/// Render the whole prompts page: chrome, body and any open dialog
pub fn render_page(view: &ListView) -> String {
    let mut lines = Vec::new();

    lines.extend(render_app_header());
    lines.push(String::new());
    lines.push(PageHeader::TITLE.to_string());
    lines.push(PageHeader::SUBTITLE.to_string());
    lines.push(String::new());

    match view.state() {
        ListState::Loading => {
            for card in skeleton_cards() {
                lines.extend(render_skeleton(&card));
            }
        },
        ListState::Loaded(_) => {
            let cards = view.cards();
            if cards.is_empty() {
                lines.push("No prompts yet.".to_string());
            }
            for card in &cards {
                lines.extend(render_card(card));
            }
        },
        ListState::Failed(message) => {
            lines.push(format!("Error: {}", message));
            lines.push("[ Retry ]".to_string());
        },
    }

    if let Some(dialog) = view.dialog() {
        if dialog.state().is_open() {
            lines.push(String::new());
            lines.extend(render_dialog(dialog));
        }
    }

    lines.join("\n")
}

/// Render the landing page: chrome, tagline and the call to action
pub fn render_landing() -> String {
    let mut lines = render_app_header();
    lines.push(String::new());
    lines.push(Landing::TITLE.to_string());
    lines.extend(wrap(Landing::TAGLINE, BOX_WIDTH));
    lines.push(String::new());
    lines.push(format!("[ {} ]", render_link(&Landing::CALL_TO_ACTION)));
    lines.join("\n")
}

pub fn render_app_header() -> Vec<String> {
    let nav = NAV_LINKS
        .iter()
        .map(render_link)
        .collect::<Vec<_>>()
        .join("  ");
    vec![format!("{}    {}", APP_NAME, nav)]
}

fn render_link(link: &NavLink) -> String {
    format!("{} <{}>", link.label, link.href)
}

pub fn render_card(card: &Card<'_>) -> Vec<String> {
    let mut lines = vec![border_top()];
    lines.push(boxed(&format!("#{} {}", card.key, card.title)));
    lines.push(boxed(card.description));
    lines.push(boxed(""));
    for chunk in wrap(card.content, BOX_WIDTH) {
        lines.push(boxed(&chunk));
    }
    lines.push(border_bottom());
    lines
}

pub fn render_skeleton(card: &SkeletonCard) -> Vec<String> {
    let bar = |width: usize| SKELETON_CHAR.to_string().repeat(width);

    let mut lines = vec![border_top()];
    lines.push(boxed(&bar(card.title.width(BOX_WIDTH))));
    lines.push(boxed(&bar(card.description.width(BOX_WIDTH))));
    lines.push(boxed(""));
    for line in &card.lines {
        lines.push(boxed(&bar(line.width(BOX_WIDTH))));
    }
    lines.push(border_bottom());
    lines
}

pub fn render_dialog(dialog: &Dialog) -> Vec<String> {
    let state = dialog.state();
    let kind = state.kind;

    let mut lines = vec![border_top()];
    lines.push(boxed(kind.title()));
    for chunk in wrap(&kind.description(state.target.as_ref()), BOX_WIDTH) {
        lines.push(boxed(&chunk));
    }
    lines.push(boxed(""));

    if kind.has_form() {
        for field in Field::ALL {
            let value = state.fields.get(field);
            let shown = if value.is_empty() {
                format!("({})", field.placeholder())
            } else {
                value.to_string()
            };
            lines.push(boxed(&format!("{}: {}", field.label(), shown)));
        }
        lines.push(boxed(""));
    }

    if let Some(error) = &state.error {
        lines.push(boxed(&format!("! {}", error)));
    }

    let submit = if state.is_submitting() {
        kind.busy_label()
    } else {
        kind.submit_label()
    };
    let disabled = if state.can_submit() { "" } else { " (disabled)" };
    lines.push(boxed(&format!("[ Cancel ]  [ {} ]{}", submit, disabled)));
    lines.push(border_bottom());
    lines
}

fn border_top() -> String {
    format!("┌{}┐", "─".repeat(BOX_WIDTH + 2))
}

fn border_bottom() -> String {
    format!("└{}┘", "─".repeat(BOX_WIDTH + 2))
}

fn boxed(text: &str) -> String {
    let clipped: String = text.chars().take(BOX_WIDTH).collect();
    let pad = BOX_WIDTH - clipped.chars().count();
    format!("│ {}{} │", clipped, " ".repeat(pad))
}

/// Greedy word wrap on character counts
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
