//! Log viewer page.

use iced::widget::{
    Column, Row, Space, button, column, container, pick_list, row, scrollable, text, text_input,
    toggler,
};
use iced::{Alignment, Element, Length};

use maildesk_core::dates::format_datetime;
use maildesk_core::{LogEntry, LogLevel};

use crate::message::{LogsMessage, Message};
use crate::model::LogsState;
use crate::model::logs::{MAX_RENDERED, TAIL_SIZES};
use crate::style::widgets::{
    input_style, level_chip_style, log_entry_style, palette, row_button_style, scrollable_style,
    secondary_button_style, sunken_style,
};
use crate::view::components::{
    MONOSPACE, card, empty_state, error_banner, label, level_badge, muted, page_title,
};

fn logs(message: LogsMessage) -> Message {
    Message::Logs(message)
}

/// Renders the log viewer.
pub fn view_logs(state: &LogsState) -> Element<'_, Message> {
    let mut content = Column::new()
        .spacing(12)
        .push(page_title("Logs", "Sender log, newest entries first"))
        .push(view_toolbar(state));

    if let Some(error) = &state.error {
        content = content.push(error_banner(error));
    }

    let visible = state.visible();
    let summary = match (state.stats.first, state.stats.last) {
        (Some(first), Some(last)) => format!(
            "Showing {} of {} entries \u{00B7} {} to {}",
            visible.len(),
            state.stats.total,
            format_datetime(&first),
            format_datetime(&last),
        ),
        _ => format!("Showing {} of {} entries", visible.len(), state.stats.total),
    };
    content = content.push(muted(summary, 12));

    let body: Element<'_, Message> = if visible.is_empty() {
        if state.is_loading {
            empty_state("Loading logs\u{2026}")
        } else if state.entries.is_empty() {
            empty_state("The log is empty")
        } else {
            empty_state("No entries match the current filters")
        }
    } else {
        let hidden = visible.len().saturating_sub(MAX_RENDERED);
        let mut list = Column::with_children(
            visible
                .into_iter()
                .take(MAX_RENDERED)
                .map(|entry| view_entry(entry, state.expanded.contains(&entry.line_number))),
        )
        .spacing(1);
        if hidden > 0 {
            list = list.push(
                container(muted(
                    format!("{hidden} older entries not shown; narrow the filters to see them"),
                    12,
                ))
                .padding(12),
            );
        }
        scrollable(list)
            .height(Length::Fill)
            .style(scrollable_style)
            .into()
    };

    content.push(card(body)).height(Length::Fill).into()
}

fn view_toolbar(state: &LogsState) -> Element<'_, Message> {
    let chips = Row::with_children(LogLevel::STANDARD.into_iter().map(|level| {
        let active = state.is_level_active(&level);
        let title = format!("{} ({})", level.label(), state.stats.count(&level));
        button(text(title).size(12))
            .padding([4, 12])
            .style(level_chip_style(level.clone(), active))
            .on_press(logs(LogsMessage::ToggleLevel(level)))
            .into()
    }))
    .spacing(6)
    .align_y(Alignment::Center);

    let search = text_input("Search messages\u{2026}", &state.search_input)
        .on_input(|s| logs(LogsMessage::SearchChanged(s)))
        .padding([6, 10])
        .size(13)
        .width(Length::FillPortion(3))
        .style(input_style);

    let fields = text_input("Fields, e.g. recipient=a@example.com", &state.field_input)
        .on_input(|s| logs(LogsMessage::FieldChanged(s)))
        .padding([6, 10])
        .size(13)
        .width(Length::FillPortion(2))
        .style(input_style);

    let selected = TAIL_SIZES
        .contains(&state.tail_lines)
        .then_some(state.tail_lines);

    let controls = row![
        search,
        fields,
        button(text("Clear").size(13))
            .padding([6, 14])
            .style(secondary_button_style)
            .on_press(logs(LogsMessage::ClearFilters)),
        Space::new().width(8),
        muted("Tail", 12),
        pick_list(TAIL_SIZES, selected, |size| logs(LogsMessage::TailSize(size)))
            .text_size(12)
            .padding([4, 8]),
        toggler(state.auto_refresh)
            .label("Auto-refresh")
            .text_size(12)
            .on_toggle(|on| logs(LogsMessage::AutoRefresh(on))),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    column![chips, controls].spacing(8).into()
}

fn view_entry(entry: &LogEntry, expanded: bool) -> Element<'_, Message> {
    let timestamp = entry
        .timestamp
        .map_or_else(|| entry.raw_timestamp.clone(), |at| format_datetime(&at));

    let mut line = row![
        container(muted(timestamp, 12).font(MONOSPACE)).width(Length::Fixed(150.0)),
        container(level_badge(&entry.level)).width(Length::Fixed(90.0)),
        label(entry.message.as_str(), 13).width(Length::Fill),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    if let Some(recipient) = entry.recipient() {
        line = line.push(muted(recipient, 12));
    }
    if !entry.continuation.is_empty() {
        line = line.push(muted(format!("+{} lines", entry.continuation.len()), 11));
    }

    let header = button(line)
        .padding(0)
        .width(Length::Fill)
        .style(row_button_style)
        .on_press(logs(LogsMessage::ToggleEntry(entry.line_number)));

    let mut body = Column::new().spacing(6).push(header);
    if expanded {
        body = body.push(view_entry_details(entry));
    }

    container(body)
        .padding([6, 12])
        .width(Length::Fill)
        .style(log_entry_style(entry.level.clone(), expanded))
        .into()
}

fn view_entry_details(entry: &LogEntry) -> Element<'_, Message> {
    let mut details = Column::new()
        .spacing(4)
        .push(muted(format!("Line {}", entry.line_number), 11));

    match entry.pretty_payload() {
        Some(payload) => details = details.push(code(payload)),
        None => details = details.push(code(entry.raw.clone())),
    }
    if !entry.continuation.is_empty() {
        details = details.push(code(entry.continuation.join("\n")));
    }

    details.into()
}

fn code(content: String) -> Element<'static, Message> {
    container(text(content).size(12).font(MONOSPACE).style(|_theme| text::Style {
        color: Some(palette::current().ink),
    }))
    .padding(10)
    .width(Length::Fill)
    .style(sunken_style)
    .into()
}
