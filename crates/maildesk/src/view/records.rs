//! Email records page: filters, bulk actions and the paginated table.

use iced::widget::{Column, Row, Space, button, column, container, row, scrollable, text, text_input};
use iced::{Alignment, Element, Length, Padding};

use maildesk_core::dates::format_datetime;
use maildesk_core::{CheckState, DeliveryStatus, EmailRecord};

use crate::message::{Message, RecordsMessage};
use crate::model::RecordsState;
use crate::model::records::columns;
use crate::style::widgets::{
    danger_button_style, input_style, invalid_input_style, palette, primary_button_style,
    record_row_style, row_button_style, scrollable_style, secondary_button_style,
    status_chip_style, toolbar_style,
};
use crate::view::components::{
    MONOSPACE, card, check_box, empty_state, error_banner, label, muted, page_title, status_badge,
};
use crate::view::table::{CHECK_WIDTH, header_row, horizontal, pagination_bar};

fn records(message: RecordsMessage) -> Message {
    Message::Records(message)
}

/// Renders the records page.
pub fn view_records(state: &RecordsState) -> Element<'_, Message> {
    let mut content = Column::new()
        .spacing(12)
        .push(page_title("Email Records", "Every send attempt, newest first"))
        .push(view_filters(state));

    if let Some(error) = &state.error {
        content = content.push(error_banner(error));
    }
    if !state.table.selection.is_empty() {
        content = content.push(view_bulk_bar(state));
    }

    let header = header_row(
        &state.table.columns,
        &state.table.sort,
        state.header_state(),
        records(RecordsMessage::ToggleAll),
        |key| records(RecordsMessage::SortBy(key)),
    );

    let body: Element<'_, Message> = if state.records.is_empty() {
        if state.is_loading {
            empty_state("Loading records\u{2026}")
        } else if state.query.is_filtered() {
            empty_state("No records match the current filters")
        } else {
            empty_state("No records yet")
        }
    } else {
        scrollable(
            Column::with_children(state.records.iter().map(|record| view_row(state, record)))
                .spacing(1),
        )
        .height(Length::Fill)
        .style(scrollable_style)
        .into()
    };

    content
        .push(card(column![header, body].spacing(0)))
        .push(pagination_bar(
            &state.table.pagination,
            |page| records(RecordsMessage::GoToPage(page)),
            |size| records(RecordsMessage::PageSize(size)),
        ))
        .height(Length::Fill)
        .into()
}

fn view_filters(state: &RecordsState) -> Element<'_, Message> {
    let mut chips = Row::new().spacing(6).align_y(Alignment::Center).push(chip(
        "All",
        state.query.status.is_none(),
        None,
    ));
    for status in DeliveryStatus::ALL {
        chips = chips.push(chip(
            status.label(),
            state.query.status == Some(status),
            Some(status),
        ));
    }

    let date_style = if state.date_error.is_some() {
        invalid_input_style
    } else {
        input_style
    };

    let search = text_input("Search recipient, subject or file\u{2026}", &state.search_input)
        .on_input(|s| records(RecordsMessage::SearchChanged(s)))
        .padding([6, 10])
        .size(13)
        .width(Length::Fill)
        .style(input_style);

    let from = text_input("From (YYYY-MM-DD)", &state.from_input)
        .on_input(|s| records(RecordsMessage::FromChanged(s)))
        .on_submit(records(RecordsMessage::ApplyDates))
        .padding([6, 10])
        .size(13)
        .width(Length::Fixed(150.0))
        .style(date_style);

    let to = text_input("To (YYYY-MM-DD)", &state.to_input)
        .on_input(|s| records(RecordsMessage::ToChanged(s)))
        .on_submit(records(RecordsMessage::ApplyDates))
        .padding([6, 10])
        .size(13)
        .width(Length::Fixed(150.0))
        .style(date_style);

    let inputs = row![
        search,
        from,
        to,
        button(text("Apply").size(13))
            .padding([6, 14])
            .style(primary_button_style)
            .on_press(records(RecordsMessage::ApplyDates)),
        button(text("Clear").size(13))
            .padding([6, 14])
            .style(secondary_button_style)
            .on_press(records(RecordsMessage::ClearFilters)),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let mut filters = column![chips, inputs].spacing(8);
    if let Some(error) = &state.date_error {
        filters = filters.push(text(error.as_str()).size(12).style(|_theme| text::Style {
            color: Some(palette::current().danger),
        }));
    }
    filters.into()
}

fn chip(title: &'static str, active: bool, status: Option<DeliveryStatus>) -> Element<'static, Message> {
    button(text(title).size(12))
        .padding([4, 12])
        .style(status_chip_style(status, active))
        .on_press(records(RecordsMessage::StatusFilter(status)))
        .into()
}

fn view_bulk_bar(state: &RecordsState) -> Element<'_, Message> {
    let count = state.table.selection.len();
    let noun = if count == 1 { "record" } else { "records" };

    let actions: Row<'_, Message> = if state.confirm_delete {
        row![
            text(format!("Delete {count} {noun}? This cannot be undone."))
                .size(13)
                .style(|_theme| text::Style {
                    color: Some(palette::current().danger),
                }),
            Space::new().width(Length::Fill),
            button(text("Delete").size(13))
                .padding([6, 14])
                .style(danger_button_style)
                .on_press(records(RecordsMessage::ConfirmDelete)),
            button(text("Cancel").size(13))
                .padding([6, 14])
                .style(secondary_button_style)
                .on_press(records(RecordsMessage::CancelDelete)),
        ]
    } else {
        row![
            label(format!("{count} {noun} selected"), 13),
            Space::new().width(Length::Fill),
            button(text("\u{21BB} Resend").size(13))
                .padding([6, 14])
                .style(primary_button_style)
                .on_press(records(RecordsMessage::ResendSelected)),
            button(text("Delete").size(13))
                .padding([6, 14])
                .style(danger_button_style)
                .on_press(records(RecordsMessage::DeleteSelected)),
            button(text("Clear selection").size(13))
                .padding([6, 14])
                .style(secondary_button_style)
                .on_press(records(RecordsMessage::ClearSelection)),
        ]
    };

    container(actions.spacing(8).align_y(Alignment::Center))
        .padding([8, 12])
        .width(Length::Fill)
        .style(toolbar_style)
        .into()
}

fn view_row<'a>(state: &'a RecordsState, record: &'a EmailRecord) -> Element<'a, Message> {
    let selected = state.table.selection.contains(&record.id);
    let expanded = state.expanded == Some(record.id);

    let mut cells = Row::new().spacing(8).align_y(Alignment::Center).push(
        container(check_box(
            if selected {
                CheckState::Checked
            } else {
                CheckState::Unchecked
            },
            records(RecordsMessage::ToggleRow(record.id)),
        ))
        .width(Length::Fixed(CHECK_WIDTH)),
    );

    for column in &state.table.columns {
        let cell: Element<'a, Message> = match column.key {
            columns::RECIPIENT => label(record.recipient.as_str(), 13).into(),
            columns::SUBJECT => muted(record.subject.as_str(), 13).into(),
            columns::STATUS => status_badge(record.status),
            columns::FILE => view_file(record),
            columns::CREATED => muted(format_datetime(&record.created_at), 12).into(),
            columns::RETRIES => muted(record.retry_count.to_string(), 12).into(),
            _ => Space::new().width(0).into(),
        };
        cells = cells.push(
            container(cell)
                .width(Length::FillPortion(column.width))
                .align_x(horizontal(column.align)),
        );
    }

    let has_details =
        record.error_message.is_some() || record.sent_at.is_some() || record.is_drive_upload();
    let summary: Element<'a, Message> = if has_details {
        button(cells)
            .padding(0)
            .width(Length::Fill)
            .style(row_button_style)
            .on_press(records(RecordsMessage::ToggleDetails(record.id)))
            .into()
    } else {
        cells.into()
    };

    let mut body = Column::new().spacing(6).push(summary);
    if expanded {
        body = body.push(view_details(record));
    }

    container(body)
        .padding([8, 12])
        .width(Length::Fill)
        .style(record_row_style(record.status, selected))
        .into()
}

fn view_file(record: &EmailRecord) -> Element<'_, Message> {
    let name = record.file_name.as_deref().unwrap_or("\u{2014}");
    match &record.file_url {
        Some(url) => button(
            text(format!("\u{2197} {name}"))
                .size(12)
                .style(|_theme| text::Style {
                    color: Some(palette::current().info),
                }),
        )
        .padding(0)
        .style(row_button_style)
        .on_press(Message::OpenLink(url.clone()))
        .into(),
        None => muted(name, 12).into(),
    }
}

fn view_details(record: &EmailRecord) -> Element<'_, Message> {
    let mut details = Column::new().spacing(4).padding(Padding {
        left: CHECK_WIDTH,
        ..Padding::ZERO
    });
    if let Some(sent_at) = &record.sent_at {
        details = details.push(muted(format!("Sent {}", format_datetime(sent_at)), 12));
    }
    if record.is_drive_upload() {
        details = details.push(muted("Attachment shared through Google Drive", 12));
    }
    if let Some(error) = &record.error_message {
        details = details.push(
            text(error.as_str())
                .size(12)
                .font(MONOSPACE)
                .style(|_theme| text::Style {
                    color: Some(palette::current().danger),
                }),
        );
    }
    details.into()
}
