//! Dashboard page: status cards and the latest failures.

use iced::widget::{Column, Row, Space, button, column, container, row, scrollable, text};
use iced::{Alignment, Color, Element, Length};

use maildesk_core::dates::format_datetime;
use maildesk_core::{DeliveryStatus, EmailRecord, StatusSummary};

use crate::message::{Message, View};
use crate::model::DashboardState;
use crate::style::widgets::{palette, row_button_style, scrollable_style, secondary_button_style};
use crate::view::components::{
    BOLD, card, empty_state, error_banner, label, muted, page_title, section_title, status_badge,
};

/// Renders the dashboard.
pub fn view_dashboard(state: &DashboardState) -> Element<'_, Message> {
    let mut content = Column::new()
        .spacing(16)
        .push(page_title("Dashboard", "Delivery status at a glance"));

    if let Some(error) = &state.error {
        content = content.push(error_banner(error));
    }

    match state.summary {
        Some(summary) => {
            content = content
                .push(view_cards(summary))
                .push(view_failures(&state.recent_failures));
        }
        None if state.is_loading => content = content.push(empty_state("Loading summary\u{2026}")),
        None => content = content.push(empty_state("No data yet")),
    }

    scrollable(content.width(Length::Fill))
        .height(Length::Fill)
        .style(scrollable_style)
        .into()
}

fn stat_card(title: &'static str, value: String, detail: String, accent: Color) -> Element<'static, Message> {
    card(
        column![
            section_title(title),
            text(value).size(28).font(BOLD).color(accent),
            muted(detail, 12),
        ]
        .spacing(6),
    )
}

fn view_cards(summary: StatusSummary) -> Element<'static, Message> {
    let p = palette::current();
    let share = |count: u64| {
        if summary.total == 0 {
            "0% of total".to_string()
        } else {
            #[allow(clippy::cast_precision_loss)]
            let pct = count as f64 / summary.total as f64 * 100.0;
            format!("{pct:.1}% of total")
        }
    };

    let headline = Row::new()
        .spacing(16)
        .push(stat_card(
            "Total emails",
            summary.total.to_string(),
            format!("{} pending", summary.pending),
            p.ink,
        ))
        .push(stat_card(
            "Success rate",
            format!("{:.1}%", summary.success_rate() * 100.0),
            format!("{} delivered", summary.delivered),
            p.success,
        ))
        .push(stat_card(
            "Failures",
            summary.failures().to_string(),
            share(summary.failures()),
            p.danger,
        ));

    let by_status = Row::with_children(DeliveryStatus::ALL.iter().map(|&status| {
        let count = summary.count(status);
        let body = column![
            row![
                status_badge(status),
                Space::new().width(Length::Fill),
                label(count.to_string(), 18).font(BOLD),
            ]
            .align_y(Alignment::Center),
            muted(share(count), 11),
        ]
        .spacing(6);
        button(card(body))
            .padding(0)
            .width(Length::Fill)
            .style(row_button_style)
            .on_press(Message::NavigateTo(View::Records))
            .into()
    }))
    .spacing(12);

    column![headline, by_status].spacing(16).into()
}

fn view_failures(records: &[EmailRecord]) -> Element<'_, Message> {
    let header = row![
        section_title("Recent failures"),
        Space::new().width(Length::Fill),
        button(text("View all").size(12))
            .padding([4, 12])
            .style(secondary_button_style)
            .on_press(Message::NavigateTo(View::Records)),
    ]
    .align_y(Alignment::Center);

    let body: Element<'_, Message> = if records.is_empty() {
        empty_state("No failed deliveries")
    } else {
        Column::with_children(records.iter().map(view_failure))
            .spacing(8)
            .into()
    };

    card(column![header, body].spacing(12))
}

fn view_failure(record: &EmailRecord) -> Element<'_, Message> {
    let error = record
        .error_message
        .as_deref()
        .unwrap_or("No error message recorded");
    container(
        row![
            column![
                label(record.recipient.as_str(), 14),
                muted(record.subject.as_str(), 12),
                text(error).size(12).style(|_theme| text::Style {
                    color: Some(palette::current().danger),
                }),
            ]
            .spacing(2)
            .width(Length::Fill),
            column![
                status_badge(record.status),
                muted(format_datetime(&record.created_at), 11),
            ]
            .spacing(4)
            .align_x(Alignment::End),
        ]
        .spacing(12),
    )
    .padding([8, 0])
    .into()
}
