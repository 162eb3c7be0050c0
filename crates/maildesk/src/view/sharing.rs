//! Drive sharing settings page.

use iced::widget::{Column, Space, button, column, container, radio, row, scrollable, text, text_input, toggler};
use iced::{Alignment, Element, Length};

use maildesk_core::SharingOption;

use crate::message::{Message, SharingMessage};
use crate::model::SharingState;
use crate::style::widgets::{
    badge_style, input_style, invalid_input_style, palette, primary_button_style,
    row_button_style, scrollable_style, secondary_button_style,
};
use crate::view::components::{
    card, empty_state, error_banner, label, muted, page_title, section_title,
};

fn sharing(message: SharingMessage) -> Message {
    Message::Sharing(message)
}

/// Renders the sharing settings form.
pub fn view_sharing(state: &SharingState) -> Element<'_, Message> {
    let mut content = Column::new()
        .spacing(16)
        .push(page_title(
            "Sharing Settings",
            "How large attachments are shared through Drive",
        ))
        .width(Length::Fill)
        .max_width(760);

    if let Some(error) = &state.error {
        content = content.push(error_banner(error));
    }
    if state.is_loading {
        content = content.push(empty_state("Loading settings\u{2026}"));
    }

    let selected = Some(state.draft.option);
    let options = Column::with_children(SharingOption::ALL.into_iter().map(|option| {
        radio(option.label(), option, selected, |o| sharing(SharingMessage::Option(o)))
            .size(16)
            .text_size(14)
            .into()
    }))
    .spacing(10);

    content = content.push(card(
        column![section_title("Who can open uploaded files"), options].spacing(12),
    ));

    if state.draft.option == SharingOption::Specific {
        content = content.push(view_recipients(state));
    }

    let threshold = row![
        text_input("25", &state.threshold_input)
            .on_input(|s| sharing(SharingMessage::ThresholdChanged(s)))
            .padding([6, 10])
            .size(14)
            .width(Length::Fixed(100.0))
            .style(if state.threshold_is_valid() {
                input_style
            } else {
                invalid_input_style
            }),
        muted("MB", 13),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    content = content.push(card(
        column![
            section_title("Upload threshold"),
            muted("Attachments larger than this are uploaded to Drive and sent as a link", 12),
            threshold,
            toggler(state.draft.notify_recipients)
                .label("Notify people when access is granted")
                .text_size(13)
                .on_toggle(|on| sharing(SharingMessage::Notify(on))),
        ]
        .spacing(10),
    ));

    content = content.push(
        container(label(state.draft.description(), 13))
            .padding([10, 14])
            .width(Length::Fill)
            .style(badge_style(palette::current().info)),
    );

    for error in &state.errors {
        content = content.push(
            text(error.to_string())
                .size(12)
                .style(|_theme| text::Style {
                    color: Some(palette::current().danger),
                }),
        );
    }

    let modified = state.is_modified();
    let mut reset = button(text("Reset").size(13))
        .padding([6, 16])
        .style(secondary_button_style);
    if modified {
        reset = reset.on_press(sharing(SharingMessage::Reset));
    }
    let save_label = if state.is_saving { "Saving\u{2026}" } else { "Save" };
    let mut save = button(text(save_label).size(13))
        .padding([6, 16])
        .style(primary_button_style);
    if modified && !state.is_saving {
        save = save.on_press(sharing(SharingMessage::Save));
    }

    content = content.push(
        row![Space::new().width(Length::Fill), reset, save]
            .spacing(8)
            .align_y(Alignment::Center),
    );

    scrollable(content)
        .height(Length::Fill)
        .style(scrollable_style)
        .into()
}

fn view_recipients(state: &SharingState) -> Element<'_, Message> {
    let list: Element<'_, Message> = if state.draft.allowed_emails.is_empty() {
        muted("No addresses yet", 12).into()
    } else {
        Column::with_children(state.draft.allowed_emails.iter().map(|email| {
            row![
                label(email.as_str(), 13).width(Length::Fill),
                button(muted("\u{2715}", 12))
                    .padding([2, 6])
                    .style(row_button_style)
                    .on_press(sharing(SharingMessage::RemoveEmail(email.clone()))),
            ]
            .align_y(Alignment::Center)
            .into()
        }))
        .spacing(4)
        .into()
    };

    let add = row![
        text_input("name@example.com", &state.email_input)
            .on_input(|s| sharing(SharingMessage::EmailChanged(s)))
            .on_submit(sharing(SharingMessage::AddEmail))
            .padding([6, 10])
            .size(14)
            .width(Length::Fill)
            .style(input_style),
        button(text("Add").size(13))
            .padding([6, 16])
            .style(primary_button_style)
            .on_press(sharing(SharingMessage::AddEmail)),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    card(column![section_title("People with access"), list, add].spacing(10))
}
