//! Sidebar navigation.

use iced::widget::{Column, Space, button, column, container, row, text};
use iced::{Element, Length};

use crate::message::{Message, View};
use crate::style::widgets::{nav_style, palette, sidebar_style};
use crate::view::components::{BOLD, SEMIBOLD};

/// Renders the page list. `failures` is shown as a badge on the records entry.
pub fn view_sidebar(current: View, failures: u64) -> Element<'static, Message> {
    let header = container(
        text("NAVIGATION")
            .size(11)
            .font(BOLD)
            .style(|_theme| {
                let p = palette::current();
                text::Style {
                    color: Some(p.ink_faint),
                }
            }),
    )
    .padding([12, 16]);

    let items: Vec<Element<'static, Message>> = View::NAVIGATION
        .iter()
        .map(|&view| {
            let badge = (view == View::Records && failures > 0).then_some(failures);
            view_nav_item(view, current, badge)
        })
        .collect();

    let content = column![
        header,
        Column::with_children(items).spacing(2).padding([0, 8]),
        Space::new().height(Length::Fill),
        container(view_nav_item(View::Settings, current, None)).padding([8, 8]),
    ];

    container(content)
        .width(Length::Fixed(220.0))
        .height(Length::Fill)
        .style(sidebar_style)
        .into()
}

fn view_nav_item(view: View, current: View, badge: Option<u64>) -> Element<'static, Message> {
    let is_selected = view == current;

    let name = text(view.title())
        .size(14)
        .font(if is_selected {
            SEMIBOLD
        } else {
            iced::Font::DEFAULT
        })
        .style(move |_theme| {
            let p = palette::current();
            text::Style {
                color: Some(if is_selected { p.accent } else { p.ink }),
            }
        });

    let mut content = row![text(view.icon()).size(16), name]
        .spacing(10)
        .align_y(iced::Alignment::Center);

    if let Some(count) = badge {
        let pill = container(text(count.to_string()).size(11).font(BOLD).style(|_theme| {
            let p = palette::current();
            text::Style {
                color: Some(p.on_accent),
            }
        }))
        .padding([2, 6])
        .style(|_theme| {
            let p = palette::current();
            container::Style {
                background: Some(iced::Background::Color(p.danger)),
                border: iced::Border {
                    radius: 10.0.into(),
                    ..Default::default()
                },
                ..Default::default()
            }
        });
        content = content.push(Space::new().width(Length::Fill));
        content = content.push(pill);
    }

    button(content.width(Length::Fill))
        .width(Length::Fill)
        .padding([10, 12])
        .style(nav_style(is_selected))
        .on_press(Message::NavigateTo(view))
        .into()
}
