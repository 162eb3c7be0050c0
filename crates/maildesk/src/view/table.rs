//! Table chrome shared by list pages: sortable header and pagination bar.

use iced::widget::{Row, Space, button, container, pick_list, row, text};
use iced::{Alignment, Element, Length};

use maildesk_core::table::Align;
use maildesk_core::{CheckState, ColumnDef, PageSlot, Pagination, SortState};

use crate::message::Message;
use crate::style::widgets::{
    page_button_style, row_button_style, secondary_button_style, table_header_style,
};
use crate::view::components::{BOLD, check_box, muted};

/// Rows-per-page choices.
pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

/// Width of the leading checkbox column.
pub const CHECK_WIDTH: f32 = 36.0;

pub const fn horizontal(align: Align) -> Alignment {
    match align {
        Align::Start => Alignment::Start,
        Align::Center => Alignment::Center,
        Align::End => Alignment::End,
    }
}

/// Header row: select-all checkbox then one cell per column.
pub fn header_row(
    columns: &[ColumnDef],
    sort: &SortState,
    check: CheckState,
    on_toggle_all: Message,
    on_sort: impl Fn(&'static str) -> Message,
) -> Element<'static, Message> {
    let mut cells = Row::new().spacing(8).align_y(Alignment::Center).push(
        container(check_box(check, on_toggle_all)).width(Length::Fixed(CHECK_WIDTH)),
    );

    for column in columns {
        let arrow = sort
            .direction_for(column.key)
            .map_or("", |direction| direction.arrow());
        let title = text(format!("{}{}{}", column.label, if arrow.is_empty() { "" } else { " " }, arrow))
            .size(12)
            .font(BOLD);
        let cell: Element<'static, Message> = if column.sortable {
            button(title)
                .padding(0)
                .style(row_button_style)
                .on_press(on_sort(column.key))
                .into()
        } else {
            title.into()
        };
        cells = cells.push(
            container(cell)
                .width(Length::FillPortion(column.width))
                .align_x(horizontal(column.align)),
        );
    }

    container(cells)
        .padding([8, 12])
        .width(Length::Fill)
        .style(table_header_style)
        .into()
}

/// Pagination bar: range label, page buttons and page-size picker.
pub fn pagination_bar(
    pagination: &Pagination,
    on_page: impl Fn(usize) -> Message,
    on_page_size: impl Fn(usize) -> Message + 'static,
) -> Element<'static, Message> {
    let mut pages = Row::new().spacing(4).align_y(Alignment::Center);

    let mut previous = button(text("\u{2039}").size(14))
        .padding([4, 10])
        .style(secondary_button_style);
    if pagination.has_previous() {
        previous = previous.on_press(on_page(pagination.page - 1));
    }
    pages = pages.push(previous);

    for slot in pagination.slots() {
        pages = pages.push(match slot {
            PageSlot::Page(n) => {
                button(text(n.to_string()).size(12))
                    .padding([4, 10])
                    .style(page_button_style(n == pagination.page))
                    .on_press(on_page(n))
                    .into()
            }
            PageSlot::Ellipsis => Element::from(muted("\u{2026}", 12)),
        });
    }

    let mut next = button(text("\u{203A}").size(14))
        .padding([4, 10])
        .style(secondary_button_style);
    if pagination.has_next() {
        next = next.on_press(on_page(pagination.page + 1));
    }
    pages = pages.push(next);

    let selected = PAGE_SIZES
        .contains(&pagination.page_size)
        .then_some(pagination.page_size);

    row![
        muted(pagination.range_label(), 12),
        Space::new().width(Length::Fill),
        pages,
        Space::new().width(16),
        muted("Rows", 12),
        pick_list(PAGE_SIZES, selected, on_page_size)
            .text_size(12)
            .padding([4, 8]),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}
