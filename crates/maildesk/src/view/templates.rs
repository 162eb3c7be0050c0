//! Template editor page: template list, formatting toolbar, block editor and
//! preview.
//!
//! Blocks are drawn with `rich_text` so their inline marks show. The active
//! block also gets a plain text input; Enter in that input splits the block.

use iced::font::{Style as FontStyle, Weight};
use iced::widget::{
    Column, Row, Space, button, column, container, rich_text, row, scrollable, span, text,
    text_input, toggler,
};
use iced::{Alignment, Element, Font, Length};

use maildesk_core::dates::format_date;
use maildesk_core::template::{Block, BlockKind, Mark, Span, TemplateProblem};
use maildesk_core::{Document, EmailTemplate};

use crate::message::{Message, TemplatesMessage};
use crate::model::{PreviewMode, TemplatesState};
use crate::style::widgets::{
    block_style, format_button_style, input_style, invalid_input_style, nav_style, palette,
    primary_button_style, scrollable_style, secondary_button_style, sunken_style, toolbar_style,
};
use crate::view::components::{
    BOLD, MONOSPACE, SEMIBOLD, card, empty_state, error_banner, label, muted, page_title,
    section_title,
};

const BLOCK_KINDS: [BlockKind; 7] = [
    BlockKind::Paragraph,
    BlockKind::Heading(1),
    BlockKind::Heading(2),
    BlockKind::Heading(3),
    BlockKind::BulletItem,
    BlockKind::NumberedItem,
    BlockKind::Quote,
];

fn templates(message: TemplatesMessage) -> Message {
    Message::Templates(message)
}

/// Renders the template editor.
pub fn view_templates(state: &TemplatesState) -> Element<'_, Message> {
    let mut content = Column::new()
        .spacing(12)
        .push(page_title("Templates", "Compose reusable email bodies"));

    if let Some(error) = &state.error {
        content = content.push(error_banner(error));
    }

    let layout = row![
        container(view_list(state)).width(Length::Fixed(240.0)),
        container(view_editor(state)).width(Length::FillPortion(3)),
        container(view_preview(state)).width(Length::FillPortion(2)),
    ]
    .spacing(16)
    .height(Length::Fill);

    content.push(layout).height(Length::Fill).into()
}

fn view_list(state: &TemplatesState) -> Element<'_, Message> {
    let new_button = button(text("+ New template").size(13))
        .padding([6, 12])
        .width(Length::Fill)
        .style(primary_button_style)
        .on_press(templates(TemplatesMessage::New));

    let items: Element<'_, Message> = if state.templates.is_empty() {
        if state.is_loading {
            empty_state("Loading\u{2026}")
        } else {
            empty_state("No templates")
        }
    } else {
        Column::with_children(
            state
                .templates
                .iter()
                .enumerate()
                .map(|(index, template)| view_list_item(state, index, template)),
        )
        .spacing(2)
        .into()
    };

    card(
        column![
            new_button,
            scrollable(items).height(Length::Fill).style(scrollable_style),
        ]
        .spacing(12),
    )
}

fn view_list_item<'a>(
    state: &TemplatesState,
    index: usize,
    template: &'a EmailTemplate,
) -> Element<'a, Message> {
    let is_open = template.id.is_some() && template.id == state.current.id;
    let updated = template
        .updated_at
        .map_or_else(|| "Never saved".to_string(), |at| format!("Updated {}", format_date(&at)));

    let style = nav_style(is_open);

    button(column![label(template.name.as_str(), 13), muted(updated, 11)].spacing(2))
        .padding([8, 10])
        .width(Length::Fill)
        .style(style)
        .on_press(templates(TemplatesMessage::Open(index)))
        .into()
}

fn view_editor(state: &TemplatesState) -> Element<'_, Message> {
    let name_invalid = state
        .problems
        .iter()
        .any(|p| matches!(p, TemplateProblem::MissingName));
    let subject_invalid = state.problems.iter().any(|p| {
        matches!(
            p,
            TemplateProblem::MissingSubject
                | TemplateProblem::UnclosedPlaceholder
        )
    });

    let name = text_input("Template name", &state.current.name)
        .on_input(|s| templates(TemplatesMessage::NameChanged(s)))
        .padding([6, 10])
        .size(14)
        .style(if name_invalid { invalid_input_style } else { input_style });

    let subject = text_input("Subject, e.g. Your report for {{month}}", &state.current.subject)
        .on_input(|s| templates(TemplatesMessage::SubjectChanged(s)))
        .padding([6, 10])
        .size(14)
        .style(if subject_invalid { invalid_input_style } else { input_style });

    let mut status = Row::new().spacing(8).align_y(Alignment::Center);
    if state.current.is_new() {
        status = status.push(muted("New template", 12));
    }
    if state.dirty {
        status = status.push(muted("\u{25CF} Unsaved changes", 12));
    }
    if state.restored_draft {
        status = status.push(muted("Restored from draft", 12));
    }

    let save_label = if state.is_saving { "Saving\u{2026}" } else { "Save" };
    let mut save = button(text(save_label).size(13))
        .padding([6, 16])
        .style(primary_button_style);
    if !state.is_saving {
        save = save.on_press(templates(TemplatesMessage::Save));
    }
    let mut discard = button(text("Discard").size(13))
        .padding([6, 16])
        .style(secondary_button_style);
    if state.dirty {
        discard = discard.on_press(templates(TemplatesMessage::Discard));
    }

    let mut editor = Column::new()
        .spacing(10)
        .push(section_title("Name"))
        .push(name)
        .push(section_title("Subject"))
        .push(subject);

    for problem in &state.problems {
        editor = editor.push(error_text(problem.message()));
    }

    editor = editor
        .push(view_toolbar(state))
        .push(view_blocks(state));

    if let Some(error) = &state.editor_error {
        editor = editor.push(error_text(error.as_str()));
    }

    editor = editor.push(
        row![status, Space::new().width(Length::Fill), discard, save]
            .spacing(8)
            .align_y(Alignment::Center),
    );

    card(scrollable(editor).height(Length::Fill).style(scrollable_style))
}

fn error_text(message: &str) -> Element<'_, Message> {
    text(message)
        .size(12)
        .style(|_theme| text::Style {
            color: Some(palette::current().danger),
        })
        .into()
}

fn tool(title: &'static str, active: bool, message: Option<Message>) -> Element<'static, Message> {
    let mut btn = button(text(title).size(13))
        .padding([4, 10])
        .style(format_button_style(active));
    if let Some(message) = message {
        btn = btn.on_press(message);
    }
    btn.into()
}

fn view_toolbar(state: &TemplatesState) -> Element<'_, Message> {
    let marks = row![
        tool("B", state.is_active(Mark::Bold), Some(templates(TemplatesMessage::Bold))),
        tool("I", state.is_active(Mark::Italic), Some(templates(TemplatesMessage::Italic))),
        tool("U", state.is_active(Mark::Underline), Some(templates(TemplatesMessage::Underline))),
        tool("S", state.is_active(Mark::Strike), Some(templates(TemplatesMessage::Strike))),
        tool("Clear format", false, Some(templates(TemplatesMessage::RemoveFormat))),
        Space::new().width(Length::Fill),
        tool(
            "\u{21B6} Undo",
            false,
            state.editor.can_undo().then(|| templates(TemplatesMessage::Undo)),
        ),
        tool(
            "\u{21B7} Redo",
            false,
            state.editor.can_redo().then(|| templates(TemplatesMessage::Redo)),
        ),
    ]
    .spacing(4)
    .align_y(Alignment::Center);

    let current = state.current_block();
    let blocks = Row::with_children(BLOCK_KINDS.into_iter().map(|kind| {
        tool(
            kind.label(),
            kind == current,
            Some(templates(TemplatesMessage::SetBlock(kind))),
        )
    }))
    .spacing(4)
    .align_y(Alignment::Center);

    let link = row![
        text_input("https://", &state.link_input)
            .on_input(|s| templates(TemplatesMessage::LinkChanged(s)))
            .on_submit(templates(TemplatesMessage::ApplyLink))
            .padding([4, 8])
            .size(13)
            .width(Length::Fill)
            .style(input_style),
        tool("Link", state.is_active(Mark::Link), Some(templates(TemplatesMessage::ApplyLink))),
        tool("Unlink", false, Some(templates(TemplatesMessage::Unlink))),
    ]
    .spacing(4)
    .align_y(Alignment::Center);

    let scope = row![
        text_input("Text to format (empty: whole block)", &state.format_text)
            .on_input(|s| templates(TemplatesMessage::FormatTextChanged(s)))
            .padding([4, 8])
            .size(13)
            .width(Length::Fill)
            .style(input_style),
        toggler(state.document_scope)
            .label("Whole document")
            .text_size(12)
            .on_toggle(|on| templates(TemplatesMessage::DocumentScope(on))),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    container(column![marks, blocks, link, scope].spacing(6))
        .padding(8)
        .width(Length::Fill)
        .style(toolbar_style)
        .into()
}

fn view_blocks(state: &TemplatesState) -> Element<'_, Message> {
    let document = state.editor.document();
    let mut list = Column::new().spacing(4);
    let mut number = 0;

    for (index, block) in document.blocks.iter().enumerate() {
        number = if block.kind == BlockKind::NumberedItem {
            number + 1
        } else {
            0
        };
        let is_active = index == state.active_block;
        let rendered = button(view_block(block, number))
            .padding([4, 8])
            .width(Length::Fill)
            .style(block_style(is_active))
            .on_press(templates(TemplatesMessage::FocusBlock(index)));
        list = list.push(rendered);

        if is_active {
            let mut merge = button(text("\u{2934} Merge up").size(12))
                .padding([4, 8])
                .style(secondary_button_style);
            if index > 0 {
                merge = merge.on_press(templates(TemplatesMessage::MergeBlock));
            }
            list = list.push(
                row![
                    text_input("Type here, Enter for a new block", &block.text())
                        .on_input(|s| templates(TemplatesMessage::BlockEdited(s)))
                        .on_submit(templates(TemplatesMessage::SplitBlock))
                        .padding([6, 10])
                        .size(14)
                        .width(Length::Fill)
                        .style(input_style),
                    merge,
                ]
                .spacing(6)
                .align_y(Alignment::Center),
            );
        }
    }

    container(list)
        .padding(8)
        .width(Length::Fill)
        .style(sunken_style)
        .into()
}

fn span_font(span: &Span, base: Font) -> Font {
    Font {
        weight: if span.marks.bold { Weight::Bold } else { base.weight },
        style: if span.marks.italic {
            FontStyle::Italic
        } else {
            base.style
        },
        ..base
    }
}

/// Draws one block with its inline marks. `number` is the position within a
/// run of numbered items.
fn view_block(block: &Block, number: usize) -> Element<'static, Message> {
    let p = palette::current();
    let (size, base, prefix): (f32, Font, String) = match block.kind {
        BlockKind::Paragraph => (14.0, Font::DEFAULT, String::new()),
        BlockKind::Heading(1) => (24.0, BOLD, String::new()),
        BlockKind::Heading(2) => (20.0, BOLD, String::new()),
        BlockKind::Heading(_) => (17.0, SEMIBOLD, String::new()),
        BlockKind::BulletItem => (14.0, Font::DEFAULT, "\u{2022}  ".to_string()),
        BlockKind::NumberedItem => (14.0, Font::DEFAULT, format!("{number}.  ")),
        BlockKind::Quote => (
            14.0,
            Font {
                style: FontStyle::Italic,
                ..Font::DEFAULT
            },
            "\u{2502} ".to_string(),
        ),
    };
    let base_color = if block.kind == BlockKind::Quote {
        p.ink_soft
    } else {
        p.ink
    };

    let mut spans: Vec<text::Span<'static, Message>> = Vec::with_capacity(block.spans.len() + 1);
    if !prefix.is_empty() {
        spans.push(span(prefix).font(base).color(p.ink_faint));
    }
    if block.is_empty() {
        spans.push(span(" ").font(base));
    }
    for s in &block.spans {
        let color = if s.marks.link.is_some() {
            p.info
        } else {
            base_color
        };
        spans.push(
            span(s.text.clone())
                .font(span_font(s, base))
                .color(color)
                .underline(s.marks.underline || s.marks.link.is_some())
                .strikethrough(s.marks.strike),
        );
    }

    rich_text(spans).size(size).width(Length::Fill).into()
}

fn view_document(document: &Document) -> Element<'static, Message> {
    let mut number = 0;
    Column::with_children(document.blocks.iter().map(|block| {
        number = if block.kind == BlockKind::NumberedItem {
            number + 1
        } else {
            0
        };
        view_block(block, number)
    }))
    .spacing(8)
    .into()
}

fn view_preview(state: &TemplatesState) -> Element<'_, Message> {
    let modes = Row::with_children(PreviewMode::ALL.into_iter().map(|mode| {
        tool(
            mode.label(),
            mode == state.preview,
            Some(templates(TemplatesMessage::Preview(mode))),
        )
    }))
    .spacing(4);

    let mut panel = Column::new()
        .spacing(10)
        .push(section_title("Preview"))
        .push(modes);

    let placeholders = state.current.placeholders();
    if !placeholders.is_empty() {
        panel = panel.push(section_title("Sample values"));
        for name in placeholders {
            let value = state.sample_values.get(&name).cloned().unwrap_or_default();
            let key = name.clone();
            panel = panel.push(
                row![
                    container(muted(format!("{{{{{name}}}}}"), 12).font(MONOSPACE))
                        .width(Length::Fixed(120.0)),
                    text_input("value", &value)
                        .on_input(move |v| {
                            templates(TemplatesMessage::SampleChanged(key.clone(), v))
                        })
                        .padding([4, 8])
                        .size(12)
                        .width(Length::Fill)
                        .style(input_style),
                ]
                .spacing(8)
                .align_y(Alignment::Center),
            );
        }
    }

    let (subject, document) = state.rendered();
    let body: Element<'_, Message> = match state.preview {
        PreviewMode::Rendered => column![
            label(subject, 16).font(SEMIBOLD),
            view_document(&document),
        ]
        .spacing(12)
        .into(),
        PreviewMode::PlainText | PreviewMode::Markdown | PreviewMode::Html => {
            text(state.preview_text()).size(12).font(MONOSPACE).into()
        }
    };

    panel = panel.push(
        container(body)
            .padding(12)
            .width(Length::Fill)
            .style(sunken_style),
    );

    card(scrollable(panel).height(Length::Fill).style(scrollable_style))
}
