use iced::widget::{button, column, container, row, text, Row};
use iced::{Element, Length};

use crate::Message;

/// Grey skeleton tiles shown while the first page loads
pub fn loading<'a>(count: usize) -> Element<'a, Message> {
    let tiles = (0..count.max(1)).map(|i| {
        let height = if i % 2 == 0 { 260.0 } else { 340.0 };
        container(text(""))
            .width(Length::FillPortion(1))
            .height(Length::Fixed(height))
            .style(container::rounded_box)
            .into()
    });

    container(Row::with_children(tiles).spacing(16))
        .padding(16)
        .width(Length::Fill)
        .into()
}

/// Failure message with a retry button
pub fn error(message: &str) -> Element<'_, Message> {
    let content = column![
        text("Something went wrong").size(24),
        text(message).size(16),
        button("Try again").on_press(Message::Retry).padding(10),
    ]
    .spacing(12)
    .align_x(iced::Alignment::Center);

    container(content)
        .padding(40)
        .center_x(Length::Fill)
        .into()
}

/// Shown when a query matched nothing
pub fn empty<'a>(message: String) -> Element<'a, Message> {
    let content = column![
        text("No photos").size(24),
        text(message).size(16),
    ]
    .spacing(12)
    .align_x(iced::Alignment::Center);

    container(content)
        .padding(40)
        .center_x(Length::Fill)
        .into()
}

/// Footer under the grid: loading-more indicator or a pagination error
pub fn footer<'a>(loading_more: bool, error: Option<&'a str>) -> Element<'a, Message> {
    let content: Element<'a, Message> = match (loading_more, error) {
        (true, _) => text("Loading more photos...").size(14).into(),
        (false, Some(message)) => row![
            text(message).size(14),
            button("Retry").on_press(Message::Retry).padding(6),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center)
        .into(),
        (false, None) => text("").into(),
    };

    container(content)
        .padding(16)
        .center_x(Length::Fill)
        .into()
}
