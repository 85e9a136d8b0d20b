use iced::widget::{button, container, row, text, text_input};
use iced::{Element, Length};

use crate::Message;

/// Query input plus submit button; both are disabled while a search runs
pub fn search_bar(query: &str, is_loading: bool) -> Element<'_, Message> {
    let mut input = text_input("Search photos...", query)
        .padding(10)
        .width(Length::FillPortion(7));
    if !is_loading {
        input = input
            .on_input(Message::QueryChanged)
            .on_submit(Message::SearchSubmitted);
    }

    let submit = button(text("Search").center())
        .padding(10)
        .width(Length::FillPortion(3))
        .on_press_maybe((!is_loading).then_some(Message::SearchSubmitted));

    let form = container(row![input, submit].spacing(16)).max_width(600.0);

    container(form)
        .padding(16)
        .center_x(Length::Fill)
        .into()
}
