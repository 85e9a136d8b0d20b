use iced::widget::{button, column, container, image, scrollable, text, Column};
use iced::{ContentFit, Element, Length};

use crate::state::details::PhotoDetails;
use crate::Message;

/// Photo details page: large image, photographer and metadata
pub fn view<'a>(details: &'a PhotoDetails, handle: Option<&'a image::Handle>) -> Element<'a, Message> {
    let back = button("← Back").on_press(Message::Back).padding(8);

    let mut content: Column<'a, Message> = column![back].spacing(16);

    if let Some(error) = details.error() {
        content = content.push(text("Could not load this photo").size(24));
        content = content.push(text(error).size(16));
    } else if let Some(photo) = details.photo() {
        let picture: Element<'a, Message> = match handle {
            Some(handle) => image(handle.clone())
                .width(Length::Fill)
                .content_fit(ContentFit::Contain)
                .into(),
            None => container(text("Loading image..."))
                .style(container::rounded_box)
                .center_x(Length::Fill)
                .center_y(Length::Fixed(400.0))
                .into(),
        };

        content = content
            .push(picture)
            .push(text(photo.alt_text()).size(24))
            .push(text(format!("Photo by {}", photo.photographer)).size(16))
            .push(text(format!("{} × {}", photo.width, photo.height)).size(14))
            .push(text(photo.url.as_str()).size(12));

        if details.is_loading() {
            content = content.push(text("Refreshing...").size(12));
        }
    } else if details.is_loading() {
        content = content.push(text("Loading photo...").size(16));
    }

    scrollable(
        container(content.max_width(1200.0))
            .padding(24)
            .center_x(Length::Fill),
    )
    .height(Length::Fill)
    .into()
}
