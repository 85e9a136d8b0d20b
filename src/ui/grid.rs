use iced::widget::{column, container, image, mouse_area, scrollable, text, Column, Row};
use iced::{ContentFit, Element, Length};

use super::states;
use crate::layout::{GridConfig, GridLayout, PlacedPhoto, VisibleRange};
use crate::state::images::TileImages;
use crate::Message;

pub const GRID_SCROLLABLE: &str = "masonry-grid";

/// The masonry grid wrapped in its scrollable container.
///
/// Only tiles inside the visible range show their image; everything else is
/// a box of the estimated height so the scroll extent stays stable.
pub fn masonry<'a>(
    layout: GridLayout<'a>,
    config: &GridConfig,
    images: &'a TileImages,
    loading_more: bool,
    error: Option<&'a str>,
) -> Element<'a, Message> {
    let visible = layout.visible_range;
    let height = layout.content_height(config.padding);
    let columns = layout.columns.iter().map(|placed| {
        let tiles = placed.iter().map(|photo| tile(photo, visible, images));
        Column::with_children(tiles)
            .spacing(config.gap)
            .width(Length::FillPortion(1))
            .into()
    });

    let grid = Row::with_children(columns)
        .spacing(config.gap)
        .padding(config.padding / 2.0)
        .height(Length::Fixed(height));

    let content = column![grid, states::footer(loading_more, error)];

    scrollable(content)
        .id(scrollable::Id::new(GRID_SCROLLABLE))
        .on_scroll(Message::GridScrolled)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn tile<'a>(
    placed: &'a PlacedPhoto,
    visible: VisibleRange,
    images: &'a TileImages,
) -> Element<'a, Message> {
    let height = Length::Fixed(placed.height);

    let body: Element<'a, Message> = match images.get(placed.photo.grid_source()) {
        Some(handle) if visible.contains(placed.index) => image(handle.clone())
            .width(Length::Fill)
            .height(height)
            .content_fit(ContentFit::Cover)
            .into(),
        _ => {
            let label = if visible.contains(placed.index) {
                placed.photo.alt_text()
            } else {
                ""
            };
            container(text(label).size(12))
                .style(container::rounded_box)
                .center_x(Length::Fill)
                .center_y(height)
                .into()
        }
    };

    mouse_area(body)
        .on_press(Message::PhotoClicked(placed.photo.id))
        .into()
}
