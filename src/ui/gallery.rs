/// Session gallery grid
use iced::widget::{column, container, image, text};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;

use crate::state::gallery::Gallery;
use crate::Message;

/// Edge length of a gallery tile
const TILE_SIZE: f32 = 140.0;

/// Build the gallery section, or nothing while the gallery is empty
pub fn gallery_view(gallery: &Gallery) -> Option<Element<'_, Message>> {
    if gallery.is_empty() {
        return None;
    }

    let tiles: Vec<Element<'_, Message>> = gallery
        .iter()
        .map(|entry| {
            container(
                image(entry.handle.clone())
                    .content_fit(ContentFit::Cover)
                    .width(Length::Fixed(TILE_SIZE))
                    .height(Length::Fixed(TILE_SIZE)),
            )
            .style(container::bordered_box)
            .into()
        })
        .collect();

    let grid = Wrap::with_elements(tiles).spacing(8.0).line_spacing(8.0);

    Some(
        column![
            text(format!("Your Creation Gallery ({})", gallery.len())).size(22),
            grid,
        ]
        .spacing(16)
        .align_x(Alignment::Center)
        .width(Length::Fill)
        .into(),
    )
}
