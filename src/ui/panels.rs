/// Main window panels: header, input form, original/edited previews
use iced::widget::{button, column, container, horizontal_space, image, row, text, text_input};
use iced::{alignment, Alignment, Color, ContentFit, Element, Length};

use crate::state::session::Session;
use crate::Message;

const ERROR_COLOR: Color = Color::from_rgb(0.94, 0.27, 0.27);
const MUTED_COLOR: Color = Color::from_rgb(0.58, 0.60, 0.65);

/// Height of the original/edited preview boxes
const PREVIEW_HEIGHT: f32 = 360.0;

pub fn header<'a>(dark: bool) -> Element<'a, Message> {
    let toggle_label = if dark { "☀ Light" } else { "🌙 Dark" };

    row![
        text("MIRAGE").size(40),
        horizontal_space(),
        button(text(toggle_label))
            .on_press(Message::ToggleTheme)
            .padding(8),
    ]
    .align_y(Alignment::Center)
    .into()
}

/// Upload area, prompt field, submit button and error line
pub fn input_panel<'a>(session: &'a Session, upload_hint: &'a str) -> Element<'a, Message> {
    let drop_label = if session.is_dragging() {
        "Drop the image to upload"
    } else {
        "or drag and drop a file onto the window"
    };

    let selected = match session.pending() {
        Some(pending) => format!("Selected: {}", pending.file_name),
        None => "No image selected".to_string(),
    };

    let drop_zone = container(
        column![
            button(text("Choose Image")).on_press(Message::PickImage).padding(10),
            text(drop_label).size(14),
            text(upload_hint).size(12).color(MUTED_COLOR),
            text(selected).size(12),
        ]
        .spacing(8)
        .align_x(Alignment::Center),
    )
    .padding(20)
    .width(Length::Fill)
    .center_x(Length::Fill)
    .style(container::bordered_box);

    let prompt = text_input(
        "e.g., 'Make the sky a vibrant sunset', 'Add a cute cat on the sofa'",
        session.prompt(),
    )
    .on_input(Message::PromptChanged)
    .on_submit(Message::Submit)
    .padding(10);

    let submit_label = if session.is_submitting() {
        "Editing..."
    } else {
        "Generate"
    };

    let submit_text = text(submit_label)
        .width(Length::Fill)
        .align_x(alignment::Horizontal::Center);

    let submit = button(submit_text)
        .on_press_maybe(session.can_submit().then_some(Message::Submit))
        .padding(10)
        .width(Length::Fill);

    let error = session
        .error()
        .map(|message| text(message).size(14).color(ERROR_COLOR));

    column![
        text("Edit Your Image").size(24),
        text("Upload a photo and tell the AI what to change.")
            .size(14)
            .color(MUTED_COLOR),
        drop_zone,
        text("Editing prompt").size(14),
        prompt,
        submit,
    ]
    .push_maybe(error)
    .spacing(12)
    .width(Length::FillPortion(2))
    .into()
}

/// Side-by-side original and edited previews
pub fn image_panels(session: &Session) -> Element<'_, Message> {
    let original = match session.pending() {
        Some(pending) => preview(pending.handle.clone()),
        None => placeholder("Your image will appear here."),
    };

    let edited = if session.is_submitting() {
        placeholder("Editing your image...")
    } else {
        match session.displayed_result() {
            Some(result) => preview(result.handle.clone()),
            None => placeholder("Your masterpiece is on its way."),
        }
    };

    row![pane("Original", original), pane("Edited", edited)]
        .spacing(16)
        .width(Length::FillPortion(3))
        .into()
}

fn pane<'a>(title: &'a str, content: Element<'a, Message>) -> Element<'a, Message> {
    column![
        text(title).size(18),
        container(content)
            .width(Length::Fill)
            .height(Length::Fixed(PREVIEW_HEIGHT))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(PREVIEW_HEIGHT))
            .style(container::bordered_box),
    ]
    .spacing(8)
    .width(Length::Fill)
    .into()
}

fn preview<'a>(handle: image::Handle) -> Element<'a, Message> {
    image(handle)
        .content_fit(ContentFit::Contain)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn placeholder<'a>(label: &'a str) -> Element<'a, Message> {
    text(label).size(14).color(MUTED_COLOR).into()
}
