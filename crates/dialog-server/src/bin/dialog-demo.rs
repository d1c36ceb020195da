//! A counter on the app home tab, with a modal for leaving a note.
//!
//! Reads `SLACK_TOKEN`, `DIALOG_IP`, `DIALOG_PORT` and `DIALOG_LOG` from the
//! environment or a `.env` file.

use dialog_server::{
	DialogServer, HomeOptions, ModalHandlers, Settings, SharedSurface, logging, surface,
};
use dialog_ui::prelude::*;
use serde_json::{Value, json};

fn note_modal() -> SharedSurface {
	surface("NoteModal", |_| {
		Modal::new("Leave a note")
			.submit("Save")
			.close("Cancel")
			.child(Input::new("Note").child(TextField::new("note_text").multiline(true)))
			.into()
	})
}

fn counter() -> SharedSurface {
	surface("Counter", |cx| {
		let (count, set_count) = cx.use_state("count", 0_i64);
		let (note, set_note) = cx.use_state("note", String::new());

		let note_launcher = cx.use_modal(
			"note",
			note_modal(),
			ModalHandlers::new().on_submit(move |event| {
				let set_note = set_note.clone();
				async move {
					if let Some(text) = event.form.get("note_text").and_then(Value::as_str) {
						set_note.set(text.to_string());
					}
					Ok(())
				}
			}),
		);

		let note_section: Node = if note.is_empty() {
			Node::Empty
		} else {
			Section::new().text(format!("> {note}")).markdown().into()
		};

		Home::new()
			.child(Section::new().text(format!("*Count:* {count}")).markdown())
			.child(note_section)
			.child(
				Actions::new()
					.child(Button::new("increment").text("+1").primary().on_click(move |_| {
						let set_count = set_count.clone();
						async move {
							set_count.set(count + 1);
							Ok(())
						}
					}))
					.child(Button::new("note").text("Leave a note").on_click(move |_| {
						let launcher = note_launcher.clone();
						async move {
							launcher.open(json!({})).await?;
							Ok(())
						}
					})),
			)
			.into()
	})
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	let settings = Settings::from_env()?;
	logging::init(&settings.log)?;

	DialogServer::from_settings(&settings)
		.home(
			counter(),
			HomeOptions {
				only_open: true,
				props: json!({}),
			},
		)
		.listen(settings.addr()?)
		.await
}
