//! Dispatch scenarios against a recording platform client.

mod fixtures;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dialog_core::{Form, Node};
use dialog_server::payload::InteractionPayload;
use dialog_server::{
	DispatchError, Dispatcher, HomeOptions, Item, MessageOptions, ModalHandlers, SharedSurface,
	StateSetter, SurfaceKind, surface,
};
use dialog_ui::prelude::*;
use fixtures::{
	Call, MESSAGE_TS, RecordingClient, block_text, button, dispatcher, home_opened, view_action,
};
use parking_lot::Mutex;
use rstest::rstest;
use serde_json::{Value, json};

fn payload(value: Value) -> InteractionPayload {
	serde_json::from_value(value).unwrap()
}

fn counter(loads: Arc<AtomicUsize>) -> SharedSurface {
	surface("Counter", move |cx| {
		let (count, set_count) = cx.use_state("count", 0_i64);
		let loads = Arc::clone(&loads);
		Home::new()
			.on_load(move |_| {
				let loads = Arc::clone(&loads);
				async move {
					loads.fetch_add(1, Ordering::SeqCst);
					Ok(())
				}
			})
			.child(Section::new().text(format!("Count: {count}")))
			.child(Actions::new().child(increment_button(count, set_count)))
			.into()
	})
}

fn increment_button(count: i64, set_count: StateSetter<i64>) -> Button {
	Button::new("increment").text("+1").on_click(move |_| {
		let set_count = set_count.clone();
		async move {
			set_count.set(count + 1);
			Ok(())
		}
	})
}

async fn open_home(dispatcher: &Dispatcher, home: SharedSurface) {
	dispatcher.register_home(home, HomeOptions::default());
	dispatcher.home_opened(&home_opened("U1", None)).await.unwrap();
}

#[rstest]
#[tokio::test]
async fn test_home_open_publishes_and_caches() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	let loads = Arc::new(AtomicUsize::new(0));
	dispatcher.register_home(counter(Arc::clone(&loads)), HomeOptions::default());

	// Act
	let item = dispatcher.home_opened(&home_opened("U1", None)).await.unwrap().unwrap();

	// Assert
	let Some(Call::PublishHome { user_id, view }) = client.last() else {
		panic!("expected a publish call, got {:?}", client.calls());
	};
	assert_eq!(user_id, "U1");
	assert_eq!(view["type"], json!("home"));
	assert_eq!(block_text(&view, 0), Some("Count: 0"));
	assert_eq!(loads.load(Ordering::SeqCst), 1);
	assert_eq!(item.kind, SurfaceKind::Home);
	assert_eq!(item.props["user"], json!("U1"));
	assert_eq!(dispatcher.cache().get("V-U1").map(|item| item.view), Some(view));
}

#[rstest]
#[tokio::test]
async fn test_home_open_skips_other_tabs_when_only_open() {
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	dispatcher.register_home(
		counter(Arc::default()),
		HomeOptions {
			only_open: true,
			props: json!({}),
		},
	);
	let mut event = home_opened("U1", None);
	event.tab = "messages".to_string();

	let item = dispatcher.home_opened(&event).await.unwrap();

	assert!(item.is_none());
	assert!(client.calls().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_default_home_options_ignore_messages_tab() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	dispatcher.register_home(counter(Arc::default()), HomeOptions::default());
	let mut event = home_opened("U1", None);
	event.tab = "messages".to_string();

	// Act
	let item = dispatcher.home_opened(&event).await.unwrap();

	// Assert
	assert!(item.is_none());
	assert!(client.calls().is_empty());
	assert!(dispatcher.cache().get("V-U1").is_none());
}

#[rstest]
#[tokio::test]
async fn test_home_opens_for_any_tab_when_not_only_open() {
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	dispatcher.register_home(
		counter(Arc::default()),
		HomeOptions {
			only_open: false,
			props: json!({}),
		},
	);
	let mut event = home_opened("U1", None);
	event.tab = "messages".to_string();

	let item = dispatcher.home_opened(&event).await.unwrap();

	assert!(item.is_some());
	assert!(matches!(client.last(), Some(Call::PublishHome { .. })));
}

#[rstest]
#[tokio::test]
async fn test_home_reopen_keeps_state() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	open_home(&dispatcher, counter(Arc::default())).await;
	dispatcher
		.dispatch(&payload(view_action("U1", "V-U1", button("increment"))))
		.await
		.unwrap();

	// Act
	dispatcher.home_opened(&home_opened("U1", Some("V-U1"))).await.unwrap();

	// Assert
	let Some(Call::PublishHome { view, .. }) = client.last() else {
		panic!("expected a publish call");
	};
	assert_eq!(block_text(&view, 0), Some("Count: 1"));
}

#[rstest]
#[tokio::test]
async fn test_button_click_round_trip() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	let loads = Arc::new(AtomicUsize::new(0));
	open_home(&dispatcher, counter(Arc::clone(&loads))).await;

	// Act
	for _ in 0..2 {
		dispatcher
			.dispatch(&payload(view_action("U1", "V-U1", button("increment"))))
			.await
			.unwrap();
	}

	// Assert
	let Some(Call::UpdateHome { view_id, view }) = client.last() else {
		panic!("expected an update call, got {:?}", client.calls());
	};
	assert_eq!(view_id, "V-U1");
	assert_eq!(block_text(&view, 0), Some("Count: 2"));
	let item = dispatcher.cache().get("V-U1").unwrap();
	assert_eq!(item.state.get("count"), Some(json!(2)));
	assert_eq!(item.view, view);
	assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test]
async fn test_unknown_view_is_missing_state() {
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	open_home(&dispatcher, counter(Arc::default())).await;

	let err = dispatcher
		.dispatch(&payload(view_action("U1", "V-unknown", button("increment"))))
		.await
		.unwrap_err();

	let dialog = err.describe().expect("missing state is describable");
	assert_eq!(dialog.title.as_deref(), Some("Missing state"));
	assert_eq!(client.calls().len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_failed_update_still_writes_cache() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	open_home(&dispatcher, counter(Arc::default())).await;
	client.fail_updates();

	// Act
	let result = dispatcher
		.dispatch(&payload(view_action("U1", "V-U1", button("increment"))))
		.await;

	// Assert
	assert!(result.is_ok());
	let item = dispatcher.cache().get("V-U1").unwrap();
	assert_eq!(block_text(&item.view, 0), Some("Count: 1"));
}

fn note_surface(notes: Arc<Mutex<Vec<Option<String>>>>) -> SharedSurface {
	surface("Notes", move |cx| {
		let (note, set_note) = cx.use_state::<Option<String>>("note", Some("initial".to_string()));
		let notes = Arc::clone(&notes);
		Home::new()
			.child(Section::new().text(note.clone().unwrap_or_else(|| "none".to_string())))
			.child(Actions::new().child(Button::new("clear").on_click(move |_| {
				let set_note = set_note.clone();
				let notes = Arc::clone(&notes);
				async move {
					notes.lock().push(None);
					set_note.set(None);
					Ok(())
				}
			})))
			.into()
	})
}

#[rstest]
#[tokio::test]
async fn test_stored_state_wins_over_initial_value() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	let notes = Arc::new(Mutex::new(Vec::new()));
	open_home(&dispatcher, note_surface(Arc::clone(&notes))).await;

	// Act
	dispatcher
		.dispatch(&payload(view_action("U1", "V-U1", button("clear"))))
		.await
		.unwrap();

	// Assert
	let item = dispatcher.cache().get("V-U1").unwrap();
	assert_eq!(item.state.get("note"), Some(Value::Null));
	assert_eq!(block_text(&item.view, 0), Some("none"));
	assert_eq!(notes.lock().len(), 1);
}

/// Two buttons that record their order and bump a shared counter.
fn steps(order: Arc<Mutex<Vec<String>>>) -> SharedSurface {
	surface("Steps", move |cx| {
		let (count, set_count) = cx.use_state("count", 0_i64);
		let step = |action: &str| {
			let order = Arc::clone(&order);
			let set_count = set_count.clone();
			let name = action.to_string();
			Button::new(action).on_click(move |_| {
				let order = Arc::clone(&order);
				let set_count = set_count.clone();
				let name = name.clone();
				async move {
					order.lock().push(name);
					set_count.set(count + 1);
					Ok(())
				}
			})
		};
		Home::new()
			.child(Section::new().text(format!("Count: {count}")))
			.child(Actions::new().child(step("first")).child(step("second")))
			.into()
	})
}

#[rstest]
#[tokio::test]
async fn test_block_actions_replays_every_action_then_updates_once() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	let order = Arc::new(Mutex::new(Vec::new()));
	open_home(&dispatcher, steps(Arc::clone(&order))).await;
	let mut body = view_action("U1", "V-U1", button("first"));
	body["actions"] = json!([button("first"), button("second")]);

	// Act
	dispatcher.dispatch(&payload(body)).await.unwrap();

	// Assert
	assert_eq!(*order.lock(), vec!["first".to_string(), "second".to_string()]);
	let calls = client.calls();
	assert_eq!(calls.len(), 2);
	assert!(matches!(calls[0], Call::PublishHome { .. }));
	let Call::UpdateHome { view_id, view } = &calls[1] else {
		panic!("expected one update call, got {calls:?}");
	};
	assert_eq!(view_id, "V-U1");
	assert_eq!(block_text(view, 0), Some("Count: 2"));
	let item = dispatcher.cache().get("V-U1").unwrap();
	assert_eq!(item.state.get("count"), Some(json!(2)));
}

#[rstest]
#[tokio::test]
async fn test_repeated_action_in_one_payload_sees_previous_state() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	open_home(&dispatcher, counter(Arc::default())).await;
	let mut body = view_action("U1", "V-U1", button("increment"));
	body["actions"] = json!([button("increment"), button("increment")]);

	// Act
	dispatcher.dispatch(&payload(body)).await.unwrap();

	// Assert
	let updates = client
		.calls()
		.into_iter()
		.filter(|call| matches!(call, Call::UpdateHome { .. }))
		.count();
	assert_eq!(updates, 1);
	assert_eq!(block_text(client.last().unwrap().document(), 0), Some("Count: 2"));
}

#[derive(Default)]
struct ModalLog {
	submits: AtomicUsize,
	cancels: AtomicUsize,
	forms: Mutex<Vec<Form>>,
}

fn task_modal() -> SharedSurface {
	surface("TaskModal", |_| {
		Modal::new("New task")
			.submit("Create")
			.child(Input::new("Title").child(TextField::new("title")))
			.child(
				Input::new("Tags").child(
					Checkboxes::new("tags")
						.child(SelectOption::new("a").text("A"))
						.child(SelectOption::new("b").text("B")),
				),
			)
			.child(Input::new("Due").optional(true).child(DatePicker::new("due")))
			.into()
	})
}

/// Registers the task modal twice per render under the same key.
fn tasks(log: Arc<ModalLog>) -> SharedSurface {
	surface("Tasks", move |cx| {
		let (created, set_created) = cx.use_state("created", 0_i64);
		let (on_submit_log, on_cancel_log) = (Arc::clone(&log), Arc::clone(&log));
		let handlers = ModalHandlers::new()
			.on_submit(move |event| {
				let log = Arc::clone(&on_submit_log);
				let set_created = set_created.clone();
				async move {
					log.submits.fetch_add(1, Ordering::SeqCst);
					log.forms.lock().push(event.form);
					set_created.set(created + 1);
					Ok(())
				}
			})
			.on_cancel(move |_| {
				let log = Arc::clone(&on_cancel_log);
				async move {
					log.cancels.fetch_add(1, Ordering::SeqCst);
					Ok(())
				}
			});
		let launcher = cx.use_modal("new-task", task_modal(), handlers.clone());
		cx.use_modal("new-task", task_modal(), handlers);

		Home::new()
			.child(Section::new().text(format!("Created: {created}")))
			.child(Actions::new().child(Button::new("new").on_click(move |_| {
				let launcher = launcher.clone();
				async move {
					launcher.open(json!({"project": "dialog"})).await?;
					Ok(())
				}
			})))
			.into()
	})
}

fn submission(kind: &str, view_id: &str) -> InteractionPayload {
	payload(json!({
		"type": kind,
		"user": {"id": "U1"},
		"view": {
			"id": view_id,
			"state": {"values": {
				"b1": {"title": {"type": "plain_text_input", "value": "Ship it"}},
				"b2": {"tags": {
					"type": "checkboxes",
					"selected_options": [{"value": "a"}, {"value": "b"}],
				}},
				"b3": {"due": {"type": "datepicker", "selected_date": null}},
			}},
		},
	}))
}

async fn open_task_modal(dispatcher: &Dispatcher, client: &RecordingClient) -> String {
	dispatcher
		.dispatch(&payload(view_action("U1", "V-U1", button("new"))))
		.await
		.unwrap();
	let opened = client
		.calls()
		.into_iter()
		.find_map(|call| match call {
			Call::OpenModal { trigger_id, view } => Some((trigger_id, view)),
			_ => None,
		})
		.expect("modal opened");
	assert_eq!(opened.0, "T-1");
	assert_eq!(opened.1["notify_on_close"], json!(true));
	assert_eq!(opened.1["title"]["type"], json!("plain_text"));
	"VM1".to_string()
}

#[rstest]
#[tokio::test]
async fn test_modal_open_caches_linked_item() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	open_home(&dispatcher, tasks(Arc::default())).await;

	// Act
	let modal_id = open_task_modal(&dispatcher, &client).await;

	// Assert
	let modal = dispatcher.cache().get(&modal_id).unwrap();
	assert_eq!(modal.kind, SurfaceKind::Modal);
	assert_eq!(modal.name, "TaskModal");
	assert_eq!(modal.modal_key.as_deref(), Some("new-task"));
	assert_eq!(modal.invoker_key.as_deref(), Some("V-U1"));
	assert_eq!(modal.props["project"], json!("dialog"));
}

#[rstest]
#[tokio::test]
async fn test_modal_submission_runs_once_with_normalized_form() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	let log = Arc::new(ModalLog::default());
	open_home(&dispatcher, tasks(Arc::clone(&log))).await;
	let modal_id = open_task_modal(&dispatcher, &client).await;

	// Act
	dispatcher.dispatch(&submission("view_submission", &modal_id)).await.unwrap();

	// Assert
	assert_eq!(log.submits.load(Ordering::SeqCst), 1);
	assert_eq!(log.cancels.load(Ordering::SeqCst), 0);
	let forms = log.forms.lock();
	assert_eq!(forms[0]["title"], json!("Ship it"));
	assert_eq!(forms[0]["tags"], json!(["a", "b"]));
	assert_eq!(forms[0]["due"], Value::Null);
	let Some(Call::UpdateHome { view_id, view }) = client.last() else {
		panic!("expected the parent to be updated, got {:?}", client.calls());
	};
	assert_eq!(view_id, "V-U1");
	assert_eq!(block_text(&view, 0), Some("Created: 1"));
	let modal = dispatcher.cache().get(&modal_id).unwrap();
	assert!(modal.view["blocks"].is_array());
}

#[rstest]
#[tokio::test]
async fn test_view_closed_runs_cancel_handler() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	let log = Arc::new(ModalLog::default());
	open_home(&dispatcher, tasks(Arc::clone(&log))).await;
	let modal_id = open_task_modal(&dispatcher, &client).await;

	// Act
	dispatcher.dispatch(&submission("view_closed", &modal_id)).await.unwrap();

	// Assert
	assert_eq!(log.cancels.load(Ordering::SeqCst), 1);
	assert_eq!(log.submits.load(Ordering::SeqCst), 0);
	let parent = dispatcher.cache().get("V-U1").unwrap();
	assert_eq!(block_text(&parent.view, 0), Some("Created: 0"));
}

#[rstest]
#[tokio::test]
async fn test_submission_for_unknown_modal_fails() {
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	open_home(&dispatcher, tasks(Arc::default())).await;

	let err = dispatcher
		.dispatch(&submission("view_submission", "VM404"))
		.await
		.unwrap_err();

	assert_eq!(
		err.describe().and_then(|dialog| dialog.title.as_deref()),
		Some("Missing state")
	);
}

#[rstest]
#[tokio::test]
async fn test_submission_with_evicted_parent_fails() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	open_home(&dispatcher, tasks(Arc::default())).await;
	let modal_id = open_task_modal(&dispatcher, &client).await;
	dispatcher.cache().clear();
	let orphan = Item::new(SurfaceKind::Modal, modal_id.as_str(), "TaskModal")
		.with_modal("new-task", "V-U1");
	let modal = dispatcher.cache().set(&modal_id, orphan);

	// Act
	let err = dispatcher
		.dispatch(&submission("view_submission", &modal.id))
		.await
		.unwrap_err();

	// Assert
	assert!(matches!(err, DispatchError::MissingParent(_)));
}

fn poll() -> SharedSurface {
	surface("Poll", |_| {
		Message::new()
			.text("Lunch poll")
			.child(Section::new().text("Where to?"))
			.child(Actions::new().child(
				RadioButtons::new("place")
					.child(SelectOption::new("noodles").text("Noodles"))
					.child(SelectOption::new("tacos").text("Tacos").selected(true)),
			))
			.into()
	})
}

#[rstest]
#[tokio::test]
async fn test_message_post_and_update_by_channel_ts() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	let item = dispatcher.post_message(poll(), MessageOptions::new("C1")).await.unwrap();
	let key = format!("C1:{MESSAGE_TS}");

	// Act
	dispatcher
		.dispatch(&payload(json!({
			"type": "block_actions",
			"user": {"id": "U2"},
			"actions": [{
				"type": "radio_buttons",
				"action_id": "place",
				"selected_option": {"value": "noodles"},
			}],
			"container": {"type": "message", "channel_id": "C1", "message_ts": MESSAGE_TS},
		})))
		.await
		.unwrap();

	// Assert
	assert_eq!(item.id, "C1");
	assert_eq!(item.ts.as_deref(), Some(MESSAGE_TS));
	assert!(dispatcher.cache().get(&key).is_some());
	let Some(Call::UpdateMessage { channel, ts, message }) = client.last() else {
		panic!("expected a message update, got {:?}", client.calls());
	};
	assert_eq!((channel.as_str(), ts.as_str()), ("C1", MESSAGE_TS));
	assert_eq!(message["text"], json!("Lunch poll"));
	let radio = &message["blocks"][1]["elements"][0];
	assert_eq!(radio["initial_option"]["value"], json!("tacos"));
}

fn city_select(queries: Arc<Mutex<Vec<String>>>) -> Select {
	Select::external("city")
		.min_query_length(2)
		.on_search_options(move |event| {
			let queries = Arc::clone(&queries);
			async move {
				queries.lock().push(event.query.clone());
				Ok(vec![
					SelectOption::new("paris")
						.text("Paris")
						.url("https://example.test")
						.into(),
					Node::Empty,
				])
			}
		})
}

fn city_picker(queries: Arc<Mutex<Vec<String>>>) -> SharedSurface {
	surface("Cities", move |_| {
		Home::new()
			.child(
				Section::new()
					.text("Pick a city")
					.accessory(city_select(Arc::clone(&queries))),
			)
			.into()
	})
}

/// A city picker whose selection bumps a counter.
fn city_counter(queries: Arc<Mutex<Vec<String>>>, picks: Arc<AtomicUsize>) -> SharedSurface {
	surface("CityCounter", move |_| {
		let picks = Arc::clone(&picks);
		let select = city_select(Arc::clone(&queries)).on_select(move |event| {
			let picks = Arc::clone(&picks);
			async move {
				assert_eq!(event.selection, Selection::One("tokyo".into()));
				picks.fetch_add(1, Ordering::SeqCst);
				Ok(())
			}
		});
		Home::new()
			.child(Section::new().text("Pick a city").accessory(select))
			.into()
	})
}

#[rstest]
#[tokio::test]
async fn test_block_suggestion_returns_reconciled_options() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	let queries = Arc::new(Mutex::new(Vec::new()));
	open_home(&dispatcher, city_picker(Arc::clone(&queries))).await;

	// Act
	let response = dispatcher
		.dispatch(&payload(json!({
			"type": "block_suggestion",
			"user": {"id": "U1"},
			"action_id": "city",
			"value": "pa",
			"view": {"id": "V-U1"},
		})))
		.await
		.unwrap()
		.unwrap();

	// Assert
	assert_eq!(*queries.lock(), vec!["pa".to_string()]);
	let options = response["options"].as_array().unwrap();
	assert_eq!(options.len(), 1);
	assert_eq!(options[0]["value"], json!("paris"));
	assert_eq!(options[0]["text"]["text"], json!("Paris"));
	assert!(options[0].get("url").is_none());
}

#[rstest]
#[tokio::test]
async fn test_block_suggestion_without_handler_is_empty() {
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	open_home(&dispatcher, city_picker(Arc::default())).await;

	let response = dispatcher
		.dispatch(&payload(json!({
			"type": "block_suggestion",
			"user": {"id": "U1"},
			"action_id": "country",
			"value": "fr",
			"view": {"id": "V-U1"},
		})))
		.await
		.unwrap();

	assert_eq!(response, Some(json!({"options": []})));
}

#[rstest]
#[tokio::test]
async fn test_external_select_choice_runs_select_handler() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	let queries = Arc::new(Mutex::new(Vec::new()));
	let picks = Arc::new(AtomicUsize::new(0));
	open_home(&dispatcher, city_counter(Arc::clone(&queries), Arc::clone(&picks))).await;
	let choice = json!({
		"type": "external_select",
		"action_id": "city",
		"selected_option": {"value": "tokyo"},
	});

	// Act
	let response = dispatcher
		.dispatch(&payload(view_action("U1", "V-U1", choice)))
		.await
		.unwrap();

	// Assert
	assert_eq!(response, None);
	assert_eq!(picks.load(Ordering::SeqCst), 1);
	assert!(queries.lock().is_empty());
	assert!(matches!(client.last(), Some(Call::UpdateHome { .. })));
}

#[rstest]
#[tokio::test]
async fn test_shortcut_opens_registered_modal() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	dispatcher.register_shortcut("new_task", task_modal());

	// Act
	dispatcher
		.dispatch(&payload(json!({
			"type": "shortcut",
			"user": {"id": "U1"},
			"callback_id": "new_task",
			"trigger_id": "T-9",
		})))
		.await
		.unwrap();

	// Assert
	let Some(Call::OpenModal { trigger_id, view }) = client.last() else {
		panic!("expected a modal to open, got {:?}", client.calls());
	};
	assert_eq!(trigger_id, "T-9");
	assert_eq!(view["type"], json!("modal"));
	assert_eq!(view["blocks"].as_array().map(Vec::len), Some(3));
	let item = dispatcher.cache().get("VM1").unwrap();
	assert_eq!(item.kind, SurfaceKind::Modal);
	assert_eq!(item.name, "TaskModal");
	assert!(item.invoker_key.is_none());
}

fn tally_modal() -> SharedSurface {
	surface("Tally", |cx| {
		let (count, set_count) = cx.use_state("count", 0_i64);
		Modal::new("Tally")
			.child(Section::new().text(format!("Count: {count}")))
			.child(Actions::new().child(increment_button(count, set_count)))
			.into()
	})
}

fn shortcut_payload(callback_id: &str) -> InteractionPayload {
	payload(json!({
		"type": "shortcut",
		"user": {"id": "U1"},
		"callback_id": callback_id,
		"trigger_id": "T-9",
	}))
}

#[rstest]
#[tokio::test]
async fn test_shortcut_modal_handles_its_own_actions() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	dispatcher.register_shortcut("tally", tally_modal());
	dispatcher.dispatch(&shortcut_payload("tally")).await.unwrap();

	// Act
	dispatcher
		.dispatch(&payload(view_action("U1", "VM1", button("increment"))))
		.await
		.unwrap();

	// Assert
	let Some(Call::UpdateModal { view_id, view }) = client.last() else {
		panic!("expected a modal update, got {:?}", client.calls());
	};
	assert_eq!(view_id, "VM1");
	assert_eq!(block_text(&view, 0), Some("Count: 1"));
	assert!(view.get("notify_on_close").is_none());
	let item = dispatcher.cache().get("VM1").unwrap();
	assert_eq!(item.state.get("count"), Some(json!(1)));
}

#[rstest]
#[tokio::test]
async fn test_shortcut_modal_submission_has_no_parent() {
	// Arrange
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);
	dispatcher.register_shortcut("tally", tally_modal());
	dispatcher.dispatch(&shortcut_payload("tally")).await.unwrap();

	// Act
	let err = dispatcher
		.dispatch(&submission("view_submission", "VM1"))
		.await
		.unwrap_err();

	// Assert
	assert!(matches!(err, DispatchError::MissingParent(_)));
}

#[rstest]
#[tokio::test]
async fn test_unsupported_payload_is_ignored() {
	let client = RecordingClient::new();
	let dispatcher = dispatcher(&client);

	let result = dispatcher
		.dispatch(&payload(json!({"type": "message_action", "user": {"id": "U1"}})))
		.await;

	assert!(matches!(result, Ok(None)));
	assert!(client.calls().is_empty());
}
