//! Component builders grouped by Block Kit layer.

/// Implements `From<T> for Node`, child appenders and prop mapping for builders
/// wrapping an `element` field.
macro_rules! component {
	($ty:ident) => {
		impl From<$ty> for dialog_core::Node {
			fn from(component: $ty) -> Self {
				component.element.into()
			}
		}

		impl $ty {
			#[allow(dead_code)]
			fn map_props(
				mut self,
				f: impl FnOnce(dialog_core::Props) -> dialog_core::Props,
			) -> Self {
				let props = std::mem::take(self.element.props_mut());
				*self.element.props_mut() = f(props);
				self
			}
		}
	};
	($ty:ident, children) => {
		$crate::components::component!($ty);

		impl $ty {
			/// Appends a child.
			pub fn child(mut self, child: impl Into<dialog_core::Node>) -> Self {
				self.element = self.element.with_child(child);
				self
			}

			/// Appends several children.
			pub fn children<I, N>(mut self, children: I) -> Self
			where
				I: IntoIterator<Item = N>,
				N: Into<dialog_core::Node>,
			{
				self.element = self.element.with_children(children);
				self
			}
		}
	};
}

pub(crate) use component;

mod blocks;
mod composition;
mod elements;
mod surfaces;

pub use blocks::{Actions, Context, Divider, Image, Input, Section};
pub use composition::{Confirm, OptionGroup, SelectOption, Text};
pub use elements::{
	Button, Checkboxes, ConversationFilter, DatePicker, Overflow, RadioButtons, Select, SelectKind,
	TextField,
};
pub use surfaces::{Home, Message, Modal};

use dialog_core::instance::{Instance, PLAIN_TEXT};
use dialog_core::{Construct, ConstructionError, Node, Props};

/// Slot holding copies of an option-bearing component's children.
pub(crate) const OPTIONS_SLOT: &str = "options";

/// Reconciles a slot and forces the result to plain text.
pub(crate) fn plain_slot(
	props: &Props,
	cx: &mut Construct<'_, '_>,
	key: &str,
) -> Result<Option<Instance>, ConstructionError> {
	Ok(cx.reconcile(props.slot(key))?.map(|mut text| {
		text.set_tag(PLAIN_TEXT);
		text.remove("verbatim");
		text
	}))
}

/// The selected options among an element's option children, `url` removed.
///
/// The children are reconciled inside a section so that several options and
/// groups can be collected in one pass.
pub(crate) fn selected_options(
	props: &Props,
	cx: &mut Construct<'_, '_>,
) -> Result<Vec<Instance>, ConstructionError> {
	let Some(options) = props.slot(OPTIONS_SLOT) else {
		return Ok(Vec::new());
	};
	let probe: Node = Section::new().child(options.clone()).into();
	let Some(section) = cx.reconcile(Some(&probe))? else {
		return Ok(Vec::new());
	};
	Ok(section
		.list("fields")
		.unwrap_or_default()
		.iter()
		.flat_map(|item| {
			if item.is_option_group() {
				item.list("options").unwrap_or_default().to_vec()
			} else {
				vec![item.clone()]
			}
		})
		.filter(Instance::is_selected)
		.map(|mut option| {
			option.remove("url");
			option
		})
		.collect())
}
