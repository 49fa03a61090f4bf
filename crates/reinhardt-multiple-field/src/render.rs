//! Render cycle state
//!
//! Options are expensive to build (every related record is loaded), so one
//! render cycle builds them once and shares the result between the input
//! view, the filter and anything else asking for them. The cycle state lives
//! in a [`RenderContext`] scoped to one request, never on the field type.

use crate::attributes::HtmlAttributes;
use crate::config::Mode;
use crate::error::Result;
use crate::field_type::MultipleFieldType;
use crate::options::OptionMap;
use crate::record::RecordKey;
use serde::Serialize;
use tokio::sync::OnceCell;

/// Everything an input view needs to render a multiple field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputView {
	pub view: String,
	pub mode: Mode,
	pub options: OptionMap,
	pub selected: Vec<RecordKey>,
	pub attributes: HtmlAttributes,
}

/// Request-scoped render state of one field
pub struct RenderContext<'a> {
	field: &'a MultipleFieldType,
	options: OnceCell<OptionMap>,
}

impl<'a> RenderContext<'a> {
	pub fn new(field: &'a MultipleFieldType) -> Self {
		Self {
			field,
			options: OnceCell::new(),
		}
	}

	pub fn field(&self) -> &MultipleFieldType {
		self.field
	}

	/// Options of the field, built by the configured handler on first use
	pub async fn options(&self) -> Result<&OptionMap> {
		self.options
			.get_or_try_init(|| async {
				let name = self.field.config().handler();
				tracing::debug!(field = %self.field.field(), handler = name, "building options");
				let handler = self.field.handler_registry().get(name)?;
				handler.build_options(self.field).await
			})
			.await
	}

	/// Whether options were already built in this cycle
	pub fn has_options(&self) -> bool {
		self.options.initialized()
	}

	/// Bundle options, selection and attributes for the input view
	pub async fn input_view(&self, overrides: HtmlAttributes) -> Result<InputView> {
		let options = self.options().await?.clone();
		let attributes = self.field.attributes(overrides).await?;

		Ok(InputView {
			view: self.field.input_view(),
			mode: self.field.config().mode(),
			options,
			selected: self.field.ids(),
			attributes,
		})
	}
}
