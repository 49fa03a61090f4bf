//! Unit tests for MultipleFieldType
//!
//! Covers selection parsing, rules, form handling, attributes and the
//! value table.

use async_trait::async_trait;
use crate::fixtures::{TestForm, cache, post_entry, sources, tag_records, tags_field};
use reinhardt_multiple_field::rules::validate_selection;
use reinhardt_multiple_field::value_table::{TableContext, ValueTable, ValueTableRegistry};
use reinhardt_multiple_field::{
	Entry, FieldConfig, FieldValue, HtmlAttributes, InMemoryOptionCache, Mode, MultipleFieldError,
	RecordKey, Result, Rule, SourceRegistry,
};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn keys(values: &[&str]) -> Vec<RecordKey> {
	values.iter().map(|value| RecordKey::from(*value)).collect()
}

/// Test submitted lists and joined strings parse into keys
#[rstest]
#[case(json!("a,b,,c"), keys(&["a", "b", "c"]))]
#[case(json!(" 3 , 1,2 "), keys(&["3", "1", "2"]))]
#[case(json!("4,0,5"), keys(&["4", "5"]))]
#[case(json!(""), vec![])]
#[case(json!(["a", "", "b"]), keys(&["a", "b"]))]
#[case(json!([3, 0, null, 1]), vec![RecordKey::Int(3), RecordKey::Int(1)])]
#[case(json!([]), vec![])]
#[case(Value::Null, vec![])]
fn test_post_value(
	sources: Arc<SourceRegistry>,
	cache: InMemoryOptionCache,
	#[case] post: Value,
	#[case] expected: Vec<RecordKey>,
) {
	// Arrange
	let field = tags_field(FieldConfig::new().with_related("tags"), sources, cache).with_post(post);

	// Act & Assert
	assert_eq!(field.post_value(), expected);
}

/// Test no submission gives an empty selection
#[rstest]
fn test_post_value_without_submission(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let field = tags_field(FieldConfig::new().with_related("tags"), sources, cache);

	// Act & Assert
	assert!(field.post_value().is_empty());
}

/// Test ids follow the order of loaded records
#[rstest]
fn test_ids_follow_loaded_records(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let records = tag_records();
	let loaded = vec![records[2].clone(), records[0].clone(), records[1].clone()];
	let field = tags_field(FieldConfig::new().with_related("tags"), sources, cache)
		.with_value(FieldValue::Records(loaded));

	// Act
	let ids = field.ids();

	// Assert
	assert_eq!(
		ids,
		vec![RecordKey::Int(3), RecordKey::Int(1), RecordKey::Int(2)]
	);
}

/// Test ids read from the entry drop empty keys
#[rstest]
fn test_ids_read_from_entry(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let entry = post_entry().with_value("tags", FieldValue::from_value(json!([5, "", 0, "7"])));
	let field = reinhardt_multiple_field::MultipleFieldType::new(
		"tags",
		FieldConfig::new().with_related("tags"),
		sources,
		Arc::new(cache),
	)
	.with_entry(Arc::new(entry));

	// Act & Assert
	assert_eq!(field.ids(), vec![RecordKey::Int(5), RecordKey::from("7")]);
}

/// Test a field without a value has no ids
#[rstest]
fn test_ids_without_value(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let field = tags_field(FieldConfig::new().with_related("tags"), sources, cache);

	// Act & Assert
	assert!(field.ids().is_empty());
}

/// Test configured bounds become `min`/`max` rules
#[rstest]
fn test_rules_with_bounds(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let field = tags_field(
		FieldConfig::new().with_related("tags").with_min(1).with_max(5),
		sources,
		cache,
	);

	// Act
	let rules = field.rules();

	// Assert
	assert_eq!(rules, vec![Rule::Array, Rule::Min(1), Rule::Max(5)]);
	assert_eq!(
		rules.iter().map(ToString::to_string).collect::<Vec<_>>(),
		vec!["array", "min:1", "max:5"]
	);
}

/// Test unbounded fields only carry the `array` rule
#[rstest]
fn test_rules_without_bounds(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let field = tags_field(FieldConfig::new().with_related("tags"), sources, cache);

	// Act & Assert
	assert_eq!(field.rules(), vec![Rule::Array]);
}

/// Test zero bounds count as unset
#[rstest]
fn test_zero_bounds_are_unset(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let field = tags_field(
		FieldConfig::new().with_related("tags").with_min(0).with_max(0),
		sources,
		cache,
	);

	// Act & Assert
	assert_eq!(field.rules(), vec![Rule::Array]);
}

/// Test submitted selections against required and bound rules
#[rstest]
#[case(json!("1"), 1)]
#[case(json!("1,2,3"), 1)]
#[case(json!("1,2"), 0)]
#[case(json!(""), 2)]
fn test_submitted_selection_against_rules(
	sources: Arc<SourceRegistry>,
	cache: InMemoryOptionCache,
	#[case] post: Value,
	#[case] violations: usize,
) {
	// Arrange
	let field = tags_field(
		FieldConfig::new()
			.with_related("tags")
			.with_required(true)
			.with_min(2)
			.with_max(2),
		sources,
		cache,
	)
	.with_post(post);

	// Act
	let count = field.post_value().len();

	// Assert
	assert_eq!(validate_selection(&field.rules(), count).len(), violations);
}

/// Test handling a submission assigns the keys to the entry
#[rstest]
fn test_handle_assigns_selection_to_entry(
	sources: Arc<SourceRegistry>,
	cache: InMemoryOptionCache,
) {
	// Arrange
	let field = tags_field(FieldConfig::new().with_related("tags"), sources, cache)
		.with_post(json!("3,1,,2"));
	let mut form = TestForm::new();

	// Act
	field.handle(&mut form);

	// Assert
	assert_eq!(
		form.entry.field_value("tags"),
		Some(FieldValue::from_value(json!(["3", "1", "2"])))
	);
}

/// Test an empty submission clears the selection
#[rstest]
fn test_handle_empty_submission_clears_selection(
	sources: Arc<SourceRegistry>,
	cache: InMemoryOptionCache,
) {
	// Arrange
	let field = tags_field(FieldConfig::new().with_related("tags"), sources, cache)
		.with_post(json!([]));
	let mut form = TestForm::new();

	// Act
	field.handle(&mut form);

	// Assert
	assert_eq!(form.entry.field_value("tags"), Some(FieldValue::Keys(vec![])));
}

/// Test computed attributes for a dropdown input
#[rstest]
#[tokio::test]
async fn test_attributes(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let field = tags_field(
		FieldConfig::new()
			.with_related("tags")
			.with_mode(Mode::Dropdown),
		sources,
		cache,
	);

	// Act
	let attributes = field.attributes(HtmlAttributes::new()).await.unwrap();

	// Assert
	assert_eq!(attributes.get("id"), Some(&json!("tags")));
	assert_eq!(attributes.get("name"), Some(&json!("tags[]")));
	assert_eq!(
		attributes.get("class"),
		Some(&json!("custom-select form-control"))
	);
	assert_eq!(
		attributes.get("data-key"),
		Some(&json!(field.key().await.unwrap()))
	);
	assert!(!attributes.contains("required"));
	assert!(!attributes.contains("data-placeholder"));
}

/// Test override attributes win and falsy values are dropped
#[rstest]
#[tokio::test]
async fn test_attribute_overrides_win(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let field = tags_field(
		FieldConfig::new()
			.with_related("tags")
			.with_required(true)
			.with_placeholder("Pick tags"),
		sources,
		cache,
	)
	.with_prefix("post_");
	let overrides = HtmlAttributes::new()
		.with("name", "custom[]")
		.with("data-sortable", true)
		.with("required", false);

	// Act
	let attributes = field.attributes(overrides).await.unwrap();

	// Assert
	assert_eq!(attributes.get("id"), Some(&json!("post_tags")));
	assert_eq!(attributes.get("name"), Some(&json!("custom[]")));
	assert_eq!(attributes.get("data-sortable"), Some(&json!(true)));
	assert_eq!(attributes.get("data-placeholder"), Some(&json!("Pick tags")));
	assert!(!attributes.contains("required"));
	assert!(!attributes.contains("class"));
}

/// Test the table renders the current selection in order
#[rstest]
#[tokio::test]
async fn test_table_renders_selection(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let field = tags_field(FieldConfig::new().with_related("tags"), sources, cache)
		.with_value(FieldValue::from_keys([RecordKey::Int(3), RecordKey::Int(1)]));

	// Act
	let html = field.table().await.unwrap();

	// Assert
	let zig = html.find("<td>Zig</td>").unwrap();
	let rust = html.find("<td>Rust</td>").unwrap();
	assert!(zig < rust);
	assert!(!html.contains("<td>Go</td>"));
}

struct KeysTable;

#[async_trait]
impl ValueTable for KeysTable {
	async fn render(&self, context: &TableContext) -> Result<String> {
		Ok(context
			.selected
			.iter()
			.map(ToString::to_string)
			.collect::<Vec<_>>()
			.join("|"))
	}
}

/// Test the configured value table component is used
#[rstest]
#[tokio::test]
async fn test_table_uses_configured_component(
	sources: Arc<SourceRegistry>,
	cache: InMemoryOptionCache,
) {
	// Arrange
	let mut tables = ValueTableRegistry::new();
	tables.register("keys", Arc::new(KeysTable));
	let field = tags_field(
		FieldConfig::new()
			.with_related("tags")
			.with_value_table("keys"),
		sources,
		cache,
	)
	.with_value_tables(tables)
	.with_value(FieldValue::from_keys([RecordKey::Int(2), RecordKey::Int(1)]));

	// Act
	let rendered = field.table().await.unwrap();

	// Assert
	assert_eq!(rendered, "2|1");
}

/// Test an unregistered value table is a configuration error
#[rstest]
#[tokio::test]
async fn test_table_with_unknown_component(
	sources: Arc<SourceRegistry>,
	cache: InMemoryOptionCache,
) {
	// Arrange
	let field = tags_field(
		FieldConfig::new()
			.with_related("tags")
			.with_value_table("missing"),
		sources,
		cache,
	);

	// Act
	let err = field.table().await.unwrap_err();

	// Assert
	assert!(matches!(err, MultipleFieldError::UnknownValueTable(_)));
}

/// Test the input view bundles options, selection and attributes
#[rstest]
#[tokio::test]
async fn test_input_view_bundles_selection(
	sources: Arc<SourceRegistry>,
	cache: InMemoryOptionCache,
) {
	// Arrange
	let field = tags_field(FieldConfig::new().with_related("tags"), sources, cache)
		.with_value(FieldValue::from_keys([RecordKey::Int(2)]));

	// Act
	let view = field
		.render_context()
		.input_view(HtmlAttributes::new())
		.await
		.unwrap();

	// Assert
	assert_eq!(view.view, "reinhardt.field_type.multiple::tags");
	assert_eq!(view.mode, Mode::Tags);
	assert_eq!(view.selected, vec![RecordKey::Int(2)]);
	assert_eq!(
		view.options.to_choices()[0],
		("1".to_string(), "Rust".to_string())
	);
	assert_eq!(view.attributes.get("name"), Some(&json!("tags[]")));
}
