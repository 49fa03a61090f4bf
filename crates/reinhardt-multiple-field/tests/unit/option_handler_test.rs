//! Unit tests for the related option handler
//!
//! Covers plain columns, templates, the projection fallback and error
//! propagation from the related source.

use crate::fixtures::{cache, sources, tags_field};
use reinhardt_multiple_field::handler::{OptionHandler, RelatedHandler};
use reinhardt_multiple_field::{
	FieldConfig, InMemoryOptionCache, MemorySource, MultipleFieldError, Record, RecordKey,
	SourceRegistry,
};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

fn labels(options: &reinhardt_multiple_field::OptionMap) -> Vec<(RecordKey, String)> {
	options
		.iter()
		.map(|(key, label)| (key.clone(), label.to_string()))
		.collect()
}

/// Test a plain title column labels every option
#[rstest]
#[tokio::test]
async fn test_plain_title_column(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let field = tags_field(
		FieldConfig::new().with_related("tags").with_title_name("slug"),
		sources,
		cache,
	);

	// Act
	let options = RelatedHandler.build_options(&field).await.unwrap();

	// Assert
	assert_eq!(
		labels(&options),
		vec![
			(RecordKey::Int(1), "rust".to_string()),
			(RecordKey::Int(2), "go".to_string()),
			(RecordKey::Int(3), "zig".to_string()),
		]
	);
}

/// Test title templates are evaluated for every option
#[rstest]
#[case("#{entry.name}", "#Rust")]
#[case("{entry.name} ({entry.slug})", "Rust (rust)")]
#[case("{name}", "Rust")]
#[tokio::test]
async fn test_title_template(
	sources: Arc<SourceRegistry>,
	cache: InMemoryOptionCache,
	#[case] title: &str,
	#[case] expected: &str,
) {
	// Arrange
	let field = tags_field(
		FieldConfig::new().with_related("tags").with_title_name(title),
		sources,
		cache,
	);

	// Act
	let options = RelatedHandler.build_options(&field).await.unwrap();

	// Assert
	assert_eq!(options.get(&RecordKey::Int(1)), Some(expected));
	assert_eq!(options.len(), 3);
}

/// Test key and title default to the source's columns
#[rstest]
#[tokio::test]
async fn test_defaults_come_from_source(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let field = tags_field(FieldConfig::new().with_related("tags"), sources, cache);

	// Act
	let options = RelatedHandler.build_options(&field).await.unwrap();

	// Assert
	assert_eq!(options.get(&RecordKey::Int(2)), Some("Go"));
}

/// Test one failing row switches every label to the title column
#[rstest]
#[tokio::test]
async fn test_failed_template_projects_every_row(cache: InMemoryOptionCache) {
	// Arrange
	// Only the second record lacks the templated column
	let registry = SourceRegistry::new();
	registry.register(Arc::new(
		MemorySource::new("tags", "blog_tags")
			.with_title_column("name")
			.with_records(vec![
				Record::from_value(json!({"id": 1, "name": "Rust", "summary": "systems"}))
					.unwrap(),
				Record::from_value(json!({"id": 2, "name": "Go"})).unwrap(),
			]),
	));
	let field = tags_field(
		FieldConfig::new()
			.with_related("tags")
			.with_title_name("{entry.summary}"),
		Arc::new(registry),
		cache,
	);

	// Act
	let options = RelatedHandler.build_options(&field).await.unwrap();

	// Assert
	assert_eq!(
		labels(&options),
		vec![
			(RecordKey::Int(1), "Rust".to_string()),
			(RecordKey::Int(2), "Go".to_string()),
		]
	);
}

/// Test a missing title column falls back to the source's title column
#[rstest]
#[tokio::test]
async fn test_missing_plain_column_falls_back(
	sources: Arc<SourceRegistry>,
	cache: InMemoryOptionCache,
) {
	// Arrange
	let field = tags_field(
		FieldConfig::new()
			.with_related("tags")
			.with_title_name("headline"),
		sources,
		cache,
	);

	// Act
	let options = RelatedHandler.build_options(&field).await.unwrap();

	// Assert
	assert_eq!(options.get(&RecordKey::Int(3)), Some("Zig"));
}

/// Test an empty source gives no options
#[rstest]
#[tokio::test]
async fn test_empty_source_gives_empty_map(cache: InMemoryOptionCache) {
	// Arrange
	let registry = SourceRegistry::new();
	registry.register(Arc::new(MemorySource::new("tags", "blog_tags")));
	let field = tags_field(
		FieldConfig::new().with_related("tags"),
		Arc::new(registry),
		cache,
	);

	// Act
	let options = RelatedHandler.build_options(&field).await.unwrap();

	// Assert
	assert!(options.is_empty());
}

/// Test duplicate keys keep the last label
#[rstest]
#[tokio::test]
async fn test_duplicate_keys_keep_last_label(cache: InMemoryOptionCache) {
	// Arrange
	let registry = SourceRegistry::new();
	registry.register(Arc::new(
		MemorySource::new("tags", "blog_tags")
			.with_title_column("name")
			.with_records(vec![
				Record::from_value(json!({"id": 1, "name": "first"})).unwrap(),
				Record::from_value(json!({"id": 2, "name": "second"})).unwrap(),
				Record::from_value(json!({"id": 1, "name": "again"})).unwrap(),
			]),
	));
	let field = tags_field(
		FieldConfig::new().with_related("tags"),
		Arc::new(registry),
		cache,
	);

	// Act
	let options = RelatedHandler.build_options(&field).await.unwrap();

	// Assert
	assert_eq!(options.len(), 2);
	assert_eq!(options.get(&RecordKey::Int(1)), Some("again"));
	assert_eq!(options.keys().next(), Some(&RecordKey::Int(1)));
}

/// Test options keyed by a configured column
#[rstest]
#[tokio::test]
async fn test_custom_key_name(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let field = tags_field(
		FieldConfig::new()
			.with_related("tags")
			.with_key_name("slug")
			.with_title_name("name"),
		sources,
		cache,
	);

	// Act
	let options = RelatedHandler.build_options(&field).await.unwrap();

	// Assert
	assert_eq!(options.get(&RecordKey::from("zig")), Some("Zig"));
	assert!(!options.contains_key(&RecordKey::Int(3)));
}

/// Test options from a stream source
#[rstest]
#[tokio::test]
async fn test_stream_reference(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let field = tags_field(
		FieldConfig::new().with_related("blog.categories"),
		sources,
		cache,
	);

	// Act
	let options = RelatedHandler.build_options(&field).await.unwrap();

	// Assert
	assert_eq!(options.get(&RecordKey::Int(11)), Some("Guides"));
}

/// Test a failing source query is returned to the caller
#[rstest]
#[tokio::test]
async fn test_source_failure_propagates(
	sources: Arc<SourceRegistry>,
	cache: InMemoryOptionCache,
) {
	// Arrange
	let field = tags_field(FieldConfig::new().with_related("broken"), sources, cache);

	// Act
	let err = RelatedHandler.build_options(&field).await.unwrap_err();

	// Assert
	assert!(matches!(err, MultipleFieldError::Source(message) if message == "connection refused"));
}

/// Test an unregistered related source is a configuration error
#[rstest]
#[tokio::test]
async fn test_unknown_related_source(sources: Arc<SourceRegistry>, cache: InMemoryOptionCache) {
	// Arrange
	let field = tags_field(FieldConfig::new().with_related("authors"), sources, cache);

	// Act
	let err = RelatedHandler.build_options(&field).await.unwrap_err();

	// Assert
	assert!(matches!(err, MultipleFieldError::UnknownRelated(name) if name == "authors"));
}
