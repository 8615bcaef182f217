use crate::fetch::expand_url_alias;
use anyhow::{Context, Result};
use kahelo_container::{DeclaredFormat, StoreFormat, StoreProperties};
use std::path::Path;

/// Set the properties of the store at `store` and write its sidecar.
///
/// Fields not given keep their current values. URL template aliases are expanded.
pub fn describe(
	store: &Path,
	db_format: Option<StoreFormat>,
	tile_format: Option<DeclaredFormat>,
	url_template: Option<&str>,
) -> Result<StoreProperties> {
	let existing = StoreProperties::load(store)?;
	let url_template = url_template.map(expand_url_alias);
	let properties = StoreProperties::merged(existing, store, db_format, tile_format, url_template)?;
	if properties.tile_format.is_server() {
		properties
			.resolved_format()
			.context("tile format SERVER needs a url template ending with .jpg or .png")?;
	}
	properties.write(store)?;
	Ok(properties)
}

/// The properties as printed by `describe`.
pub fn display_properties(properties: &StoreProperties) -> String {
	[
		format!("db_name      {}", properties.db_name),
		format!("db_format    {}", properties.db_format),
		format!("tile_format  {}", properties.tile_format),
		format!("url_template {}", properties.url_template),
	]
	.join("\n")
}
