//! Tile server URL templates.
//!
//! `{x}`, `{y}`, `{z}` and `{zoom}` are replaced by the tile coordinates. An
//! alternation such as `[abc]` is replaced by one of its characters, picked at
//! random for every request, to spread the load over mirror servers.

use anyhow::{Result, ensure};
use kahelo_core::TileCoord;
use rand::{Rng, seq::IndexedRandom};
use regex::Regex;
use std::ops::Range;

const ALIASES: [(&str, &str); 2] = [
	("OpenStreetMap", "http://[abc].tile.openstreetmap.org/{z}/{x}/{y}.png"),
	("MapQuest", "http://otile[1234].mqcdn.com/tiles/1.0.0/osm/{z}/{x}/{y}.jpg"),
];

/// Expand a known server name to its template; other text is returned unchanged.
#[must_use]
pub fn expand_url_alias(template: &str) -> String {
	ALIASES
		.iter()
		.find(|(name, _)| *name == template)
		.map_or(template, |(_, url)| url)
		.to_string()
}

#[derive(Clone, Debug)]
pub struct UrlTemplate {
	template: String,
	alternation: Option<(Range<usize>, Vec<char>)>,
}

impl UrlTemplate {
	pub fn new(template: &str) -> Result<UrlTemplate> {
		let template = template.trim();
		ensure!(!template.is_empty(), "unknown server url template, use describe to supply it");

		let re = Regex::new(r"\[(.*)\]")?;
		let alternation = re
			.captures(template)
			.and_then(|captures| Some((captures.get(0)?.range(), captures.get(1)?.as_str().chars().collect::<Vec<_>>())));
		if let Some((_, choices)) = &alternation {
			ensure!(!choices.is_empty(), "empty alternation [] in url template '{template}'");
		}

		Ok(UrlTemplate {
			template: template.to_string(),
			alternation,
		})
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.template
	}

	/// URL of `coord`, picking mirrors with the thread local generator.
	#[must_use]
	pub fn url(&self, coord: &TileCoord) -> String {
		self.url_with(coord, &mut rand::rng())
	}

	pub fn url_with<R: Rng + ?Sized>(&self, coord: &TileCoord, rng: &mut R) -> String {
		let mut url = match &self.alternation {
			Some((range, choices)) => {
				let pick = choices.choose(rng).copied().unwrap_or_default();
				let mut url = self.template.clone();
				url.replace_range(range.clone(), &pick.to_string());
				url
			}
			None => self.template.clone(),
		};
		for (key, value) in [
			("{x}", coord.x.to_string()),
			("{y}", coord.y.to_string()),
			("{z}", coord.zoom.to_string()),
			("{zoom}", coord.zoom.to_string()),
		] {
			url = url.replace(key, &value);
		}
		url
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{SeedableRng, rngs::StdRng};
	use rstest::rstest;

	fn coord() -> TileCoord {
		TileCoord::new(12, 4070, 2723).unwrap()
	}

	#[rstest]
	#[case("http://host/{z}/{x}/{y}.png", "http://host/12/4070/2723.png")]
	#[case("http://host/{zoom}/{x}/{y}.jpg", "http://host/12/4070/2723.jpg")]
	#[case("http://host/tiles?x={x}&y={y}&z={z}", "http://host/tiles?x=4070&y=2723&z=12")]
	fn placeholders(#[case] template: &str, #[case] url: &str) {
		assert_eq!(UrlTemplate::new(template).unwrap().url(&coord()), url);
	}

	#[test]
	fn alternation_picks_one_mirror() {
		let template = UrlTemplate::new(&expand_url_alias("OpenStreetMap")).unwrap();
		let mut rng = StdRng::seed_from_u64(7);
		let mut seen = std::collections::BTreeSet::new();
		for _ in 0..64 {
			let url = template.url_with(&coord(), &mut rng);
			let host = url.trim_start_matches("http://").split('.').next().unwrap().to_string();
			assert!(["a", "b", "c"].contains(&host.as_str()), "{url}");
			assert!(url.ends_with(".tile.openstreetmap.org/12/4070/2723.png"));
			seen.insert(host);
		}
		assert_eq!(seen.len(), 3);
	}

	#[test]
	fn aliases() {
		assert_eq!(
			expand_url_alias("MapQuest"),
			"http://otile[1234].mqcdn.com/tiles/1.0.0/osm/{z}/{x}/{y}.jpg"
		);
		assert_eq!(expand_url_alias("http://x/{z}/{x}/{y}.png"), "http://x/{z}/{x}/{y}.png");
	}

	#[rstest]
	#[case("")]
	#[case("   ")]
	#[case("http://[]/{z}/{x}/{y}.png")]
	fn invalid_templates(#[case] template: &str) {
		assert!(UrlTemplate::new(template).is_err());
	}
}
