use bkstg_ai_api::catalog::DEFAULT_NS;

use std::collections::BTreeMap;
use std::collections::BTreeSet;

/*
 * How positional arguments are matched against `metadata.tags` when they
 * are used as tags.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagMatch {

    /* the entity's tag set must equal the requested set */
    Exact,

    /* the entity must carry every requested tag, possibly more */
    Subset,
}

impl TagMatch {

    pub fn from_flags(use_params_as_tags: bool, use_any_subset: bool) -> Option<TagMatch> {
	match (use_params_as_tags, use_any_subset) {
	    (false, _) => None,
	    (true, false) => Some(TagMatch::Exact),
	    (true, true) => Some(TagMatch::Subset),
	}
    }
}

/*
 * Builds the by-query `filter` value for a kind/type pair.
 *
 * The catalog can test whether an array contains a value, so a subset
 * match is pushed to the server as one `metadata.tags=` condition per tag.
 * It has no way to say "this array equals", an exact match is therefore
 * left to `tags_match` once the items are back.
 */
pub fn filter_value(kind: &str, spec_type: &str, tags: &[String], mode: Option<TagMatch>) -> String {
    let mut filter = format!("kind={},spec.type={}", kind, spec_type);
    if mode == Some(TagMatch::Subset) {
	for tag in tags {
	    filter.push_str(",metadata.tags=");
	    filter.push_str(tag);
	}
    }
    filter
}

/*
 * Client side tag comparison. Order and duplicates are irrelevant on both
 * sides.
 */
pub fn tags_match(requested: &[String], tags: &[String], mode: TagMatch) -> bool {
    let requested: BTreeSet<&str> = requested.iter().map(String::as_str).collect();
    let tags: BTreeSet<&str> = tags.iter().map(String::as_str).collect();

    match mode {
	TagMatch::Exact => requested == tags,
	TagMatch::Subset => requested.is_subset(&tags),
    }
}

/*
 * Groups `namespace:name` arguments by namespace. A bare name belongs to
 * the default namespace; only the first ':' separates.
 */
pub fn build_keys(args: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut keys: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for arg in args {
	let (namespace, name) = match arg.split_once(':') {
	    Some((ns, name)) if !ns.is_empty() => (ns.to_string(), name.to_string()),
	    Some((_, name)) => (DEFAULT_NS.to_string(), name.to_string()),
	    None => (DEFAULT_NS.to_string(), arg.clone()),
	};
	keys.entry(namespace).or_default().push(name);
    }
    keys
}
