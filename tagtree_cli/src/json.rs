use std::cmp::Ordering;

use float_cmp::approx_eq;
use serde_json::Value;
use tagtree_core::DataSource;
use tagtree_core::StringResult;
use tagtree_core::TagtreeResult;

/// An entered section: the values it iterates and the current position.
#[derive(Debug)]
struct Scope<'a> {
	/// Property name (under object iteration) and value of each iteration.
	items: Vec<(Option<&'a str>, &'a Value)>,
	index: usize,
}

impl<'a> Scope<'a> {
	fn single(value: &'a Value) -> Self {
		Self {
			items: vec![(None, value)],
			index: 0,
		}
	}

	fn current(&self) -> &'a Value {
		self.items[self.index].1
	}

	fn key(&self) -> Option<&'a str> {
		self.items[self.index].0
	}
}

/// A [`DataSource`] over a JSON document.
///
/// Names are looked up in the innermost section scope first, then in each
/// enclosing scope out to the document root.
#[derive(Debug)]
pub struct JsonSource<'a> {
	scopes: Vec<Scope<'a>>,
	cursor: Option<&'a Value>,
}

impl<'a> JsonSource<'a> {
	pub fn new(data: &'a Value) -> Self {
		Self {
			scopes: vec![Scope::single(data)],
			cursor: None,
		}
	}

	/// Number of sections currently entered.
	pub fn depth(&self) -> usize {
		self.scopes.len() - 1
	}

	/// The value under the cursor after the last successful selection.
	pub fn cursor(&self) -> Option<&'a Value> {
		self.cursor
	}
}

fn child<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
	match value {
		Value::Object(map) => map.get(key),
		Value::Array(items) => key.parse::<usize>().ok().and_then(|index| items.get(index)),
		_ => None,
	}
}

fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null | Value::Bool(false) => false,
		Value::String(text) => !text.is_empty(),
		Value::Array(items) => !items.is_empty(),
		_ => true,
	}
}

impl DataSource for JsonSource<'_> {
	fn select(&mut self, key: Option<&str>) -> bool {
		let found = match key {
			None => self.scopes.last().map(Scope::current),
			Some(key) => {
				self.scopes
					.iter()
					.rev()
					.find_map(|scope| child(scope.current(), key))
			}
		};

		if found.is_some() {
			self.cursor = found;
		}
		found.is_some()
	}

	fn subselect(&mut self, key: &str) -> bool {
		let found = self.cursor.and_then(|value| child(value, key));
		if found.is_some() {
			self.cursor = found;
		}
		found.is_some()
	}

	fn compare(&mut self, value: &str) -> Option<Ordering> {
		match self.cursor? {
			Value::Number(number) => {
				let left = number.as_f64()?;
				let right = value.trim().parse::<f64>().ok()?;
				if approx_eq!(f64, left, right) {
					Some(Ordering::Equal)
				} else {
					left.partial_cmp(&right)
				}
			}
			Value::String(text) => Some(text.as_str().cmp(value)),
			Value::Bool(flag) => Some(flag.to_string().as_str().cmp(value)),
			Value::Null => Some("".cmp(value)),
			Value::Array(_) | Value::Object(_) => None,
		}
	}

	fn get(&mut self, object_iteration: bool) -> TagtreeResult<Option<StringResult<'_>>> {
		if object_iteration {
			let key = self.scopes.last().and_then(Scope::key);
			return Ok(key.map(|key| StringResult::borrowed(key.as_bytes())));
		}

		let value = match self.cursor {
			Some(Value::String(text)) => StringResult::borrowed(text.as_bytes()),
			Some(Value::Number(number)) => StringResult::owned(number.to_string()),
			Some(Value::Bool(flag)) => StringResult::owned(flag.to_string()),
			Some(Value::Null) => StringResult::empty(),
			Some(Value::Array(_) | Value::Object(_)) | None => return Ok(None),
		};

		Ok(Some(value))
	}

	fn enter(&mut self, object_iteration: bool) -> TagtreeResult<bool> {
		let Some(value) = self.cursor else {
			return Ok(false);
		};

		let items: Vec<(Option<&str>, &Value)> = match value {
			Value::Object(map) if object_iteration => {
				map.iter().map(|(key, value)| (Some(key.as_str()), value)).collect()
			}
			Value::Array(items) => items.iter().map(|value| (None, value)).collect(),
			value if is_truthy(value) => vec![(None, value)],
			_ => Vec::new(),
		};

		if items.is_empty() {
			return Ok(false);
		}

		tracing::trace!(iterations = items.len(), object_iteration, "entered scope");
		self.scopes.push(Scope { items, index: 0 });
		Ok(true)
	}

	fn next(&mut self) -> TagtreeResult<bool> {
		let Some(scope) = self.scopes.last_mut() else {
			return Ok(false);
		};
		if scope.index + 1 < scope.items.len() {
			scope.index += 1;
			return Ok(true);
		}

		Ok(false)
	}

	fn leave(&mut self) -> TagtreeResult<()> {
		if self.scopes.len() > 1 {
			self.scopes.pop();
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;
	use serde_json::json;
	use similar_asserts::assert_eq;
	use tagtree_core::Extensions;
	use tagtree_core::Selection;
	use tagtree_core::resolve;

	use super::*;

	fn data() -> Value {
		json!({
			"name": "Ada",
			"age": 36,
			"ratio": 0.5,
			"tags": ["a", "b"],
			"empty": [],
			"blank": "",
			"nothing": null,
			"user": { "name": "Grace", "langs": { "cobol": 1959, "flowmatic": 1955 } },
		})
	}

	#[rstest]
	#[case::string("name", Some("Ada"))]
	#[case::number("age", Some("36"))]
	#[case::float("ratio", Some("0.5"))]
	#[case::null("nothing", Some(""))]
	#[case::nested("user.name", Some("Grace"))]
	#[case::index("tags.1", Some("b"))]
	#[case::pointer("/user/langs/cobol", Some("1959"))]
	#[case::object("user", None)]
	#[case::missing("missing", None)]
	fn get_values(#[case] name: &str, #[case] expected: Option<&str>) -> TagtreeResult<()> {
		let data = data();
		let mut source = JsonSource::new(&data);

		let selection = resolve(&mut source, name, Extensions::ALL)?;
		let value = if selection.is_found() {
			source
				.get(false)?
				.map(|value| value.to_string_lossy().into_owned())
		} else {
			None
		};
		assert_eq!(value.as_deref(), expected);

		Ok(())
	}

	#[rstest]
	#[case::number_equal("age=36", true)]
	#[case::number_text("age=36.0", true)]
	#[case::number_lower("age<40", true)]
	#[case::number_greater("age>40", false)]
	#[case::string("name=Ada", true)]
	#[case::string_order("name<Bob", true)]
	#[case::negated("name=!Ada", false)]
	#[case::object("user=x", false)]
	fn compare_values(#[case] name: &str, #[case] found: bool) -> TagtreeResult<()> {
		let data = data();
		let mut source = JsonSource::new(&data);
		assert_eq!(resolve(&mut source, name, Extensions::ALL)?.is_found(), found);

		Ok(())
	}

	#[test]
	fn inner_scopes_shadow_outer_ones() -> TagtreeResult<()> {
		let data = data();
		let mut source = JsonSource::new(&data);

		assert!(source.select(Some("user")));
		assert!(source.enter(false)?);
		assert!(source.select(Some("name")));
		assert_eq!(source.cursor(), Some(&json!("Grace")));
		assert!(source.select(Some("age")));
		assert_eq!(source.cursor(), Some(&json!(36)));

		source.leave()?;
		assert!(source.select(Some("name")));
		assert_eq!(source.cursor(), Some(&json!("Ada")));

		Ok(())
	}

	#[test]
	fn iterate_object_properties() -> TagtreeResult<()> {
		let data = data();
		let mut source = JsonSource::new(&data);

		let selection = resolve(&mut source, "user.langs.*", Extensions::ALL)?;
		assert_eq!(selection, Selection::FoundViaObjectIteration);
		assert!(source.enter(true)?);

		let mut keys = Vec::new();
		loop {
			let key = source.get(true)?.map(|key| key.to_string_lossy().into_owned());
			keys.extend(key);
			if !source.next()? {
				break;
			}
		}
		source.leave()?;

		assert_eq!(keys, vec!["cobol", "flowmatic"]);
		assert_eq!(source.depth(), 0);

		Ok(())
	}

	#[rstest]
	#[case::array("tags", true)]
	#[case::empty_array("empty", false)]
	#[case::blank("blank", false)]
	#[case::null("nothing", false)]
	#[case::object("user", true)]
	fn enter_truthy_values(#[case] name: &str, #[case] entered: bool) -> TagtreeResult<()> {
		let data = data();
		let mut source = JsonSource::new(&data);

		assert!(source.select(Some(name)));
		assert_eq!(source.enter(false)?, entered);
		assert_eq!(source.depth(), usize::from(entered));

		Ok(())
	}
}
