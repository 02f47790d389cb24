use std::cell::Cell;
use std::cmp::Ordering;
use std::rc::Rc;

use serde_json::Value;
use serde_json::json;

use crate::DataSource;
use crate::Event;
use crate::Release;
use crate::StringResult;
use crate::TagtreeResult;

/// One entered scope: the values iterated and the position in them.
struct Scope {
	items: Vec<(Option<String>, Value)>,
	index: usize,
}

impl Scope {
	fn current(&self) -> &Value {
		&self.items[self.index].1
	}

	fn key(&self) -> Option<&str> {
		self.items[self.index].0.as_deref()
	}
}

/// An in-memory data source over JSON values that records every lookup and
/// counts released values.
pub(crate) struct RecordingSource {
	scopes: Vec<Scope>,
	cursor: Option<Value>,
	pub lookups: Vec<String>,
	pub released: Rc<Cell<usize>>,
	pub comparable: bool,
}

impl RecordingSource {
	pub fn new(data: Value) -> Self {
		Self {
			scopes: vec![Scope {
				items: vec![(None, data)],
				index: 0,
			}],
			cursor: None,
			lookups: Vec::new(),
			released: Rc::new(Cell::new(0)),
			comparable: true,
		}
	}

	pub fn cursor(&self) -> Option<&Value> {
		self.cursor.as_ref()
	}

	pub fn depth(&self) -> usize {
		self.scopes.len() - 1
	}

	fn counted(&self, bytes: Vec<u8>) -> StringResult<'static> {
		let released = Rc::clone(&self.released);
		StringResult::owned(bytes).with_release(Release::Closure(Box::new(move |_| {
			released.set(released.get() + 1);
		})))
	}
}

fn child(value: &Value, key: &str) -> Option<Value> {
	match value {
		Value::Object(map) => map.get(key).cloned(),
		Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i).cloned()),
		_ => None,
	}
}

impl DataSource for RecordingSource {
	fn select(&mut self, key: Option<&str>) -> bool {
		self.lookups.push(format!("select:{}", key.unwrap_or(".")));
		let found = match key {
			None => self.scopes.last().map(|scope| scope.current().clone()),
			Some(key) => {
				self.scopes
					.iter()
					.rev()
					.find_map(|scope| child(scope.current(), key))
			}
		};

		match found {
			Some(value) => {
				self.cursor = Some(value);
				true
			}
			None => false,
		}
	}

	fn subselect(&mut self, key: &str) -> bool {
		self.lookups.push(format!("subselect:{key}"));
		match self.cursor.as_ref().and_then(|value| child(value, key)) {
			Some(value) => {
				self.cursor = Some(value);
				true
			}
			None => false,
		}
	}

	fn compare(&mut self, value: &str) -> Option<Ordering> {
		if !self.comparable {
			return None;
		}

		match self.cursor.as_ref()? {
			Value::Number(number) => {
				let left = number.as_f64()?;
				let right = value.trim().parse::<f64>().ok()?;
				left.partial_cmp(&right)
			}
			Value::String(text) => Some(text.as_str().cmp(value)),
			other => Some(other.to_string().as_str().cmp(value)),
		}
	}

	fn get(&mut self, object_iteration: bool) -> TagtreeResult<Option<StringResult<'_>>> {
		if object_iteration {
			let key = self.scopes.last().and_then(Scope::key).map(str::to_string);
			return Ok(key.map(|key| self.counted(key.into_bytes())));
		}

		let text = match self.cursor.as_ref() {
			Some(Value::String(text)) => text.clone(),
			Some(Value::Number(number)) => number.to_string(),
			Some(Value::Bool(flag)) => flag.to_string(),
			Some(Value::Null) => String::new(),
			_ => return Ok(None),
		};

		Ok(Some(self.counted(text.into_bytes())))
	}

	fn enter(&mut self, object_iteration: bool) -> TagtreeResult<bool> {
		let Some(value) = self.cursor.clone() else {
			return Ok(false);
		};

		let items: Vec<(Option<String>, Value)> = match value {
			Value::Object(map) if object_iteration => {
				map.into_iter().map(|(key, value)| (Some(key), value)).collect()
			}
			Value::Array(items) => items.into_iter().map(|value| (None, value)).collect(),
			Value::Null | Value::Bool(false) => Vec::new(),
			value => vec![(None, value)],
		};

		if items.is_empty() {
			return Ok(false);
		}

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

pub(crate) fn sample_data() -> Value {
	json!({
		"name": "World",
		"items": [{ "x": 1 }, { "x": 2 }],
		"a": { "b": { "c": 3 } },
		"count": 5,
		"flag": false,
		"html": "<a>&\"b\"",
		"map": { "first": 1, "second": 2 },
		"dotted.key": "escaped",
		"slash/key": "pointer",
	})
}

pub(crate) fn text(text: &str) -> Event {
	Event::Text {
		text: text.to_string(),
		escape: false,
	}
}

pub(crate) fn value(name: &str) -> Event {
	Event::Value {
		name: name.to_string(),
		escape: true,
	}
}

pub(crate) fn raw_value(name: &str) -> Event {
	Event::Value {
		name: name.to_string(),
		escape: false,
	}
}

pub(crate) fn enter(name: &str) -> Event {
	Event::Enter {
		name: name.to_string(),
		expected: true,
	}
}

pub(crate) fn enter_inverted(name: &str) -> Event {
	Event::Enter {
		name: name.to_string(),
		expected: false,
	}
}

pub(crate) fn leave(name: &str) -> Event {
	Event::Leave {
		name: name.to_string(),
	}
}

pub(crate) fn partial(name: &str) -> Event {
	Event::Partial {
		name: name.to_string(),
	}
}

/// `Hello {{name}}!{{#items}}<{{x}}>{{/items}}`
pub(crate) fn hello_items_events() -> Vec<Event> {
	vec![
		text("Hello "),
		value("name"),
		text("!"),
		enter("items"),
		text("<"),
		value("x"),
		text(">"),
		leave("items"),
	]
}
