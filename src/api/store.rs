//! In-memory document store backing the core CRUD handler
//!
//! Documents are JSON objects. Attributes holding an object or a list of
//! objects are relations (media, components, dynamic zones): they are left
//! out of responses unless the query populates them.

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::query::Query;
use crate::error::ApiError;

pub type Document = Map<String, Value>;

const DEFAULT_PAGE_SIZE: usize = 25;
const MAX_PAGE_SIZE: usize = 100;

/// Keys returned whatever `fields` selects
const ALWAYS_KEPT: [&str; 3] = ["id", "documentId", "__component"];

/// Keys callers cannot set through `create`/`update`
const RESERVED: [&str; 2] = ["id", "documentId"];

#[derive(Debug, Default)]
struct Inner {
    documents: Vec<Document>,
    next_id: u64,
}

/// Documents of one content type
#[derive(Debug, Default)]
pub struct DocumentStore {
    inner: RwLock<Inner>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from seed documents; missing ids and timestamps are filled in
    pub fn with_documents(documents: Vec<Value>) -> Result<Self> {
        let store = Self::new();
        {
            let mut inner = store
                .inner
                .write()
                .map_err(|_| anyhow::anyhow!("document store lock poisoned"))?;
            for (index, document) in documents.into_iter().enumerate() {
                let Value::Object(document) = document else {
                    anyhow::bail!("Seed document #{} is not an object", index);
                };
                inner.insert(document);
            }
        }
        Ok(store)
    }

    /// Load seed documents from a JSON file holding an array (or `{ "data": [...] }`)
    pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse seed file: {}", path.display()))?;

        let documents = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => items,
                _ => anyhow::bail!("Seed file must hold an array of documents"),
            },
            _ => anyhow::bail!("Seed file must hold an array of documents"),
        };

        let count = documents.len();
        let store = Self::with_documents(documents)?;
        tracing::info!("Loaded {} documents from {:?}", count, path);
        Ok(store)
    }

    pub fn len(&self) -> Result<usize, ApiError> {
        Ok(self.read()?.documents.len())
    }

    pub fn is_empty(&self) -> Result<bool, ApiError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, ApiError> {
        self.inner
            .read()
            .map_err(|_| ApiError::Internal("document store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, ApiError> {
        self.inner
            .write()
            .map_err(|_| ApiError::Internal("document store lock poisoned".to_string()))
    }

    /// List documents: sort, paginate, select fields and populate relations
    pub fn find(&self, query: &Query) -> Result<Value, ApiError> {
        let (page, page_size) = pagination(query)?;
        let sort = sort_keys(query.get("sort"))?;
        let shape = Shape::from_query(query)?;

        let inner = self.read()?;
        let mut documents: Vec<&Document> = inner.documents.iter().collect();
        if !sort.is_empty() {
            documents.sort_by(|a, b| compare_documents(a, b, &sort));
        }

        let total = documents.len();
        let page_count = total.div_ceil(page_size);
        let data = documents
            .into_iter()
            .skip(page.saturating_sub(1).saturating_mul(page_size))
            .take(page_size)
            .map(|doc| shape.apply(doc).map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(json!({
            "data": data,
            "meta": {
                "pagination": {
                    "page": page,
                    "pageSize": page_size,
                    "pageCount": page_count,
                    "total": total,
                }
            }
        }))
    }

    /// Fetch one document by `documentId` or numeric `id`
    pub fn find_one(&self, id: &str, query: &Query) -> Result<Value, ApiError> {
        let shape = Shape::from_query(query)?;
        let inner = self.read()?;
        let document = inner.get(id).ok_or(ApiError::NotFound)?;
        Ok(json!({ "data": shape.apply(document)?, "meta": {} }))
    }

    /// Create a document from a `{ "data": {...} }` body
    pub fn create(&self, body: Option<Value>, query: &Query) -> Result<Value, ApiError> {
        let shape = Shape::from_query(query)?;
        let mut attributes = body_data(body)?;
        attributes.retain(|key, _| !RESERVED.contains(&key.as_str()));

        let mut inner = self.write()?;
        let document = inner.insert(attributes);
        tracing::debug!("Created document {}", document["documentId"]);
        Ok(json!({ "data": shape.apply(document)?, "meta": {} }))
    }

    /// Shallow-merge a `{ "data": {...} }` body into an existing document
    pub fn update(&self, id: &str, body: Option<Value>, query: &Query) -> Result<Value, ApiError> {
        let shape = Shape::from_query(query)?;
        let attributes = body_data(body)?;

        let mut inner = self.write()?;
        let document = inner.get_mut(id).ok_or(ApiError::NotFound)?;
        for (key, value) in attributes {
            if !RESERVED.contains(&key.as_str()) {
                document.insert(key, value);
            }
        }
        document.insert("updatedAt".to_string(), json!(now()));
        Ok(json!({ "data": shape.apply(document)?, "meta": {} }))
    }

    pub fn delete(&self, id: &str) -> Result<(), ApiError> {
        let mut inner = self.write()?;
        let index = inner
            .documents
            .iter()
            .position(|doc| matches_id(doc, id))
            .ok_or(ApiError::NotFound)?;
        inner.documents.remove(index);
        Ok(())
    }
}

impl Inner {
    fn insert(&mut self, mut document: Document) -> &Document {
        let id = match document.get("id").and_then(Value::as_u64) {
            Some(id) => id,
            None => self.next_id + 1,
        };
        self.next_id = self.next_id.max(id);

        document.insert("id".to_string(), json!(id));
        if !matches!(document.get("documentId"), Some(Value::String(_))) {
            document.insert("documentId".to_string(), json!(document_id(id)));
        }
        let timestamp = now();
        for key in ["createdAt", "updatedAt", "publishedAt"] {
            if !document.contains_key(key) {
                document.insert(key.to_string(), json!(timestamp));
            }
        }

        self.documents.push(document);
        &self.documents[self.documents.len() - 1]
    }

    fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| matches_id(doc, id))
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Document> {
        self.documents.iter_mut().find(|doc| matches_id(doc, id))
    }
}

fn matches_id(document: &Document, id: &str) -> bool {
    match (document.get("documentId"), document.get("id")) {
        (Some(Value::String(doc_id)), _) if doc_id == id => true,
        (_, Some(Value::Number(n))) => n.to_string() == id,
        _ => false,
    }
}

fn document_id(id: u64) -> String {
    format!("{:0>24}", format!("{:x}", id))
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn body_data(body: Option<Value>) -> Result<Document, ApiError> {
    let missing = || ApiError::BadRequest("Missing \"data\" payload in the request body".to_string());
    let Some(Value::Object(mut body)) = body else {
        return Err(missing());
    };
    match body.remove("data") {
        Some(Value::Object(data)) => Ok(data),
        _ => Err(missing()),
    }
}

fn pagination(query: &Query) -> Result<(usize, usize), ApiError> {
    let Some(pagination) = query.get("pagination") else {
        return Ok((1, DEFAULT_PAGE_SIZE));
    };
    let Value::Object(pagination) = pagination else {
        return Err(ApiError::BadRequest("Invalid pagination".to_string()));
    };

    let page = match pagination.get("page") {
        Some(value) => positive_int(value, "pagination[page]")?,
        None => 1,
    };
    let page_size = match pagination.get("pageSize") {
        Some(value) => positive_int(value, "pagination[pageSize]")?.min(MAX_PAGE_SIZE),
        None => DEFAULT_PAGE_SIZE,
    };
    Ok((page, page_size))
}

fn positive_int(value: &Value, name: &str) -> Result<usize, ApiError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n > 0 => Ok(n),
        _ => Err(ApiError::BadRequest(format!(
            "{} must be a positive integer",
            name
        ))),
    }
}

/// `sort=title`, `sort=title:desc,id`, `sort[0]=title:asc`
fn sort_keys(sort: Option<&Value>) -> Result<Vec<(String, bool)>, ApiError> {
    let Some(sort) = sort else {
        return Ok(Vec::new());
    };

    string_list(sort, "sort")?
        .into_iter()
        .map(|entry| {
            let (field, order) = entry.split_once(':').unwrap_or((entry.as_str(), "asc"));
            let descending = match order.to_ascii_lowercase().as_str() {
                "asc" => false,
                "desc" => true,
                other => {
                    return Err(ApiError::BadRequest(format!(
                        "Invalid sort order: {}",
                        other
                    )))
                }
            };
            Ok((field.to_string(), descending))
        })
        .collect()
}

fn compare_documents(a: &Document, b: &Document, keys: &[(String, bool)]) -> Ordering {
    for (field, descending) in keys {
        let ordering = compare_values(a.get(field), b.get(field));
        let ordering = if *descending {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Missing and null values sort last
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

/// A string, a comma-separated string, or a list of strings
fn string_list(value: &Value, name: &str) -> Result<Vec<String>, ApiError> {
    match value {
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(ApiError::BadRequest(format!("Invalid {} value", name))),
            })
            .collect(),
        _ => Err(ApiError::BadRequest(format!("Invalid {} value", name))),
    }
}

fn is_relation(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => !items.is_empty() && items.iter().all(Value::is_object),
        _ => false,
    }
}

/// `true`, `"true"` and `"*"` populate everything one level deep
fn is_populate_all(value: &Value) -> bool {
    matches!(value, Value::Bool(true)) || matches!(value.as_str(), Some("true" | "*"))
}

fn is_populate_none(value: &Value) -> bool {
    matches!(value, Value::Bool(false) | Value::Null) || value.as_str() == Some("false")
}

/// Field selection and population for one level of a document
#[derive(Debug, Default)]
struct Shape<'q> {
    fields: Option<Vec<String>>,
    populate: Option<&'q Value>,
    on: Option<&'q Map<String, Value>>,
}

impl<'q> Shape<'q> {
    fn from_query(query: &'q Query) -> Result<Self, ApiError> {
        Self::from_config(query.get("fields"), query.get("populate"), None)
    }

    /// Shape described by a per-relation config such as `{ fields, populate, on }`
    fn from_relation_config(config: &'q Value) -> Result<Self, ApiError> {
        if is_populate_all(config) {
            return Ok(Self {
                populate: None,
                ..Default::default()
            });
        }
        let Value::Object(config) = config else {
            return Err(ApiError::BadRequest(format!(
                "Invalid populate config: {}",
                config
            )));
        };

        let on = match config.get("on") {
            Some(Value::Object(on)) => Some(on),
            Some(_) => return Err(ApiError::BadRequest("Invalid populate `on`".to_string())),
            None => None,
        };
        Self::from_config(config.get("fields"), config.get("populate"), on)
    }

    fn from_config(
        fields: Option<&Value>,
        populate: Option<&'q Value>,
        on: Option<&'q Map<String, Value>>,
    ) -> Result<Self, ApiError> {
        let fields = fields.map(|f| string_list(f, "fields")).transpose()?;
        Ok(Self {
            fields,
            populate,
            on,
        })
    }

    fn keeps_scalar(&self, key: &str) -> bool {
        match &self.fields {
            Some(fields) => ALWAYS_KEPT.contains(&key) || fields.iter().any(|f| f == key),
            None => true,
        }
    }

    fn apply(&self, document: &Document) -> Result<Document, ApiError> {
        let mut shaped = Document::new();

        for (key, value) in document {
            if !is_relation(value) && self.keeps_scalar(key) {
                shaped.insert(key.clone(), value.clone());
            }
        }

        let Some(populate) = self.populate else {
            return Ok(shaped);
        };

        if is_populate_none(populate) {
            return Ok(shaped);
        }

        if is_populate_all(populate) {
            for (key, value) in document {
                if is_relation(value) {
                    shaped.insert(key.clone(), Shape::default().apply_value(value)?);
                }
            }
            return Ok(shaped);
        }

        match populate {
            Value::Object(configs) => {
                for (key, config) in configs {
                    if is_populate_none(config) {
                        continue;
                    }
                    if let Some(value) = document.get(key) {
                        let shape = Shape::from_relation_config(config)?;
                        shaped.insert(key.clone(), shape.apply_value(value)?);
                    }
                }
            }
            other => {
                for key in string_list(other, "populate")? {
                    if let Some(value) = document.get(&key) {
                        shaped.insert(key, Shape::default().apply_value(value)?);
                    }
                }
            }
        }

        Ok(shaped)
    }

    fn apply_value(&self, value: &Value) -> Result<Value, ApiError> {
        match value {
            Value::Object(object) => self.apply(object).map(Value::Object),
            Value::Array(items) => items
                .iter()
                .map(|item| match (item, self.on) {
                    (Value::Object(object), Some(on)) => {
                        self.apply_component(object, on).map(Value::Object)
                    }
                    (Value::Object(object), None) => self.apply(object).map(Value::Object),
                    (other, _) => Ok(other.clone()),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    /// Dynamic-zone entry: pick the config registered for its `__component`
    fn apply_component(
        &self,
        component: &Document,
        on: &Map<String, Value>,
    ) -> Result<Document, ApiError> {
        let config = component
            .get("__component")
            .and_then(Value::as_str)
            .and_then(|name| on.get(name));

        match config {
            Some(config) => Shape::from_relation_config(config)?.apply(component),
            None => Shape::default().apply(component),
        }
    }
}
