//! Parsing shopping-list requests from their wire forms.
//!
//! The JSON body carries `{"ricette": [...], "persone": n}` and the query
//! form carries `ricette=a,b&persone=n`. The person count must be a whole
//! number in both; range checks (`>= 1`) happen in the builder.

use serde_json::Value;

use crate::error::ShoppingListError;

/// Which recipes to shop for, and for how many people.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListRequest {
    /// Opaque recipe identifiers. May contain duplicates; the builder
    /// collapses them.
    pub recipe_ids: Vec<String>,
    pub people: i64,
}

impl ShoppingListRequest {
    pub fn new<I, S>(recipe_ids: I, people: i64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            recipe_ids: recipe_ids.into_iter().map(Into::into).collect(),
            people,
        }
    }

    /// Build a request from a decoded JSON body.
    ///
    /// `persone` may be a JSON number or a numeric string; a missing or
    /// `null` value is rejected.
    pub fn from_json(recipe_ids: Vec<String>, people: &Value) -> Result<Self, ShoppingListError> {
        Ok(Self {
            recipe_ids,
            people: people_from_json(people)?,
        })
    }

    /// Build a request from query-string parameters (`ricette` is a
    /// comma-separated id list).
    pub fn from_query(recipe_ids: &str, people: &str) -> Result<Self, ShoppingListError> {
        let people = people_from_str(people)?;
        let recipe_ids = recipe_ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .collect();
        Ok(Self { recipe_ids, people })
    }
}

fn people_from_json(value: &Value) -> Result<i64, ShoppingListError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else {
                n.as_f64()
                    .and_then(whole_number)
                    .ok_or_else(not_whole)
            }
        }
        Value::String(s) => people_from_str(s),
        Value::Null => Err(ShoppingListError::validation("persone is required")),
        _ => Err(ShoppingListError::validation("persone must be a number")),
    }
}

fn people_from_str(raw: &str) -> Result<i64, ShoppingListError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ShoppingListError::validation("persone is required"));
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(i);
    }
    match raw.parse::<f64>() {
        Ok(f) => whole_number(f).ok_or_else(not_whole),
        Err(_) => Err(ShoppingListError::validation("persone must be a number")),
    }
}

/// `Some` for finite floats with no fractional part that fit in an `i64`.
fn whole_number(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

fn not_whole() -> ShoppingListError {
    ShoppingListError::validation("persone must be a whole number")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn is_validation(result: Result<ShoppingListRequest, ShoppingListError>) -> bool {
        matches!(result, Err(ShoppingListError::Validation(_)))
    }

    #[test]
    fn json_integer_people() {
        let req = ShoppingListRequest::from_json(vec!["a".into()], &json!(4)).unwrap();
        assert_eq!(req, ShoppingListRequest::new(["a"], 4));
    }

    #[test]
    fn json_whole_float_and_string_people() {
        let req = ShoppingListRequest::from_json(vec![], &json!(3.0)).unwrap();
        assert_eq!(req.people, 3);

        let req = ShoppingListRequest::from_json(vec![], &json!("5")).unwrap();
        assert_eq!(req.people, 5);
    }

    #[test]
    fn json_negative_people_parses_for_builder_to_reject() {
        let req = ShoppingListRequest::from_json(vec![], &json!(-3)).unwrap();
        assert_eq!(req.people, -3);
    }

    #[test]
    fn json_fractional_people_rejected() {
        assert!(is_validation(ShoppingListRequest::from_json(
            vec![],
            &json!(2.5)
        )));
        assert!(is_validation(ShoppingListRequest::from_json(
            vec![],
            &json!("2.5")
        )));
    }

    #[test]
    fn json_missing_or_wrong_type_people_rejected() {
        assert!(is_validation(ShoppingListRequest::from_json(
            vec![],
            &Value::Null
        )));
        assert!(is_validation(ShoppingListRequest::from_json(
            vec![],
            &json!(true)
        )));
        assert!(is_validation(ShoppingListRequest::from_json(
            vec![],
            &json!([2])
        )));
        assert!(is_validation(ShoppingListRequest::from_json(
            vec![],
            &json!("two")
        )));
    }

    #[test]
    fn query_splits_and_trims_ids() {
        let req = ShoppingListRequest::from_query(" a, b ,,c ", "2").unwrap();
        assert_eq!(req, ShoppingListRequest::new(["a", "b", "c"], 2));
    }

    #[test]
    fn query_empty_ids_yield_empty_list() {
        let req = ShoppingListRequest::from_query("", "2").unwrap();
        assert!(req.recipe_ids.is_empty());
    }

    #[test]
    fn query_people_must_be_numeric_and_whole() {
        assert!(is_validation(ShoppingListRequest::from_query("a", "")));
        assert!(is_validation(ShoppingListRequest::from_query("a", "abc")));
        assert!(is_validation(ShoppingListRequest::from_query("a", "1.5")));
        assert!(is_validation(ShoppingListRequest::from_query("a", "NaN")));
        assert!(is_validation(ShoppingListRequest::from_query("a", "inf")));
        assert_eq!(
            ShoppingListRequest::from_query("a", "2.0").unwrap().people,
            2
        );
    }
}
