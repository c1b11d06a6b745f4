use serde_json::Value;

use super::{cell, result_of};

/// The headline figure of each calculator family.
const PRIORITY_KEYS: [&str; 4] = [
    "net_income",
    "corporate_tax",
    "monthly_payment",
    "payment_amount",
];

/// Print just the key answer value from the output.
///
/// Looks for the headline field of each calculator family, then falls back
/// to the first field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = result_of(value);

    if let Value::Object(map) = result_obj {
        if let Some(val) = PRIORITY_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|val| !val.is_null())
        {
            return cell(val);
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, cell(val));
        }
    }

    cell(result_obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headline_field_wins() {
        let value = json!({ "result": { "gross_income": "60000", "net_income": "45357.40" } });
        assert_eq!(minimal_line(&value), "45357.40");
    }

    #[test]
    fn test_falls_back_to_first_field() {
        let value = json!({ "result": { "alpha": "1" } });
        assert_eq!(minimal_line(&value), "alpha: 1");
    }
}
