use std::io;

use serde_json::Value;

const FILTER_KEYS: [(&str, &str); 3] = [
    ("customer_type", "Customer type"),
    ("salesperson", "Salesperson"),
    ("segment", "Segment"),
];

pub fn render_filters(data: &Value) -> io::Result<String> {
    let mut lines = vec!["Filter options:".to_string()];
    for (key, heading) in FILTER_KEYS {
        let options = data
            .get(key)
            .and_then(Value::as_array)
            .ok_or_else(|| io::Error::other(format!("filters output requires {key}")))?;

        lines.push(String::new());
        lines.push(format!("{heading} ({}):", options.len()));
        lines.extend(
            options
                .iter()
                .filter_map(Value::as_str)
                .map(|option| format!("  {option}")),
        );
    }
    Ok(lines.join("\n"))
}
