//! Line-level editing of `KEY=VALUE` files.

fn matches_key(line: &str, key: &str) -> bool {
    line.strip_prefix(key).is_some_and(|rest| rest.starts_with('='))
}

/// Returns `contents` with every line starting with `KEY=` replaced by
/// `KEY=value  # comment`. Other lines keep their exact bytes, including their
/// line endings. When no line matches, the entry is appended.
pub fn rewrite_line(contents: &str, key: &str, value: &str, comment: Option<&str>) -> String {
    let replacement = match comment {
        Some(comment) => format!("{}={}  # {}\n", key, value, comment),
        None => format!("{}={}\n", key, value),
    };

    let mut output = String::with_capacity(contents.len() + replacement.len());
    let mut replaced = false;
    for line in contents.split_inclusive('\n') {
        if matches_key(line, key) {
            output.push_str(&replacement);
            replaced = true;
        } else {
            output.push_str(line);
        }
    }

    if !replaced {
        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(&replacement);
    }
    output
}

/// Reads the value of the first `KEY=` line, dropping an inline comment and quotes.
pub fn read_value(contents: &str, key: &str) -> Option<String> {
    contents
        .lines()
        .find(|line| matches_key(line, key))
        .map(|line| {
            let raw = &line[key.len() + 1..];
            let raw = match raw.find(" #") {
                Some(idx) => &raw[..idx],
                None => raw,
            };
            raw.trim().trim_matches('"').trim_matches('\'').to_string()
        })
}
