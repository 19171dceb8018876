//! Naming helpers: class to table names, column to method names, and the
//! human-readable column names used in validation messages.

/// Converts `CamelCase` or `mixedCase` to `under_score` notation
pub fn underscorize(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).map_or(false, |c| c.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if i > 0 && (prev_lower || (prev_upper && next_lower)) && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else if *ch == ' ' || *ch == '-' {
            if !result.ends_with('_') {
                result.push('_');
            }
        } else {
            result.push(*ch);
        }
    }
    result
}

/// Converts `under_score` notation to `CamelCase` (`upper == true`) or
/// `camelCase`
pub fn camelize(name: &str, upper: bool) -> String {
    let mut result = String::with_capacity(name.len());
    for (i, part) in name.split('_').filter(|p| !p.is_empty()).enumerate() {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            if i == 0 && !upper {
                result.extend(first.to_lowercase());
            } else {
                result.extend(first.to_uppercase());
            }
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Makes a column name readable: `first_name` becomes `First Name`
pub fn humanize(name: &str) -> String {
    underscorize(name)
        .split('_')
        .filter(|p| !p.is_empty())
        .map(|word| match word {
            "id" => "ID".to_string(),
            "url" => "URL".to_string(),
            _ => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pluralizes the last word of an `under_score` name
pub fn pluralize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with("ss")
        || lower.ends_with("sh")
        || lower.ends_with("ch")
        || lower.ends_with('x')
        || lower.ends_with('z')
    {
        return format!("{}es", name);
    }
    if lower.ends_with('s') {
        return name.to_string();
    }
    if lower.ends_with('y') {
        let before = lower.chars().rev().nth(1);
        if !matches!(before, Some('a' | 'e' | 'i' | 'o' | 'u')) {
            return format!("{}ies", &name[..name.len() - 1]);
        }
    }
    format!("{}s", name)
}

/// Default table name for a class: `UserAccount` maps to `user_accounts`
pub fn tablize(class: &str) -> String {
    pluralize(&underscorize(class))
}
