//! Case conversion and English inflection for generated names.

use convert_case::{Case, Casing};

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("ox", "oxen"),
    ("leaf", "leaves"),
    ("knife", "knives"),
    ("life", "lives"),
];

const UNCOUNTABLE: &[&str] = &[
    "info",
    "information",
    "data",
    "metadata",
    "equipment",
    "series",
    "species",
    "news",
    "sheep",
    "fish",
    "feedback",
];

pub fn snake(name: &str) -> String {
    name.to_case(Case::Snake)
}

pub fn camel(name: &str) -> String {
    name.to_case(Case::Camel)
}

pub fn pascal(name: &str) -> String {
    name.to_case(Case::Pascal)
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Pluralize one lowercase word.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(s, _)| *s == word) {
        return plural.to_string();
    }
    if IRREGULAR.iter().any(|(_, p)| *p == word) {
        return word.to_string();
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}ies");
        }
    }
    format!("{word}s")
}

/// Singularize one lowercase word.
pub fn singularize(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, p)| *p == word) {
        return singular.to_string();
    }
    if IRREGULAR.iter().any(|(s, _)| *s == word) {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    if ["sses", "shes", "ches", "xes", "zes", "tuses"]
        .iter()
        .any(|s| word.ends_with(s))
    {
        return word[..word.len() - 2].to_string();
    }
    if word.ends_with("ss") || word.ends_with("us") {
        return word.to_string();
    }
    word.strip_suffix('s').unwrap_or(word).to_string()
}

/// Apply `inflect` to the last snake-case token of `name`.
fn inflect_last(name: &str, inflect: fn(&str) -> String) -> String {
    let snake = snake(name);
    match snake.rsplit_once('_') {
        Some((head, last)) => format!("{head}_{}", inflect(last)),
        None => inflect(&snake),
    }
}

/// Relational table name: pluralized snake case (`Person` → `people`).
pub fn table_name(model: &str) -> String {
    inflect_last(model, pluralize)
}

/// Singular PascalCase form of a (possibly plural) name
/// (`Addresses` → `Address`).
pub fn singular_pascal(name: &str) -> String {
    pascal(&inflect_last(name, singularize))
}
