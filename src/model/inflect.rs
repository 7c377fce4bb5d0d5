//! Minimal English inflections for association defaults and display names.

use itertools::Itertools;

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "news",
];

// (singular, plural)
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("zombie", "zombies"),
];

// (plural, singular) whole words
const SINGULAR_WORDS: &[(&str, &str)] = &[
    ("oxen", "ox"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("axes", "axis"),
];

// (plural suffix, singular suffix), tried in order before the -ies/-ves rules
const SINGULAR_SUFFIXES: &[(&str, &str)] = &[
    ("databases", "database"),
    ("quizzes", "quiz"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("indices", "index"),
    ("aliases", "alias"),
    ("alias", "alias"),
    ("statuses", "status"),
    ("status", "status"),
    ("octopi", "octopus"),
    ("octopus", "octopus"),
    ("viri", "virus"),
    ("virus", "virus"),
    ("crises", "crisis"),
    ("crisis", "crisis"),
    ("testes", "testis"),
    ("testis", "testis"),
    ("shoes", "shoe"),
    ("oes", "o"),
    ("buses", "bus"),
    ("bus", "bus"),
    ("xes", "x"),
    ("ches", "ch"),
    ("sses", "ss"),
    ("shes", "sh"),
    ("movies", "movie"),
    ("series", "series"),
];

// Stems whose `-ses` plural singularizes to `-sis`
const SIS_STEMS: &[&str] = &["analy", "ba", "diagno", "parenthe", "progno", "synop", "the"];

/// `line_item` -> `LineItem`
pub fn camelize(word: &str) -> String {
    word.split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .join("")
}

/// `line_item_id` -> `Line item`
pub fn humanize(word: &str) -> String {
    let word = word.strip_suffix("_id").unwrap_or(word);
    let spaced = word.replace('_', " ").trim().to_lowercase();
    capitalize(&spaced)
}

pub fn pluralize(word: &str) -> String {
    let (head, last) = split_last_word(word);
    if UNCOUNTABLE.contains(&last.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == last) {
        return format!("{}{}", head, plural);
    }

    let plural = if last.ends_with('y') && !ends_with_vowel_y(&last) {
        format!("{}ies", &last[..last.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|s| last.ends_with(s)) {
        format!("{}es", last)
    } else {
        format!("{}s", last)
    };
    format!("{}{}", head, plural)
}

pub fn singularize(word: &str) -> String {
    let (head, last) = split_last_word(word);
    if UNCOUNTABLE.contains(&last.as_str()) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == last) {
        return format!("{}{}", head, singular);
    }

    format!("{}{}", head, singular_form(&last))
}

fn singular_form(word: &str) -> String {
    if let Some((_, singular)) = SINGULAR_WORDS.iter().find(|(plural, _)| *plural == word) {
        return singular.to_string();
    }
    if let Some((plural, singular)) = SINGULAR_SUFFIXES
        .iter()
        .find(|(plural, _)| word.ends_with(plural))
    {
        return format!("{}{}", &word[..word.len() - plural.len()], singular);
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if stem.ends_with("qu") || stem.chars().last().is_some_and(is_consonant) {
            return format!("{}y", stem);
        }
    }
    if let Some(stem) = word.strip_suffix("ves") {
        if stem.ends_with("ti") || stem.ends_with("hi") {
            return format!("{}ve", stem);
        }
        match stem.chars().last() {
            Some('l' | 'r') => return format!("{}f", stem),
            Some(c) if c != 'f' => return format!("{}fe", stem),
            _ => {}
        }
    }
    for stem in SIS_STEMS {
        if word.ends_with(&format!("{}ses", stem)) || word.ends_with(&format!("{}sis", stem)) {
            return format!("{}sis", &word[..word.len() - 3]);
        }
    }
    if let Some(stem) = word.strip_suffix('a') {
        if stem.ends_with('t') || stem.ends_with('i') {
            return format!("{}um", stem);
        }
    }

    if word.ends_with("news") || word.ends_with("ss") {
        word.to_string()
    } else {
        word.strip_suffix('s').unwrap_or(word).to_string()
    }
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn ends_with_vowel_y(word: &str) -> bool {
    let mut rev = word.chars().rev();
    rev.next();
    matches!(rev.next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

// Inflect only the last underscore-separated word: `order_line_item` keeps `order_line_`.
fn split_last_word(word: &str) -> (&str, String) {
    match word.rfind('_') {
        Some(pos) => (&word[..=pos], word[pos + 1..].to_string()),
        None => ("", word.to_string()),
    }
}
