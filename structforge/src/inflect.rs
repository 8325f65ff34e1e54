//! Naming helpers for deriving singular, plural and class-style names from
//! snake_case table names.

use heck::ToPascalCase;

/// Naive singularization of English table names.
/// e.g. "writers" -> "writer", "categories" -> "category"
pub fn singularize(word: &str) -> String {
    let w = word.to_lowercase();
    if w.ends_with("ies") {
        format!("{}y", &w[..w.len() - 3])
    } else if w.ends_with("ses") || w.ends_with("xes") || w.ends_with("zes") {
        w[..w.len() - 2].to_string()
    } else if w.ends_with("ves") {
        format!("{}f", &w[..w.len() - 3])
    } else if w.ends_with('s') && !w.ends_with("ss") {
        w[..w.len() - 1].to_string()
    } else {
        w
    }
}

/// Naive pluralization, the inverse of [`singularize`].
/// e.g. "writer" -> "writers", "category" -> "categories"
pub fn pluralize(word: &str) -> String {
    let w = word.to_lowercase();
    if w.ends_with('s') {
        return w;
    }
    if w.ends_with('y') {
        let stem = &w[..w.len() - 1];
        let penultimate = stem.chars().last().unwrap_or('a');
        if !matches!(penultimate, 'a' | 'e' | 'i' | 'o' | 'u') {
            return format!("{stem}ies");
        }
    }
    if w.ends_with('x') || w.ends_with('z') || w.ends_with("ch") || w.ends_with("sh") {
        return format!("{w}es");
    }
    format!("{w}s")
}

/// Class-style name for an underscored word.
/// e.g. "stats_snapshots" -> "StatsSnapshots", "writer" -> "Writer"
pub fn classify(word: &str) -> String {
    word.to_pascal_case()
}

/// Class-style name for one record of a table: classify the singular.
/// e.g. "stats_snapshots" -> "StatsSnapshot"
pub fn type_class_name(table_name: &str) -> String {
    classify(&singularize(table_name))
}

/// Human-readable form of a table name, with underscores replaced by spaces.
pub fn humanize(word: &str) -> String {
    word.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("writers"), "writer");
        assert_eq!(singularize("books"), "book");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("stats_snapshots"), "stats_snapshot");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("writer"), "writers");
        assert_eq!(pluralize("book"), "books");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("day"), "days");
        // Already-plural names pass through, so association names may be
        // given in either form.
        assert_eq!(pluralize("writers"), "writers");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("writer"), "Writer");
        assert_eq!(classify("stats_snapshot"), "StatsSnapshot");
    }

    #[test]
    fn test_type_class_name() {
        assert_eq!(type_class_name("writers"), "Writer");
        assert_eq!(type_class_name("stats_snapshots"), "StatsSnapshot");
        assert_eq!(type_class_name("position_tail_entries"), "PositionTailEntry");
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("stats_snapshot"), "stats snapshot");
    }
}
