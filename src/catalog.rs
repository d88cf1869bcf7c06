//! Static course / level / section catalog. Order matters: keyboards are
//! built by iterating these slices.

pub const COURSES: &[(&str, &str)] = &[
    ("english", "🇬🇧 Ingliz tili"),
    ("german", "🇩🇪 Nemis tili"),
    ("math", "🧮 Matematika"),
    ("uzbek", "🇺🇿 Ona tili"),
    ("history", "📜 Tarix"),
    ("biology", "🧬 Biologiya"),
    ("chemistry", "⚗️ Kimyo"),
];

pub const COURSES_WITH_LEVEL: &[&str] = &["english", "german"];

pub const LEVELS: &[(&str, &str)] = &[
    ("A1", "A1 • Beginner"),
    ("A2", "A2 • Elementary"),
    ("B1", "B1 • Intermediate"),
    ("B2", "B2 • Upper-Intermediate"),
    ("C1", "C1 • Advanced"),
    ("C2", "C2 • Proficient"),
];

const SECTIONS_ENGLISH: &[(&str, &str)] = &[
    ("kids", "👶 Kids"),
    ("general", "📘 General"),
    ("cefr", "🧭 CEFR"),
    ("ielts", "🎓 IELTS"),
];

const SECTIONS_GERMAN: &[(&str, &str)] = &[
    ("kids", "👶 Kids"),
    ("general", "📘 General"),
    ("certificate", "🏅 Certificate"),
];

const SECTIONS_OTHERS: &[(&str, &str)] = &[
    ("kids", "👶 Kids"),
    ("general", "📘 General"),
    ("certificate", "🏅 Certificate"),
];

pub fn course_label(key: &str) -> Option<&'static str> {
    COURSES.iter().find(|(k, _)| *k == key).map(|(_, l)| *l)
}

pub fn course_requires_level(key: &str) -> bool {
    COURSES_WITH_LEVEL.contains(&key)
}

pub fn level_label(key: &str) -> Option<&'static str> {
    LEVELS.iter().find(|(k, _)| *k == key).map(|(_, l)| *l)
}

/// Section set for a course; courses without their own set share a default.
pub fn sections_for(course_key: &str) -> &'static [(&'static str, &'static str)] {
    match course_key {
        "english" => SECTIONS_ENGLISH,
        "german" => SECTIONS_GERMAN,
        _ => SECTIONS_OTHERS,
    }
}

pub fn section_label(course_key: &str, section_key: &str) -> Option<&'static str> {
    sections_for(course_key)
        .iter()
        .find(|(k, _)| *k == section_key)
        .map(|(_, l)| *l)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_two_courses_require_a_level() {
        let leveled: Vec<&str> = COURSES
            .iter()
            .map(|(k, _)| *k)
            .filter(|k| course_requires_level(k))
            .collect();
        assert_eq!(leveled, vec!["english", "german"]);
    }

    #[test]
    fn level_set_has_six_ordered_tiers() {
        let keys: Vec<&str> = LEVELS.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["A1", "A2", "B1", "B2", "C1", "C2"]);
    }

    #[test]
    fn section_sets_are_scoped_by_course() {
        assert!(section_label("english", "ielts").is_some());
        assert!(section_label("german", "ielts").is_none());
        assert!(section_label("german", "certificate").is_some());
        // anything without its own set falls back to the shared default
        assert_eq!(sections_for("math"), sections_for("history"));
        assert!(section_label("math", "certificate").is_some());
    }

    #[test]
    fn unknown_keys_have_no_label() {
        assert_eq!(course_label("physics"), None);
        assert_eq!(level_label("D1"), None);
        assert_eq!(section_label("english", "sat"), None);
    }

    #[test]
    fn labels_resolve() {
        assert_eq!(course_label("math"), Some("🧮 Matematika"));
        assert_eq!(level_label("B1"), Some("B1 • Intermediate"));
        assert_eq!(section_label("english", "ielts"), Some("🎓 IELTS"));
    }
}
