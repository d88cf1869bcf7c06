use crate::catalog;

/// Current position in the registration conversation. Every in-progress
/// variant carries the answers accumulated so far; `Idle` means no session.
#[derive(Clone, Default)]
pub enum DialogueState {
    #[default]
    Idle,
    ChoosingCourse { reg: Registration },
    ChoosingLevel { reg: Registration },
    ChoosingSection { reg: Registration },
    AskName { reg: Registration },
    AskAge { reg: Registration },
    AskPhone { reg: Registration },
    Review { reg: Registration },
    EditMenu { reg: Registration },
}

impl DialogueState {
    /// The session record, if one exists at this step.
    pub fn into_registration(self) -> Option<Registration> {
        match self {
            DialogueState::Idle => None,
            DialogueState::ChoosingCourse { reg }
            | DialogueState::ChoosingLevel { reg }
            | DialogueState::ChoosingSection { reg }
            | DialogueState::AskName { reg }
            | DialogueState::AskAge { reg }
            | DialogueState::AskPhone { reg }
            | DialogueState::Review { reg }
            | DialogueState::EditMenu { reg } => Some(reg),
        }
    }
}

/// Per-user registration answers. Downstream fields are cleared whenever
/// an upstream choice changes, so a stale level or section can never
/// survive a course change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Registration {
    pub course_key: Option<String>,
    pub course_label: Option<String>,
    pub level_key: Option<String>,
    pub level_label: Option<String>,
    pub section_key: Option<String>,
    pub section_label: Option<String>,
    pub full_name: Option<String>,
    pub age: Option<u8>,
    pub phone: Option<String>,
    /// Set while the edit sub-flow is in progress, cleared at review.
    pub edit_field: Option<EditField>,
}

impl Registration {
    pub fn set_course(&mut self, key: &str, label: &str) {
        self.course_key = Some(key.to_string());
        self.course_label = Some(label.to_string());
        self.clear_from_level();
    }

    pub fn set_level(&mut self, key: &str, label: &str) {
        self.level_key = Some(key.to_string());
        self.level_label = Some(label.to_string());
        self.clear_section();
    }

    pub fn set_section(&mut self, key: &str, label: &str) {
        self.section_key = Some(key.to_string());
        self.section_label = Some(label.to_string());
    }

    pub fn clear_from_level(&mut self) {
        self.level_key = None;
        self.level_label = None;
        self.clear_section();
    }

    pub fn clear_section(&mut self) {
        self.section_key = None;
        self.section_label = None;
    }

    pub fn requires_level(&self) -> bool {
        self.course_key
            .as_deref()
            .is_some_and(catalog::course_requires_level)
    }

    /// Confirm-time completeness check. Empty means ready to submit.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.course_key.is_none() || self.course_label.is_none() {
            missing.push("course");
        }
        if self.requires_level() && self.level_label.is_none() {
            missing.push("level");
        }
        if self.section_label.is_none() {
            missing.push("section");
        }
        if self.full_name.is_none() {
            missing.push("full_name");
        }
        if self.age.is_none() {
            missing.push("age");
        }
        if self.phone.is_none() {
            missing.push("phone");
        }
        missing
    }
}

/// A field reachable from the edit menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditField {
    Course,
    Level,
    Section,
    Name,
    Age,
    Phone,
}

impl EditField {
    pub fn as_str(self) -> &'static str {
        match self {
            EditField::Course => "course",
            EditField::Level => "level",
            EditField::Section => "section",
            EditField::Name => "name",
            EditField::Age => "age",
            EditField::Phone => "phone",
        }
    }

    fn parse(s: &str) -> Option<EditField> {
        match s {
            "course" => Some(EditField::Course),
            "level" => Some(EditField::Level),
            "section" => Some(EditField::Section),
            "name" => Some(EditField::Name),
            "age" => Some(EditField::Age),
            "phone" => Some(EditField::Phone),
            _ => None,
        }
    }
}

/// Parsed callback payload. All buttons use the `reg:` namespace; anything
/// that does not parse is rejected by the handler without touching state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Start,
    Course(String),
    Level(String),
    Section(String),
    Confirm,
    Edit,
    EditField(EditField),
    BackCourses,
    BackLevels,
    BackReview,
    Cancel,
}

impl Action {
    pub fn parse(data: &str) -> Option<Action> {
        match data {
            "reg:start" => return Some(Action::Start),
            "reg:confirm" => return Some(Action::Confirm),
            "reg:edit" => return Some(Action::Edit),
            "reg:back:courses" => return Some(Action::BackCourses),
            "reg:back:levels" => return Some(Action::BackLevels),
            "reg:back:review" => return Some(Action::BackReview),
            "reg:cancel" => return Some(Action::Cancel),
            _ => {}
        }
        let rest = data.strip_prefix("reg:")?;
        if let Some(key) = rest.strip_prefix("course:") {
            return Some(Action::Course(key.to_string()));
        }
        if let Some(key) = rest.strip_prefix("level:") {
            return Some(Action::Level(key.to_string()));
        }
        if let Some(key) = rest.strip_prefix("section:") {
            return Some(Action::Section(key.to_string()));
        }
        if let Some(field) = rest.strip_prefix("edit:") {
            return EditField::parse(field).map(Action::EditField);
        }
        None
    }

    /// The wire form used as callback data on buttons.
    pub fn payload(&self) -> String {
        match self {
            Action::Start => "reg:start".into(),
            Action::Course(key) => format!("reg:course:{key}"),
            Action::Level(key) => format!("reg:level:{key}"),
            Action::Section(key) => format!("reg:section:{key}"),
            Action::Confirm => "reg:confirm".into(),
            Action::Edit => "reg:edit".into(),
            Action::EditField(f) => format!("reg:edit:{}", f.as_str()),
            Action::BackCourses => "reg:back:courses".into(),
            Action::BackLevels => "reg:back:levels".into(),
            Action::BackReview => "reg:back:review".into(),
            Action::Cancel => "reg:cancel".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_round_trip_through_payloads() {
        let actions = [
            Action::Start,
            Action::Course("english".into()),
            Action::Level("B1".into()),
            Action::Section("ielts".into()),
            Action::Confirm,
            Action::Edit,
            Action::EditField(EditField::Phone),
            Action::BackCourses,
            Action::BackLevels,
            Action::BackReview,
            Action::Cancel,
        ];
        for action in actions {
            assert_eq!(Action::parse(&action.payload()), Some(action));
        }
    }

    #[test]
    fn unknown_payloads_are_rejected() {
        assert_eq!(Action::parse(""), None);
        assert_eq!(Action::parse("start"), None);
        assert_eq!(Action::parse("reg:"), None);
        assert_eq!(Action::parse("reg:bogus"), None);
        assert_eq!(Action::parse("reg:edit:signature"), None);
        assert_eq!(Action::parse("admin|daily"), None);
    }

    #[test]
    fn changing_course_clears_level_and_section() {
        let mut reg = Registration::default();
        reg.set_course("english", "🇬🇧 Ingliz tili");
        reg.set_level("B1", "B1 • Intermediate");
        reg.set_section("ielts", "🎓 IELTS");

        reg.set_course("math", "🧮 Matematika");
        assert_eq!(reg.level_key, None);
        assert_eq!(reg.level_label, None);
        assert_eq!(reg.section_key, None);
        assert_eq!(reg.section_label, None);
        assert!(!reg.requires_level());
    }

    #[test]
    fn changing_level_clears_only_section() {
        let mut reg = Registration::default();
        reg.set_course("english", "🇬🇧 Ingliz tili");
        reg.set_level("B1", "B1 • Intermediate");
        reg.set_section("ielts", "🎓 IELTS");

        reg.set_level("B2", "B2 • Upper-Intermediate");
        assert_eq!(reg.course_key.as_deref(), Some("english"));
        assert_eq!(reg.level_key.as_deref(), Some("B2"));
        assert_eq!(reg.section_key, None);
    }

    #[test]
    fn completeness_requires_level_only_for_leveled_courses() {
        let mut reg = Registration::default();
        reg.set_course("math", "🧮 Matematika");
        reg.set_section("kids", "👶 Kids");
        reg.full_name = Some("Ali Valiyev".into());
        reg.age = Some(9);
        reg.phone = Some("+998901234567".into());
        assert!(reg.missing_fields().is_empty());

        reg.set_course("english", "🇬🇧 Ingliz tili");
        // the course change dropped the section and english now needs a level
        assert_eq!(reg.missing_fields(), vec!["level", "section"]);

        reg.set_level("B1", "B1 • Intermediate");
        reg.set_section("ielts", "🎓 IELTS");
        assert!(reg.missing_fields().is_empty());
    }

    #[test]
    fn empty_registration_is_missing_everything() {
        let missing = Registration::default().missing_fields();
        assert_eq!(
            missing,
            vec!["course", "section", "full_name", "age", "phone"]
        );
    }

    #[test]
    fn idle_state_has_no_registration() {
        assert!(DialogueState::Idle.into_registration().is_none());
        let reg = Registration::default();
        assert!(DialogueState::Review { reg }.into_registration().is_some());
    }
}
