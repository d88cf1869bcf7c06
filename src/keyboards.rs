use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
};

use crate::catalog;
use crate::states::{Action, EditField};

fn callback(label: &str, action: Action) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.payload())
}

pub fn register_kb() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![callback("🚀 Ro'yxatdan o'tish", Action::Start)]])
}

/// Course grid, 2 per row, cancel underneath.
pub fn courses_kb() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    for pair in catalog::COURSES.chunks(2) {
        rows.push(
            pair.iter()
                .map(|&(key, label)| callback(label, Action::Course(key.to_string())))
                .collect(),
        );
    }
    rows.push(vec![callback("❌ Bekor qilish", Action::Cancel)]);
    InlineKeyboardMarkup::new(rows)
}

/// Six tiers in three rows of two, plus "back to courses".
pub fn levels_kb() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    for pair in catalog::LEVELS.chunks(2) {
        rows.push(
            pair.iter()
                .map(|&(key, label)| callback(label, Action::Level(key.to_string())))
                .collect(),
        );
    }
    rows.push(vec![callback("⬅️ Ortga (Kurslar)", Action::BackCourses)]);
    InlineKeyboardMarkup::new(rows)
}

/// Section grid for the chosen course. The back button returns to levels
/// for leveled courses and to the course menu for everything else.
pub fn sections_kb(course_key: &str) -> InlineKeyboardMarkup {
    let back = if catalog::course_requires_level(course_key) {
        Action::BackLevels
    } else {
        Action::BackCourses
    };

    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    for pair in catalog::sections_for(course_key).chunks(2) {
        rows.push(
            pair.iter()
                .map(|&(key, label)| callback(label, Action::Section(key.to_string())))
                .collect(),
        );
    }
    rows.push(vec![callback("⬅️ Ortga", back)]);
    rows.push(vec![callback("❌ Bekor qilish", Action::Cancel)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn review_kb() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            callback("✅ Tasdiqlash", Action::Confirm),
            callback("✏️ O'zgartirish", Action::Edit),
        ],
        vec![callback("❌ Bekor qilish", Action::Cancel)],
    ])
}

pub fn edit_menu_kb(requires_level: bool) -> InlineKeyboardMarkup {
    let mut rows = vec![vec![
        callback("📚 Kurs", Action::EditField(EditField::Course)),
        callback("🗂 Bo'lim", Action::EditField(EditField::Section)),
    ]];
    if requires_level {
        rows.push(vec![callback("📊 Daraja", Action::EditField(EditField::Level))]);
    }
    rows.push(vec![
        callback("👤 Ism familiya", Action::EditField(EditField::Name)),
        callback("🎂 Yosh", Action::EditField(EditField::Age)),
    ]);
    rows.push(vec![callback("📱 Telefon", Action::EditField(EditField::Phone))]);
    rows.push(vec![callback("⬅️ Ortga (Ko'rib chiqish)", Action::BackReview)]);
    InlineKeyboardMarkup::new(rows)
}

/// One-time reply keyboard with a contact-request button for the phone step.
pub fn contact_kb() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new("📱 Raqamni ulashish").request(ButtonRequest::Contact),
    ]])
    .resize_keyboard(true)
    .one_time_keyboard(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads(kb: &InlineKeyboardMarkup) -> Vec<String> {
        kb.inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                teloxide::types::InlineKeyboardButtonKind::CallbackData(d) => Some(d.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn every_button_payload_parses_back() {
        for kb in [
            register_kb(),
            courses_kb(),
            levels_kb(),
            sections_kb("english"),
            sections_kb("math"),
            review_kb(),
            edit_menu_kb(true),
            edit_menu_kb(false),
        ] {
            for payload in payloads(&kb) {
                assert!(
                    Action::parse(&payload).is_some(),
                    "unparseable payload {payload}"
                );
            }
        }
    }

    #[test]
    fn course_grid_is_two_per_row() {
        let kb = courses_kb();
        // 7 courses -> 2+2+2+1, then the cancel row
        let widths: Vec<usize> = kb.inline_keyboard.iter().map(|r| r.len()).collect();
        assert_eq!(widths, vec![2, 2, 2, 1, 1]);
    }

    #[test]
    fn section_back_button_depends_on_course() {
        assert!(payloads(&sections_kb("english")).contains(&"reg:back:levels".to_string()));
        assert!(payloads(&sections_kb("math")).contains(&"reg:back:courses".to_string()));
    }

    #[test]
    fn edit_menu_shows_level_only_when_required() {
        assert!(payloads(&edit_menu_kb(true)).contains(&"reg:edit:level".to_string()));
        assert!(!payloads(&edit_menu_kb(false)).contains(&"reg:edit:level".to_string()));
    }
}
