//! Review and admin message builders. Everything interpolated here came
//! from the user or the catalog and goes out with `ParseMode::Html`, so
//! every value passes through `escape`.

use chrono::Utc;
use chrono_tz::Asia::Tashkent;
use teloxide::utils::html::escape;

use crate::states::Registration;

fn esc_opt(v: Option<&str>) -> String {
    escape(v.unwrap_or(""))
}

/// The summary screen shown before submission, one labeled line per field.
pub fn review_text(reg: &Registration) -> String {
    let mut lines = vec![
        "🧾 <b>Ma'lumotlarni ko'rib chiqing:</b>".to_string(),
        format!("• 📚 <b>Kurs:</b> {}", esc_opt(reg.course_label.as_deref())),
    ];
    if reg.requires_level() && reg.level_label.is_some() {
        lines.push(format!(
            "• 📊 <b>Daraja:</b> {}",
            esc_opt(reg.level_label.as_deref())
        ));
    }
    lines.push(format!(
        "• 🗂 <b>Bo'lim:</b> {}",
        esc_opt(reg.section_label.as_deref())
    ));
    lines.push(format!(
        "• 👤 <b>Ism familiya:</b> {}",
        esc_opt(reg.full_name.as_deref())
    ));
    lines.push(format!(
        "• 🎂 <b>Yosh:</b> {}",
        reg.age.map(|a| a.to_string()).unwrap_or_default()
    ));
    lines.push(format!(
        "• 📱 <b>Telefon:</b> {}",
        esc_opt(reg.phone.as_deref())
    ));
    lines.join("\n")
}

/// The notification delivered to the admin after a confirmed registration.
/// `timestamp` comes from [`registration_timestamp`]; it is a parameter so
/// tests can pin it.
pub fn admin_text(
    reg: &Registration,
    user_id: u64,
    username: Option<&str>,
    timestamp: &str,
) -> String {
    let username = match username {
        Some(u) => escape(&format!("@{u}")),
        None => "@None".to_string(),
    };

    let mut lines = vec![
        "🔔 <b>Yangi o'quvchi ro'yxatdan o'tdi</b>".to_string(),
        format!("👤 <b>Ism:</b> {}", esc_opt(reg.full_name.as_deref())),
        format!(
            "🎂 <b>Yosh:</b> {}",
            reg.age.map(|a| a.to_string()).unwrap_or_default()
        ),
        format!("📱 <b>Telefon:</b> {}", esc_opt(reg.phone.as_deref())),
        format!("📚 <b>Kurs:</b> {}", esc_opt(reg.course_label.as_deref())),
        format!("🗂 <b>Bo'lim:</b> {}", esc_opt(reg.section_label.as_deref())),
    ];
    if reg.requires_level() && reg.level_label.is_some() {
        lines.push(format!(
            "📊 <b>Daraja:</b> {}",
            esc_opt(reg.level_label.as_deref())
        ));
    }
    lines.push(format!("🆔 <b>Telegram ID:</b> {user_id}"));
    lines.push(format!("👤 <b>Username:</b> {username}"));
    lines.push(format!("📅 <b>Sana:</b> {timestamp} (Asia/Tashkent)"));
    lines.join("\n")
}

/// Submission wall-clock time in the academy's reference timezone.
pub fn registration_timestamp() -> String {
    Utc::now()
        .with_timezone(&Tashkent)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
