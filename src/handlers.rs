use log::{info, warn};
use teloxide::{
    prelude::*,
    types::{InlineKeyboardMarkup, KeyboardRemove, MessageId, ParseMode},
};

use crate::{
    catalog, content, keyboards,
    states::{Action, DialogueState, EditField, Registration},
    validators, Config,
};

pub type MyDialogue = Dialogue<
    DialogueState,
    teloxide::dispatching::dialogue::InMemStorage<DialogueState>,
>;
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

const WELCOME: &str = "Assalomu alaykum!\n<b>Welcome to ITeach Academy</b> 🎓\n\nBizning o'quv jamoamizga qo'shilish uchun ro'yxatdan o'ting.";
const COURSE_PROMPT: &str =
    "📚 Qaysi <b>kurs</b>da o'qimoqchisiz?\n<i>Iltimos, quyidagilardan birini tanlang.</i>";
const LEVEL_PROMPT: &str = "📊 Iltimos, <b>darajangizni</b> tanlang:";
const SECTION_PROMPT: &str = "🗂 Iltimos, <b>bo'lim</b>ni tanlang:";
const NAME_PROMPT: &str = "✍️ <b>Iltimos, to'liq ism-familiyangizni kiriting.</b>\n<i>Masalan: Ziyodulla Egamberdiyev</i>";
const AGE_PROMPT: &str = "🎂 <b>Yoshingizni kiriting:</b>";
const PHONE_PROMPT: &str = "📞 <b>Telefon raqamingizni kiriting</b> (format: <code>+998XXXXXXXXX</code>) yoki pastdagi tugma orqali yuboring.";
const START_HINT: &str =
    "Iltimos, /start buyrug'i bilan boshlang yoki jarayon tugmalaridan foydalaning.";
const STALE_HINT: &str = "Sessiya topilmadi. Iltimos, /start buyrug'i bilan qaytadan boshlang.";

/// Edits the triggering message when a callback got us here, otherwise
/// sends a new one. All screens go out as HTML.
async fn render(
    bot: &Bot,
    chat: ChatId,
    edit: Option<MessageId>,
    text: &str,
    kb: Option<InlineKeyboardMarkup>,
) -> HandlerResult {
    match edit {
        Some(id) => {
            let mut req = bot.edit_message_text(chat, id, text).parse_mode(ParseMode::Html);
            if let Some(kb) = kb {
                req = req.reply_markup(kb);
            }
            req.await?;
        }
        None => {
            let mut req = bot.send_message(chat, text).parse_mode(ParseMode::Html);
            if let Some(kb) = kb {
                req = req.reply_markup(kb);
            }
            req.await?;
        }
    }
    Ok(())
}

async fn goto_courses(
    bot: &Bot,
    chat: ChatId,
    edit: Option<MessageId>,
    dialogue: &MyDialogue,
    reg: Registration,
) -> HandlerResult {
    render(bot, chat, edit, COURSE_PROMPT, Some(keyboards::courses_kb())).await?;
    dialogue.update(DialogueState::ChoosingCourse { reg }).await?;
    Ok(())
}

async fn goto_levels(
    bot: &Bot,
    chat: ChatId,
    edit: Option<MessageId>,
    dialogue: &MyDialogue,
    reg: Registration,
) -> HandlerResult {
    render(bot, chat, edit, LEVEL_PROMPT, Some(keyboards::levels_kb())).await?;
    dialogue.update(DialogueState::ChoosingLevel { reg }).await?;
    Ok(())
}

async fn goto_sections(
    bot: &Bot,
    chat: ChatId,
    edit: Option<MessageId>,
    dialogue: &MyDialogue,
    reg: Registration,
) -> HandlerResult {
    let kb = keyboards::sections_kb(reg.course_key.as_deref().unwrap_or(""));
    render(bot, chat, edit, SECTION_PROMPT, Some(kb)).await?;
    dialogue.update(DialogueState::ChoosingSection { reg }).await?;
    Ok(())
}

async fn ask_name(
    bot: &Bot,
    chat: ChatId,
    dialogue: &MyDialogue,
    reg: Registration,
) -> HandlerResult {
    // also drops any leftover contact keyboard
    bot.send_message(chat, NAME_PROMPT)
        .parse_mode(ParseMode::Html)
        .reply_markup(KeyboardRemove::new())
        .await?;
    dialogue.update(DialogueState::AskName { reg }).await?;
    Ok(())
}

async fn ask_age(
    bot: &Bot,
    chat: ChatId,
    dialogue: &MyDialogue,
    reg: Registration,
) -> HandlerResult {
    bot.send_message(chat, AGE_PROMPT).parse_mode(ParseMode::Html).await?;
    dialogue.update(DialogueState::AskAge { reg }).await?;
    Ok(())
}

async fn ask_phone(
    bot: &Bot,
    chat: ChatId,
    dialogue: &MyDialogue,
    reg: Registration,
) -> HandlerResult {
    bot.send_message(chat, PHONE_PROMPT)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::contact_kb())
        .await?;
    dialogue.update(DialogueState::AskPhone { reg }).await?;
    Ok(())
}

async fn show_review(
    bot: &Bot,
    chat: ChatId,
    edit: Option<MessageId>,
    dialogue: &MyDialogue,
    mut reg: Registration,
) -> HandlerResult {
    if let Some(field) = reg.edit_field.take() {
        info!("edit sub-flow for '{}' finished", field.as_str());
    }
    let text = content::review_text(&reg);
    render(bot, chat, edit, &text, Some(keyboards::review_kb())).await?;
    dialogue.update(DialogueState::Review { reg }).await?;
    Ok(())
}

/// Drops the stored session, if any.
async fn clear_session(dialogue: &MyDialogue) -> HandlerResult {
    if dialogue.get().await?.is_some() {
        dialogue.exit().await?;
    }
    Ok(())
}

pub async fn message_handler(bot: Bot, msg: Message, dialogue: MyDialogue) -> HandlerResult {
    if msg.from().is_none() {
        return Ok(());
    }
    let chat = msg.chat.id;

    match msg.text().map(str::trim) {
        Some("/start") => {
            clear_session(&dialogue).await?;
            bot.send_message(chat, WELCOME)
                .parse_mode(ParseMode::Html)
                .reply_markup(KeyboardRemove::new())
                .await?;
            return goto_courses(&bot, chat, None, &dialogue, Registration::default()).await;
        }
        Some("/cancel") => {
            clear_session(&dialogue).await?;
            bot.send_message(chat, "❌ Jarayon bekor qilindi. Qayta boshlash uchun /start bosing.")
                .reply_markup(KeyboardRemove::new())
                .await?;
            return Ok(());
        }
        _ => {}
    }

    if let Some(contact) = msg.contact() {
        // contacts only mean something while we wait for a phone number
        if let DialogueState::AskPhone { mut reg } = dialogue.get().await?.unwrap_or_default() {
            match validators::normalize_phone(&contact.phone_number) {
                Some(phone) => {
                    reg.phone = Some(phone);
                    bot.send_message(chat, "✔️ Qabul qilindi.")
                        .reply_markup(KeyboardRemove::new())
                        .await?;
                    show_review(&bot, chat, None, &dialogue, reg).await?;
                }
                None => {
                    bot.send_message(
                        chat,
                        "❌ Telefon raqamingiz <code>+998XXXXXXXXX</code> formatida bo'lishi kerak. Qayta yuboring.",
                    )
                    .parse_mode(ParseMode::Html)
                    .await?;
                }
            }
        }
        return Ok(());
    }

    let text = match msg.text() {
        Some(t) => t.trim().to_string(),
        None => return Ok(()),
    };

    match dialogue.get().await?.unwrap_or_default() {
        DialogueState::AskName { mut reg } => {
            if !validators::valid_full_name(&text) {
                bot.send_message(
                    chat,
                    "❌ To'liq ism-familiya kiriting.\nMasalan: <i>Ziyodulla Egamberdiyev</i>",
                )
                .parse_mode(ParseMode::Html)
                .await?;
                return Ok(());
            }
            reg.full_name = Some(text);
            ask_age(&bot, chat, &dialogue, reg).await?;
        }
        DialogueState::AskAge { mut reg } => match validators::parse_age(&text) {
            Some(age) => {
                reg.age = Some(age);
                ask_phone(&bot, chat, &dialogue, reg).await?;
            }
            None => {
                bot.send_message(
                    chat,
                    "❌ Yosh faqat 3–100 oralig'ida bo'lishi kerak. Qayta kiriting:",
                )
                .await?;
            }
        },
        DialogueState::AskPhone { mut reg } => match validators::normalize_phone(&text) {
            Some(phone) => {
                reg.phone = Some(phone);
                show_review(&bot, chat, None, &dialogue, reg).await?;
            }
            None => {
                bot.send_message(
                    chat,
                    "❌ Noto'g'ri format. Iltimos, <code>+998XXXXXXXXX</code> shaklida kiriting yoki pastdagi tugmadan foydalaning.",
                )
                .parse_mode(ParseMode::Html)
                .await?;
            }
        },
        _ => {
            bot.send_message(chat, START_HINT).await?;
        }
    }

    Ok(())
}

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: MyDialogue,
    cfg: Config,
) -> HandlerResult {
    let data = match q.data.as_deref() {
        Some(d) => d.to_string(),
        None => return Ok(()),
    };
    bot.answer_callback_query(q.id.clone()).await?;
    info!("callback payload: {}", data);

    let action = match Action::parse(&data) {
        Some(a) => a,
        None => {
            warn!("unrecognized callback payload: {}", data);
            return Ok(());
        }
    };

    let (chat, msg_id) = match q.message.as_ref() {
        Some(m) => (m.chat.id, m.id),
        None => return Ok(()),
    };
    let edit = Some(msg_id);
    let state = dialogue.get().await?.unwrap_or_default();

    match action {
        Action::Cancel => {
            clear_session(&dialogue).await?;
            bot.edit_message_text(chat, msg_id, "❌ Ro'yxatdan o'tish bekor qilindi.")
                .reply_markup(keyboards::register_kb())
                .await?;
        }

        Action::Start => {
            goto_courses(&bot, chat, edit, &dialogue, Registration::default()).await?;
        }

        Action::Course(key) => {
            let Some(mut reg) = state.into_registration() else {
                return render(&bot, chat, edit, STALE_HINT, None).await;
            };
            match catalog::course_label(&key) {
                Some(label) => {
                    reg.set_course(&key, label);
                    if reg.requires_level() {
                        goto_levels(&bot, chat, edit, &dialogue, reg).await?;
                    } else {
                        goto_sections(&bot, chat, edit, &dialogue, reg).await?;
                    }
                }
                None => {
                    // unknown key: same menu again, step and session untouched
                    render(
                        &bot,
                        chat,
                        edit,
                        "Noto'g'ri kurs tanlandi. Qaytadan urinib ko'ring.",
                        Some(keyboards::courses_kb()),
                    )
                    .await?;
                }
            }
        }

        Action::Level(key) => {
            let Some(mut reg) = state.into_registration() else {
                return render(&bot, chat, edit, STALE_HINT, None).await;
            };
            if !reg.requires_level() {
                // stale button: the current course has no level step
                return render(&bot, chat, edit, STALE_HINT, None).await;
            }
            match catalog::level_label(&key) {
                Some(label) => {
                    reg.set_level(&key, label);
                    goto_sections(&bot, chat, edit, &dialogue, reg).await?;
                }
                None => {
                    render(
                        &bot,
                        chat,
                        edit,
                        "Noto'g'ri daraja tanlandi. Qaytadan urinib ko'ring.",
                        Some(keyboards::levels_kb()),
                    )
                    .await?;
                }
            }
        }

        Action::Section(key) => {
            let Some(mut reg) = state.into_registration() else {
                return render(&bot, chat, edit, STALE_HINT, None).await;
            };
            let Some(course_key) = reg.course_key.clone() else {
                return render(&bot, chat, edit, STALE_HINT, None).await;
            };
            match catalog::section_label(&course_key, &key) {
                Some(label) => {
                    reg.set_section(&key, label);
                    ask_name(&bot, chat, &dialogue, reg).await?;
                }
                None => {
                    render(
                        &bot,
                        chat,
                        edit,
                        "Noto'g'ri bo'lim tanlandi. Qaytadan urinib ko'ring.",
                        Some(keyboards::sections_kb(&course_key)),
                    )
                    .await?;
                }
            }
        }

        Action::Confirm => {
            let DialogueState::Review { reg } = state else {
                return render(&bot, chat, edit, STALE_HINT, None).await;
            };
            let missing = reg.missing_fields();
            if !missing.is_empty() {
                warn!("confirm with missing fields: {:?}", missing);
                bot.edit_message_text(
                    chat,
                    msg_id,
                    "Ma'lumotlar yetarli emas. Iltimos, /start buyrug'i bilan qaytadan boshlang.",
                )
                .await?;
                clear_session(&dialogue).await?;
                return Ok(());
            }

            bot.edit_message_text(
                chat,
                msg_id,
                "🎉 <b>Tabriklaymiz!</b> Siz ro'yxatdan o'tdingiz.\nTez orada siz bilan telefon raqamingiz orqali bog'lanamiz.",
            )
            .parse_mode(ParseMode::Html)
            .await?;

            let timestamp = content::registration_timestamp();
            let admin_text =
                content::admin_text(&reg, q.from.id.0, q.from.username.as_deref(), &timestamp);
            if let Err(e) = bot
                .send_message(cfg.admin_chat, admin_text)
                .parse_mode(ParseMode::Html)
                .await
            {
                warn!("failed to notify admin: {}", e);
            }

            clear_session(&dialogue).await?;
        }

        Action::Edit => {
            let DialogueState::Review { reg } = state else {
                return render(&bot, chat, edit, STALE_HINT, None).await;
            };
            render(
                &bot,
                chat,
                edit,
                "Qaysi <b>bo'limni</b> o'zgartiramiz?",
                Some(keyboards::edit_menu_kb(reg.requires_level())),
            )
            .await?;
            dialogue.update(DialogueState::EditMenu { reg }).await?;
        }

        Action::EditField(field) => {
            let DialogueState::EditMenu { mut reg } = state else {
                return render(&bot, chat, edit, STALE_HINT, None).await;
            };
            reg.edit_field = Some(field);
            match field {
                EditField::Course => goto_courses(&bot, chat, edit, &dialogue, reg).await?,
                EditField::Level => {
                    if reg.requires_level() {
                        goto_levels(&bot, chat, edit, &dialogue, reg).await?;
                    } else {
                        render(&bot, chat, edit, STALE_HINT, None).await?;
                    }
                }
                EditField::Section => goto_sections(&bot, chat, edit, &dialogue, reg).await?,
                EditField::Name => {
                    render(&bot, chat, edit, "✍️ Yangi <b>ism-familiya</b>ni kiriting:", None)
                        .await?;
                    dialogue.update(DialogueState::AskName { reg }).await?;
                }
                EditField::Age => {
                    render(&bot, chat, edit, "🎂 Yangi <b>yosh</b>ni kiriting:", None).await?;
                    dialogue.update(DialogueState::AskAge { reg }).await?;
                }
                EditField::Phone => {
                    render(
                        &bot,
                        chat,
                        edit,
                        "📞 Yangi <b>telefon</b>ni kiriting (format: <code>+998XXXXXXXXX</code>) yoki pastdagi tugma orqali yuboring.",
                        None,
                    )
                    .await?;
                    bot.send_message(chat, "Telefonni yuboring:")
                        .reply_markup(keyboards::contact_kb())
                        .await?;
                    dialogue.update(DialogueState::AskPhone { reg }).await?;
                }
            }
        }

        Action::BackCourses => {
            let Some(mut reg) = state.into_registration() else {
                return render(&bot, chat, edit, STALE_HINT, None).await;
            };
            reg.clear_from_level();
            goto_courses(&bot, chat, edit, &dialogue, reg).await?;
        }

        Action::BackLevels => {
            let Some(mut reg) = state.into_registration() else {
                return render(&bot, chat, edit, STALE_HINT, None).await;
            };
            if !reg.requires_level() {
                return render(&bot, chat, edit, STALE_HINT, None).await;
            }
            reg.clear_section();
            goto_levels(&bot, chat, edit, &dialogue, reg).await?;
        }

        Action::BackReview => {
            let Some(reg) = state.into_registration() else {
                return render(&bot, chat, edit, STALE_HINT, None).await;
            };
            show_review(&bot, chat, edit, &dialogue, reg).await?;
        }
    }

    Ok(())
}
