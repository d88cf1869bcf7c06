mod catalog;
mod content;
mod handlers;
mod keyboards;
mod states;
mod validators;

use dotenvy::dotenv;
use log::info;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;

use crate::states::DialogueState;

// Local-testing fallbacks; real deployments set BOT_TOKEN / ADMIN_ID.
const DEFAULT_BOT_TOKEN: &str = "0000000000:XXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX";
const DEFAULT_ADMIN_ID: i64 = 0;

#[derive(Clone)]
pub struct Config {
    pub admin_chat: ChatId,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    let token =
        std::env::var("BOT_TOKEN").unwrap_or_else(|_| DEFAULT_BOT_TOKEN.to_string());
    let admin_id = std::env::var("ADMIN_ID")
        .unwrap_or_else(|_| DEFAULT_ADMIN_ID.to_string())
        .parse::<i64>()?;

    let cfg = Config {
        admin_chat: ChatId(admin_id),
    };

    let bot = Bot::new(token);

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .enter_dialogue::<Message, InMemStorage<DialogueState>, DialogueState>()
                .endpoint(handlers::message_handler),
        )
        .branch(
            Update::filter_callback_query()
                .enter_dialogue::<CallbackQuery, InMemStorage<DialogueState>, DialogueState>()
                .endpoint(handlers::callback_handler),
        );

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<DialogueState>::new(), cfg])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
