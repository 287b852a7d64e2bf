use super::{find_by_prefix, first_snapshot, format_ts, short_id, AppContext};
use crate::error::AppError;
use crate::models::{InboxMessage, InboxTab};
use crate::services::{InboxPage, MessageDraft};

fn page(ctx: &AppContext) -> Result<InboxPage, AppError> {
    InboxPage::new(&ctx.session, ctx.store())
}

pub async fn list(ctx: &AppContext, tab: InboxTab) -> Result<(), AppError> {
    let page = page(ctx)?;
    let messages = first_snapshot(|c| page.bind(tab, c)).await?;
    if messages.is_empty() {
        println!("Nothing here.");
    }
    for message in &messages {
        print_message(ctx, tab, message);
    }
    Ok(())
}

fn print_message(ctx: &AppContext, tab: InboxTab, message: &InboxMessage) {
    let marker = if message.read { " " } else { "*" };
    let peer = match tab {
        InboxTab::Received => format!("from {}", message.from),
        InboxTab::Sent => format!("to {}", message.to),
    };
    println!(
        "{}{}  {}  {}  {}",
        marker,
        short_id(&message.id),
        format_ts(message.created_at, &ctx.timezone()),
        peer,
        message.title
    );
    println!("          {}", message.body);
}

pub async fn send(ctx: &AppContext, to: &str, title: &str, body: &str) -> Result<(), AppError> {
    let mut draft = MessageDraft {
        to: to.to_string(),
        title: title.to_string(),
        body: body.to_string(),
    };
    match page(ctx)?.send_message(&mut draft)? {
        Some(id) => println!("Sent message {}", short_id(&id)),
        None => println!("A message needs a recipient, a title and a body."),
    }
    Ok(())
}

/// Only messages addressed to the viewer can be marked read.
pub async fn toggle_read(ctx: &AppContext, id: &str) -> Result<(), AppError> {
    let page = page(ctx)?;
    let received = first_snapshot(|c| page.bind_received(c)).await?;
    let message = find_by_prefix(&received, id, |m| m.id.as_str(), "message")?;
    page.toggle_read(message)?;
    let state = if message.read { "unread" } else { "read" };
    println!("Message {} marked {}", short_id(&message.id), state);
    Ok(())
}
