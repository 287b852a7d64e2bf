//! Follow live queries until Ctrl-C, re-printing each snapshot.

use std::sync::Arc;

use chrono_tz::Tz;
use clap::ValueEnum;
use tokio::sync::mpsc::{self, UnboundedSender};

use super::{format_ts, short_id, AppContext};
use crate::error::{AppError, StoreError};
use crate::models::{Bookmark, CalendarEvent, Goal, InboxMessage, NewsItem};
use crate::services::live_binding::{BindingConsumer, LiveCollectionBinding};
use crate::services::{BookmarksPage, CalendarPage, GoalsPage, InboxPage, NewsPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WatchTarget {
    Goals,
    Events,
    Bookmarks,
    Inbox,
    News,
}

enum WatchEvent {
    Snapshot { title: &'static str, lines: Vec<String> },
    Error { title: &'static str, message: String },
}

/// Renders each item of a snapshot into a line for the terminal.
struct RenderConsumer<T> {
    title: &'static str,
    tz: Tz,
    render: fn(&T, &Tz) -> String,
    tx: UnboundedSender<WatchEvent>,
}

impl<T: Send + Sync> BindingConsumer<T> for RenderConsumer<T> {
    fn on_snapshot(&self, items: &[T]) {
        let lines = items.iter().map(|item| (self.render)(item, &self.tz)).collect();
        let _ = self.tx.send(WatchEvent::Snapshot {
            title: self.title,
            lines,
        });
    }

    fn on_error(&self, error: &StoreError) {
        let _ = self.tx.send(WatchEvent::Error {
            title: self.title,
            message: error.to_string(),
        });
    }
}

fn consumer<T>(
    title: &'static str,
    ctx: &AppContext,
    render: fn(&T, &Tz) -> String,
    tx: &UnboundedSender<WatchEvent>,
) -> Arc<RenderConsumer<T>> {
    Arc::new(RenderConsumer {
        title,
        tz: ctx.timezone(),
        render,
        tx: tx.clone(),
    })
}

/// Type-erased handle so bindings of different item types can be released
/// together.
trait Releasable {
    fn release(&self);
}

impl<T> Releasable for LiveCollectionBinding<T> {
    fn release(&self) {
        LiveCollectionBinding::release(self);
    }
}

pub async fn run(ctx: &AppContext, target: WatchTarget) -> Result<(), AppError> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let bindings = open_bindings(ctx, target, &tx)?;
    drop(tx);

    let mut live = bindings.len();
    let mut ticker = tokio::time::interval(ctx.config.poll_interval);
    log::info!("Watching {:?} ({} live queries)", target, live);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(WatchEvent::Snapshot { title, lines }) => print_snapshot(title, &lines),
                Some(WatchEvent::Error { title, message }) => {
                    log::error!("Live query for {} failed: {}", title, message);
                    eprintln!("{}", AppError::Subscription(message).banner(title));
                    live = live.saturating_sub(1);
                    if live == 0 {
                        break;
                    }
                }
                None => break,
            },
            _ = ticker.tick() => {
                if let Err(e) = ctx.store.poll_external_changes() {
                    log::warn!("Polling for external changes failed: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted, closing live queries");
                break;
            }
        }
    }

    for binding in &bindings {
        binding.release();
    }
    Ok(())
}

fn open_bindings(
    ctx: &AppContext,
    target: WatchTarget,
    tx: &UnboundedSender<WatchEvent>,
) -> Result<Vec<Box<dyn Releasable>>, AppError> {
    let session = ctx.session.clone();
    let mut bindings: Vec<Box<dyn Releasable>> = Vec::new();
    match target {
        WatchTarget::Goals => {
            let page = GoalsPage::new(session, ctx.store(), ctx.timezone());
            bindings.push(Box::new(page.bind(consumer::<Goal>("goals", ctx, render_goal, tx))));
        }
        WatchTarget::Events => {
            let page = CalendarPage::new(session, ctx.store());
            let events = consumer::<CalendarEvent>("events", ctx, render_event, tx);
            bindings.push(Box::new(page.bind(events)));
        }
        WatchTarget::Bookmarks => {
            let page = BookmarksPage::new(session, ctx.store());
            let bookmarks = consumer::<Bookmark>("bookmarks", ctx, render_bookmark, tx);
            bindings.push(Box::new(page.bind(bookmarks)));
        }
        WatchTarget::Inbox => {
            let page = InboxPage::new(&session, ctx.store())?;
            let received = consumer::<InboxMessage>("received messages", ctx, render_message, tx);
            let sent = consumer::<InboxMessage>("sent messages", ctx, render_message, tx);
            bindings.push(Box::new(page.bind_received(received)));
            bindings.push(Box::new(page.bind_sent(sent)));
        }
        WatchTarget::News => {
            let page = NewsPage::new(session, ctx.store());
            bindings.push(Box::new(page.bind(consumer::<NewsItem>("news", ctx, render_news, tx))));
        }
    }
    Ok(bindings)
}

fn print_snapshot(title: &str, lines: &[String]) {
    println!("── {} ({}) ──", title, lines.len());
    for line in lines {
        println!("  {}", line);
    }
}

fn render_goal(goal: &Goal, tz: &Tz) -> String {
    let mark = if goal.completed { "x" } else { " " };
    format!("[{}] {} {}  ({})", mark, short_id(&goal.id), goal.text, format_ts(goal.created_at, tz))
}

fn render_event(event: &CalendarEvent, _tz: &Tz) -> String {
    format!("{}  {:<12} {}", event.date, event.category.label(), event.title)
}

fn render_bookmark(bookmark: &Bookmark, _tz: &Tz) -> String {
    format!("{}  <{}>", bookmark.label, bookmark.url)
}

fn render_message(message: &InboxMessage, tz: &Tz) -> String {
    let marker = if message.read { " " } else { "*" };
    format!(
        "{}{}  {} -> {}  {}",
        marker,
        format_ts(message.created_at, tz),
        message.from,
        message.to,
        message.title
    )
}

fn render_news(item: &NewsItem, tz: &Tz) -> String {
    format!("{}  {} ({})", format_ts(item.created_at, tz), item.title, item.author)
}
