use super::{first_snapshot, short_id, AppContext};
use crate::error::AppError;
use crate::services::{BookmarkDraft, BookmarksPage};

fn page(ctx: &AppContext) -> BookmarksPage {
    BookmarksPage::new(ctx.session.clone(), ctx.store())
}

pub async fn list(ctx: &AppContext) -> Result<(), AppError> {
    let page = page(ctx);
    let bookmarks = first_snapshot(|c| page.bind(c)).await?;
    if bookmarks.is_empty() {
        println!("No bookmarks saved.");
    }
    for bookmark in &bookmarks {
        println!("{}  {}  <{}>", short_id(&bookmark.id), bookmark.label, bookmark.url);
        if let Some(note) = &bookmark.note {
            println!("          {}", note);
        }
    }
    Ok(())
}

pub async fn add(ctx: &AppContext, label: &str, url: &str, note: Option<&str>) -> Result<(), AppError> {
    let mut draft = BookmarkDraft {
        label: label.to_string(),
        url: url.to_string(),
        note: note.unwrap_or_default().to_string(),
    };
    match page(ctx).save_bookmark(&mut draft)? {
        Some(id) => println!("Saved bookmark {}", short_id(&id)),
        None => println!("A bookmark needs a label and a link."),
    }
    Ok(())
}
