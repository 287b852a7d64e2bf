use super::{first_snapshot, short_id, AppContext};
use crate::error::AppError;
use crate::models::EventCategory;
use crate::services::{CalendarPage, EventDraft};

fn page(ctx: &AppContext) -> CalendarPage {
    CalendarPage::new(ctx.session.clone(), ctx.store())
}

pub async fn list(ctx: &AppContext) -> Result<(), AppError> {
    let page = page(ctx);
    let events = first_snapshot(|c| page.bind(c)).await?;
    if events.is_empty() {
        println!("No events scheduled.");
    }
    for event in &events {
        println!(
            "{}  {:<12} {}  [{}]",
            event.date,
            event.category.label(),
            event.title,
            short_id(&event.id)
        );
    }
    Ok(())
}

pub async fn add(ctx: &AppContext, title: &str, date: &str, category: Option<&str>) -> Result<(), AppError> {
    let category = match category {
        Some(raw) => raw.parse::<EventCategory>().map_err(AppError::Validation)?,
        None => EventCategory::default(),
    };
    let mut draft = EventDraft {
        title: title.to_string(),
        category,
        date: date.to_string(),
    };
    match page(ctx).add_event(&mut draft)? {
        Some(id) => println!("Scheduled event {}", short_id(&id)),
        None => println!("An event needs a title and a date."),
    }
    Ok(())
}
