use super::{first_snapshot, format_ts, AppContext};
use crate::error::AppError;
use crate::services::{NewsDraft, NewsPage};

fn page(ctx: &AppContext) -> NewsPage {
    NewsPage::new(ctx.session.clone(), ctx.store())
}

pub async fn list(ctx: &AppContext) -> Result<(), AppError> {
    let page = page(ctx);
    let items = first_snapshot(|c| page.bind(c)).await?;
    if items.is_empty() {
        println!("No news yet.");
    }
    for item in &items {
        println!(
            "{}  {}  ({})",
            format_ts(item.created_at, &ctx.timezone()),
            item.title,
            item.author
        );
        println!("    {}", item.summary);
    }
    Ok(())
}

pub async fn post(ctx: &AppContext, title: &str, summary: &str) -> Result<(), AppError> {
    let mut draft = NewsDraft {
        title: title.to_string(),
        summary: summary.to_string(),
    };
    match page(ctx).post(&mut draft)? {
        Some(_) => println!("Posted \"{}\"", title.trim()),
        None => println!("A post needs a title and a summary."),
    }
    Ok(())
}
